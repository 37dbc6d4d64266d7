//! sorting.rs
//!
//! Общая утилита сортировки для админских таблиц.
//!
//! Вместо проверки типов во время выполнения каждая запись отдаёт значение
//! поля через [`Sortable`] в виде размеченного объединения [`SortValue`]
//! (число, строка, дата или отсутствие значения). Правила сравнения:
//! - отсутствующие значения идут первыми при `asc` и последними при `desc`;
//! - даты сравниваются по метке времени;
//! - строки сравниваются с учётом локали (см. [`collate`]);
//! - числа сравниваются по разности;
//! - если в колонке встречаются значения разных видов, вся колонка
//!   сравнивается как строки через [`collate`].
//!
//! [`compare_values`] сам по себе упорядочивает разные виды по рангу
//! (числа, даты, строки), так что порядок транзитивен на любых данных.
//!
//! Сортировка стабильная, входной срез не изменяется.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// Активная пара "поле + направление" для таблицы.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: String,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn asc(key: impl Into<String>) -> Self {
        Self { key: key.into(), direction: SortDirection::Asc }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self { key: key.into(), direction: SortDirection::Desc }
    }

    /// Клик по заголовку колонки `key`.
    ///
    /// Повторные клики по той же колонке: asc -> desc -> без сортировки.
    /// Клик по другой колонке всегда начинает с asc.
    pub fn toggle(current: Option<&SortConfig>, key: &str) -> Option<SortConfig> {
        match current {
            Some(cfg) if cfg.key == key => match cfg.direction {
                SortDirection::Asc => Some(SortConfig::desc(key)),
                SortDirection::Desc => None,
            },
            _ => Some(SortConfig::asc(key)),
        }
    }
}

/// Значение поля, по которому сортируется запись.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Missing,
    Number(f64),
    Text(String),
    /// Метка времени в миллисекундах (UTC).
    Date(i64),
}

impl SortValue {
    fn render(&self) -> String {
        match self {
            SortValue::Missing => String::new(),
            SortValue::Number(n) => n.to_string(),
            SortValue::Text(s) => s.clone(),
            SortValue::Date(ms) => DateTime::<Utc>::from_timestamp_millis(*ms)
                .map(|d| d.to_rfc3339())
                .unwrap_or_else(|| ms.to_string()),
        }
    }

    /// Порядок разнотипных значений: отсутствие, числа, даты, строки.
    fn rank(&self) -> u8 {
        match self {
            SortValue::Missing => 0,
            SortValue::Number(_) => 1,
            SortValue::Date(_) => 2,
            SortValue::Text(_) => 3,
        }
    }
}

impl From<f64> for SortValue {
    fn from(v: f64) -> Self {
        SortValue::Number(v)
    }
}

impl From<i64> for SortValue {
    fn from(v: i64) -> Self {
        SortValue::Number(v as f64)
    }
}

impl From<u32> for SortValue {
    fn from(v: u32) -> Self {
        SortValue::Number(f64::from(v))
    }
}

impl From<&str> for SortValue {
    fn from(v: &str) -> Self {
        SortValue::Text(v.to_string())
    }
}

impl From<&String> for SortValue {
    fn from(v: &String) -> Self {
        SortValue::Text(v.clone())
    }
}

impl From<DateTime<Utc>> for SortValue {
    fn from(v: DateTime<Utc>) -> Self {
        SortValue::Date(v.timestamp_millis())
    }
}

impl From<NaiveDate> for SortValue {
    fn from(v: NaiveDate) -> Self {
        v.and_hms_opt(0, 0, 0)
            .map_or(SortValue::Missing, |dt| SortValue::Date(dt.and_utc().timestamp_millis()))
    }
}

impl<T: Into<SortValue>> From<Option<T>> for SortValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SortValue::Missing, Into::into)
    }
}

/// Доступ к полям записи по имени колонки.
pub trait Sortable {
    fn sort_value(&self, key: &str) -> SortValue;
}

/// Записи произвольной формы, пришедшие из API как JSON.
impl Sortable for serde_json::Value {
    fn sort_value(&self, key: &str) -> SortValue {
        match self.get(key) {
            None | Some(serde_json::Value::Null) => SortValue::Missing,
            Some(serde_json::Value::Number(n)) => n.as_f64().map_or(SortValue::Missing, SortValue::Number),
            Some(serde_json::Value::String(s)) => parse_timestamp(s)
                .map_or_else(|| SortValue::Text(s.clone()), SortValue::Date),
            Some(other) => SortValue::Text(other.to_string()),
        }
    }
}

fn parse_timestamp(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Сравнение двух значений в порядке `asc`.
pub fn compare_values(a: &SortValue, b: &SortValue) -> Ordering {
    match (a, b) {
        (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
        (SortValue::Number(x), SortValue::Number(y)) => x.total_cmp(y),
        (SortValue::Date(x), SortValue::Date(y)) => x.cmp(y),
        (SortValue::Text(x), SortValue::Text(y)) => collate(x, y),
        _ => a.rank().cmp(&b.rank()),
    }
}

/// Сравнение строк с учётом локали.
///
/// Сначала без учёта регистра и диакритики, затем строчные буквы раньше
/// заглавных, в конце по кодовым точкам. Каждый шаг сравнивает ключ,
/// выведенный из одной строки, поэтому порядок транзитивен.
pub fn collate(a: &str, b: &str) -> Ordering {
    folded(a)
        .cmp(folded(b))
        .then_with(|| case_key(a).cmp(case_key(b)))
        .then_with(|| a.cmp(b))
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn case_key(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().map(char::is_uppercase)
}

fn has_mixed_kinds<'a>(values: impl Iterator<Item = &'a SortValue>) -> bool {
    let mut kinds = values.filter(|v| **v != SortValue::Missing).map(SortValue::rank);
    match kinds.next() {
        Some(first) => kinds.any(|rank| rank != first),
        None => false,
    }
}

/// Стабильная сортировка по произвольному аксессору.
pub fn sort_by<T, F>(items: &[T], direction: SortDirection, accessor: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> SortValue,
{
    // ключи считаем один раз на элемент
    let mut keyed: Vec<(SortValue, &T)> = items.iter().map(|item| (accessor(item), item)).collect();
    if has_mixed_kinds(keyed.iter().map(|(value, _)| value)) {
        for (value, _) in keyed.iter_mut() {
            if *value != SortValue::Missing {
                *value = SortValue::Text(value.render());
            }
        }
    }
    keyed.sort_by(|(a, _), (b, _)| direction.apply(compare_values(a, b)));
    keyed.into_iter().map(|(_, item)| item.clone()).collect()
}

/// Сортирует записи по конфигурации; `None` возвращает исходный порядок.
pub fn sort_items<T: Sortable + Clone>(items: &[T], config: Option<&SortConfig>) -> Vec<T> {
    match config {
        None => items.to_vec(),
        Some(cfg) => sort_by(items, cfg.direction, |item| item.sort_value(&cfg.key)),
    }
}
