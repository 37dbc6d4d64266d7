use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::sorting::{SortConfig, SortDirection};

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

/// Параметры таблицы из строки запроса: `?search=&sort=title&direction=desc&page=2&pageSize=20`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TableQuery {
    #[serde(default)]
    pub search: String,
    pub sort: Option<String>,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: u32,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: None,
            direction: SortDirection::Asc,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl TableQuery {
    pub fn sort_config(&self) -> Option<SortConfig> {
        self.sort
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| SortConfig { key: key.to_string(), direction: self.direction })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Страница `page` (с единицы) размером `page_size`.
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size as usize) as u32;
    let skip = (page as usize - 1).saturating_mul(page_size as usize);

    Page {
        items: items.into_iter().skip(skip).take(page_size as usize).collect(),
        total,
        page,
        page_size,
        total_pages,
    }
}

/// Готовая к отрисовке таблица.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView<T> {
    pub title: String,
    pub search: String,
    pub add_new: Option<String>,
    pub sort: Option<SortConfig>,
    #[serde(flatten)]
    pub page: Page<T>,
}

/// Оболочка админской таблицы: поле поиска и кнопка "добавить".
///
/// Сама ничего не фильтрует: каждое изменение текста поиска как есть
/// уходит в колбэк вызывающего кода.
pub struct AdminTable<'a> {
    title: String,
    add_new: Option<String>,
    search_text: String,
    on_search: Box<dyn FnMut(&str) + 'a>,
}

impl<'a> AdminTable<'a> {
    pub fn new(title: impl Into<String>, on_search: impl FnMut(&str) + 'a) -> Self {
        Self {
            title: title.into(),
            add_new: None,
            search_text: String::new(),
            on_search: Box::new(on_search),
        }
    }

    pub fn with_add_new(mut self, label: impl Into<String>) -> Self {
        self.add_new = Some(label.into());
        self
    }

    /// Ввод в поле поиска.
    pub fn input(&mut self, raw: &str) {
        self.search_text = raw.to_string();
        (self.on_search)(raw);
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn add_new(&self) -> Option<&str> {
        self.add_new.as_deref()
    }

    pub fn render<T>(&self, page: Page<T>, sort: Option<SortConfig>) -> TableView<T> {
        TableView {
            title: self.title.clone(),
            search: self.search_text.clone(),
            add_new: self.add_new.clone(),
            sort,
            page,
        }
    }
}
