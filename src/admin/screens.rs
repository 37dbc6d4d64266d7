use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::table::{paginate, AdminTable, TableQuery, TableView};
use crate::error::ApiError;
use crate::models::{Hall, Movie, Schedule, User};
use crate::services::AuthorizedClient;
use crate::sorting::{sort_items, Sortable};

/// Фильтр строки таблицы по тексту поиска. У каждого экрана свой.
pub trait Searchable {
    fn matches(&self, needle: &str) -> bool;
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn contains_opt(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| contains(h, needle))
}

impl Searchable for Movie {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.title, needle) || contains_opt(self.genre.as_deref(), needle)
    }
}

impl Searchable for Hall {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle) || contains_opt(self.description.as_deref(), needle)
    }
}

impl Searchable for Schedule {
    fn matches(&self, needle: &str) -> bool {
        contains_opt(self.movie_title.as_deref(), needle)
            || contains_opt(self.hall_name.as_deref(), needle)
            || self.start_time.format("%Y-%m-%d %H:%M").to_string().contains(needle)
    }
}

impl Searchable for User {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.username, needle)
            || contains(&self.email, needle)
            || contains_opt(self.role.as_deref(), needle)
    }
}

/// Оставляет строки, подходящие под поиск. Пустой поиск пропускает всё.
pub fn filter_items<T: Searchable>(items: Vec<T>, search: &str) -> Vec<T> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }
    items.into_iter().filter(|item| item.matches(&needle)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminScreen {
    Movies,
    Halls,
    Schedules,
    Users,
}

impl AdminScreen {
    pub fn api_path(self) -> &'static str {
        match self {
            AdminScreen::Movies => "api/movies",
            AdminScreen::Halls => "api/halls",
            AdminScreen::Schedules => "api/schedules",
            AdminScreen::Users => "api/users",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AdminScreen::Movies => "Movies",
            AdminScreen::Halls => "Halls",
            AdminScreen::Schedules => "Schedules",
            AdminScreen::Users => "Users",
        }
    }

    /// Пользователи регистрируются сами, кнопки добавления у них нет.
    pub fn add_label(self) -> Option<&'static str> {
        match self {
            AdminScreen::Movies => Some("Add movie"),
            AdminScreen::Halls => Some("Add hall"),
            AdminScreen::Schedules => Some("Add schedule"),
            AdminScreen::Users => None,
        }
    }
}

/// Поиск -> сортировка -> страница для уже загруженной коллекции.
pub fn build_view<T>(screen: AdminScreen, items: Vec<T>, query: &TableQuery) -> TableView<T>
where
    T: Searchable + Sortable + Clone,
{
    let mut table = AdminTable::new(screen.title(), |text: &str| debug!("{:?} search: {:?}", screen, text));
    if let Some(label) = screen.add_label() {
        table = table.with_add_new(label);
    }
    table.input(&query.search);

    let filtered = filter_items(items, &query.search);
    let sort = query.sort_config();
    let sorted = sort_items(&filtered, sort.as_ref());
    table.render(paginate(sorted, query.page, query.page_size), sort)
}

/// Загружает коллекцию экрана из API и собирает таблицу.
pub async fn load_table<T>(
    client: &AuthorizedClient,
    screen: AdminScreen,
    query: &TableQuery,
) -> Result<TableView<T>, ApiError>
where
    T: DeserializeOwned + Searchable + Sortable + Clone,
{
    let items: Vec<T> = client.list(screen.api_path()).await?;
    debug!("Loaded {} rows for {:?}", items.len(), screen);
    Ok(build_view(screen, items, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorting::SortDirection;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn movie(id: i64, title: &str, genre: Option<&str>, rating: Option<f64>) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            genre: genre.map(str::to_string),
            duration_minutes: Some(100),
            rating,
            release_date: NaiveDate::from_ymd_opt(2020, 1, id as u32),
        }
    }

    fn movies() -> Vec<Movie> {
        vec![
            movie(1, "Inception", Some("Sci-Fi"), Some(8.8)),
            movie(2, "amélie", Some("Comedy"), None),
            movie(3, "Interstellar", Some("Sci-Fi"), Some(8.6)),
            movie(4, "Barbie", None, Some(7.0)),
        ]
    }

    fn titles(view: &TableView<Movie>) -> Vec<&str> {
        view.page.items.iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn search_is_case_insensitive_over_screen_fields() {
        let query = TableQuery { search: "SCI".into(), ..TableQuery::default() };
        let view = build_view(AdminScreen::Movies, movies(), &query);
        assert_eq!(titles(&view), vec!["Inception", "Interstellar"]);
        assert_eq!(view.search, "SCI");
        assert_eq!(view.add_new.as_deref(), Some("Add movie"));
    }

    #[test]
    fn blank_search_keeps_every_row_and_echoes_input() {
        let query = TableQuery { search: "   ".into(), ..TableQuery::default() };
        let view = build_view(AdminScreen::Movies, movies(), &query);
        assert_eq!(view.page.total, movies().len());
        assert_eq!(view.search, "   ");
    }

    #[test]
    fn sorts_then_paginates() {
        let query = TableQuery {
            sort: Some("title".into()),
            page_size: 3,
            ..TableQuery::default()
        };
        let view = build_view(AdminScreen::Movies, movies(), &query);
        assert_eq!(titles(&view), vec!["amélie", "Barbie", "Inception"]);
        assert_eq!(view.page.total_pages, 2);

        let query = TableQuery {
            sort: Some("rating".into()),
            direction: SortDirection::Desc,
            ..TableQuery::default()
        };
        let view = build_view(AdminScreen::Movies, movies(), &query);
        assert_eq!(titles(&view), vec!["Inception", "Interstellar", "Barbie", "amélie"]);
    }

    #[test]
    fn users_screen_has_no_add_button() {
        let users = vec![User {
            id: 1,
            username: "kate".into(),
            email: "kate@example.com".into(),
            role: Some("ADMIN".into()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        }];
        let query = TableQuery { search: "admin".into(), ..TableQuery::default() };
        let view = build_view(AdminScreen::Users, users, &query);
        assert_eq!(view.page.total, 1);
        assert_eq!(view.add_new, None);
    }
}
