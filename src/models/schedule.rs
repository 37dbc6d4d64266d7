use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sorting::{SortValue, Sortable};

/// Сеанс: фильм в зале в конкретное время.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i64,
    pub movie_id: i64,
    pub hall_id: i64,
    #[serde(default)]
    pub movie_title: Option<String>,
    #[serde(default)]
    pub hall_name: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl Sortable for Schedule {
    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "id" => self.id.into(),
            "movieId" => self.movie_id.into(),
            "hallId" => self.hall_id.into(),
            "movieTitle" => self.movie_title.as_ref().into(),
            "hallName" => self.hall_name.as_ref().into(),
            "startTime" => self.start_time.into(),
            "price" => self.price.into(),
            _ => SortValue::Missing,
        }
    }
}
