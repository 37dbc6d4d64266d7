use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::sorting::{SortValue, Sortable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
}

impl Sortable for Movie {
    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "id" => self.id.into(),
            "title" => self.title.as_str().into(),
            "genre" => self.genre.as_ref().into(),
            "durationMinutes" => self.duration_minutes.into(),
            "rating" => self.rating.into(),
            "releaseDate" => self.release_date.into(),
            _ => SortValue::Missing,
        }
    }
}
