use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sorting::{SortValue, Sortable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Sortable for User {
    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "id" => self.id.into(),
            "username" => self.username.as_str().into(),
            "email" => self.email.as_str().into(),
            "role" => self.role.as_ref().into(),
            "createdAt" => self.created_at.into(),
            _ => SortValue::Missing,
        }
    }
}
