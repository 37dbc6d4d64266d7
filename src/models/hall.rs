use serde::{Deserialize, Serialize};

use crate::sorting::{SortValue, Sortable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hall {
    pub id: i64,
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl Sortable for Hall {
    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "capacity" => self.capacity.into(),
            "description" => self.description.as_ref().into(),
            _ => SortValue::Missing,
        }
    }
}
