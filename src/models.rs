use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Webinar,
    Course,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Webinar => "Webinar",
            ItemKind::Course => "Course",
        }
    }
}

/// A schedulable content entry: a webinar or a course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u32,
    pub title: String,
    #[schema(value_type = String, format = "date-time", example = "2025-11-24T18:00:00")]
    pub start_date: NaiveDateTime,
    #[schema(value_type = String, format = "date-time", example = "2025-11-24T19:30:00")]
    pub end_date: NaiveDateTime,
    /// Display label only, e.g. "6:00 PM - 7:30 PM IST".
    pub time: String,
    pub mode: String,
    /// Zero means free.
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,
    pub image: String,
    #[serde(default)]
    pub description: String,
}

impl Item {
    pub fn popularity(&self) -> u32 {
        self.popularity.unwrap_or(0)
    }

    pub fn is_free(&self) -> bool {
        self.price <= 0.0
    }

    pub fn action_label(&self) -> String {
        if self.is_free() {
            "View Now".to_string()
        } else {
            format!("₹{} | Buy Now", self.price)
        }
    }
}
