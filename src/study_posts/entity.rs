use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use crate::error::{FieldErrors, RestErr, RestResult};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Study group listing. Doubles as the request body for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StudyPost {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub num_of_members: i32,
    #[serde(default)]
    pub is_mentor: bool,
    #[serde(default)]
    pub price: i64,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(
        default,
        skip_deserializing,
        serialize_with = "time::serde::rfc3339::option::serialize"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        default,
        skip_deserializing,
        serialize_with = "time::serde::rfc3339::option::serialize"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl StudyPost {
    /// Collects every problem instead of stopping at the first one.
    pub fn validate(&self) -> RestResult<()> {
        let mut fields = FieldErrors::new();

        if self.user_id <= 0 {
            fields.insert("user_id".into(), "user_id is required".into());
        }
        for (name, value) in [
            ("title", &self.title),
            ("topic", &self.topic),
            ("content", &self.content),
        ] {
            if value.trim().is_empty() {
                fields.insert(name.into(), format!("{name} is required"));
            }
        }
        if self.num_of_members <= 0 {
            fields.insert(
                "num_of_members".into(),
                "num_of_members must be greater than 0".into(),
            );
        }
        if self.price < 0 {
            fields.insert("price".into(), "price must not be negative".into());
        }
        if self.start_date > self.end_date {
            fields.insert(
                "date_range".into(),
                "start_date must not be after end_date".into(),
            );
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(RestErr::validation("invalid study post", fields))
        }
    }
}
