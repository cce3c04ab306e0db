use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::value_objects::{
    field_rules::{FieldDescriptor, FieldRule, decode_document},
    limits::{
        DEFAULT_PRICE, MAX_PRICE, MAX_SERIES_NAME_LEN, MAX_STREAM_DESCRIPTION_LEN, MAX_URI_LEN,
        MIN_PRICE, MIN_SERIES_NAME_LEN, MIN_STREAM_DESCRIPTION_LEN, MIN_URI_LEN,
    },
};

pub const SERIAL_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::required(
        "name",
        FieldRule::Text {
            min_len: MIN_SERIES_NAME_LEN,
            max_len: MAX_SERIES_NAME_LEN,
        },
    ),
    FieldDescriptor::optional(
        "icon",
        FieldRule::Text {
            min_len: MIN_URI_LEN,
            max_len: MAX_URI_LEN,
        },
    ),
    FieldDescriptor::optional(
        "description",
        FieldRule::Text {
            min_len: MIN_STREAM_DESCRIPTION_LEN,
            max_len: MAX_STREAM_DESCRIPTION_LEN,
        },
    ),
    FieldDescriptor::optional(
        "price",
        FieldRule::Float {
            min: MIN_PRICE,
            max: MAX_PRICE,
        },
    ),
    FieldDescriptor::optional(
        "season",
        FieldRule::Integer {
            min: 0,
            max: i32::MAX as i64,
        },
    ),
    FieldDescriptor::optional("visible", FieldRule::Bool),
    FieldDescriptor::optional("groups", FieldRule::List),
    FieldDescriptor::optional("episodes", FieldRule::List),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialEntity {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_season")]
    pub season: i32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub episodes: Vec<Uuid>,
    #[serde(
        rename = "created_date",
        with = "chrono::serde::ts_milliseconds",
        default = "Utc::now"
    )]
    pub created_at: DateTime<Utc>,
}

impl SerialEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon: None,
            groups: Vec::new(),
            description: None,
            price: DEFAULT_PRICE,
            season: default_season(),
            visible: true,
            episodes: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn add_episode(&mut self, stream_id: Uuid) {
        if !self.episodes.contains(&stream_id) {
            self.episodes.push(stream_id);
        }
    }

    pub fn remove_episode(&mut self, stream_id: Uuid) {
        self.episodes.retain(|episode| *episode != stream_id);
    }

    pub fn from_document(document: Value) -> Result<Self> {
        decode_document(document, SERIAL_FIELDS)
    }
}

fn default_season() -> i32 {
    1
}

fn default_visible() -> bool {
    true
}
