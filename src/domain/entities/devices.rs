use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::value_objects::{
    enums::device_statuses::DeviceStatus,
    field_rules::{FieldDescriptor, FieldRule, decode_document},
    limits::{DEFAULT_DEVICE_NAME, MAX_DEVICE_NAME_LEN, MIN_DEVICE_NAME_LEN},
};

pub const DEVICE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::required(
        "name",
        FieldRule::Text {
            min_len: MIN_DEVICE_NAME_LEN,
            max_len: MAX_DEVICE_NAME_LEN,
        },
    ),
    FieldDescriptor::required("status", FieldRule::Integer { min: 0, max: 2 }),
    FieldDescriptor::optional(
        "created_date",
        FieldRule::Integer {
            min: 0,
            max: i64::MAX,
        },
    ),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceEntity {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(
        rename = "created_date",
        with = "chrono::serde::ts_milliseconds",
        default = "Utc::now"
    )]
    pub created_at: DateTime<Utc>,
}

impl DeviceEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: DeviceStatus::default(),
            created_at: Utc::now(),
        }
    }

    pub fn from_document(document: Value) -> Result<Self> {
        decode_document(document, DEVICE_FIELDS)
    }
}

impl Default for DeviceEntity {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_NAME)
    }
}
