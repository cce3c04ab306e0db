use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::value_objects::{
    enums::{stream_types::StreamType, vod_types::VodType},
    field_rules::{FieldDescriptor, FieldRule, decode_document, validate_document},
    limits::{
        DEFAULT_IARC, DEFAULT_PRICE, MAX_IARC, MAX_PRICE, MAX_STREAM_DESCRIPTION_LEN,
        MAX_STREAM_NAME_LEN, MAX_STREAM_TVG_LEN, MAX_URI_LEN, MAX_USER_SCORE,
        MAX_VIDEO_DURATION_MSEC, MIN_IARC, MIN_PRICE, MIN_STREAM_DESCRIPTION_LEN,
        MIN_STREAM_NAME_LEN, MIN_STREAM_TVG_LEN, MIN_URI_LEN, MIN_USER_SCORE,
    },
};

pub const DEFAULT_VOD_COUNTRY: &str = "Unknown";

pub const STREAM_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::required(
        "name",
        FieldRule::Text {
            min_len: MIN_STREAM_NAME_LEN,
            max_len: MAX_STREAM_NAME_LEN,
        },
    ),
    FieldDescriptor::required("type", FieldRule::Integer { min: 0, max: 13 }),
    FieldDescriptor::required("output", FieldRule::List),
    FieldDescriptor::optional(
        "price",
        FieldRule::Float {
            min: MIN_PRICE,
            max: MAX_PRICE,
        },
    ),
    FieldDescriptor::optional("visible", FieldRule::Bool),
    FieldDescriptor::optional(
        "iarc",
        FieldRule::Integer {
            min: MIN_IARC,
            max: MAX_IARC,
        },
    ),
    FieldDescriptor::optional(
        "tvg_id",
        FieldRule::Text {
            min_len: MIN_STREAM_TVG_LEN,
            max_len: MAX_STREAM_TVG_LEN,
        },
    ),
    FieldDescriptor::optional(
        "tvg_name",
        FieldRule::Text {
            min_len: MIN_STREAM_TVG_LEN,
            max_len: MAX_STREAM_TVG_LEN,
        },
    ),
    FieldDescriptor::optional(
        "tvg_logo",
        FieldRule::Text {
            min_len: MIN_URI_LEN,
            max_len: MAX_URI_LEN,
        },
    ),
    FieldDescriptor::optional("groups", FieldRule::List),
    FieldDescriptor::optional(
        "view_count",
        FieldRule::Integer {
            min: 0,
            max: i64::MAX,
        },
    ),
    FieldDescriptor::optional(
        "created_date",
        FieldRule::Integer {
            min: 0,
            max: i64::MAX,
        },
    ),
    FieldDescriptor::optional("vod", FieldRule::Object),
];

pub const OUTPUT_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::required(
    "uri",
    FieldRule::Text {
        min_len: MIN_URI_LEN,
        max_len: MAX_URI_LEN,
    },
)];

pub const VOD_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::optional("vod_type", FieldRule::Integer { min: 0, max: 1 }),
    FieldDescriptor::optional(
        "description",
        FieldRule::Text {
            min_len: MIN_STREAM_DESCRIPTION_LEN,
            max_len: MAX_STREAM_DESCRIPTION_LEN,
        },
    ),
    FieldDescriptor::optional(
        "trailer_url",
        FieldRule::Text {
            min_len: MIN_URI_LEN,
            max_len: MAX_URI_LEN,
        },
    ),
    FieldDescriptor::optional(
        "user_score",
        FieldRule::Float {
            min: MIN_USER_SCORE,
            max: MAX_USER_SCORE,
        },
    ),
    FieldDescriptor::optional(
        "prime_date",
        FieldRule::Integer {
            min: 0,
            max: i64::MAX,
        },
    ),
    FieldDescriptor::optional(
        "country",
        FieldRule::Text {
            min_len: 1,
            max_len: MAX_URI_LEN,
        },
    ),
    FieldDescriptor::optional(
        "duration",
        FieldRule::Integer {
            min: 0,
            max: MAX_VIDEO_DURATION_MSEC,
        },
    ),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputUrl {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub uri: String,
}

impl OutputUrl {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            uri: uri.into(),
        }
    }
}

/// Extra descriptive data carried by VOD streams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VodMetadata {
    #[serde(default)]
    pub vod_type: VodType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub user_score: f64,
    #[serde(with = "chrono::serde::ts_milliseconds", default = "unix_epoch")]
    pub prime_date: DateTime<Utc>,
    #[serde(default = "default_country")]
    pub country: String,
    /// Milliseconds.
    #[serde(default)]
    pub duration: i64,
}

impl Default for VodMetadata {
    fn default() -> Self {
        Self {
            vod_type: VodType::default(),
            description: None,
            trailer_url: None,
            user_score: 0.0,
            prime_date: unix_epoch(),
            country: default_country(),
            duration: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamEntity {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub stream_type: StreamType,
    #[serde(default)]
    pub tvg_id: Option<String>,
    #[serde(default)]
    pub tvg_name: Option<String>,
    #[serde(default)]
    pub tvg_logo: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_iarc")]
    pub iarc: i32,
    #[serde(default)]
    pub view_count: i64,
    #[serde(
        rename = "created_date",
        with = "chrono::serde::ts_milliseconds",
        default = "Utc::now"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub output: Vec<OutputUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vod: Option<VodMetadata>,
}

impl StreamEntity {
    pub fn new(name: impl Into<String>, stream_type: StreamType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            stream_type,
            tvg_id: None,
            tvg_name: None,
            tvg_logo: None,
            groups: Vec::new(),
            price: DEFAULT_PRICE,
            visible: true,
            iarc: DEFAULT_IARC,
            view_count: 0,
            created_at: Utc::now(),
            output: Vec::new(),
            vod: stream_type.is_vod().then(VodMetadata::default),
        }
    }

    /// Display name for players: `tvg_name` when set, otherwise `name`.
    pub fn stable_name(&self) -> &str {
        match self.tvg_name.as_deref() {
            Some(tvg_name) if !tvg_name.is_empty() => tvg_name,
            _ => &self.name,
        }
    }

    pub fn main_group(&self) -> &str {
        self.groups.first().map(String::as_str).unwrap_or_default()
    }

    pub fn add_output(&mut self, output: OutputUrl) {
        self.output.push(output);
    }

    pub fn find_output(&self, output_id: Uuid) -> Option<&OutputUrl> {
        self.output.iter().find(|output| output.id == output_id)
    }

    pub fn from_document(document: Value) -> Result<Self> {
        validate_document(&document, STREAM_FIELDS)?;

        if let Some(outputs) = document.get("output").and_then(Value::as_array) {
            for output in outputs {
                validate_document(output, OUTPUT_FIELDS)?;
            }
        }
        if let Some(vod) = document.get("vod").filter(|vod| !vod.is_null()) {
            validate_document(vod, VOD_FIELDS)?;
        }

        let mut stream: StreamEntity = decode_document(document, STREAM_FIELDS)?;
        match (stream.stream_type.is_vod(), stream.vod.is_some()) {
            (true, false) => stream.vod = Some(VodMetadata::default()),
            (false, true) => bail!(
                "Invalid field: vod is only allowed for vod streams, got {}",
                stream.stream_type
            ),
            _ => {}
        }

        Ok(stream)
    }

    pub fn to_document(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn default_visible() -> bool {
    true
}

fn default_iarc() -> i32 {
    DEFAULT_IARC
}

fn default_country() -> String {
    DEFAULT_VOD_COUNTRY.to_string()
}

pub(crate) fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}
