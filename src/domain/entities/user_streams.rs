use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::streams::{StreamEntity, unix_epoch};

/// A subscriber's entitlement to one stream, plus personal playback state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserStreamEntity {
    #[serde(rename = "sid")]
    pub stream_id: Uuid,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(with = "chrono::serde::ts_milliseconds", default = "unix_epoch")]
    pub recent: DateTime<Utc>,
    /// Resume position in milliseconds.
    #[serde(default)]
    pub interruption_time: i64,
}

impl UserStreamEntity {
    pub fn new(stream_id: Uuid) -> Self {
        Self {
            stream_id,
            favorite: false,
            private: false,
            locked: false,
            recent: unix_epoch(),
            interruption_time: 0,
        }
    }

    /// Default entitlement for `stream`; paid content starts locked.
    ///
    /// Returns `None` for an absent or id-less stream.
    pub fn make_from_stream(stream: Option<&StreamEntity>) -> Option<Self> {
        let stream = stream.filter(|stream| !stream.id.is_nil())?;
        Some(Self {
            locked: stream.price > 0.0,
            ..Self::new(stream.id)
        })
    }
}
