use serde::{Deserialize, Serialize};

use crate::domain::entities::streams::StreamEntity;

pub const M3U_HEADER: &str = "#EXTM3U\n";

/// Structured form of one playlist record, for clients that do not parse M3U.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    #[serde(rename = "tvg-id")]
    pub tvg_id: String,
    #[serde(rename = "tvg-name")]
    pub tvg_name: String,
    #[serde(rename = "tvg-logo")]
    pub tvg_logo: String,
    pub groups: Vec<String>,
    pub url: String,
}

impl PlaylistEntry {
    pub fn new(stream: &StreamEntity, url: String) -> Self {
        Self {
            tvg_id: stream.tvg_id.clone().unwrap_or_default(),
            tvg_name: stream.stable_name().to_string(),
            tvg_logo: stream.tvg_logo.clone().unwrap_or_default(),
            groups: stream.groups.clone(),
            url,
        }
    }
}

/// One `#EXTINF` record followed by its URL line.
pub fn extinf_record(stream: &StreamEntity, url: &str) -> String {
    format!(
        "#EXTINF:-1 tvg-id=\"{}\" tvg-name=\"{}\" tvg-logo=\"{}\" group-title=\"{}\",{}\n{}\n",
        stream.tvg_id.as_deref().unwrap_or_default(),
        stream.stable_name(),
        stream.tvg_logo.as_deref().unwrap_or_default(),
        stream.main_group(),
        stream.name,
        url
    )
}
