use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{machines::MachineEntity, series::SerialEntity, streams::StreamEntity},
    services::stats_aggregator,
};

pub const DEFAULT_SERVICE_NAME: &str = "Service";

/// A streaming server as loaded by the persistence collaborator: the streams
/// and series it hosts plus its monitoring history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSettingsEntity {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub price_package: f64,
    #[serde(default)]
    pub monitoring: bool,
    #[serde(default)]
    pub auto_start: bool,
    #[serde(
        rename = "created_date",
        with = "chrono::serde::ts_milliseconds",
        default = "Utc::now"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub streams: Vec<StreamEntity>,
    #[serde(default)]
    pub series: Vec<SerialEntity>,
    /// Kept sorted ascending by `timestamp`; only `add_stat` appends.
    #[serde(default, deserialize_with = "deserialize_sorted_stats")]
    stats: Vec<MachineEntity>,
}

impl ServiceSettingsEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price_package: 0.0,
            monitoring: false,
            auto_start: false,
            created_at: Utc::now(),
            streams: Vec::new(),
            series: Vec::new(),
            stats: Vec::new(),
        }
    }

    pub fn stats(&self) -> &[MachineEntity] {
        &self.stats
    }

    /// Inserts a sample after every sample with the same or an earlier timestamp.
    pub fn add_stat(&mut self, stat: MachineEntity) {
        let index = self
            .stats
            .partition_point(|sample| sample.timestamp <= stat.timestamp);
        self.stats.insert(index, stat);
    }

    pub fn remove_stat(&mut self, stat: &MachineEntity) {
        if let Some(index) = self.stats.iter().position(|sample| sample == stat) {
            self.stats.remove(index);
        }
    }

    /// Egress bytes observed strictly after `start_timestamp`.
    pub fn net_bytes(&self, start_timestamp: i64) -> u64 {
        stats_aggregator::net_bytes(&self.stats, start_timestamp)
    }

    /// Average disk occupancy from `start_timestamp` onwards.
    pub fn store_bytes(&self, start_timestamp: i64) -> f64 {
        stats_aggregator::store_bytes(&self.stats, start_timestamp)
    }

    pub fn add_stream(&mut self, stream: StreamEntity) {
        self.streams.push(stream);
    }

    /// Detaches a stream from this server and hands it back for deletion.
    pub fn remove_stream(&mut self, stream_id: Uuid) -> Option<StreamEntity> {
        let index = self.streams.iter().position(|stream| stream.id == stream_id)?;
        Some(self.streams.remove(index))
    }

    pub fn find_stream_by_id(&self, stream_id: Uuid) -> Option<&StreamEntity> {
        self.streams.iter().find(|stream| stream.id == stream_id)
    }

    pub fn add_serial(&mut self, serial: SerialEntity) {
        self.series.push(serial);
    }

    pub fn remove_serial(&mut self, serial_id: Uuid) -> Option<SerialEntity> {
        let index = self.series.iter().position(|serial| serial.id == serial_id)?;
        Some(self.series.remove(index))
    }
}

impl Default for ServiceSettingsEntity {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

fn deserialize_sorted_stats<'de, D>(deserializer: D) -> Result<Vec<MachineEntity>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut stats = Vec::<MachineEntity>::deserialize(deserializer)?;
    stats.sort_by_key(|sample| sample.timestamp);
    Ok(stats)
}
