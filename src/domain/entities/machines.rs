use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::value_objects::field_rules::{FieldDescriptor, FieldRule, decode_document};

const COUNTER: FieldRule = FieldRule::Integer {
    min: 0,
    max: i64::MAX,
};

const LOAD: FieldRule = FieldRule::Float {
    min: 0.0,
    max: f64::MAX,
};

pub const MACHINE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::required("cpu", LOAD),
    FieldDescriptor::required("gpu", LOAD),
    FieldDescriptor::required(
        "load_average",
        FieldRule::Text {
            min_len: 0,
            max_len: 256,
        },
    ),
    FieldDescriptor::required("memory_total", COUNTER),
    FieldDescriptor::required("memory_free", COUNTER),
    FieldDescriptor::required("hdd_total", COUNTER),
    FieldDescriptor::required("hdd_free", COUNTER),
    FieldDescriptor::required("bandwidth_in", COUNTER),
    FieldDescriptor::required("bandwidth_out", COUNTER),
    FieldDescriptor::required("uptime", COUNTER),
    FieldDescriptor::required("timestamp", COUNTER),
    FieldDescriptor::required("total_bytes_in", COUNTER),
    FieldDescriptor::required("total_bytes_out", COUNTER),
];

/// Periodic resource snapshot reported by a streaming server.
///
/// Samples are ordered by `timestamp` only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MachineEntity {
    pub cpu: f64,
    pub gpu: f64,
    pub load_average: String,
    pub memory_total: i64,
    pub memory_free: i64,
    pub hdd_total: i64,
    pub hdd_free: i64,
    pub bandwidth_in: i64,
    pub bandwidth_out: i64,
    pub uptime: i64,
    pub timestamp: i64,
    pub total_bytes_in: i64,
    pub total_bytes_out: i64,
}

impl MachineEntity {
    pub fn hdd_used(&self) -> i64 {
        self.hdd_total.saturating_sub(self.hdd_free)
    }

    pub fn from_document(document: Value) -> Result<Self> {
        decode_document(document, MACHINE_FIELDS)
    }
}
