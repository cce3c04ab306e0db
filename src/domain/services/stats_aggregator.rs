//! Time-window accounting over a server's machine samples.
//!
//! Every function expects `stats` sorted ascending by `timestamp` and
//! degrades to zero instead of failing.

use crate::domain::entities::machines::MachineEntity;

/// Index of the first sample strictly after `start_timestamp`.
fn window_start(stats: &[MachineEntity], start_timestamp: i64) -> usize {
    stats.partition_point(|sample| sample.timestamp <= start_timestamp)
}

/// Egress bytes accumulated across the window starting after `start_timestamp`.
///
/// Counter resets (a sample lower than its predecessor) contribute nothing.
pub fn net_bytes(stats: &[MachineEntity], start_timestamp: i64) -> u64 {
    if stats.len() < 2 {
        return 0;
    }

    let index = window_start(stats, start_timestamp);
    let Some(first) = stats.get(index) else {
        return 0;
    };

    let mut total: u64 = 0;
    let mut previous = first;
    for current in &stats[index + 1..] {
        let delta = current.total_bytes_out.saturating_sub(previous.total_bytes_out);
        if delta > 0 {
            total = total.saturating_add(delta as u64);
        }
        previous = current;
    }
    total
}

/// Mean disk occupancy across the window starting after `start_timestamp`.
pub fn store_bytes(stats: &[MachineEntity], start_timestamp: i64) -> f64 {
    let Some(last) = stats.last() else {
        return 0.0;
    };

    let index = window_start(stats, start_timestamp);
    if index == stats.len() {
        return if last.timestamp == start_timestamp {
            last.hdd_used() as f64
        } else {
            0.0
        };
    }

    let window = &stats[index..];
    let total: f64 = window.iter().map(|sample| sample.hdd_used() as f64).sum();
    total / window.len() as f64
}
