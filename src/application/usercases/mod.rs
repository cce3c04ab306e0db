pub mod content_sync;
pub mod entitlements;
pub mod playlist;
pub mod service_stats;
