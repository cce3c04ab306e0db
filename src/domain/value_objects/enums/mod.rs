pub mod content_kinds;
pub mod device_statuses;
pub mod stream_types;
pub mod subscriber_statuses;
pub mod vod_types;
