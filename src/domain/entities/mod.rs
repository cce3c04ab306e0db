pub mod devices;
pub mod machines;
pub mod series;
pub mod service_settings;
pub mod streams;
pub mod subscribers;
pub mod user_streams;
