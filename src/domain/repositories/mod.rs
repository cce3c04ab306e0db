pub mod service_settings;
pub mod streams;
pub mod subscribers;
