//! Field bounds shared by the entity codecs.

pub const MIN_PRICE: f64 = 0.0;
pub const DEFAULT_PRICE: f64 = MIN_PRICE;
pub const MAX_PRICE: f64 = 1000.0;

pub const MIN_IARC: i64 = 0;
pub const DEFAULT_IARC: i32 = 18;
pub const MAX_IARC: i64 = 21;

pub const MIN_STREAM_NAME_LEN: usize = 1;
pub const MAX_STREAM_NAME_LEN: usize = 64;
pub const MIN_STREAM_TVG_LEN: usize = 1;
pub const MAX_STREAM_TVG_LEN: usize = 64;
pub const MIN_STREAM_DESCRIPTION_LEN: usize = 1;
pub const MAX_STREAM_DESCRIPTION_LEN: usize = 4096;

pub const MIN_URI_LEN: usize = 3;
pub const MAX_URI_LEN: usize = 2048;

pub const MIN_SERIES_NAME_LEN: usize = 3;
pub const MAX_SERIES_NAME_LEN: usize = 30;

pub const MIN_DEVICE_NAME_LEN: usize = 1;
pub const MAX_DEVICE_NAME_LEN: usize = 32;
pub const DEFAULT_DEVICE_NAME: &str = "Device";
pub const DEFAULT_DEVICES_COUNT: usize = 10;

pub const MIN_EMAIL_LEN: usize = 3;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_PERSON_NAME_LEN: usize = 64;
pub const SUBSCRIBER_HASH_LEN: usize = 32;
pub const MIN_COUNTRY_LEN: usize = 2;
pub const MAX_COUNTRY_LEN: usize = 3;
pub const DEFAULT_LOCALE: &str = "en";

/// One year of playback, in milliseconds.
pub const MAX_VIDEO_DURATION_MSEC: i64 = 60 * 60 * 1000 * 24 * 365;

pub const MIN_USER_SCORE: f64 = 0.0;
pub const MAX_USER_SCORE: f64 = 100.0;
