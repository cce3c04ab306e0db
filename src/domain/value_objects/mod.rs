pub mod catalog;
pub mod enums;
pub mod field_rules;
pub mod limits;
pub mod playlist;
pub mod secure_url;
