use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum SubscriberStatus {
    #[default]
    NotActive = 0,
    Active = 1,
    Deleted = 2,
}

impl Display for SubscriberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            SubscriberStatus::NotActive => "not_active",
            SubscriberStatus::Active => "active",
            SubscriberStatus::Deleted => "deleted",
        };
        write!(f, "{}", status)
    }
}

impl From<SubscriberStatus> for u8 {
    fn from(value: SubscriberStatus) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for SubscriberStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SubscriberStatus::NotActive),
            1 => Ok(SubscriberStatus::Active),
            2 => Ok(SubscriberStatus::Deleted),
            other => Err(format!("Unsupported subscriber status: {}", other)),
        }
    }
}
