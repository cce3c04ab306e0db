use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum DeviceStatus {
    #[default]
    NotActive = 0,
    Active = 1,
    Banned = 2,
}

impl Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            DeviceStatus::NotActive => "not_active",
            DeviceStatus::Active => "active",
            DeviceStatus::Banned => "banned",
        };
        write!(f, "{}", status)
    }
}

impl From<DeviceStatus> for u8 {
    fn from(value: DeviceStatus) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for DeviceStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DeviceStatus::NotActive),
            1 => Ok(DeviceStatus::Active),
            2 => Ok(DeviceStatus::Banned),
            other => Err(format!("Unsupported device status: {}", other)),
        }
    }
}
