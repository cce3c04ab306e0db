use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum VodType {
    #[default]
    Vods = 0,
    Series = 1,
}

impl From<VodType> for u8 {
    fn from(value: VodType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for VodType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VodType::Vods),
            1 => Ok(VodType::Series),
            other => Err(format!("Unsupported vod type: {}", other)),
        }
    }
}

impl Display for VodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let vod_type = match self {
            VodType::Vods => "vods",
            VodType::Series => "series",
        };
        write!(f, "{}", vod_type)
    }
}
