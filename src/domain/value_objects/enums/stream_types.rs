use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Kind of a stream record. Serialized as its integer wire value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum StreamType {
    Proxy = 0,
    VodProxy = 1,
    Relay = 2,
    Encode = 3,
    TimeshiftPlayer = 4,
    TimeshiftRecorder = 5,
    Catchup = 6,
    TestLife = 7,
    VodRelay = 8,
    VodEncode = 9,
    CodRelay = 10,
    CodEncode = 11,
    Event = 12,
    CvData = 13,
}

impl StreamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamType::Proxy => "proxy",
            StreamType::VodProxy => "vod_proxy",
            StreamType::Relay => "relay",
            StreamType::Encode => "encode",
            StreamType::TimeshiftPlayer => "timeshift_player",
            StreamType::TimeshiftRecorder => "timeshift_recorder",
            StreamType::Catchup => "catchup",
            StreamType::TestLife => "test_life",
            StreamType::VodRelay => "vod_relay",
            StreamType::VodEncode => "vod_encode",
            StreamType::CodRelay => "cod_relay",
            StreamType::CodEncode => "cod_encode",
            StreamType::Event => "event",
            StreamType::CvData => "cv_data",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(
            self,
            StreamType::Proxy
                | StreamType::Relay
                | StreamType::Encode
                | StreamType::TimeshiftPlayer
                | StreamType::CodRelay
                | StreamType::CodEncode
                | StreamType::Event
        )
    }

    pub fn is_vod(&self) -> bool {
        matches!(
            self,
            StreamType::VodProxy | StreamType::VodRelay | StreamType::VodEncode
        )
    }

    pub fn is_catchup(&self) -> bool {
        matches!(self, StreamType::Catchup)
    }

    /// Kinds that produce `#EXTINF` records. Events, recorders, test and
    /// CV-data streams are catalogued but never rendered.
    pub fn is_playlist_renderable(&self) -> bool {
        matches!(
            self,
            StreamType::Relay
                | StreamType::VodRelay
                | StreamType::CodRelay
                | StreamType::Encode
                | StreamType::VodEncode
                | StreamType::CodEncode
                | StreamType::Proxy
                | StreamType::VodProxy
                | StreamType::TimeshiftPlayer
                | StreamType::Catchup
        )
    }
}

impl From<StreamType> for u8 {
    fn from(value: StreamType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for StreamType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let stream_type = match value {
            0 => StreamType::Proxy,
            1 => StreamType::VodProxy,
            2 => StreamType::Relay,
            3 => StreamType::Encode,
            4 => StreamType::TimeshiftPlayer,
            5 => StreamType::TimeshiftRecorder,
            6 => StreamType::Catchup,
            7 => StreamType::TestLife,
            8 => StreamType::VodRelay,
            9 => StreamType::VodEncode,
            10 => StreamType::CodRelay,
            11 => StreamType::CodEncode,
            12 => StreamType::Event,
            13 => StreamType::CvData,
            other => return Err(format!("Unsupported stream type: {}", other)),
        };
        Ok(stream_type)
    }
}

impl Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
