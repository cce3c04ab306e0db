use std::fmt::Display;

use crate::domain::{entities::streams::StreamEntity, value_objects::catalog};

/// Selects one of a subscriber's three entitlement collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Streams,
    Vods,
    Catchups,
}

impl ContentKind {
    /// Playlist rendering order.
    pub const ALL: [ContentKind; 3] = [ContentKind::Streams, ContentKind::Vods, ContentKind::Catchups];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Streams => "streams",
            ContentKind::Vods => "vods",
            ContentKind::Catchups => "catchups",
        }
    }

    /// Whether the catalog classifier for this collection accepts `stream`.
    pub fn accepts(&self, stream: &StreamEntity) -> bool {
        match self {
            ContentKind::Streams => catalog::is_live_stream(stream),
            ContentKind::Vods => catalog::is_vod_stream(stream),
            ContentKind::Catchups => catalog::is_catchup(stream),
        }
    }

    /// The collection a stream belongs to, if it is offered to subscribers at all.
    pub fn classify(stream: &StreamEntity) -> Option<ContentKind> {
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.accepts(stream))
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
