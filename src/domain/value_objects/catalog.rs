use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::{
    entities::{
        series::SerialEntity, service_settings::ServiceSettingsEntity, streams::StreamEntity,
        subscribers::SubscriberEntity,
    },
    value_objects::enums::content_kinds::ContentKind,
};

pub fn is_live_stream(stream: &StreamEntity) -> bool {
    stream.visible && stream.stream_type.is_live()
}

pub fn is_vod_stream(stream: &StreamEntity) -> bool {
    stream.visible && stream.stream_type.is_vod()
}

pub fn is_catchup(stream: &StreamEntity) -> bool {
    stream.visible && stream.stream_type.is_catchup()
}

pub fn is_for_subscribers(stream: &StreamEntity) -> bool {
    is_live_stream(stream) || is_vod_stream(stream) || is_catchup(stream)
}

/// Resolves stream ids referenced by entitlements.
pub trait StreamLookup {
    fn lookup(&self, stream_id: Uuid) -> Option<&StreamEntity>;
}

impl StreamLookup for HashMap<Uuid, StreamEntity> {
    fn lookup(&self, stream_id: Uuid) -> Option<&StreamEntity> {
        self.get(&stream_id)
    }
}

impl StreamLookup for [StreamEntity] {
    fn lookup(&self, stream_id: Uuid) -> Option<&StreamEntity> {
        self.iter().find(|stream| stream.id == stream_id)
    }
}

/// Union of the streams and series hosted by a set of servers.
///
/// A stream or series shared by several servers appears once; the first
/// server listing it wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    streams: Vec<StreamEntity>,
    series: Vec<SerialEntity>,
}

impl Catalog {
    pub fn from_servers<'a, I>(servers: I) -> Self
    where
        I: IntoIterator<Item = &'a ServiceSettingsEntity>,
    {
        let mut catalog = Catalog::default();
        let mut seen_streams = HashSet::new();
        let mut seen_series = HashSet::new();

        for server in servers {
            for stream in &server.streams {
                if seen_streams.insert(stream.id) {
                    catalog.streams.push(stream.clone());
                }
            }
            for serial in &server.series {
                if seen_series.insert(serial.id) {
                    catalog.series.push(serial.clone());
                }
            }
        }

        catalog
    }

    /// Catalog of the servers `subscriber` is attached to, in subscription order.
    pub fn for_subscriber(subscriber: &SubscriberEntity, servers: &[ServiceSettingsEntity]) -> Self {
        Self::from_servers(
            subscriber
                .servers
                .iter()
                .filter_map(|server_id| servers.iter().find(|server| server.id == *server_id)),
        )
    }

    pub fn streams(&self) -> &[StreamEntity] {
        &self.streams
    }

    pub fn series(&self) -> &[SerialEntity] {
        &self.series
    }

    /// Streams the classifier for `kind` offers to subscribers.
    pub fn eligible(&self, kind: ContentKind) -> impl Iterator<Item = &StreamEntity> + '_ {
        self.streams
            .iter()
            .filter(move |stream| kind.accepts(stream))
    }

    pub fn visible_series(&self) -> impl Iterator<Item = &SerialEntity> + '_ {
        self.series.iter().filter(|serial| serial.visible)
    }
}

impl StreamLookup for Catalog {
    fn lookup(&self, stream_id: Uuid) -> Option<&StreamEntity> {
        self.streams.as_slice().lookup(stream_id)
    }
}
