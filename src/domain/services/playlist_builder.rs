//! Renders a subscriber's entitlements as an M3U playlist for one device.
//!
//! Official outputs are routed through the load balancer with device-bound
//! credentials; private outputs are emitted as stored. Locked entries are
//! left out entirely.

use uuid::Uuid;

use crate::domain::{
    entities::{
        service_settings::ServiceSettingsEntity,
        streams::{OutputUrl, StreamEntity},
        subscribers::SubscriberEntity,
    },
    value_objects::{
        catalog::StreamLookup,
        enums::content_kinds::ContentKind,
        playlist::{M3U_HEADER, PlaylistEntry, extinf_record},
        secure_url::{PlaybackCredentials, secure_output_url},
    },
};

struct PlaylistRecord<'a> {
    stream: &'a StreamEntity,
    url: String,
}

fn renderable_outputs(stream: &StreamEntity) -> &[OutputUrl] {
    if stream.stream_type.is_playlist_renderable() {
        stream.output.as_slice()
    } else {
        &[]
    }
}

fn subscriber_records<'a, S>(
    subscriber: &SubscriberEntity,
    streams: &'a S,
    device_id: Uuid,
    lb_host: &str,
) -> Vec<PlaylistRecord<'a>>
where
    S: StreamLookup + ?Sized,
{
    let credentials = PlaybackCredentials {
        subscriber_id: subscriber.id,
        password_hash: &subscriber.password,
        device_id,
    };

    let mut records = Vec::new();
    for kind in ContentKind::ALL {
        for entry in subscriber.unlocked(kind) {
            let Some(stream) = streams.lookup(entry.stream_id) else {
                continue;
            };

            for output in renderable_outputs(stream) {
                let url = if entry.private {
                    output.uri.clone()
                } else {
                    secure_output_url(lb_host, &credentials, stream.id, output)
                };
                records.push(PlaylistRecord { stream, url });
            }
        }
    }
    records
}

pub fn generate_playlist<S>(
    subscriber: &SubscriberEntity,
    streams: &S,
    device_id: Uuid,
    lb_host: &str,
) -> String
where
    S: StreamLookup + ?Sized,
{
    let mut playlist = String::from(M3U_HEADER);
    for record in subscriber_records(subscriber, streams, device_id, lb_host) {
        playlist.push_str(&extinf_record(record.stream, &record.url));
    }
    playlist
}

/// Same selection as [`generate_playlist`], as structured entries.
pub fn generate_playlist_entries<S>(
    subscriber: &SubscriberEntity,
    streams: &S,
    device_id: Uuid,
    lb_host: &str,
) -> Vec<PlaylistEntry>
where
    S: StreamLookup + ?Sized,
{
    subscriber_records(subscriber, streams, device_id, lb_host)
        .into_iter()
        .map(|record| PlaylistEntry::new(record.stream, record.url))
        .collect()
}

/// Raw records of a single stream, without header.
pub fn stream_records(stream: &StreamEntity) -> String {
    renderable_outputs(stream)
        .iter()
        .map(|output| extinf_record(stream, &output.uri))
        .collect()
}

pub fn stream_playlist(stream: &StreamEntity) -> String {
    format!("{M3U_HEADER}{}", stream_records(stream))
}

/// Everything a server hosts, with raw output URIs.
pub fn server_playlist(server: &ServiceSettingsEntity) -> String {
    let mut playlist = String::from(M3U_HEADER);
    for stream in &server.streams {
        playlist.push_str(&stream_records(stream));
    }
    playlist
}
