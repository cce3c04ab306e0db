//! Reconciles a subscriber's official entitlements with the content its
//! servers currently offer.

use crate::domain::{
    entities::{
        service_settings::ServiceSettingsEntity, subscribers::SubscriberEntity,
        user_streams::UserStreamEntity,
    },
    value_objects::{catalog::Catalog, enums::content_kinds::ContentKind},
};

/// Rebuilds one collection from scratch.
///
/// Private entries always survive. With `select` every eligible catalog
/// stream gets an official entry, reusing the existing one when present so
/// favorites, resume positions and lock overrides are kept.
pub fn select_all(subscriber: &mut SubscriberEntity, catalog: &Catalog, kind: ContentKind, select: bool) {
    let mut entries: Vec<UserStreamEntity> = subscriber.own(kind).cloned().collect();
    if !select {
        subscriber.replace_collection(kind, entries);
        return;
    }

    for stream in catalog.eligible(kind) {
        let entry = match subscriber.find_official(kind, stream.id) {
            Some(cached) => cached.clone(),
            None => match UserStreamEntity::make_from_stream(Some(stream)) {
                Some(entry) => entry,
                None => continue,
            },
        };
        entries.push(entry);
    }

    subscriber.replace_collection(kind, entries);
}

pub fn select_all_streams(subscriber: &mut SubscriberEntity, catalog: &Catalog, select: bool) {
    select_all(subscriber, catalog, ContentKind::Streams, select);
}

pub fn select_all_vods(subscriber: &mut SubscriberEntity, catalog: &Catalog, select: bool) {
    select_all(subscriber, catalog, ContentKind::Vods, select);
}

pub fn select_all_catchups(subscriber: &mut SubscriberEntity, catalog: &Catalog, select: bool) {
    select_all(subscriber, catalog, ContentKind::Catchups, select);
}

pub fn select_all_series(subscriber: &mut SubscriberEntity, catalog: &Catalog, select: bool) {
    let series = if select {
        catalog.visible_series().map(|serial| serial.id).collect()
    } else {
        Vec::new()
    };
    subscriber.replace_series(series);
}

/// Grants everything live and on demand the catalog offers.
pub fn sync_content(subscriber: &mut SubscriberEntity, catalog: &Catalog) {
    select_all_streams(subscriber, catalog, true);
    select_all_vods(subscriber, catalog, true);
}

/// Grants or revokes the content hosted by a single server.
///
/// Granting routes each stream into the collection its classifier picks and
/// skips streams not offered to subscribers. Revoking drops every official
/// reference to the server's streams and series, whatever their current
/// visibility or type.
pub fn select_server(subscriber: &mut SubscriberEntity, server: &ServiceSettingsEntity, select: bool) {
    if !select {
        for stream in &server.streams {
            subscriber.purge_stream(stream.id);
        }
        for serial in &server.series {
            subscriber.remove_official_serial(serial.id);
        }
        return;
    }

    for stream in &server.streams {
        let Some(kind) = ContentKind::classify(stream) else {
            continue;
        };
        if let Some(entry) = UserStreamEntity::make_from_stream(Some(stream)) {
            subscriber.add_official(kind, entry);
        }
    }

    for serial in server.series.iter().filter(|serial| serial.visible) {
        subscriber.add_official_serial(serial.id);
    }
}
