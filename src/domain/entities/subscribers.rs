use anyhow::{Result, bail};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    entities::{devices::DeviceEntity, user_streams::UserStreamEntity},
    value_objects::{
        enums::{content_kinds::ContentKind, subscriber_statuses::SubscriberStatus},
        field_rules::{FieldDescriptor, FieldRule, decode_document},
        limits::{
            DEFAULT_DEVICES_COUNT, DEFAULT_LOCALE, MAX_COUNTRY_LEN, MAX_EMAIL_LEN,
            MAX_PERSON_NAME_LEN, MIN_COUNTRY_LEN, MIN_EMAIL_LEN, SUBSCRIBER_HASH_LEN,
        },
    },
};

pub const SUBSCRIBER_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::required(
        "email",
        FieldRule::Text {
            min_len: MIN_EMAIL_LEN,
            max_len: MAX_EMAIL_LEN,
        },
    ),
    FieldDescriptor::required(
        "first_name",
        FieldRule::Text {
            min_len: 1,
            max_len: MAX_PERSON_NAME_LEN,
        },
    ),
    FieldDescriptor::required(
        "last_name",
        FieldRule::Text {
            min_len: 1,
            max_len: MAX_PERSON_NAME_LEN,
        },
    ),
    FieldDescriptor::required(
        "password",
        FieldRule::Text {
            min_len: SUBSCRIBER_HASH_LEN,
            max_len: SUBSCRIBER_HASH_LEN,
        },
    ),
    FieldDescriptor::required(
        "exp_date",
        FieldRule::Integer {
            min: 0,
            max: i64::MAX,
        },
    ),
    FieldDescriptor::required("status", FieldRule::Integer { min: 0, max: 2 }),
    FieldDescriptor::required(
        "country",
        FieldRule::Text {
            min_len: MIN_COUNTRY_LEN,
            max_len: MAX_COUNTRY_LEN,
        },
    ),
    FieldDescriptor::required(
        "language",
        FieldRule::Text {
            min_len: 2,
            max_len: 8,
        },
    ),
    FieldDescriptor::optional(
        "max_devices_count",
        FieldRule::Integer {
            min: 0,
            max: i32::MAX as i64,
        },
    ),
    FieldDescriptor::optional(
        "created_date",
        FieldRule::Integer {
            min: 0,
            max: i64::MAX,
        },
    ),
    FieldDescriptor::optional("servers", FieldRule::List),
];

/// Subscriber aggregate. Owns three independent entitlement collections
/// (live streams, VODs, catchups) and the entitlement store operations over
/// them.
///
/// Invariant: each collection holds at most one non-private entry per
/// stream id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriberEntity {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Password hash, produced by the authentication collaborator.
    pub password: String,
    #[serde(
        rename = "created_date",
        with = "chrono::serde::ts_milliseconds",
        default = "Utc::now"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds", default = "max_exp_date")]
    pub exp_date: DateTime<Utc>,
    #[serde(default)]
    pub status: SubscriberStatus,
    pub country: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub servers: Vec<Uuid>,
    #[serde(default)]
    pub devices: Vec<DeviceEntity>,
    #[serde(default = "default_max_devices")]
    pub max_devices_count: usize,
    #[serde(default)]
    streams: Vec<UserStreamEntity>,
    #[serde(default)]
    vods: Vec<UserStreamEntity>,
    #[serde(default)]
    catchups: Vec<UserStreamEntity>,
    #[serde(default)]
    series: Vec<Uuid>,
}

impl SubscriberEntity {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password_hash: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into().to_lowercase(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: password_hash.into(),
            created_at: Utc::now(),
            exp_date: max_exp_date(),
            status: SubscriberStatus::default(),
            country: country.into(),
            language: default_language(),
            servers: Vec::new(),
            devices: Vec::new(),
            max_devices_count: DEFAULT_DEVICES_COUNT,
            streams: Vec::new(),
            vods: Vec::new(),
            catchups: Vec::new(),
            series: Vec::new(),
        }
    }

    pub fn from_document(document: Value) -> Result<Self> {
        let mut subscriber: SubscriberEntity = decode_document(document, SUBSCRIBER_FIELDS)?;
        subscriber.email = subscriber.email.to_lowercase();
        if !is_valid_email(&subscriber.email) {
            bail!("Invalid email");
        }
        Ok(subscriber)
    }

    pub fn to_document(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn collection(&self, kind: ContentKind) -> &[UserStreamEntity] {
        match kind {
            ContentKind::Streams => &self.streams,
            ContentKind::Vods => &self.vods,
            ContentKind::Catchups => &self.catchups,
        }
    }

    fn collection_mut(&mut self, kind: ContentKind) -> &mut Vec<UserStreamEntity> {
        match kind {
            ContentKind::Streams => &mut self.streams,
            ContentKind::Vods => &mut self.vods,
            ContentKind::Catchups => &mut self.catchups,
        }
    }

    /// Swaps in a recomputed collection. Used by reconciliation only.
    pub(crate) fn replace_collection(&mut self, kind: ContentKind, entries: Vec<UserStreamEntity>) {
        *self.collection_mut(kind) = entries;
    }

    // official

    /// Grants an official entry. No-op when one already exists for that stream.
    pub fn add_official(&mut self, kind: ContentKind, user_stream: UserStreamEntity) {
        if self.find_official(kind, user_stream.stream_id).is_some() {
            return;
        }
        self.collection_mut(kind).push(user_stream);
    }

    /// Revokes every official entry referencing `stream_id`.
    pub fn remove_official(&mut self, kind: ContentKind, stream_id: Uuid) -> bool {
        let entries = self.collection_mut(kind);
        let before = entries.len();
        entries.retain(|entry| entry.private || entry.stream_id != stream_id);
        entries.len() != before
    }

    pub fn find_official(&self, kind: ContentKind, stream_id: Uuid) -> Option<&UserStreamEntity> {
        self.collection(kind)
            .iter()
            .find(|entry| !entry.private && entry.stream_id == stream_id)
    }

    pub fn official(&self, kind: ContentKind) -> impl Iterator<Item = &UserStreamEntity> + '_ {
        self.collection(kind).iter().filter(|entry| !entry.private)
    }

    // own

    /// Provisions a private entry. No-op when the stream is already owned.
    pub fn add_own(&mut self, kind: ContentKind, mut user_stream: UserStreamEntity) {
        let owned = self
            .collection(kind)
            .iter()
            .any(|entry| entry.private && entry.stream_id == user_stream.stream_id);
        if owned {
            return;
        }

        user_stream.private = true;
        self.collection_mut(kind).push(user_stream);
    }

    /// Drops the private entries for `stream_id`.
    ///
    /// Private content lives exactly as long as its entitlement, so the
    /// returned id names the stream record the caller must delete. `None`
    /// when the subscriber did not own that stream.
    pub fn remove_own_by_id(&mut self, kind: ContentKind, stream_id: Uuid) -> Option<Uuid> {
        let entries = self.collection_mut(kind);
        let before = entries.len();
        entries.retain(|entry| !(entry.private && entry.stream_id == stream_id));
        (entries.len() != before).then_some(stream_id)
    }

    /// Drops every private entry of a collection, returning the stream ids to delete.
    pub fn remove_all_own(&mut self, kind: ContentKind) -> Vec<Uuid> {
        let entries = self.collection_mut(kind);
        let owned = entries
            .iter()
            .filter(|entry| entry.private)
            .map(|entry| entry.stream_id)
            .collect();
        entries.retain(|entry| !entry.private);
        owned
    }

    pub fn own(&self, kind: ContentKind) -> impl Iterator<Item = &UserStreamEntity> + '_ {
        self.collection(kind).iter().filter(|entry| entry.private)
    }

    // lookups

    pub fn locked(&self, kind: ContentKind) -> impl Iterator<Item = &UserStreamEntity> + '_ {
        self.collection(kind).iter().filter(|entry| entry.locked)
    }

    pub fn unlocked(&self, kind: ContentKind) -> impl Iterator<Item = &UserStreamEntity> + '_ {
        self.collection(kind).iter().filter(|entry| !entry.locked)
    }

    pub fn find_user_stream(&self, kind: ContentKind, stream_id: Uuid) -> Option<&UserStreamEntity> {
        self.collection(kind)
            .iter()
            .find(|entry| entry.stream_id == stream_id)
    }

    pub fn find_user_stream_mut(
        &mut self,
        kind: ContentKind,
        stream_id: Uuid,
    ) -> Option<&mut UserStreamEntity> {
        self.collection_mut(kind)
            .iter_mut()
            .find(|entry| entry.stream_id == stream_id)
    }

    /// Whether any collection holds an entry for `stream_id`.
    pub fn references_stream(&self, stream_id: Uuid) -> bool {
        ContentKind::ALL
            .into_iter()
            .any(|kind| self.find_user_stream(kind, stream_id).is_some())
    }

    /// Removes official references to a deleted stream from every collection.
    pub fn purge_stream(&mut self, stream_id: Uuid) -> bool {
        let mut removed = false;
        for kind in ContentKind::ALL {
            removed |= self.remove_official(kind, stream_id);
        }
        removed
    }

    /// Every stream id referenced by any collection, first occurrence order.
    pub fn referenced_stream_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = Vec::new();
        for kind in ContentKind::ALL {
            for entry in self.collection(kind) {
                if !ids.contains(&entry.stream_id) {
                    ids.push(entry.stream_id);
                }
            }
        }
        ids
    }

    // series

    pub fn series(&self) -> &[Uuid] {
        &self.series
    }

    pub fn add_official_serial(&mut self, serial_id: Uuid) {
        if !self.series.contains(&serial_id) {
            self.series.push(serial_id);
        }
    }

    pub fn remove_official_serial(&mut self, serial_id: Uuid) {
        self.series.retain(|id| *id != serial_id);
    }

    pub(crate) fn replace_series(&mut self, series: Vec<Uuid>) {
        self.series = series;
    }

    // servers

    pub fn add_server(&mut self, server_id: Uuid) {
        if !self.servers.contains(&server_id) {
            self.servers.push(server_id);
        }
    }

    pub fn remove_server(&mut self, server_id: Uuid) {
        self.servers.retain(|id| *id != server_id);
    }

    // devices

    /// Registers a device while the subscriber is below its device quota.
    pub fn add_device(&mut self, device: DeviceEntity) -> bool {
        if self.devices.len() >= self.max_devices_count {
            return false;
        }
        self.devices.push(device);
        true
    }

    pub fn remove_device(&mut self, device_id: Uuid) {
        self.devices.retain(|device| device.id != device_id);
    }

    pub fn find_device(&self, device_id: Uuid) -> Option<&DeviceEntity> {
        self.devices.iter().find(|device| device.id == device_id)
    }

    /// Soft delete: drops owned content of every kind and flags the account.
    /// Returns the stream ids whose records must be deleted.
    pub fn mark_deleted(&mut self) -> Vec<Uuid> {
        let owned: Vec<Uuid> = ContentKind::ALL
            .into_iter()
            .flat_map(|kind| self.remove_all_own(kind))
            .collect();
        self.status = SubscriberStatus::Deleted;
        owned
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(|c| c.is_whitespace())
}

fn max_exp_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn default_language() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_max_devices() -> usize {
    DEFAULT_DEVICES_COUNT
}
