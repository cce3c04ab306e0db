use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    config::config_model::Subscribers,
    domain::{
        entities::{
            devices::DeviceEntity, streams::StreamEntity, subscribers::SubscriberEntity,
            user_streams::UserStreamEntity,
        },
        repositories::{streams::StreamRepository, subscribers::SubscriberRepository},
        value_objects::enums::content_kinds::ContentKind,
    },
};

#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("subscriber not found")]
    SubscriberNotFound,
    #[error("stream not found")]
    StreamNotFound,
    #[error("server not found")]
    ServerNotFound,
    #[error("device not found")]
    DeviceNotFound,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type UseCaseResult<T> = std::result::Result<T, EntitlementError>;

pub(crate) async fn load_subscriber<Sub>(
    repository: &Sub,
    subscriber_id: Uuid,
    usecase: &'static str,
) -> UseCaseResult<SubscriberEntity>
where
    Sub: SubscriberRepository + Send + Sync,
{
    repository
        .find_by_id(subscriber_id)
        .await
        .map_err(|err| {
            error!(%subscriber_id, db_error = ?err, "{}: failed to load subscriber", usecase);
            EntitlementError::Internal(err)
        })?
        .ok_or_else(|| {
            warn!(%subscriber_id, "{}: subscriber not found", usecase);
            EntitlementError::SubscriberNotFound
        })
}

pub(crate) async fn save_subscriber<Sub>(
    repository: &Sub,
    subscriber: SubscriberEntity,
    usecase: &'static str,
) -> UseCaseResult<()>
where
    Sub: SubscriberRepository + Send + Sync,
{
    let subscriber_id = subscriber.id;
    repository.save(subscriber).await.map_err(|err| {
        error!(%subscriber_id, db_error = ?err, "{}: failed to save subscriber", usecase);
        EntitlementError::Internal(err)
    })
}

pub struct EntitlementUseCase<Sub, Str>
where
    Sub: SubscriberRepository + Send + Sync + 'static,
    Str: StreamRepository + Send + Sync + 'static,
{
    subscriber_repository: Arc<Sub>,
    stream_repository: Arc<Str>,
    config: Subscribers,
}

impl<Sub, Str> EntitlementUseCase<Sub, Str>
where
    Sub: SubscriberRepository + Send + Sync + 'static,
    Str: StreamRepository + Send + Sync + 'static,
{
    pub fn new(subscriber_repository: Arc<Sub>, stream_repository: Arc<Str>, config: Subscribers) -> Self {
        Self {
            subscriber_repository,
            stream_repository,
            config,
        }
    }

    pub async fn register_subscriber(&self, document: Value) -> UseCaseResult<Uuid> {
        let has_device_limit = document
            .get("max_devices_count")
            .is_some_and(|value| !value.is_null());

        let mut subscriber = SubscriberEntity::from_document(document).map_err(|err| {
            warn!(error = %err, "entitlements: rejected subscriber document");
            EntitlementError::InvalidInput(err.to_string())
        })?;
        if !has_device_limit {
            subscriber.max_devices_count = self.config.default_max_devices;
        }

        let subscriber_id = subscriber.id;
        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "entitlements").await?;

        info!(%subscriber_id, "entitlements: subscriber registered");
        Ok(subscriber_id)
    }

    pub async fn grant_stream(&self, subscriber_id: Uuid, stream_id: Uuid) -> UseCaseResult<ContentKind> {
        info!(%subscriber_id, %stream_id, "entitlements: grant requested");

        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "entitlements").await?;
        let stream = self.find_stream(stream_id).await?;

        let Some(kind) = ContentKind::classify(&stream) else {
            warn!(
                %subscriber_id,
                %stream_id,
                stream_type = %stream.stream_type,
                visible = stream.visible,
                "entitlements: stream is not offered to subscribers"
            );
            return Err(EntitlementError::InvalidInput(format!(
                "stream {} is not offered to subscribers",
                stream_id
            )));
        };

        let entry = UserStreamEntity::make_from_stream(Some(&stream))
            .ok_or_else(|| EntitlementError::InvalidInput("stream has no id".to_string()))?;
        subscriber.add_official(kind, entry);
        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "entitlements").await?;

        debug!(%subscriber_id, %stream_id, kind = %kind, "entitlements: stream granted");
        Ok(kind)
    }

    pub async fn revoke_stream(&self, subscriber_id: Uuid, stream_id: Uuid) -> UseCaseResult<bool> {
        info!(%subscriber_id, %stream_id, "entitlements: revoke requested");

        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "entitlements").await?;
        if !subscriber.purge_stream(stream_id) {
            debug!(%subscriber_id, %stream_id, "entitlements: nothing to revoke");
            return Ok(false);
        }

        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "entitlements").await?;
        Ok(true)
    }

    pub async fn unlock_stream(
        &self,
        subscriber_id: Uuid,
        kind: ContentKind,
        stream_id: Uuid,
    ) -> UseCaseResult<()> {
        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "entitlements").await?;

        let entry = subscriber
            .find_user_stream_mut(kind, stream_id)
            .ok_or_else(|| {
                warn!(%subscriber_id, %stream_id, kind = %kind, "entitlements: entitlement not found");
                EntitlementError::StreamNotFound
            })?;
        entry.locked = false;

        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "entitlements").await
    }

    pub async fn add_own_stream(&self, subscriber_id: Uuid, stream: StreamEntity) -> UseCaseResult<Uuid> {
        let stream_id = stream.id;
        info!(%subscriber_id, %stream_id, "entitlements: add own stream requested");

        let Some(kind) = ContentKind::classify(&stream) else {
            warn!(
                %subscriber_id,
                %stream_id,
                stream_type = %stream.stream_type,
                "entitlements: own stream has unsupported type"
            );
            return Err(EntitlementError::InvalidInput(format!(
                "stream type {} cannot be owned",
                stream.stream_type
            )));
        };
        let entry = UserStreamEntity::make_from_stream(Some(&stream))
            .ok_or_else(|| EntitlementError::InvalidInput("stream has no id".to_string()))?;

        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "entitlements").await?;
        if subscriber.own(kind).any(|owned| owned.stream_id == stream_id) {
            debug!(%subscriber_id, %stream_id, "entitlements: stream already owned");
            return Ok(stream_id);
        }

        self.stream_repository.insert(stream).await.map_err(|err| {
            error!(%subscriber_id, %stream_id, db_error = ?err, "entitlements: failed to insert own stream");
            EntitlementError::Internal(err)
        })?;

        subscriber.add_own(kind, entry);
        if let Err(err) = save_subscriber(self.subscriber_repository.as_ref(), subscriber, "entitlements").await {
            match self.stream_repository.delete(stream_id).await {
                Ok(()) => warn!(%subscriber_id, %stream_id, "entitlements: own stream insert rolled back"),
                Err(cleanup_err) => error!(
                    %subscriber_id,
                    %stream_id,
                    db_error = ?cleanup_err,
                    "entitlements: failed to roll back own stream insert"
                ),
            }
            return Err(err);
        }

        debug!(%subscriber_id, %stream_id, kind = %kind, "entitlements: own stream added");
        Ok(stream_id)
    }

    pub async fn remove_own_stream(
        &self,
        subscriber_id: Uuid,
        kind: ContentKind,
        stream_id: Uuid,
    ) -> UseCaseResult<()> {
        info!(%subscriber_id, %stream_id, kind = %kind, "entitlements: remove own stream requested");

        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "entitlements").await?;
        let Some(orphan) = subscriber.remove_own_by_id(kind, stream_id) else {
            warn!(%subscriber_id, %stream_id, "entitlements: stream is not owned by subscriber");
            return Err(EntitlementError::StreamNotFound);
        };

        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "entitlements").await?;
        self.delete_stream_record(orphan).await
    }

    pub async fn remove_all_own_streams(&self, subscriber_id: Uuid, kind: ContentKind) -> UseCaseResult<usize> {
        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "entitlements").await?;
        let orphans = subscriber.remove_all_own(kind);
        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "entitlements").await?;

        for orphan in &orphans {
            self.delete_stream_record(*orphan).await?;
        }

        info!(%subscriber_id, kind = %kind, removed = orphans.len(), "entitlements: own streams removed");
        Ok(orphans.len())
    }

    /// Deletes a stream and strips it from every subscriber referencing it.
    /// Returns the number of subscribers updated.
    pub async fn delete_stream(&self, stream_id: Uuid) -> UseCaseResult<usize> {
        info!(%stream_id, "entitlements: stream deletion requested");

        let subscribers = self
            .subscriber_repository
            .list_referencing_stream(stream_id)
            .await
            .map_err(|err| {
                error!(%stream_id, db_error = ?err, "entitlements: failed to list referencing subscribers");
                EntitlementError::Internal(err)
            })?;

        let mut updated = 0;
        for mut subscriber in subscribers {
            let mut changed = subscriber.purge_stream(stream_id);
            for kind in ContentKind::ALL {
                changed |= subscriber.remove_own_by_id(kind, stream_id).is_some();
            }
            if changed {
                save_subscriber(self.subscriber_repository.as_ref(), subscriber, "entitlements").await?;
                updated += 1;
            }
        }

        self.delete_stream_record(stream_id).await?;

        info!(%stream_id, updated, "entitlements: stream deleted");
        Ok(updated)
    }

    pub async fn delete_subscriber(&self, subscriber_id: Uuid) -> UseCaseResult<()> {
        info!(%subscriber_id, "entitlements: subscriber deletion requested");

        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "entitlements").await?;
        let orphans = subscriber.mark_deleted();
        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "entitlements").await?;

        for orphan in orphans {
            self.delete_stream_record(orphan).await?;
        }
        Ok(())
    }

    pub async fn add_device(&self, subscriber_id: Uuid, name: String) -> UseCaseResult<Uuid> {
        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "entitlements").await?;

        let device = DeviceEntity::from_document(serde_json::json!({ "name": name, "status": 0 }))
            .map_err(|err| EntitlementError::InvalidInput(err.to_string()))?;
        let device_id = device.id;

        if !subscriber.add_device(device) {
            warn!(
                %subscriber_id,
                max_devices_count = subscriber.max_devices_count,
                "entitlements: device limit reached"
            );
            return Err(EntitlementError::InvalidInput(format!(
                "device limit of {} reached",
                subscriber.max_devices_count
            )));
        }

        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "entitlements").await?;
        info!(%subscriber_id, %device_id, "entitlements: device added");
        Ok(device_id)
    }

    pub async fn remove_device(&self, subscriber_id: Uuid, device_id: Uuid) -> UseCaseResult<()> {
        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "entitlements").await?;
        if subscriber.find_device(device_id).is_none() {
            warn!(%subscriber_id, %device_id, "entitlements: device not found");
            return Err(EntitlementError::DeviceNotFound);
        }

        subscriber.remove_device(device_id);
        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "entitlements").await
    }

    async fn find_stream(&self, stream_id: Uuid) -> UseCaseResult<StreamEntity> {
        self.stream_repository
            .find_by_id(stream_id)
            .await
            .map_err(|err| {
                error!(%stream_id, db_error = ?err, "entitlements: failed to load stream");
                EntitlementError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%stream_id, "entitlements: stream not found");
                EntitlementError::StreamNotFound
            })
    }

    async fn delete_stream_record(&self, stream_id: Uuid) -> UseCaseResult<()> {
        self.stream_repository.delete(stream_id).await.map_err(|err| {
            error!(%stream_id, db_error = ?err, "entitlements: failed to delete stream");
            EntitlementError::Internal(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        repositories::{streams::MockStreamRepository, subscribers::MockSubscriberRepository},
        value_objects::enums::{stream_types::StreamType, subscriber_statuses::SubscriberStatus},
    };
    use mockall::predicate::eq;
    use serde_json::json;

    const HASH: &str = "81dc9bdb52d04dc20036dbd8313ed055";

    fn sample_subscriber() -> SubscriberEntity {
        SubscriberEntity::new("a@b.com", "Alex", "Palec", HASH, "US")
    }

    fn config() -> Subscribers {
        Subscribers {
            default_max_devices: 3,
        }
    }

    fn expect_subscriber(repo: &mut MockSubscriberRepository, subscriber: &SubscriberEntity) {
        let subscriber = subscriber.clone();
        repo.expect_find_by_id()
            .with(eq(subscriber.id))
            .returning(move |_| {
                let subscriber = subscriber.clone();
                Box::pin(async move { Ok(Some(subscriber)) })
            });
    }

    fn use_case(
        subscriber_repo: MockSubscriberRepository,
        stream_repo: MockStreamRepository,
    ) -> EntitlementUseCase<MockSubscriberRepository, MockStreamRepository> {
        EntitlementUseCase::new(Arc::new(subscriber_repo), Arc::new(stream_repo), config())
    }

    #[tokio::test]
    async fn grant_routes_vod_into_vod_collection() {
        let subscriber = sample_subscriber();
        let vod = StreamEntity::new("Film", StreamType::VodRelay);
        let vod_id = vod.id;

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut stream_repo = MockStreamRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        stream_repo
            .expect_find_by_id()
            .with(eq(vod_id))
            .returning(move |_| {
                let vod = vod.clone();
                Box::pin(async move { Ok(Some(vod)) })
            });
        subscriber_repo
            .expect_save()
            .withf(move |saved| {
                saved.official(ContentKind::Vods).count() == 1
                    && saved.find_user_stream(ContentKind::Vods, vod_id).is_some()
                    && saved.collection(ContentKind::Streams).is_empty()
            })
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        let kind = use_case(subscriber_repo, stream_repo)
            .grant_stream(subscriber.id, vod_id)
            .await
            .unwrap();
        assert_eq!(kind, ContentKind::Vods);
    }

    #[tokio::test]
    async fn grant_rejects_hidden_stream() {
        let subscriber = sample_subscriber();
        let mut hidden = StreamEntity::new("Hidden", StreamType::Proxy);
        hidden.visible = false;
        let hidden_id = hidden.id;

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut stream_repo = MockStreamRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        stream_repo.expect_find_by_id().returning(move |_| {
            let hidden = hidden.clone();
            Box::pin(async move { Ok(Some(hidden)) })
        });

        let result = use_case(subscriber_repo, stream_repo)
            .grant_stream(subscriber.id, hidden_id)
            .await;
        assert!(matches!(result, Err(EntitlementError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn unknown_subscriber_is_reported() {
        let mut subscriber_repo = MockSubscriberRepository::new();
        subscriber_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async move { Ok(None) }));

        let result = use_case(subscriber_repo, MockStreamRepository::new())
            .revoke_stream(Uuid::new_v4(), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(EntitlementError::SubscriberNotFound)));
    }

    #[tokio::test]
    async fn repository_failure_is_internal() {
        let mut subscriber_repo = MockSubscriberRepository::new();
        subscriber_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async move { Err(anyhow::anyhow!("connection reset")) }));

        let result = use_case(subscriber_repo, MockStreamRepository::new())
            .delete_subscriber(Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(EntitlementError::Internal(_))));
    }

    #[tokio::test]
    async fn removing_own_stream_deletes_its_record() {
        let mut subscriber = sample_subscriber();
        let own = StreamEntity::new("Mine", StreamType::Proxy);
        let own_id = own.id;
        subscriber.add_own(
            ContentKind::Streams,
            UserStreamEntity::make_from_stream(Some(&own)).unwrap(),
        );

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut stream_repo = MockStreamRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        subscriber_repo
            .expect_save()
            .withf(|saved| saved.collection(ContentKind::Streams).is_empty())
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));
        stream_repo
            .expect_delete()
            .with(eq(own_id))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        use_case(subscriber_repo, stream_repo)
            .remove_own_stream(subscriber.id, ContentKind::Streams, own_id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn removing_unowned_stream_is_not_found() {
        let subscriber = sample_subscriber();
        let mut subscriber_repo = MockSubscriberRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);

        let result = use_case(subscriber_repo, MockStreamRepository::new())
            .remove_own_stream(subscriber.id, ContentKind::Vods, Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(EntitlementError::StreamNotFound)));
    }

    #[tokio::test]
    async fn add_own_stream_inserts_and_marks_private() {
        let subscriber = sample_subscriber();
        let own = StreamEntity::new("Mine", StreamType::VodProxy);
        let own_id = own.id;

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut stream_repo = MockStreamRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        stream_repo
            .expect_insert()
            .withf(move |stream| stream.id == own_id)
            .times(1)
            .returning(|stream| Box::pin(async move { Ok(stream.id) }));
        subscriber_repo
            .expect_save()
            .withf(move |saved| {
                saved
                    .find_user_stream(ContentKind::Vods, own_id)
                    .is_some_and(|entry| entry.private)
            })
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        let stream_id = use_case(subscriber_repo, stream_repo)
            .add_own_stream(subscriber.id, own)
            .await
            .unwrap();
        assert_eq!(stream_id, own_id);
    }

    #[tokio::test]
    async fn deleting_stream_purges_every_subscriber() {
        let stream = StreamEntity::new("Shared", StreamType::Relay);
        let stream_id = stream.id;
        let entry = UserStreamEntity::make_from_stream(Some(&stream)).unwrap();

        let mut first = sample_subscriber();
        first.add_official(ContentKind::Streams, entry.clone());
        let mut second = sample_subscriber();
        second.add_official(ContentKind::Catchups, entry);

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut stream_repo = MockStreamRepository::new();
        subscriber_repo
            .expect_list_referencing_stream()
            .with(eq(stream_id))
            .returning(move |_| {
                let subscribers = vec![first.clone(), second.clone()];
                Box::pin(async move { Ok(subscribers) })
            });
        subscriber_repo
            .expect_save()
            .withf(move |saved| !saved.references_stream(stream_id))
            .times(2)
            .returning(|_| Box::pin(async move { Ok(()) }));
        stream_repo
            .expect_delete()
            .with(eq(stream_id))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        let updated = use_case(subscriber_repo, stream_repo)
            .delete_stream(stream_id)
            .await
            .unwrap();
        assert_eq!(updated, 2);
    }

    #[tokio::test]
    async fn soft_delete_removes_owned_streams() {
        let mut subscriber = sample_subscriber();
        let own = StreamEntity::new("Mine", StreamType::Proxy);
        let own_id = own.id;
        subscriber.add_own(
            ContentKind::Streams,
            UserStreamEntity::make_from_stream(Some(&own)).unwrap(),
        );

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut stream_repo = MockStreamRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        subscriber_repo
            .expect_save()
            .withf(|saved| saved.status == SubscriberStatus::Deleted)
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));
        stream_repo
            .expect_delete()
            .with(eq(own_id))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        use_case(subscriber_repo, stream_repo)
            .delete_subscriber(subscriber.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn register_applies_configured_device_limit() {
        let mut subscriber_repo = MockSubscriberRepository::new();
        subscriber_repo
            .expect_save()
            .withf(|saved| saved.max_devices_count == 3 && saved.email == "new@user.com")
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        use_case(subscriber_repo, MockStreamRepository::new())
            .register_subscriber(json!({
                "email": "New@User.com",
                "first_name": "New",
                "last_name": "User",
                "password": HASH,
                "exp_date": 1_900_000_000_000i64,
                "status": 1,
                "country": "US",
                "language": "en"
            }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn device_limit_is_enforced() {
        let mut subscriber = sample_subscriber();
        subscriber.max_devices_count = 1;
        subscriber.add_device(DeviceEntity::new("Phone"));

        let mut subscriber_repo = MockSubscriberRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);

        let result = use_case(subscriber_repo, MockStreamRepository::new())
            .add_device(subscriber.id, "Tablet".to_string())
            .await;
        assert!(matches!(result, Err(EntitlementError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn unlock_clears_lock_flag() {
        let mut subscriber = sample_subscriber();
        let mut paid = StreamEntity::new("Paid", StreamType::Proxy);
        paid.price = 5.0;
        let paid_id = paid.id;
        subscriber.add_official(
            ContentKind::Streams,
            UserStreamEntity::make_from_stream(Some(&paid)).unwrap(),
        );

        let mut subscriber_repo = MockSubscriberRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        subscriber_repo
            .expect_save()
            .withf(|saved| saved.locked(ContentKind::Streams).count() == 0)
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        use_case(subscriber_repo, MockStreamRepository::new())
            .unlock_stream(subscriber.id, ContentKind::Streams, paid_id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_save_rolls_back_own_stream_insert() {
        let subscriber = sample_subscriber();
        let own = StreamEntity::new("Mine", StreamType::Proxy);
        let own_id = own.id;

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut stream_repo = MockStreamRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        stream_repo
            .expect_insert()
            .times(1)
            .returning(|stream| Box::pin(async move { Ok(stream.id) }));
        subscriber_repo
            .expect_save()
            .times(1)
            .returning(|_| Box::pin(async move { Err(anyhow::anyhow!("write conflict")) }));
        stream_repo
            .expect_delete()
            .with(eq(own_id))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        let result = use_case(subscriber_repo, stream_repo)
            .add_own_stream(subscriber.id, own)
            .await;
        assert!(matches!(result, Err(EntitlementError::Internal(_))));
    }

    #[tokio::test]
    async fn already_owned_stream_is_not_inserted_again() {
        let mut subscriber = sample_subscriber();
        let own = StreamEntity::new("Mine", StreamType::Proxy);
        let own_id = own.id;
        subscriber.add_own(
            ContentKind::Streams,
            UserStreamEntity::make_from_stream(Some(&own)).unwrap(),
        );

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut stream_repo = MockStreamRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        subscriber_repo.expect_save().times(0);
        stream_repo.expect_insert().times(0);

        let stream_id = use_case(subscriber_repo, stream_repo)
            .add_own_stream(subscriber.id, own)
            .await
            .unwrap();
        assert_eq!(stream_id, own_id);
    }

    #[tokio::test]
    async fn soft_delete_removes_owned_catchups() {
        let mut subscriber = sample_subscriber();
        let own = StreamEntity::new("Mine", StreamType::Catchup);
        let own_id = own.id;
        subscriber.add_own(
            ContentKind::Catchups,
            UserStreamEntity::make_from_stream(Some(&own)).unwrap(),
        );

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut stream_repo = MockStreamRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        subscriber_repo
            .expect_save()
            .withf(|saved| saved.collection(ContentKind::Catchups).is_empty())
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));
        stream_repo
            .expect_delete()
            .with(eq(own_id))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        use_case(subscriber_repo, stream_repo)
            .delete_subscriber(subscriber.id)
            .await
            .unwrap();
    }
}
