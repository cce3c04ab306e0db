use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    application::usercases::entitlements::{
        EntitlementError, UseCaseResult, load_subscriber, save_subscriber,
    },
    domain::{
        entities::{service_settings::ServiceSettingsEntity, subscribers::SubscriberEntity},
        repositories::{
            service_settings::ServiceSettingsRepository, subscribers::SubscriberRepository,
        },
        services::content_synchronizer,
        value_objects::{catalog::Catalog, enums::content_kinds::ContentKind},
    },
};

pub struct ContentSyncUseCase<Sub, Srv>
where
    Sub: SubscriberRepository + Send + Sync + 'static,
    Srv: ServiceSettingsRepository + Send + Sync + 'static,
{
    subscriber_repository: Arc<Sub>,
    server_repository: Arc<Srv>,
}

impl<Sub, Srv> ContentSyncUseCase<Sub, Srv>
where
    Sub: SubscriberRepository + Send + Sync + 'static,
    Srv: ServiceSettingsRepository + Send + Sync + 'static,
{
    pub fn new(subscriber_repository: Arc<Sub>, server_repository: Arc<Srv>) -> Self {
        Self {
            subscriber_repository,
            server_repository,
        }
    }

    pub async fn sync_content(&self, subscriber_id: Uuid) -> UseCaseResult<()> {
        info!(%subscriber_id, "content_sync: full sync requested");

        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "content_sync").await?;
        let catalog = self.catalog_for(&subscriber).await?;

        content_synchronizer::sync_content(&mut subscriber, &catalog);
        debug!(
            %subscriber_id,
            streams = subscriber.collection(ContentKind::Streams).len(),
            vods = subscriber.collection(ContentKind::Vods).len(),
            "content_sync: collections rebuilt"
        );

        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "content_sync").await
    }

    pub async fn select_all(&self, subscriber_id: Uuid, kind: ContentKind, select: bool) -> UseCaseResult<()> {
        info!(%subscriber_id, kind = %kind, select, "content_sync: select all requested");

        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "content_sync").await?;
        let catalog = if select {
            self.catalog_for(&subscriber).await?
        } else {
            Catalog::default()
        };

        content_synchronizer::select_all(&mut subscriber, &catalog, kind, select);
        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "content_sync").await
    }

    pub async fn select_all_series(&self, subscriber_id: Uuid, select: bool) -> UseCaseResult<()> {
        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "content_sync").await?;
        let catalog = if select {
            self.catalog_for(&subscriber).await?
        } else {
            Catalog::default()
        };

        content_synchronizer::select_all_series(&mut subscriber, &catalog, select);
        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "content_sync").await
    }

    pub async fn attach_server(&self, subscriber_id: Uuid, server_id: Uuid) -> UseCaseResult<()> {
        info!(%subscriber_id, %server_id, "content_sync: attach server requested");

        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "content_sync").await?;
        let server = self.find_server(server_id).await?;

        subscriber.add_server(server.id);
        content_synchronizer::select_server(&mut subscriber, &server, true);
        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "content_sync").await
    }

    /// Detaches a server and revokes what it hosts. Owned content is untouched.
    pub async fn detach_server(&self, subscriber_id: Uuid, server_id: Uuid) -> UseCaseResult<()> {
        info!(%subscriber_id, %server_id, "content_sync: detach server requested");

        let mut subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "content_sync").await?;
        let server = self.find_server(server_id).await?;

        subscriber.remove_server(server.id);
        content_synchronizer::select_server(&mut subscriber, &server, false);
        save_subscriber(self.subscriber_repository.as_ref(), subscriber, "content_sync").await
    }

    async fn catalog_for(&self, subscriber: &SubscriberEntity) -> UseCaseResult<Catalog> {
        let subscriber_id = subscriber.id;
        let servers = self
            .server_repository
            .find_many(subscriber.servers.clone())
            .await
            .map_err(|err| {
                error!(%subscriber_id, db_error = ?err, "content_sync: failed to load servers");
                EntitlementError::Internal(err)
            })?;

        if servers.len() != subscriber.servers.len() {
            warn!(
                %subscriber_id,
                expected = subscriber.servers.len(),
                found = servers.len(),
                "content_sync: some servers are missing"
            );
        }

        Ok(Catalog::for_subscriber(subscriber, &servers))
    }

    async fn find_server(&self, server_id: Uuid) -> UseCaseResult<ServiceSettingsEntity> {
        self.server_repository
            .find_by_id(server_id)
            .await
            .map_err(|err| {
                error!(%server_id, db_error = ?err, "content_sync: failed to load server");
                EntitlementError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%server_id, "content_sync: server not found");
                EntitlementError::ServerNotFound
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{series::SerialEntity, streams::StreamEntity, user_streams::UserStreamEntity},
        repositories::{
            service_settings::MockServiceSettingsRepository, subscribers::MockSubscriberRepository,
        },
        value_objects::enums::stream_types::StreamType,
    };
    use mockall::predicate::eq;

    fn sample_subscriber() -> SubscriberEntity {
        SubscriberEntity::new("a@b.com", "Alex", "Palec", "81dc9bdb52d04dc20036dbd8313ed055", "US")
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

    fn sample_server() -> ServiceSettingsEntity {
        let mut server = ServiceSettingsEntity::new("Server");
        server.add_stream(StreamEntity::new("Live", StreamType::Relay));
        server.add_stream(StreamEntity::new("Film", StreamType::VodRelay));
        server.add_stream(StreamEntity::new("Yesterday", StreamType::Catchup));
        server.add_serial(SerialEntity::new("Series"));
        server
    }

    #[tokio::test]
    async fn sync_content_keeps_existing_favorites() {
        let server = sample_server();
        let live = server.streams[0].clone();

        let mut subscriber = sample_subscriber();
        subscriber.add_server(server.id);
        let mut cached = UserStreamEntity::make_from_stream(Some(&live)).unwrap();
        cached.favorite = true;
        subscriber.add_official(ContentKind::Streams, cached);

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut server_repo = MockServiceSettingsRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        let server_id = server.id;
        server_repo
            .expect_find_many()
            .with(eq(vec![server_id]))
            .returning(move |_| {
                let servers = vec![server.clone()];
                Box::pin(async move { Ok(servers) })
            });
        subscriber_repo
            .expect_save()
            .withf(move |saved| {
                saved.official(ContentKind::Streams).count() == 1
                    && saved
                        .find_user_stream(ContentKind::Streams, live.id)
                        .is_some_and(|entry| entry.favorite)
                    && saved.official(ContentKind::Vods).count() == 1
                    && saved.collection(ContentKind::Catchups).is_empty()
            })
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        ContentSyncUseCase::new(Arc::new(subscriber_repo), Arc::new(server_repo))
            .sync_content(subscriber.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn deselect_does_not_touch_servers() {
        let mut subscriber = sample_subscriber();
        let own = StreamEntity::new("Own", StreamType::Catchup);
        subscriber.add_own(
            ContentKind::Catchups,
            UserStreamEntity::make_from_stream(Some(&own)).unwrap(),
        );

        let mut subscriber_repo = MockSubscriberRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        subscriber_repo
            .expect_save()
            .withf(|saved| saved.own(ContentKind::Catchups).count() == 1)
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        ContentSyncUseCase::new(
            Arc::new(subscriber_repo),
            Arc::new(MockServiceSettingsRepository::new()),
        )
        .select_all(subscriber.id, ContentKind::Catchups, false)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn attach_server_grants_hosted_content() {
        let server = sample_server();
        let server_id = server.id;
        let subscriber = sample_subscriber();

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut server_repo = MockServiceSettingsRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        server_repo
            .expect_find_by_id()
            .with(eq(server_id))
            .returning(move |_| {
                let server = server.clone();
                Box::pin(async move { Ok(Some(server)) })
            });
        subscriber_repo
            .expect_save()
            .withf(move |saved| {
                saved.servers == vec![server_id]
                    && saved.official(ContentKind::Streams).count() == 1
                    && saved.official(ContentKind::Vods).count() == 1
                    && saved.official(ContentKind::Catchups).count() == 1
                    && saved.series().len() == 1
            })
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        ContentSyncUseCase::new(Arc::new(subscriber_repo), Arc::new(server_repo))
            .attach_server(subscriber.id, server_id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_server_is_reported() {
        let subscriber = sample_subscriber();
        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut server_repo = MockServiceSettingsRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        server_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async move { Ok(None) }));

        let result = ContentSyncUseCase::new(Arc::new(subscriber_repo), Arc::new(server_repo))
            .detach_server(subscriber.id, Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(EntitlementError::ServerNotFound)));
    }
}
