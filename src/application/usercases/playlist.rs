use std::{collections::HashMap, sync::Arc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    application::usercases::entitlements::{EntitlementError, UseCaseResult, load_subscriber},
    config::config_model::Playlist,
    domain::{
        entities::{streams::StreamEntity, subscribers::SubscriberEntity},
        repositories::{
            service_settings::ServiceSettingsRepository, streams::StreamRepository,
            subscribers::SubscriberRepository,
        },
        services::playlist_builder,
        value_objects::{
            enums::{device_statuses::DeviceStatus, subscriber_statuses::SubscriberStatus},
            playlist::PlaylistEntry,
        },
    },
};

pub struct PlaylistUseCase<Sub, Str, Srv>
where
    Sub: SubscriberRepository + Send + Sync + 'static,
    Str: StreamRepository + Send + Sync + 'static,
    Srv: ServiceSettingsRepository + Send + Sync + 'static,
{
    subscriber_repository: Arc<Sub>,
    stream_repository: Arc<Str>,
    server_repository: Arc<Srv>,
    config: Playlist,
}

impl<Sub, Str, Srv> PlaylistUseCase<Sub, Str, Srv>
where
    Sub: SubscriberRepository + Send + Sync + 'static,
    Str: StreamRepository + Send + Sync + 'static,
    Srv: ServiceSettingsRepository + Send + Sync + 'static,
{
    pub fn new(
        subscriber_repository: Arc<Sub>,
        stream_repository: Arc<Str>,
        server_repository: Arc<Srv>,
        config: Playlist,
    ) -> Self {
        Self {
            subscriber_repository,
            stream_repository,
            server_repository,
            config,
        }
    }

    pub async fn generate_playlist(&self, subscriber_id: Uuid, device_id: Uuid) -> UseCaseResult<String> {
        info!(%subscriber_id, %device_id, "playlist: generating m3u");

        let subscriber = self.authorized_subscriber(subscriber_id, device_id).await?;
        let streams = self.resolve_streams(&subscriber).await?;

        let playlist =
            playlist_builder::generate_playlist(&subscriber, &streams, device_id, &self.config.lb_host);
        debug!(
            %subscriber_id,
            %device_id,
            records = playlist.matches("#EXTINF").count(),
            "playlist: m3u generated"
        );
        Ok(playlist)
    }

    pub async fn generate_playlist_entries(
        &self,
        subscriber_id: Uuid,
        device_id: Uuid,
    ) -> UseCaseResult<Vec<PlaylistEntry>> {
        info!(%subscriber_id, %device_id, "playlist: generating entries");

        let subscriber = self.authorized_subscriber(subscriber_id, device_id).await?;
        let streams = self.resolve_streams(&subscriber).await?;

        Ok(playlist_builder::generate_playlist_entries(
            &subscriber,
            &streams,
            device_id,
            &self.config.lb_host,
        ))
    }

    /// Untokenized playlist of everything a server hosts, for operators.
    pub async fn server_playlist(&self, server_id: Uuid) -> UseCaseResult<String> {
        let server = self
            .server_repository
            .find_by_id(server_id)
            .await
            .map_err(|err| {
                error!(%server_id, db_error = ?err, "playlist: failed to load server");
                EntitlementError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%server_id, "playlist: server not found");
                EntitlementError::ServerNotFound
            })?;

        Ok(playlist_builder::server_playlist(&server))
    }

    async fn authorized_subscriber(&self, subscriber_id: Uuid, device_id: Uuid) -> UseCaseResult<SubscriberEntity> {
        let subscriber =
            load_subscriber(self.subscriber_repository.as_ref(), subscriber_id, "playlist").await?;

        if subscriber.status == SubscriberStatus::Deleted {
            warn!(%subscriber_id, "playlist: subscriber is deleted");
            return Err(EntitlementError::SubscriberNotFound);
        }

        let Some(device) = subscriber.find_device(device_id) else {
            warn!(%subscriber_id, %device_id, "playlist: device not registered");
            return Err(EntitlementError::DeviceNotFound);
        };
        if device.status == DeviceStatus::Banned {
            warn!(%subscriber_id, %device_id, "playlist: device is banned");
            return Err(EntitlementError::InvalidInput(format!("device {} is banned", device_id)));
        }

        Ok(subscriber)
    }

    async fn resolve_streams(&self, subscriber: &SubscriberEntity) -> UseCaseResult<HashMap<Uuid, StreamEntity>> {
        let subscriber_id = subscriber.id;
        let streams = self
            .stream_repository
            .find_many(subscriber.referenced_stream_ids())
            .await
            .map_err(|err| {
                error!(%subscriber_id, db_error = ?err, "playlist: failed to resolve streams");
                EntitlementError::Internal(err)
            })?;

        Ok(streams.into_iter().map(|stream| (stream.id, stream)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{
            devices::DeviceEntity, service_settings::ServiceSettingsEntity,
            streams::OutputUrl, user_streams::UserStreamEntity,
        },
        repositories::{
            service_settings::MockServiceSettingsRepository, streams::MockStreamRepository,
            subscribers::MockSubscriberRepository,
        },
        value_objects::enums::{content_kinds::ContentKind, stream_types::StreamType},
    };
    use mockall::predicate::eq;

    const HASH: &str = "81dc9bdb52d04dc20036dbd8313ed055";
    const LB: &str = "lb.example.com:6000";

    fn config() -> Playlist {
        Playlist {
            lb_host: LB.to_string(),
        }
    }

    fn stream(name: &str, uri: &str) -> StreamEntity {
        let mut stream = StreamEntity::new(name, StreamType::Relay);
        stream.add_output(OutputUrl::new(uri));
        stream
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

    type TestUseCase =
        PlaylistUseCase<MockSubscriberRepository, MockStreamRepository, MockServiceSettingsRepository>;

    fn use_case(subscriber_repo: MockSubscriberRepository, stream_repo: MockStreamRepository) -> TestUseCase {
        PlaylistUseCase::new(
            Arc::new(subscriber_repo),
            Arc::new(stream_repo),
            Arc::new(MockServiceSettingsRepository::new()),
            config(),
        )
    }

    #[tokio::test]
    async fn playlist_tokenizes_official_outputs_for_device() {
        let live = stream("Live", "http://origin/hls/master.m3u8");
        let mut paid = stream("Paid", "http://origin/paid.m3u8");
        paid.price = 9.99;

        let mut subscriber = SubscriberEntity::new("a@b.com", "A", "B", HASH, "US");
        let device = DeviceEntity::new("TV");
        let device_id = device.id;
        subscriber.add_device(device);
        subscriber.add_official(
            ContentKind::Streams,
            UserStreamEntity::make_from_stream(Some(&live)).unwrap(),
        );
        subscriber.add_official(
            ContentKind::Streams,
            UserStreamEntity::make_from_stream(Some(&paid)).unwrap(),
        );

        let mut subscriber_repo = MockSubscriberRepository::new();
        let mut stream_repo = MockStreamRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);
        let resolved = vec![live.clone(), paid];
        stream_repo
            .expect_find_many()
            .returning(move |_| {
                let resolved = resolved.clone();
                Box::pin(async move { Ok(resolved) })
            });

        let playlist = use_case(subscriber_repo, stream_repo)
            .generate_playlist(subscriber.id, device_id)
            .await
            .unwrap();

        assert_eq!(playlist.matches("#EXTINF").count(), 1);
        let expected = format!(
            "http://{LB}/{}/{HASH}/{device_id}/{}/{}/master.m3u8\n",
            subscriber.id, live.id, live.output[0].id
        );
        assert!(playlist.ends_with(&expected), "got: {playlist}");
    }

    #[tokio::test]
    async fn unknown_device_is_rejected() {
        let subscriber = SubscriberEntity::new("a@b.com", "A", "B", HASH, "US");
        let mut subscriber_repo = MockSubscriberRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);

        let result = use_case(subscriber_repo, MockStreamRepository::new())
            .generate_playlist_entries(subscriber.id, Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(EntitlementError::DeviceNotFound)));
    }

    #[tokio::test]
    async fn banned_device_is_rejected() {
        let mut subscriber = SubscriberEntity::new("a@b.com", "A", "B", HASH, "US");
        let mut device = DeviceEntity::new("TV");
        device.status = DeviceStatus::Banned;
        let device_id = device.id;
        subscriber.add_device(device);

        let mut subscriber_repo = MockSubscriberRepository::new();
        expect_subscriber(&mut subscriber_repo, &subscriber);

        let result = use_case(subscriber_repo, MockStreamRepository::new())
            .generate_playlist(subscriber.id, device_id)
            .await;
        assert!(matches!(result, Err(EntitlementError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn server_playlist_is_not_tokenized() {
        let mut server = ServiceSettingsEntity::new("Server");
        server.add_stream(stream("Live", "http://origin/live.m3u8"));
        let server_id = server.id;

        let mut server_repo = MockServiceSettingsRepository::new();
        server_repo
            .expect_find_by_id()
            .with(eq(server_id))
            .returning(move |_| {
                let server = server.clone();
                Box::pin(async move { Ok(Some(server)) })
            });

        let playlist = PlaylistUseCase::new(
            Arc::new(MockSubscriberRepository::new()),
            Arc::new(MockStreamRepository::new()),
            Arc::new(server_repo),
            config(),
        )
        .server_playlist(server_id)
        .await
        .unwrap();
        assert!(playlist.ends_with(",Live\nhttp://origin/live.m3u8\n"));
    }
}
