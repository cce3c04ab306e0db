use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    application::usercases::entitlements::{EntitlementError, UseCaseResult},
    config::config_model::Stats,
    domain::{
        entities::{machines::MachineEntity, service_settings::ServiceSettingsEntity},
        repositories::service_settings::ServiceSettingsRepository,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficReport {
    pub server_id: Uuid,
    pub start_timestamp: i64,
    pub net_bytes: u64,
    pub store_bytes: f64,
}

pub struct ServiceStatsUseCase<Srv>
where
    Srv: ServiceSettingsRepository + Send + Sync + 'static,
{
    server_repository: Arc<Srv>,
    config: Stats,
}

impl<Srv> ServiceStatsUseCase<Srv>
where
    Srv: ServiceSettingsRepository + Send + Sync + 'static,
{
    pub fn new(server_repository: Arc<Srv>, config: Stats) -> Self {
        Self {
            server_repository,
            config,
        }
    }

    pub async fn record_sample(&self, server_id: Uuid, document: Value) -> UseCaseResult<()> {
        let sample = MachineEntity::from_document(document).map_err(|err| {
            warn!(%server_id, error = %err, "service_stats: rejected machine sample");
            EntitlementError::InvalidInput(err.to_string())
        })?;
        let timestamp = sample.timestamp;

        let mut server = self.find_server(server_id).await?;
        server.add_stat(sample);
        let samples = server.stats().len();

        self.server_repository.save(server).await.map_err(|err| {
            error!(%server_id, db_error = ?err, "service_stats: failed to save server");
            EntitlementError::Internal(err)
        })?;

        debug!(%server_id, timestamp, samples, "service_stats: sample recorded");
        Ok(())
    }

    /// Usage since `start_timestamp` (Unix seconds), or over the configured
    /// default window when none is given.
    pub async fn traffic_report(&self, server_id: Uuid, start_timestamp: Option<i64>) -> UseCaseResult<TrafficReport> {
        let start_timestamp = start_timestamp
            .unwrap_or_else(|| Utc::now().timestamp() - self.config.default_window_secs);
        info!(%server_id, start_timestamp, "service_stats: traffic report requested");

        let server = self.find_server(server_id).await?;
        Ok(TrafficReport {
            server_id,
            start_timestamp,
            net_bytes: server.net_bytes(start_timestamp),
            store_bytes: server.store_bytes(start_timestamp),
        })
    }

    async fn find_server(&self, server_id: Uuid) -> UseCaseResult<ServiceSettingsEntity> {
        self.server_repository
            .find_by_id(server_id)
            .await
            .map_err(|err| {
                error!(%server_id, db_error = ?err, "service_stats: failed to load server");
                EntitlementError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%server_id, "service_stats: server not found");
                EntitlementError::ServerNotFound
            })
    }
}
