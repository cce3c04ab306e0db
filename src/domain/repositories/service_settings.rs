use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::service_settings::ServiceSettingsEntity;

#[async_trait]
#[automock]
pub trait ServiceSettingsRepository {
    async fn find_by_id(&self, server_id: Uuid) -> Result<Option<ServiceSettingsEntity>>;
    async fn find_many(&self, server_ids: Vec<Uuid>) -> Result<Vec<ServiceSettingsEntity>>;
    async fn save(&self, server: ServiceSettingsEntity) -> Result<()>;
}
