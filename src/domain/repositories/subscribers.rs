use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscribers::SubscriberEntity;

#[async_trait]
#[automock]
pub trait SubscriberRepository {
    async fn find_by_id(&self, subscriber_id: Uuid) -> Result<Option<SubscriberEntity>>;
    async fn save(&self, subscriber: SubscriberEntity) -> Result<()>;
    /// Subscribers holding any entitlement to `stream_id`.
    async fn list_referencing_stream(&self, stream_id: Uuid) -> Result<Vec<SubscriberEntity>>;
}
