use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::streams::StreamEntity;

#[async_trait]
#[automock]
pub trait StreamRepository {
    async fn find_by_id(&self, stream_id: Uuid) -> Result<Option<StreamEntity>>;
    /// Unknown ids are silently left out of the result.
    async fn find_many(&self, stream_ids: Vec<Uuid>) -> Result<Vec<StreamEntity>>;
    async fn insert(&self, stream: StreamEntity) -> Result<Uuid>;
    async fn delete(&self, stream_id: Uuid) -> Result<()>;
}
