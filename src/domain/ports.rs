use crate::domain::model::ServiceList;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Somewhere bundle usage can be retrieved from.
#[async_trait]
pub trait UsageSource: Send + Sync {
    async fn fetch(&self) -> Result<ServiceList>;
}

/// Consumer of a finished retrieval, e.g. console output or a metrics exporter.
pub trait UsageSink: Send + Sync {
    fn report(&self, services: &ServiceList) -> Result<()>;
}
