use crate::domain::model::ServiceList;
use crate::domain::ports::{UsageSink, UsageSource};
use crate::utils::error::Result;
use std::time::Instant;

pub struct UsageEngine<S: UsageSource, K: UsageSink> {
    source: S,
    sink: K,
}

impl<S: UsageSource, K: UsageSink> UsageEngine<S, K> {
    pub fn new(source: S, sink: K) -> Self {
        Self { source, sink }
    }

    pub async fn run(&self) -> Result<ServiceList> {
        let started = Instant::now();

        tracing::info!("Retrieving bundle usage...");
        let services = self.source.fetch().await?;
        let bundle_count: usize = services.iter().map(|s| s.bundles().len()).sum();
        tracing::info!(
            "Retrieved {} bundles across {} services in {:?}",
            bundle_count,
            services.len(),
            started.elapsed()
        );

        self.sink.report(&services)?;
        Ok(services)
    }
}
