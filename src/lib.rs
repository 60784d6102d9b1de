pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::ConsoleSink, provider::ProviderConfig, ResolvedConfig, Retrieval};
pub use self::core::{engine::UsageEngine, onnet::OnNetClient, portal::PortalClient, session::Credentials};
pub use domain::model::{Bundle, BundleList, Service, ServiceList};
pub use utils::error::{Result, UsageError};
