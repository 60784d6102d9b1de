pub mod cookies;
pub mod engine;
pub mod json_parser;
pub mod legacy_parser;
pub mod onnet;
pub mod portal;
pub mod session;

pub use crate::domain::model::{Bundle, BundleList, Service, ServiceList};
pub use crate::domain::ports::{UsageSink, UsageSource};
pub use crate::utils::error::Result;
