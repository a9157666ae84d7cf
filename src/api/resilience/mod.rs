//! Resilience features for transit service calls
//!
//! Provides the retry policy for transient failures and structured
//! operation logging with correlation tracking.

pub mod config;
pub mod logging;
pub mod retry;

pub use config::{LogLevel, MonitoringConfig, ResilienceConfig, ResilienceConfigBuilder};
pub use logging::{ApiLogger, OperationContext};
pub use retry::{RetryConfig, RetryPolicy};
