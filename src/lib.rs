pub mod api;

pub use api::{
    ApiError, DashboardStats, LogLevel, MonitoringConfig, ResilienceConfig, RetryConfig,
    RetryPolicy, ServiceEndpoints, TokenAccessor, TransitClient,
};
