//! Resilient API client for the transit-management microservices
//!
//! The transit platform is split across six independently deployed REST
//! services (routes, schedules, tickets, auth/users, notifications,
//! analytics). This module provides the single client the rest of the
//! application talks through: per-operation methods over those services,
//! bearer-token attachment, retry with backoff for idempotent reads, and
//! a uniform error taxonomy so callers never see raw transport failures.

pub mod client;
pub mod constants;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod resilience;
pub mod token;

pub use client::TransitClient;
pub use endpoints::ServiceEndpoints;
pub use error::ApiError;
pub use models::DashboardStats;
pub use resilience::{
    ApiLogger, LogLevel, MonitoringConfig, OperationContext, ResilienceConfig, RetryConfig,
    RetryPolicy,
};
pub use token::{env_token, no_token, static_token, TokenAccessor};
