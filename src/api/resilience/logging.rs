//! Structured logging with correlation tracking for transit API operations
//!
//! Emits structured JSON events through the `log` facade so every request,
//! response, and retry can be traced back to one operation via its
//! correlation ID. Logging is diagnostics only and never load-bearing.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use serde_json::json;

use super::config::{LogLevel, MonitoringConfig};

/// Structured logger for API operations with correlation tracking
#[derive(Debug, Clone)]
pub struct ApiLogger {
    config: MonitoringConfig,
}

/// Context for a single API operation with correlation tracking
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Unique correlation ID for this operation
    pub correlation_id: String,
    /// Operation name (list_routes, book_ticket, ...)
    pub operation: String,
    /// Resource group being addressed
    pub resource: String,
    /// Start time for duration tracking
    pub start_time: Instant,
}

impl ApiLogger {
    pub fn new(config: MonitoringConfig) -> Self {
        Self { config }
    }

    /// Start tracking a new operation.
    pub fn start_operation(&self, operation: &str, resource: &str) -> OperationContext {
        let correlation_id = if self.config.correlation_ids {
            uuid::Uuid::new_v4().to_string()
        } else {
            String::new()
        };

        let context = OperationContext {
            correlation_id,
            operation: operation.to_string(),
            resource: resource.to_string(),
            start_time: Instant::now(),
        };

        if self.config.request_logging && self.should_log(&LogLevel::Debug) {
            debug!(
                "API operation started: {}",
                json!({
                    "event": "operation_started",
                    "correlation_id": context.correlation_id,
                    "operation": context.operation,
                    "resource": context.resource,
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                })
            );
        }

        context
    }

    /// Log HTTP request details.
    pub fn log_request(
        &self,
        context: &OperationContext,
        method: &str,
        url: &str,
        headers: &HashMap<String, String>,
    ) {
        if !self.config.request_logging || !self.should_log(&LogLevel::Debug) {
            return;
        }

        debug!(
            "HTTP request: {}",
            json!({
                "event": "http_request",
                "correlation_id": context.correlation_id,
                "operation": context.operation,
                "resource": context.resource,
                "method": method,
                "url": url,
                "headers": self.sanitize_headers(headers),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })
        );
    }

    /// Log HTTP response details.
    pub fn log_response(&self, context: &OperationContext, status_code: u16, duration: Duration) {
        if !self.config.request_logging || !self.should_log(&LogLevel::Debug) {
            return;
        }

        let log_data = json!({
            "event": "http_response",
            "correlation_id": context.correlation_id,
            "operation": context.operation,
            "resource": context.resource,
            "status_code": status_code,
            "duration_ms": duration.as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if status_code >= 400 {
            warn!("HTTP response (error): {}", log_data);
        } else {
            debug!("HTTP response: {}", log_data);
        }
    }

    /// Complete an operation, logging outcome and total duration.
    pub fn complete_operation(
        &self,
        context: &OperationContext,
        success: bool,
        status_code: Option<u16>,
        error_message: Option<&str>,
    ) {
        if !self.config.request_logging || !self.should_log(&LogLevel::Info) {
            return;
        }

        let log_data = json!({
            "event": "operation_completed",
            "correlation_id": context.correlation_id,
            "operation": context.operation,
            "resource": context.resource,
            "success": success,
            "status_code": status_code,
            "error_message": error_message,
            "duration_ms": context.elapsed().as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if success {
            info!("API operation completed: {}", log_data);
        } else {
            error!("API operation failed: {}", log_data);
        }
    }

    /// Check if we should log at the given level.
    fn should_log(&self, level: &LogLevel) -> bool {
        match (&self.config.log_level, level) {
            (LogLevel::Error, LogLevel::Error) => true,
            (LogLevel::Warn, LogLevel::Error | LogLevel::Warn) => true,
            (LogLevel::Info, LogLevel::Error | LogLevel::Warn | LogLevel::Info) => true,
            (LogLevel::Debug, LogLevel::Error | LogLevel::Warn | LogLevel::Info | LogLevel::Debug) => {
                true
            }
            (LogLevel::Trace, _) => true,
            _ => false,
        }
    }

    /// Sanitize headers to remove credentials before logging.
    fn sanitize_headers(&self, headers: &HashMap<String, String>) -> HashMap<String, String> {
        let mut sanitized = HashMap::new();

        for (key, value) in headers {
            let key_lower = key.to_lowercase();
            if key_lower.contains("authorization") || key_lower.contains("token") {
                sanitized.insert(key.clone(), "[REDACTED]".to_string());
            } else {
                sanitized.insert(key.clone(), value.clone());
            }
        }

        sanitized
    }
}

impl OperationContext {
    /// Elapsed time since the operation started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
