//! Base URL configuration for the independently deployed transit services
//!
//! Each logical resource group lives behind its own base URL. Defaults match
//! the standard local deployment; every URL can be overridden through the
//! environment (a `.env` file is honored when present).

/// Base URLs for the six transit resource groups.
///
/// Auth and users share one deployed service but expose distinct path
/// roots, so they are tracked separately here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub routes: String,
    pub schedules: String,
    pub tickets: String,
    pub auth: String,
    pub users: String,
    pub notifications: String,
    pub analytics: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            routes: "http://localhost:8084/api/routes".to_string(),
            schedules: "http://localhost:8085/api/schedules".to_string(),
            tickets: "http://localhost:8087/api/tickets".to_string(),
            auth: "http://localhost:8089/api/auth".to_string(),
            users: "http://localhost:8089/api/users".to_string(),
            notifications: "http://localhost:8083/api/notifications".to_string(),
            analytics: "http://localhost:8086/api/analytics".to_string(),
        }
    }
}

impl ServiceEndpoints {
    /// Load endpoints from the environment, falling back to the local
    /// deployment defaults for any service that is not overridden.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Ok(Self {
            routes: env_or("TRANSIT_ROUTE_SERVICE_URL", defaults.routes),
            schedules: env_or("TRANSIT_SCHEDULE_SERVICE_URL", defaults.schedules),
            tickets: env_or("TRANSIT_TICKET_SERVICE_URL", defaults.tickets),
            auth: env_or("TRANSIT_AUTH_SERVICE_URL", defaults.auth),
            users: env_or("TRANSIT_USER_SERVICE_URL", defaults.users),
            notifications: env_or("TRANSIT_NOTIFICATION_SERVICE_URL", defaults.notifications),
            analytics: env_or("TRANSIT_ANALYTICS_SERVICE_URL", defaults.analytics),
        })
    }

    /// Point every resource group at a single host, keeping the conventional
    /// path roots. Useful when the services sit behind one gateway.
    pub fn single_host(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            routes: format!("{}/api/routes", base),
            schedules: format!("{}/api/schedules", base),
            tickets: format!("{}/api/tickets", base),
            auth: format!("{}/api/auth", base),
            users: format!("{}/api/users", base),
            notifications: format!("{}/api/notifications", base),
            analytics: format!("{}/api/analytics", base),
        }
    }
}

fn env_or(var: &str, default: String) -> String {
    std::env::var(var).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}
