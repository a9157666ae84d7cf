//! Typed shapes owned by the client itself
//!
//! Domain entities (routes, schedules, tickets, users) are owned by the
//! backend services and passed through as opaque JSON. Only aggregates the
//! client assembles locally get a concrete type.

use serde::{Deserialize, Serialize};

/// Admin dashboard headline counts, assembled from the four `/count`
/// endpoints. A service that cannot be reached contributes zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_tickets: u64,
    pub total_routes: u64,
    pub total_users: u64,
    pub total_schedules: u64,
}
