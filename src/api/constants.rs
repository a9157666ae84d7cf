//! Shared header values and URL builders for the transit service REST paths

/// Standard headers for transit service requests
pub mod headers {
    /// Content type for JSON requests
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// Build an item endpoint URL (`GET`/`PUT`/`DELETE /{id}`)
pub fn item_endpoint(base_url: &str, id: u64) -> String {
    format!("{}/{}", base_url, id)
}

/// Build a collection count endpoint URL
pub fn count_endpoint(base_url: &str) -> String {
    format!("{}/count", base_url)
}

/// Build a per-service analytics endpoint URL
pub fn analytics_endpoint(base_url: &str) -> String {
    format!("{}/analytics", base_url)
}

/// Ticket booking endpoint (`POST /book`)
pub fn book_endpoint(tickets_url: &str) -> String {
    format!("{}/book", tickets_url)
}

/// Ticket cancellation endpoint (`PUT /cancel/{id}`)
pub fn cancel_endpoint(tickets_url: &str, id: u64) -> String {
    format!("{}/cancel/{}", tickets_url, id)
}

/// Ticket status update endpoint (`PUT /{id}/status`)
pub fn ticket_status_endpoint(tickets_url: &str, id: u64) -> String {
    format!("{}/{}/status", tickets_url, id)
}

/// Tickets belonging to one user (`GET /user/{userId}`)
pub fn user_tickets_endpoint(tickets_url: &str, user_id: u64) -> String {
    format!("{}/user/{}", tickets_url, user_id)
}

/// Seat availability endpoint (`GET /available-seats`)
pub fn available_seats_endpoint(tickets_url: &str) -> String {
    format!("{}/available-seats", tickets_url)
}

/// Revenue analytics endpoint on the ticket service (`GET /revenue`)
pub fn revenue_endpoint(tickets_url: &str) -> String {
    format!("{}/revenue", tickets_url)
}

/// Schedules for one route (`GET /route/{routeId}`)
pub fn route_schedules_endpoint(schedules_url: &str, route_id: u64) -> String {
    format!("{}/route/{}", schedules_url, route_id)
}

/// Schedule-to-route assignment endpoint (`PUT /{scheduleId}/assign-route/{routeId}`)
pub fn assign_route_endpoint(schedules_url: &str, schedule_id: u64, route_id: u64) -> String {
    format!("{}/{}/assign-route/{}", schedules_url, schedule_id, route_id)
}

/// Login endpoint on the auth service
pub fn login_endpoint(auth_url: &str) -> String {
    format!("{}/login", auth_url)
}

/// Registration endpoint on the auth service
pub fn register_endpoint(auth_url: &str) -> String {
    format!("{}/register", auth_url)
}

/// Notification dispatch endpoint (`POST /send`)
pub fn send_endpoint(notifications_url: &str) -> String {
    format!("{}/send", notifications_url)
}

/// Platform-wide analytics summary endpoint (`GET /summary`)
pub fn summary_endpoint(analytics_url: &str) -> String {
    format!("{}/summary", analytics_url)
}
