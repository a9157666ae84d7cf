//! Transit API client with connection pooling and retry-aware dispatch

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDateTime;
use log::warn;
use reqwest::Method;
use serde_json::Value;

use super::constants::{self, headers};
use super::endpoints::ServiceEndpoints;
use super::error::ApiError;
use super::models::DashboardStats;
use super::resilience::{ApiLogger, ResilienceConfig, RetryPolicy};
use super::token::{self, TokenAccessor};

/// Client for the six transit-management microservices.
///
/// Stateless with respect to domain data: entities pass through as opaque
/// JSON. Reads are retried on transient failures; writes are attempted
/// exactly once so a blip can never double-book a ticket or double-send a
/// notification. Every attempt reads the current bearer token through the
/// injected accessor. Calls are independent; any number may be in flight
/// concurrently.
#[derive(Clone)]
pub struct TransitClient {
    endpoints: ServiceEndpoints,
    http_client: reqwest::Client,
    token_accessor: TokenAccessor,
    read_policy: RetryPolicy,
    write_policy: RetryPolicy,
    logger: ApiLogger,
}

impl TransitClient {
    pub fn new(endpoints: ServiceEndpoints) -> Self {
        Self::with_config(endpoints, ResilienceConfig::default())
    }

    pub fn with_config(endpoints: ServiceEndpoints, config: ResilienceConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent("transit-client/0.1")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            endpoints,
            http_client,
            token_accessor: token::no_token(),
            read_policy: RetryPolicy::new(config.retry),
            write_policy: RetryPolicy::no_retry(),
            logger: ApiLogger::new(config.monitoring),
        }
    }

    /// Create a client with custom HTTP client configuration.
    pub fn with_custom_client(
        endpoints: ServiceEndpoints,
        config: ResilienceConfig,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            endpoints,
            http_client,
            token_accessor: token::no_token(),
            read_policy: RetryPolicy::new(config.retry),
            write_policy: RetryPolicy::no_retry(),
            logger: ApiLogger::new(config.monitoring),
        }
    }

    /// Supply the token accessor consulted on every outgoing attempt.
    pub fn with_token_accessor(mut self, accessor: TokenAccessor) -> Self {
        self.token_accessor = accessor;
        self
    }

    // ---- Routes ----

    /// List all routes, in server order. Resolves to an empty list on
    /// failure; the calling UI treats "no data yet" and "fetch failed"
    /// identically.
    pub async fn list_routes(&self) -> Vec<Value> {
        self.get_list("list_routes", "routes", self.endpoints.routes.clone(), &[])
            .await
    }

    pub async fn get_route(&self, id: u64) -> Result<Value, ApiError> {
        let url = constants::item_endpoint(&self.endpoints.routes, id);
        self.get_value("get_route", "routes", url, &[]).await
    }

    pub async fn add_route(&self, route: &Value) -> Result<Value, ApiError> {
        self.execute_write(
            "add_route",
            "routes",
            Method::POST,
            self.endpoints.routes.clone(),
            Some(route),
        )
        .await
    }

    pub async fn update_route(&self, id: u64, route: &Value) -> Result<Value, ApiError> {
        let url = constants::item_endpoint(&self.endpoints.routes, id);
        self.execute_write("update_route", "routes", Method::PUT, url, Some(route))
            .await
    }

    pub async fn delete_route(&self, id: u64) -> Result<Value, ApiError> {
        let url = constants::item_endpoint(&self.endpoints.routes, id);
        self.execute_write("delete_route", "routes", Method::DELETE, url, None)
            .await
    }

    pub async fn route_count(&self) -> u64 {
        self.get_count("route_count", "routes", &self.endpoints.routes)
            .await
    }

    pub async fn route_analytics(&self) -> Vec<Value> {
        let url = constants::analytics_endpoint(&self.endpoints.routes);
        self.get_list("route_analytics", "routes", url, &[]).await
    }

    // ---- Schedules ----

    pub async fn list_schedules(&self) -> Vec<Value> {
        self.get_list(
            "list_schedules",
            "schedules",
            self.endpoints.schedules.clone(),
            &[],
        )
        .await
    }

    /// Schedules assigned to one route.
    pub async fn schedules_by_route(&self, route_id: u64) -> Vec<Value> {
        let url = constants::route_schedules_endpoint(&self.endpoints.schedules, route_id);
        self.get_list("schedules_by_route", "schedules", url, &[])
            .await
    }

    pub async fn add_schedule(&self, schedule: &Value) -> Result<Value, ApiError> {
        self.execute_write(
            "add_schedule",
            "schedules",
            Method::POST,
            self.endpoints.schedules.clone(),
            Some(schedule),
        )
        .await
    }

    pub async fn delete_schedule(&self, id: u64) -> Result<Value, ApiError> {
        let url = constants::item_endpoint(&self.endpoints.schedules, id);
        self.execute_write("delete_schedule", "schedules", Method::DELETE, url, None)
            .await
    }

    pub async fn assign_schedule_to_route(
        &self,
        schedule_id: u64,
        route_id: u64,
    ) -> Result<Value, ApiError> {
        let url = constants::assign_route_endpoint(&self.endpoints.schedules, schedule_id, route_id);
        self.execute_write("assign_schedule_to_route", "schedules", Method::PUT, url, None)
            .await
    }

    pub async fn schedule_count(&self) -> u64 {
        self.get_count("schedule_count", "schedules", &self.endpoints.schedules)
            .await
    }

    // ---- Tickets ----

    pub async fn list_tickets(&self) -> Vec<Value> {
        self.get_list("list_tickets", "tickets", self.endpoints.tickets.clone(), &[])
            .await
    }

    /// Tickets filtered by route and departure time.
    pub async fn find_tickets(&self, route_name: &str, travel_date_time: NaiveDateTime) -> Vec<Value> {
        let query = travel_query(route_name, travel_date_time);
        self.get_list(
            "find_tickets",
            "tickets",
            self.endpoints.tickets.clone(),
            &query,
        )
        .await
    }

    /// Tickets booked by one user ("my tickets").
    pub async fn tickets_for_user(&self, user_id: u64) -> Vec<Value> {
        let url = constants::user_tickets_endpoint(&self.endpoints.tickets, user_id);
        self.get_list("tickets_for_user", "tickets", url, &[]).await
    }

    /// Seat numbers still free on a departure. Propagates failures so the
    /// booking flow can tell "no seats" apart from "service down".
    pub async fn available_seats(
        &self,
        route_name: &str,
        travel_date_time: NaiveDateTime,
    ) -> Result<Vec<i64>, ApiError> {
        let url = constants::available_seats_endpoint(&self.endpoints.tickets);
        let query = travel_query(route_name, travel_date_time);
        let value = self
            .get_value("available_seats", "tickets", url, &query)
            .await?;

        match value {
            Value::Array(seats) => Ok(seats.iter().filter_map(|s| s.as_i64()).collect()),
            other => Err(ApiError::Decode(format!(
                "expected a seat-number array, got: {}",
                other
            ))),
        }
    }

    pub async fn book_ticket(&self, ticket: &Value) -> Result<Value, ApiError> {
        let url = constants::book_endpoint(&self.endpoints.tickets);
        self.execute_write("book_ticket", "tickets", Method::POST, url, Some(ticket))
            .await
    }

    pub async fn cancel_ticket(&self, id: u64) -> Result<Value, ApiError> {
        let url = constants::cancel_endpoint(&self.endpoints.tickets, id);
        self.execute_write("cancel_ticket", "tickets", Method::PUT, url, None)
            .await
    }

    /// Admin-side status transition (confirm, refund, ...). The body is the
    /// service-defined status update request.
    pub async fn update_ticket_status(&self, id: u64, update: &Value) -> Result<Value, ApiError> {
        let url = constants::ticket_status_endpoint(&self.endpoints.tickets, id);
        self.execute_write("update_ticket_status", "tickets", Method::PUT, url, Some(update))
            .await
    }

    pub async fn delete_ticket(&self, id: u64) -> Result<Value, ApiError> {
        let url = constants::item_endpoint(&self.endpoints.tickets, id);
        self.execute_write("delete_ticket", "tickets", Method::DELETE, url, None)
            .await
    }

    pub async fn ticket_count(&self) -> u64 {
        self.get_count("ticket_count", "tickets", &self.endpoints.tickets)
            .await
    }

    pub async fn ticket_analytics(&self) -> Vec<Value> {
        let url = constants::analytics_endpoint(&self.endpoints.tickets);
        self.get_list("ticket_analytics", "tickets", url, &[]).await
    }

    /// Revenue figures from the ticket service. Degrades to the zero-revenue
    /// shape on failure so charts render empty instead of erroring.
    pub async fn revenue_analytics(&self) -> Value {
        let url = constants::revenue_endpoint(&self.endpoints.tickets);
        match self.get_value("revenue_analytics", "tickets", url, &[]).await {
            Ok(value) => value,
            Err(error) => {
                warn!("revenue_analytics: read failed, returning zero revenue: {}", error);
                serde_json::json!({ "totalRevenue": 0.0, "monthlyRevenue": [] })
            }
        }
    }

    // ---- Auth and users ----

    pub async fn login(&self, credentials: &Value) -> Result<Value, ApiError> {
        let url = constants::login_endpoint(&self.endpoints.auth);
        self.execute_write("login", "auth", Method::POST, url, Some(credentials))
            .await
    }

    pub async fn register(&self, user: &Value) -> Result<Value, ApiError> {
        let url = constants::register_endpoint(&self.endpoints.auth);
        self.execute_write("register", "auth", Method::POST, url, Some(user))
            .await
    }

    pub async fn list_users(&self) -> Vec<Value> {
        self.get_list("list_users", "users", self.endpoints.users.clone(), &[])
            .await
    }

    pub async fn delete_user(&self, id: u64) -> Result<Value, ApiError> {
        let url = constants::item_endpoint(&self.endpoints.users, id);
        self.execute_write("delete_user", "users", Method::DELETE, url, None)
            .await
    }

    pub async fn user_count(&self) -> u64 {
        self.get_count("user_count", "users", &self.endpoints.users)
            .await
    }

    pub async fn user_analytics(&self) -> Vec<Value> {
        let url = constants::analytics_endpoint(&self.endpoints.users);
        self.get_list("user_analytics", "users", url, &[]).await
    }

    // ---- Notifications ----

    pub async fn send_notification(&self, message: &str) -> Result<Value, ApiError> {
        let url = constants::send_endpoint(&self.endpoints.notifications);
        let body = serde_json::json!({ "message": message });
        self.execute_write("send_notification", "notifications", Method::POST, url, Some(&body))
            .await
    }

    // ---- Analytics ----

    pub async fn analytics_summary(&self) -> Result<Value, ApiError> {
        let url = constants::summary_endpoint(&self.endpoints.analytics);
        self.get_value("analytics_summary", "analytics", url, &[])
            .await
    }

    /// Headline counts for the admin dashboard, fetched concurrently from
    /// the four services. Each count tolerates its own failure (degrading
    /// to zero) so one unreachable service never blanks the dashboard.
    pub async fn dashboard_stats(&self) -> DashboardStats {
        let (total_tickets, total_routes, total_users, total_schedules) = futures::join!(
            self.ticket_count(),
            self.route_count(),
            self.user_count(),
            self.schedule_count(),
        );

        DashboardStats {
            total_tickets,
            total_routes,
            total_users,
            total_schedules,
        }
    }

    // ---- Dispatch internals ----

    /// Attach the current bearer token, read fresh from the accessor.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match (self.token_accessor)() {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        }
    }

    /// Headers as logged; the logger redacts the credential.
    fn outbound_headers(&self, has_body: bool) -> HashMap<String, String> {
        let mut outbound = HashMap::new();
        if has_body {
            outbound.insert("Content-Type".to_string(), headers::CONTENT_TYPE_JSON.to_string());
        }
        if let Some(token) = (self.token_accessor)() {
            if !token.is_empty() {
                outbound.insert("Authorization".to_string(), format!("Bearer {}", token));
            }
        }
        outbound
    }

    /// GET with retry, returning the raw successful response.
    async fn get_response(
        &self,
        operation: &str,
        resource: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, ApiError> {
        let context = self.logger.start_operation(operation, resource);
        self.logger
            .log_request(&context, "GET", url, &self.outbound_headers(false));

        let result = self
            .read_policy
            .execute(|| async {
                let mut request = self.http_client.get(url);
                if !query.is_empty() {
                    request = request.query(query);
                }
                self.authorize(request).send().await
            })
            .await;

        match &result {
            Ok(response) => {
                let status = response.status().as_u16();
                self.logger.log_response(&context, status, context.elapsed());
                self.logger.complete_operation(&context, true, Some(status), None);
            }
            Err(error) => {
                self.logger.complete_operation(
                    &context,
                    false,
                    error.status(),
                    Some(&error.to_string()),
                );
            }
        }

        result
    }

    /// GET with retry, decoding the body as JSON and propagating failures.
    async fn get_value(
        &self,
        operation: &str,
        resource: &str,
        url: String,
        query: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let response = self.get_response(operation, resource, &url, query).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// List read: any failure degrades to an empty sequence after the
    /// classified error is logged. Server order is preserved untouched.
    async fn get_list(
        &self,
        operation: &str,
        resource: &str,
        url: String,
        query: &[(&str, String)],
    ) -> Vec<Value> {
        match self.get_value(operation, resource, url, query).await {
            Ok(Value::Array(records)) => records,
            Ok(other) => {
                warn!(
                    "{}: expected a JSON array from the {} service, got: {}",
                    operation, resource, other
                );
                Vec::new()
            }
            Err(error) => {
                warn!("{}: read failed, returning empty list: {}", operation, error);
                Vec::new()
            }
        }
    }

    /// Scalar count read, degrading to zero on failure.
    async fn get_count(&self, operation: &str, resource: &str, base_url: &str) -> u64 {
        let url = constants::count_endpoint(base_url);
        match self.get_value(operation, resource, url, &[]).await {
            Ok(value) => value.as_u64().unwrap_or(0),
            Err(error) => {
                warn!("{}: count read failed, returning 0: {}", operation, error);
                0
            }
        }
    }

    /// Single-attempt write dispatch. Failures propagate classified so the
    /// caller can keep the user in the edit flow and surface the message.
    async fn execute_write(
        &self,
        operation: &str,
        resource: &str,
        method: Method,
        url: String,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let context = self.logger.start_operation(operation, resource);
        self.logger.log_request(
            &context,
            method.as_str(),
            &url,
            &self.outbound_headers(body.is_some()),
        );

        let result = self
            .write_policy
            .execute(|| async {
                let mut request = self.http_client.request(method.clone(), &url);
                if let Some(payload) = body {
                    request = request.json(payload);
                }
                self.authorize(request).send().await
            })
            .await;

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                self.logger.log_response(&context, status, context.elapsed());
                self.logger.complete_operation(&context, true, Some(status), None);
                Ok(parse_body(response).await)
            }
            Err(error) => {
                self.logger.complete_operation(
                    &context,
                    false,
                    error.status(),
                    Some(&error.to_string()),
                );
                Err(error)
            }
        }
    }
}

/// Parse a successful response body into a passthrough value. Deletes and
/// cancellations come back as 204/empty, which maps to null.
async fn parse_body(response: reqwest::Response) -> Value {
    if response.status() == reqwest::StatusCode::NO_CONTENT {
        return Value::Null;
    }

    let text = response.text().await.unwrap_or_default();
    if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    }
}

fn travel_query(route_name: &str, travel_date_time: NaiveDateTime) -> [(&'static str, String); 2] {
    [
        ("routeName", route_name.to_string()),
        // LocalDateTime wire format on the ticket service
        ("travelDateTime", travel_date_time.format("%Y-%m-%dT%H:%M:%S").to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_travel_query_wire_format() {
        let departure = NaiveDate::from_ymd_opt(2025, 5, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();

        let query = travel_query("Express-7", departure);
        assert_eq!(query[0], ("routeName", "Express-7".to_string()));
        assert_eq!(query[1], ("travelDateTime", "2025-05-01T08:30:00".to_string()));
    }

    #[test]
    fn test_client_construction() {
        let client = TransitClient::new(ServiceEndpoints::default());
        assert_eq!(client.read_policy.max_attempts(), 3);
        assert_eq!(client.write_policy.max_attempts(), 1);
    }
}
