//! In-memory stand-in for the dashboard backend.
//!
//! Every call waits for a fixed delay and then answers from a canned
//! dataset. Nothing is persisted: writes are acknowledged and echoed back but
//! never show up in later reads, and list parameters are ignored unless
//! filtering is switched on with [`MockTransport::with_filtering`].

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use jiff::Timestamp;
use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    Booking, BookingId, BookingStatus, ClientError, Page, Request, Role,
    Transport, User, UserId,
};

/// Simulated network latency of every mock call.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Token handed out by the mock login endpoint.
pub const MOCK_TOKEN: &str = "mock-jwt-token";

pub struct MockTransport {
    delay: Duration,
    filtering: bool,
    calls: Mutex<Vec<(Method, String)>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            filtering: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Apply search, status and page/limit parameters to list reads instead
    /// of always answering with the full canned set.
    pub fn with_filtering(mut self) -> Self {
        self.filtering = true;
        self
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.calls_mut().clone()
    }

    /// Number of calls received for the given verb and exact path.
    pub fn call_count(&self, method: &Method, path: &str) -> usize {
        self.calls_mut()
            .iter()
            .filter(|(m, p)| m == method && p == path)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls_mut().len()
    }

    fn calls_mut(&self) -> MutexGuard<'_, Vec<(Method, String)>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn respond(&self, request: &Request) -> Value {
        match request.method {
            Method::GET => self.read(request),
            Method::POST => create(request),
            Method::PUT => update(request),
            _ => json!({ "success": true }),
        }
    }

    fn read(&self, request: &Request) -> Value {
        let path = request.path.as_str();
        if path.contains("/users") {
            let search = self.param(request, "search");
            let users = canned_users()
                .into_iter()
                .filter(|user| {
                    search.as_deref().is_none_or(|term| {
                        matches_search(term, &[&user.name, &user.email])
                    })
                })
                .collect();
            return self.page(request, users);
        }

        if path.contains("/bookings") {
            let search = self.param(request, "search");
            let status = self
                .param(request, "status")
                .and_then(|status| BookingStatus::parse(&status));
            let bookings = canned_bookings()
                .into_iter()
                .filter(|booking| {
                    status.is_none_or(|status| booking.status == status)
                })
                .filter(|booking| {
                    search.as_deref().is_none_or(|term| {
                        matches_search(term, &[&booking.user_name, &booking.service])
                    })
                })
                .collect();
            return self.page(request, bookings);
        }

        if path.contains("/auth/me") {
            return json!(canned_current_user());
        }

        json!({ "data": [] })
    }

    /// A list parameter, only when filtering is switched on.
    fn param(&self, request: &Request, name: &str) -> Option<String> {
        if !self.filtering {
            return None;
        }
        request
            .query_param(name)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn page<T: Serialize>(&self, request: &Request, items: Vec<T>) -> Value {
        let total = items.len() as u64;
        if !self.filtering {
            let page = Page {
                data: items,
                total,
                page: 1,
                limit: 10,
            };
            return json!(page);
        }

        let page = parse_param(request, "page").unwrap_or(1).max(1);
        let limit = parse_param(request, "limit").unwrap_or(10).max(1);
        let skip = u64::from(page - 1).saturating_mul(u64::from(limit));
        let data = items
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();
        let page = Page {
            data,
            total,
            page,
            limit,
        };
        json!(page)
    }
}

impl Transport for MockTransport {
    fn fetch(&self, request: Request) -> BoxFuture<'_, Result<Value, ClientError>> {
        tracing::debug!(method = %request.method, path = %request.path, "mock call");
        self.calls_mut()
            .push((request.method.clone(), request.path.clone()));

        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            Ok(self.respond(&request))
        })
    }
}

fn create(request: &Request) -> Value {
    let path = request.path.as_str();
    let body = request.body.clone().unwrap_or_else(|| json!({}));

    let data = if path.contains("/auth/login") {
        let email = body.get("email").and_then(Value::as_str).unwrap_or("");
        json!({
            "user": {
                "id": "1",
                "name": "John Doe",
                "email": email,
                "role": Role::Admin,
            },
            "token": MOCK_TOKEN,
        })
    } else if path.contains("/auth/logout") {
        json!({})
    } else if path.contains("/users") {
        merge(
            json!({ "id": new_id() }),
            merge(body, json!({ "createdAt": Timestamp::now().to_string() })),
        )
    } else if path.contains("/bookings") {
        merge(
            json!({ "id": new_id() }),
            merge(
                body,
                json!({
                    "userName": "New User",
                    "status": BookingStatus::Pending,
                }),
            ),
        )
    } else {
        body
    };

    json!({ "success": true, "data": data })
}

/// Echo the patch merged over the canned record it targets.
fn update(request: &Request) -> Value {
    let path = request.path.as_str();
    let id = path.rsplit('/').next().unwrap_or("");
    let patch = request.body.clone().unwrap_or_else(|| json!({}));

    let current = if path.contains("/users") {
        canned_users()
            .into_iter()
            .find(|user| user.id.0 == id)
            .map(|user| json!(user))
    } else if path.contains("/bookings") {
        canned_bookings()
            .into_iter()
            .find(|booking| booking.id.0 == id)
            .map(|booking| json!(booking))
    } else {
        None
    };

    let data = merge(current.unwrap_or_else(|| json!({ "id": id })), patch);
    json!({ "success": true, "data": data })
}

/// Shallow merge of two JSON objects, `overlay` winning on conflicts.
fn merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            base.extend(overlay);
            Value::Object(base)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn parse_param(request: &Request, name: &str) -> Option<u32> {
    request.query_param(name)?.parse().ok()
}

fn matches_search(term: &str, fields: &[&str]) -> bool {
    let term = term.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}

pub fn canned_users() -> Vec<User> {
    vec![
        user("1", "John Doe", "john@example.com", Role::Admin, "2024-01-01"),
        user("2", "Jane Smith", "jane@example.com", Role::User, "2024-01-02"),
        user(
            "3",
            "Bob Johnson",
            "bob@example.com",
            Role::Moderator,
            "2024-01-03",
        ),
    ]
}

pub fn canned_bookings() -> Vec<Booking> {
    vec![
        booking(
            "1",
            "1",
            "John Doe",
            "2024-02-15",
            BookingStatus::Confirmed,
            "Consultation",
        ),
        booking(
            "2",
            "2",
            "Jane Smith",
            "2024-02-20",
            BookingStatus::Pending,
            "Meeting",
        ),
        booking(
            "3",
            "3",
            "Bob Johnson",
            "2024-02-25",
            BookingStatus::Completed,
            "Workshop",
        ),
    ]
}

/// The user `/auth/me` answers with, whoever is logged in.
pub fn canned_current_user() -> User {
    User {
        id: UserId::from("1"),
        name: "John Doe".into(),
        email: "john@example.com".into(),
        role: Role::Admin,
        created_at: None,
    }
}

fn user(id: &str, name: &str, email: &str, role: Role, created_at: &str) -> User {
    User {
        id: UserId::from(id),
        name: name.into(),
        email: email.into(),
        role,
        created_at: Some(created_at.into()),
    }
}

fn booking(
    id: &str,
    user_id: &str,
    user_name: &str,
    date: &str,
    status: BookingStatus,
    service: &str,
) -> Booking {
    Booking {
        id: BookingId::from(id),
        user_id: UserId::from(user_id),
        user_name: user_name.into(),
        date: date.into(),
        status,
        service: service.into(),
    }
}
