use std::sync::Arc;

use crate::responses::Envelope;
use crate::{
    AuthResponse, Booking, BookingId, Page, Request, Transport, User, UserId,
    requests,
};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Paths of the backend API, relative to the versioned root.
pub mod endpoints {
    use crate::{BookingId, UserId};

    pub const AUTH_LOGIN: &str = "/auth/login";
    pub const AUTH_LOGOUT: &str = "/auth/logout";
    pub const AUTH_REFRESH: &str = "/auth/refresh";
    pub const AUTH_ME: &str = "/auth/me";
    pub const USERS: &str = "/users";
    pub const BOOKINGS: &str = "/bookings";

    pub fn user(id: &UserId) -> String {
        format!("{USERS}/{id}")
    }

    pub fn booking(id: &BookingId) -> String {
        format!("{BOOKINGS}/{id}")
    }
}

/// An API client for interfacing with the backend.
///
/// Cheap to clone; all clones share the same transport.
#[derive(Clone)]
pub struct APIClient {
    transport: Arc<dyn Transport>,
}

/// Helper methods for http actions
impl APIClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &impl Serialize,
    ) -> Result<T, ClientError> {
        let request =
            Request::new(Method::GET, path).with_query(query_pairs(params)?);
        let value = self.transport.fetch(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let request =
            Request::new(method, path).with_body(serde_json::to_value(body)?);
        ok_body(self.transport.fetch(request).await?)
    }

    async fn send_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(), ClientError> {
        let mut request = Request::new(method, path);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        ok_empty(self.transport.fetch(request).await?)
    }
}

/// Methods on the backend API
impl APIClient {
    pub async fn login(
        &self,
        details: &requests::LoginCredentials,
    ) -> Result<AuthResponse, ClientError> {
        self.send(Method::POST, endpoints::AUTH_LOGIN, details).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.send_empty(
            Method::POST,
            endpoints::AUTH_LOGOUT,
            Some(Value::Object(Default::default())),
        )
        .await
    }

    /// Get the user the current session belongs to.
    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.get(endpoints::AUTH_ME, &()).await
    }

    pub async fn list_users(
        &self,
        params: &requests::ListUsers,
    ) -> Result<Page<User>, ClientError> {
        self.get(endpoints::USERS, params).await
    }

    /// Create a user. The id comes from the acknowledging backend.
    pub async fn create_user(
        &self,
        details: &requests::CreateUser,
    ) -> Result<User, ClientError> {
        self.send(Method::POST, endpoints::USERS, details).await
    }

    pub async fn update_user(
        &self,
        user_id: &UserId,
        details: &requests::UpdateUser,
    ) -> Result<User, ClientError> {
        self.send(Method::PUT, &endpoints::user(user_id), details)
            .await
    }

    pub async fn delete_user(&self, user_id: &UserId) -> Result<(), ClientError> {
        self.send_empty(Method::DELETE, &endpoints::user(user_id), None)
            .await
    }

    pub async fn list_bookings(
        &self,
        params: &requests::ListBookings,
    ) -> Result<Page<Booking>, ClientError> {
        self.get(endpoints::BOOKINGS, params).await
    }

    /// Create a booking. The id, initial status and user name snapshot come
    /// from the acknowledging backend.
    pub async fn create_booking(
        &self,
        details: &requests::CreateBooking,
    ) -> Result<Booking, ClientError> {
        self.send(Method::POST, endpoints::BOOKINGS, details).await
    }

    pub async fn update_booking(
        &self,
        booking_id: &BookingId,
        details: &requests::UpdateBooking,
    ) -> Result<Booking, ClientError> {
        self.send(Method::PUT, &endpoints::booking(booking_id), details)
            .await
    }

    pub async fn delete_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<(), ClientError> {
        self.send_empty(Method::DELETE, &endpoints::booking(booking_id), None)
            .await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Your session has expired. Please sign in again.")]
    Unauthorized,
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected response from the server: {0}")]
    Decode(#[from] serde_json::Error),
    /// The backend answered but reported the write as unsuccessful.
    #[error("{0}")]
    Rejected(String),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Unauthorized => true,
            Self::APIError(status, _) => *status == StatusCode::UNAUTHORIZED,
            _ => false,
        }
    }
}

/// Unwrap the data of a successful write envelope, or return an appropriate
/// error.
pub fn ok_body<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    let envelope: Envelope<T> = serde_json::from_value(value)?;
    if !envelope.success {
        return Err(rejected(envelope.message));
    }
    envelope.data.ok_or_else(|| {
        ClientError::Rejected("The server response carried no data.".into())
    })
}

/// Check that a write without a meaningful body succeeded.
pub fn ok_empty(value: Value) -> Result<(), ClientError> {
    if value.is_null() {
        return Ok(());
    }
    let envelope: Envelope<Value> = serde_json::from_value(value)?;
    if !envelope.success {
        return Err(rejected(envelope.message));
    }
    Ok(())
}

fn rejected(message: Option<String>) -> ClientError {
    ClientError::Rejected(
        message.unwrap_or_else(|| "The request was not successful.".into()),
    )
}

/// Flatten serializable parameters into query pairs, skipping nulls.
fn query_pairs(
    params: &impl Serialize,
) -> Result<Vec<(String, String)>, ClientError> {
    let Value::Object(map) = serde_json::to_value(params)? else {
        return Ok(Vec::new());
    };
    Ok(map
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| match value {
            Value::String(text) => (key, text),
            other => (key, other.to_string()),
        })
        .collect())
}
