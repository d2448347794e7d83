use crate::User;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Result of a successful login.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: SecretString,
}

/// One page of a list endpoint.
///
/// `total` counts every matching record, not just the ones in `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: 1,
            limit: 10,
        }
    }
}

/// Wrapper returned by every write endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}
