use payloads::User;
use payloads::requests::LoginCredentials;

use crate::hooks::{AuthHook, use_auth};
use crate::{AppContext, QueryError};

pub const LOGIN_FAILED: &str = "Invalid credentials. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginView {
    pub email: String,
    pub submit_label: &'static str,
    /// Inputs and the button are disabled while signing in.
    pub is_loading: bool,
    pub error: Option<&'static str>,
}

/// Email and password form. The fields are sent as typed.
pub struct LoginPage {
    auth: AuthHook,
    pub email: String,
    pub password: String,
}

impl LoginPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            auth: use_auth(ctx),
            email: String::new(),
            password: String::new(),
        }
    }

    pub async fn submit(&self) -> Result<User, QueryError> {
        let credentials = LoginCredentials {
            email: self.email.clone(),
            password: self.password.clone(),
        };
        self.auth.login(&credentials).await
    }

    pub fn view(&self) -> LoginView {
        let state = self.auth.snapshot();
        LoginView {
            email: self.email.clone(),
            submit_label: if state.is_loading {
                "Signing in..."
            } else {
                "Login"
            },
            is_loading: state.is_loading,
            error: state.login_error.map(|_| LOGIN_FAILED),
        }
    }
}
