use payloads::requests::LoginCredentials;
use payloads::{AuthResponse, User};
use secrecy::ExposeSecret;

use crate::hooks::MutationState;
use crate::{AUTH_TOKEN_KEY, AppContext, QueryError, QueryKey, Route};

/// Cache resource the session's user is stored under.
pub const AUTH: &str = "auth";

pub fn current_user_key() -> QueryKey {
    QueryKey::new(AUTH, &"user")
}

#[derive(Debug, Default)]
pub struct AuthHookReturn {
    pub user: Option<User>,
    /// A login or logout is running, or the user is being read for the
    /// first time.
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub login_error: Option<QueryError>,
}

/// Session state and the login/logout actions.
#[derive(Clone)]
pub struct AuthHook {
    ctx: AppContext,
    logging_in: MutationState,
    logging_out: MutationState,
}

pub fn use_auth(ctx: &AppContext) -> AuthHook {
    AuthHook {
        ctx: ctx.clone(),
        logging_in: MutationState::default(),
        logging_out: MutationState::default(),
    }
}

impl AuthHook {
    /// Read the current user. Without a stored token nothing is requested.
    pub async fn load(&self) -> AuthHookReturn {
        if self.ctx.token().is_none() {
            return self.snapshot();
        }

        let client = self.ctx.client.clone();
        let result = self
            .ctx
            .queries
            .fetch(current_user_key(), move || async move {
                client.current_user().await
            })
            .await;
        if let Err(e) = result {
            tracing::debug!(error = %e, "failed to read the current user");
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> AuthHookReturn {
        let has_token = self.ctx.token().is_some();
        let state = self.ctx.queries.state::<User>(&current_user_key());
        let user = if has_token {
            state.data.as_deref().cloned()
        } else {
            None
        };

        AuthHookReturn {
            is_authenticated: user.is_some(),
            user,
            is_loading: self.logging_in.is_pending()
                || self.logging_out.is_pending()
                || (has_token && state.is_initial_loading()),
            login_error: self.logging_in.error(),
        }
    }

    /// Sign in, keep the session and open the dashboard.
    ///
    /// The returned user is cached as the current user straight away, so no
    /// extra read follows a successful login. A token that cannot be stored
    /// fails the login and leaves the app where it is.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<User, QueryError> {
        let user = self
            .logging_in
            .run(async {
                let AuthResponse { user, token } =
                    self.ctx.client.login(credentials).await?;
                self.ctx.storage.set(AUTH_TOKEN_KEY, token.expose_secret())?;
                Ok::<_, QueryError>(user)
            })
            .await?;
        tracing::info!(user_id = %user.id, "signed in");

        self.ctx
            .queries
            .set_query_data(current_user_key(), user.clone());
        self.ctx.navigator.push(Route::Dashboard);
        Ok(user)
    }

    /// End the session, drop every cached read and return to the login page.
    ///
    /// Nothing local is touched unless the token was actually forgotten.
    pub async fn logout(&self) -> Result<(), QueryError> {
        self.logging_out
            .run(async {
                self.ctx.client.logout().await?;
                self.ctx.storage.remove(AUTH_TOKEN_KEY)?;
                Ok::<_, QueryError>(())
            })
            .await?;
        tracing::info!("signed out");

        self.ctx.queries.clear();
        self.ctx.navigator.push(Route::Login);
        Ok(())
    }
}
