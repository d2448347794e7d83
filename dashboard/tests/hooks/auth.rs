use std::sync::Arc;
use std::time::Duration;

use dashboard::hooks::use_auth;
use dashboard::hooks::use_auth::current_user_key;
use dashboard::hooks::use_users;
use dashboard::pages::LoginPage;
use dashboard::pages::login::LOGIN_FAILED;
use dashboard::{
    AUTH_TOKEN_KEY, AppContext, CredentialStore, QueryError, QueryStatus, Route,
};
use payloads::mock::MOCK_TOKEN;
use payloads::requests::ListUsers;
use payloads::{MockTransport, Role, User, endpoints};
use reqwest::{Method, StatusCode};
use test_helpers::{STALE_TIME, admin_credentials, spawn_app};

use crate::{ReadOnlyStore, RefusingWrites, context_over};

#[tokio::test(start_paused = true)]
async fn login_stores_session_and_opens_dashboard() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let user = app.login().await?;

    assert_eq!(user.id.0, "1");
    assert_eq!(user.name, "John Doe");
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.role, Role::Admin);
    assert_eq!(app.stored_token().as_deref(), Some(MOCK_TOKEN));
    assert_eq!(app.ctx.navigator.current(), Some(Route::Dashboard));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn login_seeds_the_current_user_without_a_read() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login().await?;

    let auth = use_auth(&app.ctx).load().await;

    assert!(auth.is_authenticated);
    let email = auth.user.map(|user| user.email);
    assert_eq!(email.as_deref(), Some("a@b.com"));
    assert_eq!(app.calls(Method::GET, endpoints::AUTH_ME), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn current_user_is_not_read_without_a_token() {
    let app = spawn_app().await;

    let auth = use_auth(&app.ctx).load().await;

    assert!(auth.user.is_none());
    assert!(!auth.is_authenticated);
    assert!(!auth.is_loading);
    assert_eq!(app.total_calls(), 0);
    let status = app.ctx.queries.status(&current_user_key());
    assert_eq!(status, QueryStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn stored_token_restores_the_current_user() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.storage.set(AUTH_TOKEN_KEY, MOCK_TOKEN)?;

    let auth = use_auth(&app.ctx).load().await;

    assert!(auth.is_authenticated);
    let email = auth.user.map(|user| user.email);
    assert_eq!(email.as_deref(), Some("john@example.com"));
    assert_eq!(app.calls(Method::GET, endpoints::AUTH_ME), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn logout_clears_session_and_cache() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login().await?;
    let users = use_users(&app.ctx, ListUsers::default());
    users.load().await;
    assert!(!app.ctx.queries.is_empty());

    use_auth(&app.ctx).logout().await?;

    assert_eq!(app.stored_token(), None);
    assert!(app.ctx.queries.is_empty());
    assert_eq!(app.ctx.navigator.current(), Some(Route::Login));
    assert_eq!(app.calls(Method::POST, endpoints::AUTH_LOGOUT), 1);

    let auth = use_auth(&app.ctx).load().await;
    assert!(auth.user.is_none());

    let snapshot = users.snapshot();
    assert!(snapshot.users.is_empty());
    users.load().await;
    assert_eq!(app.calls(Method::GET, endpoints::USERS), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn reads_settling_after_logout_are_not_cached() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login().await?;

    let logout = tokio::spawn({
        let ctx = app.ctx.clone();
        async move { use_auth(&ctx).logout().await }
    });
    tokio::time::sleep(Duration::from_millis(500)).await;

    let read = tokio::spawn({
        let ctx = app.ctx.clone();
        async move { use_users(&ctx, ListUsers::default()).load().await }
    });

    logout.await??;
    let stale = read.await?;

    assert_eq!(stale.users.len(), 3);
    assert!(app.ctx.queries.is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failed_login_shows_the_credentials_notice() {
    let ctx = context_over(RefusingWrites::new(StatusCode::BAD_REQUEST));
    let mut page = LoginPage::new(&ctx);
    page.email = "a@b.com".into();
    page.password = "wrong".into();

    let result = page.submit().await;

    assert!(result.is_err());
    let view = page.view();
    assert_eq!(view.error, Some(LOGIN_FAILED));
    assert_eq!(view.submit_label, "Login");
    assert!(!view.is_loading);
    assert_eq!(ctx.storage.get(AUTH_TOKEN_KEY), None);
    assert_eq!(ctx.navigator.current(), None);
}

#[tokio::test(start_paused = true)]
async fn login_button_reads_signing_in_while_pending() {
    let ctx = context_over(MockTransport::new());
    let page = std::sync::Arc::new(LoginPage::new(&ctx));

    let submit = tokio::spawn({
        let page = page.clone();
        async move { page.submit().await }
    });
    while !page.view().is_loading {
        tokio::task::yield_now().await;
    }
    assert_eq!(page.view().submit_label, "Signing in...");

    submit.await.unwrap().unwrap();
    assert_eq!(page.view().submit_label, "Login");
    assert_eq!(page.view().error, None);
}

#[tokio::test(start_paused = true)]
async fn unauthorized_answers_sign_the_user_out() -> anyhow::Result<()> {
    let ctx = context_over(RefusingWrites::new(StatusCode::UNAUTHORIZED));
    ctx.storage.set(AUTH_TOKEN_KEY, "expired")?;
    ctx.queries.set_query_data(
        current_user_key(),
        User {
            id: "1".into(),
            name: "John Doe".into(),
            email: "john@example.com".into(),
            role: Role::Admin,
            created_at: None,
        },
    );

    let result = use_users(&ctx, ListUsers::default())
        .create_user(&Default::default())
        .await;

    assert!(result.is_err_and(|e| e.is_unauthorized()));
    assert_eq!(ctx.storage.get(AUTH_TOKEN_KEY), None);
    assert_eq!(ctx.navigator.current(), Some(Route::Login));
    assert!(!use_auth(&ctx).snapshot().is_authenticated);
    Ok(())
}

fn read_only_context(token: Option<&str>) -> AppContext {
    AppContext::new(
        Arc::new(MockTransport::new()),
        Arc::new(ReadOnlyStore {
            token: token.map(str::to_string),
        }),
        STALE_TIME,
    )
}

#[tokio::test(start_paused = true)]
async fn login_fails_when_the_token_cannot_be_stored() {
    let ctx = read_only_context(None);
    let auth = use_auth(&ctx);

    let result = auth.login(&admin_credentials()).await;

    assert!(matches!(result, Err(QueryError::Storage(_))));
    assert_eq!(ctx.navigator.current(), None);
    assert_eq!(ctx.queries.status(&current_user_key()), QueryStatus::Idle);
    let state = auth.snapshot();
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
    assert!(matches!(state.login_error, Some(QueryError::Storage(_))));
}

#[tokio::test(start_paused = true)]
async fn logout_keeps_local_state_when_the_token_cannot_be_removed() {
    let ctx = read_only_context(Some(MOCK_TOKEN));
    let auth = use_auth(&ctx);
    assert!(auth.load().await.is_authenticated);

    let result = auth.logout().await;

    assert!(matches!(result, Err(QueryError::Storage(_))));
    assert_eq!(ctx.storage.get(AUTH_TOKEN_KEY).as_deref(), Some(MOCK_TOKEN));
    assert_eq!(ctx.navigator.current(), None);
    assert!(auth.snapshot().is_authenticated);
}
