use std::collections::HashSet;

use dashboard::QueryStatus;
use dashboard::hooks::use_users;
use dashboard::hooks::use_users::users_key;
use payloads::requests::{CreateUser, ListUsers, UpdateUser};
use payloads::{MockTransport, Page, Role, User, UserId, endpoints};
use reqwest::{Method, StatusCode};
use test_helpers::{spawn_app, spawn_app_with};

use crate::{RefusingWrites, context_over};

fn new_user() -> CreateUser {
    CreateUser {
        name: "Alice Example".into(),
        email: "alice@example.com".into(),
        role: Role::Moderator,
    }
}

#[tokio::test(start_paused = true)]
async fn lists_the_canned_users() {
    let app = spawn_app().await;

    let users = use_users(&app.ctx, ListUsers::default()).load().await;

    assert!(users.error.is_none());
    assert!(!users.is_loading);
    assert_eq!(users.total, 3);
    let names: Vec<_> = users.users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["John Doe", "Jane Smith", "Bob Johnson"]);
}

#[tokio::test(start_paused = true)]
async fn concurrent_identical_reads_make_one_call() {
    let app = spawn_app().await;
    let first = use_users(&app.ctx, ListUsers::default());
    let second = use_users(&app.ctx, ListUsers::default());

    let (a, b) = tokio::join!(first.load(), second.load());

    assert_eq!(app.calls(Method::GET, endpoints::USERS), 1);
    assert_eq!(a.users, b.users);
    assert_eq!(a.users.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn empty_state_before_the_first_read() {
    let app = spawn_app().await;

    let users = use_users(&app.ctx, ListUsers::default()).snapshot();

    assert!(users.users.is_empty());
    assert_eq!(users.total, 0);
    assert!(!users.is_loading);
    assert!(users.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn loading_until_the_first_read_settles() {
    let app = spawn_app().await;
    let users = use_users(&app.ctx, ListUsers::default());

    let read = tokio::spawn({
        let users = users.clone();
        async move { users.load().await }
    });
    while !users.snapshot().is_loading {
        tokio::task::yield_now().await;
    }

    read.await.unwrap();
    assert!(!users.snapshot().is_loading);
}

#[tokio::test(start_paused = true)]
async fn create_assigns_an_id_and_refetches() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let users = use_users(&app.ctx, ListUsers::default());
    users.load().await;

    let first = users.create_user(&new_user()).await?;
    let second = users.create_user(&new_user()).await?;

    assert_ne!(first.id, second.id);
    assert!(!first.id.0.is_empty());
    assert_eq!(first.name, "Alice Example");
    assert_eq!(first.role, Role::Moderator);
    assert!(first.created_at.is_some());

    let after = users.load().await;
    assert_eq!(app.calls(Method::GET, endpoints::USERS), 2);
    // The mock acknowledges writes without storing them.
    assert_eq!(after.users.len(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn creating_flag_is_raised_during_the_write() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let users = use_users(&app.ctx, ListUsers::default());

    let create = tokio::spawn({
        let users = users.clone();
        async move { users.create_user(&new_user()).await }
    });
    while !users.snapshot().is_creating {
        tokio::task::yield_now().await;
    }
    assert!(!users.snapshot().is_updating);

    create.await??;
    assert!(!users.snapshot().is_creating);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn update_merges_over_the_stored_record() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let users = use_users(&app.ctx, ListUsers::default());

    let updated = users
        .update_user(
            &UserId::from("2"),
            &UpdateUser {
                role: Some(Role::Moderator),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.name, "Jane Smith");
    assert_eq!(updated.email, "jane@example.com");
    assert_eq!(updated.role, Role::Moderator);
    assert_eq!(app.calls(Method::PUT, "/users/2"), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn delete_invalidates_the_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let users = use_users(&app.ctx, ListUsers::default());
    users.load().await;

    users.delete_user(&UserId::from("3")).await?;
    users.load().await;

    assert_eq!(app.calls(Method::DELETE, "/users/3"), 1);
    assert_eq!(app.calls(Method::GET, endpoints::USERS), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failed_writes_keep_the_cache() {
    let ctx = context_over(RefusingWrites::new(StatusCode::CONFLICT));
    let users = use_users(&ctx, ListUsers::default());
    users.load().await;

    let result = users.create_user(&new_user()).await;

    let error = result.expect_err("write should be refused");
    assert_eq!(error.to_string(), "request refused");
    assert_eq!(
        users.create_error().map(|e| e.to_string()).as_deref(),
        Some("request refused")
    );
    assert!(!users.snapshot().is_creating);
    let key = users_key(&ListUsers::default());
    let state = ctx.queries.state::<Page<User>>(&key);
    assert!(!state.is_stale);
    assert_eq!(state.status, QueryStatus::Success);
}

#[tokio::test(start_paused = true)]
async fn search_narrows_the_list_when_the_backend_filters() {
    let app = spawn_app_with(MockTransport::new().with_filtering()).await;

    let users = use_users(
        &app.ctx,
        ListUsers {
            search: Some("JANE".into()),
            ..Default::default()
        },
    )
    .load()
    .await;

    assert_eq!(users.total, 1);
    let ids: HashSet<_> = users.users.iter().map(|u| u.id.0.as_str()).collect();
    assert_eq!(ids, HashSet::from(["2"]));
}
