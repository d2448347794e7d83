use dashboard::hooks::use_bookings;
use payloads::requests::{CreateBooking, ListBookings, UpdateBooking};
use payloads::{BookingId, BookingStatus, MockTransport, UserId, endpoints};
use reqwest::Method;
use test_helpers::{spawn_app, spawn_app_with};

fn pending_only() -> ListBookings {
    ListBookings {
        status: Some(BookingStatus::Pending),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn created_booking_is_not_stored() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bookings = use_bookings(&app.ctx, ListBookings::default());
    bookings.load().await;

    let created = bookings
        .create_booking(&CreateBooking {
            user_id: UserId::from("1"),
            date: "2024-03-01".into(),
            service: "X".into(),
        })
        .await?;

    assert!(!created.id.0.is_empty());
    assert!(!["1", "2", "3"].contains(&created.id.0.as_str()));
    assert_eq!(created.status, BookingStatus::Pending);
    assert_eq!(created.user_name, "New User");
    assert_eq!(created.service, "X");
    assert_eq!(created.date, "2024-03-01");

    let after = bookings.load().await;
    assert_eq!(app.calls(Method::GET, endpoints::BOOKINGS), 2);
    let ids: Vec<_> = after.bookings.iter().map(|b| b.id.0.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn status_filter_is_ignored_by_the_default_backend() {
    let app = spawn_app().await;

    let pending = use_bookings(&app.ctx, pending_only()).load().await;

    // The parameter is sent, but the default mock answers with everything.
    assert_eq!(pending.bookings.len(), 3);
    assert!(
        pending
            .bookings
            .iter()
            .any(|booking| booking.status != BookingStatus::Pending)
    );
}

#[tokio::test(start_paused = true)]
async fn status_filter_shows_only_pending_when_the_backend_filters() {
    let app = spawn_app_with(MockTransport::new().with_filtering()).await;

    let pending = use_bookings(&app.ctx, pending_only()).load().await;

    assert!(!pending.bookings.is_empty());
    assert!(
        pending
            .bookings
            .iter()
            .all(|booking| booking.status == BookingStatus::Pending)
    );
    assert_eq!(pending.total, 1);
}

#[tokio::test(start_paused = true)]
async fn different_params_are_cached_separately() {
    let app = spawn_app().await;

    use_bookings(&app.ctx, ListBookings::default()).load().await;
    use_bookings(&app.ctx, pending_only()).load().await;
    use_bookings(&app.ctx, pending_only()).load().await;

    assert_eq!(app.calls(Method::GET, endpoints::BOOKINGS), 2);
}

#[tokio::test(start_paused = true)]
async fn update_merges_over_the_stored_booking() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let updated = use_bookings(&app.ctx, ListBookings::default())
        .update_booking(
            &BookingId::from("1"),
            &UpdateBooking {
                service: Some("Follow-up".into()),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.service, "Follow-up");
    assert_eq!(updated.user_name, "John Doe");
    assert_eq!(updated.status, BookingStatus::Confirmed);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn delete_invalidates_every_booking_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let all = use_bookings(&app.ctx, ListBookings::default());
    let pending = use_bookings(&app.ctx, pending_only());
    all.load().await;
    pending.load().await;

    all.delete_booking(&BookingId::from("2")).await?;
    all.load().await;
    pending.load().await;

    assert_eq!(app.calls(Method::DELETE, "/bookings/2"), 1);
    assert_eq!(app.calls(Method::GET, endpoints::BOOKINGS), 4);
    Ok(())
}
