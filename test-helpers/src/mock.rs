//! Scripted walk through every dashboard page.
//!
//! Drives the pages the way a person clicking through the app would: sign
//! in, browse and add users, filter bookings and book a session, save the
//! settings, sign out. Used by the dev-server to exercise a configured
//! backend, and by tests as an end-to-end smoke run over the mock.

use anyhow::{Context, Result};
use dashboard::AppContext;
use dashboard::hooks::{use_auth, use_bookings};
use dashboard::pages::{
    BookingsPage, BookingsView, LoginPage, SettingsPage, StatusFilter,
    UsersPage, UsersView,
};
use payloads::requests::{CreateBooking, ListBookings};
use payloads::{Booking, BookingStatus, Role, User};

/// What the walkthrough saw along the way.
pub struct DevSession {
    pub signed_in_as: User,
    pub users: UsersView,
    pub added_user: User,
    pub bookings: BookingsView,
    pub pending_bookings: BookingsView,
    pub added_booking: Booking,
    pub settings_notice: Option<&'static str>,
}

impl DevSession {
    pub async fn run(ctx: &AppContext) -> Result<Self> {
        tracing::info!("🔑 Signing in");
        let mut login = LoginPage::new(ctx);
        login.email = "admin@example.com".into();
        login.password = "password".into();
        let signed_in_as = login.submit().await.context("login failed")?;

        tracing::info!("👥 Browsing users");
        let mut users_page = UsersPage::new(ctx);
        let users = users_page.render().await;
        users_page.open_dialog();
        {
            let form = users_page.form_mut();
            form.name = "Alice Example".into();
            form.email = "alice@example.com".into();
            form.role = Role::Moderator;
        }
        let added_user =
            users_page.add_user().await.context("adding a user failed")?;

        tracing::info!("📅 Browsing bookings");
        let mut bookings_page = BookingsPage::new(ctx);
        let bookings = bookings_page.render().await;
        bookings_page
            .set_status_filter(StatusFilter::Only(BookingStatus::Pending));
        let pending_bookings = bookings_page.render().await;

        let added_booking = use_bookings(ctx, ListBookings::default())
            .create_booking(&CreateBooking {
                user_id: added_user.id.clone(),
                date: "2024-03-01".into(),
                service: "Consultation".into(),
            })
            .await
            .context("adding a booking failed")?;

        tracing::info!("⚙️ Saving settings");
        let settings = SettingsPage::open(ctx).await;
        settings.update_profile().await;
        let settings_notice = settings.notice();

        tracing::info!("👋 Signing out");
        use_auth(ctx).logout().await.context("logout failed")?;

        Ok(Self {
            signed_in_as,
            users,
            added_user,
            bookings,
            pending_bookings,
            added_booking,
            settings_notice,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Session summary:");
        tracing::info!(
            "   Signed in as {} <{}> ({})",
            self.signed_in_as.name,
            self.signed_in_as.email,
            self.signed_in_as.role
        );
        tracing::info!("   Users listed: {}", self.users.list.items().len());
        tracing::info!(
            "   Added user {} with id {}",
            self.added_user.name,
            self.added_user.id
        );
        tracing::info!(
            "   Bookings listed: {} (pending filter: {})",
            self.bookings.list.items().len(),
            self.pending_bookings.list.items().len()
        );
        tracing::info!(
            "   Added booking {} for {} ({})",
            self.added_booking.id,
            self.added_booking.user_name,
            self.added_booking.status
        );
        if let Some(notice) = self.settings_notice {
            tracing::info!("   Settings: {notice}");
        }
    }
}
