//! Framework-independent models of the dashboard pages.
//!
//! Each page owns its form and filter state, reads through the hooks and
//! produces the data a renderer would draw.

pub mod bookings;
pub mod login;
pub mod pagination;
pub mod settings;
pub mod users;

pub use bookings::{BookingCard, BookingsPage, BookingsView, StatusFilter};
pub use login::LoginPage;
pub use pagination::Pagination;
pub use settings::{NotificationPreferences, ProfileForm, SettingsPage};
pub use users::{NewUserForm, UserRow, UsersPage, UsersView};

use crate::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeVariant {
    Default,
    Secondary,
    Outline,
    Destructive,
}

/// What the list area of a page shows, with the notice text where there is
/// one.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView<T> {
    Failed(&'static str),
    Loading(&'static str),
    Empty(&'static str),
    Items(Vec<T>),
}

/// Notices for one kind of list.
struct ListNotices {
    failed: &'static str,
    loading: &'static str,
    empty: &'static str,
}

impl<T> ListView<T> {
    /// A failed read wins over everything, then loading, then emptiness.
    fn build(
        notices: &ListNotices,
        error: Option<&QueryError>,
        is_loading: bool,
        items: Vec<T>,
    ) -> Self {
        if let Some(e) = error {
            tracing::debug!(error = %e, "list read failed");
            ListView::Failed(notices.failed)
        } else if is_loading {
            ListView::Loading(notices.loading)
        } else if items.is_empty() {
            ListView::Empty(notices.empty)
        } else {
            ListView::Items(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListView::Items(items) => items,
            _ => &[],
        }
    }
}
