use std::fmt;
use std::str::FromStr;

use payloads::requests::ListBookings;
use payloads::{Booking, BookingId, BookingStatus};

use super::{BadgeVariant, ListNotices, ListView, Pagination};
use crate::AppContext;
use crate::hooks::{BookingsHookReturn, use_bookings};
use crate::utils::{capitalize_first, format_date};

pub const BOOKINGS_PER_PAGE: u32 = 5;

const NOTICES: ListNotices = ListNotices {
    failed: "Failed to load bookings. Please try again later.",
    loading: "Loading bookings...",
    empty: "No bookings found",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BookingStatus),
}

impl StatusFilter {
    /// Choices of the status select, in display order.
    pub const OPTIONS: [StatusFilter; 5] = [
        StatusFilter::All,
        StatusFilter::Only(BookingStatus::Pending),
        StatusFilter::Only(BookingStatus::Confirmed),
        StatusFilter::Only(BookingStatus::Completed),
        StatusFilter::Only(BookingStatus::Cancelled),
    ];

    pub fn status(&self) -> Option<BookingStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(*status),
        }
    }

    pub fn label(&self) -> String {
        match self {
            StatusFilter::All => "All".into(),
            StatusFilter::Only(status) => capitalize_first(status.as_str()),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown booking status filter {0:?}")]
pub struct UnknownStatus(String);

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        BookingStatus::parse(s)
            .map(StatusFilter::Only)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

pub fn status_badge(status: BookingStatus) -> BadgeVariant {
    match status {
        BookingStatus::Confirmed => BadgeVariant::Default,
        BookingStatus::Completed => BadgeVariant::Secondary,
        BookingStatus::Pending => BadgeVariant::Outline,
        BookingStatus::Cancelled => BadgeVariant::Destructive,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingCard {
    pub id: BookingId,
    pub user_name: String,
    pub status: BookingStatus,
    pub status_label: String,
    pub badge: BadgeVariant,
    /// `service • date`
    pub description: String,
    /// `ID: #id`
    pub reference: String,
}

impl From<&Booking> for BookingCard {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.clone(),
            user_name: booking.user_name.clone(),
            status: booking.status,
            status_label: capitalize_first(booking.status.as_str()),
            badge: status_badge(booking.status),
            description: format!(
                "{} \u{2022} {}",
                booking.service,
                format_date(&booking.date)
            ),
            reference: format!("ID: #{}", booking.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingsView {
    pub status_filter: StatusFilter,
    pub list: ListView<BookingCard>,
    /// Present only when there is more than one page.
    pub pagination: Option<Pagination>,
}

impl BookingsView {
    pub fn range_label(&self) -> Option<String> {
        self.pagination.map(|pagination| pagination.label("bookings"))
    }
}

/// Paged booking list with a status filter.
pub struct BookingsPage {
    ctx: AppContext,
    status_filter: StatusFilter,
    page: u32,
}

impl BookingsPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            status_filter: StatusFilter::All,
            page: 1,
        }
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    /// The current page is kept when the filter changes.
    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn go_to_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Parameters the list is read with.
    pub fn params(&self) -> ListBookings {
        ListBookings {
            page: Some(self.page),
            limit: Some(BOOKINGS_PER_PAGE),
            status: self.status_filter.status(),
            search: None,
        }
    }

    pub async fn render(&self) -> BookingsView {
        let hook = use_bookings(&self.ctx, self.params());
        let state = hook.load().await;
        self.view(state)
    }

    pub fn view(&self, state: BookingsHookReturn) -> BookingsView {
        let pagination =
            Pagination::new(self.page, BOOKINGS_PER_PAGE, state.total);
        let cards = state.bookings.iter().map(BookingCard::from).collect();
        BookingsView {
            status_filter: self.status_filter,
            list: ListView::build(
                &NOTICES,
                state.error.as_ref(),
                state.is_loading,
                cards,
            ),
            pagination: pagination.is_visible().then_some(pagination),
        }
    }

    /// Step back using the pagination of the last rendered view.
    pub fn previous_page(&mut self, view: &BookingsView) {
        if let Some(pagination) = view.pagination {
            self.page = pagination.previous_page();
        }
    }

    /// Step forward using the pagination of the last rendered view.
    pub fn next_page(&mut self, view: &BookingsView) {
        if let Some(pagination) = view.pagination {
            self.page = pagination.next_page();
        }
    }
}
