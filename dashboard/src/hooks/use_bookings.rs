use payloads::requests::{CreateBooking, ListBookings, UpdateBooking};
use payloads::{Booking, BookingId, Page};

use crate::hooks::MutationState;
use crate::{AppContext, QueryError, QueryKey};

/// Cache resource every booking list is stored under.
pub const BOOKINGS: &str = "bookings";

pub fn bookings_key(params: &ListBookings) -> QueryKey {
    QueryKey::new(BOOKINGS, params)
}

/// What a bookings view renders from.
#[derive(Debug, Default)]
pub struct BookingsHookReturn {
    pub bookings: Vec<Booking>,
    pub total: u64,
    /// Loading with nothing cached yet.
    pub is_loading: bool,
    pub error: Option<QueryError>,
    pub is_creating: bool,
    pub is_updating: bool,
    pub is_deleting: bool,
}

/// The booking list for one set of parameters, plus the booking writes.
#[derive(Clone)]
pub struct BookingsHook {
    ctx: AppContext,
    params: ListBookings,
    key: QueryKey,
    creating: MutationState,
    updating: MutationState,
    deleting: MutationState,
}

pub fn use_bookings(ctx: &AppContext, params: ListBookings) -> BookingsHook {
    BookingsHook {
        ctx: ctx.clone(),
        key: bookings_key(&params),
        params,
        creating: MutationState::default(),
        updating: MutationState::default(),
        deleting: MutationState::default(),
    }
}

impl BookingsHook {
    pub fn params(&self) -> &ListBookings {
        &self.params
    }

    /// Read the list, from cache when fresh.
    pub async fn load(&self) -> BookingsHookReturn {
        let client = self.ctx.client.clone();
        let params = self.params.clone();
        let result = self
            .ctx
            .queries
            .fetch(self.key.clone(), move || async move {
                client.list_bookings(&params).await
            })
            .await;
        self.settled(result)
    }

    /// Read the list again regardless of freshness.
    pub async fn refetch(&self) -> BookingsHookReturn {
        let client = self.ctx.client.clone();
        let params = self.params.clone();
        let result = self
            .ctx
            .queries
            .refetch(self.key.clone(), move || async move {
                client.list_bookings(&params).await
            })
            .await;
        self.settled(result)
    }

    /// Current state without touching the network.
    pub fn snapshot(&self) -> BookingsHookReturn {
        let state = self.ctx.queries.state::<Page<Booking>>(&self.key);
        let (bookings, total) = state
            .data
            .as_deref()
            .map(|page| (page.data.clone(), page.total))
            .unwrap_or_default();
        BookingsHookReturn {
            bookings,
            total,
            is_loading: state.is_initial_loading(),
            error: state.error,
            is_creating: self.creating.is_pending(),
            is_updating: self.updating.is_pending(),
            is_deleting: self.deleting.is_pending(),
        }
    }

    fn settled(
        &self,
        result: Result<std::sync::Arc<Page<Booking>>, QueryError>,
    ) -> BookingsHookReturn {
        let mut view = self.snapshot();
        match result {
            Ok(page) => {
                view.bookings = page.data.clone();
                view.total = page.total;
                view.error = None;
            }
            Err(e) => view.error = Some(e),
        }
        view
    }

    pub async fn create_booking(
        &self,
        details: &CreateBooking,
    ) -> Result<Booking, QueryError> {
        let booking = self
            .creating
            .run(self.ctx.client.create_booking(details))
            .await?;
        tracing::info!(booking_id = %booking.id, "created booking");
        self.ctx.queries.invalidate(BOOKINGS);
        Ok(booking)
    }

    pub async fn update_booking(
        &self,
        booking_id: &BookingId,
        details: &UpdateBooking,
    ) -> Result<Booking, QueryError> {
        let booking = self
            .updating
            .run(self.ctx.client.update_booking(booking_id, details))
            .await?;
        tracing::info!(%booking_id, "updated booking");
        self.ctx.queries.invalidate(BOOKINGS);
        Ok(booking)
    }

    pub async fn delete_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<(), QueryError> {
        self.deleting
            .run(self.ctx.client.delete_booking(booking_id))
            .await?;
        tracing::info!(%booking_id, "deleted booking");
        self.ctx.queries.invalidate(BOOKINGS);
        Ok(())
    }

    pub fn create_error(&self) -> Option<QueryError> {
        self.creating.error()
    }
}
