use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use derive_more::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Route {
    #[display("/login")]
    Login,
    #[display("/dashboard")]
    Dashboard,
    #[display("/dashboard/users")]
    Users,
    #[display("/dashboard/bookings")]
    Bookings,
    #[display("/dashboard/settings")]
    Settings,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Login,
        Route::Dashboard,
        Route::Users,
        Route::Bookings,
        Route::Settings,
    ];

    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        Self::ALL
            .into_iter()
            .find(|route| route.to_string() == path)
    }

    /// Routes under the authenticated area.
    pub fn is_dashboard(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Sidebar entries of the dashboard layout, in display order.
pub const NAVIGATION: [(&str, Route); 4] = [
    ("Dashboard", Route::Dashboard),
    ("Users", Route::Users),
    ("Bookings", Route::Bookings),
    ("Settings", Route::Settings),
];

/// Records where the app has been told to go.
///
/// Stands in for the router: the data layer only ever pushes routes, and
/// whatever renders the app follows [`Navigator::current`].
#[derive(Clone, Default)]
pub struct Navigator {
    history: Arc<Mutex<Vec<Route>>>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    fn history_mut(&self) -> MutexGuard<'_, Vec<Route>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, route: Route) {
        tracing::info!(%route, "navigating");
        self.history_mut().push(route);
    }

    pub fn current(&self) -> Option<Route> {
        self.history_mut().last().copied()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history_mut().clone()
    }
}
