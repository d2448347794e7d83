pub mod use_auth;
pub mod use_bookings;
pub mod use_mutation;
pub mod use_users;

pub use use_auth::{AuthHook, AuthHookReturn, use_auth};
pub use use_bookings::{BookingsHook, BookingsHookReturn, use_bookings};
pub use use_mutation::MutationState;
pub use use_users::{UsersHook, UsersHookReturn, use_users};
