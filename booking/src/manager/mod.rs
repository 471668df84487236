//! The booking-management screen.
//!
//! Independent of the wizard: looks up prior bookings by email (optionally
//! narrowed to one reference), derives cancellation and download
//! eligibility from the departure time, and drives cancellation through
//! the refund call.
//!
//! The remote refund is the sole source of truth for cancellation — the
//! local booking only flips to cancelled after the refund succeeds, and a
//! failed refund leaves it untouched.

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod state;

pub use actions::ManagerAction;
pub use environment::ManagerEnvironment;
pub use reducer::ManagerReducer;
pub use state::{BookingView, ManagerState, PendingCancellation, hours_until, refund_percentage};
