//! Skybook Booking - flight booking wizard and booking management
//!
//! This crate implements two independent screen controllers on top of the
//! Skybook reducer architecture:
//!
//! - **Booking wizard** ([`wizard`]): the six-step flow
//!   search → select → seats → passengers → payment → confirmation, with
//!   validation gates between steps and a strictly-ordered payment
//!   sequence against the backend gateway and the payment processor.
//! - **Booking manager** ([`manager`]): looks up prior bookings by email,
//!   derives cancellation/refund eligibility, and drives cancellation and
//!   ticket retrieval.
//!
//! # Architecture
//!
//! ```text
//! UI events ──► WizardAction ──► WizardReducer ──► Effects (remote calls)
//!                                     │                   │
//!                                     ▼                   ▼
//!                               WizardState ◄── completion actions
//!                                     │
//!                                     ▼
//!                         pipeline / seatmap / fare
//!                        (pure derived-data functions)
//! ```
//!
//! Both controllers own disjoint state trees and never share mutable data;
//! everything derived (normalized offers, seat maps, fares, booking views)
//! flows through the pure functions in [`pipeline`], [`seatmap`],
//! [`format`], and [`validate`].
//!
//! The external world enters only through two traits: [`gateway::BackendGateway`]
//! (platform remote procedures) and [`payment::PaymentProcessor`] (the
//! card-input and confirmation capability). Development mocks for both live
//! beside the traits.

pub mod format;
pub mod gateway;
pub mod manager;
pub mod payment;
pub mod pipeline;
pub mod seatmap;
pub mod types;
pub mod validate;
pub mod wizard;

pub use gateway::{BackendGateway, GatewayError, MockBackendGateway};
pub use payment::{MockPaymentProcessor, PaymentError, PaymentProcessor};
pub use types::{
    BookingRecord, BookingStatus, FareBreakdown, FlightOffer, PassengerForm, PaymentIntent,
    SearchCriteria, TripType,
};
