//! The six-step booking wizard.
//!
//! ```text
//! search ──► select ──► seats ──► passengers ──► payment ──► confirmation
//!              ▲◄─────────┘▲◄──────────┘▲◄───────────┘              │
//!              └──── backward transitions ────┘                     │
//! search ◄──────────────────── full reset ◄─────────────────────────┘
//! ```
//!
//! Each forward transition passes a validation gate; a failed gate sets a
//! user-visible error and stays put. Remote calls run as effects, and
//! their completion actions move the machine forward — including the
//! strictly-ordered payment sequence:
//!
//! 1. create the booking,
//! 2. register passengers with their seat assignments,
//! 3. confirm the card payment with the processor,
//! 4. finalize the payment server-side.
//!
//! A failure at any step aborts the sequence and stays on the payment
//! step. Records already created server-side by earlier steps are not
//! compensated; retrying starts the sequence from the top.

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod state;
#[cfg(test)]
mod tests;

pub use actions::WizardAction;
pub use environment::WizardEnvironment;
pub use reducer::WizardReducer;
pub use state::{PaymentPhase, WizardState, WizardStep};
