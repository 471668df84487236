//! Manager actions.

use crate::types::BookingRecord;
use serde::{Deserialize, Serialize};

/// All manager-screen inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ManagerAction {
    /// Edit the lookup email
    SetEmail {
        /// New email
        value: String,
    },
    /// Edit the optional reference filter
    SetReferenceFilter {
        /// New reference
        value: String,
    },
    /// Validate the email and fetch the booking history
    SubmitLookup,
    /// Event: booking history arrived
    LookupSucceeded {
        /// Backend booking records
        bookings: Vec<BookingRecord>,
    },
    /// Event: booking history lookup failed
    LookupFailed {
        /// User-facing message
        message: String,
    },

    /// Ask to cancel a booking; computes the refund tier for the dialog
    RequestCancellation {
        /// Booking to cancel
        booking_id: String,
    },
    /// Close the cancellation dialog without cancelling
    DismissCancellation,
    /// Confirm the pending cancellation and process the refund
    ConfirmCancellation,
    /// Event: refund processed, booking is cancelled
    RefundSucceeded {
        /// The cancelled booking
        booking_id: String,
    },
    /// Event: refund failed; the booking stays as it was
    RefundFailed {
        /// User-facing message
        message: String,
    },

    /// Generate and fetch the ticket for a booking
    DownloadTicket {
        /// Booking id
        booking_id: String,
    },
    /// Event: ticket URL ready
    TicketReady {
        /// Ticket URL
        url: String,
    },
    /// Event: ticket generation failed
    TicketFailed {
        /// User-facing message
        message: String,
    },
}
