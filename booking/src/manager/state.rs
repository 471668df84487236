//! Manager state and the booking view model.

use crate::format;
use crate::types::{BookingRecord, BookingStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hours between now and a departure, fractional.
#[must_use]
pub fn hours_until(departure: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)] // second counts fit f64 comfortably
    let seconds = (departure - now).num_seconds() as f64;
    seconds / 3600.0
}

/// Refund tier by time remaining before departure.
///
/// More than 72 hours out refunds 75%, more than 24 hours 50%, anything
/// later nothing.
#[must_use]
pub fn refund_percentage(hours_before_departure: f64) -> u8 {
    if hours_before_departure > 72.0 {
        75
    } else if hours_before_departure > 24.0 {
        50
    } else {
        0
    }
}

/// A booking wrapped with the view data derived from it.
///
/// The backend record stays untouched inside; the wrapper holds only the
/// derived fields, so nothing ever collides with or shadows a backend
/// field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingView {
    /// The backend booking record
    pub record: BookingRecord,
    /// Departure date display string
    pub formatted_departure_date: String,
    /// Departure time display string
    pub formatted_departure_time: String,
    /// Arrival date display string
    pub formatted_arrival_date: String,
    /// Arrival time display string
    pub formatted_arrival_time: String,
    /// Cancellable: confirmed and departing more than 24 hours from now
    pub can_cancel: bool,
    /// Ticket downloadable: confirmed
    pub can_download: bool,
}

impl BookingView {
    /// Derive the view for a record as of `now`.
    #[must_use]
    pub fn derive(record: BookingRecord, now: DateTime<Utc>) -> Self {
        let hours_before = hours_until(record.flight.departure, now);
        let can_cancel = hours_before > 24.0 && record.status == BookingStatus::Confirmed;
        let can_download = record.status == BookingStatus::Confirmed;

        Self {
            formatted_departure_date: format::display_date(record.flight.departure),
            formatted_departure_time: format::display_time(record.flight.departure),
            formatted_arrival_date: format::display_date(record.flight.arrival),
            formatted_arrival_time: format::display_time(record.flight.arrival),
            can_cancel,
            can_download,
            record,
        }
    }

    /// Status badge class for the list row.
    #[must_use]
    pub const fn status_class(&self) -> &'static str {
        match self.record.status {
            BookingStatus::Confirmed => "status confirmed",
            BookingStatus::Cancelled => "status cancelled",
            BookingStatus::Reserved => "status reserved",
        }
    }
}

/// A cancellation awaiting user confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCancellation {
    /// Booking to cancel
    pub booking_id: String,
    /// Refund tier shown in the confirmation dialog
    pub refund_percentage: u8,
}

/// The full manager-screen state, disjoint from the wizard's.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerState {
    /// Lookup email
    pub email: String,
    /// Optional booking-reference narrowing filter
    pub reference_filter: String,
    /// Soft mutex: views disable destructive actions while set
    pub is_loading: bool,
    /// Lookup or cancellation error
    pub error_message: Option<String>,
    /// Bookings found for the email, wrapped with derived view data
    pub bookings: Vec<BookingView>,
    /// Cancellation awaiting confirmation, if any
    pub pending_cancellation: Option<PendingCancellation>,
    /// Success notice after a completed cancellation
    pub notice: Option<String>,
    /// Most recently generated ticket URL
    pub ticket_url: Option<String>,
}

impl ManagerState {
    /// Whether any bookings are shown.
    #[must_use]
    pub fn has_bookings(&self) -> bool {
        !self.bookings.is_empty()
    }

    /// Whether a lookup ran and found nothing.
    #[must_use]
    pub fn no_bookings_found(&self) -> bool {
        !self.is_loading && !self.email.is_empty() && self.bookings.is_empty()
    }
}
