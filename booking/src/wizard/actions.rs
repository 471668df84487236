//! Wizard actions: every input the wizard can receive.
//!
//! Actions unify user events (field edits, clicks) with the completion
//! events of remote calls — both go through the same reducer.

use crate::seatmap::SeatId;
use crate::types::{PassengerField, PaymentIntent, RawOfferBatch, TripType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// All wizard inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WizardAction {
    // ----- search form -----
    /// Set one way / round trip
    SetTripType {
        /// New trip type
        trip_type: TripType,
    },
    /// Edit the origin airport code
    SetOrigin {
        /// New origin
        value: String,
    },
    /// Edit the destination airport code
    SetDestination {
        /// New destination
        value: String,
    },
    /// Edit the departure date; clamps the return date forward for round
    /// trips
    SetDepartureDate {
        /// New departure date
        date: Option<NaiveDate>,
    },
    /// Edit the return date
    SetReturnDate {
        /// New return date
        date: Option<NaiveDate>,
    },
    /// Edit the adult count (floors at one)
    SetAdults {
        /// New count
        count: u32,
    },
    /// Edit the child count
    SetChildren {
        /// New count
        count: u32,
    },
    /// Edit the infant count (never affects required seats)
    SetInfants {
        /// New count
        count: u32,
    },
    /// Validate the form and search flights
    SubmitSearch,
    /// Event: search results arrived
    SearchSucceeded {
        /// Raw provider batch
        batch: RawOfferBatch,
    },
    /// Event: search failed
    SearchFailed {
        /// User-facing message
        message: String,
    },

    // ----- flight selection -----
    /// Change the price cap and re-filter
    SetPriceFilter {
        /// New price cap
        max_price: f64,
    },
    /// Check or uncheck an airline filter and re-filter
    ToggleAirline {
        /// Airline key (`"indigo"`, `"other"`)
        airline: String,
        /// Checkbox state
        checked: bool,
    },
    /// Change the sort key and re-sort
    SetSortOption {
        /// Sort key; unknown keys leave the order unchanged
        option: String,
    },
    /// Choose an offer and move to the seat map
    SelectFlight {
        /// Offer id
        flight_id: String,
    },

    // ----- seat selection -----
    /// Toggle a seat's selection
    ToggleSeat {
        /// Seat id
        seat_id: SeatId,
    },
    /// Back to the flight list
    BackToFlights,
    /// Validate seat count and move to passenger forms
    ContinueToPassengers,

    // ----- passenger forms -----
    /// Edit one field of one passenger form
    SetPassengerField {
        /// Form index
        index: usize,
        /// Which field
        field: PassengerField,
        /// New value
        value: String,
    },
    /// Back to the seat map
    BackToSeats,
    /// Validate passengers, compute the fare, and move to payment
    ContinueToPayment,
    /// Event: payment intent created
    PaymentIntentReady {
        /// The intent
        intent: PaymentIntent,
    },
    /// Event: payment intent creation failed
    PaymentIntentFailed,
    /// Event: card-input element mounted
    CardMounted,
    /// Event: card-input element could not be mounted
    CardMountFailed {
        /// Processor message
        message: String,
    },
    /// Event: card element validity changed while typing
    CardInputChanged {
        /// Current input error, `None` once valid
        error: Option<String>,
    },

    // ----- payment -----
    /// Back to the passenger forms
    BackToPassengers,
    /// Open the terms modal
    ShowTerms,
    /// Close the terms modal
    CloseTerms,
    /// Accept the terms from the modal
    AcceptTerms,
    /// Tick or untick the terms checkbox
    SetTermsAccepted {
        /// Checkbox state
        accepted: bool,
    },
    /// Run the payment sequence
    SubmitPayment,
    /// Event: booking record created (sequence step 1)
    BookingCreated {
        /// Backend booking id
        booking_id: String,
        /// Human-facing reference
        reference: String,
    },
    /// Event: passengers registered (sequence step 2)
    PassengersRegistered,
    /// Event: card payment confirmed by the processor (sequence step 3)
    CardPaymentConfirmed,
    /// Event: payment finalized server-side (sequence step 4)
    PaymentFinalized,
    /// Event: a payment-sequence step failed
    PaymentStepFailed {
        /// User-facing message
        message: String,
    },

    // ----- confirmation -----
    /// Generate and fetch the ticket
    DownloadTicket,
    /// Event: ticket URL ready
    TicketReady {
        /// Ticket URL
        url: String,
    },
    /// Event: ticket generation failed
    TicketFailed,
    /// Reset everything and return to the search step
    ReturnToSearch,
}
