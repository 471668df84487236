//! Wizard state: one serializable struct owning everything the six steps
//! show and edit.

use crate::seatmap::{SeatId, SeatMap};
use crate::types::{
    FareBreakdown, FlightOffer, PassengerForm, PaymentIntent, SearchCriteria, TripType,
};
use crate::validate;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The wizard's current step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    /// Search form
    #[default]
    Search,
    /// Flight selection with filters and sorting
    Select,
    /// Seat map
    Seats,
    /// Passenger forms
    Passengers,
    /// Fare summary, terms, and card input
    Payment,
    /// Booking reference and ticket actions
    Confirmation,
}

impl WizardStep {
    /// All steps in flow order.
    pub const ALL: [Self; 6] = [
        Self::Search,
        Self::Select,
        Self::Seats,
        Self::Passengers,
        Self::Payment,
        Self::Confirmation,
    ];

    /// Position of this step in the flow.
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|step| *step == self).unwrap_or(0)
    }
}

/// Named step of the payment sequence.
///
/// The sequence is a strict chain: each phase is entered when the previous
/// step's completion action arrives, and a failure at any phase returns to
/// `Idle` with the error surfaced. Compensation of steps that already
/// completed server-side is intentionally absent; a retry restarts the
/// chain from `CreatingBooking`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentPhase {
    /// No payment in flight
    #[default]
    Idle,
    /// Creating the booking record
    CreatingBooking,
    /// Registering passengers on the booking
    RegisteringPassengers,
    /// Confirming the card payment with the processor
    ConfirmingCard,
    /// Finalizing the payment server-side
    Finalizing,
    /// Payment complete
    Settled,
}

/// The full wizard state.
///
/// Owned exclusively by the wizard's reducer; views derive everything they
/// render from this struct and never mutate it directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    /// Current step
    pub step: WizardStep,
    /// Soft mutex: views disable destructive actions while set
    pub is_loading: bool,
    /// Step-level validation or remote-call error
    pub error_message: Option<String>,
    /// Today's date, captured at construction and reused on reset
    pub today: NaiveDate,

    /// The search form
    pub search: SearchCriteria,

    /// Normalized offers currently shown (already filtered and sorted)
    pub available_flights: Vec<FlightOffer>,
    /// Price cap filter
    pub price_filter: f64,
    /// Current sort key (`"price"`, `"duration"`, `"departure"`)
    pub sort_option: String,
    /// Checked airline filters
    pub selected_airlines: Vec<String>,
    /// The chosen offer
    pub selected_flight: Option<FlightOffer>,

    /// Synthesized cabin for the chosen offer
    pub seat_map: SeatMap,
    /// Chosen seats in selection order
    pub selected_seats: Vec<SeatId>,
    /// Seats that must be chosen (adults + children)
    pub required_seats: u32,

    /// One form per seat holder
    pub passenger_forms: Vec<PassengerForm>,

    /// Fare for the chosen flight and passenger count
    pub fare: Option<FareBreakdown>,
    /// Processor handshake token, consumed by a successful payment
    pub payment_intent: Option<PaymentIntent>,
    /// Whether the card-input element is mounted
    pub card_mounted: bool,
    /// Whether the terms checkbox is ticked
    pub terms_accepted: bool,
    /// Whether the terms modal is open
    pub show_terms: bool,
    /// Card-input or payment-sequence error
    pub payment_error: Option<String>,
    /// Progress through the payment sequence
    pub payment_phase: PaymentPhase,

    /// Backend booking id, set as soon as the booking is created
    pub booking_id: Option<String>,
    /// Human-facing booking reference
    pub booking_reference: Option<String>,
    /// Generated ticket URL
    pub ticket_url: Option<String>,
}

impl WizardState {
    /// Fresh wizard state; dates default to today and tomorrow.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::initial(now.date_naive())
    }

    fn initial(today: NaiveDate) -> Self {
        Self {
            step: WizardStep::Search,
            is_loading: false,
            error_message: None,
            today,
            search: SearchCriteria {
                trip_type: TripType::OneWay,
                origin: String::new(),
                destination: String::new(),
                departure_date: Some(today),
                return_date: Some(today + Duration::days(1)),
                adults: 1,
                children: 0,
                infants: 0,
            },
            available_flights: Vec::new(),
            price_filter: 1000.0,
            sort_option: "price".to_string(),
            selected_airlines: vec!["indigo".to_string(), "other".to_string()],
            selected_flight: None,
            seat_map: SeatMap::default(),
            selected_seats: Vec::new(),
            required_seats: 1,
            passenger_forms: Vec::new(),
            fare: None,
            payment_intent: None,
            card_mounted: false,
            terms_accepted: false,
            show_terms: false,
            payment_error: None,
            payment_phase: PaymentPhase::Idle,
            booking_id: None,
            booking_reference: None,
            ticket_url: None,
        }
    }

    /// Full reset back to the search step.
    ///
    /// Filter settings (price cap, airlines, sort) survive the reset;
    /// everything else returns to its initial value.
    pub fn reset(&mut self) {
        let price_filter = self.price_filter;
        let sort_option = std::mem::take(&mut self.sort_option);
        let selected_airlines = std::mem::take(&mut self.selected_airlines);

        *self = Self::initial(self.today);
        self.search.return_date = None;
        self.price_filter = price_filter;
        self.sort_option = sort_option;
        self.selected_airlines = selected_airlines;
    }

    /// Total travellers across all age bands.
    #[must_use]
    pub const fn total_passengers(&self) -> u32 {
        self.search.total_passengers()
    }

    /// Whether the select step has nothing to show.
    #[must_use]
    pub fn no_flights_available(&self) -> bool {
        self.available_flights.is_empty() && !self.is_loading
    }

    /// Whether fewer seats are selected than required.
    #[must_use]
    pub fn insufficient_seats_selected(&self) -> bool {
        self.selected_seats.len() < self.required_seats as usize
    }

    /// Whether any passenger form is incomplete or has an invalid email.
    #[must_use]
    pub fn invalid_passenger_data(&self) -> bool {
        if self.passenger_forms.is_empty() {
            return true;
        }

        self.passenger_forms.iter().any(|passenger| {
            passenger.name.is_empty()
                || passenger.email.is_empty()
                || passenger.phone.is_empty()
                || !validate::is_valid_email(&passenger.email)
        })
    }

    /// Selected seats joined for display, e.g. `"12A, 12B"`.
    #[must_use]
    pub fn selected_seats_string(&self) -> String {
        self.selected_seats
            .iter()
            .map(crate::seatmap::SeatId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether the pay button should be disabled.
    #[must_use]
    pub const fn payment_button_disabled(&self) -> bool {
        !self.terms_accepted || !self.card_mounted
    }

    /// Email of the lead passenger, used for billing and ticket delivery.
    #[must_use]
    pub fn main_passenger_email(&self) -> &str {
        self.passenger_forms
            .first()
            .map_or("", |passenger| passenger.email.as_str())
    }

    /// Progress-bar class for a step: active, completed, or upcoming.
    #[must_use]
    pub fn step_class(&self, step: WizardStep) -> &'static str {
        if step == self.step {
            "step active"
        } else if step.index() < self.step.index() {
            "step completed"
        } else {
            "step"
        }
    }
}
