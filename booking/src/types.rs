//! Domain types for the booking controllers.
//!
//! This module contains the search criteria, the provider wire shapes for
//! search results, the normalized flight offer, passenger forms, fares,
//! and the backend booking records consumed by the manager screen.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Search criteria
// ============================================================================

/// Whether the journey is one way or a round trip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripType {
    /// Single outbound journey
    #[default]
    OneWay,
    /// Outbound plus return journey
    RoundTrip,
}

/// The search form: route, dates, and passenger counts.
///
/// Invariants enforced by the wizard's search gate: origin and destination
/// are non-empty and differ, and a departure date is present. For round
/// trips the return date is clamped forward whenever the departure date
/// moves past it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// One way or round trip
    pub trip_type: TripType,
    /// Origin airport code
    pub origin: String,
    /// Destination airport code
    pub destination: String,
    /// Outbound date
    pub departure_date: Option<NaiveDate>,
    /// Return date (round trips only)
    pub return_date: Option<NaiveDate>,
    /// Adult passengers (at least one)
    pub adults: u32,
    /// Child passengers
    pub children: u32,
    /// Infant passengers (lap-held, no seat of their own)
    pub infants: u32,
}

impl SearchCriteria {
    /// Total travellers across all age bands.
    #[must_use]
    pub const fn total_passengers(&self) -> u32 {
        self.adults + self.children + self.infants
    }

    /// Seats that must be chosen on the seat map.
    ///
    /// Infants travel on an adult's lap and never occupy a seat.
    #[must_use]
    pub const fn required_seats(&self) -> u32 {
        self.adults + self.children
    }
}

// ============================================================================
// Provider wire shapes (search results as returned by the flight provider)
// ============================================================================

/// Raw search response: a batch of offers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOfferBatch {
    /// The offers in provider shape
    pub data: Vec<RawOffer>,
}

/// One raw offer: itineraries plus pricing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawOffer {
    /// Provider offer id
    pub id: String,
    /// Journey options; the first itinerary is the one shown
    pub itineraries: Vec<RawItinerary>,
    /// Offer pricing
    pub price: RawPrice,
}

/// A journey option made of one or more non-stop segments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawItinerary {
    /// Non-stop hops in travel order
    pub segments: Vec<RawSegment>,
}

/// One non-stop hop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegment {
    /// Flight number
    pub number: String,
    /// Operating carrier code
    pub carrier_code: String,
    /// Departure endpoint
    pub departure: RawEndpoint,
    /// Arrival endpoint
    pub arrival: RawEndpoint,
}

/// Airport plus timestamp for one end of a segment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEndpoint {
    /// IATA airport code
    pub iata_code: String,
    /// RFC 3339 timestamp
    pub at: String,
}

/// Offer pricing, decimal strings as sent on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPrice {
    /// Base fare per passenger
    pub base: String,
    /// Total including taxes and fees
    pub grand_total: String,
}

// ============================================================================
// Normalized flight offer
// ============================================================================

/// A flight offer after normalization, immutable once produced.
///
/// Display strings are derived from the source timestamps at normalization
/// time and are never recomputed, so they cannot drift from them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    /// Provider offer id
    pub id: String,
    /// Flight number of the first segment
    pub flight_number: String,
    /// Origin airport code
    pub origin: String,
    /// Destination airport code
    pub destination: String,
    /// Departure of the first segment
    pub departure: DateTime<Utc>,
    /// Arrival of the last segment
    pub arrival: DateTime<Utc>,
    /// Departure date display string
    pub departure_date: String,
    /// Departure time display string
    pub departure_time: String,
    /// Arrival time display string
    pub arrival_time: String,
    /// Total travel time in minutes
    pub duration_minutes: i64,
    /// Travel time display string, `"{h}h {m}m"`
    pub duration: String,
    /// Intermediate stops (segments minus one)
    pub stops: usize,
    /// Total price including taxes and fees
    pub price: f64,
    /// Base fare per passenger
    pub base_price: f64,
    /// Carrier code of the first segment
    pub airline: String,
}

// ============================================================================
// Passengers
// ============================================================================

/// Age band of a seat-holding passenger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassengerType {
    /// Adult passenger
    Adult,
    /// Child passenger
    Child,
}

impl fmt::Display for PassengerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adult => write!(f, "adult"),
            Self::Child => write!(f, "child"),
        }
    }
}

/// Editable field of a passenger form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassengerField {
    /// Full name
    Name,
    /// Contact email
    Email,
    /// Contact phone number
    Phone,
    /// Meal preference
    MealPreference,
}

/// One passenger's details, one form per seat holder.
///
/// Forms are regenerated fresh whenever the seat step completes, so edits
/// do not survive going back and changing passenger counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerForm {
    /// Form id, `"adult-0"`, `"child-1"`, …
    pub id: String,
    /// Adult or child
    pub passenger_type: PassengerType,
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Meal preference, defaults to `"regular"`
    pub meal_preference: String,
}

impl PassengerForm {
    /// Create an empty form for the given age band and index.
    #[must_use]
    pub fn empty(passenger_type: PassengerType, index: usize) -> Self {
        Self {
            id: format!("{passenger_type}-{index}"),
            passenger_type,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            meal_preference: "regular".to_string(),
        }
    }
}

/// Passenger entry sent to the backend when registering passengers on a
/// booking, paired with the seat assigned to them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerManifestEntry {
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Assigned seat id, empty when no seat was selected for this index
    pub seat_number: String,
}

// ============================================================================
// Fare
// ============================================================================

/// Fare totals for the selected flight and passenger count.
///
/// Each component is rounded to two decimals as it is computed — base
/// first, then taxes, then the total — so the numbers shown always add up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FareBreakdown {
    /// Base fare times total passengers
    pub base_fare_total: f64,
    /// Taxes and fees, 15% of the base fare total
    pub taxes_and_fees: f64,
    /// Amount charged
    pub total_amount: f64,
}

impl FareBreakdown {
    /// Base fare total rendered with two decimals.
    #[must_use]
    pub fn base_fare_display(&self) -> String {
        format!("{:.2}", self.base_fare_total)
    }

    /// Taxes and fees rendered with two decimals.
    #[must_use]
    pub fn taxes_display(&self) -> String {
        format!("{:.2}", self.taxes_and_fees)
    }

    /// Total amount rendered with two decimals.
    #[must_use]
    pub fn total_display(&self) -> String {
        format!("{:.2}", self.total_amount)
    }
}

// ============================================================================
// Payment intent
// ============================================================================

/// Processor handshake token for an authorized-but-unconfirmed charge.
///
/// Obtained before card confirmation and consumed exactly once per
/// successful payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Secret handed to the card-confirmation call
    pub client_secret: String,
    /// Processor-side intent id, used as the payment token when finalizing
    pub payment_intent_id: String,
}

// ============================================================================
// Bookings (manager screen)
// ============================================================================

/// Lifecycle status of a booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Created but not paid
    Reserved,
    /// Paid and ticketable
    Confirmed,
    /// Cancelled, possibly with a partial refund
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reserved => write!(f, "Reserved"),
            Self::Confirmed => write!(f, "Confirmed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Flight details attached to a booking record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookedFlight {
    /// Flight number
    pub flight_number: String,
    /// Origin airport code
    pub origin: String,
    /// Destination airport code
    pub destination: String,
    /// Scheduled departure
    pub departure: DateTime<Utc>,
    /// Scheduled arrival
    pub arrival: DateTime<Utc>,
}

/// A booking as returned by the backend.
///
/// Never deleted client-side; cancellation only flips the status after the
/// remote refund succeeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Backend booking id
    pub id: String,
    /// Human-facing booking reference
    pub reference: String,
    /// Current status
    pub status: BookingStatus,
    /// Payment to refund on cancellation
    pub payment_id: String,
    /// The booked flight
    pub flight: BookedFlight,
    /// Amount paid
    pub total_amount: f64,
}

/// Booking id plus reference returned when a booking is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBooking {
    /// Backend booking id
    pub id: String,
    /// Human-facing booking reference
    pub reference: String,
}
