//! Backend gateway: the platform remote procedures behind the screens.
//!
//! The controllers never talk to the network directly; every remote call
//! goes through [`BackendGateway`], so the whole flow runs against
//! [`MockBackendGateway`] in development and tests.

use crate::types::{
    BookedFlight, BookingRecord, BookingStatus, CreatedBooking, PassengerManifestEntry,
    PaymentIntent, RawEndpoint, RawItinerary, RawOffer, RawOfferBatch, RawPrice, RawSegment,
    SearchCriteria,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Boxed future returned by gateway calls.
pub type GatewayFuture<T> = Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send>>;

/// Failure of a gateway call.
///
/// The platform returns a structured error body for service-level
/// failures; transport failures only carry the raw error text. Either way
/// [`GatewayError::user_message`] yields the text to show the user.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Structured error body returned by the platform service
    #[error("{message}")]
    Service {
        /// The error body's message text
        message: String,
    },

    /// Transport-level failure without a structured body
    #[error("{message}")]
    Transport {
        /// Raw error text
        message: String,
    },
}

impl GatewayError {
    /// The message to surface to the user: the structured body text when
    /// present, otherwise the raw error text.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Service { message } | Self::Transport { message } => message,
        }
    }
}

/// Remote procedures for search, booking, payment, and refunds.
///
/// All methods take owned arguments and return boxed `Send` futures so
/// reducers can hand them to the store runtime as effects.
pub trait BackendGateway: Send + Sync {
    /// Search flights for the given criteria.
    ///
    /// # Errors
    ///
    /// Returns an error when the search service fails.
    fn search_flights(&self, criteria: SearchCriteria) -> GatewayFuture<RawOfferBatch>;

    /// Create a booking for a flight; yields the booking id and reference.
    ///
    /// # Errors
    ///
    /// Returns an error when the booking cannot be created.
    fn create_booking(&self, flight_id: String, total_amount: f64) -> GatewayFuture<CreatedBooking>;

    /// Register passengers (with their seat assignments) on a booking.
    ///
    /// # Errors
    ///
    /// Returns an error when passenger registration fails.
    fn add_passengers(
        &self,
        booking_id: String,
        passengers: Vec<PassengerManifestEntry>,
    ) -> GatewayFuture<()>;

    /// Finalize payment server-side after card confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error when the payment record cannot be finalized.
    fn process_payment(
        &self,
        booking_id: String,
        payment_token: String,
        amount: f64,
    ) -> GatewayFuture<()>;

    /// Generate a downloadable ticket; yields its URL.
    ///
    /// # Errors
    ///
    /// Returns an error when ticket generation fails.
    fn generate_ticket(&self, booking_id: String) -> GatewayFuture<String>;

    /// Fetch all bookings associated with an email address.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup fails.
    fn get_booking_history(&self, email: String) -> GatewayFuture<Vec<BookingRecord>>;

    /// Create a payment intent for the given amount.
    ///
    /// # Errors
    ///
    /// Returns an error when the intent cannot be created.
    fn create_payment_intent(&self, amount: f64, currency: String) -> GatewayFuture<PaymentIntent>;

    /// Record a processor-confirmed payment server-side.
    ///
    /// # Errors
    ///
    /// Returns an error when the confirmation cannot be recorded.
    fn confirm_payment_success(&self, payment_intent_id: String) -> GatewayFuture<()>;

    /// Refund a payment as part of cancelling a booking.
    ///
    /// # Errors
    ///
    /// Returns an error when the refund fails; the caller leaves the
    /// booking untouched in that case.
    fn process_refund(&self, payment_id: String) -> GatewayFuture<()>;
}

// ============================================================================
// Development mock
// ============================================================================

/// In-memory gateway for development and tests.
///
/// Search returns a canned three-offer batch pinned to the requested
/// departure date; booking creation hands out uuid-based ids and
/// references; everything else succeeds after a short simulated delay.
pub struct MockBackendGateway {
    bookings: Mutex<Vec<BookingRecord>>,
}

impl MockBackendGateway {
    /// Create a mock gateway with an empty booking history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock gateway whose booking history is preloaded.
    #[must_use]
    pub fn with_bookings(bookings: Vec<BookingRecord>) -> Self {
        Self {
            bookings: Mutex::new(bookings),
        }
    }

    /// Creates an Arc-wrapped instance for sharing.
    #[must_use]
    pub fn shared() -> Arc<dyn BackendGateway> {
        Arc::new(Self::new())
    }

    fn offers_for(criteria: &SearchCriteria) -> RawOfferBatch {
        let date = criteria.departure_date.unwrap_or_else(|| Utc::now().date_naive());
        let origin = criteria.origin.clone();
        let destination = criteria.destination.clone();

        let direct = |id: &str, number: &str, carrier: &str, dep_h, arr_h, arr_m, base: &str, total: &str| RawOffer {
            id: id.to_string(),
            itineraries: vec![RawItinerary {
                segments: vec![segment(number, carrier, &origin, at(date, dep_h, 0), &destination, at(date, arr_h, arr_m))],
            }],
            price: RawPrice {
                base: base.to_string(),
                grand_total: total.to_string(),
            },
        };

        RawOfferBatch {
            data: vec![
                direct("offer-1", "IG201", "Indigo", 6, 8, 15, "95.00", "112.00"),
                direct("offer-2", "VA310", "Vistara", 9, 11, 45, "120.00", "145.50"),
                RawOffer {
                    id: "offer-3".to_string(),
                    itineraries: vec![RawItinerary {
                        segments: vec![
                            segment("AV115", "AirVista", &origin, at(date, 13, 0), "HYD", at(date, 14, 30)),
                            segment("AV221", "AirVista", "HYD", at(date, 15, 30), &destination, at(date, 17, 10)),
                        ],
                    }],
                    price: RawPrice {
                        base: "80.00".to_string(),
                        grand_total: "98.75".to_string(),
                    },
                },
            ],
        }
    }
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    match date.and_hms_opt(hour, minute, 0) {
        Some(naive) => naive.and_utc(),
        None => Utc::now(),
    }
}

fn segment(
    number: &str,
    carrier: &str,
    from: &str,
    departs: DateTime<Utc>,
    to: &str,
    arrives: DateTime<Utc>,
) -> RawSegment {
    RawSegment {
        number: number.to_string(),
        carrier_code: carrier.to_string(),
        departure: RawEndpoint {
            iata_code: from.to_string(),
            at: departs.to_rfc3339(),
        },
        arrival: RawEndpoint {
            iata_code: to.to_string(),
            at: arrives.to_rfc3339(),
        },
    }
}

fn short_reference() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("FB-{}", id[..6].to_uppercase())
}

impl Default for MockBackendGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendGateway for MockBackendGateway {
    fn search_flights(&self, criteria: SearchCriteria) -> GatewayFuture<RawOfferBatch> {
        let batch = Self::offers_for(&criteria);
        Box::pin(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            tracing::info!(
                origin = %criteria.origin,
                destination = %criteria.destination,
                offers = batch.data.len(),
                "Mock flight search completed"
            );
            Ok(batch)
        })
    }

    fn create_booking(&self, flight_id: String, total_amount: f64) -> GatewayFuture<CreatedBooking> {
        Box::pin(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            let booking = CreatedBooking {
                id: format!("bkg_{}", uuid::Uuid::new_v4().simple()),
                reference: short_reference(),
            };
            tracing::info!(
                flight_id = %flight_id,
                amount = total_amount,
                booking_id = %booking.id,
                "Mock booking created"
            );
            Ok(booking)
        })
    }

    fn add_passengers(
        &self,
        booking_id: String,
        passengers: Vec<PassengerManifestEntry>,
    ) -> GatewayFuture<()> {
        Box::pin(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            tracing::info!(
                booking_id = %booking_id,
                count = passengers.len(),
                "Mock passengers registered"
            );
            Ok(())
        })
    }

    fn process_payment(
        &self,
        booking_id: String,
        payment_token: String,
        amount: f64,
    ) -> GatewayFuture<()> {
        Box::pin(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            tracing::info!(
                booking_id = %booking_id,
                token = %payment_token,
                amount,
                "Mock payment finalized"
            );
            Ok(())
        })
    }

    fn generate_ticket(&self, booking_id: String) -> GatewayFuture<String> {
        Box::pin(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            Ok(format!("https://tickets.example.com/{booking_id}.pdf"))
        })
    }

    fn get_booking_history(&self, email: String) -> GatewayFuture<Vec<BookingRecord>> {
        let bookings = self
            .bookings
            .lock()
            .map_or_else(|_| Vec::new(), |guard| guard.clone());
        Box::pin(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            tracing::info!(email = %email, count = bookings.len(), "Mock booking history fetched");
            Ok(bookings)
        })
    }

    fn create_payment_intent(&self, amount: f64, currency: String) -> GatewayFuture<PaymentIntent> {
        Box::pin(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            let id = format!("pi_{}", uuid::Uuid::new_v4().simple());
            tracing::info!(amount, currency = %currency, intent = %id, "Mock payment intent created");
            Ok(PaymentIntent {
                client_secret: format!("{id}_secret_{}", uuid::Uuid::new_v4().simple()),
                payment_intent_id: id,
            })
        })
    }

    fn confirm_payment_success(&self, payment_intent_id: String) -> GatewayFuture<()> {
        Box::pin(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            tracing::info!(intent = %payment_intent_id, "Mock payment confirmation recorded");
            Ok(())
        })
    }

    fn process_refund(&self, payment_id: String) -> GatewayFuture<()> {
        Box::pin(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            tracing::info!(payment_id = %payment_id, "Mock refund processed");
            Ok(())
        })
    }
}

/// Build a confirmed mock booking departing the given number of hours
/// after `now`. Useful for seeding [`MockBackendGateway::with_bookings`].
#[must_use]
pub fn mock_booking(reference: &str, status: BookingStatus, now: DateTime<Utc>, hours_out: i64) -> BookingRecord {
    let departure = now + Duration::hours(hours_out);
    BookingRecord {
        id: format!("bkg_{}", reference.to_lowercase()),
        reference: reference.to_string(),
        status,
        payment_id: format!("pi_{}", reference.to_lowercase()),
        flight: BookedFlight {
            flight_number: "VA310".to_string(),
            origin: "DEL".to_string(),
            destination: "BOM".to_string(),
            departure,
            arrival: departure + Duration::hours(2),
        },
        total_amount: 145.50,
    }
}
