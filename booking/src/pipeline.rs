//! Derived-data pipeline: pure functions over search results.
//!
//! Everything the wizard shows is derived here — raw provider offers are
//! normalized once, then filtered and sorted in place as the user adjusts
//! the controls. Nothing in this module touches wizard state or performs
//! I/O.

use crate::format;
use crate::types::{FareBreakdown, FlightOffer, RawOffer, RawOfferBatch};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Why a raw offer could not be normalized.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The offer carried no itineraries
    #[error("offer {offer} has no itineraries")]
    MissingItinerary {
        /// Provider offer id
        offer: String,
    },

    /// The first itinerary carried no segments
    #[error("offer {offer} has no segments")]
    MissingSegments {
        /// Provider offer id
        offer: String,
    },

    /// A segment timestamp was not RFC 3339
    #[error("invalid timestamp {value:?}: {source}")]
    Timestamp {
        /// The offending value
        value: String,
        /// Parse failure
        #[source]
        source: chrono::ParseError,
    },

    /// A price field was not a decimal number
    #[error("invalid price {value:?}")]
    Price {
        /// The offending value
        value: String,
    },
}

/// Normalize a raw search batch into flight offers.
///
/// Takes the first itinerary of each offer; departure comes from its first
/// segment and arrival from its last, duration is their difference in
/// minutes, and the stop count is the segment count minus one.
///
/// Fails soft: a structural error in any offer discards the whole batch
/// (logged, empty result) rather than surfacing a partial or broken list.
#[must_use]
pub fn normalize(batch: &RawOfferBatch) -> Vec<FlightOffer> {
    match try_normalize(batch) {
        Ok(offers) => offers,
        Err(error) => {
            tracing::warn!(%error, "discarding search results after malformed offer");
            Vec::new()
        },
    }
}

fn try_normalize(batch: &RawOfferBatch) -> Result<Vec<FlightOffer>, NormalizeError> {
    batch.data.iter().map(normalize_offer).collect()
}

fn normalize_offer(raw: &RawOffer) -> Result<FlightOffer, NormalizeError> {
    let itinerary = raw
        .itineraries
        .first()
        .ok_or_else(|| NormalizeError::MissingItinerary {
            offer: raw.id.clone(),
        })?;
    let first = itinerary
        .segments
        .first()
        .ok_or_else(|| NormalizeError::MissingSegments {
            offer: raw.id.clone(),
        })?;
    let last = itinerary
        .segments
        .last()
        .ok_or_else(|| NormalizeError::MissingSegments {
            offer: raw.id.clone(),
        })?;

    let departure = parse_timestamp(&first.departure.at)?;
    let arrival = parse_timestamp(&last.arrival.at)?;
    let duration_minutes = (arrival - departure).num_minutes();

    Ok(FlightOffer {
        id: raw.id.clone(),
        flight_number: first.number.clone(),
        origin: first.departure.iata_code.clone(),
        destination: last.arrival.iata_code.clone(),
        departure,
        arrival,
        departure_date: format::display_date(departure),
        departure_time: format::display_time(departure),
        arrival_time: format::display_time(arrival),
        duration_minutes,
        duration: format!("{}h {}m", duration_minutes / 60, duration_minutes % 60),
        stops: itinerary.segments.len() - 1,
        price: parse_price(&raw.price.grand_total)?,
        base_price: parse_price(&raw.price.base)?,
        airline: first.carrier_code.clone(),
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, NormalizeError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|source| NormalizeError::Timestamp {
            value: value.to_string(),
            source,
        })
}

fn parse_price(value: &str) -> Result<f64, NormalizeError> {
    value.parse().map_err(|_| NormalizeError::Price {
        value: value.to_string(),
    })
}

/// Filter offers in place by price cap and airline selection.
///
/// An offer survives when its price is within the cap AND its carrier is
/// either explicitly selected or — when `"other"` is selected — any
/// carrier that is not `"indigo"`. "Other" therefore means "any non-indigo
/// carrier", not "carriers outside the explicit list"; this matches the
/// shipped behavior and is kept as-is.
///
/// Filtering is destructive: it narrows the current list, so loosening a
/// filter does not bring offers back until a fresh search.
pub fn filter_offers(offers: &mut Vec<FlightOffer>, max_price: f64, allowed_airlines: &[String]) {
    offers.retain(|offer| {
        let airline = offer.airline.to_lowercase();
        let airline_matches = allowed_airlines.iter().any(|allowed| *allowed == airline)
            || (airline != "indigo" && allowed_airlines.iter().any(|allowed| allowed == "other"));

        offer.price <= max_price && airline_matches
    });
}

/// Sort offers in place by the named key.
///
/// `"price"`, `"duration"` (recomputed from the timestamps, not the display
/// string), and `"departure"` sort ascending; any other key leaves the
/// order untouched. All sorts are stable.
pub fn sort_offers(offers: &mut [FlightOffer], key: &str) {
    match key {
        "price" => offers.sort_by(|a, b| a.price.total_cmp(&b.price)),
        "duration" => offers.sort_by_key(|offer| (offer.arrival - offer.departure).num_minutes()),
        "departure" => offers.sort_by_key(|offer| offer.departure),
        _ => {},
    }
}

/// Compute the fare for a base price and passenger count.
///
/// Rounds to two decimals after each step, in order: base fare total, then
/// taxes and fees (15% of the base total), then the sum. The per-step
/// rounding is what makes the three displayed numbers add up exactly.
#[must_use]
pub fn compute_fare(base_price: f64, total_passengers: u32) -> FareBreakdown {
    let base_fare_total = round_cents(base_price * f64::from(total_passengers));
    let taxes_and_fees = round_cents(base_fare_total * 0.15);
    let total_amount = round_cents(base_fare_total + taxes_and_fees);

    FareBreakdown {
        base_fare_total,
        taxes_and_fees,
        total_amount,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
