//! Booking demo binary
//!
//! Walks the full wizard flow — search, selection, seats, passengers,
//! payment, confirmation — against the development mocks.

use skybook_booking::gateway::MockBackendGateway;
use skybook_booking::payment::MockPaymentProcessor;
use skybook_booking::seatmap::{SeatId, SeatSlot};
use skybook_booking::types::PassengerField;
use skybook_booking::wizard::{WizardAction, WizardEnvironment, WizardReducer, WizardState};
use skybook_core::environment::{Clock, SystemClock, SystemRandom};
use skybook_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WAIT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skybook_booking=debug,skybook_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Skybook: flight booking wizard demo ===\n");

    let clock = SystemClock;
    let env = WizardEnvironment::new(
        Arc::new(clock),
        Arc::new(MockBackendGateway::new()),
        Arc::new(MockPaymentProcessor::new()),
        Arc::new(SystemRandom),
    );
    let store = Store::new(WizardState::new(clock.now()), WizardReducer::new(), env);

    // Search
    store
        .send(WizardAction::SetOrigin { value: "DEL".to_string() })
        .await;
    store
        .send(WizardAction::SetDestination { value: "BOM".to_string() })
        .await;
    store.send(WizardAction::SetAdults { count: 2 }).await;

    println!(">>> Searching DEL → BOM for 2 adults");
    let outcome = store
        .send_and_wait_for(
            WizardAction::SubmitSearch,
            |a| matches!(a, WizardAction::SearchSucceeded { .. } | WizardAction::SearchFailed { .. }),
            WAIT,
        )
        .await;
    if !matches!(outcome, Ok(WizardAction::SearchSucceeded { .. })) {
        eprintln!("search failed: {outcome:?}");
        return;
    }

    let offers = store.state(|s| s.available_flights.clone()).await;
    println!("Found {} offers:", offers.len());
    for offer in &offers {
        println!(
            "  {} {} {}→{} {} ({} stops) ${:.2}",
            offer.flight_number,
            offer.departure_time,
            offer.origin,
            offer.destination,
            offer.duration,
            offer.stops,
            offer.price
        );
    }

    // Select the cheapest offer (the list is price-sorted)
    let Some(flight_id) = offers.first().map(|offer| offer.id.clone()) else {
        eprintln!("no offers to select");
        return;
    };
    println!("\n>>> Selecting {flight_id}");
    store.send(WizardAction::SelectFlight { flight_id }).await;

    // Pick the first two open seats
    let free: Vec<SeatId> = store
        .state(|s| {
            s.seat_map
                .rows
                .iter()
                .flat_map(|row| &row.slots)
                .filter_map(|slot| match slot {
                    SeatSlot::Seat(seat) if !seat.occupied => Some(seat.id.clone()),
                    _ => None,
                })
                .take(2)
                .collect()
        })
        .await;
    for seat_id in free {
        store.send(WizardAction::ToggleSeat { seat_id }).await;
    }
    println!(
        ">>> Selected seats: {}",
        store.state(WizardState::selected_seats_string).await
    );

    // Passengers
    store.send(WizardAction::ContinueToPassengers).await;
    for (index, name) in ["Asha Rao", "Dev Rao"].iter().enumerate() {
        store
            .send(WizardAction::SetPassengerField {
                index,
                field: PassengerField::Name,
                value: (*name).to_string(),
            })
            .await;
        store
            .send(WizardAction::SetPassengerField {
                index,
                field: PassengerField::Email,
                value: format!("passenger{index}@example.com"),
            })
            .await;
        store
            .send(WizardAction::SetPassengerField {
                index,
                field: PassengerField::Phone,
                value: "555-0100".to_string(),
            })
            .await;
    }

    // Payment setup (intent + card element in parallel)
    let mut handle = store.send(WizardAction::ContinueToPayment).await;
    if handle.wait_with_timeout(WAIT).await.is_err() {
        eprintln!("payment setup timed out");
        return;
    }

    if let Some(fare) = store.state(|s| s.fare).await {
        println!("\nFare breakdown:");
        println!("  Base fare:      {}", fare.base_fare_display());
        println!("  Taxes and fees: {}", fare.taxes_display());
        println!("  Total:          {}", fare.total_display());
    }

    store
        .send(WizardAction::SetTermsAccepted { accepted: true })
        .await;

    println!("\n>>> Paying");
    let outcome = store
        .send_and_wait_for(
            WizardAction::SubmitPayment,
            |a| {
                matches!(
                    a,
                    WizardAction::PaymentFinalized | WizardAction::PaymentStepFailed { .. }
                )
            },
            WAIT,
        )
        .await;
    match outcome {
        Ok(WizardAction::PaymentFinalized) => {
            let reference = store.state(|s| s.booking_reference.clone()).await;
            println!(
                "Booking confirmed! Reference: {}",
                reference.unwrap_or_default()
            );
        },
        other => {
            let error = store.state(|s| s.payment_error.clone()).await;
            eprintln!("payment failed: {error:?} ({other:?})");
        },
    }
}
