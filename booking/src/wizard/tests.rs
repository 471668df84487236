//! Reducer tests for the booking wizard.

#![allow(clippy::unwrap_used)]

use crate::gateway::MockBackendGateway;
use crate::payment::{MockPaymentProcessor, PaymentProcessor};
use crate::seatmap::SeatId;
use crate::types::{
    PassengerField, PaymentIntent, RawEndpoint, RawItinerary, RawOffer, RawOfferBatch, RawPrice,
    RawSegment, TripType,
};
use crate::wizard::{
    PaymentPhase, WizardAction, WizardEnvironment, WizardReducer, WizardState, WizardStep,
};
use chrono::NaiveDate;
use skybook_core::environment::Clock;
use skybook_core::reducer::Reducer;
use skybook_testing::{ReducerTest, SeededRandom, test_clock};
use std::sync::Arc;

fn test_env() -> WizardEnvironment {
    test_env_with(Arc::new(MockPaymentProcessor::new()))
}

fn test_env_with(payments: Arc<MockPaymentProcessor>) -> WizardEnvironment {
    WizardEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(MockBackendGateway::new()),
        payments,
        Arc::new(SeededRandom::from_seed(7)),
    )
}

fn fresh_state() -> WizardState {
    WizardState::new(test_clock().now())
}

fn reduce(
    state: &mut WizardState,
    action: WizardAction,
    env: &WizardEnvironment,
) -> usize {
    WizardReducer::new().reduce(state, action, env).len()
}

fn raw_offer(id: &str, carrier: &str, total: &str) -> RawOffer {
    RawOffer {
        id: id.to_string(),
        itineraries: vec![RawItinerary {
            segments: vec![RawSegment {
                number: format!("SK-{id}"),
                carrier_code: carrier.to_string(),
                departure: RawEndpoint {
                    iata_code: "DEL".to_string(),
                    at: "2025-03-01T09:30:00Z".to_string(),
                },
                arrival: RawEndpoint {
                    iata_code: "BOM".to_string(),
                    at: "2025-03-01T11:45:00Z".to_string(),
                },
            }],
        }],
        price: RawPrice {
            base: "100.00".to_string(),
            grand_total: total.to_string(),
        },
    }
}

fn sample_batch() -> RawOfferBatch {
    RawOfferBatch {
        data: vec![
            raw_offer("offer-costly", "Vistara", "300.00"),
            raw_offer("offer-cheap", "Indigo", "150.00"),
        ],
    }
}

/// Drive the wizard up to the seats step with two travellers.
fn state_at_seats(env: &WizardEnvironment) -> WizardState {
    let mut state = fresh_state();
    reduce(&mut state, WizardAction::SetOrigin { value: "DEL".to_string() }, env);
    reduce(&mut state, WizardAction::SetDestination { value: "BOM".to_string() }, env);
    reduce(&mut state, WizardAction::SetAdults { count: 2 }, env);
    reduce(&mut state, WizardAction::SearchSucceeded { batch: sample_batch() }, env);
    reduce(
        &mut state,
        WizardAction::SelectFlight { flight_id: "offer-cheap".to_string() },
        env,
    );
    state
}

/// Drive the wizard to a payment-ready state: seats chosen, forms filled,
/// fare computed, intent present, terms accepted.
fn state_at_payment(env: &WizardEnvironment) -> WizardState {
    let mut state = state_at_seats(env);

    // The seed leaves these open; pick two free seats deterministically
    let free: Vec<SeatId> = state
        .seat_map
        .rows
        .iter()
        .flat_map(|row| &row.slots)
        .filter_map(|slot| match slot {
            crate::seatmap::SeatSlot::Seat(seat) if !seat.occupied => Some(seat.id.clone()),
            _ => None,
        })
        .take(2)
        .collect();
    for seat_id in free {
        reduce(&mut state, WizardAction::ToggleSeat { seat_id }, env);
    }
    reduce(&mut state, WizardAction::ContinueToPassengers, env);

    for index in 0..state.passenger_forms.len() {
        reduce(
            &mut state,
            WizardAction::SetPassengerField {
                index,
                field: PassengerField::Name,
                value: format!("Traveller {index}"),
            },
            env,
        );
        reduce(
            &mut state,
            WizardAction::SetPassengerField {
                index,
                field: PassengerField::Email,
                value: format!("traveller{index}@example.com"),
            },
            env,
        );
        reduce(
            &mut state,
            WizardAction::SetPassengerField {
                index,
                field: PassengerField::Phone,
                value: "555-0100".to_string(),
            },
            env,
        );
    }
    reduce(&mut state, WizardAction::ContinueToPayment, env);

    reduce(
        &mut state,
        WizardAction::PaymentIntentReady {
            intent: PaymentIntent {
                client_secret: "pi_test_secret_abc".to_string(),
                payment_intent_id: "pi_test".to_string(),
            },
        },
        env,
    );
    reduce(&mut state, WizardAction::CardMounted, env);
    reduce(&mut state, WizardAction::SetTermsAccepted { accepted: true }, env);
    state
}

#[test]
fn search_requires_route_fields() {
    let env = test_env();
    let mut state = fresh_state();

    reduce(&mut state, WizardAction::SubmitSearch, &env);

    assert_eq!(
        state.error_message.as_deref(),
        Some("Please fill all required fields.")
    );
    assert_eq!(state.step, WizardStep::Search);
    assert!(!state.is_loading);
}

#[test]
fn search_rejects_identical_route_endpoints() {
    let env = test_env();
    let mut state = fresh_state();
    reduce(&mut state, WizardAction::SetOrigin { value: "DEL".to_string() }, &env);
    reduce(&mut state, WizardAction::SetDestination { value: "DEL".to_string() }, &env);

    reduce(&mut state, WizardAction::SubmitSearch, &env);

    assert_eq!(
        state.error_message.as_deref(),
        Some("Origin and destination cannot be the same.")
    );
    assert_eq!(state.step, WizardStep::Search);
}

#[test]
fn valid_search_starts_loading() {
    let env = test_env();
    let mut state = fresh_state();
    reduce(&mut state, WizardAction::SetOrigin { value: "DEL".to_string() }, &env);
    reduce(&mut state, WizardAction::SetDestination { value: "BOM".to_string() }, &env);

    let effects = reduce(&mut state, WizardAction::SubmitSearch, &env);

    assert!(state.is_loading);
    assert!(state.error_message.is_none());
    assert_eq!(effects, 1);
}

#[test]
fn search_results_arrive_sorted_by_price() {
    let env = test_env();
    let mut state = fresh_state();

    reduce(&mut state, WizardAction::SearchSucceeded { batch: sample_batch() }, &env);

    assert_eq!(state.step, WizardStep::Select);
    assert!(!state.is_loading);
    assert_eq!(state.available_flights.len(), 2);
    assert_eq!(state.available_flights[0].id, "offer-cheap");
    assert_eq!(state.available_flights[0].duration, "2h 15m");
}

#[test]
fn search_failure_keeps_step_and_surfaces_message() {
    let env = test_env();
    let mut state = fresh_state();
    state.is_loading = true;

    reduce(
        &mut state,
        WizardAction::SearchFailed {
            message: "Failed to search flights. Service down".to_string(),
        },
        &env,
    );

    assert_eq!(state.step, WizardStep::Search);
    assert!(!state.is_loading);
    assert_eq!(
        state.error_message.as_deref(),
        Some("Failed to search flights. Service down")
    );
}

#[test]
fn passenger_counts_drive_required_seats() {
    let env = test_env();
    let mut state = fresh_state();

    reduce(&mut state, WizardAction::SetAdults { count: 2 }, &env);
    reduce(&mut state, WizardAction::SetChildren { count: 1 }, &env);
    reduce(&mut state, WizardAction::SetInfants { count: 3 }, &env);
    assert_eq!(state.required_seats, 3);

    // Adults floor at one
    reduce(&mut state, WizardAction::SetAdults { count: 0 }, &env);
    assert_eq!(state.search.adults, 1);
    assert_eq!(state.required_seats, 2);
}

#[test]
fn departure_date_clamps_return_for_round_trips() {
    let env = test_env();
    let mut state = fresh_state();
    reduce(
        &mut state,
        WizardAction::SetTripType { trip_type: TripType::RoundTrip },
        &env,
    );
    reduce(
        &mut state,
        WizardAction::SetReturnDate { date: NaiveDate::from_ymd_opt(2025, 3, 3) },
        &env,
    );

    reduce(
        &mut state,
        WizardAction::SetDepartureDate { date: NaiveDate::from_ymd_opt(2025, 3, 10) },
        &env,
    );

    assert_eq!(state.search.return_date, NaiveDate::from_ymd_opt(2025, 3, 10));
}

#[test]
fn selecting_a_flight_builds_a_fresh_cabin() {
    let env = test_env();
    let state = state_at_seats(&env);

    assert_eq!(state.step, WizardStep::Seats);
    assert_eq!(state.selected_flight.as_ref().unwrap().id, "offer-cheap");
    assert_eq!(state.seat_map.rows.len(), 30);
    assert_eq!(state.seat_map.seat_count(), 180);
    assert!(state.selected_seats.is_empty());
}

#[test]
fn selecting_an_unknown_flight_is_ignored() {
    let env = test_env();
    let mut state = fresh_state();
    reduce(&mut state, WizardAction::SearchSucceeded { batch: sample_batch() }, &env);

    reduce(
        &mut state,
        WizardAction::SelectFlight { flight_id: "no-such-offer".to_string() },
        &env,
    );

    assert_eq!(state.step, WizardStep::Select);
    assert!(state.selected_flight.is_none());
}

#[test]
fn seat_gate_blocks_until_enough_seats_are_chosen() {
    let env = test_env();
    let mut state = state_at_seats(&env);

    reduce(&mut state, WizardAction::ContinueToPassengers, &env);

    assert_eq!(state.step, WizardStep::Seats);
    assert_eq!(
        state.error_message.as_deref(),
        Some("Please select 2 seats to continue.")
    );
}

#[test]
fn passenger_forms_cover_adults_and_children_but_not_infants() {
    let env = test_env();
    let mut state = state_at_seats(&env);
    reduce(&mut state, WizardAction::SetChildren { count: 1 }, &env);
    reduce(&mut state, WizardAction::SetInfants { count: 2 }, &env);

    // required is now 3; pick three open seats
    let free: Vec<SeatId> = state
        .seat_map
        .rows
        .iter()
        .flat_map(|row| &row.slots)
        .filter_map(|slot| match slot {
            crate::seatmap::SeatSlot::Seat(seat) if !seat.occupied => Some(seat.id.clone()),
            _ => None,
        })
        .take(3)
        .collect();
    for seat_id in free {
        reduce(&mut state, WizardAction::ToggleSeat { seat_id }, &env);
    }

    reduce(&mut state, WizardAction::ContinueToPassengers, &env);

    assert_eq!(state.step, WizardStep::Passengers);
    let ids: Vec<&str> = state.passenger_forms.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["adult-0", "adult-1", "child-0"]);
    assert!(state
        .passenger_forms
        .iter()
        .all(|f| f.meal_preference == "regular"));
}

#[test]
fn passenger_gate_blocks_on_invalid_email() {
    let env = test_env();
    let mut state = state_at_seats(&env);
    state.passenger_forms = vec![crate::types::PassengerForm {
        name: "Asha Rao".to_string(),
        email: "asha@nowhere".to_string(),
        phone: "555-0100".to_string(),
        ..crate::types::PassengerForm::empty(crate::types::PassengerType::Adult, 0)
    }];
    state.step = WizardStep::Passengers;

    reduce(&mut state, WizardAction::ContinueToPayment, &env);

    assert!(state.invalid_passenger_data());
    assert_eq!(state.step, WizardStep::Passengers);
    assert_eq!(
        state.error_message.as_deref(),
        Some("Please fill in all required passenger information.")
    );
}

#[test]
fn payment_entry_computes_the_fare_and_requests_setup() {
    let env = test_env();
    let state = state_at_payment(&env);

    assert_eq!(state.step, WizardStep::Payment);
    let fare = state.fare.unwrap();
    assert_eq!(fare.base_fare_display(), "200.00");
    assert_eq!(fare.taxes_display(), "30.00");
    assert_eq!(fare.total_display(), "230.00");
}

#[test]
fn pay_button_guards_processor_readiness() {
    let env = test_env();
    let mut state = state_at_payment(&env);
    state.payment_intent = None;

    reduce(&mut state, WizardAction::SubmitPayment, &env);

    assert_eq!(
        state.payment_error.as_deref(),
        Some("Payment system not initialized properly.")
    );
    assert_eq!(state.payment_phase, PaymentPhase::Idle);
}

#[test]
fn pay_button_guards_terms_acceptance() {
    let payments = Arc::new(MockPaymentProcessor::new());
    drop(payments.mount_card_element());
    let env = test_env_with(Arc::clone(&payments));

    let mut state = state_at_payment(&env);
    state.terms_accepted = false;

    reduce(&mut state, WizardAction::SubmitPayment, &env);

    assert_eq!(
        state.payment_error.as_deref(),
        Some("Please accept the terms and conditions.")
    );
}

#[test]
fn payment_sequence_walks_its_phases_in_order() {
    let payments = Arc::new(MockPaymentProcessor::new());
    drop(payments.mount_card_element());
    let env = test_env_with(Arc::clone(&payments));
    let mut state = state_at_payment(&env);

    let effects = reduce(&mut state, WizardAction::SubmitPayment, &env);
    assert_eq!(state.payment_phase, PaymentPhase::CreatingBooking);
    assert!(state.is_loading);
    assert_eq!(effects, 1);

    let effects = reduce(
        &mut state,
        WizardAction::BookingCreated {
            booking_id: "bkg_1".to_string(),
            reference: "FB-000123".to_string(),
        },
        &env,
    );
    assert_eq!(state.payment_phase, PaymentPhase::RegisteringPassengers);
    assert_eq!(state.booking_reference.as_deref(), Some("FB-000123"));
    assert_eq!(effects, 1);

    reduce(&mut state, WizardAction::PassengersRegistered, &env);
    assert_eq!(state.payment_phase, PaymentPhase::ConfirmingCard);

    reduce(&mut state, WizardAction::CardPaymentConfirmed, &env);
    assert_eq!(state.payment_phase, PaymentPhase::Finalizing);

    reduce(&mut state, WizardAction::PaymentFinalized, &env);
    assert_eq!(state.payment_phase, PaymentPhase::Settled);
    assert_eq!(state.step, WizardStep::Confirmation);
    assert!(!state.is_loading);
}

#[test]
fn out_of_phase_sequence_events_are_ignored() {
    let env = test_env();
    let mut state = state_at_payment(&env);

    reduce(
        &mut state,
        WizardAction::BookingCreated {
            booking_id: "bkg_stray".to_string(),
            reference: "FB-STRAY".to_string(),
        },
        &env,
    );

    assert_eq!(state.payment_phase, PaymentPhase::Idle);
    assert!(state.booking_id.is_none());
}

#[test]
fn sequence_failure_stays_on_payment_with_the_message() {
    let env = test_env();
    let mut state = state_at_payment(&env);
    state.payment_phase = PaymentPhase::ConfirmingCard;
    state.is_loading = true;

    reduce(
        &mut state,
        WizardAction::PaymentStepFailed {
            message: "Your card was declined.".to_string(),
        },
        &env,
    );

    assert_eq!(state.step, WizardStep::Payment);
    assert_eq!(state.payment_error.as_deref(), Some("Your card was declined."));
    assert_eq!(state.payment_phase, PaymentPhase::Idle);
    assert!(!state.is_loading);
}

#[test]
fn card_input_changes_update_the_payment_error() {
    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(fresh_state())
        .when_action(WizardAction::CardInputChanged {
            error: Some("Incomplete card number.".to_string()),
        })
        .then_state(|state| {
            assert_eq!(state.payment_error.as_deref(), Some("Incomplete card number."));
        })
        .run();
}

#[test]
fn ticket_failure_sets_a_fixed_message() {
    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(fresh_state())
        .when_action(WizardAction::TicketFailed)
        .then_state(|state| {
            assert_eq!(state.error_message.as_deref(), Some("Failed to generate ticket."));
        })
        .run();
}

#[test]
fn terms_modal_accept_ticks_the_checkbox() {
    let env = test_env();
    let mut state = fresh_state();

    reduce(&mut state, WizardAction::ShowTerms, &env);
    assert!(state.show_terms);

    reduce(&mut state, WizardAction::AcceptTerms, &env);
    assert!(state.terms_accepted);
    assert!(!state.show_terms);
}

#[test]
fn return_to_search_resets_everything_but_filter_settings() {
    let env = test_env();
    let mut state = state_at_payment(&env);
    state.price_filter = 800.0;
    state.sort_option = "duration".to_string();
    state.selected_airlines = vec!["other".to_string()];

    reduce(&mut state, WizardAction::ReturnToSearch, &env);

    assert_eq!(state.step, WizardStep::Search);
    assert!(state.search.origin.is_empty());
    assert_eq!(state.search.departure_date, Some(test_clock().now().date_naive()));
    assert_eq!(state.search.return_date, None);
    assert!(state.available_flights.is_empty());
    assert!(state.passenger_forms.is_empty());
    assert!(state.payment_intent.is_none());
    assert!(!state.terms_accepted);
    assert_eq!(state.payment_phase, PaymentPhase::Idle);

    // Filter settings survive the reset
    assert!((state.price_filter - 800.0).abs() < f64::EPSILON);
    assert_eq!(state.sort_option, "duration");
    assert_eq!(state.selected_airlines, vec!["other".to_string()]);
}

#[test]
fn filters_narrow_the_current_list_destructively() {
    let env = test_env();
    let mut state = fresh_state();
    reduce(&mut state, WizardAction::SearchSucceeded { batch: sample_batch() }, &env);

    reduce(&mut state, WizardAction::SetPriceFilter { max_price: 200.0 }, &env);
    assert_eq!(state.available_flights.len(), 1);

    // Raising the cap back does not restore filtered-out offers
    reduce(&mut state, WizardAction::SetPriceFilter { max_price: 1000.0 }, &env);
    assert_eq!(state.available_flights.len(), 1);
}

#[test]
fn step_classes_reflect_progress() {
    let env = test_env();
    let state = state_at_seats(&env);

    assert_eq!(state.step_class(WizardStep::Search), "step completed");
    assert_eq!(state.step_class(WizardStep::Seats), "step active");
    assert_eq!(state.step_class(WizardStep::Payment), "step");
}
