//! Reducer for the booking wizard.

use crate::payment::BillingDetails;
use crate::pipeline;
use crate::seatmap::SeatMap;
use crate::types::{PassengerField, PassengerForm, PassengerManifestEntry, PassengerType};
use crate::wizard::{PaymentPhase, WizardAction, WizardEnvironment, WizardState, WizardStep};
use skybook_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Fallback message when a payment-sequence failure has no text of its own.
const PAYMENT_FALLBACK_MESSAGE: &str = "Failed to process payment. Please try again.";

/// The booking wizard's transition function.
///
/// Guards set `error_message`/`payment_error` and stay put; remote calls
/// go out as effects whose completion actions drive the next transition.
#[derive(Clone, Copy, Debug, Default)]
pub struct WizardReducer;

impl WizardReducer {
    /// Create a new wizard reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for WizardReducer {
    type State = WizardState;
    type Action = WizardAction;
    type Environment = WizardEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per wizard input keeps the flow in one place
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ----- search form -----
            WizardAction::SetTripType { trip_type } => {
                state.search.trip_type = trip_type;
                smallvec![Effect::None]
            },

            WizardAction::SetOrigin { value } => {
                state.search.origin = value;
                smallvec![Effect::None]
            },

            WizardAction::SetDestination { value } => {
                state.search.destination = value;
                smallvec![Effect::None]
            },

            WizardAction::SetDepartureDate { date } => {
                state.search.departure_date = date;

                // Keep the return date from landing before departure
                if state.search.trip_type == crate::types::TripType::RoundTrip {
                    if let (Some(departure), Some(ret)) = (date, state.search.return_date) {
                        if ret < departure {
                            state.search.return_date = Some(departure);
                        }
                    }
                }
                smallvec![Effect::None]
            },

            WizardAction::SetReturnDate { date } => {
                state.search.return_date = date;
                smallvec![Effect::None]
            },

            WizardAction::SetAdults { count } => {
                state.search.adults = count.max(1);
                state.required_seats = state.search.required_seats();
                smallvec![Effect::None]
            },

            WizardAction::SetChildren { count } => {
                state.search.children = count;
                state.required_seats = state.search.required_seats();
                smallvec![Effect::None]
            },

            WizardAction::SetInfants { count } => {
                // Infants sit on an adult's lap and never take a seat
                state.search.infants = count;
                state.required_seats = state.search.required_seats();
                smallvec![Effect::None]
            },

            WizardAction::SubmitSearch => {
                if state.search.origin.is_empty()
                    || state.search.destination.is_empty()
                    || state.search.departure_date.is_none()
                {
                    state.error_message = Some("Please fill all required fields.".to_string());
                    return smallvec![Effect::None];
                }
                if state.search.origin == state.search.destination {
                    state.error_message =
                        Some("Origin and destination cannot be the same.".to_string());
                    return smallvec![Effect::None];
                }

                state.error_message = None;
                state.is_loading = true;

                let gateway = env.gateway();
                let criteria = state.search.clone();
                smallvec![Effect::future(async move {
                    match gateway.search_flights(criteria).await {
                        Ok(batch) => Some(WizardAction::SearchSucceeded { batch }),
                        Err(error) => Some(WizardAction::SearchFailed {
                            message: format!(
                                "Failed to search flights. {}",
                                error.user_message()
                            ),
                        }),
                    }
                })]
            },

            WizardAction::SearchSucceeded { batch } => {
                let mut offers = pipeline::normalize(&batch);
                pipeline::sort_offers(&mut offers, "price");
                state.available_flights = offers;
                state.step = WizardStep::Select;
                state.is_loading = false;
                smallvec![Effect::None]
            },

            WizardAction::SearchFailed { message } => {
                state.error_message = Some(message);
                state.is_loading = false;
                smallvec![Effect::None]
            },

            // ----- flight selection -----
            WizardAction::SetPriceFilter { max_price } => {
                state.price_filter = max_price;
                apply_filters(state);
                smallvec![Effect::None]
            },

            WizardAction::ToggleAirline { airline, checked } => {
                if checked {
                    if !state.selected_airlines.contains(&airline) {
                        state.selected_airlines.push(airline);
                    }
                } else {
                    state.selected_airlines.retain(|item| *item != airline);
                }
                apply_filters(state);
                smallvec![Effect::None]
            },

            WizardAction::SetSortOption { option } => {
                pipeline::sort_offers(&mut state.available_flights, &option);
                state.sort_option = option;
                smallvec![Effect::None]
            },

            WizardAction::SelectFlight { flight_id } => {
                let Some(flight) = state
                    .available_flights
                    .iter()
                    .find(|offer| offer.id == flight_id)
                    .cloned()
                else {
                    return smallvec![Effect::None];
                };

                state.selected_flight = Some(flight);
                state.seat_map = SeatMap::synthesize(env.random());
                state.selected_seats.clear();
                state.step = WizardStep::Seats;
                smallvec![Effect::None]
            },

            // ----- seat selection -----
            WizardAction::ToggleSeat { seat_id } => {
                let required = state.required_seats as usize;
                state
                    .seat_map
                    .toggle(&seat_id, &mut state.selected_seats, required);
                smallvec![Effect::None]
            },

            WizardAction::BackToFlights => {
                state.step = WizardStep::Select;
                smallvec![Effect::None]
            },

            WizardAction::ContinueToPassengers => {
                if state.insufficient_seats_selected() {
                    state.error_message = Some(format!(
                        "Please select {} seats to continue.",
                        state.required_seats
                    ));
                    return smallvec![Effect::None];
                }

                state.error_message = None;
                state.passenger_forms = generate_passenger_forms(
                    state.search.adults,
                    state.search.children,
                );
                state.step = WizardStep::Passengers;
                smallvec![Effect::None]
            },

            // ----- passenger forms -----
            WizardAction::SetPassengerField {
                index,
                field,
                value,
            } => {
                if let Some(form) = state.passenger_forms.get_mut(index) {
                    match field {
                        PassengerField::Name => form.name = value,
                        PassengerField::Email => form.email = value,
                        PassengerField::Phone => form.phone = value,
                        PassengerField::MealPreference => form.meal_preference = value,
                    }
                }
                smallvec![Effect::None]
            },

            WizardAction::BackToSeats => {
                state.step = WizardStep::Seats;
                smallvec![Effect::None]
            },

            WizardAction::ContinueToPayment => {
                if state.invalid_passenger_data() {
                    state.error_message =
                        Some("Please fill in all required passenger information.".to_string());
                    return smallvec![Effect::None];
                }
                let Some(flight) = state.selected_flight.clone() else {
                    return smallvec![Effect::None];
                };

                state.error_message = None;
                let fare = pipeline::compute_fare(flight.base_price, state.total_passengers());
                state.fare = Some(fare);
                state.step = WizardStep::Payment;
                state.is_loading = true;

                let gateway = env.gateway();
                let payments = env.payments();
                smallvec![Effect::merge(vec![
                    Effect::future(async move {
                        match gateway
                            .create_payment_intent(fare.total_amount, "usd".to_string())
                            .await
                        {
                            Ok(intent) => Some(WizardAction::PaymentIntentReady { intent }),
                            Err(error) => {
                                tracing::warn!(error = %error, "payment intent creation failed");
                                Some(WizardAction::PaymentIntentFailed)
                            },
                        }
                    }),
                    Effect::future(async move {
                        match payments.mount_card_element().await {
                            Ok(()) => Some(WizardAction::CardMounted),
                            Err(error) => Some(WizardAction::CardMountFailed {
                                message: error.to_string(),
                            }),
                        }
                    }),
                ])]
            },

            WizardAction::PaymentIntentReady { intent } => {
                state.payment_intent = Some(intent);
                state.is_loading = false;
                smallvec![Effect::None]
            },

            WizardAction::PaymentIntentFailed => {
                state.payment_error =
                    Some("Failed to initialize payment. Please try again.".to_string());
                state.is_loading = false;
                smallvec![Effect::None]
            },

            WizardAction::CardMounted => {
                state.card_mounted = true;
                smallvec![Effect::None]
            },

            WizardAction::CardMountFailed { message } => {
                state.payment_error = Some(message);
                smallvec![Effect::None]
            },

            WizardAction::CardInputChanged { error } => {
                state.payment_error = error;
                smallvec![Effect::None]
            },

            // ----- payment -----
            WizardAction::BackToPassengers => {
                state.step = WizardStep::Passengers;
                smallvec![Effect::None]
            },

            WizardAction::ShowTerms => {
                state.show_terms = true;
                smallvec![Effect::None]
            },

            WizardAction::CloseTerms => {
                state.show_terms = false;
                smallvec![Effect::None]
            },

            WizardAction::AcceptTerms => {
                state.terms_accepted = true;
                state.show_terms = false;
                smallvec![Effect::None]
            },

            WizardAction::SetTermsAccepted { accepted } => {
                state.terms_accepted = accepted;
                smallvec![Effect::None]
            },

            WizardAction::SubmitPayment => {
                let ready = state.payment_intent.is_some() && env.payments().card_ready();
                if !ready {
                    state.payment_error =
                        Some("Payment system not initialized properly.".to_string());
                    return smallvec![Effect::None];
                }
                if !state.terms_accepted {
                    state.payment_error =
                        Some("Please accept the terms and conditions.".to_string());
                    return smallvec![Effect::None];
                }
                let (Some(flight), Some(fare)) = (state.selected_flight.clone(), state.fare)
                else {
                    return smallvec![Effect::None];
                };

                state.is_loading = true;
                state.payment_error = None;
                state.payment_phase = PaymentPhase::CreatingBooking;

                let gateway = env.gateway();
                smallvec![Effect::future(async move {
                    match gateway.create_booking(flight.id, fare.total_amount).await {
                        Ok(booking) => Some(WizardAction::BookingCreated {
                            booking_id: booking.id,
                            reference: booking.reference,
                        }),
                        Err(error) => Some(payment_step_failed(error.user_message())),
                    }
                })]
            },

            WizardAction::BookingCreated {
                booking_id,
                reference,
            } => {
                if state.payment_phase != PaymentPhase::CreatingBooking {
                    return smallvec![Effect::None];
                }

                state.booking_id = Some(booking_id.clone());
                state.booking_reference = Some(reference);
                state.payment_phase = PaymentPhase::RegisteringPassengers;

                // Passenger i travels in the i-th selected seat
                let passengers: Vec<PassengerManifestEntry> = state
                    .passenger_forms
                    .iter()
                    .enumerate()
                    .map(|(index, form)| PassengerManifestEntry {
                        name: form.name.clone(),
                        email: form.email.clone(),
                        seat_number: state
                            .selected_seats
                            .get(index)
                            .map(|seat| seat.as_str().to_string())
                            .unwrap_or_default(),
                    })
                    .collect();

                let gateway = env.gateway();
                smallvec![Effect::future(async move {
                    match gateway.add_passengers(booking_id, passengers).await {
                        Ok(()) => Some(WizardAction::PassengersRegistered),
                        Err(error) => Some(payment_step_failed(error.user_message())),
                    }
                })]
            },

            WizardAction::PassengersRegistered => {
                if state.payment_phase != PaymentPhase::RegisteringPassengers {
                    return smallvec![Effect::None];
                }
                let intent = state.payment_intent.clone();
                let lead = state.passenger_forms.first().cloned();
                let (Some(intent), Some(lead)) = (intent, lead) else {
                    state.payment_error = Some(PAYMENT_FALLBACK_MESSAGE.to_string());
                    state.is_loading = false;
                    state.payment_phase = PaymentPhase::Idle;
                    return smallvec![Effect::None];
                };

                state.payment_phase = PaymentPhase::ConfirmingCard;

                let billing = BillingDetails {
                    name: lead.name.clone(),
                    email: lead.email.clone(),
                };
                let payments = env.payments();
                smallvec![Effect::future(async move {
                    match payments
                        .confirm_card_payment(intent.client_secret, billing)
                        .await
                    {
                        Ok(_) => Some(WizardAction::CardPaymentConfirmed),
                        // Processor errors are shown to the user verbatim
                        Err(error) => Some(payment_step_failed(&error.to_string())),
                    }
                })]
            },

            WizardAction::CardPaymentConfirmed => {
                if state.payment_phase != PaymentPhase::ConfirmingCard {
                    return smallvec![Effect::None];
                }
                let (Some(booking_id), Some(intent), Some(fare)) = (
                    state.booking_id.clone(),
                    state.payment_intent.clone(),
                    state.fare,
                ) else {
                    state.payment_error = Some(PAYMENT_FALLBACK_MESSAGE.to_string());
                    state.is_loading = false;
                    state.payment_phase = PaymentPhase::Idle;
                    return smallvec![Effect::None];
                };

                state.payment_phase = PaymentPhase::Finalizing;

                let gateway = env.gateway();
                smallvec![Effect::future(async move {
                    match gateway
                        .process_payment(booking_id, intent.payment_intent_id, fare.total_amount)
                        .await
                    {
                        Ok(()) => Some(WizardAction::PaymentFinalized),
                        Err(error) => Some(payment_step_failed(error.user_message())),
                    }
                })]
            },

            WizardAction::PaymentFinalized => {
                if state.payment_phase != PaymentPhase::Finalizing {
                    return smallvec![Effect::None];
                }

                state.payment_phase = PaymentPhase::Settled;
                state.is_loading = false;
                state.step = WizardStep::Confirmation;
                smallvec![Effect::None]
            },

            WizardAction::PaymentStepFailed { message } => {
                // Earlier steps of the sequence may already have persisted a
                // booking and its passengers server-side; they stay as they
                // are, and a retry starts the sequence over.
                state.payment_error = Some(message);
                state.is_loading = false;
                state.payment_phase = PaymentPhase::Idle;
                smallvec![Effect::None]
            },

            // ----- confirmation -----
            WizardAction::DownloadTicket => {
                let Some(booking_id) = state.booking_id.clone() else {
                    return smallvec![Effect::None];
                };

                let gateway = env.gateway();
                smallvec![Effect::future(async move {
                    match gateway.generate_ticket(booking_id).await {
                        Ok(url) => Some(WizardAction::TicketReady { url }),
                        Err(error) => {
                            tracing::warn!(error = %error, "ticket generation failed");
                            Some(WizardAction::TicketFailed)
                        },
                    }
                })]
            },

            WizardAction::TicketReady { url } => {
                state.ticket_url = Some(url);
                smallvec![Effect::None]
            },

            WizardAction::TicketFailed => {
                state.error_message = Some("Failed to generate ticket.".to_string());
                smallvec![Effect::None]
            },

            WizardAction::ReturnToSearch => {
                state.today = env.clock().now().date_naive();
                state.reset();
                smallvec![Effect::None]
            },
        }
    }
}

/// Re-apply the price and airline filters to the current list, then the
/// current sort. Filtering narrows the list in place.
fn apply_filters(state: &mut WizardState) {
    pipeline::filter_offers(
        &mut state.available_flights,
        state.price_filter,
        &state.selected_airlines,
    );
    pipeline::sort_offers(&mut state.available_flights, &state.sort_option);
}

/// Fresh, empty forms: one per adult, then one per child.
fn generate_passenger_forms(adults: u32, children: u32) -> Vec<PassengerForm> {
    let mut forms = Vec::with_capacity((adults + children) as usize);
    for index in 0..adults as usize {
        forms.push(PassengerForm::empty(PassengerType::Adult, index));
    }
    for index in 0..children as usize {
        forms.push(PassengerForm::empty(PassengerType::Child, index));
    }
    forms
}

fn payment_step_failed(message: &str) -> WizardAction {
    let message = if message.is_empty() {
        PAYMENT_FALLBACK_MESSAGE.to_string()
    } else {
        message.to_string()
    };
    WizardAction::PaymentStepFailed { message }
}
