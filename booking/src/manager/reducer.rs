//! Reducer for the booking-management screen.

use crate::manager::state::{BookingView, PendingCancellation, hours_until, refund_percentage};
use crate::manager::{ManagerAction, ManagerEnvironment, ManagerState};
use crate::types::BookingStatus;
use skybook_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// The manager screen's transition function.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManagerReducer;

impl ManagerReducer {
    /// Create a new manager reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for ManagerReducer {
    type State = ManagerState;
    type Action = ManagerAction;
    type Environment = ManagerEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per screen input keeps the flow in one place
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ManagerAction::SetEmail { value } => {
                state.email = value;
                smallvec![Effect::None]
            },

            ManagerAction::SetReferenceFilter { value } => {
                state.reference_filter = value;
                smallvec![Effect::None]
            },

            ManagerAction::SubmitLookup => {
                if state.email.is_empty() {
                    state.error_message = Some("Please enter your email address.".to_string());
                    return smallvec![Effect::None];
                }

                state.is_loading = true;
                state.error_message = None;

                let gateway = env.gateway();
                let email = state.email.clone();
                smallvec![Effect::future(async move {
                    match gateway.get_booking_history(email).await {
                        Ok(bookings) => Some(ManagerAction::LookupSucceeded { bookings }),
                        Err(error) => Some(ManagerAction::LookupFailed {
                            message: format!(
                                "Failed to retrieve bookings. {}",
                                error.user_message()
                            ),
                        }),
                    }
                })]
            },

            ManagerAction::LookupSucceeded { bookings } => {
                let now = env.clock().now();
                let mut views: Vec<BookingView> = bookings
                    .into_iter()
                    .map(|record| BookingView::derive(record, now))
                    .collect();

                if !state.reference_filter.is_empty() {
                    views.retain(|view| {
                        view.record
                            .reference
                            .eq_ignore_ascii_case(&state.reference_filter)
                    });
                }

                state.bookings = views;
                state.is_loading = false;
                smallvec![Effect::None]
            },

            ManagerAction::LookupFailed { message } => {
                state.error_message = Some(message);
                state.bookings = Vec::new();
                state.is_loading = false;
                smallvec![Effect::None]
            },

            ManagerAction::RequestCancellation { booking_id } => {
                let Some(view) = state
                    .bookings
                    .iter()
                    .find(|view| view.record.id == booking_id)
                else {
                    return smallvec![Effect::None];
                };

                let hours_before = hours_until(view.record.flight.departure, env.clock().now());
                state.pending_cancellation = Some(PendingCancellation {
                    booking_id,
                    refund_percentage: refund_percentage(hours_before),
                });
                smallvec![Effect::None]
            },

            ManagerAction::DismissCancellation => {
                state.pending_cancellation = None;
                smallvec![Effect::None]
            },

            ManagerAction::ConfirmCancellation => {
                let Some(pending) = state.pending_cancellation.clone() else {
                    return smallvec![Effect::None];
                };

                state.is_loading = true;
                state.error_message = None;

                let Some(view) = state
                    .bookings
                    .iter()
                    .find(|view| view.record.id == pending.booking_id)
                else {
                    state.error_message = Some("Booking not found.".to_string());
                    state.is_loading = false;
                    return smallvec![Effect::None];
                };

                let booking_id = view.record.id.clone();
                let payment_id = view.record.payment_id.clone();
                let gateway = env.gateway();
                smallvec![Effect::future(async move {
                    match gateway.process_refund(payment_id).await {
                        Ok(()) => Some(ManagerAction::RefundSucceeded { booking_id }),
                        Err(error) => Some(ManagerAction::RefundFailed {
                            message: format!(
                                "Failed to cancel booking. {}",
                                error.user_message()
                            ),
                        }),
                    }
                })]
            },

            ManagerAction::RefundSucceeded { booking_id } => {
                // The remote refund is the source of truth; only now does
                // the local record flip.
                if let Some(view) = state
                    .bookings
                    .iter_mut()
                    .find(|view| view.record.id == booking_id)
                {
                    view.record.status = BookingStatus::Cancelled;
                    view.can_cancel = false;
                    view.can_download = false;
                }

                state.is_loading = false;
                state.pending_cancellation = None;
                state.notice = Some("Booking cancelled successfully.".to_string());
                smallvec![Effect::None]
            },

            ManagerAction::RefundFailed { message } => {
                state.error_message = Some(message);
                state.is_loading = false;
                state.pending_cancellation = None;
                smallvec![Effect::None]
            },

            ManagerAction::DownloadTicket { booking_id } => {
                state.is_loading = true;

                let gateway = env.gateway();
                smallvec![Effect::future(async move {
                    match gateway.generate_ticket(booking_id).await {
                        Ok(url) => Some(ManagerAction::TicketReady { url }),
                        Err(error) => Some(ManagerAction::TicketFailed {
                            message: format!(
                                "Failed to generate ticket. {}",
                                error.user_message()
                            ),
                        }),
                    }
                })]
            },

            ManagerAction::TicketReady { url } => {
                state.ticket_url = Some(url);
                state.is_loading = false;
                smallvec![Effect::None]
            },

            ManagerAction::TicketFailed { message } => {
                state.error_message = Some(message);
                state.is_loading = false;
                smallvec![Effect::None]
            },
        }
    }
}
