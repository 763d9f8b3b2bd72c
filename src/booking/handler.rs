use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use log::error;

use crate::event::model::Notification;
use crate::event::service::EventService;

use super::Status;
use super::model::BookingEvent;

/// A freshly created booking notifies the provider; every later transition
/// notifies the customer. Offline targets are silent no-ops, the booking
/// record itself is the durable truth.
pub async fn notify(
    event_service: State<EventService>,
    Json(event): Json<BookingEvent>,
) -> StatusCode {
    let (target, noti) = match event.status {
        Status::Created => (
            event.provider.clone(),
            Notification::NewBooking {
                booking_id: event.booking_id,
                customer: event.customer,
                customer_name: event.customer_name,
                service_title: event.service_title,
            },
        ),
        status => (
            event.customer.clone(),
            Notification::BookingStatus {
                booking_id: event.booking_id,
                customer: event.customer,
                service_title: event.service_title,
                status,
            },
        ),
    };

    if let Err(e) = event_service.publish(&target, &noti).await {
        error!("failed to publish booking notification: {e}");
    }

    StatusCode::ACCEPTED
}
