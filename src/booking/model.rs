use serde::{Deserialize, Serialize};

use crate::user;

use super::Status;

/// Lifecycle event as posted by the booking backend. Carries the display
/// fields the push notification needs, so receiving clients render it
/// without a follow-up fetch.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BookingEvent {
    pub booking_id: String,
    pub customer: user::Sub,
    pub customer_name: String,
    pub provider: user::Sub,
    pub service_title: String,
    pub status: Status,
}
