use crate::domain::models::booking::Booking;
use serde::Serialize;

#[derive(Serialize)]
pub struct EventBookingsResponse {
    pub count: i64,
    pub bookings: Vec<Booking>,
}
