use std::sync::Arc;
use crate::config::Config;
use crate::domain::services::{booking_service::BookingService, event_service::EventService};
use crate::infra::db::Shutdown;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_service: Arc<EventService>,
    pub booking_service: Arc<BookingService>,
    pub database: Arc<dyn Shutdown>,
}
