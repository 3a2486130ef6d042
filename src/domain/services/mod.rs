pub mod booking_service;
pub mod event_service;
pub mod normalize;
pub mod slug;
pub mod validation;
