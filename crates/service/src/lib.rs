//! Service layer providing business operations on top of models.
//! - Separates business logic from data access and HTTP.
//! - Reuses validation and entity definitions in `models` crate.
//! - Functions take `&impl ConnectionTrait` so they also run inside a transaction.

pub mod errors;
pub mod pagination;
pub mod grouping;
pub mod auth;

pub mod catalog;
pub mod booking_service;
pub mod message_service;
pub mod testimonial_service;
pub mod settings_service;
pub mod user_service;
pub mod fees;
pub mod schedule_service;
pub mod notification_service;
pub mod stats;

#[cfg(test)]
pub mod test_support;
