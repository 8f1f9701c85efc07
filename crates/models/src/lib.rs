pub mod errors;
pub mod db;
pub mod enums;
pub mod validate;

pub mod user;
pub mod user_credentials;
pub mod course;
pub mod service_offering;
pub mod booking;
pub mod contact_message;
pub mod direct_message;
pub mod testimonial;
pub mod setting;
pub mod fee_plan;
pub mod installment;
pub mod payment;
pub mod class_session;
pub mod notification;

pub use enums::{
    BookingStatus, InstallmentStatus, NotificationKind, PaymentMethod, PlanType, Role, UserStatus,
};
pub use errors::ModelError;

#[cfg(test)]
mod tests;
