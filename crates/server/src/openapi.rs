//! OpenAPI document served at `/api-docs/openapi.json`.
//!
//! Request bodies are described by the `*Request` mirrors below; dates travel
//! as `YYYY-MM-DD` strings and timestamps as RFC 3339.

use std::collections::BTreeMap;

use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub version: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub name: String, pub password: String, pub phone: Option<String> }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct ChangePasswordRequest { pub current_password: String, pub new_password: String }

#[derive(ToSchema)]
pub struct CourseRequest {
    pub title: String,
    /// Derived from the title when absent
    pub slug: Option<String>,
    pub description: Option<String>,
    pub duration_weeks: Option<i32>,
    pub monthly_fee: i64,
    pub is_active: Option<bool>,
}

#[derive(ToSchema)]
pub struct CourseUpdateRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub duration_weeks: Option<i32>,
    pub monthly_fee: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(ToSchema)]
pub struct ServiceRequest {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(ToSchema)]
pub struct ServiceUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(ToSchema)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub course_id: Option<i32>,
    pub service_id: Option<i32>,
    pub preferred_time: Option<String>,
    pub message: Option<String>,
}

#[derive(ToSchema)]
pub struct StatusRequest {
    /// pending, confirmed, completed or cancelled
    pub status: String,
}

#[derive(ToSchema)]
pub struct ContactRequest { pub name: String, pub email: String, pub subject: Option<String>, pub body: String }

#[derive(ToSchema)]
pub struct ReadFlagRequest { pub is_read: bool }

#[derive(ToSchema)]
pub struct DirectMessageRequest { pub recipient_id: i32, pub body: String }

#[derive(ToSchema)]
pub struct TestimonialRequest { pub author_name: String, pub content: String, pub rating: i16 }

#[derive(ToSchema)]
pub struct TestimonialUpdateRequest { pub is_approved: Option<bool>, pub content: Option<String>, pub rating: Option<i16> }

/// Flat `{key: value}` object; keys are `[a-z0-9_.]`, 1 to 64 chars.
#[derive(ToSchema)]
pub struct SettingsRequest(pub BTreeMap<String, String>);

#[derive(ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    /// student, teacher or admin
    pub role: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    /// active or disabled
    pub status: Option<String>,
    pub phone: Option<String>,
}

#[derive(ToSchema)]
pub struct FeePlanRequest {
    pub student_id: i32,
    pub course_id: Option<i32>,
    pub total_amount: i64,
    /// monthly or lump_sum
    pub plan_type: String,
    /// Monthly plans only, 1..=36
    pub installment_count: Option<i32>,
    /// YYYY-MM-DD
    pub start_date: String,
}

#[derive(ToSchema)]
pub struct PaymentRequest {
    pub amount: i64,
    /// cash, bank_transfer, online or other
    pub method: String,
    pub reference: Option<String>,
    /// RFC 3339; defaults to now
    pub paid_at: Option<String>,
}

#[derive(ToSchema)]
pub struct ScheduleRequest {
    pub teacher_id: i32,
    pub student_id: i32,
    pub course_id: Option<i32>,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: i16,
    /// HH:MM
    pub start_time: String,
    pub duration_minutes: i32,
    pub meeting_link: Option<String>,
}

#[derive(ToSchema)]
pub struct BroadcastRequest {
    pub user_id: Option<i32>,
    pub role: Option<String>,
    pub title: String,
    pub body: String,
    pub kind: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::auth::change_password,
        crate::routes::catalog::public_courses,
        crate::routes::catalog::public_course,
        crate::routes::catalog::public_services,
        crate::routes::catalog::list_courses,
        crate::routes::catalog::create_course,
        crate::routes::catalog::update_course,
        crate::routes::catalog::delete_course,
        crate::routes::catalog::list_services,
        crate::routes::catalog::create_service,
        crate::routes::catalog::update_service,
        crate::routes::catalog::delete_service,
        crate::routes::bookings::create,
        crate::routes::bookings::list,
        crate::routes::bookings::update_status,
        crate::routes::bookings::delete,
        crate::routes::messages::submit_contact,
        crate::routes::messages::list_contact,
        crate::routes::messages::set_contact_read,
        crate::routes::messages::delete_contact,
        crate::routes::messages::inbox,
        crate::routes::messages::contacts,
        crate::routes::messages::send,
        crate::routes::messages::mark_read,
        crate::routes::testimonials::public_list,
        crate::routes::testimonials::submit,
        crate::routes::testimonials::list,
        crate::routes::testimonials::update,
        crate::routes::testimonials::delete,
        crate::routes::settings::get_all,
        crate::routes::settings::put_many,
        crate::routes::users::list,
        crate::routes::users::create,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::fees::create_plan,
        crate::routes::fees::list_plans,
        crate::routes::fees::delete_plan,
        crate::routes::fees::record_payment,
        crate::routes::fees::my_fees,
        crate::routes::fees::account_book,
        crate::routes::fees::challan,
        crate::routes::schedule::create,
        crate::routes::schedule::list,
        crate::routes::schedule::delete,
        crate::routes::schedule::mine,
        crate::routes::schedule::teacher_students,
        crate::routes::notifications::feed,
        crate::routes::notifications::mark_read,
        crate::routes::notifications::mark_all_read,
        crate::routes::notifications::broadcast,
        crate::routes::dashboard::stats,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ChangePasswordRequest,
            CourseRequest,
            CourseUpdateRequest,
            ServiceRequest,
            ServiceUpdateRequest,
            BookingRequest,
            StatusRequest,
            ContactRequest,
            ReadFlagRequest,
            DirectMessageRequest,
            TestimonialRequest,
            TestimonialUpdateRequest,
            SettingsRequest,
            CreateUserRequest,
            UpdateUserRequest,
            FeePlanRequest,
            PaymentRequest,
            ScheduleRequest,
            BroadcastRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "catalog"),
        (name = "bookings"),
        (name = "messages"),
        (name = "inbox"),
        (name = "testimonials"),
        (name = "settings"),
        (name = "fees"),
        (name = "schedule"),
        (name = "notifications"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
