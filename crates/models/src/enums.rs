//! Fixed string sets stored in `VARCHAR` columns.
//!
//! Columns keep plain strings so the schema stays portable between Postgres
//! and SQLite; these enums are the only way values get in or out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name { $($variant),+ }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self { $($name::$variant => $value),+ }
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($value => Ok($name::$variant),)+
                    other => Err(ModelError::Validation(format!(
                        "invalid {} '{}'; expected one of: {}",
                        $label,
                        other,
                        [$($value),+].join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String { v.as_str().to_string() }
        }
    };
}

string_enum!(
    /// Dashboard a user lands on.
    Role, "role" {
        Student => "student",
        Teacher => "teacher",
        Admin => "admin",
    }
);

string_enum!(UserStatus, "user status" {
    Active => "active",
    Disabled => "disabled",
});

string_enum!(
    /// `pending → confirmed → completed/cancelled`, set by admin clicks.
    BookingStatus, "booking status" {
        Pending => "pending",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

string_enum!(PlanType, "plan type" {
    Monthly => "monthly",
    LumpSum => "lump_sum",
});

string_enum!(
    /// Stored installment state. `Overdue` is never stored; it is derived at
    /// read time from the due date.
    InstallmentStatus, "installment status" {
        Pending => "pending",
        Partial => "partial",
        Paid => "paid",
        Overdue => "overdue",
    }
);

string_enum!(PaymentMethod, "payment method" {
    Cash => "cash",
    BankTransfer => "bank_transfer",
    Online => "online",
    Other => "other",
});

string_enum!(NotificationKind, "notification kind" {
    Info => "info",
    Fee => "fee",
    Schedule => "schedule",
    Message => "message",
});
