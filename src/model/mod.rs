//! Row types and the text-backed enumerations stored in them.

mod appointment;
mod booking;
mod doctor;

pub use appointment::*;
pub use booking::*;
pub use doctor::*;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Unknown text value for one of the enumerations below.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Text enum stored in a TEXT column: Display/FromStr, serde as lowercase string, sqlx encode/decode.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownVariant { kind: $kind, value: s.to_string() }),
                }
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                Ok(s.parse()?)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

text_enum!(Role, "role", {
    Admin => "admin",
    Member => "member",
    Supporter => "supporter",
});

text_enum!(AppointmentStatus, "appointment status", {
    Processing => "processing",
    Done => "done",
    Cancelled => "cancelled",
});

text_enum!(BookingStatus, "booking status", {
    Processing => "processing",
    Verified => "verified",
    Cancelled => "cancelled",
});

#[derive(Clone, Debug, Serialize, Deserialize, FromRow)]
pub struct Drug {
    pub id: i64,
    pub name: String,
}

/// Tables that other rows point at; used for foreign-key existence checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reference {
    Patient,
    Service,
    Speciality,
    Room,
}

impl Reference {
    pub fn table(&self) -> &'static str {
        match self {
            Reference::Patient => "patients",
            Reference::Service => "services",
            Reference::Speciality => "specialities",
            Reference::Room => "rooms",
        }
    }
}
