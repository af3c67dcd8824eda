//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs carry these wrappers instead of raw primitives so that
//! identifiers, coordinates and numeric constraints are enforced at the
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be positive was zero/negative or invalid.
    #[error("{0} must be greater than zero")]
    NonPositiveNumber(&'static str),
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A numeric value fell outside of its allowed closed interval.
    #[error("{0} is out of range")]
    OutOfRange(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A fixed-width alphabetic code had the wrong shape.
    #[error("{0} must be {1} ASCII letters")]
    InvalidCode(&'static str, usize),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

/// Upper-cased fixed-width alphabetic codes (country, currency).
macro_rules! alpha_code_newtype {
    ($name:ident, $doc:expr, $field:expr, $len:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Trims and upper-cases the code, rejecting anything but `$len` letters.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let code = trim_and_require_non_empty(value, $field)?.to_ascii_uppercase();
                if code.len() == $len && code.chars().all(|c| c.is_ascii_alphabetic()) {
                    Ok(Self(code))
                } else {
                    Err(TypeConstraintError::InvalidCode($field, $len))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

/// Finite `f64` values constrained to a closed interval.
macro_rules! bounded_f64_newtype {
    ($name:ident, $doc:expr, $field:expr, $min:expr, $max:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
        #[serde(try_from = "f64", into = "f64")]
        pub struct $name(f64);

        impl $name {
            pub const MIN: f64 = $min;
            pub const MAX: f64 = $max;

            /// Constructs a finite value inside the allowed interval.
            pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
                if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::OutOfRange($field))
                }
            }

            /// Returns the raw `f64` value.
            pub const fn get(self) -> f64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(UserId, "Unique identifier for a user account.", "user_id");
id_newtype!(ListingId, "Unique identifier for a listing.", "listing_id");
id_newtype!(LocationId, "Unique identifier for a location.", "location_id");
id_newtype!(TagId, "Unique identifier for a tag.", "tag_id");
id_newtype!(SwipeId, "Unique identifier for a swipe.", "swipe_id");
id_newtype!(MatchId, "Unique identifier for a match.", "match_id");

non_empty_string_newtype!(
    LocationName,
    "Optional human readable name distinguishing locations at one coordinate.",
    "location name"
);
non_empty_string_newtype!(Locality, "City or town of a location.", "locality");
non_empty_string_newtype!(
    ListingDescription,
    "Free-form listing description enforcing non-empty values.",
    "description"
);

alpha_code_newtype!(CountryCode, "ISO 3166-1 alpha-2 country code.", "country", 2);
alpha_code_newtype!(CurrencyCode, "ISO 4217 currency code.", "currency", 3);

bounded_f64_newtype!(
    Latitude,
    "Latitude in decimal degrees.",
    "latitude",
    -90.0,
    90.0
);
bounded_f64_newtype!(
    Longitude,
    "Longitude in decimal degrees.",
    "longitude",
    -180.0,
    180.0
);
bounded_f64_newtype!(
    TagSimilarity,
    "Asymmetric tag overlap score in the inclusive range [0.0, 1.0].",
    "tag similarity",
    0.0,
    1.0
);

impl TagSimilarity {
    /// No overlap at all.
    pub const NONE: TagSimilarity = TagSimilarity(0.0);
}

/// Search radius of a listing in kilometres.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(try_from = "f64", into = "f64")]
pub struct RadiusKm(f64);

impl RadiusKm {
    /// Constructs a strictly positive, finite radius.
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveNumber("radius"))
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }

    /// The radius expressed in metres, the unit of location searches.
    pub fn as_meters(self) -> f64 {
        self.0 * 1000.0
    }
}

impl TryFrom<f64> for RadiusKm {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RadiusKm> for f64 {
    fn from(value: RadiusKm) -> Self {
        value.0
    }
}

/// Nightly budget in the listing's currency.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(try_from = "f64", into = "f64")]
pub struct NightlyBudget(f64);

impl NightlyBudget {
    /// Constructs a finite budget that is zero or greater.
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeNumber("budget"))
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for NightlyBudget {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NightlyBudget> for f64 {
    fn from(value: NightlyBudget) -> Self {
        value.0
    }
}

/// Tag label. Tags are deduplicated by name, so names are trimmed and
/// lower-cased on construction.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    pub const MAX_LEN: usize = 50;

    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let name = trim_and_require_non_empty(value, "tag")?.to_lowercase();
        if name.chars().count() > Self::MAX_LEN {
            return Err(TypeConstraintError::InvalidValue(format!(
                "tag longer than {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TagName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TagName {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TagName> for String {
    fn from(value: TagName) -> Self {
        value.0
    }
}

/// Kind of travel or hosting intent a listing represents.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListingCategory {
    #[serde(rename = "short")]
    ShortTerm,
    #[serde(rename = "long")]
    LongTerm,
    Hosting,
}

impl ListingCategory {
    /// String representation used in persistence and on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShortTerm => "short",
            Self::LongTerm => "long",
            Self::Hosting => "hosting",
        }
    }
}

impl Display for ListingCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ListingCategory {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "short" => Ok(Self::ShortTerm),
            "long" => Ok(Self::LongTerm),
            "hosting" => Ok(Self::Hosting),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "listing category: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for ListingCategory {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}
