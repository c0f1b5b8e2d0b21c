//! Raw and normalised user records.
//!
//! `RawUserRecord` mirrors the nested shape served by randomuser.me with every
//! field optional. Presence is checked exactly once, when
//! [`crate::domain::transform_users`] turns raw records into
//! [`NormalizedUserRecord`] values, so missing-field errors can name the exact
//! dotted path.

/// Name block of a raw user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawName {
    /// Given name.
    pub first: Option<String>,
    /// Family name.
    pub last: Option<String>,
}

/// Date-of-birth block of a raw user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDateOfBirth {
    /// Age in whole years, derived by the source.
    pub age: Option<i32>,
}

/// Location block of a raw user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLocation {
    /// City name.
    pub city: Option<String>,
    /// Country name.
    pub country: Option<String>,
}

/// Login block of a raw user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLogin {
    /// Source-assigned identifier used as the persistence key.
    pub uuid: Option<String>,
}

/// One semi-structured user exactly as extracted from the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawUserRecord {
    /// `name.*`
    pub name: Option<RawName>,
    /// `gender`
    pub gender: Option<String>,
    /// `dob.*`
    pub dob: Option<RawDateOfBirth>,
    /// `email`
    pub email: Option<String>,
    /// `location.*`
    pub location: Option<RawLocation>,
    /// `login.*`
    pub login: Option<RawLogin>,
}

/// Flat user record ready for persistence.
///
/// ## Invariants
/// - `uuid` is non-empty and is the only key used for insert-if-absent.
/// - `email` is expected to be unique but is not checked here; the store
///   enforces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUserRecord {
    /// Primary identity, copied from `login.uuid`.
    pub uuid: String,
    /// `"{first} {last}"`.
    pub full_name: String,
    /// Copied from `gender`.
    pub gender: String,
    /// Copied from `dob.age`.
    pub age: i32,
    /// Copied from `email`.
    pub email: String,
    /// Copied from `location.city`.
    pub city: String,
    /// Copied from `location.country`.
    pub country: String,
}
