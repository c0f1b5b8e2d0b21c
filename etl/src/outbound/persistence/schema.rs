//! Diesel table definitions for the destination database.

diesel::table! {
    /// Normalized users keyed by their upstream login uuid.
    ///
    /// Rows are insert-only; a later record with an existing `uuid` is
    /// dropped. `email` carries a unique constraint.
    random_users (uuid) {
        /// Primary key: upstream `login.uuid`.
        uuid -> Text,
        full_name -> Nullable<Text>,
        gender -> Nullable<Text>,
        age -> Nullable<Int4>,
        email -> Nullable<Text>,
        city -> Nullable<Text>,
        country -> Nullable<Text>,
    }
}
