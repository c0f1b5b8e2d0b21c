//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer.

use diesel::prelude::*;

use super::schema::random_users;
use crate::domain::NormalizedUserRecord;

/// Insertable struct for new `random_users` rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = random_users)]
pub(crate) struct NewRandomUserRow<'a> {
    pub uuid: &'a str,
    pub full_name: &'a str,
    pub gender: &'a str,
    pub age: i32,
    pub email: &'a str,
    pub city: &'a str,
    pub country: &'a str,
}

impl<'a> From<&'a NormalizedUserRecord> for NewRandomUserRow<'a> {
    fn from(record: &'a NormalizedUserRecord) -> Self {
        Self {
            uuid: record.uuid.as_str(),
            full_name: record.full_name.as_str(),
            gender: record.gender.as_str(),
            age: record.age,
            email: record.email.as_str(),
            city: record.city.as_str(),
            country: record.country.as_str(),
        }
    }
}
