//! Raw-to-normalised user mapping.

use crate::domain::{NormalizedUserRecord, PipelineError, RawUserRecord};

/// Map a batch of raw users into flat records, preserving order.
///
/// The batch is rejected as a whole when any record lacks a required field;
/// no partial output is produced. An empty `login.uuid` counts as missing
/// because it could not key an insert-if-absent.
///
/// # Errors
///
/// Returns [`PipelineError::FieldMissing`] naming the first missing dotted
/// path and the index of the offending record.
///
/// # Examples
///
/// ```
/// use random_user_etl::domain::{
///     RawDateOfBirth, RawLocation, RawLogin, RawName, RawUserRecord, transform_users,
/// };
///
/// let raw = RawUserRecord {
///     name: Some(RawName {
///         first: Some("Ada".to_owned()),
///         last: Some("Lovelace".to_owned()),
///     }),
///     gender: Some("female".to_owned()),
///     dob: Some(RawDateOfBirth { age: Some(36) }),
///     email: Some("ada@example.com".to_owned()),
///     location: Some(RawLocation {
///         city: Some("London".to_owned()),
///         country: Some("UK".to_owned()),
///     }),
///     login: Some(RawLogin { uuid: Some("abc-123".to_owned()) }),
/// };
///
/// let users = transform_users(vec![raw]).expect("well-formed record");
/// assert_eq!(users[0].full_name, "Ada Lovelace");
/// ```
pub fn transform_users(
    raw: Vec<RawUserRecord>,
) -> Result<Vec<NormalizedUserRecord>, PipelineError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| normalize(index, record))
        .collect()
}

fn normalize(index: usize, record: RawUserRecord) -> Result<NormalizedUserRecord, PipelineError> {
    let missing = |path: &str| PipelineError::field_missing(path, index);

    let name = record.name.ok_or_else(|| missing("name"))?;
    let first = name.first.ok_or_else(|| missing("name.first"))?;
    let last = name.last.ok_or_else(|| missing("name.last"))?;
    let gender = record.gender.ok_or_else(|| missing("gender"))?;
    let age = record
        .dob
        .ok_or_else(|| missing("dob"))?
        .age
        .ok_or_else(|| missing("dob.age"))?;
    let email = record.email.ok_or_else(|| missing("email"))?;
    let location = record.location.ok_or_else(|| missing("location"))?;
    let city = location.city.ok_or_else(|| missing("location.city"))?;
    let country = location.country.ok_or_else(|| missing("location.country"))?;
    let uuid = record
        .login
        .ok_or_else(|| missing("login"))?
        .uuid
        .filter(|uuid| !uuid.trim().is_empty())
        .ok_or_else(|| missing("login.uuid"))?;

    Ok(NormalizedUserRecord {
        uuid,
        full_name: format!("{first} {last}"),
        gender,
        age,
        email,
        city,
        country,
    })
}
