//! DTOs for decoding randomuser.me JSON responses.
//!
//! Every nested field is optional so that absence surfaces once, in the
//! domain transform, with the exact dotted path.

use serde::Deserialize;

use crate::domain::{RawDateOfBirth, RawLocation, RawLogin, RawName, RawUserRecord};

#[derive(Debug, Deserialize)]
pub(super) struct RandomUserResponseDto {
    pub(super) results: Option<Vec<RandomUserDto>>,
    pub(super) error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RandomUserDto {
    pub(super) name: Option<NameDto>,
    pub(super) gender: Option<String>,
    pub(super) dob: Option<DateOfBirthDto>,
    pub(super) email: Option<String>,
    pub(super) location: Option<LocationDto>,
    pub(super) login: Option<LoginDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NameDto {
    pub(super) first: Option<String>,
    pub(super) last: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DateOfBirthDto {
    pub(super) age: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocationDto {
    pub(super) city: Option<String>,
    pub(super) country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginDto {
    pub(super) uuid: Option<String>,
}

impl RandomUserResponseDto {
    pub(super) fn into_raw_users(self) -> Result<Vec<RawUserRecord>, String> {
        if let Some(message) = self.error {
            return Err(format!("upstream reported an error: {message}"));
        }
        let results = self
            .results
            .ok_or_else(|| "response is missing the `results` array".to_owned())?;
        Ok(results.into_iter().map(RawUserRecord::from).collect())
    }
}

impl From<RandomUserDto> for RawUserRecord {
    fn from(dto: RandomUserDto) -> Self {
        Self {
            name: dto.name.map(|name| RawName {
                first: name.first,
                last: name.last,
            }),
            gender: dto.gender,
            dob: dto.dob.map(|dob| RawDateOfBirth { age: dob.age }),
            email: dto.email,
            location: dto.location.map(|location| RawLocation {
                city: location.city,
                country: location.country,
            }),
            login: dto.login.map(|login| RawLogin { uuid: login.uuid }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Decoding coverage for the date-of-birth block.

    use rstest::rstest;

    use super::*;

    fn decode_first(body: &str) -> RawUserRecord {
        let response: RandomUserResponseDto =
            serde_json::from_str(body).expect("body should decode");
        response
            .into_raw_users()
            .expect("results should be present")
            .into_iter()
            .next()
            .expect("one user")
    }

    #[rstest]
    #[case::age_with_birth_timestamp(
        r#"{"results": [{"dob": {"date": "1815-12-10T00:00:00.000Z", "age": 36}}]}"#,
        Some(36)
    )]
    #[case::birth_timestamp_only(
        r#"{"results": [{"dob": {"date": "1815-12-10T00:00:00.000Z"}}]}"#,
        None
    )]
    fn only_age_is_kept_from_the_dob_block(#[case] body: &str, #[case] age: Option<i32>) {
        let user = decode_first(body);
        assert_eq!(user.dob, Some(RawDateOfBirth { age }));
    }
}
