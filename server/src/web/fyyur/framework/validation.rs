use crate::web::fyyur::framework::form_values::{
    FormValueRepresentation, ValidateFromFormInput, ValidationDataForFormValue,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use std::fmt::Debug;

/// A required text value with at most `MAX_CHARS` characters
#[derive(Default, Debug, PartialEq)]
pub struct NonEmptyString<const MAX_CHARS: usize>(pub String);

impl<const MAX_CHARS: usize> NonEmptyString<MAX_CHARS> {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<const MAX_CHARS: usize> FormValueRepresentation for NonEmptyString<MAX_CHARS> {
    fn into_form_value_string(self) -> String {
        self.0
    }
}
impl<const MAX_CHARS: usize> ValidateFromFormInput for NonEmptyString<MAX_CHARS> {
    fn from_form_value(value: &str) -> Result<Self, String> {
        let value = value.trim();
        if value.is_empty() {
            return Err("This field is required.".to_owned());
        }
        check_max_chars(value, MAX_CHARS)?;
        Ok(NonEmptyString(value.to_owned()))
    }
}

/// An optional text value with at most `MAX_CHARS` characters. The empty string represents "not
/// given".
#[derive(Default, Debug, PartialEq)]
pub struct OptionalText<const MAX_CHARS: usize>(pub String);

impl<const MAX_CHARS: usize> OptionalText<MAX_CHARS> {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<const MAX_CHARS: usize> FormValueRepresentation for OptionalText<MAX_CHARS> {
    fn into_form_value_string(self) -> String {
        self.0
    }
}
impl<const MAX_CHARS: usize> ValidateFromFormInput for OptionalText<MAX_CHARS> {
    fn from_form_value(value: &str) -> Result<Self, String> {
        let value = value.trim();
        check_max_chars(value, MAX_CHARS)?;
        Ok(OptionalText(value.to_owned()))
    }
}

/// Character count limit, as enforced by the database for VARCHAR(n) columns
fn check_max_chars(value: &str, max_chars: usize) -> Result<(), String> {
    if value.chars().count() > max_chars {
        Err(format!("Must not be longer than {} characters.", max_chars))
    } else {
        Ok(())
    }
}

/// A US phone number like `123-456-7890` (dashes are optional) or the empty string
#[derive(Default, Debug)]
pub struct OptionalPhoneNumber(pub String);

impl OptionalPhoneNumber {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FormValueRepresentation for OptionalPhoneNumber {
    fn into_form_value_string(self) -> String {
        self.0
    }
}
impl ValidateFromFormInput for OptionalPhoneNumber {
    fn from_form_value(value: &str) -> Result<Self, String> {
        lazy_static! {
            static ref RE: regex::Regex = regex::Regex::new(r"^[0-9]{3}-?[0-9]{3}-?[0-9]{4}$").unwrap();
        }
        let value = value.trim();
        if value.is_empty() || RE.is_match(value) {
            Ok(OptionalPhoneNumber(value.to_owned()))
        } else {
            Err("Invalid phone number. Expected format: 123-456-7890".to_owned())
        }
    }
}

/// An absolute http(s) URL with at most `MAX_CHARS` characters or the empty string
#[derive(Default, Debug)]
pub struct OptionalUrl<const MAX_CHARS: usize>(pub String);

impl<const MAX_CHARS: usize> OptionalUrl<MAX_CHARS> {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<const MAX_CHARS: usize> FormValueRepresentation for OptionalUrl<MAX_CHARS> {
    fn into_form_value_string(self) -> String {
        self.0
    }
}
impl<const MAX_CHARS: usize> ValidateFromFormInput for OptionalUrl<MAX_CHARS> {
    fn from_form_value(value: &str) -> Result<Self, String> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(OptionalUrl(String::new()));
        }
        check_max_chars(value, MAX_CHARS)?;
        let url = url::Url::parse(value).map_err(|e| format!("Invalid URL: {}", e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err("URL must start with http:// or https://".to_owned());
        }
        Ok(OptionalUrl(value.to_owned()))
    }
}

pub const US_STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR",
    "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

/// Two-letter code of a US state (or DC), from [US_STATES]
#[derive(Default, Debug)]
pub struct UsState(pub String);

impl UsState {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FormValueRepresentation for UsState {
    fn into_form_value_string(self) -> String {
        self.0
    }
}
impl ValidateFromFormInput for UsState {
    fn from_form_value(value: &str) -> Result<Self, String> {
        if US_STATES.contains(&value) {
            Ok(UsState(value.to_owned()))
        } else {
            Err("Please select a US state.".to_owned())
        }
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Int32FromList(pub i32);

impl Int32FromList {
    pub fn into_inner(self) -> i32 {
        self.0
    }
}

impl FormValueRepresentation for Int32FromList {
    fn into_form_value_string(self) -> String {
        self.0.to_string()
    }
}

impl ValidationDataForFormValue<Int32FromList> for &Vec<i32> {
    fn validate_form_value(self, value: &'_ str) -> Result<Int32FromList, String> {
        let id: i32 = value
            .parse()
            .map_err(|e| format!("Not a valid id: {}", e))?;
        if self.contains(&id) {
            Ok(Int32FromList(id))
        } else {
            Err("Unknown id".to_owned())
        }
    }
}

/// Start time of a show, entered as `YYYY-MM-DD HH:MM[:SS]` (or with `T` separator, as produced
/// by `datetime-local` inputs) and interpreted as UTC
#[derive(Debug, PartialEq)]
pub struct ShowStartTime(pub DateTime<Utc>);

impl ShowStartTime {
    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }
}

impl FormValueRepresentation for ShowStartTime {
    fn into_form_value_string(self) -> String {
        self.0.format("%Y-%m-%dT%H:%M").to_string()
    }
}

impl ValidateFromFormInput for ShowStartTime {
    fn from_form_value(value: &str) -> Result<Self, String> {
        const FORMATS: [&str; 4] = [
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M",
        ];
        let value = value.trim();
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .map(|t| ShowStartTime(t.and_utc()))
            .ok_or_else(|| "Invalid start time. Expected format: YYYY-MM-DD HH:MM".to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_phone_number() {
        for valid in ["", "123-456-7890", "1234567890", "123456-7890", " 326-123-5000 "] {
            assert!(
                OptionalPhoneNumber::from_form_value(valid).is_ok(),
                "{}",
                valid
            );
        }
        for invalid in ["123-456-789", "phone", "(123) 456-7890", "123--456-7890"] {
            assert!(
                OptionalPhoneNumber::from_form_value(invalid).is_err(),
                "{}",
                invalid
            );
        }
    }

    #[test]
    fn test_optional_url() {
        type Link = OptionalUrl<40>;
        assert_eq!(Link::from_form_value("").unwrap().0, "");
        assert!(Link::from_form_value("https://www.facebook.com/TheMusicalHop").is_ok());
        assert!(Link::from_form_value("www.facebook.com").is_err());
        assert!(Link::from_form_value("ftp://example.com/image.png").is_err());
        assert!(Link::from_form_value("https://www.facebook.com/TheMusicalHopSanFrancisco").is_err());
    }

    #[test]
    fn test_max_chars() {
        assert_eq!(
            NonEmptyString::<5>::from_form_value(" Hop ").unwrap().0,
            "Hop"
        );
        assert!(NonEmptyString::<5>::from_form_value("   ").is_err());
        // Characters are counted, not bytes
        assert!(NonEmptyString::<5>::from_form_value("Café!").is_ok());
        assert_eq!(
            NonEmptyString::<5>::from_form_value("Cafés!"),
            Err("Must not be longer than 5 characters.".to_owned())
        );
        assert_eq!(OptionalText::<5>::from_form_value("").unwrap().0, "");
        assert!(OptionalText::<5>::from_form_value("Looking").is_err());
    }

    #[test]
    fn test_us_state() {
        assert!(UsState::from_form_value("CA").is_ok());
        assert!(UsState::from_form_value("DC").is_ok());
        assert!(UsState::from_form_value("ca").is_err());
        assert!(UsState::from_form_value("XX").is_err());
    }

    #[test]
    fn test_int32_from_list() {
        let ids = vec![1, 4, 5];
        assert_eq!((&ids).validate_form_value("4"), Ok(Int32FromList(4)));
        assert!((&ids).validate_form_value("2").is_err());
        assert!((&ids).validate_form_value("abc").is_err());
    }

    #[test]
    fn test_show_start_time() {
        let expected = Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap();
        for value in [
            "2035-04-01 20:00:00",
            "2035-04-01 20:00",
            "2035-04-01T20:00",
            "2035-04-01T20:00:00",
        ] {
            assert_eq!(
                ShowStartTime::from_form_value(value),
                Ok(ShowStartTime(expected)),
                "{}",
                value
            );
        }
        assert!(ShowStartTime::from_form_value("2035-04-01").is_err());
        assert!(ShowStartTime::from_form_value("01.04.2035 20:00").is_err());
        assert_eq!(
            ShowStartTime(expected).into_form_value_string(),
            "2035-04-01T20:00"
        );
    }
}
