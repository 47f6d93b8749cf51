//! Field validation rules

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Input formats accepted for dates, canonical first
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Canonical date format used in submitted records
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_EMAIL_LOCAL_LENGTH: usize = 64;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("EMAIL_PATTERN failed")
});

/// A validation error attached to a single field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,
    #[error("Must be at least {required} characters (currently {actual})")]
    MinLength { required: usize, actual: usize },
    #[error("Must be at most {required} characters (currently {actual})")]
    MaxLength { required: usize, actual: usize },
    #[error("Age must be between {min} and {max} years")]
    AgeInvalid { min: u32, max: u32 },
    #[error("Enter a valid email address")]
    Email,
    #[error("This email is already registered")]
    EmailExists,
    #[error("Could not verify this email, edit it to retry")]
    EmailUnverified,
}

impl FieldError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::Required => "required",
            FieldError::MinLength { .. } => "minLength",
            FieldError::MaxLength { .. } => "maxLength",
            FieldError::AgeInvalid { .. } => "ageInvalid",
            FieldError::Email => "email",
            FieldError::EmailExists => "emailExists",
            FieldError::EmailUnverified => "emailUnverified",
        }
    }
}

/// A synchronous rule applied to a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    AgeBetween { min: u32, max: u32 },
    Email,
}

impl Rule {
    /// Check `value` against this rule; `today` anchors age rules
    pub fn check(&self, value: &str, today: NaiveDate) -> Option<FieldError> {
        match *self {
            Rule::Required => required(value),
            Rule::MinLength(min) => min_length(value, min),
            Rule::MaxLength(max) => max_length(value, max),
            Rule::AgeBetween { min, max } => age_between(value, min, max, today),
            Rule::Email => email(value),
        }
    }
}

pub fn required(value: &str) -> Option<FieldError> {
    value.is_empty().then_some(FieldError::Required)
}

/// Empty values pass; `required` reports them.
pub fn min_length(value: &str, min: usize) -> Option<FieldError> {
    let actual = value.chars().count();
    (actual > 0 && actual < min).then_some(FieldError::MinLength {
        required: min,
        actual,
    })
}

pub fn max_length(value: &str, max: usize) -> Option<FieldError> {
    let actual = value.chars().count();
    (actual > max).then_some(FieldError::MaxLength {
        required: max,
        actual,
    })
}

/// Age range check. An empty value is skipped rather than failed; an
/// unparsable date has no age and fails.
pub fn age_between(value: &str, min: u32, max: u32, today: NaiveDate) -> Option<FieldError> {
    if value.is_empty() {
        return None;
    }
    let in_range = parse_date(value)
        .map(|birth| age_on(birth, today))
        .is_some_and(|age| age >= min as i32 && age <= max as i32);
    (!in_range).then_some(FieldError::AgeInvalid { min, max })
}

pub fn email(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return None;
    }
    let local_len = value.split('@').next().map_or(0, str::len);
    let valid = value.len() <= MAX_EMAIL_LENGTH
        && local_len <= MAX_EMAIL_LOCAL_LENGTH
        && EMAIL_PATTERN.is_match(value);
    (!valid).then_some(FieldError::Email)
}

/// Parse a date in any accepted input format
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Completed years between `birth` and `today`
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod lengths {
        use super::*;

        #[test]
        fn test_required_only_fires_on_empty() {
            assert_eq!(required(""), Some(FieldError::Required));
            assert_eq!(required(" "), None);
        }

        #[test]
        fn test_min_length_skips_empty() {
            assert_eq!(min_length("", 4), None);
            assert_eq!(
                min_length("abc", 4),
                Some(FieldError::MinLength {
                    required: 4,
                    actual: 3
                })
            );
            assert_eq!(min_length("abcd", 4), None);
        }

        #[test]
        fn test_max_length_bound_is_inclusive() {
            assert_eq!(max_length(&"a".repeat(64), 64), None);
            assert_eq!(
                max_length(&"a".repeat(65), 64),
                Some(FieldError::MaxLength {
                    required: 64,
                    actual: 65
                })
            );
        }

        #[test]
        fn test_length_counts_characters_not_bytes() {
            assert_eq!(min_length("Zoë", 3), None);
            assert_eq!(max_length("ÄÖÜß", 4), None);
        }
    }

    mod age {
        use super::*;

        #[test]
        fn test_age_before_and_after_birthday() {
            let birth = date(2000, 6, 15);
            assert_eq!(age_on(birth, date(2018, 6, 14)), 17);
            assert_eq!(age_on(birth, date(2018, 6, 15)), 18);
            assert_eq!(age_on(birth, date(2018, 7, 1)), 18);
        }

        #[test]
        fn test_lower_boundary() {
            let today = date(2024, 3, 10);
            assert_eq!(age_between("2006-03-10", 18, 115, today), None);
            assert_eq!(
                age_between("2006-03-11", 18, 115, today),
                Some(FieldError::AgeInvalid { min: 18, max: 115 })
            );
        }

        #[test]
        fn test_upper_boundary() {
            let today = date(2024, 3, 10);
            // 115 until the day before the 116th birthday
            assert_eq!(age_between("1908-03-11", 18, 115, today), None);
            assert_eq!(
                age_between("1908-03-10", 18, 115, today),
                Some(FieldError::AgeInvalid { min: 18, max: 115 })
            );
        }

        #[test]
        fn test_every_age_in_range_is_accepted() {
            let today = date(2024, 12, 31);
            for years in 18..=115 {
                let birth = date(2024 - years, 12, 31).format(CANONICAL_DATE_FORMAT);
                assert_eq!(age_between(&birth.to_string(), 18, 115, today), None);
            }
            for years in [0, 10, 17, 116, 130] {
                let birth = date(2024 - years, 12, 31).format(CANONICAL_DATE_FORMAT);
                assert!(age_between(&birth.to_string(), 18, 115, today).is_some());
            }
        }

        #[test]
        fn test_empty_value_skips_age_check() {
            assert_eq!(age_between("", 18, 115, date(2024, 1, 1)), None);
        }

        #[test]
        fn test_unparsable_date_is_invalid() {
            assert!(age_between("not a date", 18, 115, date(2024, 1, 1)).is_some());
            assert!(age_between("2001-02-30", 18, 115, date(2024, 1, 1)).is_some());
        }

        #[test]
        fn test_parse_accepts_alternate_formats() {
            assert_eq!(parse_date("2001-03-09"), Some(date(2001, 3, 9)));
            assert_eq!(parse_date("2001/03/09"), Some(date(2001, 3, 9)));
            assert_eq!(parse_date("09.03.2001"), Some(date(2001, 3, 9)));
            assert_eq!(parse_date("03-09"), None);
        }
    }

    mod email_syntax {
        use super::*;

        #[test]
        fn test_valid_addresses() {
            for value in ["alice@example.com", "a.b+c@sub.example.org", "x@localhost"] {
                assert_eq!(email(value), None, "{value}");
            }
        }

        #[test]
        fn test_invalid_addresses() {
            for value in [
                "plainaddress",
                "@example.com",
                "alice@",
                "alice@@example.com",
                "alice@-example.com",
                "al ice@example.com",
                "alice..b@example.com",
            ] {
                assert_eq!(email(value), Some(FieldError::Email), "{value}");
            }
        }

        #[test]
        fn test_local_part_length_limit() {
            let value = format!("{}@example.com", "a".repeat(65));
            assert_eq!(email(&value), Some(FieldError::Email));
        }

        #[test]
        fn test_empty_is_not_a_syntax_error() {
            assert_eq!(email(""), None);
        }
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(FieldError::Required.code(), "required");
        assert_eq!(FieldError::AgeInvalid { min: 18, max: 115 }.code(), "ageInvalid");
        assert_eq!(FieldError::EmailExists.code(), "emailExists");
    }

    #[test]
    fn test_rule_dispatch() {
        let today = date(2024, 1, 1);
        assert_eq!(Rule::Required.check("", today), Some(FieldError::Required));
        assert_eq!(Rule::Email.check("bad", today), Some(FieldError::Email));
        assert_eq!(Rule::MaxLength(2).check("ab", today), None);
    }
}
