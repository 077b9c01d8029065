//! Parsing for the raw string fields submitted by HTML forms.
//!
//! Forms are deserialized into `Option<String>` fields so that a missing or
//! malformed value becomes a 400 with a useful message instead of axum's
//! generic 422 rejection.

use time::{Date, macros::format_description};

use crate::{Error, category::Category};

/// Get the trimmed value of a field that must be filled in.
///
/// # Errors
/// Returns [Error::MissingField] if the field is absent or blank.
pub(crate) fn required<'a>(
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, Error> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingField(field)),
    }
}

/// Get the trimmed value of a field that may be left blank.
pub(crate) fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Parse a dollar amount such as "12.50".
///
/// # Errors
/// Returns [Error::InvalidField] if the value is not a finite number.
pub(crate) fn parse_amount(field: &'static str, value: &str) -> Result<f64, Error> {
    let invalid = || Error::InvalidField {
        field,
        value: value.to_owned(),
    };

    let amount: f64 = value.parse().map_err(|_| invalid())?;

    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(invalid())
    }
}

/// Parse a date in the format YYYY-MM-DD, as sent by `<input type="date">`.
///
/// # Errors
/// Returns [Error::InvalidField] if the value is not a valid date.
pub(crate) fn parse_date(field: &'static str, value: &str) -> Result<Date, Error> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).map_err(|_| {
        Error::InvalidField {
            field,
            value: value.to_owned(),
        }
    })
}

/// Parse a category ID such as "3".
///
/// # Errors
/// Returns [Error::InvalidField] if the value is not an integer, or
/// [Error::InvalidCategory] if it is not the ID of a category.
pub(crate) fn parse_category(field: &'static str, value: &str) -> Result<Category, Error> {
    let id: i64 = value.parse().map_err(|_| Error::InvalidField {
        field,
        value: value.to_owned(),
    })?;

    Category::from_id(id)
}

#[cfg(test)]
mod form_field_tests {
    use time::macros::date;

    use crate::{Error, category::Category};

    use super::{optional, parse_amount, parse_category, parse_date, required};

    #[test]
    fn required_rejects_missing_and_blank_values() {
        assert_eq!(required("price", &None), Err(Error::MissingField("price")));
        assert_eq!(
            required("price", &Some("  ".to_owned())),
            Err(Error::MissingField("price"))
        );
        assert_eq!(required("price", &Some(" 1.5 ".to_owned())), Ok("1.5"));
    }

    #[test]
    fn optional_treats_blank_as_none() {
        assert_eq!(optional(&Some("".to_owned())), None);
        assert_eq!(optional(&None), None);
        assert_eq!(optional(&Some(" usps ".to_owned())), Some("usps".to_owned()));
    }

    #[test]
    fn parse_amount_rejects_non_numbers() {
        assert_eq!(parse_amount("price", "12.50"), Ok(12.5));
        assert_eq!(
            parse_amount("price", "twelve"),
            Err(Error::InvalidField {
                field: "price",
                value: "twelve".to_owned()
            })
        );
        assert!(parse_amount("price", "NaN").is_err());
        assert!(parse_amount("price", "inf").is_err());
    }

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert_eq!(parse_date("date", "2024-01-05"), Ok(date!(2024 - 01 - 05)));
        assert!(parse_date("date", "05/01/2024").is_err());
        assert!(parse_date("date", "2024-02-30").is_err());
    }

    #[test]
    fn parse_category_checks_the_fixed_set() {
        assert_eq!(parse_category("category", "3"), Ok(Category::Food));
        assert_eq!(
            parse_category("category", "9"),
            Err(Error::InvalidCategory(9))
        );
        assert!(matches!(
            parse_category("category", "food"),
            Err(Error::InvalidField { .. })
        ));
    }
}
