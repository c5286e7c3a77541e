//! Field-level constraint checks applied before any persistence.
//!
//! ISBN uniqueness is not checked here; the UNIQUE constraint in the
//! record store enforces it and the db layer maps the violation.

use bookdex_common::{Error, Result};
use chrono::{NaiveDate, Utc};

/// Validate the constrained fields of a book candidate.
pub fn validate_fields(
    rating: i64,
    published_date: NaiveDate,
    page_count: Option<i64>,
) -> Result<()> {
    if !(1..=5).contains(&rating) {
        return Err(Error::Validation(format!(
            "Rating must be between 1 and 5, got {}",
            rating
        )));
    }

    if published_date > Utc::now().date_naive() {
        return Err(Error::Validation(
            "Published date cannot be in the future".to_string(),
        ));
    }

    if let Some(pages) = page_count {
        if pages <= 0 {
            return Err(Error::Validation(format!(
                "Page count must be positive, got {}",
                pages
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rating_range() {
        for rating in 1..=5 {
            assert!(validate_fields(rating, date(2020, 1, 1), None).is_ok());
        }
        assert!(validate_fields(0, date(2020, 1, 1), None).is_err());
        assert!(validate_fields(6, date(2020, 1, 1), None).is_err());
    }

    #[test]
    fn test_today_is_allowed_but_tomorrow_is_not() {
        let today = Utc::now().date_naive();
        assert!(validate_fields(3, today, None).is_ok());
        assert!(validate_fields(3, today + chrono::Duration::days(1), None).is_err());
    }

    #[test]
    fn test_page_count_positive() {
        assert!(validate_fields(3, date(2020, 1, 1), Some(1)).is_ok());
        assert!(validate_fields(3, date(2020, 1, 1), Some(0)).is_err());
        assert!(validate_fields(3, date(2020, 1, 1), Some(-5)).is_err());
        assert!(validate_fields(3, date(2020, 1, 1), None).is_ok());
    }
}
