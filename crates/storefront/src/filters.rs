//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a 1-5 rating as filled stars.
///
/// Usage in templates: `{{ feedback.rating|stars }}`
#[askama::filter_fn]
pub fn stars(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let rating: usize = value.to_string().parse().unwrap_or(0);
    Ok("★".repeat(rating.min(5)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_repeats_rating() {
        assert_eq!(stars::default().execute(3, askama::NO_VALUES).unwrap(), "★★★");
        assert_eq!(stars::default().execute(5, askama::NO_VALUES).unwrap(), "★★★★★");
    }

    #[test]
    fn test_stars_clamps_and_handles_junk() {
        assert_eq!(stars::default().execute(9, askama::NO_VALUES).unwrap(), "★★★★★");
        assert_eq!(stars::default().execute("junk", askama::NO_VALUES).unwrap(), "");
    }
}
