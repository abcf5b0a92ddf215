use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Points awarded for a correct answer.
pub const CORRECT_REWARD: f64 = 1.0;

/// Points deducted for an incorrect answer (negative marking).
pub const WRONG_PENALTY: f64 = 0.25;

/// Score change for a single answer. No floor is applied.
#[must_use]
pub fn score_delta(is_correct: bool) -> f64 {
    if is_correct {
        CORRECT_REWARD
    } else {
        -WRONG_PENALTY
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BestScoreError {
    #[error("invalid best score value: {raw:?}")]
    Invalid { raw: String },
}

/// Highest final score reached on this device.
///
/// Persisted as a string with exactly two decimal places. An absent value
/// reads as [`BestScore::ZERO`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct BestScore(f64);

impl BestScore {
    pub const ZERO: Self = Self(0.0);

    /// Wraps a final score, rounded to the two decimals it is stored with.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        Self((score * 100.0).round() / 100.0)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// The persisted representation, e.g. `"37.25"`.
    #[must_use]
    pub fn format(self) -> String {
        format!("{:.2}", self.0)
    }

    /// # Errors
    ///
    /// Returns `BestScoreError::Invalid` when the value is not a finite number.
    pub fn parse(raw: &str) -> Result<Self, BestScoreError> {
        let value: f64 = raw.trim().parse().map_err(|_| BestScoreError::Invalid {
            raw: raw.to_owned(),
        })?;
        if !value.is_finite() {
            return Err(BestScoreError::Invalid {
                raw: raw.to_owned(),
            });
        }
        Ok(Self::from_score(value))
    }

    /// Folds a finished exam's score in; the result never decreases.
    #[must_use]
    pub fn max_with(self, score: f64) -> Self {
        let candidate = Self::from_score(score);
        if candidate.0 > self.0 { candidate } else { self }
    }
}

impl fmt::Display for BestScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for BestScore {
    type Err = BestScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_has_no_floor() {
        assert_eq!(score_delta(true), 1.0);
        assert_eq!(score_delta(false), -0.25);
    }

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(BestScore::from_score(12.5).format(), "12.50");
        assert_eq!(BestScore::from_score(37.25).to_string(), "37.25");
        assert_eq!(BestScore::ZERO.format(), "0.00");
        assert_eq!(BestScore::from_score(-1.75).format(), "-1.75");
    }

    #[test]
    fn parse_accepts_stored_values_and_rejects_garbage() {
        assert_eq!(BestScore::parse("12.50").unwrap().value(), 12.5);
        assert_eq!(" 3 ".parse::<BestScore>().unwrap().format(), "3.00");
        assert!(BestScore::parse("abc").is_err());
        assert!(BestScore::parse("NaN").is_err());
        assert!(BestScore::parse("inf").is_err());
    }

    #[test]
    fn max_with_is_monotone() {
        let best = BestScore::ZERO.max_with(12.5);
        assert_eq!(best.format(), "12.50");
        let best = best.max_with(8.0);
        assert_eq!(best.format(), "12.50");
        let best = best.max_with(-4.0);
        assert_eq!(best.format(), "12.50");
    }
}
