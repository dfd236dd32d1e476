use crate::domain::asset::Asset;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Accepted band for the sum of user-entered weights.
pub const WEIGHT_SUM_RANGE: RangeInclusive<f64> = 0.99..=1.01;

/// Payload shared by both analytics requests.
///
/// Only [`validate`] builds one from user input, so `tickers.len() == weights.len()` and the
/// weight sum lies in [`WEIGHT_SUM_RANGE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub tickers: Vec<String>,
    pub weights: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please select at least one asset.")]
    EmptySelection,

    #[error("Asset count ({assets}) doesn't match weight count ({weights}).")]
    WeightCountMismatch { assets: usize, weights: usize },

    #[error("Weights must sum to 1.0 (Current: {sum:.2})")]
    WeightSumOutOfRange { sum: f64 },
}

/// Splits on commas and reads the leading number of each trimmed segment. Segments with
/// no leading number become `NaN` and are left for the sum check to reject.
pub fn parse_weights(weights_text: &str) -> Vec<f64> {
    weights_text
        .split(',')
        .map(|segment| parse_leading_float(segment.trim()))
        .collect()
}

/// Longest decimal prefix of `text`, so `"0.4abc"` reads as `0.4` and `"0x1"` as `0`.
///
/// Only `Infinity` (optionally signed) spells an infinity; `inf` and `nan` have no numeric
/// prefix and give `NaN`.
fn parse_leading_float(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let mut end = 0;

    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    if text[end..].starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    // The exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Checks run in order: empty selection, count mismatch, then the sum band.
pub fn validate(
    selected_assets: &[Asset],
    weights_text: &str,
) -> Result<AnalysisRequest, ValidationError> {
    if selected_assets.is_empty() {
        return Err(ValidationError::EmptySelection);
    }

    let weights = parse_weights(weights_text);
    if weights.len() != selected_assets.len() {
        return Err(ValidationError::WeightCountMismatch {
            assets: selected_assets.len(),
            weights: weights.len(),
        });
    }

    let sum: f64 = weights.iter().sum();
    if !WEIGHT_SUM_RANGE.contains(&sum) {
        return Err(ValidationError::WeightSumOutOfRange { sum });
    }

    Ok(AnalysisRequest {
        tickers: selected_assets
            .iter()
            .map(|asset| asset.symbol.to_string())
            .collect(),
        weights,
    })
}

/// Live helper text shown under the weights input, e.g. `"2 weights for 3 assets"`.
pub fn weight_count_hint(weights_text: &str, selected_len: usize) -> String {
    format!(
        "{} weights for {} assets",
        weights_text.split(',').count(),
        selected_len
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::AssetCatalog;

    fn assets(symbols: &[&str]) -> Vec<Asset> {
        symbols
            .iter()
            .map(|s| AssetCatalog.lookup(s).unwrap())
            .collect()
    }

    #[test]
    fn accepts_default_allocation() {
        let req = validate(&assets(&["AAPL", "MSFT", "GOOGL"]), "0.4, 0.3, 0.3").unwrap();
        assert_eq!(req.tickers, vec!["AAPL", "MSFT", "GOOGL"]);
        assert_eq!(req.weights, vec![0.4, 0.3, 0.3]);
        assert_eq!(req.tickers.len(), req.weights.len());
    }

    #[test]
    fn keeps_weights_as_typed_without_rescaling() {
        let req = validate(&assets(&["AAPL", "MSFT"]), " 0.505 ,0.5").unwrap();
        assert_eq!(req.weights, vec![0.505, 0.5]);
    }

    #[test]
    fn rejects_sum_below_band() {
        let err = validate(&assets(&["AAPL", "MSFT", "GOOGL"]), "0.4, 0.3, 0.2").unwrap_err();
        assert!(matches!(err, ValidationError::WeightSumOutOfRange { .. }));
        assert!(err.to_string().contains("0.90"), "{err}");
    }

    #[test]
    fn tolerates_rounding_inside_band() {
        assert!(validate(&assets(&["AAPL", "MSFT"]), "0.5, 0.495").is_ok());
        assert!(validate(&assets(&["AAPL", "MSFT"]), "0.5, 0.505").is_ok());
        assert!(validate(&assets(&["AAPL", "MSFT"]), "0.5, 0.52").is_err());
        assert!(validate(&assets(&["AAPL", "MSFT"]), "0.5, 0.48").is_err());
    }

    #[test]
    fn sum_band_is_inclusive_at_both_ends() {
        assert!(validate(&assets(&["AAPL"]), "0.99").is_ok());
        assert!(validate(&assets(&["AAPL"]), "1.01").is_ok());
        assert!(validate(&assets(&["AAPL"]), "0.98").is_err());
        assert!(validate(&assets(&["AAPL"]), "1.02").is_err());
    }

    #[test]
    fn reads_leading_number_and_ignores_trailing_text() {
        let req = validate(&assets(&["AAPL", "MSFT", "GOOGL"]), "0.4abc, 0.3, 0.3").unwrap();
        assert_eq!(req.weights, vec![0.4, 0.3, 0.3]);
    }

    #[test]
    fn leading_float_follows_browser_parsing() {
        assert_eq!(parse_leading_float("0x1"), 0.0);
        assert_eq!(parse_leading_float(".5"), 0.5);
        assert_eq!(parse_leading_float("5."), 5.0);
        assert_eq!(parse_leading_float("-0.25%"), -0.25);
        assert_eq!(parse_leading_float("+1.5"), 1.5);
        assert_eq!(parse_leading_float("1e-1x"), 0.1);
        assert_eq!(parse_leading_float("2e"), 2.0);
        assert_eq!(parse_leading_float("3E+"), 3.0);
        assert_eq!(parse_leading_float("1.2.3"), 1.2);
        assert_eq!(parse_leading_float("Infinity"), f64::INFINITY);
        assert_eq!(parse_leading_float("-Infinityx"), f64::NEG_INFINITY);
    }

    #[test]
    fn text_without_leading_number_is_nan() {
        for text in ["", "abc", ".", "-", "+.", "e5", "inf", "nan", "NaN", "infinity"] {
            assert!(parse_leading_float(text).is_nan(), "{text:?}");
        }
        let weights = parse_weights("inf, nan, Infinity");
        assert!(weights[0].is_nan() && weights[1].is_nan());
        assert_eq!(weights[2], f64::INFINITY);
    }

    #[test]
    fn rejects_count_mismatch_with_both_counts() {
        let err = validate(&assets(&["AAPL", "MSFT", "GOOGL"]), "0.5, 0.5").unwrap_err();
        assert_eq!(
            err,
            ValidationError::WeightCountMismatch {
                assets: 3,
                weights: 2
            }
        );
        let msg = err.to_string();
        assert!(msg.contains('3') && msg.contains('2'), "{msg}");
    }

    #[test]
    fn count_mismatch_wins_over_bad_sum() {
        let err = validate(&assets(&["AAPL", "MSFT", "GOOGL"]), "0.1, 0.1").unwrap_err();
        assert!(matches!(err, ValidationError::WeightCountMismatch { .. }));
    }

    #[test]
    fn empty_selection_wins_regardless_of_weights() {
        assert_eq!(validate(&[], "1.0"), Err(ValidationError::EmptySelection));
        assert_eq!(validate(&[], "garbage"), Err(ValidationError::EmptySelection));
        assert_eq!(validate(&[], ""), Err(ValidationError::EmptySelection));
    }

    #[test]
    fn malformed_segment_surfaces_as_sum_error() {
        let err = validate(&assets(&["AAPL", "MSFT"]), "0.5, abc").unwrap_err();
        match err {
            ValidationError::WeightSumOutOfRange { sum } => assert!(sum.is_nan()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn trailing_comma_counts_as_extra_weight() {
        let err = validate(&assets(&["AAPL", "MSFT"]), "0.5, 0.5,").unwrap_err();
        assert_eq!(
            err,
            ValidationError::WeightCountMismatch {
                assets: 2,
                weights: 3
            }
        );
    }

    #[test]
    fn hint_counts_raw_segments() {
        assert_eq!(weight_count_hint("0.5, 0.5", 3), "2 weights for 3 assets");
        assert_eq!(weight_count_hint("", 1), "1 weights for 1 assets");
    }
}
