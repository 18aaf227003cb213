//! Batch code encoder — renders fields into the printed code.
//!
//! `{dose}{cannabinoid}{productAbbr}-{MM-DD-YY}-DC-{oilBatchCode}.{batchNumber}`

use super::config::{CodecConfig, BATCH_NUMBER_SEPARATOR, SEGMENT_SEPARATOR, TAG};
use super::fields::BatchCodeFields;

/// Errors during batch code encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("invalid oil batch code '{code}': {reason}")]
    InvalidOilBatchCode { code: String, reason: &'static str },

    #[error("batch number must be positive, got {0}")]
    InvalidBatchNumber(u32),

    #[error("{field} '{value}' must not contain '-' or '.'")]
    InvalidField { field: &'static str, value: String },

    #[error("cannabinoid '{cannabinoid}' followed by '{product_abbr}' would decode as '{matched}'")]
    AmbiguousToken {
        cannabinoid: String,
        product_abbr: String,
        matched: String,
    },
}

/// Encode a batch code from the given fields.
///
/// The oil batch code is the only free-form segment after the date, so it
/// must stay clear of both separators or the code could not be decoded.
/// The cannabinoid and abbreviation are printed back to back, so the pair
/// is rejected when the token table would split it differently.
pub fn encode_batch_code(
    config: &CodecConfig,
    fields: &BatchCodeFields,
) -> Result<String, EncodeError> {
    check_separator_free("cannabinoid", &fields.cannabinoid)?;
    check_separator_free("product abbreviation", &fields.product_abbr)?;
    check_oil_batch_code(&fields.oil_batch_code)?;
    if fields.batch_number == 0 {
        return Err(EncodeError::InvalidBatchNumber(0));
    }
    check_token_boundary(config, fields)?;

    if !config.is_known_cannabinoid(&fields.cannabinoid) {
        tracing::debug!(
            cannabinoid = %fields.cannabinoid,
            "encoding unrecognized cannabinoid token"
        );
    }

    let code = format!(
        "{dose}{cannabinoid}{abbr}{sep}{date}{sep}{tag}{sep}{oil}{dot}{number}",
        dose = fields.dose,
        cannabinoid = fields.cannabinoid,
        abbr = fields.product_abbr,
        sep = SEGMENT_SEPARATOR,
        date = fields.date_info(),
        tag = TAG,
        oil = fields.oil_batch_code,
        dot = BATCH_NUMBER_SEPARATOR,
        number = fields.batch_number,
    );

    tracing::debug!(code = %code, "encoded batch code");
    Ok(code)
}

fn check_separator_free(field: &'static str, value: &str) -> Result<(), EncodeError> {
    if value.contains([SEGMENT_SEPARATOR, BATCH_NUMBER_SEPARATOR]) {
        return Err(EncodeError::InvalidField {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn check_token_boundary(config: &CodecConfig, fields: &BatchCodeFields) -> Result<(), EncodeError> {
    let joined = format!("{}{}", fields.cannabinoid, fields.product_abbr);
    match config.match_cannabinoid(&joined) {
        Some(matched) if matched != fields.cannabinoid => Err(EncodeError::AmbiguousToken {
            cannabinoid: fields.cannabinoid.clone(),
            product_abbr: fields.product_abbr.clone(),
            matched: matched.to_string(),
        }),
        _ => Ok(()),
    }
}

fn check_oil_batch_code(code: &str) -> Result<(), EncodeError> {
    let reason = if code.is_empty() {
        "must not be empty"
    } else if code.contains(SEGMENT_SEPARATOR) {
        "must not contain '-'"
    } else if code.contains(BATCH_NUMBER_SEPARATOR) {
        "must not contain '.'"
    } else {
        return Ok(());
    };
    Err(EncodeError::InvalidOilBatchCode {
        code: code.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::code::config::default_config;

    fn test_fields() -> BatchCodeFields {
        BatchCodeFields {
            dose: 5,
            cannabinoid: "D9".into(),
            product_abbr: "ACME".into(),
            production_date: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
            oil_batch_code: "OIL123".into(),
            batch_number: 7,
        }
    }

    #[test]
    fn encode_canonical_layout() {
        let code = encode_batch_code(&default_config(), &test_fields()).unwrap();
        assert_eq!(code, "5D9ACME-07-15-24-DC-OIL123.7");
    }

    #[test]
    fn encode_zero_dose_and_large_numbers() {
        let mut fields = test_fields();
        fields.dose = 0;
        fields.batch_number = 1200;
        let code = encode_batch_code(&default_config(), &fields).unwrap();
        assert_eq!(code, "0D9ACME-07-15-24-DC-OIL123.1200");
    }

    #[test]
    fn encode_pads_single_digit_dates() {
        let mut fields = test_fields();
        fields.production_date = NaiveDate::from_ymd_opt(2009, 1, 2).unwrap();
        let code = encode_batch_code(&default_config(), &fields).unwrap();
        assert_eq!(code, "5D9ACME-01-02-09-DC-OIL123.7");
    }

    #[test]
    fn encode_unknown_cannabinoid_verbatim() {
        let mut fields = test_fields();
        fields.cannabinoid = "CBN".into();
        let code = encode_batch_code(&default_config(), &fields).unwrap();
        assert_eq!(code, "5CBNACME-07-15-24-DC-OIL123.7");
    }

    #[test]
    fn encode_always_prints_dc_tag() {
        let cfg = CodecConfig {
            cannabinoids: vec!["CBN".into()],
        };
        let code = encode_batch_code(&cfg, &test_fields()).unwrap();
        assert_eq!(code.split('-').nth(4), Some(TAG));
    }

    #[test]
    fn encode_rejects_abbreviation_that_extends_token() {
        let cfg = CodecConfig {
            cannabinoids: vec!["D9X".into(), "D9".into()],
        };
        let mut fields = test_fields();
        fields.product_abbr = "XL".into();
        let err = encode_batch_code(&cfg, &fields).unwrap_err();
        assert_eq!(
            err,
            EncodeError::AmbiguousToken {
                cannabinoid: "D9".into(),
                product_abbr: "XL".into(),
                matched: "D9X".into(),
            }
        );

        // Same table, an abbreviation that keeps the boundary intact.
        let code = encode_batch_code(&cfg, &test_fields()).unwrap();
        let decoded = crate::code::decoder::decode_batch_code(&cfg, &code).unwrap();
        assert!(decoded.matches(&test_fields()));
    }

    #[test]
    fn encode_rejects_unknown_token_that_decodes_as_known() {
        let mut fields = test_fields();
        fields.cannabinoid = "D".into();
        fields.product_abbr = "9GB".into();
        let err = encode_batch_code(&default_config(), &fields).unwrap_err();
        assert!(matches!(err, EncodeError::AmbiguousToken { ref matched, .. } if matched == "D9"));
    }

    #[test]
    fn encode_rejects_dash_in_oil_batch() {
        let mut fields = test_fields();
        fields.oil_batch_code = "OIL-1".into();
        let err = encode_batch_code(&default_config(), &fields).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidOilBatchCode { .. }));
    }

    #[test]
    fn encode_rejects_dot_and_empty_oil_batch() {
        for bad in ["OIL.1", ""] {
            let mut fields = test_fields();
            fields.oil_batch_code = bad.into();
            let err = encode_batch_code(&default_config(), &fields).unwrap_err();
            assert!(matches!(err, EncodeError::InvalidOilBatchCode { .. }), "{:?}", bad);
        }
    }

    #[test]
    fn encode_rejects_zero_batch_number() {
        let mut fields = test_fields();
        fields.batch_number = 0;
        let err = encode_batch_code(&default_config(), &fields).unwrap_err();
        assert_eq!(err, EncodeError::InvalidBatchNumber(0));
    }

    #[test]
    fn encode_rejects_separators_in_other_fields() {
        let mut fields = test_fields();
        fields.product_abbr = "AC-ME".into();
        let err = encode_batch_code(&default_config(), &fields).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::InvalidField { field: "product abbreviation", .. }
        ));

        let mut fields = test_fields();
        fields.cannabinoid = "D.9".into();
        let err = encode_batch_code(&default_config(), &fields).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidField { field: "cannabinoid", .. }));
    }
}
