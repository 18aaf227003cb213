//! Batch code decoder — splits a printed code back into its fields.
//!
//! The code carries no length markers, so segmentation relies on the two
//! separators and the cannabinoid token table. The canonical grammar is:
//!
//! ```text
//! productInfo - MM - DD - YY - DC - oilBatch . batchNumber
//! ```
//!
//! An oil batch code containing a separator cannot be told apart from a
//! malformed code. Such input is reported as ambiguous and never repaired.

use super::config::{CodecConfig, BATCH_NUMBER_SEPARATOR, SEGMENT_SEPARATOR, TAG};
use super::fields::DecodedBatchCode;

/// Number of '-'-delimited segments before the batch number.
const SEGMENT_COUNT: usize = 6;

/// Index of the tag segment.
const TAG_INDEX: usize = 4;

/// Errors during batch code decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed batch code '{code}': {reason}")]
    MalformedCode { code: String, reason: &'static str },

    #[error("invalid batch number '{value}' in batch code '{code}'")]
    InvalidBatchNumber { code: String, value: String },

    #[error("ambiguous batch code '{code}': {reason}")]
    AmbiguousSegmentation { code: String, reason: &'static str },
}

/// Decode a batch code using the given config.
///
/// Surrounding whitespace is ignored. The date segment is returned as-is.
pub fn decode_batch_code(
    config: &CodecConfig,
    code: &str,
) -> Result<DecodedBatchCode, DecodeError> {
    let code = code.trim();

    let (main, number_part) = code
        .rsplit_once(BATCH_NUMBER_SEPARATOR)
        .ok_or_else(|| malformed(code, "missing '.' before batch number"))?;
    let batch_number = parse_batch_number(code, number_part)?;

    if main.contains(BATCH_NUMBER_SEPARATOR) {
        return Err(ambiguous(code, "more than one '.'; oil batch code may contain '.'"));
    }

    let segments: Vec<&str> = main.split(SEGMENT_SEPARATOR).collect();
    if segments.len() < SEGMENT_COUNT {
        return Err(malformed(code, "expected six '-'-separated segments"));
    }
    if segments[TAG_INDEX] != TAG {
        return Err(malformed(code, "tag segment missing or misplaced"));
    }
    if segments.len() > SEGMENT_COUNT {
        return Err(ambiguous(code, "oil batch code contains '-'"));
    }

    let (product_info, oil_batch) = (segments[0], segments[5]);
    if oil_batch.is_empty() {
        return Err(malformed(code, "empty oil batch code"));
    }
    let date_info = segments[1..=3].join("-");

    let digits_end = product_info
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(product_info.len());
    let dose = match &product_info[..digits_end] {
        "" => 0,
        digits => digits
            .parse::<u32>()
            .map_err(|_| malformed(code, "dose out of range"))?,
    };

    let rest = &product_info[digits_end..];
    let (cannabinoid, cannabinoid_recognized, product_abbr) = match config.match_cannabinoid(rest) {
        Some(token) => (token, true, &rest[token.len()..]),
        None => {
            let end = rest
                .find(|c: char| !c.is_ascii_alphanumeric())
                .unwrap_or(rest.len());
            tracing::warn!(
                code = %code,
                cannabinoid = &rest[..end],
                "no known cannabinoid token in batch code"
            );
            (&rest[..end], false, &rest[end..])
        }
    };

    let decoded = DecodedBatchCode {
        dose,
        cannabinoid: cannabinoid.to_string(),
        cannabinoid_recognized,
        product_abbr: product_abbr.to_string(),
        date_info,
        oil_batch_code: oil_batch.to_string(),
        batch_number,
    };
    tracing::debug!(code = %code, ?decoded, "decoded batch code");
    Ok(decoded)
}

fn parse_batch_number(code: &str, value: &str) -> Result<u32, DecodeError> {
    let invalid = || DecodeError::InvalidBatchNumber {
        code: code.to_string(),
        value: value.to_string(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

fn malformed(code: &str, reason: &'static str) -> DecodeError {
    DecodeError::MalformedCode {
        code: code.to_string(),
        reason,
    }
}

fn ambiguous(code: &str, reason: &'static str) -> DecodeError {
    DecodeError::AmbiguousSegmentation {
        code: code.to_string(),
        reason,
    }
}
