//! Batch code records: what goes into the encoder and what comes out of
//! the decoder.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format embedded in a batch code: two-digit month, day and year.
pub const DATE_FORMAT: &str = "%m-%d-%y";

/// Input to batch code encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCodeFields {
    /// Dose in mg, printed without leading zeros.
    pub dose: u32,

    /// Cannabinoid token (e.g. "D9", "THCO").
    pub cannabinoid: String,

    /// Product abbreviation (e.g. "GB" for Gummy Bears).
    pub product_abbr: String,

    /// Production date. Rendered as `MM-DD-YY`.
    pub production_date: NaiveDate,

    /// Code of the oil batch this product batch was made from.
    /// Must not contain '-' or '.'.
    pub oil_batch_code: String,

    /// Sequence number among batches sharing product, date and oil batch.
    pub batch_number: u32,
}

impl BatchCodeFields {
    /// The production date as it appears in the code.
    pub fn date_info(&self) -> String {
        self.production_date.format(DATE_FORMAT).to_string()
    }
}

/// Result of decoding a batch code.
///
/// The date is kept as the raw `MM-DD-YY` segment; whether it names a real
/// calendar day is left to the caller (see [`DecodedBatchCode::production_date`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedBatchCode {
    pub dose: u32,
    pub cannabinoid: String,
    /// False when no table token matched and the cannabinoid was taken
    /// from the leading alphanumeric run instead.
    pub cannabinoid_recognized: bool,
    pub product_abbr: String,
    pub date_info: String,
    pub oil_batch_code: String,
    pub batch_number: u32,
}

impl DecodedBatchCode {
    /// Parse `date_info` as a calendar date, if it is one.
    pub fn production_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date_info, DATE_FORMAT).ok()
    }

    /// Whether every decoded field equals the corresponding field of `fields`.
    pub fn matches(&self, fields: &BatchCodeFields) -> bool {
        self.dose == fields.dose
            && self.cannabinoid == fields.cannabinoid
            && self.product_abbr == fields.product_abbr
            && self.date_info == fields.date_info()
            && self.oil_batch_code == fields.oil_batch_code
            && self.batch_number == fields.batch_number
    }
}
