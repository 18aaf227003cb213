//! `BatchCodeCodec` — a validated config bundled with encode/decode.

use serde::{Deserialize, Serialize};

use super::abbreviation::AbbreviationLookup;
use super::clock::Clock;
use super::config::{default_config, CodecConfig, ConfigError};
use super::decoder::{decode_batch_code, DecodeError};
use super::encoder::{encode_batch_code, EncodeError};
use super::fields::{BatchCodeFields, DecodedBatchCode};

/// Any batch code failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("config validation failed: {0}")]
    ConfigInvalid(#[from] ConfigError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// How the product is identified when requesting a new batch code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductRef {
    /// Abbreviation supplied directly; printed as-is.
    Abbreviation(String),
    /// Full product name; resolved through an [`AbbreviationLookup`].
    Name(String),
}

/// A request for a new batch code, as entered when starting a batch.
/// The production date comes from the clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCodeRequest {
    pub dose: u32,
    pub cannabinoid: String,
    pub product: ProductRef,
    pub oil_batch_code: String,
    pub batch_number: u32,
}

impl BatchCodeRequest {
    /// Resolve the product abbreviation and stamp the date. The clock is read once.
    pub fn resolve(
        &self,
        abbreviations: &dyn AbbreviationLookup,
        clock: &dyn Clock,
    ) -> BatchCodeFields {
        let product_abbr = match &self.product {
            ProductRef::Abbreviation(abbr) => abbr.clone(),
            ProductRef::Name(name) => abbreviations.abbreviation_for(name),
        };
        BatchCodeFields {
            dose: self.dose,
            cannabinoid: self.cannabinoid.clone(),
            product_abbr,
            production_date: clock.today(),
            oil_batch_code: self.oil_batch_code.clone(),
            batch_number: self.batch_number,
        }
    }
}

/// Stateless batch code codec. Cheap to share across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCodeCodec {
    config: CodecConfig,
}

impl BatchCodeCodec {
    /// Create a codec, validating the config once up front.
    pub fn new(config: CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn is_known_cannabinoid(&self, token: &str) -> bool {
        self.config.is_known_cannabinoid(token)
    }

    pub fn encode(&self, fields: &BatchCodeFields) -> Result<String, EncodeError> {
        encode_batch_code(&self.config, fields)
    }

    pub fn decode(&self, code: &str) -> Result<DecodedBatchCode, DecodeError> {
        decode_batch_code(&self.config, code)
    }

    /// Resolve `request` against the lookup and clock, then encode it.
    pub fn encode_request(
        &self,
        request: &BatchCodeRequest,
        abbreviations: &dyn AbbreviationLookup,
        clock: &dyn Clock,
    ) -> Result<String, EncodeError> {
        self.encode(&request.resolve(abbreviations, clock))
    }
}

impl Default for BatchCodeCodec {
    fn default() -> Self {
        Self {
            config: default_config(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;

    use super::*;
    use crate::code::abbreviation::AbbreviationTable;
    use crate::code::clock::FixedClock;

    /// Counts how often the date is read.
    struct CountingClock {
        date: NaiveDate,
        reads: AtomicUsize,
    }

    impl Clock for CountingClock {
        fn today(&self) -> NaiveDate {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.date
        }
    }

    fn request(product: ProductRef) -> BatchCodeRequest {
        BatchCodeRequest {
            dose: 10,
            cannabinoid: "D9".into(),
            product,
            oil_batch_code: "OB42".into(),
            batch_number: 2,
        }
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = CodecConfig {
            cannabinoids: vec!["D".into(), "D9".into()],
        };
        assert!(matches!(
            BatchCodeCodec::new(cfg),
            Err(ConfigError::ShadowedToken { .. })
        ));
    }

    #[test]
    fn default_codec_uses_default_config() {
        let codec = BatchCodeCodec::default();
        assert_eq!(codec.config(), &default_config());
        assert!(codec.is_known_cannabinoid("THCO"));
        assert!(!codec.is_known_cannabinoid("thco"));
    }

    #[test]
    fn encode_request_with_direct_abbreviation() {
        let codec = BatchCodeCodec::default();
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
        let code = codec
            .encode_request(
                &request(ProductRef::Abbreviation("GB".into())),
                &AbbreviationTable::new(),
                &clock,
            )
            .unwrap();
        assert_eq!(code, "10D9GB-07-15-24-DC-OB42.2");
    }

    #[test]
    fn encode_request_resolves_product_name() {
        let codec = BatchCodeCodec::default();
        let mut table = AbbreviationTable::new();
        table.insert("Sour Watermelon Rings", "SWR");
        let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());

        let name = ProductRef::Name("sour watermelon rings".into());
        let code = codec.encode_request(&request(name), &table, &clock).unwrap();
        assert_eq!(code, "10D9SWR-01-03-25-DC-OB42.2");

        let name = ProductRef::Name("Gummy Bears".into());
        let code = codec.encode_request(&request(name), &table, &clock).unwrap();
        assert_eq!(code, "10D9GB-01-03-25-DC-OB42.2");
    }

    #[test]
    fn encode_request_reads_clock_once() {
        let codec = BatchCodeCodec::default();
        let clock = CountingClock {
            date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            reads: AtomicUsize::new(0),
        };
        let abbr = ProductRef::Abbreviation("GB".into());
        codec
            .encode_request(&request(abbr), &AbbreviationTable::new(), &clock)
            .unwrap();
        assert_eq!(clock.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn codec_errors_convert() {
        let codec = BatchCodeCodec::default();
        let err: CodecError = codec.decode("garbage").unwrap_err().into();
        assert!(matches!(err, CodecError::Decode(DecodeError::MalformedCode { .. })));
        assert!(err.to_string().contains("garbage"));
    }
}
