//! Batch code encoding and decoding.
//!
//! A batch code is the single-line identifier printed on product batch
//! labels and QR codes:
//!
//! ```text
//! 5D9ACME-07-15-24-DC-OIL123.7
//! │ │ │    └──────┘    │      └ batch number
//! │ │ │    date        oil batch code
//! │ │ product abbreviation
//! │ cannabinoid token
//! dose
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use batchcode::code::{BatchCodeCodec, BatchCodeFields};
//! use chrono::NaiveDate;
//!
//! let codec = BatchCodeCodec::default();
//! let fields = BatchCodeFields {
//!     dose: 5,
//!     cannabinoid: "D9".into(),
//!     product_abbr: "ACME".into(),
//!     production_date: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
//!     oil_batch_code: "OIL123".into(),
//!     batch_number: 7,
//! };
//!
//! let code = codec.encode(&fields).unwrap();
//! assert_eq!(code, "5D9ACME-07-15-24-DC-OIL123.7");
//!
//! let decoded = codec.decode(&code).unwrap();
//! assert!(decoded.matches(&fields));
//! assert!(decoded.cannabinoid_recognized);
//! ```

pub mod abbreviation;
pub mod clock;
pub mod codec;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod fields;

pub use abbreviation::{derive_abbreviation, AbbreviationLookup, AbbreviationTable};
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{BatchCodeCodec, BatchCodeRequest, CodecError, ProductRef};
pub use config::{default_config, CodecConfig, ConfigError};
pub use decoder::{decode_batch_code, DecodeError};
pub use encoder::{encode_batch_code, EncodeError};
pub use fields::{BatchCodeFields, DecodedBatchCode};
