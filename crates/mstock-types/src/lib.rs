//! Core types for the mstock Metastock archive decoder.
//!
//! This crate provides the fundamental data structures used throughout mstock:
//!
//! - [`SymbolDescriptor`] - One index entry: ticker, data-file number, field count
//! - [`FormatVariant`] - Standard (`MASTER`) or Extended (`XMASTER`) index
//! - [`IndexLayout`] - Byte offsets and record padding of an index variant
//! - [`DataRecord`] - One decoded record of a symbol's data file
//! - [`RecordLayout`] - Date, time and value columns of a data-file record
//! - [`ResultRow`] - One rounded output row
//! - [`Periodicity`] - Time-frame code stored in the index
//! - [`MstockError`] / [`Diagnostic`] - Error taxonomy and side-channel warnings

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/mstock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod layout;
mod periodicity;
mod record;
mod symbol;

pub use error::{Diagnostic, FormatError, MstockError, Result};
pub use layout::{
    DateEncoding, EXTENDED_RECORD_PADDING, FieldCountEncoding, FieldSpan, FormatVariant,
    IndexLayout, STANDARD_RECORD_PADDING,
};
pub use periodicity::{Periodicity, PeriodicityParseError};
pub use record::{DEFAULT_COLUMNS, DataRecord, RecordLayout, ResultRow, column_name};
pub use symbol::SymbolDescriptor;
