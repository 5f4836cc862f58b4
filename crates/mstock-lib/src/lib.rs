//! Decode Metastock archives into filtered, rounded time series.
//!
//! This is a facade crate that re-exports functionality from the mstock
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use mstock_lib::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let listing = list_symbols(Path::new("/data/metastock"), &IndexConfig::default())?;
//!     for symbol in &listing.symbols {
//!         println!("{symbol}");
//!     }
//!
//!     let options = AssembleOptions::default()
//!         .with_tickers(["AAPL"])
//!         .with_precision(2)
//!         .with_parallel(true);
//!     let assembly = Assembler::new(options).assemble(Path::new("/data/metastock"))?;
//!     println!("{} rows, {} skipped", assembly.len(), assembly.diagnostics.len());
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/mstock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use mstock_types::*;

// Re-export decoding
pub use mstock_codec::{
    DataFile, DataHeader, IndexConfig, IndexListing, archive_dir, date, list_symbols, locate, mbf,
    parse_index, read_index,
};

// Re-export assembly
#[cfg(feature = "assemble")]
pub use mstock_assemble::{
    AssembleOptions, Assembler, Assembly, DEFAULT_PRECISION, MAX_PRECISION, decode_archive,
    round_to,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use mstock_format::{
    CsvFormatter, FormatError as OutputError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
    RowShape,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use mstock_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use mstock_lib::prelude::*;
/// ```
pub mod prelude {
    pub use mstock_types::{
        DataRecord, Diagnostic, FormatVariant, MstockError, Periodicity, Result, ResultRow,
        SymbolDescriptor,
    };

    pub use mstock_codec::{DataFile, IndexConfig, IndexListing, list_symbols};

    #[cfg(feature = "assemble")]
    pub use mstock_assemble::{AssembleOptions, Assembler, Assembly, decode_archive};

    #[cfg(feature = "format")]
    pub use mstock_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use mstock_format::ParquetFormatter;
}
