//! Binary decoding of Metastock index and data files.
//!
//! This crate provides the decoding pipeline below the assembler:
//!
//! - [`mbf`] - Microsoft Binary Format float decoding
//! - [`date`] - Packed date and time values
//! - [`list_symbols`] / [`parse_index`] - `MASTER` and `XMASTER` index parsing
//! - [`DataFile`] - Lazy decoding of per-symbol data files

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/mstock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod data;
pub mod date;
mod fs;
mod index;
pub mod mbf;

pub use data::{DataFile, DataHeader};
pub use fs::{archive_dir, locate};
pub use index::{IndexConfig, IndexListing, list_symbols, parse_index, read_index};
