//! Row assembly for Metastock archives.
//!
//! [`Assembler`] resolves the ticker filter against the archive index,
//! decodes each selected data file and returns one [`Assembly`] holding the
//! rounded rows plus the per-symbol problems that were skipped over.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/mstock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod assembler;
mod round;

pub use assembler::{AssembleOptions, Assembler, Assembly, DEFAULT_PRECISION, decode_archive};
pub use round::{MAX_PRECISION, round_to};
