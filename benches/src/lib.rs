//! Benchmark utilities for mstock.

use chrono::NaiveDate;
use mstock_fixture::{ArchiveBuilder, FixtureArchive, FixtureSymbol, daily_series};
use std::io;

/// Shape of a synthetic archive.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveConfig {
    /// Number of `MASTER` symbols.
    pub standard: u16,
    /// Number of `XMASTER` symbols.
    pub extended: u16,
    /// Daily bars per symbol.
    pub bars: usize,
}

impl ArchiveConfig {
    /// Total number of symbols.
    #[must_use]
    pub const fn symbols(&self) -> u64 {
        self.standard as u64 + self.extended as u64
    }

    /// Total number of rows a full read produces.
    #[must_use]
    pub const fn rows(&self) -> u64 {
        self.symbols() * self.bars as u64
    }

    /// Writes the archive to a temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the files cannot be written.
    pub fn build(&self) -> io::Result<FixtureArchive> {
        let start = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default();
        let mut builder = ArchiveBuilder::new();
        for n in 1..=self.standard {
            builder = builder.standard(
                FixtureSymbol::new(&format!("STD{n:03}"), n),
                daily_series(start, self.bars, 5),
            );
        }
        for n in 1..=self.extended {
            builder = builder.extended(
                FixtureSymbol::new(&format!("EXT{n:03}"), 255 + n).with_field_count(6),
                daily_series(start, self.bars, 6),
            );
        }
        builder.build()
    }
}

/// Random-looking MBF words for decode benchmarks.
#[must_use]
pub fn mbf_words(count: usize) -> Vec<[u8; 4]> {
    (0..count)
        .map(|i| mstock_fixture::encode_mbf(((i * 7919) % 100_000) as f32 / 8.0 - 5_000.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_config() {
        let config = ArchiveConfig {
            standard: 2,
            extended: 1,
            bars: 10,
        };
        assert_eq!(config.rows(), 30);

        let archive = config.build().unwrap();
        let assembly = mstock_lib::decode_archive(archive.path(), &[] as &[&str], 4).unwrap();
        assert_eq!(assembly.len(), 30);
        assert!(assembly.diagnostics.is_empty());
    }

    #[test]
    fn test_mbf_words_decode() {
        for word in mbf_words(64) {
            let value = mstock_lib::mbf::decode(word).unwrap_or(0.0);
            assert!(value.is_finite());
        }
    }
}
