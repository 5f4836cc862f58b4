//! Apache Parquet output format.

use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray, Time32SecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Timelike};
use mstock_types::ResultRow;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::formatter::RowShape;
use crate::{FormatError, Formatter};

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Arrow schema for rows of the given shape.
    fn schema(shape: RowShape) -> Schema {
        let mut fields = vec![
            Field::new("ticker", DataType::Utf8, false),
            Field::new("date", DataType::Date32, false),
        ];
        if shape.has_time {
            fields.push(Field::new("time", DataType::Time32(TimeUnit::Second), true));
        }
        fields.extend(
            shape
                .value_columns()
                .map(|name| Field::new(name, DataType::Float64, true)),
        );
        Schema::new(fields)
    }

    /// Converts rows to an Arrow `RecordBatch`.
    fn rows_to_batch(
        schema: &Arc<Schema>,
        shape: RowShape,
        rows: &[ResultRow],
    ) -> Result<RecordBatch, FormatError> {
        let tickers: Vec<&str> = rows.iter().map(|r| r.ticker.as_str()).collect();
        let dates: Vec<i32> = rows
            .iter()
            .map(|r| r.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            .collect();

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(tickers)),
            Arc::new(Date32Array::from(dates)),
        ];
        if shape.has_time {
            let times: Vec<Option<i32>> = rows
                .iter()
                .map(|r| r.time.map(|t| t.num_seconds_from_midnight() as i32))
                .collect();
            columns.push(Arc::new(Time32SecondArray::from(times)));
        }
        for i in 0..shape.width {
            let values: Vec<Option<f64>> = rows.iter().map(|r| r.values.get(i).copied()).collect();
            columns.push(Arc::new(Float64Array::from(values)));
        }

        RecordBatch::try_new(Arc::clone(schema), columns)
            .map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

impl Formatter for ParquetFormatter {
    fn write_rows<W: Write + Send>(
        &self,
        rows: &[ResultRow],
        writer: W,
    ) -> Result<(), FormatError> {
        let shape = RowShape::of(rows);
        let schema = Arc::new(Self::schema(shape));
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::clone(&schema), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in rows.chunks(self.row_group_size.max(1)) {
            let batch = Self::rows_to_batch(&schema, shape, chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::tests::{intraday_rows, sample_rows};
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use std::fs::File;
    use std::io::Cursor;

    fn read_back(rows: &[ResultRow], formatter: &ParquetFormatter) -> Vec<RecordBatch> {
        let path = tempfile::NamedTempFile::new().unwrap();
        formatter.write_rows(rows, File::create(path.path()).unwrap()).unwrap();

        ParquetRecordBatchReaderBuilder::try_new(File::open(path.path()).unwrap())
            .unwrap()
            .build()
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_parquet_magic() {
        let mut output = Cursor::new(Vec::new());
        ParquetFormatter::new()
            .write_rows(&sample_rows(), &mut output)
            .unwrap();

        let data = output.into_inner();
        assert!(data.len() > 4);
        assert_eq!(&data[0..4], b"PAR1");
    }

    #[test]
    fn test_schema() {
        let schema = ParquetFormatter::schema(RowShape::of(&sample_rows()));
        assert_eq!(schema.fields().len(), 8);
        assert_eq!(schema.field_with_name("date").unwrap().data_type(), &DataType::Date32);
        assert!(schema.field_with_name("open_interest").unwrap().is_nullable());
        assert!(schema.field_with_name("time").is_err());

        let schema = ParquetFormatter::schema(RowShape::of(&intraday_rows()));
        assert!(schema.field_with_name("time").is_ok());
    }

    #[test]
    fn test_read_back() {
        let batches = read_back(&sample_rows(), &ParquetFormatter::new());
        let rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
        assert_eq!(rows, 2);

        let batch = &batches[0];
        let dates = batch
            .column_by_name("date")
            .unwrap()
            .as_any()
            .downcast_ref::<Date32Array>()
            .unwrap();
        // 2024-01-15
        assert_eq!(dates.value(0), 19_737);

        let open_interest = batch
            .column_by_name("open_interest")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert!(open_interest.is_null(0));
        assert_eq!(open_interest.value(1), 1200.0);
    }

    #[test]
    fn test_row_groups() {
        let rows: Vec<_> = sample_rows().into_iter().cycle().take(5).collect();
        let batches = read_back(&rows, &ParquetFormatter::new().with_row_group_size(2));
        let total: usize = batches.iter().map(RecordBatch::num_rows).sum();
        assert_eq!(total, 5);
    }
}
