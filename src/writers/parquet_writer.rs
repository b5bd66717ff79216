use crate::error::{ProcessingError, Result};
use crate::models::{Column, ColumnData, HourlyTable};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use crate::writers::TableSink;
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::DateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

const UTC: &str = "UTC";

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    /// Write a table to a Parquet file; the row key, if any, becomes the first column.
    /// An empty table writes nothing.
    pub fn write_table(&self, table: &HourlyTable, path: &Path) -> Result<()> {
        if table.is_empty() {
            return Ok(());
        }

        let columns: Vec<&Column> = table.index().into_iter().chain(table.columns()).collect();
        let schema = Self::create_schema(&columns);
        let batch = Self::table_to_batch(&columns, schema.clone())?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    fn data_type(data: &ColumnData) -> DataType {
        match data {
            ColumnData::UInt32(_) => DataType::UInt32,
            ColumnData::Int32(_) => DataType::Int32,
            ColumnData::Float64(_) => DataType::Float64,
            ColumnData::Utf8(_) => DataType::Utf8,
            ColumnData::Timestamp(_) => {
                DataType::Timestamp(TimeUnit::Microsecond, Some(UTC.into()))
            }
        }
    }

    fn create_schema(columns: &[&Column]) -> Arc<Schema> {
        let fields: Vec<Field> = columns
            .iter()
            .map(|c| Field::new(c.name.as_str(), Self::data_type(&c.data), true))
            .collect();

        Arc::new(Schema::new(fields))
    }

    fn table_to_batch(columns: &[&Column], schema: Arc<Schema>) -> Result<RecordBatch> {
        let arrays: Vec<ArrayRef> = columns
            .iter()
            .map(|c| -> ArrayRef {
                match &c.data {
                    ColumnData::UInt32(v) => Arc::new(UInt32Array::from(v.clone())),
                    ColumnData::Int32(v) => Arc::new(Int32Array::from(v.clone())),
                    ColumnData::Float64(v) => Arc::new(Float64Array::from(v.clone())),
                    ColumnData::Utf8(v) => Arc::new(StringArray::from(v.clone())),
                    ColumnData::Timestamp(v) => Arc::new(
                        TimestampMicrosecondArray::from(
                            v.iter()
                                .map(|t| t.map(|t| t.and_utc().timestamp_micros()))
                                .collect::<Vec<_>>(),
                        )
                        .with_timezone(UTC),
                    ),
                }
            })
            .collect();

        Ok(RecordBatch::try_new(schema, arrays)?)
    }

    /// Read a Parquet file written by [`ParquetWriter::write_table`] back into memory
    pub fn read_table(&self, path: &Path) -> Result<HourlyTable> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut tables = Vec::new();
        for batch_result in reader {
            let batch = batch_result?;
            let schema = batch.schema();
            let columns = batch
                .columns()
                .iter()
                .zip(schema.fields().iter())
                .map(|(array, field)| -> Result<Column> {
                    Ok(Column::new(field.name().clone(), array_to_column(field.name(), array)?))
                })
                .collect::<Result<Vec<_>>>()?;
            tables.push(HourlyTable::new(None, columns)?);
        }

        HourlyTable::concat(tables)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let columns = file_metadata.schema_descr().num_columns();
        let file_size = std::fs::metadata(path)?.len();

        let compression = if row_groups > 0 && metadata.row_group(0).num_columns() > 0 {
            metadata.row_group(0).column(0).compression()
        } else {
            self.compression
        };

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            columns,
            file_size,
            compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSink for ParquetWriter {
    fn extension(&self) -> &'static str {
        "parquet"
    }

    fn write_table(&self, table: &HourlyTable, path: &Path) -> Result<()> {
        ParquetWriter::write_table(self, table, path)
    }
}

fn array_to_column(name: &str, array: &ArrayRef) -> Result<ColumnData> {
    let mismatch = || ProcessingError::InvalidFormat(format!("Invalid {} column type", name));

    let data = match array.data_type() {
        DataType::UInt32 => ColumnData::UInt32(
            array
                .as_any()
                .downcast_ref::<UInt32Array>()
                .ok_or_else(mismatch)?
                .iter()
                .collect(),
        ),
        DataType::Int32 => ColumnData::Int32(
            array
                .as_any()
                .downcast_ref::<Int32Array>()
                .ok_or_else(mismatch)?
                .iter()
                .collect(),
        ),
        DataType::Float64 => ColumnData::Float64(
            array
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(mismatch)?
                .iter()
                .collect(),
        ),
        DataType::Utf8 => ColumnData::Utf8(
            array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(mismatch)?
                .iter()
                .map(|v| v.map(str::to_string))
                .collect(),
        ),
        DataType::Timestamp(TimeUnit::Microsecond, _) => ColumnData::Timestamp(
            array
                .as_any()
                .downcast_ref::<TimestampMicrosecondArray>()
                .ok_or_else(mismatch)?
                .iter()
                .map(|v| v.and_then(DateTime::from_timestamp_micros).map(|t| t.naive_utc()))
                .collect(),
        ),
        other => {
            return Err(ProcessingError::InvalidFormat(format!(
                "Unsupported column type {} for {}",
                other, name
            )))
        }
    };

    Ok(data)
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub columns: usize,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Columns: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}",
            self.total_rows,
            self.columns,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            self.compression,
        )
    }
}
