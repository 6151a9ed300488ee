use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use super::model::{CaseDataset, CaseRecord, Column};

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Persist the normalized dataset as a Snappy-compressed Parquet file.
///
/// Only the columns the dataset carries are written, under their source
/// header names.
pub fn write_cache(dataset: &CaseDataset, path: &Path) -> Result<()> {
    let columns: Vec<Column> = dataset.columns.iter().copied().collect();

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|c| Field::new(c.header(), c.data_type(), true))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|c| column_array(&dataset.records, *c))
        .collect();

    let batch = if arrays.is_empty() {
        RecordBatch::new_empty(schema.clone())
    } else {
        RecordBatch::try_new(schema.clone(), arrays).context("building cache record batch")?
    };

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating cache file {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, schema, Some(props)).context("creating parquet writer")?;
    writer.write(&batch).context("writing cache batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn column_array(records: &[CaseRecord], col: Column) -> ArrayRef {
    match col.data_type() {
        DataType::Float64 => Arc::new(
            records
                .iter()
                .map(|r| r.number(col))
                .collect::<Float64Array>(),
        ),
        DataType::Boolean => Arc::new(
            records
                .iter()
                .map(|r| r.flag(col))
                .collect::<BooleanArray>(),
        ),
        _ => Arc::new(
            records
                .iter()
                .map(|r| r.text(col))
                .collect::<StringArray>(),
        ),
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Read a cache file back. Values are taken as stored; no re-normalization.
///
/// Columns with unknown headers are ignored, so a cache written by another
/// tool with extra columns still loads.
pub fn read_cache(path: &Path) -> Result<CaseDataset> {
    let file = std::fs::File::open(path).context("opening cache file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let known: Vec<(usize, Column)> = builder
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter_map(|(i, f)| Column::from_header(f.name()).map(|c| (i, c)))
        .collect();
    let columns: BTreeSet<Column> = known.iter().map(|(_, c)| *c).collect();

    let reader = builder.build().context("building parquet reader")?;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let start = records.len();
        records.resize_with(start + batch.num_rows(), CaseRecord::default);

        for (col_idx, col) in &known {
            let array = batch.column(*col_idx);
            for (row, record) in records[start..].iter_mut().enumerate() {
                set_field(record, *col, array, row)
                    .with_context(|| format!("column '{col}', row {}", start + row))?;
            }
        }
    }

    Ok(CaseDataset::new(records, columns))
}

fn set_field(record: &mut CaseRecord, col: Column, array: &ArrayRef, row: usize) -> Result<()> {
    if array.is_null(row) {
        return Ok(());
    }
    match col.data_type() {
        DataType::Float64 => {
            let v = extract_f64(array, row)?;
            // NaN is how dataframe writers store a missing float.
            if !v.is_finite() {
                return Ok(());
            }
            match col {
                Column::BaseYear => record.base_year = Some(v),
                Column::Balance => record.balance = Some(v),
                _ => record.deposit_original = Some(v),
            }
        }
        DataType::Boolean => {
            let Some(arr) = array.as_any().downcast_ref::<BooleanArray>() else {
                bail!("expected Boolean, got {:?}", array.data_type());
            };
            let v = Some(arr.value(row));
            match col {
                Column::CnjOk => record.cnj_ok = v,
                _ => record.doc_ok = v,
            }
        }
        _ => {
            let v = Some(extract_string(array, row)?);
            match col {
                Column::CaseNumber => record.case_number = v,
                Column::Defendant => record.defendant = v,
                Column::Claimant => record.claimant = v,
                Column::Court => record.court = v,
                Column::State => record.state = v,
                _ => record.county = v,
            }
        }
    }
    Ok(())
}

fn extract_f64(array: &ArrayRef, row: usize) -> Result<f64> {
    let any = array.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        Ok(arr.value(row) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Ok(arr.value(row) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Ok(arr.value(row) as f64)
    } else {
        bail!("expected a numeric column, got {:?}", array.data_type())
    }
}

fn extract_string(array: &ArrayRef, row: usize) -> Result<String> {
    match array.data_type() {
        DataType::Utf8 => Ok(array.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(array.as_string::<i64>().value(row).to_string()),
        other => bail!("expected a string column, got {other:?}"),
    }
}
