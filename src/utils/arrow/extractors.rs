//! Column extraction utilities for Arrow record batches
//!
//! This module turns whole record batch columns into plain Rust vectors so that the
//! reference registry and the historical dataset can be built from tabular input.

use arrow::array::{Array, BooleanArray, Float64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::{DiagnosisError, Result};
use crate::utils::arrow::array_utils::{downcast_array, get_column};

/// Extract a string column from a record batch
///
/// Empty strings are returned as `None`, the same as nulls.
///
/// # Returns
///
/// * `Ok(Some(values))` - One entry per row
/// * `Ok(None)` - If the column is not present and not required
pub fn extract_strings(
    batch: &RecordBatch,
    column_name: &str,
    required: bool,
) -> Result<Option<Vec<Option<String>>>> {
    let Some(array) = get_column(batch, column_name, &DataType::Utf8, required)? else {
        return Ok(None);
    };
    let strings = downcast_array::<StringArray>(&array, column_name, "String")?;

    let values = (0..strings.len())
        .map(|row| {
            if strings.is_null(row) {
                return None;
            }
            let value = strings.value(row).trim();
            (!value.is_empty()).then(|| value.to_string())
        })
        .collect();

    Ok(Some(values))
}

/// Extract a numeric column from a record batch as `f64`
///
/// Integer and float columns are cast to `Float64`; boolean columns become `1.0`/`0.0`.
/// Any other type is rejected.
pub fn extract_f64(
    batch: &RecordBatch,
    column_name: &str,
    required: bool,
) -> Result<Option<Vec<Option<f64>>>> {
    let Ok(idx) = batch.schema().index_of(column_name) else {
        if required {
            return Err(DiagnosisError::ColumnNotFound {
                column: column_name.to_string(),
            });
        }
        return Ok(None);
    };

    let data_type = batch.schema().field(idx).data_type().clone();
    if data_type == DataType::Boolean {
        let array = batch.column(idx);
        let flags = downcast_array::<BooleanArray>(array, column_name, "Boolean")?;
        let values = (0..flags.len())
            .map(|row| {
                (!flags.is_null(row)).then(|| if flags.value(row) { 1.0 } else { 0.0 })
            })
            .collect();
        return Ok(Some(values));
    }

    if !data_type.is_numeric() {
        return Err(DiagnosisError::ColumnType {
            column: column_name.to_string(),
            expected: "numeric".to_string(),
        });
    }

    let Some(array) = get_column(batch, column_name, &DataType::Float64, required)? else {
        return Ok(None);
    };
    let floats = downcast_array::<Float64Array>(&array, column_name, "Float64")?;
    let values = (0..floats.len())
        .map(|row| (!floats.is_null(row)).then(|| floats.value(row)))
        .collect();

    Ok(Some(values))
}

/// Whether a column can be read with [`extract_f64`]
#[must_use]
pub fn is_feature_type(data_type: &DataType) -> bool {
    *data_type == DataType::Boolean || data_type.is_numeric()
}
