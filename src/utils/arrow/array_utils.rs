//! Utilities for working with Arrow arrays.
//!
//! This module provides utility functions for safely extracting and converting
//! columns from Arrow record batches.

use arrow::array::{Array, ArrayRef};
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::{debug, warn};

use crate::error::{DiagnosisError, Result};

/// Get a column from a record batch, casting it to the expected type when needed
///
/// # Arguments
///
/// * `batch` - The record batch containing the column
/// * `column_name` - The name of the column to extract
/// * `expected_type` - The expected data type for the column
/// * `required` - Whether the column is required (error if missing) or optional (None if missing)
///
/// # Returns
///
/// * `Ok(Some(ArrayRef))` - The column array (converted if necessary) if found
/// * `Ok(None)` - If the column is not found and `required` is false
/// * `Err(DiagnosisError)` - If a required column is missing or the cast fails
pub fn get_column(
    batch: &RecordBatch,
    column_name: &str,
    expected_type: &DataType,
    required: bool,
) -> Result<Option<ArrayRef>> {
    let Ok(idx) = batch.schema().index_of(column_name) else {
        if required {
            return Err(DiagnosisError::ColumnNotFound {
                column: column_name.to_string(),
            });
        }
        debug!("Optional column '{column_name}' not found in record batch");
        return Ok(None);
    };

    let column = batch.column(idx);
    let actual_type = column.data_type();

    if actual_type == expected_type {
        return Ok(Some(column.clone()));
    }

    debug!("Converting column '{column_name}' from {actual_type:?} to {expected_type:?}");
    match cast::cast(column, expected_type) {
        Ok(converted) => Ok(Some(converted)),
        Err(err) => {
            warn!("Failed to convert column '{column_name}' to {expected_type:?}: {err}");
            Err(DiagnosisError::ColumnType {
                column: column_name.to_string(),
                expected: format!("{expected_type:?}"),
            })
        }
    }
}

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `T` - The concrete arrow array type
///
/// # Arguments
///
/// * `array` - The array to downcast
/// * `column_name` - Column name used in the error message
/// * `type_name` - Human-readable type name used in the error message
pub fn downcast_array<'a, T: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    type_name: &str,
) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| DiagnosisError::ColumnType {
            column: column_name.to_string(),
            expected: type_name.to_string(),
        })
}
