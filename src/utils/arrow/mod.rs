//! Arrow utilities for reading reference tables and historical datasets

pub mod array_utils;
pub mod extractors;

pub use array_utils::{downcast_array, get_column};
pub use extractors::{extract_f64, extract_strings, is_feature_type};
