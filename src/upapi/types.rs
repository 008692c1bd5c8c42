use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Cents;

/// Monetary value as the API encodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency_code: String,
    /// Decimal string, e.g. "-12.34"
    pub value: String,
    pub value_in_base_units: Cents,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub links: Links,
}

/// Single-resource response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Error body returned with any 4xx/5xx response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorResponse {
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    pub status: String,
    pub title: String,
    pub detail: String,
    pub source: Option<ApiErrorSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ApiErrorSource {
    #[serde(default)]
    pub parameter: String,
    #[serde(default)]
    pub pointer: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.status, self.title, self.detail)?;
        if let Some(source) = &self.source {
            if !source.parameter.is_empty() {
                write!(f, " (Parameter: {})", source.parameter)?;
            }
            if !source.pointer.is_empty() {
                write!(f, " (Pointer: {})", source.pointer)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "Up API returned an empty error response"),
            [only] => write!(f, "Up API returned error: {}", only),
            many => {
                write!(f, "Up API returned {} errors:", many.len())?;
                for error in many {
                    write!(f, "\n\t{}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ApiErrorResponse {}
