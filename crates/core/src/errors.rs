use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("invalid product data: {reason}")]
    InvalidInput { reason: &'static str },
    #[error("product not found")]
    NotFound(ProductId),
}

impl CatalogError {
    pub fn invalid(reason: &'static str) -> Self {
        Self::InvalidInput { reason }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String },
    #[error("not found: {message}")]
    NotFound { message: String },
}

impl InterfaceError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    pub fn invalid_product_id() -> Self {
        Self::bad_request("invalid product id")
    }

    pub fn invalid_request_body() -> Self {
        Self::bad_request("invalid request body")
    }

    /// Message rendered into the `{"error": ...}` response body.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message } | Self::NotFound { message } => message,
        }
    }
}

impl From<CatalogError> for InterfaceError {
    fn from(value: CatalogError) -> Self {
        let message = value.to_string();
        match value {
            CatalogError::InvalidInput { .. } => Self::BadRequest { message },
            CatalogError::NotFound(_) => Self::NotFound { message },
        }
    }
}
