//! Uniform JSON wrapper for successful responses
//!
//! Errors use the same shape with `success: false`; see `ServerError`.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data: Some(data),
            message: None,
            token: None,
        }
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// A list payload with its length in `count`
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::data(items)
        }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            count: None,
            data: None,
            message: Some(message.into()),
            token: None,
        }
    }

    pub fn token(token: impl Into<String>) -> Self {
        Self {
            success: true,
            count: None,
            data: None,
            message: None,
            token: Some(token.into()),
        }
    }
}
