//! Request bodies for the JSON API.
//!
//! Bodies carry raw caller strings; all validation happens in the portal so
//! the same rules apply to every presentation layer.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::portal::PortalError;

/// An ether amount given either as a JSON string (`"0.5"`) or number (`0.5`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(serde_json::Number),
}

impl Amount {
    /// Decimal text handed to the amount parser.
    pub fn as_decimal(&self) -> String {
        match self {
            Amount::Text(text) => text.clone(),
            Amount::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub address: String,
    #[serde(default)]
    pub amount_ether: Option<Amount>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub address: String,
}

#[derive(Deserialize, Serialize)]
pub struct TransferRequest {
    pub private_key: String,
    pub to: String,
    pub amount_ether: Amount,
}

impl std::fmt::Debug for TransferRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferRequest")
            .field("to", &self.to)
            .field("amount_ether", &self.amount_ether)
            .finish_non_exhaustive()
    }
}

/// Unwrap a JSON body, turning extractor rejections into validation errors.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, PortalError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| PortalError::validation(rejection.body_text()))
}
