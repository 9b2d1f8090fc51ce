//! Provider-agnostic view over raw bank responses.
//!
//! BNI answers with snake_case fields (`code`, `message`, `bill_number`),
//! BRI SNAP with camelCase ones (`responseCode`, `responseMessage`,
//! `referenceNo`). Every query below looks up the BNI name first and falls back
//! to the SNAP name, so callers never branch on the provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON object as sent to and received from the banks.
pub type JsonMap = serde_json::Map<String, Value>;

const SUCCESS_CODES: &[&str] = &["00", "200"];
const SUCCESS_MESSAGES: &[&str] = &["Successful", "Successfully", "success", "Payment Success"];

/// SNAP response codes are `HTTP status (3) + service code (2) + case (2)`.
const SNAP_CODE_LEN: usize = 7;

/// A raw bank response. Always a structurally valid JSON object; whether the
/// business operation succeeded is answered by the predicates, not by the type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QrisResponse(JsonMap);

impl QrisResponse {
    #[must_use]
    pub fn new(map: JsonMap) -> Self {
        Self(map)
    }

    #[must_use]
    pub fn as_map(&self) -> &JsonMap {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> JsonMap {
        self.0
    }

    /// String value of `key`; empty when absent or not a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or_default()
    }

    fn first_of(&self, primary: &str, fallback: &str) -> &str {
        match self.get_str(primary) {
            "" => self.get_str(fallback),
            v => v,
        }
    }

    /// Status code of the call itself, with SNAP codes cut to their HTTP part.
    #[must_use]
    pub fn response_code(&self) -> &str {
        match self.get_str("code") {
            "" => {
                let code = self.get_str("responseCode");
                if code.len() >= SNAP_CODE_LEN {
                    code.get(..3).unwrap_or(code)
                } else {
                    code
                }
            }
            code => code,
        }
    }

    #[must_use]
    pub fn response_message(&self) -> &str {
        self.first_of("message", "responseMessage")
    }

    /// `true` iff both the status code and status message denote success.
    #[must_use]
    pub fn is_generation_successful(&self) -> bool {
        is_success(self.response_code(), self.response_message())
    }

    /// `true` iff the queried transaction has been paid.
    #[must_use]
    pub fn is_payment_successful(&self) -> bool {
        is_success(
            self.first_of("payment_status", "latestTransactionStatus"),
            self.first_of("payment_description", "transactionStatusDesc"),
        )
    }

    /// Identifier to pass to the status check (`bill_number` / `referenceNo`).
    #[must_use]
    pub fn reference_number(&self) -> &str {
        self.first_of("bill_number", "referenceNo")
    }

    /// SNAP service code embedded in `responseCode` (characters 3 and 4).
    #[must_use]
    pub fn service_code(&self) -> &str {
        let code = self.get_str("responseCode");
        if code.len() >= SNAP_CODE_LEN {
            code.get(3..5).unwrap_or_default()
        } else {
            ""
        }
    }

    /// `true` when the bank rejected the bearer token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.get_str("code") == "401" || self.get_str("responseCode").starts_with("401")
    }
}

impl From<JsonMap> for QrisResponse {
    fn from(map: JsonMap) -> Self {
        Self(map)
    }
}

fn is_success(code: &str, message: &str) -> bool {
    SUCCESS_CODES.contains(&code) && SUCCESS_MESSAGES.contains(&message)
}
