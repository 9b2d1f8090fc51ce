//! Typed request payloads, one per (provider, operation).
//!
//! Merchant and terminal identifiers are optional: when left unset the client
//! fills them from its configuration before signing.

use bon::Builder;
use qrisgate_types::{Amount, JsonMap, Payload};
use serde_json::{Value, json};

fn object(value: Value) -> JsonMap {
    match value {
        Value::Object(map) => map,
        _ => JsonMap::new(),
    }
}

fn insert_opt(map: &mut JsonMap, key: &str, value: Option<&String>) {
    if let Some(v) = value {
        map.insert(key.to_string(), Value::String(v.clone()));
    }
}

/// `true` when `key` is absent, not a string, or an empty string.
fn is_empty_field(map: &JsonMap, key: &str) -> bool {
    map.get(key)
        .and_then(Value::as_str)
        .is_none_or(str::is_empty)
}

/// Set `key` to `value` unless the caller already supplied a non-empty string.
pub(crate) fn set_if_empty(map: &mut JsonMap, key: &str, value: &str) {
    if is_empty_field(map, key) {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// Like [`set_if_empty`] for a field of the nested object `parent`, which is
/// created when absent.
pub(crate) fn set_nested_if_empty(map: &mut JsonMap, parent: &str, key: &str, value: &str) {
    match map.get_mut(parent) {
        Some(Value::Object(inner)) => set_if_empty(inner, key, value),
        _ => {
            let mut inner = JsonMap::new();
            inner.insert(key.to_string(), Value::String(value.to_string()));
            map.insert(parent.to_string(), Value::Object(inner));
        }
    }
}

/// String value of `key`, empty when absent.
pub(crate) fn field<'a>(map: &'a JsonMap, key: &str) -> &'a str {
    map.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Value of `key` rendered as text, for error reports; numeric codes are kept.
pub(crate) fn text(map: &JsonMap, key: &str) -> String {
    match map.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ── BNI ───────────────────────────────────────────────────────────────────────

/// BNI `qr/generate-qr` request.
#[derive(Debug, Clone, Builder)]
pub struct BniGenerateQrRequest {
    #[builder(into)]
    pub request_id: String,
    pub amount: Amount,
    /// Expiry as `YYYY-MM-DDTHH:MM:SS` bank-local time.
    #[builder(into)]
    pub qr_expired: String,
    #[builder(into)]
    pub merchant_id: Option<String>,
    #[builder(into)]
    pub terminal_id: Option<String>,
}

impl Payload for BniGenerateQrRequest {
    fn to_wire_map(&self) -> JsonMap {
        let mut map = object(json!({
            "request_id": self.request_id,
            "amount": self.amount,
            "qr_expired": self.qr_expired,
        }));
        insert_opt(&mut map, "merchant_id", self.merchant_id.as_ref());
        insert_opt(&mut map, "terminal_id", self.terminal_id.as_ref());
        map
    }
}

/// BNI `check-status/inquiry` request.
#[derive(Debug, Clone, Builder)]
pub struct BniCheckStatusRequest {
    #[builder(into)]
    pub request_id: String,
    /// `bill_number` returned by the generate call.
    #[builder(into)]
    pub bill_number: String,
    /// Merchant id, sent as `mid`.
    #[builder(into)]
    pub mid: Option<String>,
}

impl Payload for BniCheckStatusRequest {
    fn to_wire_map(&self) -> JsonMap {
        let mut map = object(json!({
            "request_id": self.request_id,
            "bill_number": self.bill_number,
        }));
        insert_opt(&mut map, "mid", self.mid.as_ref());
        map
    }
}

// ── BRI MPM Dynamic ───────────────────────────────────────────────────────────

/// BRI `qr-mpm-generate-qr` request.
#[derive(Debug, Clone, Builder)]
pub struct BriMpmGenerateQrRequest {
    #[builder(into)]
    pub partner_reference_no: String,
    pub amount: Amount,
    #[builder(into, default = String::from("IDR"))]
    pub currency: String,
    #[builder(into)]
    pub merchant_id: Option<String>,
    #[builder(into)]
    pub terminal_id: Option<String>,
}

impl Payload for BriMpmGenerateQrRequest {
    fn to_wire_map(&self) -> JsonMap {
        let mut map = object(json!({
            "partnerReferenceNo": self.partner_reference_no,
            "amount": {
                "value": self.amount,
                "currency": self.currency,
            },
        }));
        insert_opt(&mut map, "merchantId", self.merchant_id.as_ref());
        insert_opt(&mut map, "terminalId", self.terminal_id.as_ref());
        map
    }
}

/// BRI `qr-mpm-query` request.
#[derive(Debug, Clone, Builder)]
pub struct BriMpmCheckStatusRequest {
    /// `referenceNo` returned by the generate call.
    #[builder(into)]
    pub original_reference_no: String,
    /// Two-digit service code taken from the generate call's `responseCode`.
    #[builder(into)]
    pub service_code: String,
    /// Sent as `additionalInfo.terminalId`.
    #[builder(into)]
    pub terminal_id: Option<String>,
}

impl Payload for BriMpmCheckStatusRequest {
    fn to_wire_map(&self) -> JsonMap {
        let mut map = object(json!({
            "originalReferenceNo": self.original_reference_no,
            "serviceCode": self.service_code,
        }));
        if let Some(terminal_id) = &self.terminal_id {
            map.insert(
                "additionalInfo".to_string(),
                json!({ "terminalId": terminal_id }),
            );
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bni_generate_wire_shape() {
        let req = BniGenerateQrRequest::builder()
            .request_id("10009121031000912103")
            .amount("15001.00".parse().unwrap())
            .qr_expired("2022-06-23T15:01:28")
            .build();
        let map = req.to_wire_map();
        assert_eq!(
            Value::Object(map),
            json!({
                "request_id": "10009121031000912103",
                "amount": "15001.00",
                "qr_expired": "2022-06-23T15:01:28"
            })
        );
    }

    #[test]
    fn test_bni_generate_includes_supplied_ids() {
        let req = BniGenerateQrRequest::builder()
            .request_id("1")
            .amount(Amount::from_major_units(5000))
            .qr_expired("2022-06-23T15:01:28")
            .merchant_id("999")
            .terminal_id("T1")
            .build();
        let map = req.to_wire_map();
        assert_eq!(field(&map, "merchant_id"), "999");
        assert_eq!(field(&map, "terminal_id"), "T1");
    }

    #[test]
    fn test_bni_check_wire_shape() {
        let req = BniCheckStatusRequest::builder()
            .request_id("XwVjF5zfuHhrDZuw")
            .bill_number("C000011957")
            .build();
        assert_eq!(
            Value::Object(req.to_wire_map()),
            json!({"request_id": "XwVjF5zfuHhrDZuw", "bill_number": "C000011957"})
        );
    }

    #[test]
    fn test_bri_generate_wire_shape_default_currency() {
        let req = BriMpmGenerateQrRequest::builder()
            .partner_reference_no("10009121031000912103")
            .amount(Amount::from_minor_units(1_500_100))
            .build();
        assert_eq!(
            Value::Object(req.to_wire_map()),
            json!({
                "partnerReferenceNo": "10009121031000912103",
                "amount": {"value": "15001.00", "currency": "IDR"}
            })
        );
    }

    #[test]
    fn test_bri_check_wire_shape() {
        let req = BriMpmCheckStatusRequest::builder()
            .original_reference_no("000008526955")
            .service_code("47")
            .terminal_id("10049258")
            .build();
        assert_eq!(
            Value::Object(req.to_wire_map()),
            json!({
                "originalReferenceNo": "000008526955",
                "serviceCode": "47",
                "additionalInfo": {"terminalId": "10049258"}
            })
        );
    }

    #[test]
    fn test_set_if_empty_fills_absent_and_blank() {
        let mut map = object(json!({"blank": "", "number": 7}));
        set_if_empty(&mut map, "absent", "a");
        set_if_empty(&mut map, "blank", "b");
        set_if_empty(&mut map, "number", "n");
        assert_eq!(field(&map, "absent"), "a");
        assert_eq!(field(&map, "blank"), "b");
        assert_eq!(field(&map, "number"), "n");
    }

    #[test]
    fn test_set_if_empty_keeps_caller_value() {
        let mut map = object(json!({"merchantId": "caller"}));
        set_if_empty(&mut map, "merchantId", "configured");
        assert_eq!(field(&map, "merchantId"), "caller");
    }

    #[test]
    fn test_text_renders_numbers() {
        let map = object(json!({"code": 401, "error": "denied", "none": null}));
        assert_eq!(text(&map, "code"), "401");
        assert_eq!(text(&map, "error"), "denied");
        assert_eq!(text(&map, "none"), "");
        assert_eq!(text(&map, "absent"), "");
    }

    #[test]
    fn test_set_nested_if_empty() {
        let mut map = JsonMap::new();
        set_nested_if_empty(&mut map, "additionalInfo", "terminalId", "cfg");
        assert_eq!(map["additionalInfo"], json!({"terminalId": "cfg"}));

        let mut map = object(json!({"additionalInfo": {"terminalId": "own", "x": 1}}));
        set_nested_if_empty(&mut map, "additionalInfo", "terminalId", "cfg");
        assert_eq!(map["additionalInfo"], json!({"terminalId": "own", "x": 1}));

        let mut map = object(json!({"additionalInfo": "garbage"}));
        set_nested_if_empty(&mut map, "additionalInfo", "terminalId", "cfg");
        assert_eq!(map["additionalInfo"], json!({"terminalId": "cfg"}));
    }
}
