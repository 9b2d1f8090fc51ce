//! Canonical signing messages.
//!
//! The bank recomputes each signature from the same inputs, so field order
//! and delimiters here are part of the wire contract.

use sha2::{Digest, Sha256};

/// Colon-joined business identifiers, e.g. `request_id:merchant_id:bill_number`.
#[must_use]
pub fn colon_message(fields: &[&str]) -> String {
    fields.join(":")
}

/// SNAP service signature input:
/// `METHOD:/path:access_token:hex(sha256(body)):timestamp`.
///
/// `path` is given without its leading slash, as it appears after the host.
#[must_use]
pub fn snap_service_message(
    method: &str,
    path: &str,
    access_token: &str,
    body: &[u8],
    timestamp: &str,
) -> String {
    let body_hash = hex::encode(Sha256::digest(body));
    format!(
        "{method}:/{}:{access_token}:{body_hash}:{timestamp}",
        path.trim_start_matches('/')
    )
}

/// SNAP access-token signature input: `client_id|timestamp`.
#[must_use]
pub fn snap_token_message(client_id: &str, timestamp: &str) -> String {
    format!("{client_id}|{timestamp}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colon_message_order() {
        assert_eq!(
            colon_message(&["XwVjF5zfuHhrDZuw", "008800223497", "C000011957"]),
            "XwVjF5zfuHhrDZuw:008800223497:C000011957"
        );
    }

    #[test]
    fn test_colon_message_keeps_empty_fields() {
        assert_eq!(colon_message(&["a", "", "c"]), "a::c");
    }

    #[test]
    fn test_snap_service_message() {
        // sha256("{}")
        let msg = snap_service_message(
            "POST",
            "v1.0/qr-dynamic-mpm/qr-mpm-query",
            "tok",
            b"{}",
            "2024-01-01T00:00:00Z",
        );
        assert_eq!(
            msg,
            "POST:/v1.0/qr-dynamic-mpm/qr-mpm-query:tok:\
             44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a:\
             2024-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_snap_service_message_leading_slash_normalised() {
        let a = snap_service_message("POST", "/x", "t", b"", "ts");
        let b = snap_service_message("POST", "x", "t", b"", "ts");
        assert_eq!(a, b);
        assert!(a.starts_with("POST:/x:t:"));
    }

    #[test]
    fn test_snap_token_message() {
        assert_eq!(
            snap_token_message("client", "2024-01-01T07:00:00+07:00"),
            "client|2024-01-01T07:00:00+07:00"
        );
    }
}
