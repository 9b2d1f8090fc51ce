//! BRI SNAP QR MPM Dynamic client.
//!
//! Auth: `client_credentials` grant signed with the partner's RSA key
//! (`X-SIGNATURE = base64(RSA-SHA256(client_id|timestamp))`).
//! Calls: `X-SIGNATURE = hex(HMAC-SHA512(client_secret, message))` where the
//! message is `METHOD:/path:token:hex(sha256(body)):timestamp`.

use crate::payload::{field, set_if_empty, set_nested_if_empty, text};
use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use qrisgate_auth::{
    HmacSha512Signer, RsaSha256Signer, TokenManager,
    canonical::{snap_service_message, snap_token_message},
    timestamp::snap_timestamp,
};
use qrisgate_config::BriMpmConfig;
use qrisgate_types::{
    Gateway, JsonMap, Payload, ProviderId, QrisError, QrisResponse, Signer as _, TokenCache,
    Transport, traits::Result,
};
use rand::Rng as _;
use serde_json::Value;
use std::{ops::Range, sync::Arc};

const TOKEN_PATH: &str = "snap/v1.0/access-token/b2b";
const GENERATE_QR_PATH: &str = "v1.0/qr-dynamic-mpm/qr-mpm-generate-qr";
const QUERY_PATH: &str = "v1.0/qr-dynamic-mpm/qr-mpm-query";

/// Range of the numeric `X-EXTERNAL-ID` request identifier.
const EXTERNAL_ID_RANGE: Range<u64> = 9_999_999_999..99_999_999_999;

fn external_id() -> String {
    rand::thread_rng().gen_range(EXTERNAL_ID_RANGE).to_string()
}

/// Client for the BRI QR MPM Dynamic API.
pub struct BriMpmDynamicClient {
    config: BriMpmConfig,
    transport: Arc<dyn Transport>,
    tokens: TokenManager,
    token_signer: RsaSha256Signer,
    request_signer: HmacSha512Signer,
    timezone: Option<Tz>,
}

impl BriMpmDynamicClient {
    /// Resolves key source and timezone up front; the key itself is read at
    /// signing time.
    ///
    /// # Errors
    ///
    /// Returns [`QrisError::Config`] if no private key is configured or the
    /// timezone is unknown.
    pub fn new(
        config: BriMpmConfig,
        transport: Arc<dyn Transport>,
        cache: Arc<dyn TokenCache>,
    ) -> Result<Self> {
        let timezone = config.timezone()?;
        let token_signer = RsaSha256Signer::new(config.private_key()?);
        let request_signer = HmacSha512Signer::new(config.client_secret.clone());
        Ok(Self {
            config,
            transport,
            tokens: TokenManager::new(cache),
            token_signer,
            request_signer,
            timezone,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.host.trim_end_matches('/'))
    }

    fn timestamp(&self) -> String {
        snap_timestamp(Utc::now(), self.timezone)
    }

    /// B2B access-token request.
    async fn request_token(&self) -> Result<JsonMap> {
        let timestamp = self.timestamp();
        let signature = self
            .token_signer
            .sign(&snap_token_message(&self.config.client_id, &timestamp))?;

        let mut body = JsonMap::new();
        body.insert("grantType".into(), Value::String("client_credentials".into()));
        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("X-CLIENT-KEY".to_string(), self.config.client_id.clone()),
            ("X-TIMESTAMP".to_string(), timestamp),
            ("X-SIGNATURE".to_string(), signature),
        ];
        let data = self
            .transport
            .perform_request(&self.url(TOKEN_PATH), &body, &headers)
            .await?;

        if field(&data, "accessToken").is_empty() {
            return Err(QrisError::Authentication {
                provider: ProviderId::BriMpmDynamic,
                code: text(&data, "responseCode"),
                description: text(&data, "responseMessage"),
            });
        }
        Ok(data)
    }

    async fn access_token(&self) -> Result<String> {
        self.tokens
            .get_or_fetch(ProviderId::BriMpmDynamic.cache_key(), || self.request_token())
            .await
    }

    /// Signs the exact bytes that go on the wire and posts them.
    async fn send(&self, path: &str, token: &str, body: JsonMap) -> Result<QrisResponse> {
        let timestamp = self.timestamp();
        let payload = serde_json::to_vec(&body)?;
        let message = snap_service_message("POST", path, token, &payload, &timestamp);
        let signature = self.request_signer.sign(&message)?;

        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {token}")),
            ("X-TIMESTAMP".to_string(), timestamp),
            ("X-SIGNATURE".to_string(), signature),
            ("X-PARTNER-ID".to_string(), self.config.partner_id.clone()),
            ("X-EXTERNAL-ID".to_string(), external_id()),
            ("CHANNEL-ID".to_string(), self.config.channel_id.clone()),
        ];
        tracing::debug!(provider = %ProviderId::BriMpmDynamic, path, "sending signed request");
        let data = self
            .transport
            .perform_request(&self.url(path), &body, &headers)
            .await?;

        let response = QrisResponse::new(data);
        if response.is_unauthorized() {
            self.tokens.invalidate(ProviderId::BriMpmDynamic.cache_key());
        }
        Ok(response)
    }
}

#[async_trait]
impl Gateway for BriMpmDynamicClient {
    fn provider(&self) -> ProviderId {
        ProviderId::BriMpmDynamic
    }

    async fn generate_qr_code(&self, request: &dyn Payload) -> Result<QrisResponse> {
        let token = self.access_token().await?;
        let mut body = request.to_wire_map();
        set_if_empty(&mut body, "merchantId", &self.config.merchant_id);
        set_if_empty(&mut body, "terminalId", &self.config.terminal_id);
        self.send(GENERATE_QR_PATH, &token, body).await
    }

    async fn check_status_transaction(&self, request: &dyn Payload) -> Result<QrisResponse> {
        let token = self.access_token().await?;
        let mut body = request.to_wire_map();
        set_nested_if_empty(
            &mut body,
            "additionalInfo",
            "terminalId",
            &self.config.terminal_id,
        );
        self.send(QUERY_PATH, &token, body).await
    }
}
