//! BNI QRIS client.
//!
//! Auth: OAuth-style password grant with `Authorization: Basic`, then
//! `Authorization: Bearer {token}` on every call.
//! Signature: `X-Signature = hex(HMAC-SHA512(hmac_key, a:b:c))` over business
//! identifiers of the request.

use crate::payload::{field, set_if_empty, text};
use async_trait::async_trait;
use qrisgate_auth::{HmacSha512Signer, TokenManager, basic_auth, canonical::colon_message};
use qrisgate_config::BniConfig;
use qrisgate_types::{
    Gateway, JsonMap, Payload, ProviderId, QrisError, QrisResponse, Signer as _, TokenCache,
    Transport, traits::Result,
};
use secrecy::ExposeSecret as _;
use serde_json::Value;
use std::sync::Arc;

const TOKEN_PATH: &str = "auth/get-token";
const GENERATE_QR_PATH: &str = "qr/generate-qr";
const CHECK_STATUS_PATH: &str = "check-status/inquiry";

/// Client for the BNI QRIS API.
pub struct BniClient {
    config: BniConfig,
    transport: Arc<dyn Transport>,
    tokens: TokenManager,
    signer: HmacSha512Signer,
}

impl BniClient {
    pub fn new(
        config: BniConfig,
        transport: Arc<dyn Transport>,
        cache: Arc<dyn TokenCache>,
    ) -> Self {
        let signer = HmacSha512Signer::new(config.hmac_key.clone());
        Self {
            config,
            transport,
            tokens: TokenManager::new(cache),
            signer,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.host.trim_end_matches('/'))
    }

    /// Password grant against the token endpoint.
    async fn request_token(&self) -> Result<JsonMap> {
        let mut body = JsonMap::new();
        body.insert("username".into(), Value::String(self.config.username.clone()));
        body.insert(
            "password".into(),
            Value::String(self.config.password.expose_secret().to_string()),
        );
        body.insert("grant_type".into(), Value::String("password".into()));

        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            (
                "Authorization".to_string(),
                basic_auth(&self.config.client_id, &self.config.client_secret),
            ),
        ];
        let data = self
            .transport
            .perform_request(&self.url(TOKEN_PATH), &body, &headers)
            .await?;

        if field(&data, "access_token").is_empty() {
            let description = match text(&data, "error") {
                d if d.is_empty() => text(&data, "message"),
                d => d,
            };
            return Err(QrisError::Authentication {
                provider: ProviderId::Bni,
                code: text(&data, "code"),
                description,
            });
        }
        Ok(data)
    }

    async fn access_token(&self) -> Result<String> {
        self.tokens
            .get_or_fetch(ProviderId::Bni.cache_key(), || self.request_token())
            .await
    }

    /// Signs `fields` of the already filled `body` and posts it.
    async fn send(
        &self,
        path: &str,
        token: &str,
        body: JsonMap,
        fields: [&str; 3],
    ) -> Result<QrisResponse> {
        let message = colon_message(&fields.map(|k| field(&body, k)));
        let signature = self.signer.sign(&message)?;

        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {token}")),
            ("X-Signature".to_string(), signature),
        ];
        tracing::debug!(provider = %ProviderId::Bni, path, "sending signed request");
        let data = self
            .transport
            .perform_request(&self.url(path), &body, &headers)
            .await?;

        let response = QrisResponse::new(data);
        if response.is_unauthorized() {
            self.tokens.invalidate(ProviderId::Bni.cache_key());
        }
        Ok(response)
    }
}

#[async_trait]
impl Gateway for BniClient {
    fn provider(&self) -> ProviderId {
        ProviderId::Bni
    }

    async fn generate_qr_code(&self, request: &dyn Payload) -> Result<QrisResponse> {
        let token = self.access_token().await?;
        let mut body = request.to_wire_map();
        set_if_empty(&mut body, "merchant_id", &self.config.merchant_id);
        set_if_empty(&mut body, "terminal_id", &self.config.terminal_id);
        self.send(
            GENERATE_QR_PATH,
            &token,
            body,
            ["request_id", "merchant_id", "qr_expired"],
        )
        .await
    }

    async fn check_status_transaction(&self, request: &dyn Payload) -> Result<QrisResponse> {
        let token = self.access_token().await?;
        let mut body = request.to_wire_map();
        set_if_empty(&mut body, "mid", &self.config.merchant_id);
        self.send(
            CHECK_STATUS_PATH,
            &token,
            body,
            ["request_id", "mid", "bill_number"],
        )
        .await
    }
}
