use anyhow::{Context as _, Result};
use chrono::{TimeDelta, Utc};
use clap::{Parser, Subcommand};
use qrisgate_auth::timestamp::local_expiry;
use qrisgate_config::{BniConfig, Config, LogConfig, LogFormat};
use qrisgate_provider::{
    BniCheckStatusRequest, BniGenerateQrRequest, BriMpmCheckStatusRequest, BriMpmGenerateQrRequest,
};
use qrisgate_store::InMemoryTokenCache;
use qrisgate_types::{Amount, Gateway, Payload, ProviderId, QrisResponse};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "qrisgate", about = "qrisgate: dynamic QRIS payments via BNI and BRI")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue a dynamic QR code.
    Generate {
        /// Provider name (bni / bri).
        #[arg(short, long)]
        provider: String,
        /// Amount in major units, e.g. 5000.00.
        #[arg(short, long)]
        amount: String,
        /// Request / partner reference id (default: derived from the clock).
        #[arg(long)]
        request_id: Option<String>,
        /// QR lifetime in minutes (BNI only).
        #[arg(long, value_name = "MINUTES", default_value_t = 30)]
        expires_in: i64,
        /// ISO 4217 currency (BRI only).
        #[arg(long, default_value = "IDR")]
        currency: String,
    },
    /// Query the payment status of a generated QR code.
    Check {
        /// Provider name (bni / bri).
        #[arg(short, long)]
        provider: String,
        /// `bill_number` (BNI) or `referenceNo` (BRI) from the generate call.
        #[arg(short, long)]
        reference: String,
        /// Service code from the generate call's `responseCode` (BRI only).
        #[arg(long)]
        service_code: Option<String>,
        /// Request id (BNI only; default: derived from the clock).
        #[arg(long)]
        request_id: Option<String>,
    },
    /// List providers and whether they are configured.
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("config error: {e}"))?;
    init_tracing(&config.log);

    match cli.command {
        Commands::Generate {
            provider,
            amount,
            request_id,
            expires_in,
            currency,
        } => cmd_generate(&config, &provider, &amount, request_id, expires_in, currency).await,
        Commands::Check {
            provider,
            reference,
            service_code,
            request_id,
        } => cmd_check(&config, &provider, reference, service_code, request_id).await,
        Commands::Providers => {
            cmd_providers(&config);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout carries only the bank response.
fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn parse_provider(s: &str) -> Result<ProviderId> {
    s.parse::<ProviderId>()
        .map_err(|e| anyhow::anyhow!("unknown provider '{s}': {e}"))
}

fn default_request_id() -> String {
    Utc::now().format("%Y%m%d%H%M%S%3f").to_string()
}

fn open_gateway(config: &Config, provider: ProviderId) -> Result<Box<dyn Gateway>> {
    let transport = qrisgate_provider::make_transport(config)?;
    let cache = Arc::new(InMemoryTokenCache::new());
    tracing::debug!(%provider, timeout_secs = config.timeout_secs, "opening gateway");
    qrisgate_provider::make_gateway(provider, config, transport, cache)
        .with_context(|| format!("cannot create {provider} gateway"))
}

async fn cmd_generate(
    config: &Config,
    provider: &str,
    amount: &str,
    request_id: Option<String>,
    expires_in: i64,
    currency: String,
) -> Result<()> {
    let provider = parse_provider(provider)?;
    let amount: Amount = amount.parse()?;
    let request_id = request_id.unwrap_or_else(default_request_id);

    let request: Box<dyn Payload> = match provider {
        ProviderId::Bni => Box::new(
            BniGenerateQrRequest::builder()
                .request_id(request_id)
                .amount(amount)
                .qr_expired(bni_qr_expired(config, expires_in)?)
                .build(),
        ),
        ProviderId::BriMpmDynamic => Box::new(
            BriMpmGenerateQrRequest::builder()
                .partner_reference_no(request_id)
                .amount(amount)
                .currency(currency)
                .build(),
        ),
    };

    let gateway = open_gateway(config, provider)?;
    let response = gateway.generate_qr_code(request.as_ref()).await?;
    print_response(&response)?;
    if response.is_generation_successful() {
        eprintln!(
            "{provider}: QR generated, reference {} service code {}",
            response.reference_number(),
            response.service_code()
        );
    } else {
        eprintln!(
            "{provider}: generation rejected ({}) {}",
            response.response_code(),
            response.response_message()
        );
    }
    Ok(())
}

/// Wall-clock expiry for a BNI QR, in the configured BNI zone if any.
fn bni_qr_expired(config: &Config, expires_in: i64) -> Result<String> {
    let after = TimeDelta::try_minutes(expires_in)
        .filter(|d| *d > TimeDelta::zero())
        .with_context(|| {
            format!("--expires-in must be a positive number of minutes, got {expires_in}")
        })?;
    let tz = config
        .bni
        .as_ref()
        .map(BniConfig::timezone)
        .transpose()?
        .flatten();
    local_expiry(Utc::now(), after, tz)
        .with_context(|| format!("--expires-in {expires_in} is out of range"))
}

async fn cmd_check(
    config: &Config,
    provider: &str,
    reference: String,
    service_code: Option<String>,
    request_id: Option<String>,
) -> Result<()> {
    let provider = parse_provider(provider)?;

    let request: Box<dyn Payload> = match provider {
        ProviderId::Bni => Box::new(
            BniCheckStatusRequest::builder()
                .request_id(request_id.unwrap_or_else(default_request_id))
                .bill_number(reference)
                .build(),
        ),
        ProviderId::BriMpmDynamic => Box::new(
            BriMpmCheckStatusRequest::builder()
                .original_reference_no(reference)
                .service_code(
                    service_code.context("--service-code is required for BRI status checks")?,
                )
                .build(),
        ),
    };

    let gateway = open_gateway(config, provider)?;
    let response = gateway.check_status_transaction(request.as_ref()).await?;
    print_response(&response)?;
    let status = if response.is_payment_successful() {
        "paid"
    } else {
        "not paid"
    };
    eprintln!("{provider}: {status}");
    Ok(())
}

fn cmd_providers(config: &Config) {
    for &provider in ProviderId::all() {
        let status = if config.is_configured(provider) {
            "configured"
        } else {
            "not configured"
        };
        println!("{provider}: {status}");
    }
}

fn print_response(response: &QrisResponse) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
