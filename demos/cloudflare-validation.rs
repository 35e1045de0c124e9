// # Cloudflare Handle Real Environment Validation Tool
//
// Builds a `CloudflareHandle` from environment variables and exercises it
// against the real Cloudflare API.
//
// ## Usage
//
// ```bash
// # Dry-run mode (default - safe): verify the token, resolve zones, list records
// CF_API_TOKEN=your_token \
// DDNS_DOMAINS=home.example.com,*.lab.example.com \
// cargo run -p ddns-demos --bin cloudflare_validation
//
// # Live mode (makes actual changes!): also create, update and delete a
// # temporary record at every domain
// DDNS_MODE=live \
// CF_API_TOKEN=your_token \
// DDNS_DOMAINS=ddns-test.example.com \
// DDNS_TEST_IP=192.0.2.1 \
// cargo run -p ddns-demos --bin cloudflare_validation
// ```
//
// ## Environment Variables
//
// Required:
// - `CF_API_TOKEN` or `CF_API_TOKEN_FILE`: Cloudflare API token (or a file holding it)
// - `DDNS_DOMAINS`: Comma-separated domains; `*.` prefix for wildcards
//
// Optional:
// - `CF_ACCOUNT_ID`: Restrict zone lookups to one account
// - `DDNS_TEST_IP`: Address used in live mode (required there)
// - `DDNS_TIMEOUT_SECS`: Per-request timeout (default: 30)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `DDNS_MODE`: "dry-run" or "live" (default: dry-run)

use anyhow::{Context, Result};
use ddns_core::{
    AddressFamily, DnsHandle, Domain, HandleConfig, ProviderConfig, TracingDiagnostics, Ttl,
};
use ddns_provider_cloudflare::{CloudflareAuth, CloudflareHandle};
use std::env;
use std::net::IpAddr;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// - 0: Validation passed
/// - 1: Configuration error
/// - 2: A handle operation failed
#[derive(Debug, Clone, Copy)]
enum ValidationExitCode {
    Passed = 0,
    ConfigError = 1,
    OperationFailed = 2,
}

impl From<ValidationExitCode> for ExitCode {
    fn from(code: ValidationExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

struct Config {
    handle: HandleConfig,
    domains: Vec<Domain>,
    test_ip: Option<IpAddr>,
    live: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let api_token = match (env::var("CF_API_TOKEN"), env::var("CF_API_TOKEN_FILE")) {
            (Ok(token), _) => token,
            (Err(_), Ok(path)) => std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read CF_API_TOKEN_FILE {:?}", path))?
                .trim()
                .to_string(),
            (Err(_), Err(_)) => anyhow::bail!("CF_API_TOKEN or CF_API_TOKEN_FILE is required"),
        };

        let account_id = env::var("CF_ACCOUNT_ID").ok().filter(|id| !id.trim().is_empty());

        let domains = env::var("DDNS_DOMAINS")
            .context("DDNS_DOMAINS is required")?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Domain::parse(s).with_context(|| format!("Invalid domain {:?}", s)))
            .collect::<Result<Vec<_>>>()?;

        let test_ip = env::var("DDNS_TEST_IP")
            .ok()
            .map(|s| s.parse::<IpAddr>().with_context(|| format!("Invalid DDNS_TEST_IP {:?}", s)))
            .transpose()?;

        let timeout_secs = match env::var("DDNS_TIMEOUT_SECS") {
            Ok(s) => s
                .parse()
                .with_context(|| format!("Invalid DDNS_TIMEOUT_SECS {:?}", s))?,
            Err(_) => 30,
        };

        let live = env::var("DDNS_MODE")
            .unwrap_or_else(|_| "dry-run".to_string())
            .eq_ignore_ascii_case("live");

        Ok(Self {
            handle: HandleConfig::new(ProviderConfig::cloudflare(api_token, account_id))
                .with_timeout_secs(timeout_secs),
            domains,
            test_ip,
            live,
            log_level: env::var("DDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    fn validate(&self) -> Result<()> {
        self.handle.validate()?;

        if self.domains.is_empty() {
            anyhow::bail!("DDNS_DOMAINS lists no domain");
        }
        if self.live && self.test_ip.is_none() {
            anyhow::bail!("DDNS_TEST_IP is required when DDNS_MODE=live");
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env().and_then(|c| c.validate().map(|_| c)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ValidationExitCode::ConfigError.into();
        }
    };

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ValidationExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ValidationExitCode::OperationFailed.into();
        }
    };

    rt.block_on(async {
        match run(&config).await {
            Ok(()) => ValidationExitCode::Passed,
            Err(e) => {
                error!("Validation failed: {:#}", e);
                ValidationExitCode::OperationFailed
            }
        }
    })
    .into()
}

async fn run(config: &Config) -> Result<()> {
    let diag = TracingDiagnostics;

    if config.live {
        warn!("Running in LIVE mode - will make actual DNS changes!");
    } else {
        warn!("Running in DRY-RUN mode - no changes will be made");
    }

    info!("--- Step 1: Verifying the API token ---");
    let handle = CloudflareAuth::from_config(&config.handle.provider)?
        .connect(&diag, config.handle.timeout())
        .await?;
    info!("Handle ready (API token not shown)");

    for domain in &config.domains {
        info!("--- Step 2: {} ---", domain);

        let zone = handle.resolve_zone(&diag, domain).await?;
        info!("Zone ID: {}", zone);

        for family in [AddressFamily::V4, AddressFamily::V6] {
            let records = handle.list_records(&diag, domain, family).await?;
            info!("{} record(s) of type {}", records.len(), family.record_type());
            for (id, ip) in &records {
                info!("  {} -> {}", id, ip);
            }
        }

        if let Some(ip) = config.test_ip
            && config.live
        {
            exercise_mutations(&handle, domain, ip).await?;
        }
    }

    info!("=== Validation complete ===");
    Ok(())
}

/// Create, update and delete one temporary record, checking the cached
/// listing after each step
async fn exercise_mutations(handle: &CloudflareHandle, domain: &Domain, ip: IpAddr) -> Result<()> {
    let diag = TracingDiagnostics;
    let family = AddressFamily::of(ip);

    info!("--- Step 3: Mutating {} ({}) ---", domain, family);

    let id = handle.create_record(&diag, domain, family, ip, Ttl::AUTO, false).await?;
    let listed = handle.list_records(&diag, domain, family).await?;
    anyhow::ensure!(listed.get(&id) == Some(&ip), "Created record {} missing from cache", id);
    info!("Created record {}", id);

    handle.update_record(&diag, domain, family, &id, ip).await?;
    info!("Updated record {}", id);

    handle.delete_record(&diag, domain, family, &id).await?;
    let listed = handle.list_records(&diag, domain, family).await?;
    anyhow::ensure!(!listed.contains_key(&id), "Deleted record {} still cached", id);
    info!("Deleted record {}", id);

    Ok(())
}
