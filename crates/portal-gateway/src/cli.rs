use clap::{Parser, ValueEnum};
use portal_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "APP_PORT";
pub const STORE_BACKEND_ENV: &str = "PORTAL_STORE_BACKEND";
pub const DB_ADDR_ENV: &str = "DB_ADDR";
pub const DB_PASS_ENV: &str = "DB_PASS";
pub const DOMAIN_ENV: &str = "DOMAIN";
pub const API_QUOTA_ENV: &str = "API_QUOTA";
pub const RETENTION_HOURS_ENV: &str = "URL_RETENTION_TIME";
pub const LOG_FORMAT_ENV: &str = "PORTAL_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "PORTAL_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DB_ADDR: &str = "127.0.0.1:6379";
pub const DEFAULT_DOMAIN: &str = "localhost:3000";
pub const DEFAULT_API_QUOTA: i64 = 10;
pub const DEFAULT_RETENTION_HOURS: u64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackendArg {
    #[value(name = "redis")]
    Redis,
    #[value(name = "memory")]
    Memory,
}

impl Display for StoreBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackendArg::Redis => write!(f, "redis"),
            StoreBackendArg::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "json")]
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

/// Accepts a full socket address, `:port`, or a bare port.
fn parse_listen_addr(value: &str) -> Result<SocketAddr, String> {
    let value = value.trim();
    let candidate = if let Some(port) = value.strip_prefix(':') {
        format!("0.0.0.0:{port}")
    } else if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        format!("0.0.0.0:{value}")
    } else {
        value.to_string()
    };
    candidate
        .parse()
        .map_err(|e| format!("invalid listen address '{value}': {e}"))
}

#[derive(Debug, Parser)]
#[command(name = "portal-gateway")]
pub struct Cli {
    #[arg(
        long,
        env = LISTEN_ADDR_ENV,
        default_value = DEFAULT_LISTEN_ADDR,
        value_parser = parse_listen_addr,
    )]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORE_BACKEND_ENV,
        value_enum,
        default_value_t = StoreBackendArg::Redis
    )]
    pub store: StoreBackendArg,

    #[arg(long, env = DB_ADDR_ENV, default_value = DEFAULT_DB_ADDR)]
    pub db_addr: String,

    #[arg(long, env = DB_PASS_ENV, hide_env_values = true)]
    pub db_pass: Option<String>,

    #[arg(long, env = DOMAIN_ENV, default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    #[arg(
        long,
        env = API_QUOTA_ENV,
        default_value_t = DEFAULT_API_QUOTA,
        value_parser = clap::value_parser!(i64).range(1..),
    )]
    pub api_quota: i64,

    #[arg(
        long,
        env = RETENTION_HOURS_ENV,
        default_value_t = DEFAULT_RETENTION_HOURS,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub retention_hours: u64,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Pretty
    )]
    pub log_format: LogFormatArg,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}
