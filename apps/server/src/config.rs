use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{bail, Context};
use rebalancer_core::constants::DEFAULT_STEP_AMOUNT;
use rust_decimal::Decimal;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Optimizer step used when a request does not set its own
    pub step_amount: Decimal,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("RB_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid RB_LISTEN_ADDR")?;
        let cors_allow = std::env::var("RB_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("RB_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let step_amount = match std::env::var("RB_STEP_AMOUNT") {
            Ok(raw) => Decimal::from_str(raw.trim()).context("Invalid RB_STEP_AMOUNT")?,
            Err(_) => DEFAULT_STEP_AMOUNT,
        };
        if step_amount <= Decimal::ZERO {
            bail!("RB_STEP_AMOUNT must be positive (got {})", step_amount);
        }
        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            step_amount,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
            step_amount: DEFAULT_STEP_AMOUNT,
        }
    }
}
