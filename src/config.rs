use anyhow::{Context, Result};
use ethers::{
    types::{Address, U256},
    utils::parse_ether,
};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    /// Payee the transaction must have paid, canonicalized at startup.
    pub payment_address: Address,
    /// Price as configured, kept for 402 metadata and /health.
    pub price_eth: String,
    /// Price converted exactly to wei. Never compared via floats.
    pub price_wei: U256,
    pub chain_id: u64,

    /// None means unconfigured, which forces mock verification.
    pub rpc_url: Option<String>,
    pub verify_onchain: bool,
    pub proof_ttl: Duration,
    pub min_confirmations: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let payment_address_raw = env_or("PAYMENT_ADDRESS", DEFAULT_PAYMENT_ADDRESS);
        let payment_address = payment_address_raw
            .parse::<Address>()
            .with_context(|| format!("Invalid PAYMENT_ADDRESS: {payment_address_raw}"))?;

        let price_eth = env_or("PRICE_ETH", "0.001");
        let price_wei =
            parse_ether(&price_eth).with_context(|| format!("Invalid PRICE_ETH: {price_eth}"))?;

        let rpc_url = match env_or("RPC_URL", "") {
            url if url.is_empty() => None,
            url => Some(url),
        };

        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_or("PORT", "5001").parse().context("Invalid PORT")?,
            payment_address,
            price_eth,
            price_wei,
            chain_id: env_or("CHAIN_ID", "84532")
                .parse()
                .context("Invalid CHAIN_ID")?,
            rpc_url,
            verify_onchain: parse_flag(&env_or("VERIFY_ONCHAIN", "false")),
            proof_ttl: Duration::from_secs(
                env_or("PROOF_TTL", "120")
                    .parse()
                    .context("Invalid PROOF_TTL")?,
            ),
            min_confirmations: env_or("MIN_CONFIRMATIONS", "0")
                .parse()
                .context("Invalid MIN_CONFIRMATIONS")?,
        })
    }
}

const DEFAULT_PAYMENT_ADDRESS: &str = "0x1234567890AbCdEf1234567890AbCdEf12345678";

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parsing_accepts_common_truthy_forms() {
        assert!(parse_flag("1"));
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("on"));
    }

    #[test]
    fn price_converts_exactly_to_wei() {
        let wei: U256 = parse_ether("0.001").unwrap();
        assert_eq!(wei, U256::from(1_000_000_000_000_000u64));
    }

    #[test]
    fn malformed_price_is_an_error() {
        assert!(parse_ether("0.0.1").is_err());
        assert!(parse_ether("one ether").is_err());
    }
}
