// src/balance.rs
use crate::error::{Result, StakingError};
use crate::wallet::Address;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;

/// Remote lookup of a wallet's balance in wei
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn wallet_balance(&self, address: &Address) -> Result<u128>;
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: BalanceValue,
}

/// The service sends either a decimal string or a bare JSON number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BalanceValue {
    Text(String),
    Number(serde_json::Number),
}

impl BalanceValue {
    fn to_wei(&self) -> Result<u128> {
        match self {
            BalanceValue::Text(text) => text
                .trim()
                .parse::<u128>()
                .map_err(|e| StakingError::Decode(format!("bad balance '{}': {}", text, e))),
            BalanceValue::Number(number) => {
                if let Some(v) = number.as_u64() {
                    return Ok(v as u128);
                }
                // Large integers arrive as floats
                match number.as_f64() {
                    Some(v) if v.is_finite() && v >= 0.0 => Ok(v as u128),
                    _ => Err(StakingError::Decode(format!("bad balance {}", number))),
                }
            }
        }
    }
}

/// Client for `GET <origin>/getwalletbalance?address=<address>`
#[derive(Debug, Clone)]
pub struct BalanceClient {
    base_url: String,
    http_client: HttpClient,
}

impl BalanceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: HttpClient::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/getwalletbalance", self.base_url)
    }
}

#[async_trait]
impl BalanceSource for BalanceClient {
    async fn wallet_balance(&self, address: &Address) -> Result<u128> {
        let response = self
            .http_client
            .get(self.endpoint())
            .query(&[("address", address.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StakingError::Network(format!(
                "balance service returned HTTP {}",
                response.status()
            )));
        }

        let body: BalanceResponse = response.json().await?;
        body.balance.to_wei()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<u128> {
        let response: BalanceResponse = serde_json::from_str(body)?;
        response.balance.to_wei()
    }

    #[test]
    fn test_string_balance() {
        assert_eq!(parse(r#"{"balance":"1000000000000000000"}"#).unwrap(), 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_numeric_balances() {
        assert_eq!(parse(r#"{"balance":42}"#).unwrap(), 42);
        assert_eq!(parse(r#"{"balance":5e19}"#).unwrap(), 50_000_000_000_000_000_000);
    }

    #[test]
    fn test_malformed_balances() {
        assert!(parse(r#"{"balance":"lots"}"#).is_err());
        assert!(parse(r#"{"balance":-1}"#).is_err());
        assert!(parse(r#"{"amount":"1"}"#).is_err());
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = BalanceClient::new("https://example.org/");
        assert_eq!(client.endpoint(), "https://example.org/getwalletbalance");
    }
}
