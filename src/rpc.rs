use crate::error::{Result, StakingError};
use crate::transaction::{TransactionReceipt, TransactionRequest, TxHash};
use crate::wallet::Address;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Minimal Ethereum JSON-RPC client
#[derive(Debug, Clone)]
pub struct EthRpcClient {
    url: String,
    client: Client,
}

impl PartialEq for EthRpcClient {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl EthRpcClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one JSON-RPC request and return its `result`
    pub async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        log::debug!("RPC {} -> {}", method, self.url);

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StakingError::Network(format!(
                "{} returned HTTP {}",
                method,
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        parse_rpc_response(body)
    }

    /// `eth_call` against the latest block, returning the raw return data
    pub async fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>> {
        let params = json!([
            { "to": to.to_string(), "data": format!("0x{}", hex::encode(data)) },
            "latest"
        ]);
        let result = self.request("eth_call", params).await?;
        let text = result
            .as_str()
            .ok_or_else(|| StakingError::Decode(format!("eth_call result is not a string: {}", result)))?;
        decode_hex_data(text)
    }

    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash> {
        let result = self.request("eth_sendTransaction", json!([tx])).await?;
        let hash = result
            .as_str()
            .ok_or_else(|| StakingError::Decode(format!("unexpected transaction hash: {}", result)))?;
        Ok(TxHash::new(hash))
    }

    /// `None` until the transaction is mined
    pub async fn get_transaction_receipt(&self, hash: &TxHash) -> Result<Option<TransactionReceipt>> {
        let result = self
            .request("eth_getTransactionReceipt", json!([hash.as_str()]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(result)?))
    }

    pub async fn accounts(&self) -> Result<Vec<Address>> {
        let result = self.request("eth_accounts", json!([])).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Prompts the wallet for access where it supports that
    pub async fn request_accounts(&self) -> Result<Vec<Address>> {
        let result = self.request("eth_requestAccounts", json!([])).await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn chain_id(&self) -> Result<u64> {
        let result = self.request("eth_chainId", json!([])).await?;
        let text = result
            .as_str()
            .ok_or_else(|| StakingError::Decode(format!("unexpected chain id: {}", result)))?;
        parse_quantity(text).and_then(|v| {
            u64::try_from(v).map_err(|_| StakingError::Decode(format!("chain id out of range: {}", text)))
        })
    }
}

fn parse_rpc_response(body: Value) -> Result<Value> {
    let response: RpcResponse = serde_json::from_value(body)?;
    if let Some(error) = response.error {
        let message = match error.data {
            Some(Value::String(data)) => format!("{} ({})", error.message, data),
            _ => error.message,
        };
        return Err(StakingError::Rpc { code: error.code, message });
    }
    Ok(response.result.unwrap_or(Value::Null))
}

/// Decode `0x`-prefixed byte data
pub fn decode_hex_data(text: &str) -> Result<Vec<u8>> {
    let body = text.strip_prefix("0x").unwrap_or(text);
    Ok(hex::decode(body)?)
}

/// Decode a `0x`-prefixed hex quantity
pub fn parse_quantity(text: &str) -> Result<u128> {
    let body = text.strip_prefix("0x").unwrap_or(text);
    if body.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(body, 16).map_err(|e| StakingError::Decode(format!("bad quantity '{}': {}", text, e)))
}
