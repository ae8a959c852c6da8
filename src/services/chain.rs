use anyhow::Result;
use async_trait::async_trait;
use ethers::{
    prelude::*,
    providers::{Http, Provider},
    types::{Address, H256, U256},
};
use std::sync::Arc;
use std::time::Duration;

/// Execution outcome of a mined transaction, as reported by the ledger.
#[derive(Debug, Clone)]
pub struct ExecutionReceipt {
    pub succeeded: bool,
    pub block_height: Option<u64>,
}

/// The fields of a transaction the verifier cross-checks.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub to: Option<Address>,
    pub value: U256,
}

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(#[from] ethers::providers::ProviderError),
}

/// Read-only view of the remote ledger. `Ok(None)` from the lookups means
/// the transaction is not yet mined or indexed, which is a normal outcome,
/// not an error.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn connectivity_check(&self) -> bool;

    async fn execution_receipt(&self, tx_hash: H256)
        -> Result<Option<ExecutionReceipt>, ChainError>;

    async fn current_height(&self) -> Result<u64, ChainError>;

    async fn transaction(&self, tx_hash: H256) -> Result<Option<TransactionRecord>, ChainError>;
}

/// `ChainClient` backed by an ethers JSON-RPC provider over HTTP. All calls
/// share one reqwest client with a bounded timeout so a hung endpoint
/// resolves to an error instead of blocking the request forever.
pub struct EthereumClient {
    provider: Arc<Provider<Http>>,
}

impl EthereumClient {
    pub fn connect(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let url = reqwest::Url::parse(rpc_url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let provider = Arc::new(Provider::new(Http::new_with_client(url, client)));
        Ok(Self { provider })
    }
}

#[async_trait]
impl ChainClient for EthereumClient {
    async fn connectivity_check(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }

    async fn execution_receipt(
        &self,
        tx_hash: H256,
    ) -> Result<Option<ExecutionReceipt>, ChainError> {
        let receipt = self.provider.get_transaction_receipt(tx_hash).await?;
        Ok(receipt.map(|r| ExecutionReceipt {
            succeeded: r.status == Some(1.into()),
            block_height: r.block_number.map(|n| n.as_u64()),
        }))
    }

    async fn current_height(&self) -> Result<u64, ChainError> {
        Ok(self.provider.get_block_number().await?.as_u64())
    }

    async fn transaction(&self, tx_hash: H256) -> Result<Option<TransactionRecord>, ChainError> {
        let tx = self.provider.get_transaction(tx_hash).await?;
        Ok(tx.map(|t| TransactionRecord {
            to: t.to,
            value: t.value,
        }))
    }
}
