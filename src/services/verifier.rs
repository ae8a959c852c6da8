use crate::{
    config::Config,
    services::{ChainClient, EthereumClient, ProofCache},
};
use async_trait::async_trait;
use ethers::{
    types::{Address, H256, U256},
    utils::to_checksum,
};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// Classification of a submitted payment receipt.
///
/// `Pending` means the transaction was not found or is not yet buried deep
/// enough; the client may retry with the same receipt. `Invalid` is
/// definitive and requires a new payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Accepted,
    Pending,
    Invalid,
}

impl VerifyOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, VerifyOutcome::Accepted)
    }
}

/// A strategy for deciding whether a receipt proves payment. The receipt is
/// an untrusted client-supplied JSON value; implementations must shape-check
/// it before anything else.
#[async_trait]
pub trait ReceiptVerifier: Send + Sync {
    async fn verify(&self, receipt: &Value) -> VerifyOutcome;
}

fn transaction_hash(receipt: &Value) -> Option<&str> {
    receipt.as_object()?.get("transactionHash")?.as_str()
}

/// Shape-only verifier for deployments without a ledger connection. Any
/// receipt carrying a `0x`-prefixed string `transactionHash` is accepted
/// and cached. It never checks amounts and never talks to a chain; it is a
/// deliberately weak stand-in, not a security boundary.
pub struct MockVerifier {
    cache: Arc<ProofCache>,
}

impl MockVerifier {
    pub fn new(cache: Arc<ProofCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl ReceiptVerifier for MockVerifier {
    async fn verify(&self, receipt: &Value) -> VerifyOutcome {
        let Some(tx_hash) = transaction_hash(receipt) else {
            tracing::info!("mock verification rejected receipt without transactionHash");
            return VerifyOutcome::Invalid;
        };
        if !tx_hash.starts_with("0x") {
            tracing::info!(tx_hash, "mock verification rejected hash without 0x prefix");
            return VerifyOutcome::Invalid;
        }
        if !self.cache.is_valid_and_fresh(tx_hash) {
            self.cache.record_accepted(tx_hash);
        }
        VerifyOutcome::Accepted
    }
}

/// Verifier that cross-checks the referenced transaction against the remote
/// ledger: it must exist, have succeeded, be confirmed deeply enough, and
/// have paid at least the required amount to the configured payee.
pub struct OnChainVerifier {
    chain: Arc<dyn ChainClient>,
    cache: Arc<ProofCache>,
    payee: Address,
    required_wei: U256,
    min_confirmations: u64,
}

impl OnChainVerifier {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        cache: Arc<ProofCache>,
        payee: Address,
        required_wei: U256,
        min_confirmations: u64,
    ) -> Self {
        Self {
            chain,
            cache,
            payee,
            required_wei,
            min_confirmations,
        }
    }
}

#[async_trait]
impl ReceiptVerifier for OnChainVerifier {
    async fn verify(&self, receipt: &Value) -> VerifyOutcome {
        let Some(raw_hash) = transaction_hash(receipt) else {
            tracing::info!("rejected receipt without a string transactionHash");
            return VerifyOutcome::Invalid;
        };

        // Anti-replay fast path: a hash accepted within the TTL window is
        // trusted again without touching the network.
        if self.cache.is_valid_and_fresh(raw_hash) {
            tracing::debug!(tx_hash = raw_hash, "proof cache hit");
            return VerifyOutcome::Accepted;
        }

        let Ok(tx_hash) = H256::from_str(raw_hash.trim_start_matches("0x")) else {
            tracing::info!(tx_hash = raw_hash, "rejected malformed transaction hash");
            return VerifyOutcome::Invalid;
        };

        if !self.chain.connectivity_check().await {
            tracing::error!("cannot reach RPC endpoint, rejecting payment proof");
            return VerifyOutcome::Invalid;
        }

        let execution = match self.chain.execution_receipt(tx_hash).await {
            Ok(Some(execution)) => execution,
            Ok(None) => {
                tracing::info!(?tx_hash, "transaction not found yet, payment pending");
                return VerifyOutcome::Pending;
            }
            Err(e) => {
                tracing::error!(?tx_hash, error = %e, "receipt lookup failed");
                return VerifyOutcome::Invalid;
            }
        };

        if !execution.succeeded {
            tracing::info!(?tx_hash, "transaction has non-success status");
            return VerifyOutcome::Invalid;
        }

        if self.min_confirmations > 0 {
            let latest = match self.chain.current_height().await {
                Ok(latest) => latest,
                Err(e) => {
                    tracing::error!(error = %e, "chain height lookup failed");
                    return VerifyOutcome::Invalid;
                }
            };
            // A receipt without a block height has zero confirmations.
            let confirmations = execution
                .block_height
                .map_or(0, |height| latest.saturating_sub(height));
            if confirmations < self.min_confirmations {
                tracing::info!(
                    ?tx_hash,
                    confirmations,
                    required = self.min_confirmations,
                    "transaction not confirmed deeply enough, payment pending"
                );
                return VerifyOutcome::Pending;
            }
        }

        let tx = match self.chain.transaction(tx_hash).await {
            Ok(Some(tx)) => tx,
            Ok(None) => {
                tracing::info!(?tx_hash, "transaction record not found, payment pending");
                return VerifyOutcome::Pending;
            }
            Err(e) => {
                tracing::error!(?tx_hash, error = %e, "transaction lookup failed");
                return VerifyOutcome::Invalid;
            }
        };

        let Some(recipient) = tx.to else {
            tracing::info!(?tx_hash, "transaction has no recipient address");
            return VerifyOutcome::Invalid;
        };

        if recipient != self.payee {
            tracing::info!(
                ?tx_hash,
                recipient = %to_checksum(&recipient, None),
                expected = %to_checksum(&self.payee, None),
                "transaction recipient does not match payee"
            );
            return VerifyOutcome::Invalid;
        }

        if tx.value < self.required_wei {
            tracing::info!(
                ?tx_hash,
                value = %tx.value,
                required = %self.required_wei,
                "transaction value below required price"
            );
            return VerifyOutcome::Invalid;
        }

        self.cache.record_accepted(raw_hash);
        tracing::info!(?tx_hash, "on-chain verification succeeded");
        VerifyOutcome::Accepted
    }
}

/// Entry point the request layer calls. The strategy is chosen once at
/// startup and fixed for the process lifetime; if on-chain mode is requested
/// but no usable chain client can be built, the gate downgrades to mock
/// verification and says so, instead of claiming guarantees it cannot back.
pub struct PaymentGate {
    verifier: Arc<dyn ReceiptVerifier>,
    onchain: bool,
}

impl PaymentGate {
    pub fn from_config(config: &Config, cache: Arc<ProofCache>) -> Self {
        if config.verify_onchain {
            match &config.rpc_url {
                Some(rpc_url) => match EthereumClient::connect(rpc_url, RPC_TIMEOUT) {
                    Ok(client) => {
                        return Self {
                            verifier: Arc::new(OnChainVerifier::new(
                                Arc::new(client),
                                cache,
                                config.payment_address,
                                config.price_wei,
                                config.min_confirmations,
                            )),
                            onchain: true,
                        };
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "VERIFY_ONCHAIN enabled but chain client unavailable, \
                             falling back to mock verification"
                        );
                    }
                },
                None => {
                    tracing::warn!(
                        "VERIFY_ONCHAIN enabled but RPC_URL is not set, \
                         falling back to mock verification"
                    );
                }
            }
        }
        Self {
            verifier: Arc::new(MockVerifier::new(cache)),
            onchain: false,
        }
    }

    pub async fn verify_payment(&self, receipt: &Value) -> VerifyOutcome {
        self.verifier.verify(receipt).await
    }

    /// The mode actually in effect, which may differ from the one requested.
    pub fn verifies_onchain(&self) -> bool {
        self.onchain
    }
}
