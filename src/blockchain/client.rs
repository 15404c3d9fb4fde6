//! Ledger RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Define the `LedgerClient` seam used by the reporter and executor
//! - Connect to a Solana JSON-RPC endpoint
//! - Bound every request with the configured timeout
//! - Classify client errors into `LedgerError`

use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::RpcError;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockReference, ConfirmationStatus, LedgerError, LedgerResult};
use crate::config::schema::{Commitment, RpcConfig};
use crate::config::validation::check_http_url;

/// Operations the workflow needs from a ledger node.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Balance of `address` in lamports.
    async fn get_balance(&self, address: &Pubkey, commitment: Commitment) -> LedgerResult<u64>;

    /// Latest blockhash and its last valid block height.
    async fn get_latest_blockhash(&self, commitment: Commitment) -> LedgerResult<BlockReference>;

    /// Submit a signed transaction. Returns its first signature.
    async fn send_transaction(&self, transaction: &Transaction) -> LedgerResult<Signature>;

    /// Current status of a submitted signature.
    async fn get_signature_status(
        &self,
        signature: &Signature,
        commitment: Commitment,
    ) -> LedgerResult<ConfirmationStatus>;

    /// Current block height.
    async fn get_block_height(&self, commitment: Commitment) -> LedgerResult<u64>;
}

/// `LedgerClient` backed by the Solana nonblocking RPC client.
pub struct RpcLedgerClient {
    rpc: RpcClient,
    config: RpcConfig,
    timeout_duration: Duration,
}

impl RpcLedgerClient {
    /// Create a client for the configured endpoint.
    ///
    /// No request is made here; an unreachable node surfaces on first use.
    pub fn new(config: &RpcConfig) -> LedgerResult<Self> {
        check_http_url("rpc.url", &config.url).map_err(|e| LedgerError::Network(e.to_string()))?;

        let timeout_duration = Duration::from_secs(config.timeout_secs);
        let rpc = RpcClient::new_with_timeout_and_commitment(
            config.url.clone(),
            timeout_duration,
            config.commitment.into(),
        );

        tracing::info!(
            rpc_url = %config.url,
            commitment = %config.commitment,
            timeout_secs = config.timeout_secs,
            "Ledger client initialized"
        );

        Ok(Self {
            rpc,
            config: config.clone(),
            timeout_duration,
        })
    }

    /// Check if the node is reachable and reports healthy.
    pub async fn is_healthy(&self) -> bool {
        self.call("getHealth", self.rpc.get_health(), classify_error)
            .await
            .is_ok()
    }

    async fn call<T, F>(
        &self,
        method: &'static str,
        fut: F,
        classify: fn(ClientError) -> LedgerError,
    ) -> LedgerResult<T>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                Err(classify(e))
            }
            Err(_) => {
                tracing::warn!(method, "RPC timeout");
                Err(LedgerError::Timeout(self.config.timeout_secs))
            }
        }
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn get_balance(&self, address: &Pubkey, commitment: Commitment) -> LedgerResult<u64> {
        let response = self
            .call(
                "getBalance",
                self.rpc.get_balance_with_commitment(address, commitment.into()),
                classify_error,
            )
            .await?;
        Ok(response.value)
    }

    async fn get_latest_blockhash(&self, commitment: Commitment) -> LedgerResult<BlockReference> {
        let (blockhash, last_valid_block_height) = self
            .call(
                "getLatestBlockhash",
                self.rpc.get_latest_blockhash_with_commitment(commitment.into()),
                classify_error,
            )
            .await?;
        Ok(BlockReference {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn send_transaction(&self, transaction: &Transaction) -> LedgerResult<Signature> {
        self.call(
            "sendTransaction",
            self.rpc.send_transaction(transaction),
            classify_submit_error,
        )
        .await
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
        commitment: Commitment,
    ) -> LedgerResult<ConfirmationStatus> {
        let status = self
            .call(
                "getSignatureStatuses",
                self.rpc
                    .get_signature_status_with_commitment(signature, commitment.into()),
                classify_error,
            )
            .await?;

        Ok(match status {
            None => ConfirmationStatus::Pending,
            Some(Ok(())) => ConfirmationStatus::Confirmed,
            Some(Err(e)) => ConfirmationStatus::Failed(e.to_string()),
        })
    }

    async fn get_block_height(&self, commitment: Commitment) -> LedgerResult<u64> {
        self.call(
            "getBlockHeight",
            self.rpc.get_block_height_with_commitment(commitment.into()),
            classify_error,
        )
        .await
    }
}

impl std::fmt::Debug for RpcLedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcLedgerClient")
            .field("rpc_url", &self.config.url)
            .field("commitment", &self.config.commitment)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}

/// Map a client error to the ledger error taxonomy.
fn classify_error(err: ClientError) -> LedgerError {
    match err.kind() {
        ClientErrorKind::TransactionError(e) => LedgerError::Transaction(e.to_string()),
        ClientErrorKind::SigningError(e) => LedgerError::Wallet(e.to_string()),
        _ => LedgerError::Network(err.to_string()),
    }
}

/// Like `classify_error`, but a JSON-RPC error response to `sendTransaction`
/// is a rejected transaction (preflight simulation failed).
fn classify_submit_error(err: ClientError) -> LedgerError {
    match err.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError { message, .. }) => {
            LedgerError::Transaction(message.clone())
        }
        _ => classify_error(err),
    }
}
