//! Alloy implementation of the wallet boundary
//!
//! Owns the filled provider (gas/nonce/chain-id fillers + local signer) and
//! maps transport outcomes onto the submission error taxonomy. Signature
//! approval is interactive: the wallet emits a prompt event and parks on the
//! approval gate until the UI thread answers.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::{Ethereum, EthereumWallet};
use alloy::providers::{
    fillers::{
        BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller,
    },
    Identity, Provider, ProviderBuilder, RootProvider,
};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy_dyn_abi::JsonAbiExt;
use alloy_primitives::B256;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::time::Instant;

use crate::domain::lending::ContractCall;
use crate::domain::session::Session;
use crate::domain::submit::{AcceptedTx, SubmitError, WalletBoundary};
use crate::infrastructure::runtime::RuntimeEvent;
use crate::infrastructure::wallet::ApprovalGate;

/// JSON-RPC endpoint the wallet signs against.
#[derive(Debug, Clone)]
pub enum RpcTarget {
    Http(String),
    WebSocket(String),
}

impl RpcTarget {
    pub fn display(&self) -> String {
        match self {
            RpcTarget::Http(url) => url.clone(),
            RpcTarget::WebSocket(url) => url.clone(),
        }
    }
}

/// Behavior knobs carried from the CLI.
#[derive(Debug, Clone)]
pub struct WalletOptions {
    /// Skip the interactive approval modal (headless / scripted use).
    pub auto_approve: bool,
    pub confirm_timeout: Duration,
}

impl Default for WalletOptions {
    fn default() -> Self {
        Self {
            auto_approve: false,
            confirm_timeout: Duration::from_secs(120),
        }
    }
}

type WalletFillProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider,
    Ethereum,
>;

pub struct AlloyWallet {
    provider: WalletFillProvider,
    endpoint: String,
    session: Session,
    approvals: Arc<ApprovalGate>,
    evt_tx: Sender<RuntimeEvent>,
    options: WalletOptions,
}

impl AlloyWallet {
    /// Connect to `target`, read the chain id, and bind the signer.
    pub async fn connect(
        target: RpcTarget,
        signer: PrivateKeySigner,
        approvals: Arc<ApprovalGate>,
        evt_tx: Sender<RuntimeEvent>,
        options: WalletOptions,
    ) -> Result<Self> {
        let address = signer.address();
        let wallet = EthereumWallet::from(signer);
        let endpoint = target.display();
        let provider: WalletFillProvider = match target {
            RpcTarget::Http(url) => {
                let rpc_url = url.parse().context("Invalid HTTP URL")?;
                ProviderBuilder::new().wallet(wallet).connect_http(rpc_url)
            }
            RpcTarget::WebSocket(url) => ProviderBuilder::new()
                .wallet(wallet)
                .connect(&url)
                .await
                .context("Failed to create WebSocket provider")?,
        };

        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to read chain id")?;

        Ok(Self {
            provider,
            endpoint,
            session: Session::connected(address, chain_id),
            approvals,
            evt_tx,
            options,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn approved_by_user(&self, call: &ContractCall) -> bool {
        if self.options.auto_approve {
            return true;
        }
        let (id, rx) = self.approvals.begin();
        let _ = self.evt_tx.send(RuntimeEvent::SignaturePrompt {
            id,
            summary: call.summary(),
        });
        rx.await.unwrap_or(false)
    }
}

#[async_trait]
impl WalletBoundary for AlloyWallet {
    async fn request_signature(&self, call: &ContractCall) -> Result<AcceptedTx, SubmitError> {
        if !self.approved_by_user(call).await {
            return Err(SubmitError::UserRejected);
        }

        let calldata = encode_call(call)?;
        let request = TransactionRequest::default()
            .to(call.to)
            .input(calldata.into());

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|err| SubmitError::NetworkError(format!("{err:#}")))?;

        Ok(AcceptedTx {
            tx_hash: *pending.tx_hash(),
            submitted_at: chrono::Utc::now().timestamp() as u64,
        })
    }

    async fn await_confirmation(&self, accepted: &AcceptedTx) -> Result<B256, SubmitError> {
        let deadline = Instant::now() + self.options.confirm_timeout;
        loop {
            match self.provider.get_transaction_receipt(accepted.tx_hash).await {
                Ok(Some(receipt)) => {
                    return if receipt.status() {
                        Ok(accepted.tx_hash)
                    } else {
                        Err(SubmitError::TransactionReverted(
                            "execution reverted".to_string(),
                        ))
                    };
                }
                Ok(None) => {}
                Err(err) => {
                    return Err(SubmitError::NetworkError(format!("{err:#}")));
                }
            }
            if Instant::now() >= deadline {
                return Err(SubmitError::NetworkError(
                    "confirmation timed out".to_string(),
                ));
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}

/// Selector + ABI-encoded arguments for the mapped entry point.
fn encode_call(call: &ContractCall) -> Result<Vec<u8>, SubmitError> {
    let function = alloy_json_abi::Function::parse(call.signature)
        .map_err(|err| SubmitError::NetworkError(format!("bad call signature: {err}")))?;
    function
        .abi_encode_input(&call.args)
        .map_err(|err| SubmitError::NetworkError(format!("abi encoding failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lending::{ActionKind, ActionRequest, TokenSelection};
    use alloy_primitives::{address, U256};

    #[test]
    fn encoded_call_starts_with_the_selector() {
        let request = ActionRequest::new(
            ActionKind::Deposit,
            TokenSelection::native("ETH"),
            "1",
            address!("00000000000000000000000000000000000000da"),
            0,
        );
        let call = request.contract_call(
            address!("00000000000000000000000000000000000000aa"),
            U256::from(1u64),
        );
        let encoded = encode_call(&call).unwrap();
        // selector + one 32-byte word
        assert_eq!(encoded.len(), 4 + 32);
        let expected = alloy_json_abi::Function::parse("deposit(uint256)")
            .unwrap()
            .selector();
        assert_eq!(&encoded[..4], expected.as_slice());
    }
}
