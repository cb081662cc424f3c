//! Transaction submission lifecycle
//!
//! Idle → Building → AwaitingSignature → Pending → {Confirmed, Failed}.
//! Terminal states fold back to Idle before the submitter accepts another
//! request. Everything long-latency happens behind the [`WalletBoundary`]
//! seam; the machine itself never blocks on anything local.

use alloy_primitives::B256;
use async_trait::async_trait;

use crate::domain::amount::{self, AmountError};
use crate::domain::chain;
use crate::domain::lending::{ActionRequest, ContractCall};
use crate::domain::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Building,
    AwaitingSignature,
    Pending,
    Confirmed,
    Failed,
}

/// Terminal failure reasons for one ActionRequest. None retry automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("wallet is not connected")]
    NotConnected,
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
    #[error("signature request rejected")]
    UserRejected,
    #[error("transaction reverted: {0}")]
    TransactionReverted(String),
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Lifecycle notifications, emitted strictly in transition order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitEvent {
    Pending { submitted_at: u64 },
    Confirmed { tx_hash: B256 },
    Failed { error: SubmitError },
}

/// A signed and broadcast transaction, not yet mined.
#[derive(Debug, Clone)]
pub struct AcceptedTx {
    pub tx_hash: B256,
    /// Unix seconds at signature acceptance.
    pub submitted_at: u64,
}

/// External wallet boundary: signature approval + broadcast, then the
/// confirmation wait. Both calls are long-latency and externally driven.
#[async_trait]
pub trait WalletBoundary: Send + Sync {
    /// Ask the user to approve and broadcast the call. Resolves once the
    /// transaction is accepted by the network, or fails with `UserRejected`
    /// or `NetworkError`.
    async fn request_signature(&self, call: &ContractCall) -> Result<AcceptedTx, SubmitError>;

    /// Wait for the transaction to be mined. Fails with
    /// `TransactionReverted` or `NetworkError`.
    async fn await_confirmation(&self, accepted: &AcceptedTx) -> Result<B256, SubmitError>;
}

/// Drives one ActionRequest at a time through the lifecycle. Exclusive
/// ownership (`&mut self`) is the concurrency guard: a submitter can never
/// hold two non-idle requests.
#[derive(Debug, Default)]
pub struct Submitter {
    phase: SubmitPhase,
}

impl Submitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// Run the full lifecycle for `request`.
    ///
    /// Emits `Pending` as soon as the signature is accepted (before the
    /// confirmation wait) and exactly one terminal event. The submitter is
    /// back at `Idle` when this returns, whatever the outcome.
    pub async fn submit<W>(
        &mut self,
        wallet: &W,
        session: &Session,
        request: &ActionRequest,
        notify: &mut (dyn FnMut(SubmitEvent) + Send),
    ) -> Result<B256, SubmitError>
    where
        W: WalletBoundary + ?Sized,
    {
        let outcome = self.run(wallet, session, request, notify).await;
        self.phase = SubmitPhase::Idle;
        outcome
    }

    async fn run<W>(
        &mut self,
        wallet: &W,
        session: &Session,
        request: &ActionRequest,
        notify: &mut (dyn FnMut(SubmitEvent) + Send),
    ) -> Result<B256, SubmitError>
    where
        W: WalletBoundary + ?Sized,
    {
        if !session.connected {
            // Precondition failure: no transition, no network call.
            let error = SubmitError::NotConnected;
            notify(SubmitEvent::Failed {
                error: error.clone(),
            });
            return Err(error);
        }

        self.phase = SubmitPhase::Building;
        let profile = chain::resolve(session.chain_id.unwrap_or(0));
        let units = match amount::encode(&request.raw_amount, request.token.decimals) {
            Ok(units) => units,
            Err(err) => return Err(self.fail(notify, SubmitError::InvalidAmount(err))),
        };
        if !profile.has_gate() {
            return Err(self.fail(
                notify,
                SubmitError::NetworkError(format!(
                    "no gate contract deployed on {}",
                    profile.name
                )),
            ));
        }
        let call = request.contract_call(profile.gate, units);

        self.phase = SubmitPhase::AwaitingSignature;
        let accepted = match wallet.request_signature(&call).await {
            Ok(accepted) => accepted,
            Err(err) => return Err(self.fail(notify, err)),
        };

        self.phase = SubmitPhase::Pending;
        notify(SubmitEvent::Pending {
            submitted_at: accepted.submitted_at,
        });

        match wallet.await_confirmation(&accepted).await {
            Ok(tx_hash) => {
                self.phase = SubmitPhase::Confirmed;
                notify(SubmitEvent::Confirmed { tx_hash });
                Ok(tx_hash)
            }
            Err(err) => Err(self.fail(notify, err)),
        }
    }

    fn fail(&mut self, notify: &mut (dyn FnMut(SubmitEvent) + Send), error: SubmitError) -> SubmitError {
        self.phase = SubmitPhase::Failed;
        notify(SubmitEvent::Failed {
            error: error.clone(),
        });
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lending::{ActionKind, TokenSelection};
    use alloy_primitives::{address, Address};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const MEMBER: Address = address!("00000000000000000000000000000000000000da");
    const HASH_BYTE: u8 = 0xab;

    struct MockWallet {
        sign_calls: AtomicUsize,
        confirm_calls: AtomicUsize,
        reject_signature: Option<SubmitError>,
        fail_confirmation: Option<SubmitError>,
    }

    impl MockWallet {
        fn accepting() -> Self {
            Self {
                sign_calls: AtomicUsize::new(0),
                confirm_calls: AtomicUsize::new(0),
                reject_signature: None,
                fail_confirmation: None,
            }
        }

        fn rejecting(error: SubmitError) -> Self {
            Self {
                reject_signature: Some(error),
                ..Self::accepting()
            }
        }

        fn failing_confirmation(error: SubmitError) -> Self {
            Self {
                fail_confirmation: Some(error),
                ..Self::accepting()
            }
        }
    }

    #[async_trait]
    impl WalletBoundary for MockWallet {
        async fn request_signature(
            &self,
            _call: &ContractCall,
        ) -> Result<AcceptedTx, SubmitError> {
            self.sign_calls.fetch_add(1, Ordering::SeqCst);
            match &self.reject_signature {
                Some(error) => Err(error.clone()),
                None => Ok(AcceptedTx {
                    tx_hash: B256::repeat_byte(HASH_BYTE),
                    submitted_at: 1_700_000_000,
                }),
            }
        }

        async fn await_confirmation(&self, accepted: &AcceptedTx) -> Result<B256, SubmitError> {
            self.confirm_calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_confirmation {
                Some(error) => Err(error.clone()),
                None => Ok(accepted.tx_hash),
            }
        }
    }

    fn fuji_session() -> Session {
        Session::connected(MEMBER, 43113)
    }

    fn request(kind: ActionKind, raw: &str) -> ActionRequest {
        ActionRequest::new(kind, TokenSelection::native("AVAX"), raw, MEMBER, 1_700_000_000)
    }

    async fn drive(
        wallet: &MockWallet,
        session: &Session,
        req: &ActionRequest,
    ) -> (Result<B256, SubmitError>, Vec<SubmitEvent>, Submitter) {
        let mut submitter = Submitter::new();
        let mut events = Vec::new();
        let outcome = submitter
            .submit(wallet, session, req, &mut |event| events.push(event))
            .await;
        (outcome, events, submitter)
    }

    #[tokio::test]
    async fn confirmed_flow_emits_pending_then_confirmed() {
        let wallet = MockWallet::accepting();
        let (outcome, events, submitter) =
            drive(&wallet, &fuji_session(), &request(ActionKind::Deposit, "10")).await;

        assert_eq!(outcome.unwrap(), B256::repeat_byte(HASH_BYTE));
        assert_eq!(
            events,
            vec![
                SubmitEvent::Pending {
                    submitted_at: 1_700_000_000
                },
                SubmitEvent::Confirmed {
                    tx_hash: B256::repeat_byte(HASH_BYTE)
                },
            ]
        );
        assert_eq!(submitter.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn disconnected_session_never_reaches_the_wallet() {
        let wallet = MockWallet::accepting();
        let (outcome, events, _) = drive(
            &wallet,
            &Session::disconnected(),
            &request(ActionKind::Deposit, "10"),
        )
        .await;

        assert_eq!(outcome, Err(SubmitError::NotConnected));
        assert_eq!(
            events,
            vec![SubmitEvent::Failed {
                error: SubmitError::NotConnected
            }]
        );
        assert_eq!(wallet.sign_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_amount_fails_before_any_network_call() {
        let wallet = MockWallet::accepting();
        for raw in ["", "abc", "-1", "0", "1.123456789012345678901"] {
            let (outcome, events, _) =
                drive(&wallet, &fuji_session(), &request(ActionKind::Repay, raw)).await;
            assert!(
                matches!(outcome, Err(SubmitError::InvalidAmount(_))),
                "raw input {raw:?}"
            );
            assert_eq!(events.len(), 1);
        }
        assert_eq!(wallet.sign_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn chain_without_gate_fails_in_building() {
        let wallet = MockWallet::accepting();
        let session = Session::connected(MEMBER, 1);
        let (outcome, _, _) = drive(&wallet, &session, &request(ActionKind::Deposit, "1")).await;

        assert!(matches!(outcome, Err(SubmitError::NetworkError(_))));
        assert_eq!(wallet.sign_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn user_rejection_is_terminal_without_pending() {
        let wallet = MockWallet::rejecting(SubmitError::UserRejected);
        let (outcome, events, submitter) =
            drive(&wallet, &fuji_session(), &request(ActionKind::Borrow, "2")).await;

        assert_eq!(outcome, Err(SubmitError::UserRejected));
        assert_eq!(
            events,
            vec![SubmitEvent::Failed {
                error: SubmitError::UserRejected
            }]
        );
        assert_eq!(wallet.confirm_calls.load(Ordering::SeqCst), 0);
        assert_eq!(submitter.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn revert_after_pending_emits_failed_last() {
        let error = SubmitError::TransactionReverted("out of reserve".to_string());
        let wallet = MockWallet::failing_confirmation(error.clone());
        let (outcome, events, _) =
            drive(&wallet, &fuji_session(), &request(ActionKind::Withdraw, "3")).await;

        assert_eq!(outcome, Err(error.clone()));
        assert_eq!(
            events,
            vec![
                SubmitEvent::Pending {
                    submitted_at: 1_700_000_000
                },
                SubmitEvent::Failed { error },
            ]
        );
    }

    #[tokio::test]
    async fn submitter_is_reusable_after_terminal_states() {
        let rejecting = MockWallet::rejecting(SubmitError::UserRejected);
        let accepting = MockWallet::accepting();
        let session = fuji_session();
        let mut submitter = Submitter::new();
        let mut sink = |_event: SubmitEvent| {};

        let first = submitter
            .submit(&rejecting, &session, &request(ActionKind::Deposit, "1"), &mut sink)
            .await;
        assert!(first.is_err());
        assert_eq!(submitter.phase(), SubmitPhase::Idle);

        let second = submitter
            .submit(&accepting, &session, &request(ActionKind::Deposit, "1"), &mut sink)
            .await;
        assert!(second.is_ok());
        assert_eq!(submitter.phase(), SubmitPhase::Idle);
    }
}
