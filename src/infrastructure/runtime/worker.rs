//! Async worker - runs in Tokio runtime and drives wallet operations
//!
//! One spawned task per submission keeps the command loop responsive while a
//! confirmation wait is outstanding; each form's submitter lives behind a
//! try-lock so a second request for the same form is refused instead of
//! queued.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use alloy::signers::local::PrivateKeySigner;
use anyhow::Result;
use tokio::sync::Mutex;

use crate::domain::lending::ActionKind;
use crate::domain::session::Session;
use crate::domain::submit::{SubmitError, SubmitEvent, Submitter};
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};
use crate::infrastructure::wallet::{AlloyWallet, ApprovalGate, RpcTarget, WalletOptions};

/// Run the async worker loop
pub async fn run_async_worker(
    endpoints: Vec<RpcTarget>,
    signer: PrivateKeySigner,
    options: WalletOptions,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    if endpoints.is_empty() {
        anyhow::bail!("No endpoints configured");
    }

    let approvals = Arc::new(ApprovalGate::new());
    let mut endpoint_index = 0usize;
    let mut wallet: Option<Arc<AlloyWallet>> = None;
    let mut session = Session::disconnected();
    let mut submitters: HashMap<ActionKind, Arc<Mutex<Submitter>>> = HashMap::new();

    // Connect to the first endpoint on startup; afterwards only on command.
    connect(
        &endpoints,
        endpoint_index,
        &signer,
        &options,
        &approvals,
        &evt_tx,
        &mut wallet,
        &mut session,
    )
    .await;

    loop {
        while let Ok(cmd) = cmd_rx.try_recv() {
            match cmd {
                RuntimeCommand::Shutdown => return Ok(()),

                RuntimeCommand::Connect => {
                    connect(
                        &endpoints,
                        endpoint_index,
                        &signer,
                        &options,
                        &approvals,
                        &evt_tx,
                        &mut wallet,
                        &mut session,
                    )
                    .await;
                }

                RuntimeCommand::SwitchEndpoint { index } => {
                    if index >= endpoints.len() {
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!(
                                "Invalid endpoint index {} ({} total)",
                                index,
                                endpoints.len()
                            ),
                        });
                        continue;
                    }
                    endpoint_index = index;
                    wallet = None;
                    session = Session::disconnected();
                    let _ = evt_tx.send(RuntimeEvent::Disconnected);
                    connect(
                        &endpoints,
                        endpoint_index,
                        &signer,
                        &options,
                        &approvals,
                        &evt_tx,
                        &mut wallet,
                        &mut session,
                    )
                    .await;
                }

                RuntimeCommand::Disconnect => {
                    // In-flight submissions keep their wallet handle; the
                    // transactions themselves are already irrevocable.
                    wallet = None;
                    session = Session::disconnected();
                    let _ = evt_tx.send(RuntimeEvent::Disconnected);
                }

                RuntimeCommand::Approve { id, approved } => {
                    approvals.resolve(id, approved);
                }

                RuntimeCommand::Submit { kind, seq, request } => {
                    let Some(wallet) = wallet.clone() else {
                        let _ = evt_tx.send(RuntimeEvent::Lifecycle {
                            kind,
                            seq,
                            event: SubmitEvent::Failed {
                                error: SubmitError::NotConnected,
                            },
                        });
                        continue;
                    };
                    let submitter = submitters
                        .entry(kind)
                        .or_insert_with(|| Arc::new(Mutex::new(Submitter::new())))
                        .clone();
                    let session = session.clone();
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let Ok(mut guard) = submitter.try_lock() else {
                            let _ = evt_tx.send(RuntimeEvent::Error {
                                message: format!(
                                    "{} already has a submission in flight",
                                    kind.title()
                                ),
                            });
                            return;
                        };
                        let mut notify = |event: SubmitEvent| {
                            let _ = evt_tx.send(RuntimeEvent::Lifecycle { kind, seq, event });
                        };
                        let outcome = guard
                            .submit(wallet.as_ref(), &session, &request, &mut notify)
                            .await;
                        match outcome {
                            Ok(tx_hash) => {
                                tracing::info!(kind = kind.title(), %tx_hash, "submission confirmed")
                            }
                            Err(error) => {
                                tracing::warn!(kind = kind.title(), %error, "submission failed")
                            }
                        }
                    });
                }
            }
        }

        // Small yield to prevent busy loop
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[allow(clippy::too_many_arguments)]
async fn connect(
    endpoints: &[RpcTarget],
    index: usize,
    signer: &PrivateKeySigner,
    options: &WalletOptions,
    approvals: &Arc<ApprovalGate>,
    evt_tx: &Sender<RuntimeEvent>,
    wallet: &mut Option<Arc<AlloyWallet>>,
    session: &mut Session,
) {
    let target = endpoints[index].clone();
    match AlloyWallet::connect(
        target.clone(),
        signer.clone(),
        Arc::clone(approvals),
        evt_tx.clone(),
        options.clone(),
    )
    .await
    {
        Ok(connected) => {
            *session = connected.session().clone();
            let endpoint = connected.endpoint().to_string();
            *wallet = Some(Arc::new(connected));
            tracing::info!(%endpoint, chain_id = ?session.chain_id, "wallet connected");
            let _ = evt_tx.send(RuntimeEvent::Connected {
                endpoint,
                session: session.clone(),
            });
        }
        Err(err) => {
            *wallet = None;
            *session = Session::disconnected();
            tracing::warn!(endpoint = %target.display(), "connection failed: {err:#}");
            let _ = evt_tx.send(RuntimeEvent::Error {
                message: format!("Connection failed ({}): {:#}", target.display(), err),
            });
        }
    }
}
