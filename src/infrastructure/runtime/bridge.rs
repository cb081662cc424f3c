//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The TUI thread never awaits anything: it sends commands over an mpsc
//! channel and drains events each frame. The worker thread owns the Tokio
//! runtime, the wallet connection, and every in-flight submission.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use alloy::signers::local::PrivateKeySigner;
use tokio::runtime::Runtime;

use crate::domain::lending::{ActionKind, ActionRequest};
use crate::domain::session::Session;
use crate::domain::submit::SubmitEvent;
use crate::infrastructure::runtime::worker::run_async_worker;
use crate::infrastructure::wallet::{RpcTarget, WalletOptions};

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// (Re)connect to the currently selected endpoint
    Connect,
    /// Switch to a different endpoint (chain switch path)
    SwitchEndpoint { index: usize },
    /// Drop the wallet connection
    Disconnect,
    /// Drive one action request through the submission lifecycle
    Submit {
        kind: ActionKind,
        seq: u64,
        request: ActionRequest,
    },
    /// Answer an outstanding signature prompt
    Approve { id: u64, approved: bool },
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Wallet connected; carries the fresh session snapshot
    Connected { endpoint: String, session: Session },
    /// Wallet disconnected (user action or endpoint switch)
    Disconnected,
    /// A submission wants a signature; answer with `Approve`
    SignaturePrompt { id: u64, summary: String },
    /// Lifecycle notification for one submission
    Lifecycle {
        kind: ActionKind,
        seq: u64,
        event: SubmitEvent,
    },
    /// Error outside any submission lifecycle
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Spawn the worker thread with its own Tokio runtime.
    pub fn new(
        endpoints: Vec<RpcTarget>,
        signer: PrivateKeySigner,
        options: WalletOptions,
    ) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        thread::spawn(move || {
            let rt = match Runtime::new() {
                Ok(rt) => rt,
                Err(err) => {
                    let _ = evt_tx.send(RuntimeEvent::Error {
                        message: format!("Failed to create Tokio runtime: {err}"),
                    });
                    return;
                }
            };
            rt.block_on(async {
                if let Err(err) =
                    run_async_worker(endpoints, signer, options, cmd_rx, evt_tx.clone()).await
                {
                    let _ = evt_tx.send(RuntimeEvent::Error {
                        message: format!("Worker exited: {err:#}"),
                    });
                }
            });
        });

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
