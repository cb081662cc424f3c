//! Wallet boundary implementation over Alloy

mod approval;
mod signer;

pub use approval::ApprovalGate;
pub use signer::{AlloyWallet, RpcTarget, WalletOptions};
