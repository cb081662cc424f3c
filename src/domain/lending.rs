//! Lending actions and their fixed contract-call mapping

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, U256};

/// Borrow term applied to every borrow at request-construction time.
pub const BORROW_TERM_SECS: u64 = 21 * 24 * 60 * 60;

/// The five actions the gate contract accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Deposit,
    Withdraw,
    Borrow,
    Repay,
    AddCollateral,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Deposit,
        ActionKind::Withdraw,
        ActionKind::Borrow,
        ActionKind::Repay,
        ActionKind::AddCollateral,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ActionKind::Deposit => "Deposit",
            ActionKind::Withdraw => "Withdraw",
            ActionKind::Borrow => "Borrow",
            ActionKind::Repay => "Repay",
            ActionKind::AddCollateral => "Add Collateral",
        }
    }

    /// Progressive verb for in-flight status lines ("Borrowing…").
    pub fn progressive(&self) -> &'static str {
        match self {
            ActionKind::Deposit => "Depositing",
            ActionKind::Withdraw => "Withdrawing",
            ActionKind::Borrow => "Borrowing",
            ActionKind::Repay => "Repaying",
            ActionKind::AddCollateral => "Adding collateral",
        }
    }
}

/// Token the user picked in a form. Only the symbol and its decimal scale
/// travel with the request; address resolution stays chain-derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSelection {
    pub symbol: String,
    pub decimals: u8,
}

impl TokenSelection {
    pub fn native(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            decimals: 18,
        }
    }
}

/// One user-initiated action, constructed fresh per submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub token: TokenSelection,
    pub raw_amount: String,
    pub counterparty: Address,
    /// Borrow only; fixed at construction, never recomputed on retry.
    pub due_timestamp: Option<u64>,
}

impl ActionRequest {
    pub fn new(
        kind: ActionKind,
        token: TokenSelection,
        raw_amount: impl Into<String>,
        counterparty: Address,
        now_secs: u64,
    ) -> Self {
        let due_timestamp =
            matches!(kind, ActionKind::Borrow).then(|| now_secs + BORROW_TERM_SECS);
        Self {
            kind,
            token,
            raw_amount: raw_amount.into(),
            counterparty,
            due_timestamp,
        }
    }

    /// Map this request onto the gate's entry point and ordered argument list.
    pub fn contract_call(&self, gate: Address, units: U256) -> ContractCall {
        let amount = DynSolValue::Uint(units, 256);
        let member = DynSolValue::Address(self.counterparty);
        let (signature, args) = match self.kind {
            ActionKind::Deposit => ("deposit(uint256)", vec![amount]),
            ActionKind::Withdraw => ("withdraw(uint256)", vec![amount]),
            ActionKind::Borrow => {
                let due = DynSolValue::Uint(U256::from(self.due_timestamp.unwrap_or(0)), 256);
                ("borrow(address,uint256,uint256)", vec![member, due, amount])
            }
            ActionKind::Repay => ("repay(uint256)", vec![amount]),
            ActionKind::AddCollateral => ("addCollateral(address,uint256)", vec![member, amount]),
        };
        ContractCall {
            to: gate,
            signature,
            args,
        }
    }
}

/// A fully-resolved call, ready for the wallet boundary to encode and send.
#[derive(Debug, Clone)]
pub struct ContractCall {
    pub to: Address,
    pub signature: &'static str,
    pub args: Vec<DynSolValue>,
}

impl ContractCall {
    pub fn entry_point(&self) -> &'static str {
        self.signature
            .split_once('(')
            .map(|(name, _)| name)
            .unwrap_or(self.signature)
    }

    /// Human-readable one-liner for the signature prompt.
    pub fn summary(&self) -> String {
        let args = self
            .args
            .iter()
            .map(display_arg)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({}) @ {}", self.entry_point(), args, short_address(&self.to))
    }
}

fn display_arg(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(addr) => short_address(addr),
        DynSolValue::Uint(v, _) => v.to_string(),
        other => format!("{other:?}"),
    }
}

fn short_address(addr: &Address) -> String {
    let hex = format!("{addr:#x}");
    format!("{}..{}", &hex[..6], &hex[hex.len() - 4..])
}
