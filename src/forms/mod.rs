//! Action forms: thin adapters between key input and the submitter
//!
//! A form owns UI-only state (amount text, token dropdown) plus the one
//! invariant that matters: at most one submission in flight, tracked by a
//! sequence number so stale lifecycle events can never reach a form that has
//! moved on.

use alloy_primitives::{Address, B256};
use crossterm::event::{KeyCode, KeyEvent};

use crate::config::TokenSpec;
use crate::core::{Action, NotifyLevel};
use crate::domain::lending::{ActionKind, ActionRequest, TokenSelection};
use crate::domain::session::Session;
use crate::domain::submit::SubmitEvent;

/// Read-only surroundings a form needs to build a request.
pub struct FormContext<'a> {
    pub session: &'a Session,
    pub counterparty: Address,
    pub now_secs: u64,
}

#[derive(Debug, Clone)]
pub struct TokenOption {
    pub symbol: String,
    pub decimals: u8,
}

pub struct ActionForm {
    pub kind: ActionKind,
    pub input: String,
    pub tokens: Vec<TokenOption>,
    pub token_index: usize,
    pub token_list_open: bool,
    pub token_cursor: usize,
    pub last_confirmed: Option<B256>,
    in_flight: Option<u64>,
    next_seq: u64,
}

impl ActionForm {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            input: String::new(),
            tokens: vec![TokenOption {
                symbol: "ETH".to_string(),
                decimals: 18,
            }],
            token_index: 0,
            token_list_open: false,
            token_cursor: 0,
            last_confirmed: None,
            in_flight: None,
            next_seq: 0,
        }
    }

    /// Rebuild the dropdown for the session chain's native currency. Called
    /// on every chain change; selection snaps back to the native token, as
    /// the default currency is chain-derived.
    pub fn refresh_tokens(&mut self, native_symbol: &str, extras: &[TokenSpec]) {
        self.tokens = std::iter::once(TokenOption {
            symbol: native_symbol.to_string(),
            decimals: 18,
        })
        .chain(extras.iter().map(|spec| TokenOption {
            symbol: spec.symbol.clone(),
            decimals: spec.decimals_or_default(),
        }))
        .collect();
        self.token_index = 0;
        self.token_cursor = 0;
        self.token_list_open = false;
    }

    pub fn selected_token(&self) -> TokenSelection {
        self.tokens
            .get(self.token_index)
            .map(|token| TokenSelection {
                symbol: token.symbol.clone(),
                decimals: token.decimals,
            })
            .unwrap_or_else(|| TokenSelection::native("ETH"))
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &FormContext) -> Action {
        if self.token_list_open {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.token_cursor = self.token_cursor.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.token_cursor + 1 < self.tokens.len() {
                        self.token_cursor += 1;
                    }
                }
                KeyCode::Enter => {
                    self.token_index = self.token_cursor;
                    self.token_list_open = false;
                }
                KeyCode::Esc | KeyCode::Char('t') => self.token_list_open = false,
                _ => {}
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                self.input.push(c);
                Action::None
            }
            KeyCode::Backspace => {
                self.input.pop();
                Action::None
            }
            KeyCode::Esc => {
                self.input.clear();
                Action::None
            }
            KeyCode::Char('t') => {
                self.token_cursor = self.token_index;
                self.token_list_open = true;
                Action::None
            }
            KeyCode::Enter => {
                let raw = self.input.clone();
                self.submit_amount(raw, ctx)
            }
            _ => Action::None,
        }
    }

    /// Validate presence/connection and hand the request off. Amount syntax
    /// itself is judged by the submitter before anything touches the network.
    pub fn submit_amount(&mut self, raw: String, ctx: &FormContext) -> Action {
        if self.in_flight.is_some() {
            return Action::Notify(
                format!("{} submission already in flight", self.kind.title()),
                NotifyLevel::Error,
            );
        }
        if !ctx.session.connected {
            return Action::Notify("Connect a wallet first".to_string(), NotifyLevel::Error);
        }
        if raw.trim().is_empty() {
            return Action::Notify("Enter an amount".to_string(), NotifyLevel::Error);
        }

        let request = ActionRequest::new(
            self.kind,
            self.selected_token(),
            raw,
            ctx.counterparty,
            ctx.now_secs,
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight = Some(seq);
        Action::Submit {
            kind: self.kind,
            seq,
            request,
        }
    }

    /// Fold a lifecycle event into form state; returns the toast to show.
    /// Events whose sequence does not match the current submission are stale
    /// (abandoned or superseded) and are dropped.
    pub fn apply_event(&mut self, seq: u64, event: SubmitEvent) -> Option<(String, NotifyLevel)> {
        if self.in_flight != Some(seq) {
            return None;
        }
        match event {
            SubmitEvent::Pending { .. } => Some((
                format!("{}… transaction pending", self.kind.progressive()),
                NotifyLevel::Info,
            )),
            SubmitEvent::Confirmed { tx_hash } => {
                self.in_flight = None;
                self.input.clear();
                self.last_confirmed = Some(tx_hash);
                Some((
                    format!("{} confirmed: {tx_hash}", self.kind.title()),
                    NotifyLevel::Success,
                ))
            }
            SubmitEvent::Failed { error } => {
                self.in_flight = None;
                Some((
                    format!("{} failed: {error}", self.kind.title()),
                    NotifyLevel::Error,
                ))
            }
        }
    }

    /// Stop listening for lifecycle events (disconnect / teardown). The
    /// on-chain transaction, if one was broadcast, is not cancelled.
    pub fn abandon(&mut self) {
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::submit::SubmitError;
    use alloy_primitives::address;

    const MEMBER: Address = address!("00000000000000000000000000000000000000da");

    fn ctx(session: &Session) -> FormContext<'_> {
        FormContext {
            session,
            counterparty: MEMBER,
            now_secs: 1_700_000_000,
        }
    }

    fn connected() -> Session {
        Session::connected(MEMBER, 43113)
    }

    #[test]
    fn submit_requires_connection() {
        let mut form = ActionForm::new(ActionKind::Deposit);
        let session = Session::disconnected();
        let action = form.submit_amount("10".to_string(), &ctx(&session));
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Error)));
        assert!(!form.is_busy());
    }

    #[test]
    fn submit_requires_an_amount() {
        let mut form = ActionForm::new(ActionKind::Repay);
        let session = connected();
        let action = form.submit_amount("   ".to_string(), &ctx(&session));
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Error)));
    }

    #[test]
    fn second_submission_is_refused_while_pending() {
        let mut form = ActionForm::new(ActionKind::Deposit);
        let session = connected();

        let first = form.submit_amount("10".to_string(), &ctx(&session));
        assert!(matches!(first, Action::Submit { seq: 0, .. }));
        assert!(form.is_busy());

        let second = form.submit_amount("20".to_string(), &ctx(&session));
        assert!(matches!(second, Action::Notify(_, NotifyLevel::Error)));
    }

    #[test]
    fn confirmed_event_clears_input_and_frees_the_form() {
        let mut form = ActionForm::new(ActionKind::Deposit);
        let session = connected();
        form.input = "10".to_string();
        let action = form.submit_amount("10".to_string(), &ctx(&session));
        assert!(matches!(action, Action::Submit { .. }));

        let pending = form.apply_event(0, SubmitEvent::Pending { submitted_at: 1 });
        assert!(matches!(pending, Some((_, NotifyLevel::Info))));
        assert!(form.is_busy());

        let hash = B256::repeat_byte(0xcd);
        let confirmed = form.apply_event(0, SubmitEvent::Confirmed { tx_hash: hash });
        assert!(matches!(confirmed, Some((_, NotifyLevel::Success))));
        assert!(!form.is_busy());
        assert!(form.input.is_empty());
        assert_eq!(form.last_confirmed, Some(hash));

        // Fresh submission accepted again, with a new sequence.
        let again = form.submit_amount("1".to_string(), &ctx(&session));
        assert!(matches!(again, Action::Submit { seq: 1, .. }));
    }

    #[test]
    fn stale_events_are_ignored_after_abandon() {
        let mut form = ActionForm::new(ActionKind::Borrow);
        let session = connected();
        form.submit_amount("2".to_string(), &ctx(&session));
        form.abandon();

        let late = form.apply_event(
            0,
            SubmitEvent::Confirmed {
                tx_hash: B256::repeat_byte(0x11),
            },
        );
        assert!(late.is_none());
        assert!(form.last_confirmed.is_none());
    }

    #[test]
    fn failed_event_frees_the_form_without_clearing_input() {
        let mut form = ActionForm::new(ActionKind::Withdraw);
        let session = connected();
        form.input = "3".to_string();
        form.submit_amount("3".to_string(), &ctx(&session));

        let failed = form.apply_event(
            0,
            SubmitEvent::Failed {
                error: SubmitError::UserRejected,
            },
        );
        assert!(matches!(failed, Some((_, NotifyLevel::Error))));
        assert!(!form.is_busy());
        assert_eq!(form.input, "3");
    }

    #[test]
    fn chain_switch_resets_token_selection_to_native() {
        let mut form = ActionForm::new(ActionKind::Deposit);
        let extras = vec![TokenSpec {
            symbol: "DAI".to_string(),
            decimals: Some(18),
        }];
        form.refresh_tokens("ETH", &extras);
        form.token_index = 1;
        assert_eq!(form.selected_token().symbol, "DAI");

        form.refresh_tokens("AVAX", &extras);
        assert_eq!(form.selected_token().symbol, "AVAX");
        assert_eq!(form.tokens.len(), 2);
    }
}
