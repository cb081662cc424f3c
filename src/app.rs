//! Application state: tab controller, session snapshot, toasts, prompts

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use alloy_primitives::Address;

use crate::config::TokenSpec;
use crate::core::NotifyLevel;
use crate::domain::chain::{self, ChainProfile};
use crate::domain::lending::ActionKind;
use crate::domain::session::Session;
use crate::domain::submit::SubmitEvent;
use crate::forms::ActionForm;

/// Main tabs. AddCollateral is deliberately absent: the fifth action is
/// reachable through the command palette only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Deposit,
    Withdraw,
    Borrow,
    Repay,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Deposit, Tab::Withdraw, Tab::Borrow, Tab::Repay];

    pub fn title(&self) -> &'static str {
        self.kind().title()
    }

    pub fn shortcut(&self) -> char {
        match self {
            Tab::Deposit => 'd',
            Tab::Withdraw => 'w',
            Tab::Borrow => 'b',
            Tab::Repay => 'r',
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Tab::Deposit => ActionKind::Deposit,
            Tab::Withdraw => ActionKind::Withdraw,
            Tab::Borrow => ActionKind::Borrow,
            Tab::Repay => ActionKind::Repay,
        }
    }
}

/// Toasts auto-dismiss after this long.
pub const TOAST_TTL: Duration = Duration::from_secs(6);

#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    pub level: NotifyLevel,
    pub since: Instant,
}

#[derive(Debug, Clone)]
pub struct SignaturePrompt {
    pub id: u64,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

pub struct App {
    pub session: Session,
    pub endpoint: String,
    pub endpoint_labels: Vec<String>,
    pub active_tab: Tab,
    pub toasts: Vec<Toast>,
    pub prompts: VecDeque<SignaturePrompt>,
    pub input_mode: InputMode,
    pub command: String,
    pub counterparty: Address,
    pub extra_tokens: Vec<TokenSpec>,
    pub tick: u64,
    pub help_open: bool,
    pub should_quit: bool,
    forms: HashMap<ActionKind, ActionForm>,
}

impl App {
    pub fn new(
        counterparty: Address,
        extra_tokens: Vec<TokenSpec>,
        endpoint_labels: Vec<String>,
    ) -> Self {
        let mut forms = HashMap::new();
        for kind in ActionKind::ALL {
            let mut form = ActionForm::new(kind);
            form.refresh_tokens("ETH", &extra_tokens);
            forms.insert(kind, form);
        }
        Self {
            session: Session::disconnected(),
            endpoint: String::new(),
            endpoint_labels,
            active_tab: Tab::Deposit,
            toasts: Vec::new(),
            prompts: VecDeque::new(),
            input_mode: InputMode::Normal,
            command: String::new(),
            counterparty,
            extra_tokens,
            tick: 0,
            help_open: false,
            should_quit: false,
            forms,
        }
    }

    pub fn chain_profile(&self) -> &'static ChainProfile {
        chain::resolve(self.session.chain_id.unwrap_or(0))
    }

    pub fn form(&self, kind: ActionKind) -> &ActionForm {
        &self.forms[&kind]
    }

    pub fn form_mut(&mut self, kind: ActionKind) -> &mut ActionForm {
        self.forms.get_mut(&kind).expect("form for every kind")
    }

    pub fn active_form(&self) -> &ActionForm {
        self.form(self.active_tab.kind())
    }

    pub fn active_form_mut(&mut self) -> &mut ActionForm {
        self.form_mut(self.active_tab.kind())
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn cycle_tab(&mut self, forward: bool) {
        let position = Tab::ALL
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0);
        let next = if forward {
            (position + 1) % Tab::ALL.len()
        } else {
            (position + Tab::ALL.len() - 1) % Tab::ALL.len()
        };
        self.active_tab = Tab::ALL[next];
    }

    /// A fresh session arrived: every chain-derived value is re-resolved.
    pub fn apply_connected(&mut self, endpoint: String, session: Session) {
        self.endpoint = endpoint;
        self.session = session;
        let profile = self.chain_profile();
        let extras = self.extra_tokens.clone();
        for form in self.forms.values_mut() {
            form.refresh_tokens(profile.native_symbol, &extras);
        }
        self.push_toast(
            format!("Connected to {} ({})", profile.name, self.endpoint),
            NotifyLevel::Info,
        );
    }

    /// Session dropped. Forms abandon their in-flight submissions so late
    /// lifecycle events land nowhere; the selected tab is preserved so a
    /// reconnect resumes where the user left off.
    pub fn apply_disconnected(&mut self) {
        self.session = Session::disconnected();
        self.prompts.clear();
        for form in self.forms.values_mut() {
            form.abandon();
        }
        self.push_toast("Wallet disconnected".to_string(), NotifyLevel::Info);
    }

    pub fn apply_lifecycle(&mut self, kind: ActionKind, seq: u64, event: SubmitEvent) {
        if let Some((text, level)) = self.form_mut(kind).apply_event(seq, event) {
            self.push_toast(text, level);
        }
    }

    pub fn apply_error(&mut self, message: String) {
        self.push_toast(message, NotifyLevel::Error);
    }

    pub fn push_prompt(&mut self, id: u64, summary: String) {
        self.prompts.push_back(SignaturePrompt { id, summary });
    }

    pub fn front_prompt(&self) -> Option<&SignaturePrompt> {
        self.prompts.front()
    }

    pub fn answer_prompt(&mut self) -> Option<SignaturePrompt> {
        self.prompts.pop_front()
    }

    pub fn push_toast(&mut self, text: String, level: NotifyLevel) {
        self.toasts.push(Toast {
            text,
            level,
            since: Instant::now(),
        });
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.toasts.retain(|toast| toast.since.elapsed() < TOAST_TTL);
    }

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.clear();
    }
}
