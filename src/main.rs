mod app;
mod config;
mod core;
mod domain;
mod forms;
mod infrastructure;
mod ui;

use std::fs;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::Address;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::{App, InputMode, Tab};
use crate::core::{parse_command, Action, Command, NotifyLevel};
use crate::domain::lending::ActionKind;
use crate::forms::FormContext;
use crate::infrastructure::runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
use crate::infrastructure::wallet::{RpcTarget, WalletOptions};

#[derive(Debug, Parser)]
#[command(
    name = "pledge",
    version,
    about = "Pledge: a terminal client for on-chain credit lines"
)]
struct Args {
    /// HTTP JSON-RPC endpoint (e.g. http://localhost:8545)
    #[arg(long)]
    rpc: Option<String>,

    /// WebSocket endpoint (e.g. ws://localhost:8546)
    #[arg(long)]
    ws: Option<String>,

    /// Hex-encoded signing key; falls back to the PLEDGE_KEY env var
    #[arg(long)]
    key: Option<String>,

    /// Counterparty (DAO) address override
    #[arg(long)]
    dao: Option<String>,

    /// Approve signature prompts automatically (headless use)
    #[arg(long)]
    yes: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load();
    init_tracing();

    let signer = signer_from_args(&args)?;
    let counterparty = counterparty_from(&args, &config)?;
    let (endpoints, endpoint_labels) = endpoints_from_args_and_config(&args, &config)?;
    let options = WalletOptions {
        auto_approve: args.yes,
        confirm_timeout: Duration::from_secs(config.confirm_timeout_secs.unwrap_or(120)),
    };

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runtime = RuntimeBridge::new(endpoints, signer, options)?;
    let app = App::new(counterparty, config.tokens.clone(), endpoint_labels);

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &mut app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key, &runtime);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        match event {
            RuntimeEvent::Connected { endpoint, session } => {
                app.apply_connected(endpoint, session)
            }
            RuntimeEvent::Disconnected => app.apply_disconnected(),
            RuntimeEvent::SignaturePrompt { id, summary } => app.push_prompt(id, summary),
            RuntimeEvent::Lifecycle { kind, seq, event } => app.apply_lifecycle(kind, seq, event),
            RuntimeEvent::Error { message } => app.apply_error(message),
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, runtime: &RuntimeBridge) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.help_open = false;
        }
        return;
    }

    // The signature modal takes every key until answered.
    if app.front_prompt().is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => answer_prompt(app, runtime, true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                answer_prompt(app, runtime, false)
            }
            _ => {}
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key, runtime),
        InputMode::Command => handle_command_mode(app, key, runtime),
    }
}

fn answer_prompt(app: &mut App, runtime: &RuntimeBridge, approved: bool) {
    if let Some(prompt) = app.answer_prompt() {
        let _ = runtime.send(RuntimeCommand::Approve {
            id: prompt.id,
            approved,
        });
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent, runtime: &RuntimeBridge) {
    // An open token dropdown owns navigation keys.
    if app.session.connected && app.active_form().token_list_open {
        forward_to_form(app, key, runtime);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char(':') => app.enter_command(),
        KeyCode::Char('c') => {
            if app.session.connected {
                let _ = runtime.send(RuntimeCommand::Disconnect);
            } else {
                let _ = runtime.send(RuntimeCommand::Connect);
            }
        }
        KeyCode::Char('y') => copy_last_tx(app),
        KeyCode::Char('[') | KeyCode::Left => app.cycle_tab(false),
        KeyCode::Char(']') | KeyCode::Right => app.cycle_tab(true),
        KeyCode::Char('d') => app.set_tab(Tab::Deposit),
        KeyCode::Char('w') => app.set_tab(Tab::Withdraw),
        KeyCode::Char('b') => app.set_tab(Tab::Borrow),
        KeyCode::Char('r') => app.set_tab(Tab::Repay),
        _ => forward_to_form(app, key, runtime),
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent, runtime: &RuntimeBridge) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => apply_command(app, runtime),
        KeyCode::Backspace => {
            app.command.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.push(ch);
        }
        _ => {}
    }
}

fn apply_command(app: &mut App, runtime: &RuntimeBridge) {
    let input = app.command.clone();
    app.exit_command();

    match parse_command(&input) {
        Command::Collateral(args) => {
            let Some(raw) = args else {
                app.push_toast("Usage: :collateral <amount>".to_string(), NotifyLevel::Error);
                return;
            };
            let session = app.session.clone();
            let ctx = FormContext {
                session: &session,
                counterparty: app.counterparty,
                now_secs: now_secs(),
            };
            let action = app.form_mut(ActionKind::AddCollateral).submit_amount(raw, &ctx);
            apply_action(app, action, runtime);
        }
        Command::Connect => {
            let _ = runtime.send(RuntimeCommand::Connect);
        }
        Command::Disconnect => {
            let _ = runtime.send(RuntimeCommand::Disconnect);
        }
        Command::Endpoint(Some(index)) => {
            let _ = runtime.send(RuntimeCommand::SwitchEndpoint { index });
        }
        Command::Endpoint(None) => {
            let listing = app
                .endpoint_labels
                .iter()
                .enumerate()
                .map(|(i, label)| format!("{i}: {label}"))
                .collect::<Vec<_>>()
                .join("  ");
            app.push_toast(format!("Endpoints: {listing}"), NotifyLevel::Info);
        }
        Command::Unknown(cmd) => {
            app.push_toast(format!("Unknown command: {cmd}"), NotifyLevel::Error)
        }
    }
}

fn forward_to_form(app: &mut App, key: KeyEvent, runtime: &RuntimeBridge) {
    if !app.session.connected {
        // Placeholder is showing; there is no form to edit.
        return;
    }
    let session = app.session.clone();
    let ctx = FormContext {
        session: &session,
        counterparty: app.counterparty,
        now_secs: now_secs(),
    };
    let action = app.active_form_mut().handle_key(key, &ctx);
    apply_action(app, action, runtime);
}

fn apply_action(app: &mut App, action: Action, runtime: &RuntimeBridge) {
    match action {
        Action::None => {}
        Action::Notify(text, level) => app.push_toast(text, level),
        Action::Submit { kind, seq, request } => {
            tracing::info!(kind = kind.title(), amount = %request.raw_amount, "submitting action");
            if runtime
                .send(RuntimeCommand::Submit { kind, seq, request })
                .is_err()
            {
                app.form_mut(kind).abandon();
                app.push_toast("Runtime worker unavailable".to_string(), NotifyLevel::Error);
            }
        }
    }
}

fn copy_last_tx(app: &mut App) {
    use arboard::Clipboard;

    let Some(hash) = app.active_form().last_confirmed else {
        app.push_toast("Nothing to copy".to_string(), NotifyLevel::Info);
        return;
    };
    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(hash.to_string()).is_ok() {
                app.push_toast("Copied transaction hash".to_string(), NotifyLevel::Info);
            } else {
                app.push_toast("Failed to copy to clipboard".to_string(), NotifyLevel::Error);
            }
        }
        Err(_) => app.push_toast("Clipboard not available".to_string(), NotifyLevel::Error),
    }
}

fn endpoints_from_args_and_config(
    args: &Args,
    config: &config::Config,
) -> Result<(Vec<RpcTarget>, Vec<String>)> {
    use std::collections::BTreeSet;

    fn push_endpoint(
        endpoints: &mut Vec<RpcTarget>,
        labels: &mut Vec<String>,
        seen: &mut BTreeSet<String>,
        target: RpcTarget,
        name: Option<String>,
    ) {
        let display = target.display();
        let key = display.to_lowercase();
        if !seen.insert(key) {
            return;
        }
        let label = name
            .filter(|value| !value.trim().is_empty())
            .map(|name| format!("{name} ({display})"))
            .unwrap_or_else(|| display.clone());
        labels.push(label);
        endpoints.push(target);
    }

    let mut endpoints = Vec::new();
    let mut labels = Vec::new();
    let mut seen = BTreeSet::<String>::new();

    // CLI arguments take precedence
    if let Some(ws) = args.ws.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        push_endpoint(
            &mut endpoints,
            &mut labels,
            &mut seen,
            RpcTarget::WebSocket(ws.to_string()),
            Some("cli".to_string()),
        );
    } else if let Some(rpc) = args.rpc.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        push_endpoint(
            &mut endpoints,
            &mut labels,
            &mut seen,
            RpcTarget::Http(normalize_http_endpoint(rpc)),
            Some("cli".to_string()),
        );
    }

    // Config file endpoints
    for entry in &config.endpoints {
        let name = entry.name.clone().filter(|value| !value.trim().is_empty());
        if let Some(rpc) = entry.rpc.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            push_endpoint(
                &mut endpoints,
                &mut labels,
                &mut seen,
                RpcTarget::Http(normalize_http_endpoint(rpc)),
                name,
            );
            continue;
        }
        if let Some(ws) = entry.ws.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            push_endpoint(
                &mut endpoints,
                &mut labels,
                &mut seen,
                RpcTarget::WebSocket(ws.to_string()),
                name,
            );
        }
    }

    // Default fallback
    if endpoints.is_empty() {
        push_endpoint(
            &mut endpoints,
            &mut labels,
            &mut seen,
            RpcTarget::Http(normalize_http_endpoint("localhost:8545")),
            Some("local".to_string()),
        );
    }

    Ok((endpoints, labels))
}

fn normalize_http_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

fn signer_from_args(args: &Args) -> Result<PrivateKeySigner> {
    let key = args
        .key
        .clone()
        .or_else(|| std::env::var("PLEDGE_KEY").ok())
        .context("No signing key: pass --key or set PLEDGE_KEY")?;
    key.trim()
        .parse::<PrivateKeySigner>()
        .context("Invalid signing key")
}

fn counterparty_from(args: &Args, config: &config::Config) -> Result<Address> {
    let raw = args
        .dao
        .clone()
        .or_else(|| config.dao.clone())
        .unwrap_or_else(|| config::DEFAULT_DAO.to_string());
    raw.trim()
        .parse::<Address>()
        .with_context(|| format!("Invalid DAO address: {raw}"))
}

fn init_tracing() {
    let Some(path) = config::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = fs::File::create(&path) else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("PLEDGE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .try_init();
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
