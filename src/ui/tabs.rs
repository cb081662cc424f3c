//! Tab bar and action form rendering

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs as RataTabs};
use ratatui::Frame;

use crate::app::{App, Tab};
use crate::domain::amount;
use crate::domain::lending::{ActionKind, BORROW_TERM_SECS};
use crate::ui::widgets::spinner;

/// Draw the tab bar above the form area
pub fn draw_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            Line::from(vec![
                Span::styled(
                    format!("{}:", tab.shortcut()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(tab.title()),
            ])
        })
        .collect();

    let selected = Tab::ALL
        .iter()
        .position(|tab| *tab == app.active_tab)
        .unwrap_or(0);

    let tabs = RataTabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    f.render_widget(tabs, area);
}

/// Draw the body: the active form, or the connect placeholder
pub fn draw_body(f: &mut Frame, area: Rect, app: &App) {
    if !app.session.connected {
        draw_placeholder(f, area);
        return;
    }
    draw_form(f, area, app);
}

fn draw_placeholder(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Connect wallet to continue",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "press c to connect",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(paragraph, area);
}

fn draw_form(f: &mut Frame, area: Rect, app: &App) {
    let form = app.active_form();
    let token = form.selected_token();

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Token  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} ▾", token.symbol),
                Style::default().fg(Color::White),
            ),
            Span::styled("   (t to change)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("  Amount ({})  ", token.symbol),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("{}█", form.input),
                Style::default().fg(Color::White),
            ),
        ]),
    ];

    // Echo the normalized amount once the input scales cleanly.
    if let Ok(units) = amount::encode(&form.input, token.decimals) {
        lines.push(Line::from(Span::styled(
            format!(
                "  = {} {}",
                amount::decode(units, token.decimals),
                token.symbol
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if form.kind == ActionKind::Borrow {
        let due = chrono::Utc::now().timestamp().max(0) as u64 + BORROW_TERM_SECS;
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Due date  ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_due(due)),
            Span::styled("  (3 week term)", Style::default().fg(Color::DarkGray)),
        ]));
    }

    lines.push(Line::from(""));
    if form.is_busy() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {} ", spinner::frame(app.tick)),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("{}… waiting for the network", form.kind.progressive()),
                Style::default().fg(Color::Cyan),
            ),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            "  Enter to submit · Esc to clear",
            Style::default().fg(Color::DarkGray),
        )));
    }

    if let Some(hash) = form.last_confirmed {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Last tx  ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{hash}"), Style::default().fg(Color::Green)),
            Span::styled("  (y to copy)", Style::default().fg(Color::DarkGray)),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", form.kind.title()));
    f.render_widget(Paragraph::new(lines).block(block), area);

    if form.token_list_open {
        draw_token_list(f, area, app);
    }
}

fn draw_token_list(f: &mut Frame, area: Rect, app: &App) {
    let form = app.active_form();
    let height = (form.tokens.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = Rect {
        x: area.x + 2,
        y: area.y + 2,
        width: 24.min(area.width.saturating_sub(4)),
        height,
    };

    let items: Vec<ListItem> = form
        .tokens
        .iter()
        .map(|token| ListItem::new(format!("{} ({} dec)", token.symbol, token.decimals)))
        .collect();
    let mut state = ListState::default();
    state.select(Some(form.token_cursor));

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Token "),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");

    f.render_widget(Clear, popup);
    f.render_stateful_widget(list, popup, &mut state);
}

fn format_due(due_secs: u64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp(due_secs as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| due_secs.to_string())
}
