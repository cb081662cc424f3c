use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod tabs;
pub mod widgets;

use crate::app::{App, InputMode};
use crate::core::NotifyLevel;

pub fn draw(f: &mut Frame, app: &mut App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    tabs::draw_tab_bar(f, areas.tab_bar, app);
    tabs::draw_body(f, areas.body, app);
    draw_command_line(f, areas.command_line, app);
    draw_toasts(f, areas.size, app);

    if let Some(prompt) = app.front_prompt() {
        draw_signature_prompt(f, areas.size, &prompt.summary);
    }
    if app.help_open {
        draw_help_popup(f, areas.size);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let profile = app.chain_profile();
    let status_color = if app.session.connected {
        Color::Green
    } else {
        Color::Red
    };
    let account = app
        .session
        .address
        .map(|addr| {
            let hex = format!("{addr:#x}");
            format!("{}..{}", &hex[..6], &hex[hex.len() - 4..])
        })
        .unwrap_or_else(|| "--".to_string());
    let endpoint = if app.endpoint.is_empty() {
        "not connected".to_string()
    } else {
        app.endpoint.clone()
    };

    let content = Line::from(vec![
        Span::styled("●", Style::default().fg(status_color)),
        Span::raw(" "),
        Span::styled(profile.name, Style::default().fg(Color::White)),
        Span::raw(" · "),
        Span::styled(profile.native_symbol, Style::default().fg(Color::Cyan)),
        Span::raw("   "),
        Span::styled("account ", Style::default().fg(Color::DarkGray)),
        Span::raw(account),
        Span::raw("   "),
        Span::styled("@ ", Style::default().fg(Color::DarkGray)),
        Span::styled(endpoint, Style::default().fg(Color::Cyan)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" pledge ");
    f.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.input_mode {
        InputMode::Command => Line::from(vec![
            Span::styled(":", Style::default().fg(Color::Yellow)),
            Span::raw(app.command.clone()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]),
        InputMode::Normal => Line::from(Span::styled(
            " d/w/b/r tabs · [ ] cycle · t token · c connect · : command · ? help · q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_toasts(f: &mut Frame, size: Rect, app: &App) {
    let width = 46.min(size.width.saturating_sub(2));
    if width < 10 {
        return;
    }
    for (i, toast) in app.toasts.iter().rev().take(4).enumerate() {
        let height = 3u16;
        let y = size.y + 1 + i as u16 * height;
        if y + height > size.y + size.height {
            break;
        }
        let popup = Rect {
            x: size.x + size.width - width - 1,
            y,
            width,
            height,
        };
        let (color, title) = match toast.level {
            NotifyLevel::Info => (Color::Cyan, " info "),
            NotifyLevel::Success => (Color::Green, " ok "),
            NotifyLevel::Error => (Color::Red, " error "),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title);
        let paragraph = Paragraph::new(toast.text.clone())
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(Clear, popup);
        f.render_widget(paragraph, popup);
    }
}

fn draw_signature_prompt(f: &mut Frame, size: Rect, summary: &str) {
    let popup = centered_rect(size, 64, 7);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            summary.to_string(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" approve   "),
            Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" reject"),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Sign transaction? ");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn draw_help_popup(f: &mut Frame, size: Rect) {
    let popup = centered_rect(size, 56, 14);
    let lines = vec![
        Line::from(Span::styled(
            " Keys",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        help_line("d w b r", "jump to Deposit / Withdraw / Borrow / Repay"),
        help_line("[ ]", "cycle tabs"),
        help_line("0-9 .", "edit amount"),
        help_line("t", "token dropdown"),
        help_line("Enter", "submit the form"),
        help_line("Esc", "clear input / close popup"),
        help_line("c", "connect or disconnect the wallet"),
        help_line("y", "copy last confirmed tx hash"),
        help_line(":", "command palette (:collateral <amount>, :endpoint <n>)"),
        help_line("q", "quit"),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Help ");
    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn help_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<8}"), Style::default().fg(Color::Yellow)),
        Span::raw(description.to_string()),
    ])
}

fn centered_rect(size: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(size.width);
    let height = height.min(size.height);
    Rect {
        x: size.x + (size.width.saturating_sub(width)) / 2,
        y: size.y + (size.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
