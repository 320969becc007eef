pub mod feed;
pub mod modal;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Mode, Notice};
use crate::feed::identicon;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_status(frame, chunks[0], app);
    feed::draw_feed(frame, chunks[1], app);
    draw_key_help(frame, chunks[2]);

    if app.mode == Mode::Compose {
        modal::draw_compose(frame, frame.area(), app);
    }
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" chainfeed ").borders(Borders::ALL);

    let mut spans: Vec<Span> = Vec::new();
    if app.connecting {
        spans.push(Span::styled(
            "connecting...",
            Style::default().fg(Color::Yellow),
        ));
    } else if let Some(account) = &app.session.account {
        let icon = identicon(account);
        let (r, g, b) = icon.rgb;
        spans.push(Span::styled("██ ", Style::default().fg(Color::Rgb(r, g, b))));
        spans.push(Span::styled(
            account.shorten(),
            Style::default().fg(Color::Green),
        ));
    } else {
        spans.push(Span::styled(
            "disconnected - press c to connect",
            Style::default().fg(Color::DarkGray),
        ));
    }

    if app.refreshing {
        spans.push(Span::styled(
            "  refreshing...",
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(notice) = &app.notice {
        let (text, color) = match notice {
            Notice::Info(msg) => (msg, Color::Gray),
            Notice::Error(msg) => (msg, Color::Red),
        };
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(text.clone(), Style::default().fg(color)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_key_help(frame: &mut Frame, area: Rect) {
    let help = Line::from(Span::styled(
        " q quit | c connect | n post | l like | r refresh | j/k move",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(help), area);
}

/// Centered sub-rect used for modal overlays, sized in percent of the
/// surrounding area.
pub(crate) fn center_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
