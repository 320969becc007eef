use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::center_rect;

pub fn draw_compose(frame: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let modal_area = center_rect(60, 30, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" New post ");

    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let counter = format!(
        "{}/{}",
        app.compose_text.chars().count(),
        app.config.max_post_length
    );
    let footer = if app.submitting {
        Span::styled("posting...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            "Enter to post | Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )
    };

    let text = vec![
        Line::from(""),
        Line::from(app.compose_text.clone()),
        Line::from(""),
        Line::from(Span::styled(counter, Style::default().fg(Color::DarkGray))),
        Line::from(footer),
    ];

    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}
