use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::feed::{avatar_url, identicon, Identicon, Tweet};

const ICON_WIDTH: usize = 5;

pub fn draw_feed(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default().title(" feed ").borders(Borders::ALL);

    if app.session.account.is_none() {
        let help = vec![
            Line::from(""),
            Line::from(Span::styled(
                "chainfeed",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("An on-chain microblog in your terminal."),
            Line::from(""),
            Line::from("Press c to connect your wallet and load the feed."),
        ];
        let paragraph = Paragraph::new(help).alignment(Alignment::Center).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    if app.tweets.is_empty() {
        let text = if app.refreshing {
            "Loading feed..."
        } else {
            "No posts yet. Press n to write the first one."
        };
        let paragraph = Paragraph::new(text).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .tweets
        .iter()
        .map(|tweet| {
            post_card(
                tweet,
                app.pending_likes.contains(&tweet.id),
                width,
                &app.config.avatar_base_url,
            )
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// One post as a card: identicon column, author + time, the full
/// content block, then like count and the remote avatar URL.
fn post_card(
    tweet: &Tweet,
    like_pending: bool,
    width: usize,
    avatar_base: &str,
) -> ListItem<'static> {
    ListItem::new(post_card_lines(tweet, like_pending, width, avatar_base))
}

fn post_card_lines(
    tweet: &Tweet,
    like_pending: bool,
    width: usize,
    avatar_base: &str,
) -> Vec<Line<'static>> {
    let icon = identicon(&tweet.author);
    let (r, g, b) = icon.rgb;
    let icon_style = Style::default().fg(Color::Rgb(r, g, b));
    let icon_rows = identicon_rows(&icon);

    let mut lines = vec![Line::from(vec![
        Span::styled(icon_rows[0].clone(), icon_style),
        Span::raw(" "),
        Span::styled(
            tweet.author.shorten(),
            icon_style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", format_timestamp(tweet.timestamp)),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    // All wrapped content lines stay contiguous; only the first two sit
    // beside the identicon column.
    let body_width = width.saturating_sub(ICON_WIDTH + 1).max(10);
    let mut wrapped = textwrap::wrap(&tweet.content, body_width).into_iter();
    let first = wrapped.next().unwrap_or_default().into_owned();
    lines.push(Line::from(vec![
        Span::styled(icon_rows[1].clone(), icon_style),
        Span::raw(" "),
        Span::styled(first, Style::default().fg(Color::White)),
    ]));
    for cont in wrapped {
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(ICON_WIDTH + 1)),
            Span::styled(cont.into_owned(), Style::default().fg(Color::White)),
        ]));
    }

    let like_label = if like_pending {
        Span::styled("♥ liking...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            format!("♥ {}", tweet.likes),
            Style::default().fg(Color::Magenta),
        )
    };
    lines.push(Line::from(vec![
        Span::styled(icon_rows[2].clone(), icon_style),
        Span::raw(" "),
        like_label,
    ]));

    lines.push(Line::from(vec![
        Span::raw(" ".repeat(ICON_WIDTH + 1)),
        Span::styled(
            avatar_url(avatar_base, &tweet.author),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(""));

    lines
}

/// Squash the 5x5 identicon grid into three terminal rows using
/// half-block glyphs (two grid rows per terminal row).
fn identicon_rows(icon: &Identicon) -> [String; 3] {
    let mut rows: [String; 3] = Default::default();
    for (i, row) in rows.iter_mut().enumerate() {
        for col in 0..ICON_WIDTH {
            let top = icon.grid[i * 2][col];
            let bottom = if i * 2 + 1 < ICON_WIDTH {
                icon.grid[i * 2 + 1][col]
            } else {
                false
            };
            row.push(half_block(top, bottom));
        }
    }
    rows
}

fn half_block(top: bool, bottom: bool) -> char {
    match (top, bottom) {
        (true, true) => '█',
        (true, false) => '▀',
        (false, true) => '▄',
        (false, false) => ' ',
    }
}

fn format_timestamp(ts: u64) -> String {
    match chrono::DateTime::from_timestamp(ts as i64, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => ts.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Address;

    fn author() -> Address {
        Address::parse("0xa1b2c3d4e5f60718293a4b5c6d7e8f9012345678").unwrap()
    }

    fn long_post() -> Tweet {
        Tweet {
            id: 1,
            author: author(),
            content: "one two three four five six seven eight nine ten".to_string(),
            likes: 2,
            timestamp: 100,
        }
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_card_keeps_wrapped_content_before_like_footer() {
        // Narrow card so the content wraps into several lines.
        let lines = post_card_lines(&long_post(), false, 20, "https://a.example/svg");
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        let heart = texts.iter().position(|t| t.contains('♥')).unwrap();
        let last_content = texts.iter().rposition(|t| t.contains("ten")).unwrap();

        // One contiguous content block, then the footer.
        assert!(last_content < heart);
        for text in &texts[1..=last_content] {
            assert!(!text.trim().is_empty());
            assert!(!text.contains('♥'));
        }
    }

    #[test]
    fn test_card_carries_avatar_url_for_author() {
        let post = long_post();
        let lines = post_card_lines(&post, false, 80, "https://a.example/svg");
        let expected = avatar_url("https://a.example/svg", &post.author);

        assert!(lines.iter().any(|l| line_text(l).contains(&expected)));
    }

    #[test]
    fn test_card_shows_pending_like_marker() {
        let lines = post_card_lines(&long_post(), true, 80, "https://a.example/svg");
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        assert!(texts.iter().any(|t| t.contains("♥ liking...")));
        assert!(!texts.iter().any(|t| t.contains("♥ 2")));
    }

    #[test]
    fn test_half_block_glyphs() {
        assert_eq!(half_block(true, true), '█');
        assert_eq!(half_block(true, false), '▀');
        assert_eq!(half_block(false, true), '▄');
        assert_eq!(half_block(false, false), ' ');
    }

    #[test]
    fn test_identicon_rows_are_icon_width() {
        let addr = Address::parse("0xa1b2c3d4e5f60718293a4b5c6d7e8f9012345678").unwrap();
        let rows = identicon_rows(&identicon(&addr));
        for row in rows {
            assert_eq!(row.chars().count(), ICON_WIDTH);
        }
    }

    #[test]
    fn test_format_timestamp_epoch_seconds() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
        assert_eq!(format_timestamp(1700000000), "2023-11-14 22:13");
    }
}
