pub mod leaderboard;
pub mod results;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    feedback::{CharMark, Mark},
    passages::PassageSource,
    runtime::Clock,
    session::SessionStatus,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const CURSOR: &str = "▏";

/// Group consecutive characters with the same mark into one span each.
pub fn highlight_spans(marks: &[CharMark]) -> Vec<Span<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    marks
        .iter()
        .chunk_by(|m| m.mark)
        .into_iter()
        .map(|(mark, group)| {
            let text: String = group.map(|m| m.char).collect();
            let style = match mark {
                Mark::Matched => bold_style.fg(Color::Green),
                Mark::Mismatched => bold_style
                    .fg(Color::Red)
                    .add_modifier(Modifier::UNDERLINED),
                Mark::Untyped => bold_style.add_modifier(Modifier::DIM),
            };
            Span::styled(text, style)
        })
        .collect()
}

pub fn status_legend(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Running => "(tab) next / (ctrl+r) reset / (esc) stop",
        SessionStatus::Idle => {
            "(enter) start / (tab) next / (l)evel / (d)uration / (r)eset / (q)uit"
        }
        SessionStatus::Finished => {
            "(enter) again / (tab) next / (l)evel / (d)uration / (r)eset / (s)tats / (q)uit"
        }
    }
}

impl<P: PassageSource, C: Clock> Widget for &App<P, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let engine = &self.engine;
        let state = engine.state();
        let live = engine.live_stats();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // settings
                Constraint::Length(1), // padding
                Constraint::Min(3),    // passage
                Constraint::Length(2), // input
                Constraint::Length(1), // live stats
                Constraint::Length(1), // legend
                Constraint::Length(1), // padding
                Constraint::Length(14), // leaderboard
            ])
            .split(area);

        let settings = Paragraph::new(Line::from(vec![
            Span::styled(format!("level {}", state.tier), bold_style),
            Span::raw("   "),
            Span::styled(format!("{}s", state.configured_duration), bold_style),
            Span::raw("   "),
            Span::styled(
                crate::session::display_name(engine.player_name()),
                italic_style,
            ),
        ]))
        .alignment(Alignment::Center);
        settings.render(chunks[0], buf);

        let passage_width = state.target_text.width();
        let passage = Paragraph::new(Line::from(highlight_spans(&engine.highlights())))
            .alignment(if passage_width <= chunks[2].width as usize {
                Alignment::Center
            } else {
                Alignment::Right
            })
            .wrap(Wrap { trim: true });
        passage.render(chunks[2], buf);

        let input_line = if state.status == SessionStatus::Running {
            Line::from(vec![
                Span::raw(state.typed_text.clone()),
                Span::styled(CURSOR, dim_style),
            ])
        } else {
            Line::from(Span::styled("press enter to start", dim_style))
        };
        Paragraph::new(input_line)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let stats = Paragraph::new(Span::styled(
            format!(
                "{}s left   {}% acc   {} cpm   {} passages",
                live.time_remaining, live.accuracy, live.cpm, live.passages
            ),
            bold_style,
        ))
        .alignment(Alignment::Center);
        stats.render(chunks[4], buf);

        Paragraph::new(Span::styled(status_legend(state.status), italic_style))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);

        leaderboard::LeaderboardView::new(&self.leaderboard).render(chunks[7], buf);

        if self.show_results {
            if let Some(summary) = engine.summary() {
                results::ResultsPopup::new(summary).render(area, buf);
            }
        }
    }
}
