use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    controller::{Render, Session},
    feedback::SegmentClass,
    session::Phase,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// A session as seen at one instant
pub struct SessionView<'a> {
    session: &'a Session,
    render: Render,
}

impl<'a> SessionView<'a> {
    pub fn new(session: &'a Session, now: Instant) -> Self {
        Self {
            session,
            render: session.render(now),
        }
    }
}

impl Widget for &SessionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let render = &self.render;

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let correct_style = Style::default().patch(bold_style).fg(Color::Blue);
        let incorrect_style = Style::default()
            .patch(bold_style)
            .fg(Color::Red)
            .add_modifier(Modifier::UNDERLINED);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let inner_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2 + 2).max(1);
        let reference_lines =
            (self.session.reference().width() as f64 / inner_width as f64).ceil() as u16;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Min(0),
                    Constraint::Length(reference_lines.max(1) + 2),
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Min(0),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(area);

        let spans = render
            .feedback
            .segments
            .iter()
            .map(|segment| {
                let style = match segment.class {
                    SegmentClass::CorrectWord => correct_style,
                    SegmentClass::IncorrectLetter => incorrect_style,
                    SegmentClass::Plain => dim_bold_style,
                };
                Span::styled(segment.text.clone(), style)
            })
            .collect::<Vec<Span>>();

        // red frame while a mistake flash is up
        let border_style = if render.highlight_active {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(format!(" {} ", render.display.level)),
            )
            .alignment(if reference_lines <= 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);

        let input_style = if render.input_enabled {
            bold_style
        } else {
            dim_bold_style
        };
        let mut input_spans = vec![Span::styled(self.session.buffer().to_string(), input_style)];
        if render.input_enabled {
            input_spans.push(Span::styled(
                "_",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        Paragraph::new(Line::from(input_spans))
            .block(Block::default().borders(Borders::ALL).title(" input "))
            .render(chunks[2], buf);

        Paragraph::new(Span::styled(
            format!(
                "{}s   {} wpm   {}% acc   {} mistakes   {}/{} words",
                render.display.time,
                render.display.wpm,
                render.display.accuracy,
                render.display.mistakes,
                render.metrics.correct_words,
                render.metrics.total_words
            ),
            bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        let legend = match self.session.phase() {
            Phase::Finished => "(r)etry / (tab) difficulty / (esc)ape",
            Phase::Idle => "start typing / (tab) difficulty / (esc)ape",
            Phase::Running => "(enter) finish / (ctrl+r) retry / (tab) difficulty / (esc)ape",
        };
        Paragraph::new(Span::styled(legend, italic_style)).render(chunks[5], buf);
    }
}
