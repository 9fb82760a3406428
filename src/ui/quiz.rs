use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::quiz::QuizSession;

use super::text::{clock, decode_entities};

const OPTION_LABELS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.session() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], session);
    render_timer(frame, chunks[1], session);
    render_question_text(frame, chunks[2], &session.current_question().text);
    render_options(frame, chunks[3], session, app.answer_cursor());
    render_controls(frame, chunks[4], session.state().revealed);
}

fn render_progress(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let state = session.state();
    let progress = format!("Question {} of {}", state.current_index + 1, state.total_questions);
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_timer(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let limit = session.countdown().duration_secs();
    let elapsed = limit.saturating_sub(session.state().time_remaining_secs);
    let ratio = if limit > 0 {
        f64::from(elapsed) / f64::from(limit)
    } else {
        1.0
    };

    let widget = Gauge::default()
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{} / {}", clock(elapsed), clock(limit)))
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::Black));
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(decode_entities(text).into_owned())
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold()
        .block(Block::default().padding(Padding::vertical(1)));
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, session: &QuizSession, cursor: usize) {
    let revealed = session.revealed_result();
    let mut lines: Vec<Line> = Vec::with_capacity(session.answers().len() * 2);

    for (index, option) in session.answers().iter().enumerate() {
        let is_cursor = index == cursor;
        let style = match revealed {
            Some(result) if *option == result.correct_answer => Style::default().fg(Color::Green).bold(),
            Some(result) if *option == result.selected_answer => Style::default().fg(Color::Red).bold(),
            Some(_) => Style::default().fg(Color::DarkGray),
            None if is_cursor => Style::default().fg(Color::Cyan).bold(),
            None => Style::default().fg(Color::Gray),
        };
        let marker = if is_cursor { ">" } else { " " };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(decode_entities(option).into_owned(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::vertical(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, revealed: bool) {
    let text = if revealed {
        "checking answer..."
    } else {
        "j/k navigate  ·  enter answer  ·  1-4 quick answer  ·  esc leave"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
