use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::QuestionResult;

use super::result::star_line;
use super::text::decode_entities;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let title = Paragraph::new("HISTORY")
        .alignment(Alignment::Center)
        .fg(Color::Cyan)
        .bold();
    frame.render_widget(title, chunks[0]);

    let entries = app.history_entries();
    if entries.is_empty() {
        let widget = Paragraph::new("You have not taken any quizzes yet.")
            .alignment(Alignment::Center)
            .fg(Color::Gray);
        frame.render_widget(widget, chunks[1]);
    } else {
        let mut lines: Vec<Line> = Vec::with_capacity(entries.len() * 2);
        for (index, entry) in entries.iter().enumerate() {
            let is_selected = index == app.history_cursor();
            let style = if is_selected {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if is_selected { ">" } else { " " };

            let mut spans = vec![
                Span::styled(format!(" {} ", marker), style),
                Span::styled(format!("{:<10}", entry.title), style),
                Span::styled(format!("{} {}  ", entry.date, entry.time), Style::default().fg(Color::DarkGray)),
            ];
            spans.extend(star_line(entry.stars()).spans);
            spans.push(Span::styled(
                format!("  {}/{}", entry.score, entry.total_questions),
                style,
            ));
            lines.push(Line::from(spans));
            lines.push(Line::from(""));
        }

        let visible = usize::from(chunks[1].height / 2).max(1);
        let offset = app.history_cursor().saturating_sub(visible - 1);
        let widget = Paragraph::new(lines).scroll(((offset * 2) as u16, 0));
        frame.render_widget(widget, chunks[1]);
    }

    if let Some(notice) = app.notice() {
        let widget = Paragraph::new(notice)
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(widget, chunks[2]);
    }

    let controls = Paragraph::new("j/k navigate  ·  enter details  ·  d delete  ·  esc back")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[3]);
}

pub fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
    let Some(entry) = app.selected_history_entry() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let mut score_line = vec![Span::styled(
        format!("{} of {}  ", entry.score, entry.total_questions),
        Style::default().bold(),
    )];
    score_line.extend(star_line(entry.stars()).spans);
    let header = vec![
        Line::from(Span::styled(entry.title.clone(), Style::default().fg(Color::Cyan).bold())),
        Line::from(Span::styled(
            format!("{} {}", entry.date, entry.time),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(score_line),
    ];
    frame.render_widget(Paragraph::new(header).alignment(Alignment::Center), chunks[0]);

    let mut lines: Vec<Line> = Vec::new();
    for (index, result) in entry.results.iter().enumerate() {
        lines.extend(result_lines(index, entry.results.len(), result));
    }
    let scroll = app.detail_scroll();
    let offset: usize = entry
        .results
        .iter()
        .take(scroll)
        .map(|r| r.all_answers.len() + 3)
        .sum();

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((offset as u16, 0))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, chunks[1]);

    let controls = Paragraph::new("j/k scroll  ·  esc back")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[2]);
}

fn result_lines(index: usize, total: usize, result: &QuestionResult) -> Vec<Line<'static>> {
    let (symbol, color) = if result.is_correct {
        ("+", Color::Green)
    } else {
        ("-", Color::Red)
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{} ", symbol), Style::default().fg(color).bold()),
            Span::styled(
                format!("Question {} of {}", index + 1, total),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(
            decode_entities(&result.question_text).into_owned(),
            Style::default().bold(),
        )),
    ];

    for answer in &result.all_answers {
        let style = if *answer == result.correct_answer {
            Style::default().fg(Color::Green)
        } else if *answer == result.selected_answer {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if *answer == result.selected_answer { "(x)" } else { "( )" };
        lines.push(Line::from(Span::styled(
            format!("  {} {}", marker, decode_entities(answer)),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines
}
