use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{stars, MAX_STARS};

pub fn render(frame: &mut Frame, area: Rect, app: &App, score: usize, total: usize) {
    let rating = stars(score, total);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], score, total, rating);
    render_message(frame, chunks[2], score, total, rating);
    if let Some(notice) = app.notice() {
        let widget = Paragraph::new(notice)
            .alignment(Alignment::Center)
            .fg(Color::Red);
        frame.render_widget(widget, chunks[3]);
    }
    render_controls(frame, chunks[4]);
}

pub fn star_line(rating: u8) -> Line<'static> {
    let filled = "★".repeat(rating as usize);
    let empty = "☆".repeat((MAX_STARS - rating.min(MAX_STARS)) as usize);
    Line::from(vec![
        Span::styled(filled, Style::default().fg(Color::Yellow)),
        Span::styled(empty, Style::default().fg(Color::DarkGray)),
    ])
}

fn render_score_summary(frame: &mut Frame, area: Rect, score: usize, total: usize, rating: u8) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled("RESULTS", Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        star_line(rating),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} of {}", score, total),
            Style::default().fg(grade_color(rating)).bold(),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn grade_color(rating: u8) -> Color {
    match rating {
        5 => Color::Green,
        3..=4 => Color::Cyan,
        2 => Color::Yellow,
        _ => Color::Red,
    }
}

fn message(rating: u8) -> (&'static str, &'static str) {
    match rating {
        5 => ("Perfect!", "You answered everything correctly. A brilliant result!"),
        4 => ("Almost perfect!", "Very close to flawless. One more step!"),
        3 => ("Good result!", "You are on the right track. Keep practicing!"),
        2 => ("Room to improve", "Don't be discouraged, try again!"),
        1 => ("Tough one?", "Just not your day. The next attempt will go better!"),
        _ => ("It happens!", "Don't give up. Start over and surprise yourself!"),
    }
}

fn render_message(frame: &mut Frame, area: Rect, score: usize, total: usize, rating: u8) {
    let (headline, body) = message(rating);
    let content = vec![
        Line::from(Span::styled(headline, Style::default().bold())),
        Line::from(format!("{}/{} - {}", score, total, body)),
    ];
    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("r start over  ·  h history  ·  esc menu  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
