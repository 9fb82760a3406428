use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(2),
        Constraint::Fill(1),
    ])
    .split(area);

    let content = vec![
        Line::from(Span::styled("DAILYQUIZ", Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from("Welcome to DailyQuiz!"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ENTER to start  ·  h for history  ·  q to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), chunks[1]);

    if let Some(notice) = app.notice() {
        let widget = Paragraph::new(notice)
            .alignment(Alignment::Center)
            .fg(Color::Red);
        frame.render_widget(widget, chunks[2]);
    }
}

pub fn render_loading(frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(1), Constraint::Fill(1)])
        .split(area);
    let widget = Paragraph::new("Loading questions...")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, chunks[1]);
}
