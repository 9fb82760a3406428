mod history;
mod quiz;
mod result;
mod text;
mod welcome;

use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};

use crate::app::{App, Dialog};
use crate::models::AppState;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state {
        AppState::Welcome => welcome::render(frame, area, app),
        AppState::Loading => welcome::render_loading(frame, area),
        AppState::Quiz => quiz::render(frame, area, app),
        AppState::Result { score, total } => result::render(frame, area, app, score, total),
        AppState::History => history::render(frame, area, app),
        AppState::HistoryDetail => history::render_detail(frame, area, app),
    }

    if let Some(dialog) = app.dialog() {
        render_dialog(frame, area, dialog);
    }
}

fn render_dialog(frame: &mut Frame, area: Rect, dialog: Dialog) {
    let (title, body, controls) = match dialog {
        Dialog::TimeUp => (
            "Time is up!",
            "You did not finish the quiz in time. Try again!",
            "r start over  ·  q quit",
        ),
        Dialog::ConfirmExit => (
            "Leave the quiz?",
            "The result of the current quiz will not be saved.",
            "y yes  ·  n no",
        ),
    };

    let popup = centered(area, 48, 7);
    let content = vec![
        Line::from(Span::styled(title, Style::default().bold())),
        Line::from(""),
        Line::from(body),
        Line::from(""),
        Line::from(Span::styled(controls, Style::default().fg(Color::DarkGray))),
    ];
    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Color::Magenta),
        );

    frame.render_widget(Clear, popup);
    frame.render_widget(widget, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
