use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::Project;

/// Detail screen for a single project, reached by opening it from the list.
pub fn render_detail<B: Backend>(frame: &mut Frame<B>, route: &str, project: Option<&Project>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Min(5), Constraint::Length(3)].as_ref())
        .split(frame.size());

    let lines = match project {
        Some(project) => vec![
            Spans::from(vec![
                Span::styled("Name: ", Style::default().fg(Color::Yellow)),
                Span::raw(project.name.clone()),
            ]),
            Spans::from(vec![
                Span::styled("Description: ", Style::default().fg(Color::Yellow)),
                Span::raw(project.description.clone()),
            ]),
            Spans::from(vec![
                Span::styled("Created: ", Style::default().fg(Color::Yellow)),
                Span::raw(project.created_at.clone()),
            ]),
        ],
        None => vec![Spans::from("Project not found")],
    };

    let body = Paragraph::new(lines)
        .block(Block::default().title(route.to_string()).borders(Borders::ALL));
    frame.render_widget(body, chunks[0]);

    let help = Paragraph::new("<Esc> Back")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[1]);
}

/// Returns true when the user wants to go back to the projects screen.
pub fn handle_input() -> Result<bool> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => return Ok(true),
            _ => {}
        }
    }
    Ok(false)
}
