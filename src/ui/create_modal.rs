use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::centered_rect;

pub enum CreateModalAction {
    Cancel,
    Submit { name: String, description: String },
}

#[derive(Clone, PartialEq, Copy)]
pub enum CreateField {
    Name,
    Description,
}

pub struct CreateModalState {
    pub name: String,
    pub description: String,
    pub current_field: CreateField,
    pub editing: bool,
}

impl CreateModalState {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            current_field: CreateField::Name,
            editing: false,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            CreateField::Name => CreateField::Description,
            CreateField::Description => CreateField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        // Two fields, so previous and next coincide
        self.next_field();
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field = match self.current_field {
            CreateField::Name => &mut self.name,
            CreateField::Description => &mut self.description,
        };

        match key {
            KeyCode::Char(c) => {
                field.push(c);
            }
            KeyCode::Backspace => {
                field.pop();
            }
            _ => {}
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }
}

impl Default for CreateModalState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_create_modal<B: Backend>(
    f: &mut Frame<B>,
    state: &CreateModalState,
    is_creating: bool,
) {
    let area = centered_rect(60, 50, f.size());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let outer = Block::default().title("New Project").borders(Borders::ALL);
    f.render_widget(outer, area);

    let title_text = if is_creating {
        "Creating project..."
    } else {
        "Create a new project"
    };

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let help_text = if is_creating {
        "Waiting for the server..."
    } else if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save project | Esc - Cancel"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &CreateModalState, area: Rect) {
    let field_names = ["Name", "Description"];
    let field_values = [state.name.clone(), state.description.clone()];

    let items: Vec<ListItem> = field_names
        .iter()
        .zip(field_values.iter())
        .enumerate()
        .map(|(i, (name, value))| {
            let content = if i == state.current_field as usize && state.editing {
                Spans::from(vec![
                    Span::styled(format!("{}: ", name), Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("{value}|"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                let style = if i == state.current_field as usize {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{}: ", name), style),
                    Span::raw(value.clone()),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Project Details"))
        .highlight_style(Style::default().fg(Color::Yellow));

    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut CreateModalState) -> Result<Option<CreateModalAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.toggle_editing();
                } else {
                    return Ok(Some(CreateModalAction::Cancel));
                }
            }
            KeyCode::Enter => {
                state.toggle_editing();
            }
            KeyCode::Up if !state.editing => {
                state.previous_field();
            }
            KeyCode::Down if !state.editing => {
                state.next_field();
            }
            KeyCode::Char('s') if !state.editing => {
                if state.is_valid() {
                    return Ok(Some(CreateModalAction::Submit {
                        name: state.name.clone(),
                        description: state.description.clone(),
                    }));
                }
            }
            _ if state.editing => {
                state.edit_current_field(key.code);
            }
            _ => {}
        }
    }

    Ok(None)
}
