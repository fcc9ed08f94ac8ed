use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::Project;
use crate::page::{NoticeLevel, ProjectsPage, ViewMode};
use crate::ui::centered_rect;

// Represents the transient state of the projects screen
pub struct ProjectsViewState {
    selected: Option<usize>,
    list_state: ListState,
    table_state: TableState,
    search_mode: bool,
    show_delete_confirmation: bool,
}

impl ProjectsViewState {
    pub fn new() -> Self {
        Self {
            selected: None,
            list_state: ListState::default(),
            table_state: TableState::default(),
            search_mode: false,
            show_delete_confirmation: false,
        }
    }

    fn clamp_selection(&mut self, len: usize) {
        self.selected = match (self.selected, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), _) if i >= len => Some(len - 1),
            (sel, _) => sel,
        };
        self.list_state.select(self.selected);
        self.table_state.select(self.selected);
    }

    fn next(&mut self, len: usize) {
        if len == 0 {
            return;
        }

        let i = match self.selected {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }

        let i = match self.selected {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    fn selected_id(&self, page: &ProjectsPage) -> Option<String> {
        let filtered = page.filtered();
        self.selected
            .and_then(|i| filtered.get(i))
            .map(|p| p.id.clone())
    }
}

impl Default for ProjectsViewState {
    fn default() -> Self {
        Self::new()
    }
}

pub enum ProjectsAction {
    Quit,
    NewProject,
    DeleteProject(String), // Contains project id
    OpenProject(String),   // Contains project id
}

pub fn render_projects<B: Backend>(
    frame: &mut Frame<B>,
    page: &ProjectsPage,
    view: &mut ProjectsViewState,
) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    let filtered = page.filtered();
    view.clamp_selection(filtered.len());

    render_search_bar(frame, page, view, chunks[0]);

    match page.view_mode() {
        ViewMode::Grid => render_grid(frame, &filtered, view, chunks[1]),
        ViewMode::List => render_list(frame, &filtered, view, chunks[1]),
    }

    render_status_bar(frame, page, view, chunks[2]);

    if view.show_delete_confirmation {
        render_delete_confirmation(frame, size);
    }
}

fn render_search_bar<B: Backend>(
    frame: &mut Frame<B>,
    page: &ProjectsPage,
    view: &ProjectsViewState,
    area: Rect,
) {
    let (text, style) = if view.search_mode {
        (
            format!("{}|", page.search_query()),
            Style::default().fg(Color::Yellow),
        )
    } else if page.search_query().is_empty() {
        ("Press / to search".to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (page.search_query().to_string(), Style::default())
    };

    let search = Paragraph::new(text)
        .style(style)
        .block(Block::default().title("Search").borders(Borders::ALL));

    frame.render_widget(search, area);
}

fn render_grid<B: Backend>(
    frame: &mut Frame<B>,
    filtered: &[&Project],
    view: &mut ProjectsViewState,
    area: Rect,
) {
    let rows: Vec<Row> = filtered
        .iter()
        .map(|project| {
            Row::new(vec![
                Cell::from(project.name.clone()),
                Cell::from(project.description.clone()),
                Cell::from(project.created_at.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(45),
        Constraint::Percentage(25),
    ];
    let table = Table::new(rows)
        .header(
            Row::new(vec!["Name", "Description", "Created"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .widths(&widths)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut view.table_state);
}

fn render_list<B: Backend>(
    frame: &mut Frame<B>,
    filtered: &[&Project],
    view: &mut ProjectsViewState,
    area: Rect,
) {
    let items: Vec<ListItem> = filtered
        .iter()
        .map(|project| {
            ListItem::new(Spans::from(vec![
                Span::raw(project.name.clone()),
                Span::raw(" — "),
                Span::styled(
                    project.description.clone(),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(list, area, &mut view.list_state);
}

fn render_status_bar<B: Backend>(
    frame: &mut Frame<B>,
    page: &ProjectsPage,
    view: &ProjectsViewState,
    area: Rect,
) {
    // Error state first, then the latest notice, then the key hints.
    // The error field is part of the page contract but is not populated
    // by any current handler path.
    if let Some(err) = page.error() {
        let status = Paragraph::new(err.to_string())
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(status, area);
        return;
    }

    let (text, style) = match page.latest_notice() {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Success => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            (notice.message.clone(), Style::default().fg(color))
        }
        None => {
            let hints = if view.search_mode {
                "Type to filter | <Enter>/<Esc> Leave search".to_string()
            } else if view.selected.is_some() {
                "<N> New | <D> Delete | <Enter> Open | <V> Toggle view | </> Search | <Q> Quit"
                    .to_string()
            } else {
                "<N> New | <V> Toggle view | </> Search | <Q> Quit".to_string()
            };
            (hints, Style::default().fg(Color::White))
        }
    };

    let status = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::TOP));

    frame.render_widget(status, area);
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from("Are you sure you want to delete this project?"),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

pub fn handle_input(
    page: &mut ProjectsPage,
    view: &mut ProjectsViewState,
) -> Result<Option<ProjectsAction>> {
    if let Event::Key(key) = event::read()? {
        if view.search_mode {
            match key.code {
                KeyCode::Char(c) => {
                    let mut query = page.search_query().to_string();
                    query.push(c);
                    page.set_search_query(query);
                }
                KeyCode::Backspace => {
                    let mut query = page.search_query().to_string();
                    query.pop();
                    page.set_search_query(query);
                }
                KeyCode::Enter | KeyCode::Esc => {
                    view.search_mode = false;
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if view.show_delete_confirmation {
                    view.toggle_delete_confirmation();
                } else {
                    return Ok(Some(ProjectsAction::Quit));
                }
            }
            KeyCode::Char('/') => {
                if !view.show_delete_confirmation {
                    view.search_mode = true;
                }
            }
            KeyCode::Char('n') => {
                if view.show_delete_confirmation {
                    view.toggle_delete_confirmation();
                } else {
                    return Ok(Some(ProjectsAction::NewProject));
                }
            }
            KeyCode::Char('v') => {
                if !view.show_delete_confirmation {
                    page.toggle_view_mode();
                }
            }
            KeyCode::Char('d') => {
                if !view.show_delete_confirmation && view.selected_id(page).is_some() {
                    view.toggle_delete_confirmation();
                }
            }
            KeyCode::Char('y') => {
                if view.show_delete_confirmation {
                    if let Some(id) = view.selected_id(page) {
                        view.toggle_delete_confirmation();
                        return Ok(Some(ProjectsAction::DeleteProject(id)));
                    }
                }
            }
            KeyCode::Down => {
                if !view.show_delete_confirmation {
                    view.next(page.filtered().len());
                }
            }
            KeyCode::Up => {
                if !view.show_delete_confirmation {
                    view.previous(page.filtered().len());
                }
            }
            KeyCode::Enter => {
                if !view.show_delete_confirmation {
                    if let Some(id) = view.selected_id(page) {
                        return Ok(Some(ProjectsAction::OpenProject(id)));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(None)
}
