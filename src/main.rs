mod api;
mod auth;
mod config;
mod models;
mod page;
mod ui;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::api::HttpApi;
use crate::auth::EnvAuth;
use crate::page::{ProjectsPage, Route};
use crate::ui::{
    create_modal::{handle_input as handle_modal_input, render_create_modal, CreateModalAction, CreateModalState},
    detail::{handle_input as handle_detail_input, render_detail},
    projects::{handle_input as handle_projects_input, render_projects, ProjectsAction, ProjectsViewState},
    spinner::render_loading,
};

#[derive(Parser)]
#[command(about = "Terminal dashboard for managing projects")]
struct Args {
    /// Override the API base URL from the environment
    #[arg(long)]
    api_base_url: Option<String>,
}

// Represents the current screen in the app
enum AppScreen {
    Projects,
    ProjectDetail(String), // Contains project id
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let args = Args::parse();
    let config = config::init()?;
    let base_url = args
        .api_base_url
        .unwrap_or_else(|| config.api_base_url().to_string());

    // Build the page collaborators
    let api = Arc::new(HttpApi::new(base_url));
    let auth = Arc::new(EnvAuth::new(&config));
    let mut page = ProjectsPage::new(api, auth);

    // Fetch the project list if a user identity is configured
    page.sync_identity().await;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main app loop
    let result = run_app(&mut terminal, &mut page).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Error: {}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, page: &mut ProjectsPage) -> Result<()> {
    let mut screen = AppScreen::Projects;
    let mut view = ProjectsViewState::new();
    let mut modal: Option<CreateModalState> = None;

    loop {
        // Render current screen
        terminal.draw(|f| match &screen {
            AppScreen::Projects => {
                if page.loading() {
                    // While a fetch is in flight only the indicator is shown
                    render_loading(f, "Loading projects...");
                } else {
                    render_projects(f, page, &mut view);
                    if page.show_create_modal() {
                        if let Some(state) = &modal {
                            render_create_modal(f, state, page.is_creating());
                        }
                    }
                }
            }
            AppScreen::ProjectDetail(id) => {
                let route = Route::ProjectDetail(id.clone());
                render_detail(f, &route.path(), page.find_project(id));
            }
        })?;

        // Handle input for current screen
        match screen {
            AppScreen::Projects if page.show_create_modal() => {
                let state = modal.get_or_insert_with(CreateModalState::new);
                match handle_modal_input(state)? {
                    Some(CreateModalAction::Cancel) => {
                        page.close_create_modal();
                        modal = None;
                    }
                    Some(CreateModalAction::Submit { name, description }) => {
                        page.handle_create_project(&name, &description).await;
                        // The modal stays open on failure so the input is kept
                        if !page.show_create_modal() {
                            modal = None;
                        }
                    }
                    None => {}
                }
            }
            AppScreen::Projects => match handle_projects_input(page, &mut view)? {
                Some(ProjectsAction::Quit) => break,
                Some(ProjectsAction::NewProject) => {
                    page.open_create_modal();
                    modal = Some(CreateModalState::new());
                }
                Some(ProjectsAction::DeleteProject(id)) => {
                    page.handle_delete_project(&id).await;
                }
                Some(ProjectsAction::OpenProject(id)) => {
                    let Route::ProjectDetail(project_id) = page.handle_project_click(&id);
                    screen = AppScreen::ProjectDetail(project_id);
                }
                None => {}
            },
            AppScreen::ProjectDetail(_) => {
                if handle_detail_input()? {
                    screen = AppScreen::Projects;
                }
            }
        }
    }

    Ok(())
}
