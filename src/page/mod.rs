use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, info};

use crate::api::{NewProject, ProjectsApi};
use crate::auth::AuthProvider;
use crate::models::Project;

/// Display preference for the projects screen. Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    List,
}

/// Severity of a transient notice shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient, non-blocking notification (the terminal rendition of a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.to_string(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.to_string(),
        }
    }
}

/// A navigation target produced by the page; the event loop owns the
/// actual screen switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ProjectDetail(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::ProjectDetail(id) => format!("projects/{id}"),
        }
    }
}

/// Pure filter over the project list: keeps projects whose name or
/// description contains the query, case-insensitively. Preserves order.
pub fn filter_projects<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let needle = query.to_lowercase();
    projects
        .iter()
        .filter(|project| {
            project.name.to_lowercase().contains(&needle)
                || project.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// State and behavior of the projects page.
///
/// Owns the in-memory project list and orchestrates the REST calls that
/// populate and mutate it. Collaborators are injected so tests can drive
/// the page with fakes.
pub struct ProjectsPage {
    api: Arc<dyn ProjectsApi>,
    auth: Arc<dyn AuthProvider>,

    // Data state
    projects: Vec<Project>,
    loading: bool,
    error: Option<String>,

    // UI state
    search_query: String,
    view_mode: ViewMode,

    // Modal state
    show_create_modal: bool,
    is_creating: bool,

    notices: Vec<Notice>,
    // Identity observed by the last sync_identity call
    seen_user: Option<String>,
    // Ids with a delete in flight; a repeat delete for one of these is ignored
    pending_deletes: HashSet<String>,
}

impl ProjectsPage {
    pub fn new(api: Arc<dyn ProjectsApi>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            api,
            auth,
            projects: Vec::new(),
            loading: false,
            error: None,
            search_query: String::new(),
            view_mode: ViewMode::Grid,
            show_create_modal: false,
            is_creating: false,
            notices: Vec::new(),
            seen_user: None,
            pending_deletes: HashSet::new(),
        }
    }

    /// Observe the auth provider's user identity and load the project list
    /// when an identifier becomes available, once per identity change.
    /// Without an identifier no fetch is issued and the list stays empty.
    pub async fn sync_identity(&mut self) {
        let current = self.auth.user_id();
        if current == self.seen_user {
            return;
        }
        self.seen_user = current.clone();
        if current.is_some() {
            self.load_projects().await;
        }
    }

    /// Fetch the project list and replace the in-memory copy wholesale.
    /// On failure the previous contents are left untouched.
    pub async fn load_projects(&mut self) {
        if self.loading {
            debug!("load already in flight, ignoring");
            return;
        }
        self.loading = true;

        match self.fetch_projects().await {
            Ok(projects) => {
                self.projects = projects;
            }
            Err(err) => {
                error!("failed to load projects: {err:#}");
                self.notices.push(Notice::error("Failed to load projects"));
            }
        }

        self.loading = false;
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>> {
        let token = self.auth.token().await?;
        let projects = self.api.list_projects(&token).await?;
        Ok(projects)
    }

    /// Create a project and prepend it to the list. The modal closes on
    /// success and stays open on failure so the input is not lost.
    pub async fn handle_create_project(&mut self, name: &str, description: &str) {
        if self.is_creating {
            debug!("create already in flight, ignoring");
            return;
        }
        self.error = None;
        self.is_creating = true;

        match self.create_remote(name, description).await {
            Ok(project) => {
                info!(id = %project.id, "project created");
                self.projects.insert(0, project);
                self.show_create_modal = false;
                self.notices
                    .push(Notice::success("Project created successfully!"));
            }
            Err(err) => {
                error!("failed to create project: {err:#}");
                self.notices.push(Notice::error("Failed to create project"));
            }
        }

        self.is_creating = false;
    }

    async fn create_remote(&self, name: &str, description: &str) -> Result<Project> {
        let token = self.auth.token().await?;
        let new = NewProject {
            name: name.to_string(),
            description: description.to_string(),
        };
        let project = self.api.create_project(&token, &new).await?;
        Ok(project)
    }

    /// Delete a project by id and drop it from the list once the server
    /// confirms. A repeat delete for an id already in flight is ignored.
    pub async fn handle_delete_project(&mut self, project_id: &str) {
        if !self.pending_deletes.insert(project_id.to_string()) {
            debug!(id = %project_id, "delete already in flight, ignoring");
            return;
        }
        self.error = None;

        match self.delete_remote(project_id).await {
            Ok(()) => {
                info!(id = %project_id, "project deleted");
                self.projects.retain(|project| project.id != project_id);
                self.notices
                    .push(Notice::success("Project deleted successfully!"));
            }
            Err(err) => {
                error!("failed to delete project: {err:#}");
                self.notices.push(Notice::error("Failed to delete project"));
            }
        }

        self.pending_deletes.remove(project_id);
    }

    async fn delete_remote(&self, project_id: &str) -> Result<()> {
        let token = self.auth.token().await?;
        self.api.delete_project(&token, project_id).await?;
        Ok(())
    }

    /// Navigation target for opening a project's detail view.
    pub fn handle_project_click(&self, project_id: &str) -> Route {
        Route::ProjectDetail(project_id.to_string())
    }

    pub fn open_create_modal(&mut self) {
        self.show_create_modal = true;
    }

    pub fn close_create_modal(&mut self) {
        self.show_create_modal = false;
    }

    /// The project list as filtered by the current search query.
    pub fn filtered(&self) -> Vec<&Project> {
        filter_projects(&self.projects, &self.search_query)
    }

    pub fn find_project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        };
    }

    pub fn show_create_modal(&self) -> bool {
        self.show_create_modal
    }

    pub fn is_creating(&self) -> bool {
        self.is_creating
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::auth::AuthError;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn project(id: &str, name: &str, description: &str) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            clerk_id: "user_1".to_string(),
        }
    }

    struct FakeAuth {
        user: Option<String>,
    }

    #[async_trait]
    impl AuthProvider for FakeAuth {
        fn user_id(&self) -> Option<String> {
            self.user.clone()
        }

        async fn token(&self) -> Result<String, AuthError> {
            Ok("test-token".to_string())
        }
    }

    struct FakeApi {
        store: Mutex<Vec<Project>>,
        fail: Mutex<bool>,
        next_ids: Mutex<Vec<String>>,
        list_calls: AtomicUsize,
    }

    impl FakeApi {
        fn with_projects(projects: Vec<Project>) -> Self {
            Self {
                store: Mutex::new(projects),
                fail: Mutex::new(false),
                next_ids: Mutex::new(Vec::new()),
                list_calls: AtomicUsize::new(0),
            }
        }

        fn empty() -> Self {
            Self::with_projects(Vec::new())
        }

        fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        fn queue_id(&self, id: &str) {
            self.next_ids.lock().unwrap().push(id.to_string());
        }

        fn server_error() -> ApiError {
            ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    #[async_trait]
    impl ProjectsApi for FakeApi {
        async fn list_projects(&self, _token: &str) -> Result<Vec<Project>, ApiError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if *self.fail.lock().unwrap() {
                return Err(Self::server_error());
            }
            Ok(self.store.lock().unwrap().clone())
        }

        async fn create_project(
            &self,
            _token: &str,
            new: &NewProject,
        ) -> Result<Project, ApiError> {
            if *self.fail.lock().unwrap() {
                return Err(Self::server_error());
            }
            let id = self
                .next_ids
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| format!("gen-{}", self.store.lock().unwrap().len() + 1));
            let created = project(&id, &new.name, &new.description);
            self.store.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn delete_project(&self, _token: &str, id: &str) -> Result<(), ApiError> {
            if *self.fail.lock().unwrap() {
                return Err(Self::server_error());
            }
            self.store.lock().unwrap().retain(|p| p.id != id);
            Ok(())
        }
    }

    fn page_with(api: Arc<FakeApi>, user: Option<&str>) -> ProjectsPage {
        let auth = Arc::new(FakeAuth {
            user: user.map(str::to_string),
        });
        ProjectsPage::new(api, auth)
    }

    #[test]
    fn filter_is_case_insensitive() {
        let projects = vec![project("1", "Apollo", "x")];
        assert_eq!(filter_projects(&projects, "apo").len(), 1);
        assert_eq!(filter_projects(&projects, "APO").len(), 1);
        assert_eq!(filter_projects(&projects, "zzz").len(), 0);
    }

    #[test]
    fn filter_matches_description_too() {
        let projects = vec![project("1", "Apollo", "moon lander")];
        let hits = filter_projects(&projects, "LANDER");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
    }

    #[test]
    fn filter_preserves_relative_order_and_is_idempotent() {
        let projects = vec![
            project("1", "alpha shared", "x"),
            project("2", "other", "y"),
            project("3", "beta shared", "z"),
        ];
        let first: Vec<&str> = filter_projects(&projects, "shared")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        let second: Vec<&str> = filter_projects(&projects, "shared")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(first, vec!["1", "3"]);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_query_matches_everything() {
        let projects = vec![project("1", "a", "b"), project("2", "c", "d")];
        assert_eq!(filter_projects(&projects, "").len(), 2);
    }

    #[tokio::test]
    async fn identity_triggers_one_load() {
        let api = Arc::new(FakeApi::with_projects(vec![project("1", "Apollo", "x")]));
        let mut page = page_with(api.clone(), Some("user_1"));

        page.sync_identity().await;
        page.sync_identity().await;

        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(page.projects().len(), 1);
        assert!(!page.loading());
    }

    #[tokio::test]
    async fn no_user_means_no_fetch() {
        let api = Arc::new(FakeApi::with_projects(vec![project("1", "Apollo", "x")]));
        let mut page = page_with(api.clone(), None);

        page.sync_identity().await;

        assert_eq!(api.list_calls.load(Ordering::SeqCst), 0);
        assert!(page.projects().is_empty());
        assert!(!page.loading());
    }

    #[tokio::test]
    async fn load_failure_keeps_previous_list() {
        let api = Arc::new(FakeApi::with_projects(vec![project("1", "Apollo", "x")]));
        let mut page = page_with(api.clone(), Some("user_1"));

        page.load_projects().await;
        assert_eq!(page.projects().len(), 1);

        api.set_fail(true);
        page.load_projects().await;

        assert_eq!(page.projects().len(), 1);
        assert!(!page.loading());
        let errors: Vec<&Notice> = page
            .notices()
            .iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Failed to load projects");
    }

    #[tokio::test]
    async fn create_prepends_and_closes_modal() {
        let api = Arc::new(FakeApi::with_projects(vec![project("1", "Old", "x")]));
        api.queue_id("2");
        let mut page = page_with(api, Some("user_1"));
        page.load_projects().await;
        page.open_create_modal();

        page.handle_create_project("New", "fresh").await;

        let ids: Vec<&str> = page.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert!(!page.show_create_modal());
        assert!(!page.is_creating());
        assert_eq!(
            page.latest_notice(),
            Some(&Notice {
                level: NoticeLevel::Success,
                message: "Project created successfully!".to_string()
            })
        );
    }

    #[tokio::test]
    async fn successive_creations_are_newest_first() {
        let api = Arc::new(FakeApi::empty());
        api.queue_id("c");
        api.queue_id("b");
        api.queue_id("a");
        let mut page = page_with(api, Some("user_1"));

        page.handle_create_project("first", "").await;
        page.handle_create_project("second", "").await;
        page.handle_create_project("third", "").await;

        let ids: Vec<&str> = page.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn create_failure_keeps_modal_open() {
        let api = Arc::new(FakeApi::empty());
        api.set_fail(true);
        let mut page = page_with(api, Some("user_1"));
        page.open_create_modal();

        page.handle_create_project("New", "fresh").await;

        assert!(page.projects().is_empty());
        assert!(page.show_create_modal());
        assert!(!page.is_creating());
        assert_eq!(
            page.latest_notice(),
            Some(&Notice {
                level: NoticeLevel::Error,
                message: "Failed to create project".to_string()
            })
        );
    }

    #[tokio::test]
    async fn delete_removes_exactly_the_matching_project() {
        let api = Arc::new(FakeApi::with_projects(vec![
            project("1", "Apollo", "x"),
            project("2", "Gemini", "y"),
        ]));
        let mut page = page_with(api, Some("user_1"));
        page.load_projects().await;

        page.handle_delete_project("1").await;

        let ids: Vec<&str> = page.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
        assert_eq!(
            page.latest_notice(),
            Some(&Notice {
                level: NoticeLevel::Success,
                message: "Project deleted successfully!".to_string()
            })
        );
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_a_noop_on_the_list() {
        let api = Arc::new(FakeApi::with_projects(vec![project("1", "Apollo", "x")]));
        let mut page = page_with(api, Some("user_1"));
        page.load_projects().await;

        page.handle_delete_project("missing").await;

        assert_eq!(page.projects().len(), 1);
    }

    #[tokio::test]
    async fn delete_failure_leaves_list_untouched() {
        let api = Arc::new(FakeApi::with_projects(vec![project("1", "Apollo", "x")]));
        let mut page = page_with(api.clone(), Some("user_1"));
        page.load_projects().await;
        api.set_fail(true);

        page.handle_delete_project("1").await;

        assert_eq!(page.projects().len(), 1);
        assert_eq!(
            page.latest_notice(),
            Some(&Notice {
                level: NoticeLevel::Error,
                message: "Failed to delete project".to_string()
            })
        );
    }

    #[test]
    fn click_yields_detail_route() {
        let api = Arc::new(FakeApi::empty());
        let page = page_with(api, Some("user_1"));
        let route = page.handle_project_click("42");
        assert_eq!(route, Route::ProjectDetail("42".to_string()));
        assert_eq!(route.path(), "projects/42");
    }

    #[test]
    fn view_mode_toggles_between_grid_and_list() {
        let api = Arc::new(FakeApi::empty());
        let mut page = page_with(api, Some("user_1"));
        assert_eq!(page.view_mode(), ViewMode::Grid);
        page.toggle_view_mode();
        assert_eq!(page.view_mode(), ViewMode::List);
        page.toggle_view_mode();
        assert_eq!(page.view_mode(), ViewMode::Grid);
    }
}
