use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Project;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}")]
    Status { status: StatusCode },
}

/// Payload for creating a project.
#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
}

/// The four REST calls the projects page issues. A trait so the page
/// controller can be driven by an in-memory fake in tests.
#[async_trait]
pub trait ProjectsApi: Send + Sync {
    async fn list_projects(&self, token: &str) -> Result<Vec<Project>, ApiError>;
    async fn create_project(&self, token: &str, new: &NewProject) -> Result<Project, ApiError>;
    async fn delete_project(&self, token: &str, id: &str) -> Result<(), ApiError>;
}

// Envelope shapes the server wraps responses in
#[derive(Deserialize)]
struct ProjectListEnvelope {
    data: Vec<Project>,
}

#[derive(Deserialize)]
struct ProjectEnvelope {
    data: Project,
}

/// [`ProjectsApi`] implementation speaking JSON over HTTP.
pub struct HttpApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status { status })
    }
}

#[async_trait]
impl ProjectsApi for HttpApi {
    async fn list_projects(&self, token: &str) -> Result<Vec<Project>, ApiError> {
        let response = self
            .http
            .get(self.url("/api/projects"))
            .bearer_auth(token)
            .send()
            .await?;

        let envelope: ProjectListEnvelope = check_status(response)?.json().await?;
        Ok(envelope.data)
    }

    async fn create_project(&self, token: &str, new: &NewProject) -> Result<Project, ApiError> {
        let response = self
            .http
            .post(self.url("/api/projects"))
            .bearer_auth(token)
            .json(new)
            .send()
            .await?;

        let envelope: ProjectEnvelope = check_status(response)?.json().await?;
        Ok(envelope.data)
    }

    async fn delete_project(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/projects/{id}")))
            .bearer_auth(token)
            .send()
            .await?;

        // Response body is ignored; only the status matters
        check_status(response)?;
        Ok(())
    }
}
