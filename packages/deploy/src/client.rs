use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sitewright_files::ProjectFile;
use thiserror::Error;
use tracing::info;

/// Deploy operation errors
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Deployment failed: {0}")]
    Endpoint(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type DeployResult<T> = Result<T, DeployError>;

/// Request body for the external deploy endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub project_id: String,
    pub files: Vec<ProjectFile>,
    pub name: String,
}

/// Response body from the external deploy endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResponse {
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A previously saved project as returned by the project-load endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LoadedProject {
    pub name: String,
    pub files: Vec<ProjectFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectResponse {
    pub project: LoadedProject,
}

/// Client for the external deploy and project-load endpoints
#[derive(Clone)]
pub struct DeployClient {
    http_client: Client,
    base_url: String,
}

impl DeployClient {
    /// Create a new deploy client against the given API base URL
    pub fn new(base_url: impl Into<String>) -> DeployResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DeployError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Ship the current file set to the deploy endpoint.
    ///
    /// One request, one response: the hosted URL on success, the endpoint's
    /// error message otherwise. No retries.
    pub async fn deploy(
        &self,
        project_id: &str,
        name: &str,
        files: &[ProjectFile],
    ) -> DeployResult<String> {
        let url = format!("{}/api/deploy", self.base_url);
        let request = DeployRequest {
            project_id: project_id.to_string(),
            files: files.to_vec(),
            name: name.to_string(),
        };

        info!("Deploying project {} ({} files)", project_id, files.len());

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DeployError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeployError::Endpoint(format!(
                "deploy endpoint returned {}",
                response.status()
            )));
        }

        let body: DeployResponse = response
            .json()
            .await
            .map_err(|e| DeployError::InvalidResponse(e.to_string()))?;

        if body.success {
            body.url
                .ok_or_else(|| DeployError::InvalidResponse("success without a url".to_string()))
        } else {
            Err(DeployError::Endpoint(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }

    /// Load a previously saved project
    pub async fn load_project(&self, project_id: &str) -> DeployResult<LoadedProject> {
        let url = format!("{}/api/projects/{}", self.base_url, project_id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| DeployError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeployError::Endpoint(format!(
                "project endpoint returned {}",
                response.status()
            )));
        }

        let body: ProjectResponse = response
            .json()
            .await
            .map_err(|e| DeployError::InvalidResponse(e.to_string()))?;

        Ok(body.project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deploy_request_uses_camel_case_contract() {
        let request = DeployRequest {
            project_id: "proj-1".to_string(),
            files: vec![ProjectFile::new("package.json", "{}")],
            name: "My Site".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["projectId"], "proj-1");
        assert_eq!(value["name"], "My Site");
        assert_eq!(value["files"][0]["path"], "package.json");
    }

    #[test]
    fn test_success_response_parses() {
        let body = r#"{"success": true, "url": "https://my-site.example.app"}"#;
        let parsed: DeployResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.url.as_deref(), Some("https://my-site.example.app"));
        assert!(parsed.error.is_none());
    }

    #[test]
    fn test_error_response_parses() {
        let body = r#"{"success": false, "error": "build failed"}"#;
        let parsed: DeployResponse = serde_json::from_str(body).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.error.as_deref(), Some("build failed"));
    }

    #[test]
    fn test_project_load_response_parses() {
        let body = r#"{"project": {"name": "My Site", "files": [{"path": "a.txt", "content": "hi"}]}}"#;
        let parsed: ProjectResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.project.name, "My Site");
        assert_eq!(parsed.project.files.len(), 1);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = DeployClient::new("https://api.example.com/").unwrap();
        assert_eq!(client.base_url, "https://api.example.com");
    }
}
