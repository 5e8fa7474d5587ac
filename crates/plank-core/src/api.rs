//! Thin blocking client for the tracker REST API.
//!
//! Pass-through only: each method maps onto one endpoint, bodies are the
//! wire shapes from [`crate::model`], and every failure is folded into the
//! typed error model. Projects update with PUT, tasks with PATCH.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{PlankError, Result};
use crate::model::{Project, ProjectDraft, ProjectPatch, Task, TaskCreate, TaskPatch};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const USER_AGENT: &str = concat!("plank/", env!("CARGO_PKG_VERSION"));

/// Blocking JSON client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self { base_url, agent }
    }

    /// The configured base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Cheap reachability check used to pick remote vs. local mode.
    ///
    /// Any HTTP response counts as reachable; only transport-level failure
    /// (refused, DNS, timeout) does not.
    #[must_use]
    pub fn probe(&self) -> bool {
        let url = self.url("/projects");
        match self.agent.get(&url).timeout(PROBE_TIMEOUT).call() {
            Ok(_) | Err(ureq::Error::Status(..)) => true,
            Err(err) => {
                tracing::warn!(url, error = %err, "API unreachable");
                false
            }
        }
    }

    // ─── Projects ────────────────────────────────────────────────────────

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        self.get_json(&self.url("/projects"))
    }

    pub fn get_project(&self, id: &str) -> Result<Project> {
        self.get_json(&self.url(&format!("/projects/{id}")))
            .map_err(|err| or_not_found(err, || PlankError::ProjectNotFound { id: id.to_string() }))
    }

    pub fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        self.send_json("POST", &self.url("/projects"), draft)
    }

    pub fn update_project(&self, id: &str, patch: &ProjectPatch) -> Result<Project> {
        self.send_json("PUT", &self.url(&format!("/projects/{id}")), patch)
            .map_err(|err| or_not_found(err, || PlankError::ProjectNotFound { id: id.to_string() }))
    }

    pub fn delete_project(&self, id: &str) -> Result<()> {
        self.send_empty("DELETE", &self.url(&format!("/projects/{id}")))
            .map_err(|err| or_not_found(err, || PlankError::ProjectNotFound { id: id.to_string() }))
    }

    // ─── Tasks ───────────────────────────────────────────────────────────

    pub fn list_tasks_by_project(&self, project_id: &str) -> Result<Vec<Task>> {
        self.get_json(&self.url(&format!("/tasks?projectId={project_id}")))
    }

    pub fn create_task(&self, create: &TaskCreate) -> Result<Task> {
        self.send_json("POST", &self.url("/tasks"), create)
    }

    pub fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        self.send_json("PATCH", &self.url(&format!("/tasks/{id}")), patch)
            .map_err(|err| or_not_found(err, || PlankError::TaskNotFound { id: id.to_string() }))
    }

    pub fn delete_task(&self, id: &str) -> Result<()> {
        self.send_empty("DELETE", &self.url(&format!("/tasks/{id}")))
            .map_err(|err| or_not_found(err, || PlankError::TaskNotFound { id: id.to_string() }))
    }

    // ─── Plumbing ────────────────────────────────────────────────────────

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .agent
            .get(url)
            .set("Accept", "application/json")
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|err| map_call_error(url, err))?;

        decode(url, response)
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        method: &str,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let response = self
            .agent
            .request(method, url)
            .set("Accept", "application/json")
            .set("User-Agent", USER_AGENT)
            .send_json(body)
            .map_err(|err| map_call_error(url, err))?;

        decode(url, response)
    }

    fn send_empty(&self, method: &str, url: &str) -> Result<()> {
        self.agent
            .request(method, url)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|err| map_call_error(url, err))?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(url: &str, response: ureq::Response) -> Result<T> {
    response.into_json::<T>().map_err(|err| PlankError::Decode {
        url: url.to_string(),
        detail: err.to_string(),
    })
}

fn map_call_error(url: &str, err: ureq::Error) -> PlankError {
    match err {
        ureq::Error::Status(status, _) => PlankError::Status {
            status,
            url: url.to_string(),
        },
        transport => PlankError::Transport {
            url: url.to_string(),
            detail: transport.to_string(),
        },
    }
}

/// Rewrite a 404 into the entity-level not-found error.
fn or_not_found(err: PlankError, not_found: impl FnOnce() -> PlankError) -> PlankError {
    match err {
        PlankError::Status { status: 404, .. } => not_found(),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiClient, map_call_error, or_not_found};
    use crate::error::PlankError;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/projects"), "http://localhost:3000/projects");
    }

    #[test]
    fn task_query_url_carries_project_filter() {
        let client = ApiClient::new("http://localhost:3000");
        assert_eq!(
            client.url("/tasks?projectId=p1"),
            "http://localhost:3000/tasks?projectId=p1"
        );
    }

    #[test]
    fn status_error_maps_to_typed_status() {
        let response = ureq::Response::new(500, "Internal Server Error", "").unwrap();
        let err = map_call_error("http://x/projects", ureq::Error::Status(500, response));
        assert!(matches!(err, PlankError::Status { status: 500, .. }));
        assert!(!err.is_unreachable());
    }

    #[test]
    fn not_found_rewrite_only_touches_404() {
        let response = ureq::Response::new(404, "Not Found", "").unwrap();
        let err = map_call_error("http://x/tasks/t9", ureq::Error::Status(404, response));
        let rewritten = or_not_found(err, || PlankError::TaskNotFound {
            id: "t9".to_string(),
        });
        assert!(matches!(rewritten, PlankError::TaskNotFound { .. }));

        let response = ureq::Response::new(500, "Internal Server Error", "").unwrap();
        let err = map_call_error("http://x/tasks/t9", ureq::Error::Status(500, response));
        let kept = or_not_found(err, || PlankError::TaskNotFound {
            id: "t9".to_string(),
        });
        assert!(matches!(kept, PlankError::Status { status: 500, .. }));
    }

    #[test]
    fn probe_fails_fast_on_unreachable_host() {
        // Port 1 is essentially never listening; transport error, not a panic.
        let client = ApiClient::new("http://127.0.0.1:1");
        assert!(!client.probe());
    }
}
