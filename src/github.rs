use crate::error::{Error, Result};
use crate::tally::{PrState, PullRequestRecord};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

/// GitHub caps `first` on connections at 100.
pub const MAX_PAGE_SIZE: u32 = 100;

const USER_AGENT: &str = "org-contributions";

const PULL_REQUESTS_QUERY: &str = r#"
query($login: String!, $first: Int!) {
    user(login: $login) {
        pullRequests(first: $first, orderBy: {field: CREATED_AT, direction: DESC}) {
            pageInfo {
                hasNextPage
            }
            nodes {
                state
                repository {
                    owner {
                        login
                    }
                }
            }
        }
    }
}
"#;

#[derive(Clone)]
pub struct GithubClient {
    token: Arc<String>,
    endpoint: Arc<String>,
    http: Arc<Client>,
}

impl GithubClient {
    /// Create a GraphQL client. A missing or blank token is an auth error.
    pub fn new(token: Option<String>, endpoint: impl Into<String>) -> Result<Self> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::auth("GITHUB_TOKEN environment variable not set"))?;
        Ok(Self {
            token: Arc::new(token),
            endpoint: Arc::new(endpoint.into()),
            http: Arc::new(Client::new()),
        })
    }

    /// Single GraphQL request with `errors` checking. Never retried.
    async fn graphql(&self, query: &str, variables: Value) -> Result<Value> {
        debug!(endpoint = %self.endpoint, "sending GraphQL request");
        let resp = self
            .http
            .post(self.endpoint.as_str())
            .bearer_auth(&*self.token)
            .header("User-Agent", USER_AGENT)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| Error::network(format!("sending GraphQL request: {e}")))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::auth("GitHub rejected the token (HTTP 401)"));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::network(format!(
                "GitHub API returned HTTP {}: {body}",
                status.as_u16()
            )));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| Error::network(format!("failed to parse JSON from GitHub: {e}")))?;

        if let Some(errors) = json.get("errors") {
            return Err(Error::network(format!("GraphQL reported errors: {errors:#}")));
        }

        Ok(json)
    }

    /// The user's most recently created pull requests, a single page of at
    /// most `first` records. Older pull requests are not fetched.
    pub async fn pull_requests(&self, login: &str, first: u32) -> Result<Vec<PullRequestRecord>> {
        #[derive(Deserialize)]
        struct PrResponse {
            data: Option<PrData>,
        }
        #[derive(Deserialize)]
        struct PrData {
            user: Option<PrUser>,
        }
        #[derive(Deserialize)]
        struct PrUser {
            #[serde(rename = "pullRequests")]
            pull_requests: PrConnection,
        }
        #[derive(Deserialize)]
        struct PrConnection {
            #[serde(rename = "pageInfo")]
            page_info: Option<PageInfo>,
            nodes: Option<Vec<Option<PrNode>>>,
        }
        #[derive(Deserialize)]
        struct PageInfo {
            #[serde(rename = "hasNextPage")]
            has_next_page: bool,
        }
        #[derive(Deserialize)]
        struct PrNode {
            state: PrState,
            repository: PrRepository,
        }
        #[derive(Deserialize)]
        struct PrRepository {
            owner: PrOwner,
        }
        #[derive(Deserialize)]
        struct PrOwner {
            login: String,
        }

        let first = first.clamp(1, MAX_PAGE_SIZE);
        let json = self
            .graphql(
                PULL_REQUESTS_QUERY,
                serde_json::json!({ "login": login, "first": first }),
            )
            .await?;
        let parsed: PrResponse = serde_json::from_value(json)
            .map_err(|e| Error::network(format!("unexpected pullRequests response: {e}")))?;

        let connection = parsed
            .data
            .and_then(|d| d.user)
            .map(|u| u.pull_requests)
            .ok_or_else(|| Error::network(format!("user {login} not found")))?;

        if connection.page_info.is_some_and(|p| p.has_next_page) {
            warn!(
                limit = first,
                "more pull requests exist than one page holds; only the most recent are tallied"
            );
        }

        let records = connection
            .nodes
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(|n| PullRequestRecord {
                state: n.state,
                owner: n.repository.owner.login,
            })
            .collect();

        Ok(records)
    }
}
