//! HTTP client for the repository manager's REST API.

use reqwest::RequestBuilder;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use repotally_core::{ComponentPage, Repository};

use crate::error::SourceError;
use crate::source::ComponentSource;

/// Authentication for the manager's REST endpoints.
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    #[default]
    Anonymous,
    Basic {
        username: String,
        password: String,
    },
    Token(String),
}

/// [`ComponentSource`] backed by the manager's `/service/rest/v1` API.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpSource {
    /// Builds a client for the manager at `base_url` (scheme and host, no
    /// trailing path).
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(SourceError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Anonymous => request,
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::Token(token) => request.bearer_auth(token),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        debug!(%url, "fetching");

        let response = self
            .authorize(self.client.get(&url))
            .query(query)
            .send()
            .await
            .map_err(|source| SourceError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json()
            .await
            .map_err(|source| SourceError::Transport { url, source })
    }
}

impl ComponentSource for HttpSource {
    async fn repositories(&self) -> Result<Vec<Repository>, SourceError> {
        self.get_json(format!("{}/service/rest/v1/repositories", self.base_url), &[])
            .await
    }

    async fn components_page(
        &self,
        repository: &str,
        token: Option<&str>,
    ) -> Result<ComponentPage, SourceError> {
        let mut query = vec![("repository", repository)];
        if let Some(token) = token {
            query.push(("continuationToken", token));
        }
        self.get_json(format!("{}/service/rest/v1/components", self.base_url), &query)
            .await
    }
}
