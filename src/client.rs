use failure::{Error, ResultExt};
use reqwest::blocking::Client as HttpClient;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::fmt::{self, Debug, Formatter};

use crate::config::Config;
use crate::model::{ComponentPage, Repository};

/// The parts of the Nexus REST API needed to list a repository's assets.
pub trait NexusApi {
    /// Every repository on the server.
    fn repositories(&self) -> Result<Vec<Repository>, Error>;

    /// A single repository, looked up by name.
    fn repository(&self, name: &str) -> Result<Repository, Error>;

    /// One page of components, starting from the beginning when no
    /// `continuation_token` is given.
    fn components(
        &self,
        repository: &str,
        continuation_token: Option<&str>,
    ) -> Result<ComponentPage, Error>;
}

/// A blocking client for a single Nexus Repository Manager, authenticating
/// every request with HTTP basic auth.
#[derive(Clone)]
pub struct Client {
    inner: HttpClient,
    base_url: String,
    username: String,
    password: String,
}

impl Client {
    pub const USER_AGENT: &'static str =
        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    pub fn new<U, N, P>(base_url: U, username: N, password: P) -> Result<Client, Error>
    where
        U: AsRef<str>,
        N: Into<String>,
        P: Into<String>,
    {
        let inner = HttpClient::builder()
            .user_agent(Client::USER_AGENT)
            .build()
            .context("Unable to create the HTTP client")?;

        Ok(Client {
            inner,
            base_url: base_url.as_ref().trim().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
        })
    }

    pub fn with_config(cfg: &Config) -> Result<Client, Error> {
        Client::new(&cfg.url, cfg.username.as_str(), cfg.password.as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The full URL of a REST endpoint (e.g. `/v1/repositories`).
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/service/rest{}", self.base_url, path)
    }

    fn repository_url(&self, name: &str) -> Result<Url, Error> {
        let mut url =
            Url::parse(&self.api_url("/v1/repositories")).context("Invalid server URL")?;
        url.path_segments_mut()
            .map_err(|_| failure::err_msg("Invalid server URL"))?
            .push(name);

        Ok(url)
    }

    fn components_url(
        &self,
        repository: &str,
        continuation_token: Option<&str>,
    ) -> Result<Url, Error> {
        let mut params = vec![("repository", repository)];
        if let Some(token) = continuation_token {
            params.push(("continuationToken", token));
        }

        let url = Url::parse_with_params(&self.api_url("/v1/components"), &params)
            .context("Invalid server URL")?;
        Ok(url)
    }

    fn get<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        debug!("Sending request to {:?}", url);

        let response = self
            .inner
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .context("Unable to send request")?;

        let status = response.status();
        debug!("Received response ({})", status);

        if !status.is_success() {
            warn!("Request failed with {}", status);

            let err = FailedRequest {
                status,
                url: url.to_string(),
            };
            return Err(err.into());
        }

        let body = response.bytes().context("Unable to read the response")?;

        if log_enabled!(::log::Level::Trace) {
            trace!("Body:");
            for line in String::from_utf8_lossy(&body).lines() {
                trace!("{}", line);
            }
        }

        let got = serde_json::from_slice(&body).context("Unable to deserialize response")?;
        Ok(got)
    }
}

impl NexusApi for Client {
    fn repositories(&self) -> Result<Vec<Repository>, Error> {
        self.get(&self.api_url("/v1/repositories"))
    }

    fn repository(&self, name: &str) -> Result<Repository, Error> {
        let url = self.repository_url(name)?;
        self.get(url.as_str())
    }

    fn components(
        &self,
        repository: &str,
        continuation_token: Option<&str>,
    ) -> Result<ComponentPage, Error> {
        let url = self.components_url(repository, continuation_token)?;
        self.get(url.as_str())
    }
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish()
    }
}

/// The server answered with a non-successful status code.
#[derive(Debug, Clone, PartialEq, Fail)]
#[fail(display = "Request to {} failed with {}", url, status)]
pub struct FailedRequest {
    pub status: StatusCode,
    pub url: String,
}
