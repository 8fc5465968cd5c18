//! An in-memory [`NexusApi`] which replays canned responses and remembers
//! every request made against it.

use failure::{self, Error};
use std::cell::RefCell;

use crate::client::NexusApi;
use crate::model::{Asset, Checksums, Component, ComponentPage, Repository};

#[derive(Debug, Default)]
pub(crate) struct ScriptedApi {
    repositories: Vec<Repository>,
    broken_repository_list: bool,
    /// `(repository, token the page is requested with, response)`
    pages: Vec<(String, Option<String>, Result<ComponentPage, String>)>,
    component_calls: RefCell<Vec<(String, Option<String>)>>,
    repository_calls: RefCell<usize>,
}

impl ScriptedApi {
    pub fn new() -> ScriptedApi {
        ScriptedApi::default()
    }

    pub fn with_repository(mut self, repo: Repository) -> ScriptedApi {
        self.repositories.push(repo);
        self
    }

    pub fn with_broken_repository_list(mut self) -> ScriptedApi {
        self.broken_repository_list = true;
        self
    }

    pub fn with_page(
        mut self,
        repository: &str,
        requested_with: Option<&str>,
        page: ComponentPage,
    ) -> ScriptedApi {
        self.pages.push((
            repository.to_string(),
            requested_with.map(String::from),
            Ok(page),
        ));
        self
    }

    pub fn with_failing_page(
        mut self,
        repository: &str,
        requested_with: Option<&str>,
    ) -> ScriptedApi {
        self.pages.push((
            repository.to_string(),
            requested_with.map(String::from),
            Err(String::from("Request failed with 500 Internal Server Error")),
        ));
        self
    }

    pub fn component_calls(&self) -> Vec<(String, Option<String>)> {
        self.component_calls.borrow().clone()
    }

    pub fn calls_for(&self, repository: &str) -> usize {
        self.component_calls
            .borrow()
            .iter()
            .filter(|(name, _)| name == repository)
            .count()
    }

    pub fn repository_calls(&self) -> usize {
        *self.repository_calls.borrow()
    }
}

impl NexusApi for ScriptedApi {
    fn repositories(&self) -> Result<Vec<Repository>, Error> {
        *self.repository_calls.borrow_mut() += 1;

        if self.broken_repository_list {
            Err(failure::err_msg("Connection refused"))
        } else {
            Ok(self.repositories.clone())
        }
    }

    fn repository(&self, name: &str) -> Result<Repository, Error> {
        *self.repository_calls.borrow_mut() += 1;

        self.repositories
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| failure::format_err!("Request failed with 404 Not Found"))
    }

    fn components(
        &self,
        repository: &str,
        continuation_token: Option<&str>,
    ) -> Result<ComponentPage, Error> {
        self.component_calls
            .borrow_mut()
            .push((repository.to_string(), continuation_token.map(String::from)));

        let (_, _, response) = self
            .pages
            .iter()
            .find(|(name, token, _)| {
                name == repository && token.as_deref() == continuation_token
            })
            .ok_or_else(|| {
                failure::format_err!(
                    "No page for {} with token {:?}",
                    repository,
                    continuation_token
                )
            })?;

        response.clone().map_err(failure::err_msg)
    }
}

pub(crate) fn repository(name: &str, kind: &str, format: &str) -> Repository {
    Repository {
        name: name.to_string(),
        kind: kind.to_string(),
        format: format.to_string(),
        ..Default::default()
    }
}

pub(crate) fn asset(path: &str) -> Asset {
    Asset {
        id: format!("id-{}", path),
        repository: String::from("npm-proxy"),
        format: String::from("npm"),
        path: path.to_string(),
        checksums: Some(Checksums {
            md5: Some(format!("md5-{}", path)),
            sha1: Some(format!("sha1-{}", path)),
            sha256: Some(format!("sha256-{}", path)),
        }),
    }
}

pub(crate) fn component(name: &str, assets: Vec<Asset>) -> Component {
    Component {
        id: format!("id-{}", name),
        repository: String::from("npm-proxy"),
        format: String::from("npm"),
        name: name.to_string(),
        version: Some(String::from("1.0.0")),
        assets,
        ..Default::default()
    }
}

pub(crate) fn page(items: Vec<Component>, continuation_token: Option<&str>) -> ComponentPage {
    ComponentPage {
        items,
        continuation_token: continuation_token.map(String::from),
    }
}
