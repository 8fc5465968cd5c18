//! The payloads exchanged with the Nexus REST API, plus the identity record
//! written to each manifest.

use serde_json::Value;
use std::collections::HashMap;

/// A repository as reported by `/v1/repositories`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub name: String,
    pub format: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: Option<String>,
    pub size: Option<u64>,
    pub attributes: HashMap<String, Value>,
}

impl Repository {
    pub const PROXY: &'static str = "proxy";
    pub const DOCKER: &'static str = "docker";

    pub fn is_proxy(&self) -> bool {
        self.kind == Repository::PROXY
    }

    /// Docker proxies address their assets differently, so they are never
    /// listed.
    pub fn is_docker(&self) -> bool {
        self.format == Repository::DOCKER
    }

    /// Should this repository have its assets listed?
    pub fn is_listable(&self) -> bool {
        self.is_proxy() && !self.is_docker()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Component {
    pub id: String,
    pub repository: String,
    pub format: String,
    pub group: Option<String>,
    pub name: String,
    pub version: Option<String>,
    pub assets: Vec<Asset>,
}

/// A single stored file belonging to a [`Component`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
    pub id: String,
    pub repository: String,
    pub format: String,
    pub path: String,
    #[serde(rename = "checksum", alias = "checksums")]
    pub checksums: Option<Checksums>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checksums {
    pub md5: Option<String>,
    pub sha1: Option<String>,
    pub sha256: Option<String>,
}

/// One page of `/v1/components`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentPage {
    pub items: Vec<Component>,
    #[serde(rename = "continuationToken")]
    pub continuation_token: Option<String>,
}

impl ComponentPage {
    /// The token to request the following page with, if there is one.
    pub fn next_token(&self) -> Option<&str> {
        self.continuation_token
            .as_ref()
            .map(String::as_str)
            .filter(|tok| !tok.trim().is_empty())
    }

    pub fn asset_count(&self) -> usize {
        self.items.iter().map(|c| c.assets.len()).sum()
    }
}

/// The unit persisted in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetIdentity {
    pub path: String,
    pub checksums: Checksums,
}
