//! List the assets held by the proxy repositories of a Nexus Repository
//! Manager, writing one JSON manifest of asset identities per repository.

extern crate failure;
#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
extern crate reqwest;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate shellexpand;
extern crate structopt;

pub mod cli;
pub mod client;
pub mod config;
pub mod driver;
#[cfg(test)]
mod fake;
pub mod manifest;
pub mod model;
pub mod pagination;
pub mod selector;

pub use crate::client::{Client, FailedRequest, NexusApi};
pub use crate::config::{Config, ConfigError};
pub use crate::driver::{Driver, ListingFailure, RepositoryReport, Summary};
pub use crate::manifest::ManifestWriter;
pub use crate::model::{Asset, AssetIdentity, Checksums, Component, ComponentPage, Repository};
pub use crate::pagination::{list_assets, AssetListing, Pages};
pub use crate::selector::select_repositories;
