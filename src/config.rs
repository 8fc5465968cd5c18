use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;

pub const ENV_USERNAME: &str = "NXRM_USERNAME";
pub const ENV_PASSWORD: &str = "NXRM_PASSWORD";
pub const DEFAULT_URL: &str = "http://localhost:8081";

/// Everything needed for a single run, resolved once at startup.
#[derive(Clone, PartialEq)]
pub struct Config {
    /// Base URL of the Nexus Repository Manager, without a trailing slash.
    pub url: String,
    pub username: String,
    pub password: String,
    /// The directory manifests are written to.
    pub output_dir: PathBuf,
    /// Also write a `-skipped.json` file for repositories with skipped
    /// assets.
    pub output_skipped: bool,
    /// Only list this repository.
    pub repository_name: Option<String>,
}

impl Config {
    /// Check the settings which can't be defaulted, returning the first
    /// problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::MissingUsername);
        }
        if self.password.trim().is_empty() {
            return Err(ConfigError::MissingPassword);
        }
        if self.url.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            url: DEFAULT_URL.to_string(),
            username: String::new(),
            password: String::new(),
            output_dir: PathBuf::from("."),
            output_skipped: false,
            repository_name: None,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"XXXXXXXXXX")
            .field("output_dir", &self.output_dir)
            .field("output_skipped", &self.output_skipped)
            .field("repository_name", &self.repository_name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Fail)]
pub enum ConfigError {
    #[fail(
        display = "No username has been supplied either via argument or the NXRM_USERNAME environment variable"
    )]
    MissingUsername,
    #[fail(
        display = "No password has been supplied either via argument or the NXRM_PASSWORD environment variable"
    )]
    MissingPassword,
    #[fail(display = "URL to Sonatype Nexus Repository must be supplied")]
    MissingUrl,
}
