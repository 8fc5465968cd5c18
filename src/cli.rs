//! Command line arguments, and turning them into a [`Config`].

use failure::{Error, ResultExt};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use structopt::StructOpt;

use crate::config::{Config, ENV_PASSWORD, ENV_USERNAME};

/// Long flags which may also be written with a single dash (e.g. `-url`).
const LONG_FLAGS: &[&str] = &[
    "url",
    "username",
    "password",
    "skipped",
    "repository-name",
    "output-dir",
    "debug",
];

/// Flags which take no value, but may be spelt `-skipped=true`.
const BOOL_FLAGS: &[&str] = &["skipped", "debug", "X"];

#[derive(Debug, Clone, PartialEq, StructOpt)]
#[structopt(
    name = "nexus-repo-asset-lister",
    about = "Lists the assets held by the proxy repositories of a Sonatype Nexus Repository Manager."
)]
pub struct Args {
    #[structopt(long = "url", default_value = "http://localhost:8081",
                help = "URL including protocol to your Sonatype Nexus Repository Manager")]
    pub url: String,
    #[structopt(long = "username",
                help = "Username used to authenticate to Sonatype Nexus Repository \
                        (can also be set using the environment variable NXRM_USERNAME)")]
    pub username: Option<String>,
    #[structopt(long = "password",
                help = "Password used to authenticate to Sonatype Nexus Repository \
                        (can also be set using the environment variable NXRM_PASSWORD)")]
    pub password: Option<String>,
    #[structopt(short = "o", long = "output-dir", default_value = ".",
                help = "Directory to write asset lists to")]
    pub output_dir: String,
    #[structopt(long = "skipped",
                help = "Whether to output skipped assets to a separate '-skipped.json' file")]
    pub skipped: bool,
    #[structopt(short = "X", long = "debug", help = "Enable debug logging")]
    pub debug: bool,
    #[structopt(long = "repository-name",
                help = "Run only for a specific Repository Name")]
    pub repository_name: Option<String>,
}

impl Args {
    /// Parse the process's arguments, accepting single-dash long flags.
    pub fn from_env_args() -> Args {
        Args::from_iter(normalize_flags(env::args_os()))
    }

    /// Resolve the config, falling back to the process environment for
    /// credentials.
    pub fn config(&self) -> Result<Config, Error> {
        self.config_with(|key| env::var(key).ok())
    }

    /// Resolve the config, using `lookup` to read environment variables.
    pub fn config_with<F>(&self, lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = credential(self.username.as_ref(), ENV_USERNAME, &lookup);
        let password = credential(self.password.as_ref(), ENV_PASSWORD, &lookup);

        let output_dir =
            shellexpand::full(&self.output_dir).context("Unable to expand the output directory")?;

        let cfg = Config {
            url: self.url.trim().trim_end_matches('/').to_string(),
            username,
            password,
            output_dir: PathBuf::from(&*output_dir),
            output_skipped: self.skipped,
            repository_name: self
                .repository_name
                .as_ref()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
        };

        cfg.validate()?;
        Ok(cfg)
    }
}

/// Use the flag's value unless it's blank, in which case try the environment.
fn credential<F>(flag: Option<&String>, var: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match flag.filter(|value| !value.trim().is_empty()) {
        Some(value) => value.clone(),
        None => {
            debug!("{} not supplied as argument - checking environment variable", var);
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_default()
        }
    }
}

/// Rewrite single-dash long flags (`-url`, `-repository-name=foo`) into
/// their double-dash form so they can be understood by the parser.
///
/// Boolean flags given an explicit value are resolved here: `-skipped=true`
/// becomes `--skipped` and `-skipped=false` is dropped.
pub fn normalize_flags<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut seen_terminator = false;

    args.into_iter()
        .filter_map(|arg| {
            let arg: OsString = arg.into();
            if seen_terminator {
                return Some(arg);
            }

            let rewritten = match arg.to_str() {
                Some("--") => {
                    seen_terminator = true;
                    None
                }
                Some(s) => match explicit_bool(s) {
                    Some((name, true)) => Some(Some(dashed(name))),
                    Some((_, false)) => Some(None),
                    None if is_single_dash_long_flag(s) => {
                        Some(Some(OsString::from(format!("-{}", s))))
                    }
                    None => None,
                },
                None => None,
            };

            rewritten.unwrap_or(Some(arg))
        })
        .collect()
}

/// Split `-skipped=true` (or `--skipped=false`) into the flag's name and
/// its value.
fn explicit_bool(arg: &str) -> Option<(&str, bool)> {
    if !arg.starts_with('-') {
        return None;
    }

    let flag = arg.trim_start_matches('-');
    let eq = flag.find('=')?;
    let (name, value) = (&flag[..eq], &flag[eq + 1..]);
    if !BOOL_FLAGS.contains(&name) {
        return None;
    }

    match value {
        "true" | "1" => Some((name, true)),
        "false" | "0" => Some((name, false)),
        _ => None,
    }
}

fn dashed(name: &str) -> OsString {
    if name.len() == 1 {
        OsString::from(format!("-{}", name))
    } else {
        OsString::from(format!("--{}", name))
    }
}

fn is_single_dash_long_flag(arg: &str) -> bool {
    if !arg.starts_with('-') || arg.starts_with("--") {
        return false;
    }

    let name = arg[1..].split('=').next().unwrap_or_default();
    LONG_FLAGS.contains(&name)
}
