use failure::{Error, ResultExt};
use std::io::Write;
use std::path::PathBuf;

use crate::client::NexusApi;
use crate::config::Config;
use crate::manifest::ManifestWriter;
use crate::model::Repository;
use crate::pagination;
use crate::selector;

/// Lists the assets of every selected repository, one after the other.
#[derive(Debug)]
pub struct Driver<A> {
    api: A,
    writer: ManifestWriter,
    repository_name: Option<String>,
}

impl<A: NexusApi> Driver<A> {
    pub fn new(api: A, writer: ManifestWriter, repository_name: Option<String>) -> Driver<A> {
        Driver {
            api,
            writer,
            repository_name,
        }
    }

    pub fn with_config(api: A, cfg: &Config) -> Driver<A> {
        let writer = ManifestWriter::new(&cfg.output_dir, cfg.output_skipped);
        Driver::new(api, writer, cfg.repository_name.clone())
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Write a manifest for each selected proxy repository.
    ///
    /// Failing to list or write one repository doesn't stop the others from
    /// being processed, the failures are reported together at the end as a
    /// [`ListingFailure`].
    pub fn run(&self) -> Result<Summary, Error> {
        let repos = selector::select_repositories(&self.api, self.repository_name.as_deref())?;
        info!("Found {} candidate repositories", repos.len());

        let mut summary = Summary::default();
        let mut errors = Vec::new();

        for (i, repo) in repos.iter().enumerate() {
            if repo.is_docker() {
                debug!("Skipping Proxy Repository '{}' as is Docker", repo.name);
                continue;
            }
            if !repo.is_proxy() {
                debug!("Skipping '{}' as it is a {} repository", repo.name, repo.kind);
                continue;
            }

            info!("{}: PROXY of format {} named {}", i, repo.format, repo.name);

            match self.process(repo) {
                Ok(report) => summary.repositories.push(report),
                Err(e) => {
                    warn!("Listing {} failed, {}", repo.name, e);
                    errors.push((repo.name.clone(), e));
                }
            }
        }

        if errors.is_empty() {
            Ok(summary)
        } else {
            Err(ListingFailure { summary, errors }.into())
        }
    }

    fn process(&self, repo: &Repository) -> Result<RepositoryReport, Error> {
        let listing = pagination::list_assets(&self.api, &repo.name)
            .context("Unable to list the repository's assets")?;

        info!(
            "   : {} Asset Identities, {} Skipped Assets",
            listing.identities.len(),
            listing.skipped.len()
        );

        let manifest = self
            .writer
            .write(repo, &listing)
            .context("Failed writing Asset Identities")?;

        Ok(RepositoryReport {
            name: repo.name.clone(),
            manifest,
            identities: listing.identities.len(),
            skipped: listing.skipped.len(),
        })
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub repositories: Vec<RepositoryReport>,
}

impl Summary {
    pub fn total_identities(&self) -> usize {
        self.repositories.iter().map(|r| r.identities).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryReport {
    pub name: String,
    pub manifest: PathBuf,
    pub identities: usize,
    pub skipped: usize,
}

#[derive(Debug, Fail)]
#[fail(display = "One or more errors encountered while listing repositories")]
pub struct ListingFailure {
    /// The repositories which were listed successfully.
    pub summary: Summary,
    pub errors: Vec<(String, Error)>,
}

impl ListingFailure {
    pub fn display<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writeln!(
            writer,
            "There were {} errors listing repositories ({} succeeded)",
            self.errors.len(),
            self.summary.repositories.len()
        )?;

        for &(ref name, ref err) in &self.errors {
            writeln!(writer, "Error: {} failed with {}", name, err)?;
            for cause in err.iter_chain().skip(1) {
                writeln!(writer, "\tCaused By: {}", cause)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{asset, component, page, repository, ScriptedApi};
    use std::path::Path;
    use tempdir::TempDir;

    fn driver(api: ScriptedApi, dir: &Path, only: Option<&str>) -> Driver<ScriptedApi> {
        Driver::new(api, ManifestWriter::new(dir, true), only.map(String::from))
    }

    #[test]
    fn npm_proxy_across_three_pages() {
        let temp = TempDir::new("driver").unwrap();
        let api = ScriptedApi::new()
            .with_repository(repository("npm-proxy", "proxy", "npm"))
            .with_page(
                "npm-proxy",
                None,
                page(vec![component("left-pad", vec![asset("a"), asset("b")])], Some("T1")),
            )
            .with_page(
                "npm-proxy",
                Some("T1"),
                page(vec![component("is-odd", vec![asset("c")])], Some("T2")),
            )
            .with_page("npm-proxy", Some("T2"), page(vec![], None));
        let driver = driver(api, temp.path(), None);

        let summary = driver.run().unwrap();

        assert_eq!(summary.total_identities(), 3);
        assert_eq!(driver.api().calls_for("npm-proxy"), 3);
        assert_eq!(
            summary.repositories,
            vec![RepositoryReport {
                name: String::from("npm-proxy"),
                manifest: temp.path().join("proxy-npm-npm-proxy.json"),
                identities: 3,
                skipped: 0,
            }]
        );
        assert!(temp.path().join("proxy-npm-npm-proxy.json").exists());
    }

    #[test]
    fn a_named_hosted_repository_produces_no_file() {
        let temp = TempDir::new("driver").unwrap();
        let api = ScriptedApi::new()
            .with_repository(repository("maven-releases", "hosted", "maven2"))
            .with_page("maven-releases", None, page(vec![component("x", vec![asset("x")])], None));
        let driver = driver(api, temp.path(), Some("maven-releases"));

        let summary = driver.run().unwrap();

        assert!(summary.repositories.is_empty());
        assert!(driver.api().component_calls().is_empty());
        assert_eq!(temp.path().read_dir().unwrap().count(), 0);
    }

    #[test]
    fn a_named_docker_proxy_is_skipped() {
        let temp = TempDir::new("driver").unwrap();
        let api = ScriptedApi::new().with_repository(repository("docker-hub", "proxy", "docker"));
        let driver = driver(api, temp.path(), Some("docker-hub"));

        let summary = driver.run().unwrap();

        assert!(summary.repositories.is_empty());
        assert!(driver.api().component_calls().is_empty());
    }

    #[test]
    fn one_broken_repository_does_not_stop_the_others() {
        let temp = TempDir::new("driver").unwrap();
        let api = ScriptedApi::new()
            .with_repository(repository("broken", "proxy", "npm"))
            .with_repository(repository("pypi-proxy", "proxy", "pypi"))
            .with_page("broken", None, page(vec![component("a", vec![asset("a")])], Some("T1")))
            .with_failing_page("broken", Some("T1"))
            .with_page("pypi-proxy", None, page(vec![component("b", vec![asset("b")])], None));
        let driver = driver(api, temp.path(), None);

        let err = driver.run().unwrap_err();

        let failure = err.downcast_ref::<ListingFailure>().unwrap();
        assert_eq!(failure.errors.len(), 1);
        assert_eq!(failure.errors[0].0, "broken");
        assert_eq!(failure.summary.total_identities(), 1);
        assert!(!temp.path().join("proxy-npm-broken.json").exists());
        assert!(temp.path().join("proxy-pypi-pypi-proxy.json").exists());

        let mut report = Vec::new();
        failure.display(&mut report).unwrap();
        let report = String::from_utf8(report).unwrap();
        assert!(report.contains("Error: broken failed with Unable to list the repository's assets"));
        assert!(report.contains("Caused By: Unable to fetch page 2 of broken"));
    }

    #[test]
    fn failing_to_list_repositories_is_fatal() {
        let temp = TempDir::new("driver").unwrap();
        let driver = driver(ScriptedApi::new().with_broken_repository_list(), temp.path(), None);

        let err = driver.run().unwrap_err();

        assert!(err.downcast_ref::<ListingFailure>().is_none());
        assert!(driver.api().component_calls().is_empty());
    }

    #[test]
    fn write_failures_are_reported() {
        let temp = TempDir::new("driver").unwrap();
        // a file where the output directory should be
        let blocker = temp.path().join("not-a-directory");
        std::fs::write(&blocker, "").unwrap();
        let api = ScriptedApi::new()
            .with_repository(repository("npm-proxy", "proxy", "npm"))
            .with_page("npm-proxy", None, page(vec![component("a", vec![asset("a")])], None));
        let driver = driver(api, &blocker, None);

        let err = driver.run().unwrap_err();

        let failure = err.downcast_ref::<ListingFailure>().unwrap();
        assert_eq!(failure.errors[0].1.to_string(), "Failed writing Asset Identities");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn report_write_errors_are_returned_to_the_caller() {
        let listing_failure = ListingFailure {
            summary: Summary::default(),
            errors: vec![(String::from("npm-proxy"), failure::err_msg("boom"))],
        };

        assert!(listing_failure.display(&mut ClosedPipe).is_err());
    }
}
