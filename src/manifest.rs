use failure::{Error, ResultExt};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Repository;
use crate::pagination::AssetListing;

/// Writes the asset listing of each repository to `{type}-{format}-{name}.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestWriter {
    output_dir: PathBuf,
    output_skipped: bool,
}

impl ManifestWriter {
    pub fn new<P: Into<PathBuf>>(output_dir: P, output_skipped: bool) -> ManifestWriter {
        ManifestWriter {
            output_dir: output_dir.into(),
            output_skipped,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the identities of a repository get written.
    pub fn manifest_path(&self, repo: &Repository) -> PathBuf {
        self.output_dir.join(file_name(repo, ""))
    }

    /// Where the skipped assets of a repository get written.
    pub fn skipped_path(&self, repo: &Repository) -> PathBuf {
        self.output_dir.join(file_name(repo, "-skipped"))
    }

    /// Write the manifest for `repo`, overwriting anything already there,
    /// and return its location.
    pub fn write(&self, repo: &Repository, listing: &AssetListing) -> Result<PathBuf, Error> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir).with_context(|_| {
                format!(
                    "Couldn't create the output directory ({})",
                    self.output_dir.display()
                )
            })?;
        }

        let manifest = self.manifest_path(repo);
        write_json(&manifest, &listing.identities)?;
        debug!(
            "Wrote {} asset identities to {}",
            listing.identities.len(),
            manifest.display()
        );

        if self.output_skipped && !listing.skipped.is_empty() {
            let skipped = self.skipped_path(repo);
            write_json(&skipped, &listing.skipped)?;
            debug!(
                "Wrote {} skipped assets to {}",
                listing.skipped.len(),
                skipped.display()
            );
        }

        Ok(manifest)
    }
}

fn file_name(repo: &Repository, suffix: &str) -> String {
    format!("{}-{}-{}{}.json", repo.kind, repo.format, repo.name, suffix).to_lowercase()
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), Error> {
    let json = serde_json::to_vec(value).context("Unable to serialize the manifest")?;
    fs::write(path, json).with_context(|_| format!("Unable to write to {}", path.display()))?;

    Ok(())
}
