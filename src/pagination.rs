//! Walking a repository's component listing one page at a time.

use failure::{Error, ResultExt};
use std::mem;

use crate::client::NexusApi;
use crate::model::{Asset, AssetIdentity, ComponentPage};

/// An iterator over the pages of `/v1/components` for a single repository,
/// following the continuation token until the server stops sending one.
///
/// The first error is yielded and then iteration stops.
pub struct Pages<'a, A: ?Sized> {
    api: &'a A,
    repository: String,
    cursor: Cursor,
}

#[derive(Debug, Clone, PartialEq)]
enum Cursor {
    Start,
    Continue(String),
    Done,
}

impl<'a, A> Pages<'a, A>
where
    A: NexusApi + ?Sized,
{
    pub fn new(api: &'a A, repository: &str) -> Self {
        Pages {
            api,
            repository: repository.to_string(),
            cursor: Cursor::Start,
        }
    }

    fn fetch(&self, token: Option<&str>) -> Result<ComponentPage, Error> {
        match token {
            Some(tok) => trace!("Requesting components of {} after {}", self.repository, tok),
            None => trace!("Requesting the first components of {}", self.repository),
        }

        self.api.components(&self.repository, token)
    }
}

impl<'a, A> Iterator for Pages<'a, A>
where
    A: NexusApi + ?Sized,
{
    type Item = Result<ComponentPage, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let got = match mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Done => return None,
            Cursor::Start => self.fetch(None),
            Cursor::Continue(token) => self.fetch(Some(token.as_str())),
        };

        if let Ok(ref page) = got {
            if let Some(token) = page.next_token() {
                self.cursor = Cursor::Continue(token.to_string());
            }
        }

        Some(got)
    }
}

/// The assets found in a repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetListing {
    pub identities: Vec<AssetIdentity>,
    /// Assets no identity could be derived for (they have no checksums).
    pub skipped: Vec<Asset>,
}

impl AssetListing {
    pub fn push(&mut self, asset: Asset) {
        match asset.checksums {
            Some(ref checksums) => self.identities.push(AssetIdentity {
                path: asset.path.clone(),
                checksums: checksums.clone(),
            }),
            None => {
                debug!("Skipping {} as it has no checksums", asset.path);
                self.skipped.push(asset);
            }
        }
    }
}

/// Fetch every page of a repository's components and collect the identity
/// of each asset.
///
/// A failed page aborts the whole listing.
pub fn list_assets<A>(api: &A, repository: &str) -> Result<AssetListing, Error>
where
    A: NexusApi + ?Sized,
{
    let mut listing = AssetListing::default();

    for (i, page) in Pages::new(api, repository).enumerate() {
        let page =
            page.with_context(|_| format!("Unable to fetch page {} of {}", i + 1, repository))?;
        let more = page.next_token().is_some();

        for component in page.items {
            for asset in component.assets {
                listing.push(asset);
            }
        }

        debug!(
            "Asset identities after page {}: {} ({})",
            i + 1,
            listing.identities.len(),
            if more { "more to come" } else { "last page" }
        );
    }

    Ok(listing)
}
