use failure::{Error, ResultExt};

use crate::client::NexusApi;
use crate::model::Repository;

/// Work out which repositories to list.
///
/// With a name, only that repository is fetched and nothing is filtered out
/// here (the caller still skips anything which isn't a listable proxy).
/// Otherwise every proxy repository on the server is returned, except for
/// Docker ones.
pub fn select_repositories<A>(api: &A, name: Option<&str>) -> Result<Vec<Repository>, Error>
where
    A: NexusApi + ?Sized,
{
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => {
            debug!("Fetching the {} repository", name);
            let repo = api
                .repository(name)
                .with_context(|_| format!("Unable to fetch the {} repository", name))?;

            Ok(vec![repo])
        }
        None => {
            debug!("Fetching all repositories");
            let all = api
                .repositories()
                .context("Unable to fetch the list of repositories")?;
            let total = all.len();

            let proxies: Vec<Repository> = all.into_iter().filter(Repository::is_listable).collect();

            debug!("{} of {} repositories are proxies worth listing", proxies.len(), total);
            Ok(proxies)
        }
    }
}
