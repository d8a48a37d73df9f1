//! Claim scanner ("reap").
//!
//! Read-only pass over a site's won listing, run after every sow. Only wins
//! the user has not acknowledged yet are reported.

use model::{EntryRecord, Result};
use sources::ClaimSource;
use tracing::{debug, instrument};

/// Collect unacknowledged wins as `{title, link}` records
#[instrument(skip(site))]
pub fn reap<S: ClaimSource + ?Sized>(site: &S) -> Result<Vec<EntryRecord>> {
    let listing = site.fetch_claims_listing()?;
    let total = listing.len();

    let claimed: Vec<EntryRecord> = listing
        .into_iter()
        .filter(|item| !item.acknowledged)
        .map(|item| EntryRecord::new(item.title, item.link))
        .collect();

    debug!("{} of {} won giveaways unacknowledged", claimed.len(), total);
    Ok(claimed)
}
