//! Filters on the user's relation to a giveaway's game.

use crate::chain::FilterSpec;
use crate::filters::retain;
use crate::traits::{ConfiguredFilter, Filter, FilterContext};
use model::Result;
use sources::Candidate;

/// Removes games already in the user's library (`library`).
pub struct AlreadyOwnedFilter;

impl Filter for AlreadyOwnedFilter {
    fn name(&self) -> &str {
        "library"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &FilterContext<'_>,
    ) -> Result<Vec<Candidate>> {
        retain(candidates, |c| Ok(!c.is_owned(context.resolver)?))
    }
}

impl ConfiguredFilter for AlreadyOwnedFilter {
    fn from_spec(spec: &FilterSpec) -> Result<Self> {
        spec.expect_bare()?;
        Ok(Self)
    }
}

/// Keeps only games on the user's wishlist (`wishlist`).
pub struct WishlistFilter;

impl Filter for WishlistFilter {
    fn name(&self) -> &str {
        "wishlist"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &FilterContext<'_>,
    ) -> Result<Vec<Candidate>> {
        retain(candidates, |c| c.is_wishlisted(context.resolver))
    }
}

impl ConfiguredFilter for WishlistFilter {
    fn from_spec(spec: &FilterSpec) -> Result<Self> {
        spec.expect_bare()?;
        Ok(Self)
    }
}
