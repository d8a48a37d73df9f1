//! Filter on the platforms a giveaway's game runs on.

use crate::chain::FilterSpec;
use crate::filters::retain;
use crate::traits::{ConfiguredFilter, Filter, FilterContext};
use model::{Platform, Result};
use sources::Candidate;

/// Keeps games supporting one platform (`os=win|lin|mac`).
///
/// `os=all` accepts every game and resolves nothing.
pub struct PlatformFilter {
    platform: Option<Platform>,
    label: String,
}

impl PlatformFilter {
    pub fn new(platform: Option<Platform>) -> Self {
        let label = match platform {
            Some(p) => format!("os={}", p),
            None => "os=all".to_string(),
        };
        Self { platform, label }
    }
}

impl Filter for PlatformFilter {
    fn name(&self) -> &str {
        &self.label
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &FilterContext<'_>,
    ) -> Result<Vec<Candidate>> {
        let Some(platform) = self.platform else {
            return Ok(candidates);
        };
        retain(candidates, |c| {
            Ok(c.platforms(context.resolver)?.contains(&platform))
        })
    }
}

impl ConfiguredFilter for PlatformFilter {
    fn from_spec(spec: &FilterSpec) -> Result<Self> {
        let arg = spec.required_arg()?;
        let platform = if arg.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(arg.parse::<Platform>()?)
        };
        Ok(Self::new(platform))
    }
}
