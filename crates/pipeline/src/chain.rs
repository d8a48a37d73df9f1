//! Filter tokens and chain assembly.
//!
//! A configured chain is a list of tokens, each either a bare filter name or
//! `name=argument`. The effective chain for a site is the site's required
//! filters followed by the configured ones, minus duplicates and disabled
//! filters, with the wishlist/library exclusion applied.

use model::{HarvestError, Result, SiteConfig};
use std::fmt;
use std::str::FromStr;

/// Filter names with special meaning during chain assembly
pub const WISHLIST: &str = "wishlist";
pub const LIBRARY: &str = "library";

/// Where a filter in the chain came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Site default, not asked for by the user
    Implicit,
    /// Listed in the user's configuration
    Explicit,
}

/// One entry of a filter chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    name: String,
    arg: Option<String>,
    origin: Origin,
}

impl FilterSpec {
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg: None,
            origin: Origin::Explicit,
        }
    }

    pub fn with_arg(name: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg: Some(arg.into()),
            origin: Origin::Explicit,
        }
    }

    pub fn implicit(mut self) -> Self {
        self.origin = Origin::Implicit;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arg(&self) -> Option<&str> {
        self.arg.as_deref()
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Same filter and argument, regardless of origin
    pub fn same_filter(&self, other: &FilterSpec) -> bool {
        self.name == other.name && self.arg == other.arg
    }

    /// Numeric argument of a parameterized filter
    pub fn numeric_arg<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.required_arg()?;
        raw.parse::<T>()
            .map_err(|e| HarvestError::InvalidFilterArgument {
                name: self.name.clone(),
                value: raw.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn required_arg(&self) -> Result<&str> {
        self.arg().ok_or_else(|| HarvestError::MissingFilterArgument {
            name: self.name.clone(),
        })
    }

    /// Fail if a bare-only filter was given an argument
    pub fn expect_bare(&self) -> Result<()> {
        match &self.arg {
            None => Ok(()),
            Some(value) => Err(HarvestError::UnexpectedArgument {
                name: self.name.clone(),
                value: value.clone(),
            }),
        }
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "{}={}", self.name, arg),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for FilterSpec {
    type Err = HarvestError;

    fn from_str(token: &str) -> Result<Self> {
        let token = token.trim();
        let spec = match token.split_once('=') {
            Some((name, arg)) => FilterSpec::with_arg(name.trim(), arg.trim()),
            None => FilterSpec::bare(token),
        };
        if spec.name.is_empty() {
            return Err(HarvestError::Config(format!("empty filter name in '{}'", token)));
        }
        Ok(spec)
    }
}

/// Parse configured items into specs. Items may themselves hold several
/// comma separated tokens; empty tokens are ignored.
pub fn parse_tokens<S: AsRef<str>>(items: &[S]) -> Result<Vec<FilterSpec>> {
    items
        .iter()
        .flat_map(|item| item.as_ref().split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(FilterSpec::from_str)
        .collect()
}

/// Effective, ordered filter chain of one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChain {
    specs: Vec<FilterSpec>,
    internal: Vec<String>,
}

impl FilterChain {
    /// Assemble the effective chain from a site's configuration
    pub fn for_site(site: &SiteConfig) -> Result<Self> {
        Ok(Self::assemble(
            parse_tokens(&site.required_filters)?,
            parse_tokens(&site.filters)?,
            site.disabled_filters.as_slice(),
            site.internal_filters.as_slice(),
        ))
    }

    /// Build a chain from required (implicit) and configured (explicit) specs.
    ///
    /// 1. required filters first, in order
    /// 2. configured filters appended, duplicates skipped
    /// 3. disabled filter names removed
    /// 4. `library` dropped when `wishlist` is present and `library` is implicit
    pub fn assemble<S: AsRef<str>>(
        required: Vec<FilterSpec>,
        configured: Vec<FilterSpec>,
        disabled: &[S],
        internal: &[S],
    ) -> Self {
        let mut specs: Vec<FilterSpec> = Vec::new();
        let incoming = required
            .into_iter()
            .map(FilterSpec::implicit)
            .chain(configured);

        for spec in incoming {
            match specs.iter_mut().find(|s| s.same_filter(&spec)) {
                // An explicit request upgrades an implicit default in place
                Some(existing) => {
                    if spec.origin == Origin::Explicit {
                        existing.origin = Origin::Explicit;
                    }
                }
                None => specs.push(spec),
            }
        }

        specs.retain(|s| !disabled.iter().any(|d| d.as_ref() == s.name));

        if specs.iter().any(|s| s.name == WISHLIST) {
            specs.retain(|s| !(s.name == LIBRARY && s.origin == Origin::Implicit));
        }

        Self {
            specs,
            internal: internal.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// All specs of the effective chain, in order
    pub fn specs(&self) -> &[FilterSpec] {
        &self.specs
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.iter().any(|s| s.name == name)
    }

    pub fn is_internal(&self, spec: &FilterSpec) -> bool {
        self.internal.iter().any(|name| name == spec.name())
    }

    /// Specs the client-side pipeline has to run (internal ones excluded)
    pub fn client_side(&self) -> impl Iterator<Item = &FilterSpec> {
        self.specs.iter().filter(|s| !self.is_internal(s))
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self.specs.iter().map(|s| s.to_string()).collect();
        f.write_str(&tokens.join(", "))
    }
}
