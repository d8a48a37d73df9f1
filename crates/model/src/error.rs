//! Error types shared by every harvester crate.
//!
//! Fatal conditions (session, fetch, configuration) travel as `HarvestError`
//! until the worker turns them into an `error` work result. Recoverable
//! per-candidate entry failures are not errors at all, see
//! [`EntryOutcome`](crate::EntryOutcome).

use thiserror::Error;

/// Errors that can occur while building filter chains or harvesting a site
#[derive(Error, Debug)]
pub enum HarvestError {
    /// The authenticated page did not carry the logged-in marker
    #[error("Can't login to {site}. Check the session cookie.")]
    Session { site: String },

    /// An external read (page, fact, balance, listing) failed
    #[error("Failed to fetch {what}: {reason}")]
    Fetch { what: String, reason: String },

    /// Filter token that no registered filter answers to
    #[error("Unknown filter '{name}'")]
    UnknownFilter { name: String },

    /// Parameterized filter configured without its argument
    #[error("Filter '{name}' requires an argument")]
    MissingFilterArgument { name: String },

    /// Argument present but not usable by the filter
    #[error("Invalid argument '{value}' for filter '{name}': {reason}")]
    InvalidFilterArgument {
        name: String,
        value: String,
        reason: String,
    },

    /// Bare filter configured with an argument
    #[error("Filter '{name}' takes no argument (got '{value}')")]
    UnexpectedArgument { name: String, value: String },

    /// Adapter answered a fact query with a value of the wrong shape
    #[error("Fact '{fact}' resolved to an unexpected value")]
    FactMismatch { fact: String },

    /// Site name not present in the configuration
    #[error("Unknown site '{0}'")]
    UnknownSite(String),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error while reading configuration or snapshots
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot or config document could not be decoded
    #[error("Parse error in {file}: {reason}")]
    Parse { file: String, reason: String },
}

impl HarvestError {
    /// Shorthand for a [`HarvestError::Fetch`]
    pub fn fetch(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// True for errors raised while assembling a filter chain
    pub fn is_filter_config(&self) -> bool {
        matches!(
            self,
            Self::UnknownFilter { .. }
                | Self::MissingFilterArgument { .. }
                | Self::InvalidFilterArgument { .. }
                | Self::UnexpectedArgument { .. }
        )
    }
}

/// Convenience type alias for Results in the harvester crates
pub type Result<T> = std::result::Result<T, HarvestError>;
