//! Core domain types for the giveaway harvester.
//!
//! This module defines the data that crosses crate boundaries: the raw
//! giveaway facts a site adapter yields, the lazily resolved facts, entry
//! outcomes and the single `WorkResult` a worker reports per cycle.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::HarvestError;

// =============================================================================
// Type Aliases
// =============================================================================

/// Site-specific giveaway identifier (a code, a numeric id, ...)
pub type GiveawayId = String;

/// Virtual point amount (entry cost, balance)
pub type Points = u64;

/// Contributor level
pub type Level = u32;

/// Reputation of a giveaway's author; can be negative
pub type TrustScore = i64;

/// Set of platforms a game runs on
pub type PlatformSet = BTreeSet<Platform>;

// =============================================================================
// Platforms
// =============================================================================

/// Desktop platforms a giveaway's game may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "win")]
    Windows,
    #[serde(rename = "lin")]
    Linux,
    #[serde(rename = "mac")]
    Mac,
}

impl Platform {
    pub fn token(self) -> &'static str {
        match self {
            Platform::Windows => "win",
            Platform::Linux => "lin",
            Platform::Mac => "mac",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Platform {
    type Err = HarvestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" => Ok(Platform::Windows),
            "lin" => Ok(Platform::Linux),
            "mac" => Ok(Platform::Mac),
            other => Err(HarvestError::InvalidFilterArgument {
                name: "os".to_string(),
                value: other.to_string(),
                reason: "expected one of win, lin, mac, all".to_string(),
            }),
        }
    }
}

// =============================================================================
// Candidate Facts
// =============================================================================

/// Eager facts about one giveaway, as read off a listing page.
///
/// Everything else about a giveaway is resolved lazily through the site
/// adapter; see [`Fact`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidateFacts {
    pub id: GiveawayId,
    pub title: String,
    pub link: String,
    /// Entry cost in points
    pub cost: Points,
    /// Minimum contributor level required to enter
    #[serde(default)]
    pub level: Level,
    /// Already entered by this account
    #[serde(default)]
    pub entered: bool,
    /// Lazy facts the listing happened to carry already
    #[serde(default)]
    pub preloaded: PreloadedFacts,
}

impl RawCandidateFacts {
    pub fn new(
        id: impl Into<GiveawayId>,
        title: impl Into<String>,
        link: impl Into<String>,
        cost: Points,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            link: link.into(),
            cost,
            level: 0,
            entered: false,
            preloaded: PreloadedFacts::default(),
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_entered(mut self, entered: bool) -> Self {
        self.entered = entered;
        self
    }

    pub fn with_preloaded(mut self, preloaded: PreloadedFacts) -> Self {
        self.preloaded = preloaded;
        self
    }
}

/// Lazy facts known up front. `None` means "ask the adapter when needed".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreloadedFacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wishlisted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dlc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust: Option<TrustScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<PlatformSet>,
}

/// Per-candidate facts that cost an external lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fact {
    Owned,
    Wishlisted,
    Dlc,
    TradingCards,
    Trust,
    Platforms,
}

impl Fact {
    pub fn name(self) -> &'static str {
        match self {
            Fact::Owned => "owned",
            Fact::Wishlisted => "wishlisted",
            Fact::Dlc => "dlc",
            Fact::TradingCards => "cards",
            Fact::Trust => "trust",
            Fact::Platforms => "platforms",
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of a resolved [`Fact`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactValue {
    Flag(bool),
    Score(TrustScore),
    Platforms(PlatformSet),
}

// =============================================================================
// Claims and Entries
// =============================================================================

/// One row of a site's won/completed listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawClaimFacts {
    pub title: String,
    pub link: String,
    /// The user already acknowledged receiving the prize
    #[serde(default)]
    pub acknowledged: bool,
}

/// A giveaway reported back to the user: entered, or won and unclaimed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub title: String,
    pub link: String,
}

impl EntryRecord {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

/// Result of a remote entry attempt.
///
/// Rejections (including ambiguous responses) are recoverable and never
/// abort a harvesting cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Entered,
    Rejected { reason: String },
}

// =============================================================================
// Work Result
// =============================================================================

/// The single message a worker emits per cycle.
///
/// Serialized as one JSON line (`{"status":"ok",...}`) when it crosses the
/// worker process boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WorkResult {
    Ok {
        timestamp: DateTime<Local>,
        entered: Vec<EntryRecord>,
        claimed: Vec<EntryRecord>,
    },
    Error {
        timestamp: DateTime<Local>,
        message: String,
    },
}

impl WorkResult {
    pub fn ok(entered: Vec<EntryRecord>, claimed: Vec<EntryRecord>) -> Self {
        WorkResult::Ok {
            timestamp: Local::now(),
            entered,
            claimed,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        WorkResult::Error {
            timestamp: Local::now(),
            message: message.into(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        match self {
            WorkResult::Ok { timestamp, .. } | WorkResult::Error { timestamp, .. } => *timestamp,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, WorkResult::Ok { .. })
    }

    /// Encode as a single JSON line (no trailing newline)
    pub fn to_line(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(|e| HarvestError::Parse {
            file: "work result".to_string(),
            reason: e.to_string(),
        })
    }

    /// Decode a line produced by [`WorkResult::to_line`]
    pub fn from_line(line: &str) -> crate::Result<Self> {
        serde_json::from_str(line.trim()).map_err(|e| HarvestError::Parse {
            file: "work result".to_string(),
            reason: e.to_string(),
        })
    }
}
