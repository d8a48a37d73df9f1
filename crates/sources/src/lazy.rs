//! Memoizing cache cell for expensive per-candidate facts.
//!
//! A `LazyFact` is resolved at most once. Reads after the first successful
//! resolution return the cached value; a failed resolution caches nothing and
//! the error propagates to the caller.

use model::{HarvestError, Result};
use std::cell::{Cell, OnceCell};
use std::fmt;

pub struct LazyFact<T> {
    cell: OnceCell<T>,
    resolving: Cell<bool>,
}

impl<T> LazyFact<T> {
    /// An unresolved cell
    pub fn empty() -> Self {
        Self {
            cell: OnceCell::new(),
            resolving: Cell::new(false),
        }
    }

    /// A cell that already holds its value (preloaded by the listing)
    pub fn resolved(value: T) -> Self {
        let lazy = Self::empty();
        let _ = lazy.cell.set(value);
        lazy
    }

    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::resolved(value),
            None => Self::empty(),
        }
    }

    /// The cached value, without resolving
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Return the cached value or run `resolve` exactly once to produce it.
    ///
    /// A read issued from inside `resolve` for the same cell fails instead of
    /// starting a second resolution.
    pub fn get_or_resolve<F>(&self, name: &str, resolve: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        if self.resolving.replace(true) {
            return Err(HarvestError::fetch(
                name,
                "re-entrant read while the fact is being resolved",
            ));
        }

        let outcome = resolve();
        self.resolving.set(false);

        let value = outcome?;
        Ok(self.cell.get_or_init(|| value))
    }

    /// Forget the cached value. Cycles are short-lived, so the harvester
    /// itself never needs this.
    pub fn invalidate(&mut self) {
        self.cell.take();
    }
}

impl<T> Default for LazyFact<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyFact<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => write!(f, "LazyFact({:?})", value),
            None => f.write_str("LazyFact(<unresolved>)"),
        }
    }
}
