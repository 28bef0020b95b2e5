//! Memoized selector parsing.
//!
//! The cache is owned by the caller and handed to a
//! [`QueryEngine`](crate::QueryEngine); nothing is cached behind the
//! caller's back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ast::Selector;
use crate::error::ParseError;
use crate::parser::parse_selector;

/// Parsed selector lists keyed by their source text.
///
/// Safe to share between threads. Selectors that fail to parse are not
/// cached, so the error is reported again on every attempt.
#[derive(Debug, Default)]
pub struct SelectorCache {
    entries: Mutex<HashMap<String, Arc<[Selector]>>>,
}

impl SelectorCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the parsed form of `input`, parsing it on first use.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] if `input` does not parse.
    pub fn get_or_parse(&self, input: &str) -> Result<Arc<[Selector]>, ParseError> {
        let cached = self.lock().get(input).cloned();
        if let Some(selectors) = cached {
            tracing::trace!(input, "selector cache hit");
            return Ok(selectors);
        }

        let selectors: Arc<[Selector]> = parse_selector(input)?.into();
        let _ = self
            .lock()
            .insert(input.to_string(), Arc::clone(&selectors));
        Ok(selectors)
    }

    /// Number of cached selector strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<[Selector]>>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
