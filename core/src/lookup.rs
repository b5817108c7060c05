//! Dictionary lookup with a session cache and single-flight requests.
//!
//! Responsibilities:
//! - normalise the lookup key (strip non-Japanese edges, fall back to the
//!   first kanji-bearing Japanese run)
//! - pick the best candidate a provider returns for a query
//! - cache every result, including "no result", for the life of the client
//! - never run two provider requests for the same key at once
//! - bound each request with a timeout; timeouts and provider errors resolve
//!   to `None` and are cached like any other miss
//!
//! Providers are blocking. Each request runs on a helper thread that the
//! caller waits on with `recv_timeout`; a request that outlives the timeout is
//! abandoned, not cancelled.

use crate::charclass::{has_kanji, japanese_runs, trim_non_japanese};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread;
use std::time::Duration;

/// A resolved dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    pub reading: String,
    pub meaning: String,
}

/// One surface/reading form returned by a provider, with its English glosses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WordCandidate {
    pub word: String,
    pub reading: String,
    pub glosses: Vec<String>,
}

impl WordCandidate {
    pub fn new<W: Into<String>, R: Into<String>>(word: W, reading: R, glosses: Vec<String>) -> Self {
        Self {
            word: word.into(),
            reading: reading.into(),
            glosses,
        }
    }

    /// Build the entry shown for `query`: at most three glosses.
    pub fn to_entry(&self, query: &str) -> DictionaryEntry {
        let word = if self.word.is_empty() {
            query.to_string()
        } else {
            self.word.clone()
        };
        let meaning = self
            .glosses
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("; ");
        DictionaryEntry {
            word,
            reading: self.reading.clone(),
            meaning,
        }
    }
}

/// A word-lookup backend (web API, local index, ...).
pub trait WordLookup: Send + Sync {
    /// Candidate forms for `word`, in the provider's own order.
    fn search(&self, word: &str) -> anyhow::Result<Vec<WordCandidate>>;

    fn name(&self) -> &'static str {
        "lookup"
    }
}

fn candidate_score(candidate: &WordCandidate, query: &str) -> i32 {
    let word = candidate.word.as_str();
    let reading = candidate.reading.as_str();
    let mut score = 0;
    if !word.is_empty() && word == query {
        score += 100;
    }
    if !reading.is_empty() && reading == query {
        score += 90;
    }
    if !word.is_empty() && word.starts_with(query) {
        score += 80;
    }
    if !word.is_empty() && query.starts_with(word) {
        score += 70;
    }
    if !reading.is_empty() && reading.starts_with(query) {
        score += 60;
    }
    if !reading.is_empty() && query.starts_with(reading) {
        score += 50;
    }
    if has_kanji(word) && has_kanji(query) {
        score += 10;
    }
    score
}

/// Highest-scoring candidate for `query`; the first one seen wins ties.
pub fn select_best_entry<'a>(candidates: &'a [WordCandidate], query: &str) -> Option<&'a WordCandidate> {
    let query = query.trim();
    let mut best: Option<(&WordCandidate, i32)> = None;
    for candidate in candidates {
        let score = candidate_score(candidate, query);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best.map(|(c, _)| c)
}

/// Key under which a token is looked up and cached.
///
/// ```
/// use libnihongo_core::lookup::normalize_lookup_key;
///
/// assert_eq!(normalize_lookup_key("「食べる」"), "食べる");
/// assert_eq!(normalize_lookup_key("abc"), "abc");
/// ```
pub fn normalize_lookup_key(token: &str) -> String {
    if token.is_empty() {
        return String::new();
    }
    let trimmed = trim_non_japanese(token);
    if !trimmed.is_empty() {
        return trimmed;
    }
    let runs = japanese_runs(token);
    match runs.iter().find(|r| has_kanji(r)).or_else(|| runs.first()) {
        Some(run) => run.to_string(),
        None => token.to_string(),
    }
}

type Cell = Arc<OnceLock<Option<DictionaryEntry>>>;

/// Cached, single-flight dictionary client.
pub struct LookupClient {
    provider: Arc<dyn WordLookup>,
    timeout: Duration,
    cells: Mutex<HashMap<String, Cell>>,
    hits: AtomicUsize,
    requests: AtomicUsize,
}

impl LookupClient {
    pub fn new(provider: Arc<dyn WordLookup>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            cells: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            requests: AtomicUsize::new(0),
        }
    }

    fn cells(&self) -> MutexGuard<'_, HashMap<String, Cell>> {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve `word`, blocking until the result is known or the timeout
    /// elapses. Words without kanji are never looked up.
    pub fn lookup(&self, word: &str) -> Option<DictionaryEntry> {
        let key = normalize_lookup_key(word);
        if key.is_empty() || !has_kanji(&key) {
            return None;
        }

        let cell = Arc::clone(self.cells().entry(key.clone()).or_default());
        if let Some(resolved) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return resolved.clone();
        }
        // Concurrent callers for the same key block here on the same cell;
        // only the first runs the initialiser.
        cell.get_or_init(|| self.fetch(&key)).clone()
    }

    /// Start a background lookup for `word` unless it is resolved or already
    /// in flight. Returns immediately; the result lands in the cache.
    pub fn prefetch(self: &Arc<Self>, word: &str) {
        let key = normalize_lookup_key(word);
        if key.is_empty() || !has_kanji(&key) || self.cells().contains_key(&key) {
            return;
        }
        let client = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name("dictionary-prefetch".into())
            .spawn(move || {
                client.lookup(&key);
            });
        if let Err(err) = spawned {
            tracing::warn!(word, error = %err, "could not start prefetch thread");
        }
    }

    /// The cached result for `word` without triggering a request.
    ///
    /// `None` means "not resolved yet"; `Some(None)` means "resolved, no entry".
    pub fn cached(&self, word: &str) -> Option<Option<DictionaryEntry>> {
        let key = normalize_lookup_key(word);
        self.cells().get(&key).and_then(|cell| cell.get().cloned())
    }

    /// True while a request for `word` is in flight.
    pub fn is_pending(&self, word: &str) -> bool {
        let key = normalize_lookup_key(word);
        self.cells().get(&key).is_some_and(|cell| cell.get().is_none())
    }

    /// Number of resolved keys (including misses).
    pub fn cache_len(&self) -> usize {
        self.cells().values().filter(|c| c.get().is_some()).count()
    }

    /// (cache hits, provider requests) since construction.
    pub fn stats(&self) -> (usize, usize) {
        (
            self.hits.load(Ordering::Relaxed),
            self.requests.load(Ordering::Relaxed),
        )
    }

    fn fetch(&self, key: &str) -> Option<DictionaryEntry> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(provider = self.provider.name(), key, "dictionary lookup");

        let (tx, rx) = mpsc::channel();
        let provider = Arc::clone(&self.provider);
        let query = key.to_string();
        let spawned = thread::Builder::new()
            .name("dictionary-lookup".into())
            .spawn(move || {
                // The receiver is gone after a timeout; nothing left to do.
                let _ = tx.send(provider.search(&query));
            });
        if let Err(err) = spawned {
            tracing::warn!(key, error = %err, "could not start lookup thread");
            return None;
        }

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(candidates)) => {
                let entry = select_best_entry(&candidates, key).map(|c| c.to_entry(key));
                tracing::debug!(key, found = entry.is_some(), "dictionary lookup finished");
                entry
            }
            Ok(Err(err)) => {
                tracing::warn!(provider = self.provider.name(), key, error = %err, "dictionary lookup failed");
                None
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!(key, timeout_ms = self.timeout.as_millis() as u64, "dictionary lookup timed out");
                None
            }
            Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!(provider = self.provider.name(), key, "lookup provider panicked");
                None
            }
        }
    }
}

impl std::fmt::Debug for LookupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupClient")
            .field("provider", &self.provider.name())
            .field("timeout", &self.timeout)
            .field("cached", &self.cache_len())
            .finish()
    }
}
