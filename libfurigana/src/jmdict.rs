//! Local JMdict index as a [`WordLookup`] provider.
//!
//! Layout on disk (written by `jmdict_build`):
//! - `jmdict.fst`: every kanji form and reading → index into the payload vector
//! - `jmdict.bincode`: `Vec<Vec<JmdictEntry>>`, the entries listing that key
//!
//! Exact keys are answered directly; otherwise up to [`PREFIX_LIMIT`] keys
//! starting with the query are used, which is close to what the web search
//! returns for a bare word.

use anyhow::Context;
use fst::{automaton::Str, Automaton, IntoStreamer, Map, MapBuilder, Streamer};
use libnihongo_core::{Error, WordCandidate, WordLookup};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

pub const FST_FILE: &str = "jmdict.fst";
pub const PAYLOAD_FILE: &str = "jmdict.bincode";

/// Keys consulted when a query has no exact match.
pub const PREFIX_LIMIT: usize = 10;

/// One JMdict entry, reduced to what lookups need.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct JmdictEntry {
    /// `keb` elements, in dictionary order.
    pub words: Vec<String>,
    /// `reb` elements, in dictionary order.
    pub readings: Vec<String>,
    /// English `gloss` elements, senses in order.
    pub glosses: Vec<String>,
}

impl JmdictEntry {
    /// Distinct lookup keys of this entry.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.words
            .iter()
            .chain(&self.readings)
            .map(String::as_str)
            .filter(|k| !k.is_empty())
            .collect()
    }

    /// One candidate per kanji form, paired with the first reading; kana-only
    /// entries give one candidate per reading.
    pub fn candidates(&self) -> Vec<WordCandidate> {
        if self.words.is_empty() {
            return self
                .readings
                .iter()
                .map(|r| WordCandidate::new("", r.as_str(), self.glosses.clone()))
                .collect();
        }
        let reading = self.readings.first().map(String::as_str).unwrap_or("");
        self.words
            .iter()
            .map(|w| WordCandidate::new(w.as_str(), reading, self.glosses.clone()))
            .collect()
    }
}

/// Serialised index: (fst bytes, bincode payload bytes).
pub fn build_index_bytes(entries: &[JmdictEntry]) -> anyhow::Result<(Vec<u8>, Vec<u8>)> {
    let mut grouped: BTreeMap<&str, Vec<JmdictEntry>> = BTreeMap::new();
    for entry in entries {
        for key in entry.keys() {
            grouped.entry(key).or_default().push(entry.clone());
        }
    }

    let mut builder = MapBuilder::memory();
    let mut payloads: Vec<Vec<JmdictEntry>> = Vec::with_capacity(grouped.len());
    for (i, (key, list)) in grouped.into_iter().enumerate() {
        builder.insert(key, i as u64)?;
        payloads.push(list);
    }
    let fst_bytes = builder.into_inner()?;
    let payload_bytes = bincode::serialize(&payloads)?;
    Ok((fst_bytes, payload_bytes))
}

/// Write `jmdict.fst` and `jmdict.bincode` into `out_dir`.
pub fn write_index<P: AsRef<Path>>(entries: &[JmdictEntry], out_dir: P) -> anyhow::Result<()> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let (fst_bytes, payload_bytes) = build_index_bytes(entries)?;
    fs::write(out_dir.join(FST_FILE), fst_bytes)?;
    fs::write(out_dir.join(PAYLOAD_FILE), payload_bytes)?;
    Ok(())
}

/// Read-only FST + bincode dictionary.
pub struct JmdictIndex {
    map: Map<Vec<u8>>,
    payloads: Vec<Vec<JmdictEntry>>,
}

impl JmdictIndex {
    pub fn from_bytes(fst_bytes: Vec<u8>, payload_bytes: &[u8]) -> anyhow::Result<Self> {
        let map = Map::new(fst_bytes).context("fst map")?;
        let payloads: Vec<Vec<JmdictEntry>> =
            bincode::deserialize(payload_bytes).context("deserialize bincode")?;
        Ok(Self { map, payloads })
    }

    /// In-memory index over `entries`.
    pub fn from_entries(entries: &[JmdictEntry]) -> anyhow::Result<Self> {
        let (fst_bytes, payload_bytes) = build_index_bytes(entries)?;
        Self::from_bytes(fst_bytes, &payload_bytes)
    }

    /// Load the artifacts written by [`write_index`] from `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> libnihongo_core::Result<Self> {
        let dir = dir.as_ref();
        let fst_path = dir.join(FST_FILE);
        let payload_path = dir.join(PAYLOAD_FILE);
        let fst_bytes = fs::read(&fst_path).map_err(|source| Error::Io {
            path: fst_path.clone(),
            source,
        })?;
        let payload_bytes = fs::read(&payload_path).map_err(|source| Error::Io {
            path: payload_path.clone(),
            source,
        })?;
        let index = Self::from_bytes(fst_bytes, &payload_bytes).map_err(|e| Error::index(dir, format!("{e:#}")))?;
        tracing::info!(path = %dir.display(), keys = index.len(), "loaded JMdict index");
        Ok(index)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries listing `key` as a kanji form or reading.
    pub fn get(&self, key: &str) -> &[JmdictEntry] {
        self.map
            .get(key)
            .and_then(|i| self.payloads.get(i as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Up to `limit` keys starting with `prefix`, in key order.
    pub fn prefix_keys(&self, prefix: &str, limit: usize) -> Vec<String> {
        let matcher = Str::new(prefix).starts_with();
        let mut stream = self.map.search(matcher).into_stream();
        let mut keys = Vec::new();
        while let Some((key, _)) = stream.next() {
            if keys.len() >= limit {
                break;
            }
            if let Ok(key) = std::str::from_utf8(key) {
                keys.push(key.to_string());
            }
        }
        keys
    }
}

impl WordLookup for JmdictIndex {
    fn search(&self, word: &str) -> anyhow::Result<Vec<WordCandidate>> {
        let mut entries: Vec<&JmdictEntry> = self.get(word).iter().collect();
        if entries.is_empty() {
            for key in self.prefix_keys(word, PREFIX_LIMIT) {
                for entry in self.get(&key) {
                    if !entries.contains(&entry) {
                        entries.push(entry);
                    }
                }
            }
        }
        Ok(entries.into_iter().flat_map(JmdictEntry::candidates).collect())
    }

    fn name(&self) -> &'static str {
        "jmdict"
    }
}

impl std::fmt::Debug for JmdictIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JmdictIndex").field("keys", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(words: &[&str], readings: &[&str], glosses: &[&str]) -> JmdictEntry {
        JmdictEntry {
            words: words.iter().map(|s| s.to_string()).collect(),
            readings: readings.iter().map(|s| s.to_string()).collect(),
            glosses: glosses.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sample() -> Vec<JmdictEntry> {
        vec![
            entry(&["日本"], &["にほん", "にっぽん"], &["Japan"]),
            entry(&["日本人"], &["にほんじん"], &["Japanese person"]),
            entry(&[], &["ひらがな"], &["hiragana"]),
            entry(&["行く", "往く"], &["いく", "ゆく"], &["to go", "to move"]),
        ]
    }

    #[test]
    fn test_candidates_pair_words_with_first_reading() {
        let e = &sample()[3];
        let candidates = e.candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].word, "往く");
        assert_eq!(candidates[1].reading, "いく");
        assert_eq!(sample()[2].candidates()[0].word, "");
    }

    #[test]
    fn test_exact_lookup_by_word_and_reading() {
        let index = JmdictIndex::from_entries(&sample()).unwrap();
        assert_eq!(index.get("日本").len(), 1);
        assert_eq!(index.get("にっぽん")[0].words, vec!["日本"]);
        assert!(index.get("東京").is_empty());
        // 日本 ×1, にほん, にっぽん, 日本人, にほんじん, ひらがな, 行く, 往く, いく, ゆく
        assert_eq!(index.len(), 10);
    }

    #[test]
    fn test_prefix_fallback() {
        let index = JmdictIndex::from_entries(&sample()).unwrap();
        assert_eq!(index.prefix_keys("日", 10), vec!["日本", "日本人"]);
        assert_eq!(index.prefix_keys("日", 1), vec!["日本"]);

        let candidates = index.search("日").unwrap();
        let words: Vec<&str> = candidates.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["日本", "日本人"]);
    }

    #[test]
    fn test_search_exact_does_not_widen() {
        let index = JmdictIndex::from_entries(&sample()).unwrap();
        let candidates = index.search("日本").unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(index.search("zzz").unwrap().is_empty());
    }
}
