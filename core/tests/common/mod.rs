// core/tests/common/mod.rs
//
// Fixtures shared by the integration tests: a longest-match lexicon
// tokenizer standing in for a dictionary tokenizer, and a word-lookup
// provider that counts its invocations.

#![allow(dead_code)]

use libnihongo_core::{Morpheme, MorphTokenizer, WordCandidate, WordLookup};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Greedy longest-match over a fixed surface → reading table. Digit runs
/// become one morpheme; anything else unknown is a single char with the
/// "no reading" sentinel.
pub struct LexiconTokenizer {
    entries: HashMap<String, String>,
    longest: usize,
}

impl LexiconTokenizer {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        let entries: HashMap<String, String> = entries
            .iter()
            .map(|(s, r)| (s.to_string(), r.to_string()))
            .collect();
        let longest = entries.keys().map(|k| k.chars().count()).max().unwrap_or(1);
        Self { entries, longest }
    }
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit() || ('０'..='９').contains(&ch)
}

impl MorphTokenizer for LexiconTokenizer {
    fn tokenize(&self, text: &str) -> anyhow::Result<Vec<Morpheme>> {
        let chars: Vec<char> = text.chars().collect();
        let mut out = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let max = self.longest.min(chars.len() - i);
            let matched = (1..=max).rev().find_map(|len| {
                let surface: String = chars[i..i + len].iter().collect();
                self.entries.get(&surface).map(|r| (len, surface, r.clone()))
            });
            if let Some((len, surface, reading)) = matched {
                out.push(Morpheme::new(surface, reading));
                i += len;
                continue;
            }
            let mut end = i + 1;
            if is_digit(chars[i]) {
                while end < chars.len() && is_digit(chars[end]) {
                    end += 1;
                }
            }
            out.push(Morpheme::new(chars[i..end].iter().collect::<String>(), "*"));
            i = end;
        }
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "lexicon-fixture"
    }
}

/// Word lookup over a fixed table that counts calls and can be slowed down.
pub struct CountingLookup {
    entries: HashMap<String, (String, Vec<String>)>,
    delay: Duration,
    calls: AtomicUsize,
}

impl CountingLookup {
    pub fn new(entries: &[(&str, &str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(w, r, g)| (w.to_string(), (r.to_string(), vec![g.to_string()])))
                .collect(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WordLookup for CountingLookup {
    fn search(&self, word: &str) -> anyhow::Result<Vec<WordCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(self
            .entries
            .get(word)
            .map(|(reading, glosses)| vec![WordCandidate::new(word, reading.as_str(), glosses.clone())])
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "counting-fixture"
    }
}
