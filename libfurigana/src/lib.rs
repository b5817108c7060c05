//! libfurigana crate root
//!
//! Front end for the `libnihongo-core` pipeline: dictionary providers, the
//! front-end configuration and session construction used by the `furigana`
//! binary.
//!
//! Public API exported here:
//! - `JishoLookup` from `jisho` (web search API)
//! - `JmdictIndex` from `jmdict` (local FST + bincode index)
//! - `LinderaTokenizer` from `lindera` (feature `lindera`)
//! - `FuriganaConfig` from `config`

pub mod config;
pub mod jisho;
pub mod jmdict;
#[cfg(feature = "lindera")]
pub mod lindera;

pub use config::FuriganaConfig;
pub use jisho::JishoLookup;
pub use jmdict::{JmdictEntry, JmdictIndex};
#[cfg(feature = "lindera")]
pub use lindera::LinderaTokenizer;

// Convenience re-exports for common types used by callers.
pub use libnihongo_core::{
    DiffKind, DiffOperation, DictionaryEntry, FuriganaEngine, FuriganaSegment, RenderedToken,
    WordLookup,
};

use anyhow::Context;
use std::sync::Arc;

/// Dictionary provider selected by `config`: the local index when
/// `jmdict_dir` is set, else the web search API; `None` when offline.
pub fn build_provider(config: &FuriganaConfig, offline: bool) -> anyhow::Result<Option<Arc<dyn WordLookup>>> {
    if let Some(dir) = &config.jmdict_dir {
        let index = JmdictIndex::load(dir).with_context(|| format!("loading JMdict index from {}", dir.display()))?;
        return Ok(Some(Arc::new(index)));
    }
    if offline {
        return Ok(None);
    }
    Ok(Some(Arc::new(JishoLookup::from_config(config)?)))
}

/// Engine for one session: configured overrides, the dictionary provider and,
/// with the `lindera` feature, the IPADIC tokenizer.
pub fn build_engine(config: &FuriganaConfig, offline: bool) -> anyhow::Result<FuriganaEngine> {
    let mut engine = FuriganaEngine::new(config.base.clone()).context("creating engine")?;
    if let Some(provider) = build_provider(config, offline)? {
        engine = engine.with_lookup(provider);
    }
    #[cfg(feature = "lindera")]
    {
        engine = engine.with_tokenizer(Arc::new(LinderaTokenizer::new()?));
    }
    Ok(engine)
}
