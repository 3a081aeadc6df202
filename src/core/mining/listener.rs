// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listener callbacks for mining progress and streamed results.

use crate::core::pattern::{HybridTemporalPattern, Occurrence};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Summary emitted when a generation (level) completes
#[derive(Debug, Clone, Serialize)]
pub struct GenerationInfo {
    pub generation: usize,
    pub pattern_count: usize,
    pub timestamp_millis: i64,
}

impl GenerationInfo {
    pub(crate) fn now(generation: usize, pattern_count: usize) -> Self {
        Self {
            generation,
            pattern_count,
            timestamp_millis: now_millis(),
        }
    }
}

pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Occurrence payload of an emitted pattern: the streaming engine reports a
/// bare count because the backing storage is discarded right after emission
#[derive(Debug, Clone)]
pub enum EmittedOccurrences {
    Retained(Vec<Arc<Occurrence>>),
    Count(usize),
}

impl EmittedOccurrences {
    pub fn count(&self) -> usize {
        match self {
            EmittedOccurrences::Retained(occurrences) => occurrences.len(),
            EmittedOccurrences::Count(count) => *count,
        }
    }
}

/// One pattern handed to a listener
#[derive(Debug, Clone)]
pub struct EmittedPattern {
    pub pattern: Arc<HybridTemporalPattern>,
    pub occurrences: EmittedOccurrences,
}

/// Callback interface observed by all engine variants.
///
/// `patterns_emitted` receives a lazy, single-pass, non-restartable
/// iterator: the streaming engine discards the underlying storage as soon
/// as the call returns, so implementations must consume what they need
/// immediately.
pub trait MiningListener: Send {
    fn generation_complete(&mut self, _info: GenerationInfo) {}

    fn patterns_emitted(&mut self, _patterns: &mut dyn Iterator<Item = EmittedPattern>) {}
}

/// Listener that ignores everything
#[derive(Debug, Default)]
pub struct NoopListener;

impl MiningListener for NoopListener {}

/// Logs generation summaries and emitted pattern counts via `log`
#[derive(Debug, Default)]
pub struct LogMiningListener;

impl MiningListener for LogMiningListener {
    fn generation_complete(&mut self, info: GenerationInfo) {
        log::info!(
            "generation {} complete: {} patterns at {}",
            info.generation,
            info.pattern_count,
            info.timestamp_millis
        );
    }

    fn patterns_emitted(&mut self, patterns: &mut dyn Iterator<Item = EmittedPattern>) {
        for emitted in patterns {
            log::debug!(
                "pattern {} ({} occurrences)",
                emitted.pattern,
                emitted.occurrences.count()
            );
        }
    }
}

/// Collects everything it observes; test support
#[derive(Debug, Default)]
pub struct CollectingListener {
    pub generations: Vec<GenerationInfo>,
    pub patterns: Vec<EmittedPattern>,
}

impl CollectingListener {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MiningListener for CollectingListener {
    fn generation_complete(&mut self, info: GenerationInfo) {
        self.generations.push(info);
    }

    fn patterns_emitted(&mut self, patterns: &mut dyn Iterator<Item = EmittedPattern>) {
        self.patterns.extend(patterns);
    }
}
