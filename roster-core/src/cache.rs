//! Content-keyed memoization of parsed schedules

use crate::config::RosterConfig;
use crate::reader;
use crate::schedule::Schedule;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    digest: [u8; 32],
    date_prefix: String,
}

/// Parsed schedules keyed by the SHA-256 of the file bytes.
///
/// The date prefix is part of the key since it decides which sheet is read.
/// A cached schedule keeps the `source` of the load that first parsed it.
#[derive(Debug)]
pub struct ScheduleCache {
    entries: HashMap<CacheKey, Arc<Schedule>>,
    order: VecDeque<CacheKey>,
    capacity: usize,
    hits: usize,
    misses: usize,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Keep at most `capacity` schedules, evicting the oldest first
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Parse `data` into a schedule, reusing the previous result for identical bytes
    pub fn load(
        &mut self,
        data: &[u8],
        source: &str,
        config: &RosterConfig,
    ) -> Result<Arc<Schedule>> {
        let key = CacheKey {
            digest: Sha256::digest(data).into(),
            date_prefix: config.date_column_prefix.clone(),
        };

        if let Some(schedule) = self.entries.get(&key) {
            self.hits += 1;
            debug!(source, "schedule cache hit");
            return Ok(Arc::clone(schedule));
        }

        self.misses += 1;
        debug!(source, bytes = data.len(), "schedule cache miss");

        let workbook = reader::read_workbook_from_bytes(data, source)?;
        let schedule = Arc::new(
            Schedule::from_workbook(&workbook, config)
                .with_context(|| format!("Could not read the roster in {}", source))?,
        );

        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, Arc::clone(&schedule));

        Ok(schedule)
    }

    /// Read a file and load it through the cache
    pub fn load_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: &RosterConfig,
    ) -> Result<Arc<Schedule>> {
        let path = path.as_ref();
        let data =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load(&data, &source, config)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}

impl Default for ScheduleCache {
    fn default() -> Self {
        Self::new()
    }
}
