// src/cache.rs
//! In-memory summary cache with absolute TTL and bounded capacity.
//!
//! Summaries are deterministic for a given article, so the service keys them on a
//! SHA-256 of the article identity and body. Oldest insertions are evicted first.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::pipeline::{Article, SummaryResult};

#[derive(Debug)]
pub struct SummaryCache {
    ttl: Duration,
    capacity: usize,
    inner: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, Entry>,
    order: VecDeque<String>,
}

#[derive(Debug, Clone)]
struct Entry {
    value: SummaryResult,
    inserted: Instant,
}

/// Hex SHA-256 over title, source, body and the cleaning flag.
pub fn cache_key(article: &Article, body: &str, cleaned: bool) -> String {
    let mut h = Sha256::new();
    for part in [article.title.as_str(), article.source.as_str(), body] {
        h.update(part.as_bytes());
        h.update([0u8]);
    }
    h.update([cleaned as u8]);

    let digest = h.finalize();
    let mut out = String::with_capacity(64);
    for b in digest.iter() {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

impl SummaryCache {
    /// A zero capacity or zero TTL disables caching.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            inner: Mutex::new(State::default()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.capacity > 0 && !self.ttl.is_zero()
    }

    pub fn get(&self, key: &str) -> Option<SummaryResult> {
        if !self.enabled() {
            return None;
        }
        let mut st = self.lock();
        match st.entries.get(key) {
            None => return None,
            Some(e) if e.inserted.elapsed() < self.ttl => return Some(e.value.clone()),
            Some(_) => {}
        }
        // expired
        st.entries.remove(key);
        st.order.retain(|k| k != key);
        None
    }

    pub fn insert(&self, key: String, value: SummaryResult) {
        if !self.enabled() {
            return;
        }
        let mut st = self.lock();
        if st.entries.contains_key(&key) {
            st.order.retain(|k| k != &key);
        }
        st.order.push_back(key.clone());
        st.entries.insert(
            key,
            Entry {
                value,
                inserted: Instant::now(),
            },
        );

        while st.entries.len() > self.capacity {
            match st.order.pop_front() {
                Some(oldest) => {
                    st.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
