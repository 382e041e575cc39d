// src/config/hot_reload.rs
//! Hot-reload wrapper around `SummarizerConfig`.
//!
//! On each `current()` call we check the file's modified time and reload if changed.
//! Callers get an owned snapshot, so a reload never changes the settings of a
//! summarization that is already running. A file that fails to parse keeps the previous
//! configuration in place.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
    time::SystemTime,
};
use tracing::{info, warn};

use super::{config_path, SummarizerConfig};

#[derive(Debug)]
pub struct HotReloadConfig {
    /// `None` for a fixed configuration that never reloads.
    path: Option<PathBuf>,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    config: SummarizerConfig,
    last_modified: Option<SystemTime>,
}

impl HotReloadConfig {
    /// Watch `path` (defaults to `$SUMMARIZER_CONFIG_PATH` or `config/summarizer.toml`),
    /// starting from `initial`.
    pub fn new(path: Option<&Path>, initial: SummarizerConfig) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        let last_modified = modified(&path);
        Self {
            path: Some(path),
            inner: RwLock::new(State {
                config: initial,
                last_modified,
            }),
        }
    }

    /// Serve `config` forever, without watching any file.
    pub fn fixed(config: SummarizerConfig) -> Self {
        Self {
            path: None,
            inner: RwLock::new(State {
                config,
                last_modified: None,
            }),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the latest configuration, reloading if the config file changed.
    pub fn current(&self) -> SummarizerConfig {
        // Fast path: compare mtime under the read lock.
        let Some(path) = self.path.as_deref() else {
            return self.read_config();
        };
        let Some(mtime) = modified(path) else {
            return self.read_config();
        };
        {
            let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            if guard.last_modified == Some(mtime) {
                return guard.config.clone();
            }
        }

        // Slow path: reload with write lock, re-checking in case another caller won.
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.last_modified != Some(mtime) {
            guard.last_modified = Some(mtime);
            match SummarizerConfig::load_from(path) {
                Ok(mut cfg) => {
                    cfg.apply_env_overrides();
                    guard.config = cfg;
                    info!(target: "summarizer", path = %path.display(), "config reloaded");
                }
                Err(e) => {
                    warn!(target: "summarizer", error = ?e, "config reload failed, keeping previous");
                }
            }
        }
        guard.config.clone()
    }

    fn read_config(&self) -> SummarizerConfig {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .config
            .clone()
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io::Write, thread, time::Duration};

    /// Create a unique temporary directory in std::env::temp_dir().
    fn unique_tmp_dir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        dir.push(format!("summarizer_config_test_{}", nanos));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(path: &Path, body: &str) {
        let mut f = fs::File::create(path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f.sync_all().unwrap();
    }

    #[test]
    fn reloads_on_change_and_keeps_previous_on_error() {
        let tmpdir = unique_tmp_dir();
        let path = tmpdir.join("summarizer.toml");
        write(&path, "[selection]\nmax_sentences = 16\n");

        let hot = HotReloadConfig::new(Some(&path), SummarizerConfig::default());
        // Initial mtime is recorded at construction, so the seed config is served.
        assert_eq!(hot.current().selection.max_sentences, 18);

        // Ensure different mtime (Windows granularity can be coarse).
        thread::sleep(Duration::from_millis(1100));
        write(&path, "[selection]\nmax_sentences = 14\n");
        assert_eq!(hot.current().selection.max_sentences, 14);

        thread::sleep(Duration::from_millis(1100));
        write(&path, "[selection]\nmax_sentences = \"many\"\n");
        assert_eq!(hot.current().selection.max_sentences, 14);

        // Cleanup (best-effort)
        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir_all(&tmpdir);
    }

    #[test]
    fn missing_file_serves_initial_config() {
        let hot = HotReloadConfig::new(
            Some(Path::new("__summarizer_config_should_not_exist__.toml")),
            SummarizerConfig::default(),
        );
        assert_eq!(hot.current(), SummarizerConfig::default());
    }

    #[test]
    fn fixed_config_has_no_path() {
        let mut cfg = SummarizerConfig::default();
        cfg.selection.max_sentences = 13;
        let hot = HotReloadConfig::fixed(cfg.clone());
        assert!(hot.path().is_none());
        assert_eq!(hot.current(), cfg);
    }
}
