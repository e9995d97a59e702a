//! Watch registry and file monitors
//!
//! The registry is the reverse-dependency index of watch mode: it maps each
//! monitored path to the ordered set of base (entry-point) paths that must be
//! recompiled when that path changes. A base is always subscribed to itself,
//! so editing an entry file rebuilds it directly; compiling a base then
//! subscribes it to every dependency the compiler reported.
//!
//! Monitors are created lazily on first registration and never torn down:
//! a watched file may be deleted and recreated (editor atomic saves) and the
//! monitor must survive the gap. Subscriptions grow monotonically for the
//! life of the process; stale dependency links are not pruned when a template
//! drops an include (documented limitation).
//!
//! The low-level monitor is a capability interface ([`MonitorBackend`]) so
//! tests can drive synthetic ticks. Whatever the backend, two suppression
//! rules are enforced here, not in the backend: a tick with no modification
//! time (the file currently does not exist) never fires rebuilds, and a tick
//! repeating the previously seen modification time is ignored.

use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use notify::{Config, PollWatcher, RecursiveMode, Watcher};

use crate::console::Console;
use crate::error::PugResult;
use crate::paths::normalize;

/// Poll interval for change detection; bounds worst-case detection latency.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// One observation from a monitor: the path and its current modification
/// time, `None` when the file does not exist at observation time.
#[derive(Debug, Clone)]
pub struct MonitorTick {
    pub path: PathBuf,
    pub mtime: Option<SystemTime>,
}

/// Low-level per-path change monitoring capability.
pub trait MonitorBackend {
    /// Start monitoring `path` (already normalized). Never called twice for
    /// the same path.
    fn monitor(&mut self, path: &Path) -> PugResult<()>;
}

/// Poll-based backend built on `notify`'s `PollWatcher`.
///
/// Watches each file's parent directory rather than the file itself so that
/// delete-then-recreate sequences keep producing events, and stats the file
/// on every event so the registry sees modification times, not event kinds.
pub struct PollBackend {
    watcher: PollWatcher,
    files: Arc<Mutex<HashMap<PathBuf, PathBuf>>>,
    dirs: HashSet<PathBuf>,
}

impl PollBackend {
    pub fn new(tx: Sender<MonitorTick>, interval: Duration) -> PugResult<Self> {
        let files: Arc<Mutex<HashMap<PathBuf, PathBuf>>> = Arc::new(Mutex::new(HashMap::new()));
        let files_in_handler = Arc::clone(&files);
        let watcher = PollWatcher::new(
            move |result: Result<notify::Event, notify::Error>| {
                let Ok(event) = result else { return };
                for event_path in event.paths {
                    let registered = {
                        let files = files_in_handler.lock().unwrap();
                        files.get(&event_path).cloned()
                    };
                    if let Some(path) = registered {
                        let mtime = fs::metadata(&event_path).and_then(|m| m.modified()).ok();
                        let _ = tx.send(MonitorTick { path, mtime });
                    }
                }
            },
            Config::default().with_poll_interval(interval),
        )?;
        Ok(Self {
            watcher,
            files,
            dirs: HashSet::new(),
        })
    }
}

impl MonitorBackend for PollBackend {
    fn monitor(&mut self, path: &Path) -> PugResult<()> {
        let absolute = absolutize(path);
        self.files
            .lock()
            .unwrap()
            .insert(absolute.clone(), path.to_path_buf());

        let dir = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
        if self.dirs.insert(dir.clone()) {
            self.watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        }
        Ok(())
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        match env::current_dir() {
            Ok(cwd) => normalize(&cwd.join(path)),
            Err(_) => normalize(path),
        }
    }
}

/// The reverse-dependency index plus monitor bookkeeping.
pub struct WatchRegistry {
    backend: Box<dyn MonitorBackend>,
    /// path -> bases to recompile on change, in subscription order.
    /// A path is a key here if and only if a monitor is active for it.
    subscriptions: HashMap<PathBuf, Vec<PathBuf>>,
    /// rootPath captured at first registration of each path, replayed into
    /// the render calls its changes trigger.
    roots: HashMap<PathBuf, Option<PathBuf>>,
    /// Last modification time acted upon per path.
    seen: HashMap<PathBuf, Option<SystemTime>>,
    console: Console,
}

impl WatchRegistry {
    pub fn new(backend: Box<dyn MonitorBackend>, console: Console) -> Self {
        Self {
            backend,
            subscriptions: HashMap::new(),
            roots: HashMap::new(),
            seen: HashMap::new(),
            console,
        }
    }

    /// Subscribe `base` to changes of `path`; `base` defaults to `path`
    /// itself (self-registration of an entry point). Idempotent: registering
    /// an existing (path, base) pair changes nothing and logs nothing.
    pub fn register(
        &mut self,
        path: &Path,
        base: Option<&Path>,
        root: Option<&Path>,
    ) -> PugResult<()> {
        let path = normalize(path);
        let base = base.map(normalize).unwrap_or_else(|| path.clone());

        let mut log = format!("  watching {}", path.display());
        if base != path {
            log.push_str(&format!("\n    as a dependency of {}", base.display()));
        }

        if let Some(bases) = self.subscriptions.get_mut(&path) {
            if bases.contains(&base) {
                return Ok(());
            }
            self.console.log(log);
            bases.push(base);
            return Ok(());
        }

        self.console.log(log);
        self.subscriptions.insert(path.clone(), vec![base]);
        self.roots
            .insert(path.clone(), root.map(Path::to_path_buf));
        self.seen.insert(
            path.clone(),
            fs::metadata(&path).and_then(|m| m.modified()).ok(),
        );
        self.backend.monitor(&path)
    }

    /// Resolve one monitor tick into the render jobs it triggers, applying
    /// the zero-mtime and identical-mtime suppression rules.
    pub fn dirty_bases(&mut self, tick: &MonitorTick) -> Vec<(PathBuf, Option<PathBuf>)> {
        let path = normalize(&tick.path);
        let Some(bases) = self.subscriptions.get(&path) else {
            return Vec::new();
        };
        // File gone mid-delete: keep the monitor alive, fire nothing.
        let Some(mtime) = tick.mtime else {
            return Vec::new();
        };
        // Duplicate tick reporting identical state.
        if self.seen.get(&path) == Some(&Some(mtime)) {
            return Vec::new();
        }
        self.seen.insert(path.clone(), Some(mtime));

        let root = self.roots.get(&path).cloned().flatten();
        bases
            .iter()
            .map(|base| (base.clone(), root.clone()))
            .collect()
    }

    /// Every currently known base, deduplicated, with the root recorded for
    /// it. Used to re-render the world after a configuration reload.
    pub fn bases(&self) -> Vec<(PathBuf, Option<PathBuf>)> {
        let mut out: Vec<(PathBuf, Option<PathBuf>)> = Vec::new();
        let mut seen: HashSet<&PathBuf> = HashSet::new();
        for bases in self.subscriptions.values() {
            for base in bases {
                if seen.insert(base) {
                    let root = self.roots.get(base).cloned().flatten();
                    out.push((base.clone(), root));
                }
            }
        }
        out.sort();
        out
    }

    #[cfg(test)]
    fn subscriber_count(&self, path: &Path) -> usize {
        self.subscriptions
            .get(&normalize(path))
            .map(|b| b.len())
            .unwrap_or(0)
    }
}
