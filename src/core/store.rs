//! Document store: label -> parsed translation tree, kept in sync with files.
//!
//! Every write builds a fresh [`DocumentSet`] and swaps it in, so a reader
//! holding the result of [`DocumentStore::get_all`] keeps a consistent view
//! while reloads happen on other threads.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Weak},
};

use arc_swap::ArcSwap;
use indexmap::{IndexMap, IndexSet};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{DocumentError, TranslationTree};

/// Label -> document, in registration order.
pub type DocumentSet = IndexMap<String, Arc<Document>>;

/// One loaded translation file.
#[derive(Debug, Clone)]
pub struct Document {
    pub label: String,
    pub path: PathBuf,
    pub tree: TranslationTree,
    /// Diagnostic from the last load, if it failed.
    pub error: Option<String>,
}

impl Document {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>, tree: TranslationTree) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            tree,
            error: None,
        }
    }

    /// Load `path`, substituting an empty tree when it cannot be read or parsed.
    pub fn load(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let label = label.into();
        let path = path.into();
        match read_document(&path) {
            Ok(tree) => {
                debug!(label = %label, path = %path.display(), "loaded translation file");
                Self::new(label, path, tree)
            }
            Err(err) => {
                warn!(label = %label, "{err}");
                Self {
                    label,
                    path,
                    tree: TranslationTree::empty(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// Raw file content, read fresh from disk.
    pub fn read_source(&self) -> Result<String, DocumentError> {
        fs::read_to_string(&self.path).map_err(|source| DocumentError::Read {
            path: self.path.clone(),
            source,
        })
    }
}

/// A document whose last load failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadWarning {
    pub label: String,
    pub file_path: String,
    pub error: String,
}

pub fn read_document(path: &Path) -> Result<TranslationTree, DocumentError> {
    let content = fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    TranslationTree::parse(&content).map_err(|source| DocumentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Extracts the document label from a file name.
///
/// Examples:
/// - "en.json" -> Some("en")
/// - "zh-CN.json" -> Some("zh-CN")
/// - "/path/to/i18n/vi.json" -> Some("vi")
pub fn extract_label(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

struct Tracked {
    label: String,
    watcher: Option<RecommendedWatcher>,
}

pub struct DocumentStore {
    root: PathBuf,
    watch: bool,
    docs: ArcSwap<DocumentSet>,
    tracked: Mutex<IndexMap<PathBuf, Tracked>>,
    this: Weak<DocumentStore>,
}

impl DocumentStore {
    /// A store that loads on demand only.
    pub fn new(root: impl Into<PathBuf>) -> Arc<Self> {
        Self::build(root.into(), false)
    }

    /// A store that also watches every tracked file and reloads it on change.
    pub fn watching(root: impl Into<PathBuf>) -> Arc<Self> {
        Self::build(root.into(), true)
    }

    fn build(root: PathBuf, watch: bool) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            root,
            watch,
            docs: ArcSwap::from_pointee(DocumentSet::new()),
            tracked: Mutex::new(IndexMap::new()),
            this: this.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_watching(&self) -> bool {
        self.watch
    }

    /// Declare the full set of source paths.
    ///
    /// Relative paths are resolved against the store root. New paths are
    /// loaded (and watched); paths no longer listed are dropped along with
    /// their label.
    pub fn set_paths<P: AsRef<Path>>(&self, paths: &[P]) {
        let wanted: IndexSet<PathBuf> = paths.iter().map(|p| self.resolve(p.as_ref())).collect();

        let mut released = Vec::new();
        let mut tracked = self.tracked.lock();

        let removed: Vec<PathBuf> = tracked
            .keys()
            .filter(|path| !wanted.contains(*path))
            .cloned()
            .collect();
        for path in removed {
            if let Some(entry) = tracked.shift_remove(&path) {
                debug!(label = %entry.label, path = %path.display(), "stopped tracking translation file");
                self.release_label(&tracked, &entry.label, &path);
                released.push(entry);
            }
        }

        for path in wanted {
            if tracked.contains_key(&path) {
                continue;
            }
            let Some(label) = extract_label(&path) else {
                warn!(path = %path.display(), "cannot derive a label from translation path");
                continue;
            };
            let watcher = if self.watch {
                self.watch_file(&path)
            } else {
                None
            };
            tracked.insert(
                path.clone(),
                Tracked {
                    label: label.clone(),
                    watcher,
                },
            );
            self.publish(Document::load(label, path));
        }

        drop(tracked);
        // Watchers are dropped outside the lock: their callbacks take it.
        drop(released);
    }

    /// Re-read the file currently registered for `label`.
    pub fn reload(&self, label: &str) -> Result<Arc<Document>, DocumentError> {
        let tracked = self.tracked.lock();
        let path = owner_of(&tracked, label)
            .cloned()
            .ok_or_else(|| DocumentError::NotTracked {
                label: label.to_string(),
            })?;
        Ok(self.publish(Document::load(label, path)))
    }

    /// Reload triggered by a change to `path`.
    ///
    /// Ignored when the path is no longer tracked or a later registration owns
    /// its label.
    pub fn reload_path(&self, path: &Path) -> Option<Arc<Document>> {
        let tracked = self.tracked.lock();
        let label = tracked.get(path)?.label.clone();
        if owner_of(&tracked, &label).map(PathBuf::as_path) != Some(path) {
            debug!(label = %label, path = %path.display(), "skipping reload of shadowed translation file");
            return None;
        }
        debug!(label = %label, path = %path.display(), "reloading translation file");
        Some(self.publish(Document::load(label, path)))
    }

    pub fn get(&self, label: &str) -> Option<Arc<Document>> {
        self.docs.load().get(label).cloned()
    }

    /// Point-in-time snapshot of every loaded document.
    pub fn get_all(&self) -> Arc<DocumentSet> {
        self.docs.load_full()
    }

    pub fn warnings(&self) -> Vec<LoadWarning> {
        self.docs
            .load()
            .values()
            .filter_map(|doc| {
                doc.error.as_ref().map(|error| LoadWarning {
                    label: doc.label.clone(),
                    file_path: doc.path.to_string_lossy().to_string(),
                    error: error.clone(),
                })
            })
            .collect()
    }

    pub fn tracked_paths(&self) -> Vec<PathBuf> {
        self.tracked.lock().keys().cloned().collect()
    }

    /// Number of files with an active watch.
    pub fn watch_count(&self) -> usize {
        self.tracked
            .lock()
            .values()
            .filter(|t| t.watcher.is_some())
            .count()
    }

    /// Stop tracking everything.
    pub fn dispose(&self) {
        let released: Vec<Tracked> = {
            let mut tracked = self.tracked.lock();
            let released = tracked.drain(..).map(|(_, t)| t).collect();
            self.docs.store(Arc::new(DocumentSet::new()));
            released
        };
        debug!(count = released.len(), "disposed document store");
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn publish(&self, doc: Document) -> Arc<Document> {
        let doc = Arc::new(doc);
        self.docs.rcu(|set| {
            let mut next = DocumentSet::clone(set);
            next.insert(doc.label.clone(), doc.clone());
            next
        });
        doc
    }

    /// Drop `label` after `path` stopped being tracked, or hand it to the
    /// most recent remaining path that yields the same label.
    fn release_label(&self, tracked: &IndexMap<PathBuf, Tracked>, label: &str, path: &Path) {
        let owned = self
            .docs
            .load()
            .get(label)
            .is_some_and(|doc| doc.path == path);
        if !owned {
            return;
        }
        match owner_of(tracked, label) {
            Some(successor) => {
                self.publish(Document::load(label, successor.clone()));
            }
            None => {
                self.docs.rcu(|set| {
                    let mut next = DocumentSet::clone(set);
                    next.shift_remove(label);
                    next
                });
            }
        }
    }

    fn watch_file(&self, path: &Path) -> Option<RecommendedWatcher> {
        let dir = path.parent()?;
        let store = self.this.clone();
        let target = path.to_path_buf();

        let handler = move |res: notify::Result<Event>| match res {
            Ok(event) if is_change_to(&event, &target) => {
                if let Some(store) = store.upgrade() {
                    store.reload_path(&target);
                }
            }
            Ok(_) => {}
            Err(err) => warn!(path = %target.display(), "file watch error: {err}"),
        };

        let mut watcher = match notify::recommended_watcher(handler) {
            Ok(watcher) => watcher,
            Err(err) => {
                warn!(path = %path.display(), "failed to create file watcher: {err}");
                return None;
            }
        };
        if let Err(err) = watcher.watch(dir, RecursiveMode::NonRecursive) {
            warn!(path = %dir.display(), "failed to watch directory: {err}");
            return None;
        }
        Some(watcher)
    }
}

/// The path that currently provides `label`: the latest registration wins.
fn owner_of<'a>(tracked: &'a IndexMap<PathBuf, Tracked>, label: &str) -> Option<&'a PathBuf> {
    tracked
        .iter()
        .rev()
        .find(|(_, t)| t.label == label)
        .map(|(path, _)| path)
}

fn is_change_to(event: &Event, target: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == target)
}
