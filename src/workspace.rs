//! A project root bound to its configuration and translation documents.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::{Config, load_config};
use crate::core::{
    Completion, Definition, DocumentStore, Hover, LoadWarning, MatchSpec, Resolver,
};

pub struct Workspace {
    /// Directory the configuration search starts from.
    start: PathBuf,
    root: PathBuf,
    config: Config,
    from_file: bool,
    spec: MatchSpec,
    store: Arc<DocumentStore>,
    config_error: Option<String>,
}

impl Workspace {
    /// Load the configuration found from `start` and every translation file
    /// it lists. With `watch`, files are reloaded whenever they change.
    pub fn open(start: &Path, watch: bool) -> Result<Self> {
        let start = start
            .canonicalize()
            .with_context(|| format!("Project root does not exist: {}", start.display()))?;
        let loaded = load_config(&start)?;
        let spec = compile_matches(&loaded.config)?;

        let store = open_store(&loaded.root, watch);
        store.set_paths(&loaded.config.paths);
        debug!(
            root = %loaded.root.display(),
            documents = loaded.config.paths.len(),
            "opened workspace"
        );

        Ok(Self {
            start,
            root: loaded.root,
            config: loaded.config,
            from_file: loaded.from_file,
            spec,
            store,
            config_error: None,
        })
    }

    /// Re-read the configuration file.
    ///
    /// On failure the last good configuration stays active, the error is kept
    /// in [`Workspace::config_error`] and returned. When the search now lands
    /// on a different config file, the documents are reopened against that
    /// file's directory. Returns whether anything changed.
    pub fn refresh_config(&mut self) -> Result<bool> {
        match self.apply_config() {
            Ok(changed) => {
                self.config_error = None;
                Ok(changed)
            }
            Err(err) => {
                warn!("keeping previous configuration: {err:#}");
                self.config_error = Some(format!("{err:#}"));
                Err(err)
            }
        }
    }

    fn apply_config(&mut self) -> Result<bool> {
        let loaded = load_config(&self.start)?;
        if loaded.root == self.root
            && loaded.config == self.config
            && loaded.from_file == self.from_file
        {
            return Ok(false);
        }

        let spec = compile_matches(&loaded.config)?;
        if loaded.root == self.root {
            self.store.set_paths(&loaded.config.paths);
        } else {
            let store = open_store(&loaded.root, self.store.is_watching());
            store.set_paths(&loaded.config.paths);
            std::mem::replace(&mut self.store, store).dispose();
            debug!(
                previous = %self.root.display(),
                root = %loaded.root.display(),
                "workspace root moved"
            );
            self.root = loaded.root;
        }
        self.spec = spec;
        self.config = loaded.config;
        self.from_file = loaded.from_file;
        debug!(root = %self.root.display(), "configuration reloaded");
        Ok(true)
    }

    /// Error from the last failed [`Workspace::refresh_config`], cleared by
    /// the next successful one.
    pub fn config_error(&self) -> Option<&str> {
        self.config_error.as_deref()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn from_file(&self) -> bool {
        self.from_file
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    pub fn applies_to(&self, language_id: &str) -> bool {
        self.config.applies_to(language_id)
    }

    pub fn warnings(&self) -> Vec<LoadWarning> {
        self.store.warnings()
    }

    pub fn hover_at(&self, line: &str, offset: usize) -> Option<Hover> {
        let docs = self.store.get_all();
        Resolver::new(&self.spec, &docs).hover_at(line, offset)
    }

    pub fn completions_at(&self, line: &str, dot_offset: usize) -> Option<Completion> {
        let docs = self.store.get_all();
        Resolver::new(&self.spec, &docs).completions_at(line, dot_offset)
    }

    /// Definition targets, reading each document's source from disk.
    pub fn definition_at(&self, line: &str, offset: usize) -> Option<Definition> {
        let docs = self.store.get_all();
        Resolver::new(&self.spec, &docs).definition_at(line, offset, |doc| doc.read_source())
    }
}

fn open_store(root: &Path, watch: bool) -> Arc<DocumentStore> {
    if watch {
        DocumentStore::watching(root)
    } else {
        DocumentStore::new(root)
    }
}

fn compile_matches(config: &Config) -> Result<MatchSpec> {
    MatchSpec::new(config.effective_matches()).context("Failed to compile 'matches' prefixes")
}

/// Language id for a source file, from its extension.
pub fn language_id_for(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let id = match ext.as_str() {
        "ts" | "tsx" | "mts" | "cts" => "typescript",
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "html" | "htm" => "html",
        other => other,
    };
    Some(id.to_string())
}
