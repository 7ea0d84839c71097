//! Operation gateway and executors.
//!
//! [`GitService`] is constructed once per process with its storage location
//! injected. It owns the registry, the settings store, the tool backend and
//! the per-path guard. Resolving a repository id yields a [`RepoHandle`] bound
//! to that one working copy; every executor is a method on the handle, grouped
//! by operation family in the submodules below.
//!
//! Read-only executors run under the path's shared lock, mutating executors
//! under its exclusive lock. Caller-supplied parameters are validated before
//! any lock is taken or any tool invocation is made.

pub mod branches;
pub mod commit;
pub mod history;
pub mod integrate;
pub mod remotes;
pub mod reset;
pub mod staging;
pub mod stash;
pub mod status;
pub mod sync;
pub mod tags;

pub use history::DiffSelector;
pub use integrate::MergeOptions;
pub use reset::ResetMode;
pub use stash::StashAction;

use crate::core::backend::{GitCli, ToolOutput, VcsBackend};
use crate::core::classify::{classify_failure, FailureKind};
use crate::core::config::ServiceConfig;
use crate::core::dirs::normalize_path;
use crate::core::error::{GitDeckError, Result};
use crate::core::guard::RepositoryGuard;
use crate::core::registry::{RepositoryRecord, RepositoryRegistry, RepositoryUpdate};
use crate::core::settings::{Settings, SettingsStore};
use crate::core::validity::is_working_copy;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// A registry record together with its validity at the time of the call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryView {
    #[serde(flatten)]
    pub record: RepositoryRecord,
    pub valid: bool,
}

pub struct GitService {
    registry: RepositoryRegistry,
    settings: SettingsStore,
    backend: Arc<dyn VcsBackend>,
    guard: RepositoryGuard,
    config: ServiceConfig,
}

impl GitService {
    /// Open the stores under `config.data_dir` and shell out to the configured
    /// git binary.
    pub fn open(config: ServiceConfig) -> Result<Self> {
        let backend = Arc::new(GitCli::new(config.git_binary.clone()));
        Self::with_backend(config, backend)
    }

    pub fn with_backend(config: ServiceConfig, backend: Arc<dyn VcsBackend>) -> Result<Self> {
        let registry = RepositoryRegistry::open(config.registry_path())?;
        let settings = SettingsStore::open(config.settings_path())?;
        log::debug!("Service data directory: {}", config.data_dir.display());
        Ok(Self {
            registry,
            settings,
            backend,
            guard: RepositoryGuard::with_lock_dir(config.lock_dir()),
            config,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn registry(&self) -> &RepositoryRegistry {
        &self.registry
    }

    pub fn list_repositories(&self) -> Vec<RepositoryView> {
        self.registry
            .list()
            .into_iter()
            .map(|record| {
                let valid = is_working_copy(&record.path);
                RepositoryView { record, valid }
            })
            .collect()
    }

    /// Look up `id` and compute its validity. An invalid path is reported, not
    /// rejected; operations against it fail naturally.
    pub fn resolve(&self, id: &str) -> Result<RepositoryView> {
        let record = self.registry.get(id)?;
        let valid = is_working_copy(&record.path);
        if !valid {
            log::debug!("Repository {} resolved to invalid path {}", id, record.path.display());
        }
        Ok(RepositoryView { record, valid })
    }

    pub fn add_repository(&self, path: &Path, name: Option<&str>) -> Result<RepositoryView> {
        let record = self.registry.add(path, name)?;
        log::info!("Registered {} at {}", record.display_name, record.path.display());
        Ok(RepositoryView { record, valid: true })
    }

    pub fn update_repository(&self, id: &str, changes: RepositoryUpdate) -> Result<RepositoryView> {
        let record = self.registry.update(id, changes)?;
        let valid = is_working_copy(&record.path);
        Ok(RepositoryView { record, valid })
    }

    pub fn remove_repository(&self, id: &str) -> Result<RepositoryRecord> {
        self.registry.remove(id)
    }

    /// Clone `url` into `target` and register it. The target path is held
    /// exclusively for the duration of the clone.
    pub fn clone_repository(
        &self,
        url: &str,
        target: &Path,
        name: Option<&str>,
    ) -> Result<RepositoryView> {
        let key = normalize_path(target)?;
        let record = self.guard.exclusive(&key, || {
            self.registry
                .clone_from(self.backend.as_ref(), url, &key, name)
        })?;
        log::info!("Cloned {} into {}", url, record.path.display());
        Ok(RepositoryView { record, valid: true })
    }

    /// Resolve `id` into a handle for issuing operations.
    pub fn repository(&self, id: &str) -> Result<RepoHandle<'_>> {
        let RepositoryView { record, .. } = self.resolve(id)?;
        Ok(self.bind(record))
    }

    pub(crate) fn bind(&self, record: RepositoryRecord) -> RepoHandle<'_> {
        RepoHandle {
            service: self,
            record,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    pub fn update_settings(&self, patch: Settings) -> Result<Settings> {
        self.settings.merge(patch)
    }
}

/// Operations bound to one resolved working copy for the span of a request.
pub struct RepoHandle<'a> {
    service: &'a GitService,
    record: RepositoryRecord,
}

impl RepoHandle<'_> {
    pub fn record(&self) -> &RepositoryRecord {
        &self.record
    }

    pub fn path(&self) -> &Path {
        &self.record.path
    }

    pub(crate) fn config(&self) -> &ServiceConfig {
        &self.service.config
    }

    /// `remote`, or the configured default when it is absent or blank.
    pub(crate) fn remote_or_default<'r>(&'r self, remote: Option<&'r str>) -> &'r str {
        remote
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(self.service.config.default_remote.as_str())
    }

    /// Run `f` under the shared lock for this path.
    pub(crate) fn read<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        self.service.guard.shared(self.path(), f)
    }

    /// Run `f` under the exclusive lock for this path.
    pub(crate) fn write<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        self.service.guard.exclusive(self.path(), f)
    }

    /// One raw tool invocation. Callers must already hold the guard.
    pub(crate) fn invoke<S: AsRef<str>>(&self, args: &[S]) -> Result<ToolOutput> {
        if !self.path().is_dir() {
            return Err(GitDeckError::invalid_path(self.path()));
        }
        let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
        self.service.backend.run(self.path(), &args)
    }

    /// Invoke and return stdout, turning a non-zero exit into a classified
    /// error.
    pub(crate) fn run_checked<S: AsRef<str>>(&self, operation: &str, args: &[S]) -> Result<String> {
        let output = self.invoke(args)?;
        if output.success {
            Ok(output.stdout)
        } else {
            Err(self.failure(operation, &output))
        }
    }

    /// Map failed output to `IndexLocked` or a generic failure. Conflicts are
    /// only an outcome for merge and rebase, which inspect output themselves;
    /// everywhere else they are a plain failure.
    pub(crate) fn failure(&self, operation: &str, output: &ToolOutput) -> GitDeckError {
        let text = output.failure_text();
        match classify_failure(&text) {
            FailureKind::IndexLocked => {
                log::info!("{} on {} hit a held index lock", operation, self.path().display());
                GitDeckError::index_locked(text)
            }
            FailureKind::Conflict | FailureKind::Other => {
                GitDeckError::operation_failed(operation, text)
            }
        }
    }
}

/// Reject blank or option-like names before they reach the tool.
pub(crate) fn require_name<'n>(what: &str, value: &'n str) -> Result<&'n str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GitDeckError::validation(format!("{what} is required")));
    }
    if value.starts_with('-') {
        return Err(GitDeckError::validation(format!(
            "{what} must not start with '-': {value}"
        )));
    }
    Ok(value)
}

/// Like [`require_name`] for an optional parameter; a blank value counts as
/// absent.
pub(crate) fn optional_name<'n>(what: &str, value: Option<&'n str>) -> Result<Option<&'n str>> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| require_name(what, v))
        .transpose()
}
