//! Project namespace configuration — load, derive, persist, rename.
//!
//! A [`ProjectNamespace`] maps a human project name to a sanitized
//! identifier (the prefix) and to every database/user name derived from
//! it. The record lives in a JSON file; the first existing candidate
//! path wins, and a missing file is self-healed with defaults so
//! subsequent process starts are deterministic.
//!
//! Cold-start initialization is single-flight: [`LazyNamespace`] collapses
//! racing first callers onto one load attempt so the default-creating
//! write happens at most once and every caller observes the same store.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::error::{ConfigError, ConfigResult};
use crate::types::{IndicationType, StrategyType};

/// Environment variable consulted for the project name when no config
/// file exists yet.
pub const PROJECT_ENV_VAR: &str = "SHARDLINE_PROJECT";

/// Hard-coded fallback project name.
pub const DEFAULT_PROJECT_NAME: &str = "shardline";

/// Derive the sanitized prefix from a human project name: lowercase,
/// every run of non-`[a-z0-9]` characters collapsed to one underscore,
/// edge underscores trimmed.
pub fn sanitize_prefix(project_name: &str) -> String {
    let mut prefix = String::with_capacity(project_name.len());
    let mut pending_separator = false;
    for ch in project_name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !prefix.is_empty() {
                prefix.push('_');
            }
            pending_separator = false;
            prefix.push(ch);
        } else {
            pending_separator = true;
        }
    }
    prefix
}

/// Physical database names, one per partition plus the main database.
/// Every value is exactly `<prefix>_<fragment>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseNames {
    pub main: String,
    pub indication_active: String,
    pub indication_direction: String,
    pub indication_move: String,
    pub strategy_simple: String,
    pub strategy_advanced: String,
    pub strategy_step: String,
}

impl DatabaseNames {
    fn derive(prefix: &str) -> Self {
        Self {
            main: format!("{prefix}_main"),
            indication_active: format!("{prefix}_indication_active"),
            indication_direction: format!("{prefix}_indication_direction"),
            indication_move: format!("{prefix}_indication_move"),
            strategy_simple: format!("{prefix}_strategy_simple"),
            strategy_advanced: format!("{prefix}_strategy_advanced"),
            strategy_step: format!("{prefix}_strategy_step"),
        }
    }

    /// Database holding a given indication partition.
    pub fn indication(&self, indication: IndicationType) -> &str {
        match indication {
            IndicationType::Active => &self.indication_active,
            IndicationType::Direction => &self.indication_direction,
            IndicationType::Move => &self.indication_move,
        }
    }

    /// Database holding a given strategy partition.
    pub fn strategy(&self, strategy: StrategyType) -> &str {
        match strategy {
            StrategyType::Simple => &self.strategy_simple,
            StrategyType::Advanced => &self.strategy_advanced,
            StrategyType::Step => &self.strategy_step,
        }
    }
}

/// Database user names. Every value is exactly `<prefix>_<role>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserNames {
    pub admin: String,
    pub app: String,
}

impl UserNames {
    fn derive(prefix: &str) -> Self {
        Self {
            admin: format!("{prefix}_admin"),
            app: format!("{prefix}_app"),
        }
    }
}

/// The persisted namespace record. Field names match the on-disk JSON
/// shape (`projectName`, `dbPrefix`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectNamespace {
    pub project_name: String,
    pub db_prefix: String,
    pub databases: DatabaseNames,
    pub users: UserNames,
}

/// Legacy flat config shape, accepted and upgraded in memory.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyNamespace {
    project_name: String,
    prefix: String,
}

impl ProjectNamespace {
    /// Build the full record from a project name. Every derived name is
    /// recomputed from scratch; there is no partial derivation.
    pub fn derive(project_name: &str) -> Self {
        let prefix = sanitize_prefix(project_name);
        Self {
            project_name: project_name.to_string(),
            db_prefix: prefix.clone(),
            databases: DatabaseNames::derive(&prefix),
            users: UserNames::derive(&prefix),
        }
    }

    /// Reconstruct the structured record from a legacy flat config.
    /// One-way upgrade, from the stored prefix alone.
    fn from_legacy(legacy: LegacyNamespace) -> Self {
        Self {
            project_name: legacy.project_name,
            db_prefix: legacy.prefix.clone(),
            databases: DatabaseNames::derive(&legacy.prefix),
            users: UserNames::derive(&legacy.prefix),
        }
    }
}

/// Owns the persisted namespace file and the in-memory record.
///
/// Reads are cheap (`RwLock` read); the only mutation is [`rename`],
/// which is fail-closed: the in-memory record is swapped only after the
/// file write succeeded.
///
/// [`rename`]: NamespaceStore::rename
#[derive(Debug)]
pub struct NamespaceStore {
    path: PathBuf,
    inner: RwLock<ProjectNamespace>,
}

impl NamespaceStore {
    /// Load the namespace from the first existing candidate path, or
    /// self-heal: derive defaults from `SHARDLINE_PROJECT` (falling back
    /// to `"shardline"`) and persist them to the first candidate path.
    ///
    /// A failed default-creating write is logged loudly but does not
    /// block returning the in-memory record — naming will not be
    /// reproducible across restarts until the write succeeds.
    pub fn open(candidates: &[PathBuf]) -> ConfigResult<Self> {
        let fallback =
            std::env::var(PROJECT_ENV_VAR).unwrap_or_else(|_| DEFAULT_PROJECT_NAME.to_string());
        Self::open_with_fallback(candidates, &fallback)
    }

    /// Like [`open`], with an explicit fallback project name instead of
    /// the environment lookup.
    ///
    /// [`open`]: NamespaceStore::open
    pub fn open_with_fallback(candidates: &[PathBuf], fallback_project: &str) -> ConfigResult<Self> {
        let default_path = candidates.first().ok_or(ConfigError::NoCandidates)?;

        for path in candidates {
            if path.exists() {
                let namespace = Self::load_file(path)?;
                debug!(path = %path.display(), prefix = %namespace.db_prefix, "namespace loaded");
                return Ok(Self {
                    path: path.clone(),
                    inner: RwLock::new(namespace),
                });
            }
        }

        // No file anywhere: derive defaults and persist immediately so
        // the next process start resolves the same names.
        let namespace = ProjectNamespace::derive(fallback_project);
        if let Err(e) = write_atomic(default_path, &namespace) {
            error!(
                path = %default_path.display(),
                error = %e,
                "failed to persist default namespace; naming is not reproducible across restarts"
            );
        } else {
            info!(
                path = %default_path.display(),
                prefix = %namespace.db_prefix,
                "default namespace created"
            );
        }
        Ok(Self {
            path: default_path.clone(),
            inner: RwLock::new(namespace),
        })
    }

    fn load_file(path: &Path) -> ConfigResult<ProjectNamespace> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
        if let Ok(namespace) = serde_json::from_str::<ProjectNamespace>(&content) {
            return Ok(namespace);
        }
        // Fall back to the legacy flat shape and upgrade in memory only.
        match serde_json::from_str::<LegacyNamespace>(&content) {
            Ok(legacy) => {
                info!(path = %path.display(), "upgraded legacy namespace config in memory");
                Ok(ProjectNamespace::from_legacy(legacy))
            }
            Err(e) => Err(ConfigError::Parse(e.to_string())),
        }
    }

    /// The sanitized prefix every derived name starts with.
    pub fn prefix(&self) -> String {
        self.inner.read().expect("namespace lock").db_prefix.clone()
    }

    /// `<prefix>_<base>` for an unpartitioned table.
    pub fn table_name(&self, base: &str) -> String {
        format!("{}_{base}", self.inner.read().expect("namespace lock").db_prefix)
    }

    /// Database name for an indication partition.
    pub fn indication_database(&self, indication: IndicationType) -> String {
        self.inner
            .read()
            .expect("namespace lock")
            .databases
            .indication(indication)
            .to_string()
    }

    /// Database name for a strategy partition.
    pub fn strategy_database(&self, strategy: StrategyType) -> String {
        self.inner
            .read()
            .expect("namespace lock")
            .databases
            .strategy(strategy)
            .to_string()
    }

    /// Snapshot of the current record.
    pub fn current(&self) -> ProjectNamespace {
        self.inner.read().expect("namespace lock").clone()
    }

    /// Path the record is persisted at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current in-memory record back to disk. Useful after a
    /// legacy config was upgraded in memory.
    pub fn persist(&self) -> ConfigResult<()> {
        let current = self.current();
        write_atomic(&self.path, &current)
    }

    /// Rename the project: recompute every derived name from the new
    /// sanitized prefix and persist the whole record.
    ///
    /// Fail-closed: the in-memory record is updated only after the file
    /// write succeeded, so memory and disk never diverge on failure.
    /// Concurrent renames are serialized by the write lock.
    pub fn rename(&self, new_project_name: &str) -> ConfigResult<ProjectNamespace> {
        let mut inner = self.inner.write().expect("namespace lock");
        let next = ProjectNamespace::derive(new_project_name);
        write_atomic(&self.path, &next)?;
        info!(
            old_prefix = %inner.db_prefix,
            new_prefix = %next.db_prefix,
            "project renamed"
        );
        *inner = next.clone();
        Ok(next)
    }
}

/// Write via a sibling temp file and rename, so a crashed write never
/// leaves a truncated config behind.
fn write_atomic(path: &Path, namespace: &ProjectNamespace) -> ConfigResult<()> {
    let json = serde_json::to_string_pretty(namespace)
        .map_err(|e| ConfigError::Persist(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| ConfigError::Persist(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| ConfigError::Persist(e.to_string()))?;
    Ok(())
}

/// Single-flight lazy initialization of a shared [`NamespaceStore`].
///
/// All callers racing through a cold start await one in-flight load; the
/// default-creating write happens at most once and every caller gets a
/// clone of the same `Arc`.
pub struct LazyNamespace {
    candidates: Vec<PathBuf>,
    fallback_project: String,
    cell: OnceCell<Arc<NamespaceStore>>,
}

impl LazyNamespace {
    pub fn new(candidates: Vec<PathBuf>, fallback_project: impl Into<String>) -> Self {
        Self {
            candidates,
            fallback_project: fallback_project.into(),
            cell: OnceCell::new(),
        }
    }

    /// Get the shared store, loading it on first call.
    pub async fn get(&self) -> ConfigResult<Arc<NamespaceStore>> {
        self.cell
            .get_or_try_init(|| async {
                NamespaceStore::open_with_fallback(&self.candidates, &self.fallback_project)
                    .map(Arc::new)
            })
            .await
            .cloned()
    }
}
