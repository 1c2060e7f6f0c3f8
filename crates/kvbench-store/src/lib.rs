//! Store backend abstraction for the kvbench harness.
//!
//! The harness core only ever talks to the [`Store`] trait: a `put`/`get`
//! surface over string keys and values. Everything backend-specific
//! (addressing, connection pooling, timeouts, retries) is owned by the
//! backend implementation and fixed at construction time.
//! Backends are selected once at startup via [`open_store`]; adding a new
//! backend means adding a [`BackendKind`] variant and a constructor arm,
//! without touching the harness.

mod aerospike;
mod memory;

pub use aerospike::{AerospikeConfig, AerospikeStore};
pub use memory::MemoryStore;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by store backends.
///
/// The harness treats the variants differently: `InvalidKey` aborts the
/// worker that hit it, `NotFound`/`Backend` are counted as operation
/// failures, and `UnknownBackend`/`Config` can only occur during setup.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected the key itself (malformed for its addressing).
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// The key does not exist in the backend.
    #[error("key {0:?} not found")]
    NotFound(String),

    /// Any other backend-side failure (I/O, server error, timeout).
    #[error("backend error: {0}")]
    Backend(String),

    /// The requested backend name is not compiled in.
    #[error("unsupported store backend {0:?}")]
    UnknownBackend(String),

    /// The configuration file lacks the section the backend needs.
    #[error("store configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// True for errors the harness must treat as fatal for the worker that
    /// produced them rather than as a counted operation failure.
    pub fn is_key_fault(&self) -> bool {
        matches!(self, StoreError::InvalidKey { .. })
    }
}

/// A key-value backend under benchmark.
///
/// Implementations must be usable from many threads at once; the harness
/// shares one instance across all workers of a run.
pub trait Store: Send + Sync {
    /// Short backend name, used in report headers.
    fn name(&self) -> &str;

    /// Write `value` under `key`.
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<String>;
}

impl fmt::Debug for dyn Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").field("name", &self.name()).finish()
    }
}

/// Selectable store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Aerospike,
    Memory,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Aerospike => "aerospike",
            BackendKind::Memory => "memory",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        match s {
            "aerospike" => Ok(BackendKind::Aerospike),
            "memory" | "mem" => Ok(BackendKind::Memory),
            other => Err(StoreError::UnknownBackend(other.to_owned())),
        }
    }
}

/// Open the store backend selected by `kind`.
///
/// `pool_hint` is the number of harness workers that will share the
/// connection; backends with a connection pool size theirs from it.
pub fn open_store(
    kind: BackendKind,
    aerospike: Option<&AerospikeConfig>,
    pool_hint: usize,
) -> StoreResult<Arc<dyn Store>> {
    match kind {
        BackendKind::Aerospike => {
            let cfg = aerospike.ok_or_else(|| {
                StoreError::Config("missing `aerospike` section in config file".to_owned())
            })?;
            let store = AerospikeStore::connect(cfg, pool_hint)?;
            Ok(Arc::new(store))
        }
        BackendKind::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
