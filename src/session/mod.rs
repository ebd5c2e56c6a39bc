//! Per-visitor session state.
//!
//! A session is a small key-value bag tied to one browser through an opaque
//! cookie. Values are kept in their raw [`SessionValue`] form; the [`codec`]
//! module turns them into the typed comparison and favorite lists.
//!
//! # Architecture
//!
//! - [`Session`]: the working copy a handler reads, mutates and saves
//! - [`SessionBackend`]: storage capability injected through `AppState`
//! - [`MemorySessionStore`]: thread-safe in-process backend
//! - [`session_cookie_middleware`] / [`VisitorSession`]: HTTP wiring
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use car_catalog_web::session::{MemorySessionStore, Session, SessionId, codec};
//!
//! let store = Arc::new(MemorySessionStore::new());
//! let mut session = Session::new(SessionId::new(), store);
//!
//! codec::write_favorites(&mut session, &[4, 8]).unwrap();
//! assert_eq!(codec::read_favorites(&session).unwrap(), vec![4, 8]);
//! ```

pub mod codec;
mod middleware;
mod store;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::catalog::{CarModel, ModelId};

pub use middleware::{VisitorSession, session_cookie_middleware};
pub use store::{DEFAULT_SESSION_TIMEOUT, MemorySessionStore};

/// Raw values held by a session, keyed by name.
pub type SessionData = HashMap<String, SessionValue>;

/// A value as it sits in session storage.
///
/// Depending on how a backend round-trips data, the same logical list can
/// come back as a native collection, a generic JSON sequence, bytes or a
/// JSON string. The codec accepts all of them.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionValue {
    Models(Vec<CarModel>),
    Ids(Vec<ModelId>),
    List(Vec<serde_json::Value>),
    Bytes(Vec<u8>),
    Text(String),
    /// Any other JSON value (object, number, bool, null).
    Json(serde_json::Value),
}

impl SessionValue {
    /// Wrap a generically decoded JSON value.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Array(items) => Self::List(items),
            serde_json::Value::String(text) => Self::Text(text),
            other => Self::Json(other),
        }
    }

    /// Short name of the representation, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Models(_) => "model list",
            Self::Ids(_) => "id list",
            Self::List(_) => "sequence",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "string",
            Self::Json(_) => "json value",
        }
    }
}

/// Errors raised while reading or writing session state.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unsupported {found} stored under `{key}`")]
    UnsupportedValueType {
        key: &'static str,
        found: &'static str,
    },

    #[error("malformed value stored under `{key}`: {source}")]
    Decode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("session save error: {0}")]
    Save(String),

    #[error("session unavailable: {0}")]
    Unavailable(String),
}

/// Opaque identifier carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mint a fresh random id.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a cookie value. Anything that is not a UUID is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Storage for session data.
///
/// `load` returns `None` for ids the backend has never seen (or has expired);
/// the caller then starts from an empty session.
pub trait SessionBackend: Send + Sync + fmt::Debug {
    fn load(&self, id: &SessionId) -> Result<Option<SessionData>, SessionError>;

    fn store(&self, id: &SessionId, data: &SessionData) -> Result<(), SessionError>;
}

/// Working copy of one visitor's session.
///
/// Mutations via [`Session::set`] stay local until [`Session::save`] writes
/// the whole bag back. There is no locking across requests: two concurrent
/// saves for the same visitor resolve as last-write-wins.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    values: SessionData,
    backend: Arc<dyn SessionBackend>,
}

impl Session {
    /// Start an empty session.
    pub fn new(id: SessionId, backend: Arc<dyn SessionBackend>) -> Self {
        Self {
            id,
            values: SessionData::new(),
            backend,
        }
    }

    /// Load a session from `backend`, empty if the id is unknown.
    pub fn load(id: SessionId, backend: Arc<dyn SessionBackend>) -> Result<Self, SessionError> {
        let values = backend.load(&id)?.unwrap_or_default();
        Ok(Self {
            id,
            values,
            backend,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn get(&self, key: &str) -> Option<&SessionValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: SessionValue) {
        self.values.insert(key.into(), value);
    }

    /// Persist the working copy.
    pub fn save(&self) -> Result<(), SessionError> {
        self.backend.store(&self.id, &self.values)
    }
}
