//! Session token storage.
//!
//! The token lives in a small string map persisted as JSON, keyed by
//! [`TOKEN_KEY`]. There is no expiry logic here: staleness is discovered when
//! the service rejects a request and the transport clears the token.

use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::Mutex;

/// Key of the token in the persisted state map.
pub const TOKEN_KEY: &str = "auth_token";

type StateMap = BTreeMap<String, String>;

/// Process-wide session handle. Clones share the same token.
#[derive(Clone, Default)]
pub struct Session {
    path: Option<PathBuf>,
    inner: Arc<Mutex<StateMap>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// A session that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the state file, starting empty when it is missing or unreadable.
    pub fn load_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = read_json_file(&path).unwrap_or_default();
        Self {
            path: Some(path),
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn get(&self) -> Option<String> {
        let guard = self.inner.lock().await;
        guard.get(TOKEN_KEY).cloned()
    }

    /// Overwrites the token unconditionally.
    pub async fn set(&self, token: impl Into<String>) {
        let mut guard = self.inner.lock().await;
        guard.insert(TOKEN_KEY.to_string(), token.into());
        self.persist(&guard).await;
    }

    /// Clears the token unconditionally.
    pub async fn remove(&self) {
        let mut guard = self.inner.lock().await;
        guard.remove(TOKEN_KEY);
        self.persist(&guard).await;
    }

    /// Writes on the blocking pool while the caller still holds the lock,
    /// so writes land in the same order as the updates.
    async fn persist(&self, state: &StateMap) {
        let Some(path) = self.path.clone() else {
            return;
        };
        let target = path.display().to_string();
        let state = state.clone();
        match tokio::task::spawn_blocking(move || write_json_file(&path, &state)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::warn!("failed to persist session state to {target}: {err}"),
            Err(err) => tracing::warn!("session state writer for {target} did not finish: {err}"),
        }
    }
}

fn read_json_file(path: &Path) -> Option<StateMap> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

fn write_json_file(path: &Path, state: &StateMap) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(state)
        .map_err(|_| std::io::Error::other("serialize failed"))?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(&tmp, path)?;
            let _ = fs::remove_file(&tmp);
            Ok(())
        }
    }
}
