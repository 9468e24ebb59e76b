//! Session signing key loading.

use std::path::Path;

use actix_web::cookie::Key;
use tracing::warn;

/// Failure to obtain a session key.
#[derive(Debug, thiserror::Error)]
pub enum SessionKeyError {
    #[error("failed to read session key at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} is {len} bytes; at least 64 are required")]
    TooShort { path: String, len: usize },
}

const MIN_KEY_BYTES: usize = 64;

/// Derive the cookie key from the file at `path`.
///
/// Debug builds, or `allow_ephemeral`, fall back to a random key when the
/// file is missing. Release builds refuse to start without one.
pub fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key, SessionKeyError> {
    let key_path = path.display().to_string();
    match std::fs::read(path) {
        Ok(bytes) if bytes.len() < MIN_KEY_BYTES => Err(SessionKeyError::TooShort {
            path: key_path,
            len: bytes.len(),
        }),
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(source) if cfg!(debug_assertions) || allow_ephemeral => {
            warn!(path = %key_path, error = %source, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionKeyError::Read {
            path: key_path,
            source,
        }),
    }
}
