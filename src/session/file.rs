//! File-based session persistence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{LoadResult, MissingPart, Session, SessionError, SessionStore, User};

/// Current session file format version.
///
/// Increment this when making breaking changes to the format.
const SESSION_FILE_VERSION: u32 = 1;

/// On-disk session file format.
///
/// Token and user live in one document so they are replaced together.
/// Either field may be absent in a hand-edited or truncated file; such a
/// file loads as [`LoadResult::Incomplete`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    version: u32,

    /// RFC 3339 time of the last write. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<String>,

    #[serde(default)]
    auth_token: Option<String>,

    #[serde(default)]
    user: Option<User>,
}

impl SessionFile {
    fn new(session: &Session) -> Self {
        Self {
            version: SESSION_FILE_VERSION,
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
            auth_token: Some(session.token.clone()),
            user: Some(session.user.clone()),
        }
    }
}

/// File-based implementation of [`SessionStore`].
///
/// # Atomic Writes
///
/// Uses write-to-temp-then-rename:
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
///
/// A concurrent reader sees either the old pair or the new pair.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        // session.json -> session.json.tmp, not session.tmp
        PathBuf::from(format!("{}.tmp", self.path.display()))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> LoadResult {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadResult::NotFound,
            Err(e) => {
                return LoadResult::Corrupted {
                    reason: format!("Failed to read file: {e}"),
                };
            }
        };

        let file = match serde_json::from_str::<SessionFile>(&content) {
            Ok(file) => file,
            Err(e) => {
                return LoadResult::Corrupted {
                    reason: format!("Invalid JSON: {e}"),
                };
            }
        };

        if file.version != SESSION_FILE_VERSION {
            return LoadResult::Corrupted {
                reason: format!(
                    "Incompatible version: expected {SESSION_FILE_VERSION}, got {}",
                    file.version
                ),
            };
        }

        match (file.auth_token, file.user) {
            (Some(token), Some(user)) => LoadResult::Loaded(Session::new(token, user)),
            (None, None) => LoadResult::NotFound,
            (None, Some(_)) => LoadResult::Incomplete {
                missing: MissingPart::Token,
            },
            (Some(_), None) => LoadResult::Incomplete {
                missing: MissingPart::User,
            },
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let content =
            serde_json::to_string_pretty(&SessionFile::new(session)).map_err(SessionError::Serialize)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(SessionError::Write)?;
            }
        }

        let temp_path = self.temp_path();
        std::fs::write(&temp_path, content).map_err(SessionError::Write)?;
        std::fs::rename(&temp_path, &self.path).map_err(SessionError::Write)?;

        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Write(e)),
        }
    }
}
