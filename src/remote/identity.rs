//! SSH identity resolution.
//!
//! The identity file is read once while building the connection so an
//! unreadable or empty key fails before any remote submission is attempted.
//! The `ssh` client itself only ever receives the resolved path.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;

use super::util::expand_tilde;

/// Errors raised while resolving the SSH identity file.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum IdentityError {
    /// Raised when the configured path is empty or only whitespace.
    #[error("ssh identity file path must not be empty")]
    PathEmpty,
    /// Raised when reading the private key fails.
    #[error("failed to read ssh private key `{path}`: {message}")]
    Read {
        /// Expanded path that failed to read.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Raised when the private key file is empty or only whitespace.
    #[error("ssh private key `{path}` is empty")]
    KeyEmpty {
        /// Expanded path of the empty key file.
        path: String,
    },
}

/// Expands and verifies the configured identity file, returning the resolved
/// path.
///
/// The key content is never retained; the read exists to surface unreadable
/// keys up front with the failing path in the error.
///
/// # Errors
///
/// Returns [`IdentityError`] when the path is empty, the file cannot be read,
/// or the file holds no key material.
pub fn resolve_identity_file(path: &str) -> Result<Utf8PathBuf, IdentityError> {
    if path.trim().is_empty() {
        return Err(IdentityError::PathEmpty);
    }

    let expanded = expand_tilde(path);
    let content = read_to_string_ambient(&expanded).map_err(|message| IdentityError::Read {
        path: expanded.clone(),
        message,
    })?;

    if content.trim().is_empty() {
        return Err(IdentityError::KeyEmpty { path: expanded });
    }

    Ok(Utf8PathBuf::from(expanded))
}

fn read_to_string_ambient(path: &str) -> Result<String, String> {
    let path_buf = Utf8Path::new(path);

    let (dir_path, file_path) = if path_buf.is_absolute() {
        let parent = path_buf
            .parent()
            .ok_or_else(|| format!("path has no parent directory: {path_buf}"))?;
        let file_name = path_buf
            .file_name()
            .ok_or_else(|| format!("path has no file name: {path_buf}"))?;
        (parent, Utf8Path::new(file_name))
    } else {
        (Utf8Path::new("."), path_buf)
    };

    let dir =
        Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(|err| err.to_string())?;
    dir.read_to_string(file_path).map_err(|err| err.to_string())
}
