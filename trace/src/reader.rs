//! Whole-file log loading with encoding fallback.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("P-code log not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0} is neither valid UTF-8 nor GBK")]
    EncodingUnsupported(PathBuf),
}

/// Read the full log text, or nothing.
///
/// The emitter writes UTF-8 on most systems but GBK on Chinese Windows, so
/// UTF-8 is tried first and GBK second. There are no partial reads: either
/// the whole content decodes or the call fails.
pub fn read_log(path: impl AsRef<Path>) -> Result<String, ReadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ReadError::FileNotFound(path.to_path_buf()),
        _ => ReadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(err) => {
            let bytes = err.into_bytes();
            let (content, _, had_errors) = encoding_rs::GBK.decode(&bytes);
            if had_errors {
                Err(ReadError::EncodingUnsupported(path.to_path_buf()))
            } else {
                debug!(path = %path.display(), "log decoded with GBK fallback");
                Ok(content.into_owned())
            }
        }
    }
}
