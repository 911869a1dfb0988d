//! Run configuration.
//!
//! A [`RunConfig`] carries everything a packaging run needs besides the
//! input bytes. It is built once and passed by reference; nothing in the
//! crate reads configuration from global state.
//!
//! # Example
//!
//! ```
//! use metapack::RunConfig;
//!
//! let config = RunConfig::new("release/")
//!     .with_mirror("https://mirror-a.example/pub/")
//!     .with_mirror("https://mirror-b.example/pub/")
//!     .with_out_dir("dist");
//!
//! config.validate()?;
//! # Ok::<(), metapack::Error>(())
//! ```

use std::path::{Path, PathBuf};

pub use crate::buffer::DEFAULT_READ_BUFFER_SIZE;
use crate::error::{Error, Result};

/// Announce URL used when none is given.
pub const DEFAULT_TRACKER: &str = "https://privtracker.com/metalink/announce";

/// Configuration for one packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    input: PathBuf,
    mirrors: Vec<String>,
    tracker: String,
    out_dir: Option<PathBuf>,
    signer: Option<String>,
    read_buffer_size: usize,
}

impl RunConfig {
    /// Creates a configuration for `input` with default settings.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            mirrors: Vec::new(),
            tracker: DEFAULT_TRACKER.to_string(),
            out_dir: None,
            signer: None,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    /// Adds a mirror URL. Order is preserved as mirror priority.
    pub fn with_mirror(mut self, url: impl Into<String>) -> Self {
        self.mirrors.push(url.into());
        self
    }

    /// Replaces the mirror list.
    pub fn with_mirrors<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mirrors = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the tracker announce URL.
    pub fn with_tracker(mut self, url: impl Into<String>) -> Self {
        self.tracker = url.into();
        self
    }

    /// Sets the directory the documents are written to.
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Requests a detached signature made with the given key id.
    pub fn with_signer(mut self, key_id: impl Into<String>) -> Self {
        self.signer = Some(key_id.into());
        self
    }

    /// Sets the read buffer size in bytes.
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Returns the input path.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Returns the mirror URLs in priority order.
    pub fn mirrors(&self) -> &[String] {
        &self.mirrors
    }

    /// Returns the tracker announce URL.
    pub fn tracker(&self) -> &str {
        &self.tracker
    }

    /// Returns the signer key id, if signing was requested.
    pub fn signer(&self) -> Option<&str> {
        self.signer.as_deref()
    }

    /// Returns the read buffer size.
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    /// Returns the output directory.
    ///
    /// Defaults to the input's parent directory, or `.` when the input has
    /// none.
    pub fn out_dir(&self) -> PathBuf {
        if let Some(dir) = &self.out_dir {
            return dir.clone();
        }
        match self.input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(Error::InvalidConfig {
                message: "input path must not be empty",
            });
        }
        if self.tracker.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "tracker URL must not be empty",
            });
        }
        if self.mirrors.iter().any(|m| m.trim().is_empty()) {
            return Err(Error::InvalidConfig {
                message: "mirror URLs must not be empty",
            });
        }
        if self.signer.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(Error::InvalidConfig {
                message: "signer key id must not be empty",
            });
        }
        if self.read_buffer_size == 0 {
            return Err(Error::InvalidConfig {
                message: "read buffer size must be non-zero",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::new("data/file.iso");
        assert_eq!(config.tracker(), DEFAULT_TRACKER);
        assert!(config.mirrors().is_empty());
        assert!(config.signer().is_none());
        assert_eq!(config.read_buffer_size(), DEFAULT_READ_BUFFER_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RunConfig::new("x")
            .with_mirror("https://a/")
            .with_mirror("https://b/")
            .with_tracker("udp://t:1337/announce")
            .with_signer("ABCD1234")
            .with_read_buffer_size(4096);
        assert_eq!(config.mirrors(), ["https://a/", "https://b/"]);
        assert_eq!(config.tracker(), "udp://t:1337/announce");
        assert_eq!(config.signer(), Some("ABCD1234"));
        assert_eq!(config.read_buffer_size(), 4096);

        let config = config.with_mirrors(["https://c/"]);
        assert_eq!(config.mirrors(), ["https://c/"]);
    }

    #[test]
    fn test_out_dir_defaults_to_parent() {
        assert_eq!(RunConfig::new("data/file.iso").out_dir(), PathBuf::from("data"));
        assert_eq!(RunConfig::new("file.iso").out_dir(), PathBuf::from("."));
        assert_eq!(
            RunConfig::new("data/file.iso").with_out_dir("out").out_dir(),
            PathBuf::from("out")
        );
    }

    #[test]
    fn test_invalid() {
        assert!(RunConfig::new("").validate().is_err());
        assert!(RunConfig::new("x").with_tracker(" ").validate().is_err());
        assert!(RunConfig::new("x").with_mirror("").validate().is_err());
        assert!(RunConfig::new("x").with_signer("").validate().is_err());
        assert!(RunConfig::new("x").with_read_buffer_size(0).validate().is_err());
    }
}
