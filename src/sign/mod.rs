//! Detached signatures.
//!
//! The Metalink document can carry an ASCII-armored PGP signature. Signing is
//! delegated to an external program behind the [`Signer`] trait; the default
//! implementation shells out to `gpg`.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Result};

/// Produces a detached, armored signature over a file's bytes.
pub trait Signer {
    /// Signs the file at `path` and returns the armored signature.
    fn sign_detached(&self, path: &Path) -> Result<String>;
}

/// Signs with GnuPG using a specific local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpgSigner {
    key_id: String,
    program: String,
}

impl GpgSigner {
    /// Creates a signer for `key_id` using the `gpg` found on `PATH`.
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            program: "gpg".to_string(),
        }
    }

    /// Uses a different executable, e.g. `gpg2`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Returns the key id passed as `--local-user`.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl Signer for GpgSigner {
    fn sign_detached(&self, path: &Path) -> Result<String> {
        debug!(program = %self.program, key = %self.key_id, path = %path.display(), "signing");

        let output = Command::new(&self.program)
            .arg("--local-user")
            .arg(&self.key_id)
            .args(["--armor", "--detach-sign", "--output", "-"])
            .arg(path)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| Error::Sign(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(Error::Sign(format!("{} exited with {}", self.program, output.status)));
        }

        let armored = String::from_utf8(output.stdout)
            .map_err(|_| Error::Sign(format!("{} produced non UTF-8 output", self.program)))?;
        let armored = armored.trim();
        if armored.is_empty() {
            return Err(Error::Sign(format!("{} produced no signature", self.program)));
        }
        Ok(armored.to_string())
    }
}

impl<S: Signer + ?Sized> Signer for &S {
    fn sign_detached(&self, path: &Path) -> Result<String> {
        (**self).sign_detached(path)
    }
}
