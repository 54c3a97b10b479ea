//! Editing of `KEY=value` env files.
//!
//! Only lines whose key (the text before the first `=`, after an optional
//! `export ` prefix) equals one of the requested keys are rewritten. Every other line, the line order and the
//! line endings (`\n` or `\r\n`) are kept as they are.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use crate::{error::EnvFileError, keypair::Keypair};

/// Key of the secret seed line.
pub const SECRET_KEY_VAR: &str = "STELLAR_SECRET_KEY";

/// Key of the public key line.
pub const PUBLIC_KEY_VAR: &str = "STELLAR_PUBLIC_KEY";

/// An env file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sets every `(key, value)` of `assignments` in `content`.
    ///
    /// Each key must already have a line of its own. A line that already
    /// holds a value is overwritten with a warning; values are never logged.
    ///
    /// # Errors
    ///
    /// Returns [`EnvFileError::MissingPlaceholder`] for the first key that
    /// has no line in `content`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use proofpass_account::env_file::EnvFile;
    /// let content = "PORT=3000\nSTELLAR_PUBLIC_KEY=\n";
    /// let filled = EnvFile::fill_placeholders(content, &[("STELLAR_PUBLIC_KEY", "GABC")]).unwrap();
    /// assert_eq!(filled, "PORT=3000\nSTELLAR_PUBLIC_KEY=GABC\n");
    /// ```
    pub fn fill_placeholders(
        content: &str,
        assignments: &[(&str, &str)],
    ) -> Result<String, EnvFileError> {
        let mut found = vec![false; assignments.len()];
        let mut output = String::with_capacity(content.len() + 128);

        for line in content.split_inclusive('\n') {
            let (body, ending) = split_line_ending(line);
            let (prefix, body) = split_export(body);
            let assignment = body.split_once('=').and_then(|(key, previous)| {
                assignments
                    .iter()
                    .position(|(name, _)| *name == key)
                    .map(|index| (index, previous))
            });

            match assignment {
                Some((index, previous)) => {
                    let (key, value) = assignments[index];
                    if !previous.is_empty() {
                        warn!(key = key; "Overwriting existing value");
                    }
                    output.push_str(prefix);
                    output.push_str(key);
                    output.push('=');
                    output.push_str(value);
                    found[index] = true;
                }
                None => {
                    output.push_str(prefix);
                    output.push_str(body);
                }
            }
            output.push_str(ending);
        }

        if let Some(index) = found.iter().position(|found| !found) {
            return Err(EnvFileError::MissingPlaceholder {
                key: assignments[index].0.to_string(),
            });
        }

        Ok(output)
    }

    /// Stores the keys of `keypair` in the file.
    ///
    /// The new content is written to a temporary file in the same
    /// directory, synced and renamed over the original, so readers see
    /// either the old or the new file. The original permissions are kept.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or replaced, or if a placeholder
    /// line is missing; in both cases the file is left untouched.
    pub fn write_credentials(&self, keypair: &Keypair) -> Result<(), EnvFileError> {
        let content =
            fs::read_to_string(&self.path).map_err(|err| EnvFileError::io(&self.path, err))?;
        let filled = Self::fill_placeholders(
            &content,
            &[
                (SECRET_KEY_VAR, keypair.secret_key()),
                (PUBLIC_KEY_VAR, keypair.public_key()),
            ],
        )?;

        self.replace_contents(filled.as_bytes())?;
        info!(path = self.path.display().to_string(); "Credentials written");
        Ok(())
    }

    fn replace_contents(&self, bytes: &[u8]) -> Result<(), EnvFileError> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |err| EnvFileError::io(&self.path, err);

        let permissions = fs::metadata(&self.path).map_err(io_err)?.permissions();
        let mut temp = NamedTempFile::new_in(directory).map_err(io_err)?;
        debug!(temp = temp.path().display().to_string(); "Writing temporary env file");

        temp.write_all(bytes).map_err(io_err)?;
        temp.as_file().set_permissions(permissions).map_err(io_err)?;
        temp.as_file().sync_all().map_err(io_err)?;
        temp.persist(&self.path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

/// Splits a shell-style `export ` prefix off `line`.
fn split_export(line: &str) -> (&str, &str) {
    match line.strip_prefix("export") {
        Some(rest) if rest.starts_with([' ', '\t']) => {
            let rest = rest.trim_start_matches([' ', '\t']);
            line.split_at(line.len() - rest.len())
        }
        _ => ("", line),
    }
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}
