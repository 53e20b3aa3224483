//! Identifier table loaded from `constids.inc`.
//!
//! The file lists one identifier per line as `X(NAME)`. Codes are assigned
//! densely from 1 in file order; 0 is left for the empty identifier.
//!
//! ```text
//! X(TRELLIS_SLICE)
//! X(TRELLIS_IO)
//! X(A0)
//! ```

use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;

/// Synthetic aliases injected after loading, as `(alias, target)`.
pub const ALIASES: [(&str, &str); 2] = [("SLICE", "TRELLIS_SLICE"), ("PIO", "TRELLIS_IO")];

/// Mapping from identifier names to stable integer codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierTable {
    codes: HashMap<String, u32>,
    declared: u32,
}

impl IdentifierTable {
    /// Parses the contents of an identifier file.
    ///
    /// Blank lines are skipped. The aliases are not injected; call
    /// [`IdentifierTable::with_aliases`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedIdentifier`] for any non-blank line
    /// that is not a single `X(name)` entry, and
    /// [`ConfigError::DuplicateIdentifier`] for a name declared twice.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut table = Self::default();
        for (i, raw) in content.lines().enumerate() {
            let line = raw.replace(['(', ')'], " ");
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [] => continue,
                ["X", name] => {
                    if table.codes.contains_key(*name) {
                        return Err(ConfigError::DuplicateIdentifier {
                            line: i + 1,
                            name: (*name).to_string(),
                        });
                    }
                    table.declared += 1;
                    table.codes.insert((*name).to_string(), table.declared);
                }
                _ => {
                    return Err(ConfigError::MalformedIdentifier {
                        line: i + 1,
                        text: raw.trim().to_string(),
                    })
                }
            }
        }
        Ok(table)
    }

    /// Reads and parses an identifier file, then injects the aliases.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, malformed lines, or missing alias targets.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)?.with_aliases()
    }

    /// Injects the synthetic aliases `SLICE` and `PIO`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAlias`] if an alias target is undefined.
    pub fn with_aliases(mut self) -> Result<Self, ConfigError> {
        for (alias, target) in ALIASES {
            let code = self
                .get(target)
                .ok_or(ConfigError::MissingAlias { alias, target })?;
            self.codes.insert(alias.to_string(), code);
        }
        Ok(self)
    }

    /// Checks that both aliases resolve to their targets' codes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAlias`] for the first alias that is
    /// absent or points elsewhere.
    pub fn require_aliases(&self) -> Result<(), ConfigError> {
        for (alias, target) in ALIASES {
            match (self.get(alias), self.get(target)) {
                (Some(a), Some(t)) if a == t => {}
                _ => return Err(ConfigError::MissingAlias { alias, target }),
            }
        }
        Ok(())
    }

    /// Code of `name`, if defined.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.codes.get(name).copied()
    }

    /// Code of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownIdentifier`] if `name` is undefined.
    pub fn code(&self, name: &str) -> Result<u32, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownIdentifier(name.to_string()))
    }

    /// Number of names declared in the file, excluding aliases.
    pub fn declared(&self) -> usize {
        self.declared as usize
    }

    /// Number of resolvable names, including aliases.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if the table defines nothing.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
