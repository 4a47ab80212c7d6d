// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Qualified names in Clark notation (`{namespace}local`)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QNameError {
    #[error("Empty qualified name")]
    Empty,
    #[error("Unterminated namespace in `{0}`")]
    UnterminatedNamespace(String),
}

/// A namespace plus local name identifying a schema type.
///
/// Equality and ordering follow the Clark text form, so `b` sorts before
/// `{ns}a` exactly like the rendered names do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QName {
    pub namespace: Option<String>,
    pub local_name: String,
}

impl QName {
    pub fn new(namespace: Option<&str>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
            local_name: local_name.into(),
        }
    }

    /// A name without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self::new(None, local_name)
    }

    /// Parse the Clark text form produced by `Display`.
    pub fn parse(text: &str) -> Result<Self, QNameError> {
        if text.is_empty() {
            return Err(QNameError::Empty);
        }

        match text.strip_prefix('{') {
            Some(rest) => {
                let (namespace, local_name) = rest.split_once('}').ok_or_else(|| QNameError::UnterminatedNamespace(text.to_string()))?;
                if local_name.is_empty() {
                    return Err(QNameError::Empty);
                }
                Ok(Self::new(Some(namespace), local_name))
            }
            None => Ok(Self::local(text)),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{{{}}}{}", namespace, self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

impl PartialOrd for QName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}
