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

//! Error types for the schema compiler
//!
//! Only conditions that must stop generation for the whole batch are errors.
//! Degraded outcomes are reported as [`crate::diagnostics::Diagnostic`] values.

use dotschema_common::QName;
use thiserror::Error;

/// Fatal conditions raised while flattening the class index
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    #[error("Group attribute not found: `{0}`")]
    GroupNotFound(QName),
}

/// Fatal conditions raised while ordering classes and resolving imports
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    #[error("Duplicate class: `{0}`")]
    DuplicateClass(QName),
    #[error("Unknown dependency: `{0}`")]
    PackageNotFound(QName),
}

/// Any fatal condition of a compiler run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),
    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
pub type ResolverResult<T> = Result<T, ResolverError>;
pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(ResolverError::DuplicateClass(QName::local("a")).to_string(), "Duplicate class: `a`");
        assert_eq!(AnalyzerError::GroupNotFound(QName::new(Some("urn:x"), "g")).to_string(), "Group attribute not found: `{urn:x}g`");

        let error: CompileError = ResolverError::PackageNotFound(QName::local("nope")).into();
        assert_eq!(error.to_string(), "Resolver error: Unknown dependency: `nope`");
    }
}
