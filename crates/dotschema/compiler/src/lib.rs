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

//! Dotlanth Schema Compiler Library
//!
//! This crate turns the raw class model produced by the schema front end into
//! ordered, fully resolved output modules, including class graph analysis,
//! dependency ordering and import resolution.

pub mod analyzer;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod pipeline;
pub mod resolver;
pub mod toolkit;

// Re-export main types for easy access
pub use analyzer::ClassAnalyzer;
pub use config::AnalyzerConfig;
pub use diagnostics::{Analyzed, Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{AnalyzerError, AnalyzerResult, CompileError, CompileResult, ResolverError, ResolverResult};
pub use pipeline::{ResolvedModule, generate_modules};
pub use resolver::{DependenciesResolver, PackageLocator, PackageRegistry};
