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

//! Class graph analysis
//!
//! Reduces the raw class model handed over by the schema front end to the
//! classes worth generating:
//! - classes declared more than once are resolved
//! - substitution group members are indexed by the element they replace
//! - every class is flattened (groups, extensions, field types, substitutions, mixed content)
//! - enumerations and structured classes are selected and their fields sanitized
//!
//! # Example Usage
//!
//! ```rust
//! use dotschema_common::{Attribute, AttributeType, Class, ClassKind, DataType, Tag};
//! use dotschema_compiler::analyzer::ClassAnalyzer;
//! use dotschema_compiler::config::AnalyzerConfig;
//!
//! let analyzer = ClassAnalyzer::new(AnalyzerConfig::new().with_mixed_content_name("text"));
//! let person = Class::new("person", ClassKind::Element)
//!     .with_attrs(vec![Attribute::new("name", Tag::Element).with_type(AttributeType::native(DataType::String))]);
//!
//! let result = analyzer.process(vec![person]).unwrap();
//! assert_eq!(result.value.len(), 1);
//! ```

pub mod context;
pub mod duplicates;
pub mod flatten;
pub mod index;
pub mod selection;

pub use context::AnalysisContext;
pub use index::{ClassId, ClassIndex};

use crate::config::AnalyzerConfig;
use crate::diagnostics::Analyzed;
use crate::error::AnalyzerResult;
use dotschema_common::Class;
use std::time::Instant;
use tracing::info;

/// Entry point of the class graph analysis
#[derive(Debug, Clone, Default)]
pub struct ClassAnalyzer {
    config: AnalyzerConfig,
}

impl ClassAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self::new(AnalyzerConfig::default())
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Run every analysis step over `classes` and return the classes to generate.
    pub fn process(&self, classes: Vec<Class>) -> AnalyzerResult<Analyzed<Vec<Class>>> {
        let start = Instant::now();
        let total = classes.len();

        let mut ctx = AnalysisContext::new(ClassIndex::from_classes(classes), self.config.clone());
        ctx.handle_duplicate_classes();
        ctx.create_substitutions_index();
        ctx.flatten_classes()?;
        let selected = ctx.fetch_classes_for_generation();

        info!(input = total, output = selected.len(), diagnostics = ctx.diagnostics.len(), elapsed = ?start.elapsed(), "Class analysis completed");
        Ok(Analyzed::new(selected, ctx.diagnostics))
    }
}
