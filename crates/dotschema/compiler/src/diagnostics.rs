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

//! Degraded-but-successful outcomes of a compiler run
//!
//! Large schema sets routinely contain unresolvable corners. Those never stop
//! generation; each one narrows the output and is recorded here, next to the
//! value it affected, and logged as a warning.

use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// An extension base type was not found, the extension was dropped
    MissingExtension,
    /// A field type was not found, it was reset to the fallback type
    MissingType,
    /// More than one class matched a lookup, the first one was used
    AmbiguousCandidate,
    /// A simple type without exactly one field was referenced, it was reset to the fallback type
    UnsupportedSimpleType,
    /// A structured type carried a pattern restriction, it was reset to the fallback type
    PatternReset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The type or class the diagnostic is about
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered diagnostic sink
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, kind: DiagnosticKind, subject: impl Into<String>) {
        let subject = subject.into();
        let message = match kind {
            DiagnosticKind::MissingExtension => format!("Missing extension type: {subject}"),
            DiagnosticKind::MissingType => format!("Missing type: {subject}"),
            DiagnosticKind::AmbiguousCandidate => format!("More than one candidate found for {subject}"),
            DiagnosticKind::UnsupportedSimpleType => format!("Missing implementation: {subject}"),
            DiagnosticKind::PatternReset => format!("Pattern restriction on structured type: {subject}"),
        };
        warn!(kind = ?kind, "{}", message);
        self.items.push(Diagnostic { kind, subject, message });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

/// A value produced by a run together with the diagnostics raised while producing it
#[derive(Debug, Clone)]
pub struct Analyzed<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Analyzed<T> {
    pub fn new(value: T, diagnostics: Diagnostics) -> Self {
        Self {
            value,
            diagnostics: diagnostics.into_vec(),
        }
    }

    pub fn has_diagnostic(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|diagnostic| diagnostic.kind == kind)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Analyzed<U> {
        Analyzed {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}
