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

//! Analysis context management

use super::index::{ClassId, ClassIndex};
use crate::config::AnalyzerConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::AnalyzerResult;
use crate::toolkit;
use dotschema_common::{Attribute, Class, QName};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// State shared by every analyzer pass of one run
#[derive(Debug)]
pub struct AnalysisContext {
    pub index: ClassIndex,
    /// Classes already flattened, or being flattened
    pub processed: HashSet<ClassId>,
    /// Classes waiting on the flattening stack for their dependencies
    pub in_progress: HashSet<ClassId>,
    /// Reference fields of substituting elements, keyed by the element they replace
    pub substitutions: HashMap<QName, Vec<Attribute>>,
    pub diagnostics: Diagnostics,
    pub config: AnalyzerConfig,
}

impl AnalysisContext {
    pub fn new(index: ClassIndex, config: AnalyzerConfig) -> Self {
        Self {
            index,
            processed: HashSet::new(),
            in_progress: HashSet::new(),
            substitutions: HashMap::new(),
            diagnostics: Diagnostics::new(),
            config,
        }
    }

    /// Find the first class declared under `qname` that satisfies `condition`.
    ///
    /// The candidate is flattened before it is returned, unless it is still
    /// waiting on the flattening stack, in which case it is part of a cycle and
    /// is returned as it stands.
    pub fn find_class(&mut self, qname: &QName, condition: impl Fn(ClassId, &Class) -> bool) -> AnalyzerResult<Option<ClassId>> {
        let candidates: Vec<ClassId> = self.index.candidates(qname).iter().copied().filter(|id| condition(*id, self.index.get(*id))).collect();

        let Some(&candidate) = candidates.first() else {
            return Ok(None);
        };

        if candidates.len() > 1 {
            self.diagnostics.report(DiagnosticKind::AmbiguousCandidate, qname.to_string());
        }

        self.flatten_class(candidate)?;
        Ok(Some(candidate))
    }

    /// Register a reference field for every substitution group membership.
    ///
    /// A substituting element is reachable through its group head, so it is
    /// never abstract.
    pub fn create_substitutions_index(&mut self) {
        for id in self.index.top_level() {
            let class = self.index.get_mut(id);
            if class.substitutions.is_empty() {
                continue;
            }
            class.is_abstract = false;

            let class = self.index.get(id);
            for substitution in &class.substitutions {
                let qname = class.qname_of(substitution);
                let attr = toolkit::create_reference_attribute(class, &qname);
                self.substitutions.entry(qname).or_default().push(attr);
            }
        }

        debug!(heads = self.substitutions.len(), "Substitution index created");
    }

    /// Copy the nested classes of `source` into `target`, skipping names `target` already has.
    pub fn copy_inner_classes(&mut self, source: ClassId, target: ClassId) {
        if source == target {
            return;
        }

        for inner in self.index.inner_of(source).to_vec() {
            let name = &self.index.get(inner).name;
            let exists = self.index.inner_of(target).iter().any(|existing| self.index.get(*existing).name == *name);
            if !exists {
                let clone = self.clone_subtree(inner);
                self.index.push_inner(target, clone);
            }
        }
    }

    /// Deep copy a class and its nested classes into fresh arena slots.
    ///
    /// Copies of flattened classes count as flattened.
    fn clone_subtree(&mut self, id: ClassId) -> ClassId {
        let class = self.index.get(id).clone();
        let clone = self.index.insert(class);

        for inner in self.index.inner_of(id).to_vec() {
            let child = self.clone_subtree(inner);
            self.index.push_inner(clone, child);
        }

        if self.processed.contains(&id) {
            self.processed.insert(clone);
        }

        clone
    }
}
