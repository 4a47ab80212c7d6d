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

//! Resolution of classes declared more than once under the same name

use super::context::AnalysisContext;
use super::index::ClassId;
use dotschema_common::{ClassKind, Extension, QName, text};
use indexmap::IndexMap;
use tracing::debug;

impl AnalysisContext {
    /// Reduce every name group with more than one class, in three steps.
    ///
    /// Classes extending a type that was never declared go first, then
    /// redefinitions are folded into the last declaration, then the implied
    /// abstract flags of what remains are set.
    pub fn handle_duplicate_classes(&mut self) {
        let duplicates: Vec<QName> = self.index.groups().filter(|(_, ids)| ids.len() > 1).map(|(qname, _)| qname.clone()).collect();

        for qname in duplicates {
            if self.index.candidates(&qname).len() > 1 {
                self.remove_invalid_classes(&qname);
            }
            if self.index.candidates(&qname).len() > 1 {
                self.merge_redefined_classes(&qname);
            }
            if self.index.candidates(&qname).len() > 1 {
                self.update_abstract_classes(&qname);
            }
        }
    }

    fn remove_invalid_classes(&mut self, qname: &QName) {
        for id in self.index.candidates(qname).to_vec() {
            let class = self.index.get(id);
            let dangling = class.extensions.iter().any(|ext| !ext.ty.native && !self.index.contains(&class.qname_of(&ext.ty.name)));

            if dangling {
                debug!(class = %qname, "Dropping class with unresolved extension");
                self.index.remove(qname, id);
            }
        }
    }

    fn merge_redefined_classes(&mut self, qname: &QName) {
        let mut by_kind: IndexMap<ClassKind, Vec<ClassId>> = IndexMap::new();
        for &id in self.index.candidates(qname) {
            by_kind.entry(self.index.get(id).kind).or_default().push(id);
        }

        for (_, mut ids) in by_kind {
            let Some(winner) = ids.pop() else {
                continue;
            };

            for loser in ids {
                self.index.remove(qname, loser);

                let winner_class = self.index.get(winner);
                let Some(self_extension) = winner_class.extensions.iter().find(|ext| text::suffix(&ext.ty.name) == winner_class.name).cloned() else {
                    continue;
                };

                debug!(class = %qname, "Merging redefined class");
                self.copy_attributes(loser, winner, &self_extension);

                let extensions: Vec<Extension> = self
                    .index
                    .get(loser)
                    .extensions
                    .iter()
                    .map(|ext| {
                        let mut ext = ext.clone();
                        ext.restrictions.merge(&self_extension.restrictions);
                        ext
                    })
                    .collect();
                self.index.get_mut(winner).extensions.extend(extensions);
            }
        }
    }

    /// Structured siblings of a concrete element are only its type, never emitted on their own.
    fn update_abstract_classes(&mut self, qname: &QName) {
        let candidates = self.index.candidates(qname).to_vec();
        let Some(element) = candidates.iter().copied().find(|id| {
            let class = self.index.get(*id);
            class.is_element() && !class.is_abstract
        }) else {
            return;
        };

        for id in candidates {
            if id != element && self.index.get(id).is_complex() {
                self.index.get_mut(id).is_abstract = true;
            }
        }
    }
}
