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

//! Per-class flattening
//!
//! A class is flattened at most once. Everything a class looks up is
//! flattened before it, walking an explicit stack of class ids so deep
//! extension and reference chains never grow the call stack. A class still on
//! the stack when it is looked up again is part of a cycle and is used as it
//! stands.

use super::context::AnalysisContext;
use super::index::ClassId;
use crate::diagnostics::DiagnosticKind;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::toolkit::{self, AttributeOverlap};
use dotschema_common::{Attribute, Extension, QName, text};
use std::collections::HashSet;
use tracing::trace;

impl AnalysisContext {
    pub fn flatten_classes(&mut self) -> AnalyzerResult<()> {
        for id in self.index.top_level() {
            self.flatten_class(id)?;
        }
        Ok(())
    }

    /// Flatten `id` after every class it depends on, nested classes right after their parent.
    pub fn flatten_class(&mut self, id: ClassId) -> AnalyzerResult<()> {
        if self.processed.contains(&id) || !self.in_progress.insert(id) {
            return Ok(());
        }

        let mut stack = vec![id];
        while let Some(&current) = stack.last() {
            if let Some(next) = self.next_pending_dependency(current) {
                self.in_progress.insert(next);
                stack.push(next);
                continue;
            }

            stack.pop();
            self.in_progress.remove(&current);
            self.flatten_members(current)?;

            for &inner in self.index.inner_of(current).iter().rev() {
                if !self.processed.contains(&inner) && self.in_progress.insert(inner) {
                    stack.push(inner);
                }
            }
        }

        Ok(())
    }

    /// First class looked up by `id` that is neither flattened nor waiting on the stack.
    fn next_pending_dependency(&self, id: ClassId) -> Option<ClassId> {
        let qnames = self.lookup_targets(id);
        qnames
            .iter()
            .flat_map(|qname| self.index.candidates(qname).iter().copied())
            .find(|candidate| *candidate != id && !self.processed.contains(candidate) && !self.in_progress.contains(candidate))
    }

    /// Names a class resolves while it is flattened: groups, extensions, field
    /// types and the types of the substitutes spliced after its fields.
    fn lookup_targets(&self, id: ClassId) -> Vec<QName> {
        let class = self.index.get(id);

        let mut qnames: Vec<QName> = class.attrs.iter().filter(|attr| attr.is_group()).map(|attr| class.qname_of(&attr.name)).collect();
        qnames.extend(class.extensions.iter().filter(|extension| !extension.ty.native).map(|extension| class.qname_of(&extension.ty.name)));
        qnames.extend(
            class
                .attrs
                .iter()
                .flat_map(|attr| attr.types.iter())
                .filter(|attr_type| !attr_type.native && !attr_type.forward_ref)
                .map(|attr_type| class.qname_of(&attr_type.name)),
        );

        let mut heads: Vec<QName> = class.attrs.iter().filter(|attr| !attr.is_enumeration() && !attr.is_wildcard()).map(|attr| class.qname_of(&attr.name)).collect();
        let mut seen = HashSet::new();
        while let Some(head) = heads.pop() {
            if !seen.insert(head.clone()) {
                continue;
            }
            for substitute in self.substitutions.get(&head).into_iter().flatten() {
                qnames.extend(substitute.types.iter().map(|attr_type| class.qname_of(&attr_type.name)));
                heads.push(class.qname_of(&substitute.name));
            }
        }

        qnames
    }

    /// Flatten the members of one class whose dependencies are settled.
    fn flatten_members(&mut self, id: ClassId) -> AnalyzerResult<()> {
        if !self.processed.insert(id) {
            return Ok(());
        }
        trace!(class = %self.index.get(id).name, "Flattening class");

        self.expand_attribute_groups(id)?;

        let extensions = self.index.get(id).extensions.clone();
        for extension in extensions.iter().rev() {
            self.flatten_extension(id, extension)?;
        }

        self.flatten_attribute_types(id)?;
        self.add_substitution_attrs(id);

        let mixed_content_name = self.config.mixed_content_name.clone();
        let target = self.index.get_mut(id);
        toolkit::merge_duplicate_attributes(target);
        toolkit::create_mixed_attribute(target, &mixed_content_name);

        Ok(())
    }

    /// Replace group references with clones of the group fields, in place.
    fn expand_attribute_groups(&mut self, id: ClassId) -> AnalyzerResult<()> {
        let mut i = 0;
        while i < self.index.get(id).attrs.len() {
            let target = self.index.get(id);
            if !target.attrs[i].is_group() {
                i += 1;
                continue;
            }

            let qname = target.qname_of(&target.attrs[i].name);
            let source = self.find_class(&qname, |_, _| true)?.ok_or(AnalyzerError::GroupNotFound(qname))?;

            let group_attr = self.index.get_mut(id).attrs.remove(i);
            if source == id {
                continue;
            }

            let prefix = text::prefix(&group_attr.name);
            let clones: Vec<_> = self.index.get(source).attrs.iter().map(|attr| toolkit::clone_attribute(attr, &group_attr.restrictions, prefix)).collect();
            let count = clones.len();
            self.index.get_mut(id).attrs.splice(i..i, clones);
            self.copy_inner_classes(source, id);

            i += count;
        }

        Ok(())
    }

    fn flatten_extension(&mut self, id: ClassId, extension: &Extension) -> AnalyzerResult<()> {
        if extension.ty.native {
            if !self.index.get(id).is_enumeration() {
                toolkit::create_default_attribute(self.index.get_mut(id), extension);
            }
            return Ok(());
        }

        let qname = self.index.get(id).qname_of(&extension.ty.name);
        if let Some(source) = self.find_class(&qname, |_, class| class.is_enumeration() || class.is_simple())? {
            self.flatten_extension_simple(source, id, extension);
        } else if let Some(source) = self.find_class(&qname, |_, _| true)? {
            self.flatten_extension_complex(source, id, extension);
        } else {
            self.diagnostics.report(DiagnosticKind::MissingExtension, extension.ty.name.as_str());
            toolkit::remove_extension(self.index.get_mut(id), extension);
        }

        Ok(())
    }

    fn flatten_extension_simple(&mut self, source: ClassId, target: ClassId, extension: &Extension) {
        if source == target {
            toolkit::remove_extension(self.index.get_mut(target), extension);
            return;
        }

        let source_is_enumeration = self.index.get(source).is_enumeration();
        let target_is_enumeration = self.index.get(target).is_enumeration();

        if source_is_enumeration && !target_is_enumeration {
            toolkit::create_default_attribute(self.index.get_mut(target), extension);
        } else if source_is_enumeration == target_is_enumeration {
            self.copy_attributes(source, target, extension);
        } else {
            toolkit::remove_extension(self.index.get_mut(target), extension);
        }
    }

    fn flatten_extension_complex(&mut self, source: ClassId, target: ClassId, extension: &Extension) {
        let source_class = self.index.get(source);
        let target_class = self.index.get(target);

        let overlap = if source == target { AttributeOverlap::IncludesAll } else { toolkit::compare_attributes(source_class, target_class) };

        if overlap == AttributeOverlap::IncludesAll {
            toolkit::remove_extension(self.index.get_mut(target), extension);
        } else if overlap == AttributeOverlap::IncludesSome
            || source_class.is_abstract
            || target_class.is_abstract
            || (source_class.has_suffix_attr() && !target_class.attrs.is_empty())
            || target_class.has_suffix_attr()
        {
            self.copy_attributes(source, target, extension);
        }
    }

    /// Copy the fields and nested classes of `source` into `target` in place of `extension`.
    pub fn copy_attributes(&mut self, source: ClassId, target: ClassId, extension: &Extension) {
        let source_attrs = self.index.get(source).attrs.clone();
        toolkit::copy_attributes(&source_attrs, self.index.get_mut(target), extension);
        self.copy_inner_classes(source, target);
    }

    /// Resolve every non-native field type against the index.
    ///
    /// Simple types are inlined, structured types are checked for a path back
    /// to the class, anything else degrades to the fallback type.
    fn flatten_attribute_types(&mut self, id: ClassId) -> AnalyzerResult<()> {
        let fallback = self.config.fallback_type;

        for attr_index in 0..self.index.get(id).attrs.len() {
            let mut type_index = 0;
            while type_index < self.index.get(id).attrs[attr_index].types.len() {
                let target = self.index.get(id);
                let attr = &target.attrs[attr_index];
                let attr_type = &attr.types[type_index];

                if attr_type.forward_ref {
                    type_index += 1;
                    continue;
                }

                if attr.restrictions.pattern.is_some() {
                    if !attr_type.native {
                        self.diagnostics.report(DiagnosticKind::PatternReset, attr_type.name.as_str());
                    }
                    toolkit::reset_attribute_type(&mut self.index.get_mut(id).attrs[attr_index].types[type_index], fallback);
                    type_index += 1;
                    continue;
                }

                if attr_type.native {
                    type_index += 1;
                    continue;
                }

                let type_name = attr_type.name.clone();
                let qname = target.qname_of(&type_name);
                let simple = self.find_class(&qname, |candidate, class| !class.is_enumeration() && !class.is_complex() && candidate != id)?;

                if let Some(source) = simple {
                    let source_attrs = &self.index.get(source).attrs;
                    if source_attrs.len() != 1 {
                        self.diagnostics.report(DiagnosticKind::UnsupportedSimpleType, type_name);
                        toolkit::reset_attribute_type(&mut self.index.get_mut(id).attrs[attr_index].types[type_index], fallback);
                        type_index += 1;
                        continue;
                    }

                    let source_attr = source_attrs[0].clone();
                    let count = toolkit::merge_attribute_type(&source_attr, &mut self.index.get_mut(id).attrs[attr_index], type_index);
                    self.copy_inner_classes(source, id);
                    type_index += count;
                    continue;
                }

                match self.find_class(&qname, |_, _| true)? {
                    Some(source) => {
                        let self_ref = self.class_depends_on(source, id)?;
                        self.index.get_mut(id).attrs[attr_index].types[type_index].self_ref = self_ref;
                    }
                    None => {
                        self.diagnostics.report(DiagnosticKind::MissingType, type_name);
                        toolkit::reset_attribute_type(&mut self.index.get_mut(id).attrs[attr_index].types[type_index], fallback);
                    }
                }
                type_index += 1;
            }

            let attr = &mut self.index.get_mut(id).attrs[attr_index];
            let mut seen = HashSet::new();
            attr.types.retain(|attr_type| seen.insert(attr_type.name.clone()));
        }

        Ok(())
    }

    /// Whether `target` is reachable from `source` through declared references.
    pub fn class_depends_on(&mut self, source: ClassId, target: ClassId) -> AnalyzerResult<bool> {
        let mut visited = HashSet::new();
        let mut pending = vec![source];

        while let Some(current) = pending.pop() {
            if current == target {
                return Ok(true);
            }
            if !visited.insert(current) {
                continue;
            }

            for qname in self.index.dependencies(current) {
                if let Some(found) = self.find_class(&qname, |_, _| true)? {
                    if !visited.contains(&found) {
                        pending.push(found);
                    }
                }
            }
        }

        Ok(false)
    }

    /// Splice the substitutes of every field right after it.
    fn add_substitution_attrs(&mut self, id: ClassId) {
        let mut i = 0;
        while i < self.index.get(id).attrs.len() {
            let substitutes = self.substitutes_of(id, i);
            let count = substitutes.len();
            self.index.get_mut(id).attrs.splice(i + 1..i + 1, substitutes);
            i += 1 + count;
        }
    }

    /// Substitutes of the field at `index` and of those substitutes in turn, depth first.
    ///
    /// Each clone carries the restrictions of the field it replaces. A
    /// substitute naming an element already being expanded on its chain closes
    /// a cycle and is left out.
    fn substitutes_of(&self, id: ClassId, index: usize) -> Vec<Attribute> {
        let target = self.index.get(id);
        let mut result = Vec::new();
        let mut pending = vec![(target.attrs[index].clone(), Vec::<QName>::new())];
        let mut root = true;

        while let Some((attr, mut chain)) = pending.pop() {
            if !attr.is_enumeration() && !attr.is_wildcard() {
                let head = target.qname_of(&attr.name);
                if let Some(substitutes) = self.substitutions.get(&head) {
                    chain.push(head);
                    for substitute in substitutes.iter().rev() {
                        if chain.contains(&target.qname_of(&substitute.name)) {
                            continue;
                        }
                        let mut clone = substitute.clone();
                        clone.restrictions.merge(&attr.restrictions);
                        pending.push((clone, chain.clone()));
                    }
                }
            }

            if !root {
                result.push(attr);
            }
            root = false;
        }

        result
    }
}
