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

//! Output selection and field sanitization

use super::context::AnalysisContext;
use dotschema_common::{Attribute, Class, Restrictions, Tag, text};
use std::collections::HashSet;
use tracing::debug;

impl AnalysisContext {
    /// Enumerations and structured classes, or everything when there are none.
    pub fn fetch_classes_for_generation(&self) -> Vec<Class> {
        let all = self.index.top_level();
        let primary: Vec<_> = all
            .iter()
            .copied()
            .filter(|id| {
                let class = self.index.get(*id);
                class.is_enumeration() || class.is_complex()
            })
            .collect();

        let selected = if primary.is_empty() && self.config.select_all_when_empty { all } else { primary };
        debug!(selected = selected.len(), "Selected classes for generation");

        selected
            .into_iter()
            .map(|id| {
                let mut class = self.index.materialize(id);
                sanitize_attributes(&mut class, self.config.hash_duplicate_names);
                class
            })
            .collect()
    }
}

/// Canonicalize the fields of a class and its nested classes.
pub fn sanitize_attributes(target: &mut Class, hash_duplicate_names: bool) {
    for attr in target.attrs.iter_mut() {
        sanitize_attribute(attr);
        sanitize_restrictions(&mut attr.restrictions);
    }

    for index in 0..target.attrs.len() {
        sanitize_attribute_sequence(&mut target.attrs, index);
        sanitize_attribute_name(&mut target.attrs, index);
    }

    if has_duplicate_names(&target.attrs) {
        rename_duplicate_attributes(&mut target.attrs);
    }
    if hash_duplicate_names && has_duplicate_names(&target.attrs) {
        hash_attribute_names(&mut target.attrs);
    }

    for inner in target.inner.iter_mut() {
        sanitize_attributes(inner, hash_duplicate_names);
    }
}

fn sanitize_attribute(attr: &mut Attribute) {
    if attr.is_list() {
        attr.fixed = false;
    } else {
        attr.restrictions.sequential = false;
    }
}

/// Collapse occurrence bounds into a required scalar, an optional scalar or a list.
pub fn sanitize_restrictions(restrictions: &mut Restrictions) {
    let min_occurs = restrictions.min_occurs.unwrap_or(if restrictions.required { 1 } else { 0 });
    let max_occurs = restrictions.max_occurs.unwrap_or(1);

    if max_occurs > 1 {
        restrictions.min_occurs = Some(min_occurs);
        restrictions.max_occurs = Some(max_occurs);
        restrictions.required = false;
    } else {
        restrictions.required = min_occurs >= 1;
        restrictions.min_occurs = None;
        restrictions.max_occurs = None;
    }
}

/// Ordering only matters for runs of at least two sequential fields.
fn sanitize_attribute_sequence(attrs: &mut [Attribute], index: usize) {
    let sequential = |i: usize| attrs.get(i).is_some_and(|attr: &Attribute| attr.restrictions.sequential);

    if !sequential(index) || (index > 0 && sequential(index - 1)) || sequential(index + 1) {
        return;
    }

    attrs[index].restrictions.sequential = false;
}

/// Drop the prefix of a field name, and qualify it with its namespace when the short name clashes.
fn sanitize_attribute_name(attrs: &mut [Attribute], index: usize) {
    let name = text::suffix(&attrs[index].name).to_string();
    let exists = attrs.iter().enumerate().any(|(i, attr)| i != index && text::suffix(&attr.name) == name);

    let current = &mut attrs[index];
    current.name = match (&current.namespace, exists) {
        (Some(namespace), true) => format!("{}_{}", namespace, name),
        _ => name,
    };
}

fn has_duplicate_names(attrs: &[Attribute]) -> bool {
    let names: HashSet<&str> = attrs.iter().map(|attr| attr.name.as_str()).collect();
    names.len() < attrs.len()
}

/// Append the serialized kind to one member of every clashing pair, elements keep their name.
fn rename_duplicate_attributes(attrs: &mut [Attribute]) {
    for index in 0..attrs.len() {
        let Some(dup) = (0..attrs.len()).find(|i| *i != index && attrs[*i].name == attrs[index].name) else {
            continue;
        };

        let renamed = if attrs[index].tag == Tag::Element { dup } else { index };
        let attr = &mut attrs[renamed];
        attr.name = format!("{}_{}", attr.name, attr.xml_type());
    }
}

/// Rename every field after a hash of its wire name and position.
fn hash_attribute_names(attrs: &mut [Attribute]) {
    for (index, attr) in attrs.iter_mut().enumerate() {
        attr.name = hashed_name(attr.local_name.as_deref().unwrap_or(&attr.name), index);
    }
}

fn hashed_name(source: &str, index: usize) -> String {
    let hash = blake3::hash(format!("{}:{}", source, index).as_bytes()).to_hex();
    format!("field_{}", &hash.as_str()[..10])
}
