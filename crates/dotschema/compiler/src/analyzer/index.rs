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

//! Arena of classes under analysis
//!
//! Nested classes are moved out of their parents when the index is built and
//! are addressed by id like any other class. The qualified-name lookup only
//! covers top-level declarations, nested classes are reachable through their
//! parent.

use dotschema_common::{Class, QName};
use indexmap::IndexMap;

/// Stable handle of a class in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

impl ClassId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Slot {
    class: Class,
    inner: Vec<ClassId>,
}

#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    slots: Vec<Slot>,
    qnames: IndexMap<QName, Vec<ClassId>>,
}

impl ClassIndex {
    /// Group the given classes by their source qualified name, keeping declaration order.
    pub fn from_classes(classes: Vec<Class>) -> Self {
        let mut index = Self::default();
        for class in classes {
            let qname = class.source_qname();
            let id = index.insert(class);
            index.qnames.entry(qname).or_default().push(id);
        }
        index
    }

    /// Move a class and its nested classes into the arena without indexing it by name.
    pub fn insert(&mut self, mut class: Class) -> ClassId {
        let nested = std::mem::take(&mut class.inner);
        let inner = nested.into_iter().map(|child| self.insert(child)).collect();

        let id = ClassId(self.slots.len());
        self.slots.push(Slot { class, inner });
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: ClassId) -> &Class {
        &self.slots[id.0].class
    }

    pub fn get_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.slots[id.0].class
    }

    pub fn inner_of(&self, id: ClassId) -> &[ClassId] {
        &self.slots[id.0].inner
    }

    pub fn push_inner(&mut self, parent: ClassId, child: ClassId) {
        self.slots[parent.0].inner.push(child);
    }

    /// Top-level classes declared under `qname`
    pub fn candidates(&self, qname: &QName) -> &[ClassId] {
        self.qnames.get(qname).map(Vec::as_slice).unwrap_or_default()
    }

    /// The name was declared, even if every class under it has since been removed.
    pub fn contains(&self, qname: &QName) -> bool {
        self.qnames.contains_key(qname)
    }

    /// Qualified names with their live classes, in first declaration order
    pub fn groups(&self) -> impl Iterator<Item = (&QName, &[ClassId])> {
        self.qnames.iter().map(|(qname, ids)| (qname, ids.as_slice()))
    }

    /// Every live top-level class, grouped by name in first declaration order
    pub fn top_level(&self) -> Vec<ClassId> {
        self.qnames.values().flatten().copied().collect()
    }

    /// Detach a top-level class from its name group.
    pub fn remove(&mut self, qname: &QName, id: ClassId) {
        if let Some(ids) = self.qnames.get_mut(qname) {
            ids.retain(|existing| *existing != id);
        }
    }

    /// Qualified references of a class and its nested classes, in first-seen order
    pub fn dependencies(&self, id: ClassId) -> Vec<QName> {
        let mut result = Vec::new();
        let mut pending = vec![id];

        while let Some(current) = pending.pop() {
            for qname in self.get(current).dependencies() {
                if !result.contains(&qname) {
                    result.push(qname);
                }
            }
            pending.extend(self.inner_of(current).iter().rev());
        }

        result
    }

    /// Re-assemble an owned class with its nested classes.
    pub fn materialize(&self, id: ClassId) -> Class {
        let mut class = self.get(id).clone();
        class.inner = self.inner_of(id).iter().map(|child| self.materialize(*child)).collect();
        class
    }
}
