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

//! Class ordering and import resolution for one output module

pub mod graph;
pub mod locator;

pub use graph::{DependencyGraph, GraphBuilder, linear_order};
pub use locator::{PackageLocator, PackageRegistry};

use crate::error::{ResolverError, ResolverResult};
use dotschema_common::{Class, Package, QName};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Orders the classes of a module and works out what the module imports
#[derive(Debug)]
pub struct DependenciesResolver<L> {
    packages: L,
    class_map: IndexMap<QName, Class>,
    class_list: Vec<QName>,
    imports: Vec<Package>,
    aliases: HashMap<QName, String>,
}

impl<L: PackageLocator> DependenciesResolver<L> {
    pub fn new(packages: L) -> Self {
        Self {
            packages,
            class_map: IndexMap::new(),
            class_list: Vec::new(),
            imports: Vec::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn class_list(&self) -> &[QName] {
        &self.class_list
    }

    pub fn imports(&self) -> &[Package] {
        &self.imports
    }

    pub fn aliases(&self) -> &HashMap<QName, String> {
        &self.aliases
    }

    /// Index the module classes, order them and resolve the imports they need.
    pub fn process(&mut self, classes: Vec<Class>) -> ResolverResult<()> {
        self.imports.clear();
        self.aliases.clear();

        self.class_map = self.build_class_map(classes)?;
        self.class_list = self.build_class_list(self.class_map.values());
        self.resolve_imports()?;

        debug!(classes = self.class_map.len(), imports = self.imports.len(), "Resolved module dependencies");
        Ok(())
    }

    /// Index classes by qualified name, a name may only be declared once.
    pub fn build_class_map(&self, classes: Vec<Class>) -> ResolverResult<IndexMap<QName, Class>> {
        let mut class_map = IndexMap::with_capacity(classes.len());
        for class in classes {
            let qname = class.source_qname();
            if class_map.contains_key(&qname) {
                return Err(ResolverError::DuplicateClass(qname));
            }
            class_map.insert(qname, class);
        }
        Ok(class_map)
    }

    /// Every class and dependency name, dependencies first, nested class names right after their parent.
    pub fn build_class_list<'a>(&self, classes: impl IntoIterator<Item = &'a Class>) -> Vec<QName> {
        let classes: Vec<&Class> = classes.into_iter().collect();

        let mut builder = GraphBuilder::new();
        let mut nested: HashMap<QName, Vec<QName>> = HashMap::new();
        for class in &classes {
            let qname = class.source_qname();
            builder.add_node(&qname);
            for dependency in class.dependencies() {
                builder.add_edge(&qname, &dependency);
            }
            nested.insert(qname, inner_names(class));
        }

        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for qname in linear_order(&builder.build()) {
            if !seen.insert(qname.clone()) {
                continue;
            }
            let inner = nested.remove(&qname).unwrap_or_default();
            result.push(qname);
            result.extend(inner.into_iter().filter(|name| seen.insert(name.clone())));
        }
        result
    }

    /// Import every dependency that is not declared in this module.
    ///
    /// A dependency sharing its local name with a class of this module gets an alias.
    pub fn resolve_imports(&mut self) -> ResolverResult<()> {
        let local_names: HashSet<&str> = self.class_map.keys().map(|qname| qname.local_name.as_str()).collect();

        let mut resolved = Vec::new();
        for qname in self.import_classes() {
            let package = self.find_package(&qname)?;
            let exists = local_names.contains(qname.local_name.as_str());
            resolved.push((qname, package, exists));
        }

        for (qname, package, exists) in resolved {
            self.add_import(qname, package, exists);
        }
        Ok(())
    }

    /// Names in the class list that are neither module classes nor nested classes
    pub fn import_classes(&self) -> Vec<QName> {
        let nested: HashSet<QName> = self.class_map.values().flat_map(inner_names).collect();

        self.class_list.iter().filter(|qname| !self.class_map.contains_key(*qname) && !nested.contains(*qname)).cloned().collect()
    }

    pub fn find_package(&self, qname: &QName) -> ResolverResult<String> {
        self.packages.find_package(qname).ok_or_else(|| ResolverError::PackageNotFound(qname.clone()))
    }

    /// Record an import, aliased as `{module}:{name}` when `exists` is set.
    pub fn add_import(&mut self, qname: QName, package: String, exists: bool) {
        let alias = exists.then(|| {
            let module = package.rsplit('.').next().unwrap_or(package.as_str());
            format!("{}:{}", module, qname.local_name)
        });

        if let Some(alias) = &alias {
            self.aliases.insert(qname.clone(), alias.clone());
        }
        self.imports.push(Package::new(qname.local_name, alias, package));
    }

    /// Imports sorted by name
    pub fn sorted_imports(&self) -> Vec<Package> {
        let mut imports = self.imports.clone();
        imports.sort_by(|a, b| a.name.cmp(&b.name));
        imports
    }

    /// Module classes in dependency order, with aliased references rewritten
    pub fn sorted_classes(&mut self) -> Vec<Class> {
        let mut result = Vec::with_capacity(self.class_map.len());
        for qname in &self.class_list {
            if let Some(class) = self.class_map.get_mut(qname) {
                apply_aliases(&self.aliases, class);
                result.push(class.clone());
            }
        }
        result
    }

    pub fn apply_aliases(&self, target: &mut Class) {
        apply_aliases(&self.aliases, target);
    }
}

/// Set the alias of every reference to an aliased name, nested classes included.
fn apply_aliases(aliases: &HashMap<QName, String>, target: &mut Class) {
    let resolved: Vec<Option<String>> =
        target.types().map(|attr_type| if attr_type.native { None } else { aliases.get(&target.qname_of(&attr_type.name)).cloned() }).collect();

    let types = target.attrs.iter_mut().flat_map(|attr| attr.types.iter_mut()).chain(target.extensions.iter_mut().map(|ext| &mut ext.ty));
    for (attr_type, alias) in types.zip(resolved) {
        if alias.is_some() {
            attr_type.alias = alias;
        }
    }

    for inner in target.inner.iter_mut() {
        apply_aliases(aliases, inner);
    }
}

fn inner_names(class: &Class) -> Vec<QName> {
    let mut result = Vec::new();
    let mut pending: Vec<&Class> = class.inner.iter().rev().collect();
    while let Some(inner) = pending.pop() {
        result.push(inner.source_qname());
        pending.extend(inner.inner.iter().rev());
    }
    result
}
