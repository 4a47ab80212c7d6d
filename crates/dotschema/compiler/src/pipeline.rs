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

//! Analysis and resolution of a whole schema set, split into output modules

use crate::analyzer::ClassAnalyzer;
use crate::config::AnalyzerConfig;
use crate::diagnostics::Analyzed;
use crate::error::CompileResult;
use crate::resolver::{DependenciesResolver, PackageRegistry};
use dotschema_common::{Class, Package};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

/// The ordered classes and sorted imports of one output module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedModule {
    pub package: Option<String>,
    pub module: String,
    pub classes: Vec<Class>,
    pub imports: Vec<Package>,
}

impl ResolvedModule {
    /// Dotted path other modules import this one by
    pub fn path(&self) -> String {
        join_path(self.package.as_deref(), &self.module)
    }
}

/// Dotted path of the module a class is emitted into
pub fn module_path(class: &Class) -> String {
    join_path(class.package.as_deref(), &class.module)
}

fn join_path(package: Option<&str>, module: &str) -> String {
    match package {
        Some(package) => format!("{}.{}", package, module),
        None => module.to_string(),
    }
}

/// Analyze `classes` and resolve every output module in first-seen order.
pub fn generate_modules(classes: Vec<Class>, config: &AnalyzerConfig) -> CompileResult<Analyzed<Vec<ResolvedModule>>> {
    let Analyzed { value: classes, diagnostics } = ClassAnalyzer::new(config.clone()).process(classes)?;

    let registry: PackageRegistry = classes.iter().map(|class| (class.source_qname(), module_path(class))).collect();

    let mut groups: IndexMap<String, Vec<Class>> = IndexMap::new();
    for class in classes {
        groups.entry(module_path(&class)).or_default().push(class);
    }

    let mut modules = Vec::with_capacity(groups.len());
    for (path, classes) in groups {
        let Some(first) = classes.first() else {
            continue;
        };
        let package = first.package.clone();
        let module = first.module.clone();

        let mut resolver = DependenciesResolver::new(&registry);
        resolver.process(classes)?;

        info!(module = %path, classes = resolver.class_list().len(), imports = resolver.imports().len(), "Module resolved");
        modules.push(ResolvedModule {
            package,
            module,
            imports: resolver.sorted_imports(),
            classes: resolver.sorted_classes(),
        });
    }

    Ok(Analyzed { value: modules, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompileError, ResolverError};
    use dotschema_common::{Attribute, AttributeType, ClassKind, QName, Tag};

    fn class(name: &str, module: &str) -> Class {
        Class::new(name, ClassKind::ComplexType).with_module(module).with_package("generated")
    }

    fn field(name: &str, type_name: &str) -> Attribute {
        Attribute::new(name, Tag::Element).with_type(AttributeType::reference(type_name))
    }

    #[test]
    fn test_module_path() {
        assert_eq!(module_path(&class("a", "common")), "generated.common");
        assert_eq!(module_path(&Class::new("a", ClassKind::Element).with_module("flat")), "flat");
    }

    #[test]
    fn test_generate_modules() {
        let address = class("address", "common");
        let person = class("person", "people").with_attrs(vec![field("home", "address"), field("friend", "person")]);
        let company = class("company", "people").with_attrs(vec![field("owner", "person")]);

        let result = generate_modules(vec![address, person, company], &AnalyzerConfig::default()).unwrap();
        assert!(result.diagnostics.is_empty());

        let paths: Vec<String> = result.value.iter().map(ResolvedModule::path).collect();
        assert_eq!(paths, vec!["generated.common", "generated.people"]);

        let people = &result.value[1];
        assert_eq!(people.imports, vec![Package::new("address", None, "generated.common")]);
        let names: Vec<&str> = people.classes.iter().map(|class| class.name.as_str()).collect();
        assert_eq!(names, vec!["person", "company"]);
        assert!(people.classes[0].attrs[1].types[0].self_ref);
    }

    #[test]
    fn test_generate_modules_aliases_clashing_names() {
        let remote = class("item", "remote").with_source_namespace("urn:remote");
        let local = class("item", "local")
            .with_source_namespace("urn:local")
            .with_prefix("r", "urn:remote")
            .with_attrs(vec![field("other", "r:item")]);

        let result = generate_modules(vec![remote, local], &AnalyzerConfig::default()).unwrap();
        let local = &result.value[1];

        assert_eq!(local.imports, vec![Package::new("item", Some("remote:item".to_string()), "generated.remote")]);
        assert_eq!(local.classes[0].attrs[0].types[0].alias.as_deref(), Some("remote:item"));
    }

    #[test]
    fn test_duplicate_output_class_is_fatal() {
        let first = Class::new("a", ClassKind::Element).with_module("m");
        let second = Class::new("a", ClassKind::ComplexType).with_module("m");

        let error = generate_modules(vec![first, second], &AnalyzerConfig::default()).unwrap_err();
        assert_eq!(error, CompileError::Resolver(ResolverError::DuplicateClass(QName::local("a"))));
    }
}
