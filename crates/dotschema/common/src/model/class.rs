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

//! Output class candidates

use super::{Attribute, AttributeType, Extension};
use crate::enums::ClassKind;
use crate::qname::QName;
use crate::text;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A declared schema type, mutated in place while it is analyzed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub kind: ClassKind,
    /// Source module (schema location) the class was declared in
    #[serde(default)]
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Text may be interleaved with child elements
    #[serde(default)]
    pub mixed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_namespace: Option<String>,
    /// Prefix to namespace declarations in scope at the declaration
    #[serde(default)]
    pub ns_map: BTreeMap<String, String>,
    /// Heads of the substitution groups this element belongs to
    #[serde(default)]
    pub substitutions: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<Extension>,
    #[serde(default)]
    pub attrs: Vec<Attribute>,
    #[serde(default)]
    pub inner: Vec<Class>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Class {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            module: String::new(),
            package: None,
            is_abstract: false,
            mixed: false,
            namespace: None,
            source_namespace: None,
            ns_map: BTreeMap::new(),
            substitutions: Vec::new(),
            extensions: Vec::new(),
            attrs: Vec::new(),
            inner: Vec::new(),
            help: None,
        }
    }

    pub fn with_source_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.source_namespace = Some(namespace.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.ns_map.insert(prefix.into(), namespace.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_attrs(mut self, attrs: Vec<Attribute>) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<Extension>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_inner(mut self, inner: Vec<Class>) -> Self {
        self.inner = inner;
        self
    }

    pub fn with_substitutions(mut self, substitutions: Vec<String>) -> Self {
        self.substitutions = substitutions;
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_mixed(mut self, mixed: bool) -> Self {
        self.mixed = mixed;
        self
    }

    /// The qualified name the class was declared under
    pub fn source_qname(&self) -> QName {
        QName::new(self.source_namespace.as_deref(), self.name.as_str())
    }

    /// Qualify a `prefix:local` reference written inside this class.
    ///
    /// Prefixed references resolve through the class namespace map, unprefixed
    /// ones belong to the source namespace.
    pub fn qname_of(&self, reference: &str) -> QName {
        let (prefix, local_name) = text::split(reference);
        let namespace = match prefix {
            Some(prefix) => self.ns_map.get(prefix).map(String::as_str),
            None => self.source_namespace.as_deref(),
        };
        QName::new(namespace, local_name)
    }

    /// The prefix bound to the source namespace, if one is declared
    pub fn source_prefix(&self) -> Option<&str> {
        let source_namespace = self.source_namespace.as_deref()?;
        self.ns_map.iter().find(|(_, namespace)| namespace.as_str() == source_namespace).map(|(prefix, _)| prefix.as_str())
    }

    pub fn is_complex(&self) -> bool {
        self.kind.is_complex()
    }

    pub fn is_element(&self) -> bool {
        self.kind == ClassKind::Element
    }

    pub fn is_simple(&self) -> bool {
        self.kind.is_simple()
    }

    /// Every field is an enumeration value
    pub fn is_enumeration(&self) -> bool {
        !self.attrs.is_empty() && self.attrs.iter().all(Attribute::is_enumeration)
    }

    pub fn has_suffix_attr(&self) -> bool {
        self.attrs.iter().any(Attribute::is_suffix)
    }

    pub fn has_wild_attr(&self) -> bool {
        self.attrs.iter().any(Attribute::is_wildcard)
    }

    /// Field and extension type references of this class, nested classes excluded
    pub fn types(&self) -> impl Iterator<Item = &AttributeType> {
        self.attrs.iter().flat_map(|attr| attr.types.iter()).chain(self.extensions.iter().map(|ext| &ext.ty))
    }

    /// Qualified names this class refers to, in first-seen order.
    ///
    /// Native and forward references are skipped; nested classes contribute
    /// their own references.
    pub fn dependencies(&self) -> Vec<QName> {
        let mut result = Vec::new();
        self.collect_dependencies(&mut result);
        result
    }

    fn collect_dependencies(&self, result: &mut Vec<QName>) {
        for attr_type in self.types() {
            if attr_type.native || attr_type.forward_ref {
                continue;
            }
            let qname = self.qname_of(&attr_type.name);
            if !result.contains(&qname) {
                result.push(qname);
            }
        }

        for inner in &self.inner {
            inner.collect_dependencies(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{DataType, Tag};

    fn sample() -> Class {
        Class::new("root", ClassKind::ComplexType)
            .with_source_namespace("urn:a")
            .with_prefix("a", "urn:a")
            .with_prefix("b", "urn:b")
    }

    #[test]
    fn test_qname_of_resolves_prefixes() {
        let class = sample();
        assert_eq!(class.qname_of("b:item"), QName::new(Some("urn:b"), "item"));
        assert_eq!(class.qname_of("item"), QName::new(Some("urn:a"), "item"));
        assert_eq!(class.qname_of("zz:item"), QName::local("item"));
        assert_eq!(class.source_qname(), QName::new(Some("urn:a"), "root"));
        assert_eq!(class.source_prefix(), Some("a"));
    }

    #[test]
    fn test_is_enumeration() {
        let mut class = Class::new("e", ClassKind::SimpleType);
        assert!(!class.is_enumeration());

        class.attrs.push(Attribute::new("one", Tag::Enumeration));
        assert!(class.is_enumeration());

        class.attrs.push(Attribute::new("two", Tag::Element));
        assert!(!class.is_enumeration());
    }

    #[test]
    fn test_dependencies() {
        let inner = Class::new("nested", ClassKind::ComplexType)
            .with_source_namespace("urn:a")
            .with_attrs(vec![Attribute::new("c", Tag::Element).with_type(AttributeType::reference("c_type"))]);

        let class = sample()
            .with_attrs(vec![
                Attribute::new("a", Tag::Element).with_types(vec![AttributeType::reference("b:item"), AttributeType::native(DataType::String)]),
                Attribute::new("b", Tag::Element).with_type(AttributeType::forward("nested")),
                Attribute::new("c", Tag::Element).with_type(AttributeType::reference("b:item")),
            ])
            .with_extensions(vec![Extension::new(AttributeType::reference("base"))])
            .with_inner(vec![inner]);

        let expected = vec![QName::new(Some("urn:b"), "item"), QName::new(Some("urn:a"), "base"), QName::new(Some("urn:a"), "c_type")];
        assert_eq!(class.dependencies(), expected);
    }

    #[test]
    fn test_deserialize_front_end_json() {
        let json = r#"{
            "name": "letter",
            "kind": "complex_type",
            "abstract": true,
            "source_namespace": "urn:letters",
            "attrs": [
                {"name": "custName", "tag": "element", "types": [{"name": "string", "native": true}],
                 "restrictions": {"min_occurs": 1, "max_occurs": 1}},
                {"name": "other", "tag": "any", "position": "at_end"}
            ],
            "extensions": [{"type": {"name": "base"}}]
        }"#;

        let class: Class = serde_json::from_str(json).unwrap();
        assert!(class.is_abstract);
        assert_eq!(class.attrs.len(), 2);
        assert_eq!(class.attrs[0].restrictions.min_occurs, Some(1));
        assert!(class.has_suffix_attr());
        assert!(class.has_wild_attr());
        assert_eq!(class.extensions[0].ty.name, "base");
    }
}
