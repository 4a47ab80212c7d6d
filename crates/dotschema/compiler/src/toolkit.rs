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

//! Attribute reconciliation primitives shared by the analyzer passes
//!
//! Everything here works on a single class (or a pair of classes) and never
//! consults the class index. Copying nested classes is left to the index,
//! because nested classes are owned by the arena while a run is in progress.

use dotschema_common::{Attribute, AttributePosition, AttributeType, Class, DataType, Extension, QName, Restrictions, Tag, text};
use std::collections::HashSet;

/// Namespace constraint of wildcard fields that accept anything
pub const NAMESPACE_ANY: &str = "##any";

/// How much of a source class' field set is already present in a target class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOverlap {
    IncludesNone,
    IncludesSome,
    IncludesAll,
}

/// Compare the field names of `source` against the ones of `target`.
///
/// A target without fields includes none of the source; a source whose field
/// names all appear in the target is fully included.
pub fn compare_attributes(source: &Class, target: &Class) -> AttributeOverlap {
    if target.attrs.is_empty() {
        return AttributeOverlap::IncludesNone;
    }

    let source_names: HashSet<&str> = source.attrs.iter().map(|attr| attr.name.as_str()).collect();
    let target_names: HashSet<&str> = target.attrs.iter().map(|attr| attr.name.as_str()).collect();
    let missing = source_names.difference(&target_names).count();

    if missing == 0 {
        AttributeOverlap::IncludesAll
    } else if missing != source_names.len() {
        AttributeOverlap::IncludesSome
    } else {
        AttributeOverlap::IncludesNone
    }
}

/// Replace `extension` in `target` with clones of the source fields it inherits.
///
/// Fields whose short name already exists in the target are skipped. Fields
/// marked to sort last are appended, the rest are inserted at a cursor that
/// follows the source declaration order.
pub fn copy_attributes(source_attrs: &[Attribute], target: &mut Class, extension: &Extension) {
    let prefix = text::prefix(&extension.ty.name);
    remove_extension(target, extension);

    let target_names: HashSet<String> = target.attrs.iter().map(|attr| text::suffix(&attr.name).to_string()).collect();

    let mut index = 0;
    for attr in source_attrs {
        if !target_names.contains(text::suffix(&attr.name)) {
            let clone = clone_attribute(attr, &extension.restrictions, prefix);
            if attr.is_suffix() {
                target.attrs.push(clone);
                continue;
            }
            let position = index.min(target.attrs.len());
            target.attrs.insert(position, clone);
        }
        index += 1;
    }
}

/// Clone a field and apply the restrictions of the reference that pulled it in.
///
/// When a prefix is given, unprefixed non-native type names are qualified with
/// it so they keep resolving against the namespace they were declared in.
pub fn clone_attribute(attr: &Attribute, restrictions: &Restrictions, prefix: Option<&str>) -> Attribute {
    let mut clone = attr.clone();
    clone.restrictions.merge(restrictions);

    if let Some(prefix) = prefix {
        for attr_type in clone.types.iter_mut() {
            if !attr_type.native && !attr_type.name.contains(':') {
                attr_type.name = format!("{}:{}", prefix, attr_type.name);
            }
        }
    }

    clone
}

/// Inline the single field of a simple type into the type slot at `index`.
///
/// Returns the number of types now occupying the slot.
pub fn merge_attribute_type(source_attr: &Attribute, attr: &mut Attribute, index: usize) -> usize {
    if index >= attr.types.len() {
        return 0;
    }

    let inlined = source_attr.types.clone();
    let count = inlined.len();
    attr.types.splice(index..=index, inlined);

    let mut restrictions = source_attr.restrictions.clone();
    restrictions.merge(&attr.restrictions);
    attr.restrictions = restrictions;

    count
}

/// Collapse repeated declarations of the same field.
///
/// Repeated attributes and enumeration values are dropped. Any other repeated
/// field becomes one field whose bounds cover both occurrences.
pub fn merge_duplicate_attributes(target: &mut Class) {
    if target.attrs.is_empty() {
        return;
    }

    let mut result: Vec<Attribute> = Vec::with_capacity(target.attrs.len());
    for attr in std::mem::take(&mut target.attrs) {
        let Some(pos) = find_attribute(&result, &attr) else {
            result.push(attr);
            continue;
        };

        if attr.is_attribute() || attr.is_enumeration() {
            continue;
        }

        let existing = &mut result[pos];
        let min_occurs = existing.restrictions.min_occurs.unwrap_or(0);
        let max_occurs = existing.restrictions.max_occurs.unwrap_or(1);
        let attr_min_occurs = attr.restrictions.min_occurs.unwrap_or(0);
        let attr_max_occurs = attr.restrictions.max_occurs.unwrap_or(1);

        existing.restrictions.min_occurs = Some(min_occurs.min(attr_min_occurs));
        existing.restrictions.max_occurs = Some(max_occurs.saturating_add(attr_max_occurs));
        existing.restrictions.sequential |= attr.restrictions.sequential;
        existing.fixed = false;
    }

    target.attrs = result;
}

/// Prepend a wildcard field to mixed content classes that have none
pub fn create_mixed_attribute(target: &mut Class, name: &str) {
    if !target.mixed || target.has_wild_attr() {
        return;
    }

    let attr = Attribute::new(name, Tag::Any).with_type(AttributeType::native(DataType::AnyType)).with_namespace(NAMESPACE_ANY);
    target.attrs.insert(0, attr);
}

/// Replace an extension of a native or enumeration type with a field holding the value
pub fn create_default_attribute(target: &mut Class, extension: &Extension) {
    let attr = if extension.ty.native_type() == Some(DataType::AnyType) {
        Attribute::new("any_element", Tag::Any).with_namespace(NAMESPACE_ANY)
    } else {
        Attribute::new("value", Tag::Extension)
    };

    let attr = attr.with_type(extension.ty.clone()).with_restrictions(extension.restrictions.clone()).with_position(AttributePosition::AtIndex(0));

    target.attrs.insert(0, attr);
    remove_extension(target, extension);
}

/// A field standing for `source` wherever the element named `qname` may appear
pub fn create_reference_attribute(source: &Class, qname: &QName) -> Attribute {
    let prefix = if qname.namespace != source.source_namespace { source.source_prefix() } else { None };

    let reference = match prefix {
        Some(prefix) => format!("{}:{}", prefix, source.name),
        None => source.name.clone(),
    };

    let mut attr = Attribute::new(source.name.as_str(), source.kind.reference_tag()).with_type(AttributeType::reference(reference));
    attr.namespace = source.namespace.clone();
    attr
}

/// Position of a declaration of the same field
pub fn find_attribute(attrs: &[Attribute], attr: &Attribute) -> Option<usize> {
    attrs.iter().position(|existing| existing.same_identity(attr))
}

/// Degrade a type reference to a built-in primitive
pub fn reset_attribute_type(attr_type: &mut AttributeType, fallback: DataType) {
    attr_type.name = fallback.code().to_string();
    attr_type.native = true;
    attr_type.self_ref = false;
    attr_type.forward_ref = false;
}

/// Drop the first extension equal to `extension`
pub fn remove_extension(target: &mut Class, extension: &Extension) {
    if let Some(pos) = target.extensions.iter().position(|existing| existing == extension) {
        target.extensions.remove(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotschema_common::{ClassKind, UNBOUNDED};

    fn element(name: &str) -> Attribute {
        Attribute::new(name, Tag::Element).with_type(AttributeType::native(DataType::String))
    }

    fn class_with(names: &[&str]) -> Class {
        Class::new("c", ClassKind::ComplexType).with_attrs(names.iter().map(|name| element(name)).collect())
    }

    fn names(class: &Class) -> Vec<&str> {
        class.attrs.iter().map(|attr| attr.name.as_str()).collect()
    }

    #[test]
    fn test_compare_attributes() {
        let source = class_with(&["a", "b"]);

        assert_eq!(compare_attributes(&source, &class_with(&[])), AttributeOverlap::IncludesNone);
        assert_eq!(compare_attributes(&source, &class_with(&["a", "b", "c"])), AttributeOverlap::IncludesAll);
        assert_eq!(compare_attributes(&source, &class_with(&["a", "c"])), AttributeOverlap::IncludesSome);
        assert_eq!(compare_attributes(&source, &class_with(&["c"])), AttributeOverlap::IncludesNone);
    }

    #[test]
    fn test_copy_attributes() {
        let extension = Extension::new(AttributeType::reference("p:base")).with_restrictions(Restrictions::default().with_sequential(true));
        let mut source = class_with(&["a", "b", "c"]);
        source.attrs[0].types = vec![AttributeType::reference("a_type")];
        source.attrs.push(Attribute::new("rest", Tag::Any).with_position(AttributePosition::AtEnd));

        let mut target = class_with(&["x", "b"]).with_extensions(vec![extension.clone()]);
        copy_attributes(&source.attrs, &mut target, &extension);

        assert!(target.extensions.is_empty());
        assert_eq!(names(&target), vec!["a", "x", "c", "b", "rest"]);
        assert_eq!(target.attrs[0].types[0].name, "p:a_type");
        assert!(target.attrs[0].restrictions.sequential);
        assert!(!target.attrs[1].restrictions.sequential);
    }

    #[test]
    fn test_clone_attribute_keeps_native_and_prefixed_names() {
        let attr = Attribute::new("a", Tag::Element).with_types(vec![
            AttributeType::native(DataType::Int),
            AttributeType::reference("q:qualified"),
            AttributeType::reference("plain"),
        ]);

        let clone = clone_attribute(&attr, &Restrictions::occurs(0, 1), Some("p"));
        let type_names: Vec<&str> = clone.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(type_names, vec!["int", "q:qualified", "p:plain"]);
        assert_eq!(clone.restrictions.min_occurs, Some(0));

        let clone = clone_attribute(&attr, &Restrictions::default(), None);
        assert_eq!(clone.types[2].name, "plain");
    }

    #[test]
    fn test_merge_attribute_type() {
        let source_attr = Attribute::new("value", Tag::Extension)
            .with_types(vec![AttributeType::native(DataType::Int), AttributeType::native(DataType::String)])
            .with_restrictions(Restrictions { max_length: Some(4), ..Default::default() });
        let mut attr = Attribute::new("a", Tag::Element)
            .with_types(vec![AttributeType::reference("first"), AttributeType::reference("simple"), AttributeType::reference("last")])
            .with_restrictions(Restrictions::occurs(0, 1));

        let count = merge_attribute_type(&source_attr, &mut attr, 1);
        assert_eq!(count, 2);

        let type_names: Vec<&str> = attr.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(type_names, vec!["first", "int", "string", "last"]);
        assert_eq!(attr.restrictions.max_length, Some(4));
        assert_eq!(attr.restrictions.min_occurs, Some(0));
    }

    #[test]
    fn test_merge_duplicate_attributes() {
        let mut target = Class::new("c", ClassKind::ComplexType).with_attrs(vec![
            element("a").with_restrictions(Restrictions::occurs(1, 1)),
            Attribute::new("b", Tag::Attribute),
            element("a").with_restrictions(Restrictions::occurs(0, 3).with_sequential(true)),
            Attribute::new("b", Tag::Attribute),
            Attribute::new("c", Tag::Enumeration),
            Attribute::new("c", Tag::Enumeration),
        ]);

        merge_duplicate_attributes(&mut target);

        assert_eq!(names(&target), vec!["a", "b", "c"]);
        let merged = &target.attrs[0].restrictions;
        assert_eq!(merged.min_occurs, Some(0));
        assert_eq!(merged.max_occurs, Some(4));
        assert!(merged.sequential);
    }

    #[test]
    fn test_merge_duplicate_attributes_unbounded_saturates() {
        let mut target = Class::new("c", ClassKind::ComplexType)
            .with_attrs(vec![element("a").with_restrictions(Restrictions::occurs(0, UNBOUNDED)), element("a")]);

        merge_duplicate_attributes(&mut target);
        assert_eq!(target.attrs[0].restrictions.max_occurs, Some(UNBOUNDED));
    }

    #[test]
    fn test_create_mixed_attribute() {
        let mut target = class_with(&["a"]);
        create_mixed_attribute(&mut target, "content");
        assert_eq!(names(&target), vec!["a"]);

        target.mixed = true;
        create_mixed_attribute(&mut target, "content");
        assert_eq!(names(&target), vec!["content", "a"]);
        assert_eq!(target.attrs[0].tag, Tag::Any);
        assert_eq!(target.attrs[0].types[0].native_type(), Some(DataType::AnyType));

        create_mixed_attribute(&mut target, "content");
        assert_eq!(target.attrs.len(), 2);
    }

    #[test]
    fn test_create_default_attribute() {
        let extension = Extension::new(AttributeType::native(DataType::Decimal)).with_restrictions(Restrictions::occurs(1, 1));
        let mut target = class_with(&["a"]).with_extensions(vec![extension.clone()]);

        create_default_attribute(&mut target, &extension);

        assert!(target.extensions.is_empty());
        assert_eq!(names(&target), vec!["value", "a"]);
        assert_eq!(target.attrs[0].tag, Tag::Extension);
        assert_eq!(target.attrs[0].restrictions.min_occurs, Some(1));
    }

    #[test]
    fn test_create_default_attribute_for_any_type() {
        let extension = Extension::new(AttributeType::native(DataType::AnyType));
        let mut target = class_with(&[]).with_extensions(vec![extension.clone()]);

        create_default_attribute(&mut target, &extension);

        assert_eq!(names(&target), vec!["any_element"]);
        assert_eq!(target.attrs[0].tag, Tag::Any);
        assert_eq!(target.attrs[0].namespace.as_deref(), Some(NAMESPACE_ANY));
    }

    #[test]
    fn test_create_reference_attribute() {
        let mut source = Class::new("circle", ClassKind::Element).with_source_namespace("urn:shapes").with_prefix("s", "urn:shapes");
        source.namespace = Some("urn:shapes".to_string());

        let attr = create_reference_attribute(&source, &QName::new(Some("urn:shapes"), "shape"));
        assert_eq!(attr.name, "circle");
        assert_eq!(attr.tag, Tag::Element);
        assert_eq!(attr.types[0].name, "circle");
        assert_eq!(attr.namespace.as_deref(), Some("urn:shapes"));

        let attr = create_reference_attribute(&source, &QName::new(Some("urn:other"), "shape"));
        assert_eq!(attr.types[0].name, "s:circle");
    }

    #[test]
    fn test_reset_attribute_type() {
        let mut attr_type = AttributeType {
            name: "foo".to_string(),
            self_ref: true,
            forward_ref: true,
            ..Default::default()
        };

        reset_attribute_type(&mut attr_type, DataType::String);
        assert_eq!(attr_type, AttributeType::native(DataType::String));
    }
}
