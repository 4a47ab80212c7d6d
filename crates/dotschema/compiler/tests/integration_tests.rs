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

//! Integration tests for the complete schema compiler pipeline
//!
//! These tests feed the class model a front end would produce, as JSON, through
//! analysis and module resolution.

use dotschema_common::{AttributeType, Class, ClassKind, DataType, Package, QName, UNBOUNDED};
use dotschema_compiler::{AnalyzerConfig, ClassAnalyzer, DiagnosticKind, generate_modules};

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

fn purchase_order() -> Vec<Class> {
    serde_json::from_str(include_str!("fixtures/purchase_order.json")).expect("Fixture should deserialize")
}

fn find<'a>(classes: &'a [Class], name: &str) -> &'a Class {
    classes.iter().find(|class| class.name == name).unwrap_or_else(|| panic!("Class {} should be selected", name))
}

/// Only structured classes survive, simple types are inlined into the fields using them
#[test]
fn test_purchase_order_selection() {
    init_tracing();

    let result = ClassAnalyzer::with_default_config().process(purchase_order()).expect("Analysis should succeed");
    assert!(result.diagnostics.is_empty(), "Unexpected diagnostics: {:?}", result.diagnostics);

    let names: Vec<&str> = result.value.iter().map(|class| class.name.as_str()).collect();
    assert_eq!(names, vec!["purchaseOrder", "comment", "PurchaseOrderType", "USAddress", "Items"]);
}

/// Extensions, simple types and occurrences are reduced to their canonical form
#[test]
fn test_purchase_order_flattening() {
    init_tracing();

    let result = ClassAnalyzer::with_default_config().process(purchase_order()).expect("Analysis should succeed");
    let classes = &result.value;

    let purchase_order = find(classes, "purchaseOrder");
    assert!(purchase_order.attrs.is_empty());
    assert_eq!(purchase_order.extensions.len(), 1);
    assert_eq!(purchase_order.extensions[0].ty.name, "po:PurchaseOrderType");

    let comment = find(classes, "comment");
    assert_eq!(comment.attrs.len(), 1);
    assert_eq!(comment.attrs[0].name, "value");
    assert!(comment.extensions.is_empty());

    let order_type = find(classes, "PurchaseOrderType");
    let required: Vec<bool> = order_type.attrs.iter().map(|attr| attr.restrictions.required).collect();
    assert_eq!(required, vec![true, true, false, true, false]);
    assert!(order_type.attrs.iter().all(|attr| attr.restrictions.min_occurs.is_none() && attr.restrictions.max_occurs.is_none()));

    let address = find(classes, "USAddress");
    let country = &address.attrs[5];
    assert!(country.fixed);
    assert_eq!(country.default.as_deref(), Some("US"));

    let items = find(classes, "Items");
    let item = &items.attrs[0];
    assert_eq!((item.restrictions.min_occurs, item.restrictions.max_occurs), (Some(0), Some(UNBOUNDED)));
    assert!(!item.restrictions.sequential);
    assert!(item.types[0].forward_ref);

    let inner = &items.inner[0];
    let quantity = &inner.attrs[1];
    assert_eq!(quantity.types[0].native_type(), Some(DataType::PositiveInteger));
    assert_eq!(quantity.restrictions.max_exclusive.as_deref(), Some("100"));
    assert!(quantity.restrictions.required);

    let part_num = &inner.attrs[5];
    assert_eq!(part_num.types[0].native_type(), Some(DataType::String));
    assert!(part_num.restrictions.pattern.is_some());
    assert!(part_num.restrictions.required);

    assert_eq!(inner.attrs[3].types, vec![AttributeType::reference("po:comment")]);
}

/// Classes are grouped per module, ordered by dependency and import what lives elsewhere
#[test]
fn test_purchase_order_modules() {
    init_tracing();

    let result = generate_modules(purchase_order(), &AnalyzerConfig::default()).expect("Generation should succeed");
    let modules = &result.value;

    let paths: Vec<String> = modules.iter().map(|module| module.path()).collect();
    assert_eq!(paths, vec!["generated.po", "generated.common"]);

    let po = &modules[0];
    let names: Vec<&str> = po.classes.iter().map(|class| class.name.as_str()).collect();
    assert_eq!(names, vec!["comment", "Items", "PurchaseOrderType", "purchaseOrder"]);
    assert_eq!(po.imports, vec![Package::new("USAddress", None, "generated.common")]);

    let common = &modules[1];
    assert_eq!(common.classes.len(), 1);
    assert!(common.imports.is_empty());
}

/// The resolved modules serialize for hand-off to an emitter
#[test]
fn test_resolved_modules_serialize() {
    let result = generate_modules(purchase_order(), &AnalyzerConfig::default()).expect("Generation should succeed");
    let json = serde_json::to_value(&result.value).expect("Modules should serialize");

    assert_eq!(json[0]["module"], "po");
    assert_eq!(json[0]["imports"][0]["source"], "generated.common");
    assert_eq!(json[1]["classes"][0]["name"], "USAddress");
}

/// Degraded corners are reported without stopping the run
#[test]
fn test_unresolved_references_degrade() {
    init_tracing();

    let mut classes = purchase_order();
    classes.retain(|class| class.name != "USAddress" && class.name != "quantityType");

    let result = ClassAnalyzer::with_default_config().process(classes).expect("Analysis should succeed");
    let order_type = find(&result.value, "PurchaseOrderType");

    assert_eq!(order_type.attrs[0].types, vec![AttributeType::native(DataType::String)]);
    let missing: Vec<&str> = result.diagnostics.iter().filter(|d| d.kind == DiagnosticKind::MissingType).map(|d| d.subject.as_str()).collect();
    assert_eq!(missing, vec!["po:USAddress", "po:USAddress", "po:quantityType"]);
}

/// Configuration can be supplied as TOML
#[test]
fn test_toml_configuration() {
    let config = AnalyzerConfig::from_toml_str(
        r#"
        fallback_type = "anySimpleType"
        mixed_content_name = "text"
        "#,
    )
    .expect("Configuration should parse");

    let mut classes = purchase_order();
    classes.retain(|class| class.name != "USAddress");
    let mixed = Class::new("note", ClassKind::ComplexType).with_source_namespace("urn:po").with_mixed(true);
    classes.push(mixed);

    let result = ClassAnalyzer::new(config).process(classes).expect("Analysis should succeed");
    let order_type = find(&result.value, "PurchaseOrderType");
    assert_eq!(order_type.attrs[0].types, vec![AttributeType::native(DataType::AnySimpleType)]);
    assert_eq!(find(&result.value, "note").attrs[0].name, "text");
}

/// A class name collision that analysis cannot resolve stops generation
#[test]
fn test_unresolved_duplicate_is_fatal() {
    let mut classes = purchase_order();
    classes.push(Class::new("Items", ClassKind::Element).with_source_namespace("urn:po").with_module("po").with_package("generated"));

    let error = generate_modules(classes, &AnalyzerConfig::default()).unwrap_err();
    assert_eq!(error.to_string(), format!("Resolver error: Duplicate class: `{}`", QName::new(Some("urn:po"), "Items")));
}
