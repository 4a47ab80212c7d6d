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

//! Class fields, their type references and extension records

use super::Restrictions;
use crate::enums::{DataType, Tag};
use crate::text;
use serde::{Deserialize, Serialize};

/// Where a field sits relative to the fields it is merged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributePosition {
    /// Original declaration index
    AtIndex(usize),
    /// Synthesized field that always sorts last
    AtEnd,
}

impl Default for AttributePosition {
    fn default() -> Self {
        AttributePosition::AtIndex(0)
    }
}

/// A reference from a field or extension to a type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeType {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub native: bool,
    /// The type depends on the class containing it and needs a deferred reference
    pub self_ref: bool,
    /// The type is a nested class not yet visible at the point of use
    pub forward_ref: bool,
}

impl AttributeType {
    /// Reference to a class in the index
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Reference to a built-in primitive
    pub fn native(data_type: DataType) -> Self {
        Self {
            name: data_type.code().to_string(),
            native: true,
            ..Self::default()
        }
    }

    /// Reference to a nested class of the containing class
    pub fn forward(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            forward_ref: true,
            ..Self::default()
        }
    }

    pub fn native_code(&self) -> Option<&str> {
        self.native.then(|| text::suffix(&self.name))
    }

    pub fn native_type(&self) -> Option<DataType> {
        self.native_code().and_then(DataType::from_code)
    }
}

/// A class field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    pub tag: Tag,
    #[serde(default)]
    pub position: AttributePosition,
    #[serde(default)]
    pub types: Vec<AttributeType>,
    #[serde(default)]
    pub restrictions: Restrictions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub fixed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, tag: Tag) -> Self {
        let name = name.into();
        Self {
            local_name: Some(name.clone()),
            name,
            tag,
            position: AttributePosition::default(),
            types: Vec::new(),
            restrictions: Restrictions::default(),
            default: None,
            fixed: false,
            namespace: None,
            help: None,
        }
    }

    pub fn with_types(mut self, types: Vec<AttributeType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_type(self, attr_type: AttributeType) -> Self {
        self.with_types(vec![attr_type])
    }

    pub fn with_restrictions(mut self, restrictions: Restrictions) -> Self {
        self.restrictions = restrictions;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_position(mut self, position: AttributePosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn is_group(&self) -> bool {
        matches!(self.tag, Tag::Group | Tag::AttributeGroup)
    }

    pub fn is_enumeration(&self) -> bool {
        self.tag == Tag::Enumeration
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.tag, Tag::Any | Tag::AnyAttribute)
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self.tag, Tag::Attribute | Tag::AnyAttribute)
    }

    pub fn is_list(&self) -> bool {
        self.restrictions.is_list()
    }

    pub fn is_suffix(&self) -> bool {
        self.position == AttributePosition::AtEnd
    }

    pub fn xml_type(&self) -> &'static str {
        self.tag.xml_type()
    }

    /// Two declarations of the same field, regardless of restrictions and types
    pub fn same_identity(&self, other: &Attribute) -> bool {
        self.name == other.name && self.local_name == other.local_name && self.tag == other.tag && self.namespace == other.namespace
    }
}

/// A declared base type together with the restrictions it imposes on the inheriting class
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extension {
    #[serde(rename = "type")]
    pub ty: AttributeType,
    #[serde(default)]
    pub restrictions: Restrictions,
}

impl Extension {
    pub fn new(ty: AttributeType) -> Self {
        Self {
            ty,
            restrictions: Restrictions::default(),
        }
    }

    pub fn with_restrictions(mut self, restrictions: Restrictions) -> Self {
        self.restrictions = restrictions;
        self
    }
}
