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

//! Declaration kinds, attribute tags and the built-in type catalogue

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The schema construct a class was declared from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Element,
    ComplexType,
    SimpleType,
    Attribute,
    AttributeGroup,
    Group,
    Restriction,
    Union,
    List,
}

impl ClassKind {
    /// Structural declarations that end up as standalone output classes
    pub fn is_complex(self) -> bool {
        matches!(self, ClassKind::Element | ClassKind::ComplexType)
    }

    /// Value declarations that are inlined into the attributes using them
    pub fn is_simple(self) -> bool {
        matches!(self, ClassKind::SimpleType | ClassKind::Attribute | ClassKind::Restriction | ClassKind::Union | ClassKind::List)
    }

    pub fn is_group(self) -> bool {
        matches!(self, ClassKind::Group | ClassKind::AttributeGroup)
    }

    /// The attribute tag used when a class of this kind is referenced as a field
    pub fn reference_tag(self) -> Tag {
        match self {
            ClassKind::Element | ClassKind::ComplexType => Tag::Element,
            ClassKind::Attribute => Tag::Attribute,
            ClassKind::AttributeGroup => Tag::AttributeGroup,
            ClassKind::Group => Tag::Group,
            ClassKind::SimpleType | ClassKind::Restriction | ClassKind::Union | ClassKind::List => Tag::Text,
        }
    }
}

/// Attribute kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Element,
    Attribute,
    /// Wildcard element (`xs:any`)
    Any,
    /// Wildcard attributes (`xs:anyAttribute`)
    AnyAttribute,
    /// Placeholder holding the value of a simple-content extension
    Extension,
    Text,
    Enumeration,
    Group,
    AttributeGroup,
}

impl Tag {
    /// Label of the serialized form the generated field maps to
    pub fn xml_type(self) -> &'static str {
        match self {
            Tag::Element => "element",
            Tag::Attribute => "attribute",
            Tag::Any => "wildcard",
            Tag::AnyAttribute => "attributes",
            Tag::Extension | Tag::Text | Tag::Enumeration | Tag::Group | Tag::AttributeGroup => "text",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown built-in type code: `{0}`")]
pub struct UnknownDataType(pub String);

macro_rules! data_types {
    ($($variant:ident => $code:literal),+ $(,)?) => {
        /// XML Schema built-in primitive types, resolved without index lookups
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum DataType {
            $($variant),+
        }

        impl DataType {
            pub const ALL: &'static [DataType] = &[$(DataType::$variant),+];

            /// Local name of the type in the XML Schema namespace
            pub fn code(self) -> &'static str {
                match self {
                    $(DataType::$variant => $code),+
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(DataType::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

data_types! {
    AnyType => "anyType",
    AnySimpleType => "anySimpleType",
    AnyAtomicType => "anyAtomicType",
    String => "string",
    NormalizedString => "normalizedString",
    Token => "token",
    Language => "language",
    Name => "Name",
    NcName => "NCName",
    NmToken => "NMTOKEN",
    NmTokens => "NMTOKENS",
    Id => "ID",
    IdRef => "IDREF",
    IdRefs => "IDREFS",
    Entity => "ENTITY",
    Entities => "ENTITIES",
    Boolean => "boolean",
    Decimal => "decimal",
    Integer => "integer",
    NonPositiveInteger => "nonPositiveInteger",
    NegativeInteger => "negativeInteger",
    Long => "long",
    Int => "int",
    Short => "short",
    Byte => "byte",
    NonNegativeInteger => "nonNegativeInteger",
    UnsignedLong => "unsignedLong",
    UnsignedInt => "unsignedInt",
    UnsignedShort => "unsignedShort",
    UnsignedByte => "unsignedByte",
    PositiveInteger => "positiveInteger",
    Float => "float",
    Double => "double",
    Duration => "duration",
    DateTime => "dateTime",
    Time => "time",
    Date => "date",
    GYearMonth => "gYearMonth",
    GYear => "gYear",
    GMonthDay => "gMonthDay",
    GDay => "gDay",
    GMonth => "gMonth",
    HexBinary => "hexBinary",
    Base64Binary => "base64Binary",
    AnyUri => "anyURI",
    QName => "QName",
    Notation => "NOTATION",
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.code().to_string()
    }
}

impl TryFrom<String> for DataType {
    type Error = UnknownDataType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DataType::from_code(&value).ok_or(UnknownDataType(value))
    }
}
