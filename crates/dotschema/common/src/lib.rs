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

//! Shared class model for the Dotlanth schema compiler
//!
//! The schema front end produces these values from XML Schema documents, the
//! compiler crate analyzes and linearizes them, and target emitters render the
//! result. Nothing in this crate performs analysis.

pub mod enums;
pub mod model;
pub mod qname;
pub mod text;

pub use enums::{ClassKind, DataType, Tag, UnknownDataType};
pub use model::{Attribute, AttributePosition, AttributeType, Class, Extension, Package, Restrictions, UNBOUNDED};
pub use qname::{QName, QNameError};
