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

//! Class model exchanged between the schema front end, the compiler and the emitters

mod attribute;
mod class;
mod restrictions;

pub use attribute::{Attribute, AttributePosition, AttributeType, Extension};
pub use class::Class;
pub use restrictions::{Restrictions, UNBOUNDED};

use serde::{Deserialize, Serialize};

/// A resolved import: the symbol `name` (optionally renamed to `alias`) lives in module `source`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub source: String,
}

impl Package {
    pub fn new(name: impl Into<String>, alias: Option<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias,
            source: source.into(),
        }
    }
}
