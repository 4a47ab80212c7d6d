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

//! Lookup of the output module owning a class

use dotschema_common::QName;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Places a qualified name in the output module that defines it
pub trait PackageLocator {
    fn find_package(&self, qname: &QName) -> Option<String>;
}

/// Insertion-ordered qualified name to module path map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRegistry {
    packages: IndexMap<QName, String>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the module of `qname`, replacing any previous one
    pub fn register(&mut self, qname: QName, package: impl Into<String>) {
        self.packages.insert(qname, package.into());
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QName, &str)> {
        self.packages.iter().map(|(qname, package)| (qname, package.as_str()))
    }
}

impl FromIterator<(QName, String)> for PackageRegistry {
    fn from_iter<T: IntoIterator<Item = (QName, String)>>(iter: T) -> Self {
        Self {
            packages: iter.into_iter().collect(),
        }
    }
}

impl PackageLocator for PackageRegistry {
    fn find_package(&self, qname: &QName) -> Option<String> {
        self.packages.get(qname).cloned()
    }
}

impl<T: PackageLocator + ?Sized> PackageLocator for &T {
    fn find_package(&self, qname: &QName) -> Option<String> {
        (**self).find_package(qname)
    }
}

impl PackageLocator for HashMap<QName, String> {
    fn find_package(&self, qname: &QName) -> Option<String> {
        self.get(qname).cloned()
    }
}
