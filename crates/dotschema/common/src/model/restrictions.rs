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

//! Facet and occurrence restrictions carried by attributes and extensions

use serde::{Deserialize, Serialize};

/// `maxOccurs="unbounded"`
pub const UNBOUNDED: usize = usize::MAX;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Restrictions {
    pub required: bool,
    pub prohibited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_occurs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_occurs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_exclusive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_inclusive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_exclusive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_inclusive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_digits: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraction_digits: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_space: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nillable: Option<bool>,
    /// Ordering must be preserved against sibling sequential fields
    pub sequential: bool,
}

impl Restrictions {
    /// Occurrence bounds only
    pub fn occurs(min_occurs: usize, max_occurs: usize) -> Self {
        Self {
            min_occurs: Some(min_occurs),
            max_occurs: Some(max_occurs),
            ..Self::default()
        }
    }

    pub fn with_sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn is_list(&self) -> bool {
        self.max_occurs.is_some_and(|max| max > 1)
    }

    /// Apply the restrictions of an enclosing reference on top of these.
    ///
    /// Facets set on `source` win. An occurrence bound from `source` replaces
    /// ours when we have none or when it differs from the implied default of one.
    pub fn merge(&mut self, source: &Restrictions) {
        merge_facet(&mut self.min_exclusive, &source.min_exclusive);
        merge_facet(&mut self.min_inclusive, &source.min_inclusive);
        merge_facet(&mut self.max_exclusive, &source.max_exclusive);
        merge_facet(&mut self.max_inclusive, &source.max_inclusive);
        merge_facet(&mut self.total_digits, &source.total_digits);
        merge_facet(&mut self.fraction_digits, &source.fraction_digits);
        merge_facet(&mut self.length, &source.length);
        merge_facet(&mut self.min_length, &source.min_length);
        merge_facet(&mut self.max_length, &source.max_length);
        merge_facet(&mut self.white_space, &source.white_space);
        merge_facet(&mut self.pattern, &source.pattern);

        merge_occurs(&mut self.min_occurs, source.min_occurs);
        merge_occurs(&mut self.max_occurs, source.max_occurs);

        if self.nillable.is_none() {
            self.nillable = source.nillable;
        }
        self.required |= source.required;
        self.prohibited |= source.prohibited;
        self.sequential |= source.sequential;
    }
}

fn merge_facet<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if source.is_some() {
        target.clone_from(source);
    }
}

fn merge_occurs(target: &mut Option<usize>, source: Option<usize>) {
    if let Some(value) = source {
        if target.is_none() || value != 1 {
            *target = Some(value);
        }
    }
}
