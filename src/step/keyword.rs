// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step introducer keywords.

use std::collections::BTreeSet;

/// Introducers known out of the box.
pub const DEFAULT: [&str; 6] = ["Given", "When", "Then", "And", "But", "*"];

/// Lookup table of step introducer keywords.
///
/// Every keyword resolves to the same step registration: the introducer a
/// definition is registered under never affects matching.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Keywords(BTreeSet<String>);

impl Default for Keywords {
    fn default() -> Self {
        Self(DEFAULT.iter().map(|&k| k.to_owned()).collect())
    }
}

impl Keywords {
    /// Adds an alias `keyword` (a localized introducer, for example).
    ///
    /// Returns `false` if the `keyword` was already known.
    pub fn alias(&mut self, keyword: impl AsRef<str>) -> bool {
        let keyword = keyword.as_ref().trim();
        if keyword.is_empty() {
            return false;
        }
        self.0.insert(keyword.to_owned())
    }

    /// Resolves the given `keyword`, ignoring surrounding whitespace.
    #[must_use]
    pub fn resolve(&self, keyword: &str) -> Option<&str> {
        self.0.get(keyword.trim()).map(String::as_str)
    }

    /// Iterates over all the known keywords.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }
}
