// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tag filters deciding whether a hook applies to a scenario.
//!
//! A [`Filter`] is opaque to the [`hook::Collection`]: flat [`Tags`] lists are
//! the baseline, and [`TagOperation`] expressions (`@a and not (@b or @c)`)
//! plug in through the same trait.
//!
//! [`hook::Collection`]: crate::hook::Collection

use std::{collections::BTreeSet, fmt};

use gherkin::tagexpr::TagOperation;
use sealed::sealed;

/// Normalizes a tag by dropping its leading `@`, if any.
fn normalize(tag: &str) -> &str {
    let tag = tag.trim();
    tag.strip_prefix('@').unwrap_or(tag)
}

/// Tags of a scenario, normalized without their leading `@`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Creates an empty [`TagSet`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indicates whether the given `tag` is present.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(normalize(tag))
    }

    /// Iterates over the tags, without their leading `@`.
    pub fn iter(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.0.iter().map(String::as_str)
    }

    /// Indicates whether this [`TagSet`] has no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|t| normalize(t.as_ref()).to_owned())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for TagSet {
    fn from(tags: [S; N]) -> Self {
        tags.into_iter().collect()
    }
}

impl<S: AsRef<str>> From<Vec<S>> for TagSet {
    fn from(tags: Vec<S>) -> Self {
        tags.into_iter().collect()
    }
}

/// Condition over a scenario's [`TagSet`].
pub trait Filter: fmt::Debug + Send + Sync {
    /// Indicates whether the given scenario `tags` satisfy this [`Filter`].
    #[must_use]
    fn satisfied_by(&self, tags: &TagSet) -> bool;
}

/// Indicates whether the given scenario `tags` satisfy the `filter`.
#[must_use]
pub fn satisfies<F: Filter + ?Sized>(filter: &F, tags: &TagSet) -> bool {
    filter.satisfied_by(tags)
}

/// Flat list of required tags, combined with logical AND.
///
/// An empty list is satisfied by any scenario.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tags(Vec<String>);

impl Tags {
    /// [`Tags`] satisfied by every scenario.
    #[must_use]
    pub const fn any() -> Self {
        Self(Vec::new())
    }

    /// Indicates whether no tag is required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|t| normalize(t.as_ref()).to_owned())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for Tags {
    fn from(tags: [S; N]) -> Self {
        tags.into_iter().collect()
    }
}

impl<S: AsRef<str>> From<Vec<S>> for Tags {
    fn from(tags: Vec<S>) -> Self {
        tags.into_iter().collect()
    }
}

impl Filter for Tags {
    fn satisfied_by(&self, tags: &TagSet) -> bool {
        self.0.iter().all(|t| tags.contains(t))
    }
}

/// Extension of a [`TagOperation`] allowing to evaluate it.
#[sealed]
pub trait Ext {
    /// Evaluates this [`TagOperation`] for the given `tags`.
    #[must_use]
    fn eval<I, S>(&self, tags: I) -> bool
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S> + Clone;
}

#[sealed]
impl Ext for TagOperation {
    fn eval<I, S>(&self, tags: I) -> bool
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S> + Clone,
    {
        match self {
            Self::And(l, r) => l.eval(tags.clone()) & r.eval(tags),
            Self::Or(l, r) => l.eval(tags.clone()) | r.eval(tags),
            Self::Not(t) => !t.eval(tags),
            Self::Tag(t) => {
                tags.into_iter().any(|tag| normalize(tag.as_ref()) == normalize(t))
            }
        }
    }
}

impl Filter for TagOperation {
    fn satisfied_by(&self, tags: &TagSet) -> bool {
        self.eval(tags.iter())
    }
}
