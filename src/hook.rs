// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Hooks run around scenarios and steps, selected by scenario tags.

use std::{fmt, sync::Arc};

use derive_more::with_trait::Display;
use futures::future::LocalBoxFuture;

use crate::{
    step::Location,
    tag::{self, Filter, TagSet},
};

/// Kind of a [`Hook`], defining when it runs.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Kind {
    /// Runs before each scenario, after its world is built.
    #[display("Before")]
    Before,

    /// Runs after each scenario.
    #[display("After")]
    After,

    /// Runs after each step of a scenario.
    #[display("AfterStep")]
    AfterStep,
}

/// Alias for a hook body: an async [`fn`] run against the current `World`.
pub type HookFn<World> = for<'a> fn(&'a mut World) -> LocalBoxFuture<'a, ()>;

/// Hook body bound to a [`Kind`] and a tag [`Filter`].
pub struct Hook<World> {
    kind: Kind,
    filter: Arc<dyn Filter>,
    location: Option<Location>,
    func: HookFn<World>,
}

impl<World> Hook<World> {
    /// Returns the [`Kind`] of this [`Hook`].
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the tag [`Filter`] of this [`Hook`].
    #[must_use]
    pub fn filter(&self) -> &dyn Filter {
        &*self.filter
    }

    /// Returns the [`Location`] this [`Hook`] was registered at.
    #[must_use]
    pub const fn location(&self) -> Option<Location> {
        self.location
    }

    /// Returns the body of this [`Hook`].
    #[must_use]
    pub const fn func(&self) -> HookFn<World> {
        self.func
    }

    /// Indicates whether this [`Hook`] applies to a scenario with the given
    /// `tags`.
    #[must_use]
    pub fn applies_to(&self, tags: &TagSet) -> bool {
        tag::satisfies(&*self.filter, tags)
    }
}

// Implemented manually to omit redundant `World: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<World> Clone for Hook<World> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            filter: Arc::clone(&self.filter),
            location: self.location,
            func: self.func,
        }
    }
}

impl<World> fmt::Debug for Hook<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("kind", &self.kind)
            .field("filter", &self.filter)
            .field("location", &self.location)
            .field("func", &format_args!("{:p}", self.func))
            .finish()
    }
}

/// [`Hook`]s of every [`Kind`], each kind kept in registration order.
pub struct Collection<World> {
    before: Vec<Hook<World>>,
    after: Vec<Hook<World>>,
    after_step: Vec<Hook<World>>,
}

// Implemented manually to omit redundant `World: Default` trait bound, imposed
// by `#[derive(Default)]`.
impl<World> Default for Collection<World> {
    fn default() -> Self {
        Self { before: Vec::new(), after: Vec::new(), after_step: Vec::new() }
    }
}

// Implemented manually to omit redundant `World: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<World> Clone for Collection<World> {
    fn clone(&self) -> Self {
        Self {
            before: self.before.clone(),
            after: self.after.clone(),
            after_step: self.after_step.clone(),
        }
    }
}

impl<World> fmt::Debug for Collection<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("before", &self.before)
            .field("after", &self.after)
            .field("after_step", &self.after_step)
            .finish()
    }
}

impl<World> Collection<World> {
    /// Creates a new empty [`Collection`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn of(&self, kind: Kind) -> &Vec<Hook<World>> {
        match kind {
            Kind::Before => &self.before,
            Kind::After => &self.after,
            Kind::AfterStep => &self.after_step,
        }
    }

    /// Appends a [`Hook`] of the given [`Kind`].
    pub fn register(
        &mut self,
        kind: Kind,
        filter: impl Filter + 'static,
        loc: Option<Location>,
        func: HookFn<World>,
    ) -> &Hook<World> {
        tracing::debug!(%kind, ?filter, location = ?loc, "registered hook");
        let hooks = match kind {
            Kind::Before => &mut self.before,
            Kind::After => &mut self.after,
            Kind::AfterStep => &mut self.after_step,
        };
        hooks.push(Hook { kind, filter: Arc::new(filter), location: loc, func });
        let last = hooks.len() - 1;
        &hooks[last]
    }

    /// Returns the number of registered [`Hook`]s of the given [`Kind`].
    #[must_use]
    pub fn len(&self, kind: Kind) -> usize {
        self.of(kind).len()
    }

    /// Selects the [`Hook`]s of the given [`Kind`] applying to a scenario with
    /// the given `tags`, in registration order.
    pub fn applicable<'me, 't>(
        &'me self,
        kind: Kind,
        tags: &'t TagSet,
    ) -> impl DoubleEndedIterator<Item = &'me Hook<World>> + 't
    where
        'me: 't,
    {
        tracing::trace!(%kind, ?tags, "selecting hooks");
        self.of(kind).iter().filter(move |h| h.applies_to(tags))
    }
}
