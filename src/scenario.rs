// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-scenario query sequence over a sealed [`Registry`].
//!
//! A [`Scenario`] owns the world built for it. The order of queries is:
//! world build, `Before` hooks, then for each step its definition match
//! followed by `AfterStep` hooks, and finally `After` hooks.

use std::str::FromStr;

use derive_more::with_trait::Display;
use smart_default::SmartDefault;
use tracing::Instrument as _;

use crate::{
    hook::{Hook, Kind},
    step::{Match, MatchError},
    tag::TagSet,
    Registry,
};

/// Order to run `After` hooks of a scenario in.
///
/// The hook registry always yields hooks in registration order, this only
/// affects the [`Scenario`] driver.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, SmartDefault)]
pub enum AfterOrder {
    /// First registered, first run.
    #[default]
    #[display("registration")]
    Registration,

    /// Last registered, first run.
    #[display("reverse")]
    Reverse,
}

impl FromStr for AfterOrder {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "registration" | "fifo" => Ok(Self::Registration),
            "reverse" | "lifo" => Ok(Self::Reverse),
            _ => Err("possible options: registration, reverse"),
        }
    }
}

/// Step of a [`Scenario`] resolved to its definition, with the `AfterStep`
/// hooks to run once it's done.
#[derive(Debug)]
pub struct Planned<'r, World> {
    /// Matched step definition and its arguments.
    pub matched: Match<'r, World>,

    /// `AfterStep` hooks applying to the scenario, in run order.
    pub after_step: Vec<&'r Hook<World>>,
}

/// Single scenario being run against a [`Registry`].
#[derive(Debug)]
pub struct Scenario<'r, World> {
    registry: &'r Registry<World>,
    tags: TagSet,
    world: World,
    failed: Option<MatchError>,
    span: tracing::Span,
}

impl<'r, World> Scenario<'r, World> {
    pub(crate) fn new(
        registry: &'r Registry<World>,
        tags: TagSet,
        world: World,
    ) -> Self {
        let span = tracing::debug_span!("scenario", tags = ?tags);
        Self { registry, tags, world, failed: None, span }
    }

    /// Returns the tags of this [`Scenario`].
    #[must_use]
    pub const fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Returns the world of this [`Scenario`].
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Returns the world of this [`Scenario`] for mutation.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Returns the [`MatchError`] which aborted this [`Scenario`], if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&MatchError> {
        self.failed.as_ref()
    }

    /// Consumes this [`Scenario`] returning its world.
    #[must_use]
    pub fn into_world(self) -> World {
        self.world
    }

    fn hooks(&self, kind: Kind) -> Vec<&'r Hook<World>> {
        let _entered = self.span.enter();
        self.registry.hooks_for(kind, &self.tags).collect()
    }

    /// Returns the `Before` hooks applying to this [`Scenario`], in run order.
    #[must_use]
    pub fn before_hooks(&self) -> Vec<&'r Hook<World>> {
        self.hooks(Kind::Before)
    }

    /// Returns the `After` hooks applying to this [`Scenario`], in the
    /// [`AfterOrder`] configured on the [`Registry`].
    #[must_use]
    pub fn after_hooks(&self) -> Vec<&'r Hook<World>> {
        let mut hooks = self.hooks(Kind::After);
        if self.registry.after_order() == AfterOrder::Reverse {
            hooks.reverse();
        }
        hooks
    }

    /// Resolves the given step `text` to its definition.
    ///
    /// # Errors
    ///
    /// If the `text` is [`Undefined`] or [`Ambiguous`]. Either aborts the
    /// rest of this [`Scenario`]: every following call returns the same
    /// error without resolving anything.
    ///
    /// [`Ambiguous`]: MatchError::Ambiguous
    /// [`Undefined`]: MatchError::Undefined
    pub fn step(
        &mut self,
        text: &str,
    ) -> Result<Planned<'r, World>, MatchError> {
        if let Some(e) = &self.failed {
            tracing::debug!(
                parent: &self.span,
                step = text,
                "skipped step of aborted scenario"
            );
            return Err(e.clone());
        }
        let matched = {
            let _entered = self.span.enter();
            self.registry.match_step(text)
        };
        match matched {
            Ok(matched) => {
                Ok(Planned { matched, after_step: self.hooks(Kind::AfterStep) })
            }
            Err(e) => {
                self.failed = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Runs the `Before` hooks against the world.
    pub async fn run_before(&mut self) {
        let span = self.span.clone();
        for hook in self.before_hooks() {
            (hook.func())(&mut self.world).instrument(span.clone()).await;
        }
    }

    /// Runs the step matching the given `text`, followed by the `AfterStep`
    /// hooks.
    ///
    /// # Errors
    ///
    /// If the `text` is [`Undefined`] or [`Ambiguous`], or an earlier step of
    /// this [`Scenario`] was. Nothing is run then, but the `After` hooks still
    /// may be.
    ///
    /// [`Ambiguous`]: MatchError::Ambiguous
    /// [`Undefined`]: MatchError::Undefined
    pub async fn run_step(&mut self, text: &str) -> Result<(), MatchError> {
        let Planned { matched, after_step } = self.step(text)?;
        let span = self.span.clone();

        (matched.definition.step())(&mut self.world, matched.context)
            .instrument(span.clone())
            .await;
        for hook in after_step {
            (hook.func())(&mut self.world).instrument(span.clone()).await;
        }
        Ok(())
    }

    /// Runs the `After` hooks against the world.
    pub async fn run_after(&mut self) {
        let span = self.span.clone();
        for hook in self.after_hooks() {
            (hook.func())(&mut self.world).instrument(span.clone()).await;
        }
    }
}
