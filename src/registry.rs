// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Registry`] facade composing step definitions, hooks and the world
//! factory.

use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use regex::Regex;

use crate::{
    cli,
    error::{RegistryError, WorldError},
    hook::{self, Hook, HookFn, Kind},
    scenario::{AfterOrder, Scenario},
    step::{self, Keywords, Location, Match, MatchError, Step},
    tag::{Filter, TagSet},
    world::{Builder, Factory, Module, ModuleRef},
};

/// Single entry point for glue code registration and runner lookups.
///
/// Setup code registers step definitions, hooks and world factories through
/// `&mut` methods. The first lookup made by a runner ([`build_world()`],
/// [`hooks_for()`], [`match_step()`] or [`scenario()`]) seals the
/// [`Registry`]: any registration after that is rejected with
/// [`RegistryError::RegistrationClosed`].
///
/// A sealed [`Registry`] is read-only, so it may be shared across workers
/// running scenarios in parallel, each of them building its own world.
///
/// [`build_world()`]: Registry::build_world
/// [`hooks_for()`]: Registry::hooks_for
/// [`match_step()`]: Registry::match_step
/// [`scenario()`]: Registry::scenario
pub struct Registry<World> {
    steps: step::Collection<World>,
    hooks: hook::Collection<World>,
    worlds: Factory<World>,
    keywords: Keywords,
    after_order: AfterOrder,
    sealed: AtomicBool,
}

// Implemented manually to omit redundant `World: Default` trait bound, imposed
// by `#[derive(Default)]`.
impl<World> Default for Registry<World> {
    fn default() -> Self {
        Self {
            steps: step::Collection::new(),
            hooks: hook::Collection::new(),
            worlds: Factory::new(),
            keywords: Keywords::default(),
            after_order: AfterOrder::default(),
            sealed: AtomicBool::new(false),
        }
    }
}

impl<World> fmt::Debug for Registry<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("steps", &self.steps)
            .field("hooks", &self.hooks)
            .field("worlds", &self.worlds)
            .field("keywords", &self.keywords)
            .field("after_order", &self.after_order)
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

impl<World> Registry<World> {
    /// Creates a new empty [`Registry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indicates whether this [`Registry`] is sealed and so rejects any
    /// further registration.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Ends the setup phase of this [`Registry`].
    ///
    /// Called implicitly by every runner lookup.
    pub fn seal(&self) {
        if !self.sealed.swap(true, Ordering::AcqRel) {
            tracing::debug!(
                steps = self.steps.len(),
                before = self.hooks.len(Kind::Before),
                after = self.hooks.len(Kind::After),
                after_step = self.hooks.len(Kind::AfterStep),
                "registry sealed"
            );
        }
    }

    fn ensure_open(&self, call: &str) -> Result<(), RegistryError> {
        if self.is_sealed() {
            tracing::warn!(call, "registration rejected, registry is sealed");
            return Err(RegistryError::RegistrationClosed { call: call.to_owned() });
        }
        Ok(())
    }

    /// Applies the given [`cli::Opts`].
    ///
    /// # Errors
    ///
    /// If this [`Registry`] is sealed already.
    pub fn with_cli(&mut self, opts: cli::Opts) -> Result<&mut Self, RegistryError> {
        self.ensure_open("with_cli")?;
        if let Some(order) = opts.after_hooks {
            self.after_order = order;
        }
        for kw in opts.introducers {
            _ = self.alias_introducer(kw)?;
        }
        Ok(self)
    }

    /// Sets the [`AfterOrder`] used by [`Scenario`]s.
    ///
    /// # Errors
    ///
    /// If this [`Registry`] is sealed already.
    pub fn after_hooks_order(
        &mut self,
        order: AfterOrder,
    ) -> Result<&mut Self, RegistryError> {
        self.ensure_open("after_hooks_order")?;
        self.after_order = order;
        Ok(self)
    }

    /// Returns the configured [`AfterOrder`].
    #[must_use]
    pub const fn after_order(&self) -> AfterOrder {
        self.after_order
    }

    /// Returns the known step introducer [`Keywords`].
    #[must_use]
    pub const fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    /// Returns the registered step definitions.
    #[must_use]
    pub const fn steps(&self) -> &step::Collection<World> {
        &self.steps
    }

    /// Returns the registered hooks.
    #[must_use]
    pub const fn hooks(&self) -> &hook::Collection<World> {
        &self.hooks
    }

    /// Returns the world factory.
    #[must_use]
    pub const fn worlds(&self) -> &Factory<World> {
        &self.worlds
    }

    /// Adds a step introducer `keyword` resolving to the step registration.
    ///
    /// # Errors
    ///
    /// If this [`Registry`] is sealed already.
    pub fn alias_introducer(
        &mut self,
        keyword: impl AsRef<str>,
    ) -> Result<&mut Self, RegistryError> {
        self.ensure_open("alias_introducer")?;
        let keyword = keyword.as_ref().trim();
        if keyword.is_empty() {
            tracing::warn!("ignored blank step introducer");
        } else if self.keywords.alias(keyword) {
            tracing::debug!(keyword, "aliased step introducer");
        }
        Ok(self)
    }

    /// Registers a step definition.
    ///
    /// Duplicated patterns are accepted and reported on matching.
    ///
    /// # Errors
    ///
    /// If this [`Registry`] is sealed already.
    pub fn define_step(
        &mut self,
        loc: Option<Location>,
        regex: Regex,
        step: Step<World>,
    ) -> Result<&mut Self, RegistryError> {
        self.ensure_open("define_step")?;
        _ = self.steps.define(loc, regex, step);
        Ok(self)
    }

    /// Registers a step definition under the given introducer `keyword`.
    ///
    /// The `keyword` only has to be known, it doesn't affect matching.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownIntroducer`] if the `keyword` isn't in the
    ///   [`Keywords`] table.
    /// - [`RegistryError::RegistrationClosed`] if this [`Registry`] is sealed
    ///   already.
    pub fn step_as(
        &mut self,
        keyword: &str,
        loc: Option<Location>,
        regex: Regex,
        step: Step<World>,
    ) -> Result<&mut Self, RegistryError> {
        let Some(keyword) = self.keywords.resolve(keyword) else {
            return Err(RegistryError::UnknownIntroducer {
                keyword: keyword.trim().to_owned(),
            });
        };
        self.ensure_open(keyword)?;
        _ = self.steps.define(loc, regex, step);
        Ok(self)
    }

    /// Registers a step definition under the `Given` introducer.
    ///
    /// # Errors
    ///
    /// If this [`Registry`] is sealed already.
    pub fn given(
        &mut self,
        loc: Option<Location>,
        regex: Regex,
        step: Step<World>,
    ) -> Result<&mut Self, RegistryError> {
        self.step_as("Given", loc, regex, step)
    }

    /// Registers a step definition under the `When` introducer.
    ///
    /// # Errors
    ///
    /// If this [`Registry`] is sealed already.
    pub fn when(
        &mut self,
        loc: Option<Location>,
        regex: Regex,
        step: Step<World>,
    ) -> Result<&mut Self, RegistryError> {
        self.step_as("When", loc, regex, step)
    }

    /// Registers a step definition under the `Then` introducer.
    ///
    /// # Errors
    ///
    /// If this [`Registry`] is sealed already.
    pub fn then(
        &mut self,
        loc: Option<Location>,
        regex: Regex,
        step: Step<World>,
    ) -> Result<&mut Self, RegistryError> {
        self.step_as("Then", loc, regex, step)
    }

    fn hook(
        &mut self,
        kind: Kind,
        filter: impl Filter + 'static,
        loc: Option<Location>,
        func: HookFn<World>,
    ) -> Result<&mut Self, RegistryError> {
        self.ensure_open(&kind.to_string())?;
        _ = self.hooks.register(kind, filter, loc, func);
        Ok(self)
    }

    /// Registers a hook run before each scenario whose tags satisfy the
    /// `filter`.
    ///
    /// # Errors
    ///
    /// If this [`Registry`] is sealed already.
    pub fn before(
        &mut self,
        filter: impl Filter + 'static,
        loc: Option<Location>,
        func: HookFn<World>,
    ) -> Result<&mut Self, RegistryError> {
        self.hook(Kind::Before, filter, loc, func)
    }

    /// Registers a hook run after each scenario whose tags satisfy the
    /// `filter`.
    ///
    /// # Errors
    ///
    /// If this [`Registry`] is sealed already.
    pub fn after(
        &mut self,
        filter: impl Filter + 'static,
        loc: Option<Location>,
        func: HookFn<World>,
    ) -> Result<&mut Self, RegistryError> {
        self.hook(Kind::After, filter, loc, func)
    }

    /// Registers a hook run after each step of a scenario whose tags satisfy
    /// the `filter`.
    ///
    /// # Errors
    ///
    /// If this [`Registry`] is sealed already.
    pub fn after_step(
        &mut self,
        filter: impl Filter + 'static,
        loc: Option<Location>,
        func: HookFn<World>,
    ) -> Result<&mut Self, RegistryError> {
        self.hook(Kind::AfterStep, filter, loc, func)
    }

    /// Registers world `modules` and, optionally, the world `builder`.
    ///
    /// May be called any number of times to accumulate modules, but a
    /// [`Builder`] may be registered only once.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateWorldFactory`] if the `builder` is given
    ///   while one is already registered. Nothing is registered then.
    /// - [`RegistryError::RegistrationClosed`] if this [`Registry`] is sealed
    ///   already.
    pub fn world(
        &mut self,
        modules: impl IntoIterator<Item = ModuleRef<World>>,
        builder: Option<Builder<World>>,
    ) -> Result<&mut Self, RegistryError> {
        self.ensure_open("World")?;
        if let Some(b) = builder {
            self.worlds.register_builder(b)?;
        }
        self.worlds.register_modules(modules);
        Ok(self)
    }

    /// Registers a single world [`Module`].
    ///
    /// # Errors
    ///
    /// If this [`Registry`] is sealed already.
    pub fn world_module(
        &mut self,
        module: impl Module<World> + 'static,
    ) -> Result<&mut Self, RegistryError> {
        let module: ModuleRef<World> = std::sync::Arc::new(module);
        self.world([module], None)
    }

    /// Registers the world [`Builder`].
    ///
    /// # Errors
    ///
    /// See [`Registry::world()`].
    pub fn world_builder(
        &mut self,
        builder: Builder<World>,
    ) -> Result<&mut Self, RegistryError> {
        self.world(Vec::new(), Some(builder))
    }

    /// Builds a fresh world for a scenario.
    ///
    /// Must be called exactly once per scenario, before any of its hooks or
    /// steps run.
    ///
    /// # Errors
    ///
    /// If the registered [`Builder`] fails.
    pub fn build_world(&self) -> Result<World, WorldError>
    where
        World: Default,
    {
        self.seal();
        self.worlds.build()
    }

    /// Selects the hooks of the given [`Kind`] applying to a scenario with
    /// the given `tags`, in registration order.
    pub fn hooks_for<'me, 't>(
        &'me self,
        kind: Kind,
        tags: &'t TagSet,
    ) -> impl DoubleEndedIterator<Item = &'me Hook<World>> + 't
    where
        'me: 't,
    {
        self.seal();
        self.hooks.applicable(kind, tags)
    }

    /// Matches the given step `text` to exactly one step definition.
    ///
    /// # Errors
    ///
    /// - [`MatchError::Undefined`] if no definition matches the `text`.
    /// - [`MatchError::Ambiguous`] if two or more definitions match it.
    pub fn match_step(&self, text: &str) -> Result<Match<'_, World>, MatchError> {
        self.seal();
        self.steps.find(text)
    }

    /// Starts a [`Scenario`] with the given `tags`, building its world.
    ///
    /// # Errors
    ///
    /// If the registered [`Builder`] fails. Only this scenario is affected.
    pub fn scenario(
        &self,
        tags: impl Into<TagSet>,
    ) -> Result<Scenario<'_, World>, WorldError>
    where
        World: Default,
    {
        let world = self.build_world()?;
        Ok(Scenario::new(self, tags.into(), world))
    }
}
