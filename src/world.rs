// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! World factory: an optional builder plus capability [`Module`]s mixed into
//! every world built for a scenario.
//!
//! Worlds live on per-scenario basis: [`Factory::build()`] produces a fresh
//! one each time and nothing here keeps a reference to it.

use std::{fmt, sync::Arc};

use crate::{error::RegistryError, step::Location, WorldError};

/// Capability module extending a world after it's built.
///
/// Modules are applied in registration order, so a module assigning a
/// capability already set by an earlier one wins.
pub trait Module<World>: Send + Sync {
    /// Name of this [`Module`], used in logs and [`fmt::Debug`] output.
    fn name(&self) -> &str;

    /// Mixes the capabilities of this [`Module`] into the given `world`.
    fn extend(&self, world: &mut World);
}

/// [`Module`] backed by a plain [`fn`].
pub struct FnModule<World> {
    name: &'static str,
    func: fn(&mut World),
}

impl<World> Module<World> for FnModule<World> {
    fn name(&self) -> &str {
        self.name
    }

    fn extend(&self, world: &mut World) {
        (self.func)(world);
    }
}

/// Creates a [`Module`] out of the given `func`.
#[must_use]
pub const fn from_fn<World>(
    name: &'static str,
    func: fn(&mut World),
) -> FnModule<World> {
    FnModule { name, func }
}

/// Shared [`Module`] as stored by a [`Factory`].
pub type ModuleRef<World> = Arc<dyn Module<World>>;

type BuildFn<World> = dyn Fn() -> Result<World, WorldError> + Send + Sync;

/// Procedure constructing the base world of every scenario.
pub struct Builder<World> {
    func: Arc<BuildFn<World>>,
    location: Option<Location>,
}

impl<World> Builder<World> {
    /// Creates a [`Builder`] out of an infallible constructor.
    #[must_use]
    pub fn new<F>(func: F) -> Self
    where
        F: Fn() -> World + Send + Sync + 'static,
    {
        Self { func: Arc::new(move || Ok(func())), location: None }
    }

    /// Creates a [`Builder`] out of a fallible constructor.
    ///
    /// Its error is reported as a [`WorldError::Creation`] for the scenario
    /// being set up.
    #[must_use]
    pub fn fallible<F, E>(func: F) -> Self
    where
        F: Fn() -> Result<World, E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            func: Arc::new(move || func().map_err(WorldError::creation)),
            location: None,
        }
    }

    /// Attaches the registration [`Location`] to this [`Builder`].
    #[must_use]
    pub fn at(mut self, loc: Location) -> Self {
        self.location = Some(loc);
        self
    }

    /// Returns the registration [`Location`] of this [`Builder`].
    #[must_use]
    pub const fn location(&self) -> Option<Location> {
        self.location
    }
}

// Implemented manually to omit redundant `World: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<World> Clone for Builder<World> {
    fn clone(&self) -> Self {
        Self { func: Arc::clone(&self.func), location: self.location }
    }
}

impl<World> fmt::Debug for Builder<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// At most one [`Builder`] plus the [`Module`]s accumulated across every
/// registration.
pub struct Factory<World> {
    builder: Option<Builder<World>>,
    modules: Vec<ModuleRef<World>>,
}

// Implemented manually to omit redundant `World: Default` trait bound, imposed
// by `#[derive(Default)]`.
impl<World> Default for Factory<World> {
    fn default() -> Self {
        Self { builder: None, modules: Vec::new() }
    }
}

// Implemented manually to omit redundant `World: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<World> Clone for Factory<World> {
    fn clone(&self) -> Self {
        Self { builder: self.builder.clone(), modules: self.modules.clone() }
    }
}

impl<World> fmt::Debug for Factory<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("builder", &self.builder)
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<World> Factory<World> {
    /// Creates a new empty [`Factory`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the given `modules` to the accumulated ones.
    ///
    /// Never fails. A module registered twice is applied twice.
    pub fn register_modules(
        &mut self,
        modules: impl IntoIterator<Item = ModuleRef<World>>,
    ) {
        for m in modules {
            tracing::debug!(module = m.name(), "registered world module");
            self.modules.push(m);
        }
    }

    /// Registers the world [`Builder`].
    ///
    /// # Errors
    ///
    /// With [`RegistryError::DuplicateWorldFactory`] if a [`Builder`] is
    /// already registered. The registered one is kept.
    pub fn register_builder(
        &mut self,
        builder: Builder<World>,
    ) -> Result<(), RegistryError> {
        if let Some(existing) = &self.builder {
            let err = RegistryError::DuplicateWorldFactory {
                existing: existing.location,
                rejected: builder.location,
            };
            tracing::warn!(%err, "rejected world builder");
            return Err(err);
        }
        tracing::debug!(location = ?builder.location, "registered world builder");
        self.builder = Some(builder);
        Ok(())
    }

    /// Iterates over the registered [`Module`]s in registration order.
    pub fn modules(&self) -> impl Iterator<Item = &dyn Module<World>> + '_ {
        self.modules.iter().map(|m| &**m)
    }

    /// Builds a new world.
    ///
    /// Invokes the registered [`Builder`] (or falls back to
    /// [`Default::default()`] if there is none), then applies every
    /// [`Module`] in registration order.
    ///
    /// # Errors
    ///
    /// If the registered [`Builder`] fails.
    pub fn build(&self) -> Result<World, WorldError>
    where
        World: Default,
    {
        let mut world = match &self.builder {
            Some(b) => (b.func)()?,
            None => World::default(),
        };
        for m in &self.modules {
            tracing::trace!(module = m.name(), "mixing module into world");
            m.extend(&mut world);
        }
        Ok(world)
    }
}
