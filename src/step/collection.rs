// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Ordered collection of step definitions and the matching engine.

use std::{fmt, iter};

use futures::future::LocalBoxFuture;
use itertools::Itertools as _;
use regex::Regex;

use super::{
    context::Context,
    error::{AmbiguousMatchError, MatchError},
    location::Location,
    regex::HashableRegex,
};

/// Alias for a step body: an async [`fn`] run against a `World` with the
/// [`Context`] of its match.
pub type Step<World> =
    for<'a> fn(&'a mut World, Context) -> LocalBoxFuture<'a, ()>;

/// Pattern bound to a [`Step`] body.
///
/// Identified by its pattern text and registration [`Location`].
pub struct Definition<World> {
    regex: HashableRegex,
    location: Option<Location>,
    step: Step<World>,
}

impl<World> Definition<World> {
    /// Returns the pattern of this [`Definition`].
    #[must_use]
    pub const fn regex(&self) -> &HashableRegex {
        &self.regex
    }

    /// Returns the [`Location`] this [`Definition`] was registered at.
    #[must_use]
    pub const fn location(&self) -> Option<Location> {
        self.location
    }

    /// Returns the [`Step`] body of this [`Definition`].
    #[must_use]
    pub const fn step(&self) -> Step<World> {
        self.step
    }
}

// Implemented manually to omit redundant `World: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<World> Clone for Definition<World> {
    fn clone(&self) -> Self {
        Self {
            regex: self.regex.clone(),
            location: self.location,
            step: self.step,
        }
    }
}

impl<World> fmt::Debug for Definition<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("regex", &self.regex)
            .field("location", &self.location)
            .field("step", &format_args!("{:p}", self.step))
            .finish()
    }
}

/// Successful match of a step text: the single matching [`Definition`] and
/// the [`Context`] carrying its captures.
#[derive(Debug)]
pub struct Match<'me, World> {
    /// Matched [`Definition`].
    pub definition: &'me Definition<World>,

    /// Captures extracted from the step text.
    pub context: Context,
}

impl<World> Match<'_, World> {
    /// Returns the captured arguments in pattern order.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        self.context.to_args()
    }
}

/// Collection of step [`Definition`]s in registration order.
///
/// Every step text has to match exactly 1 [`Definition`]. Duplicates are
/// accepted on registration and reported on matching.
pub struct Collection<World> {
    definitions: Vec<Definition<World>>,
}

// Implemented manually to omit redundant `World: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<World> Clone for Collection<World> {
    fn clone(&self) -> Self {
        Self { definitions: self.definitions.clone() }
    }
}

// Implemented manually to omit redundant `World: Default` trait bound, imposed
// by `#[derive(Default)]`.
impl<World> Default for Collection<World> {
    fn default() -> Self {
        Self { definitions: Vec::new() }
    }
}

impl<World> fmt::Debug for Collection<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.definitions).finish()
    }
}

impl<World> Collection<World> {
    /// Creates a new empty [`Collection`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a [`Definition`] matching the given `regex`.
    ///
    /// Never fails: a pattern equal to an already registered one is kept and
    /// makes every step text it matches [`Ambiguous`].
    ///
    /// [`Ambiguous`]: MatchError::Ambiguous
    pub fn define(
        &mut self,
        loc: Option<Location>,
        regex: Regex,
        step: Step<World>,
    ) -> &Definition<World> {
        tracing::debug!(
            pattern = regex.as_str(),
            location = ?loc,
            "registered step definition"
        );
        self.definitions.push(Definition { regex: regex.into(), location: loc, step });
        let last = self.definitions.len() - 1;
        &self.definitions[last]
    }

    /// Returns the number of registered [`Definition`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Indicates whether no [`Definition`] is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterates over the [`Definition`]s in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Definition<World>> + '_ {
        self.definitions.iter()
    }

    /// Matches the given step `text` against every registered pattern.
    ///
    /// Patterns are applied with their own anchoring, so an unanchored pattern
    /// may match a substring of the `text`.
    ///
    /// # Errors
    ///
    /// - [`MatchError::Undefined`] if no pattern matches the `text`.
    /// - [`MatchError::Ambiguous`] if two or more patterns match it.
    pub fn find(&self, text: &str) -> Result<Match<'_, World>, MatchError> {
        let mut found = self
            .definitions
            .iter()
            .filter_map(|def| {
                let mut captures = def.regex.capture_locations();
                def.regex
                    .captures_read(&mut captures, text)
                    .map(|whole| (def, whole, captures))
            })
            .collect::<Vec<_>>();

        let (definition, whole_match, captures) = match found.len() {
            0 => {
                tracing::trace!(step = text, "no step definition matched");
                return Err(MatchError::Undefined { step_text: text.to_owned() });
            }
            // Instead of `.unwrap()` to avoid documenting `# Panics`.
            1 => found.pop().unwrap_or_else(|| unreachable!()),
            _ => {
                let err = AmbiguousMatchError {
                    step_text: text.to_owned(),
                    possible_matches: found
                        .into_iter()
                        .map(|(def, ..)| (def.regex.clone(), def.location))
                        .sorted()
                        .collect(),
                };
                tracing::warn!(
                    step = text,
                    count = err.possible_matches.len(),
                    "ambiguous step match"
                );
                return Err(err.into());
            }
        };

        let matches = definition
            .regex
            .capture_names()
            .map(|opt| opt.map(str::to_owned))
            .zip(iter::once(whole_match.as_str().to_owned()).chain(
                (1..captures.len()).map(|group_id| {
                    captures
                        .get(group_id)
                        .and_then(|(s, e)| text.get(s..e))
                        .unwrap_or("")
                        .to_owned()
                }),
            ))
            .collect();

        tracing::trace!(
            step = text,
            pattern = definition.regex.as_str(),
            "step definition matched"
        );

        Ok(Match {
            definition,
            context: Context { step: text.to_owned(), matches },
        })
    }
}
