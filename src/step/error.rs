// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of matching a step text against a [`Collection`].
//!
//! [`Collection`]: super::Collection

use std::fmt;

use derive_more::with_trait::{Display, Error};

use super::{location::Location, regex::HashableRegex};

/// Failure of [`Collection::find()`].
///
/// [`Collection::find()`]: super::Collection::find
#[derive(Clone, Debug, Display, Error)]
pub enum MatchError {
    /// Step text matches no registered pattern.
    ///
    /// Runners usually surface it as a pending step and skip the rest of the
    /// scenario.
    #[display("Undefined step: {step_text}")]
    Undefined {
        /// Step text that matched nothing.
        #[error(not(source))]
        step_text: String,
    },

    /// Step text matches two or more registered patterns.
    #[display("{_0}")]
    Ambiguous(AmbiguousMatchError),
}

impl From<AmbiguousMatchError> for MatchError {
    fn from(e: AmbiguousMatchError) -> Self {
        Self::Ambiguous(e)
    }
}

impl MatchError {
    /// Indicates whether this is a [`MatchError::Undefined`].
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined { .. })
    }

    /// Returns the step text that failed to match.
    #[must_use]
    pub fn step_text(&self) -> &str {
        match self {
            Self::Undefined { step_text } => step_text,
            Self::Ambiguous(e) => &e.step_text,
        }
    }
}

/// Error of a step text matching multiple step definitions.
///
/// Possible matches are sorted by pattern and then by [`Location`], so the
/// listing doesn't depend on registration order.
#[derive(Clone, Debug, Error)]
pub struct AmbiguousMatchError {
    /// Step text that matched more than once.
    #[error(not(source))]
    pub step_text: String,

    /// Identities of every matching definition.
    pub possible_matches: Vec<(HashableRegex, Option<Location>)>,
}

impl AmbiguousMatchError {
    /// Returns the patterns of the possible matches.
    pub fn patterns(&self) -> impl Iterator<Item = &str> + '_ {
        self.possible_matches.iter().map(|(re, _)| re.as_str())
    }
}

impl fmt::Display for AmbiguousMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ambiguous step: {}\nPossible matches:", self.step_text)?;
        for (reg, loc_opt) in &self.possible_matches {
            write!(f, "\n{reg}")?;
            if let Some(loc) = loc_opt {
                write!(f, " --> {loc}")?;
            }
        }
        Ok(())
    }
}
