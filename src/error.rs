// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of registering glue code and building worlds.

use std::fmt;

use derive_more::with_trait::{Display, From};

use crate::step::{Location, MatchError};

/// Top-level error consolidating everything this crate reports.
#[derive(Debug, Display, derive_more::Error, From)]
pub enum Error {
    /// Setup-time registration was rejected.
    #[display("Registration failed: {_0}")]
    Registry(RegistryError),

    /// Step text didn't match exactly one definition.
    #[display("{_0}")]
    Match(MatchError),

    /// World couldn't be built for a scenario.
    #[display("{_0}")]
    World(WorldError),
}

/// Error of a setup-time registration call.
///
/// Every variant is fatal for the whole run: it's reported before any
/// scenario starts.
#[derive(Debug, derive_more::Error)]
pub enum RegistryError {
    /// A world builder is registered while another one already is.
    DuplicateWorldFactory {
        /// Location of the already registered builder.
        existing: Option<Location>,

        /// Location of the rejected builder.
        rejected: Option<Location>,
    },

    /// Registration attempted after a scenario started using the registry.
    RegistrationClosed {
        /// Name of the rejected registration call.
        #[error(not(source))]
        call: String,
    },

    /// Step registered under an introducer keyword not in the table.
    UnknownIntroducer {
        /// Unknown keyword.
        #[error(not(source))]
        keyword: String,
    },
}

/// Formats an optional [`Location`] as ` at <location>`, if any.
struct At(Option<Location>);

impl fmt::Display for At {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(loc) => write!(f, " at {loc}"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateWorldFactory { existing, rejected } => write!(
                f,
                "World factory already registered{}, \
                 cannot register another one{}",
                At(*existing),
                At(*rejected),
            ),
            Self::RegistrationClosed { call } => write!(
                f,
                "`{call}` called after scenarios started running, \
                 registration is only allowed during setup",
            ),
            Self::UnknownIntroducer { keyword } => {
                write!(f, "Unknown step introducer keyword: `{keyword}`")
            }
        }
    }
}

/// Error of building a world for a scenario.
#[derive(Debug, Display, derive_more::Error)]
pub enum WorldError {
    /// Registered builder failed to create a world.
    #[display("Failed to create World: {source}")]
    Creation {
        /// Error returned by the builder.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl WorldError {
    /// Wraps the given builder error into a [`WorldError::Creation`].
    pub fn creation(
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self::Creation { source: source.into() }
    }
}
