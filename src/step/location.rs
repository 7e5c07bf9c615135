// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Source location of a registered step definition, hook or world builder.

use derive_more::with_trait::{Debug, Display};

/// Location of a registration call, usually filled by the [`location!`] macro.
///
/// [`location!`]: crate::location
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{path}:{line}:{column}")]
pub struct Location {
    /// Path to the file where the registration happened.
    pub path: &'static str,

    /// Line of the file where the registration happened.
    pub line: u32,

    /// Column of the file where the registration happened.
    pub column: u32,
}

impl Location {
    /// Creates a new [`Location`] with the given path, line, and column.
    #[must_use]
    pub const fn new(path: &'static str, line: u32, column: u32) -> Self {
        Self { path, line, column }
    }
}
