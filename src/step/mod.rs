// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step definitions: a [`Collection`] of [`Step`] [`fn`]s bound to [`Regex`]
//! patterns, and the matching of step texts against it.
//!
//! [`Regex`]: regex::Regex

pub mod collection;
pub mod context;
pub mod error;
pub mod keyword;
pub mod location;
pub mod regex;

pub use self::{
    collection::{Collection, Definition, Match, Step},
    context::{CaptureName, Context},
    error::{AmbiguousMatchError, MatchError},
    keyword::Keywords,
    location::Location,
    regex::HashableRegex,
};
