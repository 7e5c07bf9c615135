// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Glue layer of a [Cucumber]-style test runner.
//!
//! Binds step phrases to code, selects lifecycle hooks by scenario tags and
//! builds the per-scenario world the code runs against:
//! - [`step`]: step definitions and matching of step texts to them;
//! - [`hook`]: `Before`, `After` and `AfterStep` hooks;
//! - [`tag`]: tag filters deciding whether a hook applies;
//! - [`world`]: world builder and capability modules;
//! - [`Registry`]: the facade setup code registers into and runners query;
//! - [`Scenario`]: the per-scenario query sequence over a [`Registry`].
//!
//! # Example
//!
//! ```rust
//! use cucumber_glue::{location, step::Context, tag::Tags, Registry};
//! use futures::{future::LocalBoxFuture, FutureExt as _};
//! use regex::Regex;
//!
//! #[derive(Debug, Default)]
//! struct Belly {
//!     cukes: u32,
//! }
//!
//! fn have(w: &mut Belly, ctx: Context) -> LocalBoxFuture<'_, ()> {
//!     async move {
//!         w.cukes = ctx.args().next().and_then(|n| n.parse().ok()).unwrap_or(0);
//!     }
//!     .boxed_local()
//! }
//!
//! fn empty(w: &mut Belly) -> LocalBoxFuture<'_, ()> {
//!     async move { w.cukes = 0 }.boxed_local()
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = Registry::<Belly>::new();
//! registry
//!     .given(Some(location!()), Regex::new(r"^I have (\d+) cukes$")?, have)?
//!     .after(Tags::any(), Some(location!()), empty)?;
//!
//! let mut scenario = registry.scenario(["@smoke"])?;
//! futures::executor::block_on(async {
//!     scenario.run_before().await;
//!     scenario.run_step("I have 5 cukes").await?;
//!     assert_eq!(scenario.world().cukes, 5);
//!     scenario.run_after().await;
//!     Ok::<_, cucumber_glue::step::MatchError>(())
//! })?;
//! assert_eq!(scenario.into_world().cukes, 0);
//! # Ok(())
//! # }
//! ```
//!
//! [Cucumber]: https://cucumber.io

pub mod cli;
pub mod error;
pub mod hook;
mod macros;
pub mod registry;
pub mod scenario;
pub mod step;
pub mod tag;
pub mod world;

pub use gherkin::tagexpr::TagOperation;

#[doc(inline)]
pub use self::{
    error::{Error, RegistryError, WorldError},
    registry::Registry,
    scenario::{AfterOrder, Scenario},
    step::MatchError,
};
