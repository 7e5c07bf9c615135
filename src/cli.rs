// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI options of a [`Registry`], meant to be flattened into the CLI of an
//! embedding runner.
//!
//! [`Registry`]: crate::Registry

use crate::scenario::AfterOrder;

/// CLI options configuring a [`Registry`].
///
/// [`Registry`]: crate::Registry
#[derive(Clone, Debug, Default, clap::Args)]
#[group(skip)]
pub struct Opts {
    /// Order to run `After` hooks of a scenario in. If not specified, uses
    /// the value configured in the registry, or `registration` by default.
    #[arg(
        long = "after-hooks",
        value_name = "registration|reverse",
        global = true
    )]
    pub after_hooks: Option<AfterOrder>,

    /// Additional step introducer keyword (a localized `Given`, for example).
    /// May be repeated.
    #[arg(long = "introducer", value_name = "keyword", global = true)]
    pub introducers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        glue: Opts,
    }

    #[test]
    fn defaults_leave_registry_config_alone() {
        let cli = Cli::try_parse_from(["runner"]).unwrap();
        assert_eq!(cli.glue.after_hooks, None);
        assert!(cli.glue.introducers.is_empty());
    }

    #[test]
    fn parses_after_order_and_introducers() {
        let cli = Cli::try_parse_from([
            "runner",
            "--after-hooks",
            "reverse",
            "--introducer",
            "Angenommen",
            "--introducer",
            "Soit",
        ])
        .unwrap();

        assert_eq!(cli.glue.after_hooks, Some(AfterOrder::Reverse));
        assert_eq!(cli.glue.introducers, ["Angenommen", "Soit"]);
    }

    #[test]
    fn rejects_unknown_after_order() {
        let res = Cli::try_parse_from(["runner", "--after-hooks", "random"]);
        assert!(res.is_err());
    }
}
