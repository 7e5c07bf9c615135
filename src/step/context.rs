// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Arguments extracted from a matched step text.

/// Name of a capturing group inside a step [`Regex`].
///
/// [`Regex`]: regex::Regex
pub type CaptureName = Option<String>;

/// Context handed to a step body: the matched step text and its captures.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Context {
    /// Step text the definition matched.
    pub step: String,

    /// Captures of the match in pattern order. Index `0` is the whole match.
    pub matches: Vec<(CaptureName, String)>,
}

impl Context {
    /// Returns the submatches (excluding the whole match) in the order their
    /// groups appear in the pattern.
    ///
    /// A group that didn't participate in the match yields an empty string.
    pub fn args(&self) -> impl Iterator<Item = &str> + '_ {
        self.matches.iter().skip(1).map(|(_, v)| v.as_str())
    }

    /// Returns the submatches as owned strings.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        self.args().map(str::to_owned).collect()
    }

    /// Returns the value of a named capture group, if any.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        self.matches
            .iter()
            .find(|(n, _)| n.as_deref() == Some(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        Context {
            step: "I have 5 cukes in my belly".into(),
            matches: vec![
                (None, "I have 5 cukes in my belly".into()),
                (None, "5".into()),
                (Some("place".into()), "belly".into()),
            ],
        }
    }

    #[test]
    fn args_skip_whole_match() {
        assert_eq!(context().to_args(), ["5", "belly"]);
    }

    #[test]
    fn named_looks_up_by_group_name() {
        let ctx = context();
        assert_eq!(ctx.named("place"), Some("belly"));
        assert_eq!(ctx.named("count"), None);
    }
}
