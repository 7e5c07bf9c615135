// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Helper macros.

/// Creates a [`Location`] pointing to the macro call site.
///
/// [`Location`]: crate::step::Location
#[macro_export]
macro_rules! location {
    () => {
        $crate::step::Location::new(file!(), line!(), column!())
    };
}
