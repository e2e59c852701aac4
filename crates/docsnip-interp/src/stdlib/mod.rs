// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Standard library modules importable without host registration.

mod math;

use crate::value::Module;

/// Modules every interpreter starts with.
pub(crate) fn default_modules() -> Vec<Module> {
    vec![math::module()]
}
