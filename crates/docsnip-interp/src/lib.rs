// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree-walk interpreter for the docsnip scripting language.
//!
//! One [`Interpreter`] holds a single persistent global namespace, so a
//! sequence of sources run against it observes each other's bindings.

mod value;
mod env;
mod kinds;
mod interp;
mod builtins;
mod stdlib;

pub use interp::{Interpreter, RuntimeDiagnostic, RuntimeError, DEFAULT_RECURSION_LIMIT};
pub use kinds::{ErrorKindRegistry, KindError, BASE_KIND};
pub use value::{Args, Builtin, Dict, Exception, Function, Module, NativeFn, Range, Value};
