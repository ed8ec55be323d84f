//! # Route Module
//!
//! A [`Route`] is the compiled description of one controller's reachability:
//! its name, URL pattern, the action bound to each HTTP verb and whether it is
//! private.
//!
//! ## Pattern grammar
//!
//! | Placeholder        | Matches                                  |
//! |--------------------|------------------------------------------|
//! | `{name}`           | one segment: letters, digits, `. + % : -` |
//! | `{name:int}`       | digits                                   |
//! | `{name:all}`       | anything, including `/`                  |
//! | `{name}?`          | optional when generating URLs            |
//!
//! Matching is anchored and case-insensitive. The optional marker only affects
//! URL generation; the compiled matcher still expects a literal `?`.
//!
//! ## Example
//!
//! ```rust
//! use waymark::controller::{ActionDescriptor, ControllerDescriptor, ParamDescriptor};
//! use waymark::route::{MethodOverrides, MethodTable, Route, Verb};
//!
//! let controller = ControllerDescriptor::new("Items")
//!     .action(ActionDescriptor::new("show").param(ParamDescriptor::new("id")));
//! let methods = MethodTable::resolve("show", &MethodOverrides::new().disable(Verb::Delete));
//! let route = Route::new("items", &controller, "/items/{id:int}", &methods, None, false).unwrap();
//!
//! assert!(route.matches("/items/42", "GET"));
//! assert!(!route.matches("/items/42", "DELETE"));
//! assert_eq!(route.generate_url(&[("id", "42")]).unwrap(), "/items/42");
//! ```

mod binding;
mod core;
mod pattern;
#[cfg(test)]
mod tests;

pub use binding::{Argument, MethodBinding, MethodEntry, MethodOverrides, MethodTable, ParamSpec, Verb};
pub use self::core::Route;
pub use pattern::{Constraint, ParamVec, Pattern, Placeholder, MAX_INLINE_PARAMS};
