//! Name-based argument injection.
//!
//! An injection target declares the service names it needs as an ordered
//! parameter manifest; the resolver supplies each position from the registry
//! (or from a positional override), and the invoker runs the target's body
//! once every argument is in hand. This lets every extension point declare
//! its dependencies by name instead of hand-writing service lookups.

pub mod injection;
pub mod invoker;
pub mod resolver;

pub use injection::{Args, CallContext, Injection, MethodSet, Methods};
pub use invoker::{Invoker, Target};
pub use resolver::ArgumentResolver;
