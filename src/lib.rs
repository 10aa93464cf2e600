//! # ambient-di
//!
//! Scope-and-context dependency resolution.
//!
//! Given a graph of factory functions ("injectables"), the engine produces
//! instances on demand, caches them according to a declared lifetime policy,
//! and lets nested factories transparently resolve their own dependencies
//! without threading them through call sites.
//!
//! ## Features
//!
//! - **Ambient context**: a thread-local `{active scope, active parent}`
//!   binding is consulted implicitly during resolution and restored on every
//!   exit path, including unwinding.
//! - **Three lifetimes**: SINGLETON (one instance, cached in the process-wide
//!   root scope), SCOPED (one instance per scope) and TRANSIENT (fresh
//!   instance every call, never cached).
//! - **Observed dependency graph**: every definition records which other
//!   injectables its factory has resolved, in depth-first pre-order; the
//!   graph can be exported to DOT.
//! - **Identifier container**: the same engine behind string-identifier
//!   registration and lookup.
//!
//! ## Example
//!
//! ```
//! use ambient_di::{Lifetime, Scope, define, inject};
//!
//! struct Engine {
//! 	fuel: u32,
//! }
//!
//! struct Car {
//! 	started: bool,
//! }
//!
//! let engine = define(|| Ok(Engine { fuel: 100 }), Lifetime::Scoped);
//! let car = define(
//! 	{
//! 		let engine = engine.clone();
//! 		move || {
//! 			let engine = inject(&engine)?;
//! 			Ok(Car {
//! 				started: engine.fuel > 0,
//! 			})
//! 		}
//! 	},
//! 	Lifetime::Transient,
//! );
//!
//! let garage = Scope::labeled("garage");
//! let first = garage.inject(&car).unwrap();
//! let second = garage.inject(&car).unwrap();
//!
//! // Transient cars are distinct; the scoped engine is shared within the scope.
//! assert!(first.started && second.started);
//! assert_eq!(garage.len(), 1);
//! assert!(car.dependencies().contains(&engine.id()));
//! ```
//!
//! ## Concurrency model
//!
//! Resolution is single-threaded, cooperative and fully synchronous: every
//! `inject` call returns or fails before its caller regains control, and
//! re-entrance happens only through direct nested calls on the same stack.
//! Each thread carries its own ambient context cell; the root scope is
//! shared process-wide behind a lock, but no cross-thread resolution
//! semantics are promised.

mod context;
mod error;
mod graph;
mod injectable;
mod registry;
mod resolve;
mod scope;

pub use error::{DiError, DiResult};
pub use graph::{DependencyGraph, GraphNode, GraphStatistics};
pub use injectable::{Injectable, InjectableId, Lifetime, define, define_with};
pub use registry::Container;
pub use resolve::{inject, inject_with, lookup};
pub use scope::Scope;
