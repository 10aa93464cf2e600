//! Resolution engine
//!
//! The `inject`-style operations: given an injectable and an optional
//! explicit argument, decide by lifetime policy whether to reuse a cached
//! instance, which cache to consult, and how to record the dependency edge
//! from whichever injectable is currently resolving.
//!
//! The algorithm, per call:
//!
//! 1. Read the ambient context to find the active scope and active parent.
//! 2. If a parent is active, record the edge parent → injectable. The edge
//!    reflects "the parent's factory invoked resolution of this injectable"
//!    and is recorded on cache hit and miss alike.
//! 3. TRANSIENT: run the factory with the injectable installed as parent
//!    and return the fresh value. Never cached, never looked up.
//! 4. Otherwise consult the target cache: the root scope for SINGLETON,
//!    the ambient scope for SCOPED. On a hit return the cached instance;
//!    an explicit argument is discarded (first resolution wins).
//! 5. On a miss run the factory the same way, cache the produced value in
//!    the target cache and return it.
//!
//! A factory error propagates to the caller unchanged; the ambient context
//! is restored regardless. Nothing is retried and no failure is cached.

use crate::context;
use crate::error::DiResult;
use crate::injectable::{Injectable, Lifetime};
use crate::scope::Scope;
use std::sync::Arc;

/// Resolve `injectable` under the ambient scope, producing and caching an
/// instance as its lifetime policy dictates.
///
/// # Examples
///
/// ```
/// use ambient_di::{Lifetime, define, inject};
///
/// let config = define(|| Ok("production"), Lifetime::Singleton);
/// let a = inject(&config).unwrap();
/// let b = inject(&config).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// ```
pub fn inject<T, A>(injectable: &Injectable<T, A>) -> DiResult<Arc<T>>
where
	T: Send + Sync + 'static,
{
	resolve(injectable, None)
}

/// Resolve `injectable`, passing `arg` to the factory if it runs.
///
/// If the lifetime policy finds a cached instance the argument is silently
/// discarded: for SINGLETON and SCOPED injectables the first resolution
/// wins. TRANSIENT factories see the argument on every call.
pub fn inject_with<T, A>(injectable: &Injectable<T, A>, arg: A) -> DiResult<Arc<T>>
where
	T: Send + Sync + 'static,
{
	resolve(injectable, Some(arg))
}

/// Read-only resolution: return the cached instance from the appropriate
/// cache if present, without ever running the factory or populating a cache.
///
/// The dependency edge from the currently resolving parent is still
/// recorded. TRANSIENT injectables are never cached, so this always returns
/// `None` for them.
pub fn lookup<T, A>(injectable: &Injectable<T, A>) -> Option<Arc<T>>
where
	T: Send + Sync + 'static,
{
	let scope = context::current().ok()?.scope;
	lookup_in(&scope, injectable)
}

pub(crate) fn resolve<T, A>(injectable: &Injectable<T, A>, arg: Option<A>) -> DiResult<Arc<T>>
where
	T: Send + Sync + 'static,
{
	let frame = context::current()?;
	if let Some(parent) = &frame.parent {
		parent.record(injectable.id());
		tracing::trace!(
			parent = %parent.id(),
			child = %injectable.id(),
			"dependency edge observed"
		);
	}

	match injectable.lifetime() {
		Lifetime::Transient => {
			tracing::trace!(id = %injectable.id(), ty = injectable.type_name(), "producing transient");
			let value = injectable.produce(&frame.scope, arg)?;
			Ok(Arc::new(value))
		}
		lifetime => {
			let target = if lifetime == Lifetime::Singleton {
				Scope::root()
			} else {
				frame.scope.clone()
			};

			if let Some(cached) = target.get::<T>(injectable.id()) {
				tracing::trace!(id = %injectable.id(), ty = injectable.type_name(), "cache hit");
				return Ok(cached);
			}

			tracing::debug!(
				id = %injectable.id(),
				ty = injectable.type_name(),
				lifetime = lifetime.as_str(),
				"cache miss, running factory"
			);
			let value = Arc::new(injectable.produce(&frame.scope, arg)?);
			target.insert(injectable.id(), value.clone());
			Ok(value)
		}
	}
}

pub(crate) fn lookup_in<T, A>(scope: &Scope, injectable: &Injectable<T, A>) -> Option<Arc<T>>
where
	T: Send + Sync + 'static,
{
	if let Ok(frame) = context::current() {
		if let Some(parent) = &frame.parent {
			parent.record(injectable.id());
		}
	}

	match injectable.lifetime() {
		Lifetime::Transient => None,
		Lifetime::Singleton => Scope::root().get(injectable.id()),
		Lifetime::Scoped => scope.get(injectable.id()),
	}
}
