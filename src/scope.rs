//! Instance scopes
//!
//! A [`Scope`] is a named, mutable instance cache mapping injectable identity
//! to a previously produced value. The *root scope* is a single process-wide
//! instance: it backs every SINGLETON resolution and serves as the ambient
//! scope whenever no explicit scope is supplied.

use crate::context::{self, Frame};
use crate::error::DiResult;
use crate::injectable::{Injectable, InjectableId};
use crate::resolve;
use once_cell::sync::Lazy;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

static ROOT: Lazy<Scope> = Lazy::new(|| Scope::labeled("root"));

type Cache = RwLock<HashMap<InjectableId, Arc<dyn Any + Send + Sync>>>;

struct ScopeInner {
	label: Option<String>,
	cache: Cache,
}

/// A named instance cache.
///
/// Cloning a `Scope` is cheap and yields a handle to the same cache; two
/// handles denote the same scope iff [`Scope::same_scope`] holds. The engine
/// is the only writer of the cache — application code interacts with it
/// through resolution and [`Scope::reset`].
///
/// # Examples
///
/// ```
/// use ambient_di::{Lifetime, Scope, define};
///
/// let counter = define(|| Ok(0u32), Lifetime::Scoped);
///
/// let checkout = Scope::labeled("checkout");
/// let first = checkout.inject(&counter).unwrap();
/// let second = checkout.inject(&counter).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// ```
#[derive(Clone)]
pub struct Scope {
	inner: Arc<ScopeInner>,
}

impl Scope {
	/// Create a fresh unlabeled scope with an empty cache.
	pub fn new() -> Self {
		Self {
			inner: Arc::new(ScopeInner {
				label: None,
				cache: RwLock::new(HashMap::new()),
			}),
		}
	}

	/// Create a fresh scope carrying a human-readable label.
	///
	/// The label is for debugging output only; it takes no part in identity.
	pub fn labeled(label: impl Into<String>) -> Self {
		Self {
			inner: Arc::new(ScopeInner {
				label: Some(label.into()),
				cache: RwLock::new(HashMap::new()),
			}),
		}
	}

	/// The process-wide root scope.
	///
	/// Created once on first use and never destroyed; every SINGLETON
	/// instance is cached here regardless of which scope was active when it
	/// was produced.
	pub fn root() -> Scope {
		ROOT.clone()
	}

	/// Debugging label, if one was given at construction.
	pub fn label(&self) -> Option<&str> {
		self.inner.label.as_deref()
	}

	/// Whether `self` and `other` are handles to the same scope.
	pub fn same_scope(&self, other: &Scope) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	/// Whether this handle denotes the root scope.
	pub fn is_root(&self) -> bool {
		self.same_scope(&ROOT)
	}

	/// Clear every cached instance in this scope.
	///
	/// Cached instances are dropped without notification; disposal ordering
	/// is not this crate's concern. Other scopes, including the root scope,
	/// are unaffected.
	pub fn reset(&self) {
		let mut cache = self
			.inner
			.cache
			.write()
			.unwrap_or_else(PoisonError::into_inner);
		let evicted = cache.len();
		cache.clear();
		tracing::debug!(scope = ?self.inner.label, evicted, "scope reset");
	}

	/// Number of cached instances.
	pub fn len(&self) -> usize {
		self.inner
			.cache
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.len()
	}

	/// Whether the cache is empty.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Whether this scope caches an instance for `injectable`.
	pub fn contains<T, A>(&self, injectable: &Injectable<T, A>) -> bool
	where
		T: Send + Sync + 'static,
	{
		self.inner
			.cache
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.contains_key(&injectable.id())
	}

	pub(crate) fn get<T: Any + Send + Sync>(&self, id: InjectableId) -> Option<Arc<T>> {
		let cache = self
			.inner
			.cache
			.read()
			.unwrap_or_else(PoisonError::into_inner);
		cache.get(&id).and_then(|arc| arc.clone().downcast::<T>().ok())
	}

	pub(crate) fn insert(&self, id: InjectableId, value: Arc<dyn Any + Send + Sync>) {
		let mut cache = self
			.inner
			.cache
			.write()
			.unwrap_or_else(PoisonError::into_inner);
		cache.insert(id, value);
	}

	/// Resolve `injectable` with this scope installed as the ambient scope.
	///
	/// Same algorithm as [`inject`](crate::inject), starting from a
	/// non-default ambient binding: SCOPED instances cache into this scope
	/// while SINGLETON instances still land in the root scope. When called
	/// from inside another factory the ambient parent is preserved, so the
	/// dependency edge is still recorded against the actual caller.
	pub fn inject<T, A>(&self, injectable: &Injectable<T, A>) -> DiResult<Arc<T>>
	where
		T: Send + Sync + 'static,
	{
		self.bind(|| resolve::resolve(injectable, None))
	}

	/// Scope-bound variant of [`inject_with`](crate::inject_with).
	pub fn inject_with<T, A>(&self, injectable: &Injectable<T, A>, arg: A) -> DiResult<Arc<T>>
	where
		T: Send + Sync + 'static,
	{
		self.bind(|| resolve::resolve(injectable, Some(arg)))
	}

	/// Read-only resolution against this scope: returns the cached instance
	/// if present and never runs the factory.
	pub fn lookup<T, A>(&self, injectable: &Injectable<T, A>) -> Option<Arc<T>>
	where
		T: Send + Sync + 'static,
	{
		resolve::lookup_in(self, injectable)
	}

	fn bind<R>(&self, f: impl FnOnce() -> DiResult<R>) -> DiResult<R> {
		let parent = context::current()?.parent;
		context::run_with(
			Frame {
				scope: self.clone(),
				parent,
			},
			f,
		)?
	}
}

impl Default for Scope {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Scope")
			.field("label", &self.inner.label)
			.field("cached", &self.len())
			.finish()
	}
}
