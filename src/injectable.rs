//! Injectable definitions
//!
//! An [`Injectable`] pairs a factory with a declared [`Lifetime`] and a
//! mutable set recording which other injectables it has, at least once,
//! resolved as dependencies. Identity is the definition itself: every
//! definition gets a process-unique [`InjectableId`] at construction, and
//! scope caches and dependency sets are keyed on that handle rather than on
//! a name.

use crate::context::{self, Frame, ParentRecord};
use crate::error::DiResult;
use crate::scope::Scope;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

static NEXT_INJECTABLE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique handle identifying an injectable definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InjectableId(u64);

impl InjectableId {
	/// Allocate the next id. Ids are never reused within a process.
	pub(crate) fn next() -> Self {
		Self(NEXT_INJECTABLE_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for InjectableId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Lifetime policy deciding whether and where a produced instance is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
	/// One instance for the whole process, cached in the root scope
	#[default]
	Singleton,
	/// One instance per scope, cached in whichever scope is active
	Scoped,
	/// A fresh instance on every resolution, never cached
	Transient,
}

impl Lifetime {
	/// Lowercase policy name, used in logs and DOT output.
	pub fn as_str(&self) -> &'static str {
		match self {
			Lifetime::Singleton => "singleton",
			Lifetime::Scoped => "scoped",
			Lifetime::Transient => "transient",
		}
	}
}

/// Observed-dependency set shared between a definition and the ambient
/// context frames that record into it. Insertion-ordered, grow-only.
pub(crate) type DependencySet = Arc<RwLock<Vec<InjectableId>>>;

type Factory<T, A> = Box<dyn Fn(Option<A>) -> DiResult<T> + Send + Sync>;

struct Definition<T, A> {
	id: InjectableId,
	type_name: &'static str,
	lifetime: Lifetime,
	factory: Factory<T, A>,
	dependencies: DependencySet,
}

/// An immutable injectable descriptor.
///
/// Cloning an `Injectable` is cheap and yields a handle to the *same*
/// definition: both clones share one id, one factory and one observed
/// dependency set. `T` is the produced value, `A` the type of the optional
/// explicit argument the factory accepts (`()` for zero-argument factories).
///
/// Definitions are created through [`define`] and [`define_with`]; the
/// dependency set is exposed read-only through [`Injectable::dependencies`]
/// and is appended to exclusively by the resolution engine.
pub struct Injectable<T, A = ()> {
	inner: Arc<Definition<T, A>>,
}

impl<T, A> Clone for Injectable<T, A> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

/// Define an injectable from a zero-argument factory.
///
/// # Examples
///
/// ```
/// use ambient_di::{Lifetime, define, inject};
///
/// struct Engine {
/// 	fuel: u32,
/// }
///
/// let engine = define(|| Ok(Engine { fuel: 100 }), Lifetime::Scoped);
/// let instance = inject(&engine).unwrap();
/// assert_eq!(instance.fuel, 100);
/// ```
pub fn define<T, F>(factory: F, lifetime: Lifetime) -> Injectable<T>
where
	T: Send + Sync + 'static,
	F: Fn() -> DiResult<T> + Send + Sync + 'static,
{
	Injectable::from_factory(Box::new(move |_: Option<()>| factory()), lifetime)
}

/// Define an injectable whose factory accepts an optional explicit argument.
///
/// The argument is supplied per call via [`inject_with`](crate::inject_with);
/// a plain [`inject`](crate::inject) passes `None`. On a cache hit the
/// argument is silently discarded: first resolution wins for SINGLETON and
/// SCOPED lifetimes.
///
/// # Examples
///
/// ```
/// use ambient_di::{Lifetime, define_with, inject_with};
///
/// let greeting = define_with(
/// 	|name: Option<String>| Ok(format!("hello {}", name.unwrap_or_default())),
/// 	Lifetime::Transient,
/// );
/// let out = inject_with(&greeting, "ada".to_string()).unwrap();
/// assert_eq!(*out, "hello ada");
/// ```
pub fn define_with<T, A, F>(factory: F, lifetime: Lifetime) -> Injectable<T, A>
where
	T: Send + Sync + 'static,
	F: Fn(Option<A>) -> DiResult<T> + Send + Sync + 'static,
{
	Injectable::from_factory(Box::new(factory), lifetime)
}

impl<T, A> Injectable<T, A>
where
	T: Send + Sync + 'static,
{
	fn from_factory(factory: Factory<T, A>, lifetime: Lifetime) -> Self {
		Self {
			inner: Arc::new(Definition {
				id: InjectableId::next(),
				type_name: std::any::type_name::<T>(),
				lifetime,
				factory,
				dependencies: Arc::new(RwLock::new(Vec::new())),
			}),
		}
	}

	/// The process-unique identity of this definition.
	pub fn id(&self) -> InjectableId {
		self.inner.id
	}

	/// Declared lifetime policy.
	pub fn lifetime(&self) -> Lifetime {
		self.inner.lifetime
	}

	/// Name of the produced type, for logs and graph export.
	pub fn type_name(&self) -> &'static str {
		self.inner.type_name
	}

	/// Snapshot of the observed dependency set.
	///
	/// Contains the id of every injectable this one has resolved at least
	/// once while its own factory was running, in first-observed order
	/// (depth-first pre-order of the resolution call tree). The set reflects
	/// the dynamically observed call graph, not a static declaration.
	pub fn dependencies(&self) -> Vec<InjectableId> {
		self.inner
			.dependencies
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	pub(crate) fn parent_record(&self) -> ParentRecord {
		ParentRecord::new(self.inner.id, Arc::clone(&self.inner.dependencies))
	}

	pub(crate) fn dependency_set(&self) -> DependencySet {
		Arc::clone(&self.inner.dependencies)
	}

	/// Run the factory with this injectable installed as the ambient parent.
	///
	/// The ambient scope is left unchanged so nested SCOPED resolutions keep
	/// caching into the scope the caller was resolving under.
	pub(crate) fn produce(&self, scope: &Scope, arg: Option<A>) -> DiResult<T> {
		let frame = Frame {
			scope: scope.clone(),
			parent: Some(self.parent_record()),
		};
		context::run_with(frame, || (self.inner.factory)(arg))?
	}
}

impl<T, A> fmt::Debug for Injectable<T, A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Injectable")
			.field("id", &self.inner.id)
			.field("type", &self.inner.type_name)
			.field("lifetime", &self.inner.lifetime)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn test_ids_are_unique() {
		let a = define(|| Ok(1u8), Lifetime::Singleton);
		let b = define(|| Ok(1u8), Lifetime::Singleton);
		assert_ne!(a.id(), b.id());
	}

	#[test]
	fn test_clone_shares_definition() {
		let a = define(|| Ok("x"), Lifetime::Transient);
		let b = a.clone();
		assert_eq!(a.id(), b.id());
	}

	#[test]
	fn test_default_lifetime_is_singleton() {
		assert_eq!(Lifetime::default(), Lifetime::Singleton);
	}

	#[test]
	fn test_dependencies_start_empty() {
		let a = define(|| Ok(0i64), Lifetime::Scoped);
		assert!(a.dependencies().is_empty());
	}

	#[rstest]
	#[case(Lifetime::Singleton, "singleton")]
	#[case(Lifetime::Scoped, "scoped")]
	#[case(Lifetime::Transient, "transient")]
	fn test_lifetime_as_str(#[case] lifetime: Lifetime, #[case] expected: &str) {
		assert_eq!(lifetime.as_str(), expected);
	}

	#[test]
	fn test_debug_shows_identity() {
		let a = define(|| Ok(0u32), Lifetime::Scoped);
		let debug = format!("{:?}", a);
		assert!(debug.contains("Injectable"));
		assert!(debug.contains("u32"));
		assert!(debug.contains("Scoped"));
	}
}
