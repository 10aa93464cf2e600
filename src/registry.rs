//! Identifier-keyed registration
//!
//! The alternative registration style over the same engine: injectables are
//! registered under string identifiers and resolved by identifier instead of
//! by handle. Lifetime semantics are identical: resolution by identifier
//! delegates to the ordinary [`inject`](crate::inject) path, so SINGLETON
//! instances still land in the root scope and SCOPED instances in whichever
//! scope is active. A missing identifier fails with [`DiError::NotFound`]
//! naming the identifier.

use crate::error::{DiError, DiResult};
use crate::graph::DependencyGraph;
use crate::injectable::{DependencySet, Injectable, InjectableId, Lifetime};
use crate::resolve;
use crate::scope::Scope;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

type ErasedResolver =
	Box<dyn Fn(Option<&Scope>) -> DiResult<Arc<dyn Any + Send + Sync>> + Send + Sync>;

struct Registration {
	id: InjectableId,
	lifetime: Lifetime,
	type_name: &'static str,
	dependencies: DependencySet,
	resolver: ErasedResolver,
}

/// A collection of injectables addressable by string identifier.
///
/// # Examples
///
/// ```
/// use ambient_di::{Container, Lifetime, define};
///
/// struct Config {
/// 	url: String,
/// }
///
/// let container = Container::new();
/// container.register(
/// 	"config",
/// 	define(
/// 		|| {
/// 			Ok(Config {
/// 				url: "localhost".to_string(),
/// 			})
/// 		},
/// 		Lifetime::Scoped,
/// 	),
/// );
///
/// let config = container.resolve::<Config>("config").unwrap();
/// assert_eq!(config.url, "localhost");
/// ```
pub struct Container {
	registrations: RwLock<HashMap<String, Arc<Registration>>>,
}

impl Container {
	/// Create an empty container.
	pub fn new() -> Self {
		Self {
			registrations: RwLock::new(HashMap::new()),
		}
	}

	/// Register `injectable` under `identifier`.
	///
	/// Registering a second injectable under the same identifier replaces
	/// the earlier registration; instances the earlier one already cached in
	/// some scope stay cached under its own id and are unaffected.
	pub fn register<T>(&self, identifier: impl Into<String>, injectable: Injectable<T>)
	where
		T: Send + Sync + 'static,
	{
		let identifier = identifier.into();
		let resolver: ErasedResolver = {
			let injectable = injectable.clone();
			Box::new(move |scope| {
				let resolved = match scope {
					Some(scope) => scope.inject(&injectable)?,
					None => resolve::inject(&injectable)?,
				};
				Ok(resolved as Arc<dyn Any + Send + Sync>)
			})
		};

		tracing::debug!(identifier = %identifier, id = %injectable.id(), "registering injectable");
		let registration = Arc::new(Registration {
			id: injectable.id(),
			lifetime: injectable.lifetime(),
			type_name: injectable.type_name(),
			dependencies: injectable.dependency_set(),
			resolver,
		});
		self.registrations
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(identifier, registration);
	}

	/// Whether an injectable is registered under `identifier`.
	pub fn contains(&self, identifier: &str) -> bool {
		self.registrations
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.contains_key(identifier)
	}

	/// All registered identifiers, sorted.
	pub fn identifiers(&self) -> Vec<String> {
		let mut names: Vec<String> = self
			.registrations
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.keys()
			.cloned()
			.collect();
		names.sort();
		names
	}

	/// Resolve the injectable registered under `identifier` in the ambient
	/// scope.
	pub fn resolve<T>(&self, identifier: &str) -> DiResult<Arc<T>>
	where
		T: Send + Sync + 'static,
	{
		self.resolve_erased(identifier, None)
	}

	/// Resolve the injectable registered under `identifier` with `scope`
	/// installed as the ambient scope.
	pub fn resolve_in<T>(&self, scope: &Scope, identifier: &str) -> DiResult<Arc<T>>
	where
		T: Send + Sync + 'static,
	{
		self.resolve_erased(identifier, Some(scope))
	}

	fn resolve_erased<T>(&self, identifier: &str, scope: Option<&Scope>) -> DiResult<Arc<T>>
	where
		T: Send + Sync + 'static,
	{
		// Clone the registration handle out of the lock: the factory may
		// itself resolve through this container.
		let registration = {
			let registrations = self
				.registrations
				.read()
				.unwrap_or_else(PoisonError::into_inner);
			registrations
				.get(identifier)
				.cloned()
				.ok_or_else(|| DiError::NotFound(identifier.to_string()))?
		};

		let value = (registration.resolver)(scope)?;
		value
			.downcast::<T>()
			.map_err(|_| DiError::TypeMismatch {
				identifier: identifier.to_string(),
				expected: std::any::type_name::<T>(),
				registered: registration.type_name,
			})
	}

	/// Export the observed dependency graph between registered injectables.
	///
	/// Nodes are the registered identifiers; an edge A → B is present when
	/// A's factory has, at least once, resolved B. Edges to injectables that
	/// are not registered in this container are omitted.
	pub fn dependency_graph(&self) -> DependencyGraph {
		let registrations = self
			.registrations
			.read()
			.unwrap_or_else(PoisonError::into_inner);

		let names_by_id: HashMap<InjectableId, &str> = registrations
			.iter()
			.map(|(name, registration)| (registration.id, name.as_str()))
			.collect();

		let mut graph = DependencyGraph::new();
		for (name, registration) in registrations.iter() {
			graph.add_typed_node(name.clone(), registration.lifetime, registration.type_name);
		}
		for (name, registration) in registrations.iter() {
			let dependencies = registration
				.dependencies
				.read()
				.unwrap_or_else(PoisonError::into_inner);
			for dependency in dependencies.iter() {
				if let Some(target) = names_by_id.get(dependency) {
					graph.add_dependency(name.clone(), (*target).to_string());
				}
			}
		}
		graph
	}
}

impl Default for Container {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Container {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Container")
			.field("identifiers", &self.identifiers())
			.finish()
	}
}
