//! Dependency-edge recording tests
//!
//! The engine observes parent → child edges while factories run: whenever a
//! factory resolves another injectable, that injectable's id is appended to
//! the parent's dependency set. These tests verify edge direction, ordering,
//! recording on cache hits, and behavior under transient re-entrancy.

use ambient_di::{Lifetime, Scope, define, inject, lookup};

#[test]
fn test_edges_point_from_parent_to_children_in_order() {
	let b = define(|| Ok("b"), Lifetime::Scoped);
	let c = define(|| Ok("c"), Lifetime::Scoped);
	let a = define(
		{
			let b = b.clone();
			let c = c.clone();
			move || {
				inject(&b)?;
				inject(&c)?;
				Ok("a")
			}
		},
		Lifetime::Scoped,
	);

	let scope = Scope::new();
	scope.inject(&a).unwrap();

	assert_eq!(a.dependencies(), vec![b.id(), c.id()]);
	assert!(b.dependencies().is_empty());
	assert!(c.dependencies().is_empty());
}

#[test]
fn test_edge_recorded_on_cache_hit() {
	let shared = define(|| Ok(0u8), Lifetime::Scoped);
	let first_user = define(
		{
			let shared = shared.clone();
			move || inject(&shared).map(|_| ())
		},
		Lifetime::Scoped,
	);
	let second_user = define(
		{
			let shared = shared.clone();
			move || inject(&shared).map(|_| ())
		},
		Lifetime::Scoped,
	);

	let scope = Scope::new();
	scope.inject(&first_user).unwrap();
	// shared is now cached; the second factory's resolution is a pure hit
	scope.inject(&second_user).unwrap();

	assert_eq!(first_user.dependencies(), vec![shared.id()]);
	assert_eq!(second_user.dependencies(), vec![shared.id()]);
}

#[test]
fn test_duplicate_resolutions_record_one_edge() {
	let dep = define(|| Ok(1u32), Lifetime::Scoped);
	let service = define(
		{
			let dep = dep.clone();
			move || {
				inject(&dep)?;
				inject(&dep)?;
				Ok(())
			}
		},
		Lifetime::Scoped,
	);

	let scope = Scope::new();
	scope.inject(&service).unwrap();

	assert_eq!(service.dependencies(), vec![dep.id()]);
}

#[test]
fn test_transient_reentrancy_keeps_edges_per_definition() {
	// leaf is resolved from inside a transient; the transient runs once per
	// call yet the edge set stays {leaf}, and deeper levels record their
	// own edges against the right parent.
	let leaf = define(|| Ok("leaf"), Lifetime::Scoped);
	let middle = define(
		{
			let leaf = leaf.clone();
			move || inject(&leaf).map(|_| "middle")
		},
		Lifetime::Transient,
	);
	let top = define(
		{
			let middle = middle.clone();
			move || inject(&middle).map(|_| "top")
		},
		Lifetime::Transient,
	);

	let scope = Scope::new();
	scope.inject(&top).unwrap();
	scope.inject(&top).unwrap();
	scope.inject(&middle).unwrap();

	assert_eq!(top.dependencies(), vec![middle.id()]);
	assert_eq!(middle.dependencies(), vec![leaf.id()]);
	assert!(leaf.dependencies().is_empty());
}

#[test]
fn test_lookup_records_edge_without_producing() {
	let dep = define(|| Ok(5i16), Lifetime::Scoped);
	let watcher = define(
		{
			let dep = dep.clone();
			move || Ok(lookup(&dep).is_some())
		},
		Lifetime::Transient,
	);

	let scope = Scope::new();
	let saw_it = scope.inject(&watcher).unwrap();

	assert!(!*saw_it);
	assert_eq!(watcher.dependencies(), vec![dep.id()]);
	assert!(scope.is_empty());
}

#[test]
fn test_top_level_resolution_records_no_edge() {
	let standalone = define(|| Ok(0u64), Lifetime::Scoped);
	let scope = Scope::new();
	scope.inject(&standalone).unwrap();

	assert!(standalone.dependencies().is_empty());
}

#[test]
fn test_deep_chain_records_depth_first_pre_order() {
	let d = define(|| Ok("d"), Lifetime::Scoped);
	let c = define(
		{
			let d = d.clone();
			move || inject(&d).map(|_| "c")
		},
		Lifetime::Scoped,
	);
	let b = define(|| Ok("b"), Lifetime::Scoped);
	let a = define(
		{
			let b = b.clone();
			let c = c.clone();
			move || {
				inject(&c)?;
				inject(&b)?;
				Ok("a")
			}
		},
		Lifetime::Scoped,
	);

	let scope = Scope::new();
	scope.inject(&a).unwrap();

	assert_eq!(a.dependencies(), vec![c.id(), b.id()]);
	assert_eq!(c.dependencies(), vec![d.id()]);
}
