//! Lifetime policy tests
//!
//! These tests verify that:
//! 1. SINGLETON injectables resolve to one instance shared across every
//!    scope, cached only in the root scope
//! 2. SCOPED injectables resolve to one instance per scope
//! 3. TRANSIENT injectables resolve to a fresh instance on every call and
//!    are never cached anywhere

use ambient_di::{Lifetime, Scope, define, inject, lookup};
use serial_test::serial;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Connection {
	serial: usize,
}

fn counted_connection(counter: &Arc<AtomicUsize>, lifetime: Lifetime) -> ambient_di::Injectable<Connection> {
	let counter = counter.clone();
	define(
		move || {
			Ok(Connection {
				serial: counter.fetch_add(1, Ordering::SeqCst),
			})
		},
		lifetime,
	)
}

#[test]
#[serial]
fn test_singleton_is_shared_across_scopes() {
	let counter = Arc::new(AtomicUsize::new(0));
	let connection = counted_connection(&counter, Lifetime::Singleton);

	let scope_a = Scope::labeled("a");
	let scope_b = Scope::labeled("b");

	let first = scope_a.inject(&connection).unwrap();
	let second = scope_b.inject(&connection).unwrap();
	let third = inject(&connection).unwrap();

	assert!(Arc::ptr_eq(&first, &second));
	assert!(Arc::ptr_eq(&first, &third));
	assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
#[serial]
fn test_singleton_is_cached_only_in_root() {
	let counter = Arc::new(AtomicUsize::new(0));
	let connection = counted_connection(&counter, Lifetime::Singleton);

	let scope = Scope::labeled("worker");
	scope.inject(&connection).unwrap();

	assert!(Scope::root().contains(&connection));
	assert!(!scope.contains(&connection));
}

#[test]
#[serial]
fn test_singleton_lookup_reads_root_from_any_scope() {
	let counter = Arc::new(AtomicUsize::new(0));
	let connection = counted_connection(&counter, Lifetime::Singleton);

	let scope = Scope::new();
	assert!(scope.lookup(&connection).is_none());

	let produced = inject(&connection).unwrap();
	let found = scope.lookup(&connection).unwrap();
	assert!(Arc::ptr_eq(&produced, &found));
}

#[test]
fn test_scoped_instances_are_per_scope() {
	let counter = Arc::new(AtomicUsize::new(0));
	let connection = counted_connection(&counter, Lifetime::Scoped);

	let scope_a = Scope::labeled("a");
	let scope_b = Scope::labeled("b");

	let a_first = scope_a.inject(&connection).unwrap();
	let a_second = scope_a.inject(&connection).unwrap();
	let b_first = scope_b.inject(&connection).unwrap();

	assert!(Arc::ptr_eq(&a_first, &a_second));
	assert!(!Arc::ptr_eq(&a_first, &b_first));
	assert_ne!(a_first.serial, b_first.serial);
	assert_eq!(counter.load(Ordering::SeqCst), 2);

	assert!(scope_a.contains(&connection));
	assert!(scope_b.contains(&connection));
}

#[test]
fn test_transient_always_produces_fresh_instances() {
	let counter = Arc::new(AtomicUsize::new(0));
	let connection = counted_connection(&counter, Lifetime::Transient);

	let scope = Scope::labeled("burst");
	let first = scope.inject(&connection).unwrap();
	let second = scope.inject(&connection).unwrap();

	assert!(!Arc::ptr_eq(&first, &second));
	assert_ne!(first.serial, second.serial);
	assert!(scope.is_empty());
	assert!(scope.lookup(&connection).is_none());
	assert!(lookup(&connection).is_none());
}
