//! Ambient resolution context
//!
//! A single thread-local cell holds the *current scope* (which cache a
//! resolution writes into) and the *current parent* (the injectable whose
//! factory is presently executing). The cell is pre-seeded with the root
//! scope and no parent, and is only ever mutated through [`run_with`], which
//! restores the previous binding on every exit path (including unwinding)
//! via an RAII guard.
//!
//! Resolution is synchronous and re-enters only through direct nested calls
//! on the same stack, so the swap/restore discipline needs no locking.

use crate::error::{DiError, DiResult};
use crate::injectable::{DependencySet, InjectableId};
use crate::scope::Scope;
use std::cell::RefCell;

/// The ambient `{active scope, active parent}` binding.
#[derive(Clone)]
pub(crate) struct Frame {
	/// Scope that SCOPED resolutions cache into
	pub(crate) scope: Scope,
	/// Injectable whose factory is currently running, if any
	pub(crate) parent: Option<ParentRecord>,
}

/// Handle to the currently resolving injectable, used to append observed
/// dependency edges to its definition.
#[derive(Clone)]
pub(crate) struct ParentRecord {
	id: InjectableId,
	dependencies: DependencySet,
}

impl ParentRecord {
	pub(crate) fn new(id: InjectableId, dependencies: DependencySet) -> Self {
		Self { id, dependencies }
	}

	pub(crate) fn id(&self) -> InjectableId {
		self.id
	}

	/// Record `child` as an observed dependency of this injectable.
	///
	/// The set only grows, and keeps insertion order (depth-first pre-order
	/// of factory invocation). Recording the same edge twice is a no-op.
	pub(crate) fn record(&self, child: InjectableId) {
		let mut deps = self
			.dependencies
			.write()
			.unwrap_or_else(std::sync::PoisonError::into_inner);
		if !deps.contains(&child) {
			deps.push(child);
		}
	}
}

thread_local! {
	/// Ambient context cell, seeded lazily with `{root scope, no parent}`.
	static CONTEXT: RefCell<Frame> = RefCell::new(Frame {
		scope: Scope::root(),
		parent: None,
	});
}

/// Read the current ambient binding.
///
/// Fails with [`DiError::OutOfContext`] only when the thread-local cell is
/// unavailable (thread teardown); through normal use this never fires.
pub(crate) fn current() -> DiResult<Frame> {
	CONTEXT
		.try_with(|cell| cell.borrow().clone())
		.map_err(|_| DiError::OutOfContext)
}

/// Run `f` with `frame` installed as the ambient binding.
///
/// The prior binding is restored unconditionally when `f` returns or panics.
pub(crate) fn run_with<R>(frame: Frame, f: impl FnOnce() -> R) -> DiResult<R> {
	let previous = CONTEXT
		.try_with(|cell| cell.replace(frame))
		.map_err(|_| DiError::OutOfContext)?;
	let _restore = RestoreGuard {
		previous: Some(previous),
	};
	Ok(f())
}

/// RAII guard: puts the previous binding back on drop, unwind included.
struct RestoreGuard {
	previous: Option<Frame>,
}

impl Drop for RestoreGuard {
	fn drop(&mut self) {
		if let Some(previous) = self.previous.take() {
			let _ = CONTEXT.try_with(|cell| {
				*cell.borrow_mut() = previous;
			});
		}
	}
}
