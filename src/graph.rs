//! Dependency graph export
//!
//! Snapshot view over the engine's observed dependency edges, for debugging
//! and documentation. The graph renders to DOT for Graphviz and offers a
//! few offline analyses; it plays no part in resolution itself. In
//! particular the engine performs no cycle detection at resolve time, so
//! [`DependencyGraph::detect_cycles`] on an exported snapshot is the way to
//! find a cycle before it recurses.
//!
//! ## Example
//!
//! ```rust
//! use ambient_di::{DependencyGraph, Lifetime};
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_node("database", Lifetime::Singleton);
//! graph.add_node("user-service", Lifetime::Scoped);
//! graph.add_dependency("user-service", "database");
//!
//! let dot = graph.to_dot();
//! assert!(dot.contains("digraph"));
//! ```

use crate::injectable::Lifetime;
use std::collections::{HashMap, HashSet};

/// A node in the exported graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
	/// Display name of the injectable
	pub name: String,
	/// Declared lifetime policy
	pub lifetime: Lifetime,
	/// Produced type, when known
	pub type_name: Option<String>,
}

/// An exported dependency graph.
///
/// Built by [`Container::dependency_graph`](crate::Container::dependency_graph)
/// or assembled by hand for ad-hoc visualization.
#[derive(Debug, Default)]
pub struct DependencyGraph {
	nodes: HashMap<String, GraphNode>,
	edges: Vec<(String, String)>,
}

impl DependencyGraph {
	/// Create an empty graph.
	pub fn new() -> Self {
		Self {
			nodes: HashMap::new(),
			edges: Vec::new(),
		}
	}

	/// Add a node.
	pub fn add_node(&mut self, name: impl Into<String>, lifetime: Lifetime) {
		let name = name.into();
		self.nodes.insert(
			name.clone(),
			GraphNode {
				name,
				lifetime,
				type_name: None,
			},
		);
	}

	/// Add a node annotated with its produced type.
	pub fn add_typed_node(
		&mut self,
		name: impl Into<String>,
		lifetime: Lifetime,
		type_name: impl Into<String>,
	) {
		let name = name.into();
		self.nodes.insert(
			name.clone(),
			GraphNode {
				name,
				lifetime,
				type_name: Some(type_name.into()),
			},
		);
	}

	/// Add a dependency edge `from` → `to`.
	pub fn add_dependency(&mut self, from: impl Into<String>, to: impl Into<String>) {
		self.edges.push((from.into(), to.into()));
	}

	/// Render the graph in DOT format for Graphviz.
	///
	/// Nodes are colored by lifetime: singletons light blue, scoped
	/// instances light green, transients light yellow.
	pub fn to_dot(&self) -> String {
		let mut output = String::from("digraph DependencyGraph {\n");
		output.push_str("  rankdir=LR;\n");
		output.push_str("  node [shape=box, style=rounded];\n\n");

		for node in self.nodes.values() {
			let color = match node.lifetime {
				Lifetime::Singleton => "lightblue",
				Lifetime::Scoped => "lightgreen",
				Lifetime::Transient => "lightyellow",
			};

			let label = if let Some(ref type_name) = node.type_name {
				format!("{}\\n({})", node.name, type_name)
			} else {
				node.name.clone()
			};

			output.push_str(&format!(
				"  \"{}\" [label=\"{}\", fillcolor={}, style=filled];\n",
				node.name, label, color
			));
		}

		output.push('\n');

		for (from, to) in &self.edges {
			output.push_str(&format!("  \"{}\" -> \"{}\";\n", from, to));
		}

		output.push_str("}\n");
		output
	}

	/// Find dependency cycles in the exported snapshot.
	///
	/// Returns every cycle found, each as the list of node names along it.
	/// This is offline analysis only; resolution does not run it.
	pub fn detect_cycles(&self) -> Vec<Vec<String>> {
		let mut cycles = Vec::new();
		let mut visited = HashSet::new();
		let mut rec_stack = HashSet::new();

		for node_name in self.nodes.keys() {
			if !visited.contains(node_name) {
				let mut path = Vec::new();
				self.dfs_detect_cycles(
					node_name,
					&mut visited,
					&mut rec_stack,
					&mut path,
					&mut cycles,
				);
			}
		}

		cycles
	}

	fn dfs_detect_cycles(
		&self,
		node: &str,
		visited: &mut HashSet<String>,
		rec_stack: &mut HashSet<String>,
		path: &mut Vec<String>,
		cycles: &mut Vec<Vec<String>>,
	) {
		visited.insert(node.to_string());
		rec_stack.insert(node.to_string());
		path.push(node.to_string());

		let dependencies: Vec<_> = self
			.edges
			.iter()
			.filter_map(|(from, to)| if from == node { Some(to.as_str()) } else { None })
			.collect();

		for dep in dependencies {
			if !visited.contains(dep) {
				self.dfs_detect_cycles(dep, visited, rec_stack, path, cycles);
			} else if rec_stack.contains(dep) {
				if let Some(cycle_start) = path.iter().position(|p| p == dep) {
					cycles.push(path[cycle_start..].to_vec());
				}
			}
		}

		path.pop();
		rec_stack.remove(node);
	}

	/// Aggregate counts over the graph.
	pub fn statistics(&self) -> GraphStatistics {
		let count = |lifetime: Lifetime| {
			self.nodes
				.values()
				.filter(|n| n.lifetime == lifetime)
				.count()
		};

		GraphStatistics {
			node_count: self.nodes.len(),
			edge_count: self.edges.len(),
			singleton_count: count(Lifetime::Singleton),
			scoped_count: count(Lifetime::Scoped),
			transient_count: count(Lifetime::Transient),
		}
	}
}

/// Statistics about an exported graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStatistics {
	/// Total number of nodes
	pub node_count: usize,
	/// Total number of edges
	pub edge_count: usize,
	/// Number of SINGLETON-lifetime nodes
	pub singleton_count: usize,
	/// Number of SCOPED-lifetime nodes
	pub scoped_count: usize,
	/// Number of TRANSIENT-lifetime nodes
	pub transient_count: usize,
}
