//! Explicit ordering graph over resource intents.

use std::collections::{BTreeSet, HashMap};

use crate::error::GraphError;
use crate::resources::{Intent, PackageIntent, Resource, ResourceIntent, ResourceRef};

/// Directed graph of intents with `before` and `notify` edges.
///
/// Intents keep their insertion order as a tie-break, so
/// [`ResourceGraph::into_ordered`] is deterministic for identical input.
#[derive(Debug, Default)]
pub struct ResourceGraph {
    nodes: Vec<ResourceIntent>,
    index: HashMap<ResourceRef, usize>,
    packages: HashMap<String, usize>,
}

/// Which edge list an edge is recorded in.
#[derive(Debug, Clone, Copy)]
enum Edge {
    Before,
    Notify,
}

impl ResourceGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of intents in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no intents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether an intent with this identity was added.
    #[must_use]
    pub fn contains(&self, reference: &ResourceRef) -> bool {
        self.index.contains_key(reference)
    }

    /// Add an intent and return its identity.
    ///
    /// A package whose name is already declared with the same desired state
    /// merges into the earlier declaration, whose identity is returned.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ConflictingPackage`] when a package name is
    /// already declared with a different desired state, and
    /// [`GraphError::DuplicateResource`] when any other intent with the same
    /// identity already exists.
    pub fn add(&mut self, resource: impl Into<Resource>) -> Result<ResourceRef, GraphError> {
        let resource = resource.into();
        let reference = resource.reference();
        if let Resource::Package(package) = &resource
            && let Some(existing) = self.merge_package(&reference, package)?
        {
            return Ok(existing);
        }
        if self.index.contains_key(&reference) {
            return Err(GraphError::DuplicateResource(reference.to_string()));
        }
        if let Resource::Package(package) = &resource {
            self.packages.insert(package.name.clone(), self.nodes.len());
        }
        self.index.insert(reference.clone(), self.nodes.len());
        self.nodes.push(ResourceIntent {
            resource,
            before: Vec::new(),
            notifies: Vec::new(),
        });
        Ok(reference)
    }

    /// Identity of an earlier declaration of the same package, if any.
    fn merge_package(
        &self,
        reference: &ResourceRef,
        package: &PackageIntent,
    ) -> Result<Option<ResourceRef>, GraphError> {
        let Some(node) = self
            .packages
            .get(&package.name)
            .and_then(|&i| self.nodes.get(i))
        else {
            return Ok(None);
        };
        let existing = node.reference();
        match &node.resource {
            Resource::Package(first) if first.ensure == package.ensure => {
                tracing::debug!("{reference} merged into {existing}");
                Ok(Some(existing))
            }
            _ => Err(GraphError::ConflictingPackage {
                name: package.name.clone(),
                first: existing.to_string(),
                second: reference.to_string(),
            }),
        }
    }

    /// Require `from` to be applied before `to`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownResource`] if either end was never added.
    pub fn before(&mut self, from: &ResourceRef, to: &ResourceRef) -> Result<(), GraphError> {
        self.edge(from, to, Edge::Before)
    }

    /// Require `from` to be applied before `to`, and `to` to be refreshed
    /// whenever `from` changes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownResource`] if either end was never added.
    pub fn notify(&mut self, from: &ResourceRef, to: &ResourceRef) -> Result<(), GraphError> {
        self.edge(from, to, Edge::Notify)
    }

    fn edge(&mut self, from: &ResourceRef, to: &ResourceRef, edge: Edge) -> Result<(), GraphError> {
        if !self.index.contains_key(to) {
            return Err(GraphError::UnknownResource(to.to_string()));
        }
        let node = self
            .index
            .get(from)
            .and_then(|&i| self.nodes.get_mut(i))
            .ok_or_else(|| GraphError::UnknownResource(from.to_string()))?;
        let list = match edge {
            Edge::Before => &mut node.before,
            Edge::Notify => &mut node.notifies,
        };
        if !list.contains(to) {
            list.push(to.clone());
        }
        Ok(())
    }

    /// Consume the graph and return intents in a topological order.
    ///
    /// Uses Kahn's algorithm; among intents that are ready at the same time
    /// the earliest inserted comes first.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Cycle`] naming every intent left unordered when
    /// the edges contain a cycle.
    pub fn into_ordered(self) -> Result<Vec<ResourceIntent>, GraphError> {
        let mut in_degree = vec![0usize; self.nodes.len()];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            for target in node.before.iter().chain(&node.notifies) {
                if let Some(&j) = self.index.get(target)
                    && let Some(succ) = successors.get_mut(i)
                    && let Some(count) = in_degree.get_mut(j)
                {
                    succ.push(j);
                    *count += 1;
                }
            }
        }

        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter_map(|(i, &d)| (d == 0).then_some(i))
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(idx) = ready.pop_first() {
            order.push(idx);
            if let Some(dependents) = successors.get(idx) {
                for &dep in dependents {
                    if let Some(count) = in_degree.get_mut(dep) {
                        *count -= 1;
                        if *count == 0 {
                            ready.insert(dep);
                        }
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            let stuck: Vec<String> = in_degree
                .iter()
                .zip(&self.nodes)
                .filter(|&(&d, _)| d > 0)
                .map(|(_, node)| node.reference().to_string())
                .collect();
            return Err(GraphError::Cycle(stuck.join(", ")));
        }

        let mut slots: Vec<Option<ResourceIntent>> = self.nodes.into_iter().map(Some).collect();
        Ok(order
            .into_iter()
            .filter_map(|i| slots.get_mut(i).and_then(Option::take))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::Ensure;
    use crate::resources::{ResourceKind, SymlinkIntent};

    fn pkg(name: &str) -> PackageIntent {
        PackageIntent::new(name, name, Ensure::Present)
    }

    fn titles(intents: &[ResourceIntent]) -> Vec<String> {
        intents.iter().map(|i| i.reference().to_string()).collect()
    }

    // -----------------------------------------------------------------------
    // add
    // -----------------------------------------------------------------------

    #[test]
    fn same_package_twice_is_merged() {
        let mut graph = ResourceGraph::new();
        let first = graph.add(pkg("apparmor")).unwrap();
        let second = graph.add(pkg("apparmor")).unwrap();
        assert_eq!(first, second);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn package_name_under_another_title_is_merged() {
        let mut graph = ResourceGraph::new();
        let engine = graph
            .add(PackageIntent::new("docker", "docker.io", Ensure::Present))
            .unwrap();
        let merged = graph.add(pkg("docker.io")).unwrap();
        assert_eq!(merged, engine);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn package_name_with_conflicting_state_is_rejected() {
        let mut graph = ResourceGraph::new();
        graph
            .add(PackageIntent::new("docker", "docker.io", Ensure::Absent))
            .unwrap();
        let err = graph.add(pkg("docker.io")).unwrap_err();
        assert_eq!(
            err,
            GraphError::ConflictingPackage {
                name: "docker.io".to_string(),
                first: "Package[docker]".to_string(),
                second: "Package[docker.io]".to_string(),
            }
        );
    }

    #[test]
    fn package_title_for_another_package_is_rejected() {
        let mut graph = ResourceGraph::new();
        graph
            .add(PackageIntent::new("docker", "lxc-docker", Ensure::Present))
            .unwrap();
        let err = graph.add(pkg("docker")).unwrap_err();
        assert_eq!(err, GraphError::DuplicateResource("Package[docker]".to_string()));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn duplicate_non_package_is_rejected() {
        let mut graph = ResourceGraph::new();
        graph.add(SymlinkIntent::new("/a", "/b")).unwrap();
        let err = graph.add(SymlinkIntent::new("/a", "/c")).unwrap_err();
        assert_eq!(err, GraphError::DuplicateResource("Symlink[/a]".to_string()));
    }

    // -----------------------------------------------------------------------
    // edges
    // -----------------------------------------------------------------------

    #[test]
    fn edge_to_unknown_resource_fails() {
        let mut graph = ResourceGraph::new();
        let a = graph.add(pkg("a")).unwrap();
        let missing = ResourceRef::new(ResourceKind::File, "/nowhere");
        assert!(matches!(
            graph.before(&a, &missing),
            Err(GraphError::UnknownResource(_))
        ));
        assert!(matches!(
            graph.notify(&missing, &a),
            Err(GraphError::UnknownResource(_))
        ));
    }

    #[test]
    fn repeated_edge_is_recorded_once() {
        let mut graph = ResourceGraph::new();
        let a = graph.add(pkg("a")).unwrap();
        let b = graph.add(pkg("b")).unwrap();
        graph.before(&a, &b).unwrap();
        graph.before(&a, &b).unwrap();
        let ordered = graph.into_ordered().unwrap();
        assert_eq!(ordered[0].before, vec![b]);
    }

    // -----------------------------------------------------------------------
    // into_ordered
    // -----------------------------------------------------------------------

    #[test]
    fn independent_intents_keep_insertion_order() {
        let mut graph = ResourceGraph::new();
        for name in ["c", "a", "b"] {
            graph.add(pkg(name)).unwrap();
        }
        let ordered = graph.into_ordered().unwrap();
        assert_eq!(
            titles(&ordered),
            vec!["Package[c]", "Package[a]", "Package[b]"]
        );
    }

    #[test]
    fn edges_override_insertion_order() {
        let mut graph = ResourceGraph::new();
        let engine = graph.add(pkg("engine")).unwrap();
        let transport = graph.add(pkg("transport")).unwrap();
        graph.before(&transport, &engine).unwrap();
        let ordered = graph.into_ordered().unwrap();
        assert_eq!(
            titles(&ordered),
            vec!["Package[transport]", "Package[engine]"]
        );
    }

    #[test]
    fn diamond_is_ordered() {
        let mut graph = ResourceGraph::new();
        let d = graph.add(pkg("d")).unwrap();
        let c = graph.add(pkg("c")).unwrap();
        let b = graph.add(pkg("b")).unwrap();
        let a = graph.add(pkg("a")).unwrap();
        graph.before(&a, &b).unwrap();
        graph.before(&a, &c).unwrap();
        graph.before(&b, &d).unwrap();
        graph.notify(&c, &d).unwrap();
        let ordered = graph.into_ordered().unwrap();
        assert_eq!(
            titles(&ordered),
            vec!["Package[a]", "Package[c]", "Package[b]", "Package[d]"]
        );
    }

    #[test]
    fn cycle_is_reported() {
        let mut graph = ResourceGraph::new();
        let a = graph.add(pkg("a")).unwrap();
        let b = graph.add(pkg("b")).unwrap();
        graph.add(pkg("free")).unwrap();
        graph.before(&a, &b).unwrap();
        graph.notify(&b, &a).unwrap();
        let err = graph.into_ordered().unwrap_err();
        assert_eq!(
            err,
            GraphError::Cycle("Package[a], Package[b]".to_string())
        );
    }

    #[test]
    fn empty_graph_orders_to_nothing() {
        let graph = ResourceGraph::new();
        assert!(graph.is_empty());
        assert!(graph.into_ordered().unwrap().is_empty());
    }
}
