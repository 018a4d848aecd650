//! Topology reduction: merging wire-connected nodes into lumped nodes.

use std::collections::{HashMap, VecDeque};

use tracing::warn;

use crate::circuit::NodeLabel;
use crate::components::Component;
use crate::error::{GridError, Result};

/// Array-backed disjoint-set with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Create `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Find the representative of `x`, compressing the path behind it.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`. Returns false if already merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Lumped-node view of a component list.
///
/// Every distinct endpoint gets a dense node index in first-encounter order
/// (component order, `a` before `b`); every wire-connected group of nodes
/// becomes one class, numbered in the order its first node was met.
#[derive(Debug, Clone)]
pub struct Topology<N> {
    nodes: Vec<N>,
    node_ids: HashMap<N, usize>,
    class_of_node: Vec<usize>,
    /// Class of each component's `[a, b]` endpoints, by component index
    terminals: Vec<[usize; 2]>,
    num_classes: usize,
    ground_class: usize,
}

impl<N: NodeLabel> Topology<N> {
    /// Reduce `components` around the reference node `ground`.
    pub fn build(components: &[Component<N>], ground: &N) -> Result<Self> {
        let mut nodes = Vec::new();
        let mut node_ids = HashMap::new();
        for component in components {
            for node in component.nodes() {
                if !node_ids.contains_key(node) {
                    node_ids.insert(node.clone(), nodes.len());
                    nodes.push(node.clone());
                }
            }
        }

        let ground_id = *node_ids.get(ground).ok_or_else(|| GridError::MissingGround {
            node: ground.to_string(),
        })?;

        let mut sets = DisjointSet::new(nodes.len());
        for component in components.iter().filter(|c| c.is_wire()) {
            let [a, b] = component.nodes();
            sets.union(node_ids[a], node_ids[b]);
        }

        let mut class_of_root = HashMap::new();
        let class_of_node: Vec<usize> = (0..nodes.len())
            .map(|id| {
                let root = sets.find(id);
                let next = class_of_root.len();
                *class_of_root.entry(root).or_insert(next)
            })
            .collect();

        let terminals = components
            .iter()
            .map(|c| {
                let [a, b] = c.nodes();
                [class_of_node[node_ids[a]], class_of_node[node_ids[b]]]
            })
            .collect();

        Ok(Self {
            nodes,
            node_ids,
            ground_class: class_of_node[ground_id],
            num_classes: class_of_root.len(),
            class_of_node,
            terminals,
        })
    }

    /// Distinct nodes in first-encounter order.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Number of lumped nodes, ground included.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Class holding the reference node.
    pub fn ground_class(&self) -> usize {
        self.ground_class
    }

    /// Class of a node, if it is an endpoint of any component.
    pub fn class_of(&self, node: &N) -> Option<usize> {
        self.node_ids.get(node).map(|&id| self.class_of_node[id])
    }

    /// Classes of component `index`'s `[a, b]` endpoints.
    pub fn terminals(&self, index: usize) -> [usize; 2] {
        self.terminals[index]
    }

    /// Number of node-potential unknowns (every class except ground).
    pub fn num_unknowns(&self) -> usize {
        self.num_classes - 1
    }

    /// Matrix index of a class potential. Returns None for ground.
    pub fn unknown_index(&self, class: usize) -> Option<usize> {
        use std::cmp::Ordering;
        match class.cmp(&self.ground_class) {
            Ordering::Less => Some(class),
            Ordering::Equal => None,
            Ordering::Greater => Some(class - 1),
        }
    }

    /// Reject circuits whose MNA matrix is singular by construction.
    ///
    /// With positive resistances the system is regular iff every class
    /// reaches ground through non-wire components and the voltage sources
    /// form no loop (a source shorted by a wire is a loop of one).
    pub fn check_solvable(&self, components: &[Component<N>]) -> Result<()> {
        let floating = self.floating_nodes(components);
        if !floating.is_empty() {
            let floating: Vec<String> = floating.iter().map(|n| n.to_string()).collect();
            warn!(?floating, "nodes without a path to ground");
            return Err(GridError::SingularCircuit { floating });
        }

        let mut source_sets = DisjointSet::new(self.num_classes);
        for (index, component) in components.iter().enumerate() {
            if !component.is_voltage_source() {
                continue;
            }
            let [a, b] = self.terminals[index];
            if !source_sets.union(a, b) {
                warn!(source = component.name(), "voltage source closes a loop of sources");
                return Err(GridError::SingularCircuit { floating: Vec::new() });
            }
        }
        Ok(())
    }

    /// Nodes whose class has no path to ground through any non-wire component.
    pub fn floating_nodes(&self, components: &[Component<N>]) -> Vec<N> {
        let mut adjacency = vec![Vec::new(); self.num_classes];
        for (index, component) in components.iter().enumerate() {
            if component.is_wire() {
                continue;
            }
            let [a, b] = self.terminals[index];
            adjacency[a].push(b);
            adjacency[b].push(a);
        }

        let mut reached = vec![false; self.num_classes];
        let mut queue = VecDeque::from([self.ground_class]);
        reached[self.ground_class] = true;
        while let Some(class) = queue.pop_front() {
            for &next in &adjacency[class] {
                if !reached[next] {
                    reached[next] = true;
                    queue.push_back(next);
                }
            }
        }

        self.nodes
            .iter()
            .zip(&self.class_of_node)
            .filter(|&(_, &class)| !reached[class])
            .map(|(node, _)| node.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjoint_set_is_transitive_and_idempotent() {
        let mut sets = DisjointSet::new(5);
        assert!(sets.union(0, 1));
        assert!(sets.union(1, 2));
        assert!(!sets.union(2, 0));
        assert!(!sets.union(0, 1));
        assert_eq!(sets.find(0), sets.find(2));
        assert_ne!(sets.find(0), sets.find(3));
        assert!(sets.union(4, 3));
        assert_eq!(sets.find(3), sets.find(4));
    }

    #[test]
    fn test_wires_merge_classes() {
        let components = vec![
            Component::voltage_source("a", "gnd", 1.0),
            Component::wire("a", "b"),
            Component::resistor("b", "c", 10.0),
            Component::wire("c", "gnd"),
        ];
        let topo = Topology::build(&components, &"gnd").unwrap();

        assert_eq!(topo.nodes(), &["a", "gnd", "b", "c"]);
        assert_eq!(topo.num_classes(), 2);
        assert_eq!(topo.class_of(&"a"), topo.class_of(&"b"));
        assert_eq!(topo.class_of(&"c"), Some(topo.ground_class()));
        assert_eq!(topo.unknown_index(topo.ground_class()), None);
        assert_eq!(topo.num_unknowns(), 1);
        assert_eq!(topo.terminals(2), [topo.class_of(&"b").unwrap(), topo.ground_class()]);
    }

    #[test]
    fn test_wire_orientation_does_not_change_classes() {
        let forward = vec![
            Component::wire(1, 2),
            Component::wire(2, 3),
            Component::resistor(3, 4, 1.0),
        ];
        let reversed = vec![
            Component::wire(3, 2),
            Component::wire(2, 1),
            Component::resistor(3, 4, 1.0),
        ];
        for components in [forward, reversed] {
            let topo = Topology::build(&components, &4).unwrap();
            assert_eq!(topo.num_classes(), 2);
            assert_eq!(topo.class_of(&1), topo.class_of(&3));
            assert_ne!(topo.class_of(&1), topo.class_of(&4));
        }
    }

    #[test]
    fn test_unknown_indices_skip_ground() {
        let components = vec![
            Component::resistor("x", "y", 1.0),
            Component::resistor("y", "z", 1.0),
        ];
        let topo = Topology::build(&components, &"y").unwrap();
        let mut indices: Vec<_> = ["x", "z"]
            .iter()
            .filter_map(|n| topo.class_of(n).and_then(|c| topo.unknown_index(c)))
            .collect();
        indices.sort();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_missing_ground() {
        let components = vec![Component::resistor("a", "b", 1.0)];
        assert!(matches!(
            Topology::build(&components, &"gnd"),
            Err(GridError::MissingGround { node }) if node == "gnd"
        ));
        let empty: Vec<Component<&str>> = Vec::new();
        assert!(Topology::build(&empty, &"gnd").is_err());
    }

    #[test]
    fn test_check_solvable() {
        let ok = vec![
            Component::voltage_source("a", "gnd", 1.0),
            Component::resistor("a", "b", 1.0),
            Component::led("b", "x", 2.0),
        ];
        let topo = Topology::build(&ok, &"gnd").unwrap();
        assert!(topo.check_solvable(&ok).is_ok());

        let island = vec![
            Component::voltage_source("a", "gnd", 1.0),
            Component::resistor("x", "y", 1.0),
        ];
        let topo = Topology::build(&island, &"gnd").unwrap();
        assert!(matches!(
            topo.check_solvable(&island),
            Err(GridError::SingularCircuit { floating }) if floating == ["x", "y"]
        ));

        let shorted = vec![
            Component::voltage_source("a", "gnd", 1.0),
            Component::wire("a", "gnd"),
        ];
        let topo = Topology::build(&shorted, &"gnd").unwrap();
        assert!(matches!(
            topo.check_solvable(&shorted),
            Err(GridError::SingularCircuit { floating }) if floating.is_empty()
        ));

        let looped = vec![
            Component::voltage_source("a", "gnd", 1.0),
            Component::voltage_source("b", "a", 1.0),
            Component::voltage_source("b", "gnd", 2.0),
            Component::resistor("b", "gnd", 1.0),
        ];
        let topo = Topology::build(&looped, &"gnd").unwrap();
        assert!(topo.check_solvable(&looped).is_err());
    }

    #[test]
    fn test_floating_nodes() {
        let components = vec![
            Component::voltage_source("a", "gnd", 1.0),
            Component::resistor("a", "gnd", 1.0),
            Component::resistor("x", "y", 1.0),
            Component::wire("y", "z"),
        ];
        let topo = Topology::build(&components, &"gnd").unwrap();
        assert_eq!(topo.floating_nodes(&components), vec!["x", "y", "z"]);
    }
}
