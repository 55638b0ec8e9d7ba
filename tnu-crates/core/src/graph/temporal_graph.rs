use std::cell::OnceCell;

use log::debug;

use super::adjacency_matrix::AdjacencyMatrix;
use super::ConstraintKind;
use super::EdgeData;
use super::EdgeId;
use super::Node;
use super::NodeId;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::labels::Proposition;
use crate::labels::PropositionSet;

#[derive(Debug, Clone)]
struct EdgeSlot<E> {
    name: String,
    source: NodeId,
    target: NodeId,
    data: E,
}

/// Indexes over the nodes, rebuilt lazily after any change to the nodes.
#[derive(Debug, Clone, Default)]
struct NodeCache {
    observers: HashMap<Proposition, NodeId>,
    /// The propositions observed by nodes whose label mentions the key.
    children: HashMap<Proposition, PropositionSet>,
    propositions: PropositionSet,
}

/// Indexes over the edges, rebuilt lazily after any change to the edges.
#[derive(Debug, Clone, Default)]
struct EdgeCache {
    contingent_edges: Vec<EdgeId>,
}

/// A temporal network: named nodes and named edges with at most one edge per ordered pair of
/// nodes.
///
/// The edge between two nodes is found in constant time through an adjacency matrix; names are
/// resolved through hash maps which only the graph itself updates, so renaming a node or an edge
/// keeps every index consistent.
#[derive(Debug, Clone)]
pub struct TemporalGraph<E> {
    nodes: KeyedVec<NodeId, Node>,
    node_index: HashMap<String, NodeId>,
    matrix: AdjacencyMatrix,
    edges: KeyedVec<EdgeId, Option<EdgeSlot<E>>>,
    /// Slots of removed edges which can be reused.
    free_edges: Vec<EdgeId>,
    edge_index: HashMap<String, EdgeId>,
    z: Option<NodeId>,
    /// The activation node of every contingent node.
    activations: HashMap<NodeId, NodeId>,
    node_cache: OnceCell<NodeCache>,
    edge_cache: OnceCell<EdgeCache>,
}

impl<E> Default for TemporalGraph<E> {
    fn default() -> Self {
        TemporalGraph {
            nodes: KeyedVec::default(),
            node_index: HashMap::default(),
            matrix: AdjacencyMatrix::default(),
            edges: KeyedVec::default(),
            free_edges: Vec::new(),
            edge_index: HashMap::default(),
            z: None,
            activations: HashMap::default(),
            node_cache: OnceCell::new(),
            edge_cache: OnceCell::new(),
        }
    }
}

impl<E: EdgeData> TemporalGraph<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    /// Adds `node`; fails if a node with the same name exists.
    ///
    /// A node named `Z` becomes the reference node unless one has been set already.
    pub fn add_node(&mut self, node: Node) -> Option<NodeId> {
        if self.node_index.contains_key(node.name()) {
            return None;
        }

        let is_z = node.name() == "Z";
        let name = node.name().to_owned();
        let id = self.nodes.push(node);
        let _ = self.node_index.insert(name, id);
        self.matrix.add_node();
        if is_z && self.z.is_none() {
            self.z = Some(id);
        }
        self.invalidate_nodes();

        Some(id)
    }

    pub fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node]
    }

    pub fn node_mut(&mut self, node: NodeId) -> &mut Node {
        self.invalidate_nodes();
        &mut self.nodes[node]
    }

    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.node_index.get(name).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        self.nodes.keys()
    }

    /// Renames `node`; fails if `name` is taken by another node.
    pub fn rename_node(&mut self, node: NodeId, name: impl Into<String>) -> bool {
        let name = name.into();
        if let Some(&present) = self.node_index.get(&name) {
            return present == node;
        }

        let old_name = self.nodes[node].name().to_owned();
        let _ = self.node_index.remove(&old_name);
        let _ = self.node_index.insert(name.clone(), node);
        self.nodes[node].set_name(name);
        true
    }

    /// Removes `node` and its edges.
    ///
    /// The last node takes the id of the removed one.
    pub fn remove_node(&mut self, node: NodeId) -> Option<Node> {
        if node.index() >= self.nodes.len() {
            return None;
        }

        let incident = self
            .out_edges(node)
            .chain(self.in_edges(node))
            .map(|(_, edge)| edge)
            .collect::<Vec<_>>();
        for edge in incident {
            let _ = self.remove_edge(edge);
        }

        let last = NodeId::create_from_index(self.nodes.len() - 1);
        self.matrix.remove_node(node);
        let removed = self.nodes.swap_remove(node);
        let _ = self.node_index.remove(removed.name());

        if last != node {
            let moved_name = self.nodes[node].name().to_owned();
            let _ = self.node_index.insert(moved_name, node);
            for slot in self.edges.iter_mut().flatten() {
                if slot.source == last {
                    slot.source = node;
                }
                if slot.target == last {
                    slot.target = node;
                }
                slot.data.node_moved(last, node);
            }
        }

        let moved = |id: NodeId| if id == last { node } else { id };
        self.z = self.z.filter(|&z| z != node).map(moved);
        self.activations = self
            .activations
            .iter()
            .filter(|(&contingent, &activation)| contingent != node && activation != node)
            .map(|(&contingent, &activation)| (moved(contingent), moved(activation)))
            .collect();

        self.invalidate_nodes();
        self.invalidate_edges();
        debug!("Removed node {}", removed.name());
        Some(removed)
    }

    /// Adds the edge `name` from the node named `source` to the node named `target`.
    ///
    /// Fails if an endpoint is absent, if the name is taken or if the endpoints are already
    /// connected in this direction.
    pub fn add_edge(
        &mut self,
        name: impl Into<String>,
        data: E,
        source: &str,
        target: &str,
    ) -> Option<EdgeId> {
        let source = self.find_node(source)?;
        let target = self.find_node(target)?;
        self.add_edge_between(name, data, source, target)
    }

    /// Adds the edge `name` from `source` to `target`; fails under the same conditions as
    /// [`TemporalGraph::add_edge`].
    pub fn add_edge_between(
        &mut self,
        name: impl Into<String>,
        data: E,
        source: NodeId,
        target: NodeId,
    ) -> Option<EdgeId> {
        let name = name.into();
        if source.index() >= self.nodes.len()
            || target.index() >= self.nodes.len()
            || self.edge_index.contains_key(&name)
            || self.matrix.get(source, target).is_some()
        {
            return None;
        }
        Some(self.insert_edge(name, data, source, target))
    }

    fn insert_edge(&mut self, name: String, data: E, source: NodeId, target: NodeId) -> EdgeId {
        let slot = EdgeSlot {
            name: name.clone(),
            source,
            target,
            data,
        };
        let edge = match self.free_edges.pop() {
            Some(edge) => {
                self.edges[edge] = Some(slot);
                edge
            }
            None => self.edges.push(Some(slot)),
        };

        let _ = self.edge_index.insert(name, edge);
        self.matrix.set(source, target, Some(edge));
        self.invalidate_edges();
        edge
    }

    /// The edge from `source` to `target`, added with `create` if there is none.
    pub(crate) fn edge_or_insert(
        &mut self,
        source: NodeId,
        target: NodeId,
        create: impl FnOnce() -> E,
    ) -> EdgeId {
        match self.matrix.get(source, target) {
            Some(edge) => edge,
            None => {
                let name = self.fresh_edge_name(source, target);
                self.insert_edge(name, create(), source, target)
            }
        }
    }

    fn fresh_edge_name(&self, source: NodeId, target: NodeId) -> String {
        let base = format!("{}_{}", self.nodes[source].name(), self.nodes[target].name());
        if !self.edge_index.contains_key(&base) {
            return base;
        }
        let mut suffix = 1;
        loop {
            let name = format!("{base}_{suffix}");
            if !self.edge_index.contains_key(&name) {
                return name;
            }
            suffix += 1;
        }
    }

    pub fn find_edge(&self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        self.matrix.get(source, target)
    }

    pub fn find_edge_by_name(&self, name: &str) -> Option<EdgeId> {
        self.edge_index.get(name).copied()
    }

    fn get_slot(&self, edge: EdgeId) -> Option<&EdgeSlot<E>> {
        self.edges.get(edge)?.as_ref()
    }

    fn get_slot_mut(&mut self, edge: EdgeId) -> Option<&mut EdgeSlot<E>> {
        self.edges.get_mut(edge)?.as_mut()
    }

    fn slot(&self, edge: EdgeId) -> &EdgeSlot<E> {
        self.get_slot(edge)
            .unwrap_or_else(|| panic!("edge {edge} is not in the graph"))
    }

    fn slot_mut(&mut self, edge: EdgeId) -> &mut EdgeSlot<E> {
        self.get_slot_mut(edge)
            .unwrap_or_else(|| panic!("edge {edge} is not in the graph"))
    }

    /// The payload of `edge`, or `None` if it has been removed.
    pub fn get_edge(&self, edge: EdgeId) -> Option<&E> {
        self.get_slot(edge).map(|slot| &slot.data)
    }

    pub fn get_edge_mut(&mut self, edge: EdgeId) -> Option<&mut E> {
        self.invalidate_edges();
        self.get_slot_mut(edge).map(|slot| &mut slot.data)
    }

    /// The payload of `edge`.
    ///
    /// # Panics
    /// If `edge` has been removed; see [`TemporalGraph::get_edge`].
    pub fn edge(&self, edge: EdgeId) -> &E {
        &self.slot(edge).data
    }

    /// # Panics
    /// If `edge` has been removed; see [`TemporalGraph::get_edge_mut`].
    pub fn edge_mut(&mut self, edge: EdgeId) -> &mut E {
        self.invalidate_edges();
        &mut self.slot_mut(edge).data
    }

    /// The payload of `edge`, without invalidating the edge indexes.
    ///
    /// Only for changes to the values of an edge; its kind must stay the same.
    pub(crate) fn edge_values_mut(&mut self, edge: EdgeId) -> &mut E {
        &mut self.slot_mut(edge).data
    }

    pub fn edge_name(&self, edge: EdgeId) -> &str {
        &self.slot(edge).name
    }

    /// The source and target of `edge`.
    pub fn endpoints(&self, edge: EdgeId) -> (NodeId, NodeId) {
        let slot = self.slot(edge);
        (slot.source, slot.target)
    }

    /// Renames `edge`; fails if `edge` has been removed or `name` is taken by another edge.
    pub fn rename_edge(&mut self, edge: EdgeId, name: impl Into<String>) -> bool {
        let name = name.into();
        if let Some(&present) = self.edge_index.get(&name) {
            return present == edge;
        }
        let Some(slot) = self.get_slot_mut(edge) else {
            return false;
        };

        let old_name = std::mem::replace(&mut slot.name, name.clone());
        let _ = self.edge_index.remove(&old_name);
        let _ = self.edge_index.insert(name, edge);
        true
    }

    pub fn remove_edge(&mut self, edge: EdgeId) -> Option<E> {
        let slot = self.edges.get_mut(edge)?.take()?;
        let _ = self.edge_index.remove(&slot.name);
        self.matrix.set(slot.source, slot.target, None);
        self.free_edges.push(edge);
        self.invalidate_edges();
        Some(slot.data)
    }

    /// The edges, by increasing id.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .keys()
            .filter(move |&edge| self.edges[edge].is_some())
    }

    /// The edges leaving `node` together with their targets.
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        self.matrix.row(node)
    }

    /// The edges entering `node` together with their sources.
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        self.matrix.column(node)
    }

    /// Reverses the direction of every edge.
    pub fn reverse(&mut self) {
        self.matrix.transpose();
        for slot in self.edges.iter_mut().flatten() {
            std::mem::swap(&mut slot.source, &mut slot.target);
        }
        self.invalidate_edges();
    }

    /// The reference node every other node is scheduled relative to.
    pub fn z(&self) -> Option<NodeId> {
        self.z
    }

    pub fn set_z(&mut self, z: NodeId) {
        self.z = Some(z);
    }

    pub fn activation_node(&self, contingent: NodeId) -> Option<NodeId> {
        self.activations.get(&contingent).copied()
    }

    pub fn set_activation_node(&mut self, contingent: NodeId, activation: NodeId) {
        let _ = self.activations.insert(contingent, activation);
    }

    /// The contingent nodes with their activation node, by increasing contingent node.
    pub fn contingent_links(&self) -> Vec<(NodeId, NodeId)> {
        let mut links = self
            .activations
            .iter()
            .map(|(&contingent, &activation)| (activation, contingent))
            .collect::<Vec<_>>();
        links.sort_by_key(|&(_, contingent)| contingent);
        links
    }

    /// The observer of `proposition`; the one with the smallest id if there are several.
    pub fn observer(&self, proposition: Proposition) -> Option<NodeId> {
        self.node_cache().observers.get(&proposition).copied()
    }

    /// The propositions which have an observer.
    pub fn propositions(&self) -> PropositionSet {
        self.node_cache().propositions
    }

    /// The propositions observed by nodes whose label mentions `proposition`.
    pub fn children_of_observer(&self, proposition: Proposition) -> PropositionSet {
        self.node_cache()
            .children
            .get(&proposition)
            .copied()
            .unwrap_or_default()
    }

    /// The edges of kind [`ConstraintKind::Contingent`], by increasing id.
    pub fn contingent_edges(&self) -> &[EdgeId] {
        &self
            .edge_cache
            .get_or_init(|| EdgeCache {
                contingent_edges: self
                    .edges()
                    .filter(|&edge| self.edge(edge).kind() == ConstraintKind::Contingent)
                    .collect(),
            })
            .contingent_edges
    }

    fn node_cache(&self) -> &NodeCache {
        self.node_cache.get_or_init(|| {
            let mut cache = NodeCache::default();
            for node in self.nodes() {
                if let Some(proposition) = self.nodes[node].observed() {
                    let _ = cache.observers.entry(proposition).or_insert(node);
                    cache.propositions.insert(proposition);
                }
            }
            for (&child, &observer) in cache.observers.iter() {
                for parent in self.nodes[observer].label().propositions().iter() {
                    if parent != child {
                        cache.children.entry(parent).or_default().insert(child);
                    }
                }
            }
            cache
        })
    }

    fn invalidate_nodes(&mut self) {
        let _ = self.node_cache.take();
    }

    fn invalidate_edges(&mut self) {
        let _ = self.edge_cache.take();
    }
}
