use super::EdgeId;
use super::NodeId;
use crate::containers::StorageKey;

const INITIAL_CAPACITY: usize = 10;
const GROW_FACTOR: f64 = 1.6;

/// The edge between every ordered pair of nodes, stored in a square table indexed by [`NodeId`].
///
/// When the table is full it is reallocated with `ceil(capacity * 1.6)` rows and columns.
#[derive(Debug, Clone)]
pub(crate) struct AdjacencyMatrix {
    capacity: usize,
    order: usize,
    cells: Vec<Option<EdgeId>>,
}

impl Default for AdjacencyMatrix {
    fn default() -> Self {
        AdjacencyMatrix {
            capacity: INITIAL_CAPACITY,
            order: 0,
            cells: vec![None; INITIAL_CAPACITY * INITIAL_CAPACITY],
        }
    }
}

impl AdjacencyMatrix {
    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn cell(&self, source: usize, target: usize) -> usize {
        source * self.capacity + target
    }

    pub(crate) fn get(&self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        if source.index() >= self.order || target.index() >= self.order {
            return None;
        }
        self.cells[self.cell(source.index(), target.index())]
    }

    pub(crate) fn set(&mut self, source: NodeId, target: NodeId, edge: Option<EdgeId>) {
        let cell = self.cell(source.index(), target.index());
        self.cells[cell] = edge;
    }

    /// Adds an empty row and column for a new node.
    pub(crate) fn add_node(&mut self) {
        if self.order == self.capacity {
            self.grow();
        }
        self.order += 1;
    }

    fn grow(&mut self) {
        let new_capacity =
            ((self.capacity as f64 * GROW_FACTOR).ceil() as usize).max(self.capacity + 1);
        let mut cells = vec![None; new_capacity * new_capacity];
        for source in 0..self.order {
            for target in 0..self.order {
                cells[source * new_capacity + target] = self.cells[self.cell(source, target)];
            }
        }
        self.capacity = new_capacity;
        self.cells = cells;
    }

    /// Removes the row and column of `node`, whose edges must already be removed, and moves the
    /// last node into its place.
    pub(crate) fn remove_node(&mut self, node: NodeId) {
        let last = self.order - 1;
        let node = node.index();

        if node != last {
            let last_row = (0..self.order)
                .map(|k| self.cells[self.cell(last, k)])
                .collect::<Vec<_>>();
            let last_column = (0..self.order)
                .map(|k| self.cells[self.cell(k, last)])
                .collect::<Vec<_>>();

            for k in (0..self.order).filter(|&k| k != node) {
                let moved_k = if k == last { node } else { k };
                let row_cell = self.cell(node, moved_k);
                self.cells[row_cell] = last_row[k];
                let column_cell = self.cell(moved_k, node);
                self.cells[column_cell] = last_column[k];
            }
        }

        for k in 0..self.order {
            let row_cell = self.cell(last, k);
            self.cells[row_cell] = None;
            let column_cell = self.cell(k, last);
            self.cells[column_cell] = None;
        }
        self.order -= 1;
    }

    /// The edges leaving `source`, by increasing target.
    pub(crate) fn row(&self, source: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        (0..self.order).filter_map(move |target| {
            self.cells[self.cell(source.index(), target)]
                .map(|edge| (NodeId::create_from_index(target), edge))
        })
    }

    /// The edges entering `target`, by increasing source.
    pub(crate) fn column(&self, target: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        (0..self.order).filter_map(move |source| {
            self.cells[self.cell(source, target.index())]
                .map(|edge| (NodeId::create_from_index(source), edge))
        })
    }

    pub(crate) fn transpose(&mut self) {
        for source in 0..self.order {
            for target in (source + 1)..self.order {
                let forward = self.cell(source, target);
                let backward = self.cell(target, source);
                self.cells.swap(forward, backward);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(index: usize) -> NodeId {
        NodeId::create_from_index(index)
    }

    fn edge(index: usize) -> EdgeId {
        EdgeId::create_from_index(index)
    }

    #[test]
    fn grows_by_the_grow_factor_and_keeps_edges() {
        let mut matrix = AdjacencyMatrix::default();
        for _ in 0..INITIAL_CAPACITY {
            matrix.add_node();
        }
        matrix.set(node(3), node(9), Some(edge(0)));

        matrix.add_node();
        assert_eq!(matrix.capacity(), 16);
        assert_eq!(matrix.get(node(3), node(9)), Some(edge(0)));
        assert_eq!(matrix.get(node(10), node(3)), None);
    }

    #[test]
    fn removing_a_node_moves_the_last_one() {
        let mut matrix = AdjacencyMatrix::default();
        for _ in 0..3 {
            matrix.add_node();
        }
        matrix.set(node(2), node(1), Some(edge(0)));
        matrix.set(node(1), node(2), Some(edge(1)));
        matrix.set(node(2), node(2), Some(edge(2)));

        matrix.remove_node(node(0));

        assert_eq!(matrix.get(node(0), node(1)), Some(edge(0)));
        assert_eq!(matrix.get(node(1), node(0)), Some(edge(1)));
        assert_eq!(matrix.get(node(0), node(0)), Some(edge(2)));
        assert_eq!(matrix.get(node(2), node(1)), None);
        assert_eq!(matrix.row(node(0)).count(), 2);
    }

    #[test]
    fn transpose_swaps_directions() {
        let mut matrix = AdjacencyMatrix::default();
        matrix.add_node();
        matrix.add_node();
        matrix.set(node(0), node(1), Some(edge(4)));

        matrix.transpose();

        assert_eq!(matrix.get(node(1), node(0)), Some(edge(4)));
        assert_eq!(matrix.column(node(0)).collect::<Vec<_>>(), vec![(node(1), edge(4))]);
    }
}
