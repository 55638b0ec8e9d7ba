use std::collections::VecDeque;

use crate::containers::KeyedVec;
use crate::graph::EdgeId;

/// The edges which still have to be checked in the current pass of a propagation loop.
///
/// An edge is present at most once; enqueueing an edge which is already present does nothing.
#[derive(Debug, Default, Clone)]
pub(crate) struct EdgeQueue {
    queue: VecDeque<EdgeId>,
    is_enqueued: KeyedVec<EdgeId, bool>,
}

impl EdgeQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn enqueue(&mut self, edge: EdgeId) {
        self.is_enqueued.accommodate(edge, false);
        if !self.is_enqueued[edge] {
            self.is_enqueued[edge] = true;
            self.queue.push_back(edge);
        }
    }

    pub(crate) fn pop(&mut self) -> Option<EdgeId> {
        let edge = self.queue.pop_front()?;
        self.is_enqueued[edge] = false;
        Some(edge)
    }
}

impl FromIterator<EdgeId> for EdgeQueue {
    fn from_iter<T: IntoIterator<Item = EdgeId>>(iter: T) -> Self {
        let mut queue = EdgeQueue::default();
        iter.into_iter().for_each(|edge| queue.enqueue(edge));
        queue
    }
}
