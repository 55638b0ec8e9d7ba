//! A heap where the keys range over `[0, ..., n - 1]` which can be queried for the key with the
//! minimum value. The value of a key which is in the heap can be decreased; this is what the
//! Dijkstra-style propagations of the checkers need.

use super::KeyedVec;
use super::StorageKey;
use crate::tnu_asserts::tnu_assert_extreme;
use crate::tnu_asserts::tnu_assert_moderate;

/// A min-heap over generalised `Key`s (required to implement [`StorageKey`]) and ordered `Value`s.
#[derive(Debug, Clone)]
pub(crate) struct MinPriorityQueue<Key, Value> {
    /// Contains the values stored as a heap.
    values: Vec<Value>,
    /// `map_position_to_key[i]` is the key of the value at position `i` of
    /// [`MinPriorityQueue::values`].
    map_position_to_key: Vec<Key>,
    /// The position of a key in [`MinPriorityQueue::values`], if it is currently in the heap.
    map_key_to_position: KeyedVec<Key, Option<usize>>,
}

impl<Key, Value> Default for MinPriorityQueue<Key, Value> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            map_position_to_key: Vec::new(),
            map_key_to_position: KeyedVec::default(),
        }
    }
}

impl<Key, Value> MinPriorityQueue<Key, Value>
where
    Key: StorageKey + Copy,
    Value: Ord + Copy,
{
    /// Inserts `key` with `value`, or lowers the value of `key` if it is already present with a
    /// larger value.
    ///
    /// Returns `true` if the heap changed.
    pub(crate) fn insert_or_decrease(&mut self, key: Key, value: Value) -> bool {
        match self.position(key) {
            Some(position) => {
                if value >= self.values[position] {
                    return false;
                }
                self.values[position] = value;
                self.sift_up(position);
            }
            None => {
                let position = self.values.len();
                self.values.push(value);
                self.map_position_to_key.push(key);
                self.map_key_to_position.accommodate(key, None);
                self.map_key_to_position[key] = Some(position);
                self.sift_up(position);
            }
        }
        tnu_assert_extreme!(self.is_heap());
        true
    }

    /// Deletes the key with the minimum value from the heap and returns it together with its value.
    ///
    /// The time-complexity of this operation is O(logn).
    pub(crate) fn pop_min(&mut self) -> Option<(Key, Value)> {
        if self.values.is_empty() {
            return None;
        }

        let last_position = self.values.len() - 1;
        self.swap_positions(0, last_position);

        let value = self.values.pop()?;
        let key = self.map_position_to_key.pop()?;
        self.map_key_to_position[key] = None;

        if !self.values.is_empty() {
            self.sift_down(0);
        }
        tnu_assert_extreme!(self.is_heap());

        Some((key, value))
    }

    fn position(&self, key: Key) -> Option<usize> {
        self.map_key_to_position.get(key).copied().flatten()
    }

    fn swap_positions(&mut self, a: usize, b: usize) {
        let key_a = self.map_position_to_key[a];
        let key_b = self.map_position_to_key[b];

        self.values.swap(a, b);
        self.map_position_to_key.swap(a, b);
        self.map_key_to_position[key_a] = Some(b);
        self.map_key_to_position[key_b] = Some(a);

        tnu_assert_moderate!(
            self.map_key_to_position[key_a] == Some(b) && self.map_key_to_position[key_b] == Some(a)
        );
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent_position = (position - 1) / 2;
            if self.values[parent_position] <= self.values[position] {
                break;
            }
            self.swap_positions(parent_position, position);
            position = parent_position;
        }
    }

    fn sift_down(&mut self, mut position: usize) {
        loop {
            let left_child_position = 2 * position + 1;
            let right_child_position = 2 * position + 2;

            let mut smallest = position;
            if left_child_position < self.values.len()
                && self.values[left_child_position] < self.values[smallest]
            {
                smallest = left_child_position;
            }
            if right_child_position < self.values.len()
                && self.values[right_child_position] < self.values[smallest]
            {
                smallest = right_child_position;
            }

            if smallest == position {
                break;
            }
            self.swap_positions(smallest, position);
            position = smallest;
        }
    }

    fn is_heap(&self) -> bool {
        (1..self.values.len()).all(|position| self.values[(position - 1) / 2] <= self.values[position])
    }
}
