//! Keyed list diffing for the rendered product list.
//!
//! [`diff`] compares a previous and next sequence, both deduplicated by key,
//! and yields an [`EditScript`] with batch semantics:
//!
//! - `Remove` indices refer to the previous sequence.
//! - `Insert` and `Refresh` indices refer to the next sequence.
//! - `Move { from, to }` takes the item at `from` in the previous sequence and
//!   places it at `to` in the next sequence.
//!
//! Items untouched by the script keep their relative order and fill the
//! remaining positions. Moves are minimal: every common item outside the
//! longest run of items already in relative order gets exactly one move.
//! Inputs are never mutated.

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use thiserror::Error;

use super::{Product, ProductId};

/// Items with a stable identity.
pub trait Keyed {
    /// Identity type.
    type Key: Eq + Hash + Clone + fmt::Debug;

    /// Identity of this item.
    fn key(&self) -> &Self::Key;
}

impl Keyed for Product {
    type Key = ProductId;

    fn key(&self) -> &ProductId {
        &self.id
    }
}

/// One step of an [`EditScript`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp<T> {
    /// Remove the item at `index` of the previous sequence.
    Remove {
        /// Position in the previous sequence.
        index: usize,
    },
    /// Insert `item` so that it ends up at `index` of the next sequence.
    Insert {
        /// Position in the next sequence.
        index: usize,
        /// Inserted item.
        item: T,
    },
    /// Move an item from `from` (previous) to `to` (next).
    Move {
        /// Position in the previous sequence.
        from: usize,
        /// Position in the next sequence.
        to: usize,
    },
    /// Redraw the item at `index` of the next sequence with new content.
    Refresh {
        /// Position in the next sequence.
        index: usize,
        /// Updated item.
        item: T,
    },
}

impl<T> EditOp<T> {
    /// Whether the op changes positions rather than content.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Refresh { .. })
    }
}

/// Ordered edit operations transforming one keyed sequence into another.
///
/// Operations are grouped as removals (descending), moves, insertions
/// (ascending) and refreshes (ascending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditScript<T> {
    ops: Vec<EditOp<T>>,
}

impl<T> Default for EditScript<T> {
    fn default() -> Self {
        Self { ops: Vec::new() }
    }
}

impl<T> EditScript<T> {
    /// Operations in application order.
    pub fn ops(&self) -> &[EditOp<T>] {
        &self.ops
    }

    /// Whether applying the script changes nothing.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether any op changes positions.
    pub fn has_structural_changes(&self) -> bool {
        self.ops.iter().any(EditOp::is_structural)
    }

    /// Whether any op refreshes content.
    pub fn has_content_changes(&self) -> bool {
        self.ops.iter().any(|op| !op.is_structural())
    }
}

impl<'a, T> IntoIterator for &'a EditScript<T> {
    type Item = &'a EditOp<T>;
    type IntoIter = std::slice::Iter<'a, EditOp<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// Errors raised when a script does not fit the model it is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// An op referenced a position outside the sequence.
    #[error("edit index {index} out of bounds for length {len}")]
    OutOfBounds {
        /// Offending index.
        index: usize,
        /// Length of the indexed sequence.
        len: usize,
    },
    /// Two ops targeted the same position of the next sequence.
    #[error("edit script targets position {index} twice")]
    Conflict {
        /// Contested position.
        index: usize,
    },
    /// Two ops consumed the same item of the previous sequence.
    #[error("edit script consumes previous position {index} twice")]
    DoubleConsume {
        /// Contested position.
        index: usize,
    },
}

/// Structural and content changes between `previous` and `next`.
pub fn diff<T>(previous: &[T], next: &[T]) -> EditScript<T>
where
    T: Keyed + Clone + PartialEq,
{
    let mut script = structural_diff(previous, next);
    script.ops.extend(content_changes(previous, next));
    script
}

/// Removals, moves and insertions only.
pub fn structural_diff<T>(previous: &[T], next: &[T]) -> EditScript<T>
where
    T: Keyed + Clone,
{
    let old_positions = positions(previous);
    let new_positions = positions(next);

    let mut ops = Vec::new();

    for (index, item) in previous.iter().enumerate().rev() {
        if !new_positions.contains_key(item.key()) {
            ops.push(EditOp::Remove { index });
        }
    }

    // Old positions of common items, in next order.
    let common: Vec<(usize, usize)> = next
        .iter()
        .enumerate()
        .filter_map(|(to, item)| old_positions.get(item.key()).map(|&from| (from, to)))
        .collect();
    let froms: Vec<usize> = common.iter().map(|&(from, _)| from).collect();
    let stable = longest_increasing_run(&froms);
    for (position, &(from, to)) in common.iter().enumerate() {
        if !stable.contains(&position) {
            ops.push(EditOp::Move { from, to });
        }
    }

    for (index, item) in next.iter().enumerate() {
        if !old_positions.contains_key(item.key()) {
            ops.push(EditOp::Insert {
                index,
                item: item.clone(),
            });
        }
    }

    EditScript { ops }
}

/// Refresh ops for common items whose content differs.
pub fn content_changes<T>(previous: &[T], next: &[T]) -> Vec<EditOp<T>>
where
    T: Keyed + Clone + PartialEq,
{
    let old_items: HashMap<&T::Key, &T> = previous.iter().map(|item| (item.key(), item)).collect();
    next.iter()
        .enumerate()
        .filter(|(_, item)| {
            old_items
                .get(item.key())
                .is_some_and(|old| *old != *item)
        })
        .map(|(index, item)| EditOp::Refresh {
            index,
            item: item.clone(),
        })
        .collect()
}

/// Apply `script` to `model`, replacing its contents with the result.
///
/// # Errors
///
/// Returns an [`ApplyError`] and leaves `model` untouched when the script
/// does not fit.
pub fn apply<T>(model: &mut Vec<T>, script: &EditScript<T>) -> Result<(), ApplyError>
where
    T: Clone,
{
    let old_len = model.len();
    let mut consumed = vec![false; old_len];
    let mut removals = 0_usize;
    let mut insertions = 0_usize;

    for op in script {
        match op {
            EditOp::Remove { index } | EditOp::Move { from: index, .. } => {
                let slot = consumed.get_mut(*index).ok_or(ApplyError::OutOfBounds {
                    index: *index,
                    len: old_len,
                })?;
                if *slot {
                    return Err(ApplyError::DoubleConsume { index: *index });
                }
                *slot = true;
                if matches!(op, EditOp::Remove { .. }) {
                    removals += 1;
                }
            }
            EditOp::Insert { .. } => insertions += 1,
            EditOp::Refresh { .. } => {}
        }
    }

    let new_len = old_len - removals + insertions;
    let mut slots: Vec<Option<T>> = vec![None; new_len];
    for op in script {
        let (index, item) = match op {
            EditOp::Insert { index, item } => (*index, item.clone()),
            EditOp::Move { from, to } => (*to, model[*from].clone()),
            EditOp::Remove { .. } | EditOp::Refresh { .. } => continue,
        };
        let slot = slots.get_mut(index).ok_or(ApplyError::OutOfBounds {
            index,
            len: new_len,
        })?;
        if slot.is_some() {
            return Err(ApplyError::Conflict { index });
        }
        *slot = Some(item);
    }

    let mut stable = model
        .iter()
        .zip(consumed.iter())
        .filter(|(_, consumed)| !**consumed)
        .map(|(item, _)| item.clone());
    for slot in slots.iter_mut().filter(|slot| slot.is_none()) {
        *slot = stable.next();
    }

    for op in script {
        if let EditOp::Refresh { index, item } = op {
            let slot = slots.get_mut(*index).ok_or(ApplyError::OutOfBounds {
                index: *index,
                len: new_len,
            })?;
            *slot = Some(item.clone());
        }
    }

    *model = slots.into_iter().flatten().collect();
    Ok(())
}

/// Keep the first occurrence of every key, preserving order.
pub fn dedup_by_key<T>(items: &[T]) -> Vec<T>
where
    T: Keyed + Clone,
{
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.key().clone()))
        .cloned()
        .collect()
}

fn positions<T: Keyed>(items: &[T]) -> HashMap<&T::Key, usize> {
    let mut map = HashMap::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        map.entry(item.key()).or_insert(index);
    }
    map
}

/// Positions (into `values`) of one longest strictly increasing subsequence.
fn longest_increasing_run(values: &[usize]) -> HashSet<usize> {
    // tails[k]: position of the smallest tail of an increasing run of length k + 1.
    let mut tails: Vec<usize> = Vec::new();
    let mut predecessor: Vec<Option<usize>> = vec![None; values.len()];

    for (position, &value) in values.iter().enumerate() {
        let length = tails.partition_point(|&tail| values[tail] < value);
        if length > 0 {
            predecessor[position] = Some(tails[length - 1]);
        }
        if length == tails.len() {
            tails.push(position);
        } else {
            tails[length] = position;
        }
    }

    let mut run = HashSet::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(position) = cursor {
        run.insert(position);
        cursor = predecessor[position];
    }
    run
}

#[cfg(test)]
#[path = "list_diff_tests.rs"]
mod tests;
