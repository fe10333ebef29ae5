//! Cycle finding in functional graphs.
//!
//! A functional graph gives every node at most one successor. Walking from
//! any node either reaches a node with no successor or revisits a node; in
//! the latter case the path suffix starting at the first revisited node is
//! the unique cycle reachable from the start.

use std::collections::HashMap;
use std::hash::Hash;

/// Walk successors from `start` and return the first cycle reached.
///
/// Returns `None` if the walk reaches a node whose successor is `None`.
/// The cycle is returned in walk order, starting with the node that closed
/// it.
///
/// # Example
///
/// ```
/// use school_choice::engine::cycle::find_cycle;
///
/// // 0 -> 1 -> 2 -> 3 -> 1
/// let next = [1, 2, 3, 1];
/// assert_eq!(find_cycle(0usize, |n| Some(next[n])), Some(vec![1, 2, 3]));
/// ```
pub fn find_cycle<N, F>(start: N, mut successor: F) -> Option<Vec<N>>
where
    N: Copy + Eq + Hash,
    F: FnMut(N) -> Option<N>,
{
    let mut path = Vec::new();
    let mut first_seen: HashMap<N, usize> = HashMap::new();
    let mut node = start;

    loop {
        if let Some(&at) = first_seen.get(&node) {
            return Some(path.split_off(at));
        }
        first_seen.insert(node, path.len());
        path.push(node);
        node = successor(node)?;
    }
}

/// Every distinct cycle reachable from `starts`, in discovery order.
///
/// Nodes already explored by an earlier walk are not walked again, so each
/// cycle is reported once even when many starts lead into it. Walks that end
/// at a node without a successor contribute nothing.
pub fn find_all_cycles<N, I, F>(starts: I, mut successor: F) -> Vec<Vec<N>>
where
    N: Copy + Eq + Hash,
    I: IntoIterator<Item = N>,
    F: FnMut(N) -> Option<N>,
{
    // walk number that first touched each node
    let mut owner: HashMap<N, usize> = HashMap::new();
    let mut cycles = Vec::new();

    for (walk, start) in starts.into_iter().enumerate() {
        let mut path = Vec::new();
        let mut node = Some(start);

        while let Some(current) = node {
            match owner.get(&current) {
                Some(&seen) if seen == walk => {
                    if let Some(at) = path.iter().position(|&n| n == current) {
                        cycles.push(path.split_off(at));
                    }
                    break;
                }
                Some(_) => break,
                None => {
                    owner.insert(current, walk);
                    path.push(current);
                    node = successor(current);
                }
            }
        }
    }

    cycles
}
