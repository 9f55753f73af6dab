//! Single-pass rollup over an id-indexed arena.

use std::collections::HashMap;

use costline_shared::types::WbsNodeId;

use super::types::{RollupNode, RollupRow, SelfTotals};
use crate::wbs::compare_codes;

/// Aggregates self totals up the WBS tree.
pub struct RollupEngine;

impl RollupEngine {
    /// Produces one row per node, ordered by natural code order.
    ///
    /// A node's rollup is its own totals plus those of every node reachable
    /// through child links. Nodes whose parent is missing are treated as
    /// roots. Nodes absent from `self_totals` have zero self totals.
    #[must_use]
    pub fn roll_up(
        nodes: &[RollupNode],
        self_totals: &HashMap<WbsNodeId, SelfTotals>,
    ) -> Vec<RollupRow> {
        let index: HashMap<WbsNodeId, usize> = nodes
            .iter()
            .enumerate()
            .rev()
            .map(|(i, node)| (node.id, i))
            .collect();

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut roots = Vec::new();
        for (i, node) in nodes.iter().enumerate() {
            match node.parent_id.and_then(|parent| index.get(&parent)) {
                Some(&parent) if parent != i => children[parent].push(i),
                _ => roots.push(i),
            }
        }

        let own: Vec<SelfTotals> = nodes
            .iter()
            .map(|node| self_totals.get(&node.id).copied().unwrap_or_default())
            .collect();
        let mut rolled = own.clone();
        let mut visited = vec![false; nodes.len()];

        // Roots first; anything still unvisited afterwards sits on a parent
        // cycle and is entered from an arbitrary member.
        let entry_points = roots.into_iter().chain(0..nodes.len());
        for entry in entry_points {
            if visited[entry] {
                continue;
            }
            Self::accumulate(entry, &children, &own, &mut rolled, &mut visited);
        }

        let mut rows: Vec<RollupRow> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| RollupRow {
                id: node.id,
                parent_id: node.parent_id,
                code: node.code.clone(),
                description: node.description.clone(),
                total_cost_budgeted: node.total_cost,
                total_paid_self: own[i].paid,
                total_committed_self: own[i].committed,
                total_paid_rollup: rolled[i].paid,
                total_committed_rollup: rolled[i].committed,
            })
            .collect();

        rows.sort_by(|a, b| compare_codes(&a.code, &b.code).then_with(|| a.id.cmp(&b.id)));
        rows
    }

    /// Iterative post-order walk from `entry`, summing each subtree into `rolled`.
    fn accumulate(
        entry: usize,
        children: &[Vec<usize>],
        own: &[SelfTotals],
        rolled: &mut [SelfTotals],
        visited: &mut [bool],
    ) {
        let mut tree_children: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut stack = vec![(entry, false)];
        visited[entry] = true;

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                let subtree = tree_children
                    .remove(&node)
                    .unwrap_or_default()
                    .into_iter()
                    .fold(own[node], |acc, child| acc + rolled[child]);
                rolled[node] = subtree;
                continue;
            }

            stack.push((node, true));
            for &child in &children[node] {
                if !visited[child] {
                    visited[child] = true;
                    tree_children.entry(node).or_default().push(child);
                    stack.push((child, false));
                }
            }
        }
    }
}
