use crate::constants::IMPURITY_EPS;
use crate::data::Matrix;
use crate::node::{Node, SplitInfo, SplittableNode};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Growth limits shared by every tree of a forest.
#[derive(Clone, Copy, Debug)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

/// CART regression tree grown on squared error.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub depth: usize,
    pub n_leaves: usize,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Tree {
            nodes: Vec::new(),
            depth: 0,
            n_leaves: 0,
        }
    }

    /// Grow the tree depth first.
    ///
    /// * `data` - Feature matrix.
    /// * `y` - Target, aligned with the rows of `data`.
    /// * `index` - Rows to fit on, repeated rows count once per occurrence.
    /// * `params` - Growth limits.
    /// * `rng` - Source for the order in which features are visited, which only
    ///   matters to break ties between equally good splits.
    pub fn fit(&mut self, data: &Matrix<f64>, y: &[f64], mut index: Vec<usize>, params: &TreeParams, rng: &mut StdRng) {
        self.nodes.clear();
        self.depth = 0;
        self.n_leaves = 1;

        let root = SplittableNode::from_index(0, 0, 0, index.len(), &index, y);
        self.nodes.push(root.as_node());

        let mut features: Vec<usize> = (0..data.cols).collect();
        let mut growable = vec![root];
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(index.len());

        while let Some(node) = growable.pop() {
            self.depth = self.depth.max(node.depth);
            let depth_reached = params.max_depth.is_some_and(|d| node.depth >= d);
            if depth_reached
                || node.counts_sum < params.min_samples_split
                || node.counts_sum < 2 * params.min_samples_leaf
                || node.impurity <= IMPURITY_EPS
            {
                continue;
            }

            features.shuffle(rng);
            let node_index = &index[node.start_idx..node.stop_idx];
            let split_info = match best_split(data, y, node_index, &features, params.min_samples_leaf, &mut pairs) {
                Some(info) => info,
                None => continue,
            };

            // Rows going left first, keeping their relative order.
            let (left, right): (Vec<usize>, Vec<usize>) = node_index
                .iter()
                .partition(|&&i| *data.get(i, split_info.split_feature) <= split_info.split_value);
            let mid = node.start_idx + left.len();
            index[node.start_idx..mid].copy_from_slice(&left);
            index[mid..node.stop_idx].copy_from_slice(&right);

            let left_num = self.nodes.len();
            let right_num = left_num + 1;
            let left_node = SplittableNode::from_index(left_num, node.depth + 1, node.start_idx, mid, &left, y);
            let right_node = SplittableNode::from_index(right_num, node.depth + 1, mid, node.stop_idx, &right, y);
            self.nodes[node.num].make_parent_node(&split_info, left_num, right_num);
            self.nodes.push(left_node.as_node());
            self.nodes.push(right_node.as_node());
            self.n_leaves += 1;

            // Right first so the left subtree is grown next.
            growable.push(right_node);
            growable.push(left_node);
        }
    }

    /// Follow one row down to its leaf.
    pub fn predict_row(&self, data: &Matrix<f64>, row: usize) -> f64 {
        let mut node_idx = 0;
        loop {
            let node = &self.nodes[node_idx];
            if node.is_leaf {
                return node.weight_value;
            }
            node_idx = node.get_child_idx(data.get(row, node.split_feature));
        }
    }

    pub fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Vec<f64> {
        if parallel {
            data.index.par_iter().map(|i| self.predict_row(data, *i)).collect()
        } else {
            data.index.iter().map(|i| self.predict_row(data, *i)).collect()
        }
    }
}

/// Find the threshold with the largest decrease in squared error.
///
/// Features are visited in the given order and a later feature only wins when
/// strictly better. Returns `None` when every feature is constant on `index` or
/// no position satisfies `min_samples_leaf`.
fn best_split(
    data: &Matrix<f64>,
    y: &[f64],
    index: &[usize],
    features: &[usize],
    min_samples_leaf: usize,
    pairs: &mut Vec<(f64, f64)>,
) -> Option<SplitInfo> {
    let n = index.len();
    let total_sum: f64 = index.iter().map(|&i| y[i]).sum();
    let parent_proxy = total_sum * total_sum / n as f64;

    let mut best: Option<SplitInfo> = None;
    let mut best_proxy = f64::NEG_INFINITY;

    for &feature in features {
        pairs.clear();
        pairs.extend(index.iter().map(|&i| (*data.get(i, feature), y[i])));
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        if pairs[0].0 == pairs[n - 1].0 {
            continue;
        }

        let mut left_sum = 0.0;
        for k in 0..n - 1 {
            left_sum += pairs[k].1;
            let (lo, hi) = (pairs[k].0, pairs[k + 1].0);
            if lo == hi {
                continue;
            }
            let n_left = k + 1;
            let n_right = n - n_left;
            if n_left < min_samples_leaf || n_right < min_samples_leaf {
                continue;
            }
            let right_sum = total_sum - left_sum;
            // Maximising this is equivalent to minimising the children's squared error.
            let proxy = left_sum * left_sum / n_left as f64 + right_sum * right_sum / n_right as f64;
            if proxy > best_proxy {
                best_proxy = proxy;
                let mut threshold = lo / 2.0 + hi / 2.0;
                if threshold == hi || !threshold.is_finite() {
                    threshold = lo;
                }
                best = Some(SplitInfo {
                    split_feature: feature,
                    split_value: threshold,
                    split_gain: proxy - parent_proxy,
                });
            }
        }
    }
    best
}

impl Display for Tree {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut print_buffer: Vec<usize> = vec![0];
        let mut r = String::new();
        while let Some(idx) = print_buffer.pop() {
            let Some(node) = self.nodes.get(idx) else {
                continue;
            };
            r += format!("{}{}\n", "      ".repeat(node.depth).as_str(), node).as_str();
            if !node.is_leaf {
                print_buffer.push(node.right_child);
                print_buffer.push(node.left_child);
            }
        }
        write!(f, "{}", r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn params() -> TreeParams {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }

    #[test]
    fn test_tree_fits_step_function() {
        // Column 0 drives the target, column 1 is noise-free but irrelevant.
        let x0 = vec![1., 2., 3., 4., 5., 6.];
        let x1 = vec![0., 0., 0., 0., 0., 0.];
        let y = vec![10., 10., 10., 20., 20., 20.];
        let data_vec: Vec<f64> = x0.into_iter().chain(x1).collect();
        let data = Matrix::new(&data_vec, 6, 2);

        let mut tree = Tree::new();
        tree.fit(&data, &y, data.index.clone(), &params(), &mut StdRng::seed_from_u64(0));

        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.n_leaves, 2);
        assert_eq!(tree.depth, 1);
        assert_eq!(tree.nodes[0].split_feature, 0);
        assert_eq!(tree.nodes[0].split_value, 3.5);
        assert_eq!(tree.predict(&data, false), y);
        assert_eq!(tree.predict(&data, true), y);

        let printed = format!("{}", tree);
        assert_eq!(printed.lines().count(), 3);
        assert!(printed.starts_with("0:[0 <= 3.5]"));
    }

    #[test]
    fn test_tree_respects_max_depth() {
        let data_vec: Vec<f64> = (0..16).map(|v| v as f64).collect();
        let y: Vec<f64> = (0..16).map(|v| (v * v) as f64).collect();
        let data = Matrix::new(&data_vec, 16, 1);
        let mut p = params();
        p.max_depth = Some(2);

        let mut tree = Tree::new();
        tree.fit(&data, &y, data.index.clone(), &p, &mut StdRng::seed_from_u64(1));
        assert_eq!(tree.depth, 2);
        assert_eq!(tree.n_leaves, 4);
        assert_eq!(tree.nodes.iter().filter(|n| n.is_leaf).count(), 4);
    }

    #[test]
    fn test_tree_constant_target_is_single_leaf() {
        let data_vec = vec![1., 2., 3.];
        let y = vec![5., 5., 5.];
        let data = Matrix::new(&data_vec, 3, 1);
        let mut tree = Tree::new();
        tree.fit(&data, &y, data.index.clone(), &params(), &mut StdRng::seed_from_u64(0));
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.predict_row(&data, 2), 5.);
    }

    #[test]
    fn test_tree_repeated_rows() {
        let data_vec = vec![0., 1.];
        let y = vec![0., 3.];
        let data = Matrix::new(&data_vec, 2, 1);
        let mut tree = Tree::new();
        tree.fit(&data, &y, vec![0, 0, 0, 1], &params(), &mut StdRng::seed_from_u64(0));
        assert_eq!(tree.nodes[0].counts_sum, 4);
        assert_eq!(tree.nodes[0].weight_value, 0.75);
        assert_eq!(tree.predict(&data, false), vec![0., 3.]);
    }
}
