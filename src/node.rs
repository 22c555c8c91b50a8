use serde::{Deserialize, Serialize};
use std::fmt;

/// Node awaiting a split decision while a tree is grown.
///
/// `start_idx..stop_idx` is the node's span of the tree's row index buffer.
#[derive(Debug)]
pub struct SplittableNode {
    pub num: usize,
    pub weight_value: f64,
    pub impurity: f64,
    pub counts_sum: usize,
    pub depth: usize,
    pub start_idx: usize,
    pub stop_idx: usize,
}

/// Best split found for a node.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInfo {
    pub split_feature: usize,
    pub split_value: f64,
    /// Decrease in total squared error.
    pub split_gain: f64,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Node {
    pub num: usize,
    /// Mean target of the rows reaching this node.
    pub weight_value: f64,
    pub counts_sum: usize,
    pub depth: usize,
    pub split_value: f64,
    pub split_feature: usize,
    pub split_gain: f64,
    pub left_child: usize,
    pub right_child: usize,
    pub is_leaf: bool,
}

impl SplittableNode {
    /// Summarise the target values of `index` into a leaf candidate.
    pub fn from_index(num: usize, depth: usize, start_idx: usize, stop_idx: usize, index: &[usize], y: &[f64]) -> Self {
        let n = index.len();
        let (sum, sum_sq) = index
            .iter()
            .fold((0.0, 0.0), |(s, sq), &i| (s + y[i], sq + y[i] * y[i]));
        let weight_value = if n == 0 { 0.0 } else { sum / n as f64 };
        let impurity = if n == 0 {
            0.0
        } else {
            (sum_sq / n as f64 - weight_value * weight_value).max(0.0)
        };
        SplittableNode {
            num,
            weight_value,
            impurity,
            counts_sum: n,
            depth,
            start_idx,
            stop_idx,
        }
    }

    pub fn as_node(&self) -> Node {
        Node {
            num: self.num,
            weight_value: self.weight_value,
            counts_sum: self.counts_sum,
            depth: self.depth,
            split_value: 0.0,
            split_feature: 0,
            split_gain: 0.0,
            left_child: 0,
            right_child: 0,
            is_leaf: true,
        }
    }
}

impl Node {
    /// Turn a leaf into a parent node.
    pub fn make_parent_node(&mut self, split_info: &SplitInfo, left_child: usize, right_child: usize) {
        self.is_leaf = false;
        self.split_value = split_info.split_value;
        self.split_feature = split_info.split_feature;
        self.split_gain = split_info.split_gain;
        self.left_child = left_child;
        self.right_child = right_child;
    }

    /// Get the path that should be traveled down, given a value.
    #[inline]
    pub fn get_child_idx(&self, v: &f64) -> usize {
        if *v <= self.split_value {
            self.left_child
        } else {
            self.right_child
        }
    }
}

impl fmt::Display for Node {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_leaf {
            write!(f, "{}:leaf={},cover={}", self.num, self.weight_value, self.counts_sum)
        } else {
            write!(
                f,
                "{}:[{} <= {}] yes={},no={},gain={},cover={}",
                self.num,
                self.split_feature,
                self.split_value,
                self.left_child,
                self.right_child,
                self.split_gain,
                self.counts_sum
            )
        }
    }
}
