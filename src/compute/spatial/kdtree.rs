//! Static 2-D KD-tree for nearest-neighbor queries.
//!
//! The tree alternates its split axis by depth: nodes at even depth split on
//! `x`, nodes at odd depth split on `y`. A point whose split coordinate is
//! strictly less than the node's goes to the left subtree; everything else,
//! ties included, goes right.
//!
//! ## Construction
//!
//! Points are inserted one by one in the order given and the tree is never
//! rebalanced. Insertion order changes the shape but never the answers.
//! Feeding points sorted along one axis produces a linear-depth tree and
//! degrades queries to a linear scan; callers with sorted input should
//! shuffle it first.
//!
//! ## Query
//!
//! [`KdTree::nearest`] descends into the subtree on the query's side of each
//! split first and only visits the other side when the squared distance from
//! the query to the splitting line is strictly less than the best squared
//! distance found so far. That perpendicular distance lower-bounds the
//! distance to every point across the line, so skipping the far side never
//! loses the true nearest point. Equidistant points are resolved by
//! traversal order.
//!
//! Both insertion and search walk the tree with an explicit stack, so a
//! degenerate tree costs time but not call-stack depth.
//!
//! ```rust
//! use geonav::compute::spatial::KdTree;
//! use geo::Point;
//!
//! let tree = KdTree::new(vec![
//!     Point::new(2.0, 3.0),
//!     Point::new(4.0, 2.0),
//!     Point::new(4.0, 5.0),
//!     Point::new(1.0, 5.0),
//! ])?;
//!
//! assert_eq!(tree.nearest(0.0, 7.0), Point::new(1.0, 5.0));
//! # Ok::<(), geonav::GeoNavError>(())
//! ```

use super::{Neighbor, PointSet, squared_distance};
use crate::compute::validation::validate_finite_point;
use crate::error::{GeoNavError, Result};
use geo::Point;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn for_depth(depth: usize) -> Self {
        if depth % 2 == 0 { Axis::X } else { Axis::Y }
    }

    #[inline]
    fn coord(self, point: &Point) -> f64 {
        match self {
            Axis::X => point.x(),
            Axis::Y => point.y(),
        }
    }
}

struct Node<T> {
    point: Point,
    value: T,
    left: Option<Box<Node<T>>>,
    right: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn leaf(point: Point, value: T) -> Box<Self> {
        Box::new(Self {
            point,
            value,
            left: None,
            right: None,
        })
    }
}

/// A KD-tree over 2-D points, each carrying a value of type `T`.
///
/// Immutable after construction; share it across threads freely when `T` is
/// `Sync`.
pub struct KdTree<T = ()> {
    root: Box<Node<T>>,
    len: usize,
}

impl<T> fmt::Debug for KdTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdTree")
            .field("len", &self.len)
            .field("depth", &self.depth())
            .finish()
    }
}

impl<T> Drop for KdTree<T> {
    // Unlinks nodes one at a time; the default recursive drop would follow
    // the full height of a degenerate tree.
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node<T>>> = Vec::new();
        stack.extend(self.root.left.take());
        stack.extend(self.root.right.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl KdTree<()> {
    /// Build a tree over bare points.
    ///
    /// # Errors
    ///
    /// [`GeoNavError::InvalidInput`] if `points` is empty or contains a
    /// non-finite coordinate.
    pub fn new<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        Self::from_entries(points.into_iter().map(|p| (p, ())))
    }
}

impl<T> KdTree<T> {
    /// Build a tree over `(point, value)` entries, inserted in iteration order.
    ///
    /// # Errors
    ///
    /// [`GeoNavError::InvalidInput`] if `entries` is empty or contains a
    /// non-finite coordinate.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Point, T)>,
    {
        let mut entries = entries.into_iter();
        let (point, value) = entries.next().ok_or_else(|| {
            GeoNavError::InvalidInput("KD-tree requires at least one point".into())
        })?;
        validate_finite_point(&point).inspect_err(|_| {
            log::warn!("Rejecting KD-tree point with non-finite coordinates");
        })?;

        let mut tree = Self {
            root: Node::leaf(point, value),
            len: 1,
        };

        for (idx, (point, value)) in entries.enumerate() {
            validate_finite_point(&point).map_err(|e| {
                log::warn!("Rejecting KD-tree point with non-finite coordinates");
                GeoNavError::InvalidInput(format!("Point at index {}: {}", idx + 1, e))
            })?;
            tree.insert(point, value);
        }

        Ok(tree)
    }

    fn insert(&mut self, point: Point, value: T) {
        let mut node = &mut self.root;
        let mut depth = 0;
        loop {
            let axis = Axis::for_depth(depth);
            let child = if axis.coord(&point) < axis.coord(&node.point) {
                &mut node.left
            } else {
                &mut node.right
            };

            match child {
                Some(next) => {
                    node = next;
                    depth += 1;
                }
                None => {
                    *child = Some(Node::leaf(point, value));
                    self.len += 1;
                    return;
                }
            }
        }
    }

    /// Number of stored points.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: an empty tree cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Height of the tree; a single point has depth 1.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root.as_ref(), 1usize)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in [&node.left, &node.right].into_iter().flatten() {
                stack.push((child.as_ref(), depth + 1));
            }
        }
        max_depth
    }

    /// The stored point closest to `(x, y)`.
    pub fn nearest(&self, x: f64, y: f64) -> Point {
        *self.nearest_entry(x, y).point
    }

    /// The stored entry closest to `(x, y)`, with its value and distance.
    pub fn nearest_entry(&self, x: f64, y: f64) -> Neighbor<'_, T> {
        let goal = Point::new(x, y);
        let mut best: &Node<T> = self.root.as_ref();
        let mut best_sq = squared_distance(&best.point, &goal);

        // Each frame carries the lower bound on the squared distance to
        // anything in its subtree; frames are re-checked when popped because
        // `best_sq` may have shrunk since they were pushed.
        let mut stack: Vec<(&Node<T>, usize, f64)> = vec![(self.root.as_ref(), 0, 0.0)];
        while let Some((node, depth, bound_sq)) = stack.pop() {
            if bound_sq >= best_sq {
                continue;
            }

            let dist_sq = squared_distance(&node.point, &goal);
            if dist_sq < best_sq {
                best = node;
                best_sq = dist_sq;
            }

            let axis = Axis::for_depth(depth);
            let offset = axis.coord(&goal) - axis.coord(&node.point);
            let (good_side, bad_side) = if offset < 0.0 {
                (&node.left, &node.right)
            } else {
                (&node.right, &node.left)
            };

            // Pushed first so the same-side subtree is explored first.
            if let Some(bad) = bad_side {
                stack.push((bad.as_ref(), depth + 1, offset * offset));
            }
            if let Some(good) = good_side {
                stack.push((good.as_ref(), depth + 1, bound_sq));
            }
        }

        Neighbor {
            point: &best.point,
            value: &best.value,
            distance: best_sq.sqrt(),
        }
    }

    /// Iterate over all stored `(point, value)` entries in pre-order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: vec![self.root.as_ref()],
        }
    }
}

impl<T> PointSet for KdTree<T> {
    type Value = T;

    fn nearest_entry(&self, x: f64, y: f64) -> Neighbor<'_, T> {
        KdTree::nearest_entry(self, x, y)
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Pre-order iterator over a [`KdTree`].
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a Point, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(right) = &node.right {
            self.stack.push(right);
        }
        if let Some(left) = &node.left {
            self.stack.push(left);
        }
        Some((&node.point, &node.value))
    }
}

impl<'a, T> IntoIterator for &'a KdTree<T> {
    type Item = (&'a Point, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
