//! flexlay: CSS-flexbox box layout over a mutable node tree.
//!
//! The engine computes, for every node in a tree, its measured width and
//! height and its (x, y) position relative to its parent, from per-node
//! style attributes (flex direction, wrap, justify/align, grow/shrink/basis,
//! min/max dimensions, padding/border/margin, position offsets, overflow,
//! position type) and the available dimensions handed to
//! [`FlexTree::compute_layout`].
//!
//! Layout is incremental: style and structure mutations mark the affected
//! nodes (and their ancestors) dirty, and each node carries a small cache of
//! prior measurements so repeated layouts only revisit what changed.
//!
//! # Example
//!
//! ```
//! use flexlay::{Direction, FlexTree, FlexDirection, UNDEFINED};
//!
//! let mut tree = FlexTree::new();
//! let root = tree.new_node();
//! tree.set_flex_direction(root, FlexDirection::Row);
//! tree.set_width(root, 300.0);
//! tree.set_height(root, 100.0);
//!
//! let child = tree.new_node();
//! tree.set_flex_grow(child, 1.0);
//! tree.set_flex_basis(child, 0.0);
//! tree.add_child(root, child);
//!
//! tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
//! assert_eq!(tree.layout(child).width(), 300.0);
//! assert_eq!(tree.layout(child).height(), 100.0);
//! ```
//!
//! # Undefined values
//!
//! Unset numeric inputs are represented by a quiet NaN sentinel,
//! [`UNDEFINED`]. Use [`is_undefined`]/[`is_defined`] to test values read
//! back from the tree; raw `==` comparisons on the sentinel are always
//! false.

pub mod geometry;
pub mod layout;
pub mod print;
pub mod style;
pub mod tree;

pub use geometry::Size;
pub use print::{Logger, PrintOptions};
pub use style::{
  approx_eq, is_defined, is_undefined, Align, DimensionIndex, Direction, Edge, EdgeValues,
  FlexDirection, FlexWrap, Justify, MeasureMode, Overflow, PositionType, Style, UNDEFINED,
};
pub use tree::node::{Layout, MeasureFunc, NodeId, PrintFunc};
pub use tree::FlexTree;
