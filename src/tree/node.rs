//! Node types: NodeId, NodeData, Layout, callback signatures.

use slotmap::new_key_type;
use smallvec::SmallVec;
use std::fmt;

use crate::geometry::Size;
use crate::style::{Direction, Edge, MeasureMode, Style, UNDEFINED};
use crate::tree::cache::MeasurementCache;

new_key_type! {
  /// Unique identifier for a layout node. Copy, lightweight (u64).
  ///
  /// Ids are arena keys: using an id after freeing its node panics.
  pub struct NodeId;
}

/// Content measurement callback.
///
/// Called only on childless nodes that registered one, with the inner
/// (content-box) available width/height and their measure modes. The closure
/// owns whatever context it needs; it must return non-negative finite floats
/// and must not touch the tree it is measuring for.
pub type MeasureFunc = Box<dyn FnMut(f32, MeasureMode, f32, MeasureMode) -> Size>;

/// Per-node hook for the pretty-printer; the returned text is spliced into
/// the node's printed record.
pub type PrintFunc = Box<dyn Fn() -> String>;

/// Computed layout output for one node.
///
/// Positions are relative to the parent. `measured_dimensions` is the
/// authoritative output of every sizing pass; `dimensions` is promoted from
/// it only when a full layout (not a mere measurement) runs.
#[derive(Debug, Clone)]
pub struct Layout {
  pub(crate) position: [f32; 4],
  pub(crate) dimensions: [f32; 2],
  pub(crate) direction: Direction,
  pub(crate) computed_flex_basis: f32,
  pub(crate) generation: u32,
  pub(crate) last_parent_direction: Option<Direction>,
  pub(crate) measured_dimensions: [f32; 2],
  pub(crate) cache: MeasurementCache,
}

impl Layout {
  pub(crate) fn new() -> Self {
    Self {
      position: [0.0; 4],
      dimensions: [UNDEFINED; 2],
      direction: Direction::Inherit,
      computed_flex_basis: UNDEFINED,
      generation: 0,
      last_parent_direction: None,
      measured_dimensions: [UNDEFINED; 2],
      cache: MeasurementCache::new(),
    }
  }

  /// Offset from the parent's left edge.
  pub fn left(&self) -> f32 {
    self.position[Edge::Left as usize]
  }

  /// Offset from the parent's top edge.
  pub fn top(&self) -> f32 {
    self.position[Edge::Top as usize]
  }

  /// Offset recorded for the right edge (filled in for reverse axes).
  pub fn right(&self) -> f32 {
    self.position[Edge::Right as usize]
  }

  /// Offset recorded for the bottom edge (filled in for reverse axes).
  pub fn bottom(&self) -> f32 {
    self.position[Edge::Bottom as usize]
  }

  /// Final width, valid after a full layout pass.
  pub fn width(&self) -> f32 {
    self.dimensions[0]
  }

  /// Final height, valid after a full layout pass.
  pub fn height(&self) -> f32 {
    self.dimensions[1]
  }

  /// Width as of the most recent sizing pass.
  pub fn measured_width(&self) -> f32 {
    self.measured_dimensions[0]
  }

  /// Height as of the most recent sizing pass.
  pub fn measured_height(&self) -> f32 {
    self.measured_dimensions[1]
  }

  /// The writing direction this node resolved to.
  pub fn direction(&self) -> Direction {
    self.direction
  }
}

/// Everything stored for a single node in the arena.
pub struct NodeData {
  pub(crate) style: Style,
  pub(crate) layout: Layout,
  pub(crate) parent: Option<NodeId>,
  pub(crate) children: SmallVec<[NodeId; 4]>,
  pub(crate) line_index: u32,
  pub(crate) has_new_layout: bool,
  pub(crate) is_text: bool,
  pub(crate) is_dirty: bool,
  pub(crate) measure: Option<MeasureFunc>,
  pub(crate) print: Option<PrintFunc>,
}

impl NodeData {
  pub(crate) fn new() -> Self {
    Self {
      style: Style::default(),
      layout: Layout::new(),
      parent: None,
      children: SmallVec::new(),
      line_index: 0,
      has_new_layout: true,
      is_text: false,
      is_dirty: false,
      measure: None,
      print: None,
    }
  }

  /// Measured dimension along `axis`, with that axis's margins added.
  pub(crate) fn dim_with_margin(&self, axis: crate::style::FlexDirection) -> f32 {
    self.layout.measured_dimensions[axis.dimension() as usize] + self.style.margin_axis(axis)
  }

  /// True when the measured dimension along `axis` holds a usable value.
  pub(crate) fn is_layout_dim_defined(&self, axis: crate::style::FlexDirection) -> bool {
    let value = self.layout.measured_dimensions[axis.dimension() as usize];
    crate::style::is_defined(value) && value >= 0.0
  }
}

impl fmt::Debug for NodeData {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NodeData")
      .field("style", &self.style)
      .field("layout", &self.layout)
      .field("parent", &self.parent)
      .field("children", &self.children)
      .field("is_dirty", &self.is_dirty)
      .field("has_measure", &self.measure.is_some())
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::style::is_undefined;

  #[test]
  fn fresh_layout_is_uninitialized() {
    let layout = Layout::new();
    assert!(is_undefined(layout.width()));
    assert!(is_undefined(layout.measured_width()));
    assert!(is_undefined(layout.computed_flex_basis));
    assert_eq!(layout.left(), 0.0);
    assert!(layout.last_parent_direction.is_none());
  }

  #[test]
  fn fresh_node_defaults() {
    let node = NodeData::new();
    assert!(node.has_new_layout);
    assert!(!node.is_dirty);
    assert!(!node.is_text);
    assert!(node.children.is_empty());
    assert!(node.parent.is_none());
  }

  #[test]
  fn node_id_is_copy() {
    fn assert_copy<T: Copy>() {}
    assert_copy::<NodeId>();
  }
}
