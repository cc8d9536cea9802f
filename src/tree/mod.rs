//! The node tree: a slotmap arena of styled nodes.
//!
//! All nodes live in a single [`slotmap::SlotMap`]; [`NodeId`] keys are
//! lightweight `Copy` handles. The parent back-reference exists only to
//! propagate dirtiness upward — a child has exactly one parent at any time,
//! and the parent exclusively owns the ordered child list.
//!
//! Every style setter is a no-op when the new value equals the old one, and
//! otherwise marks the node and its ancestors dirty so the next layout pass
//! revisits them.

pub mod cache;
pub mod node;

use slotmap::SlotMap;

use crate::print::{stdout_logger, Logger};
use crate::style::{
  is_undefined, Align, Direction, Edge, FlexDirection, FlexWrap, Justify, Overflow, PositionType,
  Style, UNDEFINED,
};
use node::{Layout, MeasureFunc, NodeData, NodeId, PrintFunc};

/// A tree of layout nodes plus the per-tree state layout needs: the
/// generation counter that invalidates caches wholesale, and the logger the
/// pretty-printer writes through.
///
/// The generation counter is scoped to the tree (not the process) so that
/// independent trees can be laid out without interfering.
///
/// # Examples
///
/// ```
/// use flexlay::{Direction, FlexTree, UNDEFINED};
///
/// let mut tree = FlexTree::new();
/// let root = tree.new_node();
/// tree.set_width(root, 100.0);
/// tree.set_height(root, 100.0);
/// tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
/// assert_eq!(tree.layout(root).width(), 100.0);
/// ```
pub struct FlexTree {
  pub(crate) nodes: SlotMap<NodeId, NodeData>,
  pub(crate) generation: u32,
  pub(crate) depth: u32,
  pub(crate) logger: Logger,
  pub(crate) print_tree: bool,
}

macro_rules! style_prop {
  ($(#[$doc:meta])* $field:ident, $setter:ident: $ty:ty) => {
    $(#[$doc])*
    pub fn $setter(&mut self, node: NodeId, value: $ty) {
      if self.nodes[node].style.$field != value {
        self.nodes[node].style.$field = value;
        self.mark_dirty_internal(node);
      }
    }

    pub fn $field(&self, node: NodeId) -> $ty {
      self.nodes[node].style.$field
    }
  };
}

macro_rules! style_dim_prop {
  ($(#[$doc:meta])* $array:ident[$index:expr], $getter:ident, $setter:ident) => {
    $(#[$doc])*
    pub fn $setter(&mut self, node: NodeId, value: f32) {
      if self.nodes[node].style.$array[$index] != value {
        self.nodes[node].style.$array[$index] = value;
        self.mark_dirty_internal(node);
      }
    }

    pub fn $getter(&self, node: NodeId) -> f32 {
      self.nodes[node].style.$array[$index]
    }
  };
}

macro_rules! style_edge_prop {
  ($(#[$doc:meta])* $field:ident, $getter:ident, $setter:ident, $default:expr) => {
    $(#[$doc])*
    pub fn $setter(&mut self, node: NodeId, edge: Edge, value: f32) {
      if self.nodes[node].style.$field.get(edge) != value {
        self.nodes[node].style.$field.set(edge, value);
        self.mark_dirty_internal(node);
      }
    }

    /// Resolves the stored edge set for a concrete edge, walking the
    /// Horizontal/Vertical/All shorthand fallbacks.
    pub fn $getter(&self, node: NodeId, edge: Edge) -> f32 {
      self.nodes[node].style.$field.resolve(edge, $default)
    }
  };
}

impl FlexTree {
  /// Creates an empty tree.
  pub fn new() -> Self {
    Self {
      nodes: SlotMap::with_key(),
      generation: 0,
      depth: 0,
      logger: stdout_logger(),
      print_tree: false,
    }
  }

  /// Allocates a fresh node with default style, no parent and no children.
  pub fn new_node(&mut self) -> NodeId {
    self.nodes.insert(NodeData::new())
  }

  /// Number of live nodes in the arena.
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// Frees a single node.
  ///
  /// # Panics
  ///
  /// Panics when the node is still attached to a parent or still has
  /// children; detach it first or use [`FlexTree::free_recursive`].
  pub fn free(&mut self, node: NodeId) {
    let data = &self.nodes[node];
    assert!(
      data.parent.is_none(),
      "cannot free a node that is still attached to a parent"
    );
    assert!(
      data.children.is_empty(),
      "cannot free a node that still has children"
    );
    self.nodes.remove(node);
  }

  /// Detaches `node` from its parent (if any) and frees it together with
  /// every descendant, depth-first.
  pub fn free_recursive(&mut self, node: NodeId) {
    if let Some(parent) = self.nodes[node].parent {
      self.remove_child(parent, node);
    }
    loop {
      let Some(&child) = self.nodes[node].children.first() else {
        break;
      };
      self.remove_child(node, child);
      self.free_recursive(child);
    }
    self.nodes.remove(node);
  }

  /// Inserts `child` into `parent`'s child list at `index` and dirties the
  /// parent chain.
  ///
  /// # Panics
  ///
  /// Panics when `child` already has a parent (it must be removed first) or
  /// when `index` is beyond the current child count.
  pub fn insert_child(&mut self, parent: NodeId, child: NodeId, index: usize) {
    assert!(
      self.nodes[child].parent.is_none(),
      "child already has a parent, it must be removed first"
    );
    self.nodes[parent].children.insert(index, child);
    self.nodes[child].parent = Some(parent);
    self.mark_dirty_internal(parent);
  }

  /// Appends `child` as the last child of `parent`.
  pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
    let index = self.child_count(parent);
    self.insert_child(parent, child, index);
  }

  /// Removes `child` from `parent`'s list, clears its back-reference and
  /// dirties the parent chain. Does nothing if `child` is not a child of
  /// `parent`.
  pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
    let children = &mut self.nodes[parent].children;
    let Some(position) = children.iter().position(|&c| c == child) else {
      return;
    };
    children.remove(position);
    self.nodes[child].parent = None;
    self.mark_dirty_internal(parent);
  }

  /// The child at `index`, if any.
  pub fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
    self.nodes[parent].children.get(index).copied()
  }

  /// Number of children of `parent`.
  pub fn child_count(&self, parent: NodeId) -> usize {
    self.nodes[parent].children.len()
  }

  /// The parent of `node`, if attached.
  pub fn parent(&self, node: NodeId) -> Option<NodeId> {
    self.nodes[node].parent
  }

  /// Marks a measured leaf as needing re-measurement.
  ///
  /// Only leaves with a measure callback may be dirtied from outside: for
  /// everything else dirtiness follows from style and structure mutations.
  ///
  /// # Panics
  ///
  /// Panics when `node` has children or no measure callback.
  pub fn mark_dirty(&mut self, node: NodeId) {
    let data = &self.nodes[node];
    assert!(
      data.children.is_empty() && data.measure.is_some(),
      "only leaf nodes with custom measure functions should manually mark themselves dirty"
    );
    self.mark_dirty_internal(node);
  }

  /// True when the node must be re-measured on the next pass.
  pub fn is_dirty(&self, node: NodeId) -> bool {
    self.nodes[node].is_dirty
  }

  pub(crate) fn mark_dirty_internal(&mut self, node: NodeId) {
    let data = &mut self.nodes[node];
    if data.is_dirty {
      return;
    }
    data.is_dirty = true;
    data.layout.computed_flex_basis = UNDEFINED;
    let parent = data.parent;
    if let Some(parent) = parent {
      self.mark_dirty_internal(parent);
    }
  }

  /// True when the most recent layout pass produced fresh output for this
  /// node that the embedder has not consumed yet.
  pub fn has_new_layout(&self, node: NodeId) -> bool {
    self.nodes[node].has_new_layout
  }

  /// Lets the embedder acknowledge (or re-arm) the new-layout flag.
  pub fn set_has_new_layout(&mut self, node: NodeId, value: bool) {
    self.nodes[node].has_new_layout = value;
  }

  /// Installs or clears the content measurement callback.
  pub fn set_measure_func(&mut self, node: NodeId, measure: Option<MeasureFunc>) {
    self.nodes[node].measure = measure;
  }

  /// True when the node has a measure callback installed.
  pub fn has_measure_func(&self, node: NodeId) -> bool {
    self.nodes[node].measure.is_some()
  }

  /// Installs or clears the per-node pretty-printer hook.
  pub fn set_print_func(&mut self, node: NodeId, print: Option<PrintFunc>) {
    self.nodes[node].print = print;
  }

  /// Flags the node as text content, enabling the looser text measurement
  /// cache heuristics.
  pub fn set_is_text(&mut self, node: NodeId, is_text: bool) {
    self.nodes[node].is_text = is_text;
  }

  pub fn is_text(&self, node: NodeId) -> bool {
    self.nodes[node].is_text
  }

  /// Read access to the node's full style.
  pub fn style(&self, node: NodeId) -> &Style {
    &self.nodes[node].style
  }

  /// Read access to the node's computed layout.
  pub fn layout(&self, node: NodeId) -> &Layout {
    &self.nodes[node].layout
  }

  /// The flex line this node was packed into during the last layout.
  pub fn line_index(&self, node: NodeId) -> u32 {
    self.nodes[node].line_index
  }

  /// Replaces the logger the pretty-printer writes through.
  pub fn set_logger(&mut self, logger: Logger) {
    self.logger = logger;
  }

  /// When set, `compute_layout` pretty-prints the tree after every fresh
  /// computation.
  pub fn set_print_tree(&mut self, print_tree: bool) {
    self.print_tree = print_tree;
  }

  // Style properties. Setters dirty-propagate unless the write is a no-op.

  style_prop!(
    /// CSS `direction`: the writing direction, or Inherit to take the
    /// parent's resolved direction.
    direction, set_direction: Direction
  );
  style_prop!(
    /// CSS `flex-direction`: the container's main axis.
    flex_direction, set_flex_direction: FlexDirection
  );
  style_prop!(
    /// CSS `justify-content`: main-axis distribution of free space.
    justify_content, set_justify_content: Justify
  );
  style_prop!(
    /// CSS `align-content`: cross-axis distribution of flex lines.
    align_content, set_align_content: Align
  );
  style_prop!(
    /// CSS `align-items`: default cross-axis alignment of children.
    align_items, set_align_items: Align
  );
  style_prop!(
    /// CSS `align-self`: per-child override of the parent's `align-items`.
    align_self, set_align_self: Align
  );
  style_prop!(
    /// CSS `position`: relative (in flow) or absolute.
    position_type, set_position_type: PositionType
  );
  style_prop!(
    /// CSS `flex-wrap`: single-line or multi-line layout.
    flex_wrap, set_flex_wrap: FlexWrap
  );
  style_prop!(
    /// CSS `overflow`. `Scroll` changes how children are measured along the
    /// scrollable axis.
    overflow, set_overflow: Overflow
  );
  style_prop!(flex_grow, set_flex_grow: f32);
  style_prop!(flex_shrink, set_flex_shrink: f32);
  style_prop!(
    /// The hypothetical main-axis size before grow/shrink are applied.
    flex_basis, set_flex_basis: f32
  );

  style_edge_prop!(
    /// Margin for one edge slot. Negative margins are honored.
    margin, margin, set_margin, 0.0
  );
  style_edge_prop!(
    /// Position offset for one edge slot; unset edges resolve to the
    /// undefined sentinel.
    position, position, set_position, UNDEFINED
  );
  style_edge_prop!(
    /// Padding for one edge slot. Negative values are ignored at read time.
    padding, padding, set_padding, 0.0
  );
  style_edge_prop!(
    /// Border width for one edge slot. Negative values are ignored at read
    /// time.
    border, border, set_border, 0.0
  );

  style_dim_prop!(dimensions[0], width, set_width);
  style_dim_prop!(dimensions[1], height, set_height);
  style_dim_prop!(min_dimensions[0], min_width, set_min_width);
  style_dim_prop!(min_dimensions[1], min_height, set_min_height);
  style_dim_prop!(max_dimensions[0], max_width, set_max_width);
  style_dim_prop!(max_dimensions[1], max_height, set_max_height);

  /// The `flex` shorthand: `0` (or unset) clears all three factors, a
  /// positive value grows from a zero basis, a negative value only shrinks.
  pub fn set_flex(&mut self, node: NodeId, flex: f32) {
    if is_undefined(flex) || flex == 0.0 {
      self.set_flex_grow(node, 0.0);
      self.set_flex_shrink(node, 0.0);
      self.set_flex_basis(node, UNDEFINED);
    } else if flex > 0.0 {
      self.set_flex_grow(node, flex);
      self.set_flex_shrink(node, 0.0);
      self.set_flex_basis(node, 0.0);
    } else {
      self.set_flex_grow(node, 0.0);
      self.set_flex_shrink(node, -flex);
      self.set_flex_basis(node, UNDEFINED);
    }
  }

  /// Reads back the `flex` shorthand: grow when growing, negated shrink when
  /// shrinking, zero otherwise.
  pub fn flex(&self, node: NodeId) -> f32 {
    let style = &self.nodes[node].style;
    if style.flex_grow > 0.0 {
      style.flex_grow
    } else if style.flex_shrink > 0.0 {
      -style.flex_shrink
    } else {
      0.0
    }
  }
}

impl Default for FlexTree {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for FlexTree {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FlexTree")
      .field("node_count", &self.nodes.len())
      .field("generation", &self.generation)
      .finish_non_exhaustive()
  }
}
