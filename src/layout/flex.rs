//! The flexbox layout algorithm.
//!
//! This implements a subset of the W3C flexbox algorithm
//! (<https://www.w3.org/TR/css-flexbox-1/>) over the node tree, with a
//! caching dispatch layer that skips redundant work across passes.
//!
//! Limitations compared to the full standard: no `order`, no z-ordering, no
//! `wrap-reverse`, no auto margins, no percentage lengths, no baseline
//! alignment, no aspect ratios, no forced breaks, and the default minimum
//! main size of flex items is taken as zero rather than min-content.
//! Deviations: min/max sizes on the main axis are resolved with a fixed
//! two-pass scheme instead of the spec's iterative loop, and the default
//! `flex-direction` is `column`.
//!
//! Measure modes map onto CSS sizing terms: `Undefined` is max-content,
//! `Exactly` is fill-available, `AtMost` is fit-content. Whenever an
//! available dimension is undefined, its measure mode must be `Undefined`,
//! and vice versa.
//!
//! A sizing pass (`perform_layout == false`) only fills in
//! `measured_dimensions`; a layout pass additionally positions every child
//! and promotes the measured dimensions into the node's final dimensions.

use std::fmt;

use crate::geometry::Size;
use crate::layout::axis::{cross_flex_direction, resolve_axis, resolve_direction};
use crate::print::PrintOptions;
use crate::style::{
  is_defined, is_undefined, Align, Direction, FlexDirection, FlexWrap, Justify, MeasureMode,
  Overflow, PositionType, Style, UNDEFINED,
};
use crate::tree::cache::{CacheQuery, CachedMeasurement};
use crate::tree::node::NodeId;
use crate::tree::FlexTree;

/// Why a node is being visited; rendered into the trace log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LayoutPass {
  Initial,
  Measure,
  Flex,
  Stretch,
  AbsMeasure,
  AbsLayout,
}

impl fmt::Display for LayoutPass {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Initial => write!(f, "initial"),
      Self::Measure => write!(f, "measure"),
      Self::Flex => write!(f, "flex"),
      Self::Stretch => write!(f, "stretch"),
      Self::AbsMeasure => write!(f, "abs-measure"),
      Self::AbsLayout => write!(f, "abs-layout"),
    }
  }
}

/// A child's effective cross-axis alignment: its own `align-self` unless
/// that is `Auto`, in which case the parent's `align-items` applies.
fn align_item(parent_style: &Style, child_style: &Style) -> Align {
  if child_style.align_self != Align::Auto {
    child_style.align_self
  } else {
    parent_style.align_items
  }
}

impl FlexTree {
  /// Computes layout for the tree rooted at `root`.
  ///
  /// Pass the available width/height, or [`UNDEFINED`] to let the root size
  /// itself from its style dimensions (or, failing those, its max
  /// dimensions, or its content). `parent_direction` is the writing
  /// direction the root resolves `Direction::Inherit` against.
  ///
  /// After this returns, every node's [`crate::Layout`] holds its final
  /// dimensions and its position relative to its parent.
  pub fn compute_layout(
    &mut self,
    root: NodeId,
    available_width: f32,
    available_height: f32,
    parent_direction: Direction,
  ) {
    // Bumping the generation forces the recursion to visit every dirty node
    // at least once this pass; clean subtrees resolve from their caches.
    self.generation = self.generation.wrapping_add(1);

    let style = self.nodes[root].style.clone();

    let mut width = available_width;
    let mut height = available_height;
    let mut width_measure_mode = MeasureMode::Undefined;
    let mut height_measure_mode = MeasureMode::Undefined;

    if is_defined(width) {
      width_measure_mode = MeasureMode::Exactly;
    } else if style.is_dim_defined(FlexDirection::Row) {
      width = style.dimensions[0] + style.margin_axis(FlexDirection::Row);
      width_measure_mode = MeasureMode::Exactly;
    } else if style.max_dimensions[0] >= 0.0 {
      width = style.max_dimensions[0];
      width_measure_mode = MeasureMode::AtMost;
    }

    if is_defined(height) {
      height_measure_mode = MeasureMode::Exactly;
    } else if style.is_dim_defined(FlexDirection::Column) {
      height = style.dimensions[1] + style.margin_axis(FlexDirection::Column);
      height_measure_mode = MeasureMode::Exactly;
    } else if style.max_dimensions[1] >= 0.0 {
      height = style.max_dimensions[1];
      height_measure_mode = MeasureMode::AtMost;
    }

    if self.layout_node(
      root,
      width,
      height,
      parent_direction,
      width_measure_mode,
      height_measure_mode,
      true,
      LayoutPass::Initial,
    ) {
      let direction = self.nodes[root].layout.direction;
      self.set_layout_position(root, direction);

      if self.print_tree {
        self.print_node(root, PrintOptions::all());
      }
    }
  }

  /// Dispatch wrapper around [`FlexTree::layout_node_impl`]: decides whether
  /// the request can be answered from the node's cache, runs the algorithm
  /// if not, and maintains the cache, generation and dirty bookkeeping.
  ///
  /// Returns true when the node was actually (re)computed, false when a
  /// cached result was reused as-is.
  #[allow(clippy::too_many_arguments)]
  pub(crate) fn layout_node(
    &mut self,
    node: NodeId,
    available_width: f32,
    available_height: f32,
    parent_direction: Direction,
    width_measure_mode: MeasureMode,
    height_measure_mode: MeasureMode,
    perform_layout: bool,
    reason: LayoutPass,
  ) -> bool {
    self.depth += 1;

    let need_to_visit = {
      let data = &self.nodes[node];
      (data.is_dirty && data.layout.generation != self.generation)
        || data.layout.last_parent_direction != Some(parent_direction)
    };

    if need_to_visit {
      self.nodes[node].layout.cache.invalidate();
    }

    // Layouts and measurements cache separately: a layout pass runs at most
    // once per node per tree layout, while several measurements may be
    // needed to resolve the flex dimensions. Nodes with measure callbacks
    // are the most expensive to recompute, so they get the relaxed
    // compatibility rules instead of exact input matching.
    let is_measured_leaf =
      self.nodes[node].measure.is_some() && self.nodes[node].children.is_empty();

    let cached: Option<Size> = if is_measured_leaf {
      let data = &self.nodes[node];
      let query = CacheQuery {
        is_text: data.is_text,
        available_width,
        available_height,
        margin_row: data.style.margin_axis(FlexDirection::Row),
        margin_column: data.style.margin_axis(FlexDirection::Column),
        width_measure_mode,
        height_measure_mode,
      };
      data.layout.cache.find_compatible(&query)
    } else if perform_layout {
      self.nodes[node].layout.cache.find_exact_layout(
        available_width,
        available_height,
        width_measure_mode,
        height_measure_mode,
      )
    } else {
      self.nodes[node].layout.cache.find_exact_measurement(
        available_width,
        available_height,
        width_measure_mode,
        height_measure_mode,
      )
    };

    let computed = match cached {
      Some(size) if !need_to_visit => {
        self.nodes[node].layout.measured_dimensions = [size.width, size.height];
        log::trace!(
          "{:indent$}{}. [skipped] wm: {}, hm: {}, aw: {} ah: {} => d: ({}, {}) {} (layout={})",
          "",
          self.depth,
          width_measure_mode,
          height_measure_mode,
          available_width,
          available_height,
          size.width,
          size.height,
          reason,
          perform_layout,
          indent = self.depth as usize,
        );
        false
      }
      _ => {
        log::trace!(
          "{:indent$}{}. {{{} wm: {}, hm: {}, aw: {} ah: {} {} (layout={})",
          "",
          self.depth,
          if need_to_visit { "*" } else { "" },
          width_measure_mode,
          height_measure_mode,
          available_width,
          available_height,
          reason,
          perform_layout,
          indent = self.depth as usize,
        );

        self.layout_node_impl(
          node,
          available_width,
          available_height,
          parent_direction,
          width_measure_mode,
          height_measure_mode,
          perform_layout,
        );

        let layout = &mut self.nodes[node].layout;
        log::trace!(
          "{:indent$}{}. }}{} d: ({}, {}) {}",
          "",
          self.depth,
          if need_to_visit { "*" } else { "" },
          layout.measured_dimensions[0],
          layout.measured_dimensions[1],
          reason,
          indent = self.depth as usize,
        );

        layout.last_parent_direction = Some(parent_direction);

        if cached.is_none() {
          let entry = CachedMeasurement {
            available_width,
            available_height,
            width_measure_mode,
            height_measure_mode,
            computed_width: layout.measured_dimensions[0],
            computed_height: layout.measured_dimensions[1],
          };
          layout.cache.store(entry, perform_layout);
        }
        true
      }
    };

    if perform_layout {
      let data = &mut self.nodes[node];
      data.layout.dimensions = data.layout.measured_dimensions;
      data.has_new_layout = true;
      data.is_dirty = false;
    }

    self.nodes[node].layout.generation = self.generation;
    self.depth -= 1;
    computed
  }

  /// Seeds a node's layout position from its margins and relative offsets
  /// along both resolved axes.
  pub(crate) fn set_layout_position(&mut self, node: NodeId, direction: Direction) {
    let style = self.nodes[node].style.clone();
    let main_axis = resolve_axis(style.flex_direction, direction);
    let cross_axis = cross_flex_direction(main_axis, direction);

    let layout = &mut self.nodes[node].layout;
    layout.position[main_axis.leading_edge() as usize] =
      style.leading_margin(main_axis) + style.relative_position(main_axis);
    layout.position[main_axis.trailing_edge() as usize] =
      style.trailing_margin(main_axis) + style.relative_position(main_axis);
    layout.position[cross_axis.leading_edge() as usize] =
      style.leading_margin(cross_axis) + style.relative_position(cross_axis);
    layout.position[cross_axis.trailing_edge() as usize] =
      style.trailing_margin(cross_axis) + style.relative_position(cross_axis);
  }

  /// Rewrites a child's trailing position slot so that, on reverse axes,
  /// the recorded offset is measured from the parent's far edge.
  fn set_trailing_position(&mut self, node: NodeId, child: NodeId, axis: FlexDirection) {
    let dim = axis.dimension() as usize;
    let child_size = self.nodes[child].layout.measured_dimensions[dim];
    let parent_size = self.nodes[node].layout.measured_dimensions[dim];
    let leading = self.nodes[child].layout.position[axis.position_edge() as usize];
    self.nodes[child].layout.position[axis.trailing_edge() as usize] =
      parent_size - child_size - leading;
  }

  /// Resolves a relative child's flex basis: an explicit `flex-basis` or a
  /// definite main-axis style dimension is used directly (floored at the
  /// child's padding+border); otherwise the child is measured.
  #[allow(clippy::too_many_arguments)]
  fn compute_child_flex_basis(
    &mut self,
    node: NodeId,
    child: NodeId,
    width: f32,
    width_measure_mode: MeasureMode,
    height: f32,
    height_measure_mode: MeasureMode,
    direction: Direction,
  ) {
    let parent_style = self.nodes[node].style.clone();
    let child_style = self.nodes[child].style.clone();
    let main_axis = resolve_axis(parent_style.flex_direction, direction);
    let is_main_axis_row = main_axis.is_row();

    if is_defined(child_style.flex_basis)
      && is_defined(if is_main_axis_row { width } else { height })
    {
      if is_undefined(self.nodes[child].layout.computed_flex_basis) {
        self.nodes[child].layout.computed_flex_basis = child_style
          .flex_basis
          .max(child_style.padding_and_border_axis(main_axis));
      }
    } else if is_main_axis_row && child_style.is_dim_defined(FlexDirection::Row) {
      // The width is definite, so use that as the flex basis.
      self.nodes[child].layout.computed_flex_basis = child_style.dimensions[0]
        .max(child_style.padding_and_border_axis(FlexDirection::Row));
    } else if !is_main_axis_row && child_style.is_dim_defined(FlexDirection::Column) {
      // The height is definite, so use that as the flex basis.
      self.nodes[child].layout.computed_flex_basis = child_style.dimensions[1]
        .max(child_style.padding_and_border_axis(FlexDirection::Column));
    } else {
      // Measure the child to find the hypothetical main size.
      let mut child_width = UNDEFINED;
      let mut child_height = UNDEFINED;
      let mut child_width_measure_mode = MeasureMode::Undefined;
      let mut child_height_measure_mode = MeasureMode::Undefined;

      if child_style.is_dim_defined(FlexDirection::Row) {
        child_width =
          child_style.dimensions[0] + child_style.margin_axis(FlexDirection::Row);
        child_width_measure_mode = MeasureMode::Exactly;
      }
      if child_style.is_dim_defined(FlexDirection::Column) {
        child_height =
          child_style.dimensions[1] + child_style.margin_axis(FlexDirection::Column);
        child_height_measure_mode = MeasureMode::Exactly;
      }

      // The W3C spec doesn't say anything about the 'overflow' property,
      // but all major browsers appear to implement the following logic.
      if (!is_main_axis_row && parent_style.overflow == Overflow::Scroll)
        || parent_style.overflow != Overflow::Scroll
      {
        if is_undefined(child_width) && is_defined(width) {
          child_width = width;
          child_width_measure_mode = MeasureMode::AtMost;
        }
      }
      if (is_main_axis_row && parent_style.overflow == Overflow::Scroll)
        || parent_style.overflow != Overflow::Scroll
      {
        if is_undefined(child_height) && is_defined(height) {
          child_height = height;
          child_height_measure_mode = MeasureMode::AtMost;
        }
      }

      // A stretch-aligned child with no definite cross size is measured
      // exactly against the available inner cross dimension.
      if !is_main_axis_row
        && is_defined(width)
        && !child_style.is_dim_defined(FlexDirection::Row)
        && width_measure_mode == MeasureMode::Exactly
        && align_item(&parent_style, &child_style) == Align::Stretch
      {
        child_width = width;
        child_width_measure_mode = MeasureMode::Exactly;
      }
      if is_main_axis_row
        && is_defined(height)
        && !child_style.is_dim_defined(FlexDirection::Column)
        && height_measure_mode == MeasureMode::Exactly
        && align_item(&parent_style, &child_style) == Align::Stretch
      {
        child_height = height;
        child_height_measure_mode = MeasureMode::Exactly;
      }

      self.layout_node(
        child,
        child_width,
        child_height,
        direction,
        child_width_measure_mode,
        child_height_measure_mode,
        false,
        LayoutPass::Measure,
      );

      let measured = self.nodes[child].layout.measured_dimensions
        [if is_main_axis_row { 0 } else { 1 }];
      self.nodes[child].layout.computed_flex_basis =
        measured.max(child_style.padding_and_border_axis(main_axis));
    }
  }

  /// Sizes and positions one absolutely positioned child against the
  /// already-measured parent box.
  fn absolute_layout_child(
    &mut self,
    node: NodeId,
    child: NodeId,
    width: f32,
    width_measure_mode: MeasureMode,
    direction: Direction,
  ) {
    let parent_style = self.nodes[node].style.clone();
    let child_style = self.nodes[child].style.clone();
    let main_axis = resolve_axis(parent_style.flex_direction, direction);
    let cross_axis = cross_flex_direction(main_axis, direction);
    let is_main_axis_row = main_axis.is_row();

    let mut child_width = UNDEFINED;
    let mut child_height = UNDEFINED;

    if child_style.is_dim_defined(FlexDirection::Row) {
      child_width = child_style.dimensions[0] + child_style.margin_axis(FlexDirection::Row);
    } else if child_style.is_leading_position_defined(FlexDirection::Row)
      && child_style.is_trailing_position_defined(FlexDirection::Row)
    {
      // No specified width: derive it from the left/right offsets.
      child_width = self.nodes[node].layout.measured_dimensions[0]
        - (parent_style.leading_border(FlexDirection::Row)
          + parent_style.trailing_border(FlexDirection::Row))
        - (child_style.leading_position(FlexDirection::Row)
          + child_style.trailing_position(FlexDirection::Row));
      child_width = child_style.bound_axis(FlexDirection::Row, child_width);
    }

    if child_style.is_dim_defined(FlexDirection::Column) {
      child_height =
        child_style.dimensions[1] + child_style.margin_axis(FlexDirection::Column);
    } else if child_style.is_leading_position_defined(FlexDirection::Column)
      && child_style.is_trailing_position_defined(FlexDirection::Column)
    {
      // No specified height: derive it from the top/bottom offsets.
      child_height = self.nodes[node].layout.measured_dimensions[1]
        - (parent_style.leading_border(FlexDirection::Column)
          + parent_style.trailing_border(FlexDirection::Column))
        - (child_style.leading_position(FlexDirection::Column)
          + child_style.trailing_position(FlexDirection::Column));
      child_height = child_style.bound_axis(FlexDirection::Column, child_height);
    }

    // Still missing one dimension or the other: measure the content.
    if is_undefined(child_width) || is_undefined(child_height) {
      let mut child_width_measure_mode = if is_undefined(child_width) {
        MeasureMode::Undefined
      } else {
        MeasureMode::Exactly
      };
      let child_height_measure_mode = if is_undefined(child_height) {
        MeasureMode::Undefined
      } else {
        MeasureMode::Exactly
      };

      // When the main axis is vertical and the parent width is constrained,
      // the child's horizontal axis is sized at-most against it.
      if !is_main_axis_row
        && is_undefined(child_width)
        && width_measure_mode != MeasureMode::Undefined
      {
        child_width = width;
        child_width_measure_mode = MeasureMode::AtMost;
      }

      self.layout_node(
        child,
        child_width,
        child_height,
        direction,
        child_width_measure_mode,
        child_height_measure_mode,
        false,
        LayoutPass::AbsMeasure,
      );
      child_width = self.nodes[child].layout.measured_dimensions[0]
        + child_style.margin_axis(FlexDirection::Row);
      child_height = self.nodes[child].layout.measured_dimensions[1]
        + child_style.margin_axis(FlexDirection::Column);
    }

    self.layout_node(
      child,
      child_width,
      child_height,
      direction,
      MeasureMode::Exactly,
      MeasureMode::Exactly,
      true,
      LayoutPass::AbsLayout,
    );

    if child_style.is_trailing_position_defined(main_axis)
      && !child_style.is_leading_position_defined(main_axis)
    {
      let dim = main_axis.dimension() as usize;
      self.nodes[child].layout.position[main_axis.position_edge() as usize] =
        self.nodes[node].layout.measured_dimensions[dim]
          - self.nodes[child].layout.measured_dimensions[dim]
          - child_style.trailing_position(main_axis);
    }

    if child_style.is_trailing_position_defined(cross_axis)
      && !child_style.is_leading_position_defined(cross_axis)
    {
      let dim = cross_axis.dimension() as usize;
      self.nodes[child].layout.position[cross_axis.position_edge() as usize] =
        self.nodes[node].layout.measured_dimensions[dim]
          - self.nodes[child].layout.measured_dimensions[dim]
          - child_style.trailing_position(cross_axis);
    }
  }

  /// The algorithm proper. Reads `style` as immutable input; fills in the
  /// node's resolved direction and measured dimensions, and the position
  /// and line index of every child.
  #[allow(clippy::too_many_arguments)]
  fn layout_node_impl(
    &mut self,
    node: NodeId,
    available_width: f32,
    available_height: f32,
    parent_direction: Direction,
    width_measure_mode: MeasureMode,
    height_measure_mode: MeasureMode,
    perform_layout: bool,
  ) {
    assert!(
      is_defined(available_width) == (width_measure_mode != MeasureMode::Undefined),
      "availableWidth must be defined exactly when widthMeasureMode is not Undefined"
    );
    assert!(
      is_defined(available_height) == (height_measure_mode != MeasureMode::Undefined),
      "availableHeight must be defined exactly when heightMeasureMode is not Undefined"
    );

    let style = self.nodes[node].style.clone();

    let padding_and_border_axis_row = style.padding_and_border_axis(FlexDirection::Row);
    let padding_and_border_axis_column = style.padding_and_border_axis(FlexDirection::Column);
    let margin_axis_row = style.margin_axis(FlexDirection::Row);
    let margin_axis_column = style.margin_axis(FlexDirection::Column);

    let direction = resolve_direction(style.direction, parent_direction);
    self.nodes[node].layout.direction = direction;

    // Content (text) nodes: ask the measure callback.
    if self.nodes[node].measure.is_some() && self.nodes[node].children.is_empty() {
      let inner_width = available_width - margin_axis_row - padding_and_border_axis_row;
      let inner_height = available_height - margin_axis_column - padding_and_border_axis_column;

      if width_measure_mode == MeasureMode::Exactly
        && height_measure_mode == MeasureMode::Exactly
      {
        // Both dimensions already pinned; no need to measure the content.
        self.nodes[node].layout.measured_dimensions = [
          style.bound_axis(FlexDirection::Row, available_width - margin_axis_row),
          style.bound_axis(FlexDirection::Column, available_height - margin_axis_column),
        ];
      } else if inner_width <= 0.0 || inner_height <= 0.0 {
        // No space to lay the content into.
        self.nodes[node].layout.measured_dimensions = [
          style.bound_axis(FlexDirection::Row, 0.0),
          style.bound_axis(FlexDirection::Column, 0.0),
        ];
      } else {
        // The callback is taken out of the node for the duration of the
        // call: it must not re-enter the tree anyway.
        let mut measure = self.nodes[node].measure.take();
        let measured_size = match measure.as_mut() {
          Some(measure) => measure(
            inner_width,
            width_measure_mode,
            inner_height,
            height_measure_mode,
          ),
          None => Size::ZERO,
        };
        self.nodes[node].measure = measure;

        let width = if width_measure_mode == MeasureMode::Undefined
          || width_measure_mode == MeasureMode::AtMost
        {
          measured_size.width + padding_and_border_axis_row
        } else {
          available_width - margin_axis_row
        };
        let height = if height_measure_mode == MeasureMode::Undefined
          || height_measure_mode == MeasureMode::AtMost
        {
          measured_size.height + padding_and_border_axis_column
        } else {
          available_height - margin_axis_column
        };

        self.nodes[node].layout.measured_dimensions = [
          style.bound_axis(FlexDirection::Row, width),
          style.bound_axis(FlexDirection::Column, height),
        ];
      }
      return;
    }

    // Nodes with no children size from the available values, or from their
    // padding and border when unconstrained.
    let child_ids: Vec<NodeId> = self.nodes[node].children.iter().copied().collect();
    let child_count = child_ids.len();
    if child_count == 0 {
      self.nodes[node].layout.measured_dimensions = [
        style.bound_axis(
          FlexDirection::Row,
          if width_measure_mode == MeasureMode::Undefined
            || width_measure_mode == MeasureMode::AtMost
          {
            padding_and_border_axis_row
          } else {
            available_width - margin_axis_row
          },
        ),
        style.bound_axis(
          FlexDirection::Column,
          if height_measure_mode == MeasureMode::Undefined
            || height_measure_mode == MeasureMode::AtMost
          {
            padding_and_border_axis_column
          } else {
            available_height - margin_axis_column
          },
        ),
      ];
      return;
    }

    // Pure measurement requests with degenerate or fully pinned inputs can
    // be answered without visiting the children.
    if !perform_layout {
      if width_measure_mode == MeasureMode::AtMost
        && available_width <= 0.0
        && height_measure_mode == MeasureMode::AtMost
        && available_height <= 0.0
      {
        self.nodes[node].layout.measured_dimensions = [
          style.bound_axis(FlexDirection::Row, 0.0),
          style.bound_axis(FlexDirection::Column, 0.0),
        ];
        return;
      }

      if width_measure_mode == MeasureMode::AtMost && available_width <= 0.0 {
        self.nodes[node].layout.measured_dimensions = [
          style.bound_axis(FlexDirection::Row, 0.0),
          style.bound_axis(
            FlexDirection::Column,
            if is_undefined(available_height) {
              0.0
            } else {
              available_height - margin_axis_column
            },
          ),
        ];
        return;
      }

      if height_measure_mode == MeasureMode::AtMost && available_height <= 0.0 {
        self.nodes[node].layout.measured_dimensions = [
          style.bound_axis(
            FlexDirection::Row,
            if is_undefined(available_width) {
              0.0
            } else {
              available_width - margin_axis_row
            },
          ),
          style.bound_axis(FlexDirection::Column, 0.0),
        ];
        return;
      }

      if width_measure_mode == MeasureMode::Exactly
        && height_measure_mode == MeasureMode::Exactly
      {
        self.nodes[node].layout.measured_dimensions = [
          style.bound_axis(FlexDirection::Row, available_width - margin_axis_row),
          style.bound_axis(FlexDirection::Column, available_height - margin_axis_column),
        ];
        return;
      }
    }

    // STEP 1: values shared by the rest of the algorithm.
    let main_axis = resolve_axis(style.flex_direction, direction);
    let cross_axis = cross_flex_direction(main_axis, direction);
    let is_main_axis_row = main_axis.is_row();
    let justify_content = style.justify_content;
    let is_node_flex_wrap = style.flex_wrap == FlexWrap::Wrap;

    let mut absolute_children: Vec<NodeId> = Vec::new();

    let leading_padding_and_border_main = style.leading_padding_and_border(main_axis);
    let trailing_padding_and_border_main = style.trailing_padding_and_border(main_axis);
    let leading_padding_and_border_cross = style.leading_padding_and_border(cross_axis);
    let padding_and_border_axis_main = style.padding_and_border_axis(main_axis);
    let padding_and_border_axis_cross = style.padding_and_border_axis(cross_axis);

    let measure_mode_main_dim = if is_main_axis_row {
      width_measure_mode
    } else {
      height_measure_mode
    };
    let measure_mode_cross_dim = if is_main_axis_row {
      height_measure_mode
    } else {
      width_measure_mode
    };

    // STEP 2: available size along each axis, inside margins, padding and
    // border.
    let available_inner_width = available_width - margin_axis_row - padding_and_border_axis_row;
    let available_inner_height =
      available_height - margin_axis_column - padding_and_border_axis_column;
    let available_inner_main_dim = if is_main_axis_row {
      available_inner_width
    } else {
      available_inner_height
    };
    let available_inner_cross_dim = if is_main_axis_row {
      available_inner_height
    } else {
      available_inner_width
    };

    // STEP 3: flex basis for every relative child; absolutes are collected
    // for the dedicated pass at the end.
    for &child in &child_ids {
      if perform_layout {
        let child_direction = resolve_direction(self.nodes[child].style.direction, direction);
        self.set_layout_position(child, child_direction);
      }

      if self.nodes[child].style.position_type == PositionType::Absolute {
        absolute_children.push(child);
      } else {
        self.compute_child_flex_basis(
          node,
          child,
          available_inner_width,
          width_measure_mode,
          available_inner_height,
          height_measure_mode,
          direction,
        );
      }
    }

    // STEP 4 onward runs once per flex line.
    let mut start_of_line_index = 0usize;
    let mut end_of_line_index = 0usize;
    let mut line_count: u32 = 0;

    // Accumulated cross size of all lines, and the widest line's main size.
    let mut total_line_cross_dim = 0.0f32;
    let mut max_line_main_dim = 0.0f32;

    while end_of_line_index < child_count {
      // Pack children into the current line until it is full. The item
      // count can differ from the index span because absolutes are skipped.
      let mut items_on_line: u32 = 0;
      let mut size_consumed_on_current_line = 0.0f32;
      let mut total_flex_grow_factors = 0.0f32;
      let mut total_flex_shrink_scaled_factors = 0.0f32;
      let mut relative_children: Vec<NodeId> = Vec::new();

      while end_of_line_index < child_count {
        let child = child_ids[end_of_line_index];
        self.nodes[child].line_index = line_count;

        if self.nodes[child].style.position_type != PositionType::Absolute {
          let child_basis = self.nodes[child].layout.computed_flex_basis;
          let outer_flex_basis = child_basis + self.nodes[child].style.margin_axis(main_axis);

          // A wrapping flow that would overflow the line ends it here,
          // unless the line is still empty.
          if size_consumed_on_current_line + outer_flex_basis > available_inner_main_dim
            && is_node_flex_wrap
            && items_on_line > 0
          {
            break;
          }

          size_consumed_on_current_line += outer_flex_basis;
          items_on_line += 1;

          if self.nodes[child].style.is_flex() {
            total_flex_grow_factors += self.nodes[child].style.flex_grow;
            // The shrink factor is scaled relative to the child dimension.
            total_flex_shrink_scaled_factors +=
              -self.nodes[child].style.flex_shrink * child_basis;
          }

          relative_children.push(child);
        }

        end_of_line_index += 1;
      }

      // When only measuring under an exact cross constraint, resolving the
      // flexible lengths changes nothing the caller can observe.
      let can_skip_flex = !perform_layout && measure_mode_cross_dim == MeasureMode::Exactly;

      // Main-axis placement is controlled by the space before the first
      // element and the space between any two elements.
      let mut leading_main_dim = 0.0f32;
      let mut between_main_dim = 0.0f32;

      // STEP 5: resolve the flexible lengths. When the main dimension is
      // unknown it is derived from the line contents, leaving no free space
      // to distribute.
      let mut remaining_free_space = 0.0f32;
      if is_defined(available_inner_main_dim) {
        remaining_free_space = available_inner_main_dim - size_consumed_on_current_line;
      } else if size_consumed_on_current_line < 0.0 {
        // Content-sized with a negative consumed size: the node allocates
        // zero pixels for content, so the free space is the negation.
        remaining_free_space = -size_consumed_on_current_line;
      }

      let original_remaining_free_space = remaining_free_space;
      let mut delta_free_space = 0.0f32;

      if !can_skip_flex {
        // Two fixed passes instead of the spec's iterative loop: the first
        // finds items whose min/max constraints trigger and freezes them at
        // their bounds, excluding their sizes and factors from the pool;
        // the second distributes what remains. Items frozen in pass one hit
        // the same bound again in pass two, so both passes agree.
        let mut delta_flex_shrink_scaled_factors = 0.0f32;
        let mut delta_flex_grow_factors = 0.0f32;

        for &child in &relative_children {
          let child_flex_basis = self.nodes[child].layout.computed_flex_basis;

          if remaining_free_space < 0.0 {
            let flex_shrink_scaled_factor =
              -self.nodes[child].style.flex_shrink * child_flex_basis;

            if flex_shrink_scaled_factor != 0.0 {
              let base_main_size = child_flex_basis
                + remaining_free_space / total_flex_shrink_scaled_factors
                  * flex_shrink_scaled_factor;
              let bound_main_size =
                self.nodes[child].style.bound_axis(main_axis, base_main_size);
              if base_main_size != bound_main_size {
                delta_free_space -= bound_main_size - child_flex_basis;
                delta_flex_shrink_scaled_factors -= flex_shrink_scaled_factor;
              }
            }
          } else if remaining_free_space > 0.0 {
            let flex_grow_factor = self.nodes[child].style.flex_grow;

            if flex_grow_factor != 0.0 {
              let base_main_size = child_flex_basis
                + remaining_free_space / total_flex_grow_factors * flex_grow_factor;
              let bound_main_size =
                self.nodes[child].style.bound_axis(main_axis, base_main_size);
              if base_main_size != bound_main_size {
                delta_free_space -= bound_main_size - child_flex_basis;
                delta_flex_grow_factors -= flex_grow_factor;
              }
            }
          }
        }

        total_flex_shrink_scaled_factors += delta_flex_shrink_scaled_factors;
        total_flex_grow_factors += delta_flex_grow_factors;
        remaining_free_space += delta_free_space;

        // Second pass: fix the sizes and recurse into each child with its
        // final main size.
        delta_free_space = 0.0;
        for &child in &relative_children {
          let child_flex_basis = self.nodes[child].layout.computed_flex_basis;
          let mut updated_main_size = child_flex_basis;

          if remaining_free_space < 0.0 {
            let flex_shrink_scaled_factor =
              -self.nodes[child].style.flex_shrink * child_flex_basis;

            if flex_shrink_scaled_factor != 0.0 {
              let child_size = if total_flex_shrink_scaled_factors == 0.0 {
                child_flex_basis + flex_shrink_scaled_factor
              } else {
                child_flex_basis
                  + (remaining_free_space / total_flex_shrink_scaled_factors)
                    * flex_shrink_scaled_factor
              };
              updated_main_size = self.nodes[child].style.bound_axis(main_axis, child_size);
            }
          } else if remaining_free_space > 0.0 {
            let flex_grow_factor = self.nodes[child].style.flex_grow;

            if flex_grow_factor != 0.0 {
              updated_main_size = self.nodes[child].style.bound_axis(
                main_axis,
                child_flex_basis
                  + remaining_free_space / total_flex_grow_factors * flex_grow_factor,
              );
            }
          }

          delta_free_space -= updated_main_size - child_flex_basis;

          let child_style = self.nodes[child].style.clone();
          let child_width;
          let child_height;
          let child_width_measure_mode;
          let child_height_measure_mode;

          if is_main_axis_row {
            child_width = updated_main_size + child_style.margin_axis(FlexDirection::Row);
            child_width_measure_mode = MeasureMode::Exactly;

            if is_defined(available_inner_cross_dim)
              && !child_style.is_dim_defined(FlexDirection::Column)
              && height_measure_mode == MeasureMode::Exactly
              && align_item(&style, &child_style) == Align::Stretch
            {
              child_height = available_inner_cross_dim;
              child_height_measure_mode = MeasureMode::Exactly;
            } else if !child_style.is_dim_defined(FlexDirection::Column) {
              child_height = available_inner_cross_dim;
              child_height_measure_mode = if is_undefined(child_height) {
                MeasureMode::Undefined
              } else {
                MeasureMode::AtMost
              };
            } else {
              child_height =
                child_style.dimensions[1] + child_style.margin_axis(FlexDirection::Column);
              child_height_measure_mode = MeasureMode::Exactly;
            }
          } else {
            child_height = updated_main_size + child_style.margin_axis(FlexDirection::Column);
            child_height_measure_mode = MeasureMode::Exactly;

            if is_defined(available_inner_cross_dim)
              && !child_style.is_dim_defined(FlexDirection::Row)
              && width_measure_mode == MeasureMode::Exactly
              && align_item(&style, &child_style) == Align::Stretch
            {
              child_width = available_inner_cross_dim;
              child_width_measure_mode = MeasureMode::Exactly;
            } else if !child_style.is_dim_defined(FlexDirection::Row) {
              child_width = available_inner_cross_dim;
              child_width_measure_mode = if is_undefined(child_width) {
                MeasureMode::Undefined
              } else {
                MeasureMode::AtMost
              };
            } else {
              child_width =
                child_style.dimensions[0] + child_style.margin_axis(FlexDirection::Row);
              child_width_measure_mode = MeasureMode::Exactly;
            }
          }

          // Stretch children get a dedicated layout pass later, once the
          // line's cross size is known.
          let requires_stretch_layout = !child_style.is_dim_defined(cross_axis)
            && align_item(&style, &child_style) == Align::Stretch;

          self.layout_node(
            child,
            child_width,
            child_height,
            direction,
            child_width_measure_mode,
            child_height_measure_mode,
            perform_layout && !requires_stretch_layout,
            LayoutPass::Flex,
          );
        }
      }

      remaining_free_space = original_remaining_free_space + delta_free_space;

      // STEP 6: main-axis justification and cross-axis size determination.

      // Under an at-most main constraint, leftover space only survives up
      // to the container's main-axis minimum size.
      if measure_mode_main_dim == MeasureMode::AtMost && remaining_free_space > 0.0 {
        let min_main = style.min_dimensions[main_axis.dimension() as usize];
        if is_defined(min_main) && min_main >= 0.0 {
          remaining_free_space =
            (min_main - (available_inner_main_dim - remaining_free_space)).max(0.0);
        } else {
          remaining_free_space = 0.0;
        }
      }

      match justify_content {
        Justify::Center => leading_main_dim = remaining_free_space / 2.0,
        Justify::FlexEnd => leading_main_dim = remaining_free_space,
        Justify::SpaceBetween => {
          if items_on_line > 1 {
            between_main_dim =
              remaining_free_space.max(0.0) / (items_on_line - 1) as f32;
          } else {
            between_main_dim = 0.0;
          }
        }
        Justify::SpaceAround => {
          // Space on the edges is half the space between elements.
          between_main_dim = remaining_free_space / items_on_line as f32;
          leading_main_dim = between_main_dim / 2.0;
        }
        Justify::FlexStart => {}
      }

      let mut main_dim = leading_padding_and_border_main + leading_main_dim;
      let mut cross_dim = 0.0f32;

      for &child in &child_ids[start_of_line_index..end_of_line_index] {
        let child_style = self.nodes[child].style.clone();

        if child_style.position_type == PositionType::Absolute
          && child_style.is_leading_position_defined(main_axis)
        {
          if perform_layout {
            // Absolutes with an explicit leading offset sit exactly there,
            // plus the parent border and their own margin.
            self.nodes[child].layout.position[main_axis.position_edge() as usize] =
              child_style.leading_position(main_axis)
                + style.leading_border(main_axis)
                + child_style.leading_margin(main_axis);
          }
        } else {
          if perform_layout {
            // Everything else lands at the current accumulated offset.
            self.nodes[child].layout.position[main_axis.position_edge() as usize] += main_dim;
          }

          // Only relative children advance the line accumulators.
          if child_style.position_type == PositionType::Relative {
            if can_skip_flex {
              // The flex step was skipped, so measured dimensions are not
              // available; fall back to the computed flex basis.
              main_dim += between_main_dim
                + child_style.margin_axis(main_axis)
                + self.nodes[child].layout.computed_flex_basis;
              cross_dim = available_inner_cross_dim;
            } else {
              main_dim += between_main_dim + self.nodes[child].dim_with_margin(main_axis);
              // There is only one element per cross slot, so the line's
              // cross size is the max over its children.
              cross_dim = cross_dim.max(self.nodes[child].dim_with_margin(cross_axis));
            }
          }
        }
      }

      main_dim += trailing_padding_and_border_main;

      let mut container_cross_axis = available_inner_cross_dim;
      if measure_mode_cross_dim == MeasureMode::Undefined
        || measure_mode_cross_dim == MeasureMode::AtMost
      {
        // The container cross size derives from the children.
        container_cross_axis = style
          .bound_axis(cross_axis, cross_dim + padding_and_border_axis_cross)
          - padding_and_border_axis_cross;

        if measure_mode_cross_dim == MeasureMode::AtMost {
          container_cross_axis = container_cross_axis.min(available_inner_cross_dim);
        }
      }

      // Without wrapping, an exact cross constraint pins the line height.
      if !is_node_flex_wrap && measure_mode_cross_dim == MeasureMode::Exactly {
        cross_dim = available_inner_cross_dim;
      }

      cross_dim = style
        .bound_axis(cross_axis, cross_dim + padding_and_border_axis_cross)
        - padding_and_border_axis_cross;

      // STEP 7: cross-axis alignment. Skipped when only measuring.
      if perform_layout {
        for &child in &child_ids[start_of_line_index..end_of_line_index] {
          let child_style = self.nodes[child].style.clone();

          if child_style.position_type == PositionType::Absolute {
            if child_style.is_leading_position_defined(cross_axis) {
              self.nodes[child].layout.position[cross_axis.position_edge() as usize] =
                child_style.leading_position(cross_axis)
                  + style.leading_border(cross_axis)
                  + child_style.leading_margin(cross_axis);
            } else {
              self.nodes[child].layout.position[cross_axis.position_edge() as usize] =
                leading_padding_and_border_cross + child_style.leading_margin(cross_axis);
            }
          } else {
            let mut leading_cross_dim = leading_padding_and_border_cross;
            let align = align_item(&style, &child_style);

            if align == Align::Stretch {
              // Stretched children are laid out once more with the line's
              // cross size forced on them, unless their cross dimension is
              // already definite.
              let is_cross_size_definite = if is_main_axis_row {
                child_style.is_dim_defined(FlexDirection::Column)
              } else {
                child_style.is_dim_defined(FlexDirection::Row)
              };

              let child_width;
              let child_height;
              if is_main_axis_row {
                child_height = cross_dim;
                child_width = self.nodes[child].layout.measured_dimensions[0]
                  + child_style.margin_axis(FlexDirection::Row);
              } else {
                child_width = cross_dim;
                child_height = self.nodes[child].layout.measured_dimensions[1]
                  + child_style.margin_axis(FlexDirection::Column);
              }

              if !is_cross_size_definite {
                let child_width_measure_mode = if is_undefined(child_width) {
                  MeasureMode::Undefined
                } else {
                  MeasureMode::Exactly
                };
                let child_height_measure_mode = if is_undefined(child_height) {
                  MeasureMode::Undefined
                } else {
                  MeasureMode::Exactly
                };
                self.layout_node(
                  child,
                  child_width,
                  child_height,
                  direction,
                  child_width_measure_mode,
                  child_height_measure_mode,
                  true,
                  LayoutPass::Stretch,
                );
              }
            } else if align != Align::FlexStart {
              let remaining_cross_dim =
                container_cross_axis - self.nodes[child].dim_with_margin(cross_axis);

              if align == Align::Center {
                leading_cross_dim += remaining_cross_dim / 2.0;
              } else {
                leading_cross_dim += remaining_cross_dim;
              }
            }

            self.nodes[child].layout.position[cross_axis.position_edge() as usize] +=
              total_line_cross_dim + leading_cross_dim;
          }
        }
      }

      total_line_cross_dim += cross_dim;
      max_line_main_dim = max_line_main_dim.max(main_dim);

      line_count += 1;
      start_of_line_index = end_of_line_index;
    }

    // STEP 8: multi-line content alignment.
    if line_count > 1 && perform_layout && is_defined(available_inner_cross_dim) {
      let remaining_align_content_dim = available_inner_cross_dim - total_line_cross_dim;

      let mut cross_dim_lead = 0.0f32;
      let mut current_lead = leading_padding_and_border_cross;

      match style.align_content {
        Align::FlexEnd => current_lead += remaining_align_content_dim,
        Align::Center => current_lead += remaining_align_content_dim / 2.0,
        Align::Stretch => {
          if available_inner_cross_dim > total_line_cross_dim {
            cross_dim_lead = remaining_align_content_dim / line_count as f32;
          }
        }
        Align::Auto | Align::FlexStart => {}
      }

      let mut end_index = 0usize;
      for line in 0..line_count {
        let start_index = end_index;

        // Find the line's height and its end index.
        let mut line_height = 0.0f32;
        let mut index = start_index;
        while index < child_count {
          let child = child_ids[index];
          if self.nodes[child].style.position_type == PositionType::Relative {
            if self.nodes[child].line_index != line {
              break;
            }
            if self.nodes[child].is_layout_dim_defined(cross_axis) {
              line_height = line_height.max(
                self.nodes[child].layout.measured_dimensions[cross_axis.dimension() as usize]
                  + self.nodes[child].style.margin_axis(cross_axis),
              );
            }
          }
          index += 1;
        }
        end_index = index;
        line_height += cross_dim_lead;

        if perform_layout {
          for &child in &child_ids[start_index..end_index] {
            let child_style = self.nodes[child].style.clone();
            if child_style.position_type != PositionType::Relative {
              continue;
            }

            let cross_pos = cross_axis.position_edge() as usize;
            let measured_cross =
              self.nodes[child].layout.measured_dimensions[cross_axis.dimension() as usize];

            match align_item(&style, &child_style) {
              Align::FlexStart => {
                self.nodes[child].layout.position[cross_pos] =
                  current_lead + child_style.leading_margin(cross_axis);
              }
              Align::FlexEnd => {
                self.nodes[child].layout.position[cross_pos] = current_lead + line_height
                  - child_style.trailing_margin(cross_axis)
                  - measured_cross;
              }
              Align::Center => {
                self.nodes[child].layout.position[cross_pos] =
                  current_lead + (line_height - measured_cross) / 2.0;
              }
              Align::Stretch => {
                // Stretch within the line only repositions; sizing items
                // with an indefinite cross dimension to the full line
                // height is not supported here.
                self.nodes[child].layout.position[cross_pos] =
                  current_lead + child_style.leading_margin(cross_axis);
              }
              Align::Auto => {}
            }
          }
        }

        current_lead += line_height;
      }
    }

    // STEP 9: final container dimensions.
    self.nodes[node].layout.measured_dimensions = [
      style.bound_axis(FlexDirection::Row, available_width - margin_axis_row),
      style.bound_axis(FlexDirection::Column, available_height - margin_axis_column),
    ];

    let main_dim_index = main_axis.dimension() as usize;
    let cross_dim_index = cross_axis.dimension() as usize;

    if measure_mode_main_dim == MeasureMode::Undefined {
      // Content-sized main axis, clamped to min/max and the padding floor.
      self.nodes[node].layout.measured_dimensions[main_dim_index] =
        style.bound_axis(main_axis, max_line_main_dim);
    } else if measure_mode_main_dim == MeasureMode::AtMost {
      self.nodes[node].layout.measured_dimensions[main_dim_index] =
        (available_inner_main_dim + padding_and_border_axis_main)
          .min(style.bound_axis_within_min_and_max(main_axis, max_line_main_dim))
          .max(padding_and_border_axis_main);
    }

    if measure_mode_cross_dim == MeasureMode::Undefined {
      self.nodes[node].layout.measured_dimensions[cross_dim_index] = style.bound_axis(
        cross_axis,
        total_line_cross_dim + padding_and_border_axis_cross,
      );
    } else if measure_mode_cross_dim == MeasureMode::AtMost {
      self.nodes[node].layout.measured_dimensions[cross_dim_index] =
        (available_inner_cross_dim + padding_and_border_axis_cross)
          .min(style.bound_axis_within_min_and_max(
            cross_axis,
            total_line_cross_dim + padding_and_border_axis_cross,
          ))
          .max(padding_and_border_axis_cross);
    }

    if perform_layout {
      // STEP 10: absolutely positioned children.
      for &child in &absolute_children {
        self.absolute_layout_child(
          node,
          child,
          available_inner_width,
          width_measure_mode,
          direction,
        );
      }

      // STEP 11: trailing positions. On reverse axes the recorded offset is
      // measured from the far edge.
      let needs_main_trailing_pos = main_axis.is_reverse();
      let needs_cross_trailing_pos = cross_axis.is_reverse();

      if needs_main_trailing_pos || needs_cross_trailing_pos {
        for &child in &child_ids {
          if needs_main_trailing_pos {
            self.set_trailing_position(node, child, main_axis);
          }
          if needs_cross_trailing_pos {
            self.set_trailing_position(node, child, cross_axis);
          }
        }
      }
    }
  }
}
