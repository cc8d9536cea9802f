//! Tree pretty-printing through a pluggable logger.
//!
//! The printer renders a node subtree as a nested, JS-object-flavored
//! outline: the computed layout block, the non-default style properties
//! (with equal four-edge sets collapsed into their shorthand), and the
//! children. Output goes through the tree's logger callback so embedders
//! can reroute it; the default logger writes to stdout.

use std::fmt::Write as _;

use crate::style::value::{approx_eq, is_defined, UNDEFINED};
use crate::style::{Align, Edge, FlexDirection, Justify, Overflow, PositionType};
use crate::tree::node::NodeId;
use crate::tree::FlexTree;

/// Sink for pretty-printer output.
pub type Logger = Box<dyn FnMut(&str)>;

/// The default logger: forwards chunks to stdout.
pub(crate) fn stdout_logger() -> Logger {
  Box::new(|text| print!("{text}"))
}

/// Which sections of each node record to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
  /// Computed layout (width/height/top/left).
  pub layout: bool,
  /// Style properties that differ from their defaults.
  pub style: bool,
  /// Recurse into children.
  pub children: bool,
}

impl PrintOptions {
  /// Everything: layout, style, and the whole subtree.
  pub const fn all() -> Self {
    Self {
      layout: true,
      style: true,
      children: true,
    }
  }

  /// Layout numbers only, whole subtree.
  pub const fn layout_only() -> Self {
    Self {
      layout: true,
      style: false,
      children: true,
    }
  }
}

impl Default for PrintOptions {
  fn default() -> Self {
    Self::all()
  }
}

fn indent(out: &mut String, level: u32) {
  for _ in 0..level {
    out.push_str("  ");
  }
}

fn number_if_not_zero(out: &mut String, label: &str, value: f32) {
  if !approx_eq(value, 0.0) {
    let _ = write!(out, "{label}: {value}, ");
  }
}

fn number_if_not_undefined(out: &mut String, label: &str, value: f32) {
  if is_defined(value) {
    let _ = write!(out, "{label}: {value}, ");
  }
}

impl FlexTree {
  /// Renders the subtree rooted at `node` and sends it through the logger.
  pub fn print_node(&mut self, node: NodeId, options: PrintOptions) {
    let mut out = String::new();
    self.format_node(&mut out, node, options, 0);
    (self.logger)(&out);
  }

  fn format_node(&self, out: &mut String, node: NodeId, options: PrintOptions, level: u32) {
    indent(out, level);
    out.push('{');

    let data = &self.nodes[node];
    if let Some(print) = &data.print {
      out.push_str(&print());
    }

    if options.layout {
      let layout = &data.layout;
      let _ = write!(
        out,
        "layout: {{width: {}, height: {}, top: {}, left: {}}}, ",
        layout.dimensions[0],
        layout.dimensions[1],
        layout.position[Edge::Top as usize],
        layout.position[Edge::Left as usize],
      );
    }

    if options.style {
      self.format_style(out, node);
    }

    let child_count = data.children.len();
    if options.children && child_count > 0 {
      out.push_str("children: [\n");
      for &child in &data.children {
        self.format_node(out, child, options, level + 1);
      }
      indent(out, level);
      out.push_str("]},\n");
    } else {
      out.push_str("},\n");
    }
  }

  fn format_style(&self, out: &mut String, node: NodeId) {
    let style = &self.nodes[node].style;

    let flex_direction = match style.flex_direction {
      FlexDirection::Column => "column",
      FlexDirection::ColumnReverse => "column-reverse",
      FlexDirection::Row => "row",
      FlexDirection::RowReverse => "row-reverse",
    };
    let _ = write!(out, "flexDirection: '{flex_direction}', ");

    match style.justify_content {
      Justify::Center => out.push_str("justifyContent: 'center', "),
      Justify::FlexEnd => out.push_str("justifyContent: 'flex-end', "),
      Justify::SpaceAround => out.push_str("justifyContent: 'space-around', "),
      Justify::SpaceBetween => out.push_str("justifyContent: 'space-between', "),
      Justify::FlexStart => {}
    }

    match style.align_items {
      Align::Center => out.push_str("alignItems: 'center', "),
      Align::FlexEnd => out.push_str("alignItems: 'flex-end', "),
      Align::Stretch => out.push_str("alignItems: 'stretch', "),
      Align::FlexStart | Align::Auto => {}
    }

    match style.align_content {
      Align::Center => out.push_str("alignContent: 'center', "),
      Align::FlexEnd => out.push_str("alignContent: 'flex-end', "),
      Align::Stretch => out.push_str("alignContent: 'stretch', "),
      Align::FlexStart | Align::Auto => {}
    }

    match style.align_self {
      Align::FlexStart => out.push_str("alignSelf: 'flex-start', "),
      Align::Center => out.push_str("alignSelf: 'center', "),
      Align::FlexEnd => out.push_str("alignSelf: 'flex-end', "),
      Align::Stretch => out.push_str("alignSelf: 'stretch', "),
      Align::Auto => {}
    }

    number_if_not_undefined(out, "flexGrow", style.flex_grow);
    number_if_not_undefined(out, "flexShrink", style.flex_shrink);
    number_if_not_undefined(out, "flexBasis", style.flex_basis);

    match style.overflow {
      Overflow::Hidden => out.push_str("overflow: 'hidden', "),
      Overflow::Visible => out.push_str("overflow: 'visible', "),
      Overflow::Scroll => out.push_str("overflow: 'scroll', "),
    }

    if style.margin.all_physical_equal() {
      number_if_not_zero(out, "margin", style.margin.resolve(Edge::Left, 0.0));
    } else {
      number_if_not_zero(out, "marginLeft", style.margin.resolve(Edge::Left, 0.0));
      number_if_not_zero(out, "marginRight", style.margin.resolve(Edge::Right, 0.0));
      number_if_not_zero(out, "marginTop", style.margin.resolve(Edge::Top, 0.0));
      number_if_not_zero(out, "marginBottom", style.margin.resolve(Edge::Bottom, 0.0));
      number_if_not_zero(out, "marginStart", style.margin.resolve(Edge::Start, 0.0));
      number_if_not_zero(out, "marginEnd", style.margin.resolve(Edge::End, 0.0));
    }

    if style.padding.all_physical_equal() {
      number_if_not_zero(out, "padding", style.padding.resolve(Edge::Left, 0.0));
    } else {
      number_if_not_zero(out, "paddingLeft", style.padding.resolve(Edge::Left, 0.0));
      number_if_not_zero(out, "paddingRight", style.padding.resolve(Edge::Right, 0.0));
      number_if_not_zero(out, "paddingTop", style.padding.resolve(Edge::Top, 0.0));
      number_if_not_zero(out, "paddingBottom", style.padding.resolve(Edge::Bottom, 0.0));
      number_if_not_zero(out, "paddingStart", style.padding.resolve(Edge::Start, 0.0));
      number_if_not_zero(out, "paddingEnd", style.padding.resolve(Edge::End, 0.0));
    }

    if style.border.all_physical_equal() {
      number_if_not_zero(out, "borderWidth", style.border.resolve(Edge::Left, 0.0));
    } else {
      number_if_not_zero(out, "borderLeftWidth", style.border.resolve(Edge::Left, 0.0));
      number_if_not_zero(out, "borderRightWidth", style.border.resolve(Edge::Right, 0.0));
      number_if_not_zero(out, "borderTopWidth", style.border.resolve(Edge::Top, 0.0));
      number_if_not_zero(out, "borderBottomWidth", style.border.resolve(Edge::Bottom, 0.0));
      number_if_not_zero(out, "borderStartWidth", style.border.resolve(Edge::Start, 0.0));
      number_if_not_zero(out, "borderEndWidth", style.border.resolve(Edge::End, 0.0));
    }

    number_if_not_undefined(out, "width", style.dimensions[0]);
    number_if_not_undefined(out, "height", style.dimensions[1]);
    number_if_not_undefined(out, "maxWidth", style.max_dimensions[0]);
    number_if_not_undefined(out, "maxHeight", style.max_dimensions[1]);
    number_if_not_undefined(out, "minWidth", style.min_dimensions[0]);
    number_if_not_undefined(out, "minHeight", style.min_dimensions[1]);

    if style.position_type == PositionType::Absolute {
      out.push_str("position: 'absolute', ");
    }

    number_if_not_undefined(out, "left", style.position.resolve(Edge::Left, UNDEFINED));
    number_if_not_undefined(out, "right", style.position.resolve(Edge::Right, UNDEFINED));
    number_if_not_undefined(out, "top", style.position.resolve(Edge::Top, UNDEFINED));
    number_if_not_undefined(out, "bottom", style.position.resolve(Edge::Bottom, UNDEFINED));
  }
}
