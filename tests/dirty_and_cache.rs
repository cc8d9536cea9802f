//! Dirty propagation, relayout and invariant coverage: every layout leaves
//! the tree clean, repeated layouts are idempotent, and measured dimensions
//! respect padding floors and min/max clamps.

use flexlay::{Direction, Edge, FlexDirection, FlexTree, NodeId, UNDEFINED};

fn assert_feq(actual: f32, expected: f32) {
  assert!(
    (actual - expected).abs() < 0.001,
    "expected {expected}, got {actual}"
  );
}

fn collect(tree: &FlexTree, root: NodeId) -> Vec<NodeId> {
  let mut result = vec![root];
  let mut index = 0;
  while index < result.len() {
    let node = result[index];
    for i in 0..tree.child_count(node) {
      if let Some(child) = tree.child_at(node, i) {
        result.push(child);
      }
    }
    index += 1;
  }
  result
}

fn build_row(tree: &mut FlexTree, widths: &[f32]) -> (NodeId, Vec<NodeId>) {
  let root = tree.new_node();
  tree.set_flex_direction(root, FlexDirection::Row);
  tree.set_width(root, 300.0);
  tree.set_height(root, 100.0);
  let children = widths
    .iter()
    .map(|&w| {
      let child = tree.new_node();
      tree.set_width(child, w);
      tree.set_height(child, 50.0);
      tree.add_child(root, child);
      child
    })
    .collect();
  (root, children)
}

#[test]
fn layout_leaves_every_node_clean_and_fresh() {
  let mut tree = FlexTree::new();
  let (root, children) = build_row(&mut tree, &[50.0, 60.0]);
  let grandchild = tree.new_node();
  tree.set_height(grandchild, 10.0);
  tree.add_child(children[0], grandchild);

  assert!(tree.is_dirty(root));
  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);

  for node in collect(&tree, root) {
    assert!(!tree.is_dirty(node), "node left dirty after layout");
    assert!(tree.has_new_layout(node), "node missing fresh layout flag");
  }
}

#[test]
fn relayout_with_identical_inputs_is_idempotent() {
  let mut tree = FlexTree::new();
  let (root, _) = build_row(&mut tree, &[50.0, 60.0, 70.0]);

  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
  let before: Vec<(f32, f32, f32, f32)> = collect(&tree, root)
    .iter()
    .map(|&n| {
      let l = tree.layout(n);
      (l.left(), l.top(), l.width(), l.height())
    })
    .collect();

  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
  let after: Vec<(f32, f32, f32, f32)> = collect(&tree, root)
    .iter()
    .map(|&n| {
      let l = tree.layout(n);
      (l.left(), l.top(), l.width(), l.height())
    })
    .collect();

  assert_eq!(before, after);
}

#[test]
fn style_mutations_dirty_the_ancestor_chain() {
  let mut tree = FlexTree::new();
  let (root, children) = build_row(&mut tree, &[50.0, 60.0]);
  let grandchild = tree.new_node();
  tree.add_child(children[1], grandchild);

  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
  assert!(!tree.is_dirty(root));

  tree.set_width(grandchild, 25.0);
  assert!(tree.is_dirty(grandchild));
  assert!(tree.is_dirty(children[1]));
  assert!(tree.is_dirty(root));
  // Siblings are untouched.
  assert!(!tree.is_dirty(children[0]));
}

#[test]
fn changed_styles_are_reflected_after_relayout() {
  let mut tree = FlexTree::new();
  let (root, children) = build_row(&mut tree, &[50.0, 60.0]);

  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
  assert_feq(tree.layout(children[1]).left(), 50.0);

  tree.set_width(children[0], 80.0);
  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
  assert_feq(tree.layout(children[0]).width(), 80.0);
  assert_feq(tree.layout(children[1]).left(), 80.0);
}

#[test]
fn removing_a_child_reflows_its_siblings() {
  let mut tree = FlexTree::new();
  let (root, children) = build_row(&mut tree, &[50.0, 60.0]);

  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
  assert_feq(tree.layout(children[1]).left(), 50.0);

  tree.remove_child(root, children[0]);
  assert!(tree.is_dirty(root));
  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
  assert_feq(tree.layout(children[1]).left(), 0.0);
  tree.free(children[0]);
  assert_eq!(tree.node_count(), 2);
}

#[test]
fn measured_dimensions_respect_padding_floor_and_clamps() {
  let mut tree = FlexTree::new();
  let root = tree.new_node();
  tree.set_flex_direction(root, FlexDirection::Row);
  tree.set_width(root, 300.0);
  tree.set_height(root, 100.0);

  // Width 10 but padding 15 per side: the padding floor wins.
  let padded = tree.new_node();
  tree.set_width(padded, 10.0);
  tree.set_height(padded, 40.0);
  tree.set_padding(padded, Edge::All, 15.0);
  tree.add_child(root, padded);

  // Width 20 under a 60 minimum.
  let clamped_up = tree.new_node();
  tree.set_width(clamped_up, 20.0);
  tree.set_height(clamped_up, 40.0);
  tree.set_min_width(clamped_up, 60.0);
  tree.add_child(root, clamped_up);

  // Width 500 over a 100 maximum.
  let clamped_down = tree.new_node();
  tree.set_width(clamped_down, 500.0);
  tree.set_height(clamped_down, 40.0);
  tree.set_max_width(clamped_down, 100.0);
  tree.add_child(root, clamped_down);

  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);

  assert_feq(tree.layout(padded).width(), 30.0);
  assert_feq(tree.layout(clamped_up).width(), 60.0);
  assert_feq(tree.layout(clamped_down).width(), 100.0);

  // Every node is at least as large as its padding and border.
  for node in collect(&tree, root) {
    let style = tree.style(node);
    let layout = tree.layout(node);
    assert!(layout.measured_width() >= style.padding_and_border_axis(FlexDirection::Row) - 0.001);
    assert!(
      layout.measured_height() >= style.padding_and_border_axis(FlexDirection::Column) - 0.001
    );
  }
}

#[test]
fn has_new_layout_can_be_acknowledged_and_rearms() {
  let mut tree = FlexTree::new();
  let (root, _) = build_row(&mut tree, &[50.0]);

  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
  assert!(tree.has_new_layout(root));

  tree.set_has_new_layout(root, false);
  assert!(!tree.has_new_layout(root));

  tree.compute_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr);
  assert!(tree.has_new_layout(root));
}

#[test]
fn independent_trees_do_not_interfere() {
  let mut first = FlexTree::new();
  let (first_root, _) = build_row(&mut first, &[50.0]);
  let mut second = FlexTree::new();
  let (second_root, _) = build_row(&mut second, &[70.0]);

  first.compute_layout(first_root, UNDEFINED, UNDEFINED, Direction::Ltr);
  second.compute_layout(second_root, UNDEFINED, UNDEFINED, Direction::Ltr);
  first.compute_layout(first_root, UNDEFINED, UNDEFINED, Direction::Ltr);

  assert_feq(first.layout(first_root).width(), 300.0);
  assert_feq(second.layout(second_root).width(), 300.0);
}
