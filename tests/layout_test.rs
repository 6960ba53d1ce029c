//! Integration tests for the layout engine.

use rstest::{fixture, rstest};

use mindmap_core::application::services::{layout, size_topic, PositionedNode, Spacing, TextMetrics};
use mindmap_core::domain::{Side, TopicId, TopicNode};
use mindmap_core::infrastructure::MonospaceMeasure;

const EPS: f64 = 1e-9;

fn fixed(width: f64) -> impl Fn(&str, f64) -> TextMetrics {
    move |_: &str, _: f64| TextMetrics { width }
}

#[fixture]
fn spacing() -> Spacing {
    Spacing::default()
}

/// Two branches per side, one of them with children.
fn balanced_tree() -> TopicNode {
    TopicNode::new("root", "Central Topic")
        .with_child(
            TopicNode::new("l1", "left one")
                .with_side(Side::Left)
                .with_child(TopicNode::new("l1a", "left one a"))
                .with_child(TopicNode::new("l1b", "left one b")),
        )
        .with_child(TopicNode::new("r1", "right one").with_side(Side::Right))
        .with_child(TopicNode::new("l2", "left two").with_side(Side::Left))
        .with_child(
            TopicNode::new("r2", "right two")
                .with_side(Side::Right)
                .with_child(TopicNode::new("r2a", "right two a"))
                .with_child(TopicNode::new("r2b", "right two b"))
                .with_child(TopicNode::new("r2c", "right two c")),
        )
}

fn node<'a>(root: &'a PositionedNode, id: &str) -> &'a PositionedNode {
    root.find(&TopicId::from(id)).expect("topic is laid out")
}

// ============================================================
// Sizing
// ============================================================

#[rstest]
#[case::narrow(50.0, 1)]
#[case::exact(200.0, 1)]
#[case::just_over(201.0, 2)]
#[case::triple(600.0, 3)]
fn given_measured_width_when_sizing_then_wraps_at_max_width(
    spacing: Spacing,
    #[case] width: f64,
    #[case] lines: u32,
) {
    let size = size_topic("t", &fixed(width), &spacing);
    assert_eq!(size.lines, lines);
    assert_eq!(size.content_width, width.min(spacing.max_topic_width));
    let expected = spacing
        .min_topic_height
        .max(spacing.font_size * spacing.line_height * f64::from(lines));
    assert!((size.content_height - expected).abs() < EPS);
}

#[rstest]
fn given_three_lines_when_sizing_then_height_exceeds_minimum(spacing: Spacing) {
    let size = size_topic("t", &fixed(3.0 * spacing.max_topic_width), &spacing);
    assert_eq!(size.lines, 3);
    assert!((size.content_height - 58.8).abs() < 1e-6);
}

#[rstest]
fn given_topic_when_laid_out_then_box_includes_gaps(spacing: Spacing) {
    let out = layout(&balanced_tree(), &fixed(80.0), &spacing);
    let leaf = node(&out, "r1");
    assert_eq!(leaf.hgap, spacing.padding);
    assert_eq!(leaf.vgap, 0.0);
    assert_eq!(leaf.width, 80.0 + 2.0 * spacing.padding);
    assert_eq!(leaf.height, spacing.min_topic_height + 4.0 * spacing.padding);

    let parent = node(&out, "r2");
    assert_eq!(parent.vgap, spacing.padding);
}

// ============================================================
// Placement
// ============================================================

#[rstest]
fn given_same_input_when_laid_out_twice_then_output_is_identical(spacing: Spacing) {
    let measure = MonospaceMeasure::new(0.6);
    let first = layout(&balanced_tree(), &measure, &spacing);
    let second = layout(&balanced_tree(), &measure, &spacing);
    assert_eq!(first, second);
}

#[rstest]
fn given_tree_when_laid_out_then_root_is_at_origin(spacing: Spacing) {
    let out = layout(&balanced_tree(), &fixed(80.0), &spacing);
    assert_eq!((out.x, out.y), (0.0, 0.0));
    assert_eq!(out.depth, 0);
    assert_eq!(out.side, None);
}

#[rstest]
fn given_two_sided_tree_when_laid_out_then_sides_fan_out(spacing: Spacing) {
    let out = layout(&balanced_tree(), &MonospaceMeasure::new(0.6), &spacing);
    for n in out.iter().skip(1) {
        match n.side {
            Some(Side::Left) => assert!(n.right() < out.x, "{} not left of root", n.id),
            Some(Side::Right) => assert!(n.x > out.right(), "{} not right of root", n.id),
            None => panic!("{} has no side", n.id),
        }
    }
}

#[rstest]
fn given_tree_when_laid_out_then_children_keep_document_order(spacing: Spacing) {
    let out = layout(&balanced_tree(), &fixed(80.0), &spacing);
    let ids: Vec<_> = out.children.iter().map(|c| c.id.to_string()).collect();
    assert_eq!(ids, vec!["l1", "r1", "l2", "r2"]);
    let depths: Vec<_> = out.iter().map(|n| n.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 2, 1, 1, 1, 2, 2, 2]);
}

#[rstest]
fn given_nested_topics_when_laid_out_then_depth_offset_separates_levels(spacing: Spacing) {
    let out = layout(&balanced_tree(), &fixed(80.0), &spacing);

    let r2 = node(&out, "r2");
    assert!((r2.x - (out.right() + spacing.depth_offset)).abs() < EPS);
    assert!((node(&out, "r2a").x - (r2.right() + spacing.depth_offset)).abs() < EPS);

    let l1 = node(&out, "l1");
    assert!((l1.right() - (out.x - spacing.depth_offset)).abs() < EPS);
    assert!((node(&out, "l1a").right() - (l1.x - spacing.depth_offset)).abs() < EPS);
}

#[rstest]
fn given_siblings_when_laid_out_then_subtrees_do_not_overlap(spacing: Spacing) {
    let out = layout(&balanced_tree(), &fixed(80.0), &spacing);
    let r2 = node(&out, "r2");
    for pair in r2.children.windows(2) {
        assert!(pair[0].bottom() <= pair[1].y + EPS);
    }
    let (r1, r2) = (node(&out, "r1"), node(&out, "r2"));
    let r2_top = r2.iter().map(|n| n.y).fold(f64::INFINITY, f64::min);
    assert!(r1.bottom() <= r2_top + EPS);
}

#[rstest]
fn given_parent_with_children_when_laid_out_then_parent_is_vertically_centered(spacing: Spacing) {
    let out = layout(&balanced_tree(), &fixed(80.0), &spacing);
    let r2 = node(&out, "r2");
    let first = &r2.children[0];
    let last = &r2.children[2];
    let span_center = (first.y + last.bottom()) / 2.0;
    assert!((r2.y + r2.height / 2.0 - span_center).abs() < EPS);
}

#[rstest]
fn given_root_without_children_when_laid_out_then_only_root_is_placed(spacing: Spacing) {
    let root = TopicNode::new("root", "alone");
    let out = layout(&root, &fixed(40.0), &spacing);
    assert!(out.children.is_empty());
    assert_eq!((out.x, out.y), (0.0, 0.0));
    assert_eq!(out.width, 40.0 + 2.0 * spacing.padding);
}

#[rstest]
fn given_unsided_root_children_when_laid_out_then_first_half_goes_right(spacing: Spacing) {
    let root = TopicNode::new("root", "root")
        .with_child(TopicNode::new("a", "a"))
        .with_child(TopicNode::new("b", "b"))
        .with_child(TopicNode::new("c", "c"));
    let out = layout(&root, &fixed(40.0), &spacing);
    let sides: Vec<_> = out.children.iter().map(|c| c.side).collect();
    assert_eq!(sides, vec![Some(Side::Right), Some(Side::Right), Some(Side::Left)]);
}
