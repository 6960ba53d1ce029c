//! Integration tests for tree lookups, side balancing and topic creation.

use rstest::rstest;

use mindmap_core::domain::walker::{
    balanced_side, create_topic, default_root, get_descendants, get_node, get_parent_node,
    normalize_topic_side,
};
use mindmap_core::domain::{Side, TopicId, TopicNode, TopicTreeConvert};

fn sample_tree() -> TopicNode {
    TopicNode::new("root", "root")
        .with_child(
            TopicNode::new("a", "a")
                .with_side(Side::Left)
                .with_child(TopicNode::new("a1", "a1").with_child(TopicNode::new("a11", "a11")))
                .with_child(TopicNode::new("a2", "a2")),
        )
        .with_child(TopicNode::new("b", "b").with_side(Side::Right))
}

#[rstest]
#[case("root", Some("root"))]
#[case("a11", Some("a11"))]
#[case("b", Some("b"))]
#[case("missing", None)]
fn given_id_when_get_node_then_finds_matching_topic(
    #[case] id: &str,
    #[case] expected: Option<&str>,
) {
    let root = sample_tree();
    let found = get_node(&root, &id.into()).map(|n| n.id.to_string());
    assert_eq!(found.as_deref(), expected);
}

#[rstest]
#[case("a11", Some("a1"))]
#[case("a", Some("root"))]
#[case("root", None)]
#[case("missing", None)]
fn given_id_when_get_parent_node_then_returns_direct_parent(
    #[case] id: &str,
    #[case] expected: Option<&str>,
) {
    let root = sample_tree();
    let parent = get_parent_node(&root, &id.into()).map(|n| n.id.to_string());
    assert_eq!(parent.as_deref(), expected);
}

#[test]
fn given_subtree_when_get_descendants_then_returns_preorder_without_self() {
    let root = sample_tree();
    let a = get_node(&root, &"a".into()).expect("a exists");
    let ids: Vec<_> = get_descendants(a).iter().map(|n| n.id.to_string()).collect();
    assert_eq!(ids, vec!["a1", "a11", "a2"]);
    assert!(get_descendants(get_node(&root, &"b".into()).expect("b exists")).is_empty());
}

#[rstest]
#[case::empty(0, 0, Side::Right)]
#[case::one_right(0, 1, Side::Left)]
#[case::one_left(1, 0, Side::Right)]
#[case::even(1, 1, Side::Right)]
#[case::right_heavy(1, 2, Side::Left)]
#[case::left_heavy(2, 1, Side::Right)]
fn given_side_counts_when_balancing_then_picks_side(
    #[case] left: usize,
    #[case] right: usize,
    #[case] expected: Side,
) {
    let mut root = TopicNode::new("root", "root");
    for i in 0..left {
        root = root.with_child(TopicNode::new(format!("l{i}"), "l").with_side(Side::Left));
    }
    for i in 0..right {
        root = root.with_child(TopicNode::new(format!("r{i}"), "r").with_side(Side::Right));
    }
    assert_eq!(balanced_side(&root), expected);
}

#[test]
fn given_title_when_create_topic_then_returns_leaf_with_fresh_id() {
    let first = create_topic("idea");
    let second = create_topic("idea");
    assert_eq!(first.title, "idea");
    assert!(first.is_leaf());
    assert_eq!(first.side, None);
    assert_ne!(first.id, second.id);
}

#[test]
fn given_title_when_default_root_then_has_one_main_topic_per_side() {
    let root = default_root("Central Topic");
    assert_eq!(root.title, "Central Topic");
    let children: Vec<_> = root.children().map(|c| (c.title.as_str(), c.side)).collect();
    assert_eq!(
        children,
        vec![
            ("main topic 1", Some(Side::Left)),
            ("main topic 2", Some(Side::Right))
        ]
    );
}

#[test]
fn given_sided_root_when_normalizing_then_root_side_is_cleared() {
    let mut root = sample_tree().with_side(Side::Left);
    normalize_topic_side(&mut root);
    assert_eq!(root.side, None);
    assert_eq!(get_node(&root, &TopicId::from("a")).and_then(|n| n.side), Some(Side::Left));
}

#[test]
fn given_tree_when_rendered_then_outline_is_nested() {
    let rendered = sample_tree().to_tree_string().to_string();
    let lines: Vec<_> = rendered.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("root"));
    assert!(lines.iter().any(|l| l.contains("a11 (a11)")));
}
