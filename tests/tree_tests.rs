use newick_arena::model::{Tree, TreeBuilder};
use newick_arena::{ParsingError, parse_str};

const NESTED: &str = "((B:0.2,(C:0.3,D:0.4)E:0.5)F:0.1)A;";

// --- TESTS LOOKUP ---
#[test]
fn test_find_by_label() {
    let tree = parse_str(NESTED).unwrap();

    let e = tree.find("E").unwrap();
    assert_eq!(e.label(), "E");
    assert_eq!(e.length(), Some(0.5));
    assert_eq!(e.children().len(), 2);
    assert_eq!(tree.find_index("E").unwrap(), e.index());
}

#[test]
fn test_find_absent_label() {
    let tree = parse_str(NESTED).unwrap();

    let err = tree.find("Z").unwrap_err();
    assert!(matches!(&err, ParsingError::LabelNotFound(label) if label == "Z"));
    assert_eq!(err.to_string(), "No node labelled \"Z\"");
    // Every node is labelled, so there is no match for the empty label either
    assert!(tree.find_index("").is_err());
}

#[test]
fn test_find_returns_first_in_closure_order() {
    // Both leaves are labelled "X"; the one closed first wins
    let tree = parse_str("((X:1,Y)Z,X:2);").unwrap();
    assert_eq!(tree.find("X").unwrap().length(), Some(1.0));
}

#[test]
fn test_find_in_empty_tree() {
    let tree = Tree::new();
    assert!(matches!(tree.find("A"), Err(ParsingError::LabelNotFound(_))));
}

// --- TESTS RENDERING ---
#[test]
fn test_render_subtree() {
    let tree = parse_str(NESTED).unwrap();
    let e = tree.find_index("E").unwrap();

    assert_eq!(tree.to_newick_at(e), "(C:0.3,D:0.4)E:0.5");
    assert_eq!(tree.to_newick_at(tree.find_index("C").unwrap()), "C:0.3");
}

#[test]
fn test_render_tree() {
    let tree = parse_str(NESTED).unwrap();

    assert_eq!(tree.to_newick(), NESTED);
    assert_eq!(tree.to_string(), NESTED);
    assert_eq!(format!("{tree}"), NESTED);
}

#[test]
fn test_render_drops_whitespace_and_comments() {
    let tree = parse_str("( A : 1.0 , B [note] ) C ;").unwrap();
    assert_eq!(tree.to_newick(), "(A:1,B)C;");
}

#[test]
fn test_render_empty_tree() {
    assert_eq!(Tree::new().to_newick(), "");
    assert_eq!(Tree::default().to_string(), "");
}

#[test]
fn test_round_trip() {
    let newick = "((Kea:1.5,Kaka:2.25)Nestor:0.5,(Kiwi:0,Moa:10)Ratites,Takahe);";
    let tree = parse_str(newick).unwrap();
    let reparsed = parse_str(tree.to_newick()).unwrap();

    assert_eq!(reparsed, tree);
    assert_eq!(reparsed.to_newick(), newick);
}

// --- TESTS STATISTICS ---
#[test]
fn test_counts() {
    let tree = parse_str(NESTED).unwrap();

    assert_eq!(tree.len(), 6);
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 3);
    let leaves: Vec<&str> = tree.leaves().map(|n| n.label()).collect();
    assert_eq!(leaves, ["B", "C", "D"]);
}

#[test]
fn test_labels_skip_unlabelled() {
    let tree = parse_str("((A,B),(C,));").unwrap();
    let labels: Vec<&str> = tree.labels().collect();
    assert_eq!(labels, ["A", "B", "C"]);
}

#[test]
fn test_branch_length_statistics() {
    let tree = parse_str(NESTED).unwrap();

    assert!((tree.total_branch_length() - 1.5).abs() < 1e-12);
    assert!(tree.nodes_have_branch_lengths());

    let partial = parse_str("((A:1,B)C:2,D:3);").unwrap();
    assert!(!partial.nodes_have_branch_lengths());
    assert_eq!(partial.total_branch_length(), 6.0);
}

#[test]
fn test_depth_and_distance() {
    let tree = parse_str(NESTED).unwrap();
    let c = tree.find_index("C").unwrap();
    let root = tree.root_index().unwrap();

    assert_eq!(tree.depth_of(c), 3);
    assert_eq!(tree.depth_of(root), 0);
    assert_eq!(tree.depth_of(tree.len()), 0);

    // 0.3 (C) + 0.5 (E) + 0.1 (F)
    assert!((tree.distance_to_root(c) - 0.9).abs() < 1e-12);
    assert_eq!(tree.distance_to_root(root), 0.0);
}

#[test]
fn test_node_accessors() {
    let tree = parse_str(NESTED).unwrap();

    for (i, node) in tree.nodes().iter().enumerate() {
        assert_eq!(node.index(), i);
        assert_eq!(tree.node(i), Some(node));
    }
    assert!(tree.node(tree.len()).is_none());

    let root = tree.root().unwrap();
    assert!(root.is_root());
    assert!(!root.is_leaf());
    assert_eq!(root.label(), "A");
    assert_eq!(tree.root_index(), Some(tree.len() - 1));
}

// --- TESTS VALIDITY ---
#[test]
fn test_parsed_trees_are_valid() {
    for newick in [NESTED, "", "A;", "(A,B),C", "(((A)));", "((A,B,C),(D,(E,F)));"] {
        let tree = parse_str(newick).unwrap();
        assert!(tree.is_valid(), "invalid tree for {newick:?}");
    }
}

// --- TESTS TREE BUILDER ---
#[test]
fn test_builder_closure_order() {
    let mut builder = TreeBuilder::with_capacity(5);
    builder.open_child(); // root
    builder.open_child(); // first child
    builder.push_label("A");
    builder.set_length(1.0);
    assert_eq!(builder.depth(), 2);
    builder.close_and_open_sibling();
    builder.push_label("B");
    builder.push_comment("note");
    builder.close();
    builder.push_label("R");
    assert_eq!(builder.num_nodes(), 3);
    assert_eq!(builder.current().map(|node| node.label()), Some("R"));

    let tree = builder.finish();

    let labels: Vec<&str> = tree.nodes().iter().map(|n| n.label()).collect();
    assert_eq!(labels, ["A", "B", "R"]);
    assert_eq!(tree.root().unwrap().children(), [0, 1]);
    assert_eq!(tree[1].comment(), "note");
    assert!(tree.is_valid());
}

#[test]
fn test_builder_implicit_root() {
    let mut builder = TreeBuilder::new();
    builder.open_child();
    builder.push_label("A");
    builder.close_and_open_sibling();
    builder.push_label("B");

    let tree = builder.finish();

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.to_newick(), "(A,B);");
    assert!(tree.is_valid());
}

#[test]
fn test_builder_without_frames() {
    let mut builder = TreeBuilder::new();
    assert!(!builder.has_open_frames());
    assert!(builder.close().is_none());
    assert!(builder.close_and_open_sibling().is_none());

    // No frame, nothing to label
    builder.push_label("ignored");
    let tree = builder.finish();
    assert!(tree.is_empty());
}

#[test]
fn test_builder_reopening_top_level_keeps_single_root() {
    let mut builder = TreeBuilder::new();
    builder.open_child();
    builder.push_label("A");
    builder.close();
    builder.open_child();
    builder.push_label("B");
    builder.close();
    builder.open_child();
    builder.push_label("C");

    let tree = builder.finish();

    assert_eq!(tree.len(), 4);
    assert_eq!(tree.to_newick(), "(A,B,C);");
    assert_eq!(tree.root().unwrap().children().len(), 3);
    assert!(tree.is_valid());
}
