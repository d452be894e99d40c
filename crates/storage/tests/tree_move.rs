#![forbid(unsafe_code)]

mod common;

use common::{
    assert_well_formed, id_of, insert, leaf, node, open_store, outline, outline_of, raw_rows,
};
use ut_storage::{MoveSubtreeRequest, NodeId, SqliteStore, StoreError};

fn move_before(store: &mut SqliteStore, node_id: NodeId, move_before: Option<NodeId>) {
    store
        .move_subtree(MoveSubtreeRequest {
            node_id,
            move_before,
        })
        .expect("move should succeed");
}

fn sample_forest(store: &mut SqliteStore) {
    insert(
        store,
        node(
            "p",
            vec![node("c1", vec![leaf("g1"), leaf("g2")]), leaf("c2")],
        ),
        None,
    );
    insert(store, node("q", vec![leaf("d1")]), None);
}

#[test]
fn move_into_own_subtree_is_rejected() {
    let (dir, mut store) = open_store();
    sample_forest(&mut store);
    let before = raw_rows(dir.path());
    let p = id_of(&store, "p");

    for target in ["c1", "g2", "c2"] {
        let err = store
            .move_subtree(MoveSubtreeRequest {
                node_id: p,
                move_before: Some(id_of(&store, target)),
            })
            .expect_err("a node cannot move under itself");
        assert!(matches!(err, StoreError::InvalidMove { node_id } if node_id == p));
        assert_eq!(err.code(), "INVALID_MOVE");
    }

    assert_eq!(raw_rows(dir.path()), before);
}

#[test]
fn move_under_other_parent_shifts_depths() {
    let (dir, mut store) = open_store();
    sample_forest(&mut store);

    let c1 = id_of(&store, "c1");
    let d1 = id_of(&store, "d1");
    move_before(&mut store, c1, Some(d1));

    assert_eq!(
        outline(&store),
        outline_of(&[
            ("p", 0),
            ("c2", 1),
            ("q", 0),
            ("c1", 1),
            ("g1", 2),
            ("g2", 2),
            ("d1", 1),
        ])
    );
    let parent = store.parent_of(c1).expect("parent").expect("c1 has a parent");
    assert_eq!(parent.title, "q");
    assert_well_formed(dir.path());

    let g1 = id_of(&store, "g1");
    let q = id_of(&store, "q");
    move_before(&mut store, g1, Some(q));
    assert_eq!(store.get_node(g1).expect("g1").depth, 0);
    assert_eq!(store.parent_of(g1).expect("parent"), None);
    assert_well_formed(dir.path());
}

#[test]
fn move_to_end_of_forest() {
    let (dir, mut store) = open_store();
    sample_forest(&mut store);

    let c1 = id_of(&store, "c1");
    move_before(&mut store, c1, None);

    assert_eq!(
        outline(&store),
        outline_of(&[
            ("p", 0),
            ("c2", 1),
            ("q", 0),
            ("d1", 1),
            ("c1", 0),
            ("g1", 1),
            ("g2", 1),
        ])
    );
    assert_well_formed(dir.path());
}

#[test]
fn moving_last_child_clears_former_parent_flag() {
    let (dir, mut store) = open_store();
    sample_forest(&mut store);
    let q = id_of(&store, "q");
    assert!(store.get_node(q).expect("q").has_children);

    let d1 = id_of(&store, "d1");
    let c2 = id_of(&store, "c2");
    move_before(&mut store, d1, Some(c2));

    assert!(!store.get_node(q).expect("q").has_children);
    let children: Vec<String> = store
        .children_of(Some(id_of(&store, "p")))
        .expect("children")
        .into_iter()
        .map(|node| node.title)
        .collect();
    assert_eq!(children, vec!["c1", "d1", "c2"]);
    assert_well_formed(dir.path());
}

#[test]
fn move_into_leaf_sets_new_parent_flag() {
    let (dir, mut store) = open_store();
    insert(&mut store, node("p", vec![leaf("a")]), None);
    insert(&mut store, leaf("b"), None);
    let p = id_of(&store, "p");
    let a = id_of(&store, "a");
    let b = id_of(&store, "b");

    move_before(&mut store, p, Some(b));
    move_before(&mut store, b, Some(a));

    assert_eq!(
        outline(&store),
        outline_of(&[("p", 0), ("b", 1), ("a", 1)])
    );
    assert!(store.get_node(p).expect("p").has_children);
    assert_well_formed(dir.path());
}

#[test]
fn move_next_to_itself_keeps_order() {
    let (dir, mut store) = open_store();
    sample_forest(&mut store);
    let expected = outline(&store);

    let c1 = id_of(&store, "c1");
    move_before(&mut store, c1, Some(c1));
    assert_eq!(outline(&store), expected);

    let c2 = id_of(&store, "c2");
    move_before(&mut store, c1, Some(c2));
    assert_eq!(outline(&store), expected);

    let q = id_of(&store, "q");
    move_before(&mut store, q, None);
    assert_eq!(outline(&store), expected);
    assert_well_formed(dir.path());
}

#[test]
fn move_with_unknown_ids_fails() {
    let (dir, mut store) = open_store();
    sample_forest(&mut store);
    let before = raw_rows(dir.path());

    let err = store
        .move_subtree(MoveSubtreeRequest {
            node_id: NodeId::new(404),
            move_before: None,
        })
        .expect_err("unknown node");
    assert!(matches!(err, StoreError::NotFound(id) if id == NodeId::new(404)));

    let err = store
        .move_subtree(MoveSubtreeRequest {
            node_id: id_of(&store, "c1"),
            move_before: Some(NodeId::new(405)),
        })
        .expect_err("unknown target");
    assert!(matches!(err, StoreError::NotFound(id) if id == NodeId::new(405)));

    assert_eq!(raw_rows(dir.path()), before);
}

#[test]
fn repeated_moves_keep_forest_well_formed() {
    let (dir, mut store) = open_store();
    for root in 0..4 {
        insert(
            &mut store,
            node(
                &format!("r{root}"),
                (0..3)
                    .map(|child| {
                        let title = format!("r{root}c{child}");
                        node(&title, vec![leaf(&format!("{title}x"))])
                    })
                    .collect(),
            ),
            None,
        );
    }
    let titles: Vec<String> = outline(&store).into_iter().map(|(title, _)| title).collect();
    let node_count = store.node_count().expect("count");

    let mut moved = 0;
    for step in 0..titles.len() * 2 {
        let subject = id_of(&store, &titles[(step * 7) % titles.len()]);
        let target = id_of(&store, &titles[(step * 11 + 3) % titles.len()]);
        match store.move_subtree(MoveSubtreeRequest {
            node_id: subject,
            move_before: Some(target),
        }) {
            Ok(()) => moved += 1,
            Err(StoreError::InvalidMove { node_id }) => {
                assert_eq!(node_id, subject);
                assert!(store.is_ancestor(subject, target).expect("ancestry"));
            }
            Err(err) => panic!("unexpected move failure: {err}"),
        }
        assert_well_formed(dir.path());
    }

    assert!(moved > 0);
    assert_eq!(store.node_count().expect("count"), node_count);
    assert_eq!(store.row_count().expect("count"), node_count * 2);
}
