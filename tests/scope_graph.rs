use property_graph::{Arena, Datum, DatumKind, ErrorKind, ScopeId};

fn tree() -> (Arena, ScopeId, ScopeId) {
    let mut arena = Arena::new();
    let root = arena.create_scope();
    arena.append(root, "Name").unwrap().push_back(String::from("root")).unwrap();
    let child = arena.append_scope(root, "Children").unwrap();
    arena.append(child, "Level").unwrap().push_back(1).unwrap();
    (arena, root, child)
}

#[test]
fn append_is_idempotent() {
    let mut arena = Arena::new();
    let root = arena.create_scope();
    let first = arena.append(root, "Health").unwrap() as *const Datum;
    let second = arena.append(root, "Health").unwrap() as *const Datum;
    assert!(std::ptr::eq(first, second));
    let found = arena.find(root, "Health").unwrap().unwrap() as *const Datum;
    assert!(std::ptr::eq(first, found));
    assert_eq!(arena.get(root).unwrap().len(), 1);

    let err = arena.append(root, "").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[test]
fn insertion_order_is_preserved() {
    let mut arena = Arena::new();
    let root = arena.create_scope();
    for name in ["z", "a", "m"] {
        arena.append(root, name).unwrap();
    }
    let names: Vec<_> = arena.get(root).unwrap().names().collect();
    assert_eq!(names, vec!["z", "a", "m"]);
}

#[test]
fn adopt_reparents_and_detaches() {
    let (mut arena, root, child) = tree();
    let other = arena.create_scope();

    arena.adopt(other, child, "Adopted").unwrap();
    assert_eq!(arena.parent(child).unwrap(), Some(other));
    let (datum, index) = arena.find_contained_scope(other, child).unwrap().unwrap();
    assert!(datum.is_kind(DatumKind::Table));
    assert_eq!(index, 0);
    assert!(arena.find_contained_scope(root, child).unwrap().is_none());
    assert!(arena.find(root, "Children").unwrap().unwrap().is_empty());

    arena.adopt(root, child, "Children").unwrap();
    assert_eq!(arena.parent(child).unwrap(), Some(root));
    assert!(arena.find(other, "Adopted").unwrap().unwrap().is_empty());
}

#[test]
fn adopt_rejects_non_table_names() {
    let (mut arena, root, _) = tree();
    let loose = arena.create_scope();
    let err = arena.adopt(root, loose, "Name").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Schema);
    assert_eq!(arena.parent(loose).unwrap(), None);
}

#[test]
fn search_reports_the_owner() {
    let (mut arena, root, child) = tree();
    let leaf = arena.append_scope(child, "Leaves").unwrap();
    let (owner, datum) = arena.search(leaf, "Name").unwrap().unwrap();
    assert_eq!(owner, root);
    assert_eq!(*datum, "root");
    let (owner, _) = arena.search(leaf, "Level").unwrap().unwrap();
    assert_eq!(owner, child);
}

#[test]
fn stale_handles_are_rejected() {
    let (mut arena, root, child) = tree();
    arena.destroy(child).unwrap();
    assert_eq!(arena.get(child).unwrap_err().kind, ErrorKind::InvalidHandle);

    let reused = arena.create_scope();
    assert_eq!(reused.index(), child.index());
    assert_ne!(reused, child);
    assert!(arena.get(child).is_err());
    assert!(arena.get(reused).unwrap().is_empty());
    assert_eq!(arena.len(), 2);
    assert!(arena.contains(root));
}

#[test]
fn copies_are_structural_and_independent() {
    let (mut arena, root, _) = tree();
    let copy = arena.clone_scope(root).unwrap();
    assert!(arena.scopes_equal(root, copy).unwrap());

    let copied_child = arena.children(copy).unwrap()[0];
    arena
        .append(copied_child, "Level")
        .unwrap()
        .set(2, 0)
        .unwrap();
    assert!(!arena.scopes_equal(root, copy).unwrap());
}

#[test]
fn move_repairs_the_parent_link() {
    let (mut arena, root, child) = tree();
    let moved = arena.move_scope(child).unwrap();
    assert_eq!(arena.find_contained_scope(root, moved).unwrap().unwrap().1, 0);
    assert!(arena.find_contained_scope(root, child).unwrap().is_none());
    assert_eq!(*arena.find(moved, "Level").unwrap().unwrap(), 1);
    assert!(arena.get(child).unwrap().is_empty());
}

#[test]
fn destroying_a_root_frees_everything() {
    let (mut arena, root, child) = tree();
    let grandchild = arena.append_scope(child, "More").unwrap();
    arena.destroy(root).unwrap();
    assert!(arena.is_empty());
    for id in [root, child, grandchild] {
        assert!(!arena.contains(id));
    }
}

#[test]
fn table_datums_cannot_be_taken_or_replaced() {
    let (mut arena, root, child) = tree();
    let err = arena.append(root, "Children").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Schema);
    assert!(arena.get_mut(root).unwrap().find_mut("Children").is_none());
    assert_eq!(arena.find_contained_scope(root, child).unwrap().unwrap().1, 0);

    arena.destroy(root).unwrap();
    assert!(!arena.contains(child));
    assert!(arena.is_empty());
}

#[test]
fn cloned_table_datums_hold_no_children() {
    let (mut arena, root, child) = tree();
    let copy = arena.find(root, "Children").unwrap().unwrap().clone();
    assert!(copy.is_kind(DatumKind::Table));
    assert!(copy.is_empty());

    *arena.append(root, "Twins").unwrap() = copy;
    assert!(arena.find(root, "Twins").unwrap().unwrap().scopes().is_empty());
    assert_eq!(arena.children(root).unwrap(), vec![child]);

    arena.destroy(root).unwrap();
    assert!(arena.is_empty());
}
