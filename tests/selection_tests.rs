#![allow(clippy::unwrap_used, missing_docs)]

use larder::selection::{Selection, SelectionDiff};

fn locations(ids: &[&str]) -> Selection<String> {
    Selection::new(ids.iter().map(|s| (*s).to_owned()))
}

#[test]
fn diff_lists_sorted_additions_and_removals() {
    let mut sel = locations(&["loc_b", "loc_a"]);
    sel.toggle("loc_d".to_owned());
    sel.toggle("loc_c".to_owned());
    sel.deselect(&"loc_b".to_owned());

    assert_eq!(
        sel.diff(),
        SelectionDiff {
            added: vec!["loc_c".to_owned(), "loc_d".to_owned()],
            removed: vec!["loc_b".to_owned()],
        }
    );
    assert_eq!(sel.selected(), ["loc_a", "loc_c", "loc_d"]);
}

#[test]
fn commit_makes_working_set_confirmed() {
    let mut sel = locations(&["loc_a"]);
    sel.select("loc_b".to_owned());
    assert!(sel.is_dirty());

    sel.commit();
    assert!(!sel.is_dirty());
    assert!(sel.diff().is_empty());
    assert!(sel.is_selected(&"loc_b".to_owned()));
}

#[test]
fn rollback_discards_local_edits() {
    let mut sel = locations(&["loc_a", "loc_b"]);
    sel.deselect(&"loc_a".to_owned());
    sel.select("loc_z".to_owned());

    sel.rollback();
    assert!(!sel.is_dirty());
    assert_eq!(sel.selected(), ["loc_a", "loc_b"]);
}

#[test]
fn empty_selection_is_clean() {
    let sel: Selection<String> = Selection::default();
    assert!(sel.is_empty());
    assert!(!sel.is_dirty());
    assert!(sel.diff().is_empty());
}
