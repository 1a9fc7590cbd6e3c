//! Tests for keyed list diffing and script application.

use proptest::prelude::*;
use rstest::rstest;

use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    id: u8,
    label: u8,
}

impl Keyed for Row {
    type Key = u8;

    fn key(&self) -> &u8 {
        &self.id
    }
}

fn rows(ids: &[u8]) -> Vec<Row> {
    ids.iter().map(|&id| Row { id, label: 0 }).collect()
}

fn ids(rows: &[Row]) -> Vec<u8> {
    rows.iter().map(|row| row.id).collect()
}

fn moves(script: &EditScript<Row>) -> Vec<(usize, usize)> {
    script
        .ops()
        .iter()
        .filter_map(|op| match op {
            EditOp::Move { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

#[rstest]
#[case::append(&[1, 2], &[1, 2, 3, 4])]
#[case::prepend(&[3, 4], &[1, 2, 3, 4])]
#[case::remove_middle(&[1, 2, 3], &[1, 3])]
#[case::reverse(&[1, 2, 3, 4], &[4, 3, 2, 1])]
#[case::replace_all(&[1, 2], &[3, 4])]
#[case::clear(&[1, 2, 3], &[])]
#[case::populate(&[], &[5, 6])]
#[case::mixed(&[1, 2, 3, 4, 5], &[6, 4, 2, 7, 1])]
fn applying_the_script_yields_next(#[case] previous: &[u8], #[case] next: &[u8]) {
    let previous = rows(previous);
    let next = rows(next);
    let script = structural_diff(&previous, &next);
    let mut model = previous.clone();
    apply(&mut model, &script).expect("script fits");
    assert_eq!(ids(&model), ids(&next));
}

#[rstest]
fn appending_a_page_only_inserts() {
    let script = structural_diff(&rows(&[1, 2]), &rows(&[1, 2, 3]));
    assert_eq!(
        script.ops(),
        [EditOp::Insert {
            index: 2,
            item: Row { id: 3, label: 0 }
        }]
    );
}

#[rstest]
fn rotation_needs_a_single_move() {
    let script = structural_diff(&rows(&[1, 2, 3, 4]), &rows(&[2, 3, 4, 1]));
    assert_eq!(moves(&script), [(0, 3)]);
    assert_eq!(script.len(), 1);
}

#[rstest]
fn removals_are_listed_in_descending_order() {
    let script = structural_diff(&rows(&[1, 2, 3, 4]), &rows(&[2]));
    let removed: Vec<_> = script
        .ops()
        .iter()
        .filter_map(|op| match op {
            EditOp::Remove { index } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(removed, [3, 2, 0]);
}

#[rstest]
fn content_change_without_reorder_is_a_refresh() {
    let previous = rows(&[1, 2]);
    let next = vec![Row { id: 1, label: 0 }, Row { id: 2, label: 9 }];
    let script = diff(&previous, &next);
    assert!(!script.has_structural_changes());
    assert!(script.has_content_changes());
    assert_eq!(
        script.ops(),
        [EditOp::Refresh {
            index: 1,
            item: Row { id: 2, label: 9 }
        }]
    );
}

#[rstest]
fn inputs_are_not_mutated() {
    let previous = rows(&[1, 2, 3]);
    let next = rows(&[3, 1]);
    let before = (previous.clone(), next.clone());
    let _ = diff(&previous, &next);
    assert_eq!((previous, next), before);
}

#[rstest]
fn script_for_another_model_is_rejected() {
    let script = structural_diff(&rows(&[1, 2, 3]), &rows(&[1]));
    let mut model = rows(&[1]);
    let err = apply(&mut model, &script).expect_err("script does not fit");
    assert!(matches!(err, ApplyError::OutOfBounds { .. }));
    assert_eq!(ids(&model), [1]);
}

#[rstest]
fn dedup_keeps_first_occurrence() {
    let items = vec![
        Row { id: 1, label: 1 },
        Row { id: 2, label: 1 },
        Row { id: 1, label: 2 },
    ];
    let unique = dedup_by_key(&items);
    assert_eq!(unique, vec![Row { id: 1, label: 1 }, Row { id: 2, label: 1 }]);
}

fn keyed_rows() -> impl Strategy<Value = Vec<Row>> {
    let pool: Vec<u8> = (0..24).collect();
    (
        proptest::sample::subsequence(pool, 0..=24).prop_shuffle(),
        proptest::collection::vec(0_u8..3, 24),
    )
        .prop_map(|(ids, labels)| {
            ids.into_iter()
                .map(|id| Row {
                    id,
                    label: labels[usize::from(id)],
                })
                .collect()
        })
}

proptest! {
    #[test]
    fn diff_round_trips(previous in keyed_rows(), next in keyed_rows()) {
        let script = diff(&previous, &next);
        let mut model = previous.clone();
        apply(&mut model, &script).expect("script fits its own input");
        prop_assert_eq!(model, next);
    }

    #[test]
    fn structural_diff_matches_order(previous in keyed_rows(), next in keyed_rows()) {
        let script = structural_diff(&previous, &next);
        let mut model = previous.clone();
        apply(&mut model, &script).expect("script fits its own input");
        prop_assert_eq!(ids(&model), ids(&next));
    }

    #[test]
    fn converged_lists_diff_to_nothing(previous in keyed_rows(), next in keyed_rows()) {
        let script = diff(&previous, &next);
        let mut model = previous;
        apply(&mut model, &script).expect("script fits");
        prop_assert!(diff(&model, &next).is_empty());
    }

    #[test]
    fn identical_lists_diff_to_nothing(items in keyed_rows()) {
        prop_assert!(diff(&items, &items).is_empty());
    }
}
