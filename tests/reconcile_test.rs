use sposync::sync::reconcile::diff;

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_diff_computes_minimal_add_and_remove_sets() {
    let current = ids(&["A", "B", "C"]);
    let desired = ids(&["B", "C", "D"]);

    let diff = diff(&desired, &current);

    assert_eq!(diff.to_remove, ids(&["A"]));
    assert_eq!(diff.to_add, ids(&["D"]));
}

#[test]
fn test_diff_of_identical_sets_is_empty() {
    let current = ids(&["A", "B", "C"]);
    let desired = ids(&["A", "B", "C"]);

    let diff = diff(&desired, &current);

    // Applying twice in a row with no data change yields zero writes
    assert!(diff.is_empty());
    assert!(diff.to_add.is_empty());
    assert!(diff.to_remove.is_empty());
}

#[test]
fn test_diff_ignores_ordering_differences() {
    // Membership is a set property; a reordered playlist needs no writes
    let current = ids(&["C", "A", "B"]);
    let desired = ids(&["A", "B", "C"]);

    let diff = diff(&desired, &current);
    assert!(diff.is_empty());
}

#[test]
fn test_diff_preserves_desired_order_for_additions() {
    let current = ids(&[]);
    let desired = ids(&["newest", "older", "oldest"]);

    let diff = diff(&desired, &current);

    // Additions are applied in policy order (e.g. newest first for recency)
    assert_eq!(diff.to_add, ids(&["newest", "older", "oldest"]));
}

#[test]
fn test_diff_preserves_current_order_for_removals() {
    let current = ids(&["x", "keep", "y"]);
    let desired = ids(&["keep"]);

    let diff = diff(&desired, &current);
    assert_eq!(diff.to_remove, ids(&["x", "y"]));
}

#[test]
fn test_diff_empty_desired_removes_everything() {
    let current = ids(&["A", "B"]);
    let desired = ids(&[]);

    let diff = diff(&desired, &current);
    assert_eq!(diff.to_remove, ids(&["A", "B"]));
    assert!(diff.to_add.is_empty());
}

#[test]
fn test_diff_is_stable_across_repeated_runs() {
    let current = ids(&["A", "B", "C"]);
    let desired = ids(&["B", "D", "E"]);

    let first = diff(&desired, &current);
    let second = diff(&desired, &current);

    assert_eq!(first, second);
}
