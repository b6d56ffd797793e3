// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn star_matches_full_range() {
    assert_eq!(expand("*", 7), vec![0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(expand("*", 5), vec![0, 1, 2, 3, 4]);
}

#[test]
fn single_value() {
    assert_eq!(expand("3", 7), vec![3]);
}

#[test]
fn single_value_reduces_modulo() {
    assert_eq!(expand("61", 60), vec![1]);
    assert_eq!(expand("7", 7), vec![0]);
}

#[test]
fn comma_separated_list() {
    assert_eq!(expand("1,3,5", 7), vec![1, 3, 5]);
}

#[test]
fn range_upper_bound_is_exclusive() {
    // Inherited quirk: "9-17" covers 9 through 16, not 17.
    assert_eq!(expand("9-17", 24), vec![9, 10, 11, 12, 13, 14, 15, 16]);
    assert_eq!(expand("1-2", 7), vec![1]);
}

#[test]
fn reversed_range_wraps_around_the_modulus() {
    assert_eq!(expand("22-2", 24), vec![0, 1, 22, 23]);
}

#[test]
fn wrapped_range_equals_lifted_unwrapped_range() {
    assert_eq!(expand("22-2", 24), expand("22-26", 24));
    assert_eq!(expand("5-1", 7), expand("5-8", 7));
}

#[test]
fn range_values_reduce_modulo() {
    assert_eq!(expand("6-9", 7), vec![0, 1, 6]);
}

#[test]
fn duplicates_are_removed_and_output_is_sorted() {
    assert_eq!(expand("1,1,0-2", 7), vec![0, 1]);
    assert_eq!(expand("5,3,1", 7), vec![1, 3, 5]);
}

#[test]
fn malformed_items_are_ignored() {
    assert_eq!(expand("x", 7), Vec::<u32>::new());
    assert_eq!(expand("", 7), Vec::<u32>::new());
    assert_eq!(expand("3-", 7), Vec::<u32>::new());
    assert_eq!(expand("-3", 7), Vec::<u32>::new());
    assert_eq!(expand("1-2-3", 7), Vec::<u32>::new());
    assert_eq!(expand("1.5", 7), Vec::<u32>::new());
    assert_eq!(expand("x,4", 7), vec![4]);
}
