// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron-style field pattern expansion
//!
//! A pattern is `*` for the full range, or a comma-separated list of single
//! values and `low-high` ranges. Values are reduced modulo the field modulus;
//! a range whose low end exceeds its high end wraps around the modulus.

/// Expand a pattern into the sorted, deduplicated set of matching values in
/// `[0, modulus)`.
///
/// Range upper bounds are exclusive and malformed items are skipped without
/// error, both inherited from the configuration dialect this replaces.
pub fn expand(pattern: &str, modulus: u32) -> Vec<u32> {
    if pattern == "*" {
        return (0..modulus).collect();
    }

    let mut matches = Vec::new();
    for item in pattern.split(',') {
        if let Some((low, high)) = item.split_once('-') {
            let (Some(low), Some(high)) = (parse_field(low), parse_field(high)) else {
                continue;
            };
            let low = u64::from(low);
            let mut high = u64::from(high);
            // A reversed range wraps: "22-2" on modulus 24 covers 22,23,0,1.
            while low > high {
                high += u64::from(modulus);
            }
            for value in low..high {
                matches.push((value % u64::from(modulus)) as u32);
            }
        } else if let Some(value) = parse_field(item) {
            matches.push(value % modulus);
        }
    }

    matches.sort_unstable();
    matches.dedup();
    matches
}

fn parse_field(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
