//! Date-seeded ordering of the feed.
//!
//! Everyone loading the page on the same calendar day gets the same order
//! without any shared state: the seed is the date, the hash of the seed
//! starts a counter, and each item is ranked by the sine of its counter
//! value. The sort is stable so equal ranks keep input order.

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use std::cmp::Ordering;

/// Seed for the calendar day of `now`, formatted `year-month0-day` with a
/// zero-based month and no padding (2024-01-05 is `"2024-0-5"`).
pub fn daily_seed<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format!("{}-{}-{}", now.year(), now.month0(), now.day())
}

/// Seed for today in `zone`, or in the host's local timezone.
pub fn today_seed(zone: Option<chrono_tz::Tz>) -> String {
    match zone {
        Some(tz) => daily_seed(&Utc::now().with_timezone(&tz)),
        None => daily_seed(&Local::now()),
    }
}

/// Rolling `h = 31 * h + unit` over the UTF-16 code units of `seed`,
/// wrapping as 32-bit signed arithmetic.
pub fn seed_hash(seed: &str) -> i32 {
    seed.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Returns a new vector holding `items` in the order fixed by `seed`.
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: &str) -> Vec<T> {
    let start = i64::from(seed_hash(seed));
    let mut ranked: Vec<(f64, &T)> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (((start + i as i64) as f64).sin(), item))
        .collect();
    ranked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    ranked.into_iter().map(|(_, item)| item.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_reference_values() {
        assert_eq!(seed_hash(""), 0);
        assert_eq!(seed_hash("a"), 97);
        assert_eq!(seed_hash("2024-0-1"), -1_922_423_929);
        assert_eq!(seed_hash("2025-9-16"), 563_297_669);
    }

    #[test]
    fn known_order_for_seed() {
        let items: Vec<char> = "abcdef".chars().collect();
        let out: String = seeded_shuffle(&items, "2024-0-1").into_iter().collect();
        assert_eq!(out, "feadbc");
    }

    #[test]
    fn same_seed_same_order() {
        let items: Vec<u32> = (0..200).collect();
        let a = seeded_shuffle(&items, "2025-9-16");
        let b = seeded_shuffle(&items, "2025-9-16");
        assert_eq!(a, b);
    }

    #[test]
    fn output_is_permutation_and_input_untouched() {
        let items: Vec<u32> = (0..50).collect();
        let before = items.clone();
        let mut out = seeded_shuffle(&items, "2025-9-16");
        assert_eq!(items, before);
        assert_eq!(out.len(), items.len());
        out.sort_unstable();
        assert_eq!(out, before);
    }

    #[test]
    fn empty_input() {
        let items: Vec<String> = Vec::new();
        assert!(seeded_shuffle(&items, "2024-0-1").is_empty());
    }

    #[test]
    fn different_days_usually_differ() {
        let items: Vec<u32> = (0..20).collect();
        assert_ne!(
            seeded_shuffle(&items, "2024-0-1"),
            seeded_shuffle(&items, "2024-0-2")
        );
    }

    #[test]
    fn seed_uses_zero_based_month() {
        let t = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        assert_eq!(daily_seed(&t), "2024-0-5");
        let t = Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap();
        assert_eq!(daily_seed(&t), "2025-11-31");
    }

    #[test]
    fn seed_stable_within_day_and_changes_at_midnight() {
        let morning = Utc.with_ymd_and_hms(2025, 10, 16, 0, 0, 1).unwrap();
        let night = Utc.with_ymd_and_hms(2025, 10, 16, 23, 59, 59).unwrap();
        let next = Utc.with_ymd_and_hms(2025, 10, 17, 0, 0, 0).unwrap();
        assert_eq!(daily_seed(&morning), daily_seed(&night));
        assert_ne!(daily_seed(&night), daily_seed(&next));
    }

    #[test]
    fn seed_follows_viewer_timezone() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 10, 23, 30, 0).unwrap();
        let warsaw = instant.with_timezone(&chrono_tz::Europe::Warsaw);
        assert_eq!(daily_seed(&instant), "2025-2-10");
        assert_eq!(daily_seed(&warsaw), "2025-2-11");
    }
}
