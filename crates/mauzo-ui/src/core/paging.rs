//! Pagination window math.
//!
//! The backend reports the full set of valid page numbers per listing; the
//! console shows a bounded sliding window of them plus a synthetic ladder of
//! selectable page sizes. Both aids merge cumulatively with what the user
//! has already seen so the controls never shrink mid-session.

/// Viewport width above which the wide page-number window is used.
pub const WIDE_VIEWPORT_MIN: u16 = 992;

/// Hard cap for synthetic page-size entries.
pub const LIMIT_CAP: u64 = 1000;

/// Number of page-number entries shown for a viewport width.
#[must_use]
pub const fn window_capacity(viewport_width: u16) -> usize {
    if viewport_width > WIDE_VIEWPORT_MIN { 10 } else { 5 }
}

/// The visible page-number window: starts at the current page and scans
/// forward through the server-provided valid page set until the window is
/// full or the set is exhausted.
#[must_use]
pub fn page_window(pages: &[u64], current: u64, capacity: usize) -> Vec<u64> {
    pages
        .iter()
        .copied()
        .filter(|page| *page >= current)
        .take(capacity)
        .collect()
}

/// Merge a freshly computed window into the page numbers already shown,
/// deduplicated and ordered. The displayed set grows monotonically within a
/// session unless explicitly reset.
#[must_use]
pub fn merge_page_numbers(seen: &[u64], window: &[u64]) -> Vec<u64> {
    let mut merged: Vec<u64> = seen.iter().chain(window.iter()).copied().collect();
    merged.sort_unstable();
    merged.dedup();
    merged
}

/// Synthetic page-size ladder: multiples of the active limit up to
/// [`LIMIT_CAP`], with the zero entry dropped.
#[must_use]
pub fn limit_ladder(limit: u64) -> Vec<u64> {
    if limit == 0 {
        return Vec::new();
    }
    (1..)
        .map(|step| step * limit)
        .take_while(|value| *value <= LIMIT_CAP)
        .collect()
}

/// Merge a fresh ladder into the page sizes already offered.
#[must_use]
pub fn merge_limits(seen: &[u64], ladder: &[u64]) -> Vec<u64> {
    merge_page_numbers(seen, ladder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_viewports_get_ten_entries() {
        assert_eq!(window_capacity(1200), 10);
        assert_eq!(window_capacity(992), 5);
        assert_eq!(window_capacity(375), 5);
    }

    #[test]
    fn window_starts_at_current_page() {
        let pages: Vec<u64> = (1..=25).collect();
        let window = page_window(&pages, 3, window_capacity(1200));
        assert_eq!(window.len(), 10);
        assert_eq!(window.first(), Some(&3));
        assert_eq!(window.last(), Some(&12));
    }

    #[test]
    fn window_shrinks_when_pages_run_out() {
        let pages: Vec<u64> = (1..=4).collect();
        assert_eq!(page_window(&pages, 3, 10), vec![3, 4]);
        assert!(page_window(&pages, 9, 10).is_empty());
    }

    #[test]
    fn merged_page_numbers_grow_monotonically() {
        let seen = merge_page_numbers(&[], &[3, 4, 5]);
        let grown = merge_page_numbers(&seen, &[1, 2, 3]);
        assert_eq!(grown, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn ladder_multiplies_and_caps() {
        assert_eq!(limit_ladder(250), vec![250, 500, 750, 1000]);
        assert_eq!(limit_ladder(400), vec![400, 800]);
        assert!(limit_ladder(0).is_empty());
    }

    #[test]
    fn ladder_never_carries_a_zero_entry() {
        assert_eq!(limit_ladder(10).first(), Some(&10));
    }
}
