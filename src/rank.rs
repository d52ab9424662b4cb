use crate::tally::{Counts, Tally};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedOrganization {
    pub name: String,
    pub counts: Counts,
}

/// Filter and order organizations for display.
///
/// Drops excluded names and organizations without merged or open pull
/// requests, sorts by merged then open (both descending) and keeps the first
/// `max`. The sort is stable, so exact ties stay in tally (name) order.
pub fn rank(tally: &Tally, exclude: &[String], max: usize) -> Vec<RankedOrganization> {
    let mut ranked: Vec<RankedOrganization> = tally
        .iter()
        .filter(|(name, counts)| {
            counts.active() > 0 && !exclude.iter().any(|e| e.as_str() == *name)
        })
        .map(|(name, counts)| RankedOrganization {
            name: name.to_string(),
            counts: *counts,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.counts
            .merged
            .cmp(&a.counts.merged)
            .then(b.counts.open.cmp(&a.counts.open))
    });
    ranked.truncate(max);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tally(entries: &[(&str, u32, u32, u32)]) -> Tally {
        entries
            .iter()
            .map(|&(name, m, o, c)| (name.to_string(), Counts::new(m, o, c)))
            .collect()
    }

    fn names(ranked: &[RankedOrganization]) -> Vec<&str> {
        ranked.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn excludes_own_account_and_orders_by_merged() {
        let t = tally(&[("orgA", 3, 1, 2), ("orgB", 0, 2, 0), ("me", 5, 0, 0)]);
        let ranked = rank(&t, &["me".to_string()], 8);
        assert_eq!(names(&ranked), vec!["orgA", "orgB"]);
        assert_eq!(ranked[0].counts, Counts::new(3, 1, 2));
    }

    #[test]
    fn closed_only_organizations_are_dropped() {
        let t = tally(&[("closed-only", 0, 0, 5), ("orgA", 0, 1, 0)]);
        let ranked = rank(&t, &[], 8);
        assert_eq!(names(&ranked), vec!["orgA"]);
    }

    #[test]
    fn filtering_removes_exactly_excluded_and_inactive() {
        let t = tally(&[
            ("a", 1, 0, 0),
            ("b", 0, 1, 9),
            ("c", 0, 0, 1),
            ("d", 2, 2, 2),
            ("e", 0, 0, 0),
        ]);
        let exclude = vec!["d".to_string(), "zzz".to_string()];
        let mut got = names(&rank(&t, &exclude, usize::MAX))
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        got.sort();
        assert_eq!(got, vec!["a", "b"]);
    }

    #[test]
    fn exclusion_is_case_sensitive() {
        let t = tally(&[("Me", 1, 0, 0)]);
        assert_eq!(rank(&t, &["me".to_string()], 8).len(), 1);
    }

    #[test]
    fn open_count_breaks_merged_ties() {
        let t = tally(&[("x", 2, 0, 0), ("y", 2, 5, 0), ("z", 4, 0, 0), ("w", 0, 9, 0)]);
        assert_eq!(names(&rank(&t, &[], 8)), vec!["z", "y", "x", "w"]);
    }

    #[test]
    fn truncates_to_max() {
        let t = tally(&[("a", 1, 0, 0), ("b", 2, 0, 0), ("c", 3, 0, 0)]);
        assert_eq!(names(&rank(&t, &[], 2)), vec!["c", "b"]);
        assert!(rank(&t, &[], 0).is_empty());
    }

    #[test]
    fn ranking_is_idempotent() {
        let t = tally(&[
            ("a", 1, 4, 0),
            ("b", 7, 0, 1),
            ("c", 1, 4, 3),
            ("d", 0, 2, 0),
            ("e", 3, 3, 3),
            ("f", 0, 0, 2),
        ]);
        let once = rank(&t, &["e".to_string()], 3);
        let rebuilt: Tally = once
            .iter()
            .map(|r| (r.name.clone(), r.counts))
            .collect();
        let twice = rank(&rebuilt, &["e".to_string()], 3);
        assert_eq!(once, twice);
    }
}
