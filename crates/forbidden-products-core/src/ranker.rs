//! Top preferences of a customer, for display.

use crate::category::{ForbiddenSet, ProductCategory};
use crate::host::AffinityEntry;

/// Scores at or below this value are never shown.
pub const PREFERENCE_THRESHOLD: f32 = 0.45;

/// Number of preferences shown.
pub const TOP_PREFERENCES: usize = 3;

/// Deterministic top-N selection over an affinity list.
///
/// Candidates are scanned in the host's order and inserted into a fixed
/// buffer with a strict `>` comparison, so on equal scores the first-seen
/// entry keeps the higher rank. The input must not be pre-sorted.
#[derive(Debug, Clone, Copy)]
pub struct PreferenceRanker {
    threshold: f32,
}

impl Default for PreferenceRanker {
    fn default() -> Self {
        Self {
            threshold: PREFERENCE_THRESHOLD,
        }
    }
}

impl PreferenceRanker {
    pub fn with_threshold(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Up to [`TOP_PREFERENCES`] allowed, implemented categories in
    /// descending score order.
    pub fn rank<'a>(
        &self,
        affinities: impl IntoIterator<Item = &'a AffinityEntry>,
        forbidden: &ForbiddenSet,
    ) -> Vec<AffinityEntry> {
        let mut best: [Option<AffinityEntry>; TOP_PREFERENCES] = [None; TOP_PREFERENCES];

        for entry in affinities {
            if !entry.category.is_implemented() || forbidden.contains(entry.category) {
                continue;
            }
            // Also rejects NaN.
            if !(entry.score > self.threshold) {
                continue;
            }

            let Some(slot) = best
                .iter()
                .position(|held| held.map_or(true, |held| entry.score > held.score))
            else {
                continue;
            };

            for j in (slot + 1..TOP_PREFERENCES).rev() {
                best[j] = best[j - 1];
            }
            best[slot] = Some(*entry);
        }

        best.into_iter().flatten().collect()
    }

    /// Display names of [`PreferenceRanker::rank`].
    pub fn top_names<'a>(
        &self,
        affinities: impl IntoIterator<Item = &'a AffinityEntry>,
        forbidden: &ForbiddenSet,
    ) -> Vec<&'static str> {
        self.rank(affinities, forbidden)
            .iter()
            .map(|entry| entry.category.name())
            .collect()
    }

    /// Just the categories of [`PreferenceRanker::rank`].
    pub fn top_categories<'a>(
        &self,
        affinities: impl IntoIterator<Item = &'a AffinityEntry>,
        forbidden: &ForbiddenSet,
    ) -> Vec<ProductCategory> {
        self.rank(affinities, forbidden)
            .iter()
            .map(|entry| entry.category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProductCategory::*;

    fn entries(list: &[(ProductCategory, f32)]) -> Vec<AffinityEntry> {
        list.iter().map(|&(c, s)| AffinityEntry::new(c, s)).collect()
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let affinities = entries(&[
            (Shrooms, 0.9),
            (Marijuana, 0.9),
            (Cocaine, 0.5),
            (Methamphetamine, 0.46),
        ]);
        let top = PreferenceRanker::default().top_categories(&affinities, &ForbiddenSet::empty());
        assert_eq!(top, vec![Shrooms, Marijuana, Cocaine]);
    }

    #[test]
    fn test_later_higher_score_shifts_down() {
        let affinities = entries(&[
            (Marijuana, 0.5),
            (Cocaine, 0.6),
            (Shrooms, 0.55),
            (Methamphetamine, 0.99),
        ]);
        let top = PreferenceRanker::default().rank(&affinities, &ForbiddenSet::empty());
        let cats: Vec<_> = top.iter().map(|e| e.category).collect();
        assert_eq!(cats, vec![Methamphetamine, Cocaine, Shrooms]);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let affinities = entries(&[(Marijuana, 0.45), (Cocaine, -1.0), (Shrooms, f32::NAN)]);
        assert!(PreferenceRanker::default()
            .rank(&affinities, &ForbiddenSet::empty())
            .is_empty());
    }

    #[test]
    fn test_forbidden_and_unimplemented_are_skipped() {
        let affinities = entries(&[
            (Heroin, 1.0),
            (Cocaine, 0.95),
            (Mdma, 0.9),
            (Marijuana, 0.6),
        ]);
        let forbidden: ForbiddenSet = [Cocaine].into_iter().collect();
        let names = PreferenceRanker::default().top_names(&affinities, &forbidden);
        assert_eq!(names, vec!["Marijuana"]);
    }

    #[test]
    fn test_custom_threshold() {
        let affinities = entries(&[(Marijuana, 0.1), (Cocaine, 0.2)]);
        let top = PreferenceRanker::with_threshold(0.0).top_categories(&affinities, &ForbiddenSet::empty());
        assert_eq!(top, vec![Cocaine, Marijuana]);
    }
}
