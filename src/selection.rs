use crate::catalog::{Difficulty, WordEntry};
use crate::stats::StatisticsRecord;
use rand::seq::SliceRandom;
use rand::RngCore;

/// Something the user should be told about how the questions were picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionNotice {
    /// No word carries the requested difficulty; every level is used instead
    DifficultyFallback(Difficulty),
    /// Practice run over this many distinct missed words
    Practicing { words: usize },
    NothingToPractice,
}

#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    pub questions: Vec<&'a WordEntry>,
    pub notice: Option<SelectionNotice>,
}

/// Strategy for turning the catalog into an ordered question list
pub trait QuestionSelector {
    fn select<'a>(
        &self,
        pool: &'a [WordEntry],
        stats: &StatisticsRecord,
        rng: &mut dyn RngCore,
    ) -> Selection<'a>;
}

/// Shuffled sample without repeats, optionally limited to one difficulty
#[derive(Debug, Clone, Copy)]
pub struct UniformSelector {
    pub count: usize,
    pub difficulty: Option<Difficulty>,
}

impl QuestionSelector for UniformSelector {
    fn select<'a>(
        &self,
        pool: &'a [WordEntry],
        _stats: &StatisticsRecord,
        rng: &mut dyn RngCore,
    ) -> Selection<'a> {
        let mut notice = None;
        let mut candidates: Vec<&WordEntry> = pool.iter().collect();

        if let Some(difficulty) = self.difficulty {
            let filtered: Vec<&WordEntry> = pool
                .iter()
                .filter(|w| w.matches_difficulty(difficulty))
                .collect();
            if filtered.is_empty() {
                notice = Some(SelectionNotice::DifficultyFallback(difficulty));
            } else {
                candidates = filtered;
            }
        }

        candidates.shuffle(rng);
        candidates.truncate(self.count);
        tracing::debug!(questions = candidates.len(), "uniform selection");

        Selection {
            questions: candidates,
            notice,
        }
    }
}

/// Practice run drawn only from words missed before, repeated by miss count
#[derive(Debug, Clone, Copy)]
pub struct PracticeSelector {
    pub limit: usize,
    pub max_repeats: usize,
}

/// Each missed word appears `min(mistakes + 1, max_repeats)` times; words
/// never missed are left out entirely.
pub fn expand_by_mistakes<'a>(
    pool: &'a [WordEntry],
    stats: &StatisticsRecord,
    max_repeats: usize,
) -> Vec<&'a WordEntry> {
    pool.iter()
        .filter(|w| stats.mistake_count(&w.term) > 0)
        .flat_map(|w| {
            let repeats = (stats.mistake_count(&w.term) as usize + 1).min(max_repeats);
            std::iter::repeat(w).take(repeats)
        })
        .collect()
}

impl QuestionSelector for PracticeSelector {
    fn select<'a>(
        &self,
        pool: &'a [WordEntry],
        stats: &StatisticsRecord,
        rng: &mut dyn RngCore,
    ) -> Selection<'a> {
        let distinct = pool
            .iter()
            .filter(|w| stats.mistake_count(&w.term) > 0)
            .count();
        if distinct == 0 {
            return Selection {
                questions: Vec::new(),
                notice: Some(SelectionNotice::NothingToPractice),
            };
        }

        let mut expanded = expand_by_mistakes(pool, stats, self.max_repeats);
        expanded.shuffle(rng);
        expanded.truncate(self.limit);
        tracing::debug!(distinct, questions = expanded.len(), "practice selection");

        Selection {
            questions: expanded,
            notice: Some(SelectionNotice::Practicing { words: distinct }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Article;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn word(term: &str, article: Article, difficulty: Option<&str>) -> WordEntry {
        WordEntry {
            difficulty: difficulty.map(str::to_string),
            ..WordEntry::new(term, article)
        }
    }

    fn create_test_pool() -> Vec<WordEntry> {
        vec![
            word("Haus", Article::Das, Some("easy")),
            word("Tisch", Article::Der, Some("Easy")),
            word("Lampe", Article::Die, Some("medium")),
            word("Gebäude", Article::Das, Some("hard")),
            word("Auto", Article::Das, None),
            word("Katze", Article::Die, Some("easy")),
        ]
    }

    #[test]
    fn test_uniform_count_is_clamped_and_distinct() {
        let pool = create_test_pool();
        let stats = StatisticsRecord::default();
        let mut rng = StdRng::seed_from_u64(7);

        for requested in [0, 1, 3, 6, 10, 50] {
            let selection = UniformSelector {
                count: requested,
                difficulty: None,
            }
            .select(&pool, &stats, &mut rng);

            assert_eq!(selection.questions.len(), requested.min(pool.len()));
            let unique: HashSet<&str> =
                selection.questions.iter().map(|w| w.term.as_str()).collect();
            assert_eq!(unique.len(), selection.questions.len());
            assert_eq!(selection.notice, None);
        }
    }

    #[test]
    fn test_uniform_difficulty_filter_ignores_case() {
        let pool = create_test_pool();
        let stats = StatisticsRecord::default();
        let mut rng = StdRng::seed_from_u64(1);

        let selection = UniformSelector {
            count: 10,
            difficulty: Some(Difficulty::Easy),
        }
        .select(&pool, &stats, &mut rng);

        let mut terms: Vec<&str> = selection.questions.iter().map(|w| w.term.as_str()).collect();
        terms.sort();
        assert_eq!(terms, vec!["Haus", "Katze", "Tisch"]);
        assert_eq!(selection.notice, None);
    }

    #[test]
    fn test_uniform_difficulty_fallback_uses_whole_pool() {
        let pool: Vec<WordEntry> = create_test_pool()
            .into_iter()
            .filter(|w| !w.matches_difficulty(Difficulty::Hard))
            .collect();
        let stats = StatisticsRecord::default();
        let mut rng = StdRng::seed_from_u64(3);

        let selection = UniformSelector {
            count: 50,
            difficulty: Some(Difficulty::Hard),
        }
        .select(&pool, &stats, &mut rng);

        assert_eq!(selection.questions.len(), pool.len());
        assert_eq!(
            selection.notice,
            Some(SelectionNotice::DifficultyFallback(Difficulty::Hard))
        );
    }

    #[test]
    fn test_uniform_same_seed_same_order() {
        let pool = create_test_pool();
        let stats = StatisticsRecord::default();
        let selector = UniformSelector {
            count: 4,
            difficulty: None,
        };

        let a = selector.select(&pool, &stats, &mut StdRng::seed_from_u64(42));
        let b = selector.select(&pool, &stats, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.questions, b.questions);
    }

    #[test]
    fn test_expand_by_mistakes_caps_repeats() {
        let pool = create_test_pool();
        let mut stats = StatisticsRecord::default();
        stats.mistake_counts.insert("Haus".into(), 1);
        stats.mistake_counts.insert("Tisch".into(), 2);
        stats.mistake_counts.insert("Lampe".into(), 7);
        stats.mistake_counts.insert("Auto".into(), 0);

        let expanded = expand_by_mistakes(&pool, &stats, 3);
        let count = |term: &str| expanded.iter().filter(|w| w.term == term).count();

        assert_eq!(count("Haus"), 2);
        assert_eq!(count("Tisch"), 3);
        assert_eq!(count("Lampe"), 3);
        assert_eq!(count("Auto"), 0);
        assert_eq!(count("Katze"), 0);
        assert_eq!(expanded.len(), 8);
    }

    #[test]
    fn test_practice_without_mistakes() {
        let pool = create_test_pool();
        let stats = StatisticsRecord::default();
        let mut rng = StdRng::seed_from_u64(5);

        let selection = PracticeSelector {
            limit: 10,
            max_repeats: 3,
        }
        .select(&pool, &stats, &mut rng);

        assert!(selection.questions.is_empty());
        assert_eq!(selection.notice, Some(SelectionNotice::NothingToPractice));
    }

    #[test]
    fn test_practice_truncates_to_limit() {
        let pool = create_test_pool();
        let mut stats = StatisticsRecord::default();
        for w in &pool {
            stats.mistake_counts.insert(w.term.clone(), 5);
        }
        let mut rng = StdRng::seed_from_u64(9);

        let selection = PracticeSelector {
            limit: 10,
            max_repeats: 3,
        }
        .select(&pool, &stats, &mut rng);

        assert_eq!(selection.questions.len(), 10);
        assert_eq!(
            selection.notice,
            Some(SelectionNotice::Practicing { words: pool.len() })
        );
        assert!(selection
            .questions
            .iter()
            .all(|w| stats.mistake_count(&w.term) > 0));
    }

    #[test]
    fn test_practice_small_pool_keeps_all_copies() {
        let pool = create_test_pool();
        let mut stats = StatisticsRecord::default();
        stats.mistake_counts.insert("Katze".into(), 1);
        let mut rng = StdRng::seed_from_u64(11);

        let selection = PracticeSelector {
            limit: 10,
            max_repeats: 3,
        }
        .select(&pool, &stats, &mut rng);

        assert_eq!(selection.questions.len(), 2);
        assert!(selection.questions.iter().all(|w| w.term == "Katze"));
    }
}
