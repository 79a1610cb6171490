//! Score Calculator
//!
//! Pure scoring of the six capability categories into a 0-100 percentage,
//! a letter grade and a maturity label.
//!
//! Missing or out-of-range ratings never abort scoring: each one is replaced by
//! the mid-scale default and counted in [`ScoringResult::substitutions`].

use serde::{Deserialize, Serialize};

use crate::constants::{grade as grade_bands, maturity as maturity_bands, rating};
use crate::types::{Category, CategoryRatings, is_valid_rating};

// =============================================================================
// Grade & Maturity
// =============================================================================

/// Letter grade banded on percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    F,
    D,
    C,
    B,
    A,
}

impl Grade {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= grade_bands::A {
            Self::A
        } else if percentage >= grade_bands::B {
            Self::B
        } else if percentage >= grade_bands::C {
            Self::C
        } else if percentage >= grade_bands::D {
            Self::D
        } else {
            Self::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative AI maturity derived from percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaturityLevel {
    Unaware,
    Aware,
    Adopting,
    Leading,
}

impl MaturityLevel {
    /// Bands use exclusive lower bounds: exactly 60% is still "aware".
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > maturity_bands::LEADING {
            Self::Leading
        } else if percentage > maturity_bands::ADOPTING {
            Self::Adopting
        } else if percentage > maturity_bands::AWARE {
            Self::Aware
        } else {
            Self::Unaware
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Leading => "leading",
            Self::Adopting => "adopting",
            Self::Aware => "aware",
            Self::Unaware => "unaware",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Leading => "AI Leading",
            Self::Adopting => "AI Adopting",
            Self::Aware => "AI Aware",
            Self::Unaware => "AI Unaware",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Leading => "AI is embedded in core operations and drives measurable advantage.",
            Self::Adopting => "AI is in productive use in several functions but not yet systematic.",
            Self::Aware => "The organization understands AI potential and runs first experiments.",
            Self::Unaware => "AI is not yet part of planning or daily operations.",
        }
    }
}

impl std::fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Scoring Result
// =============================================================================

/// Sub-score for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub total: u64,
    pub max: u64,
    pub item_count: usize,
    pub percentage: f64,
    pub average: f64,
}

/// Derived scores for one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Sum of all (substituted) ratings
    pub total: u64,
    /// Highest achievable total for the scored item count
    pub max_possible: u64,
    pub percentage: f64,
    pub grade: Grade,
    pub maturity: MaturityLevel,
    /// Per-category sub-scores in [`Category::ALL`] order
    pub categories: Vec<CategoryScore>,
    /// Number of ratings replaced by the mid-scale default
    pub substitutions: usize,
}

impl ScoringResult {
    pub fn category(&self, category: Category) -> &CategoryScore {
        &self.categories[category.index()]
    }

    /// Categories sorted from highest to lowest percentage (ties keep report order)
    pub fn ranked(&self) -> Vec<&CategoryScore> {
        let mut ranked: Vec<&CategoryScore> = self.categories.iter().collect();
        ranked.sort_by(|a, b| {
            b.percentage
                .partial_cmp(&a.percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    pub fn strongest(&self, n: usize) -> Vec<&CategoryScore> {
        self.ranked().into_iter().take(n).collect()
    }

    pub fn weakest(&self, n: usize) -> Vec<&CategoryScore> {
        let mut ranked: Vec<&CategoryScore> = self.categories.iter().collect();
        ranked.sort_by(|a, b| {
            a.percentage
                .partial_cmp(&b.percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.category.cmp(&b.category))
        });
        ranked.into_iter().take(n).collect()
    }

    /// "144 / 240"
    pub fn total_label(&self) -> String {
        format!("{} / {}", self.total, self.max_possible)
    }

    /// "60.0%"
    pub fn percentage_label(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Replace invalid ratings with the mid-scale default.
///
/// An empty list becomes a full category of mid-scale ratings. Returns the
/// normalized ratings and the number of substitutions made.
pub fn normalize_ratings(ratings: &[i32]) -> (Vec<u8>, usize) {
    if ratings.is_empty() {
        return (
            vec![rating::MID_SCALE_DEFAULT; rating::ITEMS_PER_CATEGORY],
            rating::ITEMS_PER_CATEGORY,
        );
    }

    let mut substitutions = 0;
    let normalized = ratings
        .iter()
        .map(|&v| {
            if is_valid_rating(v) {
                v as u8
            } else {
                substitutions += 1;
                rating::MID_SCALE_DEFAULT
            }
        })
        .collect();
    (normalized, substitutions)
}

/// Compute all scores for a set of category ratings.
///
/// Deterministic and side-effect free.
pub fn compute_scores(ratings: &CategoryRatings) -> ScoringResult {
    let mut categories = Vec::with_capacity(rating::CATEGORY_COUNT);
    let mut substitutions = 0;

    for (category, raw) in ratings.iter() {
        let (normalized, substituted) = normalize_ratings(raw);
        substitutions += substituted;

        let total: u64 = normalized.iter().map(|&v| u64::from(v)).sum();
        let item_count = normalized.len();
        let max = item_count as u64 * u64::from(rating::MAX);
        categories.push(CategoryScore {
            category,
            total,
            max,
            item_count,
            percentage: percentage_of(total, max),
            average: total as f64 / item_count as f64,
        });
    }

    let total: u64 = categories.iter().map(|c| c.total).sum();
    let max_possible: u64 = categories.iter().map(|c| c.max).sum();
    let percentage = percentage_of(total, max_possible);

    ScoringResult {
        total,
        max_possible,
        percentage,
        grade: Grade::from_percentage(percentage),
        maturity: MaturityLevel::from_percentage(percentage),
        categories,
        substitutions,
    }
}

fn percentage_of(total: u64, max: u64) -> f64 {
    if max == 0 {
        return 0.0;
    }
    // Multiply first so whole-number percentages stay exact.
    total as f64 * 100.0 / max as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grade_banding() {
        let cases = [
            (95.0, Grade::A),
            (85.0, Grade::B),
            (75.0, Grade::C),
            (65.0, Grade::D),
            (55.0, Grade::F),
        ];
        for (percentage, expected) in cases {
            assert_eq!(Grade::from_percentage(percentage), expected);
        }
        assert_eq!(Grade::from_percentage(90.0), Grade::A);
        assert_eq!(Grade::from_percentage(59.99), Grade::F);
    }

    #[test]
    fn test_maturity_banding() {
        assert_eq!(MaturityLevel::from_percentage(95.0), MaturityLevel::Leading);
        assert_eq!(MaturityLevel::from_percentage(80.0), MaturityLevel::Adopting);
        assert_eq!(MaturityLevel::from_percentage(60.0), MaturityLevel::Aware);
        assert_eq!(MaturityLevel::from_percentage(45.0), MaturityLevel::Aware);
        assert_eq!(MaturityLevel::from_percentage(40.0), MaturityLevel::Unaware);
    }

    #[test]
    fn test_very_long_category_does_not_overflow() {
        let mut ratings = CategoryRatings::uniform(5);
        ratings.goal_clarity = vec![5; 9_000_000];

        let result = compute_scores(&ratings);
        assert_eq!(result.category(Category::GoalClarity).total, 45_000_000);
        assert_eq!(result.total, 45_000_000 + 5 * 8 * 5);
        assert_eq!(result.percentage, 100.0);
        assert_eq!(result.grade, Grade::A);
        assert_eq!(result.maturity, MaturityLevel::Leading);
    }

    #[test]
    fn test_mid_scale_submission() {
        let result = compute_scores(&CategoryRatings::uniform(3));
        assert_eq!(result.total, 144);
        assert_eq!(result.max_possible, 240);
        assert_eq!(result.percentage, 60.0);
        assert_eq!(result.grade, Grade::D);
        assert_eq!(result.maturity, MaturityLevel::Aware);
        assert_eq!(result.substitutions, 0);
        assert_eq!(result.percentage_label(), "60.0%");
        assert_eq!(result.total_label(), "144 / 240");
    }

    #[test]
    fn test_perfect_and_minimum_scores() {
        let top = compute_scores(&CategoryRatings::uniform(5));
        assert_eq!(top.percentage, 100.0);
        assert_eq!(top.grade, Grade::A);
        assert_eq!(top.maturity, MaturityLevel::Leading);

        let bottom = compute_scores(&CategoryRatings::uniform(1));
        assert_eq!(bottom.percentage, 20.0);
        assert_eq!(bottom.grade, Grade::F);
        assert_eq!(bottom.maturity, MaturityLevel::Unaware);
    }

    #[test]
    fn test_invalid_ratings_are_substituted() {
        let mut ratings = CategoryRatings::uniform(3);
        ratings.goal_clarity = vec![0, 7, -2, 3];
        ratings.execution_capability.clear();

        let result = compute_scores(&ratings);
        assert_eq!(result.substitutions, 3 + 8);
        // Substituted values are mid-scale, so the result equals an all-3 run
        let goal = result.category(Category::GoalClarity);
        assert_eq!(goal.total, 12);
        assert_eq!(goal.item_count, 4);
        assert_eq!(result.category(Category::ExecutionCapability).item_count, 8);
    }

    #[test]
    fn test_strongest_and_weakest() {
        let mut ratings = CategoryRatings::uniform(3);
        ratings.technical_infrastructure = vec![5; 8];
        ratings.goal_clarity = vec![1; 8];

        let result = compute_scores(&ratings);
        assert_eq!(
            result.strongest(1)[0].category,
            Category::TechnicalInfrastructure
        );
        assert_eq!(result.weakest(1)[0].category, Category::GoalClarity);

        // Ties keep report order
        let weakest = result.weakest(3);
        assert_eq!(weakest[1].category, Category::BusinessFoundation);
        assert_eq!(weakest[2].category, Category::CurrentAiAdoption);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut ratings = CategoryRatings::uniform(4);
        ratings.current_ai_adoption = vec![1, 2, 3, 4, 5, 1, 2, 3];
        assert_eq!(compute_scores(&ratings), compute_scores(&ratings));
    }

    fn ratings_strategy() -> impl Strategy<Value = CategoryRatings> {
        proptest::collection::vec(proptest::collection::vec(1i32..=5, 1..=10), 6).prop_map(
            |lists| {
                let mut ratings = CategoryRatings::default();
                for (category, list) in Category::ALL.iter().zip(lists) {
                    *ratings.get_mut(*category) = list;
                }
                ratings
            },
        )
    }

    proptest! {
        #[test]
        fn prop_raising_a_rating_never_lowers_score(
            ratings in ratings_strategy(),
            category_idx in 0usize..6,
            item_seed in any::<usize>(),
        ) {
            let category = Category::ALL[category_idx];
            let len = ratings.get(category).len();
            let item = item_seed % len;
            prop_assume!(ratings.get(category)[item] < 5);

            let before = compute_scores(&ratings);
            let mut raised = ratings.clone();
            raised.get_mut(category)[item] += 1;
            let after = compute_scores(&raised);

            prop_assert!(after.total > before.total);
            prop_assert!(after.percentage >= before.percentage);
            prop_assert!(after.grade >= before.grade);
            prop_assert!(after.maturity >= before.maturity);
        }

        #[test]
        fn prop_substitution_keeps_ratings_in_range(raw in proptest::collection::vec(-10i32..20, 0..20)) {
            let (normalized, substitutions) = normalize_ratings(&raw);
            prop_assert!(!normalized.is_empty());
            prop_assert!(normalized.iter().all(|v| (1..=5).contains(v)));
            let invalid = raw.iter().filter(|v| !(1..=5).contains(*v)).count();
            if raw.is_empty() {
                prop_assert_eq!(substitutions, 8);
            } else {
                prop_assert_eq!(substitutions, invalid);
            }
        }
    }
}
