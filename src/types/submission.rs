//! Submission Types
//!
//! The validated self-assessment input. A [`Submission`] is constructed once by
//! the caller (or synthesized by the compatibility bridge) and only read by the
//! pipeline stages.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::rating;

// =============================================================================
// Capability Categories
// =============================================================================

/// One of the six fixed capability dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    BusinessFoundation,
    CurrentAiAdoption,
    OrganizationalReadiness,
    TechnicalInfrastructure,
    GoalClarity,
    ExecutionCapability,
}

impl Category {
    /// All categories in report order
    pub const ALL: [Category; rating::CATEGORY_COUNT] = [
        Category::BusinessFoundation,
        Category::CurrentAiAdoption,
        Category::OrganizationalReadiness,
        Category::TechnicalInfrastructure,
        Category::GoalClarity,
        Category::ExecutionCapability,
    ];

    /// Human-readable title
    pub fn title(&self) -> &'static str {
        match self {
            Self::BusinessFoundation => "Business Foundation",
            Self::CurrentAiAdoption => "Current AI Adoption",
            Self::OrganizationalReadiness => "Organizational Readiness",
            Self::TechnicalInfrastructure => "Technical Infrastructure",
            Self::GoalClarity => "Goal Clarity",
            Self::ExecutionCapability => "Execution Capability",
        }
    }

    /// Stable machine key
    pub fn key(&self) -> &'static str {
        match self {
            Self::BusinessFoundation => "business_foundation",
            Self::CurrentAiAdoption => "current_ai_adoption",
            Self::OrganizationalReadiness => "organizational_readiness",
            Self::TechnicalInfrastructure => "technical_infrastructure",
            Self::GoalClarity => "goal_clarity",
            Self::ExecutionCapability => "execution_capability",
        }
    }

    /// Relative importance used by the priority matrix (1-3)
    pub fn importance(&self) -> u8 {
        match self {
            Self::CurrentAiAdoption | Self::ExecutionCapability => 3,
            Self::OrganizationalReadiness | Self::TechnicalInfrastructure => 2,
            Self::BusinessFoundation | Self::GoalClarity => 1,
        }
    }

    /// Zero-based position in [`Category::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

// =============================================================================
// Submission
// =============================================================================

/// One company's self-reported AI-capability assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub company: CompanyProfile,
    pub ai_context: AiContext,
    pub ratings: CategoryRatings,
    pub consent: bool,
    #[serde(default)]
    pub metadata: SubmissionMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: String,
    /// Industry classification code, resolved by the industry engine
    pub industry: String,
    pub employee_bracket: String,
    pub revenue_bracket: String,
    pub location: String,
    pub contact: ContactInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// AI-adoption context block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AiContext {
    pub usage_level: String,
    pub budget_bracket: String,
    pub goals: Vec<String>,
    pub priority_areas: Vec<String>,
    pub timeframe: String,
}

/// Six ordered lists of 1-5 ratings, one per category.
///
/// Values are kept as submitted; the score calculator substitutes the
/// mid-scale default for anything outside the valid range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryRatings {
    pub business_foundation: Vec<i32>,
    pub current_ai_adoption: Vec<i32>,
    pub organizational_readiness: Vec<i32>,
    pub technical_infrastructure: Vec<i32>,
    pub goal_clarity: Vec<i32>,
    pub execution_capability: Vec<i32>,
}

impl CategoryRatings {
    /// Every category filled with the same value
    pub fn uniform(value: i32) -> Self {
        let items = vec![value; rating::ITEMS_PER_CATEGORY];
        Self {
            business_foundation: items.clone(),
            current_ai_adoption: items.clone(),
            organizational_readiness: items.clone(),
            technical_infrastructure: items.clone(),
            goal_clarity: items.clone(),
            execution_capability: items,
        }
    }

    pub fn get(&self, category: Category) -> &[i32] {
        match category {
            Category::BusinessFoundation => &self.business_foundation,
            Category::CurrentAiAdoption => &self.current_ai_adoption,
            Category::OrganizationalReadiness => &self.organizational_readiness,
            Category::TechnicalInfrastructure => &self.technical_infrastructure,
            Category::GoalClarity => &self.goal_clarity,
            Category::ExecutionCapability => &self.execution_capability,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<i32> {
        match category {
            Category::BusinessFoundation => &mut self.business_foundation,
            Category::CurrentAiAdoption => &mut self.current_ai_adoption,
            Category::OrganizationalReadiness => &mut self.organizational_readiness,
            Category::TechnicalInfrastructure => &mut self.technical_infrastructure,
            Category::GoalClarity => &mut self.goal_clarity,
            Category::ExecutionCapability => &mut self.execution_capability,
        }
    }

    /// Iterate categories with their ratings in report order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[i32])> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Total number of rating items across all categories
    pub fn item_count(&self) -> usize {
        self.iter().map(|(_, r)| r.len()).sum()
    }

    /// Ratings outside `[1, 5]`, as `(category, position, value)`
    pub fn out_of_range(&self) -> Vec<(Category, usize, i32)> {
        self.iter()
            .flat_map(|(category, ratings)| {
                ratings
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| !is_valid_rating(**v))
                    .map(move |(i, v)| (category, i, *v))
            })
            .collect()
    }
}

/// Whether a raw rating lies in the Likert range
pub fn is_valid_rating(value: i32) -> bool {
    (i32::from(rating::MIN)..=i32::from(rating::MAX)).contains(&value)
}

/// Free-form submission metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionMetadata {
    pub session_id: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub locale: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Submission {
    /// Plain-text rendering of the submitted descriptors.
    ///
    /// Used as the "original input" side of the quality assessment.
    pub fn summary_text(&self) -> String {
        let mut parts = vec![
            self.company.name.clone(),
            self.company.industry.clone(),
            self.company.employee_bracket.clone(),
            self.company.location.clone(),
            self.ai_context.usage_level.clone(),
            self.ai_context.timeframe.clone(),
        ];
        parts.extend(self.ai_context.goals.iter().cloned());
        parts.extend(self.ai_context.priority_areas.iter().cloned());
        parts.retain(|p| !p.trim().is_empty());
        parts.join(". ")
    }

    /// Submission id from metadata, if the caller supplied one
    pub fn session_id(&self) -> Option<&str> {
        self.metadata
            .session_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A complete, consented submission with every rating set to `value`
    pub(crate) fn submission_with(industry: &str, value: i32) -> Submission {
        Submission {
            company: CompanyProfile {
                name: "Hanbit Precision".to_string(),
                industry: industry.to_string(),
                employee_bracket: "50-99".to_string(),
                revenue_bracket: "10B-50B KRW".to_string(),
                location: "Incheon".to_string(),
                contact: ContactInfo {
                    name: "Jiwoo Park".to_string(),
                    email: "jiwoo.park@hanbit.example".to_string(),
                    phone: "010-0000-0000".to_string(),
                },
            },
            ai_context: AiContext {
                usage_level: "pilot projects".to_string(),
                budget_bracket: "50M-100M KRW".to_string(),
                goals: vec![
                    "reduce inspection costs".to_string(),
                    "faster quoting".to_string(),
                ],
                priority_areas: vec![
                    "quality inspection".to_string(),
                    "document automation".to_string(),
                ],
                timeframe: "within 6 months".to_string(),
            },
            ratings: CategoryRatings::uniform(value),
            consent: true,
            metadata: SubmissionMetadata {
                session_id: Some("session-001".to_string()),
                ..Default::default()
            },
        }
    }

    pub(crate) fn sample_submission() -> Submission {
        submission_with("manufacturing", 3)
    }
}
