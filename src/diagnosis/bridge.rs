//! Compatibility Bridge
//!
//! Adapts the historic submission record into a [`Submission`] with one
//! field-by-field mapping, and guarantees a document for every caller: when
//! adaptation or the controller fails, a minimal fallback report is produced
//! instead.
//!
//! ## Field Mapping
//!
//! | Legacy field (aliases)                            | Submission field            | Default            |
//! |---------------------------------------------------|-----------------------------|--------------------|
//! | `companyName` (`company`, `companyNm`)            | `company.name`              | "Unnamed Company"  |
//! | `industry` (`industryType`, `businessType`)       | `company.industry`          | "general"          |
//! | `employeeCount` (`employees`)                     | `company.employee_bracket`  | empty              |
//! | `annualRevenue` (`revenue`)                       | `company.revenue_bracket`   | empty              |
//! | `location` (`region`, `address`)                  | `company.location`          | empty              |
//! | `contactName` / `email` / `phone`                 | `company.contact`           | empty              |
//! | `currentAiUsage` (`aiUsage`)                      | `ai_context.usage_level`    | empty              |
//! | `aiBudget` (`budget`)                             | `ai_context.budget_bracket` | empty              |
//! | `aiGoals` (`goals`, `mainGoals`)                  | `ai_context.goals`          | none               |
//! | `priorityAreas` (`priorities`)                    | `ai_context.priority_areas` | none               |
//! | `timeframe` (`implementationPeriod`)              | `ai_context.timeframe`      | empty              |
//! | `consent` (`privacyConsent`, `agreeToTerms`)      | `consent`                   | `false`            |
//! | `q1`..`q48` (top level or under `responses`)      | six categories of eight     | 3 (mid-scale)      |
//!
//! Values may arrive as strings, numbers, booleans, comma-separated lists or
//! arrays; each field is coerced explicitly.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{DiagnosisController, DiagnosisOptions};
use crate::constants::rating;
use crate::constants::recommendation::DEFAULT_INDUSTRY;
use crate::scoring::compute_scores;
use crate::types::{
    AiContext, Category, CategoryRatings, CompanyProfile, ContactInfo, DiagnosisError,
    FailureKind, ProcessResult, Result, Submission, SubmissionMetadata, is_valid_rating,
    panic_message,
};

const UNNAMED_COMPANY: &str = "Unnamed Company";
const FALLBACK_VERSION: &str = "fallback";

// =============================================================================
// Legacy Record
// =============================================================================

/// Submission record in the historic, loosely typed shape
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyRecord {
    #[serde(alias = "company", alias = "companyNm")]
    pub company_name: Option<Value>,
    #[serde(alias = "industryType", alias = "businessType")]
    pub industry: Option<Value>,
    #[serde(alias = "employees")]
    pub employee_count: Option<Value>,
    #[serde(alias = "revenue")]
    pub annual_revenue: Option<Value>,
    #[serde(alias = "region", alias = "address")]
    pub location: Option<Value>,
    pub contact_name: Option<Value>,
    #[serde(alias = "contactEmail")]
    pub email: Option<Value>,
    #[serde(alias = "contactPhone")]
    pub phone: Option<Value>,
    #[serde(alias = "aiUsage")]
    pub current_ai_usage: Option<Value>,
    #[serde(alias = "budget")]
    pub ai_budget: Option<Value>,
    #[serde(alias = "goals", alias = "mainGoals")]
    pub ai_goals: Option<Value>,
    #[serde(alias = "priorities")]
    pub priority_areas: Option<Value>,
    #[serde(alias = "implementationPeriod")]
    pub timeframe: Option<Value>,
    #[serde(alias = "privacyConsent", alias = "agreeToTerms")]
    pub consent: Option<Value>,
    #[serde(alias = "session")]
    pub session_id: Option<Value>,
    /// `{ "q1": 4, ... }` or `[4, 3, ...]`
    #[serde(alias = "answers", alias = "assessmentResponses")]
    pub responses: Option<Value>,
    /// Everything else, including top-level `q1`..`q48`
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl LegacyRecord {
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(DiagnosisError::Adaptation(format!(
                "expected a JSON object, got {}",
                value_kind(value)
            )));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| DiagnosisError::Adaptation(e.to_string()))
    }

    /// Raw answer to question `n` (1-based)
    fn response(&self, n: usize) -> Option<&Value> {
        let key = format!("q{}", n);
        let nested = match &self.responses {
            Some(Value::Object(map)) => map.get(&key),
            Some(Value::Array(items)) => items.get(n - 1),
            _ => None,
        };
        nested.or_else(|| self.extra.get(&key))
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Coercion
// =============================================================================

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| text(Some(v)))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| text(Some(v)))
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(other @ (Value::Number(_) | Value::Bool(_))) => vec![text(Some(other))],
        _ => Vec::new(),
    }
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "yes" | "y" | "on" | "1" | "agree" | "agreed"
        ),
        _ => false,
    }
}

/// A 1-5 rating, or the mid-scale default for anything else
fn rating_value(value: Option<&Value>) -> i32 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .map(|v| v.round() as i32)
        .filter(|v| is_valid_rating(*v))
        .unwrap_or(i32::from(rating::MID_SCALE_DEFAULT))
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

// =============================================================================
// Adaptation
// =============================================================================

/// Map a legacy record onto the current submission shape.
///
/// Every rating lands in [1, 5] and consent defaults to `false`.
pub fn adapt(record: &LegacyRecord) -> Submission {
    let mut ratings = CategoryRatings::default();
    for category in Category::ALL {
        let first = category.index() * rating::ITEMS_PER_CATEGORY + 1;
        *ratings.get_mut(category) = (first..first + rating::ITEMS_PER_CATEGORY)
            .map(|n| rating_value(record.response(n)))
            .collect();
    }

    let session_id = text(record.session_id.as_ref());
    let mut extra = BTreeMap::new();
    extra.insert("source".to_string(), Value::String("legacy".to_string()));

    Submission {
        company: CompanyProfile {
            name: non_empty_or(text(record.company_name.as_ref()), UNNAMED_COMPANY),
            industry: non_empty_or(text(record.industry.as_ref()), DEFAULT_INDUSTRY),
            employee_bracket: text(record.employee_count.as_ref()),
            revenue_bracket: text(record.annual_revenue.as_ref()),
            location: text(record.location.as_ref()),
            contact: ContactInfo {
                name: text(record.contact_name.as_ref()),
                email: text(record.email.as_ref()),
                phone: text(record.phone.as_ref()),
            },
        },
        ai_context: AiContext {
            usage_level: text(record.current_ai_usage.as_ref()),
            budget_bracket: text(record.ai_budget.as_ref()),
            goals: list(record.ai_goals.as_ref()),
            priority_areas: list(record.priority_areas.as_ref()),
            timeframe: text(record.timeframe.as_ref()),
        },
        ratings,
        consent: flag(record.consent.as_ref()),
        metadata: SubmissionMetadata {
            session_id: (!session_id.is_empty()).then_some(session_id),
            extra,
            ..Default::default()
        },
    }
}

/// Parse and adapt a raw JSON value
pub fn adapt_json(value: &Value) -> Result<Submission> {
    LegacyRecord::from_value(value).map(|record| adapt(&record))
}

/// Minimal summary document; never fails
pub fn fallback_report(record: &LegacyRecord) -> String {
    let submission = adapt(record);
    let scores = compute_scores(&submission.ratings);

    let mut md = format!(
        "# AI Capability Diagnosis Summary: {}\n\n",
        submission.company.name
    );
    md.push_str("The detailed report could not be generated. A short summary follows.\n\n");
    md.push_str(&format!(
        "- Overall score: {} ({})\n- Grade: {}\n- Maturity: {}\n\n",
        scores.total_label(),
        scores.percentage_label(),
        scores.grade,
        scores.maturity.title()
    ));
    md.push_str("| Category | Percentage |\n|----------|------------|\n");
    for c in &scores.categories {
        md.push_str(&format!("| {} | {:.1}% |\n", c.category.title(), c.percentage));
    }
    md.push_str("\nA consultant will follow up with the full analysis.\n");
    md
}

// =============================================================================
// Bridge
// =============================================================================

/// Legacy entry point that always yields a document
#[derive(Debug, Clone)]
pub struct CompatibilityBridge {
    controller: Arc<DiagnosisController>,
    options: DiagnosisOptions,
}

impl CompatibilityBridge {
    pub fn new(controller: Arc<DiagnosisController>, options: DiagnosisOptions) -> Self {
        Self {
            controller,
            options,
        }
    }

    /// Adapt, run the full diagnosis and fall back on any failure.
    ///
    /// The returned result always carries a report body. When the fallback is
    /// used, `success` is false and `error` names the original failure.
    #[instrument(skip_all)]
    pub fn process(&self, value: &Value) -> ProcessResult {
        let start = Instant::now();

        let (record, adaptation_error) = match LegacyRecord::from_value(value) {
            Ok(record) => (record, None),
            Err(err) => {
                warn!("Legacy record could not be parsed: {}", err);
                (LegacyRecord::default(), Some(err))
            }
        };
        if let Some(err) = adaptation_error {
            return self.fallback(&record, &err, start);
        }

        let submission = adapt(&record);
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.controller
                .process_complete_diagnosis(&submission, &self.options)
        }));

        match outcome {
            Ok(result) if result.success => {
                info!("Legacy record processed by the full pipeline");
                result
            }
            Ok(result) => {
                let message = result
                    .error
                    .clone()
                    .unwrap_or_else(|| "diagnosis failed".to_string());
                let kind = result.failure.unwrap_or(FailureKind::Unexpected);
                let mut fallback = self.fallback_with(&record, message, kind, start);
                fallback.steps = result.steps;
                fallback
            }
            Err(payload) => {
                let err = DiagnosisError::StepPanicked {
                    step: "diagnosis".to_string(),
                    message: panic_message(payload.as_ref()),
                };
                self.fallback(&record, &err, start)
            }
        }
    }

    fn fallback(&self, record: &LegacyRecord, err: &DiagnosisError, start: Instant) -> ProcessResult {
        self.fallback_with(record, err.to_string(), err.failure_kind(), start)
    }

    fn fallback_with(
        &self,
        record: &LegacyRecord,
        error: String,
        kind: FailureKind,
        start: Instant,
    ) -> ProcessResult {
        warn!("Using fallback report: {}", error);
        let mut result = ProcessResult::failed(error, kind, start.elapsed().as_millis() as u64);
        result.message = format!("Fallback report generated ({})", FALLBACK_VERSION);
        result.report = Some(fallback_report(record));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_record() -> Value {
        let mut record = json!({
            "companyName": "Daehan Logistics",
            "industryType": "logistics",
            "employees": 120,
            "revenue": "50B KRW",
            "region": "Busan",
            "contactName": "Minji Kim",
            "email": "minji@daehan.example",
            "aiUsage": "chat assistants only",
            "budget": "30M KRW",
            "goals": "route optimization, fewer manual entries",
            "priorities": ["dispatch", "warehouse"],
            "implementationPeriod": "within 12 months",
            "privacyConsent": "on",
            "sessionId": "legacy-42"
        });
        for n in 1..=48 {
            record[format!("q{}", n)] = json!(4);
        }
        record
    }

    fn bridge() -> CompatibilityBridge {
        CompatibilityBridge::new(
            Arc::new(DiagnosisController::default()),
            DiagnosisOptions::default(),
        )
    }

    #[test]
    fn test_adapt_maps_aliases_and_coerces() {
        let submission = adapt_json(&full_record()).unwrap();
        assert_eq!(submission.company.name, "Daehan Logistics");
        assert_eq!(submission.company.industry, "logistics");
        assert_eq!(submission.company.employee_bracket, "120");
        assert_eq!(submission.company.location, "Busan");
        assert_eq!(
            submission.ai_context.goals,
            vec!["route optimization", "fewer manual entries"]
        );
        assert_eq!(submission.ai_context.priority_areas.len(), 2);
        assert!(submission.consent);
        assert_eq!(submission.session_id(), Some("legacy-42"));
        assert_eq!(submission.ratings, CategoryRatings::uniform(4));
    }

    #[test]
    fn test_adapt_empty_record_satisfies_invariants() {
        let submission = adapt(&LegacyRecord::default());
        assert!(!submission.consent);
        assert_eq!(submission.company.name, UNNAMED_COMPANY);
        assert_eq!(submission.company.industry, DEFAULT_INDUSTRY);
        assert_eq!(submission.ratings.item_count(), 48);
        assert!(submission.ratings.out_of_range().is_empty());
        assert_eq!(submission.ratings, CategoryRatings::uniform(3));
    }

    #[test]
    fn test_responses_block_and_bad_values() {
        let record = json!({
            "answers": { "q1": "5", "q2": 9, "q3": "n/a", "q9": 1.6 },
            "q10": 2
        });
        let submission = adapt_json(&record).unwrap();
        assert_eq!(submission.ratings.business_foundation[..3], [5, 3, 3]);
        assert_eq!(submission.ratings.current_ai_adoption[0], 2);
        assert_eq!(submission.ratings.current_ai_adoption[1], 2);
    }

    #[test]
    fn test_responses_as_array() {
        let answers: Vec<Value> = (0..48).map(|i| json!(i % 5 + 1)).collect();
        let submission = adapt_json(&json!({ "responses": answers })).unwrap();
        assert_eq!(submission.ratings.business_foundation[0], 1);
        assert_eq!(submission.ratings.business_foundation[4], 5);
        assert!(submission.ratings.out_of_range().is_empty());
    }

    #[test]
    fn test_consent_coercion() {
        assert!(flag(Some(&json!("YES"))));
        assert!(flag(Some(&json!(1))));
        assert!(!flag(Some(&json!("off"))));
        assert!(!flag(Some(&json!(null))));
        assert!(!flag(None));
    }

    #[test]
    fn test_adapt_json_rejects_non_objects() {
        assert!(matches!(
            adapt_json(&json!([1, 2, 3])),
            Err(DiagnosisError::Adaptation(_))
        ));
    }

    #[test]
    fn test_fallback_report_for_empty_record() {
        let report = fallback_report(&LegacyRecord::default());
        assert!(report.starts_with("# AI Capability Diagnosis Summary: Unnamed Company"));
        assert!(report.contains("60.0%"));
    }

    #[test]
    fn test_process_full_record_uses_pipeline() {
        let result = bridge().process(&full_record());
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.metadata.unwrap().industry, "logistics");
    }

    #[test]
    fn test_process_without_consent_falls_back() {
        let mut record = full_record();
        record["privacyConsent"] = json!(false);
        let result = bridge().process(&record);

        assert!(!result.success);
        assert_eq!(result.failure, Some(FailureKind::Validation));
        assert!(result.report.unwrap().contains("Daehan Logistics"));
        assert_eq!(result.steps.len(), 1);
    }

    #[test]
    fn test_process_never_fails_on_garbage() {
        for value in [json!(null), json!("text"), json!(42), json!({ "companyName": {} })] {
            let result = bridge().process(&value);
            assert!(result.report.is_some());
            assert!(!result.success);
        }
    }
}
