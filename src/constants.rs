//! Global Constants
//!
//! Centralized constants for scoring, banding and quality tuning.
//! All magic numbers should be defined here with documentation.

/// Self-assessment rating constants
pub mod rating {
    /// Lowest valid Likert rating
    pub const MIN: u8 = 1;

    /// Highest valid Likert rating
    pub const MAX: u8 = 5;

    /// Substitute for missing or out-of-range ratings
    pub const MID_SCALE_DEFAULT: u8 = 3;

    /// Nominal number of items per capability category
    pub const ITEMS_PER_CATEGORY: usize = 8;

    /// Number of capability categories
    pub const CATEGORY_COUNT: usize = 6;
}

/// Letter grade bands (inclusive lower bounds on percentage)
pub mod grade {
    pub const A: f64 = 90.0;
    pub const B: f64 = 80.0;
    pub const C: f64 = 70.0;
    pub const D: f64 = 60.0;
}

/// Maturity bands (exclusive lower bounds on percentage)
pub mod maturity {
    pub const LEADING: f64 = 80.0;
    pub const ADOPTING: f64 = 60.0;
    pub const AWARE: f64 = 40.0;
}

/// Industry recommendation banding
pub mod recommendation {
    /// Below this share of the peer average a company is in the foundational bucket
    pub const FOUNDATIONAL_RATIO: f64 = 0.7;

    /// Above this share of the peer average a company is in the advanced bucket
    pub const ADVANCED_RATIO: f64 = 1.0;

    /// Code of the catalog entry used for unknown classifications
    pub const DEFAULT_INDUSTRY: &str = "general";
}

/// Pipeline constants
pub mod pipeline {
    /// Default quality gate threshold (0-100)
    pub const DEFAULT_QUALITY_THRESHOLD: f64 = 80.0;

    /// Number of sections the full report is expected to contain
    pub const TARGET_SECTION_COUNT: usize = 24;

    /// Version stamped into report metadata
    pub const PIPELINE_VERSION: &str = "2.0";

    /// Version stamped into legacy branch metadata
    pub const LEGACY_PIPELINE_VERSION: &str = "1.0-simple";

    /// Smallest body accepted as a well-formed report (bytes)
    pub const MIN_REPORT_BYTES: usize = 1024;

    /// Step names of the full diagnosis run, in execution order
    pub mod steps {
        pub const DATA_VALIDATION: &str = "data-validation";
        pub const DATA_RETRIEVAL: &str = "data-retrieval";
        pub const SCORE_CALCULATION: &str = "score-calculation";
        pub const REPORT_GENERATION: &str = "report-generation";
        pub const QUALITY_CHECK: &str = "quality-check";
    }
}

/// Quality assessment constants
pub mod quality {
    /// Elapsed time at or under which responsiveness scores 100
    pub const DEFAULT_RESPONSIVENESS_BUDGET_MS: u64 = 3_000;

    /// Responsiveness reaches 0 at this multiple of the budget
    pub const RESPONSIVENESS_ZERO_FACTOR: u64 = 10;

    /// Share of well-sized sentences at which clarity saturates
    pub const CLARITY_SATURATION: f64 = 0.85;

    /// Sentence length band considered readable (words)
    pub const SENTENCE_WORDS_MIN: usize = 4;
    pub const SENTENCE_WORDS_MAX: usize = 30;

    /// Points per actionable marker occurrence
    pub const HELPFULNESS_POINTS_PER_MARKER: f64 = 5.0;

    /// Company name mentions at which personalization saturates
    pub const NAME_MENTIONS_SATURATION: usize = 5;

    /// Industry mentions at which personalization saturates
    pub const INDUSTRY_MENTIONS_SATURATION: usize = 3;

    /// Weight tolerance when validating that weights sum to 1.0
    pub const WEIGHT_TOLERANCE: f64 = 0.001;
}
