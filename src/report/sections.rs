//! Report sections in their fixed order, with one renderer per section.
//!
//! Every renderer is a pure function of the [`ReportContext`]; none of them
//! reads the clock or any other ambient state.

use crate::industry::{DevelopmentBand, IndustryInsight, Recommendation};
use crate::scoring::{CategoryScore, MaturityLevel, ScoringResult};
use crate::types::{Category, Submission};

/// Inputs shared by all section renderers
pub struct ReportContext<'a> {
    pub submission: &'a Submission,
    pub scores: &'a ScoringResult,
    pub insight: &'a IndustryInsight,
    pub recommendation: Recommendation,
}

impl ReportContext<'_> {
    /// Company name as written in prose
    pub fn company(&self) -> &str {
        let name = self.submission.company.name.trim();
        if name.is_empty() { "The company" } else { name }
    }

    fn industry(&self) -> &str {
        &self.insight.name
    }
}

// =============================================================================
// Section Kinds
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Cover,
    ExecutiveSummary,
    ScoreDashboard,
    BenchmarkComparison,
    CategoryDeepDive(Category),
    Swot,
    PriorityMatrix,
    AutomationOpportunities,
    AutomationPlan,
    RoadmapPhase(u8),
    RoiAnalysis,
    RiskAnalysis,
    PolicySupport,
    TrendAnalysis,
    SuccessStories,
    CurriculumRecommendation,
    Conclusion,
}

impl SectionKind {
    /// All sections in report order
    pub fn sequence() -> Vec<SectionKind> {
        let mut kinds = vec![
            Self::Cover,
            Self::ExecutiveSummary,
            Self::ScoreDashboard,
            Self::BenchmarkComparison,
        ];
        kinds.extend(Category::ALL.into_iter().map(Self::CategoryDeepDive));
        kinds.extend([
            Self::Swot,
            Self::PriorityMatrix,
            Self::AutomationOpportunities,
            Self::AutomationPlan,
            Self::RoadmapPhase(1),
            Self::RoadmapPhase(2),
            Self::RoadmapPhase(3),
            Self::RoiAnalysis,
            Self::RiskAnalysis,
            Self::PolicySupport,
            Self::TrendAnalysis,
            Self::SuccessStories,
            Self::CurriculumRecommendation,
            Self::Conclusion,
        ]);
        kinds
    }

    pub fn title(&self) -> String {
        match self {
            Self::Cover => "Cover".to_string(),
            Self::ExecutiveSummary => "Executive Summary".to_string(),
            Self::ScoreDashboard => "Score Dashboard".to_string(),
            Self::BenchmarkComparison => "Benchmark Comparison".to_string(),
            Self::CategoryDeepDive(category) => format!("{} Analysis", category.title()),
            Self::Swot => "SWOT Analysis".to_string(),
            Self::PriorityMatrix => "Priority Matrix".to_string(),
            Self::AutomationOpportunities => "Automation Opportunities".to_string(),
            Self::AutomationPlan => "Automation Implementation Plan".to_string(),
            Self::RoadmapPhase(phase) => format!("Roadmap Phase {}", phase),
            Self::RoiAnalysis => "ROI Analysis".to_string(),
            Self::RiskAnalysis => "Risk Analysis".to_string(),
            Self::PolicySupport => "Policy and Support Programs".to_string(),
            Self::TrendAnalysis => "Trend Analysis".to_string(),
            Self::SuccessStories => "Success Stories".to_string(),
            Self::CurriculumRecommendation => "Curriculum Recommendation".to_string(),
            Self::Conclusion => "Conclusion".to_string(),
        }
    }

    /// Section body without its heading
    pub fn render(&self, ctx: &ReportContext<'_>) -> String {
        match self {
            Self::Cover => cover(ctx),
            Self::ExecutiveSummary => executive_summary(ctx),
            Self::ScoreDashboard => score_dashboard(ctx),
            Self::BenchmarkComparison => benchmark_comparison(ctx),
            Self::CategoryDeepDive(category) => category_deep_dive(ctx, *category),
            Self::Swot => swot(ctx),
            Self::PriorityMatrix => priority_matrix(ctx),
            Self::AutomationOpportunities => automation_opportunities(ctx),
            Self::AutomationPlan => automation_plan(ctx),
            Self::RoadmapPhase(phase) => roadmap_phase(ctx, *phase),
            Self::RoiAnalysis => roi_analysis(ctx),
            Self::RiskAnalysis => risk_analysis(ctx),
            Self::PolicySupport => policy_support(ctx),
            Self::TrendAnalysis => trend_analysis(ctx),
            Self::SuccessStories => success_stories(ctx),
            Self::CurriculumRecommendation => curriculum(ctx),
            Self::Conclusion => conclusion(ctx),
        }
    }
}

// =============================================================================
// Renderers
// =============================================================================

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        "Not specified"
    } else {
        value
    }
}

fn cover(ctx: &ReportContext<'_>) -> String {
    let company = &ctx.submission.company;
    let ai = &ctx.submission.ai_context;
    let mut md = format!(
        "This report presents the AI capability diagnosis for {}.\n\n",
        ctx.company()
    );
    md.push_str("| Field | Value |\n|-------|-------|\n");
    let rows = [
        ("Company", company.name.as_str()),
        ("Industry classification", company.industry.as_str()),
        ("Reference industry", ctx.industry()),
        ("Employees", company.employee_bracket.as_str()),
        ("Revenue", company.revenue_bracket.as_str()),
        ("Location", company.location.as_str()),
        ("Current AI usage", ai.usage_level.as_str()),
        ("AI budget", ai.budget_bracket.as_str()),
        ("Timeframe", ai.timeframe.as_str()),
    ];
    for (field, value) in rows {
        md.push_str(&format!("| {} | {} |\n", field, or_unspecified(value)));
    }
    if !company.contact.name.trim().is_empty() {
        md.push_str(&format!(
            "\nThis report was prepared for {}.\n",
            company.contact.name.trim()
        ));
    }
    md
}

fn executive_summary(ctx: &ReportContext<'_>) -> String {
    let s = ctx.scores;
    let company = ctx.company();
    let mut md = format!(
        "{} scored {} points, which is {} of the maximum.\n",
        company,
        s.total_label(),
        s.percentage_label()
    );
    md.push_str(&format!(
        "This result corresponds to Grade {} and the {} maturity level.\n",
        s.grade,
        s.maturity.title()
    ));
    md.push_str(&format!("{}\n", s.maturity.description()));
    md.push_str(&format!(
        "Compared with the {} peer average of {:.1}%, {} falls in the {} band.\n",
        ctx.industry(),
        ctx.insight.benchmarks.peer_average,
        company,
        ctx.recommendation.band.title().to_lowercase()
    ));
    if let (Some(strong), Some(weak)) = (s.strongest(1).first(), s.weakest(1).first()) {
        md.push_str(&format!(
            "The strongest area is {} and the area needing the most attention is {}.\n",
            strong.category.title(),
            weak.category.title()
        ));
    }
    let ai = &ctx.submission.ai_context;
    if !ai.usage_level.trim().is_empty() {
        md.push_str(&format!(
            "Current AI usage at {} is described as {}.\n",
            company, ai.usage_level
        ));
    }
    if !ai.goals.is_empty() || !ai.priority_areas.is_empty() {
        md.push('\n');
    }
    for goal in &ai.goals {
        md.push_str(&format!("- Stated goal for {}: {}.\n", company, goal));
    }
    for area in &ai.priority_areas {
        md.push_str(&format!("- Priority area named by {}: {}.\n", company, area));
    }
    md
}

fn score_dashboard(ctx: &ReportContext<'_>) -> String {
    let s = ctx.scores;
    let mut md = String::from("| Category | Score | Percentage | Average |\n");
    md.push_str("|----------|-------|------------|---------|\n");
    for c in &s.categories {
        md.push_str(&format!(
            "| {} | {} / {} | {:.1}% | {:.2} |\n",
            c.category.title(),
            c.total,
            c.max,
            c.percentage,
            c.average
        ));
    }
    md.push_str(&format!(
        "| **Total** | {} | {} | Grade {} |\n\n",
        s.total_label(),
        s.percentage_label(),
        s.grade
    ));
    md.push_str(&format!(
        "The overall score is {} ({}) and the maturity level is {}.\n",
        s.total_label(),
        s.percentage_label(),
        s.maturity.title()
    ));
    if s.substitutions > 0 {
        md.push_str(&format!(
            "A total of {} missing or invalid ratings were replaced with the mid-scale value.\n",
            s.substitutions
        ));
    }
    md
}

fn benchmark_comparison(ctx: &ReportContext<'_>) -> String {
    let b = &ctx.insight.benchmarks;
    let rec = &ctx.recommendation;
    let mut md = String::from("| Metric | Value |\n|--------|-------|\n");
    md.push_str(&format!("| {} | {} |\n", ctx.company(), ctx.scores.percentage_label()));
    md.push_str(&format!("| {} peer average | {:.1}% |\n", ctx.industry(), b.peer_average));
    md.push_str(&format!("| {} top decile | {:.1}% |\n", ctx.industry(), b.top_decile));
    md.push_str(&format!("| Annual adoption growth | {:.1}% |\n\n", b.growth_trend));

    md.push_str(&format!(
        "{} reaches {:.0}% of the {} peer average.\n",
        ctx.company(),
        rec.ratio_to_average * 100.0,
        ctx.industry()
    ));
    if rec.gap_to_top_decile > 0.0 {
        md.push_str(&format!(
            "Closing the gap to the top decile requires {:.1} more percentage points.\n",
            rec.gap_to_top_decile
        ));
    } else {
        md.push_str("The current score already matches the top decile of the industry.\n");
    }
    md
}

fn category_status(percentage: f64) -> &'static str {
    if percentage >= 80.0 {
        "This is a clear strength that can anchor further AI initiatives."
    } else if percentage >= 60.0 {
        "This area is functional but has room for targeted improvement."
    } else {
        "This area is a bottleneck and should be addressed early."
    }
}

fn category_action(category: Category) -> &'static str {
    match category {
        Category::BusinessFoundation => {
            "link every AI initiative to a measurable business objective"
        }
        Category::CurrentAiAdoption => "expand current AI tools from individuals to whole teams",
        Category::OrganizationalReadiness => {
            "appoint an AI champion and train managers on change leadership"
        }
        Category::TechnicalInfrastructure => {
            "consolidate core data into one accessible and secure store"
        }
        Category::GoalClarity => "define two or three AI goals with owners and target dates",
        Category::ExecutionCapability => {
            "set up a small delivery team with a fixed pilot budget"
        }
    }
}

fn category_deep_dive(ctx: &ReportContext<'_>, category: Category) -> String {
    let c: &CategoryScore = ctx.scores.category(category);
    let mut md = format!(
        "{} scored {} of {} in {}, or {:.1}%.\n",
        ctx.company(),
        c.total,
        c.max,
        category.title(),
        c.percentage
    );
    md.push_str(&format!(
        "The average rating was {:.2} on a scale of 1 to 5.\n",
        c.average
    ));
    md.push_str(category_status(c.percentage));
    md.push('\n');
    md.push_str(&format!(
        "We recommend that {} {}.\n",
        ctx.company(),
        category_action(category)
    ));
    md
}

fn swot(ctx: &ReportContext<'_>) -> String {
    let s = ctx.scores;
    let company = ctx.company();
    let mut md = String::from("### Strengths\n\n");
    for c in s.strongest(2) {
        md.push_str(&format!(
            "- {} performs relatively well in {} at {:.1}%.\n",
            company,
            c.category.title(),
            c.percentage
        ));
    }
    md.push_str("\n### Weaknesses\n\n");
    for c in s.weakest(2) {
        md.push_str(&format!(
            "- {} is the weakest area at {:.1}% and limits progress.\n",
            c.category.title(),
            c.percentage
        ));
    }
    md.push_str("\n### Opportunities\n\n");
    for opportunity in ctx.recommendation.automation_opportunities.iter().take(2) {
        md.push_str(&format!(
            "- {} is proven in the {} sector.\n",
            opportunity,
            ctx.industry()
        ));
    }
    md.push_str("\n### Threats\n\n");
    md.push_str(&format!(
        "- Peers in {} are growing AI adoption by {:.1}% per year.\n",
        ctx.industry(),
        ctx.insight.benchmarks.growth_trend
    ));
    md.push_str("- Unmanaged use of public AI tools can expose confidential data.\n");
    md
}

fn priority_level(importance: u8, percentage: f64) -> &'static str {
    let urgency = f64::from(importance) * (100.0 - percentage) / 100.0;
    if urgency >= 1.2 {
        "High"
    } else if urgency >= 0.6 {
        "Medium"
    } else {
        "Low"
    }
}

fn priority_matrix(ctx: &ReportContext<'_>) -> String {
    let mut md = String::from("| Category | Importance | Gap | Priority |\n");
    md.push_str("|----------|------------|-----|----------|\n");
    for c in &ctx.scores.categories {
        let importance = c.category.importance();
        md.push_str(&format!(
            "| {} | {} | {:.1} | {} |\n",
            c.category.title(),
            importance,
            100.0 - c.percentage,
            priority_level(importance, c.percentage)
        ));
    }
    md.push_str("\nAddress high priority categories first and then move to medium ones.\n\n");
    for priority in &ctx.recommendation.priorities {
        md.push_str(&format!("- {}.\n", priority));
    }
    md
}

fn automation_opportunities(ctx: &ReportContext<'_>) -> String {
    let mut md = format!(
        "Based on the {} band, these automation opportunities fit {} best.\n\n",
        ctx.recommendation.band.title().to_lowercase(),
        ctx.company()
    );
    for opportunity in &ctx.recommendation.automation_opportunities {
        md.push_str(&format!(
            "- {} is a practical starting point for {} companies.\n",
            opportunity,
            ctx.industry()
        ));
    }
    md
}

fn automation_plan(ctx: &ReportContext<'_>) -> String {
    let first = ctx
        .recommendation
        .automation_opportunities
        .first()
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "the first automation candidate".to_string());
    let steps = [
        format!("Map the current process for {} and record baseline times.", first),
        "Select a tool and run a four-week pilot with one team.".to_string(),
        "Measure results against the baseline and decide on rollout.".to_string(),
        "Train the wider team and document the new workflow.".to_string(),
    ];
    let mut md = String::new();
    for (i, step) in steps.iter().enumerate() {
        md.push_str(&format!("{}. {}\n", i + 1, step));
    }
    md
}

fn roadmap_phase(ctx: &ReportContext<'_>, phase: u8) -> String {
    let Some(milestone) = ctx
        .recommendation
        .roadmap_milestones
        .iter()
        .find(|m| m.phase == phase)
    else {
        return format!("No actions are planned for phase {} at this stage.\n", phase);
    };
    let mut md = format!(
        "Phase {} covers {} and focuses on the goal to {}.\n\n",
        phase,
        milestone.horizon,
        milestone.title.to_lowercase()
    );
    for action in &milestone.actions {
        md.push_str(&format!("- {}.\n", action));
    }
    md
}

fn roi_profile(band: DevelopmentBand) -> (u32, u32) {
    // (expected productivity gain %, payback months)
    match band {
        DevelopmentBand::Foundational => (15, 12),
        DevelopmentBand::Developing => (25, 9),
        DevelopmentBand::Advanced => (35, 6),
    }
}

fn roi_analysis(ctx: &ReportContext<'_>) -> String {
    let rec = &ctx.recommendation;
    let (gain, payback) = roi_profile(rec.band);
    let mut md = format!("The expected impact for {} is {}.\n", ctx.company(), rec.expected_impact);
    md.push_str(&format!(
        "Companies in the {} band typically see about {}% productivity gain in targeted processes.\n",
        rec.band.title().to_lowercase(),
        gain
    ));
    md.push_str(&format!(
        "With {:.0}% of effort on AI tooling and the rest on process work, payback usually takes {} months.\n",
        ctx.insight.ai_practical_ratio * 100.0,
        payback
    ));
    let budget = ctx.submission.ai_context.budget_bracket.trim();
    if !budget.is_empty() {
        md.push_str(&format!(
            "The stated AI budget of {} should be phased across the roadmap.\n",
            budget
        ));
    }
    md
}

fn risk_analysis(ctx: &ReportContext<'_>) -> String {
    let mut md = String::new();
    for c in ctx.scores.weakest(2) {
        md.push_str(&format!(
            "- Low {} scores raise the risk of stalled adoption.\n",
            c.category.title()
        ));
    }
    md.push_str("- Data leaks can occur when staff paste confidential data into public tools.\n");
    md.push_str("- Resistance to change grows when employees are not involved early.\n");
    md.push_str(
        "\nAs mitigation, define data handling rules before the first pilot starts.\n",
    );
    md
}

fn policy_support(ctx: &ReportContext<'_>) -> String {
    let mut md = String::new();
    for program in &ctx.insight.support_programs {
        md.push_str(&format!(
            "- The {} can offset part of the initial investment.\n",
            program
        ));
    }
    md.push_str(&format!(
        "\n{} should check eligibility with the relevant agency before the pilot starts.\n",
        ctx.company()
    ));
    md
}

fn trend_analysis(ctx: &ReportContext<'_>) -> String {
    let mut md = format!(
        "AI adoption in {} is growing by about {:.1}% per year.\n\n",
        ctx.industry(),
        ctx.insight.benchmarks.growth_trend
    );
    for trend in &ctx.insight.trends {
        md.push_str(&format!("- {}\n", trend));
    }
    md
}

fn success_stories(ctx: &ReportContext<'_>) -> String {
    let mut md = format!(
        "These examples show what {} peers achieved with focused projects.\n\n",
        ctx.industry()
    );
    for story in &ctx.insight.success_stories {
        md.push_str(&format!("- {}\n", story));
    }
    md
}

fn maturity_courses(maturity: MaturityLevel) -> [&'static str; 2] {
    match maturity {
        MaturityLevel::Unaware | MaturityLevel::Aware => [
            "AI Fundamentals for Leaders",
            "Prompt Writing for Everyday Work",
        ],
        MaturityLevel::Adopting => ["Data Literacy for Teams", "Building AI Workflows"],
        MaturityLevel::Leading => ["AI Governance and Risk", "Advanced Automation Design"],
    }
}

fn category_course(category: Category) -> &'static str {
    match category {
        Category::BusinessFoundation => "AI Business Case Workshop",
        Category::CurrentAiAdoption => "Hands-on AI Tools Bootcamp",
        Category::OrganizationalReadiness => "Leading AI Change",
        Category::TechnicalInfrastructure => "Data Foundations for AI",
        Category::GoalClarity => "AI Strategy and Goal Setting",
        Category::ExecutionCapability => "AI Project Management",
    }
}

fn curriculum(ctx: &ReportContext<'_>) -> String {
    let mut md = format!(
        "The following courses match the {} maturity level of {}.\n\n",
        ctx.scores.maturity.title(),
        ctx.company()
    );
    for course in maturity_courses(ctx.scores.maturity) {
        md.push_str(&format!("- {} is recommended for all staff.\n", course));
    }
    for c in ctx.scores.weakest(2) {
        md.push_str(&format!(
            "- {} is recommended to strengthen {}.\n",
            category_course(c.category),
            c.category.title()
        ));
    }
    md
}

fn conclusion(ctx: &ReportContext<'_>) -> String {
    let s = ctx.scores;
    let mut md = format!(
        "{} is at the {} stage with {} and Grade {}.\n",
        ctx.company(),
        s.maturity.title(),
        s.percentage_label(),
        s.grade
    );
    let timeframe = ctx.submission.ai_context.timeframe.trim();
    if timeframe.is_empty() {
        md.push_str("The next step is to start phase 1 of the roadmap this quarter.\n");
    } else {
        md.push_str(&format!(
            "The next step is to start phase 1 of the roadmap {}.\n",
            timeframe
        ));
    }
    md.push_str("We recommend a follow-up diagnosis after six months to track progress.\n");
    md
}
