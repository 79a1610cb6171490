//! Built-in industry catalog

use super::{Benchmarks, IndustryInsight};
use crate::constants::recommendation::DEFAULT_INDUSTRY;

struct Entry<'a> {
    code: &'a str,
    name: &'a str,
    aliases: &'a [&'a str],
    characteristics: &'a [&'a str],
    automation: &'a [&'a str],
    benchmarks: (f64, f64, f64),
    ai_ratio: f64,
    stories: &'a [&'a str],
    trends: &'a [&'a str],
    support: &'a [&'a str],
}

impl Entry<'_> {
    fn build(&self) -> IndustryInsight {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        IndustryInsight {
            code: self.code.to_string(),
            name: self.name.to_string(),
            aliases: owned(self.aliases),
            characteristics: owned(self.characteristics),
            automation_opportunities: owned(self.automation),
            benchmarks: Benchmarks {
                peer_average: self.benchmarks.0,
                top_decile: self.benchmarks.1,
                growth_trend: self.benchmarks.2,
            },
            ai_practical_ratio: self.ai_ratio,
            success_stories: owned(self.stories),
            trends: owned(self.trends),
            support_programs: owned(self.support),
        }
    }
}

/// Reference data shipped with the crate
pub fn builtin_industries() -> Vec<IndustryInsight> {
    ENTRIES.iter().map(Entry::build).collect()
}

const ENTRIES: &[Entry<'static>] = &[
    Entry {
        code: "manufacturing",
        name: "Manufacturing",
        aliases: &["factory", "production", "제조업"],
        characteristics: &[
            "Thin margins make process efficiency the main competitive lever.",
            "Shop-floor data exists but is often trapped in machines and spreadsheets.",
            "Quality defects carry high downstream cost.",
        ],
        automation: &[
            "Vision-based quality inspection",
            "Predictive maintenance from sensor data",
            "Demand forecasting for production planning",
            "Automated work-order and document processing",
            "Energy usage optimization",
        ],
        benchmarks: (58.0, 82.0, 12.5),
        ai_ratio: 0.6,
        stories: &[
            "A precision parts maker cut inspection labour by 40% after deploying camera-based defect detection on two lines.",
            "A mid-sized injection molding plant reduced unplanned downtime by a quarter with vibration-based maintenance alerts.",
        ],
        trends: &[
            "Smart-factory programs are moving from pilots to line-wide rollouts.",
            "Generative AI is entering work instructions and maintenance manuals.",
        ],
        support: &[
            "Smart factory build-out subsidy",
            "Manufacturing AI voucher program",
        ],
    },
    Entry {
        code: "it-software",
        name: "IT & Software",
        aliases: &["it", "software", "saas", "tech", "it서비스"],
        characteristics: &[
            "Teams are digitally fluent and adopt new tools quickly.",
            "Talent cost dominates the budget, so developer productivity matters most.",
            "Customers expect AI features inside the product itself.",
        ],
        automation: &[
            "AI-assisted code review and generation",
            "Automated test generation",
            "Customer support chat triage",
            "Release note and documentation drafting",
            "Incident log summarization",
        ],
        benchmarks: (68.0, 90.0, 18.0),
        ai_ratio: 0.7,
        stories: &[
            "A 60-person SaaS company shortened its release cycle from four weeks to two with AI-generated test scaffolding.",
            "A web agency halved first-response time by routing support tickets through an AI triage assistant.",
        ],
        trends: &[
            "Coding assistants are becoming standard developer tooling.",
            "Product teams are embedding retrieval-augmented assistants into customer-facing apps.",
        ],
        support: &["AI product commercialization grant", "Cloud adoption voucher"],
    },
    Entry {
        code: "finance",
        name: "Finance & Insurance",
        aliases: &["banking", "insurance", "fintech", "금융"],
        characteristics: &[
            "Heavily regulated, so explainability and audit trails are mandatory.",
            "Large volumes of structured transaction data are already available.",
            "Document-heavy back-office processes dominate operating cost.",
        ],
        automation: &[
            "Document intake and KYC extraction",
            "Fraud and anomaly detection",
            "Claims triage",
            "Customer inquiry assistants",
            "Regulatory report drafting",
        ],
        benchmarks: (64.0, 86.0, 14.0),
        ai_ratio: 0.55,
        stories: &[
            "A regional insurer automated first-pass claims classification and cleared its backlog in six weeks.",
            "A lending startup reduced manual document review time by 60% with AI-based extraction.",
        ],
        trends: &[
            "Supervisors are publishing AI model-risk guidelines.",
            "Conversational banking is replacing static FAQ pages.",
        ],
        support: &["Financial data sandbox program", "Digital finance innovation fund"],
    },
    Entry {
        code: "retail",
        name: "Retail & E-commerce",
        aliases: &["ecommerce", "e-commerce", "commerce", "shopping", "유통"],
        characteristics: &[
            "Customer data is rich but fragmented across channels.",
            "Inventory accuracy directly drives margin.",
            "Marketing content is needed in high volume.",
        ],
        automation: &[
            "Product description and marketing copy generation",
            "Demand and inventory forecasting",
            "Personalized recommendations",
            "Review and inquiry summarization",
            "Dynamic pricing support",
        ],
        benchmarks: (55.0, 80.0, 15.0),
        ai_ratio: 0.5,
        stories: &[
            "An online apparel shop tripled weekly product listings by generating first-draft descriptions with AI.",
            "A grocery chain cut waste on fresh goods by 18% with store-level demand forecasts.",
        ],
        trends: &[
            "Generative content is becoming the default for product detail pages.",
            "Live commerce is adopting AI hosts and automated highlights.",
        ],
        support: &["Online channel expansion support", "Small merchant digital transition grant"],
    },
    Entry {
        code: "healthcare",
        name: "Healthcare",
        aliases: &["medical", "hospital", "clinic", "bio", "의료"],
        characteristics: &[
            "Patient data is sensitive and strictly protected.",
            "Clinician time is the scarcest resource.",
            "Administrative documentation consumes a large share of staff hours.",
        ],
        automation: &[
            "Clinical note drafting",
            "Appointment scheduling and reminders",
            "Medical image pre-screening",
            "Insurance claim coding support",
        ],
        benchmarks: (52.0, 78.0, 16.0),
        ai_ratio: 0.45,
        stories: &[
            "A dermatology clinic network reduced charting time per visit by five minutes with speech-to-note drafting.",
            "A rehabilitation hospital lowered no-show rates by 30% with AI-timed reminders.",
        ],
        trends: &[
            "Ambient clinical documentation is moving into mainstream practice.",
            "Regulators are clarifying approval paths for AI-based medical software.",
        ],
        support: &["Digital healthcare demonstration program", "Medical AI data voucher"],
    },
    Entry {
        code: "construction",
        name: "Construction",
        aliases: &["building", "architecture", "engineering", "건설"],
        characteristics: &[
            "Project-based work with strong dependence on site supervisors.",
            "Safety incidents carry severe legal and human cost.",
            "Estimation and bidding rely on individual expertise.",
        ],
        automation: &[
            "Site safety monitoring from camera feeds",
            "Quantity take-off and cost estimation",
            "Daily report and document generation",
            "Schedule risk prediction",
        ],
        benchmarks: (45.0, 72.0, 11.0),
        ai_ratio: 0.4,
        stories: &[
            "A regional contractor reduced estimation time for bids by half with AI-assisted take-off.",
            "A housing developer flagged unsafe behaviour on site twice as often with camera-based monitoring.",
        ],
        trends: &[
            "Digital twins are linking design models to site progress data.",
            "Safety regulation is accelerating adoption of monitoring technology.",
        ],
        support: &["Smart construction technology support", "Industrial safety equipment subsidy"],
    },
    Entry {
        code: "logistics",
        name: "Logistics & Distribution",
        aliases: &["transport", "shipping", "warehouse", "물류"],
        characteristics: &[
            "High-volume, repetitive operations with tight time windows.",
            "Fuel and labour cost dominate the operating budget.",
            "Tracking data is abundant but underused.",
        ],
        automation: &[
            "Route optimization",
            "Warehouse slotting and picking optimization",
            "Shipping document automation",
            "Delivery ETA prediction",
        ],
        benchmarks: (54.0, 79.0, 13.0),
        ai_ratio: 0.55,
        stories: &[
            "A last-mile carrier cut fuel cost by 9% with AI route planning.",
            "A 3PL warehouse improved picking throughput by 20% after re-slotting based on demand predictions.",
        ],
        trends: &[
            "Autonomous mobile robots are spreading in mid-sized warehouses.",
            "Carbon reporting requirements are driving route efficiency analytics.",
        ],
        support: &["Smart logistics center certification", "Logistics digitalization grant"],
    },
    Entry {
        code: "education",
        name: "Education",
        aliases: &["academy", "school", "training", "edtech", "교육"],
        characteristics: &[
            "Content production and learner feedback are labour intensive.",
            "Budgets are tight and seasonal.",
            "Learner outcomes are the primary success measure.",
        ],
        automation: &[
            "Personalized learning path generation",
            "Assignment feedback drafting",
            "Course material generation",
            "Enrollment inquiry assistants",
        ],
        benchmarks: (50.0, 76.0, 17.0),
        ai_ratio: 0.5,
        stories: &[
            "A language academy doubled practice feedback per student with AI-drafted corrections reviewed by tutors.",
            "A corporate training provider cut course preparation time by 35% using generated first drafts.",
        ],
        trends: &[
            "AI tutors are being piloted alongside human instructors.",
            "Assessment is shifting toward process-based evaluation.",
        ],
        support: &["EdTech innovation voucher", "Lifelong learning content grant"],
    },
    Entry {
        code: "professional-services",
        name: "Professional Services",
        aliases: &["consulting", "services", "legal", "accounting", "서비스업"],
        characteristics: &[
            "Revenue is tied to billable expert hours.",
            "Knowledge lives in documents and individual experience.",
            "Client trust and confidentiality are critical.",
        ],
        automation: &[
            "Proposal and report drafting",
            "Contract and document review",
            "Meeting transcription and summarization",
            "Knowledge base search assistants",
        ],
        benchmarks: (60.0, 84.0, 15.0),
        ai_ratio: 0.65,
        stories: &[
            "A tax advisory firm freed ten hours per consultant each month with AI-drafted client summaries.",
            "A consulting boutique halved proposal turnaround with a retrieval assistant over past engagements.",
        ],
        trends: &[
            "Firms are building private knowledge assistants over their own archives.",
            "Clients increasingly ask how AI is used in the delivered work.",
        ],
        support: &["Knowledge service industry support", "SME AI consulting voucher"],
    },
    Entry {
        code: DEFAULT_INDUSTRY,
        name: "General Business",
        aliases: &["other", "etc", "기타"],
        characteristics: &[
            "Operations mix routine administration with customer-facing work.",
            "Data is spread across office documents and messaging tools.",
            "Leadership attention is the main constraint on change.",
        ],
        automation: &[
            "Document and report drafting",
            "Email and inquiry response assistance",
            "Meeting summarization",
            "Spreadsheet analysis automation",
        ],
        benchmarks: (55.0, 80.0, 14.0),
        ai_ratio: 0.5,
        stories: &[
            "A 30-person trading company saved two days per month on reporting with AI-assisted spreadsheet analysis.",
            "A service business cut email response time in half using drafted replies reviewed by staff.",
        ],
        trends: &[
            "Office suites now ship with built-in AI assistants.",
            "SMEs are formalizing AI usage policies to manage data risk.",
        ],
        support: &["SME AI adoption voucher", "Digital transformation consulting support"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_entries_are_consistent() {
        let industries = builtin_industries();
        assert_eq!(industries.len(), 10);
        assert!(industries.iter().any(|i| i.code == DEFAULT_INDUSTRY));
        for insight in &industries {
            assert!(insight.benchmarks.peer_average > 0.0, "{}", insight.code);
            assert!(
                insight.benchmarks.top_decile >= insight.benchmarks.peer_average,
                "{}",
                insight.code
            );
            assert!(!insight.automation_opportunities.is_empty());
            assert!((0.0..=1.0).contains(&insight.ai_practical_ratio));
        }
    }
}
