//! Pure derivation of display-ready fields from a raw analysis report.
//!
//! The service fills in whatever its pipeline produced, so the raw report
//! is optional all the way down. All defaulting happens here in one pass;
//! presentation surfaces and exporters consume [`DerivedDisplay`] and never
//! touch the raw schema. Recommendation sub-fields are the one deliberate
//! exception to defaulting: they stay `Option` and the accessors render an
//! explicit missing marker instead of inventing a recommendation.

use serde::Serialize;

use dealscope_client::schema::{AnalysisReport, RiskFactor};

/// Shown when the documents yielded no company name.
pub const COMPANY_NAME_PLACEHOLDER: &str = "Analyzed Startup";

/// Marker for absent recommendation sub-fields.
pub const MISSING: &str = "—";

const UNKNOWN: &str = "Unknown";

/// Styling tier for the overall score. Lower bounds are inclusive: 79.9 is
/// `Good`, 80 is `Excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreClass {
    Excellent,
    Good,
    Average,
    Poor,
}

impl ScoreClass {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 65.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::Average
        } else {
            Self::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Average => "average",
            Self::Poor => "poor",
        }
    }
}

/// Styling tier for the overall risk. Both the displayed text and this
/// class default to `Medium` when the service omits the level; an
/// unrecognized level string is displayed verbatim and styled `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// One weighted sub-score, labeled for display.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryScore {
    pub name: &'static str,
    pub score: f64,
}

/// Sector averages, present only when the service returned usable data.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkFigures {
    pub avg_revenue_growth: f64,
    pub avg_cac: f64,
    pub avg_ltv: f64,
    pub avg_burn_rate: f64,
    pub avg_runway: f64,
    pub sample_size: u64,
}

/// Fully-defaulted, render-ready projection of a raw report. Never mutated
/// after creation.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedDisplay {
    pub company_name: String,
    pub overall_score: f64,
    pub score_class: ScoreClass,
    pub sector: String,
    pub funding_stage: String,
    pub risk_level_text: String,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    /// Each factor flattened to a "Type: concern, concern" line.
    pub risk_factors: Vec<String>,
    pub recommendation_action: Option<String>,
    pub recommendation_confidence: Option<String>,
    pub recommendation_reasoning: Option<String>,
    pub category_scores: Vec<CategoryScore>,
    pub benchmarks: Option<BenchmarkFigures>,
    pub filename: Option<String>,
    pub analysis_id: Option<String>,
    pub analyzed_at: Option<String>,
}

impl DerivedDisplay {
    pub fn action_text(&self) -> &str {
        self.recommendation_action.as_deref().unwrap_or(MISSING)
    }

    pub fn confidence_text(&self) -> &str {
        self.recommendation_confidence.as_deref().unwrap_or(MISSING)
    }

    pub fn reasoning_text(&self) -> &str {
        self.recommendation_reasoning.as_deref().unwrap_or(MISSING)
    }
}

/// Outcome of derivation: a data presentation or an error presentation.
#[derive(Debug, Clone)]
pub enum Rendered {
    Report(Box<DerivedDisplay>),
    /// The service accepted the request but its pipeline reported a
    /// failure in-band; shown persistently instead of a data panel.
    ServiceError(String),
}

/// Map a raw report to its display projection.
pub fn derive(report: &AnalysisReport) -> Rendered {
    if let Some(message) = &report.error {
        return Rendered::ServiceError(message.clone());
    }

    let startup = report
        .document_analysis
        .as_ref()
        .and_then(|d| d.startup_analysis.clone())
        .unwrap_or_default();
    let score = report.investment_score.clone().unwrap_or_default();
    let risks = report.risk_assessment.clone().unwrap_or_default();
    let recommendation = score.recommendation.unwrap_or_default();

    let overall_score = score.overall_score.unwrap_or(0.0);
    let risk_level_text = risks
        .risk_level
        .clone()
        .unwrap_or_else(|| RiskLevel::Medium.label().to_string());
    let risk_level = risks
        .risk_level
        .as_deref()
        .and_then(RiskLevel::parse)
        .unwrap_or(RiskLevel::Medium);

    let mut category_scores = Vec::new();
    if let Some(categories) = score.category_scores {
        for (name, value) in [
            ("Market opportunity", categories.market_opportunity),
            ("Team strength", categories.team_strength),
            ("Product & solution", categories.product_solution),
            ("Traction & financials", categories.traction_financials),
        ] {
            if let Some(score) = value {
                category_scores.push(CategoryScore { name, score });
            }
        }
    }

    let benchmarks = report
        .benchmarks
        .as_ref()
        .filter(|b| b.error.is_none())
        .map(|b| BenchmarkFigures {
            avg_revenue_growth: b.avg_revenue_growth.unwrap_or(0.0),
            avg_cac: b.avg_cac.unwrap_or(0.0),
            avg_ltv: b.avg_ltv.unwrap_or(0.0),
            avg_burn_rate: b.avg_burn_rate.unwrap_or(0.0),
            avg_runway: b.avg_runway.unwrap_or(0.0),
            sample_size: b.sample_size.unwrap_or(0),
        });

    Rendered::Report(Box::new(DerivedDisplay {
        company_name: startup
            .company_name
            .unwrap_or_else(|| COMPANY_NAME_PLACEHOLDER.to_string()),
        overall_score,
        score_class: ScoreClass::from_score(overall_score),
        sector: report.sector.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        funding_stage: report
            .funding_stage
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        risk_level_text,
        risk_level,
        risk_score: risks.overall_risk_score.unwrap_or(0.0),
        risk_factors: risks.risk_factors.iter().map(flatten_factor).collect(),
        recommendation_action: recommendation.action,
        recommendation_confidence: recommendation.confidence,
        recommendation_reasoning: recommendation.reasoning,
        category_scores,
        benchmarks,
        filename: report.filename.clone(),
        analysis_id: report.analysis_id.clone(),
        analyzed_at: report.analyzed_at.clone(),
    }))
}

fn flatten_factor(factor: &RiskFactor) -> String {
    format!(
        "{}: {}",
        factor.kind.as_deref().unwrap_or("Risk"),
        factor.concerns.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_from(json: &str) -> AnalysisReport {
        serde_json::from_str(json).unwrap()
    }

    fn derived(json: &str) -> DerivedDisplay {
        match derive(&report_from(json)) {
            Rendered::Report(display) => *display,
            Rendered::ServiceError(msg) => panic!("unexpected error presentation: {msg}"),
        }
    }

    #[test]
    fn score_class_tier_boundaries() {
        assert_eq!(ScoreClass::from_score(80.0), ScoreClass::Excellent);
        assert_eq!(ScoreClass::from_score(79.0), ScoreClass::Good);
        assert_eq!(ScoreClass::from_score(79.9), ScoreClass::Good);
        assert_eq!(ScoreClass::from_score(65.0), ScoreClass::Good);
        assert_eq!(ScoreClass::from_score(64.9), ScoreClass::Average);
        assert_eq!(ScoreClass::from_score(50.0), ScoreClass::Average);
        assert_eq!(ScoreClass::from_score(49.0), ScoreClass::Poor);
        assert_eq!(ScoreClass::from_score(0.0), ScoreClass::Poor);
    }

    #[test]
    fn error_body_becomes_error_presentation() {
        let rendered = derive(&report_from(r#"{"error": "unsupported file type"}"#));
        match rendered {
            Rendered::ServiceError(message) => assert_eq!(message, "unsupported file type"),
            Rendered::Report(_) => panic!("expected error presentation"),
        }
    }

    #[test]
    fn empty_report_gets_every_default() {
        let display = derived("{}");
        assert_eq!(display.company_name, COMPANY_NAME_PLACEHOLDER);
        assert_eq!(display.overall_score, 0.0);
        assert_eq!(display.score_class, ScoreClass::Poor);
        assert_eq!(display.sector, "Unknown");
        assert_eq!(display.funding_stage, "Unknown");
        assert_eq!(display.risk_level_text, "Medium");
        assert_eq!(display.risk_level, RiskLevel::Medium);
        assert_eq!(display.risk_score, 0.0);
        assert!(display.risk_factors.is_empty());
        assert!(display.benchmarks.is_none());
    }

    #[test]
    fn missing_recommendation_fields_render_the_marker() {
        let display = derived(r#"{"investment_score": {"recommendation": {"action": "Hold"}}}"#);
        assert_eq!(display.action_text(), "Hold");
        assert_eq!(display.confidence_text(), MISSING);
        assert_eq!(display.reasoning_text(), MISSING);
    }

    #[test]
    fn successful_submission_scenario() {
        let display = derived(
            r#"{
                "sector": "fintech",
                "investment_score": {
                    "overall_score": 72,
                    "recommendation": {
                        "action": "INVEST",
                        "confidence": "High",
                        "reasoning": "Strong traction"
                    }
                }
            }"#,
        );
        assert_eq!(display.overall_score, 72.0);
        assert_eq!(display.score_class, ScoreClass::Good);
        assert_eq!(display.sector, "fintech");
        assert_eq!(display.action_text(), "INVEST");
        assert_eq!(display.confidence_text(), "High");
        assert_eq!(display.reasoning_text(), "Strong traction");
    }

    #[test]
    fn risk_factors_flatten_to_lines() {
        let display = derived(
            r#"{
                "risk_assessment": {
                    "risk_level": "High",
                    "overall_risk_score": 7.5,
                    "risk_factors": [
                        {"type": "Market", "concerns": ["Crowded space", "Incumbent banks"]},
                        {"concerns": ["No audited financials"]}
                    ]
                }
            }"#,
        );
        assert_eq!(
            display.risk_factors,
            [
                "Market: Crowded space, Incumbent banks",
                "Risk: No audited financials"
            ]
        );
        assert_eq!(display.risk_level, RiskLevel::High);
        assert_eq!(display.risk_level_text, "High");
        assert_eq!(display.risk_score, 7.5);
    }

    #[test]
    fn unrecognized_risk_level_is_shown_verbatim_styled_medium() {
        let display = derived(r#"{"risk_assessment": {"risk_level": "Catastrophic"}}"#);
        assert_eq!(display.risk_level_text, "Catastrophic");
        assert_eq!(display.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn risk_level_parse_is_case_insensitive() {
        assert_eq!(RiskLevel::parse("low"), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::parse(" HIGH "), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse("n/a"), None);
    }

    #[test]
    fn benchmark_error_suppresses_the_group() {
        let display = derived(
            r#"{"benchmarks": {"error": "No benchmark data found for the given criteria."}}"#,
        );
        assert!(display.benchmarks.is_none());
    }

    #[test]
    fn present_category_scores_are_labeled_in_order() {
        let display = derived(
            r#"{
                "investment_score": {
                    "category_scores": {
                        "market_opportunity": 90.0,
                        "traction_financials": 40.0
                    }
                }
            }"#,
        );
        let names: Vec<&str> = display.category_scores.iter().map(|c| c.name).collect();
        assert_eq!(names, ["Market opportunity", "Traction & financials"]);
    }
}
