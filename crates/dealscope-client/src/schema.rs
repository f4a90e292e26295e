//! Response schema for the analysis service.
//!
//! The service fills in whatever its pipeline managed to produce, so every
//! field is optional and unknown fields are ignored. Defaulting into
//! display-ready values happens in one pass in `dealscope-core`; nothing
//! here invents data.

use serde::{Deserialize, Serialize};

/// Top-level analyze response.
///
/// A 2xx response carrying `error` is a failed unit of work reported in-band
/// (the pipeline caught its own exception); the other fields are then absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub funding_stage: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
    #[serde(default)]
    pub analysis_id: Option<String>,
    #[serde(default)]
    pub document_analysis: Option<DocumentAnalysis>,
    #[serde(default)]
    pub investment_score: Option<InvestmentScore>,
    #[serde(default)]
    pub risk_assessment: Option<RiskAssessment>,
    #[serde(default)]
    pub benchmarks: Option<SectorBenchmarks>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DocumentAnalysis {
    #[serde(default)]
    pub startup_analysis: Option<StartupAnalysis>,
}

/// Structured facts extracted from the uploaded documents.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StartupAnalysis {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub funding_stage: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub problem: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub market_size_tam: Option<f64>,
    #[serde(default)]
    pub team_experience_summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InvestmentScore {
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub category_scores: Option<CategoryScores>,
    #[serde(default)]
    pub recommendation: Option<Recommendation>,
}

/// Weighted sub-scores behind the overall score, each 0–100.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CategoryScores {
    #[serde(default)]
    pub market_opportunity: Option<f64>,
    #[serde(default)]
    pub team_strength: Option<f64>,
    #[serde(default)]
    pub product_solution: Option<f64>,
    #[serde(default)]
    pub traction_financials: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Recommendation {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RiskAssessment {
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub overall_risk_score: Option<f64>,
    #[serde(default)]
    pub risk_factors: Vec<RiskFactor>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RiskFactor {
    /// Risk category, e.g. "Market" or "Team/Execution".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// 1–10; 1 is low risk.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub concerns: Vec<String>,
}

/// Sector/stage averages; `error` is set when no benchmark data matched.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SectorBenchmarks {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub avg_revenue_growth: Option<f64>,
    #[serde(default)]
    pub avg_cac: Option<f64>,
    #[serde(default)]
    pub avg_ltv: Option<f64>,
    #[serde(default)]
    pub avg_burn_rate: Option<f64>,
    #[serde(default)]
    pub avg_runway: Option<f64>,
    #[serde(default)]
    pub sample_size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_parses() {
        let report: AnalysisReport = serde_json::from_str("{}").unwrap();
        assert!(report.error.is_none());
        assert!(report.investment_score.is_none());
        assert!(report.risk_assessment.is_none());
    }

    #[test]
    fn error_only_body_parses() {
        let report: AnalysisReport =
            serde_json::from_str(r#"{"error": "unsupported file type", "status": "failed"}"#)
                .unwrap();
        assert_eq!(report.error.as_deref(), Some("unsupported file type"));
        assert_eq!(report.status.as_deref(), Some("failed"));
    }

    #[test]
    fn partial_score_parses() {
        let body = r#"{
            "investment_score": {
                "overall_score": 72,
                "recommendation": {
                    "action": "INVEST",
                    "confidence": "High",
                    "reasoning": "Strong traction"
                }
            }
        }"#;
        let report: AnalysisReport = serde_json::from_str(body).unwrap();
        let score = report.investment_score.unwrap();
        assert_eq!(score.overall_score, Some(72.0));
        assert!(score.category_scores.is_none());
        let rec = score.recommendation.unwrap();
        assert_eq!(rec.action.as_deref(), Some("INVEST"));
    }

    #[test]
    fn full_report_parses() {
        let body = r#"{
            "filename": "pitch.pdf",
            "sector": "fintech",
            "funding_stage": "Seed",
            "status": "completed",
            "analyzed_at": "2025-11-02T10:15:00",
            "analysis_id": "abc123",
            "document_analysis": {
                "startup_analysis": {
                    "company_name": "Ledgerly",
                    "sector": "fintech",
                    "funding_stage": "Seed",
                    "problem": "Manual reconciliation",
                    "solution": "Automated ledger sync",
                    "market_size_tam": 2500000000.0,
                    "team_experience_summary": "Two ex-payments founders"
                }
            },
            "investment_score": {
                "overall_score": 81.5,
                "category_scores": {
                    "market_opportunity": 90.0,
                    "team_strength": 75.0,
                    "product_solution": 80.0,
                    "traction_financials": 70.0
                },
                "recommendation": {
                    "action": "Strong Buy",
                    "confidence": "High",
                    "reasoning": "Exceptional fundamentals and strong market position."
                }
            },
            "risk_assessment": {
                "risk_level": "Medium",
                "overall_risk_score": 5.3,
                "risk_factors": [
                    {"type": "Market", "score": 6, "concerns": ["Crowded space", "Incumbent banks"]},
                    {"type": "Financial", "score": 5, "concerns": ["Short runway"]}
                ]
            },
            "benchmarks": {
                "avg_revenue_growth": 0.18,
                "avg_cac": 420.0,
                "avg_ltv": 3100.0,
                "avg_burn_rate": 85000.0,
                "avg_runway": 14.0,
                "sample_size": 37
            }
        }"#;
        let report: AnalysisReport = serde_json::from_str(body).unwrap();
        let startup = report
            .document_analysis
            .unwrap()
            .startup_analysis
            .unwrap();
        assert_eq!(startup.company_name.as_deref(), Some("Ledgerly"));
        let risks = report.risk_assessment.unwrap();
        assert_eq!(risks.risk_factors.len(), 2);
        assert_eq!(risks.risk_factors[0].kind.as_deref(), Some("Market"));
        assert_eq!(risks.risk_factors[0].concerns.len(), 2);
        let benchmarks = report.benchmarks.unwrap();
        assert_eq!(benchmarks.sample_size, Some(37));
        assert!(benchmarks.error.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let report: AnalysisReport =
            serde_json::from_str(r#"{"sector": "SaaS", "some_future_field": [1, 2, 3]}"#).unwrap();
        assert_eq!(report.sector.as_deref(), Some("SaaS"));
    }

    #[test]
    fn benchmarks_error_body_parses() {
        let b: SectorBenchmarks =
            serde_json::from_str(r#"{"error": "No benchmark data found for the given criteria."}"#)
                .unwrap();
        assert!(b.error.is_some());
        assert!(b.sample_size.is_none());
    }
}
