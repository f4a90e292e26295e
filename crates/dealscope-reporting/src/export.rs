//! Rendering of a derived display (or error presentation) to export text.

use std::fmt::Write as _;
use std::path::Path;

use thiserror::Error;

use dealscope_core::render::{DerivedDisplay, Rendered};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
    Text,
}

impl ExportFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "markdown" | "md" => Some(Self::Markdown),
            "text" | "txt" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
            Self::Text => "txt",
        }
    }
}

/// Render a derivation outcome in the requested format.
pub fn render(rendered: &Rendered, format: ExportFormat) -> Result<String, ExportError> {
    match rendered {
        Rendered::Report(display) => match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(display.as_ref())?),
            ExportFormat::Markdown => Ok(markdown(display)),
            ExportFormat::Text => Ok(text(display)),
        },
        Rendered::ServiceError(message) => match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(
                &serde_json::json!({ "error": message }),
            )?),
            ExportFormat::Markdown => Ok(format!("# Analysis failed\n\n{message}\n")),
            ExportFormat::Text => Ok(format!("Analysis failed: {message}\n")),
        },
    }
}

/// Render and write to `path`.
pub fn write_report(
    path: &Path,
    rendered: &Rendered,
    format: ExportFormat,
) -> Result<(), ExportError> {
    let body = render(rendered, format)?;
    std::fs::write(path, body)?;
    Ok(())
}

fn markdown(display: &DerivedDisplay) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Investment analysis: {}", display.company_name);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Score:** {}/100 ({})  ",
        display.overall_score,
        display.score_class.label()
    );
    let _ = writeln!(
        out,
        "**Sector:** {} | **Stage:** {}",
        display.sector, display.funding_stage
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "## Risk assessment");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Overall risk: {} ({}/10)",
        display.risk_level_text, display.risk_score
    );
    for factor in &display.risk_factors {
        let _ = writeln!(out, "- {factor}");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Recommendation");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**{}** ({} confidence)",
        display.action_text(),
        display.confidence_text()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", display.reasoning_text());

    if !display.category_scores.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Category scores");
        let _ = writeln!(out);
        for category in &display.category_scores {
            let _ = writeln!(out, "- {}: {:.1}/100", category.name, category.score);
        }
    }

    if let Some(benchmarks) = &display.benchmarks {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Sector benchmarks");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "- Avg revenue growth: {:.2}",
            benchmarks.avg_revenue_growth
        );
        let _ = writeln!(out, "- Avg CAC: {:.0}", benchmarks.avg_cac);
        let _ = writeln!(out, "- Avg LTV: {:.0}", benchmarks.avg_ltv);
        let _ = writeln!(out, "- Avg burn rate: {:.0}", benchmarks.avg_burn_rate);
        let _ = writeln!(out, "- Avg runway: {:.1} months", benchmarks.avg_runway);
        let _ = writeln!(out, "- Sample size: {}", benchmarks.sample_size);
    }

    if display.filename.is_some() || display.analysis_id.is_some() || display.analyzed_at.is_some()
    {
        let _ = writeln!(out);
        if let Some(filename) = &display.filename {
            let _ = writeln!(out, "Source: {filename}  ");
        }
        if let Some(id) = &display.analysis_id {
            let _ = writeln!(out, "Analysis id: {id}  ");
        }
        if let Some(at) = &display.analyzed_at {
            let _ = writeln!(out, "Analyzed at: {at}");
        }
    }

    out
}

fn text(display: &DerivedDisplay) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{}: {}/100 ({})",
        display.company_name,
        display.overall_score,
        display.score_class.label()
    ));
    lines.push(format!(
        "Sector: {} / Stage: {}",
        display.sector, display.funding_stage
    ));
    lines.push(format!(
        "Risk: {} ({}/10)",
        display.risk_level_text, display.risk_score
    ));
    for factor in &display.risk_factors {
        lines.push(format!("  {factor}"));
    }
    lines.push(format!(
        "Recommendation: {} ({} confidence)",
        display.action_text(),
        display.confidence_text()
    ));
    lines.push(format!("  {}", display.reasoning_text()));
    for category in &display.category_scores {
        lines.push(format!("  {}: {:.1}/100", category.name, category.score));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealscope_core::render::derive;
    use dealscope_core::AnalysisReport;

    fn sample() -> Rendered {
        let report: AnalysisReport = serde_json::from_str(
            r#"{
                "sector": "fintech",
                "funding_stage": "Seed",
                "document_analysis": {"startup_analysis": {"company_name": "Ledgerly"}},
                "investment_score": {
                    "overall_score": 72,
                    "recommendation": {"action": "INVEST", "confidence": "High", "reasoning": "Strong traction"}
                },
                "risk_assessment": {
                    "risk_level": "Medium",
                    "overall_risk_score": 5.0,
                    "risk_factors": [{"type": "Market", "concerns": ["Crowded space"]}]
                }
            }"#,
        )
        .unwrap();
        derive(&report)
    }

    #[test]
    fn every_format_carries_the_headline_fields() {
        let rendered = sample();
        for format in [ExportFormat::Json, ExportFormat::Markdown, ExportFormat::Text] {
            let body = render(&rendered, format).unwrap();
            assert!(body.contains("Ledgerly"), "{format:?}: {body}");
            assert!(body.contains("72"), "{format:?}");
            assert!(body.contains("INVEST"), "{format:?}");
        }
    }

    #[test]
    fn json_is_machine_readable() {
        let body = render(&sample(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["overall_score"], 72.0);
        assert_eq!(value["score_class"], "good");
        assert_eq!(value["risk_factors"][0], "Market: Crowded space");
    }

    #[test]
    fn service_error_renders_as_error_body() {
        let rendered = Rendered::ServiceError("unsupported file type".into());
        let json = render(&rendered, ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error"], "unsupported file type");

        let text = render(&rendered, ExportFormat::Text).unwrap();
        assert!(text.contains("unsupported file type"));
    }

    #[test]
    fn missing_recommendation_fields_export_the_marker() {
        let report: AnalysisReport = serde_json::from_str("{}").unwrap();
        let body = render(&derive(&report), ExportFormat::Text).unwrap();
        assert!(body.contains("Recommendation: — (— confidence)"));
    }

    #[test]
    fn write_report_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_report(&path, &sample(), ExportFormat::Markdown).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("# Investment analysis: Ledgerly"));
    }

    #[test]
    fn format_names_parse() {
        assert_eq!(ExportFormat::from_name("md"), Some(ExportFormat::Markdown));
        assert_eq!(ExportFormat::from_name("JSON"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_name("csv"), None);
    }
}
