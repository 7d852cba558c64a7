// Report tools: analytics reports and data export

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::markup;
use crate::tools::{
    json_schema_number, json_schema_object, json_schema_string, json_schema_string_enum,
    parse_arguments, Tool,
};
use anyhow::{Context, Result};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use std::sync::Arc;
use tessera_core::resource::{build, FrameSize, ResourceUri, UiResourceConfig};
use tessera_core::types::{
    ExportFormat, ExportPayload, ExportedData, Metrics, Report, ReportFormat,
};
use tessera_core::IdGenerator;

/// Sample headline metrics.
pub fn sample_metrics(rng: &mut impl Rng) -> Metrics {
    Metrics {
        total_users: rng.gen_range(1_000..11_000),
        active_users: rng.gen_range(500..5_500),
        conversion_rate: format!("{:.1}%", rng.gen_range(15.0..45.0)),
        revenue: format!("${:.0}", rng.gen_range(20_000.0..120_000.0)),
    }
}

/// Tool that generates an analytics report with an interactive dashboard
pub struct GenerateReportTool {
    ids: Arc<IdGenerator>,
}

impl GenerateReportTool {
    pub fn new(ids: Arc<IdGenerator>) -> Self {
        Self { ids }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateReportArgs {
    #[serde(default)]
    format: ReportFormat,
    #[serde(default)]
    assessment_id: Option<u64>,
}

#[async_trait::async_trait]
impl Tool for GenerateReportTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "generate_report".to_string(),
            description: "Generate a comprehensive analysis report".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "format": json_schema_string_enum(
                        "Report format (default: html)",
                        &["html", "pdf", "json"]
                    ),
                    "assessmentId": json_schema_number("Assessment the report is based on")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: GenerateReportArgs = parse_arguments("generate_report", arguments)?;

        let report = Report {
            id: self.ids.next_id(),
            assessment_id: args.assessment_id,
            format: args.format,
            generated_at: Utc::now(),
            metrics: sample_metrics(&mut rand::thread_rng()),
        };

        let ui_resource = build(
            UiResourceConfig::html(
                ResourceUri::new("report", report.id).to_string(),
                markup::report_html(&report),
            )
            .title("Dynamic Analytics Report")
            .frame_size(FrameSize::px(1000, 800))
            .initial_data(serde_json::json!({
                "format": report.format,
                "reportId": report.id,
            })),
        );

        tracing::debug!(report_id = report.id, format = %report.format, "Generated report");

        let content = match report.assessment_id {
            Some(assessment_id) => format!(
                "Analytics report generated for assessment {} ({}).",
                assessment_id, report.format
            ),
            None => format!("Analytics report generated ({}).", report.format),
        };

        Ok(CallToolResult::text(content)
            .with_ui_resource(ui_resource)
            .with_data("report", &report)?)
    }
}

/// Tool that exports assessment or report data
pub struct ExportDataTool;

#[derive(Debug, Deserialize)]
struct ExportDataArgs {
    #[serde(rename = "type")]
    kind: String,
    id: serde_json::Value,
    #[serde(default)]
    format: ExportFormat,
}

#[async_trait::async_trait]
impl Tool for ExportDataTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "export_data".to_string(),
            description: "Export assessment or report data".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "type": json_schema_string_enum("What to export", &["assessment", "report"]),
                    "id": json_schema_string("Id of the assessment or report"),
                    "format": json_schema_string_enum("Export format (default: json)", &["json", "csv"])
                }),
                vec!["type", "id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: ExportDataArgs = parse_arguments("export_data", arguments)?;

        let id = match args.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        let now = Utc::now();
        let exported = ExportedData {
            kind: args.kind,
            id,
            format: args.format,
            exported_at: now,
            data: ExportPayload {
                metrics: sample_metrics(&mut rand::thread_rng()),
                timestamp: now,
            },
        };

        let content = match exported.format {
            ExportFormat::Json => serde_json::to_string_pretty(&exported)
                .context("Failed to serialize export")?,
            ExportFormat::Csv => exported.data.metrics.to_csv(),
        };

        Ok(CallToolResult::text(content).with_data("exportedData", &exported)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, McpError};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn test_sample_metrics_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let m = sample_metrics(&mut rng);
            assert!((1_000..11_000).contains(&m.total_users));
            assert!((500..5_500).contains(&m.active_users));
            assert!(m.conversion_rate.ends_with('%'));
            assert!(m.revenue.starts_with('$'));
        }
    }

    #[tokio::test]
    async fn test_generate_report() {
        let tool = GenerateReportTool::new(Arc::new(IdGenerator::new()));
        let result = tool
            .execute(json!({"format": "pdf", "assessmentId": 42}))
            .await
            .unwrap();

        let report: Report = result.data_as("report").unwrap();
        assert_eq!(report.format, ReportFormat::Pdf);
        assert_eq!(report.assessment_id, Some(42));

        let resource = result.ui_resource.unwrap();
        assert_eq!(resource.uri, format!("ui://report/{}", report.id));
        assert_eq!(resource.mime_type, "text/html");
        assert_eq!(
            resource.metadata.preferred_frame_size,
            Some(FrameSize::new("1000px", "800px"))
        );
        assert!(result.content.unwrap().contains("42"));
    }

    #[tokio::test]
    async fn test_generate_report_rejects_unknown_format() {
        let tool = GenerateReportTool::new(Arc::new(IdGenerator::new()));
        let err = tool.execute(json!({"format": "docx"})).await.unwrap_err();
        assert_eq!(
            err.downcast::<McpError>().unwrap().code(),
            ErrorCode::Validation
        );
    }

    #[tokio::test]
    async fn test_export_json() {
        let result = ExportDataTool
            .execute(json!({"type": "report", "id": 99}))
            .await
            .unwrap();

        let exported: ExportedData = result.data_as("exportedData").unwrap();
        assert_eq!(exported.id, "99");
        assert_eq!(exported.kind, "report");
        assert_eq!(exported.format, ExportFormat::Json);
        assert!(result.content.unwrap().contains("\"exportedAt\""));
        assert!(result.ui_resource.is_none());
    }

    #[tokio::test]
    async fn test_export_csv() {
        let result = ExportDataTool
            .execute(json!({"type": "assessment", "id": "abc", "format": "csv"}))
            .await
            .unwrap();
        assert!(result
            .content
            .unwrap()
            .starts_with("totalUsers,activeUsers,conversionRate,revenue\n"));
    }

    #[tokio::test]
    async fn test_export_requires_type_and_id() {
        let err = ExportDataTool.execute(json!({"id": 1})).await.unwrap_err();
        assert_eq!(
            err.downcast::<McpError>().unwrap().code(),
            ErrorCode::Validation
        );
    }
}
