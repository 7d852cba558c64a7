// Assessment tools: interactive assessment forms and the dimension catalog

use crate::error::McpError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::markup;
use crate::tools::{
    json_schema_array, json_schema_object, json_schema_string, json_schema_string_enum,
    parse_arguments, Tool,
};
use anyhow::Result;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tessera_core::resource::{build, FrameSize, ResourceUri, UiResourceConfig};
use tessera_core::types::{default_dimensions, Assessment, AssessmentStatus, AssessmentType};
use tessera_core::IdGenerator;

/// Tool that creates an assessment and its interactive form
pub struct CreateAssessmentTool {
    ids: Arc<IdGenerator>,
}

impl CreateAssessmentTool {
    pub fn new(ids: Arc<IdGenerator>) -> Self {
        Self { ids }
    }
}

#[derive(Debug, Deserialize)]
struct CreateAssessmentArgs {
    #[serde(default, rename = "type")]
    kind: AssessmentType,
    #[serde(default)]
    dimensions: Vec<String>,
}

#[async_trait::async_trait]
impl Tool for CreateAssessmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_assessment".to_string(),
            description: "Create an interactive assessment form".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "type": json_schema_string_enum(
                        "Kind of assessment (default: maturity)",
                        &["maturity", "capability"]
                    ),
                    "dimensions": json_schema_array(
                        json_schema_string("Dimension id"),
                        "Dimensions to assess (default: all)"
                    )
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: CreateAssessmentArgs = parse_arguments("create_assessment", arguments)?;

        let catalog = default_dimensions();
        let dimensions = if args.dimensions.is_empty() {
            catalog
        } else {
            args.dimensions
                .iter()
                .map(|id| {
                    catalog
                        .iter()
                        .find(|d| &d.id == id)
                        .cloned()
                        .ok_or_else(|| McpError::validation(format!("Unknown dimension: {}", id)))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let assessment = Assessment {
            id: self.ids.next_id(),
            kind: args.kind,
            dimensions,
            created_at: Utc::now(),
            status: AssessmentStatus::Active,
        };

        let ui_resource = build(
            UiResourceConfig::html(
                ResourceUri::new("assessment", assessment.id).to_string(),
                markup::assessment_html(&assessment),
            )
            .title("Interactive Assessment Form")
            .frame_size(FrameSize::px(900, 700))
            .initial_data(serde_json::json!({
                "type": assessment.kind,
                "assessmentId": assessment.id,
            })),
        );

        tracing::debug!(
            assessment_id = assessment.id,
            dimensions = assessment.dimensions.len(),
            "Created assessment"
        );

        let content = format!(
            "Interactive {} assessment created. Rate each of the {} dimensions and submit when ready.",
            assessment.kind,
            assessment.dimensions.len()
        );

        Ok(CallToolResult::text(content)
            .with_ui_resource(ui_resource)
            .with_data("assessment", &assessment)?)
    }
}

/// Tool that lists the available assessment dimensions
pub struct ListDimensionsTool;

#[async_trait::async_trait]
impl Tool for ListDimensionsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_dimensions".to_string(),
            description: "List available assessment dimensions".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        let dimensions = default_dimensions();
        let lines: Vec<String> = dimensions
            .iter()
            .map(|d| format!("- {} ({}): {}", d.name, d.id, d.description))
            .collect();

        Ok(CallToolResult::text(format!(
            "{} assessment dimensions available:\n{}",
            dimensions.len(),
            lines.join("\n")
        ))
        .with_data("dimensions", &dimensions)?)
    }
}
