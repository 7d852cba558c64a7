use crate::resource::UiResource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An assessment dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Dimension {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// The dimensions offered when a caller does not choose any
pub fn default_dimensions() -> Vec<Dimension> {
    vec![
        Dimension::new(
            "content-strategy",
            "Content Strategy",
            "Evaluate content management and strategy",
        ),
        Dimension::new(
            "data-management",
            "Data Management",
            "Assess data handling and processing",
        ),
        Dimension::new("automation", "Automation", "Review automation capabilities"),
        Dimension::new(
            "ai-integration",
            "AI Integration",
            "Analyze AI and ML implementation",
        ),
        Dimension::new(
            "workflow",
            "Workflow Management",
            "Evaluate process automation",
        ),
        Dimension::new(
            "analytics",
            "Analytics & Reporting",
            "Assess data analysis capabilities",
        ),
    ]
}

/// Kind of assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentType {
    #[default]
    Maturity,
    Capability,
}

impl AssessmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maturity => "maturity",
            Self::Capability => "capability",
        }
    }
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Active,
    Submitted,
}

/// An assessment created by the `create_assessment` tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: AssessmentType,
    pub dimensions: Vec<Dimension>,
    pub created_at: DateTime<Utc>,
    pub status: AssessmentStatus,
}

/// Output format of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Html,
    Pdf,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headline metrics shown on a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_users: u32,
    pub active_users: u32,
    /// Percentage with one decimal, e.g. `"23.4%"`
    pub conversion_rate: String,
    /// Whole dollars, e.g. `"$45678"`
    pub revenue: String,
}

impl Metrics {
    /// Render as a two-line CSV document (header + values).
    pub fn to_csv(&self) -> String {
        format!(
            "totalUsers,activeUsers,conversionRate,revenue\n{},{},{},{}\n",
            self.total_users, self.active_users, self.conversion_rate, self.revenue
        )
    }
}

/// A report generated by the `generate_report` tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<u64>,
    pub format: ReportFormat,
    pub generated_at: DateTime<Utc>,
    pub metrics: Metrics,
}

/// Format of exported data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// Data exported by the `export_data` tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedData {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub format: ExportFormat,
    pub exported_at: DateTime<Utc>,
    pub data: ExportPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub metrics: Metrics,
    pub timestamp: DateTime<Utc>,
}

/// Something the host should display next to a conversation message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Component {
    /// A UI resource produced by a tool
    McpResource { resource: UiResource },
    /// A component the host renders natively (`workflow-guide`, `assessment-form`, ...)
    Native {
        kind: String,
        data: serde_json::Value,
    },
}

impl Component {
    pub fn resource(resource: UiResource) -> Self {
        Self::McpResource { resource }
    }

    pub fn native(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self::Native {
            kind: kind.into(),
            data,
        }
    }

    pub fn ui_resource(&self) -> Option<&UiResource> {
        match self {
            Self::McpResource { resource } => Some(resource),
            Self::Native { .. } => None,
        }
    }
}
