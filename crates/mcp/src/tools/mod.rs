pub mod assessment;
pub mod markup;
pub mod report;
mod registry;

pub use assessment::{CreateAssessmentTool, ListDimensionsTool};
pub use registry::{
    json_schema_array, json_schema_number, json_schema_object, json_schema_string,
    json_schema_string_enum, parse_arguments, Tool, ToolRegistry,
};
pub use report::{ExportDataTool, GenerateReportTool};

use std::sync::Arc;
use tessera_core::IdGenerator;

/// Registry holding every built-in tool, sharing one id source for UI resource URIs.
pub fn default_registry(ids: Arc<IdGenerator>) -> anyhow::Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(CreateAssessmentTool::new(ids.clone())))?;
    registry.register(Arc::new(GenerateReportTool::new(ids)))?;
    registry.register(Arc::new(ListDimensionsTool))?;
    registry.register(Arc::new(ExportDataTool))?;
    Ok(registry)
}
