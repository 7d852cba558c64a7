// HTML payloads for the generated UI resources
//
// The markup is opaque to the protocol. Its only contract with the host is the
// `mcp-ui-action` message it posts to the parent frame.

use tessera_core::types::{Assessment, Report};

const ASSESSMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8" />
  <title>Assessment</title>
  <style>
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 16px; }
    .card { max-width: 800px; margin: 0 auto; border: 1px solid #e5e7eb; border-radius: 12px; padding: 20px; }
    .row { display: flex; gap: 8px; align-items: center; margin: 8px 0; }
    .btn { background: #3b82f6; color: #fff; border: none; padding: 10px 16px; border-radius: 8px; cursor: pointer; }
  </style>
</head>
<body>
  <div class="card">
    <h2>__KIND__ Assessment (ID: __ID__)</h2>
    <p>Adjust the sliders and submit to send results back to the host app.</p>
    <div id="dims"></div>
    <p>Average: <span id="avg">0</span></p>
    <button class="btn" id="submit">Submit Assessment</button>
  </div>
  <script>
    const dimNames = __DIMENSIONS__;
    const scores = new Array(dimNames.length).fill(3);
    const root = document.getElementById('dims');
    const average = () => (scores.reduce((a, b) => a + b, 0) / scores.length).toFixed(1);
    dimNames.forEach((name, i) => {
      const row = document.createElement('div');
      row.className = 'row';
      const label = document.createElement('div');
      label.style.width = '200px';
      label.textContent = name;
      const slider = document.createElement('input');
      slider.type = 'range'; slider.min = 1; slider.max = 5; slider.value = 3;
      slider.addEventListener('input', (e) => {
        scores[i] = parseInt(e.target.value, 10);
        document.getElementById('avg').textContent = average();
      });
      row.appendChild(label);
      row.appendChild(slider);
      root.appendChild(row);
    });
    document.getElementById('avg').textContent = average();
    document.getElementById('submit').addEventListener('click', () => {
      window.parent.postMessage({
        type: 'mcp-ui-action',
        tool: 'submit_assessment',
        params: {
          assessmentId: __ID__,
          type: '__KIND__',
          scores: scores,
          timestamp: new Date().toISOString(),
          averageScore: average()
        }
      }, '*');
    });
  </script>
</body>
</html>"#;

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8" />
  <title>Report</title>
  <style>
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 16px; }
    .card { max-width: 960px; margin: 0 auto; border: 1px solid #e5e7eb; border-radius: 12px; padding: 20px; }
    .grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; margin: 16px 0; }
    .tile { background: #f3f4f6; border-radius: 12px; padding: 12px; text-align: center; }
    .btn { background: #10b981; color: #fff; border: none; padding: 10px 16px; border-radius: 8px; cursor: pointer; }
  </style>
</head>
<body>
  <div class="card">
    <h2>Report (ID: __ID__) - Format: __FORMAT__</h2>
    <div class="grid">
      <div class="tile"><div>Total Users</div><div id="totalUsers">__TOTAL_USERS__</div></div>
      <div class="tile"><div>Active Users</div><div id="activeUsers">__ACTIVE_USERS__</div></div>
      <div class="tile"><div>Conversion</div><div id="conversionRate">__CONVERSION__</div></div>
      <div class="tile"><div>Revenue</div><div id="revenue">__REVENUE__</div></div>
    </div>
    <button class="btn" id="refresh">Refresh Data</button>
    <button class="btn" id="export">Export</button>
  </div>
  <script>
    const post = (tool, params) => window.parent.postMessage({ type: 'mcp-ui-action', tool, params }, '*');
    const text = (id) => document.getElementById(id).textContent;
    document.getElementById('refresh').addEventListener('click', () => {
      post('refresh_report', { reportId: __ID__, timestamp: new Date().toISOString() });
    });
    document.getElementById('export').addEventListener('click', () => {
      post('export_report', {
        reportId: __ID__,
        format: '__FORMAT__',
        timestamp: new Date().toISOString(),
        metrics: {
          totalUsers: text('totalUsers'),
          activeUsers: text('activeUsers'),
          conversionRate: text('conversionRate'),
          revenue: text('revenue')
        }
      });
    });
  </script>
</body>
</html>"#;

/// Escape text for inclusion in HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn assessment_html(assessment: &Assessment) -> String {
    let names: Vec<&str> = assessment
        .dimensions
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    // JSON string literals are valid JS; escape `<` so a name cannot close the script tag
    let names = serde_json::to_string(&names)
        .unwrap_or_else(|_| "[]".to_string())
        .replace('<', "\\u003c");

    ASSESSMENT_TEMPLATE
        .replace("__KIND__", assessment.kind.as_str())
        .replace("__ID__", &assessment.id.to_string())
        .replace("__DIMENSIONS__", &names)
}

pub fn report_html(report: &Report) -> String {
    REPORT_TEMPLATE
        .replace("__ID__", &report.id.to_string())
        .replace("__FORMAT__", report.format.as_str())
        .replace("__TOTAL_USERS__", &report.metrics.total_users.to_string())
        .replace("__ACTIVE_USERS__", &report.metrics.active_users.to_string())
        .replace("__CONVERSION__", &escape_html(&report.metrics.conversion_rate))
        .replace("__REVENUE__", &escape_html(&report.metrics.revenue))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tessera_core::types::{
        default_dimensions, AssessmentStatus, AssessmentType, Dimension, Metrics, ReportFormat,
    };

    #[test]
    fn test_assessment_markup_posts_submit_action() {
        let html = assessment_html(&Assessment {
            id: 42,
            kind: AssessmentType::Maturity,
            dimensions: default_dimensions(),
            created_at: Utc::now(),
            status: AssessmentStatus::Active,
        });

        assert!(html.contains("assessmentId: 42"));
        assert!(html.contains("'submit_assessment'"));
        assert!(html.contains("\"Content Strategy\""));
        assert!(!html.contains("__"));
    }

    #[test]
    fn test_assessment_markup_cannot_break_script() {
        let html = assessment_html(&Assessment {
            id: 1,
            kind: AssessmentType::Capability,
            dimensions: vec![Dimension::new("x", "</script><b>", "")],
            created_at: Utc::now(),
            status: AssessmentStatus::Active,
        });
        assert!(!html.contains("</script><b>"));
    }

    #[test]
    fn test_report_markup() {
        let html = report_html(&Report {
            id: 7,
            assessment_id: None,
            format: ReportFormat::Pdf,
            generated_at: Utc::now(),
            metrics: Metrics {
                total_users: 1200,
                active_users: 600,
                conversion_rate: "20.5%".to_string(),
                revenue: "$30000".to_string(),
            },
        });

        assert!(html.contains("reportId: 7"));
        assert!(html.contains("'refresh_report'"));
        assert!(html.contains("'export_report'"));
        assert!(html.contains("format: 'pdf'"));
        assert!(html.contains(">1200<"));
        assert!(!html.contains("__"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&#39;");
    }
}
