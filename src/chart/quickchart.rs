//! Chart rendering through the QuickChart HTTP service
//!
//! Posts a Chart.js configuration and receives the rendered PNG.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};

use super::{ChartRenderer, PieChart};
use crate::error::{BudgetError, BudgetResult};

pub const QUICKCHART_URL: &str = "https://quickchart.io/chart";

/// QuickChart renderer
pub struct QuickChartRenderer {
    client: Client,
    endpoint: String,
}

impl QuickChartRenderer {
    pub fn new(timeout: Duration) -> BudgetResult<Self> {
        Self::with_endpoint(QUICKCHART_URL, timeout)
    }

    /// Renderer posting to a self-hosted QuickChart instance
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> BudgetResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BudgetError::Chart(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Request body for `chart`
    pub fn request_body(chart: &PieChart) -> Value {
        json!({
            "version": "4",
            "width": chart.width,
            "height": chart.height,
            "format": "png",
            "backgroundColor": "white",
            "chart": chart.to_chartjs(),
        })
    }
}

impl ChartRenderer for QuickChartRenderer {
    fn render(&self, chart: &PieChart) -> BudgetResult<Vec<u8>> {
        tracing::debug!(endpoint = %self.endpoint, slices = chart.slices.len(), "Rendering chart");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&Self::request_body(chart))
            .send()
            .map_err(|e| BudgetError::Chart(format!("Chart request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BudgetError::Chart(format!(
                "Chart service returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| BudgetError::Chart(format!("Failed to read chart image: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_report;

    #[test]
    fn test_request_body() {
        let chart = PieChart::from_report(&sample_report());
        let body = QuickChartRenderer::request_body(&chart);

        assert_eq!(body["width"], 800);
        assert_eq!(body["height"], 600);
        assert_eq!(body["format"], "png");
        assert_eq!(body["chart"]["type"], "pie");
        assert_eq!(body["chart"]["data"]["labels"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_unreachable_service_is_chart_error() {
        let renderer = QuickChartRenderer::with_endpoint(
            "http://127.0.0.1:9/chart",
            Duration::from_millis(200),
        )
        .unwrap();
        let chart = PieChart::from_report(&sample_report());

        let err = renderer.render(&chart).unwrap_err();
        assert!(matches!(err, BudgetError::Chart(_)));
    }
}
