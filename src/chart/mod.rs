//! Budget pie chart
//!
//! The chart shows each root family category as a slice, plus either the
//! remaining budget (grey) or the overspend (red). Rendering to an image is
//! behind [`ChartRenderer`].

pub mod quickchart;

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

pub use quickchart::QuickChartRenderer;

use crate::config::paths::chart_file;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{DateRange, Money};
use crate::reports::MonthlyReport;

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 600;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Category colors, cycled in slice order
pub const PALETTE: [Rgb; 7] = [
    Rgb(255, 99, 132),  // red
    Rgb(54, 162, 235),  // blue
    Rgb(255, 206, 86),  // yellow
    Rgb(75, 192, 192),  // teal
    Rgb(153, 102, 255), // purple
    Rgb(255, 159, 64),  // orange
    Rgb(46, 204, 113),  // green
];

pub const REMAINING_COLOR: Rgb = Rgb(200, 200, 200);
pub const OVER_BUDGET_COLOR: Rgb = Rgb(220, 53, 69);

pub const REMAINING_LABEL: &str = "Remaining Budget";
pub const OVER_BUDGET_LABEL: &str = "Over Budget";

/// One slice; `value` is always positive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieSlice {
    pub label: String,
    pub value: Money,
    pub color: Rgb,
}

/// Pie chart model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieChart {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    /// Build the chart for a report
    ///
    /// Root categories with no net spending get no slice.
    pub fn from_report(report: &MonthlyReport) -> Self {
        let mut slices: Vec<PieSlice> = report
            .root_totals
            .ordered()
            .iter()
            .map(|root| (root.name.clone(), -root.amount))
            .filter(|(_, value)| value.is_positive())
            .enumerate()
            .map(|(i, (label, value))| PieSlice {
                label,
                value,
                color: PALETTE[i % PALETTE.len()],
            })
            .collect();

        let remaining = report.budget.remaining;
        if remaining.is_positive() {
            slices.push(PieSlice {
                label: REMAINING_LABEL.to_string(),
                value: remaining,
                color: REMAINING_COLOR,
            });
        } else if remaining.is_negative() {
            slices.push(PieSlice {
                label: OVER_BUDGET_LABEL.to_string(),
                value: remaining.abs(),
                color: OVER_BUDGET_COLOR,
            });
        }

        Self {
            title: format!("Family budget {}", report.period.month_label()),
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            slices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Chart.js configuration for this chart
    pub fn to_chartjs(&self) -> Value {
        let labels: Vec<&str> = self.slices.iter().map(|s| s.label.as_str()).collect();
        let data: Vec<f64> = self.slices.iter().map(|s| s.value.as_f64()).collect();
        let colors: Vec<String> = self.slices.iter().map(|s| s.color.to_string()).collect();

        json!({
            "type": "pie",
            "data": {
                "labels": labels,
                "datasets": [{
                    "data": data,
                    "backgroundColor": colors,
                }],
            },
            "options": {
                "plugins": {
                    "title": { "display": true, "text": self.title },
                    "legend": { "position": "right" },
                },
            },
        })
    }
}

/// Turns a chart model into PNG bytes
pub trait ChartRenderer {
    fn render(&self, chart: &PieChart) -> BudgetResult<Vec<u8>>;
}

/// Render `chart` and save it as `budget_chart_YYYY-MM.png` in `output_dir`
pub fn save_chart(
    renderer: &dyn ChartRenderer,
    chart: &PieChart,
    output_dir: &Path,
    period: &DateRange,
) -> BudgetResult<(PathBuf, Vec<u8>)> {
    if chart.is_empty() {
        return Err(BudgetError::Chart("Nothing to chart".into()));
    }

    let image = renderer.render(chart)?;

    std::fs::create_dir_all(output_dir)
        .map_err(|e| {
            BudgetError::Chart(format!("Failed to create {}: {}", output_dir.display(), e))
        })?;
    let path = chart_file(output_dir, period);
    std::fs::write(&path, &image)
        .map_err(|e| BudgetError::Chart(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok((path, image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{BudgetCalculator, TaxRates};
    use crate::testing::sample_report;
    use tempfile::TempDir;

    struct FixedRenderer(Vec<u8>);

    impl ChartRenderer for FixedRenderer {
        fn render(&self, _chart: &PieChart) -> BudgetResult<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_slices_from_report() {
        let chart = PieChart::from_report(&sample_report());

        assert_eq!(chart.width, 800);
        assert_eq!(chart.height, 600);
        assert_eq!(
            chart.slices,
            vec![
                PieSlice {
                    label: "Wonen".into(),
                    value: Money::from_cents(170_000),
                    color: PALETTE[0],
                },
                PieSlice {
                    label: "Boodschappen".into(),
                    value: Money::from_cents(60_000),
                    color: PALETTE[1],
                },
                PieSlice {
                    label: REMAINING_LABEL.into(),
                    value: Money::from_cents(313_400),
                    color: REMAINING_COLOR,
                },
            ]
        );
    }

    #[test]
    fn test_over_budget_slice() {
        let mut report = sample_report();
        report.budget = BudgetCalculator::new(TaxRates::default()).calculate(
            Money::from_cents(100_000),
            None,
            Money::zero(),
            Money::from_cents(-230_000),
        );

        let chart = PieChart::from_report(&report);
        let last = chart.slices.last().unwrap();

        assert_eq!(last.label, OVER_BUDGET_LABEL);
        assert_eq!(last.color, OVER_BUDGET_COLOR);
        assert!(last.value.is_positive());
    }

    #[test]
    fn test_palette_cycles() {
        let colors: Vec<Rgb> = (0..9).map(|i| PALETTE[i % PALETTE.len()]).collect();
        assert_eq!(colors[7], PALETTE[0]);
        assert_eq!(Rgb(200, 200, 200).to_string(), "rgb(200, 200, 200)");
    }

    #[test]
    fn test_chartjs_config() {
        let config = PieChart::from_report(&sample_report()).to_chartjs();

        assert_eq!(config["type"], "pie");
        assert_eq!(config["data"]["labels"][0], "Wonen");
        assert_eq!(config["data"]["datasets"][0]["data"][0], 1700.0);
        assert_eq!(config["data"]["datasets"][0]["backgroundColor"][2], "rgb(200, 200, 200)");
    }

    #[test]
    fn test_save_chart() {
        let temp_dir = TempDir::new().unwrap();
        let report = sample_report();
        let chart = PieChart::from_report(&report);

        let renderer = FixedRenderer(vec![0x89, b'P', b'N', b'G']);
        let (path, image) =
            save_chart(&renderer, &chart, temp_dir.path(), &report.period).unwrap();

        assert_eq!(path.file_name().unwrap(), "budget_chart_2025-03.png");
        assert_eq!(std::fs::read(&path).unwrap(), image);
    }

    #[test]
    fn test_empty_chart_is_not_rendered() {
        let temp_dir = TempDir::new().unwrap();
        let chart = PieChart {
            title: String::new(),
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            slices: Vec::new(),
        };
        let period = sample_report().period;

        let err =
            save_chart(&FixedRenderer(Vec::new()), &chart, temp_dir.path(), &period).unwrap_err();
        assert!(matches!(err, BudgetError::Chart(_)));
    }
}
