//! CLI command for the monthly report
//!
//! Runs the report, prints it, writes the chart and data export, and posts
//! the summary to the chat bot.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Args;

use crate::api::{BookkeepingApi, MoneybirdClient};
use crate::chart::{save_chart, ChartRenderer, PieChart, QuickChartRenderer};
use crate::config::settings::{api_token, telegram_token};
use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::export::{write_export, ExportFormat};
use crate::models::{DateRange, Money};
use crate::notify::{Notifier, TelegramNotifier};
use crate::reports::MonthlyReport;
use crate::services::{BudgetRun, RunRequest};

/// Arguments of `family-budget report`
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Whole calendar month (YYYY-MM), capped at today
    #[arg(short, long, conflicts_with_all = ["start", "end"])]
    pub month: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD), defaults to today
    #[arg(short, long, requires = "start")]
    pub end: Option<String>,

    /// Gross revenue to use instead of the booked revenue
    #[arg(short, long, allow_hyphen_values = true)]
    pub revenue: Option<String>,

    /// Do not render the pie chart
    #[arg(long)]
    pub no_chart: bool,

    /// Print and write files, but do not send the chat message
    #[arg(long)]
    pub dry_run: bool,

    /// Data export format
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub export: ExportFormat,

    /// Do not write the data export
    #[arg(long)]
    pub no_export: bool,

    /// Directory for the chart and export (overrides settings)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Resolved report options
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub request: RunRequest,
    pub chart: bool,
    pub export: Option<ExportFormat>,
    pub output_dir: PathBuf,
    pub send: bool,
}

impl ReportOptions {
    /// Validate arguments against `today`
    pub fn from_args(
        args: &ReportArgs,
        settings: &Settings,
        today: NaiveDate,
    ) -> BudgetResult<Self> {
        let period = resolve_period(args, today)?;
        let revenue = args.revenue.as_deref().map(parse_revenue).transpose()?;

        Ok(Self {
            request: RunRequest::new(period).with_revenue_override(revenue),
            chart: !args.no_chart,
            export: (!args.no_export).then_some(args.export),
            output_dir: args
                .output_dir
                .clone()
                .unwrap_or_else(|| settings.output_dir.clone()),
            send: !args.dry_run,
        })
    }
}

/// What a report run produced
#[derive(Debug)]
pub struct ReportOutcome {
    pub report: MonthlyReport,
    pub chart_path: Option<PathBuf>,
    pub export_path: Option<PathBuf>,
    pub sent: bool,
}

/// Report period from `--month` or `--start/--end`, month-to-date otherwise
pub fn resolve_period(args: &ReportArgs, today: NaiveDate) -> BudgetResult<DateRange> {
    if let Some(month) = &args.month {
        return DateRange::parse_month(month, today)
            .map_err(|e| BudgetError::Validation(e.to_string()));
    }

    let Some(start) = &args.start else {
        return Ok(DateRange::month_to_date(today));
    };
    let start = parse_date(start)?;
    let end = match &args.end {
        Some(end) => parse_date(end)?,
        None => today,
    };

    if start > end {
        return Err(BudgetError::Validation(format!(
            "Start date {} is after end date {}",
            start, end
        )));
    }
    Ok(DateRange::new(start, end))
}

fn parse_date(s: &str) -> BudgetResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        BudgetError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD format.", s))
    })
}

/// Parse the revenue override; it must not be negative
pub fn parse_revenue(s: &str) -> BudgetResult<Money> {
    let amount = Money::parse(s).map_err(|e| BudgetError::Validation(e.to_string()))?;
    if amount.is_negative() {
        return Err(BudgetError::Validation(format!(
            "Revenue override must not be negative: {}",
            s
        )));
    }
    Ok(amount)
}

/// Run the report against `api` and deliver it
///
/// The report is printed and files are written before the chat message is
/// sent, so a delivery failure still leaves the local output behind.
pub fn produce_report(
    api: &dyn BookkeepingApi,
    settings: &Settings,
    options: &ReportOptions,
    renderer: Option<&dyn ChartRenderer>,
    notifier: Option<&dyn Notifier>,
    out: &mut dyn Write,
) -> BudgetResult<ReportOutcome> {
    let report = BudgetRun::new(api, settings).execute(&options.request)?;

    writeln!(out, "{}", report.format_terminal())?;

    let mut chart_png = None;
    let mut chart_path = None;
    if let (true, Some(renderer)) = (options.chart, renderer) {
        let chart = PieChart::from_report(&report);
        match save_chart(renderer, &chart, &options.output_dir, &report.period) {
            Ok((path, png)) => {
                writeln!(out, "✓ Pie chart saved to {}", path.display())?;
                chart_path = Some(path);
                chart_png = Some(png);
            }
            Err(e) => tracing::warn!(error = %e, "Chart not rendered, continuing without it"),
        }
    }

    let mut export_path = None;
    if let Some(format) = options.export {
        match write_export(&report, format, &options.output_dir) {
            Ok(path) => {
                writeln!(out, "Detailed data saved to {}", path.display())?;
                export_path = Some(path);
            }
            Err(e) => tracing::warn!(error = %e, "Could not save detailed data"),
        }
    }

    let mut sent = false;
    if !options.send {
        tracing::info!("Dry run, not sending the summary");
    } else if let Some(notifier) = notifier {
        notifier.send(&report.format_message(), chart_png.as_deref())?;
        sent = true;
    } else {
        tracing::warn!("No chat bot configured, summary not sent");
    }

    Ok(ReportOutcome {
        report,
        chart_path,
        export_path,
        sent,
    })
}

/// Handle `family-budget report`
pub fn handle_report_command(settings: &Settings, args: ReportArgs) -> BudgetResult<()> {
    let options = ReportOptions::from_args(&args, settings, Local::now().date_naive())?;

    let client = MoneybirdClient::from_settings(settings, api_token()?)?;
    let timeout = Duration::from_secs(settings.request_timeout_secs);

    let renderer = if options.chart {
        QuickChartRenderer::new(timeout)
            .map_err(|e| tracing::warn!(error = %e, "Chart renderer unavailable"))
            .ok()
    } else {
        None
    };

    let notifier = match (telegram_token(), settings.telegram_chat_id.as_deref()) {
        (Some(token), Some(chat_id)) if options.send => {
            Some(TelegramNotifier::new(token, chat_id, timeout)?)
        }
        _ => None,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    produce_report(
        &client,
        settings,
        &options,
        renderer.as_ref().map(|r| r as &dyn ChartRenderer),
        notifier.as_ref().map(|n| n as &dyn Notifier),
        &mut out,
    )?;

    Ok(())
}
