use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use trendcast_core::{
    describe, export_file_name, window, ForecastPipeline, ForecastReport, ForecastRequest,
    ForecastRow, PipelineError, SummaryStats, Ticker,
};

use crate::cli::ForecastArgs;
use crate::error::CliError;

use super::CommandResult;

const DISCLAIMER: &str = "For educational and informational purposes only. Not financial advice.";

#[derive(Debug, Serialize)]
struct ForecastData<'a> {
    ticker: &'a Ticker,
    latest_price: f64,
    training_points: usize,
    training_since: String,
    horizon_days: u32,
    summary: Option<&'a SummaryStats>,
    summary_error: Option<ErrorData>,
    forecast: &'a [ForecastRow],
    export_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorData {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct InsufficientData {
    ticker: Ticker,
    offset_days: u32,
    points: usize,
    required: usize,
}

pub async fn run(
    args: &ForecastArgs,
    pipeline: &ForecastPipeline,
) -> Result<CommandResult, CliError> {
    let ticker = Ticker::parse(&args.ticker)?;

    // The offset check and the fit share one history read.
    let series = pipeline.series(&ticker).await?;
    match window::max_offset(&series) {
        Some(max) if args.offset <= max => {}
        Some(max) => {
            return Err(CliError::Command(format!(
                "offset {} is outside the selectable range 0..={max} days for {ticker}",
                args.offset
            )))
        }
        None => {
            return Err(CliError::Command(format!(
                "history for {ticker} spans {} days; not enough to select a training window",
                series.total_days()
            )))
        }
    }

    let request = ForecastRequest::new(ticker.clone(), args.offset, args.horizon)?;
    let report = match pipeline.run_on(&series, &request) {
        Ok(report) => report,
        Err(PipelineError::InsufficientData { points, required }) => {
            let data = InsufficientData {
                ticker,
                offset_days: args.offset,
                points,
                required,
            };
            let text = format!(
                "{} training points from offset {} days; at least {required} are required.",
                data.points, data.offset_days
            );
            return Ok(CommandResult::ok(serde_json::to_value(&data)?, text)
                .with_warning("Not enough historical data in the selected range."));
        }
        Err(error) => return Err(error.into()),
    };

    let export_path = match &args.export {
        Some(path) => Some(write_export(&report, path.clone())?),
        None => None,
    };

    let data = ForecastData {
        ticker: &report.ticker,
        latest_price: report.latest_price,
        training_points: report.training_points,
        training_since: report.window.start_date.to_string(),
        horizon_days: report.horizon_days,
        summary: report.summary.as_ref().ok(),
        summary_error: report.summary.as_ref().err().map(|error| ErrorData {
            code: error.code(),
            message: error.to_string(),
        }),
        forecast: report.forecast.tail(report.horizon_days as usize),
        export_path: export_path.as_ref().map(|path| path.display().to_string()),
    };

    let text = render_text(&report, args.tail, export_path.as_ref());
    let mut result = CommandResult::ok(serde_json::to_value(&data)?, text);
    if let Err(error) = &report.summary {
        result = result.with_warning(format!("statistical summary unavailable: {error}"));
    }
    Ok(result)
}

fn write_export(report: &ForecastReport, path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    let path = path.unwrap_or_else(|| PathBuf::from(export_file_name(&report.ticker)));
    let bytes = report.export_csv()?;
    fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), rows = report.horizon_days, "forecast exported");
    Ok(path)
}

fn render_text(report: &ForecastReport, tail: usize, export_path: Option<&PathBuf>) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{} forecast", report.ticker);
    let _ = writeln!(text, "  Latest Price:    {:.2}", report.latest_price);
    let _ = writeln!(text, "  Training Points: {}", report.training_points);
    let _ = writeln!(text, "  Training Since:  {}", report.window.start_date);
    let _ = writeln!(text);

    let _ = writeln!(text, "Statistical Summary");
    match &report.summary {
        Ok(stats) => {
            let _ = writeln!(
                text,
                "{}",
                describe(stats, report.window.start_date, report.horizon_days)
            );
        }
        Err(error) => {
            let _ = writeln!(text, "Unavailable: {error}");
        }
    }
    let _ = writeln!(text);

    let rows = report.forecast.tail(tail.min(report.horizon_days as usize));
    let _ = writeln!(
        text,
        "{:<12} {:>12} {:>12} {:>12}",
        "ds", "yhat", "yhat_lower", "yhat_upper"
    );
    for row in rows {
        let _ = writeln!(
            text,
            "{:<12} {:>12.2} {:>12.2} {:>12.2}",
            row.date.to_string(),
            row.yhat,
            row.yhat_lower,
            row.yhat_upper
        );
    }

    if let Some(path) = export_path {
        let _ = writeln!(text);
        let _ = writeln!(
            text,
            "Exported {} rows to {}",
            report.horizon_days,
            path.display()
        );
    }

    let _ = writeln!(text);
    text.push_str(DISCLAIMER);
    text
}
