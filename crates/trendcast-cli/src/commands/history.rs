use serde::Serialize;
use trendcast_core::{window, ForecastPipeline, Ticker, SLIDER_RESERVE_DAYS};

use crate::cli::HistoryArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct HistoryData {
    ticker: Ticker,
    earliest_date: String,
    latest_date: String,
    total_days: i64,
    points: usize,
    latest_close: f64,
    max_offset_days: Option<u32>,
}

pub async fn run(
    args: &HistoryArgs,
    pipeline: &ForecastPipeline,
) -> Result<CommandResult, CliError> {
    let ticker = Ticker::parse(&args.ticker)?;
    let series = pipeline.series(&ticker).await?;
    let max_offset_days = window::max_offset(&series);

    let data = HistoryData {
        ticker: ticker.clone(),
        earliest_date: series.earliest_date().to_string(),
        latest_date: series.latest_date().to_string(),
        total_days: series.total_days(),
        points: series.len(),
        latest_close: series.latest_close(),
        max_offset_days,
    };

    let offsets = match max_offset_days {
        Some(max) => format!("0..={max} days"),
        None => "none".to_string(),
    };
    let text = format!(
        "{ticker} daily history\n\
         \x20 Earliest date:   {}\n\
         \x20 Latest date:     {}\n\
         \x20 Total days:      {}\n\
         \x20 Data points:     {}\n\
         \x20 Latest close:    {:.2}\n\
         \x20 Training offset: {offsets}",
        data.earliest_date, data.latest_date, data.total_days, data.points, data.latest_close,
    );

    let result = CommandResult::ok(serde_json::to_value(&data)?, text);
    Ok(match max_offset_days {
        Some(_) => result,
        None => result.with_warning(format!(
            "history spans {} days; at least {SLIDER_RESERVE_DAYS} are needed to choose a training offset",
            data.total_days
        )),
    })
}
