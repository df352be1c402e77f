//! Persistence of pipeline outputs.
//!
//! The cross-section is written as a pretty-printed JSON document keyed by
//! period and then by ticker. Tabular views of the aligned rows and of the
//! per-period selections are built as polars [`DataFrame`]s and written as
//! CSV.

use polars::prelude::*;
use prime_traits::{AlignedRow, CrossSection, Result, Selections, Symbol};
use std::{collections::BTreeMap, fs, fs::File, path::Path};
use tracing::info;

/// Serializes `cross_section` as the persisted document text.
///
/// The output is deterministic: periods are ascending, tickers keep their
/// insertion order and every row lists the five metrics in a fixed order.
///
/// # Errors
///
/// Fails only if serialization fails.
pub fn to_document(cross_section: &CrossSection) -> Result<String> {
    let mut text = serde_json::to_string_pretty(cross_section)?;
    text.push('\n');
    Ok(text)
}

/// Writes `cross_section` to `path`, replacing any existing file.
///
/// # Errors
///
/// Fails if the file cannot be written.
pub fn write_cross_section(path: impl AsRef<Path>, cross_section: &CrossSection) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, to_document(cross_section)?)?;
    info!(path = %path.display(), periods = cross_section.len(), "wrote cross-section");
    Ok(())
}

/// Reads a cross-section document written by [`write_cross_section`].
///
/// # Errors
///
/// Fails if the file cannot be read or is not a cross-section document.
pub fn read_cross_section(path: impl AsRef<Path>) -> Result<CrossSection> {
    let raw = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&raw)?)
}

/// One row per aligned observation, ordered by ticker and then date.
///
/// # Errors
///
/// Fails if the frame cannot be assembled.
pub fn aligned_frame(stock_data: &BTreeMap<Symbol, Vec<AlignedRow>>) -> Result<DataFrame> {
    let rows = stock_data
        .iter()
        .flat_map(|(symbol, rows)| rows.iter().map(move |row| (symbol.as_str(), row)));

    let mut symbols = Vec::new();
    let mut dates = Vec::new();
    let mut eps = Vec::new();
    let mut pe = Vec::new();
    let mut ret_6m = Vec::new();
    let mut ret_1y = Vec::new();
    let mut yoy = Vec::new();
    for (symbol, row) in rows {
        let m = &row.metrics;
        symbols.push(symbol);
        dates.push(row.date);
        eps.push(m.reported_eps);
        pe.push(m.pe_ratio);
        ret_6m.push(m.quarterly_return_6m);
        ret_1y.push(m.quarterly_return_1y);
        yoy.push(m.yoy_return);
    }

    Ok(df! {
        "symbol" => symbols,
        "date" => dates,
        "reported_eps" => eps,
        "pe_ratio" => pe,
        "quarterly_return_6m" => ret_6m,
        "quarterly_return_1y" => ret_1y,
        "yoy_return" => yoy,
    }?)
}

/// One row per period with the selected tickers joined by commas.
///
/// # Errors
///
/// Fails if the frame cannot be assembled.
pub fn selections_frame(selections: &Selections) -> Result<DataFrame> {
    let periods: Vec<String> = selections.keys().map(ToString::to_string).collect();
    let picks: Vec<String> = selections.values().map(|p| p.join(",")).collect();
    Ok(df! {
        "period" => periods,
        "tickers" => picks,
    }?)
}

/// Writes `frame` to `path` as CSV with a header row.
///
/// # Errors
///
/// Fails if the file cannot be created or written.
pub fn write_csv(path: impl AsRef<Path>, frame: &mut DataFrame) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(frame)?;
    info!(path = %path.display(), rows = frame.height(), "wrote csv");
    Ok(())
}
