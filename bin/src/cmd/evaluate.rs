//! Evaluate command implementation.

use super::RULE;
use anyhow::{Result, bail};
use prime::{CrossSection, MetricProvider, PrimeModel, eval::PerformanceSummary};

/// Evaluate the lagged portfolio and print its period returns and summary.
pub(crate) fn evaluate<P: MetricProvider>(
    model: &PrimeModel<P>,
    cross_section: &CrossSection,
    format: &str,
) -> Result<()> {
    if !matches!(format, "text" | "json") {
        bail!("unknown format '{format}', expected 'text' or 'json'");
    }

    let selections = model.select_stocks(cross_section)?;
    let returns = model.evaluate_portfolio(&selections);
    let summary = PerformanceSummary::from_period_returns(&returns);

    if format == "json" {
        let period_returns: serde_json::Map<String, serde_json::Value> = returns
            .iter()
            .map(|(period, r)| (period.to_string(), serde_json::json!(r)))
            .collect();
        let doc = serde_json::json!({
            "period_returns": period_returns,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    super::banner("Portfolio Evaluation");
    println!(
        "Top K: {}   Holding: {} days   From: {}",
        model.config().top_k,
        model.config().holding_days,
        model.config().min_eval_year
    );
    println!();

    println!("{:<10} {:<28} {:>10}", "Period", "Held", "Return");
    println!("{}", "─".repeat(50));
    for (period, r) in &returns {
        let held = selections
            .get(&period.previous())
            .map(|p| p.join(","))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<10} {:<28} {:>9.2}%", period.to_string(), held, r * 100.0);
    }
    println!();

    println!("{RULE}");
    println!("SUMMARY");
    println!("{RULE}\n");
    println!("Periods:       {}", summary.n_periods);
    println!("Total Return:  {:.2}%", summary.total_return * 100.0);
    println!("Mean Return:   {:.2}%", summary.mean_return * 100.0);
    println!("Volatility:    {:.2}%", summary.volatility * 100.0);
    println!("Sharpe Ratio:  {:.2}", summary.sharpe_ratio);
    println!("Max Drawdown:  {:.2}%", summary.max_drawdown * 100.0);
    println!("Hit Rate:      {:.1}%", summary.hit_rate * 100.0);
    println!();

    Ok(())
}
