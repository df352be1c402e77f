//! Select command implementation.

use anyhow::Result;
use prime::{CrossSection, MetricProvider, PrimeModel, export};
use std::path::Path;

/// Select the top tickers of every period and write them as CSV.
pub(crate) fn select<P: MetricProvider>(
    model: &PrimeModel<P>,
    cross_section: &CrossSection,
    output: &Path,
) -> Result<()> {
    super::banner("Stock Selection");
    println!("Top K: {}", model.config().top_k);
    println!();

    let selections = model.select_stocks(cross_section)?;

    println!("{:<10} Tickers", "Period");
    println!("{}", "─".repeat(40));
    for (period, picks) in &selections {
        println!("{:<10} {}", period.to_string(), picks.join(", "));
    }
    println!();

    let mut frame = export::selections_frame(&selections)?;
    export::write_csv(output, &mut frame)?;
    println!("Wrote {} period(s) to {}", selections.len(), output.display());

    Ok(())
}
