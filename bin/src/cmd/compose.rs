//! Compose command implementation.

use anyhow::Result;
use prime::{MetricProvider, PrimeModel, export};
use std::path::Path;

/// Align the universe, write the per-period document and optionally the aligned rows.
pub(crate) fn compose<P: MetricProvider>(
    model: &PrimeModel<P>,
    output: &Path,
    aligned_csv: Option<&Path>,
) -> Result<()> {
    super::banner("Compose Stock Data");
    println!("Universe: {}", model.config().universe.join(", "));
    println!();

    let stock_data = model.compose_stock_data()?;
    if let Some(path) = aligned_csv {
        let mut frame = export::aligned_frame(&stock_data)?;
        export::write_csv(path, &mut frame)?;
        println!("Aligned rows: {} -> {}", frame.height(), path.display());
    }

    let aggregation = model.aggregate_rows(&stock_data)?;
    export::write_cross_section(output, &aggregation.cross_section)?;

    println!(
        "Periods:      {} -> {}",
        aggregation.cross_section.len(),
        output.display()
    );
    if !aggregation.conflicts.is_empty() {
        println!("Conflicts:    {} (later rows kept)", aggregation.conflicts.len());
        for c in &aggregation.conflicts {
            println!(
                "  {} {:<6} {} replaced by {}",
                c.period, c.symbol, c.replaced, c.kept
            );
        }
    }
    println!();

    Ok(())
}
