//! Rank command implementation.

use super::RULE;
use anyhow::Result;
use prime::{CrossSection, Metric, MetricProvider, PrimeModel};
use std::{fs, path::Path};

/// Print or write the rank tables of every period.
pub(crate) fn rank<P: MetricProvider>(
    model: &PrimeModel<P>,
    cross_section: &CrossSection,
    output: Option<&Path>,
) -> Result<()> {
    let rankings = model.rank_stocks(cross_section);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&rankings)?;
        fs::write(path, json + "\n")?;
        println!("Wrote rankings for {} period(s) to {}", rankings.len(), path.display());
        return Ok(());
    }

    super::banner("Metric Rankings");

    for (period, tables) in &rankings {
        println!("{RULE}");
        println!("{period}");
        println!("{RULE}");
        print!("{:<6}", "Rank");
        for metric in Metric::ALL {
            print!(" {:>22}", metric.name());
        }
        println!();

        let n = tables.values().map(|t| t.len()).max().unwrap_or(0);
        for rank in 0..n {
            print!("{:<6}", rank + 1);
            for metric in Metric::ALL {
                let cell = tables
                    .get(&metric)
                    .and_then(|t| t.entries.get(rank))
                    .map(|(symbol, value)| format!("{symbol} {value:.3}"))
                    .unwrap_or_default();
                print!(" {cell:>22}");
            }
            println!();
        }
        println!();
    }

    Ok(())
}
