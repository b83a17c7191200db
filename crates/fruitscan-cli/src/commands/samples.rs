//! Sample image listing.

use anyhow::Result;
use colored::Colorize;

use crate::acquire::SAMPLES;

pub fn execute() -> Result<()> {
    println!("{}", "Sample images".bold());
    println!();
    for sample in SAMPLES {
        println!(
            "  {} {:<12} {}",
            sample.emoji,
            sample.name.cyan(),
            sample.url.dimmed()
        );
    }
    println!();
    println!(
        "  {}",
        "Analyze one with: fruitscan analyze --sample <name>".dimmed()
    );
    Ok(())
}
