//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use fruitscan_core::analysis::{AnalysisResult, Diagnosis};
use fruitscan_core::report::{self, SeverityTier};

/// Print an analysis result, either variant.
pub fn print_result(result: &AnalysisResult) {
    match result {
        AnalysisResult::Error { error } => {
            println!();
            println!("{} {}", "⚠".red().bold(), error.red());
        }
        AnalysisResult::Success(diagnosis) => {
            println!();
            println!(
                "{} {} detected successfully",
                "✓".green().bold(),
                diagnosis.fruit_type.bold()
            );
            print_diagnosis(diagnosis);
        }
    }
}

/// Print a diagnosis card followed by the sections that have content.
pub fn print_diagnosis(d: &Diagnosis) {
    let tier = report::severity_tier(&d.disease.severity);
    let sections = report::sections(d);

    println!();
    println!("{}: {}", "Detected Fruit".bold(), d.fruit_type.cyan().bold());
    println!(
        "{}: {}",
        "Severity".bold(),
        colored_tier(tier, &format!("{} {}", tier.icon(), tier.label()))
    );
    if let Some(status) = &d.health_status {
        println!("{}: {}", "Health".bold(), status.as_str());
    }

    println!();
    println!(
        "{} {}",
        "Diagnosis".bold(),
        format!("({}% confidence)", d.disease.confidence).dimmed()
    );
    println!("  {}", d.disease.name.bold());
    if !d.disease.description.is_empty() {
        println!("  {}", d.disease.description);
    }

    if sections.damage {
        if let Some(pct) = d.affected_percentage {
            let band = report::damage_band(pct);
            println!();
            println!("{}: {}% - {}", "Affected".bold(), pct, band.label());
            println!("  {}", band.description().dimmed());
        }
    }

    if sections.edibility {
        println!();
        let verdict = match d.is_edible {
            Some(true) => "Safe to eat".green(),
            _ => "Not safe to eat".red(),
        };
        println!("{}: {}", "Edibility".bold(), verdict);
        if let Some(reason) = &d.edibility_reason {
            println!("  {}", reason);
        }
    }

    if sections.notes {
        println!();
        println!("{} {}", "ℹ".cyan(), d.additional_notes);
    }

    if sections.immediate {
        println!();
        println!("{}", "Immediate Actions".bold());
        for (i, action) in d.treatment.immediate.iter().enumerate() {
            println!("  {}. {}", i + 1, action);
        }
    }

    if sections.prevention {
        println!();
        println!("{}", "Prevention Tips".bold());
        for tip in &d.treatment.prevention {
            println!("  {} {}", "✓".green(), tip);
        }
    }

    if sections.chemicals {
        println!();
        println!("{}", "Recommended Treatments".bold());
        println!("  {}", d.treatment.chemicals.join(", "));
    }
}

fn colored_tier(tier: SeverityTier, text: &str) -> ColoredString {
    match tier {
        SeverityTier::Healthy => text.green(),
        SeverityTier::Mild => text.yellow(),
        SeverityTier::Moderate => text.truecolor(255, 140, 0),
        SeverityTier::Severe => text.red().bold(),
    }
}
