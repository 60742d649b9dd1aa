//! Rendering of reports and estimates.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use lexiprobe_core::estimator::{EstimationResult, VocabularyEstimate};
use lexiprobe_core::report::{AssessmentKind, AssessmentReport};

/// Print a report in the requested format.
pub fn print_report(report: &AssessmentReport, format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(report)?),
        "markdown" | "md" => println!("{}", report.to_markdown()),
        _ => print_report_text(report),
    }
    Ok(())
}

/// Save a report into `dir` and tell the user where it went.
pub fn save_report(report: &AssessmentReport, dir: &Path) -> Result<()> {
    let path = dir.join(report.file_name());
    report.save_json(&path)?;
    eprintln!("Report saved to {}", path.display());
    Ok(())
}

fn print_report_text(report: &AssessmentReport) {
    match &report.kind {
        AssessmentKind::Leveled { .. } => {
            if let Some(tier) = report.kind.tier_summary() {
                println!("Tier: {tier}");
            }
        }
        AssessmentKind::Survey {
            preset,
            total_words,
        } => println!(
            "Survey: {preset} (±{}%) over {total_words} words",
            preset.margin_percent()
        ),
    }
    println!(
        "Sample: {} recognized and {} mastered of {} tested",
        report.score.passive, report.score.active, report.score.drawn
    );
    print_vocabulary(&report.estimate);
}

/// Print passive/active estimates, or the inconclusive notice.
pub fn print_vocabulary(estimate: &VocabularyEstimate) {
    match estimate {
        VocabularyEstimate::Inconclusive {
            passive,
            sample_size,
        } => {
            println!(
                "\nInconclusive: {passive} of {sample_size} words recognized, \
                 not enough for a reliable estimate."
            );
        }
        VocabularyEstimate::Estimated {
            passive,
            active,
            active_ratio,
        } => {
            let mut table = estimate_table();
            add_row(&mut table, "Passive", passive);
            add_row(&mut table, "Active", active);
            println!("\n{table}");
            println!("Active/passive ratio: {:.0}%", active_ratio * 100.0);
        }
    }
}

/// Print a single estimate.
pub fn print_estimate(name: &str, result: &EstimationResult) {
    let mut table = estimate_table();
    add_row(&mut table, name, result);
    println!("{table}");
}

fn estimate_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Vocabulary", "Estimate", "95% interval", "Margin"]);
    table
}

fn add_row(table: &mut Table, name: &str, r: &EstimationResult) {
    table.add_row(vec![
        Cell::new(name),
        Cell::new(r.point_estimate),
        Cell::new(format!("{} - {}", r.lower_bound, r.upper_bound)),
        Cell::new(format!("±{:.1}%", r.margin_of_error_percent)),
    ]);
}
