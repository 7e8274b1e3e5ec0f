use anyhow::Result;
use colored::Colorize;
use porbeagle_codegen::{GeneratorConfig, ViewReport};

use super::load_input;
use crate::ui;
use crate::InputArgs;

pub fn inspect(config: &GeneratorConfig, input: &InputArgs, json: bool) -> Result<()> {
    let compilation = load_input(config, input)?;
    let reports = porbeagle_codegen::inspect(&compilation, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        ui::print_warning("No views found");
        return Ok(());
    }
    for report in &reports {
        print_report(report);
    }
    Ok(())
}

fn print_report(report: &ViewReport) {
    println!("{}", report.declaration.to_string().bold());

    if let Some(error) = &report.error {
        ui::print_failure(error);
        return;
    }

    ui::print_item("stickers", &report.stickers);
    ui::print_item("embeds", &report.embeds);
    for row in &report.action_rows {
        ui::print_item(&format!("action row {}", row.index), &row.members);
    }
    ui::print_item("ignored", &report.ignored);
    if let Some(model) = &report.model {
        println!("  {} create({})", ui::symbols::BULLET.dimmed(), model.cyan());
    }
}
