//! The `ripple summary` command.

use anyhow::{Context as _, Result};
use comfy_table::{Cell, Table};

use ripple_core::summary::ExamSummary;

use super::common::{BankArgs, Context};

pub async fn execute(ctx: &Context, id: &str, bank_args: BankArgs, json: bool) -> Result<()> {
    let (session, resolved) = ctx.session(id, &bank_args).await?;
    let tokens = resolved.tokens().await;
    let summary = session.summary(&tokens);

    if json {
        let out = serde_json::to_string_pretty(&summary).context("failed to serialize summary")?;
        println!("{out}");
    } else {
        println!("{}", summary_table(&summary));
    }
    Ok(())
}

fn counts(map: &std::collections::BTreeMap<String, usize>) -> String {
    map.iter()
        .map(|(key, n)| format!("{key} ({n})"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn summary_table(summary: &ExamSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);

    let codes: Vec<&str> = summary.curriculum_codes.iter().map(String::as_str).collect();
    let tokens: Vec<&str> = summary.tokens.values().map(String::as_str).collect();

    table.add_row(vec![Cell::new("Items"), Cell::new(summary.total_slots)]);
    table.add_row(vec![Cell::new("Locked"), Cell::new(summary.locked_count)]);
    if summary.orphaned > 0 {
        table.add_row(vec![Cell::new("Missing from bank"), Cell::new(summary.orphaned)]);
    }
    table.add_row(vec![
        Cell::new("Estimated time"),
        Cell::new(format!("{:.1} min", summary.total_minutes)),
    ]);
    table.add_row(vec![
        Cell::new("Average difficulty"),
        Cell::new(format!("{:.2}", summary.average_difficulty)),
    ]);
    table.add_row(vec![Cell::new("Curriculum codes"), Cell::new(codes.join(", "))]);
    table.add_row(vec![Cell::new("Item types"), Cell::new(counts(&summary.item_types))]);
    table.add_row(vec![
        Cell::new("Cognitive levels"),
        Cell::new(counts(&summary.cognitive_levels)),
    ]);
    table.add_row(vec![Cell::new("Tokens"), Cell::new(tokens.join(", "))]);
    table
}
