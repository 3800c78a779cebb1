//! The `ripple options` command.

use std::collections::BTreeSet;
use std::fmt::Display;

use anyhow::Result;
use comfy_table::Table;

use ripple_core::filter::FilterOptions;

use super::common::{BankArgs, Context};

pub async fn execute(ctx: &Context, bank_args: BankArgs) -> Result<()> {
    let resolved = ctx.bank(&bank_args, None).await?;
    let options = FilterOptions::from_items(&resolved.bank.items);

    let mut table = Table::new();
    table.set_header(vec!["Filter", "Values"]);
    table.add_row(vec!["--subject".to_string(), joined(&options.subjects)]);
    table.add_row(vec!["--grade".to_string(), joined(&options.grade_levels)]);
    table.add_row(vec!["--curriculum".to_string(), joined(&options.curriculum_codes)]);
    table.add_row(vec!["--theme".to_string(), joined(&options.themes)]);
    table.add_row(vec!["--sub-theme".to_string(), joined(&options.sub_themes)]);
    table.add_row(vec!["--type".to_string(), joined(&options.item_types)]);
    table.add_row(vec!["--difficulty".to_string(), joined(&options.difficulty_levels)]);
    table.add_row(vec!["--cognitive".to_string(), joined(&options.cognitive_levels)]);
    table.add_row(vec!["--token".to_string(), joined(&options.token_ids)]);

    println!("{table}");
    Ok(())
}

fn joined<T: Display>(values: &BTreeSet<T>) -> String {
    if values.is_empty() {
        return "-".to_string();
    }
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
