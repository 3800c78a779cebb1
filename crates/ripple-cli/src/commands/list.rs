//! The `ripple list` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use ripple_core::traits::ExamStore;

use super::common::Context;

pub async fn execute(ctx: &Context) -> Result<()> {
    let store = ctx.store().await?;
    let exams = store.list().await?;

    if exams.is_empty() {
        println!("No exams saved.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Title", "Route", "Items", "Locked", "Updated"]);
    for exam in &exams {
        table.add_row(vec![
            Cell::new(&exam.id),
            Cell::new(&exam.title),
            Cell::new(exam.bank_route.as_deref().unwrap_or("-")),
            Cell::new(format!("{}/{}", exam.items.len(), exam.target_item_count)),
            Cell::new(exam.locked_count()),
            Cell::new(
                exam.updated_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
        ]);
    }
    println!("{table}");
    println!("{} exam(s)", exams.len());
    Ok(())
}
