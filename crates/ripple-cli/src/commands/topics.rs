//! The `ripple topics` command.

use anyhow::{Context as _, Result};
use comfy_table::Table;

use super::common::Context;

pub async fn execute(ctx: &Context, route: &str) -> Result<()> {
    let loader = ctx.loader()?;
    let Some(topics) = loader
        .load_topics(route)
        .await
        .with_context(|| format!("failed to load topics for route '{route}'"))?
    else {
        println!("Route {route} has no topic catalog.");
        return Ok(());
    };

    let mut table = Table::new();
    table.set_header(vec!["Topic", "Label"]);
    for topic in &topics.topics {
        table.add_row(vec![topic.id.as_str(), topic.label.as_str()]);
    }
    println!("{table}");
    println!("{} topic(s)", topics.topics.len());
    Ok(())
}
