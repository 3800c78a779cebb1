//! The `ripple delete` command.

use anyhow::Result;

use ripple_core::traits::ExamStore;

use super::common::Context;

pub async fn execute(ctx: &Context, id: &str) -> Result<()> {
    let store = ctx.store().await?;
    store.delete(id).await?;
    println!("Deleted exam {id}");
    Ok(())
}
