//! The `ripple show` command.

use anyhow::{Context as _, Result};

use super::common::{print_exam, BankArgs, Context};

pub async fn execute(ctx: &Context, id: &str, bank_args: BankArgs, json: bool) -> Result<()> {
    if json {
        let store = ctx.store().await?;
        let doc = ctx.exam(store.as_ref(), id).await?;
        let out = serde_json::to_string_pretty(&doc).context("failed to serialize exam")?;
        println!("{out}");
        return Ok(());
    }

    let (session, resolved) = ctx.session(id, &bank_args).await?;
    print_exam(session.document(), &resolved.bank);
    Ok(())
}
