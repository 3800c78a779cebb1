//! The `ripple validate` command.

use anyhow::Result;

use ripple_core::validate::validate_bank;

use super::common::{BankArgs, Context};

pub async fn execute(ctx: &Context, bank_args: BankArgs) -> Result<()> {
    let resolved = ctx.bank(&bank_args, None).await?;
    let bank = &resolved.bank;

    let version = bank.meta.content_version.as_deref().unwrap_or("unversioned");
    println!("Item bank: {} items ({version})", bank.len());

    let warnings = validate_bank(bank);
    for w in &warnings {
        let prefix = w
            .item_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Item bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
