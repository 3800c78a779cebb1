//! The `ripple generate` command.

use std::sync::Arc;

use anyhow::Result;

use ripple_core::session::ExamSession;

use super::common::{print_exam, BankArgs, ConsoleObserver, Context, FilterArgs, MetaArgs};

pub async fn execute(
    ctx: &Context,
    bank_args: BankArgs,
    filter_args: FilterArgs,
    meta: MetaArgs,
    title: String,
    count: Option<usize>,
    seed: Option<u32>,
) -> Result<()> {
    let resolved = ctx.bank(&bank_args, None).await?;
    let store = ctx.store().await?;
    let mut session = ExamSession::new(resolved.bank.clone(), store, Arc::new(ConsoleObserver));

    let filters = filter_args.into_filters();
    let bank_meta = &resolved.bank.meta;
    {
        let doc = session.document_mut();
        doc.title = title;
        doc.target_item_count = count.unwrap_or(ctx.config.default_item_count);
        doc.bank_route = resolved.route.clone();
        doc.meta = meta.into_meta(
            filters.subject.as_deref().or(bank_meta.subject.as_deref()),
            filters.grade_level.as_deref().or(bank_meta.grade_level.as_deref()),
        );
        if let Some(seed) = seed {
            doc.seed = seed;
        }
    }

    let assembly = session.apply(filters);
    if assembly.reused > 0 {
        eprintln!(
            "WARNING: {} slot(s) repeat an item; the filtered pool has only {} item(s)",
            assembly.reused, assembly.pool_size
        );
    }

    let saved = session.save().await?;
    print_exam(saved, &resolved.bank);
    println!("\nSaved exam {}", saved.id);
    Ok(())
}
