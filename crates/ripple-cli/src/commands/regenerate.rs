//! The `ripple regenerate` command.

use anyhow::Result;

use ripple_core::model::FilterSet;

use super::common::{print_exam, BankArgs, Context, FilterArgs};

pub async fn execute(
    ctx: &Context,
    id: &str,
    bank_args: BankArgs,
    filter_args: FilterArgs,
    clear_filters: bool,
    seed: Option<u32>,
) -> Result<()> {
    let (mut session, resolved) = ctx.session(id, &bank_args).await?;
    if let Some(route) = resolved.route {
        session.document_mut().bank_route = Some(route);
    }

    let filters = filter_args.into_filters();
    if clear_filters {
        session.document_mut().filters = FilterSet::default();
        session.regenerate(seed);
    } else if filters.is_unconstrained() {
        session.regenerate(seed);
    } else {
        // New filters keep the current seed unless one is given.
        if let Some(seed) = seed {
            session.document_mut().seed = seed;
        }
        session.apply(filters);
    }

    let saved = session.save().await?;
    print_exam(saved, &resolved.bank);
    Ok(())
}
