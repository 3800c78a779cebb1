//! The slot commands: `ripple replace`, `ripple lock` and `ripple shuffle`.

use anyhow::Result;

use ripple_core::assembler::Replacement;

use super::common::{print_exam, BankArgs, Context};

pub async fn replace(ctx: &Context, id: &str, slot: usize, bank_args: BankArgs) -> Result<()> {
    let (mut session, resolved) = ctx.session(id, &bank_args).await?;
    let previous = session
        .document()
        .items
        .get(slot)
        .map(|s| s.ref_id.clone());

    match session.replace(slot)? {
        Replacement::Replaced { slot: new, level } => {
            match previous {
                Some(old) if old == new.ref_id => {
                    println!("Slot {slot}: {old} is the only candidate, kept ({level})")
                }
                Some(old) => println!("Slot {slot}: {old} -> {} ({level})", new.ref_id),
                None => println!("Slot {slot}: {} ({level})", new.ref_id),
            }
            let saved = session.save().await?;
            print_exam(saved, &resolved.bank);
        }
        // Nothing changed, so nothing to save.
        Replacement::Exhausted => {}
    }
    Ok(())
}

pub async fn lock(ctx: &Context, id: &str, slot: usize, bank_args: BankArgs) -> Result<()> {
    let (mut session, _) = ctx.session(id, &bank_args).await?;
    let locked = session.toggle_lock(slot)?;
    session.save().await?;
    println!(
        "Slot {slot} {}",
        if locked { "locked" } else { "unlocked" }
    );
    Ok(())
}

pub async fn shuffle(ctx: &Context, id: &str, slot: usize, bank_args: BankArgs) -> Result<()> {
    let (mut session, _) = ctx.session(id, &bank_args).await?;
    let seed = session.shuffle_alternatives(slot)?;
    let saved = session.save().await?;
    let letters: Vec<&str> = saved.items[slot]
        .alternatives
        .iter()
        .map(|a| a.letter.as_str())
        .collect();
    println!("Slot {slot} alternatives: {} (seed {seed})", letters.join(" "));
    Ok(())
}
