//! The `ripple export` and `ripple import` commands.

use std::path::PathBuf;

use anyhow::Result;

use ripple_core::export::{load_exams, save_exams};
use ripple_core::traits::ExamStore;

use super::common::Context;

pub async fn export(ctx: &Context, ids: Vec<String>, output: PathBuf) -> Result<()> {
    let store = ctx.store().await?;
    let exams = if ids.is_empty() {
        store.list().await?
    } else {
        let mut exams = Vec::with_capacity(ids.len());
        for id in &ids {
            exams.push(ctx.exam(store.as_ref(), id).await?);
        }
        exams
    };

    save_exams(&exams, &output)?;
    println!("Exported {} exam(s) to {}", exams.len(), output.display());
    Ok(())
}

pub async fn import(ctx: &Context, file: PathBuf) -> Result<()> {
    let exams = load_exams(&file)?;
    let store = ctx.store().await?;
    for exam in &exams {
        let saved = store.save(exam).await?;
        println!("Imported {} {}", saved.id, saved.title);
    }
    println!("{} exam(s) imported.", exams.len());
    Ok(())
}
