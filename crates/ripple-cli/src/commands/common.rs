//! Arguments and plumbing shared by the exam commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Args;
use comfy_table::{Cell, Table};

use ripple_catalog::config::{create_loader, load_config_from};
use ripple_catalog::{CatalogLoader, FileSource, RippleConfig};
use ripple_core::assembler::RelaxationLevel;
use ripple_core::model::{ExamDocument, ExamMeta, FilterSet, ItemBank, TokenCatalog};
use ripple_core::session::{ExamSession, SessionObserver};
use ripple_core::traits::ExamStore;
use ripple_store::SqliteExamStore;

/// Which item bank to work against.
#[derive(Args, Debug, Default, Clone)]
pub struct BankArgs {
    /// Item bank JSON file, bypassing the catalog
    #[arg(long, conflicts_with = "route")]
    pub bank: Option<PathBuf>,

    /// Catalog route whose bank to use
    #[arg(long)]
    pub route: Option<String>,
}

/// Filter flags; list flags take comma-separated values or repeat.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Subject the items must belong to
    #[arg(long)]
    pub subject: Option<String>,

    /// Grade level the items must target
    #[arg(long)]
    pub grade: Option<String>,

    /// Curriculum codes
    #[arg(long = "curriculum", value_delimiter = ',')]
    pub curriculum_codes: Vec<String>,

    /// Themes
    #[arg(long = "theme", value_delimiter = ',')]
    pub themes: Vec<String>,

    /// Sub-themes
    #[arg(long = "sub-theme", value_delimiter = ',')]
    pub sub_themes: Vec<String>,

    /// Item types, e.g. multiple_choice
    #[arg(long = "type", value_delimiter = ',')]
    pub item_types: Vec<String>,

    /// Difficulty levels
    #[arg(long = "difficulty", value_delimiter = ',')]
    pub difficulty_levels: Vec<i64>,

    /// Cognitive levels
    #[arg(long = "cognitive", value_delimiter = ',')]
    pub cognitive_levels: Vec<String>,

    /// Token ids
    #[arg(long = "token", value_delimiter = ',')]
    pub token_ids: Vec<String>,
}

impl FilterArgs {
    pub fn into_filters(self) -> FilterSet {
        FilterSet {
            subject: self.subject,
            grade_level: self.grade,
            curriculum_codes: self.curriculum_codes,
            themes: self.themes,
            sub_themes: self.sub_themes,
            item_types: self.item_types,
            difficulty_levels: self.difficulty_levels,
            cognitive_levels: self.cognitive_levels,
            token_ids: self.token_ids,
        }
    }
}

/// Header fields printed on the exam.
#[derive(Args, Debug, Default, Clone)]
pub struct MetaArgs {
    #[arg(long, default_value = "")]
    pub school: String,

    #[arg(long, default_value = "")]
    pub teacher: String,

    #[arg(long, default_value = "")]
    pub class: String,

    /// Date printed on the exam
    #[arg(long, default_value = "")]
    pub date: String,
}

impl MetaArgs {
    pub fn into_meta(self, subject: Option<&str>, grade_level: Option<&str>) -> ExamMeta {
        ExamMeta {
            school: self.school,
            teacher: self.teacher,
            class: self.class,
            date: self.date,
            subject: subject.unwrap_or_default().to_string(),
            grade_level: grade_level.unwrap_or_default().to_string(),
        }
    }
}

/// Prints session warnings for the user.
pub struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_partial_fill(&self, requested: usize, filled: usize) {
        eprintln!(
            "WARNING: only {filled} of {requested} slots filled; no items match the current filters"
        );
    }

    fn on_relaxed_replacement(&self, index: usize, level: RelaxationLevel) {
        eprintln!("WARNING: slot {index} replaced with {level}");
    }

    fn on_replacement_exhausted(&self, index: usize) {
        eprintln!("WARNING: no replacement for slot {index}, even with every filter relaxed");
    }

    fn on_orphans_dropped(&self, dropped: &[String]) {
        eprintln!(
            "WARNING: dropped {} slot(s) no longer in the bank: {}",
            dropped.len(),
            dropped.join(", ")
        );
    }
}

/// A bank together with the loader that produced it.
pub struct ResolvedBank {
    pub bank: Arc<ItemBank>,
    /// Manifest route, when the bank came from one.
    pub route: Option<String>,
    loader: CatalogLoader,
}

impl ResolvedBank {
    /// The token catalog next to the bank; empty when there is none.
    pub async fn tokens(&self) -> TokenCatalog {
        match self.loader.load_tokens().await {
            Ok(tokens) => (*tokens).clone(),
            Err(e) => {
                tracing::warn!("token catalog unavailable, showing raw ids: {e}");
                TokenCatalog::default()
            }
        }
    }
}

/// Loaded configuration plus the factories built from it.
pub struct Context {
    pub config: RippleConfig,
}

impl Context {
    pub fn load(config: Option<PathBuf>, db: Option<PathBuf>) -> Result<Self> {
        let mut config = load_config_from(config.as_deref())?;
        if let Some(db) = db {
            config.store.path = db;
        }
        Ok(Self { config })
    }

    pub async fn store(&self) -> Result<Arc<dyn ExamStore>> {
        let store = SqliteExamStore::open(&self.config.store.path).await?;
        Ok(Arc::new(store))
    }

    /// Resolve the bank from `--bank`, `--route`, or the exam's own route.
    pub async fn bank(&self, args: &BankArgs, fallback_route: Option<&str>) -> Result<ResolvedBank> {
        if let Some(path) = &args.bank {
            return bank_from_file(path).await;
        }
        let route = args
            .route
            .as_deref()
            .or(fallback_route)
            .context("no item bank selected: pass --bank <file> or --route <id>")?;
        let loader = self.loader()?;
        let bank = loader
            .load_bank(route)
            .await
            .with_context(|| format!("failed to load bank for route '{route}'"))?;
        Ok(ResolvedBank {
            bank,
            route: Some(route.to_string()),
            loader,
        })
    }

    /// A loader over the configured catalog.
    pub fn loader(&self) -> Result<CatalogLoader> {
        create_loader(&self.config.catalog)
    }

    /// Fetch a stored exam, failing when the id is unknown.
    pub async fn exam(&self, store: &dyn ExamStore, id: &str) -> Result<ExamDocument> {
        store
            .get(id)
            .await?
            .with_context(|| format!("no exam with id '{id}'"))
    }

    /// Open an editing session on a stored exam.
    pub async fn session(&self, id: &str, args: &BankArgs) -> Result<(ExamSession, ResolvedBank)> {
        let store = self.store().await?;
        let doc = self.exam(store.as_ref(), id).await?;
        let resolved = self.bank(args, doc.bank_route.as_deref()).await?;
        let session = ExamSession::new(resolved.bank.clone(), store, Arc::new(ConsoleObserver))
            .with_document(doc);
        Ok((session, resolved))
    }
}

async fn bank_from_file(path: &Path) -> Result<ResolvedBank> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("not a bank file: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let loader = CatalogLoader::new(Arc::new(FileSource::new(dir)));
    let bank = loader
        .load_bank_at(file_name)
        .await
        .with_context(|| format!("failed to load bank {}", path.display()))?;
    Ok(ResolvedBank {
        bank,
        route: None,
        loader,
    })
}

/// Slot table of an exam.
pub fn slot_table(doc: &ExamDocument, bank: &ItemBank) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Slot",
        "Item",
        "Locked",
        "Type",
        "Difficulty",
        "Theme",
        "Minutes",
        "Alternatives",
    ]);

    for (index, slot) in doc.items.iter().enumerate() {
        let item = bank.get(&slot.ref_id);
        let letters: Vec<&str> = slot.alternatives.iter().map(|a| a.letter.as_str()).collect();
        table.add_row(vec![
            Cell::new(index),
            Cell::new(&slot.ref_id),
            Cell::new(if slot.locked { "yes" } else { "" }),
            Cell::new(item.and_then(|i| i.item_type.as_deref()).unwrap_or("-")),
            Cell::new(
                item.and_then(|i| i.difficulty_level)
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
            Cell::new(item.and_then(|i| i.theme.as_deref()).unwrap_or("-")),
            Cell::new(
                item.map(|i| format!("{:.1}", i.estimated_minutes))
                    .unwrap_or_else(|| "-".into()),
            ),
            Cell::new(letters.join(" ")),
        ]);
    }
    table
}

/// Print the exam header and its slots.
pub fn print_exam(doc: &ExamDocument, bank: &ItemBank) {
    let title = if doc.title.is_empty() {
        "(untitled)"
    } else {
        doc.title.as_str()
    };
    println!("Exam {} {title}", doc.id);
    println!(
        "Seed {} | {}/{} slots | {} locked",
        doc.seed,
        doc.items.len(),
        doc.target_item_count,
        doc.locked_count()
    );
    if !doc.items.is_empty() {
        println!("{}", slot_table(doc, bank));
    }
}
