//! # Widget Canvas CLI
//!
//! Command-line host for the widget document engine.
//!
//! ## Usage
//!
//! ```bash
//! widget-canvas new morning --template greeting
//! widget-canvas apply morning actions.json --dry-run
//! widget-canvas inspect morning
//! widget-canvas tokens morning
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Data directory, editor config file and verbosity
//! - `FileStorage` - JSON-file implementation of `WidgetStorage`
//! - `run` - Executes one `Command` against the storage

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod storage;

pub use storage::FileStorage;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use widget_core::{
    Action, CanvasSize, Document, DocumentStore, EditorConfig, Element, Template, WidgetStorage,
};

/// Command-line arguments for widget-canvas.
#[derive(Debug, Clone, Parser)]
#[command(name = "widget-canvas")]
#[command(about = "Create, edit and inspect canvas widgets")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding one JSON file per widget
    #[arg(long, env = "WIDGET_DATA_DIR", default_value = "widgets", global = true)]
    pub data_dir: PathBuf,

    /// Editor configuration file (JSON)
    #[arg(long, env = "WIDGET_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log engine decisions at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a widget from a template
    New {
        /// Widget name
        name: String,
        /// blank, digital-clock, analog-clock or greeting
        #[arg(long, default_value_t = Template::Blank)]
        template: Template,
        /// Canvas width (defaults to the configured canvas size)
        #[arg(long)]
        width: Option<f32>,
        /// Canvas height (defaults to the configured canvas size)
        #[arg(long)]
        height: Option<f32>,
        /// Overwrite an existing widget
        #[arg(long)]
        force: bool,
    },
    /// Replay a JSON array of actions against a widget
    Apply {
        /// Widget name
        name: String,
        /// File holding the actions
        actions: PathBuf,
        /// Report the outcome without saving
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a widget's paint list
    Inspect {
        /// Widget name
        name: String,
    },
    /// List the data-binding tokens a widget uses
    Tokens {
        /// Widget name
        name: String,
    },
    /// List stored widgets
    List,
    /// Delete a stored widget
    Delete {
        /// Widget name
        name: String,
    },
}

/// Host configuration derived from the command line.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Widget storage directory.
    pub data_dir: PathBuf,
    /// Optional editor configuration file.
    pub config_path: Option<PathBuf>,
    /// Verbose logging.
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("widgets"),
            config_path: None,
            verbose: false,
        }
    }
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            data_dir: args.data_dir,
            config_path: args.config,
            verbose: args.verbose,
        }
    }
}

impl CliConfig {
    /// Load the editor configuration, or the defaults when no file is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn editor_config(&self) -> anyhow::Result<EditorConfig> {
        let Some(path) = &self.config_path else {
            return Ok(EditorConfig::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = EditorConfig::from_json(&json)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Open the widget storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn storage(&self) -> anyhow::Result<FileStorage> {
        FileStorage::open(&self.data_dir).with_context(|| {
            format!("Failed to open data directory {}", self.data_dir.display())
        })
    }
}

/// Outcome of replaying a batch of actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplySummary {
    /// Actions dispatched.
    pub dispatched: usize,
    /// Actions that recorded a history entry.
    pub recorded: usize,
    /// Elements created.
    pub created: usize,
    /// Elements removed.
    pub removed: usize,
}

/// Dispatch every action in order.
pub fn apply_actions(store: &mut DocumentStore, actions: Vec<Action>) -> ApplySummary {
    let mut summary = ApplySummary::default();
    for action in actions {
        let change = store.dispatch(action);
        summary.dispatched += 1;
        summary.recorded += usize::from(change.recorded);
        summary.created += change.created.len();
        summary.removed += change.removed.len();
    }
    summary
}

/// Execute one command, writing human-readable output to `out`.
///
/// # Errors
///
/// Returns an error if storage, configuration or input files fail.
pub fn run(config: &CliConfig, command: Command, out: &mut dyn Write) -> anyhow::Result<()> {
    let storage = config.storage()?;
    match command {
        Command::New {
            name,
            template,
            width,
            height,
            force,
        } => {
            let editor = config.editor_config()?;
            let size = CanvasSize::new(
                width.unwrap_or(editor.canvas_size.width),
                height.unwrap_or(editor.canvas_size.height),
            );
            if !size.is_valid() {
                bail!("Canvas size must be positive, got {}x{}", size.width, size.height);
            }
            if storage.contains(&name) && !force {
                bail!("Widget {name} already exists (use --force to overwrite)");
            }
            let widget = template.build(size);
            storage.save(&name, &widget)?;
            tracing::info!("Created widget {name} from template {template}");
            writeln!(
                out,
                "Created {name} ({template}, {}x{}, {} elements)",
                size.width,
                size.height,
                widget.elements.len()
            )?;
        }
        Command::Apply {
            name,
            actions: actions_path,
            dry_run,
        } => {
            let editor = config.editor_config()?;
            let widget = storage.load(&name)?;
            let mut store = DocumentStore::from_widget(widget, editor)
                .with_context(|| format!("Stored widget {name} is invalid"))?;
            let json = std::fs::read_to_string(&actions_path)
                .with_context(|| format!("Failed to read {}", actions_path.display()))?;
            let actions: Vec<Action> = serde_json::from_str(&json)
                .with_context(|| format!("Invalid action list in {}", actions_path.display()))?;

            let summary = apply_actions(&mut store, actions);
            if dry_run {
                writeln!(out, "Dry run, {name} not saved")?;
            } else {
                storage.save(&name, &store.to_widget())?;
            }
            writeln!(
                out,
                "Applied {} actions ({} recorded): +{} -{} elements",
                summary.dispatched, summary.recorded, summary.created, summary.removed
            )?;
        }
        Command::Inspect { name } => {
            let document = load_document(&storage, &name)?;
            write_inspection(out, &name, &document)?;
        }
        Command::Tokens { name } => {
            let document = load_document(&storage, &name)?;
            let tokens = document.binding_tokens();
            if tokens.is_empty() {
                writeln!(out, "{name} uses no binding tokens")?;
            }
            for (id, token) in tokens {
                writeln!(out, "{id}  {{{}}}", token.path())?;
            }
        }
        Command::List => {
            for name in storage.list()? {
                writeln!(out, "{name}")?;
            }
        }
        Command::Delete { name } => {
            storage.delete(&name)?;
            tracing::info!("Deleted widget {name}");
            writeln!(out, "Deleted {name}")?;
        }
    }
    Ok(())
}

fn load_document(storage: &FileStorage, name: &str) -> anyhow::Result<Document> {
    let widget = storage.load(name)?;
    widget
        .into_document()
        .with_context(|| format!("Stored widget {name} is invalid"))
}

fn write_element(out: &mut dyn Write, prefix: &str, element: &Element) -> std::io::Result<()> {
    let t = &element.transform;
    let mut flags = String::new();
    if element.locked {
        flags.push_str(" locked");
    }
    if !element.visible {
        flags.push_str(" hidden");
    }
    writeln!(
        out,
        "{prefix}{:<13} {:<16} ({}, {}) {}x{}{flags}  {}",
        element.element_type().label(),
        element.name,
        t.x,
        t.y,
        t.width,
        t.height,
        element.id
    )
}

fn write_inspection(out: &mut dyn Write, name: &str, document: &Document) -> std::io::Result<()> {
    let size = document.canvas_size();
    writeln!(
        out,
        "{name}: {}x{} canvas, {} elements ({} top-level)",
        size.width,
        size.height,
        document.element_count(),
        document.element_order().len()
    )?;
    for (index, element) in document.top_level_elements().enumerate() {
        write_element(out, &format!("{index:>3} "), element)?;
        for child in element
            .kind
            .children()
            .iter()
            .filter_map(|id| document.element(*id))
        {
            write_element(out, "      - ", child)?;
        }
    }
    let targets = document.refresh_targets();
    if !targets.is_empty() {
        writeln!(out, "refresh:")?;
        for target in targets {
            writeln!(
                out,
                "    {} {:?} every {}s",
                target.id, target.kind, target.interval_sec
            )?;
        }
    }
    Ok(())
}
