//! Command-line interface
//!
//! Supports:
//! - Expanding a `#token` (or inserting a named shortcut) in a piece of text
//! - Replaying JSONL trigger messages against a text field
//! - Managing the shortcut library and its settings
//! - Backup export and import

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, instrument};

use crate::config::{SettingsPatch, StorageTier, DEFAULT_DATA_DIR};
use crate::dom::{Document, NodeId};
use crate::expander::Expander;
use crate::logging;
use crate::messages::{read_messages, Response, TriggerMessage};
use crate::page::Page;
use crate::shortcuts::{
    export_backup, filter_shortcuts, merge_import, normalize_name, parse_backup, parse_tags,
    preview_text, remove_shortcut, toggle_favorite, upsert_shortcut, ShortcutDraft,
};
use crate::storage::{ShortcutSource, StorageBackends};
use crate::template::{ClipboardReader, FixedClipboard, SystemClipboard};

/// Expand #shortcuts into saved prompt templates
#[derive(Parser, Debug)]
#[command(name = "prompt-hash", version, about = "Expand #shortcuts into saved prompt templates")]
pub struct CliArgs {
    /// Directory holding local.json, sync.json and logs
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<String>,

    /// Run without the synced storage tier
    #[arg(long, global = true)]
    pub local_only: bool,

    /// Only warnings and errors on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Expand the #token before the cursor and print the result
    Expand(PageArgs),
    /// Insert a named shortcut at the cursor and print the result
    Insert {
        name: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Apply JSONL trigger messages from stdin, printing each response
    Replay(PageArgs),
    /// List shortcuts
    List {
        /// Case-insensitive filter on name, template and tags
        query: Option<String>,
        #[arg(long)]
        favorites: bool,
    },
    /// Create or update a shortcut
    Add {
        name: String,
        template: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        /// Existing shortcut this one replaces
        #[arg(long, value_name = "OLD_NAME")]
        rename: Option<String>,
    },
    Remove { name: String },
    /// Toggle the favorite flag
    Favorite { name: String },
    /// Write a backup of shortcuts and settings
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge a backup file into the library
    Import {
        path: PathBuf,
        /// Replace shortcuts that already exist
        #[arg(long)]
        overwrite: bool,
    },
    /// Show settings, updating any given
    Settings(SettingsArgs),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Expand(_) => "expand",
            Command::Insert { .. } => "insert",
            Command::Replay(_) => "replay",
            Command::List { .. } => "list",
            Command::Add { .. } => "add",
            Command::Remove { .. } => "remove",
            Command::Favorite { .. } => "favorite",
            Command::Export { .. } => "export",
            Command::Import { .. } => "import",
            Command::Settings(_) => "settings",
        }
    }
}

/// A text field to expand into
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    #[arg(long, default_value = "")]
    pub text: String,
    /// Caret offset in characters (end of text if omitted)
    #[arg(long)]
    pub cursor: Option<usize>,
    /// Page URL, for {url} and site detection
    #[arg(long, default_value = "about:blank")]
    pub url: String,
    /// Page title, for {title}
    #[arg(long, default_value = "")]
    pub title: String,
    /// Treat the clipboard as unreadable
    #[arg(long)]
    pub no_clipboard: bool,
}

impl PageArgs {
    /// A page with one focused textarea holding the text
    fn build(&self) -> (Page, NodeId) {
        let mut doc = Document::new();
        let field = doc.append_element(doc.body(), "textarea");
        if let Some(control) = doc.control_mut(field) {
            control.set_value(&self.text);
            let caret = self.cursor.unwrap_or_else(|| self.text.chars().count());
            control.set_selection_range(caret, caret);
        }
        let mut page = Page::new(doc, &self.url, &self.title);
        page.focus(field);
        (page, field)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    #[arg(long, value_name = "BOOL")]
    pub auto_expand_on_space: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    pub auto_focus_target: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    pub auto_send: Option<bool>,
    /// local or sync
    #[arg(long, value_name = "AREA")]
    pub storage_area: Option<StorageTier>,
}

impl SettingsArgs {
    fn patch(&self) -> SettingsPatch {
        SettingsPatch {
            auto_expand_on_space: self.auto_expand_on_space,
            auto_focus_target: self.auto_focus_target,
            auto_send: self.auto_send,
            storage_area: self.storage_area,
        }
    }
}

impl CliArgs {
    /// Data directory with `~` expanded
    pub fn data_dir(&self) -> PathBuf {
        let raw = self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR);
        PathBuf::from(shellexpand::tilde(raw).as_ref())
    }
}

/// Parse arguments, set up logging and run the command
pub fn main_entry() -> Result<()> {
    let args = CliArgs::parse();
    let data_dir = args.data_dir();
    let _guard = logging::init(&data_dir, args.quiet);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    run(args, stdin.lock(), &mut stdout)
}

/// Run one command against the data directory
#[instrument(skip_all, fields(command = args.command.name()))]
pub fn run<R: BufRead, W: Write>(args: CliArgs, input: R, out: &mut W) -> Result<()> {
    let started = Instant::now();
    let command = args.command.name();
    let result = execute(args, input, out);
    logging::log_command(
        command,
        result.is_ok(),
        started.elapsed().as_millis() as u64,
    );
    result
}

fn execute<R: BufRead, W: Write>(args: CliArgs, input: R, out: &mut W) -> Result<()> {
    let data_dir = args.data_dir();
    let backends = StorageBackends::open_dir(&data_dir, !args.local_only);
    let seeded = backends
        .ensure_defaults()
        .with_context(|| format!("Failed to initialise storage in {}", data_dir.display()))?;
    if seeded {
        debug!(data_dir = %data_dir.display(), "Seeded default library");
    }

    match args.command {
        Command::Expand(page) => {
            let message = TriggerMessage::ExpandShortcode {
                trigger: Some("cli".to_string()),
            };
            expand_text(&backends, &page, &message, out)
        }
        Command::Insert { name, page } => {
            expand_text(&backends, &page, &TriggerMessage::InsertShortcut { name }, out)
        }
        Command::Replay(page) => replay(&backends, &page, input, out),
        Command::List { query, favorites } => {
            let shortcuts = backends.shortcut_list()?;
            for shortcut in filter_shortcuts(&shortcuts, query.as_deref().unwrap_or_default())
                .into_iter()
                .filter(|shortcut| !favorites || shortcut.favorite)
            {
                let star = if shortcut.favorite { "*" } else { " " };
                write!(out, "{} {:<14} {}", star, shortcut.name, preview_text(&shortcut.template))?;
                if !shortcut.tags.is_empty() {
                    write!(out, "  [{}]", shortcut.tags.join(", "))?;
                }
                writeln!(out)?;
            }
            Ok(())
        }
        Command::Add {
            name,
            template,
            tags,
            rename,
        } => {
            let mut shortcuts = backends.shortcut_list()?;
            let draft = ShortcutDraft {
                name,
                template,
                tags: parse_tags(&tags),
            };
            let editing = rename.as_deref().map(normalize_name);
            let saved = upsert_shortcut(&mut shortcuts, draft, editing.as_deref())?;
            backends.save_shortcuts(&shortcuts).context("Failed to save shortcuts")?;
            writeln!(out, "Saved {}", saved.name)?;
            Ok(())
        }
        Command::Remove { name } => {
            let name = normalize_name(&name);
            let mut shortcuts = backends.shortcut_list()?;
            if !remove_shortcut(&mut shortcuts, &name) {
                bail!("No shortcut found for {name}.");
            }
            backends.save_shortcuts(&shortcuts).context("Failed to save shortcuts")?;
            writeln!(out, "Removed {name}")?;
            Ok(())
        }
        Command::Favorite { name } => {
            let name = normalize_name(&name);
            let mut shortcuts = backends.shortcut_list()?;
            let Some(favorite) = toggle_favorite(&mut shortcuts, &name) else {
                bail!("No shortcut found for {name}.");
            };
            backends.save_shortcuts(&shortcuts).context("Failed to save shortcuts")?;
            let state = if favorite { "Favorited" } else { "Unfavorited" };
            writeln!(out, "{state} {name}")?;
            Ok(())
        }
        Command::Export { output } => {
            let data = backends.load_data()?;
            let json = export_backup(&data.shortcuts, data.settings)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, format!("{json}\n"))
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    writeln!(out, "Exported {} shortcuts to {}", data.shortcuts.len(), path.display())?;
                }
                None => writeln!(out, "{json}")?,
            }
            Ok(())
        }
        Command::Import { path, overwrite } => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let incoming = parse_backup(&json)?;
            let data = backends.load_data()?;
            let outcome = merge_import(&data.shortcuts, data.settings, &incoming, overwrite)?;
            backends
                .update_settings(&outcome.settings)
                .context("Failed to save settings")?;
            backends
                .save_shortcuts(&outcome.shortcuts)
                .context("Failed to save shortcuts")?;
            writeln!(
                out,
                "Imported {} shortcuts ({} replaced)",
                outcome.imported, outcome.conflicts
            )?;
            Ok(())
        }
        Command::Settings(update) => {
            let current = backends.settings()?;
            let patch = update.patch();
            let settings = current.merged(&patch);
            if patch != SettingsPatch::default() {
                backends
                    .update_settings(&settings)
                    .context("Failed to save settings")?;
            }
            writeln!(out, "{}", serde_json::to_string_pretty(&settings)?)?;
            Ok(())
        }
    }
}

fn expand_text<W: Write>(
    backends: &StorageBackends,
    page_args: &PageArgs,
    message: &TriggerMessage,
    out: &mut W,
) -> Result<()> {
    let system = SystemClipboard;
    let denied = FixedClipboard(None);
    let clipboard: &dyn ClipboardReader = if page_args.no_clipboard {
        &denied
    } else {
        &system
    };

    let (mut page, field) = page_args.build();
    let mut expander = Expander::new(backends, clipboard);
    let response = expander.handle(&mut page, message);
    if let Some(error) = response.error {
        bail!(error);
    }
    writeln!(out, "{}", field_value(&page, field))?;
    Ok(())
}

fn replay<R: BufRead, W: Write>(
    backends: &StorageBackends,
    page_args: &PageArgs,
    input: R,
    out: &mut W,
) -> Result<()> {
    let denied = FixedClipboard(None);
    let system = SystemClipboard;
    let clipboard: &dyn ClipboardReader = if page_args.no_clipboard {
        &denied
    } else {
        &system
    };

    let (mut page, field) = page_args.build();
    let mut expander = Expander::new(backends, clipboard);
    for message in read_messages(input) {
        let response: Response = expander.handle(&mut page, &message);
        writeln!(out, "{}", serde_json::to_string(&response)?)?;
    }
    writeln!(out, "{}", field_value(&page, field))?;
    Ok(())
}

fn field_value(page: &Page, field: NodeId) -> &str {
    page.document
        .control(field)
        .map(|control| control.value())
        .unwrap_or_default()
}
