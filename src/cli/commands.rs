//! Command execution

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, info, instrument};

use crate::application::services::{layout, DocumentListener, DocumentStore, PositionedNode};
use crate::cli::args::{Cli, Commands, ConfigCommands, DocumentArgs, LayoutFormat};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::walker::default_root;
use crate::domain::{TopicId, TopicNode, TopicTreeConvert};
use crate::infrastructure::{load_document, load_script, MonospaceMeasure};

/// Logs store notifications; the CLI has no selection state of its own.
struct TraceListener;

impl DocumentListener for TraceListener {
    fn on_change(&mut self, root: &TopicNode) {
        debug!(root = %root.id, topics = root.size(), "document changed");
    }

    fn on_select(&mut self, id: &TopicId) {
        debug!(topic = %id, "select");
    }
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    match &cli.command {
        Some(Commands::Outline(document)) => outline(document, &settings),
        Some(Commands::Layout { document, format }) => layout_cmd(document, *format, &settings),
        Some(Commands::Config { command }) => config_cmd(command, &settings),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "mindmap", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `mindmap --help`".to_string(),
        )),
    }
}

/// Build the store for a command: load or create the document, then replay
/// the script, if any.
#[instrument(skip(settings))]
pub fn open_store(document: &DocumentArgs, settings: &Settings) -> CliResult<DocumentStore> {
    let root = match &document.doc {
        Some(path) => load_document(path)?,
        None => default_root(settings.editor.root_title.clone()),
    };
    let mut store = DocumentStore::new(root)
        .with_listener(TraceListener)
        .with_readonly(settings.editor.readonly || document.readonly);

    if let Some(path) = &document.script {
        let script = load_script(path)?;
        let steps = script.replay(&mut store)?;
        info!(steps, cursor = store.cursor(), "script replayed");
        if store.is_readonly() && steps > 0 {
            output::warning("document is readonly, script steps were ignored");
        }
    }
    Ok(store)
}

#[instrument(skip(settings))]
fn outline(document: &DocumentArgs, settings: &Settings) -> CliResult<()> {
    let store = open_store(document, settings)?;
    output::info(store.current().to_tree_string());
    output::detail(format!(
        "history {}/{}",
        store.cursor() + 1,
        store.timeline_len()
    ));
    Ok(())
}

#[instrument(skip(settings))]
fn layout_cmd(document: &DocumentArgs, format: LayoutFormat, settings: &Settings) -> CliResult<()> {
    let store = open_store(document, settings)?;
    let measure = MonospaceMeasure::from(&settings.measure);
    let positioned = layout(store.current(), &measure, &settings.layout);
    match format {
        LayoutFormat::Tree => output::info(positioned.to_tree_string()),
        LayoutFormat::Table => print_table(&positioned),
    }
    Ok(())
}

fn print_table(root: &PositionedNode) {
    output::header(format!(
        "{:<32} {:>6} {:>9} {:>9} {:>8} {:>8}",
        "topic", "side", "x", "y", "width", "height"
    ));
    for node in root.iter() {
        let title = format!("{}{}", "  ".repeat(node.depth), node.title);
        let side = node.side.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
        output::info(format!(
            "{:<32} {:>6} {:>9.1} {:>9.1} {:>8.1} {:>8.1}",
            title, side, node.x, node.y, node.width, node.height
        ));
    }
}

fn config_cmd(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(settings.to_toml()?),
        ConfigCommands::Template => output::info(Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::action("global", &path.display()),
            None => output::warning("no config directory for this platform"),
        },
    }
    Ok(())
}
