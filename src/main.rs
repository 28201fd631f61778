// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowpage CLI entrypoint.
//!
//! Inspects recovery folders, prints the settings JSON schema and runs a scripted editing demo
//! through the command dispatcher.

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use flowpage::app::ApplicationStore;
use flowpage::commands::{AppCommand, PageCommand, PageOp, SelectionMode};
use flowpage::logging::{self, Profile};
use flowpage::model::{DiagramObject, LineEnd, ObjectId, Page, PageId, Point};
use flowpage::settings::{AppSettings, PublisherKind};
use flowpage::store::{FolderRecoveryStore, PageRecoveryBank, RecoveryEntry};

#[derive(Debug, Parser)]
#[command(name = "flowpage")]
#[command(about = "Attack flow page editing core", long_about = None)]
struct Cli {
    /// Log filter directive (for example `flowpage=debug`); overrides FLOWPAGE_LOG.
    #[arg(long, global = true, value_parser = logging::parse_directive)]
    log_level: Option<String>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect or discard recovered pages
    Recovery(RecoveryArgs),
    /// Print the JSON schema of the settings file
    SettingsSchema,
    /// Run a scripted editing session and print the published page
    Demo(DemoArgs),
}

#[derive(Debug, Args)]
struct RecoveryArgs {
    #[command(subcommand)]
    command: RecoveryCommand,
}

#[derive(Debug, Subcommand)]
enum RecoveryCommand {
    /// List recovered pages, most recent first
    List {
        #[arg(long)]
        dir: PathBuf,
    },
    /// Print one recovered page as JSON
    Show {
        #[arg(long)]
        dir: PathBuf,
        page_id: String,
    },
    /// Remove recovered pages
    Discard {
        #[arg(long)]
        dir: PathBuf,
        /// Page to discard; all pages when omitted
        page_id: Option<String>,
    },
}

#[derive(Debug, Args)]
struct DemoArgs {
    /// Store recovery snapshots in this folder instead of memory
    #[arg(long)]
    recovery_dir: Option<PathBuf>,

    /// Settings file to start from
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let profile = match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    };
    logging::init_with_directive(profile, cli.log_level.as_deref());

    let result = match cli.command {
        Commands::Recovery(args) => run_recovery(args.command),
        Commands::SettingsSchema => run_settings_schema(),
        Commands::Demo(args) => run_demo(args),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn recovery_bank(dir: PathBuf) -> PageRecoveryBank {
    PageRecoveryBank::new(Box::new(FolderRecoveryStore::new(dir)))
}

fn run_recovery(command: RecoveryCommand) -> Result<(), Box<dyn Error>> {
    match command {
        RecoveryCommand::List { dir } => {
            let bank = recovery_bank(dir);
            let entries = bank.entries()?;
            if entries.is_empty() {
                println!("no recovered pages");
            }
            for entry in entries {
                println!(
                    "{}\t{}\t{} objects\tsaved_at_ms={}",
                    entry.page_id(),
                    entry.name(),
                    entry.page().len(),
                    entry.saved_at_ms()
                );
            }
        }
        RecoveryCommand::Show { dir, page_id } => {
            let page_id = PageId::new(page_id)?;
            let bank = recovery_bank(dir);
            let Some(entry) = bank.entry(&page_id)? else {
                return Err(format!("no recovered page {page_id}").into());
            };
            let json = serde_json::to_string_pretty(&flowpage::store::page_to_record(entry.page()))?;
            println!("{json}");
        }
        RecoveryCommand::Discard { dir, page_id } => {
            let mut bank = recovery_bank(dir);
            match page_id {
                Some(page_id) => {
                    let page_id = PageId::new(page_id)?;
                    match bank.withdraw(&page_id)? {
                        Some(entry) => println!("discarded {}", entry.page_id()),
                        None => return Err(format!("no recovered page {page_id}").into()),
                    }
                }
                None => {
                    bank.clear()?;
                    println!("discarded all recovered pages");
                }
            }
        }
    }
    Ok(())
}

fn run_settings_schema() -> Result<(), Box<dyn Error>> {
    println!("{}", AppSettings::schema_json()?);
    Ok(())
}

fn run_demo(args: DemoArgs) -> Result<(), Box<dyn Error>> {
    let mut settings = match &args.settings {
        Some(path) => AppSettings::load(path)?,
        None => AppSettings::default(),
    };
    settings.publisher = PublisherKind::Json;
    if let Some(dir) = args.recovery_dir {
        settings.recovery.enabled = true;
        settings.recovery.directory = Some(dir);
    }

    let mut store = ApplicationStore::new(settings);
    let editor = store.new_editor(demo_page()?);
    store.execute(AppCommand::load_page(editor))?;

    let page_id = store.active_page().page_id().clone();
    let command = |op| PageCommand::new(page_id.clone(), op);

    store.execute(command(PageOp::AddObjects {
        parent: None,
        objects: vec![DiagramObject::block(ObjectId::new("b:exfil")?, "action")
            .with_position(Point::new(400, 0))
            .with_property("name", "Exfiltration")],
        select: false,
    }))?;
    store.execute(command(PageOp::ConnectLine {
        line_id: ObjectId::new("l:2")?,
        end: LineEnd::Target,
        object_id: Some(ObjectId::new("b:exfil")?),
    }))?;
    store.execute(command(PageOp::SelectObjects {
        object_ids: vec![ObjectId::new("b:exfil")?],
        mode: SelectionMode::Replace,
    }))?;
    store.execute(AppCommand::CopySelection)?;
    let paste = store.paste_command();
    store.execute(paste)?;
    store.undo();
    store.redo();
    // Dropped by the dispatcher.
    store.execute(PageCommand::null(PageOp::SelectAll))?;

    info!(
        rev = store.active_page().rev(),
        undo_depth = store.active_page().history().undo_len(),
        snapshots = store.recovery_bank().write_count(),
        "demo finished"
    );

    println!(
        "page {}: {} objects, {} selected, undo={} redo={}",
        store.active_page().page_id(),
        store.active_page().page().len(),
        store.selection_count(),
        store.can_undo(),
        store.can_redo()
    );
    for error in store.validation_errors() {
        println!("{error}");
    }
    for warning in store.validation_warnings() {
        println!("{warning}");
    }
    for entry in store.recovery_bank().entries()? {
        print_entry(&entry);
    }
    if let Some(document) = store.publish_active_page()? {
        println!("{document}");
    }
    Ok(())
}

fn print_entry(entry: &RecoveryEntry) {
    println!(
        "recovery snapshot {} ({} objects)",
        entry.page_id(),
        entry.page().len()
    );
}

fn demo_page() -> Result<Page, Box<dyn Error>> {
    let mut page = Page::new(PageId::new("p:demo")?, "Phishing campaign");
    let recon = ObjectId::new("b:recon")?;
    let phish = ObjectId::new("b:phish")?;

    page.insert(
        DiagramObject::block(recon.clone(), "action")
            .with_property("name", "Reconnaissance")
            .with_property("technique_id", "T1595"),
        None,
    )?;
    page.insert(
        DiagramObject::block(phish.clone(), "action")
            .with_position(Point::new(200, 0))
            .with_property("name", "Spearphishing attachment")
            .with_property("technique_id", "T1566.001"),
        None,
    )?;
    page.insert(
        DiagramObject::line(ObjectId::new("l:1")?, "flow", Some(recon), Some(phish.clone())),
        None,
    )?;
    page.insert(
        DiagramObject::line(ObjectId::new("l:2")?, "flow", Some(phish), None),
        None,
    )?;
    Ok(page)
}
