//! Command-line access to the CLUE document core.
//!
//! # Responsibility
//! - Inspect section metadata and registered tile kinds.
//! - Validate saved document JSON and import it into a local database.

use clap::{Parser, Subcommand};
use clue_core::{
    describe, init_logging, open_db, section_type_from_path, DocumentService, SectionType,
    ServiceError, SqliteDocumentRepository, TileRegistry,
};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "clue", version, about = "CLUE document and tile tools")]
struct Cli {
    /// trace|debug|info|warn|error
    #[arg(long, default_value_t = clue_core::default_log_level().to_string())]
    log_level: String,

    /// Absolute directory for rolling log files; logging stays off when unset.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every curriculum section with its title and abbreviation.
    Sections,
    /// List registered tile kinds.
    Kinds,
    /// Decode a document JSON file and print one line per tile.
    Inspect { file: PathBuf },
    /// Decode a document JSON file and store it in a database.
    Import {
        file: PathBuf,
        #[arg(long)]
        db: PathBuf,
    },
}

#[derive(Debug)]
enum CliError {
    Logging(clue_core::LoggingError),
    Read { path: PathBuf, source: std::io::Error },
    Document(clue_core::DocumentError),
    Db(clue_core::DbError),
    Service(ServiceError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Read { path, source } => write!(f, "cannot read `{}`: {source}", path.display()),
            Self::Document(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Read { source, .. } => Some(source),
            Self::Document(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Service(err) => Some(err),
        }
    }
}

impl From<clue_core::LoggingError> for CliError {
    fn from(value: clue_core::LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<clue_core::DocumentError> for CliError {
    fn from(value: clue_core::DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<clue_core::DbError> for CliError {
    fn from(value: clue_core::DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = &cli.log_dir {
        init_logging(&cli.log_level, &log_dir.to_string_lossy())?;
    }

    let registry = Arc::new(TileRegistry::with_builtin_tiles());
    match cli.command {
        Command::Sections => print_sections(),
        Command::Kinds => {
            for kind in registry.kinds() {
                println!("{kind}");
            }
        }
        Command::Inspect { file } => inspect(&file, &registry)?,
        Command::Import { file, db } => import(&file, &db, registry)?,
    }
    Ok(())
}

fn print_sections() {
    for section in SectionType::VALUES {
        let info = describe(section);
        println!("{:<18} {:<4} {}", section.as_str(), info.abbrev, info.title);
    }
}

fn inspect(file: &Path, registry: &TileRegistry) -> Result<(), CliError> {
    let text = read_file(file)?;
    let document = clue_core::Document::from_json(&text, registry)?;

    let section = section_type_from_path(&file.to_string_lossy())
        .map(|section| describe(section).title)
        .unwrap_or("-");
    println!(
        "{} {} uid={} section={} tiles={}",
        document.kind().as_str(),
        document.key(),
        document.uid(),
        section,
        document.content().len()
    );
    for (index, tile) in document.content().tiles().enumerate() {
        println!("{index:>3} {:<11} {} {}", tile.kind().as_str(), tile.id(), tile.title());
    }
    Ok(())
}

fn import(file: &Path, db: &Path, registry: Arc<TileRegistry>) -> Result<(), CliError> {
    let text = read_file(file)?;
    let conn = open_db(db)?;
    let repo = SqliteDocumentRepository::new(&conn, Arc::clone(&registry));
    let service = DocumentService::new(repo, registry);
    let key = service.import_document(&text)?;
    info!("event=cli_import module=cli status=ok");
    println!("imported {key}");
    Ok(())
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
