//! CLI command implementations
//!
//! Every command loads the configuration, opens the inventory and returns
//! one JSON value. `run` wraps it in the `ok`/`error` envelope on stdout.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use crate::catalog::{Book, BookPatch};
use crate::config::Config;
use crate::inventory::{Inventory, InventoryError, ListOutcome};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::query::ListQuery;
use crate::schema::{Schema, SchemaLoader};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request_from, write_error, write_response};

/// Parse arguments, run the command and write the response
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match run_command(&cli.config, cli.command) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run one command against the configuration at `config_path`, reading
/// request bodies from stdin.
pub fn run_command(config_path: &Path, cmd: Command) -> CliResult<Value> {
    let config = load_config(config_path)?;
    execute(&config, cmd, io::stdin().lock())
}

/// Load the configuration and apply its log level before anything is logged.
pub fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("config_path", &config_path.display().to_string()),
            ("data_path", &config.data_path.display().to_string()),
        ],
    );
    Ok(config)
}

/// Run one command with an explicit configuration and request source
pub fn execute<R: Read>(config: &Config, cmd: Command, stdin: R) -> CliResult<Value> {
    let open = || Inventory::open(config);

    match cmd {
        Command::Init => init(config),
        Command::List {
            search,
            category,
            sort_by,
            order,
            page,
            page_size,
            if_none_match,
        } => {
            let query = ListQuery {
                search,
                category,
                sort_by,
                order,
                page,
                page_size,
            };
            list(&open()?, &query, if_none_match.as_deref())
        }
        Command::Get { isbn } => get(&open()?, &isbn),
        Command::Categories => to_json(&open()?.categories()?),
        Command::Create => create(&open()?, stdin),
        Command::Update { isbn } => update(&open()?, &isbn, stdin),
        Command::Delete { isbn } => {
            open()?.delete(&isbn)?;
            Ok(json!({ "deleted": isbn }))
        }
        Command::Export { output } => export(&open()?, output.as_deref()),
        Command::Import { input } => import(&open()?, input.as_deref(), stdin),
        Command::Fingerprint => Ok(json!({ "token": open()?.fingerprint()? })),
    }
}

/// Create the document, and the default schema file if a schema path is
/// configured but nothing exists there yet.
pub fn init(config: &Config) -> CliResult<Value> {
    let mut schema_written = false;
    if let Some(schema_path) = &config.schema_path {
        if !schema_path.exists() {
            if let Some(parent) = schema_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            SchemaLoader::save(schema_path, &Schema::book_default())
                .map_err(|e| CliError::config_error(e.to_string()))?;
            schema_written = true;
        }
    }

    let inventory = Inventory::open(config)?;

    Ok(json!({
        "data_path": inventory.store().path().display().to_string(),
        "schema_path": config.schema_path.as_ref().map(|p| p.display().to_string()),
        "schema_written": schema_written,
        "token": inventory.fingerprint()?,
    }))
}

fn list(inventory: &Inventory, query: &ListQuery, if_none_match: Option<&str>) -> CliResult<Value> {
    match inventory.list_if_changed(if_none_match, query)? {
        ListOutcome::NotModified => Ok(json!({
            "modified": false,
            "token": if_none_match,
        })),
        ListOutcome::Changed { token, page } => Ok(json!({
            "modified": true,
            "token": token,
            "total": page.total,
            "items": to_json(&page.items)?,
        })),
    }
}

fn get(inventory: &Inventory, isbn: &str) -> CliResult<Value> {
    match inventory.get_by_isbn(isbn)? {
        Some(book) => to_json(&book),
        None => Err(InventoryError::NotFound(isbn.to_string()).into()),
    }
}

fn create<R: Read>(inventory: &Inventory, stdin: R) -> CliResult<Value> {
    let candidate: Book = read_request_from(stdin)?;
    to_json(&inventory.create(candidate)?)
}

fn update<R: Read>(inventory: &Inventory, isbn: &str, stdin: R) -> CliResult<Value> {
    let patch: BookPatch = read_request_from(stdin)?;
    to_json(&inventory.update(isbn, &patch)?)
}

fn export(inventory: &Inventory, output: Option<&Path>) -> CliResult<Value> {
    let csv = inventory.export_csv()?;
    match output {
        Some(path) => {
            fs::write(path, &csv)?;
            Ok(json!({
                "path": path.display().to_string(),
                "bytes": csv.len(),
            }))
        }
        None => Ok(json!({ "csv": csv })),
    }
}

fn import<R: Read>(inventory: &Inventory, input: Option<&Path>, stdin: R) -> CliResult<Value> {
    let report = match input {
        Some(path) => inventory.import_csv(File::open(path)?)?,
        None => inventory.import_csv(stdin)?,
    };
    to_json(&report)
}

fn to_json<T: Serialize>(value: &T) -> CliResult<Value> {
    serde_json::to_value(value).map_err(|e| CliError::io_error(format!("JSON error: {}", e)))
}
