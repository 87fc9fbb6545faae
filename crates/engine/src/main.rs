//! Lanternlog - command-line driver for the campaign tracker.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lanternlog_domain::migrate;
use lanternlog_engine::infrastructure::config::TrackerConfig;
use lanternlog_engine::use_cases::{parse_campaign, ImportError};
use lanternlog_engine::App;

const USAGE: &str = "\
Usage: lanternlog <command> [arguments]

Commands:
  validate <file>        Migrate and validate a campaign file without storing it
  migrate <file> [out]   Print (or write) a campaign file upgraded to the current shape
  import <file>          Replace the stored campaign with a campaign file
  export [file]          Write the stored campaign as indented JSON
  status [--json]        Summarise the stored campaign
  help                   Show this message

Environment:
  LANTERNLOG_DATA_DIR, LANTERNLOG_STORAGE_KEY, LANTERNLOG_DEBOUNCE_MS,
  LANTERNLOG_MAX_REPORTED_ISSUES, RUST_LOG";

enum Command {
    Validate(PathBuf),
    Migrate { input: PathBuf, output: Option<PathBuf> },
    Import(PathBuf),
    Export(Option<PathBuf>),
    Status { json: bool },
    Help,
}

impl Command {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let arg = |index: usize| args.get(index).map(PathBuf::from);
        let required = |index: usize, name: &str| {
            arg(index).with_context(|| format!("missing <{name}> argument\n\n{USAGE}"))
        };
        match args.first().map(String::as_str) {
            None | Some("help" | "--help" | "-h") => Ok(Self::Help),
            Some("validate") => Ok(Self::Validate(required(1, "file")?)),
            Some("migrate") => Ok(Self::Migrate {
                input: required(1, "file")?,
                output: arg(2),
            }),
            Some("import") => Ok(Self::Import(required(1, "file")?)),
            Some("export") => Ok(Self::Export(arg(1))),
            Some("status") => Ok(Self::Status {
                json: args.get(1).is_some_and(|flag| flag == "--json"),
            }),
            Some(other) => anyhow::bail!("unknown command `{other}`\n\n{USAGE}"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lanternlog=info,lanternlog_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    let config = TrackerConfig::from_env()?;

    match command {
        Command::Help => println!("{USAGE}"),
        Command::Validate(path) => validate(&path, &config)?,
        Command::Migrate { input, output } => migrate_file(&input, output.as_deref())?,
        Command::Import(path) => import(&path, config)?,
        Command::Export(path) => export(path, config)?,
        Command::Status { json } => status(config, json)?,
    }
    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write(path: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn print_issues(lines: &[String]) {
    for line in lines {
        eprintln!("  {line}");
    }
}

fn validate(path: &Path, config: &TrackerConfig) -> anyhow::Result<()> {
    match parse_campaign(&read(path)?) {
        Ok(campaign) => {
            println!(
                "{} is valid: {} settlement(s), {} survivor(s), {} custom monster(s)",
                path.display(),
                campaign.settlements().len(),
                campaign.survivors().len(),
                campaign.custom_monsters().len()
            );
            Ok(())
        }
        Err(err) => {
            print_issues(&err.report(config.max_reported_issues));
            Err(rejection(path, err))
        }
    }
}

fn migrate_file(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let raw: serde_json::Value = serde_json::from_str(&read(input)?)
        .with_context(|| format!("{} is not valid JSON", input.display()))?;
    let migrated = serde_json::to_string_pretty(&migrate(raw))?;
    match output {
        Some(path) => {
            write(path, &migrated)?;
            tracing::info!(input = %input.display(), output = %path.display(), "Migrated campaign file");
        }
        None => println!("{migrated}"),
    }
    Ok(())
}

fn import(path: &Path, config: TrackerConfig) -> anyhow::Result<()> {
    let text = read(path)?;
    let mut app = App::open(config).context("failed to open the campaign store")?;
    match app.import(&text) {
        Ok(campaign) => {
            println!(
                "Imported {}: {} settlement(s), {} survivor(s)",
                path.display(),
                campaign.settlements().len(),
                campaign.survivors().len()
            );
            Ok(())
        }
        Err(err) => {
            print_issues(&app.import_report(&err));
            Err(rejection(path, err))
        }
    }
}

fn export(path: Option<PathBuf>, config: TrackerConfig) -> anyhow::Result<()> {
    let app = App::open(config).context("failed to open the campaign store")?;
    let export = app.export()?;
    let path = path.unwrap_or_else(|| PathBuf::from(&export.file_name));
    write(&path, &export.contents)?;
    println!("Exported campaign to {}", path.display());
    Ok(())
}

fn status(config: TrackerConfig, json: bool) -> anyhow::Result<()> {
    let app = App::open(config).context("failed to open the campaign store")?;
    let status = app.status();
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("Campaign v{} ({})", status.version, status.embark_state);
    if status.settlements.is_empty() {
        println!("No settlements yet.");
    }
    for settlement in &status.settlements {
        println!(
            "  #{} {} [{}] year {}, population {}, {} living / {} dead",
            settlement.id,
            settlement.name,
            settlement.campaign_type,
            settlement.lantern_year,
            settlement.population,
            settlement.living_survivors,
            settlement.dead_survivors
        );
    }
    println!("Custom monsters: {}", status.custom_monsters);
    Ok(())
}

fn rejection(path: &Path, err: ImportError) -> anyhow::Error {
    let count = match &err {
        ImportError::Validation(issues) => issues.len(),
        _ => 0,
    };
    if count > 0 {
        anyhow::anyhow!("{} was rejected with {count} issue(s)", path.display())
    } else {
        anyhow::Error::new(err).context(format!("{} was rejected", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanternlog_domain::Issues;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn commands_parse_with_their_arguments() {
        assert!(matches!(Command::parse(&args(&[])).unwrap(), Command::Help));
        assert!(matches!(
            Command::parse(&args(&["validate", "a.json"])).unwrap(),
            Command::Validate(path) if path == Path::new("a.json")
        ));
        assert!(matches!(
            Command::parse(&args(&["migrate", "a.json", "b.json"])).unwrap(),
            Command::Migrate { output: Some(_), .. }
        ));
        assert!(matches!(
            Command::parse(&args(&["export"])).unwrap(),
            Command::Export(None)
        ));
        assert!(matches!(
            Command::parse(&args(&["status", "--json"])).unwrap(),
            Command::Status { json: true }
        ));
    }

    #[test]
    fn missing_and_unknown_arguments_are_errors() {
        assert!(Command::parse(&args(&["import"])).is_err());
        assert!(Command::parse(&args(&["tally"])).is_err());
    }

    #[test]
    fn rejection_counts_issues() {
        let err = ImportError::Validation(Issues::single("survivors", "Survivors must be a list."));
        let message = rejection(Path::new("bad.json"), err).to_string();
        assert_eq!(message, "bad.json was rejected with 1 issue(s)");
    }
}
