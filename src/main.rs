use std::path::PathBuf;
use std::process;

use anyhow::{Context, bail};
use clap::Parser;
use d2v_reader::{DecodeOptions, StreamTypeScope};
use serde_json::Value;

/// Inspect DGIndex D2V project files.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the .d2v file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the decoded document as JSON
    #[arg(short, long)]
    json: bool,

    /// Indent JSON output (implies --json)
    #[arg(short, long)]
    pretty: bool,

    /// Print a single value by dotted path, e.g. settings.Aspect_Ratio or frames.0.info
    #[arg(short, long, value_name = "PATH")]
    get: Option<String>,

    /// Only let a Stream_Type written above the transport keys affect them
    #[arg(long)]
    legacy_settings_order: bool,

    /// Treat a missing footer line as an error
    #[arg(long)]
    strict_footer: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("ERROR: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if !cli.file.exists() {
        bail!("file path does not exist: {}", cli.file.display());
    }
    if !cli.file.is_file() {
        bail!("file path is a directory, not a file: {}", cli.file.display());
    }

    let scope = if cli.legacy_settings_order {
        StreamTypeScope::Preceding
    } else {
        StreamTypeScope::WholeBlock
    };
    let options = DecodeOptions::new()
        .with_stream_type_scope(scope)
        .with_require_footer(cli.strict_footer);

    let document = d2v_reader::parse_from_path_with(&cli.file, &options)
        .with_context(|| format!("failed to read D2V file {}", cli.file.display()))?;

    if cli.get.is_none() && !cli.json && !cli.pretty {
        println!("{}", document);
        return Ok(());
    }

    let value = serde_json::to_value(&document)?;
    let selected = match &cli.get {
        Some(path) => select(&value, path).with_context(|| format!("no value at path '{}'", path))?,
        None => &value,
    };

    match selected {
        Value::String(s) if cli.get.is_some() => println!("{}", s),
        other if cli.pretty => println!("{}", serde_json::to_string_pretty(other)?),
        other => println!("{}", serde_json::to_string(other)?),
    }
    Ok(())
}

/// Walks a dotted path through maps (by key) and lists (by index).
fn select<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_nested_keys_and_indices() {
        let value = json!({
            "settings": { "Aspect_Ratio": "16:9" },
            "frames": [ { "info": { "part_of_closed_gop": true } } ]
        });
        assert_eq!(select(&value, "settings.Aspect_Ratio"), Some(&json!("16:9")));
        assert_eq!(
            select(&value, "frames.0.info.part_of_closed_gop"),
            Some(&json!(true))
        );
        assert_eq!(select(&value, ""), Some(&value));
    }

    #[test]
    fn test_select_missing_path() {
        let value = json!({ "frames": [] });
        assert!(select(&value, "frames.0").is_none());
        assert!(select(&value, "frames.first").is_none());
        assert!(select(&value, "settings").is_none());
    }
}
