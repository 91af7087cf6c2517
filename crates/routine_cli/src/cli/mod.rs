use clap::{Parser, Subcommand};
use routine_core::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track daily routine tasks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: routine add "Buy milk"
    /// Example: routine add "Buy milk" --date 2025-06-01
    Add {
        description: Option<String>,
        /// Day the task belongs to (YYYY-MM-DD); defaults to the current date
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark a task as completed
    ///
    /// Example: routine done 1
    Done { id: u32 },
    /// Delete a task
    ///
    /// Example: routine delete 1
    Delete { id: u32 },
    /// Show details of a task
    ///
    /// Example: routine show 1
    Show { id: u32 },
    /// List the tasks of one day with its statistics
    ///
    /// Example: routine list
    /// Example: routine list --date 2025-06-01
    List {
        #[arg(long)]
        date: Option<String>,
    },
    /// Completion statistics for every day, newest first
    ///
    /// Example: routine stats
    Stats,
    /// Chart of the most recent days
    ///
    /// Example: routine chart
    /// Example: routine chart --days 14
    Chart {
        #[arg(long)]
        days: Option<usize>,
    },
    /// Show or change the current date used by add and list
    ///
    /// Example: routine date 2025-06-01
    Date { date: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    StorePath,
    ChartDays,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "store_path" | "store" => ConfigOverrideTarget::StorePath,
        "chart_days" => ConfigOverrideTarget::ChartDays,
        other => return Err(format!("unknown config field '{other}'")),
    };

    if value.is_empty() {
        return Err(format!("override for '{field}' needs a value"));
    }

    Ok(ParsedConfigOverride { target, value })
}

/// Collect every `--config-override` into one set of overrides. Later
/// values win.
pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::StorePath => {
                overrides.store_path = Some(PathBuf::from(parsed.value))
            }
            ConfigOverrideTarget::ChartDays => {
                let days = parsed
                    .value
                    .parse::<usize>()
                    .ok()
                    .filter(|days| *days > 0)
                    .ok_or_else(|| "chart_days must be a positive number".to_string())?;
                overrides.chart_days = Some(days);
            }
        }
    }
    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
