use clap::{CommandFactory, Parser};
use log::debug;
use routine_cli::cli::{Cli, Command, collect_config_overrides};
use routine_core::config::{self, Config, Palette};
use routine_core::dates;
use routine_core::error::AppError;
use routine_core::model::Task;
use routine_core::stats::DayTotals;
use routine_core::storage::csv_store;
use routine_core::task_api::{self, ChartData, DayListing};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const BAR_WIDTH: usize = 30;

/// State that outlives a single command: the configuration read at startup
/// and the date `add` and `list` fall back to.
struct Session {
    config: Config,
    date: String,
}

impl Session {
    fn start() -> Result<Self, AppError> {
        Ok(Self {
            config: config::load_config_with_fallback().config,
            date: dates::today()?,
        })
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "id": task.id,
        "description": task.description,
        "date": task.date,
        "status": task.status.label(),
        "completion_date": task.completion_date,
    })
}

fn totals_json(date: &str, totals: &DayTotals) -> serde_json::Value {
    serde_json::json!({
        "date": date,
        "total": totals.total,
        "completed": totals.completed,
        "pending": totals.pending(),
        "completion_percentage": totals.percentage(),
    })
}

fn print_task_json(task: &Task) {
    println!("{}", task_json(task));
}

fn print_listing_plain(listing: &DayListing, palette: &Palette) {
    if listing.tasks.is_empty() {
        println!("{}", palette.mutedize(&format!("No tasks for {}.", listing.date)));
    } else {
        let rows = listing.tasks.iter().map(|task| TaskRow {
            id: task.id,
            description: task.description.clone(),
            date: task.date.clone(),
            status: task.status.label(),
        });
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("{table}");
    }

    let stats = &listing.stats;
    let line = format!(
        "Total: {} | Completed: {} | Pending: {} | Completion: {:.1}%",
        stats.total, stats.completed, stats.pending, stats.completion_percentage
    );
    println!("{}", palette.accentize(&line));
}

fn print_listing_json(listing: &DayListing) {
    let tasks: Vec<serde_json::Value> = listing.tasks.iter().map(task_json).collect();
    let json = serde_json::json!({
        "date": listing.date,
        "tasks": tasks,
        "stats": listing.stats,
    });
    println!("{}", json);
}

fn print_history_plain(history: &[(String, DayTotals)], palette: &Palette) {
    if history.is_empty() {
        println!("{}", palette.mutedize("No tasks."));
        return;
    }

    for (date, totals) in history {
        println!(
            "{}: {}/{} ({:.1}%)",
            palette.accentize(date),
            totals.completed,
            totals.total,
            totals.percentage()
        );
    }
}

fn bar(count: usize, max_total: usize, fill: char) -> String {
    let width = if max_total == 0 {
        0
    } else {
        count * BAR_WIDTH / max_total
    };
    std::iter::repeat_n(fill, width).collect()
}

fn print_chart_plain(chart: &ChartData, palette: &Palette) {
    let overall = &chart.overall;
    if overall.total == 0 {
        println!("{}", palette.mutedize("No tasks."));
        return;
    }

    println!(
        "Overall: {} completed ({:.1}%) | {} pending",
        overall.completed,
        overall.percentage(),
        overall.pending()
    );

    let max_total = chart
        .series
        .iter()
        .map(|(_, totals)| totals.total)
        .max()
        .unwrap_or(0);
    for (date, totals) in &chart.series {
        println!(
            "{} {}{} {}/{}",
            date,
            palette.accentize(&bar(totals.completed, max_total, '#')),
            palette.mutedize(&bar(totals.pending(), max_total, '-')),
            totals.completed,
            totals.total
        );
    }
}

fn print_chart_json(chart: &ChartData) {
    let series: Vec<serde_json::Value> = chart
        .series
        .iter()
        .map(|(date, totals)| totals_json(date, totals))
        .collect();
    let json = serde_json::json!({
        "overall": {
            "total": chart.overall.total,
            "completed": chart.overall.completed,
            "pending": chart.overall.pending(),
        },
        "series": series,
    });
    println!("{}", json);
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(cli: Cli, session: &mut Session) -> Result<(), AppError> {
    let overrides =
        collect_config_overrides(&cli.config_override).map_err(AppError::invalid_input)?;
    let config = config::merge_overrides(&session.config, &overrides);
    let palette = config::palette_for_theme(config.theme.as_deref());
    let path: PathBuf = csv_store::resolve_store_path(config.store_path.as_deref())?;
    debug!("using task file {}", path.display());

    match cli.command {
        Command::Add { description, date } => {
            let description = match description {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("description is required")),
            };
            let date = date.unwrap_or_else(|| session.date.clone());

            let task = task_api::add_task_with_path(&path, &description, Some(&date))?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Added task: {} ({}) for {}", task.description, task.id, task.date);
            }
        }
        Command::Done { id } => {
            let task = task_api::complete_task_with_path(&path, id)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Completed task: {} ({})", task.description, task.id);
            }
        }
        Command::Delete { id } => match task_api::delete_task_with_path(&path, id)? {
            Some(task) if cli.json => print_task_json(&task),
            Some(task) => println!("Deleted task: {} ({})", task.description, task.id),
            None if cli.json => println!("null"),
            None => println!("No task with id {id}"),
        },
        Command::Show { id } => {
            let task = task_api::get_task_with_path(&path, id)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("ID: {}", task.id);
                println!("Description: {}", task.description);
                println!("Date: {}", task.date);
                println!("Status: {}", task.status.label());
                println!(
                    "Completed on: {}",
                    task.completion_date.as_deref().unwrap_or("-")
                );
            }
        }
        Command::List { date } => {
            let date = date.unwrap_or_else(|| session.date.clone());
            let listing = task_api::list_for_date_with_path(&path, &date)?;
            if cli.json {
                print_listing_json(&listing);
            } else {
                print_listing_plain(&listing, &palette);
            }
        }
        Command::Stats => {
            let history = task_api::history_with_path(&path)?;
            if cli.json {
                let payload: Vec<serde_json::Value> = history
                    .iter()
                    .map(|(date, totals)| totals_json(date, totals))
                    .collect();
                println!("{}", serde_json::Value::Array(payload));
            } else {
                print_history_plain(&history, &palette);
            }
        }
        Command::Chart { days } => {
            let chart = task_api::chart_with_path(&path, days.unwrap_or(config.chart_days))?;
            if cli.json {
                print_chart_json(&chart);
            } else {
                print_chart_plain(&chart, &palette);
            }
        }
        Command::Date { date } => {
            if let Some(value) = date {
                session.date = dates::parse_date(&value)?;
            }
            if cli.json {
                println!("{}", serde_json::json!({ "date": session.date }));
            } else {
                println!("Current date: {}", session.date);
            }
        }
    }

    Ok(())
}

fn run_interactive(session: &mut Session) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock.read_line(&mut input)?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("routine".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, session) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut session = match Session::start() {
        Ok(session) => session,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(&mut session) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help and --version
            print!("{err}");
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli, &mut session) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
