//! Subway Line command line tool
//!
//! Manages lines stored in a JSON snapshot: create lines, insert sections,
//! remove stations and print the station order.

use clap::{value_parser, Arg, ArgMatches, Command};
use std::process::ExitCode;
use subway_line::core::Config;
use subway_line::storage::snapshot;
use subway_line::{Error, LineId, LineStore, MemLineStore, Result, Section, StationId};
use tracing::{error, info};

fn cli() -> Command {
    let line_arg = || {
        Arg::new("line")
            .value_name("LINE_ID")
            .required(true)
            .value_parser(value_parser!(u64))
            .help("Line id")
    };
    let station_arg = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .value_name("STATION_ID")
            .required(true)
            .value_parser(value_parser!(u64))
            .help(help)
    };
    let distance_arg = || {
        Arg::new("distance")
            .value_name("DISTANCE")
            .required(true)
            .value_parser(value_parser!(u32))
            .help("Distance between the two stations")
    };

    Command::new("subway-line")
        .version(subway_line::VERSION)
        .about("Manage the sections of subway lines.")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .value_name("FILE")
                .global(true)
                .help("Line snapshot file"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .global(true)
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .subcommand(Command::new("lines").about("List all lines"))
        .subcommand(
            Command::new("create-line")
                .about("Create a line with its first section")
                .arg(Arg::new("name").long("name").required(true).help("Line name"))
                .arg(Arg::new("color").long("color").required(true).help("Line colour"))
                .arg(station_arg("up", "Up station of the first section"))
                .arg(station_arg("down", "Down station of the first section"))
                .arg(distance_arg()),
        )
        .subcommand(
            Command::new("stations")
                .about("Print the stations of a line in order")
                .arg(line_arg()),
        )
        .subcommand(
            Command::new("add-section")
                .about("Insert a section into a line")
                .arg(line_arg())
                .arg(station_arg("up", "Up station"))
                .arg(station_arg("down", "Down station"))
                .arg(distance_arg()),
        )
        .subcommand(
            Command::new("remove-station")
                .about("Remove a station from a line")
                .arg(line_arg())
                .arg(station_arg("station", "Station to remove")),
        )
        .subcommand(
            Command::new("update-line")
                .about("Rename or recolour a line")
                .arg(line_arg())
                .arg(Arg::new("name").long("name").required(true).help("New name"))
                .arg(Arg::new("color").long("color").required(true).help("New colour")),
        )
        .subcommand(
            Command::new("delete-line")
                .about("Delete a line")
                .arg(line_arg()),
        )
}

fn main() -> ExitCode {
    let matches = cli().get_matches();

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_client_error() || matches!(e, Error::Config(_)) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
        Err(e) => {
            error!(error = %e, "internal failure");
            eprintln!("internal error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let (command, args) = matches
        .subcommand()
        .ok_or_else(|| Error::invalid_input("no command given"))?;

    let mut config = match global(matches, args, "config") {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    apply_cli_overrides(&mut config, matches, args)?;
    subway_line::init(&config.logging)?;

    let store = MemLineStore::from_lines(snapshot::load_lines(&config.storage.data_file)?)?;

    let changed = execute(&store, command, args)?;

    if changed {
        snapshot::save_lines(&config.storage.data_file, &store.snapshot(), config.storage.pretty)?;
        info!(path = %config.storage.data_file.display(), "snapshot written");
    }
    Ok(())
}

/// Run one subcommand, returning whether the registry changed
fn execute(store: &MemLineStore, command: &str, args: &ArgMatches) -> Result<bool> {
    match command {
        "lines" => {
            for line in store.list_lines() {
                println!(
                    "{}\t{}\t{}\t{} stations\t{}",
                    line.id(),
                    line.name(),
                    line.color(),
                    line.sections().len() + 1,
                    line.total_distance()
                );
            }
            Ok(false)
        }
        "create-line" => {
            let section = section_from(args)?;
            let line = store.create_line(string(args, "name")?, string(args, "color")?, section)?;
            println!("created line {}", line.id());
            Ok(true)
        }
        "stations" => {
            let line = store.get_line(line_id(args)?)?;
            let stations: Vec<String> = line.stations()?.iter().map(StationId::to_string).collect();
            println!("{}", stations.join(" -> "));
            println!("total distance: {}", line.total_distance());
            Ok(false)
        }
        "add-section" => {
            let diff = store.add_section(line_id(args)?, section_from(args)?)?;
            println!("added {} section(s), removed {}", diff.added.len(), diff.removed.len());
            Ok(true)
        }
        "remove-station" => {
            let station = StationId::new(number::<u64>(args, "station")?);
            let diff = store.remove_station(line_id(args)?, station)?;
            println!("added {} section(s), removed {}", diff.added.len(), diff.removed.len());
            Ok(true)
        }
        "update-line" => {
            let line = store.update_line(line_id(args)?, string(args, "name")?, string(args, "color")?)?;
            println!("updated line {}", line.id());
            Ok(true)
        }
        "delete-line" => {
            let id = line_id(args)?;
            store.delete_line(id)?;
            println!("deleted line {}", id);
            Ok(true)
        }
        other => Err(Error::invalid_input(format!("unknown command: {}", other))),
    }
}

/// Apply command line argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, matches: &ArgMatches, args: &ArgMatches) -> Result<()> {
    if let Some(data) = global(matches, args, "data") {
        config.storage.data_file = data.into();
    }

    if let Some(level) = global(matches, args, "log-level") {
        config.logging.level = level.to_string();
    }

    config.validate()
}

/// Global option given either before or after the subcommand
fn global<'a>(matches: &'a ArgMatches, args: &'a ArgMatches, name: &str) -> Option<&'a str> {
    args.get_one::<String>(name)
        .or_else(|| matches.get_one::<String>(name))
        .map(String::as_str)
}

fn section_from(args: &ArgMatches) -> Result<Section> {
    Ok(Section::new(
        number::<u64>(args, "up")?,
        number::<u64>(args, "down")?,
        number::<u32>(args, "distance")?,
    )?)
}

fn line_id(args: &ArgMatches) -> Result<LineId> {
    number::<u64>(args, "line").map(LineId::new)
}

fn number<T: Copy + Send + Sync + 'static>(args: &ArgMatches, name: &str) -> Result<T> {
    args.get_one::<T>(name)
        .copied()
        .ok_or_else(|| Error::invalid_input(format!("missing argument: {}", name)))
}

fn string<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| Error::invalid_input(format!("missing argument: {}", name)))
}
