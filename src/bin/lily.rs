//! Command-line interface for lily
//!
//! Usage:
//!   lily parse `<path>` [--format `<format>`] [--rule `<rule>`] [--config `<file>`]  - Parse a file and print its tree
//!   lily rules                                                                  - List the merged grammar rules
//!   lily formats                                                                - List output formats

use clap::{Arg, ArgAction, ArgMatches, Command};
use lily::lily::config::{LilyConfig, Loader};
use lily::lily::formats::FORMATS;
use lily::lily::languages::LILYPOND;
use lily::lily::parsing::Parser;
use log::{LevelFilter, Metadata, Record};

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() {
    let matches = Command::new("lily")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse LilyPond notation with embedded Scheme")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log grammar and parse details to stderr (repeat for more)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a file and print its syntax tree")
                .arg(
                    Arg::new("path")
                        .help("Path to the .ly file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (see `lily formats`)"),
                )
                .arg(
                    Arg::new("rule")
                        .long("rule")
                        .short('r')
                        .help("Rule to match instead of source_file"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the defaults"),
                )
                .arg(
                    Arg::new("no-extras")
                        .long("no-extras")
                        .help("Drop comments and version statements from the output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("rules").about("List the merged grammar rules and their origin"))
        .subcommand(Command::new("formats").about("List available output formats"))
        .get_matches();

    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("parse", sub)) => handle_parse_command(sub),
        Some(("rules", _)) => handle_rules_command(),
        Some(("formats", _)) => handle_formats_command(),
        _ => unreachable!("subcommand is required"),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn load_config(sub: &ArgMatches) -> Result<LilyConfig, config::ConfigError> {
    let mut loader = match sub.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file("lily.toml"),
    };
    if let Some(format) = sub.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    if let Some(rule) = sub.get_one::<String>("rule") {
        loader = loader.set_override("parser.start_rule", rule.as_str())?;
    }
    if sub.get_flag("no-extras") {
        loader = loader.set_override("output.show_extras", false)?;
    }
    loader.build()
}

fn handle_parse_command(sub: &ArgMatches) {
    let path = sub
        .get_one::<String>("path")
        .expect("path is a required argument");

    let config = load_config(sub).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    });

    let parser = Parser::with_options(&LILYPOND, &config.parser.parse_options())
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let tree = parser.parse(&source).unwrap_or_else(|e| {
        eprintln!("{}: {}", path, e);
        std::process::exit(1);
    });
    let tree = if config.output.show_extras {
        tree
    } else {
        tree.without_extras()
    };

    let output = FORMATS
        .serialize(&tree, &config.output.format)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            eprintln!("Available formats: {}", FORMATS.list_formats().join(", "));
            std::process::exit(1);
        });
    println!("{}", output.trim_end());
}

fn handle_rules_command() {
    let rules = LILYPOND.rules();
    println!("Grammar '{}' ({} rules):\n", LILYPOND.name(), rules.len());
    for (name, expr) in rules.iter() {
        let origin = rules
            .origin(name)
            .map(|origin| origin.to_string())
            .unwrap_or_default();
        println!("  {:<32} [{}] {}", name, origin, expr);
    }
    println!("\nExtras:");
    for extra in LILYPOND.extras() {
        println!("  {}", extra);
    }
}

fn handle_formats_command() {
    println!("Available formats:\n");
    for name in FORMATS.list_formats() {
        let description = FORMATS
            .get(&name)
            .map(|formatter| formatter.description())
            .unwrap_or_default();
        println!("  {:<10} {}", name, description);
    }
}
