//! `clo`: check, reconcile, edit, total and export CLO documents from the command line

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clo_document::ExportFormat;
use clo_mapping::MappingKindTag;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    let input = || {
        Arg::new("file")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Document JSON file")
    };

    Command::new("clo")
        .version(clo_cli::VERSION)
        .about("Consistency checks and export for มคอ.3 CLO documents")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("check")
                .about("List broken mapping and numbering invariants")
                .arg(input()),
        )
        .subcommand(
            Command::new("reconcile")
                .about("Renumber CLOs and regenerate every mapping table")
                .arg(input())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write here instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("set")
                .about("Change one mapping value")
                .arg(input())
                .arg(
                    Arg::new("kind")
                        .required(true)
                        .value_parser(value_parser!(String))
                        .help("teaching, assessment or plo"),
                )
                .arg(
                    Arg::new("clo")
                        .required(true)
                        .value_parser(value_parser!(u32))
                        .help("CLO number"),
                )
                .arg(
                    Arg::new("target")
                        .required(true)
                        .value_parser(value_parser!(String))
                        .help("Target id, method name or PLO code"),
                )
                .arg(
                    Arg::new("value")
                        .required(true)
                        .value_parser(value_parser!(String))
                        .help("yes/no, a percentage, or a strength"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write here instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("totals")
                .about("Print each CLO's assessment total")
                .arg(input()),
        )
        .subcommand(
            Command::new("export")
                .about("Render the document outline")
                .arg(input())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(value_parser!(String))
                        .help("pdf or docx (default from config)"),
                )
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .default_value(".")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory for the artifact"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn file_arg(args: &ArgMatches) -> Result<&PathBuf> {
    required(args, "file")
}

fn required<'a, T>(args: &'a ArgMatches, id: &str) -> Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    args.get_one::<T>(id).with_context(|| format!("missing {id}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));
    let config = clo_cli::load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    match matches.subcommand() {
        Some(("check", args)) => {
            let report = clo_cli::check(file_arg(args)?).await?;
            print!("{}", report.generate_text());
            std::process::exit(report.exit_code());
        }
        Some(("reconcile", args)) => {
            let out = args.get_one::<PathBuf>("out").map(PathBuf::as_path);
            if let Some(json) = clo_cli::reconcile(file_arg(args)?, out).await? {
                println!("{json}");
            }
        }
        Some(("set", args)) => {
            let kind = required::<String>(args, "kind")?.parse::<MappingKindTag>()?;
            let clo = *required::<u32>(args, "clo")?;
            let target = required::<String>(args, "target")?;
            let value = required::<String>(args, "value")?;
            let out = args.get_one::<PathBuf>("out").map(PathBuf::as_path);

            if let Some(json) = clo_cli::set(file_arg(args)?, kind, clo, target, value, out).await? {
                println!("{json}");
            }
        }
        Some(("totals", args)) => {
            for total in clo_cli::totals(file_arg(args)?, &config).await? {
                println!("CLO {}\t{}", total.number, total.total);
            }
        }
        Some(("export", args)) => {
            let format = args
                .get_one::<String>("format")
                .map(|raw| raw.parse::<ExportFormat>())
                .transpose()?;
            let out_dir = args
                .get_one::<PathBuf>("out-dir")
                .context("missing output directory")?;

            let (path, digest) = clo_cli::export(file_arg(args)?, format, out_dir, &config).await?;
            println!("{}\tsha256:{digest}", path.display());
        }
        _ => {}
    }

    Ok(())
}
