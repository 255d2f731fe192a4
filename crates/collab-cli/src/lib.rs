//! Command-line access to the collab platform core
//!
//! ```text
//! collab [--config FILE] [--log-level FILTER] [--json-logs] <command>
//!
//!   view        --data FILE --email EMAIL
//!   access      --role ROLE [--module MODULE]
//!   capability  --module MODULE [--role ROLE]
//!   onboarding  --data FILE [--write] <start|set-phase|complete-phase|update|complete|status>
//! ```
//!
//! Results go to stdout, logs to stderr.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use collab_core::{CollabPlatform, Dataset, LogConfig, PlatformConfig};
use collab_model::{CustomerId, Role};
use collab_onboarding::{Creator, DataSection, FieldValue, PhaseId};
use collab_permissions::Module;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub fn build_cli() -> Command {
    Command::new("collab")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Collaboration platform core: visibility, permissions and onboarding")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Platform configuration (.toml, .yaml)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("tracing filter, overrides the configured one"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("view")
                .about("Resolve what a principal may see")
                .arg(data_arg())
                .arg(
                    Arg::new("email")
                        .long("email")
                        .required(true)
                        .help("Login email of the principal"),
                ),
        )
        .subcommand(
            Command::new("access")
                .about("Look up role access levels")
                .arg(role_arg().required(true))
                .arg(module_arg()),
        )
        .subcommand(
            Command::new("capability")
                .about("Look up module capabilities")
                .arg(module_arg().required(true))
                .arg(role_arg()),
        )
        .subcommand(
            Command::new("onboarding")
                .about("Drive customer onboarding")
                .subcommand_required(true)
                .arg(data_arg())
                .arg(
                    Arg::new("write")
                        .long("write")
                        .action(ArgAction::SetTrue)
                        .help("Save the updated dataset back to --data"),
                )
                .subcommand(
                    Command::new("start")
                        .about("Open or resume a dossier")
                        .arg(customer_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(
                            Arg::new("by")
                                .long("by")
                                .default_value("customer")
                                .value_parser(parse_creator)
                                .help("customer or sales"),
                        ),
                )
                .subcommand(
                    Command::new("set-phase")
                        .about("Move to a phase")
                        .arg(customer_arg())
                        .arg(phase_arg()),
                )
                .subcommand(
                    Command::new("complete-phase")
                        .about("Mark a phase completed")
                        .arg(customer_arg())
                        .arg(phase_arg()),
                )
                .subcommand(
                    Command::new("update")
                        .about("Merge fields into a data section")
                        .arg(customer_arg())
                        .arg(
                            Arg::new("section")
                                .long("section")
                                .required(true)
                                .value_parser(DataSection::from_str),
                        )
                        .arg(
                            Arg::new("field")
                                .long("field")
                                .action(ArgAction::Append)
                                .value_parser(parse_assignment)
                                .help("key=value"),
                        )
                        .arg(
                            Arg::new("list")
                                .long("list")
                                .action(ArgAction::Append)
                                .value_parser(parse_assignment)
                                .help("key=a,b,c"),
                        ),
                )
                .subcommand(
                    Command::new("complete")
                        .about("Close onboarding")
                        .arg(customer_arg()),
                )
                .subcommand(
                    Command::new("status")
                        .about("Show a dossier and what it still needs")
                        .arg(customer_arg()),
                ),
        )
}

fn data_arg() -> Arg {
    Arg::new("data")
        .long("data")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Dataset (.json, .yaml)")
}

fn role_arg() -> Arg {
    Arg::new("role").long("role").value_parser(Role::from_str)
}

fn module_arg() -> Arg {
    Arg::new("module").long("module").value_parser(Module::from_str)
}

fn customer_arg() -> Arg {
    Arg::new("customer").long("customer").required(true)
}

fn phase_arg() -> Arg {
    Arg::new("phase")
        .long("phase")
        .required(true)
        .value_parser(value_parser!(u8))
}

fn parse_creator(s: &str) -> Result<Creator, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "customer" => Ok(Creator::Customer),
        "sales" => Ok(Creator::Sales),
        _ => Err(format!("unknown creator: {s}")),
    }
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .filter(|(k, _)| !k.trim().is_empty())
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {s}"))
}

/// Configuration from `--config`, with `--log-level` and `--json-logs` applied
pub fn load_config(matches: &ArgMatches) -> Result<PlatformConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => PlatformConfig::from_path(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => PlatformConfig::new(),
    };
    if let Some(filter) = matches.get_one::<String>("log-level") {
        config.log.filter.clone_from(filter);
    }
    if matches.get_flag("json-logs") {
        config.log.json = true;
    }
    Ok(config)
}

/// Install the global subscriber; `RUST_LOG` wins over the configured filter
pub fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    let result = if log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    if let Err(err) = result {
        eprintln!("logging already initialized: {err}");
    }
}

/// Execute a parsed command and return its stdout text
pub fn run(matches: &ArgMatches, config: PlatformConfig) -> Result<String> {
    match matches.subcommand() {
        Some(("view", args)) => run_view(args, config),
        Some(("access", args)) => run_access(args, config),
        Some(("capability", args)) => run_capability(args, config),
        Some(("onboarding", args)) => run_onboarding(args, config),
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("no command given"),
    }
}

fn open_platform(config: PlatformConfig, data: &Path) -> Result<CollabPlatform> {
    let dataset =
        Dataset::from_path(data).with_context(|| format!("loading dataset {}", data.display()))?;
    CollabPlatform::with_dataset(config, dataset)
        .with_context(|| format!("applying dataset {}", data.display()))
}

fn data_path(args: &ArgMatches) -> Result<&PathBuf> {
    args.get_one::<PathBuf>("data").context("--data is required")
}

fn string_arg<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a str> {
    args.get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("--{id} is required"))
}

fn run_view(args: &ArgMatches, config: PlatformConfig) -> Result<String> {
    let platform = open_platform(config, data_path(args)?)?;
    let view = platform.resolve_view_for_email(string_arg(args, "email")?)?;
    Ok(serde_json::to_string_pretty(view.as_ref())?)
}

fn run_access(args: &ArgMatches, config: PlatformConfig) -> Result<String> {
    let platform = CollabPlatform::new(config)?;
    let role = *args.get_one::<Role>("role").context("--role is required")?;
    let modules = match args.get_one::<Module>("module") {
        Some(module) => vec![*module],
        None => Module::ALL.to_vec(),
    };
    let lines: Vec<String> = modules
        .into_iter()
        .map(|module| format!("{:<16} {}", module.as_str(), platform.access_for(role, module)))
        .collect();
    Ok(lines.join("\n"))
}

fn run_capability(args: &ArgMatches, config: PlatformConfig) -> Result<String> {
    let platform = CollabPlatform::new(config)?;
    let module = *args.get_one::<Module>("module").context("--module is required")?;
    let roles = match args.get_one::<Role>("role") {
        Some(role) => vec![*role],
        None => Role::KNOWN.to_vec(),
    };
    let lines: Vec<String> = roles
        .into_iter()
        .map(|role| format!("{:<12} {}", role.as_str(), platform.capability_for(module, role)))
        .collect();
    Ok(lines.join("\n"))
}

fn run_onboarding(args: &ArgMatches, config: PlatformConfig) -> Result<String> {
    let data = data_path(args)?;
    let platform = open_platform(config, data)?;

    let output = match args.subcommand() {
        Some(("start", sub)) => {
            let creator = *sub.get_one::<Creator>("by").context("--by is required")?;
            let outcome = platform.start_onboarding(
                string_arg(sub, "customer")?,
                string_arg(sub, "name")?,
                string_arg(sub, "email")?,
                creator,
            )?;
            json!({
                "outcome": if outcome.is_created() { "created" } else { "resumed" },
                "dossier": outcome.dossier(),
            })
        }
        Some(("set-phase", sub)) => {
            select(&platform, sub)?;
            serde_json::to_value(platform.set_current_phase(phase(sub)?)?)?
        }
        Some(("complete-phase", sub)) => {
            select(&platform, sub)?;
            serde_json::to_value(platform.complete_phase(phase(sub)?)?)?
        }
        Some(("update", sub)) => {
            select(&platform, sub)?;
            let section = *sub
                .get_one::<DataSection>("section")
                .context("--section is required")?;
            let mut fields: Vec<(String, FieldValue)> = Vec::new();
            for (key, value) in sub.get_many::<(String, String)>("field").into_iter().flatten() {
                fields.push((key.clone(), FieldValue::Text(value.clone())));
            }
            for (key, value) in sub.get_many::<(String, String)>("list").into_iter().flatten() {
                let items = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                fields.push((key.clone(), FieldValue::List(items)));
            }
            if fields.is_empty() {
                bail!("nothing to update: pass --field or --list");
            }
            serde_json::to_value(platform.update_onboarding_data(section, fields)?)?
        }
        Some(("complete", sub)) => {
            select(&platform, sub)?;
            serde_json::to_value(platform.complete_onboarding()?)?
        }
        Some(("status", sub)) => status(&platform, &customer(sub)?)?,
        Some((other, _)) => bail!("unknown onboarding command: {other}"),
        None => bail!("no onboarding command given"),
    };

    if args.get_flag("write") {
        platform
            .export_dataset()
            .write_to(data)
            .with_context(|| format!("writing dataset {}", data.display()))?;
        tracing::info!(path = %data.display(), "dataset written");
    }

    Ok(serde_json::to_string_pretty(&output)?)
}

fn customer(args: &ArgMatches) -> Result<CustomerId> {
    Ok(CustomerId::from(string_arg(args, "customer")?))
}

fn phase(args: &ArgMatches) -> Result<PhaseId> {
    args.get_one::<u8>("phase")
        .map(|p| PhaseId(*p))
        .context("--phase is required")
}

fn select(platform: &CollabPlatform, args: &ArgMatches) -> Result<()> {
    platform.select_onboarding(&customer(args)?)?;
    Ok(())
}

fn status(platform: &CollabPlatform, customer_id: &CustomerId) -> Result<Value> {
    let store = platform.onboarding();
    let dossier = store
        .get_onboarding_by_customer_id(customer_id)
        .with_context(|| format!("no onboarding dossier for customer {customer_id}"))?;

    let mut missing = Map::new();
    for phase in store.catalog().ids() {
        let fields = store.missing_required_fields(customer_id, phase)?;
        if !fields.is_empty() {
            missing.insert(phase.to_string(), json!(fields));
        }
    }

    Ok(json!({
        "dossier": dossier,
        "nextIncompletePhase": store.next_incomplete_phase(customer_id),
        "missingRequiredFields": missing,
    }))
}
