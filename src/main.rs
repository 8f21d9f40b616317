//! qrforge command-line tool
//!
//! Encodes structured content into QR payloads and reports the symbol version
//! they need. Rejected requests exit with status 3; usage errors keep
//! clap's status 2.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use qrforge::history::{load_history, save_history, ColorScheme, GenerationHistory};
use qrforge::qr::{
    capacity_for, select, Accepted, ContentKind, ErrorCorrectionLevel, FieldSet,
    GenerationRequest, RequestValidator, Version, VersionChoice,
};
use qrforge::utils::engine_config::EngineConfig;
use qrforge::utils::logging;
use qrforge::{log_info, log_warn};

const LOG_MODULE: &str = "cli";

/// Exit status for a rejected request
const EXIT_REJECTED: i32 = 3;

#[derive(Parser, Debug)]
#[command(name = "qrforge", version, about = "QR payload encoding and capacity planning")]
struct Cli {
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Engine config file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// History file; overrides the config
    #[arg(long, global = true, value_name = "FILE")]
    history_file: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode content and validate it against a symbol size
    Encode(EncodeArgs),
    /// Show approximate capacity per version
    Capacity {
        /// Single version (1-40); all versions when omitted
        #[arg(long)]
        version: Option<u8>,
        #[arg(long)]
        level: Option<ErrorCorrectionLevel>,
    },
    /// Classify a raw payload and find the smallest version that holds it
    Classify {
        payload: String,
        #[arg(long)]
        level: Option<ErrorCorrectionLevel>,
    },
    /// List recorded generations, newest first
    History {
        /// Remove all records
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Content type (url, text, email, phone, sms, wifi, geo, event, vcard, app_link, social:<platform>)
    #[arg(long = "type", value_name = "TYPE")]
    content_type: ContentKind,

    /// Form field as key=value; repeatable
    #[arg(long = "field", short = 'f', value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    #[arg(long)]
    level: Option<ErrorCorrectionLevel>,

    /// "auto" or a version number
    #[arg(long)]
    version: Option<VersionChoice>,

    /// Wrap link content in a short link
    #[arg(long)]
    dynamic: bool,

    /// Append the accepted result to history
    #[arg(long)]
    record: bool,

    /// Foreground color for the history record
    #[arg(long, default_value = "#000000")]
    fg: String,

    /// Background color for the history record
    #[arg(long, default_value = "#FFFFFF")]
    bg: String,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {:?}", raw)),
    }
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if cli.debug || config.debug_logging {
        logging::enable_debug();
    }
    for warning in config.validate() {
        log_warn!(LOG_MODULE, "config warning", detail = warning);
    }

    let history_path = cli
        .history_file
        .clone()
        .or_else(|| config.history.path.clone());

    match cli.command {
        Command::Encode(args) => encode(args, &config, history_path.as_deref(), cli.json),
        Command::Capacity { version, level } => {
            capacity(version, level.unwrap_or(config.default_level), cli.json)?;
            Ok(0)
        }
        Command::Classify { payload, level } => {
            classify(&payload, level.unwrap_or(config.default_level), cli.json)?;
            Ok(0)
        }
        Command::History { clear } => {
            history(history_path.as_deref(), config.history.max_entries, clear, cli.json)?;
            Ok(0)
        }
    }
}

fn encode(
    args: EncodeArgs,
    config: &EngineConfig,
    history_path: Option<&Path>,
    json: bool,
) -> Result<i32> {
    let mut fields = FieldSet::new();
    for (key, value) in &args.fields {
        fields.insert(key, value.as_str());
    }

    let request = GenerationRequest::new(args.content_type, fields)
        .with_level(args.level.unwrap_or(config.default_level))
        .with_version(args.version.unwrap_or(config.default_version))
        .with_dynamic(args.dynamic);

    let validator = if request.dynamic {
        RequestValidator::with_dynamic(config.short_link.adapter()?)
    } else {
        RequestValidator::new()
    };

    let accepted = match validator.validate(&request) {
        Ok(accepted) => accepted,
        Err(rejection) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&rejection)?);
            } else {
                println!("rejected ({:?}): {}", rejection.reason(), rejection.detail());
            }
            return Ok(EXIT_REJECTED);
        }
    };

    if args.record {
        let path = history_path
            .ok_or_else(|| anyhow!("no history file configured; pass --history-file"))?;
        let colors = ColorScheme::new(&args.fg, &args.bg)?;
        let mut history = load_history(path, config.history.max_entries)?;
        let record = history.record(&accepted, colors);
        save_history(&history, path)?;
        log_info!(LOG_MODULE, "recorded generation", id = record.id);
    }

    print_accepted(&accepted, json)?;
    Ok(0)
}

fn print_accepted(accepted: &Accepted, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&accepted.encoded)?);
        return Ok(());
    }

    let encoded = &accepted.encoded;
    println!("payload:  {}", encoded.raw_string);
    if let Some(source) = &encoded.short_link_source {
        println!("target:   {}", source);
    }
    println!("type:     {}", encoded.content_type);
    println!(
        "alphabet: {} ({} bytes)",
        encoded.alphabet_class, encoded.byte_length
    );
    println!(
        "version:  {} (smallest fitting {}), level {}",
        accepted.version, encoded.required_version, encoded.level
    );
    Ok(())
}

fn capacity(version: Option<u8>, level: ErrorCorrectionLevel, json: bool) -> Result<()> {
    let versions: Vec<Version> = match version {
        Some(v) => vec![Version::try_from(v)?],
        None => Version::all().collect(),
    };
    let rows: Vec<_> = versions.into_iter().map(|v| capacity_for(v, level)).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:>7} {:>5} {:>8} {:>12} {:>6} {:>6}   (level {})",
        "version", "side", "numeric", "alphanumeric", "byte", "kanji", level
    );
    for info in rows {
        println!(
            "{:>7} {:>5} {:>8} {:>12} {:>6} {:>6}",
            info.version,
            info.module_side,
            info.capacity.numeric,
            info.capacity.alphanumeric,
            info.capacity.byte,
            info.capacity.kanji
        );
    }
    Ok(())
}

fn classify(payload: &str, level: ErrorCorrectionLevel, json: bool) -> Result<()> {
    let selection = select(payload, level);
    if json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else if selection.fits {
        println!(
            "{} ({} bytes): version {} at level {}",
            selection.alphabet, selection.byte_length, selection.version, level
        );
    } else {
        println!(
            "{} ({} bytes): does not fit version {} at level {}",
            selection.alphabet, selection.byte_length, selection.version, level
        );
    }
    Ok(())
}

fn history(path: Option<&Path>, max_entries: usize, clear: bool, json: bool) -> Result<()> {
    let Some(path) = path else {
        bail!("no history file configured; pass --history-file");
    };

    let mut history: GenerationHistory = load_history(path, max_entries)
        .with_context(|| format!("loading {}", path.display()))?;

    if clear {
        history.clear();
        save_history(&history, path)?;
        if !json {
            println!("history cleared");
        }
        return Ok(());
    }

    if json {
        let records: Vec<_> = history.entries().collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if history.is_empty() {
        println!("no recorded generations");
    }
    for record in history.entries() {
        println!(
            "{}  {:<16} v{:<2} {}  {}",
            record.id,
            record.content_type.to_string(),
            record.version,
            record.level,
            record.raw_string
        );
    }
    Ok(())
}
