// src/cli.rs
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use log::{info, warn, LevelFilter};

use crate::breakdown::MatchRecord;
use crate::config::consts::{DEFAULT_LOG_FILE, EXTRA_INFO_EXT};
use crate::config::options::ParseConfig;
use crate::overlay::{self, ExtraMatchInfo};
use crate::specs;
use crate::tba::{resolve_match_code, BracketType, MatchLevel};

#[derive(Debug, Parser)]
#[command(name = "fms_scrape", version)]
#[command(about = "Convert a saved FMS match report into a results API score breakdown")]
pub struct CliOptions {
    /// Saved match report page, e.g. `12-Q12.html`
    #[arg(required_unless_present = "template")]
    pub report: Option<PathBuf>,

    /// Game season of the report
    #[arg(short = 'y', long, required_unless_present = "template")]
    pub season: Option<u16>,

    #[arg(long, value_enum, default_value_t = MatchLevel::Qualification)]
    pub level: MatchLevel,

    /// FMS match number; taken from the file name prefix when omitted
    #[arg(short = 'm', long)]
    pub match_number: Option<u32>,

    #[arg(long, value_enum, default_value_t = BracketType::Bracket8Team)]
    pub bracket: BracketType,

    /// Bonus ranking point toggles in season order, e.g. `true,false`
    #[arg(long, value_delimiter = ',')]
    pub extra_rp: Vec<bool>,

    /// Extra match info file; defaults to the report's `.extrajson` sibling
    #[arg(long)]
    pub extra: Option<PathBuf>,

    /// Skip the required field check
    #[arg(long)]
    pub lenient: bool,

    /// Write the JSON here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Print a blank extra match info file for a season and exit
    #[arg(long, value_name = "SEASON")]
    pub template: Option<u16>,

    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log debug messages
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    color_eyre::install()?;
    let opts = CliOptions::parse();

    let level = if opts.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    crate::log::init(&opts.log_file, level).wrap_err("installing logger")?;

    if let Some(season) = opts.template {
        let template = ExtraMatchInfo::template(season)?;
        return emit(&serde_json::to_string_pretty(&template)?, opts.out.as_deref());
    }

    let report = opts.report.as_deref().ok_or_else(|| eyre!("no report file given"))?;
    let season = opts.season.ok_or_else(|| eyre!("--season is required"))?;
    let record = convert(report, season, &opts)?;
    emit(&serde_json::to_string_pretty(&record)?, opts.out.as_deref())
}

/// Parse one report file and apply its extra match info. Extra match info
/// that can't be read or applied is logged and left out.
pub fn convert(report: &Path, season: u16, opts: &CliOptions) -> Result<MatchRecord> {
    let html = fs::read_to_string(report).wrap_err_with(|| format!("reading {}", report.display()))?;
    // read first for its playoff level, applied once the report parses
    let extra = load_extra(report, opts.extra.as_deref());

    let default_playoff = opts.level == MatchLevel::Playoff;
    let config = ParseConfig {
        is_playoff: extra.as_ref().map_or(default_playoff, |e| e.is_playoff(default_playoff)),
        enabled_extra_ranking_points: opts.extra_rp.clone(),
        require_all_fields: !opts.lenient,
    };
    info!("parsing {} as {season} (playoff: {})", report.display(), config.is_playoff);

    let mut breakdown = specs::parse_html(season, &html, &config)
        .wrap_err_with(|| format!("failed to parse {}", report.display()))?;

    let extra = match extra {
        Ok(extra) => match overlay::apply(&mut breakdown, &extra) {
            Ok(()) => extra,
            Err(e) => {
                warn!("{}: extra match info not applied: {e}", report.display());
                ExtraMatchInfo::default()
            }
        },
        Err(e) => {
            warn!("{}: extra match info not applied: {e:#}", report.display());
            ExtraMatchInfo::default()
        }
    };

    let match_number = opts.match_number.or_else(|| match_number_from_name(report));
    let code = match match_number {
        Some(n) => resolve_match_code(opts.level, n, opts.bracket, extra.match_code_override.as_ref()),
        None => extra.match_code_override.clone(),
    };
    if code.is_none() {
        info!("{}: no match code", report.display());
    }
    Ok(MatchRecord { code, breakdown })
}

/// A missing sibling file is no overlay; a missing `--extra` file is an error.
fn load_extra(report: &Path, explicit: Option<&Path>) -> Result<ExtraMatchInfo> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (extra_path(report), false),
    };
    if !required && !path.is_file() {
        return Ok(ExtraMatchInfo::default());
    }
    let raw = fs::read_to_string(&path).wrap_err_with(|| format!("reading {}", path.display()))?;
    info!("using extra match info {}", path.display());
    ExtraMatchInfo::from_json(&raw).wrap_err_with(|| format!("in {}", path.display()))
}

pub fn extra_path(report: &Path) -> PathBuf {
    report.with_extension(EXTRA_INFO_EXT)
}

/// Saved reports are named `<match number>-<anything>.html`.
pub fn match_number_from_name(report: &Path) -> Option<u32> {
    let stem = report.file_stem()?.to_str()?;
    stem.split('-').next()?.trim().parse().ok()
}

fn emit(json: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => fs::write(path, json).wrap_err_with(|| format!("writing {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
