use std::path::PathBuf;
use std::str::FromStr;

use lazy_static::lazy_static;
use structopt::StructOpt;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const DEFAULT_INTERVAL: u64 = 5000;

lazy_static! {
    static ref DEFAULT_INTERVAL_STR: String = DEFAULT_INTERVAL.to_string();
}

#[derive(StructOpt, Debug, Clone)]
#[structopt(
name = "cpx",
global_settings(& [structopt::clap::AppSettings::ColoredHelp, structopt::clap::AppSettings::VersionlessSubcommands, structopt::clap::AppSettings::DeriveDisplayOrder]),
)]
/// Export checkpoint csv rows whose height lands on a fixed interval.
///
/// Reads height,hash rows and writes one {  height, "hash"}, entry per
/// qualifying row - ready to paste into a C array literal.
pub struct CliCfg {
    #[structopt(name = "file", parse(from_os_str), default_value = "checkpoints.csv")]
    /// Input csv of height,hash rows
    ///
    /// Use - to read from stdin instead of a file.
    pub file: PathBuf,

    #[structopt(short = "m", long = "multiple_of", name = "interval", default_value(& DEFAULT_INTERVAL_STR))]
    /// Keep rows whose height is an exact multiple of this
    ///
    /// Use 1 to keep every well-formed row.
    pub interval: u64,

    #[structopt(short = "w", long = "pad", name = "width", default_value = "8")]
    /// Right-align the height to at least this many characters
    pub pad: usize,

    #[structopt(short = "d", long = "input_delimiter", name = "delimiter", parse(try_from_str = escape_parser), default_value = ",")]
    /// Field delimiter
    ///
    /// Note:  \t == <tab>  \0 == <null>  \dVAL where VAL is decimal number for ascii from 0 to 127
    pub delimiter: char,

    #[structopt(long = "skip_header")]
    /// Skip the first (header) line
    pub skip_header: bool,

    #[structopt(long = "strict")]
    /// Abort on the first malformed row instead of skipping it with a warning
    pub strict: bool,

    #[structopt(long = "check_hashes")]
    /// Require every label to be a 64 digit hex block hash
    pub check_hashes: bool,

    #[structopt(long = "stats")]
    /// Write stats after processing
    pub stats: bool,

    #[structopt(short = "v", parse(from_occurrences))]
    /// Verbosity - use more than one v for greater detail
    pub verbose: usize,
}

fn escape_parser(s: &str) -> Result<char> {
    if s.starts_with("\\d") {
        match u8::from_str(&s[2..]) {
            Ok(v) if v <= 127 => Ok(v as char),
            _ => Err(format!("Expect delimiter escape decimal to a be a number between 0 and 127 but got: \"{}\"", &s[2..]))?,
        }
    } else {
        match s {
            "\\t" => Ok('\t'),
            "\\0" => Ok('\0'),
            _ => {
                if s.len() != 1 {
                    Err(format!("Delimiter not understood - must be 1 character OR \\t or \\0 or \\d<dec num>"))?
                }
                Ok(s.chars().next().unwrap())
            }
        }
    }
}

pub fn get_cli() -> Result<CliCfg> {
    let cfg: CliCfg = CliCfg::from_args();

    if cfg.interval == 0 {
        Err("interval must be 1 or greater - every height is checked with height % interval")?;
    }
    if !cfg.delimiter.is_ascii() {
        Err(format!("Delimiter must be a single ascii character, got \"{}\"", cfg.delimiter))?;
    }

    if cfg.verbose == 1 {
        eprintln!("CLI options: {:?}", cfg);
    } else if cfg.verbose > 1 {
        eprintln!("CLI options: {:#?}", cfg);
    }

    Ok(cfg)
}
