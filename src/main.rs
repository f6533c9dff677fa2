use std::collections::HashSet;
use std::io::prelude::*;
use std::io::BufWriter;
use std::time::Instant;

use atty::Stream;
use cpu_time::ProcessTime;
use grep_cli::DecompressionReader;

mod checkpoint;
mod cli;

use checkpoint::{format_entry, is_block_hash, parse_record};
use cli::{get_cli, CliCfg};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", &err);
        std::process::exit(1);
    }
}

#[derive(Debug, Default)]
struct Totals {
    rows: usize,
    emitted: usize,
    skipped: usize,
}

fn run() -> Result<()> {
    let start_f = Instant::now();
    let startcpu = ProcessTime::now();

    let cfg = get_cli()?;

    let stdout = std::io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    let totals = if cfg.file.to_str() == Some("-") {
        if atty::is(Stream::Stderr) {
            eprintln!("<<< reading from stdin");
        }
        let stdin = std::io::stdin();
        filter_checkpoints(&cfg, "STDIO", stdin.lock(), &mut writer)?
    } else {
        if cfg.verbose >= 1 {
            eprintln!("processing file: {}", cfg.file.display());
        }
        let rdr = match DecompressionReader::new(&cfg.file) {
            Ok(rdr) => rdr,
            Err(err) => Err(format!("cannot open checkpoints file \"{}\": {}", cfg.file.display(), err))?,
        };
        let fname = cfg.file.display().to_string();
        filter_checkpoints(&cfg, &fname, rdr, &mut writer)?
    };
    writer.flush()?;

    if cfg.verbose >= 1 || cfg.stats {
        let elapsed = start_f.elapsed();
        let sec: f64 = (elapsed.as_secs() as f64) + (elapsed.subsec_nanos() as f64 / 1_000_000_000.0);
        let elapsedcpu = startcpu.elapsed();
        let seccpu: f64 = (elapsedcpu.as_secs() as f64) + (elapsedcpu.subsec_nanos() as f64 / 1_000_000_000.0);
        eprintln!(
            "rows: {}  emitted: {}  skipped: {}  time: {:.3}  cpu: {:.3}",
            totals.rows, totals.emitted, totals.skipped, sec, seccpu
        );
    }
    Ok(())
}

fn filter_checkpoints<R, W>(cfg: &CliCfg, fname: &str, input: R, writer: &mut W) -> Result<Totals>
where
    R: Read,
    W: Write,
{
    let mut builder = csv::ReaderBuilder::new();
    builder.delimiter(cfg.delimiter as u8).has_headers(cfg.skip_header).flexible(true);
    let mut rdr = builder.from_reader(input);

    let mut totals = Totals::default();
    let mut seen_heights: HashSet<u64> = HashSet::new();
    let mut record = csv::StringRecord::new();

    while rdr.read_record(&mut record)? {
        totals.rows += 1;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let cp = match parse_record(&record, cfg.delimiter) {
            Ok(cp) => cp,
            Err(e) => {
                bad_row(cfg, &mut totals, fname, line, &format!("{}", e))?;
                continue;
            }
        };
        if !seen_heights.insert(cp.height) {
            bad_row(cfg, &mut totals, fname, line, &format!("duplicate height {}", cp.height))?;
            continue;
        }
        if cfg.check_hashes && !is_block_hash(&cp.hash) {
            bad_row(cfg, &mut totals, fname, line, &format!("label \"{}\" is not a 64 digit hex block hash", cp.hash))?;
            continue;
        }

        if cp.height % cfg.interval == 0 {
            writeln!(writer, "{}", format_entry(&cp, cfg.pad))?;
            totals.emitted += 1;
        } else if cfg.verbose > 2 {
            eprintln!("DBG: height {} not on interval {}", cp.height, cfg.interval);
        }
    }
    Ok(totals)
}

// warn-and-skip by default, fatal under --strict
fn bad_row(cfg: &CliCfg, totals: &mut Totals, fname: &str, line: u64, why: &str) -> Result<()> {
    if cfg.strict {
        Err(format!("{}:{}: {}", fname, line, why))?;
    }
    totals.skipped += 1;
    eprintln!("skipping row {}:{}: {}", fname, line, why);
    Ok(())
}
