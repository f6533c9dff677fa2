use csv::StringRecord;
use lazy_static::lazy_static;
use regex::Regex;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

lazy_static! {
    static ref BLOCK_HASH_RE: Regex = Regex::new("^[0-9a-fA-F]{64}$").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub height: u64,
    pub hash: String,
}

/// Build a Checkpoint from one csv record.  Field 0 is the height; the
/// hash is everything past the first delimiter, so labels containing the
/// delimiter survive intact.  A row with no second field gets an empty
/// hash.
pub fn parse_record(rec: &StringRecord, delimiter: char) -> Result<Checkpoint> {
    let first = match rec.get(0) {
        Some(f) => f,
        None => Err("empty record")?,
    };
    // stoull-style tolerance for padded height columns
    let height = match first.trim().parse::<u64>() {
        Ok(h) => h,
        Err(_) => Err(format!("cannot parse height from \"{}\" as a non-negative base-10 integer", first))?,
    };

    let mut hash = String::new();
    for i in 1..rec.len() {
        if i > 1 {
            hash.push(delimiter);
        }
        hash.push_str(&rec[i]);
    }

    Ok(Checkpoint { height, hash })
}

pub fn is_block_hash(s: &str) -> bool {
    BLOCK_HASH_RE.is_match(s)
}

/// Render one array-literal entry: {<height right-aligned to width>, "<hash>"},
pub fn format_entry(cp: &Checkpoint, width: usize) -> String {
    format!("{{{:>w$}, \"{}\"}},", cp.height, cp.hash, w = width)
}

#[test]
fn test_format_entry() {
    for t in &[
        (0u64, "start", 8, "{       0, \"start\"},"),
        (5000u64, "checkpointA", 8, "{    5000, \"checkpointA\"},"),
        (1000u64, "a", 4, "{1000, \"a\"},"),
        (123000u64, "c", 4, "{123000, \"c\"},"),
        (75000u64, "", 8, "{   75000, \"\"},"),
    ] {
        let cp = Checkpoint { height: t.0, hash: t.1.to_string() };
        assert_eq!(format_entry(&cp, t.2), t.3);
    }
}

#[test]
fn test_parse_record_rest_of_line() -> Result<()> {
    let rec = StringRecord::from(vec!["5000", "label", "with", "commas"]);
    let cp = parse_record(&rec, ',')?;
    assert_eq!(cp.height, 5000);
    assert_eq!(cp.hash, "label,with,commas");

    let rec = StringRecord::from(vec![" 75000 ", "abc"]);
    let cp = parse_record(&rec, ',')?;
    assert_eq!(cp.height, 75000);

    let rec = StringRecord::from(vec!["120000"]);
    let cp = parse_record(&rec, ',')?;
    assert_eq!(cp.hash, "");
    Ok(())
}

#[test]
fn test_parse_record_rejects_junk() {
    for bad in &["", "ten", "5000.5", "-1", "99999999999999999999999999"] {
        let rec = StringRecord::from(vec![*bad, "h"]);
        assert!(parse_record(&rec, ',').is_err(), "expected parse failure for height \"{}\"", bad);
    }
}

#[test]
fn test_is_block_hash() {
    let good = "7fb97df81221dd1366051b2d0bc7f49c66c22ac4431d879c895b06d66ef66f4c";
    assert!(is_block_hash(good));
    assert!(is_block_hash(&good.to_uppercase()));
    assert!(!is_block_hash("notahash"));
    assert!(!is_block_hash(&good[1..]));
    assert!(!is_block_hash(&format!("{}0", good)));
    assert!(!is_block_hash(""));
}
