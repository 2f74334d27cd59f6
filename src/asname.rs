use super::aggregate::find_group;
use super::error::Error;
use super::error::LoadStats;
use super::error::Result;

use std::collections::HashMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::str::FromStr;

pub const UNKNOWN_NAME: &str = "?";

const MARKER_WIDTH: usize = 2;
const ASN_WIDTH: usize = 12;

/* Byte offset of the `n`th character of `s`, or its length. */
fn char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

/// Splits a registry line into its AS number and name. The line holds a
/// two character marker, the AS number padded to twelve characters, then
/// free text.
pub fn parse_name_line(line: &str) -> Result<(u32, &str)> {
    let line = line.trim();
    let asn_start = char_offset(line, MARKER_WIDTH);
    let name_start = char_offset(line, MARKER_WIDTH + ASN_WIDTH);
    let asn_field = line[asn_start..name_start].trim();
    let as_number = u32::from_str(asn_field)
        .map_err(|_| Error::InvalidAsn(asn_field.to_owned()))?;
    Ok((as_number, line[name_start..].trim()))
}

/// Renders a name so it can be written as a single CSV field.
pub fn clean_name(name: &str) -> String {
    name.replace(',', " ")
        .replace('"', "")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// AS number to organisation name, from a registry dump.
#[derive(Clone, Debug, Default)]
pub struct AsNames {
    table: HashMap<u32, String>,
}

impl AsNames {
    pub fn new() -> AsNames {
        AsNames { table: HashMap::new() }
    }

    /// Reads a registry dump. The first name seen for an AS number is
    /// kept; later duplicates and unparsable lines are skipped.
    pub fn read_from<R: BufRead>(reader: R) -> Result<(AsNames, LoadStats)> {
        let mut names = AsNames::new();
        let mut stats = LoadStats::default();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::io("AS name registry", e))?;
            if line.trim().is_empty() {
                continue;
            }
            stats.rows += 1;
            match parse_name_line(&line) {
                Ok((as_number, name)) => {
                    if let Some(existing) = names.table.get(&as_number) {
                        debug!("Duplicate: {}, \"{}\" (\"{}\")",
                               as_number, name, existing);
                        continue;
                    }
                    names.table.insert(as_number, name.to_owned());
                },
                Err(e) => {
                    stats.skipped += 1;
                    warn!("Skipping line {}: {}", index + 1, e);
                },
            }
        }
        Ok((names, stats))
    }

    pub fn load(path: &str) -> Result<AsNames> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let (names, stats) = AsNames::read_from(BufReader::new(file))
            .map_err(|e| match e {
                Error::Io { source, .. } => Error::io(path, source),
                e => e,
            })?;
        info!("Loaded asname table of length {} from <{}>", names.len(), path);
        if stats.skipped > 0 {
            warn!("Skipped {} of {} lines in <{}>", stats.skipped, stats.rows, path);
        }
        Ok(names)
    }

    pub fn insert(&mut self, as_number: u32, name: &str) -> bool {
        match self.table.contains_key(&as_number) {
            true => false,
            false => {
                self.table.insert(as_number, name.to_owned());
                true
            }
        }
    }

    /// Registry name of `as_number`, else the name of the built-in
    /// aggregate with that number, else "?".
    pub fn name(&self, as_number: u32) -> &str {
        if let Some(name) = self.table.get(&as_number) {
            return name;
        }
        match find_group(as_number) {
            Some(group) => group.name,
            None => UNKNOWN_NAME,
        }
    }

    /// Country code of a built-in aggregate.
    pub fn country(&self, as_number: u32) -> Option<&'static str> {
        find_group(as_number).map(|group| group.country)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
