use super::address::checked_successor;
use super::address::last_address_of;
use super::address::parse_address;
use super::address::predecessor;
use super::address::Address;
use super::address::Network;
use super::error::Error;
use super::error::LoadStats;
use super::error::Result;
use super::overlap::OverlapTree;

use std::cmp::max;
use std::cmp::min;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;
use std::str::FromStr;

pub const HEADER: &str = "ip_first, ip_last, as_number";

/// A closed range of addresses attributed to one AS. AS 0 means no
/// attribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RangeEntry<A> {
    pub first: A,
    pub last: A,
    pub as_number: u32,
}

impl<A: Address> RangeEntry<A> {
    pub fn new(first: A, last: A, as_number: u32) -> RangeEntry<A> {
        RangeEntry { first, last, as_number }
    }

    pub fn contains(&self, addr: A) -> bool {
        self.first <= addr && addr <= self.last
    }
}

/// Sorted, disjoint address ranges of one family. Addresses that fall
/// between entries are attributed to AS 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeTable<A> {
    entries: Vec<RangeEntry<A>>,
}

impl<A: Address> Default for RangeTable<A> {
    fn default() -> RangeTable<A> {
        RangeTable::new()
    }
}

impl<A: Address> RangeTable<A> {
    pub fn new() -> RangeTable<A> {
        RangeTable { entries: Vec::new() }
    }

    /// Builds a table from entries that are already sorted and disjoint.
    pub fn from_entries(entries: Vec<RangeEntry<A>>) -> Result<RangeTable<A>> {
        let mut table = RangeTable { entries: Vec::with_capacity(entries.len()) };
        for entry in entries {
            table.check_next(&entry)?;
            table.entries.push(entry);
        }
        Ok(table)
    }

    /// Flattens an overlap tree into a table covering the whole space.
    pub fn from_tree(tree: &OverlapTree<A::Net>) -> RangeTable<A> {
        let mut table = RangeTable::new();
        table.add_ranges(tree);
        table
    }

    pub fn entries(&self) -> &[RangeEntry<A>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries explicitly attributed to AS 0.
    pub fn zero_count(&self) -> usize {
        self.entries.iter().filter(|e| e.as_number == 0).count()
    }

    fn check_next(&self, entry: &RangeEntry<A>) -> Result<()> {
        let in_order = entry.first <= entry.last
            && self.entries.last().map_or(true, |prev| prev.last < entry.first);
        match in_order {
            true => Ok(()),
            false => Err(Error::OutOfOrder {
                first: entry.first.to_string(),
                last: entry.last.to_string(),
            }),
        }
    }

    /// Appends a range after the current last entry.
    pub fn add(&mut self, first: A, last: A, as_number: u32) {
        let entry = RangeEntry::new(first, last, as_number);
        debug_assert!(self.check_next(&entry).is_ok(),
                      "range {}-{} breaks table order", first, last);
        self.entries.push(entry);
    }

    /// Appends the flattened ranges of `tree`.
    pub fn add_ranges(&mut self, tree: &OverlapTree<A::Net>) {
        for entry in tree.flatten() {
            self.add(entry.first, entry.last, entry.as_number);
        }
    }

    /// True if entries are strictly ascending and do not overlap.
    pub fn is_well_formed(&self) -> bool {
        self.entries.iter().all(|e| e.first <= e.last)
            && self.entries.windows(2).all(|w| w[0].last < w[1].first)
    }

    /// Merges neighbouring entries that carry the same AS number. Entries
    /// are only joined when they touch, or when both are AS 0, so no
    /// address changes attribution.
    pub fn collapse(&mut self) {
        if self.entries.len() < 2 {
            warn!("Cannot collapse table of length {}", self.entries.len());
            return;
        }
        let before = self.entries.len();
        let mut collapsed: Vec<RangeEntry<A>> = Vec::with_capacity(before);
        for entry in self.entries.drain(..) {
            if let Some(current) = collapsed.last_mut() {
                let touching = checked_successor(current.last) == Some(entry.first);
                if current.as_number == entry.as_number
                        && (touching || entry.as_number == 0) {
                    current.last = entry.last;
                    continue;
                }
            }
            collapsed.push(entry);
        }
        self.entries = collapsed;
        debug_assert!(self.is_well_formed());
        debug!("Collapsed {} ranges into {}", before, self.entries.len());
    }

    /// Fills the AS 0 ranges of this table from `other`. Ranges with a
    /// non-zero AS are kept as they are; within a zero range, every part
    /// covered by an entry of `other` takes that entry's AS number. Gaps
    /// between entries are filled the same way, but stay gaps where
    /// `other` has nothing either.
    pub fn merge(&self, other: &RangeTable<A>) -> RangeTable<A> {
        let space = <A::Net as Network>::whole_space();
        let mut merged: Vec<RangeEntry<A>> = Vec::with_capacity(self.len());
        let mut i_other = 0;
        let mut next = Some(space.network());

        for entry in self.entries.iter() {
            if let Some(start) = next {
                if start < entry.first {
                    fill_range(&other.entries, &mut i_other,
                               start, predecessor(entry.first),
                               false, &mut merged);
                }
            }
            match entry.as_number {
                0 => fill_range(&other.entries, &mut i_other,
                                entry.first, entry.last,
                                true, &mut merged),
                _ => merged.push(*entry),
            }
            next = checked_successor(entry.last);
        }
        if let Some(start) = next {
            fill_range(&other.entries, &mut i_other,
                       start, last_address_of(&space),
                       false, &mut merged);
        }

        let table = RangeTable { entries: merged };
        debug_assert!(table.is_well_formed());
        table
    }

    /// AS number of the range containing `addr`, or 0 if no range does.
    pub fn get_as_number(&self, addr: A) -> u32 {
        let index = self.entries.partition_point(|e| e.first <= addr);
        if index == 0 {
            return 0;
        }
        let entry = &self.entries[index - 1];
        match addr <= entry.last {
            true => entry.as_number,
            false => 0,
        }
    }

    /// As `get_as_number`, for an address in text form. Text that does
    /// not parse as an address of this family yields 0.
    pub fn get_as_number_text(&self, value: &str) -> u32 {
        match parse_address::<A>(value) {
            Ok(addr) => self.get_as_number(addr),
            Err(e) => {
                debug!("When evaluating <{}>: {}", value, e);
                0
            }
        }
    }

    /// Reads a table in ip2as CSV form. Rows that do not parse, or that
    /// would break the table order, are skipped and counted.
    pub fn read_from<R: Read>(reader: R) -> Result<(RangeTable<A>, LoadStats)> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut table = RangeTable::new();
        let mut stats = LoadStats::default();

        for (index, result) in csv_reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    if e.is_io_error() {
                        return Err(Error::from(e));
                    }
                    stats.rows += 1;
                    stats.skipped += 1;
                    warn!("Skipping unreadable row: {}", e);
                    continue;
                }
            };
            if index == 0 && record.get(0) == Some("ip_first") {
                continue;
            }
            stats.rows += 1;
            let line = record.position().map_or(0, |p| p.line());
            let parsed = parse_row::<A>(&record)
                .and_then(|entry| table.check_next(&entry).map(|_| entry));
            match parsed {
                Ok(entry) => table.entries.push(entry),
                Err(e) => {
                    stats.skipped += 1;
                    warn!("Skipping line {}: {}", line, e);
                }
            }
        }
        Ok((table, stats))
    }

    pub fn load(path: &str) -> Result<RangeTable<A>> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let (table, stats) = RangeTable::read_from(file)?;
        info!("From <{}>, loaded table of length {}", path, table.len());
        if stats.skipped > 0 {
            warn!("Skipped {} of {} rows in <{}>", stats.skipped, stats.rows, path);
        }
        Ok(table)
    }

    fn write_rows<W: Write>(&self, writer: W) -> io::Result<()> {
        let mut writer = BufWriter::new(writer);
        writeln!(writer, "{}", HEADER)?;
        let mut csv_writer = csv::Writer::from_writer(writer);
        for entry in self.entries.iter() {
            csv_writer.write_record(&[entry.first.to_string(),
                                      entry.last.to_string(),
                                      entry.as_number.to_string()])?;
        }
        csv_writer.flush()
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        self.write_rows(writer).map_err(|e| Error::io("ip2as table", e))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        self.write_rows(file).map_err(|e| Error::io(path, e))?;
        info!("Saved {} ranges in <{}>", self.len(), path);
        Ok(())
    }
}

/* Emits the parts of [first, last] covered by `others`, starting the scan
 * at `*i_other`. Uncovered parts become AS 0 entries when `keep_uncovered`
 * is set. */
fn fill_range<A: Address>(others: &[RangeEntry<A>],
                          i_other: &mut usize,
                          first: A,
                          last: A,
                          keep_uncovered: bool,
                          merged: &mut Vec<RangeEntry<A>>) {
    while *i_other < others.len() && others[*i_other].last < first {
        *i_other += 1;
    }

    let mut next = Some(first);
    while let Some(start) = next {
        let o = match others.get(*i_other) {
            Some(o) if o.first <= last => o,
            _ => break,
        };
        if o.first > start && keep_uncovered {
            merged.push(RangeEntry::new(start, predecessor(o.first), 0));
        }
        let from = max(start, o.first);
        let to = min(o.last, last);
        merged.push(RangeEntry::new(from, to, o.as_number));
        next = match to < last {
            true => checked_successor(to),
            false => None,
        };
        /* An entry reaching past `last` may also cover the next range. */
        if o.last > last {
            break;
        }
        *i_other += 1;
    }
    if let Some(start) = next {
        if keep_uncovered {
            merged.push(RangeEntry::new(start, last, 0));
        }
    }
}

fn parse_row<A: Address>(record: &csv::StringRecord) -> Result<RangeEntry<A>> {
    if record.len() < 3 {
        return Err(Error::FieldCount { expected: 3, found: record.len() });
    }
    let first: A = parse_address(&record[0])?;
    let last: A = parse_address(&record[1])?;
    let as_number = u32::from_str(&record[2])
        .map_err(|_| Error::InvalidAsn(record[2].to_owned()))?;
    Ok(RangeEntry::new(first, last, as_number))
}

pub type Ipv4RangeTable = RangeTable<Ipv4Addr>;
pub type Ipv6RangeTable = RangeTable<Ipv6Addr>;
