use super::address::parse_address;
use super::address::Address;
use super::address::Network;
use super::error::Error;
use super::error::Result;
use super::routes::load_routes;
use super::table::RangeTable;

use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// An older table whose attributions fill the AS 0 ranges of the new one.
    pub merge_with: Option<String>,
    pub collapse: bool,
}

impl Default for BuildOptions {
    fn default() -> BuildOptions {
        BuildOptions { merge_with: None, collapse: true }
    }
}

/// Builds a range table from a route dump: every prefix goes into an
/// overlap tree, the tree is flattened, optionally merged with an older
/// table, and collapsed.
pub fn build_table<N: Network>(routes_path: &str, options: &BuildOptions)
        -> Result<RangeTable<N::Addr>> {
    let (tree, _) = load_routes::<N>(routes_path)?;
    let mut table: RangeTable<N::Addr> = RangeTable::from_tree(&tree);
    debug_assert!(table.entries().iter().all(|e| {
        tree.find_asn(e.first) == e.as_number && tree.find_asn(e.last) == e.as_number
    }));
    info!("Found {} ranges, {} zeroes", table.len(), table.zero_count());

    if let Some(ref old_path) = options.merge_with {
        let old_table: RangeTable<N::Addr> = RangeTable::load(old_path)?;
        info!("Found {} in old table, {} zeroes",
              old_table.len(), old_table.zero_count());
        table = table.merge(&old_table);
        info!("After merge, {} ranges, {} zeroes", table.len(), table.zero_count());
    }

    if options.collapse {
        table.collapse();
        info!("Kept {} ranges after collapse, {} zeroes",
              table.len(), table.zero_count());
    }
    Ok(table)
}

/// An expected attribution, written `ADDRESS=ASN`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Check<A> {
    pub address: A,
    pub as_number: u32,
}

impl<A: Address> FromStr for Check<A> {
    type Err = Error;

    fn from_str(value: &str) -> Result<Check<A>> {
        let mut parts = value.splitn(2, '=');
        let address = parts.next().unwrap_or("");
        let as_number = parts.next()
            .ok_or_else(|| Error::FieldCount { expected: 2, found: 1 })?;
        Ok(Check {
            address: parse_address(address)?,
            as_number: u32::from_str(as_number.trim())
                .map_err(|_| Error::InvalidAsn(as_number.to_owned()))?,
        })
    }
}

/// Returns the checks the table does not satisfy, with the AS number the
/// table actually gives.
pub fn verify<A: Address>(table: &RangeTable<A>, checks: &[Check<A>])
        -> Vec<(Check<A>, u32)> {
    checks.iter()
        .map(|check| (*check, table.get_as_number(check.address)))
        .filter(|&(check, found)| found != check.as_number)
        .collect()
}
