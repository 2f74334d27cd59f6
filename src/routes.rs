use super::address::parse_network;
use super::address::Network;
use super::error::Error;
use super::error::LoadStats;
use super::error::Result;
use super::overlap::OverlapTree;

use flate2::read::GzDecoder;

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::str::FromStr;

/// Parses one route dump line of the form `1.0.4.0/22 38803`.
pub fn parse_route<N: Network>(line: &str) -> Result<(N, u32)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(Error::FieldCount { expected: 2, found: parts.len() });
    }
    let net = parse_network::<N>(parts[0])?;
    let as_number = u32::from_str(parts[1])
        .map_err(|_| Error::InvalidAsn(parts[1].to_owned()))?;
    Ok((net, as_number))
}

/// Opens a route dump, decompressing it if the name ends in `.gz`.
pub fn open_dump(path: &str) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    match path.ends_with(".gz") {
        true => Ok(Box::new(BufReader::new(GzDecoder::new(file)))),
        false => Ok(Box::new(BufReader::new(file))),
    }
}

/// Inserts every route of a dump into `tree`, then drops the prefixes
/// that add nothing to their enclosing prefix. The dump is expected to be
/// sorted by network address; malformed lines are logged and skipped.
pub fn read_routes<N: Network, R: BufRead>(reader: R,
                                           tree: &mut OverlapTree<N>)
        -> Result<LoadStats> {
    let mut stats = LoadStats::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io("route dump", e))?;
        if line.trim().is_empty() {
            continue;
        }
        stats.rows += 1;
        match parse_route::<N>(&line) {
            Ok((net, as_number)) => {
                tree.insert(net, as_number, true);
            },
            Err(e) => {
                stats.skipped += 1;
                warn!("Malformed route on line {} <{}>: {}",
                      index + 1, line.trim(), e);
            },
        }
    }
    tree.elide_redundant();
    Ok(stats)
}

pub fn load_routes<N: Network>(path: &str) -> Result<(OverlapTree<N>, LoadStats)> {
    let reader = open_dump(path)?;
    let mut tree = OverlapTree::new();
    let stats = read_routes(reader, &mut tree).map_err(|e| match e {
        Error::Io { source, .. } => Error::io(path, source),
        e => e,
    })?;
    info!("Read {} lines from <{}>, {} prefixes kept, {} elided, {} skipped",
          stats.rows, path, tree.len() - 1, tree.elided(), stats.skipped);
    Ok((tree, stats))
}
