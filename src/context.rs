use super::aggregate::AggregateResolver;
use super::asname::clean_name;
use super::asname::AsNames;
use super::asname::UNKNOWN_NAME;
use super::error::Error;
use super::error::Result;
use super::table::Ipv4RangeTable;
use super::table::Ipv6RangeTable;

use regex::Regex;

use std::io::Write;
use std::net::IpAddr;
use std::str::FromStr;

lazy_static! {
    static ref ASN_REGEX: Regex = Regex::new(r"^(?i)AS(\d+)$").unwrap();
}

/// One line of lookup input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Query {
    Address(IpAddr),
    Asn(u32),
}

impl Query {
    pub fn parse(value: &str) -> Option<Query> {
        let value = value.trim();
        if let Ok(address) = IpAddr::from_str(value) {
            return Some(Query::Address(address));
        }
        let captures = ASN_REGEX.captures(value)?;
        let as_number = u32::from_str(captures.get(1)?.as_str()).ok()?;
        Some(Query::Asn(as_number))
    }
}

/// The IPv4 and IPv6 tables of one dataset, queried by address text.
#[derive(Clone, Debug, Default)]
pub struct Ip2As {
    pub ipv4: Ipv4RangeTable,
    pub ipv6: Ipv6RangeTable,
}

impl Ip2As {
    pub fn new(ipv4: Ipv4RangeTable, ipv6: Ipv6RangeTable) -> Ip2As {
        Ip2As { ipv4, ipv6 }
    }

    /// Loads whichever of the two tables is given; a missing family
    /// answers AS 0 for every address.
    pub fn from_files(ipv4_file: Option<&str>,
                      ipv6_file: Option<&str>) -> Result<Ip2As> {
        let ipv4 = match ipv4_file {
            Some(path) => Ipv4RangeTable::load(path)?,
            None => Ipv4RangeTable::new(),
        };
        let ipv6 = match ipv6_file {
            Some(path) => Ipv6RangeTable::load(path)?,
            None => Ipv6RangeTable::new(),
        };
        Ok(Ip2As { ipv4, ipv6 })
    }

    pub fn get_as_number_addr(&self, address: IpAddr) -> u32 {
        match address {
            IpAddr::V4(a) => self.ipv4.get_as_number(a),
            IpAddr::V6(a) => self.ipv6.get_as_number(a),
        }
    }

    /// AS number for an address in text form, 0 if it does not parse.
    pub fn get_as_number(&self, value: &str) -> u32 {
        match IpAddr::from_str(value.trim()) {
            Ok(address) => self.get_as_number_addr(address),
            Err(_) => {
                debug!("When evaluating <{}>: not an address", value);
                0
            }
        }
    }

    /// Resolves a query to an AS number and a display name. Addresses
    /// map through the tables, and the aggregate resolver when given.
    pub fn lookup(&self,
                  query: Query,
                  names: &AsNames,
                  aggregates: Option<&AggregateResolver>) -> (u32, String) {
        let mut as_number = match query {
            Query::Address(address) => self.get_as_number_addr(address),
            Query::Asn(as_number) => as_number,
        };
        if let Some(resolver) = aggregates {
            as_number = resolver.get_asn(as_number);
        }
        (as_number, names.name(as_number).to_owned())
    }

    /// Writes the `query,as_number,name` record answering `value`. The
    /// query is quoted when needed, so every record has three fields.
    pub fn answer<W: Write>(&self,
                            writer: &mut csv::Writer<W>,
                            value: &str,
                            names: &AsNames,
                            aggregates: Option<&AggregateResolver>) -> Result<()> {
        let value = value.trim();
        let (as_number, name) = match Query::parse(value) {
            Some(query) => self.lookup(query, names, aggregates),
            None => {
                warn!("Cannot parse query <{}>", value);
                (0, UNKNOWN_NAME.to_owned())
            }
        };
        writer.write_record(&[value.to_owned(), as_number.to_string(), clean_name(&name)])?;
        writer.flush().map_err(|e| Error::io("answer output", e))?;
        Ok(())
    }
}
