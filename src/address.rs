use super::error::Error;
use super::error::Result;

use ipnet::Ipv4Net;
use ipnet::Ipv6Net;

use std::fmt::Debug;
use std::fmt::Display;
use std::hash::Hash;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;
use std::str::FromStr;

/// An address of one family, seen as a fixed-width big-endian byte
/// string. Ordering is unsigned byte comparison.
pub trait Address: Copy + Ord + Hash + Debug + Display + FromStr {
    type Octets: AsRef<[u8]> + AsMut<[u8]> + Copy;
    type Net: Network<Addr = Self>;

    fn octets(&self) -> Self::Octets;
    fn from_octets(octets: Self::Octets) -> Self;
}

/// A CIDR network of one family.
pub trait Network: Copy + Eq + Debug + Display + FromStr {
    type Addr: Address<Net = Self>;

    fn network(&self) -> Self::Addr;
    fn hostmask(&self) -> Self::Addr;
    fn prefix_len(&self) -> u8;
    /* Zeroes the host bits, so that network() is the first address. */
    fn trunc(&self) -> Self;
    fn subnet_of(&self, other: &Self) -> bool;
    /// The network covering the whole address space (0.0.0.0/0 or ::/0).
    fn whole_space() -> Self;
}

macro_rules! impl_address {
    ($addr_type: ident, $net_type: ident, $width: expr) => {
        impl Address for $addr_type {
            type Octets = [u8; $width];
            type Net = $net_type;

            fn octets(&self) -> [u8; $width] {
                $addr_type::octets(self)
            }

            fn from_octets(octets: [u8; $width]) -> $addr_type {
                $addr_type::from(octets)
            }
        }

        impl Network for $net_type {
            type Addr = $addr_type;

            fn network(&self) -> $addr_type {
                $net_type::network(self)
            }

            fn hostmask(&self) -> $addr_type {
                $net_type::hostmask(self)
            }

            fn prefix_len(&self) -> u8 {
                $net_type::prefix_len(self)
            }

            fn trunc(&self) -> $net_type {
                $net_type::trunc(self)
            }

            fn subnet_of(&self, other: &$net_type) -> bool {
                other.contains(self)
            }

            fn whole_space() -> $net_type {
                $net_type::default()
            }
        }
    }
}

impl_address!(Ipv4Addr, Ipv4Net, 4);
impl_address!(Ipv6Addr, Ipv6Net, 16);

/// Last address of a network: the base bytes ORed with the host mask.
pub fn last_address_of<N: Network>(net: &N) -> N::Addr {
    let mut octets = net.network().octets();
    let mask = net.hostmask().octets();
    for (byte, mask_byte) in octets.as_mut().iter_mut().zip(mask.as_ref()) {
        *byte |= *mask_byte;
    }
    N::Addr::from_octets(octets)
}

/// The address after `addr`, or `None` if `addr` is the all-ones address.
pub fn checked_successor<A: Address>(addr: A) -> Option<A> {
    let mut octets = addr.octets();
    for byte in octets.as_mut().iter_mut().rev() {
        if *byte == 0xff {
            *byte = 0;
        } else {
            *byte += 1;
            return Some(A::from_octets(octets));
        }
    }
    None
}

/// The address before `addr`, or `None` if `addr` is the all-zero address.
pub fn checked_predecessor<A: Address>(addr: A) -> Option<A> {
    let mut octets = addr.octets();
    for byte in octets.as_mut().iter_mut().rev() {
        if *byte == 0 {
            *byte = 0xff;
        } else {
            *byte -= 1;
            return Some(A::from_octets(octets));
        }
    }
    None
}

/// Adds one to `addr`. Saturates: the successor of the all-ones address
/// is the all-ones address.
pub fn successor<A: Address>(addr: A) -> A {
    checked_successor(addr).unwrap_or(addr)
}

/// Subtracts one from `addr`. Saturates at the all-zero address.
pub fn predecessor<A: Address>(addr: A) -> A {
    checked_predecessor(addr).unwrap_or(addr)
}

pub fn parse_address<A: Address>(value: &str) -> Result<A> {
    let value = value.trim();
    A::from_str(value).map_err(|_| Error::InvalidAddress(value.to_owned()))
}

/// Parses a network in CIDR form. A network with host bits set, such as
/// `1.0.4.1/22`, is rejected.
pub fn parse_network<N: Network>(value: &str) -> Result<N> {
    let value = value.trim();
    match N::from_str(value) {
        Ok(net) if net == net.trunc() => Ok(net),
        _ => Err(Error::InvalidNetwork(value.to_owned())),
    }
}
