extern crate ip2as;
extern crate ipnet;

#[cfg(test)]
mod test_address {
    use ip2as::address::checked_predecessor;
    use ip2as::address::checked_successor;
    use ip2as::address::last_address_of;
    use ip2as::address::parse_address;
    use ip2as::address::parse_network;
    use ip2as::address::predecessor;
    use ip2as::address::successor;
    use ip2as::address::Network;
    use ip2as::error::Error;
    use ipnet::Ipv4Net;
    use ipnet::Ipv6Net;
    use std::net::Ipv4Addr;
    use std::net::Ipv6Addr;
    use std::str::FromStr;

    fn v4(value: &str) -> Ipv4Addr {
        Ipv4Addr::from_str(value).unwrap()
    }

    fn v6(value: &str) -> Ipv6Addr {
        Ipv6Addr::from_str(value).unwrap()
    }

    #[test]
    fn successor_carries() {
        assert_eq!(successor(v4("1.0.0.0")), v4("1.0.0.1"));
        assert_eq!(successor(v4("1.0.0.255")), v4("1.0.1.0"));
        assert_eq!(successor(v4("1.255.255.255")), v4("2.0.0.0"));
        assert_eq!(successor(v6("2001:db8::ffff")), v6("2001:db8::1:0"));
        assert_eq!(successor(v6("::ffff:ffff:ffff:ffff")), v6("0:0:0:1::"));
    }

    #[test]
    fn predecessor_borrows() {
        assert_eq!(predecessor(v4("1.0.0.1")), v4("1.0.0.0"));
        assert_eq!(predecessor(v4("1.0.1.0")), v4("1.0.0.255"));
        assert_eq!(predecessor(v4("2.0.0.0")), v4("1.255.255.255"));
        assert_eq!(predecessor(v6("2001:db8::1:0")), v6("2001:db8::ffff"));
    }

    #[test]
    fn extremes_saturate() {
        assert_eq!(successor(v4("255.255.255.255")), v4("255.255.255.255"));
        assert_eq!(predecessor(v4("0.0.0.0")), v4("0.0.0.0"));
        let all_ones = v6("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff");
        assert_eq!(successor(all_ones), all_ones);
        assert_eq!(predecessor(v6("::")), v6("::"));

        assert_eq!(checked_successor(v4("255.255.255.255")), None);
        assert_eq!(checked_predecessor(v4("0.0.0.0")), None);
        assert_eq!(checked_successor(all_ones), None);
        assert_eq!(checked_successor(v4("255.255.255.254")),
                   Some(v4("255.255.255.255")));
    }

    #[test]
    fn last_address() {
        let net = Ipv4Net::from_str("1.0.4.0/22").unwrap();
        assert_eq!(last_address_of(&net), v4("1.0.7.255"));
        let net = Ipv4Net::from_str("0.0.0.0/0").unwrap();
        assert_eq!(last_address_of(&net), v4("255.255.255.255"));
        let net = Ipv4Net::from_str("10.1.2.3/32").unwrap();
        assert_eq!(last_address_of(&net), v4("10.1.2.3"));
        let net = Ipv6Net::from_str("2001:db8::/32").unwrap();
        assert_eq!(last_address_of(&net),
                   v6("2001:db8:ffff:ffff:ffff:ffff:ffff:ffff"));
    }

    #[test]
    fn whole_space() {
        let space = Ipv4Net::whole_space();
        assert_eq!(space.prefix_len(), 0);
        assert_eq!(Network::network(&space), v4("0.0.0.0"));
        let space = Ipv6Net::whole_space();
        assert_eq!(last_address_of(&space),
                   v6("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff"));
    }

    #[test]
    fn subnet_checks_use_address_bytes() {
        let outer = Ipv4Net::from_str("1.0.4.0/22").unwrap();
        let inner = Ipv4Net::from_str("1.0.5.0/24").unwrap();
        let outside = Ipv4Net::from_str("1.0.8.0/24").unwrap();
        assert!(inner.subnet_of(&outer));
        assert!(outer.subnet_of(&outer));
        assert!(!outer.subnet_of(&inner));
        assert!(!outside.subnet_of(&outer));
    }

    #[test]
    fn parsing() {
        let net: Ipv4Net = parse_network(" 1.0.4.0/22 ").unwrap();
        assert_eq!(net, Ipv4Net::from_str("1.0.4.0/22").unwrap());
        match parse_network::<Ipv4Net>("1.0.5.7/22") {
            Err(Error::InvalidNetwork(value)) => assert_eq!(value, "1.0.5.7/22"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_network::<Ipv6Net>("2001:200:e00::1/40").is_err());
        assert!(parse_network::<Ipv4Net>("1.0.4.0/33").is_err());
        assert!(parse_network::<Ipv4Net>("2001:db8::/32").is_err());
        assert_eq!(parse_address::<Ipv4Addr>("8.8.8.8").unwrap(), v4("8.8.8.8"));
        assert!(parse_address::<Ipv4Addr>("::1").is_err());
        assert!(parse_address::<Ipv6Addr>("8.8.8.8").is_err());
    }
}
