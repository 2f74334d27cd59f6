extern crate ip2as;

#[cfg(test)]
mod test_table {
    use ip2as::table::Ipv4RangeTable;
    use ip2as::table::Ipv6RangeTable;
    use ip2as::table::RangeEntry;
    use std::net::Ipv4Addr;
    use std::net::Ipv6Addr;
    use std::str::FromStr;

    fn addr(value: &str) -> Ipv4Addr {
        Ipv4Addr::from_str(value).unwrap()
    }

    fn entry(first: &str, last: &str, as_number: u32) -> RangeEntry<Ipv4Addr> {
        RangeEntry::new(addr(first), addr(last), as_number)
    }

    fn table(entries: Vec<RangeEntry<Ipv4Addr>>) -> Ipv4RangeTable {
        Ipv4RangeTable::from_entries(entries).unwrap()
    }

    #[test]
    fn lookup_empty() {
        let table = Ipv4RangeTable::new();
        assert_eq!(table.get_as_number(addr("1.2.3.4")), 0);
        assert_eq!(table.get_as_number_text("1.2.3.4"), 0);
    }

    #[test]
    fn lookup_with_gaps() {
        let table = table(vec![
            entry("1.0.0.0", "1.0.0.255", 13335),
            entry("1.0.4.0", "1.0.7.255", 38803),
            entry("1.0.8.0", "1.0.8.0", 7),
        ]);
        assert_eq!(table.get_as_number(addr("0.255.255.255")), 0);
        assert_eq!(table.get_as_number(addr("1.0.0.0")), 13335);
        assert_eq!(table.get_as_number(addr("1.0.0.255")), 13335);
        assert_eq!(table.get_as_number(addr("1.0.1.0")), 0);
        assert_eq!(table.get_as_number(addr("1.0.3.255")), 0);
        assert_eq!(table.get_as_number(addr("1.0.4.0")), 38803);
        assert_eq!(table.get_as_number(addr("1.0.7.255")), 38803);
        assert_eq!(table.get_as_number(addr("1.0.8.0")), 7);
        assert_eq!(table.get_as_number(addr("1.0.8.1")), 0);
        assert_eq!(table.get_as_number(addr("255.255.255.255")), 0);
    }

    #[test]
    fn lookup_bad_text() {
        let table = table(vec![entry("0.0.0.0", "255.255.255.255", 1)]);
        assert_eq!(table.get_as_number_text("10.0.0.1"), 1);
        assert_eq!(table.get_as_number_text(" 10.0.0.1 "), 1);
        assert_eq!(table.get_as_number_text("not an address"), 0);
        assert_eq!(table.get_as_number_text("::1"), 0);
        assert_eq!(table.get_as_number_text(""), 0);
    }

    #[test]
    fn from_entries_rejects_overlap() {
        let result = Ipv4RangeTable::from_entries(vec![
            entry("1.0.0.0", "1.0.0.255", 1),
            entry("1.0.0.255", "1.0.1.255", 2),
        ]);
        assert!(result.is_err());
        let result = Ipv4RangeTable::from_entries(vec![
            entry("1.0.1.0", "1.0.0.0", 1),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn collapse_joins_touching_ranges() {
        let mut table = table(vec![
            entry("0.0.0.0", "0.255.255.255", 0),
            entry("1.0.0.0", "1.0.0.255", 5),
            entry("1.0.1.0", "1.0.1.255", 5),
            entry("1.0.2.0", "1.0.2.255", 6),
            entry("1.0.3.0", "1.0.3.255", 5),
            entry("1.0.4.0", "255.255.255.255", 0),
        ]);
        table.collapse();
        assert_eq!(table.entries(), &[
            entry("0.0.0.0", "0.255.255.255", 0),
            entry("1.0.0.0", "1.0.1.255", 5),
            entry("1.0.2.0", "1.0.2.255", 6),
            entry("1.0.3.0", "1.0.3.255", 5),
            entry("1.0.4.0", "255.255.255.255", 0),
        ][..]);
        assert!(table.is_well_formed());
    }

    #[test]
    fn collapse_keeps_gaps() {
        let mut table = table(vec![
            entry("1.0.0.0", "1.0.0.255", 5),
            entry("1.0.2.0", "1.0.2.255", 5),
            entry("2.0.0.0", "2.0.0.255", 0),
            entry("3.0.0.0", "3.0.0.255", 0),
        ]);
        table.collapse();
        assert_eq!(table.entries(), &[
            entry("1.0.0.0", "1.0.0.255", 5),
            entry("1.0.2.0", "1.0.2.255", 5),
            entry("2.0.0.0", "3.0.0.255", 0),
        ][..]);
        assert_eq!(table.get_as_number(addr("1.0.1.1")), 0);
    }

    #[test]
    fn collapse_small_tables() {
        let mut empty = Ipv4RangeTable::new();
        empty.collapse();
        assert!(empty.is_empty());
        let mut single = table(vec![entry("1.0.0.0", "1.0.0.255", 5)]);
        single.collapse();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn collapse_is_idempotent() {
        let mut table = table(vec![
            entry("0.0.0.0", "0.0.0.9", 1),
            entry("0.0.0.10", "0.0.0.19", 1),
            entry("0.0.0.20", "0.0.0.29", 2),
            entry("0.0.0.30", "0.0.0.39", 2),
            entry("0.0.0.40", "0.0.0.49", 1),
        ]);
        table.collapse();
        let once = table.clone();
        table.collapse();
        assert_eq!(table, once);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn merge_fills_zero_ranges() {
        let base = table(vec![
            entry("0.0.0.0", "0.255.255.255", 0),
            entry("1.0.0.0", "1.0.0.255", 13335),
            entry("1.0.1.0", "1.0.3.255", 0),
            entry("1.0.4.0", "255.255.255.255", 0),
        ]);
        let other = table(vec![
            entry("0.0.0.0", "1.0.0.127", 9),
            entry("1.0.2.0", "1.0.2.255", 10),
            entry("1.0.3.128", "1.0.4.255", 11),
        ]);
        let merged = base.merge(&other);
        assert!(merged.is_well_formed());
        assert_eq!(merged.entries(), &[
            entry("0.0.0.0", "0.255.255.255", 9),
            entry("1.0.0.0", "1.0.0.255", 13335),
            entry("1.0.1.0", "1.0.1.255", 0),
            entry("1.0.2.0", "1.0.2.255", 10),
            entry("1.0.3.0", "1.0.3.127", 0),
            entry("1.0.3.128", "1.0.3.255", 11),
            entry("1.0.4.0", "1.0.4.255", 11),
            entry("1.0.5.0", "255.255.255.255", 0),
        ][..]);
    }

    #[test]
    fn merge_with_zero_other_stays_zero() {
        let base = table(vec![entry("0.0.0.0", "255.255.255.255", 0)]);
        let other = table(vec![entry("10.0.0.0", "10.255.255.255", 0)]);
        let merged = base.merge(&other);
        for value in &["0.0.0.1", "10.1.1.1", "200.0.0.1"] {
            assert_eq!(merged.get_as_number(addr(value)), 0);
        }
    }

    #[test]
    fn merge_fills_gaps_in_base() {
        let base = table(vec![entry("1.0.0.0", "1.0.0.255", 5)]);
        let other = table(vec![
            entry("0.0.0.0", "0.0.0.255", 1),
            entry("1.0.0.0", "1.0.1.255", 2),
        ]);
        let merged = base.merge(&other);
        assert_eq!(merged.entries(), &[
            entry("0.0.0.0", "0.0.0.255", 1),
            entry("1.0.0.0", "1.0.0.255", 5),
            entry("1.0.1.0", "1.0.1.255", 2),
        ][..]);

        let merged = Ipv4RangeTable::new().merge(&other);
        assert_eq!(merged, other);
    }

    #[test]
    fn zero_count() {
        let table = table(vec![
            entry("0.0.0.0", "0.255.255.255", 0),
            entry("1.0.0.0", "1.0.0.255", 13335),
            entry("1.0.1.0", "255.255.255.255", 0),
        ]);
        assert_eq!(table.zero_count(), 2);
    }

    #[test]
    fn ipv6_lookup() {
        let v6 = |s: &str| Ipv6Addr::from_str(s).unwrap();
        let table = Ipv6RangeTable::from_entries(vec![
            RangeEntry::new(v6("::"), v6("2001:1ff:ffff:ffff:ffff:ffff:ffff:ffff"), 0),
            RangeEntry::new(v6("2001:200::"), v6("2001:200:ffff:ffff:ffff:ffff:ffff:ffff"), 2500),
        ]).unwrap();
        assert_eq!(table.get_as_number(v6("2001:200::1")), 2500);
        assert_eq!(table.get_as_number(v6("2001:201::1")), 0);
        assert_eq!(table.get_as_number_text("2001:200:1::"), 2500);
        assert_eq!(table.get_as_number_text("1.2.3.4"), 0);
    }
}
