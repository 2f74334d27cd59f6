use std::collections::HashMap;

/// Aggregate AS numbers are synthetic and start here.
pub const AGGREGATE_BASE: u32 = 9_000_000;

/// Several AS numbers operated by one organisation, counted as one
/// entity in statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AggregateGroup {
    pub as_number: u32,
    pub name: &'static str,
    pub country: &'static str,
    pub members: &'static [u32],
}

pub const AGGREGATE_GROUPS: &[AggregateGroup] = &[
    AggregateGroup {
        as_number: 9_999_999,
        name: "AKAMAI (multiple Ases)",
        country: "ZZ",
        members: &[33905, 16625, 20940, 21342],
    },
    AggregateGroup {
        as_number: 9_999_998,
        name: "AMAZON & AWS (multiple Ases)",
        country: "ZZ",
        members: &[8987, 16509, 14618, 44298],
    },
    AggregateGroup {
        as_number: 9_999_997,
        name: "Cloudflare (multiple Ases)",
        country: "ZZ",
        members: &[13335, 209242],
    },
    AggregateGroup {
        as_number: 9_999_996,
        name: "Google (multiple Ases)",
        country: "US",
        members: &[15169, 19527, 16591, 396982],
    },
    AggregateGroup {
        as_number: 9_999_995,
        name: "MICROSOFT (multiple Ases)",
        country: "US",
        members: &[3598, 8068, 8069, 8070, 8075],
    },
    AggregateGroup {
        as_number: 9_999_994,
        name: "OVH (multiple Ases)",
        country: "FR",
        members: &[16276, 35540],
    },
];

pub fn is_aggregate(as_number: u32) -> bool {
    as_number >= AGGREGATE_BASE
}

/// Looks up the built-in group with the given aggregate AS number.
pub fn find_group(as_number: u32) -> Option<&'static AggregateGroup> {
    AGGREGATE_GROUPS.iter().find(|g| g.as_number == as_number)
}

/// Maps member AS numbers to the aggregate they belong to. Built once
/// and passed by reference to whatever needs it.
#[derive(Clone, Debug)]
pub struct AggregateResolver {
    aggregate: HashMap<u32, u32>,
}

impl AggregateResolver {
    pub fn new() -> AggregateResolver {
        AggregateResolver::from_groups(AGGREGATE_GROUPS)
    }

    pub fn from_groups(groups: &[AggregateGroup]) -> AggregateResolver {
        let mut aggregate = HashMap::new();
        for group in groups.iter() {
            debug_assert!(is_aggregate(group.as_number),
                          "aggregate AS {} below the reserved range", group.as_number);
            for &member in group.members.iter() {
                aggregate.insert(member, group.as_number);
            }
        }
        AggregateResolver { aggregate }
    }

    /// The aggregate AS number for `as_number`, or `as_number` itself if
    /// it does not belong to a group.
    pub fn get_asn(&self, as_number: u32) -> u32 {
        match self.aggregate.get(&as_number) {
            Some(&aggregate) => aggregate,
            None => as_number,
        }
    }

    /// Member AS numbers of an aggregate, in ascending order.
    pub fn members(&self, aggregate: u32) -> Vec<u32> {
        let mut members: Vec<u32> = self.aggregate.iter()
            .filter(|&(_, &a)| a == aggregate)
            .map(|(&m, _)| m)
            .collect();
        members.sort();
        members
    }

    pub fn len(&self) -> usize {
        self.aggregate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregate.is_empty()
    }
}

impl Default for AggregateResolver {
    fn default() -> AggregateResolver {
        AggregateResolver::new()
    }
}
