use super::address::checked_successor;
use super::address::last_address_of;
use super::address::predecessor;
use super::address::Network;
use super::table::RangeEntry;

use ipnet::Ipv4Net;
use ipnet::Ipv6Net;

use std::mem;

pub const ROOT: usize = 0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlapNode<N> {
    pub net: N,
    pub as_number: u32,
    /* Indices into the arena, in address order. */
    pub children: Vec<usize>,
}

/// Containment tree of announced prefixes for one address family.
///
/// Nodes live in a flat arena. The root covers the whole address space
/// with AS 0. Every child is a proper subnet of its parent, siblings
/// never overlap, and siblings are kept in address order, so that the
/// deepest node containing an address is its longest-prefix match.
#[derive(Clone, Debug)]
pub struct OverlapTree<N> {
    nodes: Vec<OverlapNode<N>>,
    elided: usize,
}

impl<N: Network> OverlapTree<N> {
    pub fn new() -> OverlapTree<N> {
        OverlapTree {
            nodes: vec![OverlapNode {
                net: N::whole_space(),
                as_number: 0,
                children: Vec::new(),
            }],
            elided: 0,
        }
    }

    pub fn node(&self, index: usize) -> &OverlapNode<N> {
        &self.nodes[index]
    }

    pub fn root(&self) -> &OverlapNode<N> {
        &self.nodes[ROOT]
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Number of prefixes dropped by `elide_redundant` because they had
    /// the same AS as their enclosing prefix.
    pub fn elided(&self) -> usize {
        self.elided
    }

    /* The child of `parent` that contains `net`, if any. `in_order`
     * means the input is sorted, so the most recent child is checked
     * before searching the others. */
    fn containing_child(&self, parent: usize, net: &N, in_order: bool) -> Option<usize> {
        let children = &self.nodes[parent].children;
        if in_order {
            if let Some(&last) = children.last() {
                if net.subnet_of(&self.nodes[last].net) {
                    return Some(last);
                }
            }
        }
        let base = net.network();
        let position =
            children.partition_point(|&c| self.nodes[c].net.network() <= base);
        if position == 0 {
            return None;
        }
        let candidate = children[position - 1];
        match net.subnet_of(&self.nodes[candidate].net) {
            true => Some(candidate),
            false => None,
        }
    }

    /// Inserts an announcement under the node that most tightly contains
    /// it. A prefix that is already in the tree takes the new AS number and
    /// false is returned; otherwise a node is added and true is returned.
    ///
    /// Prefixes with the same AS as their enclosing prefix are kept until
    /// `elide_redundant` runs, since a less specific prefix arriving later
    /// may still be placed between them.
    pub fn insert(&mut self, net: N, as_number: u32, in_order: bool) -> bool {
        let net = net.trunc();
        let mut parent = ROOT;
        while let Some(child) = self.containing_child(parent, &net, in_order) {
            parent = child;
        }
        if self.nodes[parent].net == net {
            self.nodes[parent].as_number = as_number;
            return false;
        }

        let index = self.nodes.len();
        let base = net.network();
        let last = last_address_of(&net);
        let siblings = &self.nodes[parent].children;
        let start =
            siblings.partition_point(|&c| self.nodes[c].net.network() < base);
        /* Siblings that the new prefix contains move underneath it; they
         * form a contiguous run from the insertion point. */
        let end = start
            + siblings[start..]
                .iter()
                .take_while(|&&c| self.nodes[c].net.network() <= last)
                .count();

        let adopted: Vec<usize> =
            self.nodes[parent].children.splice(start..end, vec![index]).collect();
        debug_assert!(adopted.iter().all(|&c| self.nodes[c].net.subnet_of(&net)));
        self.nodes.push(OverlapNode { net, as_number, children: adopted });
        true
    }

    /// Drops every node whose AS number is the same as its parent's,
    /// moving its children up in its place. Lookups and flattening give
    /// the same answers before and after. Returns the number of nodes
    /// dropped.
    pub fn elide_redundant(&mut self) -> usize {
        let old = mem::replace(&mut self.nodes, Vec::new());
        self.nodes.push(OverlapNode {
            net: old[ROOT].net,
            as_number: old[ROOT].as_number,
            children: Vec::new(),
        });
        let mut dropped = 0;
        let mut pending = vec![(ROOT, ROOT)];
        while let Some((new_index, old_index)) = pending.pop() {
            let as_number = old[old_index].as_number;
            let mut kept = Vec::new();
            let mut queue: Vec<usize> =
                old[old_index].children.iter().rev().cloned().collect();
            while let Some(child) = queue.pop() {
                let node = &old[child];
                if node.as_number == as_number {
                    dropped += 1;
                    queue.extend(node.children.iter().rev());
                    continue;
                }
                let index = self.nodes.len();
                self.nodes.push(OverlapNode {
                    net: node.net,
                    as_number: node.as_number,
                    children: Vec::new(),
                });
                kept.push(index);
                pending.push((index, child));
            }
            self.nodes[new_index].children = kept;
        }
        self.elided += dropped;
        dropped
    }

    /// AS number of the most specific prefix containing `addr`, found by
    /// walking the tree.
    pub fn find_asn(&self, addr: N::Addr) -> u32 {
        let mut current = ROOT;
        loop {
            let children = &self.nodes[current].children;
            let position =
                children.partition_point(|&c| self.nodes[c].net.network() <= addr);
            if position == 0 {
                break;
            }
            let candidate = children[position - 1];
            if addr > last_address_of(&self.nodes[candidate].net) {
                break;
            }
            current = candidate;
        }
        self.nodes[current].as_number
    }

    /// Flattens the tree into disjoint ranges covering the whole address
    /// space, in ascending order.
    pub fn flatten(&self) -> Vec<RangeEntry<N::Addr>> {
        let mut ranges = Vec::new();
        /* (node, next child to visit, first address not yet emitted) */
        let mut stack = vec![(ROOT, 0, Some(self.nodes[ROOT].net.network()))];
        while let Some(&(index, position, next)) = stack.last() {
            let node = &self.nodes[index];
            match node.children.get(position) {
                Some(&child_index) => {
                    let child = &self.nodes[child_index];
                    let child_first = child.net.network();
                    if let Some(a) = next {
                        if a < child_first {
                            ranges.push(RangeEntry::new(a, predecessor(child_first),
                                                        node.as_number));
                        }
                    }
                    let top = stack.len() - 1;
                    stack[top] = (index, position + 1,
                                  checked_successor(last_address_of(&child.net)));
                    stack.push((child_index, 0, Some(child_first)));
                },
                None => {
                    stack.pop();
                    if let Some(a) = next {
                        let last = last_address_of(&node.net);
                        if a <= last {
                            ranges.push(RangeEntry::new(a, last, node.as_number));
                        }
                    }
                },
            }
        }
        ranges
    }
}

impl<N: Network> Default for OverlapTree<N> {
    fn default() -> OverlapTree<N> {
        OverlapTree::new()
    }
}

pub type Ipv4OverlapTree = OverlapTree<Ipv4Net>;
pub type Ipv6OverlapTree = OverlapTree<Ipv6Net>;
