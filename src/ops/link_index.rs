//! Lookup tables derived from a [`MonomerLibrary`] for the link search.
//!
//! The index is built in two phases. First the rules that can drive discovery are selected
//! (they need a bond and must not be too generic), then every table is derived from that
//! selection alone:
//!
//! - `links`: rules keyed by the ordered pair of their bond's atom names,
//! - `max_dist_per_atom`: longest ideal bond touching each atom name,
//! - `global_max_dist`: longest ideal bond overall, never below [`DEFAULT_GLOBAL_MAX_DIST`],
//! - `res_group`: chemical group of every residue the library classifies.

use crate::db::{Bond, ChemLink, ChemLinkSide, LinkGroup, MonomerLibrary, lexicographic_pair};
use log::{debug, warn};
use smol_str::SmolStr;
use std::collections::BTreeMap;

/// Longest link expected without any rule saying otherwise (Zn-S in zinc fingers).
pub const DEFAULT_GLOBAL_MAX_DIST: f64 = 2.34;

/// Group-only rules too generic to suggest new links.
const BLACKLIST: [&str; 8] = ["TRANS", "PTRANS", "NMTRANS", "CIS", "PCIS", "NMCIS", "p", "SS"];

/// Read-only link lookup tables.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkIndex<'a> {
    links: BTreeMap<(SmolStr, SmolStr), Vec<&'a ChemLink>>,
    res_group: BTreeMap<SmolStr, LinkGroup>,
    max_dist_per_atom: BTreeMap<SmolStr, f64>,
    global_max_dist: f64,
}

impl<'a> LinkIndex<'a> {
    /// Builds all tables from `library`.
    pub fn new(library: &'a MonomerLibrary) -> Self {
        let rules = select_rules(library);

        let index = Self {
            links: index_links(&rules),
            res_group: index_groups(library),
            max_dist_per_atom: index_max_dist(&rules),
            global_max_dist: rules
                .iter()
                .map(|(_, bond)| bond.value)
                .fold(DEFAULT_GLOBAL_MAX_DIST, f64::max),
        };

        debug!(
            "link index: {} of {} rules searchable, {} atom names, max distance {:.3}",
            rules.len(),
            library.link_count(),
            index.max_dist_per_atom.len(),
            index.global_max_dist
        );
        index
    }

    /// Whether a residue named `res_name` can stand on `side`.
    ///
    /// An explicit residue name must match exactly; otherwise the side's group must be
    /// set and equal to the residue's group.
    pub fn match_side(&self, side: &ChemLinkSide, res_name: &str) -> bool {
        if let Some(comp) = &side.comp {
            return comp == res_name;
        }
        if side.group == LinkGroup::Null {
            return false;
        }
        self.res_group.get(res_name) == Some(&side.group)
    }

    /// Rules whose bond joins atoms named `name1` and `name2`, in either order.
    pub fn candidates(&self, name1: &str, name2: &str) -> &[&'a ChemLink] {
        self.links
            .get(&lexicographic_pair(name1, name2))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Longest ideal bond any searchable rule gives for this atom name.
    pub fn max_dist(&self, atom_name: &str) -> Option<f64> {
        self.max_dist_per_atom.get(atom_name).copied()
    }

    pub fn global_max_dist(&self) -> f64 {
        self.global_max_dist
    }

    pub fn group_of(&self, res_name: &str) -> LinkGroup {
        self.res_group.get(res_name).copied().unwrap_or_default()
    }

    pub fn links(&self) -> &BTreeMap<(SmolStr, SmolStr), Vec<&'a ChemLink>> {
        &self.links
    }

    pub fn res_group(&self) -> &BTreeMap<SmolStr, LinkGroup> {
        &self.res_group
    }

    pub fn max_dist_per_atom(&self) -> &BTreeMap<SmolStr, f64> {
        &self.max_dist_per_atom
    }

    /// Number of rules that take part in the search.
    pub fn rule_count(&self) -> usize {
        self.links.values().map(|v| v.len()).sum()
    }
}

/// Whether a rule is specific enough to drive discovery.
fn is_searchable(link: &ChemLink) -> bool {
    if !link.is_group_only() {
        return true;
    }
    link.side1.group != LinkGroup::Null
        && link.side2.group != LinkGroup::Null
        && !BLACKLIST.contains(&link.id.as_str())
}

fn select_rules(library: &MonomerLibrary) -> Vec<(&ChemLink, &Bond)> {
    library
        .links()
        .values()
        .filter_map(|link| {
            let bond = link.first_bond()?;
            if link.rt.bonds.len() > 1 {
                warn!("considering only the first bond in {}", link.id);
            }
            is_searchable(link).then_some((link, bond))
        })
        .collect()
}

fn index_links<'a>(rules: &[(&'a ChemLink, &'a Bond)]) -> BTreeMap<(SmolStr, SmolStr), Vec<&'a ChemLink>> {
    let mut links: BTreeMap<_, Vec<&'a ChemLink>> = BTreeMap::new();
    for (link, bond) in rules {
        links.entry(bond.lexicographic_key()).or_default().push(*link);
    }
    links
}

fn index_max_dist(rules: &[(&ChemLink, &Bond)]) -> BTreeMap<SmolStr, f64> {
    let mut max_dist: BTreeMap<SmolStr, f64> = BTreeMap::new();
    for (_, bond) in rules {
        for name in [&bond.id1.atom, &bond.id2.atom] {
            let entry = max_dist.entry(name.clone()).or_insert(bond.value);
            if *entry < bond.value {
                *entry = bond.value;
            }
        }
    }
    max_dist
}

fn index_groups(library: &MonomerLibrary) -> BTreeMap<SmolStr, LinkGroup> {
    library
        .residue_infos()
        .iter()
        .map(|(name, info)| {
            let group = if info.is_amino_acid() {
                LinkGroup::Peptide
            } else if info.is_nucleic_acid() {
                LinkGroup::DnaRna
            } else if info.is_pyranose() {
                LinkGroup::Pyranose
            } else {
                LinkGroup::Null
            };
            (SmolStr::new(name), group)
        })
        .collect()
}
