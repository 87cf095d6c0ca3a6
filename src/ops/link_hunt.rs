//! Search for atom pairs that look chemically linked.
//!
//! Every atom whose name appears in some searchable rule queries the [`CellList`] for
//! partners within reach, across symmetry images and lattice translations. Each surviving
//! pair is checked against the rules keyed by the two atom names (distance, residue sides,
//! chirality); pairs no rule accepts are still reported when they sit within the sum of
//! covalent radii. Finally every match is cross-referenced with the connections already
//! recorded in the model.

use super::error::Error;
use super::link_index::LinkIndex;
use crate::db::{ChemLink, Chirality, ChiralitySign};
use crate::model::address::{AtomRef, Cra};
use crate::model::atom::Atom;
use crate::model::geometry::chiral_volume;
use crate::model::grid::{CellList, Neighbor};
use crate::model::structure::{Model, Structure};
use crate::model::types::Point;
use crate::utils::parallel::*;
use log::debug;

/// Minimum bucket width of the spatial index, in Å.
const MIN_CELL_SIZE: f64 = 5.0;

/// An atom closer than this to its own image sits on a special position.
const SPECIAL_POSITION_DIST: f64 = 0.8;

/// Tolerances for the link search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkHuntConfig {
    /// Multiplier on a rule's ideal bond length giving the longest accepted distance.
    pub bond_margin: f64,
    /// Multiplier on the sum of covalent radii for pairs no rule explains.
    pub radius_margin: f64,
    /// Model of the structure to search.
    pub model_index: usize,
}

impl Default for LinkHuntConfig {
    fn default() -> Self {
        Self {
            bond_margin: 1.1,
            radius_margin: 1.1,
            model_index: 0,
        }
    }
}

impl LinkHuntConfig {
    fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("bond margin", self.bond_margin),
            ("radius margin", self.radius_margin),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid_margin(name, value));
            }
        }
        Ok(())
    }
}

/// A pair of atoms that may be linked.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkMatch<'a> {
    /// Last rule that accepted the pair, or `None` for a covalent-radius match.
    pub chem_link: Option<&'a ChemLink>,
    /// How many rules accepted the pair.
    pub chem_link_count: usize,
    /// Atom on side 1 of the rule.
    pub atom1: AtomRef,
    /// Atom on side 2 of the rule.
    pub atom2: AtomRef,
    /// Both atoms are in the asymmetric unit, without lattice translation.
    pub same_asu: bool,
    /// Observed distance between the two atoms, in Å.
    pub bond_length: f64,
    /// Index into `Model::connections()` of the record joining the same atoms.
    pub connection: Option<usize>,
}

impl<'a> LinkMatch<'a> {
    /// More than one rule explains the pair.
    pub fn is_ambiguous(&self) -> bool {
        self.chem_link_count > 1
    }

    /// No rule explains the pair; it was accepted on covalent radii alone.
    pub fn is_heuristic(&self) -> bool {
        self.chem_link.is_none()
    }

    pub fn link_id(&self) -> Option<&'a str> {
        self.chem_link.map(|link| link.id.as_str())
    }

    /// One-line report such as `SS  A/CYS 12/SG - A/CYS 40/SG  2.031 Å`.
    pub fn describe(&self, model: &Model) -> String {
        let name = |at: AtomRef| {
            model
                .cra(at)
                .map(|cra| cra.to_string())
                .unwrap_or_else(|| at.to_string())
        };
        let mut line = format!(
            "{}  {} - {}  {:.3} Å",
            self.link_id().unwrap_or("(covalent radii)"),
            name(self.atom1),
            name(self.atom2),
            self.bond_length
        );
        if !self.same_asu {
            line.push_str("  [symmetry mate]");
        }
        if self.is_ambiguous() {
            line.push_str(&format!("  [{} rules]", self.chem_link_count));
        }
        if let Some(conn) = self.connection.and_then(|i| model.connections().get(i)) {
            line.push_str(&format!("  [recorded as {}]", conn.name));
        }
        line
    }
}

/// Rules accepted for one pair so far.
#[derive(Debug, Default)]
struct RuleTally<'a> {
    link: Option<&'a ChemLink>,
    count: usize,
    query_on_side1: bool,
}

impl<'a> RuleTally<'a> {
    fn accept(&mut self, link: &'a ChemLink, query_on_side1: bool) {
        self.link = Some(link);
        self.count += 1;
        self.query_on_side1 = query_on_side1;
    }
}

/// The atom issuing a neighbour query.
struct Query<'m> {
    at: AtomRef,
    cra: Cra<'m>,
}

/// Link search over one structure.
///
/// ```ignore
/// let index = LinkIndex::new(db::standard_library());
/// let matches = LinkHunt::new(&index).bond_margin(1.2).find_possible_links(&structure)?;
/// ```
#[derive(Debug, Clone)]
pub struct LinkHunt<'i, 'a> {
    index: &'i LinkIndex<'a>,
    config: LinkHuntConfig,
}

impl<'i, 'a> LinkHunt<'i, 'a> {
    pub fn new(index: &'i LinkIndex<'a>) -> Self {
        Self {
            index,
            config: LinkHuntConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LinkHuntConfig) -> Self {
        self.config = config;
        self
    }

    pub fn bond_margin(mut self, margin: f64) -> Self {
        self.config.bond_margin = margin;
        self
    }

    pub fn radius_margin(mut self, margin: f64) -> Self {
        self.config.radius_margin = margin;
        self
    }

    pub fn model_index(mut self, index: usize) -> Self {
        self.config.model_index = index;
        self
    }

    pub fn config(&self) -> &LinkHuntConfig {
        &self.config
    }

    /// Finds every atom pair of the selected model that may be linked.
    ///
    /// Matches come out in scan order of the atom that found them (chains, residues,
    /// atoms), with both parallel and serial execution.
    ///
    /// # Arguments
    ///
    /// * `structure` - Structure whose unit cell and symmetry images are honoured.
    ///
    /// # Returns
    ///
    /// The matches, each annotated with the recorded connection joining the same atoms.
    /// A structure without models yields an empty list.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMargin`] for a non-positive margin, and
    /// [`Error::ModelOutOfRange`] when the structure has models but not the requested one.
    pub fn find_possible_links(&self, structure: &Structure) -> Result<Vec<LinkMatch<'a>>, Error> {
        self.config.validate()?;

        let model = match structure.model(self.config.model_index) {
            Some(model) => model,
            None if structure.model_count() == 0 => return Ok(Vec::new()),
            None => {
                return Err(Error::model_out_of_range(
                    self.config.model_index,
                    structure.model_count(),
                ));
            }
        };

        let cutoff = MIN_CELL_SIZE.max(self.index.global_max_dist() * self.config.bond_margin);
        let grid = CellList::new(model, &structure.cell, cutoff);
        debug!(
            "cell list: {} marks, {} symmetry images, buckets {:?}",
            grid.len(),
            grid.image_count(),
            grid.dims()
        );

        let queries: Vec<(AtomRef, &Atom)> = model.iter_atoms_with_refs().collect();
        let mut matches: Vec<LinkMatch<'a>> = queries
            .par_iter()
            .flat_map(|&(at, atom)| self.search_atom(model, &grid, at, atom))
            .collect();

        for m in &mut matches {
            m.connection = model.find_connection_by_refs(m.atom1, m.atom2);
        }

        debug!("found {} possible links", matches.len());
        Ok(matches)
    }

    fn search_atom(
        &self,
        model: &Model,
        grid: &CellList,
        at: AtomRef,
        atom: &Atom,
    ) -> Vec<LinkMatch<'a>> {
        let Some(max_dist) = self.index.max_dist(&atom.name) else {
            return Vec::new();
        };
        let Some(cra) = model.cra(at) else {
            return Vec::new();
        };
        let query = Query { at, cra };

        grid.neighbors(&atom.pos, atom.altloc, max_dist)
            .filter_map(|neighbor| self.evaluate_pair(model, grid, &query, &neighbor))
            .collect()
    }

    fn evaluate_pair(
        &self,
        model: &Model,
        grid: &CellList,
        query: &Query<'_>,
        neighbor: &Neighbor<'_>,
    ) -> Option<LinkMatch<'a>> {
        let mark = neighbor.mark;

        // no links within a residue
        if neighbor.is_same_asu() && mark.atom.same_residue(&query.at) {
            return None;
        }
        // each unordered pair is seen from its lower atom only
        if mark.atom < query.at {
            return None;
        }
        if mark.atom == query.at && neighbor.dist_sq < SPECIAL_POSITION_DIST.powi(2) {
            return None;
        }

        let partner = model.cra(mark.atom)?;
        let atom = query.cra.atom;
        let res_name = query.cra.residue.name.as_str();
        let partner_res_name = partner.residue.name.as_str();
        let margin_sq = self.config.bond_margin.powi(2);

        let mut tally = RuleTally::default();
        for &link in self.index.candidates(&atom.name, &partner.atom.name) {
            let Some(bond) = link.first_bond() else {
                continue;
            };
            if neighbor.dist_sq > bond.value.powi(2) * margin_sq {
                continue;
            }

            let query_on_side1 = if bond.id1.atom == atom.name
                && self.index.match_side(&link.side1, res_name)
                && self.index.match_side(&link.side2, partner_res_name)
            {
                true
            } else if bond.id2.atom == atom.name
                && self.index.match_side(&link.side2, res_name)
                && self.index.match_side(&link.side1, partner_res_name)
            {
                false
            } else {
                continue;
            };

            if !self.chirality_ok(link, query_on_side1, query, &partner, neighbor, grid) {
                continue;
            }
            tally.accept(link, query_on_side1);
        }

        let (atom1, atom2) = match tally.link {
            Some(_) if tally.query_on_side1 => (query.at, mark.atom),
            Some(_) => (mark.atom, query.at),
            None => {
                let reach = (atom.element.covalent_radius()
                    + partner.atom.element.covalent_radius())
                    * self.config.radius_margin;
                if neighbor.dist_sq > reach * reach {
                    return None;
                }
                (mark.atom, query.at)
            }
        };

        Some(LinkMatch {
            chem_link: tally.link,
            chem_link_count: tally.count,
            atom1,
            atom2,
            same_asu: neighbor.is_same_asu(),
            bond_length: neighbor.distance(),
            connection: None,
        })
    }

    /// Checks the rule's chirality restraints on the candidate pair.
    ///
    /// Atoms of the partner residue are placed with the partner's symmetry image. A
    /// restraint whose atoms cannot all be found is ignored.
    fn chirality_ok(
        &self,
        link: &ChemLink,
        query_on_side1: bool,
        query: &Query<'_>,
        partner: &Cra<'_>,
        neighbor: &Neighbor<'_>,
        grid: &CellList,
    ) -> bool {
        let (res1, res2) = if query_on_side1 {
            (query.cra.residue, partner.residue)
        } else {
            (partner.residue, query.cra.residue)
        };
        let partner_comp = if query_on_side1 { 2 } else { 1 };
        let altloc = query.cra.atom.altloc.or(partner.atom.altloc);

        let place = |chir: &Chirality| -> Option<[Point; 4]> {
            let mut points = [Point::origin(); 4];
            for (slot, id) in points.iter_mut().zip(chir.atoms()) {
                let found = id.get_from(res1, res2, altloc)?;
                *slot = if id.comp == partner_comp {
                    grid.image_position(&found.pos, neighbor.mark.image_idx, neighbor.shift)
                } else {
                    found.pos
                };
            }
            Some(points)
        };

        let mut score = 0i32;
        for chir in &link.rt.chirs {
            if chir.sign == ChiralitySign::Both {
                continue;
            }
            if let Some([ctr, p1, p2, p3]) = place(chir) {
                if chir.is_wrong(chiral_volume(&ctr, &p1, &p2, &p3)) {
                    score -= 1;
                }
            }
        }
        score >= 0
    }
}
