//! Chemical link rules: the two residue sides, the bond they share and optional
//! stereochemistry restraints.

use crate::model::atom::Atom;
use crate::model::residue::Residue;
use smol_str::SmolStr;
use std::fmt;
use std::str::FromStr;

/// Chemical group a link side can require instead of a specific residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkGroup {
    Peptide,
    PPeptide,
    MPeptide,
    Pyranose,
    Ketopyranose,
    DnaRna,
    #[default]
    Null,
}

impl LinkGroup {
    pub fn name(&self) -> &'static str {
        match self {
            LinkGroup::Peptide => "peptide",
            LinkGroup::PPeptide => "P-peptide",
            LinkGroup::MPeptide => "M-peptide",
            LinkGroup::Pyranose => "pyranose",
            LinkGroup::Ketopyranose => "ketopyranose",
            LinkGroup::DnaRna => "DNA/RNA",
            LinkGroup::Null => "null",
        }
    }
}

impl fmt::Display for LinkGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for LinkGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "peptide" | "l-peptide" => Ok(LinkGroup::Peptide),
            "p-peptide" => Ok(LinkGroup::PPeptide),
            "m-peptide" => Ok(LinkGroup::MPeptide),
            "pyranose" => Ok(LinkGroup::Pyranose),
            "ketopyranose" => Ok(LinkGroup::Ketopyranose),
            "dna/rna" | "dna" | "rna" => Ok(LinkGroup::DnaRna),
            "null" | "" | "." => Ok(LinkGroup::Null),
            _ => Err(format!("Invalid link group: {}", s)),
        }
    }
}

/// One end of a link: either an explicit residue name or a chemical group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChemLinkSide {
    pub comp: Option<String>,
    pub group: LinkGroup,
}

impl ChemLinkSide {
    pub fn comp(name: &str) -> Self {
        Self {
            comp: Some(name.to_string()),
            group: LinkGroup::Null,
        }
    }

    pub fn group(group: LinkGroup) -> Self {
        Self { comp: None, group }
    }
}

impl fmt::Display for ChemLinkSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.comp {
            Some(comp) => write!(f, "{}", comp),
            None => write!(f, "({})", self.group),
        }
    }
}

/// Atom of a link restraint, taken from side 1 or side 2.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomId {
    pub comp: u8,
    pub atom: SmolStr,
}

impl AtomId {
    pub fn new(comp: u8, atom: &str) -> Self {
        Self {
            comp,
            atom: SmolStr::new(atom),
        }
    }

    /// Finds the atom in the residue of its side.
    ///
    /// `res1` and `res2` must already be in link order (side 1, side 2).
    pub fn get_from<'r>(
        &self,
        res1: &'r Residue,
        res2: &'r Residue,
        altloc: Option<char>,
    ) -> Option<&'r Atom> {
        let residue = if self.comp == 1 { res1 } else { res2 };
        residue.find_atom(&self.atom, altloc)
    }
}

impl FromStr for AtomId {
    type Err = String;

    /// Parses `"1:SG"` or `"2:ZN"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (comp, atom) = s
            .split_once(':')
            .ok_or_else(|| format!("Invalid atom reference: {}", s))?;
        let comp = match comp.trim() {
            "1" => 1,
            "2" => 2,
            _ => return Err(format!("Invalid atom reference side: {}", s)),
        };
        let atom = atom.trim();
        if atom.is_empty() {
            return Err(format!("Invalid atom reference: {}", s));
        }
        Ok(Self::new(comp, atom))
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.comp, self.atom)
    }
}

/// Canonical key for an unordered pair of atom names.
pub fn lexicographic_pair(a: &str, b: &str) -> (SmolStr, SmolStr) {
    if a <= b {
        (SmolStr::new(a), SmolStr::new(b))
    } else {
        (SmolStr::new(b), SmolStr::new(a))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub id1: AtomId,
    pub id2: AtomId,
    /// Ideal length in Å.
    pub value: f64,
    pub esd: f64,
}

impl Bond {
    pub fn new(id1: AtomId, id2: AtomId, value: f64) -> Self {
        Self {
            id1,
            id2,
            value,
            esd: 0.02,
        }
    }

    pub fn lexicographic_key(&self) -> (SmolStr, SmolStr) {
        lexicographic_pair(&self.id1.atom, &self.id2.atom)
    }
}

/// Expected sign of a chiral volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChiralitySign {
    Positive,
    Negative,
    Both,
}

impl ChiralitySign {
    /// Whether `volume` contradicts the expected handedness.
    ///
    /// A zero volume never does.
    pub fn is_wrong(&self, volume: f64) -> bool {
        match self {
            ChiralitySign::Positive => volume < 0.0,
            ChiralitySign::Negative => volume > 0.0,
            ChiralitySign::Both => false,
        }
    }
}

impl FromStr for ChiralitySign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positive" | "positiv" => Ok(ChiralitySign::Positive),
            "negative" | "negativ" => Ok(ChiralitySign::Negative),
            "both" => Ok(ChiralitySign::Both),
            _ => Err(format!("Invalid chirality sign: {}", s)),
        }
    }
}

/// Chirality restraint around `id_ctr`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chirality {
    pub id_ctr: AtomId,
    pub id1: AtomId,
    pub id2: AtomId,
    pub id3: AtomId,
    pub sign: ChiralitySign,
}

impl Chirality {
    pub fn is_wrong(&self, volume: f64) -> bool {
        self.sign.is_wrong(volume)
    }

    pub fn atoms(&self) -> [&AtomId; 4] {
        [&self.id_ctr, &self.id1, &self.id2, &self.id3]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Restraints {
    pub bonds: Vec<Bond>,
    pub chirs: Vec<Chirality>,
}

/// A link rule between two residues.
#[derive(Debug, Clone, PartialEq)]
pub struct ChemLink {
    pub id: String,
    pub name: String,
    pub side1: ChemLinkSide,
    pub side2: ChemLinkSide,
    pub rt: Restraints,
}

impl ChemLink {
    pub fn new(id: &str, side1: ChemLinkSide, side2: ChemLinkSide) -> Self {
        Self {
            id: id.to_string(),
            name: String::new(),
            side1,
            side2,
            rt: Restraints::default(),
        }
    }

    pub fn with_bond(mut self, bond: Bond) -> Self {
        self.rt.bonds.push(bond);
        self
    }

    pub fn with_chirality(mut self, chirality: Chirality) -> Self {
        self.rt.chirs.push(chirality);
        self
    }

    /// The bond used for matching.
    pub fn first_bond(&self) -> Option<&Bond> {
        self.rt.bonds.first()
    }

    /// Neither side names a residue.
    pub fn is_group_only(&self) -> bool {
        self.side1.comp.is_none() && self.side2.comp.is_none()
    }
}

impl fmt::Display for ChemLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChemLink {{ id: \"{}\", {} - {}", self.id, self.side1, self.side2)?;
        if let Some(bond) = self.first_bond() {
            write!(f, ", {}-{} {:.3}", bond.id1, bond.id2, bond.value)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{Element, Point};

    #[test]
    fn link_group_parses_library_names() {
        assert_eq!(LinkGroup::from_str("peptide").unwrap(), LinkGroup::Peptide);
        assert_eq!(LinkGroup::from_str("DNA/RNA").unwrap(), LinkGroup::DnaRna);
        assert_eq!(LinkGroup::from_str("P-peptide").unwrap(), LinkGroup::PPeptide);
        assert_eq!(LinkGroup::from_str("").unwrap(), LinkGroup::Null);
        assert!(LinkGroup::from_str("lipid").is_err());
    }

    #[test]
    fn atom_id_parses_side_and_name() {
        let id: AtomId = "2:ZN".parse().unwrap();
        assert_eq!(id, AtomId::new(2, "ZN"));
        assert_eq!(format!("{}", id), "2:ZN");

        assert!("3:SG".parse::<AtomId>().is_err());
        assert!("SG".parse::<AtomId>().is_err());
        assert!("1:".parse::<AtomId>().is_err());
    }

    #[test]
    fn atom_id_resolves_from_ordered_residues() {
        let mut asn = Residue::new("ASN", 1, None);
        asn.add_atom(Atom::new("ND2", Element::N, Point::origin()));
        let mut nag = Residue::new("NAG", 2, None);
        nag.add_atom(Atom::new("C1", Element::C, Point::origin()));

        let nd2 = AtomId::new(1, "ND2");
        let c1 = AtomId::new(2, "C1");
        assert_eq!(nd2.get_from(&asn, &nag, None).unwrap().name, "ND2");
        assert_eq!(c1.get_from(&asn, &nag, None).unwrap().name, "C1");
        assert!(c1.get_from(&nag, &asn, None).is_none());
    }

    #[test]
    fn lexicographic_pair_is_order_independent() {
        assert_eq!(lexicographic_pair("SG", "ZN"), lexicographic_pair("ZN", "SG"));
        let (a, b) = lexicographic_pair("ZN", "SG");
        assert_eq!((a.as_str(), b.as_str()), ("SG", "ZN"));
    }

    #[test]
    fn chirality_sign_flags_contradicting_volumes() {
        assert!(ChiralitySign::Positive.is_wrong(-1.0));
        assert!(!ChiralitySign::Positive.is_wrong(1.0));
        assert!(ChiralitySign::Negative.is_wrong(1.0));
        assert!(!ChiralitySign::Negative.is_wrong(-1.0));
        assert!(!ChiralitySign::Both.is_wrong(-1.0));
        assert!(!ChiralitySign::Positive.is_wrong(0.0));
        assert!(!ChiralitySign::Negative.is_wrong(0.0));
        assert_eq!(
            ChiralitySign::from_str("negativ").unwrap(),
            ChiralitySign::Negative
        );
    }

    #[test]
    fn chem_link_display_shows_first_bond() {
        let link = ChemLink::new("CYS-ZN", ChemLinkSide::comp("CYS"), ChemLinkSide::comp("ZN"))
            .with_bond(Bond::new(AtomId::new(1, "SG"), AtomId::new(2, "ZN"), 2.3));

        assert_eq!(
            format!("{}", link),
            "ChemLink { id: \"CYS-ZN\", CYS - ZN, 1:SG-2:ZN 2.300 }"
        );
        assert!(!link.is_group_only());
    }
}
