//! Built-in classification of common residue names.
//!
//! The link index only needs to know whether a residue is an amino acid, a nucleotide or
//! a pyranose sugar; this table covers the standard monomers and the most frequent
//! modified residues, sugars, waters and buffer components. Libraries loaded from TOML can
//! add to or override it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueKind {
    AminoAcid,
    Dna,
    Rna,
    Pyranose,
    Ketopyranose,
    Water,
    Buffer,
    Other,
}

impl ResidueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResidueKind::AminoAcid => "amino-acid",
            ResidueKind::Dna => "dna",
            ResidueKind::Rna => "rna",
            ResidueKind::Pyranose => "pyranose",
            ResidueKind::Ketopyranose => "ketopyranose",
            ResidueKind::Water => "water",
            ResidueKind::Buffer => "buffer",
            ResidueKind::Other => "other",
        }
    }
}

impl fmt::Display for ResidueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ResidueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "amino-acid" | "aa" | "peptide" => Ok(ResidueKind::AminoAcid),
            "dna" => Ok(ResidueKind::Dna),
            "rna" => Ok(ResidueKind::Rna),
            "pyranose" | "pyr" => Ok(ResidueKind::Pyranose),
            "ketopyranose" | "ket" => Ok(ResidueKind::Ketopyranose),
            "water" | "hoh" => Ok(ResidueKind::Water),
            "buffer" | "buf" => Ok(ResidueKind::Buffer),
            "other" | "els" => Ok(ResidueKind::Other),
            _ => Err(format!("Invalid residue kind: {}", s)),
        }
    }
}

/// What the library knows about a residue name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidueInfo {
    pub kind: ResidueKind,
}

impl ResidueInfo {
    pub fn new(kind: ResidueKind) -> Self {
        Self { kind }
    }

    pub fn is_amino_acid(&self) -> bool {
        self.kind == ResidueKind::AminoAcid
    }

    pub fn is_nucleic_acid(&self) -> bool {
        matches!(self.kind, ResidueKind::Dna | ResidueKind::Rna)
    }

    pub fn is_pyranose(&self) -> bool {
        self.kind == ResidueKind::Pyranose
    }
}

const BUILTIN: &[(&str, ResidueKind)] = &[
    ("ALA", ResidueKind::AminoAcid),
    ("ARG", ResidueKind::AminoAcid),
    ("ASN", ResidueKind::AminoAcid),
    ("ASP", ResidueKind::AminoAcid),
    ("CYS", ResidueKind::AminoAcid),
    ("GLN", ResidueKind::AminoAcid),
    ("GLU", ResidueKind::AminoAcid),
    ("GLY", ResidueKind::AminoAcid),
    ("HIS", ResidueKind::AminoAcid),
    ("ILE", ResidueKind::AminoAcid),
    ("LEU", ResidueKind::AminoAcid),
    ("LYS", ResidueKind::AminoAcid),
    ("MET", ResidueKind::AminoAcid),
    ("PHE", ResidueKind::AminoAcid),
    ("PRO", ResidueKind::AminoAcid),
    ("SER", ResidueKind::AminoAcid),
    ("THR", ResidueKind::AminoAcid),
    ("TRP", ResidueKind::AminoAcid),
    ("TYR", ResidueKind::AminoAcid),
    ("VAL", ResidueKind::AminoAcid),
    ("MSE", ResidueKind::AminoAcid),
    ("SEC", ResidueKind::AminoAcid),
    ("PYL", ResidueKind::AminoAcid),
    ("SEP", ResidueKind::AminoAcid),
    ("TPO", ResidueKind::AminoAcid),
    ("PTR", ResidueKind::AminoAcid),
    ("HYP", ResidueKind::AminoAcid),
    ("MLY", ResidueKind::AminoAcid),
    ("CSO", ResidueKind::AminoAcid),
    ("UNK", ResidueKind::AminoAcid),
    ("A", ResidueKind::Rna),
    ("C", ResidueKind::Rna),
    ("G", ResidueKind::Rna),
    ("U", ResidueKind::Rna),
    ("I", ResidueKind::Rna),
    ("PSU", ResidueKind::Rna),
    ("DA", ResidueKind::Dna),
    ("DC", ResidueKind::Dna),
    ("DG", ResidueKind::Dna),
    ("DT", ResidueKind::Dna),
    ("DI", ResidueKind::Dna),
    ("DU", ResidueKind::Dna),
    ("NAG", ResidueKind::Pyranose),
    ("NDG", ResidueKind::Pyranose),
    ("MAN", ResidueKind::Pyranose),
    ("BMA", ResidueKind::Pyranose),
    ("GLC", ResidueKind::Pyranose),
    ("BGC", ResidueKind::Pyranose),
    ("GAL", ResidueKind::Pyranose),
    ("GLA", ResidueKind::Pyranose),
    ("FUC", ResidueKind::Pyranose),
    ("FUL", ResidueKind::Pyranose),
    ("XYS", ResidueKind::Pyranose),
    ("XYP", ResidueKind::Pyranose),
    ("A2G", ResidueKind::Pyranose),
    ("NGA", ResidueKind::Pyranose),
    ("SIA", ResidueKind::Ketopyranose),
    ("HOH", ResidueKind::Water),
    ("DOD", ResidueKind::Water),
    ("SO4", ResidueKind::Buffer),
    ("PO4", ResidueKind::Buffer),
    ("GOL", ResidueKind::Buffer),
    ("EDO", ResidueKind::Buffer),
    ("ACT", ResidueKind::Buffer),
    ("PEG", ResidueKind::Buffer),
];

static BUILTIN_TABLE: OnceLock<BTreeMap<String, ResidueInfo>> = OnceLock::new();

/// Returns the built-in residue table, sorted by residue name.
pub fn builtin_residue_infos() -> &'static BTreeMap<String, ResidueInfo> {
    BUILTIN_TABLE.get_or_init(|| {
        BUILTIN
            .iter()
            .map(|(name, kind)| (name.to_string(), ResidueInfo::new(*kind)))
            .collect()
    })
}
