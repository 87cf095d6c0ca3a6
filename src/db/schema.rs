use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct LibraryFile {
    #[serde(default)]
    pub residues: Vec<ResidueEntry>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ResidueEntry {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct LinkEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub side1: SideEntry,
    pub side2: SideEntry,
    #[serde(default)]
    pub bonds: Vec<BondEntry>,
    #[serde(default)]
    pub chirs: Vec<ChiralityEntry>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct SideEntry {
    #[serde(default)]
    pub comp: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct BondEntry {
    pub atom1: String,
    pub atom2: String,
    pub value: f64,
    #[serde(default)]
    pub esd: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ChiralityEntry {
    pub center: String,
    pub atom1: String,
    pub atom2: String,
    pub atom3: String,
    pub sign: String,
}
