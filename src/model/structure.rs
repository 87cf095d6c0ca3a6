use super::address::{AtomRef, Cra};
use super::atom::Atom;
use super::cell::UnitCell;
use super::chain::Chain;
use super::connection::Connection;
use std::fmt;

/// One model (coordinate set) of a structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    chains: Vec<Chain>,
    connections: Vec<Connection>,
}

impl Model {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            chains: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn add_chain(&mut self, chain: Chain) {
        self.chains.push(chain);
    }

    pub fn add_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn chain(&self, name: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.name == name)
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(|c| c.residue_count()).sum()
    }

    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(|c| c.atom_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.iter().all(|c| c.atom_count() == 0)
    }

    /// Resolves an index triple into borrowed chain, residue and atom.
    pub fn cra(&self, at: AtomRef) -> Option<Cra<'_>> {
        let chain = self.chains.get(at.chain)?;
        let residue = chain.residues().get(at.residue)?;
        let atom = residue.atoms().get(at.atom)?;
        Some(Cra {
            chain,
            residue,
            atom,
        })
    }

    pub fn atom(&self, at: AtomRef) -> Option<&Atom> {
        self.cra(at).map(|cra| cra.atom)
    }

    /// Iterates over every atom with its index triple, in ascending [`AtomRef`] order.
    pub fn iter_atoms_with_refs(&self) -> impl Iterator<Item = (AtomRef, &Atom)> {
        self.chains.iter().enumerate().flat_map(|(ci, chain)| {
            chain
                .residues()
                .iter()
                .enumerate()
                .flat_map(move |(ri, residue)| {
                    residue
                        .atoms()
                        .iter()
                        .enumerate()
                        .map(move |(ai, atom)| (AtomRef::new(ci, ri, ai), atom))
                })
        })
    }

    /// Index of the first recorded connection joining the two atoms, in either order.
    pub fn find_connection(&self, cra1: &Cra<'_>, cra2: &Cra<'_>) -> Option<usize> {
        self.connections.iter().position(|c| c.links(cra1, cra2))
    }

    /// Like [`find_connection`](Self::find_connection) but takes index triples.
    pub fn find_connection_by_refs(&self, a1: AtomRef, a2: AtomRef) -> Option<usize> {
        let cra1 = self.cra(a1)?;
        let cra2 = self.cra(a2)?;
        self.find_connection(&cra1, &cra2)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Model {{ name: \"{}\", chains: {}, residues: {}, atoms: {} }}",
            self.name,
            self.chain_count(),
            self.residue_count(),
            self.atom_count()
        )
    }
}

/// A macromolecular structure: its unit cell and one or more models.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Structure {
    pub name: String,
    pub cell: UnitCell,
    models: Vec<Model>,
}

impl Structure {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cell: UnitCell::default(),
            models: Vec::new(),
        }
    }

    pub fn with_cell(mut self, cell: UnitCell) -> Self {
        self.cell = cell;
        self
    }

    pub fn add_model(&mut self, model: Model) {
        self.models.push(model);
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn model(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structure {{ name: \"{}\", models: {}, crystal: {} }}",
            self.name,
            self.model_count(),
            self.cell.is_crystal()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::address::AtomAddress;
    use crate::model::connection::ConnectionKind;
    use crate::model::residue::Residue;
    use crate::model::types::{Element, Point};

    fn zinc_site() -> Model {
        let mut chain = Chain::new("A");
        let mut cys = Residue::new("CYS", 12, None);
        cys.add_atom(Atom::new("CB", Element::C, Point::new(0.0, 0.0, 0.0)));
        cys.add_atom(Atom::new("SG", Element::S, Point::new(1.8, 0.0, 0.0)));
        chain.add_residue(cys);
        let mut zn = Residue::new("ZN", 101, None);
        zn.add_atom(Atom::new("ZN", Element::Zn, Point::new(4.1, 0.0, 0.0)));
        chain.add_residue(zn);

        let mut model = Model::new("1");
        model.add_chain(chain);
        model.add_chain(Chain::new("B"));
        model
    }

    #[test]
    fn cra_resolves_index_triples() {
        let model = zinc_site();

        let cra = model.cra(AtomRef::new(0, 0, 1)).unwrap();
        assert_eq!(cra.atom.name, "SG");
        assert_eq!(cra.residue.name, "CYS");
        assert!(model.cra(AtomRef::new(0, 2, 0)).is_none());
        assert!(model.cra(AtomRef::new(1, 0, 0)).is_none());
    }

    #[test]
    fn iter_atoms_with_refs_visits_in_scan_order() {
        let model = zinc_site();
        let refs: Vec<AtomRef> = model.iter_atoms_with_refs().map(|(r, _)| r).collect();

        assert_eq!(
            refs,
            vec![
                AtomRef::new(0, 0, 0),
                AtomRef::new(0, 0, 1),
                AtomRef::new(0, 1, 0)
            ]
        );
        assert!(refs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(model.atom_count(), 3);
    }

    #[test]
    fn find_connection_matches_in_either_order() {
        let mut model = zinc_site();
        model.add_connection(Connection::new(
            "hydrog1",
            ConnectionKind::Hydrog,
            AtomAddress::new("A", 12, "CYS", "CB"),
            AtomAddress::new("A", 101, "ZN", "ZN"),
        ));
        model.add_connection(Connection::new(
            "metalc1",
            ConnectionKind::MetalC,
            AtomAddress::new("A", 101, "ZN", "ZN"),
            AtomAddress::new("A", 12, "CYS", "SG"),
        ));

        let sg = AtomRef::new(0, 0, 1);
        let zn = AtomRef::new(0, 1, 0);
        assert_eq!(model.find_connection_by_refs(sg, zn), Some(1));
        assert_eq!(model.find_connection_by_refs(zn, sg), Some(1));

        let cb = AtomRef::new(0, 0, 0);
        assert_eq!(model.find_connection_by_refs(cb, sg), None);
    }

    #[test]
    fn empty_model_has_no_atoms() {
        let model = Model::new("1");

        assert!(model.is_empty());
        assert_eq!(model.iter_atoms_with_refs().count(), 0);
    }

    #[test]
    fn structure_defaults_to_non_crystal_cell() {
        let mut structure = Structure::new("1abc");
        structure.add_model(zinc_site());

        assert!(!structure.cell.is_crystal());
        assert_eq!(structure.model_count(), 1);
        assert!(structure.model(1).is_none());
        assert_eq!(
            format!("{}", structure),
            "Structure { name: \"1abc\", models: 1, crystal: false }"
        );
    }
}
