use super::atom::Atom;
use std::fmt;

/// Residue (monomer) identified by name, sequence number and insertion code.
///
/// Disordered residues keep every conformer in `atoms`; atoms sharing a name are told apart
/// by their alternate location codes.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub name: String,
    pub seq_num: i32,
    pub icode: Option<char>,
    atoms: Vec<Atom>,
}

impl Residue {
    pub fn new(name: &str, seq_num: i32, icode: Option<char>) -> Self {
        Self {
            name: name.to_string(),
            seq_num,
            icode,
            atoms: Vec::new(),
        }
    }

    pub fn add_atom(&mut self, atom: Atom) {
        debug_assert!(
            !self
                .atoms
                .iter()
                .any(|a| a.name == atom.name && a.altloc == atom.altloc),
            "Attempted to add a duplicate atom '{}' (altloc {:?}) to residue '{}'",
            atom.name,
            atom.altloc,
            self.name
        );
        self.atoms.push(atom);
    }

    /// Finds an atom by name, honoring alternate conformations.
    ///
    /// With an altloc the matching conformer is preferred, falling back to an ordered atom of
    /// the same name. Without an altloc the first atom carrying the name is returned.
    pub fn find_atom(&self, name: &str, altloc: Option<char>) -> Option<&Atom> {
        let mut named = self.atoms.iter().filter(|a| a.name == name);
        match altloc {
            None => named.next(),
            Some(alt) => {
                let mut ordered = None;
                for atom in named {
                    match atom.altloc {
                        Some(a) if a == alt => return Some(atom),
                        None if ordered.is_none() => ordered = Some(atom),
                        _ => {}
                    }
                }
                ordered
            }
        }
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.find_atom(name, None)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter_atoms(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    pub fn iter_atoms_mut(&mut self) -> std::slice::IterMut<'_, Atom> {
        self.atoms.iter_mut()
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.icode {
            Some(icode) => write!(
                f,
                "Residue {{ name: \"{}\", seq: {}{}, atoms: {} }}",
                self.name,
                self.seq_num,
                icode,
                self.atom_count()
            ),
            None => write!(
                f,
                "Residue {{ name: \"{}\", seq: {}, atoms: {} }}",
                self.name,
                self.seq_num,
                self.atom_count()
            ),
        }
    }
}
