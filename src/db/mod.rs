//! Chemistry dictionary: link rules and residue classifications.
//!
//! Libraries are built in code through [`MonomerLibrary::add_link`], parsed from a TOML
//! document with [`MonomerLibrary::from_toml_str`], or taken from the embedded
//! [`standard_library`].

mod error;
mod library;
mod link;
mod loader;
mod residues;
mod schema;
mod store;

pub use error::Error;
pub use library::MonomerLibrary;
pub use link::{
    AtomId, Bond, ChemLink, ChemLinkSide, Chirality, ChiralitySign, LinkGroup, Restraints,
    lexicographic_pair,
};
pub use residues::{ResidueInfo, ResidueKind, builtin_residue_infos};

/// Returns the link dictionary shipped with the crate.
///
/// It covers peptide, phosphodiester, disulfide and common glycosylation links and is
/// parsed once on first use.
pub fn standard_library() -> &'static MonomerLibrary {
    store::get_standard_library()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_library_parses() {
        let library = standard_library();

        let ss = library.link("SS").unwrap();
        assert_eq!(ss.side1.comp.as_deref(), Some("CYS"));
        assert!((ss.first_bond().unwrap().value - 2.031).abs() < 1e-9);

        let trans = library.link("TRANS").unwrap();
        assert!(trans.is_group_only());
        assert_eq!(trans.side1.group, LinkGroup::Peptide);

        let p = library.link("p").unwrap();
        assert_eq!(p.first_bond().unwrap().id1, AtomId::new(1, "O3'"));
    }

    #[test]
    fn standard_library_is_cached() {
        assert!(std::ptr::eq(standard_library(), standard_library()));
    }
}
