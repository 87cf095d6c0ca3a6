use super::error::Error;
use super::library::MonomerLibrary;
use super::link::{AtomId, Bond, ChemLink, ChemLinkSide, Chirality, LinkGroup};
use super::residues::{ResidueInfo, ResidueKind};
use super::schema::{LibraryFile, LinkEntry, SideEntry};

/// Builds a library from a TOML document on top of the built-in residue table.
pub fn parse_library(content: &str) -> Result<MonomerLibrary, Error> {
    let file: LibraryFile = toml::from_str(content)?;
    let mut library = MonomerLibrary::new();

    for entry in file.residues {
        let kind: ResidueKind = entry.kind.parse().map_err(|_| Error::InvalidResidueKind {
            name: entry.name.clone(),
            kind: entry.kind.clone(),
        })?;
        library.set_residue_info(&entry.name, ResidueInfo::new(kind));
    }

    for entry in file.links {
        library.add_link(convert_link(entry)?)?;
    }

    Ok(library)
}

fn convert_link(entry: LinkEntry) -> Result<ChemLink, Error> {
    let id = entry.id;
    let mut link = ChemLink::new(
        &id,
        convert_side(&id, entry.side1)?,
        convert_side(&id, entry.side2)?,
    );
    link.name = entry.name;

    for bond in entry.bonds {
        let mut converted = Bond::new(
            parse_atom_id(&id, &bond.atom1)?,
            parse_atom_id(&id, &bond.atom2)?,
            bond.value,
        );
        if let Some(esd) = bond.esd {
            converted.esd = esd;
        }
        link.rt.bonds.push(converted);
    }

    for chir in entry.chirs {
        let sign = chir.sign.parse().map_err(|_| Error::InvalidChiralitySign {
            link: id.clone(),
            sign: chir.sign.clone(),
        })?;
        link.rt.chirs.push(Chirality {
            id_ctr: parse_atom_id(&id, &chir.center)?,
            id1: parse_atom_id(&id, &chir.atom1)?,
            id2: parse_atom_id(&id, &chir.atom2)?,
            id3: parse_atom_id(&id, &chir.atom3)?,
            sign,
        });
    }

    Ok(link)
}

fn convert_side(link: &str, side: SideEntry) -> Result<ChemLinkSide, Error> {
    let group = match side.group.as_deref() {
        Some(text) => text.parse().map_err(|_| Error::InvalidGroup {
            link: link.to_string(),
            group: text.to_string(),
        })?,
        None => LinkGroup::Null,
    };
    Ok(ChemLinkSide {
        comp: side.comp.filter(|c| !c.trim().is_empty()),
        group,
    })
}

fn parse_atom_id(link: &str, text: &str) -> Result<AtomId, Error> {
    text.parse()
        .map_err(|_| Error::invalid_atom_ref(link, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::link::ChiralitySign;

    const SUGAR_LIBRARY: &str = r#"
        [[residues]]
        name = "XYZ"
        kind = "pyranose"

        [[links]]
        id = "NAG-ASN"
        side1 = { comp = "ASN" }
        side2 = { comp = "NAG" }
        bonds = [{ atom1 = "1:ND2", atom2 = "2:C1", value = 1.439 }]
        chirs = [
            { center = "2:C1", atom1 = "2:O5", atom2 = "1:ND2", atom3 = "2:C2", sign = "negative" },
        ]

        [[links]]
        id = "BETA1-4"
        side1 = { group = "pyranose" }
        side2 = { group = "pyranose" }
        bonds = [{ atom1 = "1:O4", atom2 = "2:C1", value = 1.439, esd = 0.02 }]
    "#;

    #[test]
    fn parse_library_reads_links_and_residues() {
        let library = parse_library(SUGAR_LIBRARY).unwrap();

        let link = library.link("NAG-ASN").unwrap();
        assert_eq!(link.side1.comp.as_deref(), Some("ASN"));
        assert_eq!(link.rt.bonds.len(), 1);
        assert_eq!(link.rt.chirs.len(), 1);
        assert_eq!(link.rt.chirs[0].sign, ChiralitySign::Negative);
        assert_eq!(link.rt.chirs[0].id2, AtomId::new(1, "ND2"));

        let beta = library.link("BETA1-4").unwrap();
        assert!(beta.is_group_only());
        assert_eq!(beta.side2.group, LinkGroup::Pyranose);

        assert!(library.residue_info("XYZ").unwrap().is_pyranose());
        assert!(library.residue_info("CYS").unwrap().is_amino_acid());
    }

    #[test]
    fn parse_library_rejects_unknown_fields() {
        let content = r#"
            [[links]]
            id = "X"
            side1 = { comp = "CYS" }
            side2 = { comp = "CYS" }
            distance = 2.0
        "#;
        assert!(matches!(parse_library(content), Err(Error::Parse(_))));
    }

    #[test]
    fn parse_library_rejects_bad_atom_side() {
        let content = r#"
            [[links]]
            id = "BAD"
            side1 = { comp = "CYS" }
            side2 = { comp = "CYS" }
            bonds = [{ atom1 = "1:SG", atom2 = "3:SG", value = 2.03 }]
        "#;
        match parse_library(content) {
            Err(Error::InvalidAtomRef { link, reference }) => {
                assert_eq!(link, "BAD");
                assert_eq!(reference, "3:SG");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn parse_library_rejects_non_positive_bond_length() {
        let content = r#"
            [[links]]
            id = "ZERO"
            side1 = { comp = "CYS" }
            side2 = { comp = "CYS" }
            bonds = [{ atom1 = "1:SG", atom2 = "2:SG", value = 0.0 }]
        "#;
        assert!(matches!(
            parse_library(content),
            Err(Error::InvalidBondLength { .. })
        ));
    }

    #[test]
    fn parse_library_rejects_duplicate_ids() {
        let content = r#"
            [[links]]
            id = "SS"
            side1 = { comp = "CYS" }
            side2 = { comp = "CYS" }

            [[links]]
            id = "SS"
            side1 = { comp = "CYS" }
            side2 = { comp = "CYS" }
        "#;
        assert!(matches!(
            parse_library(content),
            Err(Error::DuplicateLink(id)) if id == "SS"
        ));
    }

    #[test]
    fn parse_library_rejects_unknown_group_and_kind() {
        let bad_group = r#"
            [[links]]
            id = "G"
            side1 = { group = "lipid" }
            side2 = { group = "peptide" }
        "#;
        assert!(matches!(
            parse_library(bad_group),
            Err(Error::InvalidGroup { .. })
        ));

        let bad_kind = r#"
            [[residues]]
            name = "LIP"
            kind = "lipid"
        "#;
        assert!(matches!(
            parse_library(bad_kind),
            Err(Error::InvalidResidueKind { .. })
        ));
    }

    #[test]
    fn empty_comp_is_treated_as_absent() {
        let content = r#"
            [[links]]
            id = "E"
            side1 = { comp = "", group = "peptide" }
            side2 = { group = "peptide" }
        "#;
        let library = parse_library(content).unwrap();
        assert!(library.link("E").unwrap().is_group_only());
    }
}
