use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse monomer library: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("link '{link}': invalid atom reference '{reference}' (expected '1:NAME' or '2:NAME')")]
    InvalidAtomRef { link: String, reference: String },

    #[error("link '{link}': bond {atom1}-{atom2} has invalid ideal length {value}")]
    InvalidBondLength {
        link: String,
        atom1: String,
        atom2: String,
        value: f64,
    },

    #[error("link '{link}': unknown chemical group '{group}'")]
    InvalidGroup { link: String, group: String },

    #[error("link '{link}': unknown chirality sign '{sign}'")]
    InvalidChiralitySign { link: String, sign: String },

    #[error("duplicate link id '{0}'")]
    DuplicateLink(String),

    #[error("residue '{name}': unknown residue kind '{kind}'")]
    InvalidResidueKind { name: String, kind: String },
}

impl Error {
    pub fn invalid_atom_ref(link: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::InvalidAtomRef {
            link: link.into(),
            reference: reference.into(),
        }
    }

    pub fn invalid_bond_length(
        link: impl Into<String>,
        atom1: impl Into<String>,
        atom2: impl Into<String>,
        value: f64,
    ) -> Self {
        Self::InvalidBondLength {
            link: link.into(),
            atom1: atom1.into(),
            atom2: atom2.into(),
            value,
        }
    }
}
