//! Connections already recorded for a model (mmCIF `_struct_conn`, PDB `LINK`/`SSBOND`).
//!
//! The link search never creates these; it only cross-references its findings against
//! them so callers can tell new links from annotated ones.

use super::address::{AtomAddress, Cra};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    Covale,
    Disulf,
    MetalC,
    Hydrog,
    Unknown,
}

impl ConnectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionKind::Covale => "covale",
            ConnectionKind::Disulf => "disulf",
            ConnectionKind::MetalC => "metalc",
            ConnectionKind::Hydrog => "hydrog",
            ConnectionKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ConnectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "covale" | "covale_base" | "covale_phosphate" | "covale_sugar" => {
                Ok(ConnectionKind::Covale)
            }
            "disulf" => Ok(ConnectionKind::Disulf),
            "metalc" => Ok(ConnectionKind::MetalC),
            "hydrog" => Ok(ConnectionKind::Hydrog),
            "?" | "." | "unknown" => Ok(ConnectionKind::Unknown),
            _ => Err(format!("Invalid connection type: {}", s)),
        }
    }
}

/// A bond between two atoms as annotated in the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Record identifier such as `disulf1` or `metalc3`.
    pub name: String,
    pub kind: ConnectionKind,
    pub partners: [AtomAddress; 2],
    /// Distance stated by the record, if any.
    pub reported_distance: Option<f64>,
}

impl Connection {
    pub fn new(name: &str, kind: ConnectionKind, a1: AtomAddress, a2: AtomAddress) -> Self {
        Self {
            name: name.to_string(),
            kind,
            partners: [a1, a2],
            reported_distance: None,
        }
    }

    /// Whether the record joins the two atoms, in either order.
    pub fn links(&self, cra1: &Cra<'_>, cra2: &Cra<'_>) -> bool {
        (self.partners[0].matches(cra1) && self.partners[1].matches(cra2))
            || (self.partners[0].matches(cra2) && self.partners[1].matches(cra1))
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Connection {{ name: \"{}\", kind: {}, {} - {} }}",
            self.name, self.kind, self.partners[0], self.partners[1]
        )
    }
}
