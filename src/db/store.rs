use super::library::MonomerLibrary;
use super::loader;
use std::sync::OnceLock;

static STANDARD: OnceLock<MonomerLibrary> = OnceLock::new();

pub fn get_standard_library() -> &'static MonomerLibrary {
    STANDARD.get_or_init(|| {
        let content = include_str!("../../data/links.toml");
        loader::parse_library(content)
            .unwrap_or_else(|e| panic!("Failed to parse embedded link dictionary: {}", e))
    })
}
