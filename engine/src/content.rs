use std::collections::HashMap;

pub const DEFAULT_LOCALE: &str = "en";

pub fn builtin_catalogs() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("en", include_str!("../content/catalog/en.json")),
        ("es", include_str!("../content/catalog/es.json")),
    ])
}
