//! Static directory of supported news outlets

use serde::Serialize;

/// Display name to news-search source id, in presentation order
pub const NEWS_OUTLETS: &[(&str, &str)] = &[
    ("ABC News", "abc-news"),
    ("Associated Press", "associated-press"),
    ("BBC News", "bbc-news"),
    ("Breitbart News", "breitbart-news"),
    ("CBS News", "cbs-news"),
    ("CNN", "cnn"),
    ("Fox News", "fox-news"),
    ("MSNBC", "msnbc"),
    ("NBC News", "nbc-news"),
    ("Politico", "politico"),
    ("Reuters", "reuters"),
    ("The Hill", "the-hill"),
    ("The Wall Street Journal", "the-wall-street-journal"),
    ("The Washington Post", "the-washington-post"),
    ("The Washington Times", "the-washington-times"),
    ("USA Today", "usa-today"),
];

/// A news publisher known to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outlet {
    pub name: String,
    pub source_id: String,
}

/// Read-only outlet lookup
#[derive(Debug, Clone)]
pub struct OutletDirectory {
    outlets: Vec<Outlet>,
}

impl OutletDirectory {
    pub fn new(outlets: Vec<Outlet>) -> Self {
        Self { outlets }
    }

    /// Outlet names in directory order
    pub fn names(&self) -> Vec<&str> {
        self.outlets.iter().map(|o| o.name.as_str()).collect()
    }

    /// Exact-name lookup of the external source id
    pub fn source_id(&self, name: &str) -> Option<&str> {
        self.outlets
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.source_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.outlets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outlets.is_empty()
    }
}

impl Default for OutletDirectory {
    fn default() -> Self {
        Self::new(
            NEWS_OUTLETS
                .iter()
                .map(|(name, source_id)| Outlet {
                    name: name.to_string(),
                    source_id: source_id.to_string(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directory_preserves_order() {
        let directory = OutletDirectory::default();

        assert_eq!(directory.len(), NEWS_OUTLETS.len());
        assert_eq!(directory.names()[0], "ABC News");
        assert_eq!(directory.names().last(), Some(&"USA Today"));
    }

    #[test]
    fn test_source_id_lookup() {
        let directory = OutletDirectory::default();

        assert_eq!(directory.source_id("BBC News"), Some("bbc-news"));
        assert_eq!(directory.source_id("bbc news"), None);
        assert_eq!(directory.source_id("Daily Planet"), None);
    }
}
