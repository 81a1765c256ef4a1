use indexmap::IndexMap;

/// Read-only mapping from a resolution label to its pixel size
#[derive(Clone, Debug, PartialEq)]
pub struct ResolutionTable {
    entries: IndexMap<String, (u32, u32)>,
}

impl Default for ResolutionTable {
    fn default() -> Self {
        Self::new(&[
            ("2160p", (3840, 2160)),
            ("1440p", (2560, 1440)),
            ("1080p", (1920, 1080)),
        ])
    }
}

impl ResolutionTable {
    pub fn new(entries: &[(&str, (u32, u32))]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(label, size)| (label.to_string(), *size))
                .collect(),
        }
    }

    pub fn get(&self, label: &str) -> Option<(f32, f32)> {
        self.entries
            .get(label)
            .map(|(w, h)| (*w as f32, *h as f32))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The largest entry by pixel area. Background scaling is expressed
    /// relative to it.
    pub fn reference(&self) -> Option<(f32, f32)> {
        self.entries
            .values()
            .max_by_key(|(w, h)| u64::from(*w) * u64::from(*h))
            .map(|(w, h)| (*w as f32, *h as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let table = ResolutionTable::default();
        assert_eq!(table.get("1080p"), Some((1920.0, 1080.0)));
        assert_eq!(table.get("720p"), None);
    }

    #[test]
    fn test_reference_is_largest_entry() {
        let table = ResolutionTable::default();
        assert_eq!(table.reference(), Some((3840.0, 2160.0)));

        let table =
            ResolutionTable::new(&[("small", (10, 10)), ("wide", (40, 5))]);
        assert_eq!(table.reference(), Some((40.0, 5.0)));

        assert_eq!(ResolutionTable::new(&[]).reference(), None);
    }
}
