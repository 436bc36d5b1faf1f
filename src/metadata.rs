use std::collections::BTreeMap;

/// Fixed description of where a data source's files come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceMetadata {
    pub source: &'static str,
    pub instrument: &'static str,
    pub physobs: &'static str,
    pub provider: &'static str,
}

impl SourceMetadata {
    pub fn to_map(&self) -> BTreeMap<&'static str, &'static str> {
        let mut map = BTreeMap::new();
        map.insert("source", self.source);
        map.insert("instrument", self.instrument);
        map.insert("physobs", self.physobs);
        map.insert("provider", self.provider);
        map
    }
}
