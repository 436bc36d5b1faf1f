use crate::{
    attrs::QueryAttr,
    error::{Error, Result},
    metadata::SourceMetadata,
    time_range::TimeRange,
};
use chrono::{naive::NaiveDateTime, NaiveDate};

/// One file a search turned up.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryRow {
    pub client: &'static str,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub source: &'static str,
    pub instrument: &'static str,
    pub physobs: &'static str,
    pub provider: &'static str,
    pub url: String,
}

/// An archive of dated files that the dispatcher can query.
pub trait DataSource {
    fn name(&self) -> &'static str;

    fn resolve_range(&self, range: &TimeRange, level: Option<u32>) -> Result<Vec<String>>;

    fn resolve_date(&self, date: NaiveDate, level: Option<u32>) -> String;

    fn metadata(&self) -> SourceMetadata;

    fn can_handle(&self, attrs: &[QueryAttr]) -> bool;

    /// Span of time held by the file at `url`, if it can be told from the name.
    fn coverage(&self, url: &str) -> Option<(NaiveDateTime, NaiveDateTime)>;

    /// Resolve a query into result rows.
    ///
    /// The first `Time` attribute bounds the search and the last `Level` attribute, if
    /// any, picks the processing level.
    fn search(&self, attrs: &[QueryAttr]) -> Result<Vec<QueryRow>> {
        if !self.can_handle(attrs) {
            return Err(Error::Unsupported(self.name()));
        }

        let range = attrs
            .iter()
            .find_map(|attr| match attr {
                QueryAttr::Time(range) => Some(*range),
                _ => None,
            })
            .ok_or(Error::MissingTime)?;

        let level = attrs.iter().rev().find_map(|attr| match attr {
            QueryAttr::Level(level) => Some(*level),
            _ => None,
        });

        let meta = self.metadata();
        let rows = self
            .resolve_range(&range, level)?
            .into_iter()
            .map(|url| {
                let (start, end) = self
                    .coverage(&url)
                    .unwrap_or_else(|| (range.start(), range.end()));

                QueryRow {
                    client: self.name(),
                    start,
                    end,
                    source: meta.source,
                    instrument: meta.instrument,
                    physobs: meta.physobs,
                    provider: meta.provider,
                    url,
                }
            })
            .collect();

        Ok(rows)
    }
}
