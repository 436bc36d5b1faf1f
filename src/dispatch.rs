use crate::{
    attrs::QueryAttr,
    error::{Error, Result},
    lyra::LyraClient,
    source::{DataSource, QueryRow},
};

/// Routes a query to every registered data source that can service it.
#[derive(Default)]
pub struct Dispatcher {
    sources: Vec<Box<dyn DataSource>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher with the LYRA archive registered over HTTP.
    pub fn with_defaults() -> Result<Self> {
        let mut dispatcher = Self::new();
        dispatcher.register(Box::new(LyraClient::connect()?));
        Ok(dispatcher)
    }

    pub fn register(&mut self, source: Box<dyn DataSource>) {
        log::debug!("Registered data source {}", source.name());
        self.sources.push(source);
    }

    /// Names of the sources that would answer `attrs`.
    pub fn candidates(&self, attrs: &[QueryAttr]) -> Vec<&'static str> {
        self.sources
            .iter()
            .filter(|source| source.can_handle(attrs))
            .map(|source| source.name())
            .collect()
    }

    pub fn search(&self, attrs: &[QueryAttr]) -> Result<Vec<QueryRow>> {
        let mut rows = vec![];
        let mut matched = false;

        for source in self.sources.iter().filter(|s| s.can_handle(attrs)) {
            matched = true;
            let found = source.search(attrs)?;
            log::info!("{} result(s) from {}", found.len(), source.name());
            rows.extend(found);
        }

        if !matched {
            log::warn!("No data source can service query: {:?}", attrs);
            return Err(Error::NoSource);
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{http_remote::HttpRemote, metadata::SourceMetadata, time_range::TimeRange};
    use chrono::{naive::NaiveDateTime, NaiveDate};
    use httpmock::{Method::HEAD, MockServer};

    struct Goes;

    impl DataSource for Goes {
        fn name(&self) -> &'static str {
            "GOESClient"
        }

        fn resolve_range(&self, _range: &TimeRange, _level: Option<u32>) -> Result<Vec<String>> {
            Ok(vec!["goes.nc".to_owned()])
        }

        fn resolve_date(&self, date: NaiveDate, _level: Option<u32>) -> String {
            format!("goes_{}.nc", date.format("%Y%m%d"))
        }

        fn metadata(&self) -> SourceMetadata {
            SourceMetadata {
                source: "NOAA",
                instrument: "xrs",
                physobs: "irradiance",
                provider: "sdac",
            }
        }

        fn can_handle(&self, attrs: &[QueryAttr]) -> bool {
            attrs.iter().any(|attr| *attr == QueryAttr::instrument("xrs"))
        }

        fn coverage(&self, _url: &str) -> Option<(NaiveDateTime, NaiveDateTime)> {
            None
        }
    }

    fn range() -> TimeRange {
        let day = NaiveDate::from_ymd(2016, 1, 1);
        TimeRange::from_dates(day, day).unwrap()
    }

    #[test]
    fn test_routes_by_instrument() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(HEAD).path("/2016/01/01/lyra_20160101-000000_lev2_std.fits");
            then.status(200);
        });

        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Box::new(Goes));
        dispatcher.register(Box::new(LyraClient::with_base_url(
            HttpRemote::connect().unwrap(),
            &server.base_url(),
        )));

        let query = [QueryAttr::Time(range()), QueryAttr::instrument("lyra")];
        assert_eq!(dispatcher.candidates(&query), vec!["LYRAClient"]);

        let rows = dispatcher.search(&query).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].instrument, "lyra");

        let rows = dispatcher
            .search(&[QueryAttr::Time(range()), QueryAttr::instrument("xrs")])
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].client, "GOESClient");
        assert_eq!(rows[0].start, range().start());
    }

    #[test]
    fn test_no_source() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Box::new(Goes));

        let err = dispatcher
            .search(&[QueryAttr::Time(range()), QueryAttr::instrument("eve")])
            .unwrap_err();
        assert!(matches!(err, Error::NoSource));
    }
}
