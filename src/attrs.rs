use crate::time_range::TimeRange;
use strum::IntoStaticStr;

/// A search criterion handed to a data source.
///
/// The serialized strum name is the attribute's kind tag.
#[derive(Clone, Debug, PartialEq, IntoStaticStr)]
pub enum QueryAttr {
    #[strum(serialize = "Time")]
    Time(TimeRange),
    #[strum(serialize = "Instrument")]
    Instrument(String),
    #[strum(serialize = "Level")]
    Level(u32),
    /// Wavelength band in nanometres, `(min, max)`.
    #[strum(serialize = "Wavelength")]
    Wavelength(f64, f64),
    #[strum(serialize = "Source")]
    Source(String),
    #[strum(serialize = "Provider")]
    Provider(String),
    #[strum(serialize = "Physobs")]
    Physobs(String),
}

impl QueryAttr {
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    pub fn instrument(name: &str) -> Self {
        QueryAttr::Instrument(name.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(QueryAttr::instrument("lyra").kind(), "Instrument");
        assert_eq!(QueryAttr::Level(1).kind(), "Level");
        assert_eq!(QueryAttr::Wavelength(1.0, 2.0).kind(), "Wavelength");
        assert_eq!(QueryAttr::Physobs("irradiance".into()).kind(), "Physobs");
    }
}
