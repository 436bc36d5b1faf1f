use crate::{
    error::{Error, Result},
    remote::Remote,
    time_range::TimeRange,
};
use chrono::{
    format::{parse, Item, Parsed, StrftimeItems},
    naive::NaiveDateTime,
    Datelike, Duration, NaiveDate, NaiveTime, Timelike,
};
use crossbeam_channel::{bounded, unbounded};
use std::fmt::{Display, Write};

/// Resolution of a templated URL pattern, the finest strftime unit it contains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl Step {
    fn of_directive(c: char) -> Option<Step> {
        match c {
            'S' | 's' | 'T' | 'X' | 'c' => Some(Step::Second),
            'M' | 'R' => Some(Step::Minute),
            'H' | 'I' | 'k' | 'l' => Some(Step::Hour),
            'd' | 'e' | 'j' | 'F' | 'D' | 'x' | 'a' | 'A' | 'u' | 'w' => Some(Step::Day),
            'm' | 'b' | 'B' | 'h' => Some(Step::Month),
            'Y' | 'y' | 'C' | 'G' | 'g' => Some(Step::Year),
            _ => None,
        }
    }

    fn truncate(self, t: NaiveDateTime) -> NaiveDateTime {
        let (y, m, d) = (t.year(), t.month(), t.day());
        let (h, min, s) = (t.hour(), t.minute(), t.second());

        let (m, d, h, min, s) = match self {
            Step::Year => (1, 1, 0, 0, 0),
            Step::Month => (m, 1, 0, 0, 0),
            Step::Day => (m, d, 0, 0, 0),
            Step::Hour => (m, d, h, 0, 0),
            Step::Minute => (m, d, h, min, 0),
            Step::Second => (m, d, h, min, s),
        };

        NaiveDate::from_ymd(y, m, d).and_hms(h, min, s)
    }

    /// Next step boundary after `t`, which must already be truncated.
    ///
    /// `None` once the boundary falls past the end of the calendar.
    fn advance(self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Step::Second => t.checked_add_signed(Duration::seconds(1)),
            Step::Minute => t.checked_add_signed(Duration::minutes(1)),
            Step::Hour => t.checked_add_signed(Duration::hours(1)),
            Step::Day => t.checked_add_signed(Duration::days(1)),
            Step::Month if t.month() == 12 => first_of_month(t.year() + 1, 1),
            Step::Month => first_of_month(t.year(), t.month() + 1),
            Step::Year => first_of_month(t.year() + 1, 1),
        }
    }
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.and_hms(0, 0, 0))
}

const NUM_PROBERS: usize = 4;

/// Expands a strftime-templated URL pattern over a time range.
///
/// Besides the strftime codes, the pattern may hold `{name}` placeholders that are
/// filled from [`Scraper::param`] before any date is rendered.
#[derive(Clone, Debug)]
pub struct Scraper {
    pattern: String,
    step: Step,
}

impl Scraper {
    pub fn new(pattern: &str) -> Result<Self> {
        let mut scraper = Scraper {
            pattern: pattern.to_owned(),
            step: Step::Year,
        };
        scraper.validate()?;

        Ok(scraper)
    }

    pub fn param<V: Display>(mut self, name: &str, value: V) -> Result<Self> {
        let placeholder = format!("{{{}}}", name);
        self.pattern = self.pattern.replace(&placeholder, &value.to_string());
        self.validate()?;

        Ok(self)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn format(&self, time: NaiveDateTime) -> Result<String> {
        let mut url = String::new();
        write!(url, "{}", time.format(&self.pattern))
            .map_err(|_| Error::InvalidPattern(self.pattern.clone()))?;

        Ok(url)
    }

    /// Every URL the pattern produces for steps overlapping `range`, in time order.
    pub fn candidates(&self, range: &TimeRange) -> Result<Vec<String>> {
        let mut urls: Vec<String> = vec![];

        let mut curr_time = self.step.truncate(range.start());
        while curr_time <= range.end() {
            let url = self.format(curr_time)?;
            if urls.last() != Some(&url) {
                urls.push(url);
            }
            curr_time = match self.step.advance(curr_time) {
                Some(next) => next,
                None => break,
            };
        }

        Ok(urls)
    }

    /// The candidates for `range` that `remote` reports as present, in time order.
    pub fn filelist<RA>(&self, range: &TimeRange, remote: &RA) -> Result<Vec<String>>
    where
        RA: Remote + 'static,
    {
        let candidates = self.candidates(range)?;
        let num_candidates = candidates.len();
        log::info!(
            "Probing {} candidate(s) between {} and {}",
            num_candidates,
            range.start(),
            range.end()
        );

        let (to_prober, needs_probed) = bounded::<(usize, String)>(100);
        let (to_collector, probed) = unbounded();

        let pool = threadpool::ThreadPool::with_name("Probe Thread".to_owned(), NUM_PROBERS);

        for _ in 0..NUM_PROBERS {
            let remote = remote.clone();
            let needs_probed = needs_probed.clone();
            let to_collector = to_collector.clone();

            pool.execute(move || {
                for (idx, url) in needs_probed {
                    let res = remote.exists(&url);
                    if to_collector.send((idx, url, res)).is_err() {
                        break;
                    }
                }
            });
        }

        drop(needs_probed);
        drop(to_collector);

        for job in candidates.into_iter().enumerate() {
            to_prober
                .send(job)
                .map_err(|err| Error::channel(err.to_string()))?;
        }
        drop(to_prober);

        let mut found: Vec<(usize, String)> = vec![];
        let mut first_err: Option<(usize, Error)> = None;
        let mut num_probed = 0;

        for (idx, url, res) in probed {
            num_probed += 1;
            match res {
                Ok(true) => found.push((idx, url)),
                Ok(false) => log::debug!("Not on remote: {}", url),
                Err(err) => {
                    log::error!("Error probing {} : {}", url, err);
                    if first_err.as_ref().map_or(true, |(i, _)| idx < *i) {
                        first_err = Some((idx, err));
                    }
                }
            }
        }

        if let Some((_, err)) = first_err {
            return Err(err);
        }

        if num_probed != num_candidates {
            log::error!("Only {} of {} probes reported back", num_probed, num_candidates);
            return Err(Error::channel(format!(
                "{} of {} probes lost",
                num_candidates - num_probed,
                num_candidates
            )));
        }

        found.sort_by_key(|(idx, _)| *idx);
        Ok(found.into_iter().map(|(_, url)| url).collect())
    }

    /// Recover the time a URL was rendered for. Missing time fields default to midnight.
    pub fn extract_time(&self, url: &str) -> Option<NaiveDateTime> {
        let mut parsed = Parsed::new();
        parse(&mut parsed, url, StrftimeItems::new(&self.pattern)).ok()?;

        let date = parsed.to_naive_date().ok()?;
        let time = parsed
            .to_naive_time()
            .unwrap_or_else(|_| NaiveTime::from_hms(0, 0, 0));

        Some(date.and_time(time))
    }

    fn validate(&mut self) -> Result<()> {
        let mut step = Step::Year;

        for item in StrftimeItems::new(&self.pattern) {
            if let Item::Error = item {
                return Err(Error::InvalidPattern(self.pattern.clone()));
            }
        }

        let mut chars = self.pattern.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                continue;
            }

            // Skip padding modifiers such as `%-d` or `%_m`.
            let directive = chars.find(|c| !matches!(*c, '-' | '_' | '0' | '#'));
            if let Some(found) = directive.and_then(Step::of_directive) {
                step = step.min(found);
            }
        }

        self.step = step;
        Ok(())
    }
}
