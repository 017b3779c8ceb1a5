//! Report rendering.
//!
//! A [`Report`] is a read-only view over an [`AggregationStore`] restricted to
//! the requested [`ReportSections`]. Averages are computed while building it.
//!
//! | Section | Flag | JSON key |
//! |---------|------|----------|
//! | [`ReportSection::AverageAge`] | `-y` | `city_data[].data.average_age` |
//! | [`ReportSection::AverageFriendCount`] | `-f` | `city_data[].data.average_friend_count` |
//! | [`ReportSection::MostFriendsCount`] | `-m` | `city_data[].data.most_friends_count` |
//! | [`ReportSection::MostCommonName`] | `-n` | `most_common_name` |
//! | [`ReportSection::MostCommonHobby`] | `-r` | `most_common_hobby` |

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::ReportError;
use crate::store::{AggregationStore, CityStats};

/// One independently toggled part of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportSection {
    AverageAge,
    AverageFriendCount,
    MostFriendsCount,
    MostCommonName,
    MostCommonHobby,
}

impl ReportSection {
    pub const ALL: [Self; 5] = [
        Self::AverageAge,
        Self::AverageFriendCount,
        Self::MostFriendsCount,
        Self::MostCommonName,
        Self::MostCommonHobby,
    ];

    /// Whether the section lives inside a `city_data` entry.
    pub const fn is_per_city(self) -> bool {
        matches!(
            self,
            Self::AverageAge | Self::AverageFriendCount | Self::MostFriendsCount
        )
    }
}

/// Requested sections. An empty selection means every section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSections {
    requested: BTreeSet<ReportSection>,
}

impl ReportSections {
    pub fn all() -> Self {
        Self::default()
    }

    /// A selection holding just `section`; extend it with [`Self::with`].
    pub fn only(section: ReportSection) -> Self {
        Self::default().with(section)
    }

    pub fn with(mut self, section: ReportSection) -> Self {
        self.requested.insert(section);
        self
    }

    pub fn includes(&self, section: ReportSection) -> bool {
        self.requested.is_empty() || self.requested.contains(&section)
    }

    pub fn includes_city_data(&self) -> bool {
        ReportSection::ALL
            .into_iter()
            .filter(|section| section.is_per_city())
            .any(|section| self.includes(section))
    }
}

impl FromIterator<ReportSection> for ReportSections {
    fn from_iter<I: IntoIterator<Item = ReportSection>>(iter: I) -> Self {
        Self {
            requested: iter.into_iter().collect(),
        }
    }
}

/// Rendered statistics for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityEntry<'a> {
    pub city: &'a str,
    pub data: CityFigures,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CityFigures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_age: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_friend_count: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_friends_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameEntry<'a> {
    pub name: &'a str,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HobbyEntry<'a> {
    pub hobby: &'a str,
    pub count: u64,
}

/// The output document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_data: Option<Vec<CityEntry<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_name: Option<NameEntry<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_hobby: Option<HobbyEntry<'a>>,
}

impl<'a> Report<'a> {
    /// Builds the report for `sections` over the current state of `store`.
    ///
    /// `city_data` is left out when no per-city section is requested.
    /// `most_common_name` and `most_common_hobby` are left out when there is
    /// nothing to count.
    pub fn build(store: &'a AggregationStore, sections: &ReportSections) -> Self {
        let city_data = sections.includes_city_data().then(|| {
            store
                .cities()
                .map(|stats| city_entry(stats, sections))
                .collect()
        });

        let most_common_name = if sections.includes(ReportSection::MostCommonName) {
            store
                .most_common_name()
                .map(|(name, count)| NameEntry { name, count })
        } else {
            None
        };

        let most_common_hobby = if sections.includes(ReportSection::MostCommonHobby) {
            store
                .most_common_hobby()
                .map(|(hobby, count)| HobbyEntry { hobby, count })
        } else {
            None
        };

        Self {
            city_data,
            most_common_name,
            most_common_hobby,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, ReportError> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }
}

/// Builds and renders in one step.
pub fn render_report(
    store: &AggregationStore,
    sections: &ReportSections,
    pretty: bool,
) -> Result<String, ReportError> {
    Report::build(store, sections).to_json(pretty)
}

fn city_entry<'a>(stats: &'a CityStats, sections: &ReportSections) -> CityEntry<'a> {
    let data = CityFigures {
        average_age: sections
            .includes(ReportSection::AverageAge)
            .then(|| stats.average_age()),
        average_friend_count: sections
            .includes(ReportSection::AverageFriendCount)
            .then(|| stats.average_friend_count()),
        most_friends_count: sections
            .includes(ReportSection::MostFriendsCount)
            .then(|| stats.max_friend_count()),
    };

    CityEntry {
        city: stats.name(),
        data,
    }
}
