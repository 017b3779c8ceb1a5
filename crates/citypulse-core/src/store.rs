//! Running aggregates over accepted records.
//!
//! [`AggregationStore`] owns every per-city, per-name and per-hobby counter.
//! It is mutated only through [`AggregationStore::apply`] and
//! [`AggregationStore::merge`]; everything else is read-only.

use std::collections::BTreeMap;

use tracing::warn;

use crate::extract::Record;

/// Per-city running sums.
///
/// A sum that would exceed `u64::MAX` stays at `u64::MAX` and a warning is
/// logged; averages of such a city are no longer exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityStats {
    name: String,
    sum_age: u64,
    sum_friend_count: u64,
    max_friend_count: u64,
    person_count: u64,
}

impl CityStats {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sum_age: 0,
            sum_friend_count: 0,
            max_friend_count: 0,
            person_count: 0,
        }
    }

    fn add_person(&mut self, age: u64, friend_count: u64) {
        accumulate(&mut self.sum_age, age, &self.name, "sum_age");
        accumulate(&mut self.sum_friend_count, friend_count, &self.name, "sum_friend_count");
        self.max_friend_count = self.max_friend_count.max(friend_count);
        self.person_count += 1;
    }

    fn merge(&mut self, other: &Self) {
        accumulate(&mut self.sum_age, other.sum_age, &self.name, "sum_age");
        accumulate(
            &mut self.sum_friend_count,
            other.sum_friend_count,
            &self.name,
            "sum_friend_count",
        );
        self.max_friend_count = self.max_friend_count.max(other.max_friend_count);
        self.person_count += other.person_count;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn sum_age(&self) -> u64 {
        self.sum_age
    }

    pub const fn sum_friend_count(&self) -> u64 {
        self.sum_friend_count
    }

    pub const fn max_friend_count(&self) -> u64 {
        self.max_friend_count
    }

    pub const fn person_count(&self) -> u64 {
        self.person_count
    }

    /// Mean age, or `0.0` for a city with no people.
    pub fn average_age(&self) -> f64 {
        ratio(self.sum_age, self.person_count)
    }

    /// Mean friend count, or `0.0` for a city with no people.
    pub fn average_friend_count(&self) -> f64 {
        ratio(self.sum_friend_count, self.person_count)
    }
}

fn accumulate(total: &mut u64, value: u64, city: &str, field: &'static str) {
    match total.checked_add(value) {
        Some(sum) => *total = sum,
        None => {
            warn!(city, field, "sum overflowed, clamping at u64::MAX");
            *total = u64::MAX;
        }
    }
}

fn ratio(sum: u64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum as f64 / count as f64
}

/// City, name and hobby aggregates for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationStore {
    cities: BTreeMap<String, CityStats>,
    names: BTreeMap<String, u64>,
    hobbies: BTreeMap<String, u64>,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one validated person into the aggregates.
    ///
    /// The name is counted once, the city entry is created on first sight and
    /// updated in the same call, and every hobby occurrence is counted.
    pub fn apply(&mut self, city: &str, age: u64, friend_count: u64, hobbies: &[&str], name: &str) {
        increment(&mut self.names, name, 1);

        match self.cities.get_mut(city) {
            Some(stats) => stats.add_person(age, friend_count),
            None => {
                let mut stats = CityStats::new(city);
                stats.add_person(age, friend_count);
                self.cities.insert(city.to_owned(), stats);
            }
        }

        for hobby in hobbies {
            increment(&mut self.hobbies, hobby, 1);
        }
    }

    pub fn apply_record(&mut self, record: &Record<'_>) {
        self.apply(
            record.city,
            record.age,
            record.friends.count,
            &record.friends.hobbies,
            record.name,
        );
    }

    /// Combines the aggregates of another store into this one.
    ///
    /// Sums and counts add up and the friend maximum takes the larger value,
    /// so merging shards in any order gives the same result.
    pub fn merge(&mut self, other: Self) {
        for (city, stats) in other.cities {
            match self.cities.get_mut(&city) {
                Some(existing) => existing.merge(&stats),
                None => {
                    self.cities.insert(city, stats);
                }
            }
        }
        for (name, count) in other.names {
            increment(&mut self.names, &name, count);
        }
        for (hobby, count) in other.hobbies {
            increment(&mut self.hobbies, &hobby, count);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty() && self.names.is_empty() && self.hobbies.is_empty()
    }

    pub fn city(&self, name: &str) -> Option<&CityStats> {
        self.cities.get(name)
    }

    /// Cities in ascending name order.
    pub fn cities(&self) -> impl Iterator<Item = &CityStats> {
        self.cities.values()
    }

    pub fn name_count(&self, name: &str) -> u64 {
        self.names.get(name).copied().unwrap_or(0)
    }

    pub fn hobby_count(&self, hobby: &str) -> u64 {
        self.hobbies.get(hobby).copied().unwrap_or(0)
    }

    pub fn name_counts(&self) -> &BTreeMap<String, u64> {
        &self.names
    }

    pub fn hobby_counts(&self) -> &BTreeMap<String, u64> {
        &self.hobbies
    }

    /// The most frequent name; ties go to the lexicographically smallest.
    pub fn most_common_name(&self) -> Option<(&str, u64)> {
        most_common(&self.names)
    }

    /// The most frequent hobby; ties go to the lexicographically smallest.
    pub fn most_common_hobby(&self) -> Option<(&str, u64)> {
        most_common(&self.hobbies)
    }
}

fn increment(counts: &mut BTreeMap<String, u64>, key: &str, by: u64) {
    match counts.get_mut(key) {
        Some(count) => *count = count.saturating_add(by),
        None => {
            counts.insert(key.to_owned(), by);
        }
    }
}

// Keys iterate in ascending order, so keeping only strictly greater counts
// leaves the smallest key among equal maxima.
fn most_common(counts: &BTreeMap<String, u64>) -> Option<(&str, u64)> {
    let mut best: Option<(&str, u64)> = None;
    for (key, &count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((key.as_str(), count));
        }
    }
    best
}
