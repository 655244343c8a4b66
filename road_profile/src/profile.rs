//! Ordered collections of records keyed by a start offset.
//!
//! Width, elevation, lane-offset, height and road-mark records all live in a
//! [`Profile`]. Records are kept sorted by strictly increasing start offset and
//! a record is active from its own start up to the next record's start.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ProfileError, Result};

/// Two starts closer than this are treated as the same offset.
pub const OFFSET_EPSILON: f64 = 1e-9;

/// A record that can be stored in a [`Profile`].
pub trait ProfileRecord {
    /// Arc length at which the record becomes active.
    fn start(&self) -> f64;

    fn set_start(&mut self, start: f64);
}

/// Records that evaluate to a scalar value.
pub trait Polynomial: ProfileRecord + Sized {
    fn eval(&self, s: f64) -> f64;

    /// Returns a record starting at `s` that continues this one unchanged.
    fn split(&self, s: f64) -> Self;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile<T> {
    records: Vec<T>,
}

impl<T> Default for Profile<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: ProfileRecord> Profile<T> {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile holding a single record.
    pub fn single(record: T) -> Self {
        Self {
            records: vec![record],
        }
    }

    /// Builds a profile from unordered records, rejecting duplicate starts.
    pub fn from_records(mut records: Vec<T>) -> Result<Self> {
        records.sort_by(|a, b| a.start().total_cmp(&b.start()));
        for pair in records.windows(2) {
            if (pair[1].start() - pair[0].start()).abs() < OFFSET_EPSILON {
                return Err(ProfileError::DuplicateOffset {
                    s: pair[1].start(),
                });
            }
        }
        Ok(Self { records })
    }

    /// Inserts `record` at its sorted position.
    ///
    /// Fails with [`ProfileError::DuplicateOffset`] if a record already starts
    /// at the same offset; the profile is left untouched in that case.
    pub fn insert(&mut self, record: T) -> Result<()> {
        let s = record.start();
        if self.position_of(s).is_some() {
            return Err(ProfileError::DuplicateOffset { s });
        }
        let idx = self.records.partition_point(|r| r.start() < s);
        self.records.insert(idx, record);
        Ok(())
    }

    /// Removes and returns the record starting at `start`.
    pub fn remove(&mut self, start: f64) -> Result<T> {
        let idx = self
            .position_of(start)
            .ok_or(ProfileError::MissingRecord { s: start })?;
        Ok(self.records.remove(idx))
    }

    /// Replaces the record starting at `start`, keeping its start offset.
    pub fn replace(&mut self, start: f64, mut record: T) -> Result<T> {
        let idx = self
            .position_of(start)
            .ok_or(ProfileError::MissingRecord { s: start })?;
        record.set_start(self.records[idx].start());
        Ok(std::mem::replace(&mut self.records[idx], record))
    }

    fn position_of(&self, start: f64) -> Option<usize> {
        self.records
            .iter()
            .position(|r| (r.start() - start).abs() < OFFSET_EPSILON)
    }

    /// Index of the last record with `start <= s`.
    pub fn active_index(&self, s: f64) -> Option<usize> {
        let n = self.records.partition_point(|r| r.start() <= s);
        n.checked_sub(1)
    }

    /// The record active at `s`, or `None` if `s` precedes every record.
    pub fn active_record(&self, s: f64) -> Option<&T> {
        self.active_index(s).map(|i| &self.records[i])
    }

    /// End of the active range of record `index`: the next record's start,
    /// or `element_end` for the last one.
    pub fn record_end(&self, index: usize, element_end: f64) -> f64 {
        self.records
            .get(index + 1)
            .map(|r| r.start())
            .unwrap_or(element_end)
    }

    /// Active `[start, end)` range of the record active at `s`.
    pub fn active_range(&self, s: f64, element_end: f64) -> Option<(f64, f64)> {
        let idx = self.active_index(s)?;
        Some((self.records[idx].start(), self.record_end(idx, element_end)))
    }

    /// Moves every record by `ds`.
    pub fn shift(&mut self, ds: f64) {
        for r in &mut self.records {
            let s = r.start();
            r.set_start(s + ds);
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }
}

impl<T: Polynomial> Profile<T> {
    /// Value of the active record at `s`, or `None` before the first record.
    pub fn value_at(&self, s: f64) -> Option<f64> {
        self.active_record(s).map(|r| r.eval(s))
    }

    /// Like [`Profile::value_at`], treating "no active record" as zero.
    pub fn value_or_zero(&self, s: f64) -> f64 {
        self.value_at(s).unwrap_or(0.0)
    }

    /// Inserts a record at `s` continuing the active record, so the values of
    /// the profile do not change.
    pub fn split_at(&mut self, s: f64) -> Result<()> {
        if self.position_of(s).is_some() {
            return Err(ProfileError::DuplicateOffset { s });
        }
        let record = match self.active_record(s) {
            Some(active) => active.split(s),
            None => {
                let start = self.first().map(|r| r.start()).unwrap_or(s);
                return Err(ProfileError::OutOfRange { s, start, end: f64::INFINITY });
            }
        };
        self.insert(record)
    }
}

impl<'a, T> IntoIterator for &'a Profile<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<T: Serialize> Serialize for Profile<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Profile<T>
where
    T: Deserialize<'de> + ProfileRecord,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let records = Vec::<T>::deserialize(deserializer)?;
        Profile::from_records(records).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cubic::CubicInterval;

    fn widths(records: &[(f64, f64)]) -> Profile<CubicInterval> {
        let mut p = Profile::new();
        for &(s, a) in records {
            p.insert(CubicInterval::constant(s, a)).unwrap();
        }
        p
    }

    #[test]
    fn insert_keeps_order() {
        let p = widths(&[(10.0, 2.0), (0.0, 3.5), (5.0, 3.0)]);
        let starts: Vec<f64> = p.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn duplicate_rejected_and_profile_unchanged() {
        let mut p = widths(&[(5.0, 3.0)]);
        let err = p.insert(CubicInterval::constant(5.0, 9.0)).unwrap_err();
        assert_eq!(err, ProfileError::DuplicateOffset { s: 5.0 });
        assert_eq!(p.len(), 1);
        assert_eq!(p.value_at(5.0), Some(3.0));
    }

    #[test]
    fn lookup_before_first_record() {
        let p = widths(&[(2.0, 1.0)]);
        assert!(p.value_at(1.0).is_none());
        assert!(p.active_record(1.999).is_none());
        assert_eq!(p.value_or_zero(1.0), 0.0);
        assert_eq!(p.value_at(2.0), Some(1.0));
    }

    #[test]
    fn exactly_one_record_active() {
        let p = widths(&[(0.0, 1.0), (3.0, 2.0), (7.0, 3.0)]);
        let mut s = 0.0;
        while s < 10.0 {
            let active: Vec<_> = p
                .iter()
                .enumerate()
                .filter(|(i, r)| r.start <= s && s < p.record_end(*i, 10.0))
                .collect();
            assert_eq!(active.len(), 1, "s = {s}");
            assert_eq!(p.active_index(s), Some(active[0].0));
            s += 0.25;
        }
    }

    #[test]
    fn record_end_and_range() {
        let p = widths(&[(0.0, 1.0), (4.0, 2.0)]);
        assert_eq!(p.record_end(0, 20.0), 4.0);
        assert_eq!(p.record_end(1, 20.0), 20.0);
        assert_eq!(p.active_range(6.0, 20.0), Some((4.0, 20.0)));
    }

    #[test]
    fn shift_moves_every_start() {
        let mut p = widths(&[(0.0, 1.0), (4.0, 2.0)]);
        p.shift(10.0);
        assert_eq!(p.first().unwrap().start, 10.0);
        assert_eq!(p.last().unwrap().start, 14.0);
        assert_eq!(p.value_at(12.0), Some(1.0));
        assert_eq!(p.value_at(5.0), None);
    }

    #[test]
    fn remove_and_replace() {
        let mut p = widths(&[(0.0, 1.0), (4.0, 2.0)]);
        let old = p.replace(4.0, CubicInterval::constant(99.0, 5.0)).unwrap();
        assert_eq!(old.a, 2.0);
        assert_eq!(p.get(1).unwrap().start, 4.0);
        assert_eq!(p.value_at(4.5), Some(5.0));
        p.remove(0.0).unwrap();
        assert_eq!(p.len(), 1);
        assert!(matches!(
            p.remove(1.0),
            Err(ProfileError::MissingRecord { .. })
        ));
    }

    #[test]
    fn split_preserves_values() {
        let mut p = Profile::new();
        p.insert(CubicInterval::new(0.0, 3.0, 0.1, 0.01, -0.001)).unwrap();
        let before: Vec<f64> = (0..20).map(|i| p.value_or_zero(i as f64)).collect();
        p.split_at(7.5).unwrap();
        assert_eq!(p.len(), 2);
        for (i, v) in before.iter().enumerate() {
            assert!((p.value_or_zero(i as f64) - v).abs() < 1e-9);
        }
        assert!(p.split_at(7.5).is_err());
    }

    #[test]
    fn split_before_first_record_is_out_of_range() {
        let mut p = widths(&[(5.0, 1.0)]);
        assert!(matches!(p.split_at(1.0), Err(ProfileError::OutOfRange { .. })));
    }

    #[test]
    fn deserialize_sorts_and_validates() {
        let p: Profile<CubicInterval> = serde_json::from_str(
            r#"[{"s":4.0,"a":2.0,"b":0.0,"c":0.0,"d":0.0},{"s":0.0,"a":1.0,"b":0.0,"c":0.0,"d":0.0}]"#,
        )
        .unwrap();
        assert_eq!(p.first().unwrap().start, 0.0);

        let dup = serde_json::from_str::<Profile<CubicInterval>>(
            r#"[{"s":1.0,"a":2.0,"b":0.0,"c":0.0,"d":0.0},{"s":1.0,"a":1.0,"b":0.0,"c":0.0,"d":0.0}]"#,
        );
        assert!(dup.is_err());
    }
}
