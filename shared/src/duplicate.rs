//! Duplicate date detection
//!
//! A house holds at most one daily record per calendar date. The check runs
//! twice: while the form is being filled (informational) and again right
//! before the write is committed (authoritative).

use chrono::NaiveDate;

use crate::models::HouseNumber;
use crate::types::Dated;
use crate::validation::RecordError;

/// Existing rows that share `date`
pub fn find_duplicates<T: Dated>(records: &[T], date: NaiveDate) -> Vec<&T> {
    records.iter().filter(|r| r.date() == date).collect()
}

/// Whether `date` is already taken, together with the rows holding it
pub fn has_duplicate<T: Dated>(records: &[T], date: NaiveDate) -> (bool, Vec<&T>) {
    let matches = find_duplicates(records, date);
    (!matches.is_empty(), matches)
}

/// Reject a new daily record for a date the house already has
pub fn ensure_unique_date<T: Dated>(
    house: HouseNumber,
    records: &[T],
    date: NaiveDate,
) -> Result<(), RecordError> {
    if records.iter().any(|r| r.date() == date) {
        return Err(RecordError::DuplicateDate { house, date });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::age::AgeAnchor;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    #[test]
    fn test_duplicate_found() {
        let history = [AgeAnchor::new(d(1), 10), AgeAnchor::new(d(2), 11)];
        let (duplicate, matches) = has_duplicate(&history, d(2));
        assert!(duplicate);
        assert_eq!(matches, vec![&history[1]]);
    }

    #[test]
    fn test_no_duplicate() {
        let history = [AgeAnchor::new(d(1), 10)];
        let (duplicate, matches) = has_duplicate(&history, d(3));
        assert!(!duplicate);
        assert!(matches.is_empty());
        assert!(!has_duplicate::<AgeAnchor>(&[], d(3)).0);
    }

    #[test]
    fn test_ensure_unique_date() {
        let house = HouseNumber::new(3).unwrap();
        let history = [AgeAnchor::new(d(1), 10)];
        assert!(ensure_unique_date(house, &history, d(2)).is_ok());
        assert_eq!(
            ensure_unique_date(house, &history, d(1)),
            Err(RecordError::DuplicateDate { house, date: d(1) })
        );
    }
}
