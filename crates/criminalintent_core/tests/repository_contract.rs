//! Behavior every `CrimeRepository` backend must share.

use chrono::{TimeZone, Timelike, Utc};
use criminalintent_core::db::open_db_in_memory;
use criminalintent_core::{
    Crime, CrimeRepository, InMemoryCrimeRepository, RepoError, RepoErrorKind,
    SqliteCrimeRepository,
};

fn with_each_backend(check: impl Fn(&dyn CrimeRepository)) {
    check(&InMemoryCrimeRepository::new());

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCrimeRepository::try_new(&conn).unwrap();
    check(&repo);
}

#[test]
fn get_after_add_returns_equal_crime() {
    with_each_backend(|repo| {
        let mut crime = Crime::new().titled("Crime #7");
        crime.suspect = Some("Mr. Green".to_string());
        crime.requires_police = true;

        let id = repo.add_crime(&crime).unwrap();

        assert_eq!(id, crime.id);
        assert_eq!(repo.get_crime(id).unwrap(), Some(crime.clone()));
    });
}

#[test]
fn sub_millisecond_timestamps_round_trip_equal() {
    with_each_backend(|repo| {
        let precise = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        let mut crime = Crime::new();
        crime.set_occurred_at(precise);
        repo.add_crime(&crime).unwrap();

        let loaded = repo.get_crime(crime.id).unwrap().unwrap();
        assert_eq!(loaded, crime);
        assert_eq!(loaded.occurred_at().nanosecond(), 123_000_000);

        crime.set_occurred_at(precise.with_nanosecond(987_654_321).unwrap());
        repo.update_crime(&crime).unwrap();
        assert_eq!(repo.get_crime(crime.id).unwrap(), Some(crime.clone()));
    });
}

#[test]
fn latest_update_wins() {
    with_each_backend(|repo| {
        let mut crime = Crime::new();
        repo.add_crime(&crime).unwrap();

        for round in 0..5 {
            crime.title = Some(format!("rev {round}"));
            crime.solved = round % 2 == 0;
            repo.update_crime(&crime).unwrap();
        }

        let loaded = repo.get_crime(crime.id).unwrap().unwrap();
        assert_eq!(loaded, crime);
        assert_eq!(loaded.title.as_deref(), Some("rev 4"));
        assert!(loaded.solved);
    });
}

#[test]
fn update_of_unknown_id_is_noop() {
    with_each_backend(|repo| {
        let stored = Crime::new().titled("kept");
        repo.add_crime(&stored).unwrap();

        repo.update_crime(&Crime::new().titled("ghost")).unwrap();

        assert_eq!(repo.list_crimes().unwrap(), vec![stored.clone()]);
    });
}

#[test]
fn get_unknown_id_returns_none() {
    with_each_backend(|repo| {
        assert_eq!(repo.get_crime(Crime::new().id).unwrap(), None);
    });
}

#[test]
fn delete_is_idempotent() {
    with_each_backend(|repo| {
        let crime = Crime::new();
        repo.add_crime(&crime).unwrap();

        repo.delete_crime(crime.id).unwrap();
        repo.delete_crime(crime.id).unwrap();

        assert_eq!(repo.get_crime(crime.id).unwrap(), None);
        assert_eq!(repo.crime_count().unwrap(), 0);
    });
}

#[test]
fn list_preserves_insertion_order() {
    with_each_backend(|repo| {
        let crimes: Vec<Crime> = (0..5)
            .map(|index| Crime::new().titled(format!("Crime #{index}")))
            .collect();
        for crime in &crimes {
            repo.add_crime(crime).unwrap();
        }

        let mut edited = crimes[1].clone();
        edited.solved = true;
        repo.update_crime(&edited).unwrap();
        repo.delete_crime(crimes[3].id).unwrap();

        let titles: Vec<String> = repo
            .list_crimes()
            .unwrap()
            .iter()
            .map(|crime| crime.display_title().to_string())
            .collect();
        assert_eq!(titles, ["Crime #0", "Crime #1", "Crime #2", "Crime #4"]);
    });
}

#[test]
fn count_tracks_adds_minus_deletes() {
    with_each_backend(|repo| {
        let crimes: Vec<Crime> = (0..4).map(|_| Crime::new()).collect();
        for crime in &crimes {
            repo.add_crime(crime).unwrap();
        }
        repo.delete_crime(crimes[0].id).unwrap();
        repo.delete_crime(crimes[2].id).unwrap();
        repo.delete_crime(crimes[2].id).unwrap();

        assert_eq!(repo.crime_count().unwrap(), 2);
        assert_eq!(repo.list_crimes().unwrap().len(), 2);
    });
}

#[test]
fn duplicate_add_is_rejected_and_keeps_original() {
    with_each_backend(|repo| {
        let original = Crime::new().titled("first");
        repo.add_crime(&original).unwrap();

        let mut clash = original.clone();
        clash.title = Some("second".to_string());
        let err = repo.add_crime(&clash).unwrap_err();

        assert!(matches!(err, RepoError::DuplicateId(id) if id == original.id));
        assert_eq!(err.kind(), RepoErrorKind::Conflict);
        assert_eq!(repo.get_crime(original.id).unwrap(), Some(original.clone()));
        assert_eq!(repo.crime_count().unwrap(), 1);
    });
}

#[test]
fn crime_zero_scenario() {
    with_each_backend(|repo| {
        let mut crime = Crime::new().titled("Crime #0");
        repo.add_crime(&crime).unwrap();

        let all = repo.list_crimes().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title.as_deref(), Some("Crime #0"));
        assert!(!all[0].solved);

        crime.solved = true;
        repo.update_crime(&crime).unwrap();
        let loaded = repo.get_crime(crime.id).unwrap().unwrap();
        assert!(loaded.solved);
        assert_eq!(loaded.title.as_deref(), Some("Crime #0"));

        repo.delete_crime(crime.id).unwrap();
        assert!(repo.list_crimes().unwrap().is_empty());
    });
}
