use criminalintent_core::{
    init_shared_lab, logging_status, shared_lab, LabConfig, LabInitError,
};
use std::thread;

// One test per binary: the shared lab is process-wide state.
#[test]
fn shared_lab_initializes_once_and_is_reused() {
    assert!(shared_lab().is_none());

    let invalid = init_shared_lab(&LabConfig::in_memory("relative/photos"));
    assert!(matches!(invalid, Err(LabInitError::Config(_))));
    assert!(shared_lab().is_none());

    let dir = tempfile::tempdir().unwrap();
    let mut config = LabConfig::sqlite(dir.path().join("crimes.db"), dir.path().join("photos"));
    config.log_level = Some("info".to_string());
    config.log_dir = Some(dir.path().join("logs"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let config = config.clone();
            thread::spawn(move || {
                let lab = init_shared_lab(&config).unwrap();
                lab.with(|lab| lab.new_crime().unwrap());
                lab as *const _ as usize
            })
        })
        .collect();
    let addresses: Vec<usize> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(logging_status(), Some(("info", dir.path().join("logs"))));
    assert!(dir.path().join("logs").is_dir());

    let later = init_shared_lab(&LabConfig::in_memory("/somewhere/else")).unwrap();
    assert_eq!(later.with(|lab| lab.crime_count().unwrap()), 8);
    assert_eq!(later.with(|lab| lab.repository().backend_name()), "sqlite");
    assert_eq!(later.photo_store().dir(), dir.path().join("photos"));
    assert_eq!(later.config(), &config);
    assert!(std::ptr::eq(later, shared_lab().unwrap()));

    let mut same_photos = LabConfig::in_memory(dir.path().join("photos"));
    same_photos.log_level = Some("warn".to_string());
    let ignored = init_shared_lab(&same_photos).unwrap();
    assert_ne!(ignored.config(), &same_photos);
    assert_eq!(ignored.with(|lab| lab.repository().backend_name()), "sqlite");
    assert_eq!(logging_status().map(|(level, _)| level), Some("info"));
}
