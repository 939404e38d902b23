mod common;

#[test]
fn test_db_files_are_cleaned_up_on_drop() {
    let base = "test_db_cleanup.db";

    {
        let test_db = common::TestDb::new(base);
        assert!(test_db.pool().get().is_ok());
        assert!(std::path::Path::new(base).exists());
    }

    // the database and its WAL siblings are gone after the drop
    assert!(!std::path::Path::new(base).exists());
    assert!(!std::path::Path::new(&format!("{base}-shm")).exists());
    assert!(!std::path::Path::new(&format!("{base}-wal")).exists());
}
