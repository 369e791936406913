use contacts_core::{
    open_repository, AddressBook, ContactRepository, JsonContactRepository, Name, Record,
    SqliteContactRepository, StoreError, StoreKind,
};
use std::fs;

fn sample_book() -> AddressBook {
    let mut book = AddressBook::new();

    let mut john = Record::new(Name::parse("john").unwrap());
    john.add_phone("1234567890").unwrap();
    john.add_phone("5555555555").unwrap();
    john.set_birthday("29.02.2000").unwrap();
    book.add_record(john);

    let mut anna = Record::new(Name::parse("anna").unwrap());
    anna.add_phone("0987654321").unwrap();
    book.add_record(anna);

    book
}

fn assert_same_records(loaded: &AddressBook, expected: &AddressBook) {
    assert_eq!(loaded.len(), expected.len());
    for record in expected.iter() {
        let other = loaded.find(record.name().as_str()).unwrap();
        assert_eq!(other, record);
    }
}

#[test]
fn json_missing_file_loads_empty_book() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonContactRepository::new(dir.path().join("contacts.json"));
    assert!(repo.load().unwrap().is_empty());
}

#[test]
fn json_save_then_load_keeps_phones_and_birthday() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonContactRepository::new(dir.path().join("contacts.json"));
    let book = sample_book();

    repo.save(&book).unwrap();
    let loaded = repo.load().unwrap();

    assert_same_records(&loaded, &book);
    let order: Vec<_> = loaded.iter().map(|r| r.name().as_str()).collect();
    assert_eq!(order, vec!["Anna", "John"]);
    assert!(!dir.path().join("contacts.json.tmp").exists());
}

#[test]
fn json_reads_legacy_name_to_phone_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");
    fs::write(
        &path,
        serde_json::to_string_pretty(&serde_json::json!({
            "bob": "0123456789",
            "Alice": "1112223334"
        }))
        .unwrap(),
    )
    .unwrap();

    let book = JsonContactRepository::new(&path).load().unwrap();
    assert_eq!(book.len(), 2);
    assert_eq!(
        book.find("Bob").unwrap().to_string(),
        "Contact name: Bob, phones: 0123456789"
    );
}

#[test]
fn json_corrupt_file_is_a_store_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");
    fs::write(&path, "{ not json").unwrap();

    let err = JsonContactRepository::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::Json(_)));
}

#[test]
fn json_save_into_missing_directory_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("contacts.json");

    let err = JsonContactRepository::new(&path)
        .save(&sample_book())
        .unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}

#[test]
fn sqlite_save_then_load_keeps_phones_and_birthday() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");
    let book = sample_book();

    SqliteContactRepository::open(&path)
        .unwrap()
        .save(&book)
        .unwrap();
    let loaded = SqliteContactRepository::open(&path).unwrap().load().unwrap();

    assert_same_records(&loaded, &book);
    let john = loaded.find("John").unwrap();
    let phones: Vec<_> = john.phones().iter().map(|p| p.as_str()).collect();
    assert_eq!(phones, vec!["1234567890", "5555555555"]);
}

#[test]
fn open_repository_infers_backend_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("book.sqlite");
    let json_path = dir.path().join("book.json");

    let book = sample_book();
    open_repository(&db_path, None).unwrap().save(&book).unwrap();
    open_repository(&json_path, None).unwrap().save(&book).unwrap();

    let json_text = fs::read_to_string(&json_path).unwrap();
    assert!(json_text.starts_with("{\n    \"Anna\""));
    let header = fs::read(&db_path).unwrap();
    assert!(header.starts_with(b"SQLite format 3"));

    let forced = open_repository(&json_path, Some(StoreKind::Json)).unwrap();
    assert_same_records(&forced.load().unwrap(), &book);
}

#[test]
fn json_keys_colliding_after_canonicalization_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");
    let original = r#"{"bob": "0123456789", "Bob": "1111111111"}"#;
    fs::write(&path, original).unwrap();

    let err = JsonContactRepository::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn sqlite_rows_colliding_after_canonicalization_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");
    drop(SqliteContactRepository::open(&path).unwrap());

    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(
        "INSERT INTO contacts (name, birthday) VALUES ('bob', NULL), ('Bob', NULL);
         INSERT INTO contact_phones (contact_name, position, phone)
         VALUES ('bob', 0, '0123456789'), ('Bob', 0, '1111111111');",
    )
    .unwrap();
    drop(conn);

    let err = SqliteContactRepository::open(&path)
        .unwrap()
        .load()
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}
