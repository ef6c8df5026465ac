use minimongo::body;
use minimongo::errors::ErrorKind;
use minimongo::MongoDatabase;
use minimongo_int_test::test_util::init_logger;

#[test]
fn test_open_creates_then_reopens() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop");

    let mut db = MongoDatabase::builder()
        .name("shop")
        .db_path(&path)
        .open()
        .unwrap();
    assert!(db.is_empty());
    db.collection("orders")
        .unwrap()
        .insert_one(body! { item: "paper" })
        .unwrap();
    let saved = db.save().unwrap();
    assert_eq!(saved, dir.path().join("shop.mongodb"));

    let reopened = MongoDatabase::builder()
        .name("ignored")
        .db_path(&path)
        .open()
        .unwrap();
    assert_eq!(reopened.name(), "shop");
    assert_eq!(reopened.get_collection("orders").map(|c| c.len()), Some(1));
}

#[test]
fn test_custom_extension_and_overwrite() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();

    let db = MongoDatabase::builder()
        .name("shop")
        .db_path(dir.path().join("shop"))
        .file_extension(".snap")
        .overwrite(true)
        .open()
        .unwrap();
    let first = db.save().unwrap();
    let second = db.save().unwrap();
    assert_eq!(first, second);
    assert_eq!(first, dir.path().join("shop.snap"));
}

#[test]
fn test_builder_reports_first_error() {
    init_logger();
    let err = MongoDatabase::builder()
        .file_extension("")
        .name("")
        .open()
        .err()
        .map(|e| e.kind().clone());
    assert_eq!(err, Some(ErrorKind::InvalidArgument));
}
