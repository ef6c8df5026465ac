use minimongo::body;
use minimongo::collection::ObjectId;
use minimongo::errors::ErrorKind;
use minimongo::filter::{all, field};
use minimongo::MongoDatabase;
use minimongo_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};
use std::collections::BTreeSet;
use std::fs;

#[test]
fn test_save_and_load() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let ids = insert_test_documents(db.collection("people")?)?;
            db.collection("people")?.create_index("last_name")?;
            db.collection("empty")?;

            let path = db.save()?;
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mongodb"));

            let restored = MongoDatabase::load(&path)?;
            assert_eq!(restored.name(), db.name());
            assert_eq!(restored.list_collections(), db.list_collections());

            let people = match restored.get_collection("people") {
                Some(people) => people,
                None => panic!("people should be restored"),
            };
            let restored_ids: Vec<ObjectId> = people.iter().map(|d| d.id()).collect();
            assert_eq!(restored_ids, ids);
            assert!(people.has_index("last_name"));

            let original = db.collection("people")?;
            for id in &ids {
                let before = original.get(id).map(|d| d.to_body());
                let after = people.get(id).map(|d| d.to_body());
                assert_eq!(before, after);
            }
            let filter = field("last_name").eq("ln2");
            let expected: Vec<ObjectId> = original.find(&filter).iter().map(|d| d.id()).collect();
            let actual: Vec<ObjectId> = people.find(&filter).iter().map(|d| d.id()).collect();
            assert_eq!(expected, actual);
            people.check_integrity()?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_snapshot_is_reproducible() {
    run_test(
        create_test_context,
        |ctx| {
            let first = ctx.path("first");
            let second = ctx.path("second");
            let db = ctx.db();
            insert_test_documents(db.collection("test")?)?;
            db.collection("test")?.create_index("first_name")?;

            let first = db.save_as(first, false)?;
            let second = db.save_as(second, false)?;
            assert_eq!(fs::read(&first)?, fs::read(&second)?);

            let mut bytes = Vec::new();
            db.save_to(&mut bytes)?;
            assert_eq!(bytes, fs::read(&first)?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_save_without_overwrite() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            db.save()?;
            let err = db.save().err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::FileAlreadyExists));

            let path = db.config().snapshot_path();
            assert!(db.save_as(&path, true).is_ok());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_extension_is_normalised() {
    run_test(
        create_test_context,
        |ctx| {
            let plain = ctx.path("blog");
            let suffixed = ctx.path("other.mongodb");
            let db = ctx.db();

            let written = db.save_as(&plain, false)?;
            assert_eq!(written, plain.with_extension("mongodb"));

            let written = db.save_as(&suffixed, false)?;
            assert_eq!(written, suffixed);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_ids_after_restore_are_fresh() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let ids = insert_test_documents(db.collection("test")?)?;
            let path = db.save()?;

            let mut restored = MongoDatabase::load(&path)?;
            let collection = restored.collection("test")?;
            let mut all_ids: BTreeSet<ObjectId> = ids.into_iter().collect();
            for i in 0..100 {
                let id = collection.insert_one(body! { n: i })?.id();
                assert!(all_ids.insert(id), "id {} was minted twice", id);
            }
            assert_eq!(collection.find(&all()).len(), 103);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_load_rejects_corrupt_file() {
    run_test(
        create_test_context,
        |ctx| {
            let garbage = ctx.path("garbage.mongodb");
            fs::write(&garbage, b"definitely not a snapshot")?;
            let err = MongoDatabase::load(&garbage).err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::EncodingError));

            let missing = ctx.path("missing.mongodb");
            let err = MongoDatabase::load(&missing).err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::FileNotFound));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_load_from_reader() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(db.collection("test")?)?;
            let path = db.save()?;

            let mut file = fs::File::open(&path)?;
            let restored = MongoDatabase::load_from(&mut file)?;
            assert_eq!(restored.get_collection("test").map(|c| c.len()), Some(3));
            Ok(())
        },
        cleanup,
    )
}
