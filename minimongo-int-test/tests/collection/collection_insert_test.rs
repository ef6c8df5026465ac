use minimongo::body;
use minimongo::collection::ObjectId;
use minimongo::common::{Value, DOC_ID};
use minimongo::errors::ErrorKind;
use minimongo::filter::{all, by_id};
use minimongo::val;
use minimongo_int_test::test_util::{
    cleanup, create_test_bodies, create_test_context, insert_test_documents, run_test,
};
use std::collections::BTreeSet;

#[test]
fn test_insert() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;

            let document = collection.insert_one(body! {
                "first_name": "John",
                "last_name": "Doe",
                "birth_day": 1234567890,
                "data": [1, 2, 3],
                "body": "This is a test document"
            })?;
            let id = document.id();
            assert_eq!(document.get(DOC_ID), Some(&val!(id)));

            for document in collection.find(&all()) {
                assert_eq!(document.get("first_name").and_then(|v| v.as_str()), Some("John"));
                assert_eq!(document.get("last_name").and_then(|v| v.as_str()), Some("Doe"));
                assert!(document.get("birth_day").is_some());
                assert_eq!(document.get("data.1"), Some(&val!(2)));
                assert!(document.get("body").is_some());
            }
            assert_eq!(collection.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_batch() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let ids = insert_test_documents(collection)?;
            assert_eq!(ids.len(), 3);
            assert_eq!(collection.len(), 3);

            let found: Vec<ObjectId> = collection.find(&all()).iter().map(|d| d.id()).collect();
            assert_eq!(found, ids);
            for document in collection.iter() {
                assert!(document.get("first_name").is_some());
                assert!(document.get("birth_day").and_then(|v| v.as_date_time()).is_some());
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_returns_stored_document() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let id = collection.insert_one(body! { n: 1 })?.id();

            let found = collection.find_one(&by_id(id)).map(|d| d.id());
            assert_eq!(found, Some(id));
            assert!(collection.contains(&id));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_ids_never_collide() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            for i in 0..500 {
                collection.insert_one(body! { n: i })?;
            }
            let ids: BTreeSet<ObjectId> = collection.iter().map(|d| d.id()).collect();
            assert_eq!(ids.len(), 500);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_duplicate_id() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let body = collection.insert_one(body! { n: 1 })?.to_body();

            let err = collection.insert_one(body).err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::DuplicateKey));
            assert_eq!(collection.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_with_invalid_id_type() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let err = collection
                .insert_one(body! { objectId: "not-an-id" })
                .err()
                .map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::TypeMismatch));
            assert!(collection.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_many_stops_at_first_failure() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let mut bodies = create_test_bodies();
            bodies.insert(1, body! { objectId: (Value::Null) });

            let err = match collection.insert_many(bodies) {
                Ok(_) => panic!("insert_many should fail"),
                Err(err) => err,
            };
            assert_eq!(err.kind(), &ErrorKind::TypeMismatch);
            assert!(err.cause().is_some());
            assert_eq!(collection.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_body_is_copied_on_insert() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let mut body = body! { name: "original" };
            let id = collection.insert_one(body.clone())?.id();
            body.insert("name".to_string(), val!("changed"));

            let stored = collection.get(&id).and_then(|d| d.get("name")).cloned();
            assert_eq!(stored, Some(val!("original")));
            Ok(())
        },
        cleanup,
    )
}
