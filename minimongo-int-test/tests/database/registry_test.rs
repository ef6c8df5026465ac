use minimongo::body;
use minimongo::errors::ErrorKind;
use minimongo::filter::all;
use minimongo_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

#[test]
fn test_collection_is_created_on_first_access() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            assert!(db.is_empty());
            assert!(!db.has_collection("users"));

            db.collection("users")?.insert_one(body! { name: "Pam" })?;
            assert!(db.has_collection("users"));
            assert_eq!(db.collection("users")?.len(), 1);
            assert_eq!(db.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_collections_are_independent() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(db.collection("first")?)?;
            db.collection("second")?.insert_one(body! { n: 1 })?;

            assert_eq!(db.get_collection("first").map(|c| c.len()), Some(3));
            assert_eq!(db.get_collection("second").map(|c| c.find(&all()).len()), Some(1));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_list_collections_is_sorted() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            for name in ["zeta", "alpha", "mid", "Beta"] {
                db.collection(name)?;
            }
            assert_eq!(db.list_collections(), vec!["Beta", "alpha", "mid", "zeta"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_reserved_collection_names() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            for name in ["__class__", "__", ""] {
                let err = db.collection(name).err().map(|e| e.kind().clone());
                assert_eq!(err, Some(ErrorKind::InvalidArgument));
            }
            assert!(db.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_drop_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(db.collection("test")?)?;
            let dropped = db.drop_collection("test")?;
            assert_eq!(dropped.len(), 3);
            assert!(!db.has_collection("test"));
            assert!(db.collection("test")?.is_empty());

            let err = db.drop_collection("missing").err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::NotFound));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_move_document_between_collections() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let id = db.collection("inbox")?.insert_one(body! { subject: "hi" })?.id();

            let document = db.collection("inbox")?.delete_one(&id)?;
            let moved = db.collection("archive")?.insert_one(document.to_body())?.id();

            assert_eq!(moved, id);
            assert!(db.collection("inbox")?.is_empty());
            assert!(db.collection("archive")?.contains(&id));
            Ok(())
        },
        cleanup,
    )
}
