use minimongo::body;
use minimongo::collection::{Document, ObjectId};
use minimongo::errors::ErrorKind;
use minimongo::filter::{all, field, Filter};
use minimongo::val;
use minimongo_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, is_sorted, run_test,
};

fn ids_of(found: Vec<&Document>) -> Vec<ObjectId> {
    found.iter().map(|d| d.id()).collect()
}

#[test]
fn test_index_does_not_change_results() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("posts")?;
            collection.insert_one(body! { "author": "Mike", "tags": ["x"] })?;
            let dwight = collection
                .insert_one(body! { "author": "Dwight", "tags": ["y"] })?
                .id();

            let filter = field("author").eq("Dwight");
            let without_index = ids_of(collection.find(&filter));
            collection.create_index("author")?;
            let with_index = ids_of(collection.find(&filter));

            assert_eq!(without_index, vec![dwight]);
            assert_eq!(with_index, without_index);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_index_covers_documents_with_field() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            insert_test_documents(collection)?;
            collection.insert_one(body! { unrelated: true })?;
            collection.create_index("last_name")?;

            let index = match collection.index("last_name") {
                Some(index) => index,
                None => panic!("index should exist"),
            };
            assert_eq!(index.field(), "last_name");
            assert_eq!(index.len(), 3);
            assert!(is_sorted(index.entries().iter().map(|e| e.value()), true));
            assert_eq!(index.lookup(&val!("ln2")).len(), 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_index_is_maintained_on_insert() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            collection.create_index("last_name")?;
            insert_test_documents(collection)?;
            collection.insert_one(body! { last_name: "ln0" })?;

            assert_eq!(collection.index("last_name").map(|i| i.len()), Some(4));
            assert_eq!(collection.find(&field("last_name").eq("ln0")).len(), 1);
            collection.check_integrity()?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_two_indices_intersect() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            collection.insert_many(vec![
                body! { a: 1, b: 2, tag: "both" },
                body! { a: 1, b: 3, tag: "a only" },
                body! { a: 5, b: 2, tag: "b only" },
            ])?;
            collection.create_index("a")?;
            collection.create_index("b")?;

            let filter = field("a").eq(1).and(field("b").eq(2));
            let plan = collection.explain(&filter);
            assert_eq!(plan.index_scans().len(), 2);

            let found = collection.find(&filter);
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].get("tag"), Some(&val!("both")));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_results_match_full_scan() {
    run_test(
        create_test_context,
        |ctx| {
            let plain = ctx.db().collection("plain")?;
            for i in 0..200 {
                plain.insert_one(body! { group: (i % 7), parity: (i % 2), label: (format!("l{}", i % 5)) })?;
            }
            let mut indexed = plain.clone();
            indexed.create_index("group")?;
            indexed.create_index("parity")?;

            let filters: Vec<Filter> = vec![
                all(),
                field("group").eq(3),
                field("parity").eq(1),
                field("group").eq(3).and(field("parity").eq(0)),
                field("group").eq(3).and(field("label").eq("l2")),
                field("group").eq(3).and(field("parity").eq(1)).and(field("label").eq("l4")),
                field("group").eq(99),
            ];
            for filter in filters {
                let expected = ids_of(plain.find(&filter));
                let actual = ids_of(indexed.find(&filter));
                assert_eq!(expected, actual, "mismatch for {}", filter);
                for id in &actual {
                    let document = indexed.get(id).map(|d| filter.matches(d));
                    assert_eq!(document, Some(true));
                }
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_index_on_invalid_field() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let err = collection.create_index("").err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::InvalidArgument));
            let err = collection.create_index("objectId").err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::InvalidArgument));
            assert!(collection.index_fields().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_drop_index() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            insert_test_documents(collection)?;
            collection.create_index("first_name")?;
            collection.create_index("last_name")?;
            assert_eq!(collection.index_fields(), vec!["first_name", "last_name"]);

            collection.drop_index("first_name")?;
            assert!(!collection.has_index("first_name"));
            assert!(collection.explain(&field("first_name").eq("fn1")).is_full_scan());
            assert_eq!(collection.find(&field("first_name").eq("fn1")).len(), 1);

            let err = collection.drop_index("first_name").err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::NotFound));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_stale_index_after_mutation() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let ids = insert_test_documents(collection)?;
            collection.create_index("last_name")?;

            if let Some(document) = collection.get_mut(&ids[0]) {
                document.set("last_name", "ln9")?;
            }
            let err = collection.check_integrity().err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::InternalError));
            assert!(collection.find(&field("last_name").eq("ln9")).is_empty());

            collection.rebuild_indices();
            collection.check_integrity()?;
            assert_eq!(ids_of(collection.find(&field("last_name").eq("ln9"))), vec![ids[0]]);
            Ok(())
        },
        cleanup,
    )
}
