use minimongo::body;
use minimongo::common::{SortKey, SortOrder, Value};
use minimongo::errors::ErrorKind;
use minimongo::filter::{all, field};
use minimongo_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, is_sorted, run_test,
};

#[test]
fn test_default_order_is_by_id() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            for i in 0..50 {
                collection.insert_one(body! { n: (50 - i) })?;
            }
            assert!(collection.sort_key().is_by_id());
            assert!(is_sorted(collection.iter().map(|d| d.id()), true));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sort_by_field() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            insert_test_documents(collection)?;
            collection.insert_one(body! { first_name: "fn0" })?;

            collection.sort(SortKey::descending("birth_day"))?;
            let days: Vec<Option<&Value>> = collection.iter().map(|d| d.get("birth_day")).collect();
            assert!(is_sorted(days.iter().cloned(), false));
            // a missing field sorts first, so it ends up last in descending order
            assert_eq!(days.last(), Some(&None));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sort_keeps_order_for_new_documents() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            collection.create_index("group")?;
            collection.insert_many(vec![
                body! { name: "c", group: 1 },
                body! { name: "a", group: 2 },
                body! { name: "d", group: 1 },
            ])?;
            collection.sort(SortKey::ascending("name"))?;
            collection.insert_one(body! { name: "b", group: 1 })?;

            let names: Vec<&str> = collection
                .find(&all())
                .iter()
                .filter_map(|d| d.get("name").and_then(|v| v.as_str()))
                .collect();
            assert_eq!(names, vec!["a", "b", "c", "d"]);

            // index results follow the store order
            let group: Vec<&str> = collection
                .find(&field("group").eq(1))
                .iter()
                .filter_map(|d| d.get("name").and_then(|v| v.as_str()))
                .collect();
            assert_eq!(group, vec!["b", "c", "d"]);
            collection.check_integrity()?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_compound_sort_key() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            insert_test_documents(collection)?;
            collection.sort(
                SortKey::ascending("last_name").then("first_name", SortOrder::Descending),
            )?;

            let names: Vec<&str> = collection
                .iter()
                .filter_map(|d| d.get("first_name").and_then(|v| v.as_str()))
                .collect();
            assert_eq!(names, vec!["fn1", "fn3", "fn2"]);

            collection.sort(SortKey::by_id())?;
            assert!(is_sorted(collection.iter().map(|d| d.id()), true));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sort_with_invalid_key() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let err = collection.sort(SortKey::ascending("")).err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::InvalidArgument));
            assert!(collection.sort_key().is_by_id());
            Ok(())
        },
        cleanup,
    )
}
