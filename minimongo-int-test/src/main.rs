use minimongo::body;
use minimongo::errors::MongoResult;
use minimongo::filter::field;
use minimongo_int_test::test_util::{cleanup, create_test_context, init_logger};

fn main() -> MongoResult<()> {
    init_logger();
    println!("Starting stress test...");
    let mut ctx = create_test_context()?;

    let count = 100_000;
    let collection = ctx.db().collection("stress")?;

    let start = std::time::Instant::now();
    for i in 0..count {
        collection.insert_one(body! {
            first_name: (uuid::Uuid::new_v4().to_string()),
            last_name: (uuid::Uuid::new_v4().to_string()),
            processed: false,
            failed: (i % 10 == 0),
        })?;
    }
    println!("Inserted {} records in {:?}", count, start.elapsed());

    let filter = field("failed").eq(true).and(field("processed").eq(false));

    let start = std::time::Instant::now();
    let scanned = collection.find(&filter).len();
    println!("Full scan found {} records in {:?}", scanned, start.elapsed());

    collection.create_index("failed")?;
    collection.create_index("processed")?;
    println!("Plan with indices: {}", collection.explain(&filter));

    let start = std::time::Instant::now();
    let indexed = collection.find(&filter).len();
    println!("Index scan found {} records in {:?}", indexed, start.elapsed());
    assert_eq!(scanned, indexed);

    let start = std::time::Instant::now();
    let path = ctx.db().save()?;
    println!("Saved snapshot to {} in {:?}", path.display(), start.elapsed());

    cleanup(ctx)
}
