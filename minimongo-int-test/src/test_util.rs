use chrono::{DateTime, Utc};
use minimongo::body;
use minimongo::collection::{Body, MongoCollection, ObjectId};
use minimongo::errors::MongoResult;
use minimongo::MongoDatabase;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Instant;
use tempfile::TempDir;

static LOGGER: Once = Once::new();

/// Installs the test logger once per test binary.
pub fn init_logger() {
    LOGGER.call_once(|| {
        let _ = colog::basic_builder().is_test(true).try_init();
    });
}

/// Runs a test between a setup and a teardown step.
///
/// `after` runs whether the test fails or not. Errors and panics from any
/// step fail the test with the step that produced them.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(&mut TestContext) -> MongoResult<()>,
    B: Fn() -> MongoResult<TestContext>,
    A: Fn(TestContext) -> MongoResult<()>,
{
    let start_time = Instant::now();
    let mut ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        let backtrace = Backtrace::capture();
        test(&mut ctx).map_err(|e| (format!("Test failed: {:?}", e), backtrace.to_string()))
    }));
    let after_result = after(ctx);
    let elapsed = start_time.elapsed();

    let error = match result {
        Ok(Ok(())) => None,
        Ok(Err((e, bt))) => Some((e, bt)),
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            Some((format!("Panic: {}", err_msg), String::new()))
        }
    };

    if let Some((e, bt)) = error {
        eprintln!("\n==================== TEST FAILED ====================");
        eprintln!("Failed after {:?}", elapsed);
        eprintln!("Error: {}", e);
        if !bt.is_empty() && !bt.contains("disabled") {
            eprintln!("\nBacktrace:\n{}", bt);
        }
        eprintln!("=====================================================\n");
        panic!("{}", e);
    }

    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

pub struct TestContext {
    dir: TempDir,
    db: MongoDatabase,
}

impl TestContext {
    pub fn new(dir: TempDir, db: MongoDatabase) -> Self {
        Self { dir, db }
    }

    /// The temporary directory the database saves into.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// A path inside the test directory.
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    pub fn db(&mut self) -> &mut MongoDatabase {
        &mut self.db
    }

    pub fn db_ref(&self) -> &MongoDatabase {
        &self.db
    }
}

pub fn random_name() -> String {
    format!("test-{}", uuid::Uuid::new_v4())
}

pub fn create_test_context() -> MongoResult<TestContext> {
    init_logger();
    let dir = tempfile::tempdir()?;
    let name = random_name();
    let db = MongoDatabase::builder()
        .name(&name)
        .db_path(dir.path().join(&name))
        .open()?;
    Ok(TestContext::new(dir, db))
}

pub fn cleanup(ctx: TestContext) -> MongoResult<()> {
    let TestContext { dir, db } = ctx;
    drop(db);
    dir.close()?;
    Ok(())
}

pub fn parse_date_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

pub fn create_test_bodies() -> Vec<Body> {
    let dt1 = parse_date_time("2012-07-01T02:15:22+02:00");
    let dt2 = parse_date_time("2010-06-12T12:05:35+05:30");
    let dt3 = parse_date_time("2014-04-17T22:25:44-04:00");

    let body1 = body! {
        first_name: "fn1",
        last_name: "ln1",
        birth_day: dt1,
        data: (vec![1u8, 2u8, 3u8]),
        arr: [1, 2, 3],
        list: (vec!["one", "two", "three"]),
        body: "a quick brown fox jump over the lazy dog",
    };

    let body2 = body! {
        first_name: "fn2",
        last_name: "ln2",
        birth_day: dt2,
        data: (vec![3u8, 4u8, 3u8]),
        arr: [3, 4, 3],
        list: (vec!["three", "four", "five"]),
        body: "quick hello world from minimongo",
    };

    let body3 = body! {
        first_name: "fn3",
        last_name: "ln2",
        birth_day: dt3,
        data: (vec![9u8, 4u8, 8u8]),
        arr: [9, 4, 8],
        body: "Lorem ipsum dolor sit amet, consectetur \
        adipiscing elit. Sed nunc mi, mattis ullamcorper \
        dignissim vitae, condimentum non lorem.",
    };

    vec![body1, body2, body3]
}

pub fn insert_test_documents(collection: &mut MongoCollection) -> MongoResult<Vec<ObjectId>> {
    let inserted = collection.insert_many(create_test_bodies())?;
    Ok(inserted.iter().map(|doc| doc.id()).collect())
}

pub fn is_sorted<T: Ord>(iterable: impl IntoIterator<Item = T>, ascending: bool) -> bool {
    let mut iter = iterable.into_iter();
    if let Some(mut prev) = iter.next() {
        for current in iter {
            if ascending {
                if prev > current {
                    return false;
                }
            } else if prev < current {
                return false;
            }
            prev = current;
        }
    }
    true
}
