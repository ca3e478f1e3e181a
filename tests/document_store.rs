//! # Document Store Integration Tests
//!
//! End-to-end behavior of `Store` over a real SQLite engine:
//!
//! 1. Documents read back as written, minus empty values
//! 2. Undeclared attributes travel through the overflow column transparently
//! 3. Column declaration is idempotent
//! 4. Indexes registered after `init()` never reach the backing table
//! 5. Read-only stores persist nothing
//! 6. Reopened stores expose previously declared columns
//! 7. Writes are append-only
//! 8. Engine failures surface as the matching error kind

use docstore::engine::{Engine, QuerySpec, ResultSet, SqliteEngine};
use docstore::{Database, Document, JsonCodec, RowId, Store, StoreError, StoreOptions};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use tempfile::tempdir;

fn doc(pairs: &[(&str, &str)]) -> Document {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn read_back(store: &Store, row_id: RowId) -> Document {
    let mut cursor = store
        .query_where("\"_id\" = ?", [row_id.to_string()])
        .unwrap();
    assert!(cursor.move_to_first().unwrap(), "row {} not found", row_id);
    cursor.row().clone()
}

mod round_trip {
    use super::*;

    #[test]
    fn extra_attribute_is_transparent() {
        let db = Database::open_in_memory().unwrap();
        let mut store = db.object_store("things");
        store.declare_columns(["a"]).unwrap();
        store.init().unwrap();

        let id = store.put(&doc(&[("a", "1"), ("zzz", "unknown")])).unwrap();

        assert_eq!(read_back(&store, id), doc(&[("a", "1"), ("zzz", "unknown")]));
    }

    #[test]
    fn empty_values_are_dropped_on_read() {
        let db = Database::open_in_memory().unwrap();
        let mut store = db.object_store("things");
        store.declare_columns(["a"]).unwrap();
        store.init().unwrap();

        let id = store
            .put(&doc(&[("a", ""), ("b", "2"), ("zzz", "")]))
            .unwrap();

        assert_eq!(read_back(&store, id), doc(&[("b", "2")]));
    }

    #[test]
    fn empty_values_survive_when_preserved() {
        let db = Database::open_in_memory().unwrap();
        let options = StoreOptions::new().empty_values(docstore::EmptyValues::Preserve);
        let mut store = db.object_store_with_options("things", options);
        store.declare_columns(["a"]).unwrap();
        store.init().unwrap();

        let written = doc(&[("a", ""), ("zzz", "")]);
        let id = store.put(&written).unwrap();

        assert_eq!(read_back(&store, id), written);
    }

    fn attribute_name() -> impl Strategy<Value = String> {
        "[a-z]{1,8}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn put_then_read_matches_non_empty_attributes(
            attributes in prop::collection::btree_map(attribute_name(), "[ -~]{0,12}", 0..8),
            declared in prop::collection::btree_set(attribute_name(), 0..4),
        ) {
            let db = Database::open_in_memory().unwrap();
            let mut store = db.object_store("things");
            store.declare_columns(declared.iter().cloned()).unwrap();
            store.init().unwrap();

            let id = store.put(&attributes).unwrap();
            let expected: Document = attributes
                .into_iter()
                .filter(|(_, v)| !v.is_empty())
                .collect();

            prop_assert_eq!(read_back(&store, id), expected);
        }
    }
}

mod schema {
    use super::*;

    #[test]
    fn declaring_twice_equals_declaring_once() {
        let db = Database::open_in_memory().unwrap();

        let mut once = db.object_store("once");
        once.declare_columns(["email", "team"]).unwrap();
        let mut twice = db.object_store("twice");
        twice.declare_columns(["email", "team"]).unwrap();
        twice.declare_columns(["team", "email"]).unwrap();

        assert_eq!(once.columns(), twice.columns());

        once.init().unwrap();
        twice.init().unwrap();
        let engine = db.engine();
        assert_eq!(
            engine.list_columns("once").unwrap(),
            engine.list_columns("twice").unwrap()
        );
    }

    #[test]
    fn late_index_is_absent_after_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs.db");

        {
            let db = Database::open(&path).unwrap();
            let mut store = db.object_store("users");
            store.create_index("by_email", vec!["email"]).unwrap();
            store.init().unwrap();
            store.create_index("by_team", vec!["team"]).unwrap();

            assert_eq!(store.late_indexes().len(), 1);
        }

        let db = Database::open(&path).unwrap();
        let mut store = db.object_store("users");
        store.init().unwrap();

        assert_eq!(db.engine().list_indexes("users").unwrap(), vec!["by_email"]);
        assert!(store.is_declared("email"));
        assert!(!store.is_declared("team"));
    }

    #[test]
    fn reopened_store_exposes_declared_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs.db");

        {
            let db = Database::open(&path).unwrap();
            let mut store = db.object_store("users");
            store.declare_columns(["email", "age"]).unwrap();
            store.create_index("by_email", vec!["email"]).unwrap();
            store.init().unwrap();
            store
                .put(&doc(&[("email", "a@x"), ("age", "31"), ("nick", "ally")]))
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let mut store = db.object_store("users");
        store.init().unwrap();

        let mut cursor = store.all_rows().unwrap();
        assert!(cursor.move_to_first().unwrap());

        assert_eq!(cursor.column_names(), vec!["age", "email", "nick"]);
        assert!(store.is_declared("email"));
        assert!(store.is_declared("age"));
    }

    #[test]
    fn strict_indexes_reject_unbuilt_index_on_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs.db");
        {
            let db = Database::open(&path).unwrap();
            let mut store = db.object_store("users");
            store.init().unwrap();
        }

        let db = Database::open(&path).unwrap();
        let mut store =
            db.object_store_with_options("users", StoreOptions::new().strict_indexes(true));
        store.create_index("by_email", vec!["email"]).unwrap();

        let err = store.init().unwrap_err();

        assert!(matches!(err, StoreError::SchemaCreation { .. }));
        assert!(!store.is_initialized());
    }

    #[test]
    fn read_only_adoption_routes_missing_columns_to_overflow() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs.db");
        {
            let db = Database::open(&path).unwrap();
            let mut store = db.object_store("users");
            store.init().unwrap();
        }

        let db = Database::open(&path).unwrap();
        let mut store = db.object_store_with_options("users", StoreOptions::new().read_only(true));
        store.declare_columns(["team"]).unwrap();
        store.init().unwrap();

        assert!(!store.is_declared("team"));
        assert_eq!(store.deferred_columns(), &["team".to_string()]);

        store.set_read_only(false);
        let id = store.put(&doc(&[("team", "blue")])).unwrap();

        assert_eq!(read_back(&store, id), doc(&[("team", "blue")]));
        assert_eq!(
            db.engine().list_columns("users").unwrap(),
            vec!["_id", "extra_data"]
        );
    }

    #[test]
    fn index_name_shared_with_another_store_is_never_skipped() {
        let db = Database::open_in_memory().unwrap();
        let mut users = db.object_store("users");
        users.create_index("by_email", vec!["email"]).unwrap();
        users.init().unwrap();

        let mut people = db.object_store("people");
        people.create_index("by_email", vec!["email"]).unwrap();
        let err = people.init().unwrap_err();

        assert!(err.is_fatal());
        assert!(err.to_string().contains("by_email"));
        assert!(matches!(
            people.put(&doc(&[("email", "a@x")])).unwrap_err(),
            StoreError::NotInitialized { .. }
        ));
    }
}

mod writes {
    use super::*;

    #[test]
    fn read_only_store_persists_nothing() {
        let db = Database::open_in_memory().unwrap();
        let mut store = db.object_store("users");
        store.init().unwrap();
        store.put(&doc(&[("email", "a@x")])).unwrap();

        store.set_read_only(true);
        for i in 0..3 {
            let email = format!("{}@x", i);
            let err = store.put(&doc(&[("email", email.as_str())])).unwrap_err();
            assert!(err.is_read_only_violation());
        }

        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn identical_documents_get_distinct_rows() {
        let db = Database::open_in_memory().unwrap();
        let mut store = db.object_store("events");
        store.declare_columns(["kind"]).unwrap();
        store.init().unwrap();

        let same = doc(&[("kind", "click"), ("target", "button")]);
        let first = store.put(&same).unwrap();
        let second = store.put(&same).unwrap();

        assert_ne!(first, second);
        let docs = store.all_rows().unwrap().documents().unwrap();
        assert_eq!(docs, vec![same.clone(), same]);
    }

    #[test]
    fn unique_index_rejects_duplicates_and_store_stays_usable() {
        let db = Database::open_in_memory().unwrap();
        let mut store = db.object_store("users");
        store.create_index("by_email", vec!["email"]).unwrap();
        store.init().unwrap();
        store.put(&doc(&[("email", "a@x")])).unwrap();

        let err = store.put(&doc(&[("email", "a@x"), ("nick", "dup")])).unwrap_err();
        assert!(matches!(err, StoreError::BackingWrite { .. }));

        store.put(&doc(&[("email", "b@x")])).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn compound_index_constrains_the_column_tuple() {
        let db = Database::open_in_memory().unwrap();
        let mut store = db.object_store("people");
        store.create_index("by_name", vec!["last", "first"]).unwrap();
        store.init().unwrap();

        store.put(&doc(&[("last", "Lovelace"), ("first", "Ada")])).unwrap();
        store.put(&doc(&[("last", "Lovelace"), ("first", "Byron")])).unwrap();
        let err = store
            .put(&doc(&[("last", "Lovelace"), ("first", "Ada")]))
            .unwrap_err();

        assert!(matches!(err, StoreError::BackingWrite { .. }));
    }

    #[test]
    fn stores_are_shared_across_threads() {
        let db = Database::open_in_memory().unwrap();
        let mut store = db.object_store("events");
        store.init().unwrap();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..25)
                        .map(|i| {
                            let n = format!("{}-{}", t, i);
                            store.put(&doc(&[("n", n.as_str())])).unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: BTreeSet<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(ids.len(), 100);
        assert_eq!(store.count().unwrap(), 100);
    }
}

mod failures {
    use super::*;

    /// Delegates to SQLite but refuses every DDL statement.
    struct NoDdlEngine(SqliteEngine);

    impl Engine for NoDdlEngine {
        fn table_exists(&self, table: &str) -> eyre::Result<bool> {
            self.0.table_exists(table)
        }

        fn list_columns(&self, table: &str) -> eyre::Result<Vec<String>> {
            self.0.list_columns(table)
        }

        fn list_indexes(&self, table: &str) -> eyre::Result<Vec<String>> {
            self.0.list_indexes(table)
        }

        fn list_tables(&self) -> eyre::Result<Vec<String>> {
            self.0.list_tables()
        }

        fn execute(&self, statement: &str) -> eyre::Result<()> {
            eyre::bail!("disk I/O error while running: {}", statement)
        }

        fn query(&self, spec: &QuerySpec) -> eyre::Result<Box<dyn ResultSet>> {
            self.0.query(spec)
        }

        fn insert(&self, table: &str, record: &docstore::Record) -> eyre::Result<RowId> {
            self.0.insert(table, record)
        }

        fn count_rows(&self, table: &str) -> eyre::Result<u64> {
            self.0.count_rows(table)
        }
    }

    #[test]
    fn failed_table_creation_is_fatal() {
        let engine = Arc::new(NoDdlEngine(SqliteEngine::open_in_memory().unwrap()));
        let mut store = Store::new("users", engine, Arc::new(JsonCodec::new()));

        let err = store.init().unwrap_err();

        assert!(matches!(err, StoreError::SchemaCreation { store: ref name, .. } if name == "users"));
        assert!(err.is_fatal());
        assert!(err.to_string().contains("disk I/O error"));
        assert!(matches!(
            store.put(&Document::new()).unwrap_err(),
            StoreError::NotInitialized { .. }
        ));
    }

    #[test]
    fn corrupt_overflow_surfaces_as_codec_error() {
        let db = Database::open_in_memory().unwrap();
        let mut store = db.object_store("users");
        store.init().unwrap();
        db.engine()
            .execute("INSERT INTO \"users\" (\"extra_data\") VALUES ('{not json')")
            .unwrap();

        let mut cursor = store.all_rows().unwrap();

        assert!(matches!(
            cursor.move_to_first().unwrap_err(),
            StoreError::Codec(_)
        ));
    }

    #[test]
    fn reserved_attribute_is_rejected_before_writing() {
        let db = Database::open_in_memory().unwrap();
        let mut store = db.object_store("users");
        store.init().unwrap();

        let err = store.put(&doc(&[("_id", "7")])).unwrap_err();

        assert!(matches!(err, StoreError::ReservedAttribute { .. }));
        assert_eq!(store.count().unwrap(), 0);
    }
}
