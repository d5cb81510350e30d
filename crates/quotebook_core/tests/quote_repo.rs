use quotebook_core::db::{open_db, open_db_in_memory};
use quotebook_core::{
    default_quotes, CategoryFilter, ImportReport, Quote, QuoteRepository, QuoteValidationError,
    RepoError, SlotStore, SqliteSlotStore,
};
use serde_json::json;

fn memory_store() -> SqliteSlotStore {
    SqliteSlotStore::new(open_db_in_memory().unwrap())
}

#[test]
fn load_seeds_defaults_and_writes_them_back() {
    let repo = QuoteRepository::load(memory_store()).unwrap();

    assert_eq!(repo.all(), default_quotes().as_slice());
    let stored = repo.store().get_slot("quotes").unwrap().unwrap();
    let decoded: Vec<Quote> = serde_json::from_str(&stored).unwrap();
    assert_eq!(decoded, default_quotes());
}

#[test]
fn load_prefers_stored_snapshot_over_defaults() {
    let store = memory_store();
    store
        .set_slot("quotes", r#"[{"text":"Life is short","category":"Life"}]"#)
        .unwrap();

    let repo = QuoteRepository::load(store).unwrap();
    assert_eq!(repo.all(), &[Quote::unchecked("Life is short", "Life")]);
}

#[test]
fn load_keeps_an_empty_stored_list() {
    let store = memory_store();
    store.set_slot("quotes", "[]").unwrap();

    let repo = QuoteRepository::load(store).unwrap();
    assert!(repo.is_empty());
}

#[test]
fn load_surfaces_corrupt_snapshot() {
    let store = memory_store();
    store.set_slot("quotes", "{not json").unwrap();

    let err = QuoteRepository::load(store).err().expect("corrupt data must fail");
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn add_appends_persists_and_is_visible_by_category() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotes.sqlite3");

    {
        let store = SqliteSlotStore::new(open_db(&path).unwrap());
        let mut repo = QuoteRepository::load(store).unwrap();
        let before = repo.len();
        let added = repo.add("  Keep going.  ", " Grit ").unwrap();
        assert_eq!(added, Quote::unchecked("Keep going.", "Grit"));
        assert_eq!(repo.len(), before + 1);
        assert_eq!(
            repo.by_category(&CategoryFilter::parse("Grit")),
            vec![added]
        );
    }

    let reloaded = QuoteRepository::load(SqliteSlotStore::new(open_db(&path).unwrap())).unwrap();
    assert_eq!(reloaded.len(), 4);
    assert_eq!(reloaded.all()[3], Quote::unchecked("Keep going.", "Grit"));
}

#[test]
fn add_rejects_empty_fields_without_state_change() {
    let mut repo = QuoteRepository::load(memory_store()).unwrap();
    let before = repo.len();
    let stored_before = repo.store().get_slot("quotes").unwrap();

    for (text, category) in [("", "x"), ("x", ""), ("", ""), ("   ", "x")] {
        let err = repo.add(text, category).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)), "{text:?}/{category:?}");
    }
    assert!(matches!(
        repo.add("x", " ").unwrap_err(),
        RepoError::Validation(QuoteValidationError::EmptyCategory)
    ));

    assert_eq!(repo.len(), before);
    assert_eq!(repo.store().get_slot("quotes").unwrap(), stored_before);
}

#[test]
fn by_category_all_matches_full_list() {
    let mut repo = QuoteRepository::load(memory_store()).unwrap();
    repo.add("Another", "Life").unwrap();

    assert_eq!(repo.by_category(&CategoryFilter::All).len(), repo.all().len());
    assert_eq!(repo.by_category(&CategoryFilter::parse("all")).len(), repo.len());
    assert_eq!(repo.by_category(&CategoryFilter::parse("Life")).len(), 2);
    assert!(repo.by_category(&CategoryFilter::parse("Nope")).is_empty());
}

#[test]
fn import_batch_skips_malformed_entries() {
    let mut repo = QuoteRepository::load(memory_store()).unwrap();

    let report = repo
        .import_batch(&json!([
            {"text": "Imported one", "category": "Import"},
            {"text": "missing category"},
            {"text": "", "category": "Import"},
            42,
            {"text": "Imported two", "category": "Import", "extra": true}
        ]))
        .unwrap();

    assert_eq!(
        report,
        ImportReport {
            imported: 2,
            skipped: 3
        }
    );
    assert_eq!(repo.len(), 5);
    assert_eq!(repo.all()[4], Quote::unchecked("Imported two", "Import"));
}

#[test]
fn import_batch_rejects_non_sequence() {
    let mut repo = QuoteRepository::load(memory_store()).unwrap();

    let err = repo
        .import_batch(&json!({"text": "a", "category": "b"}))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotASequence));
    assert_eq!(repo.len(), 3);
}

#[test]
fn import_batch_does_not_deduplicate() {
    let mut repo = QuoteRepository::load(memory_store()).unwrap();
    let payload = json!([{"text": "Twice", "category": "Dup"}]);

    repo.import_batch(&payload).unwrap();
    repo.import_batch(&payload).unwrap();

    assert_eq!(repo.by_category(&CategoryFilter::parse("Dup")).len(), 2);
}
