// I/O tests: document sources, CSV export, and SQLite persistence.
//
// Every test works in its own temp directory so nothing touches the
// working tree or a real panelmatch.db.

use std::fs;

use panelmatch::documents::{CsvSource, Document, DocumentSet, DocumentSource, JsonSource};
use panelmatch::output::{CsvExport, MatchSink};
use panelmatch::{MatchOptions, MatchPipeline};

fn sample_sets() -> (DocumentSet, DocumentSet) {
    let baseline = DocumentSet::new(vec![
        Document::new("A", "Machine learning algorithms for image classification."),
        Document::new("B", "Quantum computing and cryptography protocols."),
    ])
    .unwrap();
    let comparison = DocumentSet::new(vec![
        Document::new("1", "Deep learning methods for image recognition tasks."),
        Document::new("2", "Post-quantum cryptography"),
        Document::without_text("3"),
    ])
    .unwrap();
    (baseline, comparison)
}

// ============================================================
// Sources
// ============================================================

#[test]
fn csv_source_reads_title_and_abstract() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pubs.csv");
    fs::write(
        &path,
        "doi,title,abstract\n10.1/a,\"Deep nets, revisited\",Image work\n10.1/b,,\n",
    )
    .unwrap();

    let source = CsvSource::new(&path, "doi", vec!["title".into(), "abstract".into()]);
    let set = source.load().unwrap();

    assert_eq!(set.ids(), vec!["10.1/a".to_string(), "10.1/b".to_string()]);
    assert_eq!(
        set.as_slice()[0].text.as_deref(),
        Some("Deep nets, revisited Image work")
    );
    assert_eq!(set.as_slice()[1].text, None);
    assert!(source.describe().starts_with("csv:"));
}

#[test]
fn csv_source_names_missing_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docs.csv");
    fs::write(&path, "id,body\n1,hello there\n").unwrap();

    let err = CsvSource::new(&path, "id", vec!["text".into()])
        .load()
        .unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("text"), "{msg}");
    assert!(msg.contains("body"), "{msg}");
}

#[test]
fn csv_source_rejects_duplicate_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dup.csv");
    fs::write(&path, "id,text\n1,first\n1,second\n").unwrap();

    assert!(CsvSource::new(&path, "id", vec!["text".into()]).load().is_err());
}

#[test]
fn json_source_accepts_numeric_ids_and_bad_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apps.json");
    fs::write(
        &path,
        r#"[
            {"id": 101, "text": "Soil carbon sequestration"},
            {"id": "x-2", "text": null},
            {"id": "x-3", "text": 42},
            {"id": "x-4"}
        ]"#,
    )
    .unwrap();

    let set = JsonSource::new(&path).load().unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(set.as_slice()[0].id, "101");
    assert_eq!(
        set.as_slice()[0].text.as_deref(),
        Some("Soil carbon sequestration")
    );
    assert!(set.as_slice()[1..].iter().all(|d| d.text.is_none()));
}

#[test]
fn json_source_requires_an_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"id": 1, "text": "not in an array"}"#).unwrap();

    assert!(JsonSource::new(&path).load().is_err());
}

// ============================================================
// CSV export
// ============================================================

#[test]
fn export_file_matches_ranking() {
    let (baseline, comparison) = sample_sets();
    let options = MatchOptions {
        top_n: 2,
        ..MatchOptions::default()
    };
    let report = MatchPipeline::new(options)
        .unwrap()
        .run(&baseline, &comparison)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("matches.csv");
    let mut export = CsvExport::create(&path, false).unwrap();
    export.write(&report.matches, 2).unwrap();
    drop(export);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(header, vec!["comparison_id", "match_1", "match_2"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[0][1], "A");
    assert_eq!(&rows[1][0], "2");
    assert_eq!(&rows[1][1], "B");
}

// ============================================================
// SQLite store
// ============================================================

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use panelmatch::db::{Corpus, SqliteStore};

    fn store(dir: &tempfile::TempDir) -> SqliteStore {
        let path = dir.path().join("panelmatch.db");
        SqliteStore::initialize(path.to_str().unwrap()).unwrap()
    }

    #[test]
    fn initialize_creates_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store(&dir).table_count().unwrap(), 5);
    }

    #[test]
    fn reopening_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panelmatch.db");
        let path = path.to_str().unwrap();

        let (baseline, _) = sample_sets();
        SqliteStore::initialize(path)
            .unwrap()
            .import(Corpus::Baseline, &baseline, true)
            .unwrap();

        let reopened = SqliteStore::open(path).unwrap();
        assert_eq!(reopened.count_documents(Corpus::Baseline).unwrap(), 2);
    }

    #[test]
    fn documents_round_trip_in_import_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let (baseline, comparison) = sample_sets();

        store.import(Corpus::Baseline, &baseline, true).unwrap();
        store.import(Corpus::Comparison, &comparison, true).unwrap();

        assert_eq!(store.source(Corpus::Baseline).load().unwrap(), baseline);
        let loaded = store.source(Corpus::Comparison).load().unwrap();
        assert_eq!(loaded, comparison);
        assert_eq!(loaded.as_slice()[2].text, None);
    }

    #[test]
    fn append_adds_after_existing_and_updates_known_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let (baseline, _) = sample_sets();
        store.import(Corpus::Baseline, &baseline, true).unwrap();

        let extra = DocumentSet::new(vec![
            Document::new("C", "Graph neural networks"),
            Document::new("A", "Updated abstract for A"),
        ])
        .unwrap();
        store.import(Corpus::Baseline, &extra, false).unwrap();

        let loaded = store.source(Corpus::Baseline).load().unwrap();
        assert_eq!(loaded.ids(), vec!["A", "B", "C"]);
        assert_eq!(
            loaded.as_slice()[0].text.as_deref(),
            Some("Updated abstract for A")
        );
    }

    #[test]
    fn replace_clears_only_the_target_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let (baseline, comparison) = sample_sets();
        store.import(Corpus::Baseline, &baseline, true).unwrap();
        store.import(Corpus::Comparison, &comparison, true).unwrap();

        let fresh = DocumentSet::new(vec![Document::new("Z", "Only one")]).unwrap();
        store.import(Corpus::Baseline, &fresh, true).unwrap();

        assert_eq!(store.count_documents(Corpus::Baseline).unwrap(), 1);
        assert_eq!(store.count_documents(Corpus::Comparison).unwrap(), 3);
    }

    #[test]
    fn saved_run_reloads_identically() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let (baseline, comparison) = sample_sets();
        let options = MatchOptions {
            top_n: 2,
            ..MatchOptions::default()
        };
        let report = MatchPipeline::new(options)
            .unwrap()
            .run(&baseline, &comparison)
            .unwrap();

        let mut sink = store.sink(options, report.stats.clone());
        sink.write(&report.matches, options.top_n).unwrap();
        let run_id = sink.run_id().unwrap();

        let summary = store.latest_run().unwrap().unwrap();
        assert_eq!(summary.id, run_id);
        assert_eq!(summary.options, options);
        assert_eq!(summary.baseline_count, 2);
        assert_eq!(summary.comparison_count, 3);

        assert_eq!(store.run_matches(run_id).unwrap(), report.matches);
        assert_eq!(store.count_runs().unwrap(), 1);

        let (latest, matches) = store.latest_matches().unwrap().unwrap();
        assert_eq!(latest.id, run_id);
        assert_eq!(matches, report.matches);
    }

    #[test]
    fn run_with_empty_baseline_keeps_comparison_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let (_, comparison) = sample_sets();
        let report = MatchPipeline::new(MatchOptions::default())
            .unwrap()
            .run(&DocumentSet::default(), &comparison)
            .unwrap();

        let mut sink = store.sink(MatchOptions::default(), report.stats.clone());
        sink.write(&report.matches, 1).unwrap();

        let reloaded = store.run_matches(sink.run_id().unwrap()).unwrap();
        assert_eq!(reloaded.len(), 3);
        assert!(reloaded.iter().all(|e| e.matches.is_empty()));
    }

    #[test]
    fn no_runs_yet() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        assert!(store.latest_run().unwrap().is_none());
        assert!(store.latest_matches().unwrap().is_none());
        assert_eq!(store.count_runs().unwrap(), 0);
    }
}
