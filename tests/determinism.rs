use std::sync::Arc;

use codesim::{
    tokenize_source, CachedProvider, EngineConfig, Language, RawSourceFile, SimilarityEngine,
    StubProvider,
};

fn batch() -> Vec<RawSourceFile> {
    vec![
        RawSourceFile::text(
            "one.java",
            "public class Sum {\n  int add(int a, int b) { return a + b; }\n}\n",
            "java",
        ),
        RawSourceFile::text(
            "two.java",
            "public class Sum {\n  // helper\n  int add(int x, int y) { return x + y; }\n}\n",
            "java",
        ),
        RawSourceFile::text(
            "three.java",
            "public class Main {\n  public static void main(String[] args) {}\n}\n",
            "java",
        ),
        RawSourceFile::text("four.java", "", "java"),
    ]
}

fn stub_engine() -> SimilarityEngine {
    SimilarityEngine::new(
        Arc::new(StubProvider::new(128, 512).unwrap()),
        EngineConfig::default(),
    )
}

#[test]
fn repeated_runs_produce_identical_json() {
    let engine = stub_engine();
    let first = engine.run(batch()).unwrap().to_json_pretty().unwrap();
    for _ in 0..5 {
        let again = engine.run(batch()).unwrap().to_json_pretty().unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn separate_engines_agree() {
    let a = stub_engine().run(batch()).unwrap();
    let b = stub_engine().run(batch()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn cache_does_not_change_results() {
    let cached = SimilarityEngine::new(
        Arc::new(CachedProvider::new(StubProvider::new(128, 512).unwrap())),
        EngineConfig::default(),
    );
    let plain = stub_engine().run(batch()).unwrap();

    assert_eq!(cached.run(batch()).unwrap(), plain);
    assert_eq!(cached.run(batch()).unwrap(), plain);
}

#[test]
fn equal_scores_keep_canonical_pair_order() {
    let same = "x = 1";
    let report = stub_engine()
        .run(vec![
            RawSourceFile::text("a.py", same, "py"),
            RawSourceFile::text("b.py", same, "py"),
            RawSourceFile::text("c.py", same, "py"),
        ])
        .unwrap();

    let order: Vec<(&str, &str)> = report
        .pairs
        .iter()
        .map(|p| (p.file1.as_str(), p.file2.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![("a.py", "b.py"), ("a.py", "c.py"), ("b.py", "c.py")]
    );
}

#[test]
fn tokenization_is_idempotent_and_lossless() {
    let source = "def f():  # entry\n    return 'a # b'\n\n\n";
    let first = tokenize_source(source, Language::Py);
    let second = tokenize_source(&first.stripped, Language::Py);

    assert_eq!(first, second);
    assert_eq!(first.texts().collect::<String>(), first.stripped);
}

#[test]
fn known_token_stream() {
    let tokens = tokenize_source("def f(): pass", Language::Py);
    let texts: Vec<&str> = tokens.texts().collect();
    assert_eq!(texts, vec!["def", " ", "f", "(", ")", ":", " ", "pass"]);
}
