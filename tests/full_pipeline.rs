//! End-to-end batch runs through the public `codesim` API.

use std::sync::Arc;

use codesim::{
    cosine_similarity, EmbedError, EmbeddingProvider, EmbeddingVector, EngineConfig,
    HighlightStyle, Language, RawSourceFile, Report, SimilarityEngine, StubProvider,
    DEFAULT_THRESHOLD,
};

fn stub_engine(config: EngineConfig) -> SimilarityEngine {
    SimilarityEngine::new(Arc::new(StubProvider::new(256, 512).unwrap()), config)
}

fn plain_config() -> EngineConfig {
    EngineConfig {
        style: HighlightStyle::plain("[", "]"),
        ..EngineConfig::default()
    }
}

fn file(name: &str, body: &str, lang: &str) -> RawSourceFile {
    RawSourceFile::text(name, body, lang)
}

/// Maps the first character of the text to a fixed vector.
struct TableProvider;

const NEAR: [f32; 2] = [0.3, 0.953_939_2];

impl EmbeddingProvider for TableProvider {
    fn name(&self) -> &str {
        "table"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn embed(&self, text: &str, _language: Language) -> Result<EmbeddingVector, EmbedError> {
        let v = match text.chars().next() {
            Some('A') => vec![1.0, 0.0],
            Some('B') => NEAR.to_vec(),
            _ => vec![0.0, 1.0],
        };
        Ok(EmbeddingVector::new(v))
    }
}

#[test]
fn three_files_produce_three_ranked_pairs() {
    let report = stub_engine(EngineConfig::default())
        .run(vec![
            file("alice.py", "def area(r):\n    return 3.14 * r * r\n", "py"),
            file("bob.py", "def area(r):\n    return 3.14 * r * r\n", "py"),
            file("carol.py", "for i in range(10):\n    print(i)\n", "py"),
        ])
        .unwrap();

    assert_eq!(report.file_count, 3);
    assert_eq!(report.comparison_count, 3);
    assert_eq!(report.pairs.len(), 3);

    let scores: Vec<f32> = report.pairs.iter().map(|p| p.score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));

    let top = &report.pairs[0];
    assert_eq!((top.file1.as_str(), top.file2.as_str()), ("alice.py", "bob.py"));
    assert!(top.score > 0.99);
}

#[test]
fn identical_files_are_fully_matched() {
    let body = "a = 1\nb = a + 2\nprint(b)";
    let report = stub_engine(plain_config())
        .run(vec![file("x.py", body, "py"), file("y.py", body, "py")])
        .unwrap();

    let highlight = report.pairs[0].highlight.as_ref().unwrap();
    assert_eq!(highlight.code1, "[a = 1]\n[b = a + 2]\n[print(b)]");
    assert_eq!(highlight.code2, highlight.code1);
}

#[test]
fn highlight_is_strictly_above_threshold() {
    let exact = cosine_similarity(&[1.0, 0.0], &NEAR);

    let at_threshold = SimilarityEngine::new(
        Arc::new(TableProvider),
        EngineConfig {
            threshold: exact,
            ..EngineConfig::default()
        },
    )
    .run(vec![file("a.js", "A", "js"), file("b.js", "B", "js")])
    .unwrap();
    assert_eq!(at_threshold.pairs[0].score, exact);
    assert!(at_threshold.pairs[0].highlight.is_none());

    let below = SimilarityEngine::new(
        Arc::new(TableProvider),
        EngineConfig {
            threshold: exact - 0.01,
            ..EngineConfig::default()
        },
    )
    .run(vec![file("a.js", "A", "js"), file("b.js", "B", "js")])
    .unwrap();
    assert!(below.pairs[0].highlight.is_some());
}

/// Scores exactly 0.3 between any "A" file and any "B" file.
struct ThreeTenthsProvider;

impl EmbeddingProvider for ThreeTenthsProvider {
    fn name(&self) -> &str {
        "three-tenths"
    }

    fn dimension(&self) -> usize {
        4
    }

    fn embed(&self, text: &str, _language: Language) -> Result<EmbeddingVector, EmbedError> {
        // |[3, 9, 3, 1]| is exactly 10, so the cosine is 3 / 10.
        let v = match text.chars().next() {
            Some('A') => vec![1.0, 0.0, 0.0, 0.0],
            _ => vec![3.0, 9.0, 3.0, 1.0],
        };
        Ok(EmbeddingVector::new(v))
    }
}

#[test]
fn default_threshold_score_is_not_highlighted() {
    let report = SimilarityEngine::new(Arc::new(ThreeTenthsProvider), EngineConfig::default())
        .run(vec![file("a.js", "A", "js"), file("b.js", "B", "js")])
        .unwrap();

    assert_eq!(DEFAULT_THRESHOLD, 0.30);
    assert_eq!(report.pairs[0].score, 0.30);
    assert!(report.pairs[0].highlight.is_none());
}

#[test]
fn orthogonal_vectors_score_zero() {
    let report = SimilarityEngine::new(Arc::new(TableProvider), EngineConfig::default())
        .run(vec![file("a.php", "A", "php"), file("z.php", "Z", "php")])
        .unwrap();
    assert_eq!(report.pairs[0].score, 0.0);
    assert!(report.pairs[0].highlight.is_none());
}

#[test]
fn empty_file_never_highlights() {
    let report = stub_engine(EngineConfig::default())
        .run(vec![
            file("empty.cpp", "", "cpp"),
            file("full.cpp", "int main() { return 0; }", "cpp"),
        ])
        .unwrap();
    assert_eq!(report.pairs[0].score, 0.0);
    assert!(report.pairs[0].highlight.is_none());
}

#[test]
fn comment_only_files_behave_like_empty_files() {
    let report = stub_engine(EngineConfig::default())
        .run(vec![
            file("a.java", "// nothing here\n/* at all */", "java"),
            file("b.java", "class B {}", "java"),
        ])
        .unwrap();
    assert_eq!(report.pairs[0].score, 0.0);
}

#[test]
fn excerpts_are_capped() {
    let body: String = (0..80).map(|i| format!("v{i} = {i}\n")).collect();
    let config = EngineConfig {
        max_lines: 10,
        ..plain_config()
    };
    let report = stub_engine(config)
        .run(vec![file("a.c", &body, "c"), file("b.c", &body, "c")])
        .unwrap();

    let highlight = report.pairs[0].highlight.as_ref().unwrap();
    assert_eq!(highlight.code1.lines().count(), 10);
    assert!(highlight.code1.starts_with("[v0 = 0]"));
}

#[test]
fn partial_copy_marks_only_shared_lines() {
    let original = "total = 0\nfor x in data:\n    total += x\nprint(total)";
    let edited = "total = 0\nfor x in data:\n    total += x\nlog(total)";
    let report = stub_engine(plain_config())
        .run(vec![file("a.py", original, "py"), file("b.py", edited, "py")])
        .unwrap();

    let pair = &report.pairs[0];
    let highlight = pair.highlight.as_ref().expect("near copy is highlighted");
    assert!(highlight.code1.contains("[total = 0]"));
    assert!(highlight.code1.contains("print"));
    assert!(!highlight.code1.contains("[print"));
    assert!(highlight.code2.contains("log"));
    assert!(!highlight.code2.contains("[log"));
}

#[test]
fn report_json_has_documented_shape() {
    let report = stub_engine(EngineConfig::default())
        .run(vec![file("a.py", "x = 1", "py"), file("b.py", "x = 1", "py")])
        .unwrap();

    let json = report.to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 3);
    for key in ["file_count", "comparison_count", "pairs"] {
        assert!(keys.contains(&key));
    }

    let pair = &value["pairs"][0];
    assert_eq!(pair["file1"], "a.py");
    assert_eq!(pair["highlight"]["file2"], "b.py");
    assert!(pair["highlight"]["code1"].is_string());

    let back = Report::from_json(&json).unwrap();
    assert_eq!(back.pairs[0].score, report.pairs[0].score);
}

#[test]
fn directory_batch_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("s2.js"), "const f = (a) => a + 1;\n").unwrap();
    std::fs::write(dir.path().join("s1.js"), "const f = (a) => a + 1;\n").unwrap();
    std::fs::write(dir.path().join("s3.js"), "console.log('hello');\n").unwrap();
    std::fs::write(dir.path().join("readme.md"), "# not code").unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::write(dir.path().join("nested/s4.js"), "ignored").unwrap();

    let report = stub_engine(EngineConfig::default())
        .compare_directory(dir.path(), Language::Js)
        .unwrap();

    assert_eq!(report.file_count, 3);
    assert_eq!(report.pairs[0].file1, "s1.js");
    assert_eq!(report.pairs[0].file2, "s2.js");

    let out = dir.path().join("report.json");
    report.write_json(&out).unwrap();
    let written = Report::from_json(&std::fs::read_to_string(out).unwrap()).unwrap();
    assert_eq!(written.comparison_count, 3);
}
