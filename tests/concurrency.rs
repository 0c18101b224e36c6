//! Concurrency and thread safety tests for a shared engine.

use std::sync::Arc;
use std::thread;

use codesim::{CachedProvider, EngineConfig, RawSourceFile, SimilarityEngine, StubProvider};

fn batch(salt: usize) -> Vec<RawSourceFile> {
    (0..6)
        .map(|i| {
            RawSourceFile::text(
                format!("s{i}.cpp"),
                format!("int f{}(int x) {{ return x * {}; }}\n", i % 3, (i + salt) % 4),
                "cpp",
            )
        })
        .collect()
}

#[test]
fn shared_engine_across_threads() {
    let engine = Arc::new(SimilarityEngine::new(
        Arc::new(StubProvider::new(64, 512).unwrap()),
        EngineConfig::default(),
    ));
    let expected = engine.run(batch(0)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.run(batch(0)).unwrap())
        })
        .collect();

    for handle in handles {
        let report = handle.join().unwrap();
        assert_eq!(report, expected);
        assert_eq!(report.comparison_count, 15);
    }
}

#[test]
fn different_batches_in_parallel_do_not_interfere() {
    let engine = Arc::new(SimilarityEngine::new(
        Arc::new(StubProvider::new(64, 512).unwrap()),
        EngineConfig::default(),
    ));

    let handles: Vec<_> = (0..4)
        .map(|salt| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || (salt, engine.run(batch(salt)).unwrap()))
        })
        .collect();

    for handle in handles {
        let (salt, report) = handle.join().unwrap();
        let sequential = engine.run(batch(salt)).unwrap();
        assert_eq!(report, sequential);
    }
}

#[test]
fn cache_is_shared_between_threads() {
    let provider = Arc::new(CachedProvider::new(StubProvider::new(64, 512).unwrap()));
    let engine = Arc::new(SimilarityEngine::new(
        provider.clone(),
        EngineConfig::default(),
    ));

    // Warm the cache once so every threaded run is all hits.
    engine.run(batch(1)).unwrap();
    let warm = provider.stats();
    assert!(warm.entries > 0);
    assert!(warm.entries <= 6);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.run(batch(1)).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = provider.stats();
    assert_eq!(stats.entries, warm.entries);
    assert_eq!(stats.misses, warm.misses);
    assert_eq!(stats.hits, warm.hits + 4 * 6);
}
