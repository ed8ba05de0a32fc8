use std::path::Path;
use std::sync::Arc;

use consolidador::error::DecodeError;
use consolidador::observability::{CompositeObserver, FileObserver, PipelineObserver};
use tempfile::TempDir;

#[test]
fn file_observer_appends_timestamped_status_lines() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("pipeline.log");
    let observer = FileObserver::new(&log);

    observer.on_files_discovered(Path::new("/dados"), 3);
    observer.on_file_success(Path::new("/dados/a.xlsx"), 10);
    observer.on_file_failure(
        Path::new("/dados/b.xls"),
        &DecodeError::UnsupportedFormat {
            path: "/dados/b.xls".into(),
            extension: "xls".into(),
        },
    );

    let contents = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    // every line carries a [YYYY-MM-DD HH:MM:SS] timestamp prefix
    assert!(lines.iter().all(|l| l.starts_with('[') && l.contains("] ")));
    assert!(lines[0].contains("3 files found"));
    assert!(lines[1].contains("✓"));
    assert!(lines[1].contains("10 rows read"));
    assert!(lines[2].contains("✗"));
    assert!(lines[2].contains("b.xls"));
}

#[test]
fn composite_observer_fans_out_to_every_destination() {
    let dir = TempDir::new().unwrap();
    let log_a = dir.path().join("a.log");
    let log_b = dir.path().join("b.log");
    let composite = CompositeObserver::new(vec![
        Arc::new(FileObserver::new(&log_a)),
        Arc::new(FileObserver::new(&log_b)),
    ]);

    composite.on_consolidated(42, 5);
    composite.on_artifact_written(Path::new("/dados/consolidado.parquet"), 42);

    for log in [&log_a, &log_b] {
        let contents = std::fs::read_to_string(log).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("42 rows, 5 columns"));
        assert!(contents.contains("consolidado.parquet"));
    }
}
