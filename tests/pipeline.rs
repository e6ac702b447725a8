use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use latency_report::schema::SUMMARY_FILE;
use latency_report::{
    run, AnalysisConfig, AnalysisContext, AnalysisError, Histogram, PngRenderer, Renderer,
    Result, TrendSeries,
};

/// Records render calls instead of writing images.
#[derive(Default)]
struct RecordingRenderer {
    histograms: Vec<PathBuf>,
    trends: Vec<(PathBuf, Vec<TrendSeries>)>,
}

impl Renderer for RecordingRenderer {
    fn histogram(&mut self, path: &Path, _title: &str, histogram: &Histogram) -> Result<()> {
        assert_eq!(histogram.centers().len(), histogram.counts().len());
        self.histograms.push(path.to_path_buf());
        Ok(())
    }

    fn trend(&mut self, path: &Path, _title: &str, series: &[TrendSeries]) -> Result<()> {
        self.trends.push((path.to_path_buf(), series.to_vec()));
        Ok(())
    }
}

fn write_fixture(root: &Path) -> PathBuf {
    let input = root.join("results");
    fs::create_dir(&input).unwrap();
    for name in [
        "uint32_el10_par1.txt",
        "uint32_el100_par1.txt",
        "uint32_el10_par2.txt",
    ] {
        fs::write(input.join(name), "1000 2000 3000\n").unwrap();
    }
    fs::write(input.join("_metadata.txt"), "host=test\n").unwrap();
    input
}

#[test]
fn end_to_end_groups_and_report() {
    let root = tempfile::tempdir().unwrap();
    let input = write_fixture(root.path());

    let ctx = AnalysisContext::load(AnalysisConfig::new(&input)).unwrap();
    let agg = ctx.aggregator();

    let par1: Vec<(u64, f64)> = agg
        .group("uint32", 1)
        .iter()
        .map(|r| (r.numelements(), r.mean()))
        .collect();
    assert_eq!(par1.len(), 2);
    assert_eq!(par1[0].0, 10);
    assert_eq!(par1[1].0, 100);
    assert!(par1.iter().all(|(_, mean)| (mean - 2.0).abs() < 1e-12));

    let par2 = agg.group("uint32", 2);
    assert_eq!(par2.len(), 1);
    assert_eq!(par2[0].numelements(), 10);
    assert!((par2[0].mean() - 2.0).abs() < 1e-12);

    let mut renderer = PngRenderer::default();
    let outcome = run(AnalysisConfig::new(&input), &mut renderer).unwrap();
    assert_eq!(outcome.results, 3);
    assert_eq!(outcome.skipped, 0);

    let expected_dir = fs::canonicalize(root.path()).unwrap().join("report");
    assert_eq!(outcome.report_dir, expected_dir);

    let report = fs::read_to_string(&outcome.report_path).unwrap();
    assert!(report.starts_with("# Report"));
    assert!(report.contains("host=test"));

    let aggregate_refs = report.matches("![overall_uint32.png]").count();
    let config_refs = ["uint32-el10-par1.png", "uint32-el100-par1.png", "uint32-el10-par2.png"]
        .iter()
        .filter(|name| report.contains(&format!("![{name}](<{name}>)")))
        .count();
    assert_eq!(aggregate_refs, 1);
    assert_eq!(config_refs, 3);
    assert_eq!(report.matches("![").count(), 4);

    // aggregate first
    let overall = report.find("overall_uint32.png").unwrap();
    let first_hist = report.find("uint32-el10-par1.png").unwrap();
    assert!(overall < first_hist);

    for name in &outcome.artifacts {
        let bytes = fs::read(outcome.report_dir.join(name)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n", "{name}");
    }
}

#[test]
fn metadata_file_never_becomes_a_result() {
    let root = tempfile::tempdir().unwrap();
    let input = write_fixture(root.path());
    let mut renderer = RecordingRenderer::default();
    let outcome = run(AnalysisConfig::new(&input), &mut renderer).unwrap();

    assert_eq!(renderer.histograms.len(), 3);
    assert!(renderer
        .histograms
        .iter()
        .all(|p| !p.to_string_lossy().contains("metadata")));
    assert_eq!(outcome.skipped, 0);
}

#[test]
fn trend_series_are_ascending_per_parallelism() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("results");
    fs::create_dir(&input).unwrap();
    for (n, par) in [(4096u64, 1u32), (16, 1), (256, 1), (64, 8), (1, 8)] {
        fs::write(input.join(format!("f32_el{n}_par{par}.txt")), "500 700 900").unwrap();
    }
    let mut renderer = RecordingRenderer::default();
    let mut config = AnalysisConfig::new(&input);
    config.report_dir = Some(root.path().join("out"));
    run(config, &mut renderer).unwrap();

    assert_eq!(renderer.trends.len(), 1);
    let (path, series) = &renderer.trends[0];
    assert!(path.ends_with("overall_f32.png"));
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].label, "par1");
    let xs: Vec<f64> = series[0].points.iter().map(|p| p.log2_elements).collect();
    assert_eq!(xs, vec![4.0, 8.0, 12.0]);
    let xs: Vec<f64> = series[1].points.iter().map(|p| p.log2_elements).collect();
    assert_eq!(xs, vec![0.0, 6.0]);
}

#[test]
fn legacy_directory_produces_single_overall_plot() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("legacy");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("int16_100.txt"), "2000 4000").unwrap();
    fs::write(input.join("int16_10.txt"), "1000 3000").unwrap();

    let mut config = AnalysisConfig::new(&input);
    config.report_dir = Some(root.path().join("out"));
    let outcome = run(config, &mut RecordingRenderer::default()).unwrap();
    assert_eq!(
        outcome.artifacts,
        vec!["overall.png", "int16-10.png", "int16-100.png"]
    );
}

#[test]
fn bad_files_are_skipped_and_listed_in_summary() {
    let root = tempfile::tempdir().unwrap();
    let input = write_fixture(root.path());
    fs::write(input.join("broken-name.txt"), "1 2 3").unwrap();
    fs::write(input.join("uint32_el1_par1.txt"), "").unwrap();
    fs::write(input.join("uint32_el10_par1.txt"), "5000").unwrap();

    let mut config = AnalysisConfig::new(&input);
    config.report_dir = Some(root.path().join("out"));
    let outcome = run(config, &mut RecordingRenderer::default()).unwrap();
    assert_eq!(outcome.results, 3);
    assert_eq!(outcome.skipped, 2);

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.path().join("out").join(SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(summary["run"]["schema_version"], 1);
    assert_eq!(summary["metadata"], "host=test\n");
    assert_eq!(summary["skipped"].as_array().unwrap().len(), 2);
    let results = summary["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["artifact"], "uint32-el10-par1.png");
    assert_eq!(results[0]["configuration"]["numelements"], 10);
    assert_eq!(results[0]["mean"], 5.0);
    assert_eq!(results[0]["histogram"]["counts"].as_array().unwrap().len(), 50);
}

#[test]
fn strict_mode_fails_on_bad_file() {
    let root = tempfile::tempdir().unwrap();
    let input = write_fixture(root.path());
    fs::write(input.join("uint32_el7_par1.txt"), "12 twelve").unwrap();
    let mut config = AnalysisConfig::new(&input);
    config.strict = true;
    config.report_dir = Some(root.path().join("out"));
    let err = run(config, &mut RecordingRenderer::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::File { .. }));
    assert!(err.to_string().contains("uint32_el7_par1.txt"));
}

#[test]
fn cli_exit_codes() {
    let exe = env!("CARGO_BIN_EXE_latency-report");
    let root = tempfile::tempdir().unwrap();

    let missing = Command::new(exe)
        .arg("--directory")
        .arg(root.path().join("nope"))
        .output()
        .unwrap();
    assert!(!missing.status.success());
    let stderr = String::from_utf8_lossy(&missing.stderr);
    assert!(stderr.contains("does not exist"), "{stderr}");

    let input = write_fixture(root.path());
    let ok = Command::new(exe)
        .arg("-d")
        .arg(&input)
        .arg("--print-summary")
        .output()
        .unwrap();
    assert!(ok.status.success(), "{}", String::from_utf8_lossy(&ok.stderr));
    let summary: serde_json::Value = serde_json::from_slice(&ok.stdout).unwrap();
    assert_eq!(summary["results"].as_array().unwrap().len(), 3);
    assert!(root.path().join("report").join("report.md").exists());
}
