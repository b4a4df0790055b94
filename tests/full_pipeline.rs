use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use maccabyte::analysis::StubEngine;
use maccabyte::config::resolve_config;
use maccabyte::loader::read_source;
use maccabyte::report::{render_comparison, write_analysis, OutputFormat};
use maccabyte::{build_engine, FeatureMode, MaccabyteError, Pipeline, PipelineSettings};

const TEI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader><fileDesc><p>Machine readable text</p></fileDesc></teiHeader>
  <text><body><div type="chapter">
    <p>(1) ὁ λόγος ἦν.</p>
    <p>   </p>
    <p>2 ὁ θεός</p>
  </div></body></text>
</TEI>"#;

const PLAIN: &str = "1 Καὶ ὁ λόγος ἐστιν, καὶ ὁ θεός ἐστιν.\n";

fn engine() -> StubEngine {
    StubEngine::new("grc")
        .with_entry("ἦν", "εἰμί", Some("VERB"))
        .with_entry("ἐστιν", "εἰμί", Some("VERB"))
        .with_entry("ὁ", "ὁ", Some("DET"))
        .with_entry("λόγος", "λόγος", Some("NOUN"))
        .with_entry("θεός", "θεός", Some("NOUN"))
}

fn corpus() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let xml = dir.path().join("john.xml");
    let txt = dir.path().join("maccabees.txt");
    fs::write(&xml, TEI).unwrap();
    fs::write(&txt, PLAIN).unwrap();
    (dir, xml, txt)
}

fn rows(report: &maccabyte::ComparisonReport) -> Vec<(&str, usize, usize)> {
    report
        .result
        .shared
        .iter()
        .map(|row| (row.value.as_str(), row.count_a, row.count_b))
        .collect()
}

#[test]
fn markup_and_plain_text_compare_by_lemma() {
    let (_dir, xml, txt) = corpus();
    let a = read_source(xml.to_str().unwrap()).unwrap();
    let b = read_source(txt.to_str().unwrap()).unwrap();
    let pipeline = Pipeline::new(engine(), PipelineSettings::default());

    assert_eq!(pipeline.prepare(&a), "ὁ λόγος ἦν ὁ θεός");

    let report = pipeline
        .compare_documents(&a, &b, FeatureMode::Lemma, 10)
        .unwrap();
    assert_eq!(
        rows(&report),
        vec![("ὁ", 2, 2), ("εἰμί", 1, 2), ("θεός", 1, 1), ("λόγος", 1, 1)]
    );
    assert!(report.result.unique_to_a.is_empty());
    assert_eq!(
        report.result.unique_to_b.iter().collect::<Vec<_>>(),
        vec!["καὶ"]
    );
}

#[test]
fn top_n_truncates_only_the_shared_ranking() {
    let (_dir, xml, txt) = corpus();
    let a = read_source(xml.to_str().unwrap()).unwrap();
    let b = read_source(txt.to_str().unwrap()).unwrap();
    let pipeline = Pipeline::new(engine(), PipelineSettings::default());

    let report = pipeline.compare_documents(&a, &b, FeatureMode::Lemma, 1).unwrap();

    assert_eq!(rows(&report), vec![("ὁ", 2, 2)]);
    assert_eq!(report.result.unique_to_b.len(), 1);
    assert_eq!(report.combined.len(), 1);
}

#[test]
fn pos_comparison_counts_tags() {
    let (_dir, xml, txt) = corpus();
    let a = read_source(xml.to_str().unwrap()).unwrap();
    let b = read_source(txt.to_str().unwrap()).unwrap();
    let pipeline = Pipeline::new(engine(), PipelineSettings::default());

    let report = pipeline.compare_documents(&a, &b, FeatureMode::Pos, 10).unwrap();

    assert_eq!(rows(&report), vec![("DET", 2, 2), ("NOUN", 2, 2), ("VERB", 1, 2)]);
    let text = render_comparison(&report, false, 10);
    assert!(text.starts_with("Top 10 Shared POS Frequencies\n"));
}

#[test]
fn analysis_results_are_saved() {
    let (dir, _xml, txt) = corpus();
    let document = read_source(txt.to_str().unwrap()).unwrap();
    let pipeline = Pipeline::new(engine(), PipelineSettings::default());
    let tokens = pipeline.analyze_document(&document).unwrap();
    let out = dir.path().join("analysis_results.txt");

    write_analysis(&tokens, &out, OutputFormat::Text).unwrap();

    let saved = fs::read_to_string(&out).unwrap();
    assert_eq!(saved.lines().count(), 8);
    assert_eq!(
        saved.lines().nth(3),
        Some("ἐστιν POS: VERB, Lemma: εἰμί, Morph: {}")
    );
}

#[test]
fn configured_stub_engine_runs_end_to_end() {
    let (dir, xml, _txt) = corpus();
    let config_path = dir.path().join("maccabyte.toml");
    fs::write(
        &config_path,
        "[engine]\nkind = \"stub\"\n\n[analysis]\nchunk_size = 4\n",
    )
    .unwrap();
    let config = resolve_config(Some(&config_path)).unwrap();
    let engine = build_engine(&config.engine).unwrap();
    let pipeline = Pipeline::new(engine, PipelineSettings::from(&config));

    let document = read_source(xml.to_str().unwrap()).unwrap();
    let tokens = pipeline.analyze_document(&document).unwrap();

    assert!(!tokens.is_empty());
    assert!(tokens.iter().all(|t| t.surface.chars().count() <= 4));
}

#[test]
fn bad_inputs_fail_before_analysis() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("scan.pdf");
    fs::write(&pdf, b"%PDF-1.4").unwrap();

    assert!(matches!(
        read_source(pdf.to_str().unwrap()),
        Err(MaccabyteError::UnsupportedFormat(ext)) if ext == "pdf"
    ));
    assert!(matches!(
        read_source(dir.path().join("gone.txt").to_str().unwrap()),
        Err(MaccabyteError::FileNotFound(_))
    ));
    assert!(matches!(
        "morph".parse::<FeatureMode>(),
        Err(MaccabyteError::InvalidMode(mode)) if mode == "morph"
    ));
}
