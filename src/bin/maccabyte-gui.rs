#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::{egui, App, NativeOptions};
use std::path::Path;

use maccabyte::analysis::AnalysisCache;
use maccabyte::config::resolve_config;
use maccabyte::loader::load_document;
use maccabyte::report::{render_comparison, render_tokens};
use maccabyte::{build_engine, Config, FeatureMode, LinguisticEngine, Pipeline, PipelineSettings, RawDocument};

type SharedPipeline = Pipeline<Box<dyn LinguisticEngine>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Analyze,
    Compare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMethod {
    Paste,
    File,
}

struct TextInput {
    method: InputMethod,
    pasted: String,
    path: String,
}

impl TextInput {
    fn new() -> Self {
        TextInput {
            method: InputMethod::Paste,
            pasted: String::new(),
            path: String::new(),
        }
    }

    fn document(&self) -> maccabyte::Result<RawDocument> {
        match self.method {
            InputMethod::Paste => Ok(RawDocument::plain_text(self.pasted.clone())),
            InputMethod::File => load_document(Path::new(self.path.trim())),
        }
    }

    fn show(&mut self, ui: &mut egui::Ui, id: &str) {
        ui.horizontal(|ui| {
            ui.radio_value(&mut self.method, InputMethod::Paste, "Paste text");
            ui.radio_value(&mut self.method, InputMethod::File, "File (.txt / .xml)");
        });
        match self.method {
            InputMethod::Paste => {
                egui::ScrollArea::vertical().id_source(id).max_height(220.0).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.pasted)
                            .desired_rows(10)
                            .desired_width(f32::INFINITY),
                    );
                });
            }
            InputMethod::File => {
                ui.add(egui::TextEdit::singleline(&mut self.path).hint_text("path/to/text.xml"));
            }
        }
    }
}

struct MaccabyteApp {
    config: Config,
    config_error: Option<String>,
    // Started on first use and kept for the whole session.
    pipeline: Option<SharedPipeline>,
    cache: AnalysisCache,
    mode: Mode,
    feature_mode: FeatureMode,
    top_n: usize,
    combined: bool,
    first: TextInput,
    second: TextInput,
    output: String,
    shared_rows: Vec<(String, usize, usize)>,
    run_error: Option<String>,
}

impl MaccabyteApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (config, config_error) = match resolve_config(None) {
            Ok(config) => (config, None),
            Err(err) => {
                tracing::error!(%err, "falling back to default configuration");
                (Config::default(), Some(err.to_string()))
            }
        };
        let feature_mode = config.compare.mode;
        let top_n = config.compare.top_n.clamp(5, 50);

        Self {
            config,
            config_error,
            pipeline: None,
            cache: AnalysisCache::new(),
            mode: Mode::Compare,
            feature_mode,
            top_n,
            combined: false,
            first: TextInput::new(),
            second: TextInput::new(),
            output: String::new(),
            shared_rows: Vec::new(),
            run_error: None,
        }
    }

    fn pipeline(&mut self) -> maccabyte::Result<&SharedPipeline> {
        let pipeline = match self.pipeline.take() {
            Some(pipeline) => pipeline,
            None => Pipeline::new(
                build_engine(&self.config.engine)?,
                PipelineSettings::from(&self.config),
            ),
        };
        Ok(self.pipeline.insert(pipeline))
    }

    fn run(&mut self) {
        self.output.clear();
        self.shared_rows.clear();
        self.run_error = None;
        let outcome = match self.mode {
            Mode::Analyze => self.run_analysis(),
            Mode::Compare => self.run_comparison(),
        };
        if let Err(err) = outcome {
            tracing::error!(%err, "request failed");
            self.run_error = Some(err.to_string());
        }
    }

    fn run_analysis(&mut self) -> maccabyte::Result<()> {
        let document = self.first.document()?;
        self.pipeline()?;
        let Some(pipeline) = self.pipeline.as_ref() else {
            return Ok(());
        };
        let text = pipeline.prepare(&document);
        let tokens = self
            .cache
            .analyze(pipeline.engine(), &text, pipeline.settings().chunk_size)?;
        self.output = render_tokens(tokens);
        Ok(())
    }

    fn run_comparison(&mut self) -> maccabyte::Result<()> {
        let first = self.first.document()?;
        let second = self.second.document()?;
        let (mode, top_n, combined) = (self.feature_mode, self.top_n, self.combined);
        let limit = self.config.compare.unique_display_limit;

        let report = self.pipeline()?.compare_documents(&first, &second, mode, top_n)?;
        let rows = if combined { &report.combined } else { &report.result.shared };
        self.shared_rows = rows
            .iter()
            .map(|row| (row.value.clone(), row.count_a, row.count_b))
            .collect();
        self.output = render_comparison(&report, combined, limit);
        Ok(())
    }
}

impl App for MaccabyteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Engine", |ui| {
                    if ui.button("Clear analysis cache").clicked() {
                        self.cache.clear();
                        ui.close_menu();
                    }
                });
            });
        });

        egui::SidePanel::left("side_panel_left").min_width(220.0).default_width(260.0).show(ctx, |ui| {
            ui.heading("Settings");
            ui.separator();
            ui.collapsing("Configuration", |ui| {
                if let Some(err) = &self.config_error {
                    ui.colored_label(egui::Color32::RED, format!("Config: {err}"));
                }
                ui.label(format!("Engine: {:?} ({})", self.config.engine.kind, self.config.engine.language));
                ui.label(format!("Cached analyses: {}", self.cache.len()));
            });
            ui.separator();

            ui.label("Mode:");
            ui.radio_value(&mut self.mode, Mode::Analyze, "Analyze one text");
            ui.radio_value(&mut self.mode, Mode::Compare, "Compare two texts");

            if self.mode == Mode::Compare {
                ui.separator();
                ui.label("Compare by:");
                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.feature_mode, FeatureMode::Lemma, "lemma");
                    ui.radio_value(&mut self.feature_mode, FeatureMode::Pos, "pos");
                });
                ui.add(egui::Slider::new(&mut self.top_n, 5..=50).text("Top N"));
                ui.checkbox(&mut self.combined, "Rank union of both texts");
            }
            ui.separator();

            let label = match self.mode {
                Mode::Analyze => "Analyze Text",
                Mode::Compare => "Compare Texts",
            };
            if ui.button(label).clicked() {
                self.run();
            }
            if let Some(err) = &self.run_error {
                ui.colored_label(egui::Color32::RED, err);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().id_source("central_scroll").auto_shrink([false, false]).show(ui, |ui| {
                match self.mode {
                    Mode::Analyze => {
                        ui.heading("Text");
                        self.first.show(ui, "text_input");
                    }
                    Mode::Compare => {
                        ui.columns(2, |columns| {
                            columns[0].heading("Text 1");
                            self.first.show(&mut columns[0], "first_input");
                            columns[1].heading("Text 2");
                            self.second.show(&mut columns[1], "second_input");
                        });
                    }
                }
                ui.separator();

                if self.mode == Mode::Compare && !self.shared_rows.is_empty() {
                    egui::Grid::new("frequency_grid").striped(true).show(ui, |ui| {
                        ui.strong(self.feature_mode.as_str());
                        ui.strong("Text 1");
                        ui.strong("Text 2");
                        ui.end_row();
                        for (value, count_a, count_b) in &self.shared_rows {
                            ui.label(value);
                            ui.label(count_a.to_string());
                            ui.label(count_b.to_string());
                            ui.end_row();
                        }
                    });
                    ui.separator();
                }

                if self.output.is_empty() {
                    ui.label("Results appear here.");
                } else {
                    let mut display = self.output.as_str();
                    ui.add(
                        egui::TextEdit::multiline(&mut display)
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY),
                    );
                }
            });
        });
    }
}

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Maccabyte - Ancient Greek Text Comparison",
        options,
        Box::new(|cc| Box::new(MaccabyteApp::new(cc))),
    )
}
