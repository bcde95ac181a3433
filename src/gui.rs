use crate::checker::{describe_misspelling, DocumentAnalysis, SpellChecker};
use crate::config::Config;
use crate::document::DOCX_EXTENSION;
use crate::language::Language;
use crate::oracle::{Endpoint, OracleClient};
use crate::reader::CandidateFilter;
use eframe::egui;
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info};

// Form state that will be saved/loaded. The API key is never persisted.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppState {
    pub selected_file: Option<PathBuf>,
    pub last_directory: Option<PathBuf>,
    pub app_id: String,
    #[serde(skip)]
    pub app_key: String,
    pub language: Language,
    pub endpoint: Endpoint,
    pub filter: CandidateFilter,
    pub output_dir: PathBuf,
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl AppState {
    fn from_config(config: &Config) -> Self {
        Self {
            selected_file: None,
            last_directory: None,
            app_id: config.app_id.clone(),
            app_key: config.app_key.clone(),
            language: config.language,
            endpoint: config.endpoint,
            filter: config.candidate_filter(),
            output_dir: config.output_dir.clone(),
        }
    }

    fn is_ready(&self) -> bool {
        self.selected_file.is_some()
            && !self.app_id.trim().is_empty()
            && !self.app_key.trim().is_empty()
    }

    fn to_config(&self, base: &Config) -> Config {
        Config {
            app_id: self.app_id.clone(),
            app_key: self.app_key.clone(),
            language: self.language,
            endpoint: self.endpoint,
            candidate_limit: self.filter.limit,
            english_only: self.filter.english_only,
            output_dir: self.output_dir.clone(),
            ..base.clone()
        }
    }
}

enum Status {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

pub struct SpellCheckApp {
    state: AppState,
    config: Config,
    analysis: Option<DocumentAnalysis>,
    status: Option<Status>,
    last_check_duration: Option<Duration>,
}

impl SpellCheckApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let mut state: AppState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_else(|| AppState::from_config(&config));

        // Environment credentials are the defaults for the form.
        if state.app_id.is_empty() {
            state.app_id = config.app_id.clone();
        }
        state.app_key = config.app_key.clone();

        Self {
            state,
            config,
            analysis: None,
            status: None,
            last_check_duration: None,
        }
    }

    fn pick_file(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Word documents", &[DOCX_EXTENSION])
            .set_directory(self.start_directory())
            .pick_file()
        {
            if let Some(parent) = path.parent() {
                self.state.last_directory = Some(parent.to_path_buf());
            }
            self.state.selected_file = Some(path);
            self.analysis = None;
            self.status = None;
        }
    }

    fn start_directory(&self) -> PathBuf {
        self.state
            .last_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    // Blocks the UI until the lookup and rewrite are done.
    fn run_check(&mut self) {
        let Some(path) = self.state.selected_file.clone() else {
            return;
        };
        let start_time = Instant::now();
        let config = self.state.to_config(&self.config);

        let outcome = OracleClient::from_config(&config).and_then(|oracle| {
            SpellChecker::new(oracle)
                .with_filter(config.candidate_filter())
                .with_output_dir(&config.output_dir)
                .check_file(&path)
        });
        self.last_check_duration = Some(start_time.elapsed());

        match outcome {
            Ok(analysis) => {
                self.status = Some(if !analysis.has_candidates() {
                    Status::Warning("No words starting with 'a' found in the document.".into())
                } else if analysis.modified_document.is_some() {
                    Status::Success(
                        "Document has been modified. Download it below.".into(),
                    )
                } else {
                    Status::Info("No changes were made to the document.".into())
                });
                self.analysis = Some(analysis);
            }
            Err(e) => {
                error!("spell check failed: {e}");
                self.status = Some(Status::Error(format!("Spell check failed: {e}")));
                self.analysis = None;
            }
        }
    }

    fn download_modified(&mut self, source: PathBuf) {
        let default_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("modified.docx")
            .to_string();

        if let Some(target) = FileDialog::new()
            .add_filter("Word documents", &[DOCX_EXTENSION])
            .set_file_name(&default_name)
            .set_directory(self.start_directory())
            .save_file()
        {
            match std::fs::copy(&source, &target) {
                Ok(_) => {
                    info!(path = %target.display(), "downloaded modified document");
                    self.status = Some(Status::Success(format!("Saved to {}", target.display())));
                }
                Err(e) => {
                    error!("failed to save modified document: {e}");
                    self.status = Some(Status::Error(format!("Failed to save: {e}")));
                }
            }
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("📂 Choose a .docx file…").clicked() {
                self.pick_file();
            }
            match &self.state.selected_file {
                Some(path) => {
                    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    ui.label(format!("📄 {name}"));
                }
                None => {
                    ui.label(egui::RichText::new("No file selected").color(egui::Color32::GRAY));
                }
            }
        });

        ui.add_space(8.0);

        egui::Grid::new("credentials")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label("OED API Application ID");
                ui.add(egui::TextEdit::singleline(&mut self.state.app_id).desired_width(280.0));
                ui.end_row();

                ui.label("OED API Application Key");
                ui.add(
                    egui::TextEdit::singleline(&mut self.state.app_key)
                        .password(true)
                        .desired_width(280.0),
                );
                ui.end_row();
            });

        ui.add_space(4.0);

        egui::CollapsingHeader::new("Options").show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("Language");
                egui::ComboBox::from_id_source("language_combo")
                    .selected_text(format!(
                        "{} {}",
                        self.state.language.flag_emoji(),
                        self.state.language.name()
                    ))
                    .show_ui(ui, |ui| {
                        for lang in Language::all() {
                            ui.selectable_value(
                                &mut self.state.language,
                                lang,
                                format!("{} {}", lang.flag_emoji(), lang.name()),
                            );
                        }
                    });
            });

            ui.horizontal(|ui| {
                ui.label("Lookup");
                for endpoint in Endpoint::all() {
                    ui.radio_value(&mut self.state.endpoint, endpoint, endpoint.name());
                }
            });

            ui.horizontal(|ui| {
                ui.label("Words to check");
                ui.add(egui::DragValue::new(&mut self.state.filter.limit).clamp_range(1..=50));
            });

            ui.checkbox(
                &mut self.state.filter.english_only,
                "Only plain alphabetic words",
            );

            ui.horizontal(|ui| {
                ui.label(format!("Output folder: {}", self.state.output_dir.display()));
                if ui.button("Change…").clicked() {
                    if let Some(dir) = FileDialog::new()
                        .set_directory(&self.state.output_dir)
                        .pick_folder()
                    {
                        self.state.output_dir = dir;
                    }
                }
            });
        });

        ui.add_space(8.0);

        let ready = self.state.is_ready();
        let button = ui.add_enabled(ready, egui::Button::new("✏️ Start Spell Check"));
        if button.clicked() {
            self.run_check();
        }
        if !ready {
            ui.label(
                egui::RichText::new("Choose a document and enter your API credentials to begin.")
                    .color(egui::Color32::GRAY),
            );
        }
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        match &self.status {
            Some(Status::Success(msg)) => {
                ui.colored_label(egui::Color32::GREEN, format!("✓ {msg}"));
            }
            Some(Status::Info(msg)) => {
                ui.colored_label(egui::Color32::LIGHT_BLUE, msg.as_str());
            }
            Some(Status::Warning(msg)) => {
                ui.colored_label(egui::Color32::YELLOW, msg.as_str());
            }
            Some(Status::Error(msg)) => {
                ui.colored_label(egui::Color32::RED, msg.as_str());
            }
            None => {}
        }
    }

    fn show_report(&mut self, ui: &mut egui::Ui) {
        let Some(analysis) = &self.analysis else {
            return;
        };

        ui.separator();
        ui.heading("Spell Check Report");
        ui.label(format!("Total words checked: {}", analysis.total_words));
        ui.label(format!("Correct spellings: {}", analysis.correct_words));
        ui.label(format!("Incorrect spellings: {}", analysis.misspelled_words));
        if let Some(duration) = self.last_check_duration {
            ui.label(
                egui::RichText::new(format!("Checked in {}ms", duration.as_millis()))
                    .color(egui::Color32::GRAY),
            );
        }

        if analysis.misspelled_words > 0 {
            ui.add_space(6.0);
            ui.strong("Words with potential spelling errors and their corrections:");
            for result in analysis.misspelled() {
                ui.colored_label(egui::Color32::LIGHT_RED, describe_misspelling(result));
            }
        }

        let definitions: Vec<_> = analysis
            .results
            .iter()
            .filter(|r| !r.definitions.is_empty())
            .collect();
        if !definitions.is_empty() {
            ui.add_space(6.0);
            ui.strong("Definitions");
            for result in definitions {
                ui.label(format!("{}: {}", result.word, result.definitions.join("; ")));
            }
        }

        let modified = analysis.modified_document.clone();
        if let Some(path) = modified {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("💾 Download modified document").clicked() {
                    self.download_modified(path.clone());
                }
                if ui.button("Open").clicked() {
                    if let Err(e) = open::that(&path) {
                        error!("failed to open {}: {e}", path.display());
                    }
                }
            });
        }
    }
}

impl eframe::App for SpellCheckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading("SpellCheck Pro");
            ui.label("Checks the spelling of words starting with 'a' in your document.");
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_form(ui);
                ui.add_space(6.0);
                self.show_status(ui);
                self.show_report(ui);
            });
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.state);
    }
}
