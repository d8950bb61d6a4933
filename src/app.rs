use crate::theme_bridge::{self, EguiRender};
use eframe::egui;
use ppl_core::storage::KeyValueStore;
use ppl_core::subjects::{self, StudySource, SubjectId};
use ppl_core::theme::{SharedScheme, ThemeController, ThemeMode};
use ppl_core::ErrorStore;
use std::rc::Rc;
use tracing::debug;

type Store = Rc<dyn KeyValueStore>;

pub struct PplPrepApp {
    errors: ErrorStore<Store>,
    theme: ThemeController<Store, EguiRender, SharedScheme>,
    selected: StudySource,
    question_input: String,
    confirm_clear: bool,
}

impl PplPrepApp {
    pub fn new(cc: &eframe::CreationContext<'_>, store: Store) -> Self {
        let scheme = SharedScheme::new(theme_bridge::system_theme(&cc.egui_ctx));
        let mut theme = ThemeController::initialize(
            Rc::clone(&store),
            EguiRender::new(cc.egui_ctx.clone()),
            scheme,
        );
        theme.subscribe(|change| debug!(mode = %change.mode, effective = ?change.effective, "theme changed"));

        Self {
            errors: ErrorStore::new(store),
            theme,
            selected: StudySource::Subject(SubjectId::AirLaw),
            question_input: String::new(),
            confirm_clear: false,
        }
    }

    fn track_system_theme(&mut self, ctx: &egui::Context) {
        // Frames without a reported preference keep the last known one.
        let Some(os) = theme_bridge::system_theme(ctx) else {
            return;
        };
        if self.theme.scheme().set(Some(os)) {
            self.theme.handle_system_change();
        }
    }

    fn record_error(&mut self, subject_id: SubjectId) {
        let question_id = self.question_input.trim();
        if question_id.is_empty() {
            return;
        }
        self.errors.add(subject_id, question_id);
        self.question_input.clear();
    }

    fn clear_errors(&mut self) {
        self.errors.clear();
        self.confirm_clear = false;
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("PPL ispit");
            ui.separator();
            ui.label("Theme:");
            let mut mode = self.theme.mode();
            for option in ThemeMode::ALL {
                ui.radio_value(&mut mode, option, mode_label(option));
            }
            if mode != self.theme.mode() {
                self.theme.set_mode(mode);
            }
        });
    }

    fn subject_list(&mut self, ui: &mut egui::Ui) {
        let grouped = self.errors.group_by_subject();
        ui.add_space(8.0);

        for subject in subjects::all() {
            let source = StudySource::Subject(subject.id);
            let label = match grouped.get(&subject.id) {
                Some(missed) => format!("{} ({})", subject.title, missed.len()),
                None => subject.title.to_string(),
            };
            if ui.selectable_label(self.selected == source, label).clicked() {
                self.selected = source;
            }
        }

        ui.separator();
        let total: usize = grouped.values().map(|q| q.len()).sum();
        let label = format!("{} ({})", StudySource::AllErrors.title(), total);
        if ui
            .selectable_label(self.selected == StudySource::AllErrors, label)
            .clicked()
        {
            self.selected = StudySource::AllErrors;
        }
    }

    fn subject_view(&mut self, ui: &mut egui::Ui, subject_id: SubjectId) {
        ui.heading(subject_id.title());
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.question_input)
                    .hint_text("Question id")
                    .desired_width(160.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Record wrong answer").clicked() || submitted {
                self.record_error(subject_id);
            }
        });

        ui.add_space(10.0);
        let missed = self
            .errors
            .group_by_subject()
            .remove(&subject_id)
            .unwrap_or_default();
        if missed.is_empty() {
            ui.label("No recorded errors for this subject.");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for question_id in &missed {
                ui.horizontal(|ui| {
                    ui.label(question_id);
                    if ui.small_button("Remove").clicked() {
                        self.errors.remove(subject_id, question_id);
                    }
                });
            }
        });
    }

    fn review_view(&mut self, ui: &mut egui::Ui) {
        ui.heading(StudySource::AllErrors.title());
        ui.add_space(10.0);

        let grouped = self.errors.group_by_subject();
        if grouped.is_empty() {
            ui.label(
                egui::RichText::new("No recorded errors.")
                    .size(20.0)
                    .color(egui::Color32::from_rgb(50, 205, 50)),
            );
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (subject_id, missed) in &grouped {
                ui.label(egui::RichText::new(subject_id.title()).strong());
                for question_id in missed {
                    ui.horizontal(|ui| {
                        ui.add_space(12.0);
                        ui.label(question_id);
                        if ui.small_button("Remove").clicked() {
                            self.errors.remove(*subject_id, question_id);
                        }
                    });
                }
                ui.add_space(6.0);
            }
        });
    }

    fn status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("Recorded errors: {}", self.errors.count()));
            ui.separator();
            let effective = self.theme.effective_theme();
            match self.theme.render().theme_color() {
                Some(color) => ui.label(format!("{} {}", effective.marker(), color)),
                None => ui.label(effective.marker()),
            };
            ui.separator();

            if self.confirm_clear {
                ui.label("Clear all recorded errors?");
                if ui.button("Yes, clear").clicked() {
                    self.clear_errors();
                }
                if ui.button("Cancel").clicked() {
                    self.confirm_clear = false;
                }
            } else if ui.small_button("Clear errors").clicked() {
                self.confirm_clear = true;
            }
        });
    }
}

fn mode_label(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::System => "System",
        ThemeMode::Light => "Light",
        ThemeMode::Dark => "Dark",
    }
}

impl eframe::App for PplPrepApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.track_system_theme(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));
        egui::SidePanel::left("subjects")
            .resizable(false)
            .show(ctx, |ui| self.subject_list(ui));

        egui::CentralPanel::default().show(ctx, |ui| match self.selected {
            StudySource::Subject(subject_id) => self.subject_view(ui, subject_id),
            StudySource::AllErrors => self.review_view(ui),
        });
    }
}
