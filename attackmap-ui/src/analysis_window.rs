use eframe::egui::{Button, Context, RichText, Window};

use crate::analysis::{AnalysisController, Phase};

/// Modal-style window showing the active analysis session.
pub(crate) fn show(ctx: &Context, controller: &mut AnalysisController) {
    let Some(header) = controller.header() else {
        return;
    };
    let phase = controller.phase();
    let body = controller.display_text().map(str::to_owned);
    let speak_enabled = controller.speak_enabled();
    let speak_label = controller.speak_label();

    let mut open = true;
    let mut speak_clicked = false;

    Window::new("Attack Analysis")
        .open(&mut open)
        .collapsible(false)
        .default_width(420.0)
        .show(ctx, |ui| {
            ui.label(RichText::new(header).strong());
            ui.separator();

            if phase == Phase::Requesting {
                ui.vertical_centered(|ui| {
                    ui.spinner();
                });
            } else if let Some(body) = &body {
                ui.label(body);
            }

            ui.add_space(10.0);
            if ui
                .add_enabled(speak_enabled, Button::new(speak_label))
                .clicked()
            {
                speak_clicked = true;
            }
        });

    if speak_clicked {
        controller.speak();
    }
    if !open {
        controller.dismiss();
    }
}
