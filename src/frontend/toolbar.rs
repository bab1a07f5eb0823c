//! Connection toolbar: port, baud, output directory and connect toggle

use egui::{Color32, RichText, Ui};
use std::path::Path;

use super::state::{AppAction, ConnectionForm};
use crate::types::ConnectionStatus;

/// Read-only context for the toolbar
pub struct ToolbarContext<'a> {
    pub status: ConnectionStatus,
    pub output_dir: &'a Path,
}

/// Render the toolbar and collect the actions it produced
pub fn render_toolbar(
    ui: &mut Ui,
    form: &mut ConnectionForm,
    ctx: &ToolbarContext<'_>,
) -> Vec<AppAction> {
    let mut actions = Vec::new();
    let connected = ctx.status == ConnectionStatus::Connected;

    egui::Grid::new("toolbar_grid")
        .num_columns(3)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            // === Port ===
            ui.label("Port");
            ui.add_enabled_ui(!connected, |ui| {
                let selected_text = form
                    .selected_port
                    .clone()
                    .unwrap_or_else(|| "Select port...".to_string());
                egui::ComboBox::from_id_salt("toolbar_port_selector")
                    .selected_text(selected_text)
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        if form.ports.is_empty() {
                            ui.label("No ports found");
                        }
                        for port in &form.ports {
                            let is_selected = form.selected_port.as_deref() == Some(port.name.as_str());
                            if ui.selectable_label(is_selected, port.to_string()).clicked() {
                                form.selected_port = Some(port.name.clone());
                            }
                        }
                    });
            });
            if ui
                .add_enabled(!connected, egui::Button::new("Refresh"))
                .on_hover_text("Re-scan serial ports")
                .clicked()
            {
                actions.push(AppAction::RefreshPorts);
            }
            ui.end_row();

            // === Baud ===
            ui.label("Baud");
            ui.add_enabled(
                !connected,
                egui::TextEdit::singleline(&mut form.baud_input).desired_width(100.0),
            );
            ui.label("");
            ui.end_row();

            // === Output directory ===
            ui.label("Output");
            ui.label(RichText::new(ctx.output_dir.display().to_string()).monospace());
            if ui
                .button("Browse...")
                .on_hover_text("Choose where capture files are written")
                .clicked()
            {
                if let Some(dir) = rfd::FileDialog::new()
                    .set_title("Capture Directory")
                    .set_directory(ctx.output_dir)
                    .pick_folder()
                {
                    actions.push(AppAction::SetOutputDir(dir));
                }
            }
            ui.end_row();
        });

    ui.horizontal(|ui| {
        // Connect toggle
        let (label, fill) = if connected {
            ("Disconnect", Color32::from_rgb(180, 50, 50))
        } else {
            ("Connect", Color32::from_rgb(50, 120, 50))
        };
        let btn = egui::Button::new(RichText::new(label).color(Color32::WHITE)).fill(fill);
        if ui.add(btn).clicked() {
            if connected {
                actions.push(AppAction::Disconnect);
            } else {
                actions.push(form.connect_action());
            }
        }

        // Status dot
        let status_color = match ctx.status {
            ConnectionStatus::Connected => Color32::from_rgb(46, 125, 50),
            ConnectionStatus::Disconnected => Color32::from_rgb(183, 28, 28),
        };
        ui.colored_label(status_color, "●");
        ui.label(ctx.status.to_string());
    });

    actions
}
