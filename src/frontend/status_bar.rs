//! Status bar panel: bottom bar showing the last file and capture counters.

use egui::{Color32, RichText, Ui};
use std::path::Path;

use crate::types::CaptureStats;

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub stats: &'a CaptureStats,
    pub current_file: Option<&'a Path>,
    pub last_file: Option<&'a Path>,
}

/// Human-readable byte count
pub fn format_bytes(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if kb > 1024.0 {
        format!("{:.2} MB", kb / 1024.0)
    } else {
        format!("{:.2} KB", kb)
    }
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        // === Last file ===
        ui.label(RichText::new("Last file:").small());
        let last = ctx
            .last_file
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        ui.label(RichText::new(last).small().monospace());

        ui.separator();

        // === Recording indicator ===
        if let Some(current) = ctx.current_file {
            let name = current
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.colored_label(Color32::GREEN, RichText::new(format!("Recording {}", name)).small());
            ui.separator();
        }

        let stats = ctx.stats;

        ui.label(RichText::new(format!("Data: {}", format_bytes(stats.bytes_received))).small());
        ui.separator();
        ui.label(RichText::new(format!("Lines: {}", stats.lines_written)).small());
        ui.separator();
        ui.label(RichText::new(format!("Files: {}", stats.files_closed)).small());

        // === Problems (right-aligned) ===
        let problems = stats.dropped_chunks + stats.write_errors;
        if problems > 0 {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(
                    Color32::LIGHT_RED,
                    RichText::new(format!(
                        "Dropped: {}  Write errors: {}",
                        stats.dropped_chunks, stats.write_errors
                    ))
                    .small(),
                );
            });
        }
    });
}
