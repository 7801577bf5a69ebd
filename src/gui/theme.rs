//! Centralized theme and styling system for the GUI
//!
//! Provides the AppTheme struct with colors, spacing, and styled widget factories.

use eframe::egui;

/// Centralized theme and styling system
#[derive(Clone, Copy)]
pub struct AppTheme {
    // Base colors
    pub background: egui::Color32,
    pub surface: egui::Color32,
    pub surface_hover: egui::Color32,
    pub surface_active: egui::Color32,
    pub panel_fill: egui::Color32,
    pub text_primary: egui::Color32,
    pub text_secondary: egui::Color32,

    // Semantic colors
    pub primary: egui::Color32,
    pub primary_hover: egui::Color32,
    pub secondary: egui::Color32,
    pub success: egui::Color32,
    pub warning: egui::Color32,
    pub error: egui::Color32,

    // Accent colors, one per trigger style token
    pub accent_blue: egui::Color32,
    pub accent_amber: egui::Color32,
    pub accent_purple: egui::Color32,
    pub accent_pink: egui::Color32,
    pub accent_indigo: egui::Color32,

    // Spacing constants
    pub spacing_xs: f32,
    pub spacing_sm: f32,
    pub spacing_md: f32,
    pub spacing_lg: f32,
    pub spacing_xl: f32,

    // Button sizes
    pub button_small: egui::Vec2,
    pub button_medium: egui::Vec2,
    pub button_large: egui::Vec2,

    // Modal
    pub modal_width: f32,
    pub card_size: egui::Vec2,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            // Dark slate surfaces with a blue primary
            background: egui::Color32::from_rgb(17, 24, 39),
            surface: egui::Color32::from_rgb(31, 41, 55),
            surface_hover: egui::Color32::from_rgb(43, 55, 72),
            surface_active: egui::Color32::from_rgb(55, 65, 81),
            panel_fill: egui::Color32::from_rgb(23, 31, 46),
            text_primary: egui::Color32::from_rgb(243, 244, 246),
            text_secondary: egui::Color32::from_rgb(156, 163, 175),

            primary: egui::Color32::from_rgb(37, 99, 235),
            primary_hover: egui::Color32::from_rgb(29, 78, 216),
            secondary: egui::Color32::from_rgb(75, 85, 99),
            success: egui::Color32::from_rgb(34, 197, 94),
            warning: egui::Color32::from_rgb(245, 158, 11),
            error: egui::Color32::from_rgb(239, 68, 68),

            accent_blue: egui::Color32::from_rgb(59, 130, 246),
            accent_amber: egui::Color32::from_rgb(217, 119, 6),
            accent_purple: egui::Color32::from_rgb(147, 51, 234),
            accent_pink: egui::Color32::from_rgb(219, 39, 119),
            accent_indigo: egui::Color32::from_rgb(79, 70, 229),

            spacing_xs: 4.0,
            spacing_sm: 8.0,
            spacing_md: 16.0,
            spacing_lg: 24.0,
            spacing_xl: 32.0,

            button_small: egui::vec2(80.0, 24.0),
            button_medium: egui::vec2(140.0, 36.0),
            button_large: egui::vec2(200.0, 44.0),

            modal_width: 420.0,
            card_size: egui::vec2(190.0, 96.0),
        }
    }
}

impl AppTheme {
    /// Create a themed button with consistent sizing and colors
    pub fn button_primary(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(egui::Color32::WHITE).strong())
            .fill(self.primary)
            .rounding(8.0)
            .min_size(self.button_medium)
    }

    /// Create a themed secondary button (outlined style)
    pub fn button_secondary(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(self.text_primary))
            .fill(self.surface)
            .stroke(egui::Stroke::new(1.0, self.secondary))
            .rounding(8.0)
            .min_size(self.button_medium)
    }

    /// Create a small themed button
    pub fn button_small(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(self.text_primary))
            .fill(self.secondary)
            .min_size(self.button_small)
    }

    /// Full-width action button used at the bottom of the modal
    pub fn button_large(&self, text: &str, enabled: bool) -> egui::Button<'_> {
        let fill = if enabled { self.primary } else { self.secondary };
        egui::Button::new(egui::RichText::new(text).color(egui::Color32::WHITE).strong())
            .fill(fill)
            .rounding(12.0)
            .min_size(egui::vec2(self.modal_width - 2.0 * self.spacing_md, self.button_large.y))
    }

    /// Fill color for a trigger style token; unknown tokens use the primary color.
    pub fn class_color(&self, class: &str) -> egui::Color32 {
        match class.trim() {
            "amber" => self.accent_amber,
            "purple" => self.accent_purple,
            "pink" => self.accent_pink,
            "gradient" | "indigo" => self.accent_indigo,
            _ => self.primary,
        }
    }

    /// Trigger button styled by a `button_class` token
    pub fn button_for_class(&self, class: &str, text: &str) -> egui::Button<'_> {
        let rounding = match class.trim() {
            "amber" => 18.0,
            "pink" => 8.0,
            _ => 12.0,
        };
        egui::Button::new(egui::RichText::new(text).color(egui::Color32::WHITE).strong().size(15.0))
            .fill(self.class_color(class))
            .rounding(rounding)
            .min_size(self.button_medium)
    }

    /// Create a themed frame for surface elements
    pub fn frame_surface(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.surface)
            .rounding(8.0)
            .inner_margin(self.spacing_md)
    }

    /// Create a themed frame for panels/cards
    pub fn frame_panel(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.panel_fill)
            .rounding(12.0)
            .inner_margin(self.spacing_md)
            .stroke(egui::Stroke::new(1.0, self.surface_active))
    }

    /// Frame for one tier card in the modal
    pub fn frame_tier_card(&self, selected: bool) -> egui::Frame {
        let (fill, stroke) = if selected {
            (self.primary.gamma_multiply(0.2), egui::Stroke::new(2.0, self.accent_blue))
        } else {
            (self.surface, egui::Stroke::new(1.0, self.surface_active))
        };
        egui::Frame::none()
            .fill(fill)
            .rounding(12.0)
            .inner_margin(self.spacing_sm)
            .stroke(stroke)
    }

    /// Error line under the tier cards
    pub fn frame_error(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.error.gamma_multiply(0.15))
            .rounding(4.0)
            .inner_margin(self.spacing_sm)
    }

    pub fn section_header_text(&self, icon: &str, title: &str) -> String {
        format!("{} {}", icon, title)
    }
}

/// Configure the egui context style with the given theme
pub fn configure_style(ctx: &egui::Context, theme: &AppTheme) {
    let mut visuals = egui::Visuals::dark();
    visuals.window_fill = theme.background;
    visuals.panel_fill = theme.panel_fill;
    visuals.override_text_color = Some(theme.text_primary);
    visuals.window_rounding = egui::Rounding::same(12.0);

    visuals.widgets.noninteractive.bg_fill = theme.surface;
    visuals.widgets.inactive.bg_fill = theme.surface;
    visuals.widgets.hovered.bg_fill = theme.surface_hover;
    visuals.widgets.active.bg_fill = theme.surface_active;
    visuals.widgets.open.bg_fill = theme.surface_active;

    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, theme.surface_active);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, theme.accent_blue);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(2.0, theme.primary);
    visuals.selection.bg_fill = theme.primary;

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    style.spacing.menu_margin = egui::Margin::same(8.0);
    style.spacing.indent = 20.0;

    style.text_styles.insert(
        egui::TextStyle::Heading,
        egui::FontId::new(22.0, egui::FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Body,
        egui::FontId::new(14.0, egui::FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Button,
        egui::FontId::new(14.0, egui::FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Monospace,
        egui::FontId::new(12.0, egui::FontFamily::Monospace),
    );

    ctx.set_style(style);
}
