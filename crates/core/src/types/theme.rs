//! Theme slots and CSS variable projection.
//!
//! A theme is an open-ended map from slot name (e.g. `primary`,
//! `cardBackground`) to a color string. The admin edits whatever keys exist;
//! the renderer projects every entry into a CSS custom property scoped to the
//! store view being rendered.

use std::collections::BTreeMap;

/// Slot name → color string. BTreeMap keeps serialization deterministic.
pub type Theme = BTreeMap<String, String>;

/// The conventional slot names, in the order the seeded stores use them.
pub const CONVENTIONAL_SLOTS: [&str; 6] = [
    "primary",
    "secondary",
    "background",
    "text",
    "cardBackground",
    "buttonText",
];

/// Derive the CSS custom property name for a theme slot.
///
/// The transformation is deterministic and stable: camelCase slot names
/// become kebab-case, so `cardBackground` always yields
/// `--theme-card-background` and plain lowercase slots pass through.
#[must_use]
pub fn css_var_name(slot: &str) -> String {
    let mut name = String::with_capacity(slot.len() + 8);
    name.push_str("--theme-");
    for c in slot.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

/// Render a theme as an inline `style` attribute value.
///
/// The result is applied to the root element of a single store view so that
/// concurrently rendered stores (previews, tests) cannot cross-contaminate.
#[must_use]
pub fn theme_style_scope(theme: &Theme) -> String {
    let mut style = String::new();
    for (slot, color) in theme {
        style.push_str(&css_var_name(slot));
        style.push_str(": ");
        style.push_str(color);
        style.push(';');
        style.push(' ');
    }
    style.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_var_name_camel_case() {
        assert_eq!(css_var_name("cardBackground"), "--theme-card-background");
        assert_eq!(css_var_name("buttonText"), "--theme-button-text");
    }

    #[test]
    fn test_css_var_name_lowercase_passthrough() {
        assert_eq!(css_var_name("primary"), "--theme-primary");
        assert_eq!(css_var_name("background"), "--theme-background");
    }

    #[test]
    fn test_css_var_name_is_stable() {
        assert_eq!(css_var_name("cardBackground"), css_var_name("cardBackground"));
    }

    #[test]
    fn test_theme_style_scope_emits_every_slot() {
        let mut theme = Theme::new();
        theme.insert("primary".to_string(), "#5D4037".to_string());
        theme.insert("cardBackground".to_string(), "#FFFFFF".to_string());

        let style = theme_style_scope(&theme);
        assert!(style.contains("--theme-primary: #5D4037;"));
        assert!(style.contains("--theme-card-background: #FFFFFF;"));
    }

    #[test]
    fn test_theme_style_scope_empty_theme() {
        assert_eq!(theme_style_scope(&Theme::new()), "");
    }
}
