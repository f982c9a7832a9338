//! Color handling for terminal output.

use std::io::IsTerminal;
use std::str::FromStr;

use owo_colors::OwoColorize;
use strum::{Display, EnumString};

use diskusage_core::ScanError;

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ColorMode {
    /// Color when stdout is a terminal and `NO_COLOR` is unset.
    #[default]
    #[strum(serialize = "auto")]
    Auto,
    /// Always color.
    #[strum(serialize = "always")]
    Always,
    /// Never color.
    #[strum(to_string = "never", serialize = "ignore")]
    Never,
}

impl ColorMode {
    /// Parse a color mode, reporting a configuration error on bad input.
    pub fn parse(value: &str) -> Result<Self, ScanError> {
        Self::from_str(value.trim()).map_err(|_| {
            ScanError::config(format!(
                "invalid color mode '{value}', expected auto, always or never"
            ))
        })
    }

    /// Resolve the mode against the current environment.
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }
}

/// Styles for the tree report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Theme {
    color: bool,
}

impl Theme {
    /// A theme that colors output when `color` is set.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Plain output.
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Build the theme for a color mode.
    pub fn for_mode(mode: ColorMode) -> Self {
        Self::new(mode.enabled())
    }

    pub fn is_colored(&self) -> bool {
        self.color
    }

    /// Directory names in the tree.
    pub fn directory(&self, name: &str) -> String {
        if self.color {
            name.bright_green().to_string()
        } else {
            name.to_string()
        }
    }

    /// Size and percentage columns of a directory row.
    pub fn directory_columns(&self, columns: &str) -> String {
        if self.color {
            columns.bright_red().to_string()
        } else {
            columns.to_string()
        }
    }

    /// The scanned root path in the header.
    pub fn root_path(&self, path: &str) -> String {
        if self.color {
            path.bright_green().bold().to_string()
        } else {
            path.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_mode() {
        assert_eq!(ColorMode::parse("auto").unwrap(), ColorMode::Auto);
        assert_eq!(ColorMode::parse("ALWAYS").unwrap(), ColorMode::Always);
        assert_eq!(ColorMode::parse("ignore").unwrap(), ColorMode::Never);
        assert_eq!(ColorMode::parse("never").unwrap(), ColorMode::Never);
        assert!(matches!(
            ColorMode::parse("rainbow"),
            Err(ScanError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_forced_modes() {
        assert!(ColorMode::Always.enabled());
        assert!(!ColorMode::Never.enabled());
    }

    #[test]
    fn test_plain_theme_passes_text_through() {
        let theme = Theme::plain();
        assert_eq!(theme.directory("src"), "src");
        assert_eq!(theme.directory_columns(" 1.0K"), " 1.0K");
    }

    #[test]
    fn test_colored_theme_adds_escapes() {
        let theme = Theme::new(true);
        assert!(theme.is_colored());
        let styled = theme.directory("src");
        assert!(styled.contains("src"));
        assert!(styled.contains('\u{1b}'));
    }
}
