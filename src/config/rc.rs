use super::EditorConfig;
use crate::audio::{default_speech_program, DEFAULT_RATE_WPM};
use crate::error::ConfigError;
use crate::storage::LineEnding;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const RC_FILE_NAME: &str = ".clackrc";

#[derive(Debug, Clone, PartialEq)]
pub struct RcConfig {
    pub tab_stop: usize,
    pub page_size: usize,
    pub expand_tab: bool,
    pub rate_wpm: u32,
    pub voice: String,
    pub tones: bool,
    pub line_ending: Option<LineEnding>,
    pub log_file: Option<PathBuf>,
}

impl Default for RcConfig {
    fn default() -> Self {
        let editor = EditorConfig::default();
        Self {
            tab_stop: editor.tab_width,
            page_size: editor.page_size,
            expand_tab: editor.expand_tab,
            rate_wpm: DEFAULT_RATE_WPM,
            voice: default_speech_program().to_string(),
            tones: true,
            line_ending: None,
            log_file: None,
        }
    }
}

impl RcConfig {
    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            tab_width: self.tab_stop,
            page_size: self.page_size,
            expand_tab: self.expand_tab,
        }
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Get the path to the RC file
    /// Looks for .clackrc in:
    /// 1. Current directory
    /// 2. Home directory (~/.clackrc)
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(RC_FILE_NAME);
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(RC_FILE_NAME);
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    /// Load the first RC file found, falling back to defaults.
    pub fn load_config() -> RcConfig {
        let Some(rc_path) = Self::get_rc_path() else {
            return RcConfig::default();
        };
        match Self::load_from(&rc_path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{err}; using defaults");
                RcConfig::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<RcConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = RcConfig::default();
        Self::parse_config_content(&content, &mut config);
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse the content of an RC file
    pub fn parse_config_content(content: &str, config: &mut RcConfig) {
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }

            Self::parse_config_line(line, config);
        }
    }

    fn parse_config_line(line: &str, config: &mut RcConfig) {
        // Remove inline comments
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        // "set tabstop=8" and "tabstop=8" mean the same thing
        let setting = line.strip_prefix("set ").map_or(line, str::trim);

        match setting {
            "expandtab" => config.expand_tab = true,
            "noexpandtab" => config.expand_tab = false,
            "tones" => config.tones = true,
            "notones" => config.tones = false,
            _ => {
                if let Some((key, value)) = setting.split_once('=') {
                    Self::apply_setting(key.trim(), value.trim(), config);
                } else {
                    log::debug!("ignoring config line: {line}");
                }
            }
        }
    }

    fn apply_setting(key: &str, value: &str, config: &mut RcConfig) {
        match key {
            "tabstop" | "tab_stop" | "ts" => {
                if let Ok(tab_stop) = value.parse::<usize>() {
                    if (1..=16).contains(&tab_stop) {
                        config.tab_stop = tab_stop;
                    }
                }
            }
            "pagesize" | "page_size" => {
                if let Ok(page_size) = value.parse::<usize>() {
                    if page_size > 0 {
                        config.page_size = page_size;
                    }
                }
            }
            "expandtab" | "expand_tab" => {
                if let Some(flag) = parse_flag(value) {
                    config.expand_tab = flag;
                }
            }
            "rate" | "rate_wpm" => {
                if let Ok(rate) = value.parse::<u32>() {
                    if (80..=700).contains(&rate) {
                        config.rate_wpm = rate;
                    }
                }
            }
            "voice" => {
                if !value.is_empty() {
                    config.voice = value.to_string();
                }
            }
            "tones" => {
                if let Some(flag) = parse_flag(value) {
                    config.tones = flag;
                }
            }
            "fileformat" | "line_ending" => {
                if let Some(ending) = LineEnding::from_name(value) {
                    config.line_ending = Some(ending);
                }
            }
            "log_file" | "logfile" => {
                if !value.is_empty() {
                    config.log_file = Some(PathBuf::from(value));
                }
            }
            _ => log::debug!("unknown config setting: {key}"),
        }
    }

    /// Generate a sample RC file content
    pub fn generate_sample_rc() -> String {
        r#"# clack configuration file (.clackrc)
# Lines starting with # or " are comments

# Indentation: leading whitespace / tabstop = indent level
set tabstop=4
set noexpandtab

# Lines moved by PageUp / PageDown
set pagesize=20

# Speech
set rate=300            # words per minute
set voice=espeak        # speech program (say on macOS)
set tones               # play indentation and mode tones (or set notones)

# Always save with these line endings: unix, dos, or mac
set fileformat=unix

# Alternative key=value syntax:
# tab_stop=4
# log_file=/tmp/clack.log
"#
        .to_string()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_vim_style_config() {
        let mut config = RcConfig::default();
        let content = r#"
            set expandtab
            set tabstop=8
            set pagesize=40
            set notones
            set fileformat=dos
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert!(config.expand_tab);
        assert_eq!(config.tab_stop, 8);
        assert_eq!(config.page_size, 40);
        assert!(!config.tones);
        assert_eq!(config.line_ending, Some(LineEnding::Windows));
    }

    #[test]
    fn test_parse_key_value_config() {
        let mut config = RcConfig::default();
        let content = r#"
            tabstop=2
            expand_tab=yes
            rate=180
            voice=/usr/bin/say
            log_file=/tmp/clack-test.log
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert_eq!(config.tab_stop, 2);
        assert!(config.expand_tab);
        assert_eq!(config.rate_wpm, 180);
        assert_eq!(config.voice, "/usr/bin/say");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/clack-test.log")));
    }

    #[test]
    fn test_parse_mixed_config_with_comments() {
        let mut config = RcConfig::default();
        let content = r#"
            # This is a comment
            set tabstop=6          # Custom tab stop
            " This is also a comment
            # set expandtab        # This is commented out
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert_eq!(config.tab_stop, 6);
        assert!(!config.expand_tab);
    }

    #[test]
    fn test_invalid_values_ignored() {
        let mut config = RcConfig::default();
        let content = r#"
            set tabstop=0          # Invalid: too small
            set tabstop=20         # Invalid: too large
            tabstop=invalid        # Invalid: not a number
            pagesize=0
            rate=5
            tones=maybe
            line_ending=invalid
            unknown_setting=value
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert_eq!(config, RcConfig::default());
    }

    #[test]
    fn test_editor_config_from_rc() {
        let mut config = RcConfig::default();
        RcLoader::parse_config_content("set tabstop=2\nset pagesize=5", &mut config);

        let editor = config.editor_config();
        assert_eq!(editor.tab_width, 2);
        assert_eq!(editor.page_size, 5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "set rate=250").unwrap();

        let config = RcLoader::load_from(file.path()).unwrap();
        assert_eq!(config.rate_wpm, 250);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = RcLoader::load_from(&dir.path().join("missing"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_sample_rc_parses() {
        let mut config = RcConfig::default();
        RcLoader::parse_config_content(&RcLoader::generate_sample_rc(), &mut config);
        assert_eq!(config.tab_stop, 4);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.rate_wpm, 300);
        assert!(config.tones);
        assert_eq!(config.line_ending, Some(LineEnding::Unix));
    }
}
