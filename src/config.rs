use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::exec::Language;

/// Defaults loaded from config files and merged under CLI arguments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub notes_dir: Option<PathBuf>,
    pub lang: Option<Language>,
    pub tab_width: Option<u8>,
}

impl ConfigFlags {
    /// Merge, with `other` (the later source) winning per option.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            notes_dir: other.notes_dir.clone().or_else(|| self.notes_dir.clone()),
            lang: other.lang.or(self.lang),
            tab_width: other.tab_width.or(self.tab_width),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("linerun").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("linerun")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("linerun").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("linerun")
                .join("config");
        }
    }

    PathBuf::from(".linerunrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".linerunrc")
}

/// Default directory for saved buffers when no config or flag names one.
pub fn default_notes_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(".linerun").join("notes");
    }
    PathBuf::from("notes")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# linerun defaults (saved with --save)".to_string());
    if let Some(dir) = &flags.notes_dir {
        lines.push(format!("--notes-dir {}", dir.display()));
    }
    if let Some(lang) = flags.lang {
        lines.push(format!("--lang {}", lang.name()));
    }
    if let Some(width) = flags.tab_width {
        lines.push(format!("--tab-width {width}"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--notes-dir" {
            if let Some(next) = tokens.get(i + 1) {
                flags.notes_dir = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--notes-dir=") {
            flags.notes_dir = Some(PathBuf::from(value));
        } else if token == "--lang" {
            if let Some(next) = tokens.get(i + 1) {
                flags.lang = next.parse().ok();
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--lang=") {
            flags.lang = value.parse().ok();
        } else if token == "--tab-width" {
            if let Some(next) = tokens.get(i + 1) {
                flags.tab_width = next.parse().ok();
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--tab-width=") {
            flags.tab_width = value.parse().ok();
        }
        i += 1;
    }
    flags
}
