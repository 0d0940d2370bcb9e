use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use media_capture::{CameraPolicy, FacingMode};
use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE_NAME: &str = "guide.toml";
const APP_DIR_NAME: &str = "spring_ar_guide";

#[derive(Debug, Clone, PartialEq)]
pub struct GuideSettings {
    pub catalog_path: Option<PathBuf>,
    pub camera_facing: FacingMode,
    pub camera_policy: CameraPolicy,
    pub camera_latency_ms: u64,
    pub log_filter: String,
}

impl Default for GuideSettings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            camera_facing: FacingMode::Environment,
            camera_policy: CameraPolicy::Grant,
            camera_latency_ms: 400,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    catalog_path: Option<PathBuf>,
    camera_facing: Option<String>,
    camera_policy: Option<String>,
    camera_latency_ms: Option<u64>,
    log_filter: Option<String>,
}

impl GuideSettings {
    pub fn camera_latency(&self) -> Duration {
        Duration::from_millis(self.camera_latency_ms)
    }

    pub fn apply_toml(&mut self, raw: &str) -> anyhow::Result<()> {
        let file: SettingsFile = toml::from_str(raw).context("invalid settings toml")?;

        if let Some(path) = file.catalog_path {
            self.catalog_path = Some(path);
        }
        if let Some(v) = file.camera_facing {
            self.camera_facing = parse_facing(&v)?;
        }
        if let Some(v) = file.camera_policy {
            self.camera_policy = v.parse::<CameraPolicy>().map_err(anyhow::Error::msg)?;
        }
        if let Some(v) = file.camera_latency_ms {
            self.camera_latency_ms = v;
        }
        if let Some(v) = file.log_filter {
            self.log_filter = v;
        }
        Ok(())
    }

    /// Applies `APP__*` overrides. Unparseable values are logged and skipped.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("APP__CATALOG_PATH") {
            self.catalog_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("APP__CAMERA_FACING") {
            match parse_facing(&v) {
                Ok(facing) => self.camera_facing = facing,
                Err(err) => warn!("settings: ignoring APP__CAMERA_FACING: {err}"),
            }
        }
        if let Some(v) = lookup("APP__CAMERA_POLICY") {
            match v.parse::<CameraPolicy>() {
                Ok(policy) => self.camera_policy = policy,
                Err(err) => warn!("settings: ignoring APP__CAMERA_POLICY: {err}"),
            }
        }
        if let Some(v) = lookup("APP__CAMERA_LATENCY_MS") {
            match v.parse::<u64>() {
                Ok(parsed) => self.camera_latency_ms = parsed,
                Err(err) => warn!("settings: ignoring APP__CAMERA_LATENCY_MS: {err}"),
            }
        }
        if let Some(v) = lookup("APP__LOG_FILTER") {
            self.log_filter = v;
        }
    }
}

/// `./guide.toml`, then the per-user config directory.
pub fn settings_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SETTINGS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME));
    }
    paths
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<GuideSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    let mut settings = GuideSettings::default();
    settings
        .apply_toml(&raw)
        .with_context(|| format!("failed to load settings from '{}'", path.display()))?;
    Ok(settings)
}

/// Defaults, then the first settings file found (or `explicit`), then the
/// environment.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<GuideSettings> {
    let mut settings = match explicit {
        Some(path) => load_settings_from(path)?,
        None => match settings_search_paths().into_iter().find(|path| path.is_file()) {
            Some(path) => load_settings_from(&path)?,
            None => GuideSettings::default(),
        },
    };
    settings.apply_env(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()));
    Ok(settings)
}

fn parse_facing(value: &str) -> anyhow::Result<FacingMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "environment" | "rear" | "back" => Ok(FacingMode::Environment),
        "user" | "front" => Ok(FacingMode::User),
        other => anyhow::bail!("unknown camera facing '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env, fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn defaults_use_the_rear_camera() {
        let settings = GuideSettings::default();
        assert_eq!(settings.camera_facing, FacingMode::Environment);
        assert_eq!(settings.camera_policy, CameraPolicy::Grant);
        assert_eq!(settings.log_filter, "info");
        assert!(settings.catalog_path.is_none());
    }

    #[test]
    fn toml_values_override_defaults() {
        let mut settings = GuideSettings::default();
        settings
            .apply_toml(
                r#"
                catalog_path = "data/springs.json"
                camera_facing = "front"
                camera_policy = "deny"
                camera_latency_ms = 0
                "#,
            )
            .expect("apply toml");

        assert_eq!(
            settings.catalog_path,
            Some(PathBuf::from("data/springs.json"))
        );
        assert_eq!(settings.camera_facing, FacingMode::User);
        assert_eq!(settings.camera_policy, CameraPolicy::Deny);
        assert_eq!(settings.camera_latency(), Duration::ZERO);
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn invalid_toml_values_are_errors() {
        let mut settings = GuideSettings::default();
        let err = settings
            .apply_toml(r#"camera_facing = "sideways""#)
            .expect_err("bad facing");
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn env_overrides_win_and_bad_values_are_skipped() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("APP__CAMERA_POLICY", "fail"),
            ("APP__CAMERA_LATENCY_MS", "not-a-number"),
            ("APP__LOG_FILTER", "guide_core=debug"),
        ]);
        let mut settings = GuideSettings::default();
        settings.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.camera_policy, CameraPolicy::Fail);
        assert_eq!(settings.camera_latency_ms, 400);
        assert_eq!(settings.log_filter, "guide_core=debug");
    }

    #[test]
    fn loads_an_explicit_settings_file() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let temp_root = env::temp_dir().join(format!("spring_ar_guide_settings_{suffix}"));
        fs::create_dir_all(&temp_root).expect("temp root");
        let path = temp_root.join(SETTINGS_FILE_NAME);
        fs::write(&path, "camera_policy = \"deny\"\n").expect("write settings");

        let settings = load_settings_from(&path).expect("load");
        assert_eq!(settings.camera_policy, CameraPolicy::Deny);

        fs::remove_dir_all(temp_root).expect("cleanup");
    }

    #[test]
    fn missing_explicit_file_is_reported() {
        let path = env::temp_dir().join("spring_ar_guide_missing_settings.toml");
        let err = load_settings_from(&path).expect_err("missing");
        assert!(err.to_string().contains("failed to read settings file"));
    }
}
