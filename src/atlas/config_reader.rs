use log::debug;
use snafu::prelude::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

use crate::atlas::*;

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    #[serde(rename = "dataPath")]
    pub data_path: String,
    #[serde(rename = "primaryCountry")]
    pub primary_country: Option<String>,
    #[serde(rename = "compareEnabled")]
    pub compare_enabled: Option<bool>,
    #[serde(rename = "secondaryCountry")]
    pub secondary_country: Option<String>,
    #[serde(rename = "sumTolerance")]
    pub sum_tolerance: Option<f64>,
    pub output: Option<String>,
}

/// Reads a configuration file. Relative paths in it are resolved against its directory.
pub fn read_config(path: &str) -> AtlasResult<AtlasConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let mut config: AtlasConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    let root_p = Path::new(path).parent().context(MissingParentDirSnafu {})?;

    config.data_path = resolve_path(root_p, config.data_path.as_str());
    config.output = config.output.map(|o| {
        if o.is_empty() || o == "stdout" {
            o
        } else {
            resolve_path(root_p, o.as_str())
        }
    });
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn resolve_path(root_p: &Path, path: &str) -> String {
    let p = Path::new(path);
    if p.is_absolute() {
        path.to_string()
    } else {
        let joined: PathBuf = root_p.join(p);
        joined.display().to_string()
    }
}

pub fn read_reference(path: &str) -> AtlasResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_follow_the_config() {
        let root_p = Path::new("/srv/atlas");
        assert_eq!(resolve_path(root_p, "data.csv"), "/srv/atlas/data.csv");
        assert_eq!(resolve_path(root_p, "/tmp/data.csv"), "/tmp/data.csv");
        assert_eq!(resolve_path(Path::new(""), "data.csv"), "data.csv");
    }

    #[test]
    fn reads_sample_config() {
        let path = format!("{}/tests/data/sample_config.json", env!("CARGO_MANIFEST_DIR"));
        let config = read_config(&path).unwrap();
        assert!(config.data_path.ends_with("tests/data/countries_sample.csv"));
        assert_eq!(config.compare_enabled, Some(true));
        assert_eq!(config.secondary_country.as_deref(), Some("Brazil"));
        assert_eq!(config.output, None);
    }

    #[test]
    fn config_requires_data_path() {
        let err = serde_json::from_str::<AtlasConfig>(r#"{"primaryCountry": "Japan"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn missing_config() {
        let err = read_config("/nonexistent/atlas.json").unwrap_err();
        assert!(matches!(err, AtlasError::OpeningJson { .. }));
        assert!(!err.is_data_load());
    }
}
