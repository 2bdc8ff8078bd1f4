//! File adapters around the analysis core.
//!
//! - Route source: `;`-delimited CSV with a header row and the columns
//!   `timestamp;latitude;longitude` (by position, header names are ignored)
//! - Config source: JSON or YAML mapping with camelCase [`AnalysisConfig`]
//!   fields, the format picked from the file extension
//! - Result sink: pretty-printed JSON of an [`AnalysisResult`]
//!
//! Values are parsed but not range-checked; that is left to the caller.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{info, warn};

use crate::error::{AnalysisError, Result};
use crate::{AnalysisConfig, AnalysisResult, Waypoint};

/// Field delimiter of waypoint files.
pub const WAYPOINT_DELIMITER: u8 = b';';

/// Parse waypoints from CSV data.
///
/// Timestamps may be written as floats (`1.7E12`) and are truncated to whole
/// milliseconds.
pub fn read_route<R: Read>(reader: R) -> std::result::Result<Vec<Waypoint>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(WAYPOINT_DELIMITER)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<(f64, f64, f64)>()
        .map(|record| {
            let (timestamp, latitude, longitude) = record?;
            Ok(Waypoint::new(timestamp as i64, latitude, longitude))
        })
        .collect()
}

/// Load a route from a waypoint CSV file.
pub fn load_route_csv(path: impl AsRef<Path>) -> Result<Vec<Waypoint>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let route = read_route(BufReader::new(file)).map_err(|source| AnalysisError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    if route.is_empty() {
        warn!("[IO] No waypoints in {}", path.display());
    } else {
        info!("[IO] Loaded {} waypoints from {}", route.len(), path.display());
    }

    Ok(route)
}

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Format implied by a file name: `.yml` and `.yaml` are YAML, anything
    /// else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Parse an analysis configuration in the given format.
pub fn read_config<R: Read>(reader: R, format: ConfigFormat) -> Result<AnalysisConfig> {
    let parsed: std::result::Result<AnalysisConfig, String> = match format {
        ConfigFormat::Json => serde_json::from_reader(reader).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::from_reader(reader).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| AnalysisError::Config { message })
}

/// Load an analysis configuration from a JSON or YAML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path);
    let file = File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = read_config(BufReader::new(file), format).map_err(|e| match e {
        AnalysisError::Config { message } => AnalysisError::Config {
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    })?;

    info!(
        "[IO] Loaded {:?} configuration from {}",
        format,
        path.display()
    );
    Ok(config)
}

/// Serialize a result as pretty-printed JSON.
pub fn result_to_json(result: &AnalysisResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write a result as pretty-printed JSON to a file, replacing it if present.
pub fn write_result(path: impl AsRef<Path>, result: &AnalysisResult) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    info!("[IO] Results saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_route() {
        let data = "timestamp;latitude;longitude\n\
                    1.0E12;45.0703;7.6869\n\
                    1000000001000;45.0710;7.6870\n";
        let route = read_route(data.as_bytes()).unwrap();
        assert_eq!(
            route,
            vec![
                Waypoint::new(1_000_000_000_000, 45.0703, 7.6869),
                Waypoint::new(1_000_000_001_000, 45.0710, 7.6870),
            ]
        );
    }

    #[test]
    fn test_read_route_truncates_fractional_timestamp() {
        let data = "t;lat;lon\n1500.9;0;0\n";
        let route = read_route(data.as_bytes()).unwrap();
        assert_eq!(route[0].timestamp, 1500);
    }

    #[test]
    fn test_read_route_header_only() {
        let route = read_route("timestamp;latitude;longitude\n".as_bytes()).unwrap();
        assert!(route.is_empty());
    }

    #[test]
    fn test_read_route_rejects_non_numeric() {
        let data = "timestamp;latitude;longitude\nnow;45.0;7.0\n";
        assert!(read_route(data.as_bytes()).is_err());
    }

    #[test]
    fn test_read_config_optional_radius() {
        let json = r#"{
            "earthRadiusKm": 6371.0,
            "geofenceCenterLatitude": 45.04,
            "geofenceCenterLongitude": 7.42,
            "geofenceRadiusKm": 50.0,
            "mostFrequentedAreaRadiusKm": 0.5
        }"#;
        let config = read_config(json.as_bytes(), ConfigFormat::Json).unwrap();
        assert_eq!(config.most_frequented_area_radius_km, Some(0.5));
    }

    #[test]
    fn test_read_config_missing_field() {
        let json = r#"{ "earthRadiusKm": 6371.0 }"#;
        let err = read_config(json.as_bytes(), ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, AnalysisError::Config { .. }));
        assert!(err.to_string().contains("geofenceCenterLatitude"));
    }

    #[test]
    fn test_read_config_non_numeric() {
        let json = r#"{
            "earthRadiusKm": "big",
            "geofenceCenterLatitude": 0.0,
            "geofenceCenterLongitude": 0.0,
            "geofenceRadiusKm": 1.0
        }"#;
        assert!(matches!(
            read_config(json.as_bytes(), ConfigFormat::Json),
            Err(AnalysisError::Config { .. })
        ));
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("custom-parameters.yml")),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("conf/params.YAML")),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("custom-parameters.json")),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("parameters")),
            ConfigFormat::Json
        );
    }

    #[test]
    fn test_read_config_yaml() {
        let yaml = "earthRadiusKm: 6371.0\n\
                    geofenceCenterLatitude: 45.04\n\
                    geofenceCenterLongitude: 7.42\n\
                    geofenceRadiusKm: 50.0\n";
        let config = read_config(yaml.as_bytes(), ConfigFormat::Yaml).unwrap();
        assert_eq!(config.earth_radius_km, 6371.0);
        assert_eq!(config.geofence_center_latitude, 45.04);
        assert_eq!(config.geofence_center_longitude, 7.42);
        assert_eq!(config.geofence_radius_km, 50.0);
        assert_eq!(config.most_frequented_area_radius_km, None);
    }

    #[test]
    fn test_read_config_yaml_optional_radius_and_method() {
        let yaml = "earthRadiusKm: 6371\n\
                    geofenceCenterLatitude: 45.04\n\
                    geofenceCenterLongitude: 7.42\n\
                    geofenceRadiusKm: 50\n\
                    mostFrequentedAreaRadiusKm: 0.5\n\
                    clusteringMethod: indexed\n";
        let config = read_config(yaml.as_bytes(), ConfigFormat::Yaml).unwrap();
        assert_eq!(config.earth_radius_km, 6371.0);
        assert_eq!(config.most_frequented_area_radius_km, Some(0.5));
        assert_eq!(
            config.clustering_method,
            crate::ClusteringMethod::Indexed
        );
    }

    #[test]
    fn test_read_config_yaml_missing_field() {
        let err = read_config("earthRadiusKm: 6371.0\n".as_bytes(), ConfigFormat::Yaml)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Config { .. }));
        assert!(err.to_string().contains("geofenceCenterLatitude"));
    }

    #[test]
    fn test_json_reader_rejects_yaml() {
        let yaml = "earthRadiusKm: 6371.0\n";
        assert!(matches!(
            read_config(yaml.as_bytes(), ConfigFormat::Json),
            Err(AnalysisError::Config { .. })
        ));
    }
}
