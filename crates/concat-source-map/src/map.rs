//! Serialized Source Map v3 document

use serde::{Deserialize, Serialize};

use crate::consumer::SourceMapConsumer;
use crate::error::SourceMapError;

/// A Source Map v3 document
///
/// This is the form in which maps are read from adjacent `.map` files and
/// written next to the concatenated output. The `mappings` field stays
/// encoded; use [`SourceMapConsumer`] to query it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    /// Version (always 3)
    pub version: u8,

    /// Name of the generated file this map describes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Prefix joined onto every entry of `sources`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,

    /// Original source paths, relative to the map's own location
    #[serde(default)]
    pub sources: Vec<String>,

    /// Embedded source text, parallel to `sources`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,

    /// Symbol names referenced by five-field segments
    #[serde(default)]
    pub names: Vec<String>,

    /// VLQ encoded mappings
    #[serde(default)]
    pub mappings: String,
}

impl SourceMap {
    /// Parse and validate a map from JSON.
    ///
    /// Besides the JSON shape, this checks the version and decodes the
    /// `mappings` once, so a map accepted here can always be consumed.
    pub fn from_json(json: &str) -> Result<Self, SourceMapError> {
        let map: SourceMap = serde_json::from_str(json)?;
        if map.version != 3 {
            return Err(SourceMapError::UnsupportedVersion(map.version));
        }
        SourceMapConsumer::new(&map)?;
        Ok(map)
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String, SourceMapError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_map() {
        let map = SourceMap::from_json(r#"{"version":3,"sources":["a.js"],"mappings":"AAAA"}"#)
            .unwrap();
        assert_eq!(map.version, 3);
        assert_eq!(map.sources, vec!["a.js".to_string()]);
        assert!(map.file.is_none());
        assert!(map.names.is_empty());
    }

    #[test]
    fn test_camel_case_fields() {
        let map = SourceMap::from_json(
            r#"{"version":3,"sourceRoot":"src/","sources":["a.js"],"sourcesContent":["x"],"names":[],"mappings":""}"#,
        )
        .unwrap();
        assert_eq!(map.source_root.as_deref(), Some("src/"));
        assert_eq!(map.sources_content, Some(vec![Some("x".to_string())]));

        let json = map.to_json().unwrap();
        assert!(json.contains("\"sourceRoot\":\"src/\""));
        assert!(json.contains("\"sourcesContent\""));
    }

    #[test]
    fn test_rejects_other_versions() {
        let err = SourceMap::from_json(r#"{"version":2,"sources":[],"mappings":""}"#).unwrap_err();
        assert!(matches!(err, SourceMapError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_rejects_broken_json() {
        let err = SourceMap::from_json("{not json").unwrap_err();
        assert!(matches!(err, SourceMapError::Json(_)));
    }

    #[test]
    fn test_rejects_undecodable_mappings() {
        let err =
            SourceMap::from_json(r#"{"version":3,"sources":["a.js"],"mappings":"A!AA"}"#).unwrap_err();
        assert!(matches!(err, SourceMapError::InvalidSegment { .. }));
    }

    #[test]
    fn test_to_json_omits_absent_fields() {
        let map = SourceMap {
            version: 3,
            file: Some("out.js".to_string()),
            source_root: None,
            sources: vec!["a.js".to_string()],
            sources_content: None,
            names: vec![],
            mappings: "AAAA".to_string(),
        };
        assert_eq!(
            map.to_json().unwrap(),
            r#"{"version":3,"file":"out.js","sources":["a.js"],"names":[],"mappings":"AAAA"}"#
        );
    }
}
