//! JSON schema of the build configuration file.

/// JSON Schema for the YAML build configuration.
pub const BUILD_CONFIG_SCHEMA: &str = r##"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "upmanifest build configuration",
  "type": "object",
  "additionalProperties": false,
  "properties": {
    "output_dir": { "type": "string" },
    "config_name": { "type": "string", "minLength": 1 },
    "base_uri": { "type": "string" },
    "base_path": { "type": "string" },
    "project": {
      "type": "object",
      "additionalProperties": false,
      "properties": {
        "base_dir": { "type": "string" },
        "artifact": { "$ref": "#/definitions/artifact" },
        "dependencies": {
          "type": "array",
          "items": { "$ref": "#/definitions/artifact" }
        }
      }
    },
    "dependency_sets": {
      "type": "array",
      "items": {
        "type": "object",
        "additionalProperties": false,
        "properties": {
          "includes": { "$ref": "#/definitions/patterns" },
          "excludes": { "$ref": "#/definitions/patterns" },
          "output_directory": { "type": "string" },
          "path": { "type": "string" },
          "classpath": { "type": "boolean" },
          "modulepath": { "type": "boolean" },
          "ignore_boot_conflict": { "type": "boolean" },
          "os": { "$ref": "#/definitions/os" },
          "comment": { "type": "string" }
        }
      }
    },
    "files": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["source"],
        "additionalProperties": false,
        "properties": {
          "source": { "type": "string", "minLength": 1 },
          "output_directory": { "type": "string" },
          "path": { "type": "string" },
          "classpath": { "type": "boolean" },
          "modulepath": { "type": "boolean" },
          "ignore_boot_conflict": { "type": "boolean" },
          "os": { "$ref": "#/definitions/os" },
          "comment": { "type": "string" }
        }
      }
    },
    "file_sets": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["directory"],
        "additionalProperties": false,
        "properties": {
          "directory": { "type": "string", "minLength": 1 },
          "output_directory": { "type": "string" },
          "path": { "type": "string" },
          "includes": { "$ref": "#/definitions/patterns" },
          "excludes": { "$ref": "#/definitions/patterns" },
          "use_default_excludes": { "type": "boolean" },
          "classpath": { "type": "boolean" },
          "modulepath": { "type": "boolean" },
          "ignore_boot_conflict": { "type": "boolean" },
          "os": { "$ref": "#/definitions/os" },
          "comment": { "type": "string" }
        }
      }
    },
    "properties": { "$ref": "#/definitions/string_map" },
    "dynamic_properties": { "$ref": "#/definitions/string_map" },
    "update_handler": { "type": "string", "minLength": 1 },
    "launcher": { "type": "string", "minLength": 1 }
  },
  "definitions": {
    "os": { "type": "string", "enum": ["win", "mac", "linux", "other"] },
    "patterns": { "type": "array", "items": { "type": "string" } },
    "string_map": {
      "type": "object",
      "additionalProperties": { "type": "string" }
    },
    "artifact": {
      "type": "object",
      "required": ["group_id", "artifact_id"],
      "additionalProperties": false,
      "properties": {
        "group_id": { "type": "string", "minLength": 1 },
        "artifact_id": { "type": "string", "minLength": 1 },
        "file": { "type": "string" }
      }
    }
  }
}"##;

/// Get the build configuration schema as a parsed JSON value.
pub fn build_config_schema() -> serde_json::Value {
    serde_json::from_str(BUILD_CONFIG_SCHEMA).expect("Invalid build configuration schema")
}
