use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, trace};

pub const MANIFEST_FILE: &str = "package.json";

/// Dependency names that mark a package as part of the Vue ecosystem.
pub const VUE_SIGNATURES: &[&str] = &[
    "vue",
    "@vue/cli-service",
    "@vitejs/plugin-vue",
    "vite",
    "nuxt",
    "nuxt3",
    "vitepress",
    "pinia",
    "vue-router",
];

const DEPENDENCY_SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

/// Decides whether a directory is a project of interest by reading the
/// manifest at its top level.
#[derive(Debug, Clone, Copy)]
pub struct ProjectDetector {
    signatures: &'static [&'static str],
}

impl ProjectDetector {
    pub fn new(signatures: &'static [&'static str]) -> Self {
        Self { signatures }
    }

    /// True when `dir/package.json` exists, parses, and declares a dependency
    /// from the signature set. Any failure along the way is a non-match.
    pub fn is_project(&self, dir: &Path) -> bool {
        let manifest = dir.join(MANIFEST_FILE);
        if !manifest.is_file() {
            return false;
        }

        match fs::read_to_string(&manifest) {
            Ok(contents) => {
                let matched = self.manifest_matches(&contents);
                trace!(manifest = %manifest.display(), matched, "checked manifest");
                matched
            }
            Err(err) => {
                debug!("Skipping {}: {}", manifest.display(), err);
                false
            }
        }
    }

    pub fn manifest_matches(&self, contents: &str) -> bool {
        let document: Value = match serde_json::from_str(contents) {
            Ok(document) => document,
            Err(err) => {
                debug!("Unparsable manifest: {}", err);
                return false;
            }
        };
        let Some(object) = document.as_object() else {
            return false;
        };

        let mut names = Vec::new();
        for section in DEPENDENCY_SECTIONS {
            match object.get(section) {
                Some(Value::Object(deps)) => names.extend(deps.keys()),
                Some(value) if is_blank(value) => {}
                None => {}
                // a populated section that is not an object makes the whole manifest unusable
                Some(_) => return false,
            }
        }

        names.iter().any(|name| {
            let name = name.to_lowercase();
            self.signatures.iter().any(|signature| *signature == name)
        })
    }
}

impl Default for ProjectDetector {
    fn default() -> Self {
        ProjectDetector::new(VUE_SIGNATURES)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
