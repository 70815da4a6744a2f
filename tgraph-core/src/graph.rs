//! Data model for the project graph emitted by `tuist graph --format json`.
//!
//! Decoding is lenient: every field has a default, unknown fields are
//! ignored and unknown dependency kinds are kept as
//! [`TargetDependency::Other`], so older and newer tool versions both decode.
//! `{}` is a valid, empty graph.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// The whole workspace graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Graph {
    /// Workspace name.
    pub name: String,
    /// Absolute path of the workspace root.
    pub path: String,
    /// Projects keyed by their absolute path.
    pub projects: BTreeMap<String, Project>,
}

impl Graph {
    /// Iterate every target together with the project that owns it.
    pub fn targets(&self) -> impl Iterator<Item = (&Project, &Target)> {
        self.projects
            .values()
            .flat_map(|project| project.targets.iter().map(move |target| (project, target)))
    }

    /// Every target with the given name, in project path order.
    pub fn targets_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (&'a Project, &'a Target)> + 'a {
        self.targets().filter(move |(_, target)| target.name == name)
    }

    /// Find the first target with the given name, searching projects in path order.
    pub fn find_target<'a>(&'a self, name: &'a str) -> Option<(&'a Project, &'a Target)> {
        self.targets_named(name).next()
    }

    pub fn target_count(&self) -> usize {
        self.projects.values().map(|p| p.targets.len()).sum()
    }

    /// Look up a project by its name (not its path key).
    pub fn project_named(&self, name: &str) -> Option<&Project> {
        self.projects.values().find(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// One Xcode project in the graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub path: String,
    /// Whether the project comes from an external dependency.
    pub is_external: bool,
    pub packages: Vec<Package>,
    pub targets: Vec<Target>,
    pub schemes: Vec<Scheme>,
}

impl Project {
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }
}

/// A Swift package referenced by a project.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Package {
    /// `remote` or `local`.
    pub kind: String,
    /// URL for remote packages, filesystem path for local ones.
    pub path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Target {
    pub name: String,
    /// Product type, e.g. `app`, `framework`, `unit_tests`.
    pub product: String,
    pub product_name: String,
    pub bundle_id: String,
    pub sources: Vec<String>,
    pub resources: Vec<String>,
    pub dependencies: Vec<TargetDependency>,
}

/// A scheme and the targets its test action runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scheme {
    pub name: String,
    pub test_action_targets: Vec<String>,
}

/// Something a target depends on.
///
/// Encoded externally tagged, e.g. `{"target": {"name": "Core"}}`. Tags this
/// enum does not know decode to [`TargetDependency::Other`] with the payload
/// kept verbatim, and encode back to the same shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "lowercase")]
pub enum TargetDependency {
    /// A target in the same project.
    Target { name: String },
    /// A target in another project.
    Project { target: String, path: String },
    Framework {
        path: String,
        #[serde(default)]
        status: String,
    },
    Xcframework {
        path: String,
        #[serde(default)]
        status: String,
    },
    Library {
        path: String,
        #[serde(default, rename = "publicHeaders")]
        public_headers: String,
        #[serde(default, rename = "swiftModuleMap")]
        swift_module_map: Option<String>,
    },
    /// A Swift package product.
    Package {
        product: String,
        #[serde(default, rename = "type")]
        kind: String,
    },
    Sdk {
        name: String,
        #[serde(default)]
        status: String,
    },
    Xctest {},
    /// A dependency kind introduced by a newer tool version.
    #[serde(skip)]
    Other {
        kind: String,
        value: serde_json::Value,
    },
}

/// Tags handled by the derived (non-`Other`) variants.
const KNOWN_KINDS: &[&str] = &[
    "target",
    "project",
    "framework",
    "xcframework",
    "library",
    "package",
    "sdk",
    "xctest",
];

impl<'de> Deserialize<'de> for TargetDependency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;

        if let Some(entry) = value.as_object().filter(|object| object.len() == 1) {
            if let Some((kind, payload)) = entry.iter().next() {
                if !KNOWN_KINDS.contains(&kind.as_str()) {
                    return Ok(Self::Other {
                        kind: kind.clone(),
                        value: payload.clone(),
                    });
                }
            }
        }

        TargetDependency::deserialize(value).map_err(D::Error::custom)
    }
}

impl Serialize for TargetDependency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Other { kind, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(kind, value)?;
                map.end()
            }
            known => TargetDependency::serialize(known, serializer),
        }
    }
}

impl TargetDependency {
    /// Short kind tag, matching the JSON key.
    pub fn kind(&self) -> &str {
        match self {
            Self::Target { .. } => "target",
            Self::Project { .. } => "project",
            Self::Framework { .. } => "framework",
            Self::Xcframework { .. } => "xcframework",
            Self::Library { .. } => "library",
            Self::Package { .. } => "package",
            Self::Sdk { .. } => "sdk",
            Self::Xctest {} => "xctest",
            Self::Other { kind, .. } => kind.as_str(),
        }
    }

    /// Human-readable name of the dependency.
    ///
    /// Unknown kinds use their `name`, `path` or `product` field when one is
    /// a string, and fall back to the kind tag.
    pub fn label(&self) -> String {
        match self {
            Self::Target { name } => name.clone(),
            Self::Project { target, path } => format!("{} ({})", target, path),
            Self::Framework { path, .. }
            | Self::Xcframework { path, .. }
            | Self::Library { path, .. } => path.clone(),
            Self::Package { product, .. } => product.clone(),
            Self::Sdk { name, .. } => name.clone(),
            Self::Xctest {} => "XCTest".to_string(),
            Self::Other { kind, value } => ["name", "path", "product"]
                .iter()
                .find_map(|field| value.get(*field).and_then(|v| v.as_str()))
                .unwrap_or(kind.as_str())
                .to_string(),
        }
    }
}
