use serde::{Deserialize, Serialize};

/// How the host installs the plugin bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationType {
    Local,
    Remote,
}

/// Plugin record the host stores when the plugin is installed for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub plugin_slug: String,
    pub description: String,
    pub long_description: String,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub icon: String,
    pub category: String,
    pub official: bool,
    pub author: String,
    pub compatibility: String,
    pub scope: String,
    pub bundle_method: String,
    pub bundle_location: String,
    pub is_local: bool,
    pub installation_type: InstallationType,
    pub permissions: Vec<String>,
}

/// Grid placement constraints for a module, in host layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleLayout {
    pub min_width: u32,
    pub min_height: u32,
    pub default_width: u32,
    pub default_height: u32,
}

/// A module the plugin contributes to host pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub priority: u32,
    pub layout: ModuleLayout,
    pub tags: Vec<String>,
}

/// Everything the host needs to register the plugin and its modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    pub plugin: PluginInfo,
    pub modules: Vec<ModuleInfo>,
}

impl PluginManifest {
    /// Manifest of the collection viewer plugin.
    pub fn collection_viewer() -> Self {
        let plugin = PluginInfo {
            name: "CollectionViewer".to_string(),
            plugin_slug: "CollectionViewer".to_string(),
            description: "View and browse your document collections".to_string(),
            long_description: "Fetches and displays the collections stored in your \
                instance, with loading, error and empty states and light/dark theming."
                .to_string(),
            version: "1.0.0".to_string(),
            kind: "frontend".to_string(),
            icon: "folder_open".to_string(),
            category: "Data Management".to_string(),
            official: false,
            author: "BrainDrive Team".to_string(),
            compatibility: "1.0.0".to_string(),
            scope: "CollectionViewer".to_string(),
            bundle_method: "webpack".to_string(),
            bundle_location: "dist/remoteEntry.js".to_string(),
            is_local: false,
            installation_type: InstallationType::Remote,
            permissions: vec!["api.access".to_string()],
        };

        let module = ModuleInfo {
            name: "CollectionViewer".to_string(),
            display_name: "Collection Viewer".to_string(),
            description: "View all your document collections with details".to_string(),
            icon: "folder_open".to_string(),
            category: "Data Management".to_string(),
            priority: 1,
            layout: ModuleLayout {
                min_width: 4,
                min_height: 4,
                default_width: 8,
                default_height: 6,
            },
            tags: ["collections", "viewer", "documents", "data"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        };

        Self {
            plugin,
            modules: vec![module],
        }
    }
}
