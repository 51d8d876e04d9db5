//! Portal Settings Module
//!
//! YAML schema for the portal catalog and its loader.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PortalError, Result};

// == Defaults ==
pub const DEFAULT_THEME_COLOR: &str = "#4a6fa5";
pub const DEFAULT_COMPANY_NAME: &str = "Enterprise";
pub const DEFAULT_LOGO_URL: &str = "assets/images/logo.svg";
pub const DEFAULT_TITLE: &str = "AI Portal";
pub const DEFAULT_APP_ICON: &str = "fa-solid fa-cube";
pub const DEFAULT_DEPARTMENT_ICON: &str = "fa-solid fa-folder";
pub const DEFAULT_STORE_TITLE: &str = "AI App Store";
pub const DEFAULT_STORE_ICON: &str = "fa-solid fa-store";
pub const DEFAULT_BUSINESS_AREA: &str = "All";
pub const DEFAULT_STORE_DESCRIPTION: &str = "Discover and install the latest AI applications";

/// Whole portal configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortalSettings {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company: Option<CompanyInfo>,
    #[serde(default)]
    pub user: UserInfo,
    #[serde(default)]
    pub departments: Option<Vec<Department>>,
    #[serde(default)]
    pub app_store: Option<AppStore>,
    /// Colour per department name; the `default` key is the fallback
    #[serde(default)]
    pub department_colors: HashMap<String, String>,
    /// Colour per application name, overriding the department colour
    #[serde(default)]
    pub app_colors: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default = "default_company_name")]
    pub name: String,
    #[serde(default = "default_logo_url")]
    pub logo_url: String,
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    #[serde(default)]
    pub copyright_year: Option<String>,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: default_company_name(),
            logo_url: default_logo_url(),
            theme_color: default_theme_color(),
            copyright_year: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default = "default_user")]
    pub name: String,
    #[serde(default = "default_user")]
    pub role: String,
    #[serde(default)]
    pub avatar_url: String,
}

impl Default for UserInfo {
    fn default() -> Self {
        Self {
            name: default_user(),
            role: default_user(),
            avatar_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub apps: Vec<AppLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppStore {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub apps: Vec<AppLink>,
}

/// One tool in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppLink {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// URL, `mailto:` link or bare email address
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub contact_url: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Badge shown on the card, `All` when unset
    #[serde(default)]
    pub business_area: Option<String>,
}

fn default_company_name() -> String {
    DEFAULT_COMPANY_NAME.to_string()
}

fn default_logo_url() -> String {
    DEFAULT_LOGO_URL.to_string()
}

fn default_theme_color() -> String {
    DEFAULT_THEME_COLOR.to_string()
}

fn default_user() -> String {
    "User".to_string()
}

impl PortalSettings {
    /// Parses a YAML document. `origin` names the source in errors.
    pub fn from_yaml(yaml: &str, origin: &str) -> Result<Self> {
        let mut settings: PortalSettings =
            serde_yaml::from_str(yaml).map_err(|source| PortalError::Yaml {
                path: origin.to_string(),
                source,
            })?;
        settings.fill_required_sections(origin);
        Ok(settings)
    }

    /// Company and departments are required; substitute defaults when absent.
    fn fill_required_sections(&mut self, origin: &str) {
        let mut missing = Vec::new();
        if self.company.is_none() {
            missing.push("company");
            self.company = Some(CompanyInfo::default());
        }
        if self.departments.is_none() {
            missing.push("departments");
            self.departments = Some(Vec::new());
        }
        if !missing.is_empty() {
            warn!(
                config = origin,
                missing = %missing.join(", "),
                "Missing required configuration sections, using defaults"
            );
        }
    }

    pub fn company(&self) -> CompanyInfo {
        self.company.clone().unwrap_or_default()
    }

    pub fn departments(&self) -> &[Department] {
        self.departments.as_deref().unwrap_or(&[])
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

// == Loader ==
/// Reads and parses the portal configuration at `path`, logging how long the
/// load took.
pub fn load_settings(path: &Path) -> Result<PortalSettings> {
    let started = Instant::now();
    let origin = path.display().to_string();
    let yaml = fs::read_to_string(path).map_err(|source| PortalError::Io {
        path: origin.clone(),
        source,
    })?;

    let settings = PortalSettings::from_yaml(&yaml, &origin)?;
    info!(
        config = %origin,
        departments = settings.departments().len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Configuration loaded"
    );
    Ok(settings)
}
