//! Catalog View Builder
//!
//! Pure transformation from [`PortalSettings`] to the view data the pages
//! render: navigation links, department sections, and app cards.

use serde::Serialize;

use crate::portal::settings::{
    AppLink, PortalSettings, UserInfo, DEFAULT_APP_ICON, DEFAULT_BUSINESS_AREA, DEFAULT_DEPARTMENT_ICON,
    DEFAULT_STORE_DESCRIPTION, DEFAULT_STORE_ICON, DEFAULT_STORE_TITLE, DEFAULT_THEME_COLOR,
};

/// Section name under which app store entries are grouped.
pub const APP_STORE_SECTION: &str = "App Store";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub title: String,
    pub description: Option<String>,
    pub company: CompanyHeader,
    pub user: UserInfo,
    pub nav: Vec<NavLink>,
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyHeader {
    pub name: String,
    pub logo_url: String,
    pub theme_color: String,
    pub copyright_year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    /// Element id, `nav-<slug>-link`
    pub id: String,
    pub label: String,
    pub icon: String,
    /// In-page anchor, `#<slug>`
    pub href: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub slug: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    pub color: String,
    pub apps: Vec<AppCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppCard {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub icon_color: String,
    /// Present only when the configured URL is non-blank
    pub launch_url: Option<String>,
    pub contact_href: String,
    pub has_contact: bool,
    /// Neither a launch URL nor any contact is configured
    pub no_link: bool,
    pub business_area: String,
}

impl CatalogView {
    /// Finds a section by its slug.
    pub fn section(&self, slug: &str) -> Option<&SectionView> {
        self.sections.iter().find(|s| s.slug == slug)
    }
}

// == Build Catalog ==
/// Builds the complete catalog view. Departments keep their configured
/// order and the app store section, when configured, comes last.
pub fn build_catalog(settings: &PortalSettings) -> CatalogView {
    let company = settings.company();
    let palette = Palette::new(settings, &company.theme_color);

    let mut sections: Vec<SectionView> = settings
        .departments()
        .iter()
        .map(|dept| SectionView {
            slug: slugify(&dept.name),
            title: dept.name.clone(),
            icon: dept
                .icon
                .clone()
                .unwrap_or_else(|| DEFAULT_DEPARTMENT_ICON.to_string()),
            description: dept.description.clone(),
            color: palette.department(&dept.name).to_string(),
            apps: dept
                .apps
                .iter()
                .map(|app| build_card(app, &dept.name, &palette))
                .collect(),
        })
        .collect();

    if let Some(store) = &settings.app_store {
        sections.push(SectionView {
            slug: slugify(APP_STORE_SECTION),
            title: store
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_STORE_TITLE.to_string()),
            icon: store
                .icon
                .clone()
                .unwrap_or_else(|| DEFAULT_STORE_ICON.to_string()),
            description: store
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_STORE_DESCRIPTION.to_string()),
            color: palette.department(APP_STORE_SECTION).to_string(),
            apps: store
                .apps
                .iter()
                .map(|app| build_card(app, APP_STORE_SECTION, &palette))
                .collect(),
        });
    }

    let nav = sections
        .iter()
        .map(|section| NavLink {
            id: format!("nav-{}-link", section.slug),
            label: section.title.clone(),
            icon: section.icon.clone(),
            href: format!("#{}", section.slug),
            color: section.color.clone(),
        })
        .collect();

    CatalogView {
        title: settings.title().to_string(),
        description: settings.description.clone(),
        company: CompanyHeader {
            name: company.name,
            logo_url: company.logo_url,
            theme_color: company.theme_color,
            copyright_year: company.copyright_year,
        },
        user: settings.user.clone(),
        nav,
        sections,
    }
}

fn build_card(app: &AppLink, department: &str, palette: &Palette<'_>) -> AppCard {
    let launch_url = app
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string);
    let has_contact = has_contact_info(app);

    AppCard {
        name: app.name.clone(),
        description: app
            .description
            .clone()
            .unwrap_or_else(|| "No description available.".to_string()),
        icon: app
            .icon
            .clone()
            .unwrap_or_else(|| DEFAULT_APP_ICON.to_string()),
        icon_color: palette.app(&app.name, department).to_string(),
        no_link: launch_url.is_none() && !has_contact,
        launch_url,
        contact_href: contact_href(app),
        has_contact,
        business_area: app
            .business_area
            .clone()
            .unwrap_or_else(|| DEFAULT_BUSINESS_AREA.to_string()),
    }
}

// == Colours ==
/// Icon colour lookup: app override, then department, then the configured
/// default, then the company theme.
struct Palette<'a> {
    settings: &'a PortalSettings,
    fallback: &'a str,
}

impl<'a> Palette<'a> {
    fn new(settings: &'a PortalSettings, theme_color: &'a str) -> Self {
        let fallback = settings
            .department_colors
            .get("default")
            .map(String::as_str)
            .unwrap_or(if theme_color.is_empty() {
                DEFAULT_THEME_COLOR
            } else {
                theme_color
            });
        Self { settings, fallback }
    }

    fn department(&self, department: &str) -> &'a str {
        self.settings
            .department_colors
            .get(department)
            .map(String::as_str)
            .unwrap_or(self.fallback)
    }

    fn app(&self, app: &str, department: &str) -> &'a str {
        self.settings
            .app_colors
            .get(app)
            .map(String::as_str)
            .unwrap_or_else(|| self.department(department))
    }
}

// == Contact ==
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// True when any contact field is set.
pub fn has_contact_info(app: &AppLink) -> bool {
    non_blank(&app.contact).is_some()
        || non_blank(&app.contact_url).is_some()
        || non_blank(&app.contact_email).is_some()
        || non_blank(&app.email).is_some()
}

/// Link target for the contact button, `#` when nothing is configured.
///
/// The combined `contact` field wins: URLs and `mailto:` links are used as-is
/// and bare email addresses get a `mailto:` prefix.
pub fn contact_href(app: &AppLink) -> String {
    if let Some(contact) = non_blank(&app.contact) {
        if ["http://", "https://", "mailto:"]
            .iter()
            .any(|scheme| contact.starts_with(scheme))
        {
            return contact.to_string();
        }
        if looks_like_email(contact) {
            return format!("mailto:{}", contact);
        }
        return contact.to_string();
    }

    if let Some(url) = non_blank(&app.contact_url) {
        return url.to_string();
    }
    if let Some(email) = non_blank(&app.contact_email).or(non_blank(&app.email)) {
        return format!("mailto:{}", email);
    }
    "#".to_string()
}

fn looks_like_email(value: &str) -> bool {
    value
        .split('@')
        .nth(1)
        .map(|domain| domain.contains('.'))
        .unwrap_or(false)
}

/// Anchor id for a section title: lowercase, spaces become dashes.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
