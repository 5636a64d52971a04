//! Role-filtered navigation.
//!
//! The navigation model is presentation data: filtering it hides links a role
//! has no business following, but it is not an access control. The gate is.
//!
//! # Example
//! ```rust
//! use access_gate_core::http::security::navigation::{NavEntry, NavGroup, NavLink, NavigationModel};
//!
//! let model = NavigationModel::new(vec![NavGroup::new("main", "Menu")
//!     .entry(NavLink::new("Dashboard", "/dashboard"))
//!     .entry(NavLink::new("Konversi Nilai", "/dashboard-admin/nilai-konversi").role("admin"))]);
//!
//! let student = model.visible_to(Some("mahasiswa"));
//! assert_eq!(student.links().count(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::http::security::route_table::RoleRouteTable;

/// A navigation link, possibly with nested links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Owning role; unset means every authenticated role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavEntry>,
}

impl NavLink {
    pub fn new(title: &str, href: &str) -> Self {
        Self {
            title: title.to_string(),
            href: Some(href.to_string()),
            icon: None,
            role: None,
            children: Vec::new(),
        }
    }

    /// A link without a target of its own, shown only through its children.
    pub fn menu(title: &str) -> Self {
        Self {
            href: None,
            ..Self::new(title, "")
        }
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    pub fn child(mut self, entry: impl Into<NavEntry>) -> Self {
        self.children.push(entry.into());
        self
    }

    fn owned_by(&self, role: &str) -> bool {
        self.role.as_deref().map_or(true, |owner| owner == role)
    }

    fn visible_to(&self, role: &str) -> Option<NavLink> {
        if !self.owned_by(role) {
            return None;
        }

        let children = filter_entries(&self.children, role);
        if self.href.is_none() && !children.iter().any(NavEntry::is_link) {
            return None;
        }

        Some(NavLink {
            children,
            ..self.clone()
        })
    }
}

/// An entry of a navigation group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavEntry {
    Link(NavLink),
    Separator,
}

impl NavEntry {
    pub fn is_link(&self) -> bool {
        matches!(self, NavEntry::Link(_))
    }
}

impl From<NavLink> for NavEntry {
    fn from(link: NavLink) -> Self {
        NavEntry::Link(link)
    }
}

/// Keep visible links and drop separators that would dangle at either end or
/// sit next to another separator.
fn filter_entries(entries: &[NavEntry], role: &str) -> Vec<NavEntry> {
    let mut visible = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry {
            NavEntry::Separator => {
                if visible.last().map_or(false, NavEntry::is_link) {
                    visible.push(NavEntry::Separator);
                }
            }
            NavEntry::Link(link) => {
                if let Some(link) = link.visible_to(role) {
                    visible.push(NavEntry::Link(link));
                }
            }
        }
    }

    if matches!(visible.last(), Some(NavEntry::Separator)) {
        visible.pop();
    }
    visible
}

/// A labelled group of navigation entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavGroup {
    pub key: String,
    pub label: String,
    pub entries: Vec<NavEntry>,
}

impl NavGroup {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, entry: impl Into<NavEntry>) -> Self {
        self.entries.push(entry.into());
        self
    }

    pub fn separator(mut self) -> Self {
        self.entries.push(NavEntry::Separator);
        self
    }
}

/// A link whose owning role cannot reach its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreachableLink {
    pub group: String,
    pub title: String,
    pub href: String,
    pub role: String,
}

/// Ordered navigation groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationModel {
    groups: Vec<NavGroup>,
}

impl NavigationModel {
    pub fn new(groups: Vec<NavGroup>) -> Self {
        Self { groups }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn groups(&self) -> &[NavGroup] {
        &self.groups
    }

    pub fn group(&self, key: &str) -> Option<&NavGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every link, depth first, in display order.
    pub fn links(&self) -> impl Iterator<Item = &NavLink> {
        let mut links = Vec::new();
        for group in &self.groups {
            collect_links(&group.entries, &mut links);
        }
        links.into_iter()
    }

    /// The part of the model `role` should see. Unauthenticated users
    /// (`None`) see nothing.
    pub fn visible_to(&self, role: Option<&str>) -> NavigationModel {
        let role = match role {
            Some(role) => role,
            None => return NavigationModel::default(),
        };

        let groups = self
            .groups
            .iter()
            .filter_map(|group| {
                let entries = filter_entries(&group.entries, role);
                entries.iter().any(NavEntry::is_link).then(|| NavGroup {
                    key: group.key.clone(),
                    label: group.label.clone(),
                    entries,
                })
            })
            .collect();

        NavigationModel { groups }
    }

    /// Links with an owning role that the route table would not let that role
    /// follow.
    pub fn unreachable_links(&self, table: &RoleRouteTable) -> Vec<UnreachableLink> {
        let mut unreachable = Vec::new();

        for group in &self.groups {
            let mut links = Vec::new();
            collect_links(&group.entries, &mut links);

            for link in links {
                if let (Some(role), Some(href)) = (&link.role, &link.href) {
                    if table.allows(role, href) != Ok(true) {
                        unreachable.push(UnreachableLink {
                            group: group.key.clone(),
                            title: link.title.clone(),
                            href: href.clone(),
                            role: role.clone(),
                        });
                    }
                }
            }
        }

        unreachable
    }
}

fn collect_links<'a>(entries: &'a [NavEntry], out: &mut Vec<&'a NavLink>) {
    for entry in entries {
        if let NavEntry::Link(link) = entry {
            out.push(link);
            collect_links(&link.children, out);
        }
    }
}
