//! MBKM portal presets.
//!
//! The route table, landing pages and navigation of the MBKM portal as
//! deployed. Each role owns one dashboard tree:
//!
//! | Role               | Dashboard                |
//! |--------------------|--------------------------|
//! | `mahasiswa`        | `/dashboard`             |
//! | `dosen_pembimbing` | `/dashboard-dosen`       |
//! | `koor_mbkm`        | `/dashboard-koordinator` |
//! | `admin`            | `/dashboard-admin`       |

use crate::http::security::config::GateConfig;
use crate::http::security::credential::CredentialConfig;
use crate::http::security::navigation::{NavGroup, NavLink, NavigationModel};
use crate::http::security::role::Role;

pub const PUBLIC_ROUTES: [&str; 3] = ["/", "/sign-in", "/sign-up"];

pub const UNAUTHORIZED_PAGE: &str = "/unauthorized";

/// Dashboard root of a role.
pub fn dashboard(role: Role) -> &'static str {
    match role {
        Role::Mahasiswa => "/dashboard",
        Role::DosenPembimbing => "/dashboard-dosen",
        Role::KoorMbkm => "/dashboard-koordinator",
        Role::Admin => "/dashboard-admin",
    }
}

/// Gate configuration of the portal. The secret is read from
/// `ACCESS_GATE_SECRET`.
pub fn gate_config() -> GateConfig {
    gate_config_with(CredentialConfig::default())
}

/// Gate configuration of the portal with a custom credential setup.
pub fn gate_config_with(credential: CredentialConfig) -> GateConfig {
    let mut config = GateConfig::new()
        .public_routes(&PUBLIC_ROUTES)
        .authenticated_landing(dashboard(Role::Mahasiswa))
        .unauthenticated_landing("/")
        .unauthorized_page(UNAUTHORIZED_PAGE)
        .guarded_path(UNAUTHORIZED_PAGE)
        .credential(credential);

    for role in Role::ALL {
        let root = dashboard(role);
        config = config
            .role_routes(role.as_str(), &[root])
            .role_landing(role.as_str(), root)
            .guarded_path(root);
    }

    config
}

/// Sidebar navigation of the portal.
pub fn navigation() -> NavigationModel {
    let student = Role::Mahasiswa.as_str();
    let lecturer = Role::DosenPembimbing.as_str();
    let coordinator = Role::KoorMbkm.as_str();
    let admin = Role::Admin.as_str();

    NavigationModel::new(vec![
        NavGroup::new("mahasiswa", "Mahasiswa")
            .entry(NavLink::new("Dashboard", "/dashboard").icon("layout-dashboard").role(student))
            .entry(
                NavLink::menu("Program MBKM")
                    .icon("briefcase")
                    .role(student)
                    .child(NavLink::new("Daftar Program", "/dashboard/program"))
                    .child(NavLink::new("Pendaftaran Saya", "/dashboard/pendaftaran")),
            )
            .entry(NavLink::new("Logbook", "/dashboard/logbook").icon("notebook").role(student))
            .entry(NavLink::new("Laporan Akhir", "/dashboard/laporan").icon("file-text").role(student))
            .entry(NavLink::new("Dokumen", "/dashboard/dokumen").icon("folder").role(student))
            .entry(NavLink::new("Konversi Nilai", "/dashboard/nilai").icon("award").role(student)),
        NavGroup::new("dosen", "Dosen Pembimbing")
            .entry(NavLink::new("Dashboard", "/dashboard-dosen").icon("layout-dashboard").role(lecturer))
            .entry(
                NavLink::new("Mahasiswa Bimbingan", "/dashboard-dosen/mahasiswa")
                    .icon("users")
                    .role(lecturer),
            )
            .entry(NavLink::new("Logbook", "/dashboard-dosen/logbook").icon("notebook").role(lecturer))
            .entry(NavLink::new("Penilaian", "/dashboard-dosen/penilaian").icon("award").role(lecturer)),
        NavGroup::new("koordinator", "Koordinator MBKM")
            .entry(
                NavLink::new("Dashboard", "/dashboard-koordinator")
                    .icon("layout-dashboard")
                    .role(coordinator),
            )
            .entry(
                NavLink::new("Program", "/dashboard-koordinator/program")
                    .icon("briefcase")
                    .role(coordinator)
                    .child(NavLink::new("Buat Program", "/dashboard-koordinator/program/create")),
            )
            .entry(
                NavLink::new("Pendaftar", "/dashboard-koordinator/pendaftar")
                    .icon("user-check")
                    .role(coordinator),
            )
            .entry(
                NavLink::new("Laporan Mahasiswa", "/dashboard-koordinator/laporan")
                    .icon("file-text")
                    .role(coordinator),
            ),
        NavGroup::new("admin", "Administrator")
            .entry(NavLink::new("Dashboard", "/dashboard-admin").icon("layout-dashboard").role(admin))
            .entry(NavLink::new("Pengguna", "/dashboard-admin/users").icon("users").role(admin))
            .entry(NavLink::new("Mitra", "/dashboard-admin/mitra").icon("building").role(admin))
            .separator()
            .entry(
                NavLink::new("Nilai Konversi", "/dashboard-admin/nilai-konversi")
                    .icon("award")
                    .role(admin),
            ),
        NavGroup::new("akun", "Akun").entry(NavLink::new("Keluar", "/sign-out").icon("log-out")),
    ])
}
