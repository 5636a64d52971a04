//! Middleware tests.
//!
//! Tests for the access decision as seen over HTTP: redirects, pass-through
//! and the claims handed to handlers.


use actix_web::http::{header, StatusCode};
use actix_web::test;

use access_gate_core::http::security::Role;

use common::{
    cookie, create_test_app, create_test_app_with, expired_token, forged_token, portal_config,
    token_for,
};

fn location(resp: &actix_web::dev::ServiceResponse) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

// =============================================================================
// Role Route Tests
// =============================================================================

#[actix_web::test]
async fn test_student_reaches_own_dashboard_page() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/dashboard/laporan")
        .cookie(cookie(&token_for(Role::Mahasiswa)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("/dashboard/laporan"));
    assert!(body.contains("role=mahasiswa"));
    assert!(body.contains("nim=2010511001"));
}

#[actix_web::test]
async fn test_student_redirected_from_admin_dashboard() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/dashboard-admin/nilai-konversi")
        .cookie(cookie(&token_for(Role::Mahasiswa)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/unauthorized");
}

#[actix_web::test]
async fn test_coordinator_reaches_nested_page() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/dashboard-koordinator/program/create")
        .cookie(cookie(&token_for(Role::KoorMbkm)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("id_koordinator=K-01"));
}

#[actix_web::test]
async fn test_prefix_does_not_leak_into_sibling_dashboard() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/dashboard-dosen/penilaian")
        .cookie(cookie(&token_for(Role::Mahasiswa)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/unauthorized");
}

#[actix_web::test]
async fn test_dot_segments_cannot_escape_into_admin_scope() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/dashboard-admin/users/../../dashboard/x")
        .cookie(cookie(&token_for(Role::Mahasiswa)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/unauthorized");
}

#[actix_web::test]
async fn test_dot_segment_is_not_the_public_root() {
    let app = create_test_app().await;

    let req = test::TestRequest::get().uri("/dashboard/..").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn test_percent_encoded_admin_path_is_gated() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/%64ashboard-admin/users")
        .cookie(cookie(&token_for(Role::Mahasiswa)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/unauthorized");

    let req = test::TestRequest::get().uri("/dashboard%2Dadmin/users").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
}

/// Request targets whose raw text differs from the path they name.
const TRICKY_ADMIN_PATHS: [&str; 9] = [
    "/dashboard-admin/users/../../dashboard/x",
    "/dashboard/../dashboard-admin/users",
    "/dashboard-admin/./users",
    "/dashboard-admin/%2e%2e/dashboard",
    "/%64ashboard-admin/users",
    "/dashboard%2Dadmin/users",
    "/dashboard%2Fadmin",
    "//dashboard-admin/users",
    "/dashboard-admin//users",
];

#[actix_web::test]
async fn test_tricky_paths_never_reach_a_handler() {
    let app = create_test_app().await;

    for path in TRICKY_ADMIN_PATHS {
        let req = test::TestRequest::get()
            .uri(path)
            .cookie(cookie(&token_for(Role::Mahasiswa)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{}", path);
        assert_eq!(location(&resp), "/unauthorized", "{}", path);

        let req = test::TestRequest::get().uri(path).to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{}", path);
        assert_eq!(location(&resp), "/", "{}", path);
    }
}

#[actix_web::test]
async fn test_repeated_slashes_on_own_dashboard() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/dashboard//logbook")
        .cookie(cookie(&token_for(Role::Mahasiswa)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/dashboard//logbook").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn test_dashboard_refuses_other_role_even_if_routed() {
    // Route table granting students the admin tree on top of their own
    let config = portal_config().role_routes("mahasiswa", &["/dashboard-admin"]);
    let app = create_test_app_with(config).await;

    let req = test::TestRequest::get()
        .uri("/dashboard-admin/users")
        .cookie(cookie(&token_for(Role::Mahasiswa)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/dashboard-admin/users")
        .cookie(cookie(&token_for(Role::Admin)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// =============================================================================
// Credential Tests
// =============================================================================

#[actix_web::test]
async fn test_no_credential_redirects_to_landing() {
    let app = create_test_app().await;

    let req = test::TestRequest::get().uri("/dashboard").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn test_expired_credential_redirects_to_landing() {
    let app = create_test_app().await;

    for path in ["/dashboard", "/dashboard-admin", "/unauthorized"] {
        let req = test::TestRequest::get()
            .uri(path)
            .cookie(cookie(&expired_token(Role::Admin)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{}", path);
        assert_eq!(location(&resp), "/", "{}", path);
    }
}

#[actix_web::test]
async fn test_forged_role_is_rejected() {
    let app = create_test_app().await;
    let forged = forged_token(&token_for(Role::Mahasiswa), "admin");

    let req = test::TestRequest::get()
        .uri("/dashboard-admin")
        .cookie(cookie(&forged))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn test_invalid_cookie_is_removed() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/dashboard")
        .cookie(cookie("not-a-jwt"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let removal = resp
        .response()
        .cookies()
        .find(|c| c.name() == "token")
        .expect("removal cookie");
    assert_eq!(removal.value(), "");
}

#[actix_web::test]
async fn test_missing_credential_sets_no_cookie() {
    let app = create_test_app().await;

    let req = test::TestRequest::get().uri("/dashboard").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.response().cookies().count(), 0);
}

// =============================================================================
// Public Route Tests
// =============================================================================

#[actix_web::test]
async fn test_public_routes_without_credential() {
    let app = create_test_app().await;

    for path in ["/", "/sign-in", "/sign-up"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", path);
    }
}

#[actix_web::test]
async fn test_public_route_redirects_authenticated_user_to_role_landing() {
    let app = create_test_app().await;

    for (role, landing) in [
        (Role::Mahasiswa, "/dashboard"),
        (Role::DosenPembimbing, "/dashboard-dosen"),
        (Role::KoorMbkm, "/dashboard-koordinator"),
        (Role::Admin, "/dashboard-admin"),
    ] {
        let req = test::TestRequest::get()
            .uri("/sign-in")
            .cookie(cookie(&token_for(role)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), landing);
    }
}

#[actix_web::test]
async fn test_public_route_with_invalid_credential_is_served() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/sign-in")
        .cookie(cookie(&expired_token(Role::Mahasiswa)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// =============================================================================
// Unauthorized Page Tests
// =============================================================================

#[actix_web::test]
async fn test_unauthorized_page_open_to_every_role() {
    let app = create_test_app().await;

    for role in Role::ALL {
        let req = test::TestRequest::get()
            .uri("/unauthorized")
            .cookie(cookie(&token_for(role)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains(role.as_str()));
    }
}

#[actix_web::test]
async fn test_unauthorized_page_requires_credential() {
    let app = create_test_app().await;

    let req = test::TestRequest::get().uri("/unauthorized").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
}

// =============================================================================
// Unguarded Path Tests
// =============================================================================

#[actix_web::test]
async fn test_unguarded_path_passes_through() {
    let app = create_test_app().await;

    let req = test::TestRequest::get().uri("/api/navigation").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_unknown_unguarded_path_is_not_found() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/assets/logo.png")
        .cookie(cookie("garbage"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
