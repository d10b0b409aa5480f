use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use forklift_core::domain::Role;
use forklift_core::password::hash_password;
use forklift_server::config::Config;
use forklift_server::repository::user_repository;
use forklift_server::state::AppState;
use forklift_server::{db, web};
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "rey@admin123.com";
const ADMIN_PASSWORD: &str = "nimda123";
const TECH_EMAIL: &str = "budi@example.com";
const TECH_PASSWORD: &str = "teknisi123";

async fn app() -> Router {
    let pool = db::create_memory_pool().await.unwrap();
    db::run_migrations(&pool).await.unwrap();

    user_repository::create(
        &pool,
        "Admin",
        Some(ADMIN_EMAIL),
        Some(&hash_password(ADMIN_PASSWORD)),
        Role::Admin,
    )
    .await
    .unwrap();
    user_repository::create(
        &pool,
        "Budi",
        Some(TECH_EMAIL),
        Some(&hash_password(TECH_PASSWORD)),
        Role::Technician,
    )
    .await
    .unwrap();

    let config = Config {
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string(),
        ..Config::default()
    };

    web::create_router(AppState::new(pool, config))
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Log in and return the `name=value` pair of the session cookie
async fn login(app: &Router, email: &str, password: &str) -> String {
    let body = format!("email={}&password={}", email.replace('@', "%40"), password);
    let response = app
        .clone()
        .oneshot(post_form("/auth/login", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age=86400"));

    set_cookie.split(';').next().unwrap().to_string()
}

const FORKLIFT_FORM: &str = "brand=Toyota&type=8FD25&eq_no=FL-01&serial_number=SN-01\
    &location=Warehouse+A&powertrain=Diesel&owner=PT+Maju&mfg_year=2020&status=Active";

#[tokio::test]
async fn test_healthz_is_public() {
    let app = app().await;

    let response = app.oneshot(get("/healthz", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(response.headers()[header::REFERRER_POLICY], "no-referrer");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert!(response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
    assert!(response.headers().contains_key(header::STRICT_TRANSPORT_SECURITY));

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    let app = app().await;

    for uri in ["/", "/pm/", "/workshop/", "/users/", "/edit/1"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), "/auth/login", "{}", uri);
    }

    let response = app
        .clone()
        .oneshot(get("/", Some("session_token=not-a-session")))
        .await
        .unwrap();
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn test_login_page_and_bad_credentials() {
    let app = app().await;

    let response = app.clone().oneshot(get("/auth/login", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_form(
            "/auth/login",
            None,
            "email=rey%40admin123.com&password=wrong",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Invalid email or password"));
}

#[tokio::test]
async fn test_static_assets_are_cached() {
    let app = app().await;

    let response = app
        .oneshot(get("/static/css/main.css", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );
}

#[tokio::test]
async fn test_forklift_crud_flow() {
    let app = app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = app
        .clone()
        .oneshot(post_form("/tambah", Some(&cookie), FORKLIFT_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("<title>Forklifts | Forklift Repair Log</title>"));
    assert!(page.contains("FL-01"));

    // Same EQ No again
    let response = app
        .clone()
        .oneshot(post_form("/tambah", Some(&cookie), FORKLIFT_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("EQ No atau Serial Number sudah ada!"));

    let response = app
        .clone()
        .oneshot(post_form("/delete_bulk", Some(&cookie), "ids=1&ids=99"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let page = body_text(app.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(!page.contains("FL-01"));
}

#[tokio::test]
async fn test_technician_cannot_delete_forklifts_or_manage_users() {
    let app = app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    app.clone()
        .oneshot(post_form("/tambah", Some(&admin), FORKLIFT_FORM))
        .await
        .unwrap();

    let tech = login(&app, TECH_EMAIL, TECH_PASSWORD).await;

    let response = app
        .clone()
        .oneshot(post_form("/delete/1", Some(&tech), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.clone().oneshot(get("/users/", Some(&tech))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = app.oneshot(get("/users/", Some(&admin))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(TECH_EMAIL));
}

#[tokio::test]
async fn test_pm_job_requires_technicians() {
    let app = app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    app.clone()
        .oneshot(post_form("/tambah", Some(&cookie), FORKLIFT_FORM))
        .await
        .unwrap();

    let base = "forklift_id=1&date=2024-03-01&report_no=PM-1&job_desc=Service";

    let response = app
        .clone()
        .oneshot(post_form("/pm/tambah", Some(&cookie), base))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Pilih minimal satu teknisi"));

    let with_tech = format!("{}&technicians=2&next_pm_option=1bulan", base);
    let response = app
        .clone()
        .oneshot(post_form("/pm/tambah", Some(&cookie), &with_tech))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/pm/");

    let page = body_text(app.oneshot(get("/pm/", Some(&cookie))).await.unwrap()).await;
    assert!(page.contains("PM-1"));
    assert!(page.contains("2024-03-31"));
    assert!(page.contains("Budi"));
}

#[tokio::test]
async fn test_workshop_create_redirects_with_success_banner() {
    let app = app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    app.clone()
        .oneshot(post_form("/tambah", Some(&cookie), FORKLIFT_FORM))
        .await
        .unwrap();

    let form = "forklift_id=1&date=2024-03-02&report_no=WS-1&job_desc=Hydraulic+leak\
        &technicians=2&item_name=Seal+kit&qty=2&item_name=&qty=";
    let response = app
        .clone()
        .oneshot(post_form("/workshop/tambah", Some(&cookie), form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/workshop/?success=1");

    let page = body_text(
        app.oneshot(get("/workshop/?success=1", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    assert!(page.contains("Workshop job saved."));
    assert!(page.contains("Seal kit"));
}

#[tokio::test]
async fn test_user_info_and_logout() {
    let app = app().await;
    let cookie = login(&app, TECH_EMAIL, TECH_PASSWORD).await;

    let response = app
        .clone()
        .oneshot(get("/auth/user-info", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let info: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(info["name"], "Budi");
    assert_eq!(info["role"], "teknisi");

    let response = app
        .clone()
        .oneshot(get("/auth/logout", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");

    let response = app.oneshot(get("/", Some(&cookie))).await.unwrap();
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(post_form(
            "/auth/forgot-password",
            None,
            "email=budi%40example.com",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;

    let start = page.find("/auth/reset-password/").unwrap();
    let link: String = page[start..]
        .chars()
        .take_while(|c| *c != '"' && *c != '<')
        .collect();

    let response = app
        .clone()
        .oneshot(post_form(
            &link,
            None,
            "password=baru123&confirm_password=lain123",
        ))
        .await
        .unwrap();
    assert!(body_text(response).await.contains("Passwords do not match."));

    let response = app
        .clone()
        .oneshot(post_form(
            &link,
            None,
            "password=baru123&confirm_password=baru123",
        ))
        .await
        .unwrap();
    assert!(body_text(response).await.contains("reset successfully"));

    login(&app, TECH_EMAIL, "baru123").await;

    let response = app.oneshot(get(&link, None)).await.unwrap();
    assert!(body_text(response).await.contains("Invalid or expired reset link"));
}

#[tokio::test]
async fn test_updating_a_user_ends_their_sessions() {
    let app = app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let tech = login(&app, TECH_EMAIL, TECH_PASSWORD).await;

    let response = app
        .clone()
        .oneshot(post_form(
            "/users/edit/2",
            Some(&admin),
            "name=Budi&email=budi%40example.com&password=&role=supervisor",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users/");

    let response = app.clone().oneshot(get("/", Some(&tech))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");

    // The new role applies after logging in again
    let tech = login(&app, TECH_EMAIL, TECH_PASSWORD).await;
    let response = app
        .oneshot(get("/auth/user-info", Some(&tech)))
        .await
        .unwrap();
    let info: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(info["role"], "supervisor");
}

#[tokio::test]
async fn test_large_bodies_are_gzipped() {
    let app = app().await;

    let request = |uri: &str| {
        Request::builder()
            .uri(uri)
            .header(header::ACCEPT_ENCODING, "gzip")
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(request("/auth/login")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");

    // {"status":"ok"} is below the threshold
    let response = app.oneshot(request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key(header::CONTENT_ENCODING));
}
