//! Integration tests — build the router over in-memory stores and drive it
//! with `oneshot` requests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rolegate_api::config::ApiConfig;
use rolegate_api::{AppState, router};
use rolegate_core::models::{Role, RoleInput};
use rolegate_core::seed::install_defaults;
use rolegate_core::store::{MemoryStore, RoleStore, StoreResult, Stores};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn seeded_app() -> (Router, Stores) {
    let stores = Stores::memory();
    install_defaults(&stores).await.expect("seed defaults");
    let state = AppState::new(stores.clone(), ApiConfig::default());
    (router(state), stores)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn health_reports_store() {
    let (app, _) = seeded_app().await;
    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["storeConnected"], true);
}

#[tokio::test]
async fn permission_grid_renders_prefixed_routes_without_batch_delete() {
    let (app, _) = seeded_app().await;
    let (status, json) = send(&app, "GET", "/admin/auth/permissions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["header"], "Permissions");
    assert_eq!(json["body"]["batch_actions"]["delete"], false);

    let rows = json["body"]["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 5);
    let login = rows.iter().find(|r| r["slug"] == "auth.login").expect("login row");
    let markup = login["http_path"].as_str().unwrap();
    assert_eq!(markup.matches("<div").count(), 2);
    assert!(markup.contains("<code>/admin/auth/login</code>"));
    assert!(markup.contains(">ANY</span>"));
}

#[tokio::test]
async fn create_show_edit_update_permission() {
    let (app, _) = seeded_app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/admin/auth/permissions",
        Some(json!({
            "slug": "users.read",
            "name": "Read users",
            "http_method": ["GET"],
            "http_path": "/users\r\nPOST:/users/search"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, detail) = send(&app, "GET", &format!("/admin/auth/permissions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let crumbs = detail["breadcrumb"].as_array().unwrap();
    assert_eq!(crumbs.last().unwrap()["text"], id.to_string());
    let route = detail["body"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == "http_path")
        .unwrap();
    assert!(route["value"].as_str().unwrap().contains(">POST</span><code>/admin/users/search"));

    let (status, form) =
        send(&app, "GET", &format!("/admin/auth/permissions/{id}/edit"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["body"]["method"], "PUT");

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/admin/auth/permissions/{id}"),
        Some(json!({"slug": "users.read", "name": "Users (read)", "http_path": "/users"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Users (read)");
    assert_eq!(updated["http_method"], json!([]));
}

#[tokio::test]
async fn missing_slug_and_name_is_a_validation_error() {
    let (app, stores) = seeded_app().await;
    let before = stores.permissions.find_all().await.unwrap().len();

    let (status, json) = send(
        &app,
        "POST",
        "/admin/auth/permissions",
        Some(json!({"http_path": "/x"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "validation_error");
    assert!(json["fields"]["slug"].is_array());
    assert!(json["fields"]["name"].is_array());

    let after = stores.permissions.find_all().await.unwrap().len();
    assert_eq!(before, after);
}

#[tokio::test]
async fn duplicate_slug_conflicts() {
    let (app, _) = seeded_app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/admin/auth/roles",
        Some(json!({"slug": "administrator", "name": "Again"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_record_is_not_found() {
    let (app, _) = seeded_app().await;
    let (status, json) = send(&app, "GET", "/admin/auth/permissions/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");

    let (status, _) = send(&app, "GET", "/admin/auth/roles/999/edit", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn administrator_role_cannot_be_deleted() {
    let (app, stores) = seeded_app().await;
    let admin = stores
        .roles
        .find_by_slug("administrator")
        .await
        .unwrap()
        .unwrap();

    let (status, grid) = send(&app, "GET", "/admin/auth/roles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(grid["body"]["batch_actions"]["delete"], false);
    let row = &grid["body"]["rows"][0];
    assert_eq!(row["slug"], "administrator");
    assert_eq!(row["actions"]["delete"], false);
    assert_eq!(row["permissions"], json!(["All permission"]));

    for _ in 0..2 {
        let (status, json) =
            send(&app, "DELETE", &format!("/admin/auth/roles/{}", admin.id), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "forbidden");
    }
    assert!(stores.roles.find_by_id(admin.id).await.unwrap().is_some());
}

#[tokio::test]
async fn other_roles_can_be_deleted() {
    let (app, stores) = seeded_app().await;
    let (status, created) = send(
        &app,
        "POST",
        "/admin/auth/roles",
        Some(json!({"slug": "editor", "name": "Editor", "permissions": [2]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["permissions"][0]["slug"], "dashboard");

    let (status, json) = send(&app, "DELETE", &format!("/admin/auth/roles/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], true);
    assert!(stores.roles.find_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn bulk_delete_is_refused() {
    let (app, stores) = seeded_app().await;
    let (status, json) = send(&app, "DELETE", "/admin/auth/permissions/2,3", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");

    let (status, _) = send(&app, "DELETE", "/admin/auth/roles/1,2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(stores.permissions.find_all().await.unwrap().len(), 5);
}

#[tokio::test]
async fn deleting_permission_detaches_it() {
    let (app, stores) = seeded_app().await;
    let admin = stores.roles.find_by_slug("administrator").await.unwrap().unwrap();
    let star = admin.permissions[0].id;

    let (status, _) = send(&app, "DELETE", &format!("/admin/auth/permissions/{star}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let admin = stores.roles.find_by_id(admin.id).await.unwrap().unwrap();
    assert!(admin.permissions.is_empty());

    let (status, _) = send(&app, "DELETE", &format!("/admin/auth/permissions/{star}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn role_form_offers_every_permission() {
    let (app, _) = seeded_app().await;
    let (status, json) = send(&app, "GET", "/admin/auth/roles/create", None).await;
    assert_eq!(status, StatusCode::OK);
    let fields = json["body"]["fields"].as_array().unwrap();
    let listbox = fields.iter().find(|f| f["name"] == "permissions").unwrap();
    assert_eq!(listbox["kind"], "listbox");
    assert_eq!(listbox["options"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn role_with_unknown_permission_is_rejected() {
    let (app, _) = seeded_app().await;
    let (status, json) = send(
        &app,
        "POST",
        "/admin/auth/roles",
        Some(json!({"slug": "ghost", "name": "Ghost", "permissions": [404]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["fields"]["permissions"].is_array());
}

#[tokio::test]
async fn access_check_uses_role_permissions() {
    let (app, _) = seeded_app().await;
    let (_, viewer) = send(
        &app,
        "POST",
        "/admin/auth/roles",
        Some(json!({"slug": "viewer", "name": "Viewer", "permissions": [2, 4]})),
    )
    .await;
    assert_eq!(viewer["slug"], "viewer");

    let check = |method: &str, path: &str, roles: Value| {
        json!({"roles": roles, "method": method, "path": path})
    };

    let (_, json) = send(
        &app,
        "POST",
        "/admin/auth/check",
        Some(check("PUT", "/admin/auth/setting", json!(["viewer"]))),
    )
    .await;
    assert_eq!(json["allowed"], true);
    assert_eq!(json["matched_roles"], json!(["viewer"]));

    let (_, json) = send(
        &app,
        "POST",
        "/admin/auth/check",
        Some(check("DELETE", "/admin/auth/setting", json!(["viewer"]))),
    )
    .await;
    assert_eq!(json["allowed"], false);

    let (_, json) = send(
        &app,
        "POST",
        "/admin/auth/check",
        Some(check("DELETE", "/admin/auth/roles/1", json!(["administrator"]))),
    )
    .await;
    assert_eq!(json["allowed"], true);

    let (status, _) = send(
        &app,
        "POST",
        "/admin/auth/check",
        Some(check(" ", "/admin", json!([]))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unprefixed_config_mounts_at_root() {
    let state = AppState::new(
        Stores::memory(),
        ApiConfig {
            route_prefix: "/".into(),
            ..Default::default()
        },
    );
    let app = router(state);
    let (status, json) = send(&app, "GET", "/auth/roles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["body"]["rows"], json!([]));
}

fn row_ids(page: &Value) -> Vec<i64> {
    page["body"]["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .map(|r| r["id"].as_i64().expect("id"))
        .collect()
}

#[tokio::test]
async fn grids_sort_by_sortable_columns() {
    let (app, _) = seeded_app().await;

    let (status, json) = send(&app, "GET", "/admin/auth/permissions?sort=id&order=desc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_ids(&json), vec![5, 4, 3, 2, 1]);

    let (status, json) = send(&app, "GET", "/admin/auth/permissions?sort=created_at", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_ids(&json), vec![1, 2, 3, 4, 5]);

    send(
        &app,
        "POST",
        "/admin/auth/roles",
        Some(json!({"slug": "editor", "name": "Editor"})),
    )
    .await;
    let (status, json) = send(&app, "GET", "/admin/auth/roles?sort=updated_at&order=DESC", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_ids(&json), vec![2, 1]);
}

#[tokio::test]
async fn grid_sort_rejects_other_columns() {
    let (app, _) = seeded_app().await;

    let (status, json) = send(&app, "GET", "/admin/auth/permissions?sort=slug", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");

    let (status, _) = send(&app, "GET", "/admin/auth/roles?sort=permissions", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(&app, "GET", "/admin/auth/roles?sort=id&order=sideways", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn non_numeric_ids_get_json_errors() {
    let (app, _) = seeded_app().await;

    for (method, uri) in [
        ("GET", "/admin/auth/permissions/abc"),
        ("GET", "/admin/auth/permissions/abc/edit"),
        ("GET", "/admin/auth/roles/abc"),
        ("GET", "/admin/auth/roles/abc/edit"),
    ] {
        let (status, json) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(json["error"], "bad_request", "{method} {uri}");
    }

    let body = json!({"slug": "x", "name": "X"});
    let (status, json) = send(&app, "PUT", "/admin/auth/permissions/abc", Some(body.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");
    let (status, json) = send(&app, "PUT", "/admin/auth/roles/abc", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");
}

/// Role store whose rows disappear between lookup and delete.
struct VanishingRoles(Arc<MemoryStore>);

#[async_trait]
impl RoleStore for VanishingRoles {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Role>> {
        RoleStore::find_by_id(&*self.0, id).await
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Role>> {
        self.0.find_by_slug(slug).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Role>> {
        RoleStore::find_all(&*self.0).await
    }

    async fn create(&self, input: RoleInput) -> StoreResult<Role> {
        RoleStore::create(&*self.0, input).await
    }

    async fn update(&self, id: i64, input: RoleInput) -> StoreResult<Role> {
        RoleStore::update(&*self.0, id, input).await
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        RoleStore::delete(&*self.0, id).await?;
        Ok(false)
    }
}

#[tokio::test]
async fn role_deleted_concurrently_is_not_found() {
    let memory = Arc::new(MemoryStore::new());
    let stores = Stores {
        permissions: memory.clone(),
        roles: Arc::new(VanishingRoles(memory)),
    };
    let app = router(AppState::new(stores.clone(), ApiConfig::default()));

    let (status, created) = send(
        &app,
        "POST",
        "/admin/auth/roles",
        Some(json!({"slug": "editor", "name": "Editor"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, json) = send(&app, "DELETE", &format!("/admin/auth/roles/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}
