use async_trait::async_trait;
use auction_client::api::{ApiClient, ApiErrorKind, RequestOptions};
use auction_client::auction::bids::BidStatus;
use auction_client::auction::model::NewListing;
use auction_client::dom::{ContainerId, EventKind, FormData, Rendered};
use auction_client::query::{ListingQuery, SortOption, StatusFilter};
use auction_client::router::{Route, RouteRequest};
use auction_client::session::{MemoryStorage, SessionStore, SessionUser};
use auction_client::views::profile::fetch_snapshot;
use auction_client::views::{View, ViewContext};
use auction_client::{App, Config};
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

// region:    --- Mock Api
#[derive(Default)]
struct Recorded {
    bids: Vec<i64>,
    listing_queries: Vec<String>,
    search_queries: Vec<String>,
    created: Vec<Value>,
    listing_updates: Vec<Value>,
    profile_updates: Vec<Value>,
}

type Shared = Arc<Mutex<Recorded>>;

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "hunter222" {
        let data = json!({ "data": { "name": "ola", "email": body["email"], "accessToken": "tok-ola" } });
        (StatusCode::OK, Json(data)).into_response()
    } else {
        let errors = json!({ "errors": [{ "message": "Invalid email or password" }], "statusCode": 401 });
        (StatusCode::UNAUTHORIZED, Json(errors)).into_response()
    }
}

async fn profile(State(shared): State<Shared>, Path(name): Path<String>) -> Response {
    if name == "ghost" {
        let errors = json!({ "errors": [{ "message": "Internal server error" }] });
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(errors)).into_response();
    }
    let avatar = shared
        .lock()
        .profile_updates
        .last()
        .and_then(|update| update.get("avatar").cloned());
    Json(json!({
        "data": {
            "name": name,
            "email": format!("{}@stud.noroff.no", name),
            "credits": 1000,
            "avatar": avatar,
        },
        "meta": {}
    }))
    .into_response()
}

async fn update_profile(
    State(shared): State<Shared>,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    shared.lock().profile_updates.push(body.clone());
    Json(json!({ "data": { "name": name, "avatar": body.get("avatar") } }))
}

async fn profile_listings(Path(_name): Path<String>) -> Json<Value> {
    Json(json!({ "data": [{ "id": "mine", "title": "Mine" }] }))
}

async fn profile_wins(Path(_name): Path<String>) -> Json<Value> {
    Json(json!({ "data": [] }))
}

async fn profile_bids(Path(_name): Path<String>) -> Json<Value> {
    Json(json!({
        "data": [
            { "amount": 55, "listing": { "id": "lamp", "title": "Lamp" } },
            { "amount": 10, "listing": { "id": "missing", "title": "Gone" } },
        ]
    }))
}

async fn listings(State(shared): State<Shared>, RawQuery(query): RawQuery) -> Json<Value> {
    shared.lock().listing_queries.push(query.unwrap_or_default());
    Json(json!({
        "data": [{ "id": "lamp", "title": "Lamp" }, { "id": "broken", "title": null }],
        "meta": {}
    }))
}

async fn search_listings(State(shared): State<Shared>, RawQuery(query): RawQuery) -> Json<Value> {
    shared.lock().search_queries.push(query.unwrap_or_default());
    let at = |days: i64| (Utc::now() + ChronoDuration::days(days)).to_rfc3339();
    Json(json!({
        "data": [
            { "id": "later", "title": "Later lamp", "endsAt": at(3) },
            { "id": "over", "title": "Over lamp", "endsAt": at(-1) },
            { "id": "soon", "title": "Soon lamp", "endsAt": at(1) },
        ]
    }))
}

async fn create_listing(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    shared.lock().created.push(body.clone());
    let data = json!({ "data": { "id": "new-1", "title": body["title"] } });
    (StatusCode::CREATED, Json(data)).into_response()
}

async fn update_listing(
    State(shared): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    shared.lock().listing_updates.push(body.clone());
    Json(json!({ "data": { "id": id, "title": body["title"] } }))
}

async fn listing(State(shared): State<Shared>, Path(id): Path<String>) -> Response {
    if id != "lamp" {
        let errors = json!({ "errors": [{ "message": "No listing with such ID" }] });
        return (StatusCode::NOT_FOUND, Json(errors)).into_response();
    }
    let mut bids = vec![json!({ "id": "b1", "amount": 40, "bidder": { "name": "bob" } })];
    for amount in shared.lock().bids.iter() {
        bids.push(json!({ "amount": amount, "bidder": { "name": "ola" } }));
    }
    let ends_at = (Utc::now() + ChronoDuration::days(2)).to_rfc3339();
    Json(json!({
        "data": {
            "id": "lamp",
            "title": "Lamp",
            "endsAt": ends_at,
            "seller": { "name": "seller" },
            "bids": bids,
        }
    }))
    .into_response()
}

async fn delete_listing(Path(id): Path<String>) -> Response {
    if id == "gone" {
        return StatusCode::NO_CONTENT.into_response();
    }
    let errors = json!({ "errors": [{ "message": "No listing with such ID" }] });
    (StatusCode::NOT_FOUND, Json(errors)).into_response()
}

async fn place_bid(State(shared): State<Shared>, Path(_id): Path<String>, Json(body): Json<Value>) -> Response {
    let amount = body["amount"].as_i64().unwrap_or_default();
    shared.lock().bids.push(amount);
    (StatusCode::CREATED, Json(json!({ "data": { "amount": amount } }))).into_response()
}

async fn echo(headers: HeaderMap) -> Json<Value> {
    let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    Json(json!({
        "apiKey": get("x-noroff-api-key"),
        "authorization": get("authorization"),
        "contentType": get("content-type"),
        "trace": get("x-trace"),
    }))
}

async fn spawn_server() -> (String, Shared) {
    let shared = Shared::default();
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auction/echo", get(echo))
        .route("/auction/profiles/:name", get(profile).put(update_profile))
        .route("/auction/profiles/:name/listings", get(profile_listings))
        .route("/auction/profiles/:name/wins", get(profile_wins))
        .route("/auction/profiles/:name/bids", get(profile_bids))
        .route("/auction/listings", get(listings).post(create_listing))
        .route("/auction/listings/search", get(search_listings))
        .route(
            "/auction/listings/:id",
            get(listing).put(update_listing).delete(delete_listing),
        )
        .route("/auction/listings/:id/bids", post(place_bid))
        .with_state(shared.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), shared)
}
// endregion: --- Mock Api

// region:    --- Helpers
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

fn config(base_url: &str) -> Config {
    Config::default()
        .with_api_base_url(base_url)
        .with_api_key(Some("key-123".to_string()))
}

async fn wait_until(what: &str, condition: impl Fn() -> bool) {
    for _ in 0..300 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}

fn has_binding(app: &App, target: &str, event: EventKind) -> bool {
    has_binding_in(app, ContainerId::App, target, event)
}

fn has_binding_in(app: &App, container: ContainerId, target: &str, event: EventKind) -> bool {
    app.context()
        .document
        .content(container)
        .action_for(target, event)
        .is_some()
}

fn app_markup(app: &App) -> String {
    app.context().document.markup(ContainerId::App)
}

/// 로그인된 상태로 시작한 앱
async fn logged_in_app(base_url: &str) -> App {
    let app = App::new(&config(base_url), Arc::new(MemoryStorage::new()));
    let user = SessionUser {
        name: "ola".to_string(),
        email: "ola@stud.noroff.no".to_string(),
        avatar: None,
    };
    app.context().session.set_session("tok-ola", Some(user)).unwrap();
    app.start().await.unwrap();
    app
}

fn form(pairs: &[(&str, &str)]) -> FormData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// 렌더링 요청만 기록하는 뷰
struct RecordingView {
    name: &'static str,
    calls: Arc<Mutex<Vec<RouteRequest>>>,
}

impl RecordingView {
    fn route(pattern: &'static str, name: &'static str) -> (Route, Arc<Mutex<Vec<RouteRequest>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let view = RecordingView {
            name,
            calls: Arc::clone(&calls),
        };
        (Route::new(pattern, Arc::new(view)), calls)
    }
}

#[async_trait]
impl View for RecordingView {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn render(&self, ctx: ViewContext) {
        self.calls.lock().push(ctx.request.clone());
        ctx.commit(Rendered::new(format!("<p>{}</p>", self.name)));
    }
}
// endregion: --- Helpers

// region:    --- Api Gateway
#[tokio::test]
async fn test_error_message_and_empty_body() {
    init_tracing();
    let (base_url, _) = spawn_server().await;
    let api = ApiClient::new(&config(&base_url), SessionStore::in_memory());

    let err = api.delete("/listings/missing", RequestOptions::new()).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Http);
    assert_eq!(err.status, Some(404));
    assert_eq!(err.message, "No listing with such ID");

    let value = api.delete("/listings/gone", RequestOptions::new()).await.unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn test_transport_failure() {
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::new(&config(&format!("http://{}", addr)), SessionStore::in_memory());
    let err = api.get("/listings", RequestOptions::new()).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Transport);
    assert_eq!(err.status, None);
}

#[tokio::test]
async fn test_headers_are_injected() {
    init_tracing();
    let (base_url, _) = spawn_server().await;
    let session = SessionStore::in_memory();
    let api = ApiClient::new(&config(&base_url), session.clone());

    let anonymous = api.get("/echo", RequestOptions::new()).await.unwrap();
    assert_eq!(anonymous["apiKey"], "key-123");
    assert_eq!(anonymous["contentType"], "application/json");
    assert_eq!(anonymous["authorization"], Value::Null);

    session.set_session("tok-1", None).unwrap();
    let options = RequestOptions::new().header("X-Trace", "t-1");
    let authed = api.get("/echo", options).await.unwrap();
    assert_eq!(authed["authorization"], "Bearer tok-1");
    assert_eq!(authed["trace"], "t-1");

    // 호출자 헤더가 기본 헤더를 덮어쓴다
    let options = RequestOptions::new()
        .header("Content-Type", "text/plain")
        .header("Authorization", "Bearer other")
        .header("X-Noroff-API-Key", "key-override");
    let overridden = api.get("/echo", options).await.unwrap();
    assert_eq!(overridden["contentType"], "text/plain");
    assert_eq!(overridden["authorization"], "Bearer other");
    assert_eq!(overridden["apiKey"], "key-override");
}

#[tokio::test]
async fn test_update_listing() {
    init_tracing();
    let (base_url, shared) = spawn_server().await;
    let session = SessionStore::in_memory();
    session.set_session("tok-ola", None).unwrap();
    let api = ApiClient::new(&config(&base_url), session);

    let ends_at = Utc::now() + ChronoDuration::days(1);
    let update = NewListing {
        title: "Brass lamp".to_string(),
        description: Some("Polished".to_string()),
        tags: vec!["vintage".to_string()],
        media: vec![],
        ends_at,
    };
    let updated = api.update_listing("lamp", &update).await.unwrap();
    assert_eq!(updated.id, "lamp");
    assert_eq!(updated.title, "Brass lamp");

    let body = shared.lock().listing_updates[0].clone();
    assert_eq!(body["description"], "Polished");
    assert_eq!(body["tags"], json!(["vintage"]));
}

#[tokio::test]
async fn test_refresh_credit_keeps_cache_on_failure() {
    init_tracing();
    let (base_url, _) = spawn_server().await;
    let session = SessionStore::in_memory();
    let ghost = SessionUser {
        name: "ghost".to_string(),
        email: "ghost@stud.noroff.no".to_string(),
        avatar: None,
    };
    session.set_session("tok-ghost", Some(ghost)).unwrap();
    session.set_credit(250).unwrap();
    let api = ApiClient::new(&config(&base_url), session.clone());

    assert_eq!(api.refresh_credit().await, Some(250));
    assert_eq!(session.get_session().credit, Some(250));
    assert_eq!(session.get_session().user_name(), Some("ghost"));

    // 로그아웃 상태면 요청하지 않는다
    session.clear_session();
    assert_eq!(api.refresh_credit().await, None);
}

#[tokio::test]
async fn test_listing_query_params() {
    init_tracing();
    let (base_url, shared) = spawn_server().await;
    let api = ApiClient::new(&config(&base_url), SessionStore::in_memory());

    let query = ListingQuery {
        search: String::new(),
        sort: SortOption::EndsAsc,
        status: StatusFilter::Active,
    };
    let found = api.listings(&query).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, "lamp");
    assert_eq!(found[1].title, "");

    let recorded = shared.lock().listing_queries.clone();
    assert_eq!(
        recorded,
        vec!["sort=endsAt&sortOrder=asc&_seller=true&_bids=true&_active=true".to_string()]
    );
}
// endregion: --- Api Gateway

// region:    --- Router
#[tokio::test]
async fn test_protected_route_redirects_without_rendering() {
    init_tracing();
    let (home, home_calls) = RecordingView::route("/", "home");
    let (login, login_calls) = RecordingView::route("/login", "login");
    let (create, create_calls) = RecordingView::route("/create", "create");
    let routes = vec![home, login, create.protected()];

    let app = App::with_routes(
        &config("http://127.0.0.1:9"),
        Arc::new(MemoryStorage::new()),
        routes,
    );
    app.start().await.unwrap();
    wait_until("home render", || home_calls.lock().len() == 1).await;
    assert!(app.context().document.is_visible(ContainerId::Home));

    app.context().navigate("/create");
    wait_until("login render", || login_calls.lock().len() == 1).await;

    assert!(create_calls.lock().is_empty());
    assert_eq!(app.context().location.hash(), "#/login?returnTo=%2Fcreate");
    let request = login_calls.lock()[0].clone();
    assert_eq!(request.query.get("returnTo").map(String::as_str), Some("/create"));
    assert!(app.context().document.is_visible(ContainerId::App));
}

#[tokio::test]
async fn test_route_params_and_unknown_paths() {
    init_tracing();
    let (home, home_calls) = RecordingView::route("/", "home");
    let (detail, detail_calls) = RecordingView::route("/listing/:id", "listing");

    let app = App::with_routes(
        &config("http://127.0.0.1:9"),
        Arc::new(MemoryStorage::new()),
        vec![home, detail],
    );
    app.start().await.unwrap();
    wait_until("home render", || home_calls.lock().len() == 1).await;

    app.context().navigate("/listing/old%20lamp?from=search&page=2");
    wait_until("listing render", || detail_calls.lock().len() == 1).await;
    let request = detail_calls.lock()[0].clone();
    assert_eq!(request.path, "/listing/old%20lamp");
    assert_eq!(request.params.get("id").map(String::as_str), Some("old lamp"));
    assert_eq!(request.query.get("page").map(String::as_str), Some("2"));

    app.context().navigate("/nowhere");
    wait_until("fallback to home", || home_calls.lock().len() == 2).await;
    assert_eq!(app.context().location.hash(), "#/");
}

/// 잠시 멈췄다가 그리는 뷰. commit 결과를 남긴다.
struct SlowView {
    started: Arc<Mutex<bool>>,
    committed: Arc<Mutex<Option<bool>>>,
}

#[async_trait]
impl View for SlowView {
    fn name(&self) -> &'static str {
        "slow-a"
    }

    async fn render(&self, ctx: ViewContext) {
        *self.started.lock() = true;
        tokio::time::sleep(Duration::from_millis(150)).await;
        let committed = ctx.commit(Rendered::new("<p>slow-a</p>"));
        *self.committed.lock() = Some(committed);
    }
}

#[tokio::test]
async fn test_newer_navigation_wins_over_slow_render() {
    init_tracing();
    let (home, home_calls) = RecordingView::route("/", "home");
    let (fast, fast_calls) = RecordingView::route("/b", "fast-b");
    let started = Arc::new(Mutex::new(false));
    let committed = Arc::new(Mutex::new(None));
    let slow = SlowView {
        started: Arc::clone(&started),
        committed: Arc::clone(&committed),
    };
    let routes = vec![home, Route::new("/a", Arc::new(slow)), fast];

    let app = App::with_routes(
        &config("http://127.0.0.1:9"),
        Arc::new(MemoryStorage::new()),
        routes,
    );
    app.start().await.unwrap();
    wait_until("home render", || home_calls.lock().len() == 1).await;

    app.context().navigate("/a");
    wait_until("slow render started", || *started.lock()).await;
    app.context().navigate("/b");
    wait_until("fast render", || fast_calls.lock().len() == 1).await;
    wait_until("slow render finished", || committed.lock().is_some()).await;

    assert_eq!(*committed.lock(), Some(false));
    assert_eq!(app_markup(&app), "<p>fast-b</p>");
    assert_eq!(app.context().location.hash(), "#/b");
}
// endregion: --- Router

// region:    --- Views
#[tokio::test]
async fn test_login_then_bid() {
    init_tracing();
    let (base_url, shared) = spawn_server().await;
    let app = App::new(&config(&base_url), Arc::new(MemoryStorage::new()));
    app.start().await.unwrap();

    app.context().navigate("/login?returnTo=%2Flisting%2Flamp");
    wait_until("login form", || has_binding(&app, "loginForm", EventKind::Submit)).await;

    let fired = app
        .fire(
            "loginForm",
            EventKind::Submit,
            form(&[("email", "ola@stud.noroff.no"), ("password", "hunter222")]),
        )
        .await;
    assert!(fired);

    let session = app.context().session.get_session();
    assert_eq!(session.token.as_deref(), Some("tok-ola"));
    assert_eq!(session.user_name(), Some("ola"));
    assert_eq!(session.credit, Some(1000));
    assert_eq!(app.context().location.hash(), "#/listing/lamp");

    wait_until("bid form", || has_binding(&app, "bidForm", EventKind::Submit)).await;
    let header = app.context().document.header().markup;
    assert!(header.contains("💰 1000"));

    // 현재 최고가 이하 입찰은 요청 전에 거절
    app.fire("bidForm", EventKind::Submit, form(&[("bidAmount", "40")]))
        .await;
    assert!(shared.lock().bids.is_empty());
    let markup = app.context().document.markup(ContainerId::App);
    assert!(markup.contains("Bid must be a whole number higher than 40."));

    app.fire("bidForm", EventKind::Submit, form(&[("bidAmount", "55")]))
        .await;
    assert_eq!(shared.lock().bids, vec![55]);
    assert!(app
        .context()
        .toasts
        .messages()
        .contains(&"Bid of 55 credits placed!".to_string()));
    let markup = app.context().document.markup(ContainerId::App);
    assert!(markup.contains("<strong>55</strong>"));
}

#[tokio::test]
async fn test_failed_login_stays_on_form() {
    init_tracing();
    let (base_url, _) = spawn_server().await;
    let app = App::new(&config(&base_url), Arc::new(MemoryStorage::new()));
    app.start().await.unwrap();

    app.context().navigate("/login");
    wait_until("login form", || has_binding(&app, "loginForm", EventKind::Submit)).await;

    app.fire(
        "loginForm",
        EventKind::Submit,
        form(&[("email", "ola@stud.noroff.no"), ("password", "wrong")]),
    )
    .await;

    assert!(!app.context().session.get_session().is_logged_in());
    assert_eq!(app.context().location.hash(), "#/login");
    let markup = app.context().document.markup(ContainerId::App);
    assert!(markup.contains("Invalid email or password"));
    assert!(markup.contains("ola@stud.noroff.no"));
}

#[tokio::test]
async fn test_listing_not_found_shows_error_panel() {
    init_tracing();
    let (base_url, _) = spawn_server().await;
    let app = App::new(&config(&base_url), Arc::new(MemoryStorage::new()));
    app.start().await.unwrap();

    app.context().navigate("/listing/missing");
    wait_until("error panel", || {
        app.context()
            .document
            .markup(ContainerId::App)
            .contains("No listing with such ID")
    })
    .await;
    assert!(app_markup(&app).contains("<h1>Listing not found</h1>"));
    assert!(app
        .context()
        .toasts
        .messages()
        .contains(&"No listing with such ID".to_string()));
}

#[tokio::test]
async fn test_home_skips_undecodable_listing() {
    init_tracing();
    let (base_url, _) = spawn_server().await;
    let app = App::new(&config(&base_url), Arc::new(MemoryStorage::new()));
    app.start().await.unwrap();

    let home = || app.context().document.markup(ContainerId::Home);
    wait_until("listing grid", || home().contains(r#"class="grid""#)).await;

    let markup = home();
    assert!(markup.contains("<h3>Lamp</h3>"));
    assert!(markup.contains("<h3>Untitled</h3>"));
    assert!(!markup.contains(r#"id="feedback""#));
    assert!(app.context().toasts.messages().is_empty());
}

#[tokio::test]
async fn test_home_search_filters_and_sorts_results() {
    init_tracing();
    let (base_url, shared) = spawn_server().await;
    let app = App::new(&config(&base_url), Arc::new(MemoryStorage::new()));
    app.start().await.unwrap();
    wait_until("first listing load", || {
        app.context().document.markup(ContainerId::Home).contains(r#"class="grid""#)
    })
    .await;
    assert!(has_binding_in(&app, ContainerId::Home, "searchForm", EventKind::Submit));

    let fired = app
        .fire(
            "searchForm",
            EventKind::Submit,
            form(&[
                ("searchInput", "lamp"),
                ("sortSelect", "ends_asc"),
                ("statusSelect", "active"),
            ]),
        )
        .await;
    assert!(fired);

    let queries = shared.lock().search_queries.clone();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].contains("q=lamp"));

    let markup = app.context().document.markup(ContainerId::Home);
    let soon = markup.find("Soon lamp").unwrap();
    let later = markup.find("Later lamp").unwrap();
    assert!(soon < later);
    assert!(!markup.contains("Over lamp"));
    assert!(markup.contains(r#"<option value="ends_asc" selected>"#));
}

#[tokio::test]
async fn test_profile_snapshot_enriches_bids() {
    init_tracing();
    let (base_url, shared) = spawn_server().await;
    shared.lock().bids.push(55);
    let session = SessionStore::in_memory();
    session.set_session("tok-ola", None).unwrap();
    let api = ApiClient::new(&config(&base_url), session);

    let snapshot = fetch_snapshot(&api, "ola", true, Utc::now()).await.unwrap();
    assert_eq!(snapshot.profile.credits, Some(1000));
    assert_eq!(snapshot.listings.len(), 1);
    assert!(snapshot.wins.is_empty());
    assert!(snapshot.own);

    let statuses: Vec<_> = snapshot.bids.iter().map(|(_, status)| *status).collect();
    assert_eq!(statuses, vec![Some(BidStatus::Leading), None]);

    let lamp = snapshot.bids[0].0.listing.as_deref().unwrap();
    assert_eq!(lamp.title, "Lamp");
    assert_eq!(lamp.seller_name(), Some("seller"));
    assert_eq!(lamp.bids.len(), 2);

    // 상세 조회에 실패한 입찰은 받은 그대로 남는다
    let missing = snapshot.bids[1].0.listing.as_deref().unwrap();
    assert_eq!(missing.title, "Gone");
    assert!(missing.bids.is_empty());
}

#[tokio::test]
async fn test_profile_edit_and_save() {
    init_tracing();
    let (base_url, shared) = spawn_server().await;
    let app = logged_in_app(&base_url).await;

    app.context().navigate("/profile");
    wait_until("profile page", || has_binding(&app, "editProfileBtn", EventKind::Click)).await;
    assert_eq!(app.context().session.get_session().credit, Some(1000));

    app.fire("editProfileBtn", EventKind::Click, FormData::new()).await;
    assert!(app_markup(&app).contains(r#"id="editProfileModal" class="modal" "#));

    let avatar = "https://img.example/ola.png";
    let fired = app
        .fire(
            "editProfileForm",
            EventKind::Submit,
            form(&[("modalAvatarUrl", avatar), ("modalBannerUrl", "")]),
        )
        .await;
    assert!(fired);

    let update = shared.lock().profile_updates[0].clone();
    assert_eq!(update["avatar"]["url"], avatar);
    let session = app.context().session.get_session();
    let stored = session.user.and_then(|u| u.avatar).map(|m| m.url);
    assert_eq!(stored.as_deref(), Some(avatar));
    assert!(app
        .context()
        .toasts
        .messages()
        .contains(&"Profile updated successfully!".to_string()));
    assert!(app_markup(&app).contains(r#"id="editProfileModal" class="modal hidden""#));
}

#[tokio::test]
async fn test_profile_state_resets_after_navigation() {
    init_tracing();
    let (base_url, _) = spawn_server().await;
    let app = logged_in_app(&base_url).await;
    let listings_tab = r#"id="tab-listings" type="button" role="tab" aria-selected="true""#;

    app.context().navigate("/profile");
    wait_until("profile page", || has_binding(&app, "editProfileBtn", EventKind::Click)).await;

    app.fire("tab-bids", EventKind::Click, FormData::new()).await;
    app.fire("editProfileBtn", EventKind::Click, FormData::new()).await;
    let markup = app_markup(&app);
    assert!(!markup.contains(listings_tab));
    assert!(!markup.contains("modal hidden"));

    app.context().navigate("/");
    wait_until("home", || app.context().document.is_visible(ContainerId::Home)).await;
    app.context().navigate("/profile");
    wait_until("profile again", || app_markup(&app).contains(listings_tab)).await;

    assert!(app_markup(&app).contains(r#"id="editProfileModal" class="modal hidden""#));
    assert!(!app_markup(&app).contains(r#"id="feedback""#));
}

#[tokio::test]
async fn test_create_listing_flow() {
    init_tracing();
    let (base_url, shared) = spawn_server().await;
    let app = logged_in_app(&base_url).await;

    app.context().navigate("/create");
    wait_until("create form", || has_binding(&app, "createForm", EventKind::Submit)).await;

    let media = "https://img.example/desk-lamp.png";
    app.fire("addMediaBtn", EventKind::Click, form(&[("mediaUrl", media), ("title", "Desk lamp")]))
        .await;
    let markup = app_markup(&app);
    assert!(markup.contains(media));
    assert!(markup.contains("Desk lamp"));

    let ends_at = (Utc::now() + ChronoDuration::days(2))
        .format("%Y-%m-%dT%H:%M")
        .to_string();
    let fired = app
        .fire(
            "createForm",
            EventKind::Submit,
            form(&[
                ("title", "Desk lamp"),
                ("description", "Brass, works"),
                ("tags", "vintage, brass,"),
                ("endsAt", ends_at.as_str()),
            ]),
        )
        .await;
    assert!(fired);

    let body = shared.lock().created[0].clone();
    assert_eq!(body["title"], "Desk lamp");
    assert_eq!(body["tags"], json!(["vintage", "brass"]));
    assert_eq!(body["media"][0]["url"], media);
    assert_eq!(app.context().location.hash(), "#/listing/new-1");
    assert!(app
        .context()
        .toasts
        .messages()
        .contains(&"Listing created successfully!".to_string()));
}
// endregion: --- Views
