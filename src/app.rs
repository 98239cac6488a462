/// 앱 조립
/// 설정과 저장소로 협력 객체를 만들고, 라우트 표를 등록하고,
/// 바인딩된 이벤트를 헤더 또는 화면 뷰로 전달한다.
// region:    --- Imports
use crate::api::ApiClient;
use crate::config::Config;
use crate::dom::{BindingTarget, Document, EventKind, FormData};
use crate::router::{create_router, Location, NavEvents, Route, Router};
use crate::session::{SessionStore, Storage};
use crate::ui::toast::{dismiss_target, Toaster};
use crate::views::{
    AppContext, CreateListingView, HomeView, ListingView, LoginView, ProfileView, RegisterView,
    ViewContext,
};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

// endregion: --- Imports

/// 기본 라우트 표 (먼저 등록된 패턴이 우선)
pub fn default_routes() -> Vec<Route> {
    vec![
        Route::new("/", Arc::new(HomeView)),
        Route::new("/listing/:id", Arc::new(ListingView::new())),
        Route::new("/login", Arc::new(LoginView)),
        Route::new("/register", Arc::new(RegisterView)),
        Route::new("/profile", Arc::new(ProfileView::new())).protected(),
        Route::new("/profile/:name", Arc::new(ProfileView::new())),
        Route::new("/create", Arc::new(CreateListingView::new())).protected(),
    ]
}

pub struct App {
    ctx: AppContext,
    pending: Mutex<Option<(Vec<Route>, NavEvents)>>,
    router: OnceLock<Arc<Router>>,
}

impl App {
    pub fn new(config: &Config, storage: Arc<dyn Storage>) -> Self {
        Self::with_routes(config, storage, default_routes())
    }

    pub fn with_routes(config: &Config, storage: Arc<dyn Storage>, routes: Vec<Route>) -> Self {
        let session = SessionStore::new(storage);
        let (location, events) = Location::new();
        let ctx = AppContext {
            api: ApiClient::new(config, session.clone()),
            session,
            location,
            toasts: Toaster::new(config.toast_timeout),
            document: Document::new(),
        };
        Self {
            ctx,
            pending: Mutex::new(Some((routes, events))),
            router: OnceLock::new(),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn router(&self) -> Option<&Arc<Router>> {
        self.router.get()
    }

    /// 헤더를 그리고 크레딧을 갱신한 뒤 라우터 시작
    /// 이미 시작했으면 None.
    pub async fn start(&self) -> Option<JoinHandle<()>> {
        let (routes, events) = self.pending.lock().take()?;

        self.ctx.refresh_header();
        if let Some(credit) = self.ctx.api.refresh_credit().await {
            info!("{:<12} --> 시작 크레딧: {}", "App", credit);
        }
        self.ctx.refresh_header();

        let (router, handle) = create_router(routes, self.ctx.clone(), events);
        let _ = self.router.set(router);
        info!("{:<12} --> 앱 시작", "App");
        Some(handle)
    }

    /// 바인딩된 이벤트 실행. 바인딩이 없으면 false.
    pub async fn fire(&self, target: &str, event: EventKind, form: FormData) -> bool {
        if let (EventKind::Click, Some(id)) = (event, dismiss_target(target)) {
            return self.ctx.toasts.dismiss(id);
        }
        match self.ctx.document.find_binding(target, event) {
            Some(BindingTarget::Header(action)) => {
                self.header_action(&action);
                true
            }
            Some(BindingTarget::View {
                action,
                owner,
                mount,
            }) => {
                debug!("{:<12} --> {} {:?} → {}:{}", "App", target, event, owner.view.name(), action);
                let ctx = ViewContext::new(self.ctx.clone(), owner.request, mount);
                owner.view.handle(ctx, &action, &form).await;
                true
            }
            None => {
                debug!("{:<12} --> {} {:?} 바인딩 없음", "App", target, event);
                false
            }
        }
    }

    fn header_action(&self, action: &str) {
        if action == "logout" {
            info!("{:<12} --> 로그아웃", "App");
            self.ctx.session.clear_session();
            self.ctx.refresh_header();
            self.ctx.toasts.success("Logged out.");
            self.ctx.navigate("/");
        }
    }
}
