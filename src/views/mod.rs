/// 뷰 모듈
/// 각 뷰는 `render`로 마운트된 컨테이너 전체를 다시 그리고,
/// 바인딩된 액션은 `handle`로 받는다. 오류는 뷰 안에서 처리하고 밖으로 내보내지 않는다.
// region:    --- Imports
pub mod create;
pub mod home;
pub mod listing;
pub mod login;
pub mod profile;
pub mod register;

use crate::api::ApiClient;
use crate::dom::{Document, FormData, Mount, Rendered};
use crate::router::{Location, RouteRequest};
use crate::session::SessionStore;
use crate::ui::format::escape_html;
use crate::ui::header::render_header;
use crate::ui::toast::Toaster;
use async_trait::async_trait;

pub use create::CreateListingView;
pub use home::HomeView;
pub use listing::ListingView;
pub use login::LoginView;
pub use profile::ProfileView;
pub use register::RegisterView;

// endregion: --- Imports

// region:    --- Contexts
/// 앱 전역 협력 객체
#[derive(Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub session: SessionStore,
    pub location: Location,
    pub toasts: Toaster,
    pub document: Document,
}

impl AppContext {
    /// 세션 상태로 헤더 다시 그리기
    pub fn refresh_header(&self) {
        self.document
            .set_header(render_header(&self.session.get_session()));
    }

    pub fn navigate(&self, path: &str) {
        self.location.navigate(path);
    }
}

/// 렌더링/이벤트 처리 시 뷰에 넘기는 컨텍스트
#[derive(Clone)]
pub struct ViewContext {
    pub app: AppContext,
    pub request: RouteRequest,
    pub mount: Mount,
}

impl ViewContext {
    pub fn new(app: AppContext, request: RouteRequest, mount: Mount) -> Self {
        Self {
            app,
            request,
            mount,
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.request.params.get(key).map(String::as_str)
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.request.query.get(key).map(String::as_str)
    }

    /// 렌더링 적용 후 헤더 갱신. 지난 마운트면 아무것도 하지 않는다.
    pub fn commit(&self, rendered: Rendered) -> bool {
        if !self.mount.commit(rendered) {
            return false;
        }
        self.app.refresh_header();
        true
    }

    pub fn is_current(&self) -> bool {
        self.mount.is_current()
    }

    /// 인라인 오류 패널 + 오류 토스트
    pub fn fail(&self, title: &str, message: &str) {
        if self.commit(error_panel(title, message)) {
            self.app.toasts.error(message);
        }
    }
}
// endregion: --- Contexts

// region:    --- View Trait
#[async_trait]
pub trait View: Send + Sync {
    fn name(&self) -> &'static str;

    async fn render(&self, ctx: ViewContext);

    async fn handle(&self, ctx: ViewContext, action: &str, form: &FormData) {
        let _ = (ctx, action, form);
    }
}
// endregion: --- View Trait

// region:    --- Shared Panels
pub fn loading_panel(title: &str, message: &str) -> Rendered {
    Rendered::new(format!(
        r##"<section class="card card-pad"><h1>{}</h1><p>{}</p><a href="#/" class="btn-secondary">Back</a></section>"##,
        escape_html(title),
        escape_html(message)
    ))
}

pub fn error_panel(title: &str, message: &str) -> Rendered {
    Rendered::new(format!(
        r##"<section class="card card-pad error"><h1>{}</h1><p role="alert">{}</p><a href="#/" class="btn-secondary">Back to home</a></section>"##,
        escape_html(title),
        escape_html(message)
    ))
}

/// 폼 위에 붙는 오류 문구
pub fn feedback(message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<div id="feedback" role="alert">{}</div>"#, escape_html(m)))
        .unwrap_or_default()
}

pub fn field<'a>(form: &'a FormData, key: &str) -> &'a str {
    form.get(key).map(String::as_str).unwrap_or("")
}
// endregion: --- Shared Panels
