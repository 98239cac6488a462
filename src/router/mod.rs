/// 해시 라우터
/// idle(이벤트 대기) ↔ dispatching(경로 해석 및 뷰 렌더링) 두 상태를 가진다.
// region:    --- Imports
pub mod location;

use crate::dom::{ContainerId, Owner};
use crate::views::{AppContext, View, ViewContext};
pub use location::{Location, NavEvent, NavEvents};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

// endregion: --- Imports

pub type Params = BTreeMap<String, String>;
pub type Query = BTreeMap<String, String>;

// region:    --- Route Table
/// 라우트 항목
#[derive(Clone)]
pub struct Route {
    pub pattern: &'static str,
    pub view: Arc<dyn View>,
    pub protected: bool,
}

impl Route {
    pub fn new(pattern: &'static str, view: Arc<dyn View>) -> Self {
        Self {
            pattern,
            view,
            protected: false,
        }
    }

    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }
}

/// 뷰에 전달되는 요청 정보
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequest {
    pub path: String,
    pub params: Params,
    pub query: Query,
}

/// 경로 해석 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render { index: usize, request: RouteRequest },
    Redirect(String),
}
// endregion: --- Route Table

// region:    --- Parsing
/// 해시를 경로와 쿼리 문자열로 분리 (경로 기본값 `/`)
pub fn parse_hash(hash: &str) -> (String, String) {
    let fragment = hash.strip_prefix('#').unwrap_or(hash);
    let (path, query) = match fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (fragment, ""),
    };
    let path = if path.is_empty() { "/" } else { path };
    (path.to_string(), query.to_string())
}

/// 쿼리 문자열을 평면 맵으로 (중복 키는 마지막 값)
pub fn parse_query(query: &str) -> Query {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|v| v.into_owned())
        .unwrap_or(spaced)
}

/// 세그먼트 단위 매칭 (`:name` 은 파라미터, 나머지는 정확히 일치, 개수도 일치)
pub fn match_route(path: &str, pattern: &str) -> Option<Params> {
    let path_parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let pattern_parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if path_parts.len() != pattern_parts.len() {
        return None;
    }

    let mut params = Params::new();
    for (pattern_part, path_part) in pattern_parts.iter().zip(path_parts.iter()) {
        match pattern_part.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), decode_component(path_part));
            }
            None if pattern_part == path_part => {}
            None => return None,
        }
    }
    Some(params)
}

/// 로그인 페이지로 보내는 경로
pub fn login_redirect(return_to: &str) -> String {
    format!("/login?returnTo={}", urlencoding::encode(return_to))
}
// endregion: --- Parsing

// region:    --- Router
pub struct Router {
    routes: Vec<Route>,
    ctx: AppContext,
}

impl Router {
    pub fn new(routes: Vec<Route>, ctx: AppContext) -> Self {
        Self { routes, ctx }
    }

    /// 경로 해석 (부수 효과 없음)
    pub fn resolve(&self, path: &str, query: Query) -> Resolution {
        for (index, route) in self.routes.iter().enumerate() {
            let Some(params) = match_route(path, route.pattern) else {
                continue;
            };

            if route.protected && !self.ctx.session.get_session().is_logged_in() {
                return Resolution::Redirect(login_redirect(path));
            }

            return Resolution::Render {
                index,
                request: RouteRequest {
                    path: path.to_string(),
                    params,
                    query,
                },
            };
        }
        Resolution::Redirect("/".to_string())
    }

    /// 현재 해시로 디스패치
    /// 렌더링은 별도 태스크에서 돌며, 핸들을 돌려준다.
    pub fn dispatch(&self) -> Option<JoinHandle<()>> {
        let (path, raw_query) = parse_hash(&self.ctx.location.hash());
        let query = parse_query(&raw_query);

        let container = ContainerId::for_path(&path);
        self.ctx.document.show(container);

        match self.resolve(&path, query) {
            Resolution::Redirect(target) => {
                info!("{:<12} --> {} → {} 리다이렉트", "Router", path, target);
                self.ctx.location.navigate(&target);
                None
            }
            Resolution::Render { index, request } => {
                let view = Arc::clone(&self.routes[index].view);
                info!("{:<12} --> {} → {} 뷰", "Router", path, view.name());
                let mount = self.ctx.document.mount(
                    container,
                    Owner {
                        view: Arc::clone(&view),
                        request: request.clone(),
                    },
                );
                debug!("{:<12} --> {:?} 마운트 gen {}", "Router", container, mount.generation());
                let ctx = ViewContext::new(self.ctx.clone(), request, mount);
                Some(tokio::spawn(async move { view.render(ctx).await }))
            }
        }
    }

    /// 이벤트 루프
    pub async fn run(self: Arc<Self>, mut events: NavEvents) {
        info!("{:<12} --> 라우터 시작 ({}개 라우트)", "Router", self.routes.len());
        while let Some(event) = events.recv().await {
            debug!("{:<12} --> {:?}: idle → dispatching", "Router", event);
            self.dispatch();
            debug!("{:<12} --> dispatching → idle", "Router");
        }
        info!("{:<12} --> 라우터 종료", "Router");
    }
}

/// 라우터 생성 및 구독 시작 (초기 load 이벤트 포함)
pub fn create_router(routes: Vec<Route>, ctx: AppContext, events: NavEvents) -> (Arc<Router>, JoinHandle<()>) {
    let router = Arc::new(Router::new(routes, ctx.clone()));
    let handle = tokio::spawn(Arc::clone(&router).run(events));
    ctx.location.emit(NavEvent::Load);
    (router, handle)
}
// endregion: --- Router
