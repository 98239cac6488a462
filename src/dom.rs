/// 화면 모델
/// 두 개의 뷰 컨테이너(home, app)와 헤더 영역, 선언적 이벤트 바인딩.
/// 뷰는 마크업 문자열과 바인딩 목록을 만들고, 마운트를 통해서만 컨테이너를 바꾼다.
// region:    --- Imports
use crate::router::RouteRequest;
use crate::views::View;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

// endregion: --- Imports

/// 폼 입력 값
pub type FormData = BTreeMap<String, String>;

// region:    --- Rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Submit,
    KeyDown,
}

/// 요소 id + 이벤트 → 액션 이름
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub target: String,
    pub event: EventKind,
    pub action: String,
}

/// 렌더링 결과
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub markup: String,
    pub bindings: Vec<Binding>,
}

impl Rendered {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            bindings: Vec::new(),
        }
    }

    pub fn on(mut self, target: impl Into<String>, event: EventKind, action: impl Into<String>) -> Self {
        self.bindings.push(Binding {
            target: target.into(),
            event,
            action: action.into(),
        });
        self
    }

    pub fn on_click(self, target: impl Into<String>, action: impl Into<String>) -> Self {
        self.on(target, EventKind::Click, action)
    }

    pub fn on_submit(self, target: impl Into<String>, action: impl Into<String>) -> Self {
        self.on(target, EventKind::Submit, action)
    }

    /// 다른 렌더링 결과를 이어 붙인다
    pub fn push(&mut self, other: Rendered) {
        self.markup.push_str(&other.markup);
        self.bindings.extend(other.bindings);
    }

    pub fn action_for(&self, target: &str, event: EventKind) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.target == target && b.event == event)
            .map(|b| b.action.as_str())
    }
}
// endregion: --- Rendered

// region:    --- Containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerId {
    Home,
    App,
}

impl ContainerId {
    /// 루트 경로만 home 컨테이너를 쓴다
    pub fn for_path(path: &str) -> Self {
        if path == "/" {
            ContainerId::Home
        } else {
            ContainerId::App
        }
    }
}

/// 컨테이너를 소유한 뷰와 요청
#[derive(Clone)]
pub struct Owner {
    pub view: Arc<dyn View>,
    pub request: RouteRequest,
}

#[derive(Default)]
struct Container {
    visible: bool,
    content: Rendered,
    generation: u64,
    owner: Option<Owner>,
}

impl Container {
    fn reset(&mut self) {
        self.generation += 1;
        self.content = Rendered::default();
        self.owner = None;
    }
}

#[derive(Default)]
struct DocumentState {
    home: Container,
    app: Container,
    header: Rendered,
}

impl DocumentState {
    fn container(&mut self, id: ContainerId) -> &mut Container {
        match id {
            ContainerId::Home => &mut self.home,
            ContainerId::App => &mut self.app,
        }
    }
}
// endregion: --- Containers

// region:    --- Document
/// 바인딩 조회 결과
pub enum BindingTarget {
    Header(String),
    View {
        action: String,
        owner: Owner,
        mount: Mount,
    },
}

#[derive(Clone, Default)]
pub struct Document {
    state: Arc<Mutex<DocumentState>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// 컨테이너 전환
    /// home 을 보이면 app 컨테이너 내용은 비운다.
    pub fn show(&self, id: ContainerId) {
        let mut state = self.state.lock();
        match id {
            ContainerId::Home => {
                state.home.visible = true;
                state.app.visible = false;
                state.app.reset();
            }
            ContainerId::App => {
                state.app.visible = true;
                state.home.visible = false;
            }
        }
    }

    /// 뷰를 컨테이너에 마운트 (이전 렌더링은 무효가 된다)
    pub fn mount(&self, id: ContainerId, owner: Owner) -> Mount {
        let mut state = self.state.lock();
        let container = state.container(id);
        container.reset();
        container.owner = Some(owner);
        Mount {
            document: self.clone(),
            id,
            generation: container.generation,
        }
    }

    pub fn visible(&self) -> Option<ContainerId> {
        let state = self.state.lock();
        if state.home.visible {
            Some(ContainerId::Home)
        } else if state.app.visible {
            Some(ContainerId::App)
        } else {
            None
        }
    }

    pub fn is_visible(&self, id: ContainerId) -> bool {
        self.state.lock().container(id).visible
    }

    pub fn markup(&self, id: ContainerId) -> String {
        self.state.lock().container(id).content.markup.clone()
    }

    pub fn content(&self, id: ContainerId) -> Rendered {
        self.state.lock().container(id).content.clone()
    }

    pub fn header(&self) -> Rendered {
        self.state.lock().header.clone()
    }

    pub fn set_header(&self, header: Rendered) {
        self.state.lock().header = header;
    }

    /// 헤더 → 보이는 컨테이너 순서로 바인딩 조회
    pub fn find_binding(&self, target: &str, event: EventKind) -> Option<BindingTarget> {
        let mut state = self.state.lock();
        if let Some(action) = state.header.action_for(target, event) {
            return Some(BindingTarget::Header(action.to_string()));
        }

        let id = if state.home.visible {
            ContainerId::Home
        } else if state.app.visible {
            ContainerId::App
        } else {
            return None;
        };
        let container = state.container(id);
        let action = container.content.action_for(target, event)?.to_string();
        let owner = container.owner.clone()?;
        Some(BindingTarget::View {
            action,
            owner,
            mount: Mount {
                document: self.clone(),
                id,
                generation: container.generation,
            },
        })
    }
}
// endregion: --- Document

// region:    --- Mount
/// 컨테이너에 대한 렌더링 권한
/// 같은 컨테이너에 새 뷰가 마운트되면 이전 마운트의 렌더링은 버려진다.
#[derive(Clone)]
pub struct Mount {
    document: Document,
    id: ContainerId,
    generation: u64,
}

impl Mount {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.document.state.lock().container(self.id).generation == self.generation
    }

    /// 렌더링 적용. 세대가 지났으면 버리고 false.
    pub fn commit(&self, rendered: Rendered) -> bool {
        let mut state = self.document.state.lock();
        let container = state.container(self.id);
        if container.generation != self.generation {
            debug!(
                "{:<12} --> {:?} 컨테이너의 지난 렌더링 폐기 (gen {} < {})",
                "Document", self.id, self.generation, container.generation
            );
            return false;
        }
        container.content = rendered;
        true
    }
}
// endregion: --- Mount
