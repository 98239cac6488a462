// region:    --- Imports
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

// endregion: --- Imports

/// 내비게이션 이벤트
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    Load,
    HashChange,
}

/// 라우터가 구독하는 이벤트 수신기
pub type NavEvents = UnboundedReceiver<NavEvent>;

/// 해시 기반 위치
/// 해시를 바꾸면 hashchange 이벤트가 큐에 들어가고, 디스패치는 라우터 루프에서 비동기로 일어난다.
#[derive(Clone)]
pub struct Location {
    hash: Arc<Mutex<String>>,
    events: UnboundedSender<NavEvent>,
}

impl Location {
    pub fn new() -> (Self, NavEvents) {
        let (events, rx) = mpsc::unbounded_channel();
        let location = Self {
            hash: Arc::new(Mutex::new(String::new())),
            events,
        };
        (location, rx)
    }

    pub fn hash(&self) -> String {
        self.hash.lock().clone()
    }

    /// 경로로 이동 (`#` + path)
    pub fn navigate(&self, path: &str) {
        let next = format!("#{}", path);
        {
            let mut hash = self.hash.lock();
            // 같은 해시로의 이동은 hashchange 를 만들지 않는다
            if *hash == next {
                return;
            }
            *hash = next;
        }
        debug!("{:<12} --> navigate {}", "Location", path);
        self.emit(NavEvent::HashChange);
    }

    pub fn emit(&self, event: NavEvent) {
        if self.events.send(event).is_err() {
            debug!("{:<12} --> 라우터가 없어 이벤트 무시: {:?}", "Location", event);
        }
    }
}
