/// 토스트 알림
/// 최근 3개까지만 유지하고, 넘치면 가장 오래된 것부터 제거한다.
/// 각 토스트는 일정 시간 뒤 자동으로 닫힌다.
// region:    --- Imports
use super::format::escape_html;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

// endregion: --- Imports

/// 동시에 보이는 토스트 최대 개수
pub const MAX_TOASTS: usize = 3;

// region:    --- Toast Queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

/// 토스트 큐 (시간은 호출자가 넘긴다)
#[derive(Debug)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    next_id: u64,
    timeout: Duration,
}

impl ToastQueue {
    pub fn new(timeout: Duration) -> Self {
        Self {
            toasts: VecDeque::with_capacity(MAX_TOASTS),
            next_id: 1,
            timeout,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push_back(Toast {
            id,
            message: message.into(),
            kind,
            shown_at: now,
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// 시간이 지난 토스트 제거
    pub fn expire(&mut self, now: Instant) {
        let timeout = self.timeout;
        self.toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < timeout);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
// endregion: --- Toast Queue

// region:    --- Toaster
/// 토스트 닫기 버튼 id 접두사 (`dismissToast-{id}`)
pub const DISMISS_PREFIX: &str = "dismissToast-";

/// 닫기 버튼 id 에서 토스트 id 추출
pub fn dismiss_target(target: &str) -> Option<u64> {
    target.strip_prefix(DISMISS_PREFIX)?.parse().ok()
}

/// 공유 토스트 큐 + 자동 닫힘 예약
#[derive(Clone)]
pub struct Toaster {
    queue: Arc<Mutex<ToastQueue>>,
    timeout: Duration,
}

impl Toaster {
    pub fn new(timeout: Duration) -> Self {
        Self {
            queue: Arc::new(Mutex::new(ToastQueue::new(timeout))),
            timeout,
        }
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Error)
    }

    pub fn show(&self, message: impl Into<String>, kind: ToastKind) -> u64 {
        let message = message.into();
        info!("{:<12} --> [{:?}] {}", "Toast", kind, message);
        let id = self.queue.lock().push(message, kind, Instant::now());

        // 런타임이 없으면 다음 조회 때 만료 처리된다
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let queue = Arc::clone(&self.queue);
            let timeout = self.timeout;
            handle.spawn(async move {
                tokio::time::sleep(timeout).await;
                if queue.lock().dismiss(id) {
                    debug!("{:<12} --> 자동 닫힘 id: {}", "Toast", id);
                }
            });
        }
        id
    }

    pub fn dismiss(&self, id: u64) -> bool {
        self.queue.lock().dismiss(id)
    }

    /// 현재 보이는 토스트
    pub fn visible(&self) -> Vec<Toast> {
        let mut queue = self.queue.lock();
        queue.expire(Instant::now());
        queue.visible().cloned().collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.visible().into_iter().map(|t| t.message).collect()
    }

    pub fn render(&self) -> String {
        self.visible()
            .iter()
            .map(|t| {
                let class = match t.kind {
                    ToastKind::Success => "toast-success",
                    ToastKind::Error => "toast-error",
                };
                format!(
                    r#"<div class="toast {class}" role="status">{message}<button id="{prefix}{id}" type="button" aria-label="Dismiss">×</button></div>"#,
                    class = class,
                    message = escape_html(&t.message),
                    prefix = DISMISS_PREFIX,
                    id = t.id,
                )
            })
            .collect()
    }
}
// endregion: --- Toaster
