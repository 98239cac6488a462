/// 세션 저장소
/// 인증 토큰, 사용자 정보, 캐시된 크레딧을 하나의 레코드로 저장한다.
/// 모든 읽기/쓰기는 이 모듈을 거친다.
// region:    --- Imports
pub mod storage;

use crate::auction::model::Media;
use crate::config::SESSION_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
pub use storage::{FileStorage, MemoryStorage, Storage};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Session Model
/// 세션 사용자
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionUser {
    pub name: String,
    pub email: String,
    pub avatar: Option<Media>,
}

/// 사용자 정보 부분 수정
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<Media>,
}

/// 세션 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub credit: Option<i64>,
}

impl SessionRecord {
    pub fn is_logged_in(&self) -> bool {
        self.token.as_deref().map(|t| !t.is_empty()).unwrap_or(false)
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.name.as_str()).filter(|n| !n.is_empty())
    }
}
// endregion: --- Session Model

// region:    --- Session Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 토큰 없이 세션 생성 시도
    MissingToken,
    Storage(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::MissingToken => write!(f, "set_session called without token"),
            SessionError::Storage(e) => write!(f, "session storage write failed: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}
// endregion: --- Session Error

// region:    --- Session Store
/// 세션 저장소
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            key: SESSION_STORAGE_KEY.to_string(),
        }
    }

    /// 메모리 저장소 기반 세션 (테스트용)
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// 세션 조회
    /// 손상된 데이터는 삭제하고 로그아웃 상태로 돌려준다.
    pub fn get_session(&self) -> SessionRecord {
        let Some(raw) = self.storage.get_item(&self.key) else {
            return SessionRecord::default();
        };

        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) if record.is_logged_in() => record,
            Ok(_) => SessionRecord::default(),
            Err(e) => {
                warn!(
                    "{:<12} --> 세션 데이터 손상, 초기화합니다: {}",
                    "Session", e
                );
                self.storage.remove_item(&self.key);
                SessionRecord::default()
            }
        }
    }

    /// 로그인 세션 생성 (크레딧은 비워둔다)
    pub fn set_session(&self, token: &str, user: Option<SessionUser>) -> Result<(), SessionError> {
        if token.trim().is_empty() {
            return Err(SessionError::MissingToken);
        }
        info!("{:<12} --> 세션 생성", "Session");
        self.write(&SessionRecord {
            token: Some(token.to_string()),
            user,
            credit: None,
        })
    }

    /// 사용자 정보 병합 (로그인 상태가 아니면 무시)
    pub fn update_user(&self, update: UserUpdate) -> Result<(), SessionError> {
        let mut record = self.get_session();
        if !record.is_logged_in() {
            return Ok(());
        }

        let user = record.user.get_or_insert_with(SessionUser::default);
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }
        self.write(&record)
    }

    /// 크레딧 저장 (로그인 상태가 아니면 무시)
    pub fn set_credit(&self, credit: i64) -> Result<(), SessionError> {
        let mut record = self.get_session();
        if !record.is_logged_in() {
            return Ok(());
        }
        record.credit = Some(credit);
        self.write(&record)
    }

    /// 세션 삭제
    pub fn clear_session(&self) {
        info!("{:<12} --> 세션 삭제", "Session");
        self.storage.remove_item(&self.key);
    }

    fn write(&self, record: &SessionRecord) -> Result<(), SessionError> {
        let raw = serde_json::to_string(record).map_err(|e| SessionError::Storage(e.to_string()))?;
        self.storage
            .set_item(&self.key, &raw)
            .map_err(SessionError::Storage)
    }
}
// endregion: --- Session Store
