// region:    --- Imports
use std::env;
use std::path::PathBuf;
use std::time::Duration;

// endregion: --- Imports

// region:    --- Constants
/// 기본 API 주소
pub const DEFAULT_API_BASE_URL: &str = "https://v2.api.noroff.dev";

/// 인증 엔드포인트를 제외한 모든 리소스가 위치하는 경로
pub const AUCTION_PATH: &str = "/auction";

/// API 키 헤더 이름
pub const API_KEY_HEADER: &str = "X-Noroff-API-Key";

/// 세션 레코드가 저장되는 키
pub const SESSION_STORAGE_KEY: &str = "auction_auth_v2";

/// 토스트 자동 닫힘 시간
pub const DEFAULT_TOAST_TIMEOUT: Duration = Duration::from_millis(3500);

/// 세션 파일 기본 디렉터리
pub const DEFAULT_STORAGE_DIR: &str = ".auction-client";

const ENV_API_BASE_URL: &str = "AUCTION_API_BASE_URL";
const ENV_API_KEY: &str = "AUCTION_API_KEY";
const ENV_STORAGE_DIR: &str = "AUCTION_STORAGE_DIR";
// endregion: --- Constants

// region:    --- Config
/// 클라이언트 설정
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub storage_dir: PathBuf,
    pub toast_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            toast_timeout: DEFAULT_TOAST_TIMEOUT,
        }
    }
}

impl Config {
    /// 환경 변수 → 빌드 시 주입 값 → 기본값 순서로 설정 로드
    pub fn from_env() -> Self {
        let api_base_url = resolve(
            env::var(ENV_API_BASE_URL).ok(),
            option_env!("AUCTION_API_BASE_URL"),
        )
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_key = resolve(env::var(ENV_API_KEY).ok(), option_env!("AUCTION_API_KEY"));
        let storage_dir = env::var(ENV_STORAGE_DIR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));

        Self::default()
            .with_api_base_url(api_base_url)
            .with_api_key(api_key)
            .with_storage_dir(storage_dir)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    pub fn with_toast_timeout(mut self, timeout: Duration) -> Self {
        self.toast_timeout = timeout;
        self
    }
}

fn resolve(runtime: Option<String>, build_time: Option<&'static str>) -> Option<String> {
    let clean = |v: &str| Some(v.trim().to_string()).filter(|v| !v.is_empty());
    runtime
        .as_deref()
        .and_then(clean)
        .or_else(|| build_time.and_then(clean))
}
// endregion: --- Config
