/// API 게이트웨이
/// URL 조립, 인증/API 키 헤더 부착, JSON 직렬화, 오류 정규화.
/// 재시도/타임아웃은 하지 않는다. 호출은 한 번 성공하거나 한 번 실패한다.
// region:    --- Imports
pub mod endpoints;
pub mod error;

use crate::config::{Config, API_KEY_HEADER, AUCTION_PATH};
use crate::session::SessionStore;
pub use error::{ApiError, ApiErrorKind};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

// endregion: --- Imports

// region:    --- Request Options
/// 요청 옵션 (쿼리, 추가 헤더)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 쿼리 값 설정. 빈 값은 건너뛰고 같은 키는 덮어쓴다.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        let value = value.to_string();
        if value.is_empty() {
            return self;
        }
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.query.push((key, value)),
        }
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
// endregion: --- Request Options

// region:    --- Api Client
/// API 클라이언트
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionStore) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// 요청 실행
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let url = resolve_url(&self.base_url, path);
        debug!("{:<12} --> {} {}", "Api", method, url);

        let headers = self.build_headers(&options.headers)?;
        let mut builder = self.http.request(method.clone(), &url).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = body {
            let raw = serde_json::to_string(body).map_err(|e| {
                error!("{:<12} --> 요청 본문 직렬화 실패: {}", "Api", e);
                ApiError::transport()
            })?;
            builder = builder.body(raw);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("{:<12} --> {} {} 전송 실패: {}", "Api", method, url, e);
            ApiError::transport()
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            warn!("{:<12} --> {} {} 응답 읽기 실패: {}", "Api", method, url, e);
            ApiError::transport()
        })?;
        let payload = parse_body(&text);

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), payload);
            warn!(
                "{:<12} --> {} {} 실패 ({}): {}",
                "Api", method, url, status, err.message
            );
            return Err(err);
        }

        Ok(payload)
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        self.request(Method::GET, path, None, options).await
    }

    pub async fn post(&self, path: &str, body: &Value, options: RequestOptions) -> Result<Value, ApiError> {
        self.request(Method::POST, path, Some(body), options).await
    }

    pub async fn put(&self, path: &str, body: &Value, options: RequestOptions) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, Some(body), options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, None, options).await
    }

    /// 기본 헤더 (content-type, API 키, bearer) 위에 호출자 헤더를 덮어쓴다
    fn build_headers(&self, extra: &[(String, String)]) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            insert_header(&mut headers, API_KEY_HEADER, key)?;
        }

        if let Some(token) = self.session.get_session().token.filter(|t| !t.is_empty()) {
            insert_header(&mut headers, AUTHORIZATION.as_str(), &format!("Bearer {}", token))?;
        }

        for (name, value) in extra {
            insert_header(&mut headers, name, value)?;
        }
        Ok(headers)
    }
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), ApiError> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        error!("{:<12} --> 잘못된 헤더 이름 {}: {}", "Api", name, e);
        ApiError::transport()
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|e| {
        error!("{:<12} --> 잘못된 헤더 값 {}: {}", "Api", name, e);
        ApiError::transport()
    })?;
    headers.insert(header_name, header_value);
    Ok(())
}
// endregion: --- Api Client

// region:    --- Helpers
/// 상대 경로를 절대 URL로 변환
/// `/auth/...` 는 루트, 나머지는 `/auction` 아래에 둔다.
pub fn resolve_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    let already_prefixed = path == AUCTION_PATH
        || path
            .strip_prefix(AUCTION_PATH)
            .map(|rest| rest.starts_with('/') || rest.starts_with('?'))
            .unwrap_or(false);

    if path.starts_with("/auth/") || already_prefixed {
        format!("{}{}", base, path)
    } else {
        format!("{}{}{}", base, AUCTION_PATH, path)
    }
}

/// 응답 본문 파싱
/// 빈 본문은 null, JSON이 아니면 원문 문자열.
pub fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// `{data, meta}` 봉투를 벗긴 값
pub fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// 봉투/단일 값 모두 허용하여 역직렬화
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let data = unwrap_data(value);
    serde_json::from_value(data.clone()).map_err(|e| {
        warn!("{:<12} --> 응답 해석 실패: {}", "Api", e);
        ApiError::decode(data)
    })
}

/// 목록 역직렬화. 배열이 아니면 빈 목록, 해석할 수 없는 원소는 건너뛴다.
pub fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ApiError> {
    let Value::Array(items) = unwrap_data(value) else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("{:<12} --> 목록 {}번째 원소 건너뜀: {}", "Api", index, e);
                None
            }
        })
        .collect())
}
// endregion: --- Helpers
