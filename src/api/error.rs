// region:    --- Imports
use serde_json::Value;
use std::fmt;

// endregion: --- Imports

// region:    --- Api Error
/// 네트워크 실패 시 사용자에게 보여줄 메시지
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "Network request failed. Check your connection and try again.";

/// 응답 해석 실패 시 메시지
pub const DECODE_FAILURE_MESSAGE: &str = "Unexpected response from the server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 요청을 보내지 못했거나 응답을 읽지 못함
    Transport,
    /// 성공이 아닌 HTTP 상태
    Http,
    /// 성공 응답이지만 기대한 형태가 아님
    Decode,
}

/// API 호출 오류
/// 사람이 읽을 수 있는 메시지, 상태 코드, 원본 응답을 함께 가진다.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub payload: Value,
}

impl ApiError {
    pub fn transport() -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            message: TRANSPORT_FAILURE_MESSAGE.to_string(),
            status: None,
            payload: Value::Null,
        }
    }

    pub fn decode(payload: Value) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            message: DECODE_FAILURE_MESSAGE.to_string(),
            status: None,
            payload,
        }
    }

    /// 실패 응답에서 오류 생성
    pub fn from_response(status: u16, payload: Value) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: error_message(status, &payload),
            status: Some(status),
            payload,
        }
    }

    pub fn is_status(&self, status: u16) -> bool {
        self.status == Some(status)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}
// endregion: --- Api Error

// region:    --- Message Extraction
/// 오류 메시지 추출 우선순위
/// 1. `message`
/// 2. `error`
/// 3. `errors[0].message`
/// 4. 기본 메시지
pub fn error_message(status: u16, payload: &Value) -> String {
    let text = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    text(payload.get("message"))
        .or_else(|| text(payload.get("error")))
        .or_else(|| {
            text(
                payload
                    .get("errors")
                    .and_then(Value::as_array)
                    .and_then(|errors| errors.first())
                    .and_then(|first| first.get("message")),
            )
        })
        .unwrap_or_else(|| format!("Request failed (HTTP {}).", status))
}
// endregion: --- Message Extraction
