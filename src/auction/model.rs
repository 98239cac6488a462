use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

// region:    --- Media
/// 이미지 정보
/// API는 `{url, alt}` 객체나 URL 문자열 하나로 내려줄 수 있다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MediaRepr")]
pub struct Media {
    pub url: String,
    pub alt: String,
}

impl Media {
    pub fn new(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: alt.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MediaRepr {
    Url(String),
    Full {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        alt: Option<String>,
    },
}

impl From<MediaRepr> for Media {
    fn from(repr: MediaRepr) -> Self {
        match repr {
            MediaRepr::Url(url) => Media::new(url, ""),
            MediaRepr::Full { url, alt } => Media::new(url.unwrap_or_default(), alt.unwrap_or_default()),
        }
    }
}
// endregion: --- Media

// region:    --- Profile
/// 판매자/입찰자 참조
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRef {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<Media>,
}

/// 프로필 모델
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<Media>,
    pub banner: Option<Media>,
    #[serde(deserialize_with = "lenient_optional_amount")]
    pub credits: Option<i64>,
}

/// 프로필 수정 요청
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Media>,
}
// endregion: --- Profile

// region:    --- Listing
/// 입찰 모델
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bid {
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_amount")]
    pub amount: i64,
    pub bidder: Option<ProfileRef>,
    #[serde(deserialize_with = "lenient_datetime")]
    pub created: Option<DateTime<Utc>>,
    /// `_listings=true` 로 조회한 경우에만 채워진다
    pub listing: Option<Box<Listing>>,
}

impl Bid {
    pub fn bidder_name(&self) -> Option<&str> {
        self.bidder.as_ref().map(|b| b.name.as_str()).filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingCount {
    #[serde(deserialize_with = "null_default")]
    pub bids: u64,
}

/// 경매 상품 모델
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Listing {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub media: Vec<Media>,
    #[serde(deserialize_with = "lenient_datetime")]
    pub created: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_datetime")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_datetime")]
    pub ends_at: Option<DateTime<Utc>>,
    pub seller: Option<ProfileRef>,
    #[serde(deserialize_with = "lenient_list")]
    pub bids: Vec<Bid>,
    #[serde(rename = "_count")]
    pub count: Option<ListingCount>,
}

impl Listing {
    /// 마감 여부 (마감 시간을 모르면 진행 중으로 본다)
    pub fn is_ended(&self, now: DateTime<Utc>) -> bool {
        self.ends_at.map(|end| end <= now).unwrap_or(false)
    }

    pub fn seller_name(&self) -> Option<&str> {
        self.seller.as_ref().map(|s| s.name.as_str()).filter(|n| !n.is_empty())
    }

    pub fn first_media(&self) -> Option<&Media> {
        self.media.iter().find(|m| !m.url.is_empty())
    }

    /// 입찰 수 (`_count`가 있으면 우선)
    pub fn bid_count(&self) -> u64 {
        self.count
            .as_ref()
            .map(|c| c.bids)
            .unwrap_or(self.bids.len() as u64)
    }
}

/// 상품 생성/수정 요청
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub media: Vec<Media>,
    pub ends_at: DateTime<Utc>,
}
// endregion: --- Listing

// region:    --- Auth
/// 로그인 응답
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub email: String,
    pub avatar: Option<Media>,
    pub access_token: Option<String>,
}

/// 회원 가입 요청
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}
// endregion: --- Auth

/// 날짜 파싱 실패는 값 없음으로 처리
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc)))
}

/// null 은 기본값으로
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 목록 원소 중 해석할 수 없는 것은 건너뛴다
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let items = match raw {
        Some(serde_json::Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// 금액: 정수, 실수, 숫자 문자열 허용
fn parse_amount(raw: Option<serde_json::Value>) -> Option<i64> {
    match raw? {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_amount(Option::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_amount<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_amount(Option::deserialize(deserializer)?))
}
