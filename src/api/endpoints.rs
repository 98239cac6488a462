/// 경매 API 엔드포인트
// region:    --- Imports
use super::{decode, decode_list, ApiClient, ApiError, RequestOptions};
use crate::auction::model::{
    AuthResponse, Bid, Listing, NewListing, Profile, ProfileUpdate, RegisterRequest,
};
use crate::query::ListingQuery;
use crate::session::UserUpdate;
use serde_json::{json, Value};
use tracing::{info, warn};

// endregion: --- Imports

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|_| ApiError::decode(Value::Null))
}

fn listing_path(id: &str, suffix: &str) -> String {
    format!("/listings/{}{}", urlencoding::encode(id), suffix)
}

fn with_details() -> RequestOptions {
    RequestOptions::new().query("_seller", true).query("_bids", true)
}

// region:    --- Auth
impl ApiClient {
    /// 로그인
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        info!("{:<12} --> 로그인 요청: {}", "Api", email);
        let body = json!({ "email": email, "password": password });
        let res = self.post("/auth/login", &body, RequestOptions::new()).await?;
        decode(res)
    }

    /// 회원 가입
    pub async fn register(&self, request: &RegisterRequest) -> Result<Profile, ApiError> {
        info!("{:<12} --> 회원 가입 요청: {}", "Api", request.name);
        let res = self
            .post("/auth/register", &to_body(request)?, RequestOptions::new())
            .await?;
        decode(res)
    }
}
// endregion: --- Auth

// region:    --- Listings
impl ApiClient {
    /// 상품 목록 (검색어가 있으면 검색 엔드포인트)
    pub async fn listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, ApiError> {
        let path = if query.search_term().is_some() {
            "/listings/search"
        } else {
            "/listings"
        };
        let options = query
            .api_params()
            .into_iter()
            .fold(RequestOptions::new(), |opts, (k, v)| opts.query(k, v));
        decode_list(self.get(path, options).await?)
    }

    /// 상품 상세 (판매자, 입찰 포함)
    pub async fn listing(&self, id: &str) -> Result<Listing, ApiError> {
        let res = self.get(&listing_path(id, ""), with_details()).await?;
        decode(res)
    }

    pub async fn create_listing(&self, listing: &NewListing) -> Result<Listing, ApiError> {
        info!("{:<12} --> 상품 생성: {}", "Api", listing.title);
        let res = self
            .post("/listings", &to_body(listing)?, RequestOptions::new())
            .await?;
        decode(res)
    }

    pub async fn update_listing(&self, id: &str, listing: &NewListing) -> Result<Listing, ApiError> {
        info!("{:<12} --> 상품 수정 id: {}", "Api", id);
        let res = self
            .put(&listing_path(id, ""), &to_body(listing)?, RequestOptions::new())
            .await?;
        decode(res)
    }

    pub async fn delete_listing(&self, id: &str) -> Result<(), ApiError> {
        info!("{:<12} --> 상품 삭제 id: {}", "Api", id);
        self.delete(&listing_path(id, ""), RequestOptions::new())
            .await
            .map(|_| ())
    }

    /// 입찰
    pub async fn place_bid(&self, id: &str, amount: i64) -> Result<Value, ApiError> {
        info!("{:<12} --> 입찰 요청 id: {}, amount: {}", "Api", id, amount);
        self.post(
            &listing_path(id, "/bids"),
            &json!({ "amount": amount }),
            RequestOptions::new(),
        )
        .await
    }
}
// endregion: --- Listings

// region:    --- Profiles
impl ApiClient {
    pub async fn profile(&self, name: &str) -> Result<Profile, ApiError> {
        decode(self.get(&profile_path(name, ""), RequestOptions::new()).await?)
    }

    pub async fn profile_listings(&self, name: &str) -> Result<Vec<Listing>, ApiError> {
        decode_list(self.get(&profile_path(name, "/listings"), with_details()).await?)
    }

    pub async fn profile_wins(&self, name: &str) -> Result<Vec<Listing>, ApiError> {
        decode_list(self.get(&profile_path(name, "/wins"), with_details()).await?)
    }

    /// 사용자 입찰 이력 (상품 포함)
    pub async fn profile_bids(&self, name: &str) -> Result<Vec<Bid>, ApiError> {
        let options = RequestOptions::new().query("_listings", true);
        decode_list(self.get(&profile_path(name, "/bids"), options).await?)
    }

    pub async fn update_profile(&self, name: &str, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        info!("{:<12} --> 프로필 수정: {}", "Api", name);
        let res = self
            .put(&profile_path(name, ""), &to_body(update)?, RequestOptions::new())
            .await?;
        decode(res)
    }

    /// 로그인 사용자의 크레딧 갱신
    /// 실패하면 캐시된 값을 돌려준다.
    pub async fn refresh_credit(&self) -> Option<i64> {
        let session = self.session().get_session();
        let name = session.user_name()?.to_string();

        match self.profile(&name).await {
            Ok(profile) => {
                let cached_user = session.user.clone().unwrap_or_default();
                let update = UserUpdate {
                    name: Some(profile.name).filter(|n| !n.is_empty()),
                    email: profile.email.or(Some(cached_user.email)),
                    avatar: profile.avatar.or(cached_user.avatar),
                };
                if let Err(e) = self.session().update_user(update) {
                    warn!("{:<12} --> 사용자 정보 저장 실패: {}", "Api", e);
                }

                match profile.credits {
                    Some(credit) => {
                        if let Err(e) = self.session().set_credit(credit) {
                            warn!("{:<12} --> 크레딧 저장 실패: {}", "Api", e);
                        }
                        Some(credit)
                    }
                    None => session.credit,
                }
            }
            Err(e) => {
                warn!("{:<12} --> 크레딧 갱신 실패: {}", "Api", e);
                session.credit
            }
        }
    }
}

fn profile_path(name: &str, suffix: &str) -> String {
    format!("/profiles/{}{}", urlencoding::encode(name), suffix)
}
// endregion: --- Profiles
