/// 상품 목록 조회 조건
/// API 쿼리 파라미터(sort, sortOrder, _active, _seller, _bids)와
/// 검색 결과에 적용하는 클라이언트 측 정렬/필터
// region:    --- Imports
use crate::auction::model::Listing;
use chrono::{DateTime, Utc};

// endregion: --- Imports

// region:    --- Options
/// 정렬 옵션
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    CreatedDesc,
    EndsAsc,
    BidsDesc,
}

impl SortOption {
    /// 폼 값 파싱 (알 수 없는 값은 기본값)
    pub fn parse(value: &str) -> Self {
        match value {
            "ends_asc" => SortOption::EndsAsc,
            "bids_desc" => SortOption::BidsDesc,
            _ => SortOption::CreatedDesc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::CreatedDesc => "created_desc",
            SortOption::EndsAsc => "ends_asc",
            SortOption::BidsDesc => "bids_desc",
        }
    }

    /// API `sort`, `sortOrder` 값
    pub fn api_params(&self) -> (&'static str, &'static str) {
        match self {
            SortOption::CreatedDesc => ("created", "desc"),
            SortOption::EndsAsc => ("endsAt", "asc"),
            SortOption::BidsDesc => ("bids", "desc"),
        }
    }
}

/// 상태 필터
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Ended,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Self {
        match value {
            "active" => StatusFilter::Active,
            "ended" => StatusFilter::Ended,
            _ => StatusFilter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Ended => "ended",
        }
    }

    /// API `_active` 값 (전체 조회는 생략)
    pub fn api_param(&self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(true),
            StatusFilter::Ended => Some(false),
        }
    }

    pub fn matches(&self, listing: &Listing, now: DateTime<Utc>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !listing.is_ended(now),
            StatusFilter::Ended => listing.is_ended(now),
        }
    }
}
// endregion: --- Options

// region:    --- Listing Query
/// 상품 목록 조회 조건
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: String,
    pub sort: SortOption,
    pub status: StatusFilter,
}

impl ListingQuery {
    /// 앞뒤 공백을 제거한 검색어 (없으면 None)
    pub fn search_term(&self) -> Option<&str> {
        Some(self.search.trim()).filter(|q| !q.is_empty())
    }

    /// API 쿼리 파라미터
    pub fn api_params(&self) -> Vec<(&'static str, String)> {
        let (sort, order) = self.sort.api_params();
        let mut params = vec![
            ("sort", sort.to_string()),
            ("sortOrder", order.to_string()),
            ("_seller", "true".to_string()),
            ("_bids", "true".to_string()),
        ];
        if let Some(q) = self.search_term() {
            params.insert(0, ("q", q.to_string()));
        }
        if let Some(active) = self.status.api_param() {
            params.push(("_active", active.to_string()));
        }
        params
    }
}

/// 클라이언트 측 필터 및 정렬
pub fn apply(listings: Vec<Listing>, query: &ListingQuery, now: DateTime<Utc>) -> Vec<Listing> {
    let mut listings: Vec<Listing> = listings
        .into_iter()
        .filter(|l| query.status.matches(l, now))
        .collect();

    match query.sort {
        SortOption::CreatedDesc => listings.sort_by(|a, b| b.created.cmp(&a.created)),
        SortOption::EndsAsc => listings.sort_by(|a, b| match (a.ends_at, b.ends_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }),
        SortOption::BidsDesc => listings.sort_by(|a, b| b.bid_count().cmp(&a.bid_count())),
    }
    listings
}
// endregion: --- Listing Query
