/// 입찰 관련 계산
/// 1. 최고 입찰가
/// 2. 사용자 기준 입찰 상태 (낙찰/유찰/선두/추월당함)
// region:    --- Imports
use super::model::{Bid, Listing};
use chrono::{DateTime, Utc};
use std::fmt;

// endregion: --- Imports

// region:    --- Highest Bid
/// 최고 입찰가 (입찰이 없으면 0)
pub fn highest_bid(bids: &[Bid]) -> i64 {
    bids.iter().map(|b| b.amount).max().unwrap_or(0)
}

/// 최고 입찰 (동일 금액이면 먼저 들어온 입찰)
pub fn top_bid(bids: &[Bid]) -> Option<&Bid> {
    bids.iter().fold(None, |best: Option<&Bid>, bid| match best {
        Some(current) if current.amount >= bid.amount => Some(current),
        _ => Some(bid),
    })
}

/// 금액 내림차순 정렬된 입찰 목록
pub fn sorted_by_amount(bids: &[Bid]) -> Vec<&Bid> {
    let mut sorted: Vec<&Bid> = bids.iter().collect();
    sorted.sort_by(|a, b| b.amount.cmp(&a.amount));
    sorted
}
// endregion: --- Highest Bid

// region:    --- Bid Status
/// 사용자 기준 입찰 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidStatus {
    Won,
    Lost,
    Leading,
    Outbid,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Won => "won",
            BidStatus::Lost => "lost",
            BidStatus::Leading => "leading",
            BidStatus::Outbid => "outbid",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BidStatus::Won => "Won",
            BidStatus::Lost => "Lost",
            BidStatus::Leading => "Leading",
            BidStatus::Outbid => "Outbid",
        }
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 상품의 최고 입찰자와 마감 시간을 기준으로 상태 계산
/// 입찰이 없는 상품은 상태를 계산하지 않는다.
pub fn bid_status(listing: &Listing, user_name: &str, now: DateTime<Utc>) -> Option<BidStatus> {
    let top = top_bid(&listing.bids)?;
    let is_top_bidder = top.bidder_name() == Some(user_name);
    let ended = listing.ends_at.map(|end| end < now).unwrap_or(false);

    Some(match (ended, is_top_bidder) {
        (true, true) => BidStatus::Won,
        (true, false) => BidStatus::Lost,
        (false, true) => BidStatus::Leading,
        (false, false) => BidStatus::Outbid,
    })
}
// endregion: --- Bid Status
