/// 상품 카드, 입찰 카드, 입찰 표
// region:    --- Imports
use super::format::{escape_attr, escape_html, time_ago, time_left};
use crate::auction::bids::{highest_bid, sorted_by_amount, BidStatus};
use crate::auction::model::{Bid, Listing};
use chrono::{DateTime, Utc};

// endregion: --- Imports

fn status_badge(ended: bool) -> &'static str {
    if ended {
        r#"<span class="badge-neutral">Ended</span>"#
    } else {
        r#"<span class="badge-warning">Active</span>"#
    }
}

fn thumbnail(url: Option<&str>, alt: &str) -> String {
    match url.filter(|u| !u.is_empty()) {
        Some(url) => format!(
            r#"<img src="{}" alt="{}" loading="lazy" />"#,
            escape_attr(url),
            escape_attr(alt)
        ),
        None => r#"<span class="muted">No image</span>"#.to_string(),
    }
}

/// 상품 카드
pub fn listing_card(listing: &Listing, now: DateTime<Utc>) -> String {
    let title = if listing.title.is_empty() {
        "Untitled"
    } else {
        listing.title.as_str()
    };
    let price = if listing.bids.is_empty() {
        r#"<p class="bid-none">NO BID YET!</p>"#.to_string()
    } else {
        format!(
            r#"<p class="bid-highest">Highest bid <strong>{} credits</strong></p>"#,
            highest_bid(&listing.bids)
        )
    };

    format!(
        r##"<a href="#/listing/{id}" class="card listing-card"><div class="thumb">{thumb}</div><h3>{title}</h3>{badge}{price}<p class="ends-in">Ends in <span>{left}</span></p></a>"##,
        id = urlencoding::encode(&listing.id),
        thumb = thumbnail(listing.first_media().map(|m| m.url.as_str()), title),
        title = escape_html(title),
        badge = status_badge(listing.is_ended(now)),
        price = price,
        left = escape_html(&time_left(listing.ends_at, now)),
    )
}

/// 상품 카드 그리드 (비어 있으면 안내 문구)
pub fn listing_grid(listings: &[Listing], empty: &str, now: DateTime<Utc>) -> String {
    if listings.is_empty() {
        return format!(r#"<p class="muted">{}</p>"#, escape_html(empty));
    }
    let cards: String = listings.iter().map(|l| listing_card(l, now)).collect();
    format!(r#"<div class="grid">{}</div>"#, cards)
}

/// 입찰 이력 카드
pub fn bid_card(bid: &Bid, status: Option<BidStatus>, now: DateTime<Utc>) -> String {
    let listing = bid.listing.as_deref();
    let title = listing
        .map(|l| l.title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or("Listing");
    let thumb = listing
        .and_then(|l| l.first_media())
        .map(|m| thumbnail(Some(&m.url), if m.alt.is_empty() { title } else { m.alt.as_str() }))
        .unwrap_or_else(|| thumbnail(None, title));
    let badge = status
        .map(|s| format!(r#"<span class="bid-status bid-{}">{}</span>"#, s.as_str(), s.label()))
        .unwrap_or_default();
    let ends_in = listing
        .map(|l| time_left(l.ends_at, now))
        .filter(|t| !t.is_empty())
        .map(|t| format!(r#"<p class="muted">Ends in {}</p>"#, escape_html(&t)))
        .unwrap_or_default();
    let placed = bid.created.map(|c| time_ago(c, now)).unwrap_or_default();

    let body = format!(
        r#"<div class="thumb">{thumb}</div><div><h3>{title}</h3>{badge}<p>Bid: <strong>{amount} Credits</strong></p>{ends_in}<p class="muted">Bid placed {placed}</p></div>"#,
        thumb = thumb,
        title = escape_html(title),
        badge = badge,
        amount = bid.amount,
        ends_in = ends_in,
        placed = escape_html(&placed),
    );

    match listing.map(|l| l.id.as_str()).filter(|id| !id.is_empty()) {
        Some(id) => format!(
            r##"<a href="#/listing/{}" class="card bid-card">{}</a>"##,
            urlencoding::encode(id),
            body
        ),
        None => format!(r#"<article class="card bid-card">{}</article>"#, body),
    }
}

/// 상품 상세의 입찰 표 (금액 내림차순)
pub fn bids_table(bids: &[Bid]) -> String {
    if bids.is_empty() {
        return "<p>No bids yet.</p>".to_string();
    }
    let rows: String = sorted_by_amount(bids)
        .into_iter()
        .map(|b| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(b.bidder_name().unwrap_or("—")),
                b.amount,
                b.created
                    .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default()
            )
        })
        .collect();
    format!(
        r#"<table class="bids"><thead><tr><th>Bidder</th><th>Amount</th><th>Time</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    )
}
