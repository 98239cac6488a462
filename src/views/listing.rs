// region:    --- Imports
use super::{feedback, field, loading_panel, View, ViewContext};
use crate::auction::bids::highest_bid;
use crate::auction::model::Listing;
use crate::dom::{FormData, Rendered};
use crate::router::login_redirect;
use crate::session::SessionRecord;
use crate::ui::cards::bids_table;
use crate::ui::format::{escape_attr, escape_html, format_ends_at};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{info, warn};

// endregion: --- Imports

/// 상품 상세
#[derive(Default)]
pub struct ListingView {
    // 마지막으로 받은 상품 (입찰 검증, 오류 표시 재렌더링용)
    last: Mutex<Option<Listing>>,
}

impl ListingView {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self, id: &str) -> Option<Listing> {
        self.last.lock().clone().filter(|l| l.id == id)
    }

    fn show(&self, ctx: &ViewContext, listing: &Listing, error: Option<&str>) {
        let session = ctx.app.session.get_session();
        if !ctx.commit(detail(listing, &session, Utc::now(), error)) {
            return;
        }
        if let Some(message) = error {
            ctx.app.toasts.error(message);
        }
    }

    async fn place_bid(&self, ctx: &ViewContext, listing: &Listing, form: &FormData) {
        let current = highest_bid(&listing.bids);
        let amount = match field(form, "bidAmount").trim().parse::<i64>() {
            Ok(amount) if amount > current => amount,
            _ => {
                let message = format!("Bid must be a whole number higher than {}.", current);
                return self.show(ctx, listing, Some(&message));
            }
        };

        let session = ctx.app.session.get_session();
        if let Some(credit) = session.credit {
            if amount > credit {
                let message = format!("You only have {} credits available.", credit);
                return self.show(ctx, listing, Some(&message));
            }
        }

        match ctx.app.api.place_bid(&listing.id, amount).await {
            Ok(_) => {
                info!("{:<12} --> 입찰 성공 id: {}, amount: {}", "ListingView", listing.id, amount);
                ctx.app.api.refresh_credit().await;
                ctx.app.toasts.success(format!("Bid of {} credits placed!", amount));
                self.render(ctx.clone()).await;
            }
            Err(e) => self.show(ctx, listing, Some(&e.message)),
        }
    }

    async fn delete(&self, ctx: &ViewContext, listing: &Listing) {
        match ctx.app.api.delete_listing(&listing.id).await {
            Ok(()) => {
                ctx.app.toasts.success("Listing deleted.");
                ctx.app.navigate("/");
            }
            Err(e) => self.show(ctx, listing, Some(&e.message)),
        }
    }
}

#[async_trait]
impl View for ListingView {
    fn name(&self) -> &'static str {
        "listing"
    }

    async fn render(&self, ctx: ViewContext) {
        let Some(id) = ctx.param("id").map(str::to_string) else {
            ctx.app.toasts.error("Missing listing id.");
            ctx.app.navigate("/");
            return;
        };

        ctx.commit(loading_panel("Listing", "Loading…"));
        match ctx.app.api.listing(&id).await {
            Ok(listing) => {
                if !ctx.is_current() {
                    return;
                }
                *self.last.lock() = Some(listing.clone());
                self.show(&ctx, &listing, None);
            }
            Err(e) => {
                warn!("{:<12} --> 상품 조회 실패 id: {}: {}", "ListingView", id, e);
                let title = if e.is_status(404) {
                    "Listing not found"
                } else {
                    "Could not load listing"
                };
                ctx.fail(title, &e.message);
            }
        }
    }

    async fn handle(&self, ctx: ViewContext, action: &str, form: &FormData) {
        let Some(id) = ctx.param("id").map(str::to_string) else {
            return;
        };
        match action {
            "login-to-bid" => ctx.app.navigate(&login_redirect(&format!("/listing/{}", id))),
            "bid" | "delete" => {
                let Some(listing) = self.snapshot(&id) else {
                    return self.render(ctx).await;
                };
                if action == "bid" {
                    self.place_bid(&ctx, &listing, form).await;
                } else {
                    self.delete(&ctx, &listing).await;
                }
            }
            _ => {}
        }
    }
}

// region:    --- Markup
fn gallery(listing: &Listing, title: &str) -> String {
    let items: String = listing
        .media
        .iter()
        .filter(|m| !m.url.is_empty())
        .map(|m| {
            format!(
                r#"<img src="{}" alt="{}" loading="lazy" />"#,
                escape_attr(&m.url),
                escape_attr(if m.alt.is_empty() { title } else { m.alt.as_str() })
            )
        })
        .collect();
    if items.is_empty() {
        r#"<div class="muted">No images provided.</div>"#.to_string()
    } else {
        format!(r#"<div class="gallery">{}</div>"#, items)
    }
}

fn bid_area(listing: &Listing, session: &SessionRecord, ended: bool, current: i64) -> Rendered {
    let is_seller = session.is_logged_in()
        && session.user_name().is_some()
        && listing.seller_name() == session.user_name();

    if !session.is_logged_in() {
        return Rendered::new(
            r#"<p>You must log in to place a bid.</p><button id="goLoginBtn" type="button" class="btn-primary">Login to bid</button>"#,
        )
        .on_click("goLoginBtn", "login-to-bid");
    }
    if is_seller {
        return Rendered::new(
            r#"<p>You can't bid on your own listing.</p><button id="deleteListingBtn" type="button" class="btn-danger">Delete listing</button>"#,
        )
        .on_click("deleteListingBtn", "delete");
    }
    if ended {
        return Rendered::new("<p>This auction has ended.</p>");
    }
    Rendered::new(format!(
        r#"<form id="bidForm"><label for="bidAmount">Bid amount</label><input id="bidAmount" type="number" min="{min}" step="1" placeholder="e.g. {min}" /><small>Must be higher than {current}.</small><button type="submit" class="btn-primary">Place bid</button></form>"#,
        min = current + 1,
        current = current,
    ))
    .on_submit("bidForm", "bid")
}

/// 상품 상세 마크업
pub fn detail(listing: &Listing, session: &SessionRecord, now: DateTime<Utc>, error: Option<&str>) -> Rendered {
    let title = if listing.title.is_empty() {
        "Untitled"
    } else {
        listing.title.as_str()
    };
    let ended = listing.is_ended(now);
    let current = highest_bid(&listing.bids);
    let seller = listing
        .seller
        .as_ref()
        .map(|s| s.name.clone())
        .filter(|n| !n.is_empty())
        .or_else(|| listing.seller.as_ref().and_then(|s| s.email.clone()))
        .unwrap_or_else(|| "Unknown seller".to_string());
    let description = listing
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!("<h2>Description</h2><p>{}</p>", escape_html(d)))
        .unwrap_or_default();

    let mut rendered = Rendered::new(format!(
        r##"<section class="listing-nav"><a href="#/" class="btn-secondary">← Back</a><span class="{badge_class}">{badge}</span></section><section class="card card-pad"><h1>{title}</h1><p>Seller: <a href="#/profile/{seller_link}">{seller}</a></p><div><h3>Ends</h3><p>{ends}</p></div><div><h3>Highest bid</h3><p><strong>{current}</strong></p></div>{gallery}{description}<h2>Bids</h2>{bids}<h2>Place a bid</h2>{feedback}"##,
        badge_class = if ended { "badge-neutral" } else { "badge-warning" },
        badge = if ended { "Ended" } else { "Active" },
        title = escape_html(title),
        seller_link = urlencoding::encode(&seller),
        seller = escape_html(&seller),
        ends = escape_html(&format_ends_at(listing.ends_at)),
        current = current,
        gallery = gallery(listing, title),
        description = description,
        bids = bids_table(&listing.bids),
        feedback = feedback(error),
    ));
    rendered.push(bid_area(listing, session, ended, current));
    rendered.markup.push_str("</section>");
    rendered
}
// endregion: --- Markup
