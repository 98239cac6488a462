// region:    --- Imports
use super::{feedback, field, View, ViewContext};
use crate::dom::{FormData, Rendered};
use crate::query::{self, ListingQuery, SortOption, StatusFilter};
use crate::ui::cards::listing_grid;
use crate::ui::format::escape_attr;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

// endregion: --- Imports

/// 홈 (상품 목록, 검색)
pub struct HomeView;

impl HomeView {
    async fn load(&self, ctx: &ViewContext, query: ListingQuery) {
        info!("{:<12} --> 상품 목록 조회: {:?}", "HomeView", query);
        ctx.commit(page(&query, r#"<p id="listingsLoading">Loading listings…</p>"#, None));

        match ctx.app.api.listings(&query).await {
            Ok(listings) => {
                let now = Utc::now();
                // 검색 엔드포인트는 정렬/상태 조건을 무시할 수 있다
                let listings = if query.search_term().is_some() {
                    query::apply(listings, &query, now)
                } else {
                    listings
                };
                let body = listing_grid(&listings, "No listings found.", now);
                ctx.commit(page(&query, &body, None));
            }
            Err(e) => {
                if ctx.commit(page(&query, "", Some(&e.message))) {
                    ctx.app.toasts.error(&e.message);
                }
            }
        }
    }
}

#[async_trait]
impl View for HomeView {
    fn name(&self) -> &'static str {
        "home"
    }

    async fn render(&self, ctx: ViewContext) {
        let query = ListingQuery {
            search: ctx.query("q").unwrap_or_default().to_string(),
            sort: SortOption::parse(ctx.query("sort").unwrap_or_default()),
            status: StatusFilter::parse(ctx.query("status").unwrap_or_default()),
        };
        self.load(&ctx, query).await;
    }

    async fn handle(&self, ctx: ViewContext, action: &str, form: &FormData) {
        let query = match action {
            "search" => ListingQuery {
                search: field(form, "searchInput").to_string(),
                sort: SortOption::parse(field(form, "sortSelect")),
                status: StatusFilter::parse(field(form, "statusSelect")),
            },
            "clear" => ListingQuery::default(),
            _ => return,
        };
        self.load(&ctx, query).await;
    }
}

fn option(value: &str, label: &str, selected: &str) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        value,
        if value == selected { " selected" } else { "" },
        label
    )
}

fn page(query: &ListingQuery, body: &str, error: Option<&str>) -> Rendered {
    let sort = query.sort.as_str();
    let status = query.status.as_str();
    Rendered::new(format!(
        r#"<section id="homeView"><form id="searchForm" role="search"><input id="searchInput" type="search" value="{search}" placeholder="Search listings" /><select id="sortSelect">{sorts}</select><select id="statusSelect">{statuses}</select><button type="submit">Search</button><button id="clearSearchBtn" type="button">Clear</button></form>{feedback}<div id="listingsGrid">{body}</div></section>"#,
        search = escape_attr(&query.search),
        sorts = [
            option("created_desc", "Newest", sort),
            option("ends_asc", "Ending soon", sort),
            option("bids_desc", "Most bids", sort),
        ]
        .concat(),
        statuses = [
            option("all", "All", status),
            option("active", "Active", status),
            option("ended", "Ended", status),
        ]
        .concat(),
        feedback = feedback(error),
        body = body,
    ))
    .on_submit("searchForm", "search")
    .on_click("clearSearchBtn", "clear")
}
