// region:    --- Imports
use super::{feedback, field, loading_panel, View, ViewContext};
use crate::api::{ApiClient, ApiError};
use crate::auction::bids::{bid_status, BidStatus};
use crate::auction::model::{Bid, Listing, Media, Profile, ProfileUpdate};
use crate::dom::{EventKind, FormData, Rendered};
use crate::router::login_redirect;
use crate::session::UserUpdate;
use crate::ui::cards::{bid_card, listing_grid};
use crate::ui::format::{escape_attr, escape_html, format_credit, is_http_url};
use crate::ui::modal::Modal;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::task::JoinSet;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- State
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Listings,
    Wins,
    Bids,
}

impl Tab {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "listings" => Some(Tab::Listings),
            "wins" => Some(Tab::Wins),
            "bids" => Some(Tab::Bids),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Tab::Listings => "listings",
            Tab::Wins => "wins",
            Tab::Bids => "bids",
        }
    }
}

/// 한 번의 조회 결과 (탭 전환은 이 값으로 다시 그린다)
#[derive(Debug, Clone, Default)]
pub struct ProfileSnapshot {
    pub profile: Profile,
    pub listings: Vec<Listing>,
    pub wins: Vec<Listing>,
    pub bids: Vec<(Bid, Option<BidStatus>)>,
    pub own: bool,
}

#[derive(Default)]
struct ProfileState {
    name: String,
    snapshot: Option<ProfileSnapshot>,
    tab: Tab,
    modal: Modal,
    error: Option<String>,
}
// endregion: --- State

/// 프로필 (탭, 편집 모달)
#[derive(Default)]
pub struct ProfileView {
    state: Mutex<ProfileState>,
}

impl ProfileView {
    pub fn new() -> Self {
        Self::default()
    }

    fn target_name(ctx: &ViewContext) -> Option<String> {
        ctx.param("name")
            .map(str::to_string)
            .or_else(|| ctx.app.session.get_session().user_name().map(str::to_string))
            .filter(|n| !n.is_empty())
    }

    /// 보관한 조회 결과로 다시 그리기. 적용됐으면 true.
    fn show(&self, ctx: &ViewContext) -> bool {
        let rendered = {
            let state = self.state.lock();
            match &state.snapshot {
                Some(snapshot) => page(snapshot, state.tab, &state.modal, state.error.as_deref(), Utc::now()),
                None => return false,
            }
        };
        ctx.commit(rendered)
    }

    fn show_error(&self, ctx: &ViewContext, message: &str) {
        self.state.lock().error = Some(message.to_string());
        if self.show(ctx) {
            ctx.app.toasts.error(message);
        }
    }

    async fn save(&self, ctx: &ViewContext, form: &FormData) {
        let avatar_url = field(form, "modalAvatarUrl").trim();
        let banner_url = field(form, "modalBannerUrl").trim();
        if let Err(message) = validate_visuals(avatar_url, banner_url) {
            return self.show_error(ctx, &message);
        }

        let (name, current) = {
            let state = self.state.lock();
            (
                state.name.clone(),
                state.snapshot.as_ref().map(|s| s.profile.clone()).unwrap_or_default(),
            )
        };
        let keep_alt = |media: &Option<Media>| media.as_ref().map(|m| m.alt.clone()).unwrap_or_default();
        let update = ProfileUpdate {
            avatar: (!avatar_url.is_empty()).then(|| Media::new(avatar_url, keep_alt(&current.avatar))),
            banner: (!banner_url.is_empty()).then(|| Media::new(banner_url, keep_alt(&current.banner))),
        };

        match ctx.app.api.update_profile(&name, &update).await {
            Ok(_) => {
                info!("{:<12} --> 프로필 수정 완료: {}", "ProfileView", name);
                if let Some(avatar) = update.avatar {
                    let result = ctx.app.session.update_user(UserUpdate {
                        avatar: Some(avatar),
                        ..Default::default()
                    });
                    if let Err(e) = result {
                        warn!("{:<12} --> 세션 아바타 갱신 실패: {}", "ProfileView", e);
                    }
                }
                {
                    let mut state = self.state.lock();
                    state.modal.close();
                    state.error = None;
                }
                ctx.app.toasts.success("Profile updated successfully!");
                self.render(ctx.clone()).await;
            }
            Err(e) => self.show_error(ctx, &e.message),
        }
    }
}

#[async_trait]
impl View for ProfileView {
    fn name(&self) -> &'static str {
        "profile"
    }

    async fn render(&self, ctx: ViewContext) {
        let Some(name) = Self::target_name(&ctx) else {
            ctx.app.navigate(&login_redirect(&ctx.request.path));
            return;
        };

        // 다시 그릴 때마다 탭, 모달, 오류는 처음 상태로
        *self.state.lock() = ProfileState {
            name: name.clone(),
            ..Default::default()
        };

        ctx.commit(loading_panel("Profile", "Loading profile…"));
        let own = ctx.app.session.get_session().user_name() == Some(name.as_str());
        match fetch_snapshot(&ctx.app.api, &name, own, Utc::now()).await {
            Ok(snapshot) => {
                if !ctx.is_current() {
                    return;
                }
                if let (true, Some(credit)) = (own, snapshot.profile.credits) {
                    if let Err(e) = ctx.app.session.set_credit(credit) {
                        warn!("{:<12} --> 크레딧 저장 실패: {}", "ProfileView", e);
                    }
                }
                self.state.lock().snapshot = Some(snapshot);
                self.show(&ctx);
            }
            Err(e) => {
                warn!("{:<12} --> 프로필 조회 실패 {}: {}", "ProfileView", name, e);
                ctx.fail("Profile", &e.message);
            }
        }
    }

    async fn handle(&self, ctx: ViewContext, action: &str, form: &FormData) {
        if let Some(tab) = action.strip_prefix("tab:").and_then(Tab::parse) {
            self.state.lock().tab = tab;
            self.show(&ctx);
            return;
        }

        let changed = {
            let mut state = self.state.lock();
            let own = state.snapshot.as_ref().map(|s| s.own).unwrap_or(false);
            match action {
                "open-edit" if own => {
                    state.modal.open();
                    state.error = None;
                    true
                }
                "close-edit" => {
                    state.modal.close();
                    state.error = None;
                    true
                }
                "key" => state.modal.handle_key(field(form, "key")),
                _ => false,
            }
        };
        if changed {
            self.show(&ctx);
            return;
        }

        if action == "save-profile" {
            self.save(&ctx, form).await;
        }
    }
}

// region:    --- Loading
/// 프로필, 판매 상품, 낙찰, 입찰을 동시에 조회하고
/// 입찰한 상품 상세를 받아 입찰 상태를 계산한다.
pub async fn fetch_snapshot(
    api: &ApiClient,
    name: &str,
    own: bool,
    now: DateTime<Utc>,
) -> Result<ProfileSnapshot, ApiError> {
    let (profile, listings, wins, bids) = tokio::try_join!(
        api.profile(name),
        api.profile_listings(name),
        api.profile_wins(name),
        api.profile_bids(name),
    )?;

    let mut ids: Vec<String> = Vec::new();
    for id in bids.iter().filter_map(|b| b.listing.as_ref().map(|l| l.id.clone())) {
        if !id.is_empty() && !ids.contains(&id) {
            ids.push(id);
        }
    }

    let mut tasks = JoinSet::new();
    for id in ids {
        let api = api.clone();
        tasks.spawn(async move {
            let result = api.listing(&id).await;
            (id, result)
        });
    }

    let mut details: HashMap<String, Listing> = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((id, Ok(listing))) => {
                details.insert(id, listing);
            }
            Ok((id, Err(e))) => warn!("{:<12} --> 입찰 상품 조회 실패 {}: {}", "ProfileView", id, e),
            Err(e) => warn!("{:<12} --> 입찰 상품 작업 실패: {}", "ProfileView", e),
        }
    }

    let bids = bids
        .into_iter()
        .map(|mut bid| {
            let detail = bid.listing.as_ref().and_then(|l| details.get(&l.id)).cloned();
            let status = detail.as_ref().and_then(|l| bid_status(l, name, now));
            if let Some(detail) = detail {
                bid.listing = Some(Box::new(detail));
            }
            (bid, status)
        })
        .collect();

    Ok(ProfileSnapshot {
        profile,
        listings,
        wins,
        bids,
        own,
    })
}

/// 편집 모달 입력 검증
pub fn validate_visuals(avatar_url: &str, banner_url: &str) -> Result<(), String> {
    if avatar_url.is_empty() && banner_url.is_empty() {
        return Err("Please enter at least one URL to update.".to_string());
    }
    if !avatar_url.is_empty() && !is_http_url(avatar_url) {
        return Err("Avatar URL must start with http or https.".to_string());
    }
    if !banner_url.is_empty() && !is_http_url(banner_url) {
        return Err("Banner URL must start with http or https.".to_string());
    }
    Ok(())
}
// endregion: --- Loading

// region:    --- Markup
fn image(media: Option<&Media>, fallback_alt: &str, class: &str) -> Option<String> {
    let media = media.filter(|m| !m.url.is_empty())?;
    Some(format!(
        r#"<img src="{}" alt="{}" class="{}" />"#,
        escape_attr(&media.url),
        escape_attr(if media.alt.is_empty() { fallback_alt } else { media.alt.as_str() }),
        class
    ))
}

fn tab_button(tab: Tab, active: Tab, label: &str, count: usize) -> String {
    format!(
        r#"<button id="tab-{id}" type="button" role="tab" aria-selected="{selected}" class="tab{class}">{label} ({count})</button>"#,
        id = tab.as_str(),
        selected = tab == active,
        class = if tab == active { " active" } else { "" },
        label = label,
        count = count,
    )
}

fn tab_body(snapshot: &ProfileSnapshot, tab: Tab, now: DateTime<Utc>) -> String {
    match tab {
        Tab::Listings => listing_grid(&snapshot.listings, "No listings yet.", now),
        Tab::Wins => listing_grid(&snapshot.wins, "No wins yet.", now),
        Tab::Bids if snapshot.bids.is_empty() => r#"<p class="muted">No bids yet.</p>"#.to_string(),
        Tab::Bids => {
            let cards: String = snapshot
                .bids
                .iter()
                .map(|(bid, status)| bid_card(bid, *status, now))
                .collect();
            format!(r#"<div class="grid">{}</div>"#, cards)
        }
    }
}

fn edit_modal(profile: &Profile, modal: &Modal, error: Option<&str>) -> String {
    let current = |media: &Option<Media>| media.as_ref().map(|m| escape_attr(&m.url)).unwrap_or_default();
    let body = format!(
        r#"<h2>Edit profile</h2><button id="editModalClose" type="button" aria-label="Close">×</button>{feedback}<form id="editProfileForm"><label for="modalAvatarUrl">Avatar URL</label><input id="modalAvatarUrl" type="url" placeholder="{avatar}" /><label for="modalBannerUrl">Banner URL</label><input id="modalBannerUrl" type="url" placeholder="{banner}" /><button id="editModalCancel" type="button" class="btn-secondary">Cancel</button><button type="submit" class="btn-primary">Save</button></form>"#,
        feedback = feedback(error),
        avatar = current(&profile.avatar),
        banner = current(&profile.banner),
    );
    modal.wrap("editProfileModal", &body)
}

/// 프로필 페이지 마크업
pub fn page(
    snapshot: &ProfileSnapshot,
    tab: Tab,
    modal: &Modal,
    error: Option<&str>,
    now: DateTime<Utc>,
) -> Rendered {
    let profile = &snapshot.profile;
    let name = profile.name.as_str();
    let banner = image(profile.banner.as_ref(), &format!("{} banner", name), "banner")
        .map(|img| format!(r#"<div class="banner">{}</div>"#, img))
        .unwrap_or_default();
    let avatar = image(profile.avatar.as_ref(), &format!("{} avatar", name), "avatar")
        .unwrap_or_else(|| r#"<div class="avatar muted">No avatar</div>"#.to_string());
    let edit_button = if snapshot.own {
        r#"<button id="editProfileBtn" type="button" aria-label="Edit profile visuals">✎</button>"#
    } else {
        ""
    };
    let credits = if snapshot.own {
        format!("<p>Credits: <strong>{}</strong></p>", format_credit(profile.credits))
    } else {
        String::new()
    };
    let bio = profile
        .bio
        .as_deref()
        .filter(|b| !b.is_empty())
        .map(|b| format!("<p>{}</p>", escape_html(b)))
        .unwrap_or_default();
    // 모달이 열려 있으면 오류는 모달 안에 표시
    let (page_error, modal_error) = if modal.is_open() { (None, error) } else { (error, None) };

    let mut markup = format!(
        r##"<section class="card card-pad" id="profileView"><div><h1>Profile</h1><a href="#/" class="btn-secondary">← Back</a></div>{banner}<div class="profile-head">{avatar}{edit_button}<div><h2>{name}</h2><p class="muted">{email}</p>{credits}{bio}</div></div>{feedback}<div role="tablist">{tabs}</div><div id="profileTabBody">{body}</div></section>"##,
        banner = banner,
        avatar = avatar,
        edit_button = edit_button,
        name = escape_html(name),
        email = escape_html(profile.email.as_deref().unwrap_or("")),
        credits = credits,
        bio = bio,
        feedback = feedback(page_error),
        tabs = [
            tab_button(Tab::Listings, tab, "Listings", snapshot.listings.len()),
            tab_button(Tab::Wins, tab, "Wins", snapshot.wins.len()),
            tab_button(Tab::Bids, tab, "Bids", snapshot.bids.len()),
        ]
        .concat(),
        body = tab_body(snapshot, tab, now),
    );

    let mut rendered = Rendered::default()
        .on_click("tab-listings", "tab:listings")
        .on_click("tab-wins", "tab:wins")
        .on_click("tab-bids", "tab:bids");
    if snapshot.own {
        markup.push_str(&edit_modal(profile, modal, modal_error));
        rendered = rendered
            .on_click("editProfileBtn", "open-edit")
            .on_click("editModalClose", "close-edit")
            .on_click("editModalCancel", "close-edit")
            .on_click("editProfileModal", "close-edit")
            .on_submit("editProfileForm", "save-profile")
            .on("document", EventKind::KeyDown, "key");
    }
    rendered.markup = markup;
    rendered
}
// endregion: --- Markup
