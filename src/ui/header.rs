// region:    --- Imports
use super::format::{escape_html, format_credit};
use crate::dom::Rendered;
use crate::session::SessionRecord;

// endregion: --- Imports

/// 헤더 렌더링 (세션 상태 기준)
pub fn render_header(session: &SessionRecord) -> Rendered {
    if !session.is_logged_in() {
        return Rendered::new(concat!(
            r##"<header id="site-header"><a href="#/" class="brand">Noroff Auctionsite</a>"##,
            r##"<nav aria-label="Primary navigation">"##,
            r##"<a href="#/login" class="btn-secondary">Login</a>"##,
            r##"<a href="#/register" class="btn-primary">Register</a>"##,
            "</nav></header>"
        ));
    }

    let name = session.user_name().unwrap_or("Profile");
    Rendered::new(format!(
        concat!(
            r##"<header id="site-header"><a href="#/" class="brand">Noroff Auctionsite</a>"##,
            r##"<nav aria-label="Primary navigation">"##,
            r##"<span class="badge-accent" title="Available credits">💰 {credit}</span>"##,
            r##"<a href="#/create" class="btn-secondary">Create listing</a>"##,
            r##"<a href="#/profile" class="btn-secondary" title="View profile">{name}</a>"##,
            r##"<button id="logoutBtn" type="button" class="btn-primary">Logout</button>"##,
            "</nav></header>"
        ),
        credit = format_credit(session.credit),
        name = escape_html(name),
    ))
    .on_click("logoutBtn", "logout")
}
