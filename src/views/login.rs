// region:    --- Imports
use super::{feedback, field, View, ViewContext};
use crate::auction::model::AuthResponse;
use crate::dom::{FormData, Rendered};
use crate::session::SessionUser;
use crate::ui::format::escape_attr;
use async_trait::async_trait;
use tracing::{info, warn};

// endregion: --- Imports

/// 로그인
pub struct LoginView;

/// 로그인 후 이동할 경로. 앱 내부 경로(`/`로 시작)만 허용한다.
pub fn safe_return_to(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/".to_string(),
    }
}

impl LoginView {
    fn fail(&self, ctx: &ViewContext, email: &str, message: &str) {
        if ctx.commit(page(email, Some(message))) {
            ctx.app.toasts.error(message);
        }
    }

    fn store(&self, ctx: &ViewContext, auth: AuthResponse) -> Result<(), String> {
        let token = auth
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| "Login response did not include an access token.".to_string())?;
        let user = SessionUser {
            name: auth.name,
            email: auth.email,
            avatar: auth.avatar,
        };
        ctx.app
            .session
            .set_session(&token, Some(user))
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl View for LoginView {
    fn name(&self) -> &'static str {
        "login"
    }

    async fn render(&self, ctx: ViewContext) {
        ctx.commit(page("", None));
    }

    async fn handle(&self, ctx: ViewContext, action: &str, form: &FormData) {
        if action != "login" {
            return;
        }
        let email = field(form, "email").trim().to_string();
        let password = field(form, "password");
        if email.is_empty() || password.is_empty() {
            return self.fail(&ctx, &email, "Email and password are required.");
        }

        let auth = match ctx.app.api.login(&email, password).await {
            Ok(auth) => auth,
            Err(e) => {
                warn!("{:<12} --> 로그인 실패: {}", "LoginView", e);
                return self.fail(&ctx, &email, &e.message);
            }
        };
        if let Err(message) = self.store(&ctx, auth) {
            return self.fail(&ctx, &email, &message);
        }

        ctx.app.api.refresh_credit().await;
        ctx.app.refresh_header();
        ctx.app.toasts.success("Logged in!");

        let target = safe_return_to(ctx.query("returnTo"));
        info!("{:<12} --> 로그인 완료, 이동: {}", "LoginView", target);
        ctx.app.navigate(&target);
    }
}

fn page(email: &str, error: Option<&str>) -> Rendered {
    Rendered::new(format!(
        r##"<section class="card card-pad"><h1>Login</h1><p>Use your registered account to bid and create listings.</p>{feedback}<form id="loginForm"><label for="email">Email</label><input id="email" type="email" value="{email}" placeholder="name@stud.noroff.no" required /><label for="password">Password</label><input id="password" type="password" required /><button class="btn-primary" type="submit">Login</button><p>No account? <a href="#/register">Register</a></p></form></section>"##,
        feedback = feedback(error),
        email = escape_attr(email),
    ))
    .on_submit("loginForm", "login")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::EventKind;

    #[test]
    fn test_safe_return_to() {
        assert_eq!(safe_return_to(Some("/listing/42")), "/listing/42");
        assert_eq!(safe_return_to(Some("/create")), "/create");
        assert_eq!(safe_return_to(Some("https://evil.example")), "/");
        assert_eq!(safe_return_to(Some("//evil.example")), "/");
        assert_eq!(safe_return_to(Some("")), "/");
        assert_eq!(safe_return_to(None), "/");
    }

    #[test]
    fn test_page_keeps_email_and_error() {
        let rendered = page("a\"b@stud.noroff.no", Some("Invalid email or password"));
        assert_eq!(rendered.action_for("loginForm", EventKind::Submit), Some("login"));
        assert!(rendered.markup.contains("a&quot;b@stud.noroff.no"));
        assert!(rendered.markup.contains("Invalid email or password"));
    }
}
