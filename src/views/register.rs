// region:    --- Imports
use super::{feedback, field, View, ViewContext};
use crate::auction::model::RegisterRequest;
use crate::dom::{FormData, Rendered};
use crate::ui::format::escape_attr;
use async_trait::async_trait;
use tracing::{info, warn};

// endregion: --- Imports

/// 가입 가능한 이메일 도메인
pub const REQUIRED_EMAIL_DOMAIN: &str = "@stud.noroff.no";
pub const MIN_PASSWORD_LEN: usize = 8;

/// 회원 가입
pub struct RegisterView;

/// 입력 검증. 실패하면 사용자에게 보여줄 메시지.
pub fn validate(request: &RegisterRequest) -> Result<(), String> {
    if request.name.is_empty()
        || !request
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err("Username may only contain letters, numbers and underscores.".to_string());
    }
    if !request.email.ends_with(REQUIRED_EMAIL_DOMAIN) || request.email.len() == REQUIRED_EMAIL_DOMAIN.len() {
        return Err(format!("Email must end with {}", REQUIRED_EMAIL_DOMAIN));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters.",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}

#[async_trait]
impl View for RegisterView {
    fn name(&self) -> &'static str {
        "register"
    }

    async fn render(&self, ctx: ViewContext) {
        ctx.commit(page("", "", None));
    }

    async fn handle(&self, ctx: ViewContext, action: &str, form: &FormData) {
        if action != "register" {
            return;
        }
        let request = RegisterRequest {
            name: field(form, "name").trim().to_string(),
            email: field(form, "email").trim().to_string(),
            password: field(form, "password").to_string(),
        };

        let result = match validate(&request) {
            Ok(()) => ctx.app.api.register(&request).await.map_err(|e| {
                warn!("{:<12} --> 가입 실패: {}", "RegisterView", e);
                e.message
            }),
            Err(message) => Err(message),
        };

        match result {
            Ok(profile) => {
                info!("{:<12} --> 가입 완료: {}", "RegisterView", profile.name);
                ctx.app.toasts.success("Account created! You can now log in.");
                ctx.app.navigate("/login");
            }
            Err(message) => {
                if ctx.commit(page(&request.name, &request.email, Some(&message))) {
                    ctx.app.toasts.error(message);
                }
            }
        }
    }
}

fn page(name: &str, email: &str, error: Option<&str>) -> Rendered {
    Rendered::new(format!(
        r##"<section class="card card-pad"><h1>Register</h1><p>You must register with a <strong>{domain}</strong> email.</p><a class="btn-secondary" href="#/">Back</a>{feedback}<form id="registerForm"><label for="name">Username</label><input id="name" type="text" value="{name}" placeholder="yourname" required /><label for="email">Email</label><input id="email" type="email" value="{email}" placeholder="name{domain}" required /><label for="password">Password</label><input id="password" type="password" minlength="{min}" required /><button class="btn-primary" type="submit">Create account</button><p>Already registered? <a href="#/login">Login</a></p></form></section>"##,
        domain = REQUIRED_EMAIL_DOMAIN,
        feedback = feedback(error),
        name = escape_attr(name),
        email = escape_attr(email),
        min = MIN_PASSWORD_LEN,
    ))
    .on_submit("registerForm", "register")
}
