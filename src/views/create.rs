// region:    --- Imports
use super::{feedback, field, View, ViewContext};
use crate::auction::model::{Media, NewListing};
use crate::dom::{FormData, Rendered};
use crate::ui::format::{escape_attr, escape_html, parse_deadline};
use crate::ui::list_widget::UrlList;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{info, warn};

// endregion: --- Imports

/// 다시 그릴 때 유지하는 입력 필드
const FORM_FIELDS: [&str; 4] = ["title", "description", "tags", "endsAt"];

#[derive(Default)]
struct CreateState {
    values: FormData,
    media: UrlList,
    error: Option<String>,
}

/// 상품 등록
#[derive(Default)]
pub struct CreateListingView {
    state: Mutex<CreateState>,
}

impl CreateListingView {
    pub fn new() -> Self {
        Self::default()
    }

    fn show(&self, ctx: &ViewContext) -> bool {
        let rendered = {
            let state = self.state.lock();
            page(&state.values, &state.media, state.error.as_deref())
        };
        ctx.commit(rendered)
    }

    /// 입력값 보관 후 오류와 함께 다시 그리기
    fn remember(&self, form: &FormData, error: Option<String>) {
        let mut state = self.state.lock();
        for key in FORM_FIELDS {
            if let Some(value) = form.get(key) {
                state.values.insert(key.to_string(), value.clone());
            }
        }
        state.error = error;
    }

    fn show_error(&self, ctx: &ViewContext, form: &FormData, message: String) {
        self.remember(form, Some(message.clone()));
        if self.show(ctx) {
            ctx.app.toasts.error(message);
        }
    }

    async fn submit(&self, ctx: &ViewContext, form: &FormData) {
        let media = self.state.lock().media.items().to_vec();
        let listing = match build_listing(form, &media, Utc::now()) {
            Ok(listing) => listing,
            Err(message) => return self.show_error(ctx, form, message),
        };

        match ctx.app.api.create_listing(&listing).await {
            Ok(created) => {
                info!("{:<12} --> 상품 등록 완료 id: {}", "CreateView", created.id);
                *self.state.lock() = CreateState::default();
                ctx.app.toasts.success("Listing created successfully!");
                let target = if created.id.is_empty() {
                    "/".to_string()
                } else {
                    format!("/listing/{}", urlencoding::encode(&created.id))
                };
                ctx.app.navigate(&target);
            }
            Err(e) => {
                warn!("{:<12} --> 상품 등록 실패: {}", "CreateView", e);
                self.show_error(ctx, form, e.message);
            }
        }
    }
}

#[async_trait]
impl View for CreateListingView {
    fn name(&self) -> &'static str {
        "create"
    }

    async fn render(&self, ctx: ViewContext) {
        *self.state.lock() = CreateState::default();
        self.show(&ctx);
    }

    async fn handle(&self, ctx: ViewContext, action: &str, form: &FormData) {
        if action == "create" {
            return self.submit(&ctx, form).await;
        }

        let result = {
            let mut state = self.state.lock();
            if action == "add-media" {
                Some(state.media.add(field(form, "mediaUrl")))
            } else if let Some(index) = action
                .strip_prefix("remove-media:")
                .and_then(|i| i.parse::<usize>().ok())
            {
                state.media.remove(index);
                Some(Ok(()))
            } else {
                None
            }
        };
        match result {
            Some(Ok(())) => {
                self.remember(form, None);
                self.show(&ctx);
            }
            Some(Err(message)) => self.show_error(&ctx, form, message),
            None => {}
        }
    }
}

/// 폼 입력을 등록 요청으로 변환. 실패하면 사용자에게 보여줄 메시지.
pub fn build_listing(form: &FormData, media: &[String], now: DateTime<Utc>) -> Result<NewListing, String> {
    let title = field(form, "title").trim();
    if title.is_empty() {
        return Err("Title is required.".to_string());
    }
    let ends_at = parse_deadline(field(form, "endsAt"))
        .filter(|deadline| *deadline > now)
        .ok_or_else(|| "Deadline must be a valid future date/time.".to_string())?;
    let description = Some(field(form, "description").trim().to_string()).filter(|d| !d.is_empty());
    let tags = field(form, "tags")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    Ok(NewListing {
        title: title.to_string(),
        description,
        tags,
        media: media.iter().map(|url| Media::new(url.as_str(), "")).collect(),
        ends_at,
    })
}

fn page(values: &FormData, media: &UrlList, error: Option<&str>) -> Rendered {
    let mut rendered = Rendered::new(format!(
        r#"<section class="card card-pad"><h1>Create listing</h1>{feedback}<form id="createForm"><label for="title">Title</label><input id="title" type="text" value="{title}" required /><label for="description">Description</label><textarea id="description" rows="4">{description}</textarea><label for="tags">Tags (comma separated)</label><input id="tags" type="text" value="{tags}" /><label for="endsAt">Deadline</label><input id="endsAt" type="datetime-local" value="{ends_at}" required /><label for="mediaUrl">Image URL</label><input id="mediaUrl" type="url" placeholder="https://…" /><button id="addMediaBtn" type="button" class="btn-secondary">Add image</button>"#,
        feedback = feedback(error),
        title = escape_attr(field(values, "title")),
        description = escape_html(field(values, "description")),
        tags = escape_attr(field(values, "tags")),
        ends_at = escape_attr(field(values, "endsAt")),
    ))
    .on_click("addMediaBtn", "add-media")
    .on_submit("createForm", "create");
    rendered.push(media.render());
    rendered
        .markup
        .push_str(r##"<button class="btn-primary" type="submit">Create</button><a class="btn-secondary" href="#/">Cancel</a></form></section>"##);
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::EventKind;
    use chrono::TimeZone;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_build_listing() {
        let data = form(&[
            ("title", "  Lamp "),
            ("description", ""),
            ("tags", "vintage, , light"),
            ("endsAt", "2026-01-02T10:30"),
        ]);
        let listing = build_listing(&data, &["https://img.example/1.png".to_string()], now()).unwrap();
        assert_eq!(listing.title, "Lamp");
        assert_eq!(listing.description, None);
        assert_eq!(listing.tags, vec!["vintage", "light"]);
        assert_eq!(listing.media[0].url, "https://img.example/1.png");
        assert_eq!(listing.ends_at, Utc.with_ymd_and_hms(2026, 1, 2, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_build_listing_rejects_past_or_missing_deadline() {
        let past = form(&[("title", "Lamp"), ("endsAt", "2025-12-31T10:00")]);
        assert_eq!(
            build_listing(&past, &[], now()).unwrap_err(),
            "Deadline must be a valid future date/time."
        );
        let missing = form(&[("title", "Lamp")]);
        assert!(build_listing(&missing, &[], now()).is_err());
        let untitled = form(&[("endsAt", "2026-01-02T10:30")]);
        assert_eq!(build_listing(&untitled, &[], now()).unwrap_err(), "Title is required.");
    }

    #[test]
    fn test_page_keeps_values_and_media_bindings() {
        let mut media = UrlList::default();
        media.add("https://img.example/1.png").unwrap();
        let rendered = page(&form(&[("title", "<b>Lamp</b>")]), &media, None);
        assert!(rendered.markup.contains("&lt;b&gt;Lamp&lt;/b&gt;"));
        assert_eq!(rendered.action_for("createForm", EventKind::Submit), Some("create"));
        assert_eq!(rendered.action_for("removeMedia-0", EventKind::Click), Some("remove-media:0"));
        assert!(rendered.markup.ends_with("</form></section>"));
    }
}
