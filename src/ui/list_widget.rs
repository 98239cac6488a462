/// 동적 URL 목록 (추가/삭제)
// region:    --- Imports
use super::format::{escape_attr, escape_html, is_http_url};
use crate::dom::Rendered;

// endregion: --- Imports

/// 상품 하나에 붙일 수 있는 이미지 최대 개수
pub const MAX_MEDIA_ITEMS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlList {
    items: Vec<String>,
    max: usize,
}

impl Default for UrlList {
    fn default() -> Self {
        Self::new(MAX_MEDIA_ITEMS)
    }
}

impl UrlList {
    pub fn new(max: usize) -> Self {
        Self {
            items: Vec::new(),
            max,
        }
    }

    /// URL 추가. 실패하면 사용자에게 보여줄 메시지.
    pub fn add(&mut self, url: &str) -> Result<(), String> {
        let url = url.trim();
        if url.is_empty() {
            return Err("Enter an image URL first.".to_string());
        }
        if !is_http_url(url) {
            return Err("Image URL must start with http or https.".to_string());
        }
        if self.items.iter().any(|u| u == url) {
            return Err("That image is already in the list.".to_string());
        }
        if self.items.len() >= self.max {
            return Err(format!("You can add at most {} images.", self.max));
        }
        self.items.push(url.to_string());
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// 목록 마크업과 삭제 버튼 바인딩
    pub fn render(&self) -> Rendered {
        let mut rendered = Rendered::new(r#"<ul id="mediaList">"#);
        for (index, url) in self.items.iter().enumerate() {
            let button = format!("removeMedia-{}", index);
            rendered.push(
                Rendered::new(format!(
                    r#"<li><img src="{src}" alt="" /><span>{text}</span><button id="{button}" type="button">Remove</button></li>"#,
                    src = escape_attr(url),
                    text = escape_html(url),
                    button = button,
                ))
                .on_click(button, format!("remove-media:{}", index)),
            );
        }
        rendered.markup.push_str("</ul>");
        rendered
    }
}
