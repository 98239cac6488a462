/// 모달 상태
/// 닫기/취소 버튼, 배경 클릭, Escape 키로 닫힌다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modal {
    open: bool,
}

impl Modal {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// 키 입력 처리. 닫혔으면 true.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if self.open && key == "Escape" {
            self.open = false;
            return true;
        }
        false
    }

    /// 모달 마크업 (닫힌 상태면 hidden)
    pub fn wrap(&self, id: &str, body: &str) -> String {
        format!(
            r#"<div id="{id}" class="modal{hidden}" role="dialog" aria-modal="true"><div class="card card-pad">{body}</div></div>"#,
            id = id,
            hidden = if self.open { "" } else { " hidden" },
            body = body
        )
    }
}
