/// 표시용 포맷 함수
/// 시간 관련 함수는 모두 현재 시각(now)을 인자로 받는다.
// region:    --- Imports
use chrono::{DateTime, NaiveDateTime, Utc};

// endregion: --- Imports

// region:    --- Escaping
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 속성 값 이스케이프 (백틱까지 처리)
pub fn escape_attr(value: &str) -> String {
    escape_html(value).replace('`', "&#96;")
}
// endregion: --- Escaping

// region:    --- Time
/// 마감 시각 표시 (없으면 빈 문자열)
pub fn format_ends_at(ends_at: Option<DateTime<Utc>>) -> String {
    ends_at
        .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default()
}

/// 남은 시간
pub fn time_left(ends_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ends_at) = ends_at else {
        return String::new();
    };
    let secs = (ends_at - now).num_seconds();
    if secs <= 0 {
        return "Ended".to_string();
    }

    let (days, hours, minutes, seconds) = (secs / 86_400, (secs % 86_400) / 3_600, (secs % 3_600) / 60, secs % 60);
    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// 경과 시간
pub fn time_ago(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created).num_seconds().max(0);
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {} ago", unit)
        } else {
            format!("{} {}s ago", n, unit)
        }
    };

    match secs {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => plural(s / 60, "minute"),
        s if s < 86_400 => plural(s / 3_600, "hour"),
        s if s < 30 * 86_400 => plural(s / 86_400, "day"),
        _ => created.format("%Y-%m-%d").to_string(),
    }
}

/// 마감 입력 파싱
/// `YYYY-MM-DDTHH:MM` (datetime-local, UTC로 해석) 또는 RFC 3339. 잘못된 값은 None.
pub fn parse_deadline(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(value) {
        return Some(d.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// 크레딧 표시 (모르면 대시)
pub fn format_credit(credit: Option<i64>) -> String {
    credit.map(|c| c.to_string()).unwrap_or_else(|| "—".to_string())
}
// endregion: --- Time

/// http/https URL 여부
pub fn is_http_url(value: &str) -> bool {
    reqwest::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
