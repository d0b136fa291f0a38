pub fn module_ready() -> bool {
    true
}

pub fn login_html() -> &'static str {
    include_str!("../static/login.html")
}

pub fn dashboard_html() -> &'static str {
    include_str!("../static/dashboard.html")
}

pub fn styles_css() -> &'static str {
    include_str!("../static/styles.css")
}

pub fn app_js() -> &'static str {
    include_str!("../static/app.js")
}

/// Login page, with an error banner when `error` is set.
pub fn render_login(error: Option<&str>) -> String {
    let banner = error
        .map(escape_html)
        .map(|message| format!(r#"<p class="error" role="alert">{message}</p>"#))
        .unwrap_or_default();

    login_html().replace("{{error}}", &banner)
}

/// Dashboard page with the initial snapshot embedded as JSON so the first
/// paint does not wait for a poll.
pub fn render_dashboard(user: &str, snapshot_json: &str) -> String {
    dashboard_html()
        .replace("{{user}}", &escape_html(user))
        .replace("{{snapshot_json}}", &escape_script_json(snapshot_json))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// JSON inside <script> must not close the element early.
fn escape_script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}
