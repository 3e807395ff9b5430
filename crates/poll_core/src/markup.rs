//! Fixed markup fragments written into job elements.
use crate::{ElementContent, JobKind};

pub(crate) const LOADING_INDICATOR: &str =
    "<div class='loading'><img src='/static/img/loading.gif'></div>";
pub(crate) const PREVIEW_FAILURE: &str = "<p><strong class='red'>Preview Failure</strong></p>";
pub(crate) const COMPOSITE_FAILURE: &str = "<p><strong class='red'>Composite Failure</strong></p>";

/// Escapes text for insertion between tags.
pub fn escape_text(raw: &str) -> String {
    v_htmlescape::escape(raw).to_string()
}

/// Escapes a value for a double-quoted attribute.
///
/// Leaves `/` and `'` alone so URLs stay readable in the rendered links.
pub fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn render_content(content: &ElementContent) -> String {
    match content {
        ElementContent::Original(html) => html.clone(),
        ElementContent::Loading => LOADING_INDICATOR.to_string(),
        ElementContent::StatusSlot {
            before,
            status,
            after,
        } => format!("{before}{}{after}", escape_text(status)),
        ElementContent::PreviewImage { url } => {
            let url = escape_attr(url);
            format!("<a href=\"{url}\"><img src=\"{url}\"></a>")
        }
        ElementContent::DownloadLink { url } => format!(
            "<a class=\"button not-rounded full-width center\" href=\"{}\">Download full size image.</a>",
            escape_attr(url)
        ),
        ElementContent::Failure { kind } => match kind {
            JobKind::Preview => PREVIEW_FAILURE.to_string(),
            JobKind::FullRender => COMPOSITE_FAILURE.to_string(),
        },
    }
}
