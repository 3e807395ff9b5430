use crate::markup::render_content;
use crate::JobKey;

/// Current content of a job element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementContent {
    /// Markup as served by the page, untouched.
    Original(String),
    /// Preview loading indicator.
    Loading,
    /// Full-render markup split around the inner `#js-fullstatus` node.
    /// `before` ends with the node's opening tag, `after` starts with its closing tag.
    StatusSlot {
        before: String,
        status: String,
        after: String,
    },
    PreviewImage { url: String },
    DownloadLink { url: String },
    Failure { kind: crate::JobKind },
}

/// Page model of one element awaiting a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobElement {
    key: JobKey,
    open_tag: String,
    close_tag: String,
    content: ElementContent,
}

impl JobElement {
    pub fn new(
        key: JobKey,
        open_tag: impl Into<String>,
        close_tag: impl Into<String>,
        content: ElementContent,
    ) -> Self {
        Self {
            key,
            open_tag: open_tag.into(),
            close_tag: close_tag.into(),
            content,
        }
    }

    /// A bare `<div>` element, mostly for tests and synthetic pages.
    pub fn div(key: JobKey, content: ElementContent) -> Self {
        let open_tag = format!(
            "<div id=\"{}\" class=\"{}\">",
            crate::escape_attr(&key.job_id),
            key.kind.marker_class()
        );
        Self::new(key, open_tag, "</div>", content)
    }

    pub fn key(&self) -> &JobKey {
        &self.key
    }

    pub fn content(&self) -> &ElementContent {
        &self.content
    }

    pub fn inner_html(&self) -> String {
        render_content(&self.content)
    }

    pub fn render_outer_html(&self) -> String {
        format!("{}{}{}", self.open_tag, self.inner_html(), self.close_tag)
    }

    pub(crate) fn replace_content(&mut self, content: ElementContent) -> bool {
        if self.content == content {
            return false;
        }
        self.content = content;
        true
    }

    /// Rewrites the status node text. Elements without a status node are left alone.
    pub(crate) fn set_status_text(&mut self, label: &str) -> bool {
        match &mut self.content {
            ElementContent::StatusSlot { status, .. } if status != label => {
                *status = label.to_string();
                true
            }
            _ => false,
        }
    }
}
