use std::collections::HashSet;

use poll_core::{escape_attr, ElementContent, JobElement, JobKey, JobKind};
use scraper::{ElementRef, Html, Selector};

/// Id of the nested node whose text a full-render poll rewrites.
pub const STATUS_NODE_ID: &str = "js-fullstatus";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanOutcome {
    /// Job elements in document order.
    pub elements: Vec<JobElement>,
    pub skipped: Vec<SkippedElement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedElement {
    pub kind: JobKind,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingId,
    DuplicateId(String),
}

/// Finds every element awaiting a preview or full render.
///
/// An element carrying both marker classes yields one job element per kind.
pub fn scan_page(html: &str) -> ScanOutcome {
    let doc = Html::parse_document(html);
    let marker_sel = Selector::parse(".js-nopreview, .js-nofull").ok();
    let status_sel = Selector::parse(&format!("#{STATUS_NODE_ID}")).ok();

    let mut outcome = ScanOutcome::default();
    let Some(marker_sel) = marker_sel else {
        return outcome;
    };

    let mut seen: HashSet<JobKey> = HashSet::new();
    for element in doc.select(&marker_sel) {
        for kind in JobKind::ALL {
            if !has_class(element, kind.marker_class()) {
                continue;
            }
            let id = element.value().attr("id").unwrap_or_default().trim();
            if id.is_empty() {
                outcome.skipped.push(SkippedElement {
                    kind,
                    reason: SkipReason::MissingId,
                });
                continue;
            }
            let key = JobKey::new(kind, id);
            if !seen.insert(key.clone()) {
                outcome.skipped.push(SkippedElement {
                    kind,
                    reason: SkipReason::DuplicateId(id.to_string()),
                });
                continue;
            }
            let content = match kind {
                JobKind::Preview => ElementContent::Original(element.inner_html()),
                JobKind::FullRender => status_slot(element, status_sel.as_ref())
                    .unwrap_or_else(|| ElementContent::Original(element.inner_html())),
            };
            let (open_tag, close_tag) = tags(element);
            outcome
                .elements
                .push(JobElement::new(key, open_tag, close_tag, content));
        }
    }
    outcome
}

fn has_class(element: ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn tags(element: ElementRef) -> (String, String) {
    let name = element.value().name();
    let mut open = format!("<{name}");
    for (attr, value) in element.value().attrs() {
        open.push_str(&format!(" {attr}=\"{}\"", escape_attr(value)));
    }
    open.push('>');
    (open, format!("</{name}>"))
}

/// Splits the element's inner markup around its status node.
fn status_slot(element: ElementRef, status_sel: Option<&Selector>) -> Option<ElementContent> {
    let status_node = element.select(status_sel?).next()?;
    let inner = element.inner_html();
    let node_html = status_node.html();
    let node_inner = status_node.inner_html();
    // Void elements (`<input>`, `<img>`) have no text slot to rewrite.
    let close_tag = format!("</{}>", status_node.value().name());
    if !node_html.ends_with(&close_tag) {
        return None;
    }
    let close_len = close_tag.len();
    let open_len = node_html.len().checked_sub(node_inner.len() + close_len)?;
    if node_html.get(open_len..node_html.len() - close_len) != Some(node_inner.as_str()) {
        return None;
    }

    let start = inner.find(&node_html)?;
    let end = start + node_html.len();
    Some(ElementContent::StatusSlot {
        before: format!("{}{}", &inner[..start], &node_html[..open_len]),
        status: status_node.text().collect::<String>(),
        after: format!("{}{}", &node_html[node_html.len() - close_len..], &inner[end..]),
    })
}
