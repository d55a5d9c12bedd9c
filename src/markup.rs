use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref ITALIC: Regex = Regex::new(r"\*(.*?)\*").unwrap();
    static ref NUMBERED_ITEM: Regex = Regex::new(r"(\d+\. )").unwrap();
}

/// Renders the lightweight markup the assistant emits into inline HTML.
///
/// The rule table is fixed and order-sensitive: bold before italic (so a
/// `**` pair is not eaten as two `*` pairs), newlines before numbered-item
/// breaks, double-break collapse last. Applied at output time only;
/// message content is stored untransformed.
pub fn render(content: &str) -> String {
    let rendered = BOLD.replace_all(content, "<strong>$1</strong>");
    let rendered = ITALIC.replace_all(&rendered, "<em>$1</em>");
    let rendered = rendered.replace('\n', "<br>");
    let rendered = NUMBERED_ITEM.replace_all(&rendered, "<br>$1");
    rendered.replace("<br><br>", "<br>")
}
