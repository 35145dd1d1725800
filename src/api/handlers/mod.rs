//! HTTP request handlers.

pub mod auth_handler;
pub mod dashboard_handler;
pub mod help_handler;

pub use auth_handler::auth_routes;
pub use dashboard_handler::dashboard_routes;
pub use help_handler::help_routes;

use crate::session::FlashMessage;

/// Minimal HTML page shell shared by the rendered views.
pub(crate) fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - Gatehouse</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

/// Render drained flash messages as a list, or nothing when there are none.
pub(crate) fn render_flashes(flashes: &[FlashMessage]) -> String {
    if flashes.is_empty() {
        return String::new();
    }

    let items: String = flashes
        .iter()
        .map(|f| {
            format!(
                "<li class=\"{}\">{}</li>",
                f.level.css_class(),
                escape_html(&f.text)
            )
        })
        .collect();

    format!("<ul class=\"flashes\">{}</ul>", items)
}

/// Escape text for interpolation into HTML.
pub(crate) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{FlashLevel, FlashMessage};

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>\"&'</script>"),
            "&lt;script&gt;&quot;&amp;&#x27;&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_render_flashes_empty() {
        assert!(render_flashes(&[]).is_empty());
    }

    #[test]
    fn test_render_flashes_escapes_text() {
        let flashes = vec![FlashMessage {
            level: FlashLevel::Error,
            text: "<b>".to_string(),
        }];

        let html = render_flashes(&flashes);
        assert!(html.contains("flash-error"));
        assert!(html.contains("&lt;b&gt;"));
    }
}
