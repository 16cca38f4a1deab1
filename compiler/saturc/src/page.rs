//! Page finalization: the host-props bootstrap and the development reload
//! script.

use satur_eval::{esc2uni, Value};

/// `<script>` that hands the page's host props to the client runtime.
///
/// The JSON is escaped so it cannot close the script element early.
pub fn bootstrap_script(page_props: &Value) -> String {
    format!("<script>Satur.pageProps = {}</script>", esc2uni(page_props))
}

/// `<script>` that connects to the development server's socket and reloads
/// the page when the connection drops.
pub fn dev_reload_script(ws_port: u16) -> String {
    format!(
        r#"<script>
    (() => {{
        const ws = new WebSocket("ws://" + location.hostname + ":{ws_port}")
        ws.onopen = () => console.log("Connected to development server.")
        ws.onclose = () => location.reload()
    }})()
</script>"#
    )
}

/// Insert `fragment` before the last `</body>` (any case), or append it when
/// the page has no body close tag.
pub fn inject_before_body_end(html: &str, fragment: &str) -> String {
    let at = html
        .to_ascii_lowercase()
        .rfind("</body>")
        .unwrap_or(html.len());
    let mut out = String::with_capacity(html.len() + fragment.len());
    out.push_str(&html[..at]);
    out.push_str(fragment);
    out.push_str(&html[at..]);
    out
}

/// Add the bootstrap script, and the reload script when `dev_port` is set.
pub(crate) fn finalize(html: &str, page_props: &Value, dev_port: Option<u16>) -> String {
    let mut scripts = bootstrap_script(page_props);
    if let Some(port) = dev_port {
        scripts.push_str(&dev_reload_script(port));
    }
    inject_before_body_end(html, &scripts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bootstrap_escapes_script_breakers() {
        let props = Value::object([(
            "card".to_owned(),
            Value::object([("card".to_owned(), Value::from("</script>"))]),
        )]);
        assert_eq!(
            bootstrap_script(&props),
            r#"<script>Satur.pageProps = {"card":{"card":"\u003c\u002fscript\u003e"}}</script>"#
        );
    }

    #[test]
    fn test_reload_script_uses_port() {
        let script = dev_reload_script(6000);
        assert!(script.contains(r#"":6000")"#));
        assert!(script.contains("location.reload()"));
    }

    #[test]
    fn test_inject_before_last_body_close() {
        assert_eq!(
            inject_before_body_end("<html><BODY>x</BODY></html>", "<s/>"),
            "<html><BODY>x<s/></BODY></html>"
        );
        assert_eq!(inject_before_body_end("<p>frag</p>", "<s/>"), "<p>frag</p><s/>");
    }

    #[test]
    fn test_finalize_without_dev_has_no_socket() {
        let html = finalize("<body></body>", &Value::empty_object(), None);
        assert_eq!(html, "<body><script>Satur.pageProps = {}</script></body>");
        let html = finalize("<body></body>", &Value::empty_object(), Some(5501));
        assert!(html.contains("WebSocket"));
        assert!(html.ends_with("</script></body>"));
    }
}
