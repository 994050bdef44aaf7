//! Server-rendered HTML shells for the public surface.
//!
//! Everything interpolated into these templates is either platform-owned
//! copy or passes through the escaping helpers; sanitized page bodies are
//! inserted as-is because the sanitizer already owns that boundary.

use domain::models::settings::PlatformSettings;
use domain::models::Page;
use domain::services::renderer::RenderPlan;

/// Escapes text for an HTML text node.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Escapes a value for a double-quoted HTML attribute (srcdoc included).
pub fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
    out
}

const SHELL_CSS: &str = "\
    body{margin:0;font-family:system-ui,-apple-system,sans-serif;color:#111}\
    .page-frame{display:block;border:0;width:100%;height:100vh}\
    .page-content{min-height:70vh}\
    .platform-footer{background:#111;color:#fff;padding:1.5rem;text-align:center;font-size:.875rem}\
    .platform-footer a{color:#fff;font-weight:600;text-decoration:none}\
    .terminal{min-height:70vh;display:flex;align-items:center;justify-content:center;text-align:center;padding:2rem}\
    .terminal a{color:#111;font-weight:600}\
    .notice-overlay{position:fixed;inset:0;z-index:50;display:flex;align-items:center;justify-content:center;background:rgba(17,24,39,.5);padding:1rem}\
    .notice-card{background:#fff;border-radius:1rem;max-width:28rem;width:100%;padding:1.5rem;box-shadow:0 25px 50px rgba(0,0,0,.25)}\
    .notice-card h2{margin-top:0}\
    .notice-contacts a{display:block;margin:.5rem 0;color:#111}\
    .notice-card button{width:100%;padding:.75rem;border:0;border-radius:9999px;background:#111;color:#fff;font-weight:600;cursor:pointer}";

fn shell(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n{head_extra}<style>{SHELL_CSS}</style>\n</head>\n\
         <body>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

fn head_meta(page: &Page) -> String {
    let mut head = String::new();
    if let Some(description) = &page.meta_description {
        head.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape_attr(description)
        ));
    }
    head.push_str(&format!(
        "<meta property=\"og:title\" content=\"{}\">\n",
        escape_attr(page.seo_title.as_deref().unwrap_or(&page.title))
    ));
    if let Some(og_image) = &page.og_image {
        head.push_str(&format!(
            "<meta property=\"og:image\" content=\"{}\">\n",
            escape_attr(og_image)
        ));
    }
    head
}

fn notice_overlay(settings: &PlatformSettings) -> String {
    let mut contacts = String::new();
    if !settings.notice_contact_phone.is_empty() {
        contacts.push_str(&format!(
            "<a href=\"tel:{phone}\">Call {phone}</a>",
            phone = escape_attr(&settings.notice_contact_phone)
        ));
    }
    if !settings.notice_contact_whatsapp.is_empty() {
        contacts.push_str(&format!(
            "<a href=\"https://wa.me/{}\" target=\"_blank\" rel=\"noopener noreferrer\">WhatsApp us</a>",
            escape_attr(&settings.notice_contact_whatsapp)
        ));
    }
    if !settings.platform_email.is_empty() {
        contacts.push_str(&format!(
            "<a href=\"mailto:{email}\">{email}</a>",
            email = escape_attr(&settings.platform_email)
        ));
    }

    format!(
        "<div id=\"payment-notice\" class=\"notice-overlay\" role=\"dialog\" aria-modal=\"true\">\
         <div class=\"notice-card\">\
         <h2>{title}</h2>\
         <p>{message}</p>\
         <div class=\"notice-contacts\">{contacts}</div>\
         <button id=\"payment-notice-dismiss\">Continue to Page</button>\
         </div></div>\
         <script>document.getElementById('payment-notice-dismiss').addEventListener('click',\
         function(){{var n=document.getElementById('payment-notice');if(n){{n.remove();}}}});</script>",
        title = escape_html(&settings.notice_title),
        message = escape_html(&settings.notice_message),
    )
}

fn platform_footer() -> String {
    "<footer class=\"platform-footer\"><p>Powered by <a href=\"/\">Pagecraft</a> \
     - professional landing pages for local businesses</p></footer>"
        .to_string()
}

/// Renders a visible page: notice overlay (at most once), then the content
/// per its render plan, then the platform footer.
pub fn visible_page(page: &Page, plan: &RenderPlan, notice: Option<&PlatformSettings>) -> String {
    let mut body = String::new();

    if let Some(settings) = notice {
        body.push_str(&notice_overlay(settings));
    }

    match plan {
        RenderPlan::SandboxedDocument { srcdoc, sandbox } => {
            body.push_str(&format!(
                "<iframe class=\"page-frame\" title=\"{title}\" sandbox=\"{tokens}\" \
                 srcdoc=\"{srcdoc}\"></iframe>",
                title = escape_attr(&page.title),
                tokens = sandbox.tokens(),
                srcdoc = escape_attr(srcdoc),
            ));
        }
        RenderPlan::InlineFragment { markup, scripts } => {
            body.push_str("<main class=\"page-content\">");
            body.push_str(markup);
            body.push_str("</main>");
            // Scripts lifted from the fragment are re-registered here, each
            // exactly once, after the markup they belong to.
            for script in scripts {
                body.push_str(&script.open_tag);
                body.push_str(&script.body);
                body.push_str("</script>");
            }
        }
    }

    body.push_str(&platform_footer());

    shell(
        page.seo_title.as_deref().unwrap_or(&page.title),
        &head_meta(page),
        &body,
    )
}

/// 404 page. Also served for unpublished pages so a slug's existence is not
/// leaked.
pub fn not_found_page() -> String {
    shell(
        "Page Not Found",
        "",
        "<div class=\"terminal\"><div>\
         <h1>Page Not Found</h1>\
         <p>The page you're looking for doesn't exist or has been removed.</p>\
         <p><a href=\"/explore\">Explore other pages</a></p>\
         </div></div>",
    )
}

/// 410 page for lapsed subscriptions.
pub fn expired_page() -> String {
    shell(
        "Page Expired",
        "",
        "<div class=\"terminal\"><div>\
         <h1>This page has expired</h1>\
         <p>The subscription for this page has ended. If you are the owner, \
         contact us to renew and bring it back online.</p>\
         <p><a href=\"/\">Back to home</a></p>\
         </div></div>",
    )
}

/// 503 page for store failures, lookup timeouts, and render failures.
pub fn unavailable_page() -> String {
    shell(
        "Page Unavailable",
        "",
        "<div class=\"terminal\"><div>\
         <h1>Something went wrong</h1>\
         <p>We couldn't load this page right now. Please try again in a moment.</p>\
         </div></div>",
    )
}

/// Server-rendered explore listing. Entries are `(slug, title)` pairs of
/// publicly visible pages.
pub fn explore_page(entries: &[(String, String)]) -> String {
    let mut body = String::from("<div class=\"terminal\"><div><h1>Explore</h1>");
    if entries.is_empty() {
        body.push_str("<p>No pages published yet.</p>");
    } else {
        body.push_str("<ul style=\"list-style:none;padding:0\">");
        for (slug, title) in entries {
            body.push_str(&format!(
                "<li><a href=\"/{slug}\">{title}</a></li>",
                slug = escape_attr(slug),
                title = escape_html(title),
            ));
        }
        body.push_str("</ul>");
    }
    body.push_str("</div></div>");
    shell("Explore", "", &body)
}

/// Minimal platform index.
pub fn index_page() -> String {
    shell(
        "Pagecraft",
        "",
        "<div class=\"terminal\"><div>\
         <h1>Pagecraft</h1>\
         <p>Professional landing pages for local businesses.</p>\
         <p><a href=\"/explore\">Explore published pages</a></p>\
         </div></div>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::PlanName;
    use uuid::Uuid;

    fn page_with_html(html: &str) -> Page {
        let now = Utc::now();
        Page {
            id: Uuid::new_v4(),
            slug: "shop1".into(),
            title: "Shop & Co".into(),
            meta_description: Some("Best \"shop\" in town".into()),
            seo_title: None,
            og_image: None,
            html: html.into(),
            owner_id: Uuid::new_v4(),
            published: true,
            is_paid: true,
            purchase_date: None,
            expiry_date: None,
            plan_name: PlanName::Basic,
            created_at: now,
            updated_at: now,
            created_by: None,
            last_edited_by: None,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"a\" & 'b'</b>"),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("a \"b\" & <c>"), "a &quot;b&quot; &amp; &lt;c>");
    }

    #[test]
    fn test_fragment_page_emits_lifted_script_once() {
        let page = page_with_html("<p>hi</p><script>console.log('boot')</script>");
        let plan = RenderPlan::build(&page.html).unwrap();
        let html = visible_page(&page, &plan, None);

        assert_eq!(html.matches("console.log('boot')").count(), 1);
        // The script sits after the content container, not inside it.
        let main_end = html.find("</main>").unwrap();
        let script_pos = html.find("console.log('boot')").unwrap();
        assert!(script_pos > main_end);
    }

    #[test]
    fn test_sandboxed_page_has_isolation_attributes() {
        let page = page_with_html(
            "<!DOCTYPE html><html><body><script>document.cookie</script></body></html>",
        );
        let plan = RenderPlan::build(&page.html).unwrap();
        let html = visible_page(&page, &plan, None);

        assert!(html.contains("sandbox=\"allow-scripts allow-popups\""));
        assert!(!html.contains("allow-same-origin"));
        // The document went into srcdoc, not into the host body.
        assert!(html.contains("srcdoc=\""));
        assert!(!html.contains("<body><script>document.cookie"));
    }

    #[test]
    fn test_notice_overlay_rendered_once_when_present() {
        let page = page_with_html("<p>hi</p>");
        let plan = RenderPlan::build(&page.html).unwrap();
        let settings = PlatformSettings::default();

        let with_notice = visible_page(&page, &plan, Some(&settings));
        assert_eq!(with_notice.matches("id=\"payment-notice\"").count(), 1);
        assert!(with_notice.contains(&escape_html(&settings.notice_title)));

        let without_notice = visible_page(&page, &plan, None);
        assert!(!without_notice.contains("payment-notice"));
    }

    #[test]
    fn test_notice_overlay_contact_channels() {
        let settings = PlatformSettings::default();
        let overlay = notice_overlay(&settings);
        assert!(overlay.contains("tel:"));
        assert!(overlay.contains("wa.me/"));
        assert!(overlay.contains("mailto:"));
        assert!(overlay.contains("payment-notice-dismiss"));
    }

    #[test]
    fn test_notice_overlay_skips_empty_channels() {
        let settings = PlatformSettings {
            notice_contact_phone: String::new(),
            notice_contact_whatsapp: String::new(),
            ..Default::default()
        };
        let overlay = notice_overlay(&settings);
        assert!(!overlay.contains("tel:"));
        assert!(!overlay.contains("wa.me/"));
        assert!(overlay.contains("mailto:"));
    }

    #[test]
    fn test_head_metadata_is_escaped() {
        let page = page_with_html("<p>hi</p>");
        let plan = RenderPlan::build(&page.html).unwrap();
        let html = visible_page(&page, &plan, None);

        assert!(html.contains("<title>Shop &amp; Co</title>"));
        assert!(html.contains("Best &quot;shop&quot; in town"));
    }

    #[test]
    fn test_terminal_pages_are_distinct() {
        let not_found = not_found_page();
        let expired = expired_page();
        let unavailable = unavailable_page();

        assert!(not_found.contains("doesn't exist"));
        assert!(expired.contains("renew"));
        assert!(unavailable.contains("try again"));
        assert_ne!(not_found, expired);
        assert_ne!(expired, unavailable);
    }
}
