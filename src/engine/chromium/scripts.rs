//! JavaScript evaluated inside the page during a crawl

/// Document readiness check polled until the page settles
pub const READY_STATE_SCRIPT: &str = r#"
    (function() {
        return {
            readyState: document.readyState,
            imagesLoaded: Array.from(document.images).every(img => img.complete),
            bodyExists: document.body !== null
        };
    })()
"#;

/// Scroll one viewport down; reports whether the bottom was reached
pub const SCROLL_STEP_SCRIPT: &str = r#"
    (() => {
        const el = document.scrollingElement || document.documentElement;
        window.scrollBy(0, window.innerHeight);
        return Math.ceil(window.scrollY + window.innerHeight) >= el.scrollHeight;
    })()
"#;

pub const SCROLL_TOP_SCRIPT: &str = "window.scrollTo(0, 0); true";

/// Remove consent banners, modals and fixed/sticky layers that cover content
pub const REMOVE_OVERLAYS_SCRIPT: &str = r#"
    (() => {
        const selectors = [
            '[id*="cookie" i]', '[class*="cookie" i]',
            '[id*="consent" i]', '[class*="consent" i]',
            '[class*="modal" i]', '[class*="popup" i]',
            '[class*="overlay" i]', '[role="dialog"]', '[aria-modal="true"]'
        ];
        let removed = 0;
        document.querySelectorAll(selectors.join(',')).forEach(el => {
            if (el === document.body || el === document.documentElement) return;
            el.remove();
            removed++;
        });
        document.querySelectorAll('body *').forEach(el => {
            const style = window.getComputedStyle(el);
            if ((style.position === 'fixed' || style.position === 'sticky')
                && parseInt(style.zIndex || '0', 10) >= 100) {
                el.remove();
                removed++;
            }
        });
        document.body.style.overflow = 'auto';
        return removed;
    })()
"#;

pub const METADATA_SCRIPT: &str = r#"
    (() => {
        const meta = {};
        document.querySelectorAll('meta').forEach(tag => {
            const name = tag.getAttribute('name') || tag.getAttribute('property');
            const content = tag.getAttribute('content');
            if (name && content) {
                meta[name] = content;
            }
        });
        const out = {
            title: document.title || null,
            description: meta['description'] || meta['og:description'] || null,
            keywords: meta['keywords'] || null,
            author: meta['author'] || meta['og:author'] || null,
            language: document.documentElement.lang || null,
            canonical_url: document.querySelector('link[rel="canonical"]')?.href || null
        };
        Object.keys(meta)
            .filter(k => k.startsWith('og:') || k.startsWith('twitter:') || k.startsWith('article:'))
            .forEach(k => { out[k] = meta[k]; });
        return out;
    })()
"#;

/// Script returning the joined outer HTML of every match for `selector`,
/// or `null` when nothing matches
#[must_use]
pub fn selector_html_script(selector: &str) -> String {
    // JSON string literals are valid JS string literals
    let quoted = serde_json::Value::String(selector.to_string()).to_string();
    format!(
        r#"
    (() => {{
        const nodes = Array.from(document.querySelectorAll({quoted}));
        if (nodes.length === 0) return null;
        return nodes.map(n => n.outerHTML).join('\n');
    }})()
"#
    )
}
