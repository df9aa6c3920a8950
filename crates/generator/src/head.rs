//! Render-body hook: document attributes and head fragments.
//!
//! The host (see [`crate::document::Document`]) owns the document shell and
//! exposes two setters. [`on_render_body`] runs once per page against them.

use crate::document::html_escape;
use folio_kit_core::AnalyticsConfig;
use std::collections::BTreeMap;

pub const DOCUMENT_LANG: &str = "en";

pub const LOADER_KEY: &str = "analytics-loader";
pub const CONFIG_KEY: &str = "analytics-config";

/// Attributes set on the `<html>` element, rendered in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlAttributes(BTreeMap<String, String>);

impl HtmlAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn merge(&mut self, other: HtmlAttributes) {
        self.0.extend(other.0);
    }

    /// ` lang="en"`-style attribute list, each entry with a leading space
    pub fn to_html(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| format!(r#" {}="{}""#, name, html_escape(value)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentKind {
    ExternalScript { src: String },
    InlineScript { body: String },
}

/// One tag injected into `<head>`. `key` identifies it across hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadFragment {
    pub key: String,
    pub kind: FragmentKind,
}

impl HeadFragment {
    pub fn external_script(key: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: FragmentKind::ExternalScript { src: src.into() },
        }
    }

    pub fn inline_script(key: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: FragmentKind::InlineScript { body: body.into() },
        }
    }

    pub fn to_html(&self) -> String {
        match &self.kind {
            FragmentKind::ExternalScript { src } => format!(
                r#"<script type="text/javascript" src="{}"></script>"#,
                html_escape(src)
            ),
            // "</" would close the element early
            FragmentKind::InlineScript { body } => {
                format!("<script>{}</script>", body.replace("</", "<\\/"))
            }
        }
    }
}

/// Capabilities the page host hands to [`on_render_body`].
pub trait RenderBodyHost {
    fn set_html_attributes(&mut self, attributes: HtmlAttributes);
    /// Appends; earlier fragments keep their position.
    fn set_head_components(&mut self, components: Vec<HeadFragment>);
}

/// Inline snippet that seeds `window.dataLayer` and configures the tag.
/// Relies on the loader script having been placed before it.
pub fn analytics_config_snippet(analytics: &AnalyticsConfig) -> String {
    format!(
        "window.dataLayer = window.dataLayer || []; \
         function gtag(){{dataLayer.push(arguments);}} \
         gtag('js', new Date()); \
         gtag('config', '{}');",
        analytics.tracking_id
    )
}

/// Set the document language and append the analytics loader followed by
/// its configuration snippet.
pub fn on_render_body<H: RenderBodyHost + ?Sized>(host: &mut H, analytics: &AnalyticsConfig) {
    host.set_html_attributes(HtmlAttributes::new().with("lang", DOCUMENT_LANG));

    host.set_head_components(vec![
        HeadFragment::external_script(LOADER_KEY, analytics.loader_url()),
        HeadFragment::inline_script(CONFIG_KEY, analytics_config_snippet(analytics)),
    ]);
}
