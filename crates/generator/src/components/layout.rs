use crate::clock::Clock;
use folio_kit_core::AnalyticsConfig;
use leptos::prelude::*;
use std::sync::Arc;

/// The home header is used only on the exact root path; no prefix matching.
pub fn is_root_path(current_path: &str, root_path: &str) -> bool {
    current_path == root_path
}

pub fn copyright_line(year: i32, owner: &str) -> String {
    format!("© {}, Copyright {}", year, owner)
}

/// Page shell: header, analytics loader, main content and footer.
///
/// The loader script is repeated in the body so the tag also fires on
/// client-side transitions, not only on full page loads.
#[component]
pub fn PageLayout(
    #[prop(into)] current_path: String,
    #[prop(into)] root_path: String,
    #[prop(into)] title: String,
    #[prop(into)] owner: String,
    analytics: AnalyticsConfig,
    clock: Arc<dyn Clock>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    let is_root = is_root_path(&current_path, &root_path);

    let header = if is_root {
        view! {
            <h1 class="main-heading">
                <a href=root_path>{title}</a>
            </h1>
        }
        .into_any()
    } else {
        view! { <a class="header-link-home" href=root_path>"Home"</a> }.into_any()
    };

    let footer = copyright_line(clock.current_year(), &owner);
    let loader_url = analytics.loader_url();
    let is_root_attr = is_root.to_string();

    view! {
        <div class="global-wrapper" data-is-root-path=is_root_attr>
            <script type="text/javascript" src=loader_url></script>
            <header class="global-header">{header}</header>
            <main>{children.map(|children| children())}</main>
            <footer>{footer}</footer>
        </div>
    }
}
