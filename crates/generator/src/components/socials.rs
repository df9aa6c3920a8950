use folio_kit_core::{MetadataProvider, MissingHandlePolicy, Social, SocialPlatform};
use leptos::prelude::*;
use std::sync::Arc;

pub const ICON_BACKGROUND: &str = "#3A3D40";

fn icon_style() -> String {
    format!("background-color: {}", ICON_BACKGROUND)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialSlot {
    Link {
        platform: SocialPlatform,
        url: String,
    },
    Placeholder {
        platform: SocialPlatform,
    },
}

/// One slot per platform in fixed order, with the missing-handle policy applied.
pub fn social_slots(social: Option<&Social>) -> Vec<SocialSlot> {
    let policy = social.map(|s| s.missing).unwrap_or_default();

    SocialPlatform::ALL
        .iter()
        .filter_map(|&platform| match social.and_then(|s| s.handle(platform)) {
            Some(handle) => Some(SocialSlot::Link {
                platform,
                url: platform.profile_url(handle),
            }),
            None => match policy {
                MissingHandlePolicy::Skip => {
                    tracing::debug!(platform = platform.name(), "no social handle, skipping");
                    None
                }
                MissingHandlePolicy::Placeholder => Some(SocialSlot::Placeholder { platform }),
            },
        })
        .collect()
}

#[component]
pub fn SocialLinks(metadata: Arc<dyn MetadataProvider>) -> impl IntoView {
    let slots = social_slots(metadata.social());

    view! {
        <div class="socials">
            {slots
                .into_iter()
                .map(|slot| match slot {
                    SocialSlot::Link { platform, url } => {
                        let name = platform.name();
                        let style = icon_style();
                        view! {
                            <a
                                class="social-icon"
                                href=url
                                target="_blank"
                                rel="noopener noreferrer"
                                aria-label=name
                                style=style
                            >
                                <span class="social-icon-label">{name}</span>
                            </a>
                        }
                            .into_any()
                    }
                    SocialSlot::Placeholder { platform } => {
                        let name = platform.name();
                        let style = icon_style();
                        view! {
                            <span
                                class="social-icon social-icon--missing"
                                aria-label=name
                                style=style
                            >
                                <span class="social-icon-label">{name}</span>
                            </span>
                        }
                            .into_any()
                    }
                })
                .collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_kit_core::SiteMetadata;

    fn all_jane() -> Social {
        Social {
            linkedin: Some("jane".to_string()),
            twitter: Some("jane".to_string()),
            instagram: Some("jane".to_string()),
            facebook: Some("jane".to_string()),
            github: Some("jane".to_string()),
            missing: MissingHandlePolicy::Skip,
        }
    }

    fn render(social: Option<Social>) -> String {
        let metadata: Arc<dyn MetadataProvider> = Arc::new(SiteMetadata {
            author: None,
            social,
        });
        view! { <SocialLinks metadata=metadata/> }.to_html()
    }

    const JANE_URLS: [&str; 5] = [
        "https://www.linkedin.com/in/jane",
        "https://www.twitter.com/jane",
        "https://www.instagram.com/jane",
        "https://www.facebook.com/jane",
        "https://www.github.com/jane",
    ];

    #[test]
    fn test_icon_style_uses_background_constant() {
        assert_eq!(icon_style(), format!("background-color: {}", ICON_BACKGROUND));
    }

    #[test]
    fn test_slots_in_fixed_order() {
        let slots = social_slots(Some(&all_jane()));
        let urls: Vec<&str> = slots
            .iter()
            .map(|slot| match slot {
                SocialSlot::Link { url, .. } => url.as_str(),
                SocialSlot::Placeholder { .. } => panic!("unexpected placeholder"),
            })
            .collect();
        assert_eq!(urls, JANE_URLS);
    }

    #[test]
    fn test_renders_five_links_in_order() {
        let html = render(Some(all_jane()));
        assert_eq!(html.matches(r#"class="social-icon""#).count(), 5);

        let positions: Vec<usize> = JANE_URLS
            .iter()
            .map(|url| {
                html.find(&format!(r#"href="{}""#, url))
                    .unwrap_or_else(|| panic!("missing {}", url))
            })
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(html.matches(ICON_BACKGROUND).count(), 5);
    }

    #[test]
    fn test_skip_policy_omits_missing_platforms() {
        let social = Social {
            twitter: None,
            github: Some("  ".to_string()),
            ..all_jane()
        };
        let slots = social_slots(Some(&social));
        assert_eq!(slots.len(), 3);
        assert!(
            slots
                .iter()
                .all(|slot| matches!(slot, SocialSlot::Link { .. }))
        );

        let html = render(Some(social));
        assert!(!html.contains("twitter.com"));
        assert!(!html.contains("github.com"));
        assert!(!html.contains("undefined"));
        assert!(!html.contains("social-icon--missing"));
    }

    #[test]
    fn test_placeholder_policy_keeps_slots() {
        let social = Social {
            linkedin: Some("jane".to_string()),
            missing: MissingHandlePolicy::Placeholder,
            ..Default::default()
        };
        let slots = social_slots(Some(&social));
        assert_eq!(slots.len(), 5);
        assert_eq!(
            slots[1],
            SocialSlot::Placeholder {
                platform: SocialPlatform::Twitter
            }
        );

        let html = render(Some(social));
        assert_eq!(html.matches("social-icon--missing").count(), 4);
        assert_eq!(html.matches("href=").count(), 1);
    }

    #[test]
    fn test_no_social_section_renders_empty_container() {
        assert!(social_slots(None).is_empty());
        let html = render(None);
        assert!(html.contains(r#"<div class="socials">"#));
        assert!(!html.contains("href="));
    }

    #[test]
    fn test_render_is_idempotent() {
        assert_eq!(render(Some(all_jane())), render(Some(all_jane())));
    }
}
