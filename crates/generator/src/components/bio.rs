use super::socials::SocialLinks;
use crate::avatar::AvatarImage;
use folio_kit_core::{Author, MetadataProvider};
use leptos::prelude::*;
use std::sync::Arc;

/// Name and optional summary, or `None` when there is no usable name.
pub fn byline(author: Option<&Author>) -> Option<(String, Option<String>)> {
    let author = author?;
    let name = author
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())?;
    let summary = author
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Some((name.to_string(), summary))
}

#[component]
pub fn Avatar(image: AvatarImage) -> impl IntoView {
    let AvatarImage {
        sources,
        fallback_src,
        size,
        alt,
    } = image;
    let width = size.to_string();
    let height = width.clone();

    view! {
        <picture class="bio-avatar">
            {sources
                .into_iter()
                .map(|(mime, src)| view! { <source type=mime srcset=src/> })
                .collect_view()}
            <img
                src=fallback_src
                width=width
                height=height
                alt=alt
                loading="lazy"
                decoding="async"
            />
        </picture>
    }
}

/// Avatar, byline and social links for the site author.
#[component]
pub fn Bio(metadata: Arc<dyn MetadataProvider>, avatar: AvatarImage) -> impl IntoView {
    let byline = byline(metadata.author());

    view! {
        <div class="bio-container">
            <div class="bio">
                <Avatar image=avatar/>
                {byline
                    .map(|(name, summary)| {
                        view! {
                            <p>
                                "Written by " <strong>{name}</strong>
                                {summary.map(|summary| format!(" {}", summary))}
                            </p>
                        }
                    })}
            </div>
            <SocialLinks metadata=metadata/>
        </div>
    }
}
