use chrono::NaiveDate;
use folio_kit_core::{Post, SiteSettings};
use leptos::prelude::*;

/// Display format for post dates, e.g. "June 01, 2024"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// A post as shown in the homepage listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub title: String,
    pub url: String,
    pub date: String,
    pub description: Option<String>,
}

impl PostSummary {
    pub fn from_post(post: &Post, settings: &SiteSettings) -> Self {
        Self {
            title: post.title.clone(),
            url: settings.url_for(&format!("{}/", post.output_dir())),
            date: format_date(post.date),
            description: post.description.clone(),
        }
    }
}

#[component]
pub fn PostList(posts: Vec<PostSummary>) -> impl IntoView {
    if posts.is_empty() {
        return view! { <p class="no-posts">"No blog posts found."</p> }.into_any();
    }

    view! {
        <ol class="post-list">
            {posts
                .into_iter()
                .map(|post| {
                    view! {
                        <li>
                            <article class="post-list-item">
                                <header>
                                    <h2>
                                        <a href=post.url>{post.title}</a>
                                    </h2>
                                    <small>{post.date}</small>
                                </header>
                                {post.description.map(|description| view! { <p>{description}</p> })}
                            </article>
                        </li>
                    }
                })
                .collect_view()}
        </ol>
    }
    .into_any()
}

/// A single post. `content_html` is trusted, already-rendered markdown.
#[component]
pub fn Article(
    #[prop(into)] title: String,
    #[prop(into)] date: String,
    #[prop(into)] content_html: String,
) -> impl IntoView {
    view! {
        <article class="blog-post">
            <header>
                <h1>{title}</h1>
                <p>{date}</p>
            </header>
            <section inner_html=content_html></section>
        </article>
    }
}

#[component]
pub fn NotFound() -> impl IntoView {
    view! {
        <h1>"404: Not Found"</h1>
        <p>"You just hit a route that doesn't exist."</p>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn settings() -> SiteSettings {
        SiteSettings {
            title: "Blog".to_string(),
            owner: "Jane".to_string(),
            description: None,
            path_prefix: "/blog".to_string(),
        }
    }

    fn post() -> Post {
        Post {
            slug: "hello-world".to_string(),
            title: "Hello World".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            description: Some("First post".to_string()),
            body: "# Hi".to_string(),
            source: PathBuf::from("content/posts/hello-world.md"),
        }
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(format_date(date), "June 01, 2024");
    }

    #[test]
    fn test_summary_from_post() {
        let summary = PostSummary::from_post(&post(), &settings());
        assert_eq!(summary.url, "/blog/posts/hello-world/");
        assert_eq!(summary.date, "June 01, 2024");
        assert_eq!(summary.description.as_deref(), Some("First post"));
    }

    #[test]
    fn test_post_list() {
        let posts = vec![PostSummary::from_post(&post(), &settings())];
        let html = view! { <PostList posts=posts/> }.to_html();
        assert!(html.contains(r#"<a href="/blog/posts/hello-world/">Hello World</a>"#));
        assert!(html.contains("<small>June 01, 2024</small>"));
        assert!(html.contains("<p>First post</p>"));
    }

    #[test]
    fn test_empty_post_list() {
        let posts: Vec<PostSummary> = Vec::new();
        let html = view! { <PostList posts=posts/> }.to_html();
        assert!(html.contains("No blog posts found."));
        assert!(!html.contains("<ol"));
    }

    #[test]
    fn test_article_keeps_rendered_markdown() {
        let html = view! {
            <Article title="Hello" date="June 01, 2024" content_html="<h2>Section</h2>"/>
        }
        .to_html();
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<h2>Section</h2>"));
    }
}
