//! Server-rendered page components.

pub mod bio;
pub mod layout;
pub mod posts;
pub mod socials;

pub use bio::{Avatar, Bio};
pub use layout::PageLayout;
pub use posts::{Article, NotFound, PostList, PostSummary};
pub use socials::SocialLinks;
