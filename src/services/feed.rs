// src/services/feed.rs

use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::post::PostView,
    pagination::{POSTS_PER_PAGE, Page, Paginator},
    services::posts::POST_VIEW_SELECT,
};

/// Which posts a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// Every post (home page).
    All,
    /// Posts of one group, by group id.
    Group(i64),
    /// Posts written by one user.
    Author(i64),
    /// Posts by every author the given user follows.
    FollowedBy(i64),
}

impl FeedScope {
    /// SQL condition on `posts p` and its bound parameter.
    fn filter(&self) -> (&'static str, Option<i64>) {
        match *self {
            FeedScope::All => ("1 = 1", None),
            FeedScope::Group(group_id) => ("p.group_id = ?", Some(group_id)),
            FeedScope::Author(author_id) => ("p.author_id = ?", Some(author_id)),
            FeedScope::FollowedBy(user_id) => (
                "p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = ?)",
                Some(user_id),
            ),
        }
    }
}

/// One page of posts in `scope`, newest first (`pub_date`, then `id`).
///
/// `raw_page` is the unparsed `?page=` value; see `Paginator::get_page`.
pub async fn list_posts(
    pool: &SqlitePool,
    scope: FeedScope,
    raw_page: Option<&str>,
) -> Result<Page<PostView>, AppError> {
    let (condition, param) = scope.filter();

    let count_sql = format!("SELECT COUNT(*) FROM posts p WHERE {}", condition);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(value) = param {
        count_query = count_query.bind(value);
    }
    let count = count_query.fetch_one(pool).await?;

    let paginator = Paginator::new(count, POSTS_PER_PAGE);
    let window = paginator.get_page(raw_page);

    let page_sql = format!(
        "{} WHERE {} ORDER BY p.pub_date DESC, p.id DESC LIMIT ? OFFSET ?",
        POST_VIEW_SELECT, condition
    );
    let mut page_query = sqlx::query_as::<_, PostView>(&page_sql);
    if let Some(value) = param {
        page_query = page_query.bind(value);
    }
    let posts = page_query
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(pool)
        .await?;

    tracing::debug!(
        "Listed {:?}: page {} of {} ({} posts)",
        scope,
        window.number,
        paginator.num_pages(),
        posts.len()
    );

    Ok(Page::new(&paginator, window, posts))
}
