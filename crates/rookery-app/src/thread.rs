//! Comment tree traversal.
//!
//! A thread is rendered by walking the tree depth-first: each comment is
//! followed by its replies, one level deeper. The walk yields flat
//! [`CommentRow`]s so a terminal can render the tree as an indented list and
//! move a selection cursor through it.

use std::{collections::HashMap, slice};

use rookery_client::{Comment, CommentId, UserId};

use crate::LikeState;

/// One rendered comment with its nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRow<'a> {
    /// The comment.
    pub comment: &'a Comment,
    /// 0 for top-level comments, parent depth + 1 for replies.
    pub depth: usize,
    /// Like flag and count as currently displayed.
    pub like: LikeState,
}

/// Depth-first rows for `comments`, replies directly after their parent in
/// server order.
pub fn flatten<'a>(
    comments: &'a [Comment],
    likes: &HashMap<CommentId, LikeState>,
) -> Vec<CommentRow<'a>> {
    walk(comments)
        .map(|(comment, depth)| {
            let like = likes.get(&comment.id).copied().unwrap_or_else(|| server_like(comment, None));
            CommentRow { comment, depth, like }
        })
        .collect()
}

/// Find a comment anywhere in the tree.
pub fn find<'a>(comments: &'a [Comment], id: &CommentId) -> Option<&'a Comment> {
    walk(comments).map(|(comment, _)| comment).find(|comment| &comment.id == id)
}

/// Total comments in the tree, replies included.
pub fn count(comments: &[Comment]) -> usize {
    walk(comments).count()
}

/// Like state for every comment in the tree, as reported by the server.
pub fn like_states(comments: &[Comment], viewer: Option<&UserId>) -> HashMap<CommentId, LikeState> {
    walk(comments).map(|(comment, _)| (comment.id.clone(), server_like(comment, viewer))).collect()
}

fn walk(comments: &[Comment]) -> Walk<'_> {
    Walk { stack: vec![(comments.iter(), 0)] }
}

/// Pre-order walk yielding each comment with its depth. Uses an explicit
/// stack, so reply chains of any depth are safe.
struct Walk<'a> {
    stack: Vec<(slice::Iter<'a, Comment>, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a Comment, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (siblings, depth) = self.stack.last_mut()?;
            let depth = *depth;
            match siblings.next() {
                Some(comment) => {
                    self.stack.push((comment.replies.iter(), depth + 1));
                    return Some((comment, depth));
                },
                None => {
                    self.stack.pop();
                },
            }
        }
    }
}

fn server_like(comment: &Comment, viewer: Option<&UserId>) -> LikeState {
    let liked = viewer.is_some_and(|viewer| comment.likes.iter().any(|user| &user.id == viewer));
    LikeState::new(liked, comment.likes.len() as u64)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rookery_client::{PostId, User};

    use super::*;

    fn comment(id: &str, replies: Vec<Comment>) -> Comment {
        Comment {
            id: CommentId::new(id),
            content: format!("body {id}"),
            author: User::new("u1", "ann"),
            post_id: PostId::new("p1"),
            parent_id: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            likes: Vec::new(),
            replies,
        }
    }

    fn tree() -> Vec<Comment> {
        vec![
            comment("a", vec![comment("a1", vec![comment("a1x", Vec::new())]), comment("a2", Vec::new())]),
            comment("b", Vec::new()),
        ]
    }

    #[test]
    fn flatten_is_depth_first_with_depths() {
        let comments = tree();
        let rows = flatten(&comments, &HashMap::new());
        let shape: Vec<(&str, usize)> =
            rows.iter().map(|row| (row.comment.id.as_str(), row.depth)).collect();

        assert_eq!(shape, vec![("a", 0), ("a1", 1), ("a1x", 2), ("a2", 1), ("b", 0)]);
    }

    #[test]
    fn single_reply_renders_one_level_deeper() {
        let comments = vec![comment("1", vec![comment("2", Vec::new())])];
        let rows = flatten(&comments, &HashMap::new());

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].comment.id.as_str(), rows[0].depth), ("1", 0));
        assert_eq!((rows[1].comment.id.as_str(), rows[1].depth), ("2", 1));
    }

    #[test]
    fn find_reaches_nested_replies() {
        let comments = tree();
        assert!(find(&comments, &CommentId::new("a1x")).is_some());
        assert!(find(&comments, &CommentId::new("zz")).is_none());
        assert_eq!(count(&comments), 5);
    }

    #[test]
    fn like_states_mark_viewer_likes() {
        let mut comments = tree();
        comments[1].likes = vec![User::new("u1", "ann"), User::new("u2", "bo")];

        let states = like_states(&comments, Some(&UserId::new("u2")));
        assert_eq!(states[&CommentId::new("b")], LikeState::new(true, 2));
        assert_eq!(states[&CommentId::new("a1x")], LikeState::new(false, 0));

        let anonymous = like_states(&comments, None);
        assert!(!anonymous[&CommentId::new("b")].liked);
    }

    #[test]
    fn deep_reply_chain_is_walked_without_recursion() {
        const DEPTH: usize = 200;
        let mut chain = comment(&format!("c{}", DEPTH - 1), Vec::new());
        for level in (0..DEPTH - 1).rev() {
            chain = comment(&format!("c{level}"), vec![chain]);
        }
        let comments = vec![chain];

        let rows = flatten(&comments, &HashMap::new());
        assert_eq!(rows.len(), DEPTH);
        assert!(rows.iter().enumerate().all(|(level, row)| row.depth == level));
        assert_eq!(count(&comments), DEPTH);
        assert!(find(&comments, &CommentId::new("c199")).is_some());
        assert_eq!(like_states(&comments, None).len(), DEPTH);
    }

    #[test]
    fn decoded_deep_thread_flattens() {
        const DEPTH: usize = 200;
        let mut json = String::new();
        for level in 0..DEPTH {
            json.push_str(&format!(
                r#"{{"id":"c{level}","content":"x","author":{{"id":"u1"}},"postId":"p1","createdAt":"2024-01-01T00:00:00Z","replies":["#
            ));
        }
        json.push_str(&"]}".repeat(DEPTH));

        let body = format!("[{json}]");
        let comments: Vec<Comment> = rookery_client::json::from_slice(body.as_bytes()).unwrap();
        let rows = flatten(&comments, &HashMap::new());

        assert_eq!(rows.len(), DEPTH);
        let deepest = rows.last().map(|row| (row.comment.id.as_str(), row.depth));
        assert_eq!(deepest, Some(("c199", DEPTH - 1)));
    }

    #[test]
    fn flatten_prefers_local_like_state() {
        let comments = tree();
        let mut likes = HashMap::new();
        likes.insert(CommentId::new("b"), LikeState::new(true, 9));

        let rows = flatten(&comments, &likes);
        assert_eq!(rows[4].like, LikeState::new(true, 9));
    }
}
