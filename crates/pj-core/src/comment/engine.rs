//! Comment tree engine
//!
//! Pure transformations over a [`CommentForest`]: every operation takes the
//! current forest by reference and returns the next one. The input is never
//! touched, so a host can compare before and after, persist the result, or
//! throw it away.
//!
//! Two flavours exist for each operation. The `try_` methods report why
//! nothing happened; the plain methods log the reason and hand back an
//! unchanged copy of the input.

use super::builder::CommentBuilder;
use super::model::{CommentForest, CommentNode};
use super::validator::CommentValidator;
use crate::config::EngineConfig;
use crate::error::{PandajeonError, Result};
use crate::types::{CommentId, IdAllocator};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A single mutation request against a forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommentCommand {
    /// Add a top-level comment, or a reply when `parent` is set
    Insert {
        content: String,
        author: String,
        time_label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<CommentId>,
    },
    /// Flip the viewer's like on a comment at any depth
    ToggleLike { target: CommentId },
}

/// Applies insert and like operations to comment forests
#[derive(Debug, Clone, Default)]
pub struct CommentEngine {
    validator: CommentValidator,
}

impl CommentEngine {
    /// Create an engine with default validation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine from configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            validator: CommentValidator::from_config(config),
        }
    }

    /// Create an engine with a custom validator
    pub fn with_validator(validator: CommentValidator) -> Self {
        Self { validator }
    }

    /// Validator in use
    pub fn validator(&self) -> &CommentValidator {
        &self.validator
    }

    /// Insert a comment, returning the new forest and the new node's id
    pub fn try_insert_comment(
        &self,
        forest: &CommentForest,
        content: &str,
        author: &str,
        time_label: &str,
        parent_id: Option<CommentId>,
        ids: &mut dyn IdAllocator,
    ) -> Result<(CommentForest, CommentId)> {
        self.validator.validate_content(content)?;

        let mut next = forest.clone();
        let siblings = match parent_id {
            None => next.roots_mut(),
            Some(parent_id) => {
                let (parent, depth) = locate_mut(next.roots_mut(), parent_id, 0)
                    .ok_or(PandajeonError::TargetNotFound(parent_id))?;
                self.validator.validate_depth(depth)?;
                &mut parent.children
            }
        };

        let id = CommentId(ids.allocate());
        if forest.contains(id) {
            return Err(PandajeonError::DuplicateId(id));
        }

        let node = CommentBuilder::new()
            .content(content)
            .author(author)
            .time_label(time_label)
            .build(id)?;
        siblings.push(node);

        debug!(comment = %id, parent = ?parent_id, "Inserted comment");
        Ok((next, id))
    }

    /// Insert a comment; any rejected input leaves the forest unchanged
    pub fn insert_comment(
        &self,
        forest: &CommentForest,
        content: &str,
        author: &str,
        time_label: &str,
        parent_id: Option<CommentId>,
        ids: &mut dyn IdAllocator,
    ) -> CommentForest {
        match self.try_insert_comment(forest, content, author, time_label, parent_id, ids) {
            Ok((next, _)) => next,
            Err(err) => {
                log_no_op("insert", &err);
                forest.clone()
            }
        }
    }

    /// Toggle the like on a comment, failing if it does not exist
    pub fn try_toggle_like(&self, forest: &CommentForest, target_id: CommentId) -> Result<CommentForest> {
        let mut next = forest.clone();
        let (node, _) = locate_mut(next.roots_mut(), target_id, 0)
            .ok_or(PandajeonError::TargetNotFound(target_id))?;
        node.toggle_like();

        debug!(
            comment = %target_id,
            likes = node.like_count,
            liked = node.liked_by_viewer,
            "Toggled like"
        );
        Ok(next)
    }

    /// Toggle the like on a comment; an unknown id leaves the forest unchanged
    pub fn toggle_like(&self, forest: &CommentForest, target_id: CommentId) -> CommentForest {
        match self.try_toggle_like(forest, target_id) {
            Ok(next) => next,
            Err(err) => {
                log_no_op("toggle_like", &err);
                forest.clone()
            }
        }
    }

    /// Apply a command, reporting why it was not applied
    pub fn try_apply(
        &self,
        forest: &CommentForest,
        command: &CommentCommand,
        ids: &mut dyn IdAllocator,
    ) -> Result<CommentForest> {
        match command {
            CommentCommand::Insert {
                content,
                author,
                time_label,
                parent,
            } => self
                .try_insert_comment(forest, content, author, time_label, *parent, ids)
                .map(|(next, _)| next),
            CommentCommand::ToggleLike { target } => self.try_toggle_like(forest, *target),
        }
    }

    /// Apply a command with no-op semantics
    pub fn apply(
        &self,
        forest: &CommentForest,
        command: &CommentCommand,
        ids: &mut dyn IdAllocator,
    ) -> CommentForest {
        match self.try_apply(forest, command, ids) {
            Ok(next) => next,
            Err(err) => {
                log_no_op("apply", &err);
                forest.clone()
            }
        }
    }
}

/// Insert with a default-configured engine
pub fn insert_comment(
    forest: &CommentForest,
    content: &str,
    author: &str,
    time_label: &str,
    parent_id: Option<CommentId>,
    ids: &mut dyn IdAllocator,
) -> CommentForest {
    CommentEngine::new().insert_comment(forest, content, author, time_label, parent_id, ids)
}

/// Toggle a like with a default-configured engine
pub fn toggle_like(forest: &CommentForest, target_id: CommentId) -> CommentForest {
    CommentEngine::new().toggle_like(forest, target_id)
}

/// Find a node and its depth anywhere below `nodes`
fn locate_mut(
    nodes: &mut [CommentNode],
    id: CommentId,
    depth: usize,
) -> Option<(&mut CommentNode, usize)> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some((node, depth));
        }
        if let Some(found) = locate_mut(&mut node.children, id, depth + 1) {
            return Some(found);
        }
    }
    None
}

fn log_no_op(operation: &str, err: &PandajeonError) {
    match err {
        PandajeonError::EmptyContent => debug!(operation, "Ignoring empty comment"),
        _ => warn!(operation, error = %err, "Comment operation left forest unchanged"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReplyDepth;
    use crate::types::SequentialIds;
    use pretty_assertions::assert_eq;

    fn leaf(id: u64, likes: u32) -> CommentNode {
        CommentBuilder::new()
            .content(format!("comment {}", id))
            .author("panda")
            .time_label("5분 전")
            .likes(likes)
            .build(CommentId(id))
            .unwrap()
    }

    fn with_children(mut node: CommentNode, children: Vec<CommentNode>) -> CommentNode {
        node.children = children;
        node
    }

    fn nested_forest() -> CommentForest {
        CommentForest::from(vec![
            with_children(
                leaf(101, 5),
                vec![with_children(leaf(102, 1), vec![leaf(103, 0)]), leaf(104, 2)],
            ),
            leaf(201, 0),
        ])
    }

    /// Pairs of nodes whose like state differs between two same-shaped forests
    fn like_changes(before: &CommentForest, after: &CommentForest) -> Vec<CommentId> {
        before
            .walk()
            .zip(after.walk())
            .filter(|((_, a), (_, b))| {
                assert_eq!(a.id, b.id);
                assert_eq!(a.content, b.content);
                (a.like_count, a.liked_by_viewer) != (b.like_count, b.liked_by_viewer)
            })
            .map(|((_, a), _)| a.id)
            .collect()
    }

    #[test]
    fn test_insert_into_empty_forest() {
        let mut ids = SequentialIds::starting_at(1);
        let forest = insert_comment(&CommentForest::new(), "nice", "panda1", "now", None, &mut ids);

        assert_eq!(forest.len(), 1);
        let root = &forest.roots()[0];
        assert_eq!(root.content, "nice");
        assert_eq!(root.author, "panda1");
        assert_eq!(root.created_label, "now");
        assert_eq!(root.like_count, 0);
        assert!(!root.liked_by_viewer);
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_root_insert_appends_after_last_root() {
        let before = nested_forest();
        let mut ids = SequentialIds::after(&before);
        let after = insert_comment(&before, "third", "u3", "now", None, &mut ids);

        let order: Vec<CommentId> = after.roots().iter().map(|n| n.id).collect();
        assert_eq!(order, vec![CommentId(101), CommentId(201), CommentId(202)]);
        assert_eq!(&after.roots()[..2], before.roots());
    }

    #[test]
    fn test_reply_to_root() {
        let before = CommentForest::from(vec![leaf(101, 0)]);
        let mut ids = SequentialIds::starting_at(500);
        let after = insert_comment(&before, "reply text", "u2", "now", Some(CommentId(101)), &mut ids);

        let root = &after.roots()[0];
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].content, "reply text");
        assert_eq!(root.children[0].id, CommentId(500));
        assert_eq!(root.id, before.roots()[0].id);
        assert_eq!(root.content, before.roots()[0].content);
        assert_eq!(root.like_count, before.roots()[0].like_count);
    }

    #[test]
    fn test_reply_appends_at_end_of_deep_parent() {
        let before = nested_forest();
        let mut ids = SequentialIds::starting_at(900);
        let (after, id) = CommentEngine::new()
            .try_insert_comment(&before, "deep", "u", "now", Some(CommentId(102)), &mut ids)
            .unwrap();

        assert_eq!(id, CommentId(900));
        let parent = after.get(CommentId(102)).unwrap();
        let children: Vec<CommentId> = parent.children.iter().map(|n| n.id).collect();
        assert_eq!(children, vec![CommentId(103), CommentId(900)]);
        assert_eq!(after.depth_of(id), Some(2));
        assert_eq!(after.total_count(), before.total_count() + 1);
    }

    #[test]
    fn test_insert_unknown_parent_is_no_op() {
        let before = nested_forest();
        let mut ids = SequentialIds::starting_at(1000);
        let after = insert_comment(&before, "x", "u", "t", Some(CommentId(999)), &mut ids);
        assert_eq!(after, before);

        let err = CommentEngine::new()
            .try_insert_comment(&before, "x", "u", "t", Some(CommentId(999)), &mut ids)
            .unwrap_err();
        assert!(matches!(err, PandajeonError::TargetNotFound(CommentId(999))));
    }

    #[test]
    fn test_insert_empty_content_is_no_op() {
        let before = nested_forest();
        let mut ids = SequentialIds::starting_at(1000);

        assert_eq!(insert_comment(&before, "", "u", "t", None, &mut ids), before);
        assert_eq!(
            insert_comment(&before, "", "u", "t", Some(CommentId(101)), &mut ids),
            before
        );

        let err = CommentEngine::new()
            .try_insert_comment(&before, "", "u", "t", None, &mut ids)
            .unwrap_err();
        assert!(matches!(err, PandajeonError::EmptyContent));
    }

    #[test]
    fn test_insert_whitespace_content() {
        let before = CommentForest::from(vec![leaf(101, 0)]);
        let mut ids = SequentialIds::starting_at(1000);
        let after = insert_comment(&before, "  ", "u", "t", Some(CommentId(101)), &mut ids);

        let reply = after.get(CommentId(1000)).unwrap();
        assert_eq!(reply.content, "  ");
        assert_eq!(after.total_count(), 2);
    }

    #[test]
    fn test_insert_long_content_under_default_engine() {
        let long = "가".repeat(20_000);
        let mut ids = SequentialIds::starting_at(1);
        let after = insert_comment(&CommentForest::new(), &long, "u", "now", None, &mut ids);

        assert_eq!(after.len(), 1);
        assert_eq!(after.roots()[0].content, long);
    }

    #[test]
    fn test_configured_length_cap_is_no_op() {
        let engine = CommentEngine::with_validator(CommentValidator::new().with_max_length(10));
        let before = CommentForest::new();
        let mut ids = SequentialIds::starting_at(1);

        let err = engine
            .try_insert_comment(&before, &"가".repeat(11), "u", "now", None, &mut ids)
            .unwrap_err();
        assert!(matches!(err, PandajeonError::ContentTooLong { max: 10 }));
        assert_eq!(
            engine.insert_comment(&before, &"가".repeat(11), "u", "now", None, &mut ids),
            before
        );
    }

    #[test]
    fn test_insert_rejects_colliding_id() {
        let before = nested_forest();
        let mut ids = SequentialIds::starting_at(103);
        let err = CommentEngine::new()
            .try_insert_comment(&before, "dup", "u", "t", None, &mut ids)
            .unwrap_err();
        assert!(matches!(err, PandajeonError::DuplicateId(CommentId(103))));
    }

    #[test]
    fn test_two_tier_limit_rejects_reply_to_reply() {
        let engine = CommentEngine::with_validator(
            CommentValidator::new().with_reply_depth(ReplyDepth::TWO_TIER),
        );
        let before = nested_forest();
        let mut ids = SequentialIds::starting_at(1000);

        assert!(engine
            .try_insert_comment(&before, "ok", "u", "t", Some(CommentId(101)), &mut ids)
            .is_ok());

        let err = engine
            .try_insert_comment(&before, "too deep", "u", "t", Some(CommentId(102)), &mut ids)
            .unwrap_err();
        assert!(matches!(err, PandajeonError::DepthLimitExceeded { depth: 2, max: 1 }));
        assert_eq!(
            engine.insert_comment(&before, "too deep", "u", "t", Some(CommentId(102)), &mut ids),
            before
        );
    }

    #[test]
    fn test_toggle_like_scenario() {
        let forest = CommentForest::from(vec![leaf(101, 5)]);

        let liked = toggle_like(&forest, CommentId(101));
        let node = &liked.roots()[0];
        assert_eq!((node.like_count, node.liked_by_viewer), (6, true));

        let unliked = toggle_like(&liked, CommentId(101));
        let node = &unliked.roots()[0];
        assert_eq!((node.like_count, node.liked_by_viewer), (5, false));
    }

    #[test]
    fn test_double_toggle_is_identity_at_every_depth() {
        let forest = nested_forest();
        for (_, node) in forest.walk() {
            let once = toggle_like(&forest, node.id);
            let twice = toggle_like(&once, node.id);
            assert_eq!(twice, forest);
        }
    }

    #[test]
    fn test_toggle_changes_exactly_one_node() {
        let forest = nested_forest();
        for (_, node) in forest.walk() {
            let after = toggle_like(&forest, node.id);
            assert_eq!(like_changes(&forest, &after), vec![node.id]);
        }
    }

    #[test]
    fn test_toggle_unknown_id_is_no_op() {
        let forest = nested_forest();
        assert_eq!(toggle_like(&forest, CommentId(999)), forest);
        assert!(CommentEngine::new()
            .try_toggle_like(&forest, CommentId(999))
            .is_err());
    }

    #[test]
    fn test_input_forest_is_untouched() {
        let forest = nested_forest();
        let snapshot = forest.clone();
        let mut ids = SequentialIds::after(&forest);

        let _ = toggle_like(&forest, CommentId(103));
        let _ = insert_comment(&forest, "hi", "u", "t", Some(CommentId(103)), &mut ids);

        assert_eq!(forest, snapshot);
    }

    #[test]
    fn test_apply_commands() {
        let engine = CommentEngine::new();
        let mut ids = SequentialIds::starting_at(1);
        let commands = vec![
            CommentCommand::Insert {
                content: "first".to_string(),
                author: "a".to_string(),
                time_label: "now".to_string(),
                parent: None,
            },
            CommentCommand::Insert {
                content: "reply".to_string(),
                author: "b".to_string(),
                time_label: "now".to_string(),
                parent: Some(CommentId(1)),
            },
            CommentCommand::ToggleLike { target: CommentId(2) },
            CommentCommand::ToggleLike { target: CommentId(42) },
        ];

        let forest = commands
            .iter()
            .fold(CommentForest::new(), |f, cmd| engine.apply(&f, cmd, &mut ids));

        assert_eq!(forest.total_count(), 2);
        let reply = forest.get(CommentId(2)).unwrap();
        assert_eq!((reply.like_count, reply.liked_by_viewer), (1, true));
    }

    #[test]
    fn test_command_serialization() {
        let cmd = CommentCommand::ToggleLike { target: CommentId(101) };
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"type":"toggle_like","target":101}"#);

        let parsed: CommentCommand =
            serde_json::from_str(r#"{"type":"insert","content":"c","author":"a","time_label":"t"}"#)
                .unwrap();
        assert!(matches!(parsed, CommentCommand::Insert { parent: None, .. }));
    }
}
