//! Comprehensive tests for context module.

#[cfg(test)]
mod tests {
    use crate::context::Context;
    use crate::scope::{ControlKind, LinkKind, RootKind, Scope};
    use chrono::{Duration as ChronoDuration, Utc};
    use std::time::Duration;

    #[test]
    fn test_cancel_link_has_parent_and_no_key() {
        let root: Context<&str, &str> = Context::background();
        let (ctx, _cancel) = root.with_cancel();

        assert!(Context::ptr_eq(ctx.parent_context().unwrap(), &root));
        assert!(ctx.key().is_none());
        assert_eq!(ctx.link_kind(), LinkKind::Control(ControlKind::Cancel));
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_cancel_is_local_to_link() {
        let (outer, cancel) = Context::<&str, &str>::background().with_cancel();
        let inner = outer.with_value("k", "v");

        assert!(!outer.is_cancelled());
        cancel.cancel("shutdown");

        assert!(outer.is_cancelled());
        assert_eq!(outer.cancel_reason(), Some("shutdown".to_string()));
        assert!(!inner.is_cancelled());
        assert!(inner.cancel_reason().is_none());
    }

    #[test]
    fn test_cancelled_link_still_walks() {
        let root = Context::background().with_value("k", "v");
        let (ctx, cancel) = root.with_cancel();
        cancel.cancel("done");

        assert_eq!(ctx.value(&"k"), Some(&"v"));
        assert!(ctx.parent().is_some());
    }

    #[test]
    fn test_with_deadline() {
        let at = Utc::now() + ChronoDuration::seconds(30);
        let (ctx, _cancel) = Context::<u32, u32>::todo().with_deadline(at);

        assert_eq!(ctx.deadline(), Some(at));
        assert_eq!(ctx.link_kind(), LinkKind::Control(ControlKind::Deadline));
        assert!(!ctx.is_expired());
        assert_eq!(
            ctx.parent_context().unwrap().link_kind(),
            LinkKind::Root(RootKind::Todo)
        );
    }

    #[test]
    fn test_zero_timeout_is_expired() {
        let (ctx, _cancel) = Context::<u32, u32>::background().with_timeout(Duration::ZERO);

        assert!(ctx.deadline().is_some());
        assert!(ctx.is_expired());
    }

    #[test]
    fn test_huge_timeout_saturates() {
        let (ctx, _cancel) = Context::<u32, u32>::background().with_timeout(Duration::MAX);

        assert_eq!(ctx.deadline(), Some(chrono::DateTime::<Utc>::MAX_UTC));
        assert!(!ctx.is_expired());
    }

    #[test]
    fn test_value_link_inherits_deadline() {
        let (timed, _cancel) = Context::<&str, i32>::background()
            .with_timeout(Duration::from_secs(60));
        let ctx = timed.with_value("n", 1);

        assert_eq!(ctx.deadline(), timed.deadline());
        assert!(ctx.deadline().is_some());
        assert!(!ctx.is_expired());
    }

    #[test]
    fn test_nearest_deadline_wins() {
        let outer_at = Utc::now() + ChronoDuration::seconds(10);
        let inner_at = Utc::now() + ChronoDuration::seconds(90);

        let (ctx, _outer) = Context::<&str, i32>::background().with_deadline(outer_at);
        let ctx = ctx.with_value("a", 1);
        let (ctx, _cancel) = ctx.with_cancel();
        let (ctx, _inner) = ctx.with_deadline(inner_at);
        let leaf = ctx.with_value("b", 2);

        assert_eq!(leaf.deadline(), Some(inner_at));

        let (plain, _c) = Context::<&str, i32>::background()
            .with_deadline(outer_at)
            .0
            .with_cancel();
        assert_eq!(plain.deadline(), Some(outer_at));
    }

    #[test]
    fn test_expired_deadline_visible_from_leaf() {
        let (ctx, _cancel) = Context::<&str, i32>::background().with_timeout(Duration::ZERO);
        let leaf = ctx.with_value("late", 1);

        assert!(leaf.is_expired());
        assert!(Context::<&str, i32>::background().with_value("x", 1).deadline().is_none());
    }

    #[test]
    fn test_lookup_through_control_links() {
        let ctx = Context::background().with_value("a", 1);
        let (ctx, _c1) = ctx.with_cancel();
        let (ctx, _c2) = ctx.with_timeout(Duration::from_secs(5));
        let ctx = ctx.with_value("b", 2);

        assert_eq!(ctx.lookup(&"a"), Some(&1));
        assert_eq!(ctx.lookup(&"b"), Some(&2));
        assert_eq!(ctx.lookup(&"c"), None);
    }

    #[test]
    fn test_zero_like_keys_and_values() {
        let ctx = Context::background().with_value("", 0).with_value("zero", 0);

        assert_eq!(ctx.value(&""), Some(&0));
        assert_eq!(ctx.parent_context().unwrap().key(), Some(&""));
    }

    #[test]
    fn test_deep_chain_drops_without_overflow() {
        let mut ctx = Context::background();
        for i in 0..200_000_u32 {
            ctx = ctx.with_value(i, i);
        }

        assert_eq!(ctx.value(&0), Some(&0));
        drop(ctx);
    }

    #[test]
    fn test_shared_ancestor_survives_leaf_drop() {
        let base = Context::background().with_value("shared", 1);
        let leaf = base.with_value("leaf", 2);
        drop(leaf);

        assert_eq!(base.value(&"shared"), Some(&1));
    }

    #[test]
    fn test_context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context<String, String>>();
    }
}
