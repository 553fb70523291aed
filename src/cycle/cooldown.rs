//! Cool-down category allow/block lists: after a risky cycle,
//! only low-risk categories may be proposed until the cool-down lapses.

use crate::ticket::proposal::Category;

const COOLDOWN_ALLOWED: &[Category] = &[Category::Docs, Category::Test, Category::Cleanup];

pub fn is_allowed_during_cooldown(category: &Category) -> bool {
    matches!(
        category,
        Category::Docs | Category::Test | Category::Cleanup
    )
}

pub fn cooldown_allowlist() -> &'static [Category] {
    COOLDOWN_ALLOWED
}
