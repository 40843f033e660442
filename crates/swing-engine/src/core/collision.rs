use std::collections::HashMap;

/// Tag carried by every collider. Pairwise rules in a [`CollisionTable`]
/// decide how two categories interact.
///
/// Categories map onto Rapier interaction-group bits, so only 32 exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionCategory(pub u8);

impl CollisionCategory {
    /// Category of colliders that never had one assigned.
    pub const DEFAULT: CollisionCategory = CollisionCategory(0);
    /// Number of distinct categories.
    pub const COUNT: u8 = 32;

    pub(crate) fn bit(self) -> u32 {
        1u32 << (self.0 % Self::COUNT)
    }

    pub(crate) fn from_user_data(data: u128) -> Self {
        CollisionCategory((data % Self::COUNT as u128) as u8)
    }

    pub(crate) fn to_user_data(self) -> u128 {
        (self.0 % Self::COUNT) as u128
    }
}

impl Default for CollisionCategory {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How colliders of two categories treat each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionRule {
    /// Contacts are resolved and reported.
    #[default]
    Collide,
    /// Contacts are reported but produce no response.
    ReportOnly,
    /// Contacts are neither computed nor reported.
    Ignore,
}

/// Symmetric table of category pair → rule. Pairs without an entry collide.
#[derive(Debug, Clone, Default)]
pub struct CollisionTable {
    rules: HashMap<(CollisionCategory, CollisionCategory), CollisionRule>,
}

impl CollisionTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: CollisionCategory, b: CollisionCategory) -> (CollisionCategory, CollisionCategory) {
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Set the rule for a pair. Order of `a` and `b` does not matter.
    pub fn set(&mut self, a: CollisionCategory, b: CollisionCategory, rule: CollisionRule) {
        let key = Self::key(a, b);
        if rule == CollisionRule::Collide {
            self.rules.remove(&key);
        } else {
            self.rules.insert(key, rule);
        }
    }

    /// Look up the rule for a pair.
    pub fn rule(&self, a: CollisionCategory, b: CollisionCategory) -> CollisionRule {
        self.rules
            .get(&Self::key(a, b))
            .copied()
            .unwrap_or_default()
    }

    /// Bitmask of categories `category` generates contacts with (reported or resolved).
    pub(crate) fn contact_filter(&self, category: CollisionCategory) -> u32 {
        self.filter_where(category, |rule| rule != CollisionRule::Ignore)
    }

    /// Bitmask of categories `category` produces a contact response with.
    pub(crate) fn solver_filter(&self, category: CollisionCategory) -> u32 {
        self.filter_where(category, |rule| rule == CollisionRule::Collide)
    }

    fn filter_where(&self, category: CollisionCategory, keep: impl Fn(CollisionRule) -> bool) -> u32 {
        (0..CollisionCategory::COUNT)
            .map(CollisionCategory)
            .filter(|&other| keep(self.rule(category, other)))
            .fold(0u32, |mask, other| mask | other.bit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALL: CollisionCategory = CollisionCategory(1);
    const SEGMENT: CollisionCategory = CollisionCategory(2);
    const BLOCK: CollisionCategory = CollisionCategory(3);

    #[test]
    fn unknown_pairs_collide() {
        let table = CollisionTable::new();
        assert_eq!(table.rule(WALL, BLOCK), CollisionRule::Collide);
        assert_eq!(table.contact_filter(BLOCK), u32::MAX);
    }

    #[test]
    fn rules_are_symmetric() {
        let mut table = CollisionTable::new();
        table.set(SEGMENT, WALL, CollisionRule::Ignore);
        assert_eq!(table.rule(WALL, SEGMENT), CollisionRule::Ignore);
        assert_eq!(table.rule(SEGMENT, WALL), CollisionRule::Ignore);
    }

    #[test]
    fn filters_drop_ignored_categories() {
        let mut table = CollisionTable::new();
        table.set(SEGMENT, WALL, CollisionRule::Ignore);
        table.set(SEGMENT, SEGMENT, CollisionRule::Ignore);
        table.set(SEGMENT, BLOCK, CollisionRule::ReportOnly);

        let contact = table.contact_filter(SEGMENT);
        assert_eq!(contact & WALL.bit(), 0);
        assert_eq!(contact & SEGMENT.bit(), 0);
        assert_ne!(contact & BLOCK.bit(), 0);

        let solver = table.solver_filter(SEGMENT);
        assert_eq!(solver & BLOCK.bit(), 0);
        assert_ne!(solver & CollisionCategory::DEFAULT.bit(), 0);

        // Walls still see everything except segments.
        assert_eq!(table.contact_filter(WALL), u32::MAX & !SEGMENT.bit());
    }

    #[test]
    fn resetting_to_collide_clears_entry() {
        let mut table = CollisionTable::new();
        table.set(WALL, BLOCK, CollisionRule::Ignore);
        table.set(BLOCK, WALL, CollisionRule::Collide);
        assert_eq!(table.rule(WALL, BLOCK), CollisionRule::Collide);
    }
}
