//! Generation-bounded traversal of a family graph.
//!
//! Starting from a root person at level 0, each level is one full
//! reproductive generation of descent:
//!
//! - the **level assignment** holds, per level, the persons whose families
//!   are expanded to produce the next level (the root at 0, then the
//!   children of every family reached from level `n - 1`);
//! - the **visit log** records who is drawn at each level: for every family
//!   of a person at level `n`, the family's principal (father, else mother,
//!   else the root) and, for each family of that principal, both parents at
//!   `n` and the children at `n + 1`.
//!
//! Spouses are folded into the level of the person they married and never
//! recurse on their own. Nothing beyond `max_level` is ever assigned or
//! recorded; branches past the bound are dropped silently.
//!
//! A person appears at most once per level, but may appear at several
//! levels when reached through distinct paths (e.g. consanguineous unions).

use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use crate::models::{Family, Handle, Person};
use crate::tree::{resolve, FamilyTree};

/// Level → persons assigned to that level, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelAssignment {
    levels: BTreeMap<i32, Vec<Handle>>,
}

impl LevelAssignment {
    /// Add `person` to `level` unless it is already there.
    pub fn insert(&mut self, level: i32, person: Handle) -> bool {
        let slot = self.levels.entry(level).or_default();
        if slot.contains(&person) {
            return false;
        }
        slot.push(person);
        true
    }

    pub fn get(&self, level: i32) -> &[Handle] {
        self.levels.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, level: i32, person: &Handle) -> bool {
        self.get(level).contains(person)
    }

    pub fn deepest_level(&self) -> Option<i32> {
        self.levels
            .iter()
            .rev()
            .find(|(_, p)| !p.is_empty())
            .map(|(l, _)| *l)
    }
}

/// One `(person, level)` visit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisitRecord {
    pub person: Handle,
    pub level: i32,
}

/// Ordered visit records, unique on `(person, level)`, with per-level counts.
#[derive(Debug, Clone, Default)]
pub struct VisitLog {
    records: Vec<VisitRecord>,
    seen: HashSet<(Handle, i32)>,
    counts: BTreeMap<i32, usize>,
}

impl VisitLog {
    pub fn record(&mut self, person: &Handle, level: i32) -> bool {
        if !self.seen.insert((person.clone(), level)) {
            return false;
        }
        self.records.push(VisitRecord {
            person: person.clone(),
            level,
        });
        *self.counts.entry(level).or_default() += 1;
        true
    }

    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    pub fn at_level(&self, level: i32) -> impl Iterator<Item = &Handle> {
        self.records
            .iter()
            .filter(move |r| r.level == level)
            .map(|r| &r.person)
    }

    /// Number of persons visited at `level` (zero when none).
    pub fn count(&self, level: i32) -> usize {
        self.counts.get(&level).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<i32, usize> {
        &self.counts
    }
}

/// Incremental walker: one call to [`advance_to`](Self::advance_to) and
/// [`record_level`](Self::record_level) per generation.
#[derive(Debug, Clone)]
pub struct GenerationWalker {
    root: Handle,
    max_level: i32,
    levels: LevelAssignment,
    visits: VisitLog,
    expanded: i32,
    recorded: HashSet<i32>,
}

impl GenerationWalker {
    pub fn new(root: Handle, max_level: u32) -> Self {
        let mut levels = LevelAssignment::default();
        levels.insert(0, root.clone());
        let mut visits = VisitLog::default();
        visits.record(&root, 0);
        Self {
            root,
            max_level: i32::try_from(max_level).unwrap_or(i32::MAX),
            levels,
            visits,
            expanded: 0,
            recorded: HashSet::new(),
        }
    }

    /// Walk every level from 0 to `max_level` in one go.
    pub fn walk(tree: &dyn FamilyTree, root: Handle, max_level: u32) -> Self {
        let mut walker = Self::new(root, max_level);
        for level in 0..=walker.max_level {
            walker.advance_to(tree, level);
            walker.record_level(tree, level);
        }
        walker
    }

    pub fn root(&self) -> &Handle {
        &self.root
    }

    pub fn max_level(&self) -> i32 {
        self.max_level
    }

    pub fn levels(&self) -> &LevelAssignment {
        &self.levels
    }

    pub fn visits(&self) -> &VisitLog {
        &self.visits
    }

    /// Make sure the level assignment is populated up to `level` (capped at
    /// the bound), deriving each new level from the previous frontier.
    pub fn advance_to(&mut self, tree: &dyn FamilyTree, level: i32) {
        let target = level.min(self.max_level);
        while self.expanded < target {
            let next = self.expanded + 1;
            let frontier = self.levels.get(self.expanded).to_vec();
            for handle in &frontier {
                let Some(person) = lookup_person(tree, handle) else {
                    continue;
                };
                for family in families_of(tree, &person) {
                    let Some(principal) = self.principal(tree, &family) else {
                        continue;
                    };
                    for family in families_of(tree, &principal) {
                        for child in &family.children {
                            if lookup_person(tree, child).is_some() {
                                self.levels.insert(next, child.clone());
                            }
                        }
                    }
                }
            }
            trace!(level = next, persons = self.levels.get(next).len(), "level assigned");
            self.expanded = next;
        }
    }

    /// Record the visits contributed by the families of every person
    /// assigned to `level`. Recording a level twice is a no-op.
    pub fn record_level(&mut self, tree: &dyn FamilyTree, level: i32) {
        if level > self.max_level || !self.recorded.insert(level) {
            return;
        }
        self.advance_to(tree, level);
        let assigned = self.levels.get(level).to_vec();
        for handle in &assigned {
            let Some(person) = lookup_person(tree, handle) else {
                continue;
            };
            for family in families_of(tree, &person) {
                self.record_family(tree, &family, level);
            }
        }
    }

    fn record_family(&mut self, tree: &dyn FamilyTree, family: &Family, level: i32) {
        let Some(principal) = self.principal(tree, family) else {
            return;
        };
        self.visit(&principal.handle, level);
        for family in families_of(tree, &principal) {
            for parent in [&family.father, &family.mother].into_iter().flatten() {
                if lookup_person(tree, parent).is_some() {
                    self.visit(parent, level);
                }
            }
            for child in &family.children {
                if lookup_person(tree, child).is_some() {
                    self.visit(child, level + 1);
                }
            }
        }
    }

    fn visit(&mut self, person: &Handle, level: i32) {
        if level > self.max_level {
            trace!(%person, level, "visit beyond generation bound pruned");
            return;
        }
        self.visits.record(person, level);
    }

    /// Father, else mother, else the traversal root.
    fn principal(&self, tree: &dyn FamilyTree, family: &Family) -> Option<Person> {
        family
            .father
            .as_ref()
            .and_then(|h| lookup_person(tree, h))
            .or_else(|| family.mother.as_ref().and_then(|h| lookup_person(tree, h)))
            .or_else(|| lookup_person(tree, &self.root))
    }
}

fn lookup_person(tree: &dyn FamilyTree, handle: &Handle) -> Option<Person> {
    resolve("person", handle, tree.get_person_from_handle(handle))
}

fn families_of(tree: &dyn FamilyTree, person: &Person) -> Vec<Family> {
    person
        .families
        .iter()
        .filter_map(|h| resolve("family", h, tree.get_family_from_handle(h)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn handles(ids: &[&str]) -> Vec<Handle> {
        ids.iter().map(|h| Handle::new(*h)).collect()
    }

    fn visited(walker: &GenerationWalker, level: i32) -> Vec<Handle> {
        walker.visits().at_level(level).cloned().collect()
    }

    #[test]
    fn one_level_per_generation() {
        let fx = Fixture::descent();
        let walker = GenerationWalker::walk(&fx.tree, Handle::new("root"), 5);

        assert_eq!(walker.levels().get(0), handles(&["root"]).as_slice());
        assert_eq!(walker.levels().get(1), handles(&["c1", "c2"]).as_slice());
        assert_eq!(walker.levels().get(2), handles(&["g1"]).as_slice());
        assert_eq!(walker.levels().get(3), handles(&["gg1"]).as_slice());
        assert!(walker.levels().get(4).is_empty());
        assert_eq!(walker.levels().deepest_level(), Some(3));
    }

    #[test]
    fn oversized_bound_saturates() {
        let walker = GenerationWalker::new(Handle::new("root"), u32::MAX);
        assert_eq!(walker.max_level(), i32::MAX);
        assert_eq!(walker.levels().get(0), handles(&["root"]).as_slice());
    }

    #[test]
    fn spouses_fold_into_their_partners_level() {
        let fx = Fixture::descent();
        let walker = GenerationWalker::walk(&fx.tree, Handle::new("root"), 5);

        assert_eq!(visited(&walker, 0), handles(&["root", "spouse"]));
        assert_eq!(visited(&walker, 1), handles(&["c1", "c2", "d1"]));
        // f3's father is h1, so h1 is the principal of g1's family.
        assert_eq!(visited(&walker, 2), handles(&["g1", "h1"]));
        assert_eq!(visited(&walker, 3), handles(&["gg1"]));
        assert_eq!(walker.visits().count(4), 0);
    }

    #[test]
    fn depth_bound_prunes_deeper_levels() {
        let fx = Fixture::descent();
        let walker = GenerationWalker::walk(&fx.tree, Handle::new("root"), 1);

        assert_eq!(walker.levels().deepest_level(), Some(1));
        assert!(walker.levels().get(2).is_empty());
        assert!(walker.visits().records().iter().all(|r| r.level <= 1));
        assert_eq!(walker.visits().counts().keys().max(), Some(&1));
    }

    #[test]
    fn person_level_pairs_are_unique() {
        let fx = Fixture::descent();
        let mut walker = GenerationWalker::walk(&fx.tree, Handle::new("root"), 5);
        // Re-recording must not duplicate anything.
        walker.record_level(&fx.tree, 1);

        let mut seen = HashSet::new();
        for r in walker.visits().records() {
            assert!(seen.insert((r.person.clone(), r.level)));
        }
    }

    #[test]
    fn consanguineous_union_reaches_person_on_two_levels() {
        // Cousin marriage across generations: x is a child of root (level 1)
        // and also a child of c (level 2) through a second family.
        let fx = Fixture::new();
        fx.person("root", "Root", &[], &["f1"])
            .person("c", "C", &[], &["f2"])
            .person("x", "X", &[], &[])
            .family("f1", Some("root"), None, &["c", "x"], &[])
            .family("f2", Some("c"), None, &["x"], &[]);
        let walker = GenerationWalker::walk(&fx.tree, Handle::new("root"), 3);

        assert!(walker.levels().contains(1, &Handle::new("x")));
        assert!(walker.levels().contains(2, &Handle::new("x")));
        assert_eq!(walker.levels().get(1), handles(&["c", "x"]).as_slice());
    }

    #[test]
    fn family_without_parents_falls_back_to_root() {
        let fx = Fixture::new();
        fx.person("root", "Root", &[], &["f"])
            .person("kid", "Kid", &[], &[])
            .family("f", None, None, &["kid"], &[]);
        let walker = GenerationWalker::walk(&fx.tree, Handle::new("root"), 2);

        assert_eq!(walker.levels().get(1), handles(&["kid"]).as_slice());
        assert_eq!(visited(&walker, 0), handles(&["root"]));
        assert_eq!(visited(&walker, 1), handles(&["kid"]));
    }

    #[test]
    fn dangling_references_are_skipped() {
        let fx = Fixture::new();
        fx.person("root", "Root", &[], &["f", "gone"])
            .person("kid", "Kid", &[], &[])
            .family("f", Some("root"), Some("ghost"), &["nobody", "kid"], &[]);
        let walker = GenerationWalker::walk(&fx.tree, Handle::new("root"), 2);

        assert_eq!(walker.levels().get(1), handles(&["kid"]).as_slice());
        assert_eq!(visited(&walker, 0), handles(&["root"]));
    }

    #[test]
    fn root_without_families_only_visits_itself() {
        let fx = Fixture::new();
        fx.person("root", "Root", &[], &[]);
        let walker = GenerationWalker::walk(&fx.tree, Handle::new("root"), 4);
        assert_eq!(walker.visits().records().len(), 1);
        assert_eq!(walker.visits().count(0), 1);
    }

    #[test]
    fn incremental_advance_matches_full_walk() {
        let fx = Fixture::descent();
        let full = GenerationWalker::walk(&fx.tree, Handle::new("root"), 3);

        let mut stepwise = GenerationWalker::new(Handle::new("root"), 3);
        for level in 0..=3 {
            stepwise.advance_to(&fx.tree, level);
            stepwise.record_level(&fx.tree, level);
            assert!(stepwise.visits().records().iter().all(|r| r.level <= level + 1));
        }
        assert_eq!(stepwise.levels(), full.levels());
        assert_eq!(stepwise.visits().records(), full.visits().records());
    }
}
