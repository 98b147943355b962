//! Ordered rule tables.
//!
//! A [`RuleTable`] evaluates its rules top to bottom and stops at the first
//! one whose guard holds. Later rules may therefore assume every earlier
//! guard was false, so the order of the table is part of its meaning.

use crate::Rule;

/// An ordered, first-match list of rules.
pub struct RuleTable<C> {
    name: &'static str,
    rules: Vec<Rule<C>>,
}

impl<C> RuleTable<C> {
    /// Creates a table from rules in priority order.
    ///
    /// # Panics
    ///
    /// Panics if `rules` is empty. A table with no rules never matches and
    /// almost certainly indicates a wiring mistake.
    pub fn new(name: &'static str, rules: Vec<Rule<C>>) -> Self {
        assert!(!rules.is_empty(), "RuleTable must have at least one rule");
        Self { name, rules }
    }

    /// Table name used in traces.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the first rule whose guard holds, without running any body.
    fn select(&self, ctx: &C) -> Option<&Rule<C>> {
        self.rules.iter().find(|rule| rule.matches(ctx))
    }

    /// Runs the first matching rule and returns its name.
    ///
    /// `on_match` receives the rule name after the guard is decided and
    /// before the body runs, so nested tables are observed outermost first.
    pub fn fire_with<F>(&self, ctx: &mut C, on_match: F) -> Option<&'static str>
    where
        F: FnOnce(&mut C, &'static str),
    {
        let rule = self.select(ctx)?;
        on_match(ctx, rule.name());
        rule.run(ctx);
        Some(rule.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Ctx {
        value: i32,
        log: Vec<&'static str>,
    }

    fn positive(ctx: &Ctx) -> bool {
        ctx.value > 0
    }

    fn even(ctx: &Ctx) -> bool {
        ctx.value % 2 == 0
    }

    fn never(_: &Ctx) -> bool {
        false
    }

    fn log_positive(ctx: &mut Ctx) {
        ctx.log.push("positive");
    }

    fn log_even(ctx: &mut Ctx) {
        ctx.log.push("even");
    }

    fn log_rest(ctx: &mut Ctx) {
        ctx.log.push("rest");
    }

    fn table() -> RuleTable<Ctx> {
        RuleTable::new(
            "numbers",
            vec![
                Rule::new("positive", positive, log_positive),
                Rule::new("even", even, log_even),
                Rule::otherwise("rest", log_rest),
            ],
        )
    }

    #[test]
    fn first_match_wins() {
        let mut ctx = Ctx {
            value: 4,
            ..Default::default()
        };
        assert_eq!(table().fire_with(&mut ctx, |_, _| {}), Some("positive"));
        assert_eq!(ctx.log, vec!["positive"]);
    }

    #[test]
    fn later_rules_see_earlier_guards_false() {
        let mut ctx = Ctx {
            value: -2,
            ..Default::default()
        };
        assert_eq!(table().fire_with(&mut ctx, |_, _| {}), Some("even"));

        let mut ctx = Ctx {
            value: -3,
            ..Default::default()
        };
        assert_eq!(table().fire_with(&mut ctx, |_, _| {}), Some("rest"));
    }

    #[test]
    fn no_match_fails() {
        let table = RuleTable::new("empty-ish", vec![Rule::new("never", never, log_rest)]);
        let mut ctx = Ctx::default();
        assert_eq!(table.fire_with(&mut ctx, |_, _| {}), None);
        assert!(ctx.log.is_empty());
    }

    #[test]
    fn select_does_not_run_bodies() {
        let ctx = Ctx {
            value: 1,
            ..Default::default()
        };
        let table = table();
        assert_eq!(table.select(&ctx).map(Rule::name), Some("positive"));
        assert!(ctx.log.is_empty());
    }

    #[test]
    fn fire_with_reports_before_the_body() {
        let mut ctx = Ctx {
            value: 3,
            ..Default::default()
        };
        let fired = table().fire_with(&mut ctx, |ctx, name| ctx.log.push(name));
        assert_eq!(fired, Some("positive"));
        assert_eq!(ctx.log, vec!["positive", "positive"]);
    }

    #[test]
    #[should_panic(expected = "at least one rule")]
    fn empty_table_panics() {
        let _ = RuleTable::<Ctx>::new("empty", Vec::new());
    }
}
