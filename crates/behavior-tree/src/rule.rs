//! Guarded rules.
//!
//! A [`Rule`] pairs a side-effect-free guard with a body. When the guard
//! holds the body runs and the rule claims the tick, whether or not the body
//! produced any output. This matches decision procedures where entering a
//! branch commits to it even if the branch ends up idle.

/// A named guard/body pair.
pub struct Rule<C> {
    name: &'static str,
    guard: fn(&C) -> bool,
    body: fn(&mut C),
}

impl<C> Rule<C> {
    /// Creates a rule from a guard and a body.
    pub const fn new(name: &'static str, guard: fn(&C) -> bool, body: fn(&mut C)) -> Self {
        Self { name, guard, body }
    }

    /// Creates a rule that always matches. Use it as the last entry of a table.
    pub const fn otherwise(name: &'static str, body: fn(&mut C)) -> Self {
        Self {
            name,
            guard: always,
            body,
        }
    }

    /// Name used in traces and tests.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Evaluates the guard only.
    #[inline]
    pub fn matches(&self, ctx: &C) -> bool {
        (self.guard)(ctx)
    }

    /// Runs the body without consulting the guard.
    #[inline]
    pub(crate) fn run(&self, ctx: &mut C) {
        (self.body)(ctx)
    }
}

fn always<C>(_ctx: &C) -> bool {
    true
}
