//! Ordered first-match rule tables
//!
//! Every priority decision in the pipeline (override precedence, gaze,
//! hands, mouth) is a fixed list of `(predicate, result)` pairs. The list
//! order is the precedence order.

/// A named predicate paired with the value it selects
#[derive(Clone, Copy)]
pub struct Rule<I, T> {
    pub name: &'static str,
    pub when: fn(&I) -> bool,
    pub then: T,
}

impl<I, T> Rule<I, T> {
    pub const fn new(name: &'static str, when: fn(&I) -> bool, then: T) -> Self {
        Self { name, when, then }
    }
}

/// Evaluate `rules` in order and return the first matching result, or `fallback`
pub fn first_match<I, T: Copy>(rules: &[Rule<I, T>], input: &I, fallback: T) -> T {
    matching_rule(rules, input).map_or(fallback, |rule| rule.then)
}

/// The first rule whose predicate holds, if any
pub fn matching_rule<'r, I, T>(rules: &'r [Rule<I, T>], input: &I) -> Option<&'r Rule<I, T>> {
    rules.iter().find(|rule| (rule.when)(input))
}
