//! Count-up animation for the public dashboard figures.

use crate::dom::{Dom, Mutation};
use std::time::Duration;

pub const COUNTER_CLASS: &str = "counter";

/// Delay before the first step of every counter.
pub const STAGGER: Duration = Duration::from_millis(300);

const TOTAL_MS: u64 = 1200;
const STEPS: u64 = 60;
const MIN_STEP_MS: u64 = 20;

/// Reads an integer the way `parseInt(raw, 10)` does: leading whitespace and
/// a sign are allowed, and parsing stops at the first non-digit.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude = rest[..end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue { display: u64, next: Duration },
    Done { display: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterAnimation {
    target: u64,
    current: u64,
    increment: u64,
    interval: Duration,
}

impl CounterAnimation {
    /// `None` for non-positive targets, which are not animated.
    pub fn new(target: i64) -> Option<Self> {
        let target = u64::try_from(target).ok().filter(|target| *target > 0)?;
        Some(Self {
            target,
            current: 0,
            increment: target.div_ceil(STEPS),
            interval: Duration::from_millis((TOTAL_MS / target).max(MIN_STEP_MS)),
        })
    }

    pub fn from_attribute(raw: Option<&str>) -> Option<Self> {
        Self::new(parse_int_prefix(raw?)?)
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn increment(&self) -> u64 {
        self.increment
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn step(&mut self) -> Step {
        self.current = self.current.saturating_add(self.increment);
        if self.current >= self.target {
            self.current = self.target;
            Step::Done {
                display: self.target,
            }
        } else {
            Step::Continue {
                display: self.current,
                next: self.interval,
            }
        }
    }
}

/// Every animatable counter on the page with its state machine.
pub fn collect<D: Dom>(dom: &D) -> Vec<(D::Node, CounterAnimation)> {
    dom.elements_by_class(COUNTER_CLASS)
        .into_iter()
        .filter_map(|node| {
            let animation = CounterAnimation::from_attribute(dom.dataset(&node, "target").as_deref())?;
            Some((node, animation))
        })
        .collect()
}

pub fn render<N>(node: N, step: Step) -> Mutation<N> {
    let display = match step {
        Step::Continue { display, .. } | Step::Done { display } => display,
    };
    Mutation::SetText {
        node,
        text: display.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{el, MemoryDom};

    fn run(mut animation: CounterAnimation) -> Vec<Step> {
        let mut steps = Vec::new();
        loop {
            let step = animation.step();
            steps.push(step);
            if matches!(step, Step::Done { .. }) {
                return steps;
            }
        }
    }

    #[test]
    fn target_120_moves_in_pairs_every_20ms() {
        let animation = CounterAnimation::new(120).unwrap();
        assert_eq!(animation.increment(), 2);
        assert_eq!(animation.interval(), Duration::from_millis(20));

        let steps = run(animation);
        assert_eq!(steps.len(), 60);
        assert_eq!(
            steps[0],
            Step::Continue {
                display: 2,
                next: Duration::from_millis(20)
            }
        );
        assert_eq!(steps.last(), Some(&Step::Done { display: 120 }));
    }

    #[test]
    fn target_5_ends_on_5() {
        let animation = CounterAnimation::new(5).unwrap();
        assert_eq!(animation.increment(), 1);
        assert_eq!(animation.interval(), Duration::from_millis(240));
        let steps = run(animation);
        assert_eq!(steps.len(), 5);
        assert_eq!(steps.last(), Some(&Step::Done { display: 5 }));
    }

    #[test]
    fn target_1_finishes_in_one_step() {
        let steps = run(CounterAnimation::new(1).unwrap());
        assert_eq!(steps, vec![Step::Done { display: 1 }]);
    }

    #[test]
    fn uneven_targets_clamp_instead_of_overshooting() {
        let animation = CounterAnimation::new(1000).unwrap();
        assert_eq!(animation.increment(), 17);
        let steps = run(animation);
        let displays: Vec<u64> = steps
            .iter()
            .map(|step| match step {
                Step::Continue { display, .. } | Step::Done { display } => *display,
            })
            .collect();
        assert!(displays.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(displays.last(), Some(&1000));
        assert_eq!(displays[displays.len() - 2], 986);
    }

    #[test]
    fn parse_int_prefix_follows_parse_int() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  42px"), Some(42));
        assert_eq!(parse_int_prefix("3.9"), Some(3));
        assert_eq!(parse_int_prefix("-8"), Some(-8));
        assert_eq!(parse_int_prefix("+8"), Some(8));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn skips_missing_invalid_and_non_positive_targets() {
        let dom = MemoryDom::with_body([
            el("span").class(COUNTER_CLASS).attr("data-target", "250"),
            el("span").class(COUNTER_CLASS),
            el("span").class(COUNTER_CLASS).attr("data-target", "many"),
            el("span").class(COUNTER_CLASS).attr("data-target", "0"),
            el("span").class(COUNTER_CLASS).attr("data-target", "-3"),
        ]);
        let counters = collect(&dom);
        assert_eq!(counters.len(), 1);
        assert_eq!(counters[0].1.target(), 250);
    }
}
