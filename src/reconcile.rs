//! Enter / update / exit planning between passes.
//!
//! The [`Reconciler`] keeps the set of marks bound by the previous pass.
//! Each new pass is matched against it by [`ElementKey`]. Keys are the
//! array position unless a key function is configured.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use glam::DVec2;
use serde::Serialize;
use tracing::debug;

use crate::config::Interactions;
use crate::core::{Color, DataPoint};
use crate::transition::Timing;

/// Extracts a matching key from a datum.
pub type KeyFn = Arc<dyn Fn(&DataPoint) -> String + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum ElementKey {
    Index(usize),
    Key(String),
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKey::Index(i) => write!(f, "{i}"),
            ElementKey::Key(k) => f.write_str(k),
        }
    }
}

/// Final pixel attributes of one mark.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ElementAttrs {
    pub center: DVec2,
    pub radius: f64,
    pub fill: Color,
    pub stroke: Option<Color>,
}

impl ElementAttrs {
    /// Geometry moves with `t`; colors jump to `to`.
    pub fn lerp(&self, to: &ElementAttrs, t: f64) -> ElementAttrs {
        ElementAttrs {
            center: self.center.lerp(to.center, t),
            radius: self.radius + (to.radius - self.radius) * t,
            fill: to.fill,
            stroke: to.stroke,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingState {
    Entering,
    Idle,
    Updating,
    Exiting,
}

/// One drawn mark.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisualElement {
    pub key: ElementKey,
    /// Position in the data array that produced it.
    pub index: usize,
    pub datum: DataPoint,
    pub attrs: ElementAttrs,
    pub state: BindingState,
    pub handlers: Interactions,
}

/// What the pipeline asks the reconciler to draw for one datum.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementTarget {
    pub datum: DataPoint,
    pub attrs: ElementAttrs,
}

/// A mark that stays and animates from `from` to `element.attrs`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ElementUpdate {
    pub element: VisualElement,
    pub from: ElementAttrs,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReconciliationPlan {
    pub enter: Vec<VisualElement>,
    pub update: Vec<ElementUpdate>,
    pub exit: Vec<VisualElement>,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.update.is_empty() && self.exit.is_empty()
    }
}

#[derive(Clone, Debug)]
struct Motion {
    from: ElementAttrs,
    timing: Timing,
}

#[derive(Clone, Debug)]
struct Bound {
    element: VisualElement,
    motion: Option<Motion>,
}

impl Bound {
    fn attrs_at(&self, now: Duration) -> ElementAttrs {
        match &self.motion {
            Some(m) if !m.timing.is_finished(now) => {
                m.from.lerp(&self.element.attrs, m.timing.progress(now))
            }
            _ => self.element.attrs,
        }
    }
}

/// Holds the bound set and diffs each pass against it.
#[derive(Default)]
pub struct Reconciler {
    key_fn: Option<KeyFn>,
    interactions: Interactions,
    bound: Vec<Bound>,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("keyed", &self.key_fn.is_some())
            .field("interactions", &self.interactions)
            .field("bound", &self.bound.len())
            .finish()
    }
}

impl Reconciler {
    pub fn new(key_fn: Option<KeyFn>, interactions: Interactions) -> Self {
        Self {
            key_fn,
            interactions,
            bound: Vec::new(),
        }
    }

    pub fn set_key_fn(&mut self, key_fn: KeyFn) {
        self.key_fn = Some(key_fn);
    }

    pub fn is_keyed(&self) -> bool {
        self.key_fn.is_some()
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Bound marks in index order.
    pub fn elements(&self) -> impl Iterator<Item = &VisualElement> {
        self.bound.iter().map(|b| &b.element)
    }

    pub fn get(&self, key: &ElementKey) -> Option<&VisualElement> {
        self.bound
            .iter()
            .find(|b| &b.element.key == key)
            .map(|b| &b.element)
    }

    /// Attributes of a bound mark as drawn at `now`, mid-transition or not.
    pub fn attrs_at(&self, key: &ElementKey, now: Duration) -> Option<ElementAttrs> {
        self.bound
            .iter()
            .find(|b| &b.element.key == key)
            .map(|b| b.attrs_at(now))
    }

    /// Repeated keys become `k#1`, `k#2`, ... skipping any suffix that is
    /// itself a key in this pass, so every mark gets a distinct key.
    fn keys_for(&self, targets: &[ElementTarget]) -> Vec<ElementKey> {
        let Some(key_fn) = &self.key_fn else {
            return (0..targets.len()).map(ElementKey::Index).collect();
        };
        let raw: Vec<String> = targets.iter().map(|t| key_fn(&t.datum)).collect();
        let reserved: HashSet<&str> = raw.iter().map(String::as_str).collect();
        let mut used: HashSet<String> = HashSet::with_capacity(raw.len());
        let mut next: HashMap<&str, usize> = HashMap::new();
        raw.iter()
            .map(|key| {
                if used.insert(key.clone()) {
                    return ElementKey::Key(key.clone());
                }
                let n = next.entry(key.as_str()).or_insert(1);
                loop {
                    let candidate = format!("{key}#{n}");
                    *n += 1;
                    if !reserved.contains(candidate.as_str()) && used.insert(candidate.clone()) {
                        break ElementKey::Key(candidate);
                    }
                }
            })
            .collect()
    }

    /// Diff `targets` against the bound set at clock time `now` and bind
    /// the result.
    ///
    /// Updates start from where the mark is drawn at `now`, so a pass
    /// landing mid-transition retargets instead of queueing.
    pub fn reconcile(&mut self, targets: Vec<ElementTarget>, now: Duration) -> ReconciliationPlan {
        let keys = self.keys_for(&targets);
        let mut previous: HashMap<ElementKey, Bound> = self
            .bound
            .drain(..)
            .map(|b| (b.element.key.clone(), b))
            .collect();

        let mut plan = ReconciliationPlan::default();
        let mut bound = Vec::with_capacity(targets.len());
        for (index, (key, target)) in keys.into_iter().zip(targets).enumerate() {
            let mut element = VisualElement {
                key,
                index,
                datum: target.datum,
                attrs: target.attrs,
                state: BindingState::Entering,
                handlers: self.interactions,
            };
            match previous.remove(&element.key) {
                Some(prev) => {
                    let from = prev.attrs_at(now);
                    element.state = BindingState::Updating;
                    plan.update.push(ElementUpdate {
                        element: element.clone(),
                        from,
                    });
                    bound.push(Bound {
                        element,
                        motion: Some(Motion {
                            from,
                            timing: Timing::starting_at(now),
                        }),
                    });
                }
                None => {
                    plan.enter.push(element.clone());
                    bound.push(Bound {
                        element,
                        motion: None,
                    });
                }
            }
        }

        let mut exit: Vec<Bound> = previous.into_values().collect();
        exit.sort_by_key(|b| b.element.index);
        plan.exit = exit
            .into_iter()
            .map(|b| {
                let attrs = b.attrs_at(now);
                VisualElement {
                    attrs,
                    state: BindingState::Exiting,
                    ..b.element
                }
            })
            .collect();

        self.bound = bound;
        debug!(
            enter = plan.enter.len(),
            update = plan.update.len(),
            exit = plan.exit.len(),
            "reconciled"
        );
        plan
    }

    /// Advance binding states to `now`: entered marks and finished updates
    /// become idle.
    pub fn settle(&mut self, now: Duration) {
        for b in &mut self.bound {
            let done = match &b.motion {
                Some(m) => m.timing.is_finished(now),
                None => true,
            };
            if done {
                b.motion = None;
                b.element.state = BindingState::Idle;
            }
        }
    }
}
