//! Reversible stat modifiers.
//!
//! Temporary buffs never overwrite a player stat. Each one is pushed onto an
//! ordered stack tagged with the id of its source; effective values are
//! recomputed from the permanent base on every read, and expiry removes the
//! entries of exactly one source.

/// Identity of whatever pushed a modifier (one per activated powerup).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
    Speed,
    Damage,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// Multiply the stat by `factor`.
    Scale { stat: Stat, factor: f32 },
    /// Block all incoming damage while present.
    Invincible,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modifier {
    pub source: SourceId,
    pub effect: Effect,
}

#[derive(Clone, Debug, Default)]
pub struct ModifierStack {
    entries: Vec<Modifier>,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: SourceId, effect: Effect) {
        self.entries.push(Modifier { source, effect });
    }

    /// Drop every entry pushed by `source`; returns how many were removed.
    pub fn remove_source(&mut self, source: SourceId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|m| m.source != source);
        before - self.entries.len()
    }

    /// Fold the stack, in push order, over `base`.
    pub fn apply(&self, stat: Stat, base: f32) -> f32 {
        self.entries.iter().fold(base, |value, m| match m.effect {
            Effect::Scale { stat: s, factor } if s == stat => value * factor,
            _ => value,
        })
    }

    pub fn is_invincible(&self) -> bool {
        self.entries.iter().any(|m| m.effect == Effect::Invincible)
    }

    pub fn has_source(&self, source: SourceId) -> bool {
        self.entries.iter().any(|m| m.source == source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
