//! Tagged, ordered combat messages.
//!
//! Every message is recorded in the encounter log (for the driver to render)
//! and mirrored to `tracing` under the `combat` target.

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum MessageTag {
    Damage,
    Effect,
    Positioning,
    Probability,
    Dialogue,
    Turn,
    Resource,
    Status,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatMessage {
    /// Monotonic sequence number within the encounter.
    pub seq: u64,
    /// Scheduler clock when the message was emitted.
    pub clock: f64,
    pub tag: MessageTag,
    pub text: String,
}

#[derive(Clone, Debug, Default)]
pub struct CombatLog {
    messages: Vec<CombatMessage>,
    next_seq: u64,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clock: f64, tag: MessageTag, text: String) {
        match tag {
            MessageTag::Probability => {
                tracing::debug!(target: "combat", tag = tag.as_ref(), clock, "{text}")
            }
            _ => tracing::info!(target: "combat", tag = tag.as_ref(), clock, "{text}"),
        }
        self.messages.push(CombatMessage {
            seq: self.next_seq,
            clock,
            tag,
            text,
        });
        self.next_seq += 1;
    }

    pub fn messages(&self) -> &[CombatMessage] {
        &self.messages
    }

    /// Take every message recorded since the last drain.
    pub fn drain(&mut self) -> Vec<CombatMessage> {
        std::mem::take(&mut self.messages)
    }

    pub fn with_tag(&self, tag: MessageTag) -> impl Iterator<Item = &CombatMessage> {
        self.messages.iter().filter(move |m| m.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
