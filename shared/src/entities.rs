//! Normalized game entity definitions.

use serde::{Deserialize, Serialize};

/// An immutable, mintable character definition from the contract roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterTemplate {
    pub name: String,
    pub image_uri: String,
    pub hp: u32,
    pub max_hp: u32,
    pub attack_damage: u32,
}

impl CharacterTemplate {
    /// Set hp from an authoritative contract value, keeping it within
    /// `0..=max_hp`.
    pub fn apply_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }

    /// Check if dead
    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }
}

/// The boss is template-shaped, with its hp mutated in place as attack
/// events arrive.
pub type Boss = CharacterTemplate;

/// A minted, owned character.
///
/// The optional stats are carried through from the contract exactly as
/// transmitted: absent on the wire stays `None` here, never zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayableCharacter {
    pub name: String,
    pub image_uri: String,
    pub hp: u32,
    pub max_hp: u32,
    pub attack_damage: u32,
    pub defense: Option<u32>,
    pub critical_hit_at: Option<u32>,
    pub critical_hit_counter: Option<u32>,
}

impl PlayableCharacter {
    /// Set hp from an authoritative contract value, keeping it within
    /// `0..=max_hp`.
    pub fn apply_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }

    /// Check if dead
    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }
}

/// A normalized contract character: payloads without defensive stats are
/// roster templates, payloads with them are owned, playable characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Character {
    Template(CharacterTemplate),
    Playable(PlayableCharacter),
}

impl Character {
    pub fn name(&self) -> &str {
        match self {
            Self::Template(t) => &t.name,
            Self::Playable(p) => &p.name,
        }
    }

    pub fn hp(&self) -> u32 {
        match self {
            Self::Template(t) => t.hp,
            Self::Playable(p) => p.hp,
        }
    }

    pub fn max_hp(&self) -> u32 {
        match self {
            Self::Template(t) => t.max_hp,
            Self::Playable(p) => p.max_hp,
        }
    }

    /// Base template shape, dropping any defensive stats.
    pub fn into_template(self) -> CharacterTemplate {
        match self {
            Self::Template(t) => t,
            Self::Playable(p) => CharacterTemplate {
                name: p.name,
                image_uri: p.image_uri,
                hp: p.hp,
                max_hp: p.max_hp,
                attack_damage: p.attack_damage,
            },
        }
    }

    /// Promote to the playable shape. Stats the payload never carried stay
    /// unset.
    pub fn into_playable(self) -> PlayableCharacter {
        match self {
            Self::Playable(p) => p,
            Self::Template(t) => PlayableCharacter {
                name: t.name,
                image_uri: t.image_uri,
                hp: t.hp,
                max_hp: t.max_hp,
                attack_damage: t.attack_damage,
                defense: None,
                critical_hit_at: None,
                critical_hit_counter: None,
            },
        }
    }
}
