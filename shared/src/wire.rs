//! Wire shapes for contract reads and emitted events.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Contract method names (fixed external ABI)
pub const METHOD_CHECK_NFT: &str = "checkIfUserHasNFT";
pub const METHOD_DEFAULT_CHARACTERS: &str = "getAllDefaultCharacters";
pub const METHOD_MINT_CHARACTER: &str = "mintCharacterNFT";
pub const METHOD_GET_BOSS: &str = "getBigBoss";
pub const METHOD_ATTACK_BOSS: &str = "attackBoss";

/// A character payload as the contract returns it.
///
/// Health and damage stats arrive as 256-bit integers and must be narrowed
/// before use. Defensive stats are only present on owned characters; the
/// critical-hit counters are emitted as ordinary integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCharacter {
    pub name: String,
    #[serde(rename = "imageURI")]
    pub image_uri: String,
    pub hp: U256,
    pub max_hp: U256,
    pub attack_damage: U256,
    #[serde(default)]
    pub defense: Option<U256>,
    #[serde(default)]
    pub critical_hit_at: Option<u32>,
    #[serde(default)]
    pub critical_hit_counter: Option<u32>,
}

/// Events emitted by the game contract, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    /// `CharacterNFTMinted(sender, tokenId, characterIndex)`
    CharacterMinted {
        sender: Address,
        token_id: U256,
        character_index: U256,
    },
    /// `AttackComplete(newBossHp, newPlayerHp)`
    AttackComplete {
        new_boss_hp: U256,
        new_player_hp: U256,
    },
}

impl ContractEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::CharacterMinted { .. } => EventKind::CharacterMinted,
            Self::AttackComplete { .. } => EventKind::AttackComplete,
        }
    }
}

/// Discriminant used to subscribe to one kind of contract event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CharacterMinted,
    AttackComplete,
}
