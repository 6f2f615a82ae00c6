//! Normalization of raw contract payloads into game entities.

use alloy_primitives::U256;

use crate::entities::{Character, CharacterTemplate, PlayableCharacter};
use crate::wire::RawCharacter;

/// A contract numeric did not fit the client's integer representation.
///
/// The contract is trusted to keep stats in range; hitting this aborts the
/// current read, not the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericRangeError {
    pub field: &'static str,
    pub value: U256,
}

impl std::fmt::Display for NumericRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Contract value {} for `{}` exceeds the supported range",
            self.value, self.field
        )
    }
}

impl std::error::Error for NumericRangeError {}

/// Narrow a 256-bit contract value to the client's stat representation.
///
/// Used for read payloads and for the hp values carried by events.
pub fn narrow(field: &'static str, value: U256) -> Result<u32, NumericRangeError> {
    u32::try_from(value).map_err(|_| NumericRangeError { field, value })
}

/// Convert a raw contract character into its normalized form.
///
/// A payload carrying a `defense` field is an owned, playable character and
/// keeps its optional stats exactly as transmitted; anything else is a
/// roster template. Pure: the input is never mutated.
pub fn normalize(raw: &RawCharacter) -> Result<Character, NumericRangeError> {
    let hp = narrow("hp", raw.hp)?;
    let max_hp = narrow("maxHp", raw.max_hp)?;
    let attack_damage = narrow("attackDamage", raw.attack_damage)?;

    if raw.defense.is_some() {
        let defense = raw
            .defense
            .map(|value| narrow("defense", value))
            .transpose()?;
        Ok(Character::Playable(PlayableCharacter {
            name: raw.name.clone(),
            image_uri: raw.image_uri.clone(),
            hp,
            max_hp,
            attack_damage,
            defense,
            critical_hit_at: raw.critical_hit_at,
            critical_hit_counter: raw.critical_hit_counter,
        }))
    } else {
        Ok(Character::Template(CharacterTemplate {
            name: raw.name.clone(),
            image_uri: raw.image_uri.clone(),
            hp,
            max_hp,
            attack_damage,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, hp: u64, max_hp: u64, attack_damage: u64) -> RawCharacter {
        RawCharacter {
            name: name.to_string(),
            image_uri: format!("ipfs://{}", name.to_lowercase()),
            hp: U256::from(hp),
            max_hp: U256::from(max_hp),
            attack_damage: U256::from(attack_damage),
            defense: None,
            critical_hit_at: None,
            critical_hit_counter: None,
        }
    }

    #[test]
    fn test_defense_payload_becomes_playable() {
        let mut input = raw("Freya", 75, 120, 30);
        input.defense = Some(U256::from(12u64));
        input.critical_hit_at = Some(5);

        let character = normalize(&input).unwrap();
        match character {
            Character::Playable(p) => {
                assert_eq!(p.name, "Freya");
                assert_eq!(p.image_uri, "ipfs://freya");
                assert_eq!(p.hp, 75);
                assert_eq!(p.max_hp, 120);
                assert_eq!(p.attack_damage, 30);
                assert_eq!(p.defense, Some(12));
                assert_eq!(p.critical_hit_at, Some(5));
                // Absent on the wire stays unset, never zero.
                assert_eq!(p.critical_hit_counter, None);
            }
            Character::Template(_) => panic!("expected a playable character"),
        }
    }

    #[test]
    fn test_no_defense_payload_becomes_template() {
        let character = normalize(&raw("Zeus", 80, 100, 15)).unwrap();
        match character {
            Character::Template(t) => {
                assert_eq!(t.name, "Zeus");
                assert_eq!(t.hp, 80);
                assert_eq!(t.max_hp, 100);
                assert_eq!(t.attack_damage, 15);
            }
            Character::Playable(_) => panic!("expected a template"),
        }
    }

    #[test]
    fn test_critical_stats_without_defense_are_dropped() {
        // Branching is on `defense` alone, matching the contract's payload
        // shapes: stray critical stats on a roster entry do not promote it.
        let mut input = raw("Odin", 50, 50, 40);
        input.critical_hit_at = Some(2);

        let character = normalize(&input).unwrap();
        assert!(matches!(character, Character::Template(_)));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut input = raw("Freya", 75, 120, 30);
        input.defense = Some(U256::from(12u64));

        let first = normalize(&input).unwrap();
        let second = normalize(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_out_of_range_value_is_rejected() {
        let mut input = raw("Giant", 10, 10, 10);
        input.max_hp = U256::from(u64::from(u32::MAX) + 1);

        let err = normalize(&input).unwrap_err();
        assert_eq!(err.field, "maxHp");
        assert_eq!(err.value, U256::from(u64::from(u32::MAX) + 1));
    }
}
