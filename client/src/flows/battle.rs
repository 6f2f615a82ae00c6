//! The boss battle: attack writes plus event-driven health updates.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use chainbrawl_shared::{narrow, Boss, ContractEvent, EventKind, PlayableCharacter};

use crate::chain::{ChainClient, Subscription};
use crate::error::{ChainError, TransactionError};

/// Presentational attack flag driving the host's animation.
///
/// Deliberately not the source of truth for the outcome: authoritative
/// health arrives through `AttackComplete` events on their own schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttackState {
    #[default]
    Idle,
    Attacking,
    Hit,
}

/// Active only while the session owns a minted character.
///
/// Dropping the flow releases its event subscription.
pub struct Battle {
    client: Arc<ChainClient>,
    boss: Boss,
    player: PlayableCharacter,
    attack_state: AttackState,
    events: Subscription,
}

impl Battle {
    /// Fetch the boss and start listening for attack completions.
    pub async fn activate(
        client: Arc<ChainClient>,
        player: PlayableCharacter,
    ) -> Result<Self, ChainError> {
        let events = client.subscribe(EventKind::AttackComplete);
        let boss = client.get_big_boss().await?;
        info!("Boss '{}' up with {}/{} hp", boss.name, boss.hp, boss.max_hp);

        Ok(Self {
            client,
            boss,
            player,
            attack_state: AttackState::Idle,
            events,
        })
    }

    pub fn boss(&self) -> &Boss {
        &self.boss
    }

    pub fn player(&self) -> &PlayableCharacter {
        &self.player
    }

    pub fn attack_state(&self) -> AttackState {
        self.attack_state
    }

    /// Reset the presentational flag once the host's animation finished.
    pub fn clear_attack_state(&mut self) {
        self.attack_state = AttackState::Idle;
    }

    /// Submit an attack and await its confirmation.
    ///
    /// Drives the presentational flag `Idle -> Attacking -> Hit`, or back to
    /// `Idle` on failure. Health is NOT updated here; the authoritative
    /// values arrive via [`Battle::drain_events`] or
    /// [`Battle::wait_for_update`], independently of the flag.
    pub async fn attack(&mut self, timeout: Option<Duration>) -> Result<(), TransactionError> {
        self.attack_state = AttackState::Attacking;
        info!("Attacking boss '{}'...", self.boss.name);

        let pending = match self.client.attack_boss().await {
            Ok(pending) => pending,
            Err(e) => {
                warn!("Attack submission failed: {}", e);
                self.attack_state = AttackState::Idle;
                return Err(e);
            }
        };
        match pending.confirmation(timeout).await {
            Ok(()) => {
                self.attack_state = AttackState::Hit;
                Ok(())
            }
            Err(e) => {
                warn!("Attack failed: {}", e);
                self.attack_state = AttackState::Idle;
                Err(e)
            }
        }
    }

    /// Apply every already-delivered completion event. Never suspends.
    ///
    /// Returns how many events were applied. Safe against duplicate
    /// delivery: re-applying an authoritative hp is a no-op.
    pub fn drain_events(&mut self) -> Result<usize, ChainError> {
        let mut applied = 0;
        while let Some(event) = self.events.try_next() {
            self.apply_event(&event)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Suspend until the next completion event arrives and apply it.
    ///
    /// Returns `false` once the event feed has closed.
    pub async fn wait_for_update(&mut self) -> Result<bool, ChainError> {
        match self.events.next().await {
            Some(event) => {
                self.apply_event(&event)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn apply_event(&mut self, event: &ContractEvent) -> Result<(), ChainError> {
        let ContractEvent::AttackComplete {
            new_boss_hp,
            new_player_hp,
        } = event
        else {
            return Ok(());
        };
        let boss_hp = narrow("newBossHp", *new_boss_hp)?;
        let player_hp = narrow("newPlayerHp", *new_player_hp)?;
        info!("Attack complete: boss hp {}, player hp {}", boss_hp, player_hp);

        self.boss.apply_hp(boss_hp);
        self.player.apply_hp(player_hp);
        Ok(())
    }
}
