//! Character selection: list the mintable roster, mint one, and resolve the
//! result through the contract's minted event.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use chainbrawl_shared::{Character, ContractEvent, EventKind, NumericRangeError, PlayableCharacter};

use crate::chain::{ChainClient, Subscription};
use crate::error::{ChainError, MintError, TransactionError};

/// Active only while the session has no minted character.
///
/// Dropping the flow releases its event subscription.
pub struct CharacterSelection {
    client: Arc<ChainClient>,
    roster: Vec<Character>,
    minted: Subscription,
}

impl CharacterSelection {
    /// Fetch the roster and start listening for minted events.
    pub async fn activate(client: Arc<ChainClient>) -> Result<Self, ChainError> {
        // Subscribe before the roster read so a mint confirmed while the
        // roster is in flight cannot slip past us.
        let minted = client.subscribe(EventKind::CharacterMinted);
        let roster = client.get_all_default_characters().await?;
        info!("Fetched {} mintable characters", roster.len());

        Ok(Self {
            client,
            roster,
            minted,
        })
    }

    /// The mintable templates, in contract order.
    pub fn roster(&self) -> &[Character] {
        &self.roster
    }

    /// Mint the template at `template_index` and resolve the owned character.
    ///
    /// Awaits the write's confirmation and then the contract's minted event
    /// for this identity; the event's confirmed index maps back into the
    /// fetched roster. `timeout` bounds both waits; `None` waits forever.
    pub async fn mint(
        &mut self,
        template_index: usize,
        timeout: Option<Duration>,
    ) -> Result<PlayableCharacter, MintError> {
        let template = self
            .roster
            .get(template_index)
            .ok_or(MintError::UnknownTemplate(template_index))?;
        info!("Minting character {} ('{}')", template_index, template.name());

        let pending = self.client.mint_character(template_index as u32).await?;
        pending.confirmation(timeout).await?;

        // The event is the authority on what was minted; the write's own
        // receipt carries no token data.
        loop {
            let event = match timeout {
                None => self.minted.next().await,
                Some(limit) => match tokio::time::timeout(limit, self.minted.next()).await {
                    Ok(event) => event,
                    Err(_) => return Err(MintError::Transaction(TransactionError::Timeout)),
                },
            };
            let Some(event) = event else {
                return Err(MintError::EventStreamClosed);
            };
            let ContractEvent::CharacterMinted {
                sender,
                token_id,
                character_index,
            } = event
            else {
                continue;
            };
            if sender != self.client.identity() {
                debug!("Minted event for {}; not ours, ignoring", sender);
                continue;
            }

            let index = u32::try_from(character_index).map_err(|_| {
                MintError::Numeric(NumericRangeError {
                    field: "characterIndex",
                    value: character_index,
                })
            })? as usize;
            let character = self
                .roster
                .get(index)
                .cloned()
                .ok_or(MintError::UnknownTemplate(index))?;
            info!("Character minted: token {} from template {}", token_id, index);
            return Ok(character.into_playable());
        }
    }
}
