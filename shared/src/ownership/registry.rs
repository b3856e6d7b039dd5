use std::collections::HashMap;

use log::{info, warn};

use crate::{
    entity::net_entity::NetEntity,
    ownership::{
        error::OwnershipError,
        owner_change::{OwnerChange, OwnershipDenial, RoutedRequest},
        roster::SessionRoster,
    },
    types::{OwnerEpoch, PeerId, Tick},
};

/// Replicated ownership of one entity.
///
/// `owner == None` means the entity is session-owned. Whenever the recorded
/// owner is not connected the session coordinator acts as owner, which lets
/// every peer resolve orphaned entities locally without extra messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnershipRecord {
    pub owner: Option<PeerId>,
    pub epoch: OwnerEpoch,
}

impl OwnershipRecord {
    pub fn effective_owner(&self, roster: &SessionRoster) -> PeerId {
        match self.owner {
            Some(owner) if roster.contains(owner) => owner,
            _ => roster.coordinator(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    pub target: PeerId,
    pub sent_at: Tick,
    pub rerouted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnershipStatus {
    /// The local peer is the effective owner
    Owned,
    /// A request is in flight
    Requested,
    /// Another peer owns the entity
    Remote(PeerId),
}

/// How the effective owner answered an incoming request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    Granted(OwnerChange),
    Denied(OwnershipDenial),
}

/// What a departure changed for the local peer's in-flight requests.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PeerLeftOutcome {
    /// Requests that must be sent again, now to the coordinator
    pub rerouted: Vec<RoutedRequest>,
    /// Requests the local peer no longer needs because it now coordinates
    pub resolved: Vec<NetEntity>,
    /// Requests that already used their single re-route and were dropped
    pub abandoned: Vec<NetEntity>,
}

pub struct OwnershipRegistry {
    records: HashMap<NetEntity, OwnershipRecord>,
    pending: HashMap<NetEntity, PendingRequest>,
}

impl OwnershipRegistry {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            pending: HashMap::new(),
        }
    }

    /// Register an entity with its initial owner
    ///
    /// # Panics
    ///
    /// Panics if the entity is already registered.
    /// Consider using `try_register` for non-panicking error handling.
    pub fn register(&mut self, entity: NetEntity, owner: Option<PeerId>) {
        self.try_register(entity, owner)
            .expect("Entity cannot register for ownership more than once!");
    }

    /// Register an entity with its initial owner
    ///
    /// Returns an error if the entity is already registered.
    pub fn try_register(
        &mut self,
        entity: NetEntity,
        owner: Option<PeerId>,
    ) -> Result<(), OwnershipError> {
        if self.records.contains_key(&entity) {
            return Err(OwnershipError::EntityAlreadyRegistered { entity });
        }
        self.records.insert(entity, OwnershipRecord { owner, epoch: 0 });
        Ok(())
    }

    pub fn deregister(&mut self, entity: &NetEntity) {
        self.records.remove(entity);
        self.pending.remove(entity);
    }

    pub fn contains(&self, entity: &NetEntity) -> bool {
        self.records.contains_key(entity)
    }

    pub fn record(&self, entity: &NetEntity) -> Option<&OwnershipRecord> {
        self.records.get(entity)
    }

    pub fn try_record(
        &self,
        entity: &NetEntity,
        operation: &'static str,
    ) -> Result<&OwnershipRecord, OwnershipError> {
        self.records
            .get(entity)
            .ok_or(OwnershipError::EntityNotRegistered {
                entity: *entity,
                operation,
            })
    }

    pub fn effective_owner(&self, entity: &NetEntity, roster: &SessionRoster) -> Option<PeerId> {
        self.records
            .get(entity)
            .map(|record| record.effective_owner(roster))
    }

    pub fn is_owner(&self, entity: &NetEntity, roster: &SessionRoster) -> bool {
        self.effective_owner(entity, roster) == Some(roster.local())
    }

    pub fn epoch(&self, entity: &NetEntity) -> Option<OwnerEpoch> {
        self.records.get(entity).map(|record| record.epoch)
    }

    pub fn status(&self, entity: &NetEntity, roster: &SessionRoster) -> Option<OwnershipStatus> {
        let owner = self.effective_owner(entity, roster)?;
        if owner == roster.local() {
            Some(OwnershipStatus::Owned)
        } else if self.pending.contains_key(entity) {
            Some(OwnershipStatus::Requested)
        } else {
            Some(OwnershipStatus::Remote(owner))
        }
    }

    pub fn pending(&self, entity: &NetEntity) -> Option<&PendingRequest> {
        self.pending.get(entity)
    }

    /// Entities the local peer currently owns, in no particular order.
    pub fn owned_entities<'a>(
        &'a self,
        roster: &'a SessionRoster,
    ) -> impl Iterator<Item = NetEntity> + 'a {
        self.records
            .iter()
            .filter(move |(_, record)| record.effective_owner(roster) == roster.local())
            .map(|(entity, _)| *entity)
    }

    /// Start a request for ownership of `entity`.
    ///
    /// Returns `Ok(None)` when the local peer already owns the entity or a
    /// request for it is already in flight.
    pub fn request_ownership(
        &mut self,
        entity: NetEntity,
        roster: &SessionRoster,
        now: Tick,
    ) -> Result<Option<RoutedRequest>, OwnershipError> {
        let record = self.try_record(&entity, "request_ownership")?;
        let target = record.effective_owner(roster);
        if target == roster.local() || self.pending.contains_key(&entity) {
            return Ok(None);
        }

        self.pending.insert(
            entity,
            PendingRequest {
                target,
                sent_at: now,
                rerouted: false,
            },
        );
        Ok(Some(RoutedRequest { entity, target }))
    }

    /// Answer a request received from `requester`.
    ///
    /// A grant is applied locally before it is returned, so the caller only
    /// has to broadcast it. `transferable` is the entity's grant policy.
    pub fn handle_request(
        &mut self,
        entity: NetEntity,
        requester: PeerId,
        roster: &SessionRoster,
        transferable: bool,
    ) -> Result<RequestOutcome, OwnershipError> {
        let record = self
            .records
            .get_mut(&entity)
            .ok_or(OwnershipError::EntityNotRegistered {
                entity,
                operation: "handle_request",
            })?;
        let current_owner = record.effective_owner(roster);

        if current_owner != roster.local() || !transferable || !roster.contains(requester) {
            warn!(
                "{} denies {} to {} (current owner {})",
                roster.local(),
                entity,
                requester,
                current_owner
            );
            return Ok(RequestOutcome::Denied(OwnershipDenial {
                entity,
                requester,
                current_owner: Some(current_owner),
            }));
        }

        record.epoch += 1;
        record.owner = Some(requester);
        self.pending.remove(&entity);
        info!(
            "{} grants {} to {} at epoch {}",
            roster.local(),
            entity,
            requester,
            record.epoch
        );

        Ok(RequestOutcome::Granted(OwnerChange {
            entity,
            owner: requester,
            epoch: record.epoch,
        }))
    }

    /// Apply a replicated ownership change.
    ///
    /// Returns the previous effective owner when the change was applied, or
    /// `None` when it was stale.
    pub fn apply_owner_change(
        &mut self,
        change: &OwnerChange,
        roster: &SessionRoster,
    ) -> Result<Option<PeerId>, OwnershipError> {
        let record =
            self.records
                .get_mut(&change.entity)
                .ok_or(OwnershipError::EntityNotRegistered {
                    entity: change.entity,
                    operation: "apply_owner_change",
                })?;

        if change.epoch <= record.epoch {
            warn!(
                "discarding stale owner change for {} (epoch {} <= {})",
                change.entity, change.epoch, record.epoch
            );
            return Ok(None);
        }

        let previous = record.effective_owner(roster);
        record.owner = Some(change.owner);
        record.epoch = change.epoch;
        self.pending.remove(&change.entity);
        Ok(Some(previous))
    }

    /// Clear the pending request for a denied entity. Returns whether one
    /// was in flight.
    pub fn apply_denial(&mut self, entity: &NetEntity) -> bool {
        self.pending.remove(entity).is_some()
    }

    /// Forget a pending request, for example after its intent was abandoned.
    pub fn cancel_request(&mut self, entity: &NetEntity) {
        self.pending.remove(entity);
    }

    /// Drop requests older than `timeout` ticks and return their entities.
    pub fn expire_requests(&mut self, now: Tick, timeout: Tick) -> Vec<NetEntity> {
        let mut expired: Vec<NetEntity> = self
            .pending
            .iter()
            .filter(|(_, request)| now.wrapping_sub(request.sent_at) >= timeout)
            .map(|(entity, _)| *entity)
            .collect();
        expired.sort();

        for entity in &expired {
            self.pending.remove(entity);
            warn!("ownership request for {} expired", entity);
        }
        expired
    }

    /// Re-route requests that were waiting on a peer which just left.
    ///
    /// `roster` must already exclude the departed peer.
    pub fn handle_peer_left(
        &mut self,
        departed: PeerId,
        roster: &SessionRoster,
        now: Tick,
    ) -> PeerLeftOutcome {
        let mut outcome = PeerLeftOutcome::default();
        let mut affected: Vec<NetEntity> = self
            .pending
            .iter()
            .filter(|(_, request)| request.target == departed)
            .map(|(entity, _)| *entity)
            .collect();
        affected.sort();

        for entity in affected {
            let Some(record) = self.records.get(&entity) else {
                self.pending.remove(&entity);
                continue;
            };
            let owner = record.effective_owner(roster);
            if owner == roster.local() {
                self.pending.remove(&entity);
                outcome.resolved.push(entity);
                continue;
            }

            let Some(request) = self.pending.get_mut(&entity) else {
                continue;
            };
            if request.rerouted {
                self.pending.remove(&entity);
                outcome.abandoned.push(entity);
                continue;
            }

            request.target = owner;
            request.sent_at = now;
            request.rerouted = true;
            outcome.rerouted.push(RoutedRequest {
                entity,
                target: owner,
            });
        }

        outcome
    }
}

impl Default for OwnershipRegistry {
    fn default() -> Self {
        Self::new()
    }
}
