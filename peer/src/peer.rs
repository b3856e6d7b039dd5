use std::{
    collections::{BTreeSet, HashMap},
    mem,
};

use log::{debug, info, trace, warn};

use catacomb_shared::{
    CharacterMotor, ContinuousChannels, ContinuousState, Cue, DiscreteEvent, DiscreteState,
    EntityError, EntityKind, ItemCustody, ItemState, LeavePolicy, LocomotionController,
    LocomotionInput, NetEntity, NetEntityAllocator, OwnerChange, OwnershipDenial,
    OwnershipRegistry, OwnershipStatus, PacketReceiver, PacketSender, PeerId, PeerMessage,
    RequestOutcome, SessionRoster, Snapshot, SnapshotSender, SpawnRecord, Target, Tick,
    Transition, TransportEvent, Vec3,
};

use crate::{
    avatar::LocalAvatar,
    coordinator::{evaluate_elevator, evaluate_puzzle, evaluate_symbol_table, CoordinatorQueue},
    error::PeerError,
    events::{PeerEvents, PresentationState, SessionSignal},
    intent::Intent,
    interaction::{self, Interaction, InteractionPlan},
    obstacle::ObstacleRunner,
    peer_config::PeerConfig,
    scene::{ConfigError, SceneDefinition, ValidatedScene},
    session::SessionContext,
    world::{EntityRecord, EntityStore},
};

/// Height above the avatar's feet at which a held item is carried
const HOLD_HEIGHT: f32 = 1.2;
/// Distance in front of the avatar at which a held item is carried
const HOLD_REACH: f32 = 0.6;

enum Readiness {
    Ready,
    Waiting,
    Unavailable,
}

/// One participant of a session. Owns the local replica of every entity,
/// simulates what it owns, and coordinates shared puzzles while it is the
/// session coordinator.
pub struct Peer {
    config: PeerConfig,
    sender: Box<dyn PacketSender>,
    receiver: Box<dyn PacketReceiver>,
    context: SessionContext,
    registry: OwnershipRegistry,
    store: EntityStore,
    scene: ValidatedScene,
    coordinator: PeerId,
    coordinator_queue: CoordinatorQueue,
    intents: Vec<Intent>,
    owned: BTreeSet<NetEntity>,
    avatar: Option<LocalAvatar>,
    obstacles: HashMap<NetEntity, ObstacleRunner>,
    allocator: NetEntityAllocator,
    rng: fastrand::Rng,
    tick: Tick,
    events: PeerEvents,
}

impl Peer {
    /// Create a Peer from a scene and a connected transport.
    ///
    /// Everything the transport already holds (who is connected, the
    /// buffered replay) is applied before the peer decides what it owns.
    pub fn new(
        config: PeerConfig,
        scene: SceneDefinition,
        sender: Box<dyn PacketSender>,
        receiver: Box<dyn PacketReceiver>,
    ) -> Self {
        let local = sender.local_peer();
        let scene = ValidatedScene::new(scene);
        let mut rng = match config.rng_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        let mut store = EntityStore::new();
        let mut registry = OwnershipRegistry::new();
        for entity in &scene.entities {
            let record = EntityRecord::new(entity.discrete.clone(), entity.continuous);
            if let Err(error) = store.try_insert(entity.entity, record) {
                warn!("skipping scene entity: {}", error);
                continue;
            }
            if let Err(error) = registry.try_register(entity.entity, None) {
                warn!("skipping scene entity: {}", error);
            }
        }

        let mut obstacles = HashMap::new();
        for (entity, motion) in &scene.obstacles {
            if let Some(record) = store.get(entity) {
                let origin = record.continuous().position;
                obstacles.insert(*entity, ObstacleRunner::new(origin, motion, &mut rng));
            }
        }

        let mut events = PeerEvents::new();
        for fault in &scene.faults {
            events.push_error(PeerError::Config(fault.clone()));
        }

        let mut coordinator_queue = CoordinatorQueue::new();
        coordinator_queue.push_all(scene.puzzles.len());

        info!(
            "{} loaded scene with {} entities and {} puzzles",
            local,
            store.len(),
            scene.puzzles.len()
        );

        let mut peer = Self {
            config,
            sender,
            receiver,
            context: SessionContext::new(local),
            registry,
            store,
            scene,
            coordinator: local,
            coordinator_queue,
            intents: Vec::new(),
            owned: BTreeSet::new(),
            avatar: None,
            obstacles,
            allocator: NetEntityAllocator::new(local),
            rng,
            tick: 0,
            events,
        };
        peer.receive_all();
        peer.update_coordinator();
        peer.sync_owned_set();
        peer
    }

    // Session

    pub fn local_peer(&self) -> PeerId {
        self.context.local()
    }

    pub fn coordinator(&self) -> PeerId {
        self.coordinator
    }

    pub fn is_coordinator(&self) -> bool {
        self.context.roster().is_coordinator()
    }

    pub fn roster(&self) -> &SessionRoster {
        self.context.roster()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Faults found while loading the scene. Each was also reported once as
    /// an `ErrorEvent`.
    pub fn config_faults(&self) -> &[ConfigError] {
        &self.scene.faults
    }

    /// Take every event collected since the last call
    pub fn take_events(&mut self) -> PeerEvents {
        mem::take(&mut self.events)
    }

    /// Advance the session by one fixed tick: apply everything received,
    /// expire requests, run coordinator logic, simulate owned entities and
    /// send their snapshots.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        self.receive_all();
        self.update_coordinator();
        self.sync_owned_set();

        let timeout = self.config.ownership_request_timeout;
        for entity in self.registry.expire_requests(self.tick, timeout) {
            self.events.push_ownership_expiry(entity);
        }
        self.poll_intents();

        if self.context.roster().is_coordinator() {
            self.coordinator_step();
        }

        self.simulate_owned();
        self.send_snapshots();
    }

    /// Advance remote interpolation by `dt` seconds of presentation time.
    pub fn present(&mut self, dt: f32) {
        for (entity, record) in self.store.iter_mut() {
            if self.owned.contains(entity) {
                record.interpolator.snap_to(record.continuous);
            } else {
                record.interpolator.step(dt, &self.config.replication);
            }
        }
    }

    // Entities

    pub fn has_entity(&self, entity: &NetEntity) -> bool {
        self.store.contains(entity)
    }

    pub fn entities_of_kind(&self, kind: EntityKind) -> Vec<NetEntity> {
        self.store.entities_of_kind(kind)
    }

    pub fn discrete(&self, entity: &NetEntity) -> Option<&DiscreteState> {
        self.store.get(entity).map(|record| record.discrete())
    }

    /// Latest authoritative continuous state: the simulated one for owned
    /// entities, the last accepted snapshot otherwise.
    pub fn continuous(&self, entity: &NetEntity) -> Option<&ContinuousState> {
        self.store.get(entity).map(|record| record.continuous())
    }

    /// Smoothed state for presentation layers
    pub fn presented(&self, entity: &NetEntity) -> Option<&ContinuousState> {
        self.store.get(entity).map(|record| record.presented())
    }

    pub fn owner_of(&self, entity: &NetEntity) -> Option<PeerId> {
        self.registry.effective_owner(entity, self.context.roster())
    }

    pub fn is_owner(&self, entity: &NetEntity) -> bool {
        self.owned.contains(entity)
    }

    pub fn ownership_status(&self, entity: &NetEntity) -> Option<OwnershipStatus> {
        self.registry.status(entity, self.context.roster())
    }

    pub fn held_item(&self) -> Option<NetEntity> {
        self.context.inventory().held()
    }

    pub fn pending_intents(&self) -> usize {
        self.intents.len()
    }

    // Avatar

    /// Spawn the avatar this peer controls. It is simulated locally and
    /// streamed to everyone else.
    pub fn spawn_avatar(
        &mut self,
        position: Vec3,
        motor: Box<dyn CharacterMotor + Send>,
    ) -> Result<NetEntity, PeerError> {
        if let Some(avatar) = &self.avatar {
            return Err(PeerError::AvatarAlreadySpawned {
                entity: avatar.entity(),
            });
        }

        let local = self.local_peer();
        let entity = self.allocator.allocate();
        let avatar = LocalAvatar::new(entity, self.config.locomotion.clone(), position, motor);
        let continuous = avatar.continuous_state();

        self.store
            .try_insert(entity, EntityRecord::new(DiscreteState::Avatar, continuous))?;
        self.registry.try_register(entity, Some(local))?;
        self.avatar = Some(avatar);
        info!("{} spawned avatar {}", local, entity);

        self.send(
            Target::All,
            &PeerMessage::Spawn(SpawnRecord {
                entity,
                kind: EntityKind::Avatar,
                owner: Some(local),
                discrete: DiscreteState::Avatar,
                continuous,
            }),
        );
        self.events.push_spawn(entity, EntityKind::Avatar);
        self.sync_owned_set();
        Ok(entity)
    }

    pub fn avatar(&self) -> Option<NetEntity> {
        self.avatar.as_ref().map(|avatar| avatar.entity())
    }

    pub fn avatar_controller(&self) -> Option<&LocomotionController> {
        self.avatar.as_ref().map(|avatar| avatar.controller())
    }

    /// Whether the local avatar is waiting to respawn
    pub fn is_avatar_dead(&self) -> bool {
        self.avatar.as_ref().is_some_and(|avatar| avatar.is_dead())
    }

    pub fn set_input(&mut self, input: LocomotionInput) {
        if let Some(avatar) = self.avatar.as_mut() {
            avatar.set_input(input);
        }
    }

    // Actions

    /// Apply a transition to an owned entity and broadcast it.
    ///
    /// Returns whether the state changed. Re-applying a transition that is
    /// already reflected changes nothing and sends nothing.
    pub fn act(&mut self, entity: NetEntity, transition: Transition) -> Result<bool, PeerError> {
        if let Transition::Cue(cue) = transition {
            self.cue(entity, cue)?;
            return Ok(false);
        }
        if !self.is_owner(&entity) {
            return Err(PeerError::NotOwner {
                entity,
                operation: "act",
            });
        }

        let changed = self.apply_transition(entity, &transition)?;
        if changed {
            self.broadcast(entity, transition);
        }
        Ok(changed)
    }

    /// Play cosmetic feedback locally and on every other peer.
    pub fn cue(&mut self, entity: NetEntity, cue: Cue) -> Result<(), PeerError> {
        if !self.store.contains(&entity) {
            return Err(EntityError::EntityNotFound {
                entity,
                operation: "cue",
            }
            .into());
        }
        self.events.push_cue(entity, cue);
        self.broadcast(entity, Transition::Cue(cue));
        Ok(())
    }

    /// Queue an intent. It runs now if every entity it needs is owned,
    /// otherwise once the requested ownership arrives.
    pub fn submit(&mut self, intent: Intent) {
        for entity in intent.requires() {
            self.request(*entity);
        }
        self.intents.push(intent);
        self.poll_intents();
    }

    pub fn interact(&mut self, interaction: Interaction) -> Result<(), PeerError> {
        match interaction::plan(&interaction, &self.store, &self.context)? {
            InteractionPlan::Ready(intent) => self.submit(intent),
            InteractionPlan::Unavailable { entity, text, cue } => {
                debug!("{:?} unavailable: {}", interaction, text);
                self.events.push_unavailable_interaction(entity, text);
                if let Some(cue) = cue {
                    self.cue(entity, cue)?;
                }
            }
            InteractionPlan::Ignored => {}
        }
        Ok(())
    }

    /// The prompt to show while the player looks at `entity`
    pub fn interaction_text(&self, entity: &NetEntity) -> Option<String> {
        interaction::prompt(entity, &self.store, &self.context)
    }

    /// Spawn a session-owned entity on every peer. Only the coordinator
    /// spawns; the entity stays when it leaves and falls to the next one.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        discrete: DiscreteState,
        continuous: ContinuousState,
    ) -> Result<NetEntity, PeerError> {
        if !self.is_coordinator() {
            return Err(PeerError::NotCoordinator { operation: "spawn" });
        }
        if kind == EntityKind::Avatar || discrete.kind() != kind {
            return Err(PeerError::InvalidSpawn {
                kind: kind.name(),
                state: discrete.kind().name(),
            });
        }

        let entity = self.allocator.allocate();
        self.store
            .try_insert(entity, EntityRecord::new(discrete.clone(), continuous))?;
        self.registry.try_register(entity, None)?;
        info!("{} spawned {} {}", self.local_peer(), kind.name(), entity);

        self.send(
            Target::All,
            &PeerMessage::Spawn(SpawnRecord {
                entity,
                kind,
                owner: None,
                discrete,
                continuous,
            }),
        );
        self.events.push_spawn(entity, kind);
        self.sync_owned_set();
        Ok(entity)
    }

    /// Remove an owned entity from every peer.
    pub fn despawn(&mut self, entity: NetEntity) -> Result<(), PeerError> {
        self.store.try_get(&entity, "despawn")?;
        if !self.is_owner(&entity) {
            return Err(PeerError::NotOwner {
                entity,
                operation: "despawn",
            });
        }
        self.remove_entity(entity);
        self.send(Target::All, &PeerMessage::Despawn { entity });
        Ok(())
    }

    // Receiving

    fn receive_all(&mut self) {
        loop {
            match self.receiver.receive() {
                Ok(Some(event)) => self.handle_transport_event(event),
                Ok(None) => break,
                Err(error) => {
                    warn!("{} transport receive failed: {}", self.local_peer(), error);
                    self.events.push_error(error.into());
                    break;
                }
            }
        }
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Packet { from, payload } => match PeerMessage::from_bytes(&payload) {
                Ok(message) => self.handle_message(from, message),
                Err(error) => {
                    warn!("dropping packet from {}: {}", from, error);
                    self.events.push_error(error.into());
                }
            },
            TransportEvent::PeerJoined(peer) => {
                if self.context.roster_mut().insert(peer) {
                    info!("{} sees {} join", self.local_peer(), peer);
                    self.events.push_peer_join(peer);
                }
            }
            TransportEvent::PeerLeft(peer) => self.handle_peer_left(peer),
        }
    }

    fn handle_peer_left(&mut self, peer: PeerId) {
        if !self.context.roster_mut().remove(peer) {
            return;
        }
        info!("{} sees {} leave", self.local_peer(), peer);
        self.events.push_peer_leave(peer);

        let outcome = self
            .registry
            .handle_peer_left(peer, self.context.roster(), self.tick);
        for request in outcome.rerouted {
            debug!("re-routing request for {} to {}", request.entity, request.target);
            self.send(
                Target::Peer(request.target),
                &PeerMessage::RequestOwnership {
                    entity: request.entity,
                },
            );
        }
        for entity in outcome.abandoned {
            self.events.push_ownership_expiry(entity);
        }
    }

    fn handle_message(&mut self, from: PeerId, message: PeerMessage) {
        trace!("{} received {} from {}", self.local_peer(), message.name(), from);
        match message {
            PeerMessage::Snapshot(snapshot) => self.receive_snapshot(snapshot),
            PeerMessage::Event(event) => self.receive_event(event),
            PeerMessage::RequestOwnership { entity } => self.receive_request(entity, from),
            PeerMessage::OwnerChanged(change) => self.receive_owner_change(change),
            PeerMessage::OwnershipDenied(denial) => self.receive_denial(denial),
            PeerMessage::Spawn(record) => self.receive_spawn(record),
            PeerMessage::Despawn { entity } => self.remove_entity(entity),
        }
    }

    fn receive_snapshot(&mut self, snapshot: Snapshot) {
        if self.owned.contains(&snapshot.entity) {
            trace!("ignoring snapshot for owned {}", snapshot.entity);
            return;
        }
        let Some(record) = self.store.get_mut(&snapshot.entity) else {
            trace!("snapshot for unknown {}", snapshot.entity);
            return;
        };
        if !record.receiver.accept(&snapshot) {
            trace!(
                "dropping out-of-order snapshot {} for {}",
                snapshot.sequence,
                snapshot.entity
            );
            return;
        }

        let previous = record.continuous.presentation_tag();
        record.continuous = snapshot.state;
        record.interpolator.set_target(snapshot.state);

        if let Some(tag) = snapshot.state.presentation_tag() {
            if previous != Some(tag) {
                self.events
                    .push_presentation_change(snapshot.entity, PresentationState::Locomotion(tag));
            }
        }
    }

    fn receive_event(&mut self, event: DiscreteEvent) {
        if let Err(error) = self.apply_transition(event.entity, &event.transition) {
            warn!(
                "discarding {} from {}: {}",
                event.transition.name(),
                event.origin,
                error
            );
        }
    }

    fn receive_request(&mut self, entity: NetEntity, requester: PeerId) {
        if !self.registry.contains(&entity) {
            warn!("{} requested unknown {}", requester, entity);
            self.send(
                Target::Peer(requester),
                &PeerMessage::OwnershipDenied(OwnershipDenial {
                    entity,
                    requester,
                    current_owner: None,
                }),
            );
            return;
        }

        let transferable = self
            .store
            .get(&entity)
            .is_some_and(|record| record.discrete().is_transferable(self.context.roster()));
        match self
            .registry
            .handle_request(entity, requester, self.context.roster(), transferable)
        {
            Ok(RequestOutcome::Granted(change)) => {
                self.send(Target::All, &PeerMessage::OwnerChanged(change));
            }
            Ok(RequestOutcome::Denied(denial)) => {
                self.send(Target::Peer(requester), &PeerMessage::OwnershipDenied(denial));
            }
            Err(error) => warn!("cannot answer {}: {}", requester, error),
        }
    }

    fn receive_owner_change(&mut self, change: OwnerChange) {
        match self
            .registry
            .apply_owner_change(&change, self.context.roster())
        {
            Ok(Some(previous)) => info!(
                "{} passes from {} to {} at epoch {}",
                change.entity, previous, change.owner, change.epoch
            ),
            Ok(None) => {}
            Err(error) => warn!("{}", error),
        }
    }

    fn receive_denial(&mut self, denial: OwnershipDenial) {
        if denial.requester != self.local_peer() {
            return;
        }
        if self.registry.apply_denial(&denial.entity) {
            warn!("request for {} denied", denial.entity);
            self.events
                .push_ownership_denial(denial.entity, denial.current_owner);
        }
    }

    fn receive_spawn(&mut self, spawn: SpawnRecord) {
        if self.store.contains(&spawn.entity) {
            debug!("ignoring repeated spawn of {}", spawn.entity);
            return;
        }
        let record = EntityRecord::new(spawn.discrete, spawn.continuous);
        if let Err(error) = self.store.try_insert(spawn.entity, record) {
            warn!("{}", error);
            return;
        }
        if let Err(error) = self.registry.try_register(spawn.entity, spawn.owner) {
            warn!("{}", error);
        }
        info!("{} spawned {} {}", self.local_peer(), spawn.kind.name(), spawn.entity);
        self.events.push_spawn(spawn.entity, spawn.kind);
    }

    fn remove_entity(&mut self, entity: NetEntity) {
        if self.store.remove(&entity).is_none() {
            return;
        }
        self.registry.deregister(&entity);
        self.context.inventory_mut().release(&entity);
        self.obstacles.remove(&entity);
        self.owned.remove(&entity);
        if self.avatar() == Some(entity) {
            self.avatar = None;
        }
        info!("{} despawned {}", self.local_peer(), entity);
        self.events.push_despawn(entity);
    }

    // Transitions

    fn apply_transition(
        &mut self,
        entity: NetEntity,
        transition: &Transition,
    ) -> Result<bool, PeerError> {
        if let Transition::Cue(cue) = transition {
            self.store.try_get(&entity, "cue")?;
            self.events.push_cue(entity, *cue);
            return Ok(false);
        }

        let record = self.store.try_get_mut(&entity, "apply_transition")?;
        let next = record
            .discrete
            .apply(transition)
            .map_err(|source| PeerError::Transition { entity, source })?;
        let Some(next) = next else {
            return Ok(false);
        };
        let previous = mem::replace(&mut record.discrete, next);
        if let DiscreteState::Obstacle(obstacle) = &record.discrete {
            record.continuous.channels = ContinuousChannels::Obstacle {
                moving: obstacle.moving,
            };
        }

        self.after_transition(entity, &previous, transition);
        Ok(true)
    }

    fn after_transition(&mut self, entity: NetEntity, previous: &DiscreteState, transition: &Transition) {
        let Some(record) = self.store.get(&entity) else {
            return;
        };
        let mode = record.discrete().mode();
        let custody = match record.discrete() {
            DiscreteState::Item(item) => Some(item.custody),
            _ => None,
        };

        if mode != previous.mode() {
            self.events
                .push_presentation_change(entity, PresentationState::Mode(mode));
        }

        if let Some(custody) = custody {
            let local = self.local_peer();
            match custody {
                ItemCustody::Held(holder) if holder == local => {
                    self.context.inventory_mut().hold(entity)
                }
                _ => {
                    self.context.inventory_mut().release(&entity);
                }
            }
        }

        let signal = match transition {
            Transition::ClearStage => Some(SessionSignal::StageCleared { puzzle: entity }),
            Transition::SolvePuzzle | Transition::SolveTable => {
                Some(SessionSignal::PuzzleSolved { puzzle: entity })
            }
            Transition::Depart => Some(SessionSignal::AllRequiredPeersPresent { elevator: entity }),
            _ => None,
        };
        if let Some(signal) = signal {
            info!("{} observes {:?}", self.local_peer(), signal);
            self.events.push_signal(signal);
        }

        if self.context.roster().is_coordinator() {
            for index in self.scene.puzzles_watching(&entity) {
                self.coordinator_queue.push(*index);
            }
        }
    }

    fn broadcast(&mut self, entity: NetEntity, transition: Transition) {
        let event = DiscreteEvent::new(entity, transition, self.local_peer());
        self.send(Target::All, &PeerMessage::Event(event));
    }

    // Ownership

    fn request(&mut self, entity: NetEntity) {
        match self
            .registry
            .request_ownership(entity, self.context.roster(), self.tick)
        {
            Ok(Some(routed)) => {
                debug!("{} requests {} from {}", self.local_peer(), entity, routed.target);
                self.send(
                    Target::Peer(routed.target),
                    &PeerMessage::RequestOwnership { entity },
                );
            }
            Ok(None) => {}
            Err(error) => warn!("{}", error),
        }
    }

    /// Compare the owned set against the registry and react to every
    /// entity gained or lost since the last call.
    fn sync_owned_set(&mut self) {
        let current: BTreeSet<NetEntity> = self
            .registry
            .owned_entities(self.context.roster())
            .collect();
        let gained: Vec<NetEntity> = current.difference(&self.owned).copied().collect();
        let lost: Vec<NetEntity> = self.owned.difference(&current).copied().collect();
        self.owned = current;

        for entity in gained {
            if let Some(record) = self.store.get_mut(&entity) {
                record.sender = Some(SnapshotSender::new(entity, record.receiver.last_sequence()));
                record.interpolator.snap_to(record.continuous);
                if let Some(runner) = self.obstacles.get_mut(&entity) {
                    runner.sync_from(record.continuous.position);
                }
            }
            debug!("{} now owns {}", self.local_peer(), entity);
            self.events.push_ownership_grant(entity);
        }

        for entity in lost {
            if let Some(record) = self.store.get_mut(&entity) {
                record.sender = None;
            }
            debug!("{} no longer owns {}", self.local_peer(), entity);
            self.events.push_ownership_loss(entity);
        }
    }

    fn update_coordinator(&mut self) {
        let coordinator = self.context.roster().coordinator();
        if coordinator == self.coordinator {
            return;
        }
        self.coordinator = coordinator;
        info!("{} is the session coordinator", coordinator);
        self.events.push_coordinator_change(coordinator);

        if coordinator == self.local_peer() {
            self.coordinator_queue.push_all(self.scene.puzzles.len());
        } else {
            self.coordinator_queue.clear();
        }
    }

    // Intents

    fn poll_intents(&mut self) {
        if self.intents.is_empty() {
            return;
        }
        for intent in mem::take(&mut self.intents) {
            match self.readiness(&intent) {
                Readiness::Ready => self.execute(intent),
                Readiness::Waiting => self.intents.push(intent),
                Readiness::Unavailable => self.abandon(intent),
            }
        }
    }

    fn readiness(&self, intent: &Intent) -> Readiness {
        let mut waiting = false;
        for entity in intent.requires() {
            if !self.store.contains(entity) {
                return Readiness::Unavailable;
            }
            match self.registry.status(entity, self.context.roster()) {
                Some(OwnershipStatus::Owned) => {}
                Some(OwnershipStatus::Requested) => waiting = true,
                Some(OwnershipStatus::Remote(_)) | None => return Readiness::Unavailable,
            }
        }
        if waiting {
            Readiness::Waiting
        } else {
            Readiness::Ready
        }
    }

    /// Check every step against scratch copies so an intent applies
    /// completely or not at all.
    fn validate(&self, intent: &Intent) -> Result<(), PeerError> {
        let mut scratch: HashMap<NetEntity, DiscreteState> = HashMap::new();
        for (entity, transition) in intent.steps() {
            let current = match scratch.get(entity) {
                Some(state) => state.clone(),
                None => self.store.try_get(entity, "validate")?.discrete().clone(),
            };
            let next = current
                .apply(transition)
                .map_err(|source| PeerError::Transition {
                    entity: *entity,
                    source,
                })?;
            scratch.insert(*entity, next.unwrap_or(current));
        }
        Ok(())
    }

    fn execute(&mut self, intent: Intent) {
        if let Err(error) = self.validate(&intent) {
            debug!("intent rejected: {}", error);
            self.abandon(intent);
            return;
        }

        for (entity, transition) in intent.steps() {
            match self.apply_transition(*entity, transition) {
                Ok(true) => self.broadcast(*entity, transition.clone()),
                Ok(false) => {}
                Err(error) => {
                    warn!("{}", error);
                    self.events.push_error(error);
                }
            }
        }
        for (entity, position) in intent.repositions() {
            if let Some(record) = self.store.get_mut(entity) {
                record.continuous.position = *position;
                record.interpolator.snap_to(record.continuous);
            }
        }
        for (entity, cue) in intent.cues() {
            if let Err(error) = self.cue(*entity, *cue) {
                warn!("{}", error);
            }
        }
    }

    fn abandon(&mut self, intent: Intent) {
        for entity in intent.requires() {
            if let Some(OwnershipStatus::Requested) =
                self.registry.status(entity, self.context.roster())
            {
                self.registry.cancel_request(entity);
            }
        }
        if let (Some(entity), Some(text)) = (intent.subject(), intent.text()) {
            self.events
                .push_unavailable_interaction(entity, text.to_string());
        }
        if let Some(index) = intent.puzzle() {
            if self.context.roster().is_coordinator() {
                debug!("puzzle {} will be evaluated again", index);
                self.coordinator_queue.push(index);
            }
        }
    }

    // Coordinator

    fn coordinator_step(&mut self) {
        self.sweep_departed();

        for index in self.coordinator_queue.drain() {
            let Some(config) = self.scene.puzzles.get(index) else {
                continue;
            };
            let actions = evaluate_puzzle(config, &self.store);
            self.route_actions(actions, Some(index));
        }

        self.set_up_symbol_tables();
        for index in 0..self.scene.symbol_puzzles.len() {
            let actions = evaluate_symbol_table(&self.scene.symbol_puzzles[index], &self.store);
            self.route_actions(actions, None);
        }

        for index in 0..self.scene.elevators.len() {
            let actions = evaluate_elevator(
                &self.scene.elevators[index],
                &self.store,
                self.context.roster(),
            );
            self.route_actions(actions, None);
        }
    }

    /// Give every symbol table without a layout a random one and spawn the
    /// layout's symbols.
    fn set_up_symbol_tables(&mut self) {
        for index in 0..self.scene.symbol_puzzles.len() {
            let table = self.scene.symbol_puzzles[index].table;
            let Some(record) = self.store.get(&table) else {
                continue;
            };
            if !matches!(record.discrete(), DiscreteState::SymbolTable(state) if state.layout.is_none())
            {
                continue;
            }
            let origin = record.continuous().position;
            if !self.is_owner(&table) {
                self.request(table);
                continue;
            }

            let config = &self.scene.symbol_puzzles[index];
            let layout = self.rng.usize(..config.layouts.len());
            let chosen = config.layouts[layout].clone();
            let points = config.symbol_points.clone();
            let transition = Transition::ChooseLayout {
                layout: layout as u32,
                sequence: chosen.sequence.clone(),
            };
            if let Err(error) = self.act(table, transition) {
                warn!("cannot set up {}: {}", table, error);
                continue;
            }
            info!("{} set up {} with layout {}", self.local_peer(), table, layout);

            for (slot, symbol) in chosen.symbols.iter().enumerate() {
                let item = DiscreteState::Item(ItemState {
                    tag: symbol.clone(),
                    custody: ItemCustody::Free,
                });
                let position = points.get(slot).copied().unwrap_or(origin);
                if let Err(error) = self.spawn(EntityKind::Item, item, ContinuousState::at(position)) {
                    warn!("cannot spawn symbol {}: {}", symbol, error);
                }
            }
        }
    }

    /// Despawn what departed peers spawned and drop what they carried.
    fn sweep_departed(&mut self) {
        let roster = self.context.roster();
        let mut despawn = Vec::new();
        let mut drop = Vec::new();
        for (entity, record) in self.store.iter() {
            if let Some(spawner) = entity.spawner() {
                if !roster.contains(spawner) && record.kind().leave_policy() == LeavePolicy::Despawn
                {
                    despawn.push(*entity);
                    continue;
                }
            }
            if let DiscreteState::Item(ItemState {
                custody: ItemCustody::Held(holder),
                ..
            }) = record.discrete()
            {
                if !roster.contains(*holder) {
                    drop.push(*entity);
                }
            }
        }

        for entity in despawn {
            if let Err(error) = self.despawn(entity) {
                warn!("{}", error);
            }
        }
        for item in drop {
            self.route_actions(vec![(item, Transition::Drop)], None);
        }
    }

    /// Apply coordinator decisions, asking for ownership where needed. A
    /// decision already waiting on ownership is not queued twice.
    fn route_actions(&mut self, actions: Vec<(NetEntity, Transition)>, puzzle: Option<usize>) {
        if actions.is_empty() {
            return;
        }
        let mut intent = Intent::from_steps(actions);
        if let Some(index) = puzzle {
            intent = intent.for_puzzle(index);
        }
        if self
            .intents
            .iter()
            .any(|pending| pending.steps() == intent.steps())
        {
            return;
        }
        self.submit(intent);
    }

    // Simulation

    fn simulate_owned(&mut self) {
        let dt = self.config.tick_interval;

        let mut cues = Vec::new();
        if let Some(avatar) = self.avatar.as_mut() {
            let entity = avatar.entity();
            if avatar.advance_death(dt) {
                info!("{} respawned {}", self.context.local(), entity);
                cues.push((entity, Cue::BodyVisible(true)));
                cues.push((entity, Cue::Respawned));
            }
            let changed = avatar.tick(dt);
            let state = avatar.continuous_state();
            if !avatar.is_dead() {
                if let Some(zone) = self.scene.kill_zone_at(state.position) {
                    let respawn_at = zone.respawn.unwrap_or(state.position + Vec3::Y);
                    avatar.kill(respawn_at, self.config.respawn_delay);
                    info!("{} lost {} to a kill zone", self.context.local(), entity);
                    cues.push((entity, Cue::Died));
                    cues.push((entity, Cue::BodyVisible(false)));
                }
            }
            if let Some(record) = self.store.get_mut(&entity) {
                record.continuous = state;
                record.interpolator.snap_to(state);
            }
            if let Some(tag) = changed {
                self.events
                    .push_presentation_change(entity, PresentationState::Locomotion(tag));
            }
        }
        for (entity, cue) in cues {
            if let Err(error) = self.cue(entity, cue) {
                warn!("{}", error);
            }
        }

        for (entity, runner) in self.obstacles.iter_mut() {
            if !self.owned.contains(entity) {
                continue;
            }
            let Some(record) = self.store.get_mut(entity) else {
                continue;
            };
            let moving = matches!(record.discrete, DiscreteState::Obstacle(ref state) if state.moving);
            record.continuous.position = runner.step(dt, moving);
            record.continuous.channels = ContinuousChannels::Obstacle { moving };
            record.interpolator.snap_to(record.continuous);
        }

        let held = self.context.inventory().held();
        if let (Some(item), Some(avatar)) = (held, self.avatar.as_ref()) {
            if self.owned.contains(&item) {
                let carrier = avatar.continuous_state();
                if let Some(record) = self.store.get_mut(&item) {
                    record.continuous.position = carrier.position
                        + Vec3::Y * HOLD_HEIGHT
                        + carrier.rotation * Vec3::Z * HOLD_REACH;
                    record.continuous.rotation = carrier.rotation;
                    record.interpolator.snap_to(record.continuous);
                }
            }
        }
    }

    fn send_snapshots(&mut self) {
        if self.context.roster().len() < 2 || !self.config.replication.should_send(self.tick) {
            return;
        }

        let mut snapshots = Vec::new();
        for entity in &self.owned {
            let Some(epoch) = self.registry.epoch(entity) else {
                continue;
            };
            let Some(record) = self.store.get_mut(entity) else {
                continue;
            };
            if !record.kind().streams_snapshots() {
                continue;
            }
            let Some(sender) = record.sender.as_mut() else {
                continue;
            };
            let snapshot = sender.next_snapshot(epoch, self.tick, record.continuous);
            record.receiver.record_sent(&snapshot);
            snapshots.push(snapshot);
        }

        for snapshot in snapshots {
            self.send(Target::All, &PeerMessage::Snapshot(snapshot));
        }
    }

    fn send(&mut self, target: Target, message: &PeerMessage) {
        let payload = message.to_bytes();
        if let Err(error) = self.sender.send(target, message.delivery(), &payload) {
            warn!(
                "{} failed to send {}: {}",
                self.local_peer(),
                message.name(),
                error
            );
            self.events.push_error(error.into());
        }
    }
}
