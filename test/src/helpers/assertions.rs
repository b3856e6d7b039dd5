use catacomb_peer::Peer;
use catacomb_shared::NetEntity;

/// Every peer holds the same discrete state for `entity`.
pub fn assert_discrete_converged(peers: &[Peer], entity: &NetEntity) {
    let Some(first) = peers.first() else {
        return;
    };
    let expected = first.discrete(entity);
    for peer in peers {
        assert_eq!(
            peer.discrete(entity),
            expected,
            "{} disagrees about {}",
            peer.local_peer(),
            entity
        );
    }
}

/// Exactly one peer considers itself owner of `entity`, and every peer
/// agrees which one.
pub fn assert_single_owner(peers: &[Peer], entity: &NetEntity) {
    let owners: Vec<_> = peers.iter().filter(|peer| peer.is_owner(entity)).collect();
    assert_eq!(owners.len(), 1, "{} should have exactly one owner", entity);
    let owner = owners[0].local_peer();
    for peer in peers {
        assert_eq!(peer.owner_of(entity), Some(owner));
    }
}
