use super::*;

#[test]
fn stale_handles_miss_after_slot_reuse() {
    let mut arena = NodeArena::default();
    let a = arena.insert("a");
    assert_eq!(arena.remove(a), Some("a"));
    assert!(!arena.contains(a));

    let b = arena.insert("b");
    assert_eq!(b.index(), a.index());
    assert_ne!(b.generation(), a.generation());
    assert_eq!(arena.get(a), None);
    assert_eq!(arena.get(b), Some(&"b"));
    assert_eq!(arena.remove(a), None);
    assert_eq!(arena.len(), 1);
}

#[test]
fn get_mut_and_len_track_live_slots() {
    let mut arena = NodeArena::default();
    let a = arena.insert(1);
    let b = arena.insert(2);
    *arena.get_mut(b).unwrap() += 40;
    assert_eq!(arena.get(b), Some(&42));
    assert_eq!(arena.len(), 2);
    arena.remove(a);
    assert_eq!(arena.len(), 1);
    assert!(arena.get_mut(NodeId::from_parts(9, 0)).is_none());
}
