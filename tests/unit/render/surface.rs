use super::*;

#[test]
fn second_acquire_fails_until_lease_drops() {
    let slot = SurfaceSlot::new("offscreen view", vec![1u8, 2, 3]);
    let mut lease = slot.acquire().unwrap();
    lease.push(4);
    assert!(!slot.is_available());

    let err = slot.acquire().unwrap_err();
    assert!(matches!(err, HomeshotError::IllegalState(_)));
    assert!(err.to_string().contains("offscreen view"));

    drop(lease);
    assert!(slot.is_available());
    let again = slot.acquire().unwrap();
    assert_eq!(*again, vec![1, 2, 3, 4]);
}

#[test]
fn lease_can_move_to_another_thread() {
    let slot = SurfaceSlot::new("renderer", 7u32);
    let lease = slot.acquire().unwrap();
    let v = std::thread::spawn(move || *lease + 1).join().unwrap();
    assert_eq!(v, 8);
    assert!(slot.is_available());
}
