use super::TargetId;

/// Resolve the target `delta` steps away from `current` within `members`,
/// the live membership of the current target's group in document order.
///
/// With `wrap`, out-of-bounds indices wrap around (negative deltas
/// normalize into range); without it they clamp to the nearest boundary.
/// Returns `None` when the group is empty or `current` is no longer a
/// member, in which case no navigation occurs.
pub fn cycle(members: &[TargetId], current: TargetId, delta: isize, wrap: bool) -> Option<TargetId> {
    if members.is_empty() {
        return None;
    }
    let index = members.iter().position(|&t| t == current)? as isize;
    let len = members.len() as isize;
    let raw = index + delta;
    let next = if wrap {
        raw.rem_euclid(len)
    } else {
        raw.clamp(0, len - 1)
    };
    Some(members[next as usize])
}
