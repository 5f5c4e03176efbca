//! Greedy choice among the cells around the mouse.

use micromouse_core::Movement;

/// Commands examined by the greedy step, in evaluation order.
///
/// Each command stands for the neighbor the mouse would face after issuing
/// it: left, then right, then straight ahead.
pub(crate) const LOOKOUTS: [Movement; 3] = [
    Movement::TurnCounterClockwise,
    Movement::TurnClockwise,
    Movement::MoveForward,
];

/// Picks the command leading toward the neighbor with the smallest distance.
///
/// Candidates are compared with `<=` against a running minimum seeded with
/// `current`, so when evaluated in [`LOOKOUTS`] order a tie goes to the front
/// cell, then the right. A command is only returned when the winning
/// distance is strictly below `current`.
pub(crate) fn best_move<I>(current: u32, candidates: I) -> Option<Movement>
where
    I: IntoIterator<Item = (Movement, u32)>,
{
    let mut minimum = current;
    let mut best = None;

    for (movement, distance) in candidates {
        if distance <= minimum {
            minimum = distance;
            best = Some(movement);
        }
    }

    best.filter(|_| minimum < current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_prefer_front_then_right() {
        let all_equal = [
            (Movement::TurnCounterClockwise, 3),
            (Movement::TurnClockwise, 3),
            (Movement::MoveForward, 3),
        ];
        assert_eq!(best_move(4, all_equal), Some(Movement::MoveForward));

        let sides_tie = [
            (Movement::TurnCounterClockwise, 2),
            (Movement::TurnClockwise, 2),
            (Movement::MoveForward, 3),
        ];
        assert_eq!(best_move(4, sides_tie), Some(Movement::TurnClockwise));
    }

    #[test]
    fn strictly_smaller_neighbor_wins() {
        let candidates = [
            (Movement::TurnCounterClockwise, 1),
            (Movement::TurnClockwise, 2),
            (Movement::MoveForward, 3),
        ];
        assert_eq!(best_move(4, candidates), Some(Movement::TurnCounterClockwise));
    }

    #[test]
    fn no_move_without_strict_improvement() {
        let candidates = [(Movement::TurnClockwise, 4), (Movement::MoveForward, 5)];
        assert_eq!(best_move(4, candidates), None);
        assert_eq!(best_move(4, []), None);
    }
}
