//! Backtracking placement search
//!
//! `try_attach` grows the level by one room. It walks every (candidate prefab,
//! open passage on the existing room, passage on the candidate) combination in a
//! shuffled order, turns and moves the candidate so the two passages meet face to
//! face, and commits the first combination that collides with nothing.
//!
//! The search either commits exactly one room or leaves the level untouched.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use super::state::LevelState;
use crate::core::types::{RoomId, TemplateId};
use crate::rooms::{Connection, RoomCatalog, RoomInstance, RoomRole};
use crate::spatial::{BoundingBox, CardinalDirection};

/// Why a single passage pairing was thrown away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Every other passage of the candidate faces the forbidden direction
    ForbiddenReentry,
    /// The candidate (or one of its open passages) overlaps a placed room
    RoomOverlap { other: RoomId },
    /// The candidate (or one of its open passages) overlaps an open passage
    PassageOverlap { other: RoomId, passage: usize },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::ForbiddenReentry => write!(f, "only re-enters the forbidden direction"),
            Rejection::RoomOverlap { other } => write!(f, "overlaps {}", other),
            Rejection::PassageOverlap { other, passage } => {
                write!(f, "overlaps passage #{} of {}", passage, other)
            }
        }
    }
}

/// A committed room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub room: RoomId,
    /// Passage pairings tried, including the one that succeeded
    pub attempts: u32,
}

/// A fully positioned candidate waiting to be committed
struct Fit {
    candidate: RoomInstance,
    parent_passage: usize,
    passage: usize,
}

/// Attach one room from `candidates` to an open passage of `existing`.
///
/// Passages of `existing` facing `forbidden` are never used, and a multi-passage
/// candidate must keep at least one other passage pointing somewhere else. On
/// success both passages are marked connected and the new room is appended to
/// `state`. Returns `None` once every combination is exhausted; `state` is then
/// unchanged.
pub fn try_attach(
    state: &mut LevelState,
    catalog: &RoomCatalog,
    existing: RoomId,
    forbidden: Option<CardinalDirection>,
    candidates: &[TemplateId],
    role: RoomRole,
    rng: &mut ChaCha8Rng,
) -> Option<Attachment> {
    let mut attempts = 0;
    let fit = search(state, catalog, existing, forbidden, candidates, role, rng, &mut attempts);

    let Some(Fit {
        mut candidate,
        parent_passage,
        passage,
    }) = fit
    else {
        tracing::warn!(
            "{}: exhausted {} candidate prefabs ({} pairings) on {}",
            role,
            candidates.len(),
            attempts,
            existing
        );
        return None;
    };

    candidate.passages[passage].connected = true;
    candidate.connection = Some(Connection {
        parent: existing,
        parent_passage,
        passage,
    });
    if let Some(parent) = state.get_mut(existing) {
        parent.passages[parent_passage].connected = true;
    }

    tracing::info!(
        "{}: placed {} as {} at ({}, {}) facing {}, attached to {}",
        role,
        candidate.template_name,
        candidate.id,
        candidate.position.x,
        candidate.position.y,
        candidate.facing,
        existing
    );

    let room = state.push(candidate);
    Some(Attachment { room, attempts })
}

#[allow(clippy::too_many_arguments)]
fn search(
    state: &LevelState,
    catalog: &RoomCatalog,
    existing: RoomId,
    forbidden: Option<CardinalDirection>,
    candidates: &[TemplateId],
    role: RoomRole,
    rng: &mut ChaCha8Rng,
    attempts: &mut u32,
) -> Option<Fit> {
    let parent = state.get(existing)?;

    let mut pool = candidates.to_vec();
    pool.shuffle(rng);

    for template_id in pool {
        let Some(template) = catalog.get(template_id) else {
            continue;
        };
        tracing::debug!("{}: trying {} on {}", role, template.name, existing);

        let mut candidate = RoomInstance::spawn(state.next_id(), template_id, template, role);

        let mut old_order: Vec<usize> = (0..parent.passage_count()).collect();
        let mut new_order: Vec<usize> = (0..candidate.passage_count()).collect();
        old_order.shuffle(rng);
        new_order.shuffle(rng);

        for &old in &old_order {
            if parent.passages[old].connected {
                continue;
            }
            let old_facing = parent.passage_facing(old);
            if Some(old_facing) == forbidden {
                continue;
            }
            let target = parent.passage_position(old);

            for &new in &new_order {
                *attempts += 1;

                let turn = CardinalDirection::rotation_degrees(
                    candidate.passage_facing(new),
                    old_facing.opposite(),
                );
                candidate.rotate_by(turn);
                candidate.align_passage_to(new, target);

                let rejection = if only_reenters(&candidate, new, forbidden) {
                    Some(Rejection::ForbiddenReentry)
                } else {
                    find_collision(state, &candidate, existing, old, new)
                };

                match rejection {
                    Some(reason) => tracing::debug!(
                        "{}: {} passage #{} on passage #{} of {} {}",
                        role,
                        template.name,
                        new,
                        old,
                        existing,
                        reason
                    ),
                    None => {
                        return Some(Fit {
                            candidate,
                            parent_passage: old,
                            passage: new,
                        })
                    }
                }
            }
        }
    }

    None
}

/// True when the candidate has other passages and all of them face `forbidden`
fn only_reenters(candidate: &RoomInstance, used: usize, forbidden: Option<CardinalDirection>) -> bool {
    let Some(forbidden) = forbidden else {
        return false;
    };
    candidate.passage_count() > 1
        && (0..candidate.passage_count())
            .filter(|&i| i != used)
            .all(|i| candidate.passage_facing(i) == forbidden)
}

/// Test the positioned candidate against everything already placed.
///
/// The candidate's footprint and the footprints of its passages that stay open
/// must miss every placed room and every open passage, except the parent passage
/// about to be consumed.
fn find_collision(
    state: &LevelState,
    candidate: &RoomInstance,
    parent: RoomId,
    parent_passage: usize,
    passage: usize,
) -> Option<Rejection> {
    let room_box = candidate.room_box();
    let open: Vec<BoundingBox> = candidate
        .unconnected_passages()
        .filter(|&i| i != passage)
        .map(|i| candidate.passage_box(i))
        .collect();

    for placed in state.rooms() {
        let placed_box = placed.room_box();
        if room_box.overlaps(&placed_box) || open.iter().any(|b| b.overlaps(&placed_box)) {
            return Some(Rejection::RoomOverlap { other: placed.id });
        }

        for index in placed.unconnected_passages() {
            if placed.id == parent && index == parent_passage {
                continue;
            }
            let passage_box = placed.passage_box(index);
            if room_box.overlaps(&passage_box) || open.iter().any(|b| b.overlaps(&passage_box)) {
                return Some(Rejection::PassageOverlap {
                    other: placed.id,
                    passage: index,
                });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::RoomDefinition;
    use glam::IVec2;
    use rand::SeedableRng;
    use CardinalDirection::*;

    fn catalog() -> RoomCatalog {
        RoomCatalog::from_definitions(&[
            RoomDefinition::new("one_door_room").with_floor(3, 3).with_passage(1, 3, North),
            RoomDefinition::new("two_door_room")
                .with_floor(3, 5)
                .with_passage(1, 0, South)
                .with_passage(1, 5, North),
            RoomDefinition::new("corner_room")
                .with_floor(4, 4)
                .with_passage(2, 0, South)
                .with_passage(4, 2, East),
        ])
        .unwrap()
    }

    fn start(catalog: &RoomCatalog) -> LevelState {
        let mut state = LevelState::new(0);
        let id = TemplateId(0);
        let room = RoomInstance::spawn(state.next_id(), id, catalog.get(id).unwrap(), RoomRole::Start);
        state.push(room);
        state
    }

    #[test]
    fn test_attach_meets_passage_face_to_face() {
        let catalog = catalog();
        let mut state = start(&catalog);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let attachment = try_attach(
            &mut state,
            &catalog,
            RoomId(0),
            None,
            &[TemplateId(1)],
            RoomRole::Path { index: 0 },
            &mut rng,
        )
        .unwrap();

        assert_eq!(attachment.room, RoomId(1));
        assert_eq!(attachment.attempts, 1);
        let child = state.get(RoomId(1)).unwrap();
        let link = child.connection.unwrap();
        assert_eq!(link.parent, RoomId(0));
        assert_eq!(link.parent_passage, 0);

        let parent = state.get(RoomId(0)).unwrap();
        assert!(parent.passages[0].connected);
        assert!(child.passages[link.passage].connected);
        assert_eq!(child.passage_position(link.passage), parent.passage_position(0));
        assert_eq!(child.passage_facing(link.passage), South);

        // straight piece continues north, abutting the start room
        assert_eq!(child.room_box().min.y, 3);
        assert_eq!(child.room_box().size, IVec2::new(3, 5));
        assert!(state.find_overlaps().is_empty());
    }

    #[test]
    fn test_no_open_passage_leaves_state_untouched() {
        let catalog = catalog();
        let mut state = start(&catalog);
        state.get_mut(RoomId(0)).unwrap().passages[0].connected = true;
        let before = state.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = try_attach(
            &mut state,
            &catalog,
            RoomId(0),
            None,
            &[TemplateId(0), TemplateId(1)],
            RoomRole::End,
            &mut rng,
        );
        assert!(result.is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_forbidden_facing_is_never_used() {
        let catalog = catalog();
        let mut state = start(&catalog);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        // the start room's only passage faces north
        let result = try_attach(
            &mut state,
            &catalog,
            RoomId(0),
            Some(North),
            &[TemplateId(0), TemplateId(1)],
            RoomRole::Path { index: 0 },
            &mut rng,
        );
        assert!(result.is_none());
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_candidate_that_only_reenters_is_rejected() {
        let catalog = catalog();
        let mut state = start(&catalog);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        // entering the corner through its east passage would leave the other one
        // facing west, so only the south passage may be used
        let attachment = try_attach(
            &mut state,
            &catalog,
            RoomId(0),
            Some(West),
            &[TemplateId(2)],
            RoomRole::Path { index: 1 },
            &mut rng,
        )
        .unwrap();

        let child = state.get(attachment.room).unwrap();
        assert_eq!(child.connection.unwrap().passage, 0);
        assert_eq!(child.passage_facing(1), East);
    }

    #[test]
    fn test_only_reenters() {
        let catalog = catalog();
        let mut room = RoomInstance::spawn(RoomId(0), TemplateId(1), catalog.get(TemplateId(1)).unwrap(), RoomRole::End);
        assert!(only_reenters(&room, 0, Some(North)));
        assert!(!only_reenters(&room, 0, Some(South)));
        assert!(!only_reenters(&room, 0, None));

        room.rotate_by(180);
        assert!(only_reenters(&room, 0, Some(South)));

        let dead_end = RoomInstance::spawn(RoomId(1), TemplateId(0), catalog.get(TemplateId(0)).unwrap(), RoomRole::End);
        assert!(!only_reenters(&dead_end, 0, Some(North)));
    }

    #[test]
    fn test_blocked_passage_exhausts_search() {
        let catalog = catalog();
        let mut state = start(&catalog);

        // something already sits right in front of the start room's passage
        let mut blocker = RoomInstance::spawn(state.next_id(), TemplateId(0), catalog.get(TemplateId(0)).unwrap(), RoomRole::End);
        blocker.position = IVec2::new(-1, 5);
        blocker.passages[0].connected = true;
        state.push(blocker);
        let before = state.clone();

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let result = try_attach(
            &mut state,
            &catalog,
            RoomId(0),
            None,
            &[TemplateId(0), TemplateId(1)],
            RoomRole::Path { index: 0 },
            &mut rng,
        );
        assert!(result.is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_collision_reports_blocking_room() {
        let catalog = catalog();
        let state = start(&catalog);
        let mut candidate = RoomInstance::spawn(state.next_id(), TemplateId(1), catalog.get(TemplateId(1)).unwrap(), RoomRole::End);
        candidate.position = IVec2::new(1, 1);
        assert_eq!(
            find_collision(&state, &candidate, RoomId(0), 0, 0),
            Some(Rejection::RoomOverlap { other: RoomId(0) })
        );
    }
}
