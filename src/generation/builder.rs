//! Level graph builder
//!
//! Drives the placement search through the generation phases:
//!
//! ```text
//! Start -> Path(0..N) -> End -> Branch(0..D) -> Done
//! ```
//!
//! `LevelGenerator` yields one `PlacementStep` per committed room, so a caller can
//! render or inspect the level between steps. Every yielded state is consistent.
//! `generate` simply drains it.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::placement::try_attach;
use super::state::LevelState;
use crate::core::config::GenerationConfig;
use crate::core::error::{GenerationError, Result};
use crate::core::types::{RoomId, TemplateId};
use crate::rooms::{RoomCatalog, RoomInstance, RoomRole};
use crate::spatial::CardinalDirection;

/// One committed room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementStep {
    pub room: RoomId,
    pub role: RoomRole,
    /// Passage pairings the search tried for this room (0 for the start room)
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    Path { index: u32 },
    End,
    Branch { depth: u32 },
    Done,
}

/// Step-by-step level generation over a read-only catalog
pub struct LevelGenerator<'a> {
    catalog: &'a RoomCatalog,
    config: GenerationConfig,
    rng: ChaCha8Rng,
    state: LevelState,
    stage: Stage,

    /// Set once the first path room is down; keeps the path from doubling back
    forbidden: Option<CardinalDirection>,
    last_placed: RoomId,

    /// Rooms being extended at the current branch depth
    frontier: Vec<RoomId>,
    cursor: usize,
    /// Rooms created at the current depth, extended at the next one
    next_frontier: Vec<RoomId>,
}

impl<'a> LevelGenerator<'a> {
    /// Validate `config` and seed the run.
    ///
    /// Without a configured seed one is drawn from entropy; it is logged and kept
    /// on the level so the run can be replayed.
    pub fn new(catalog: &'a RoomCatalog, config: &GenerationConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::info!(
            "Generating level with seed {} (path length {}, branch depth {}, {} prefabs)",
            seed,
            config.main_path_length,
            config.max_branch_depth,
            catalog.len()
        );

        Ok(Self {
            catalog,
            config: config.clone(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            state: LevelState::new(seed),
            stage: Stage::Start,
            forbidden: None,
            last_placed: RoomId(0),
            frontier: Vec::new(),
            cursor: 0,
            next_frontier: Vec::new(),
        })
    }

    /// The level as built so far
    pub fn level(&self) -> &LevelState {
        &self.state
    }

    pub fn into_level(self) -> LevelState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Done
    }

    fn fail(&mut self, error: GenerationError) -> Option<Result<PlacementStep>> {
        tracing::warn!("Level generation failed: {}", error);
        self.stage = Stage::Done;
        Some(Err(error))
    }

    fn place_start(&mut self) -> Option<Result<PlacementStep>> {
        let catalog = self.catalog;
        let candidates = catalog.start_candidates();
        let Some((template_id, template)) = candidates
            .choose(&mut self.rng)
            .and_then(|&id| catalog.get(id).map(|t| (id, t)))
        else {
            return self.fail(GenerationError::NoStartCandidate);
        };

        let room = RoomInstance::spawn(self.state.next_id(), template_id, template, RoomRole::Start);
        tracing::info!("{}: spawned {} as {}", RoomRole::Start, template.name, room.id);
        let id = self.state.push(room);

        self.last_placed = id;
        self.stage = Stage::Path { index: 0 };
        Some(Ok(PlacementStep {
            room: id,
            role: RoomRole::Start,
            attempts: 0,
        }))
    }

    fn attach(
        &mut self,
        existing: RoomId,
        forbidden: Option<CardinalDirection>,
        candidates: &[TemplateId],
        role: RoomRole,
    ) -> std::result::Result<PlacementStep, GenerationError> {
        match try_attach(
            &mut self.state,
            self.catalog,
            existing,
            forbidden,
            candidates,
            role,
            &mut self.rng,
        ) {
            Some(attachment) => Ok(PlacementStep {
                room: attachment.room,
                role,
                attempts: attachment.attempts,
            }),
            None => Err(GenerationError::AttachExhausted {
                role,
                room: existing,
                template: self
                    .state
                    .get(existing)
                    .map(|r| r.template_name.clone())
                    .unwrap_or_default(),
            }),
        }
    }

    /// Facing the path must not re-use: back towards the start room
    fn start_exit_reversed(&self) -> Option<CardinalDirection> {
        let start = self.state.start_room()?;
        let exit = start.passages.iter().position(|p| p.connected)?;
        Some(start.passage_facing(exit).opposite())
    }

    fn finish(&mut self) {
        self.stage = Stage::Done;
        tracing::info!(
            "Level complete: {} rooms, {} open passages",
            self.state.len(),
            self.state.unconnected_passage_count()
        );
    }

    fn enter_branch_phase(&mut self) {
        if self.config.max_branch_depth == 0 {
            self.finish();
            return;
        }
        // every main-path room is a root for the first branch generation
        self.frontier = self.state.rooms().iter().map(|r| r.id).collect();
        self.cursor = 0;
        self.stage = Stage::Branch { depth: 0 };
    }
}

impl Iterator for LevelGenerator<'_> {
    type Item = Result<PlacementStep>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stage {
                Stage::Done => return None,

                Stage::Start => return self.place_start(),

                Stage::Path { index } => {
                    if index >= self.config.main_path_length {
                        self.stage = Stage::End;
                        continue;
                    }

                    let candidates = self.catalog.path_candidates();
                    let role = RoomRole::Path { index };
                    match self.attach(self.last_placed, self.forbidden, &candidates, role) {
                        Ok(step) => {
                            if index == 0 {
                                self.forbidden = self.start_exit_reversed();
                                if let Some(forbidden) = self.forbidden {
                                    tracing::debug!("Main path may no longer use {} passages", forbidden);
                                }
                            }
                            self.last_placed = step.room;
                            self.stage = Stage::Path { index: index + 1 };
                            return Some(Ok(step));
                        }
                        Err(e) => return self.fail(e),
                    }
                }

                Stage::End => {
                    let candidates = self.catalog.end_candidates();
                    match self.attach(self.last_placed, self.forbidden, &candidates, RoomRole::End) {
                        Ok(step) => {
                            self.enter_branch_phase();
                            return Some(Ok(step));
                        }
                        Err(e) => return self.fail(e),
                    }
                }

                Stage::Branch { depth } => {
                    let Some(&room_id) = self.frontier.get(self.cursor) else {
                        let next_depth = depth + 1;
                        if next_depth >= self.config.max_branch_depth || self.next_frontier.is_empty() {
                            self.finish();
                        } else {
                            self.frontier = std::mem::take(&mut self.next_frontier);
                            self.cursor = 0;
                            self.stage = Stage::Branch { depth: next_depth };
                        }
                        continue;
                    };

                    let open = self
                        .state
                        .get(room_id)
                        .map_or(false, RoomInstance::has_unconnected_passages);
                    if !open {
                        self.cursor += 1;
                        continue;
                    }

                    let candidates = self
                        .catalog
                        .branch_candidates(depth, self.config.max_branch_depth);
                    match self.attach(room_id, None, &candidates, RoomRole::Branch { depth }) {
                        Ok(step) => {
                            self.next_frontier.push(step.room);
                            return Some(Ok(step));
                        }
                        Err(e) => return self.fail(e),
                    }
                }
            }
        }
    }
}

impl std::iter::FusedIterator for LevelGenerator<'_> {}

/// Build a whole level. No partial level is returned on failure.
pub fn generate(catalog: &RoomCatalog, config: &GenerationConfig) -> Result<LevelState> {
    let mut generator = LevelGenerator::new(catalog, config)?;
    for step in generator.by_ref() {
        step?;
    }
    Ok(generator.into_level())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ConfigError;
    use crate::rooms::RoomDefinition;
    use CardinalDirection::*;

    fn corridor_catalog() -> RoomCatalog {
        RoomCatalog::from_definitions(&[
            RoomDefinition::new("one_door_room").with_floor(3, 3).with_passage(1, 3, North),
            RoomDefinition::new("two_door_room")
                .with_floor(3, 5)
                .with_passage(1, 0, South)
                .with_passage(1, 5, North),
        ])
        .unwrap()
    }

    fn config(path: u32, depth: u32, seed: u64) -> GenerationConfig {
        GenerationConfig {
            main_path_length: path,
            max_branch_depth: depth,
            seed: Some(seed),
        }
    }

    #[test]
    fn test_steps_follow_phase_order() {
        let catalog = corridor_catalog();
        let steps: Vec<_> = LevelGenerator::new(&catalog, &config(3, 0, 42))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        let roles: Vec<_> = steps.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![
                RoomRole::Start,
                RoomRole::Path { index: 0 },
                RoomRole::Path { index: 1 },
                RoomRole::Path { index: 2 },
                RoomRole::End,
            ]
        );
        assert_eq!(steps[0].attempts, 0);
        assert!(steps[1..].iter().all(|s| s.attempts >= 1));
    }

    #[test]
    fn test_forbidden_direction_set_after_first_path_room() {
        let catalog = corridor_catalog();
        let mut generator = LevelGenerator::new(&catalog, &config(3, 0, 42)).unwrap();
        generator.next().unwrap().unwrap();
        assert_eq!(generator.forbidden, None);
        generator.next().unwrap().unwrap();
        // the start room only exits north
        assert_eq!(generator.forbidden, Some(South));
    }

    #[test]
    fn test_generator_fuses_after_error() {
        let catalog = RoomCatalog::from_definitions(&[
            RoomDefinition::new("one_door_room").with_floor(3, 3).with_passage(1, 3, North),
        ])
        .unwrap();
        let mut generator = LevelGenerator::new(&catalog, &config(2, 0, 1)).unwrap();

        assert!(generator.next().unwrap().is_ok());
        assert!(matches!(
            generator.next(),
            Some(Err(GenerationError::AttachExhausted { .. }))
        ));
        assert!(generator.next().is_none());
        assert!(generator.is_finished());
    }

    #[test]
    fn test_empty_catalog_has_no_start() {
        let catalog = RoomCatalog::new();
        assert!(matches!(
            generate(&catalog, &config(2, 1, 0)),
            Err(GenerationError::NoStartCandidate)
        ));
    }

    #[test]
    fn test_invalid_config_rejected_before_generation() {
        let catalog = corridor_catalog();
        assert!(matches!(
            LevelGenerator::new(&catalog, &config(1, 1, 0)),
            Err(GenerationError::InvalidConfig(ConfigError::PathTooShort { length: 1 }))
        ));
    }

    #[test]
    fn test_unseeded_run_records_drawn_seed() {
        let catalog = corridor_catalog();
        let unseeded = GenerationConfig {
            main_path_length: 2,
            max_branch_depth: 0,
            seed: None,
        };
        let level = generate(&catalog, &unseeded).unwrap();
        let replay = generate(&catalog, &config(2, 0, level.seed)).unwrap();
        assert_eq!(level, replay);
    }

    #[test]
    fn test_branches_fill_open_passages() {
        let catalog = RoomCatalog::from_definitions(&[
            RoomDefinition::new("one_door_room").with_floor(3, 3).with_passage(1, 3, North),
            RoomDefinition::new("two_door_room")
                .with_floor(3, 5)
                .with_passage(1, 0, South)
                .with_passage(1, 5, North),
            RoomDefinition::new("t_junction")
                .with_floor(5, 3)
                .with_passage(2, 0, South)
                .with_passage(0, 1, West)
                .with_passage(5, 1, East),
        ])
        .unwrap();

        let level = (0..50)
            .find_map(|seed| generate(&catalog, &config(2, 1, seed)).ok())
            .expect("some seed should succeed");

        // with a single branch generation every junction side gets a dead end
        assert_eq!(level.unconnected_passage_count(), 0);
        for room in level.rooms() {
            if let RoomRole::Branch { depth } = room.role {
                assert_eq!(depth, 0);
                assert_eq!(room.passage_count(), 1);
            }
        }
        assert!(level.find_overlaps().is_empty());
    }
}
