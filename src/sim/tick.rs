//! Fixed-interval simulation tick
//!
//! Advances the snake one cell, resolves collisions and food, and keeps the
//! track queue in step with what was eaten.

use std::rc::Rc;

use rand::Rng;

use super::grid::{Direction, wrap_position};
use super::queue::{Track, TrackQueue};
use super::spawn::find_free_cell;
use super::state::{Food, GameEvent, GameLifecycle, GameState};

/// Advance the game by one step. No-op unless playing and unpaused.
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    queue: &mut TrackQueue,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if !state.is_running() || state.direction == Direction::None {
        return events;
    }

    let direction = state.direction;
    let new_head = wrap_position(state.head() + direction.delta());

    // Checked against the full body, tail included
    if state.is_occupied(new_head) {
        log::info!("Self-collision at ({}, {}), final score {}", new_head.x, new_head.y, state.score);
        if state.transition(GameLifecycle::GameOver).is_ok() {
            events.push(GameEvent::GameOver { score: state.score });
        }
        return events;
    }

    state.heading = direction;
    state.body.push_front(new_head);

    let ate = state.food.as_ref().is_some_and(|food| food.pos == new_head);
    if ate {
        if let Some(food) = state.food.take() {
            state.increment_score();

            let order = queue.record_eaten(food.track.clone(), food.artwork_url.clone()).order;
            events.push(GameEvent::TrackEaten {
                order,
                track: food.track.clone(),
            });

            match queue.advance(rng) {
                Ok(track) => {
                    events.push(GameEvent::TrackChanged {
                        track: track.clone(),
                    });
                    spawn_food(state, track, rng, &mut events);
                }
                Err(e) => log::warn!("Could not advance track queue: {}", e),
            }
        }
    } else {
        state.body.pop_back();
    }

    state.touch();
    events
}

/// Place food for `track` on a free cell, using its smallest artwork.
///
/// On a full board the food stays absent and the next ticks skip the eat check.
pub fn spawn_food<R: Rng + ?Sized>(
    state: &mut GameState,
    track: Rc<Track>,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    match find_free_cell(&state.body, rng) {
        Ok(pos) => {
            let artwork_url = track.smallest_artwork().map(str::to_string);
            log::debug!("Food for '{}' at ({}, {})", track.name, pos.x, pos.y);
            events.push(GameEvent::FoodSpawned {
                pos,
                artwork_url: artwork_url.clone(),
            });
            state.set_food(Some(Food {
                pos,
                track,
                artwork_url,
            }));
        }
        Err(e) => {
            log::warn!("{}", e);
            state.set_food(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GRID_SIZE;
    use crate::sim::grid::{Position, in_bounds};
    use crate::sim::queue::tests::{pool, track};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::VecDeque;

    fn playing(body: &[(i32, i32)], direction: Direction) -> GameState {
        let mut state = GameState::new();
        state.transition(GameLifecycle::Playing).unwrap();
        state.body = body.iter().map(|&(x, y)| Position::new(x, y)).collect();
        state.direction = direction;
        state.heading = direction;
        state
    }

    fn food_at(x: i32, y: i32, id: &str) -> Food {
        let t = Rc::new(track(id));
        let artwork_url = t.smallest_artwork().map(str::to_string);
        Food {
            pos: Position::new(x, y),
            track: t,
            artwork_url,
        }
    }

    #[test]
    fn test_move_without_food_keeps_length() {
        let mut state = playing(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
        let mut queue = TrackQueue::new();
        let mut rng = Pcg32::seed_from_u64(1);

        let events = tick(&mut state, &mut queue, &mut rng);
        assert!(events.is_empty());
        assert_eq!(
            state.body,
            VecDeque::from([Position::new(6, 5), Position::new(5, 5), Position::new(4, 5)])
        );
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_eating_grows_and_advances_queue() {
        let mut state = playing(&[(5, 5), (4, 5)], Direction::Right);
        state.food = Some(food_at(6, 5, "eaten"));
        let mut queue = TrackQueue::new();
        queue.initialize(vec![track("a"), track("b"), track("c")]);
        let mut rng = Pcg32::seed_from_u64(2);

        let events = tick(&mut state, &mut queue, &mut rng);

        assert_eq!(state.body.len(), 3);
        assert_eq!(state.score, 1);
        assert_eq!(queue.history().len(), 1);
        assert_eq!(queue.history()[0].track.id, "eaten");
        assert_eq!(queue.history()[0].order, 1);
        assert_eq!(
            queue.history()[0].artwork_url.as_deref(),
            Some("https://img.test/eaten/64")
        );
        assert_eq!(queue.current().unwrap().id, "b");

        // New food belongs to the new current track and avoids the body
        let food = state.food.as_ref().unwrap();
        assert_eq!(food.track.id, "b");
        assert_eq!(food.artwork_url.as_deref(), Some("https://img.test/b/64"));
        assert!(!state.body.contains(&food.pos));

        assert!(matches!(events[0], GameEvent::TrackEaten { order: 1, .. }));
        assert!(matches!(&events[1], GameEvent::TrackChanged { track } if track.id == "b"));
        assert!(matches!(events[2], GameEvent::FoodSpawned { .. }));
    }

    #[test]
    fn test_self_collision_with_tail_is_game_over() {
        let body = [(5, 5), (4, 5), (4, 6), (5, 6)];
        let mut state = playing(&body, Direction::Down);
        let before = state.body.clone();
        let mut queue = TrackQueue::new();
        let mut rng = Pcg32::seed_from_u64(3);

        let events = tick(&mut state, &mut queue, &mut rng);

        assert_eq!(state.lifecycle, GameLifecycle::GameOver);
        assert_eq!(state.body, before);
        assert!(matches!(events.as_slice(), [GameEvent::GameOver { score: 0 }]));

        // Frozen afterwards
        assert!(tick(&mut state, &mut queue, &mut rng).is_empty());
        assert_eq!(state.body, before);
    }

    #[test]
    fn test_wraps_across_edges() {
        let mut state = playing(&[(GRID_SIZE - 1, 0)], Direction::Right);
        let mut queue = TrackQueue::new();
        let mut rng = Pcg32::seed_from_u64(4);
        tick(&mut state, &mut queue, &mut rng);
        assert_eq!(state.head(), Position::new(0, 0));

        state.set_direction(Direction::Up);
        tick(&mut state, &mut queue, &mut rng);
        assert_eq!(state.head(), Position::new(0, GRID_SIZE - 1));
    }

    #[test]
    fn test_paused_and_idle_do_not_move() {
        let mut queue = TrackQueue::new();
        let mut rng = Pcg32::seed_from_u64(5);

        let mut idle = GameState::new();
        tick(&mut idle, &mut queue, &mut rng);
        assert_eq!(idle.head(), Position::new(10, 10));

        let mut paused = playing(&[(5, 5)], Direction::Right);
        paused.paused = true;
        tick(&mut paused, &mut queue, &mut rng);
        assert_eq!(paused.head(), Position::new(5, 5));
    }

    #[test]
    fn test_neutral_direction_holds_still() {
        let mut state = playing(&[(5, 5)], Direction::None);
        let mut queue = TrackQueue::new();
        let mut rng = Pcg32::seed_from_u64(6);
        tick(&mut state, &mut queue, &mut rng);
        assert_eq!(state.lifecycle, GameLifecycle::Playing);
        assert_eq!(state.head(), Position::new(5, 5));
    }

    #[test]
    fn test_missing_food_skips_eat_check() {
        let mut state = playing(&[(5, 5), (4, 5)], Direction::Right);
        let mut queue = TrackQueue::new();
        queue.initialize(pool(2));
        let mut rng = Pcg32::seed_from_u64(7);
        tick(&mut state, &mut queue, &mut rng);
        assert_eq!(state.body.len(), 2);
        assert!(state.food.is_none());
        assert!(queue.history().is_empty());
    }

    #[test]
    fn test_heading_follows_executed_move() {
        let mut state = playing(&[(5, 5), (4, 5)], Direction::Right);
        state.direction = Direction::Up;
        assert_eq!(state.heading, Direction::Right);
        let mut queue = TrackQueue::new();
        let mut rng = Pcg32::seed_from_u64(8);
        tick(&mut state, &mut queue, &mut rng);
        assert_eq!(state.heading, Direction::Up);
    }

    proptest! {
        #[test]
        fn prop_body_stays_on_board(
            seed in any::<u64>(),
            turns in proptest::collection::vec(0u8..4, 1..120),
        ) {
            let mut state = playing(&[(10, 10), (9, 10), (8, 10)], Direction::Right);
            let mut queue = TrackQueue::new();
            queue.initialize(pool(4));
            let mut rng = Pcg32::seed_from_u64(seed);
            let first = queue.current().unwrap().clone();
            spawn_food(&mut state, first, &mut rng, &mut Vec::new());

            for turn in turns {
                let wanted = match turn {
                    0 => Direction::Up,
                    1 => Direction::Down,
                    2 => Direction::Left,
                    _ => Direction::Right,
                };
                if wanted.turns_from(state.heading) {
                    state.set_direction(wanted);
                }

                let len_before = state.body.len();
                let score_before = state.score;
                tick(&mut state, &mut queue, &mut rng);
                if state.lifecycle == GameLifecycle::GameOver {
                    prop_assert_eq!(state.body.len(), len_before);
                    break;
                }

                prop_assert!(state.body.iter().all(|&p| in_bounds(p)));
                if state.score == score_before {
                    prop_assert_eq!(state.body.len(), len_before);
                } else {
                    prop_assert_eq!(state.score, score_before + 1);
                    prop_assert_eq!(state.body.len(), len_before + 1);
                }
            }
        }
    }
}
