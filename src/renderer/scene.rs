//! Scene building: snapshot in, draw commands out

use glam::Vec2;

use crate::assets::ImageLookup;
use crate::consts::{CELL_SIZE, GRID_SIZE};
use crate::sim::{Direction, GameState, Position, TrackQueue};

/// Colors for board elements
pub mod colors {
    pub const GRID_LINE: &str = "rgba(0, 0, 0, 0.1)";
    pub const HEAD: &str = "#000000";
    pub const BORDER: &str = "#000000";
    pub const BODY_PLACEHOLDER: &str = "#FFFFFF";
    pub const FOOD_PLACEHOLDER: &str = "#FFDE00";
}

/// Tile border width in pixels
pub const BORDER_WIDTH: f32 = 2.0;

/// One drawing step, in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Wipe the whole board
    Clear { size: f32 },
    GridLine { from: Vec2, to: Vec2 },
    /// Filled triangle for the head
    Head { points: [Vec2; 3] },
    /// Bordered artwork tile. `fallback` is used if the image draw fails.
    Image {
        origin: Vec2,
        url: String,
        fallback: &'static str,
    },
    /// Bordered solid tile
    Placeholder { origin: Vec2, fill: &'static str },
}

/// Board side length in pixels
pub fn board_size() -> f32 {
    GRID_SIZE as f32 * CELL_SIZE
}

fn cell_origin(pos: Position) -> Vec2 {
    Vec2::new(pos.x as f32 * CELL_SIZE, pos.y as f32 * CELL_SIZE)
}

/// Triangle inside the head cell pointing along `direction`
pub fn head_triangle(pos: Position, direction: Direction) -> [Vec2; 3] {
    let o = cell_origin(pos);
    let s = CELL_SIZE;
    let h = s / 2.0;
    match direction {
        Direction::Left => [o + Vec2::new(s, 0.0), o + Vec2::new(0.0, h), o + Vec2::new(s, s)],
        Direction::Down => [o, o + Vec2::new(h, s), o + Vec2::new(s, 0.0)],
        Direction::Up => [o + Vec2::new(0.0, s), o + Vec2::new(h, 0.0), o + Vec2::new(s, s)],
        // Right and neutral
        _ => [o, o + Vec2::new(s, h), o + Vec2::new(0.0, s)],
    }
}

fn tile(origin: Vec2, url: Option<&str>, assets: &impl ImageLookup, fallback: &'static str) -> DrawCmd {
    match url {
        Some(url) if assets.is_ready(url) => DrawCmd::Image {
            origin,
            url: url.to_string(),
            fallback,
        },
        _ => DrawCmd::Placeholder {
            origin,
            fill: fallback,
        },
    }
}

/// Build the frame for the current state.
///
/// Order: grid, body from tail to head (so the head lands on top), food.
/// Body segment `i` shows the artwork of eaten record `i - 1`.
pub fn build_scene(
    state: &GameState,
    queue: &TrackQueue,
    assets: &impl ImageLookup,
    show_grid: bool,
) -> Vec<DrawCmd> {
    let size = board_size();
    let mut cmds = Vec::with_capacity(2 * (GRID_SIZE as usize + 1) + state.body.len() + 2);
    cmds.push(DrawCmd::Clear { size });

    if show_grid {
        for i in 0..=GRID_SIZE {
            let p = i as f32 * CELL_SIZE;
            cmds.push(DrawCmd::GridLine {
                from: Vec2::new(p, 0.0),
                to: Vec2::new(p, size),
            });
            cmds.push(DrawCmd::GridLine {
                from: Vec2::new(0.0, p),
                to: Vec2::new(size, p),
            });
        }
    }

    for (index, &pos) in state.body.iter().enumerate().rev() {
        if index == 0 {
            cmds.push(DrawCmd::Head {
                points: head_triangle(pos, state.direction),
            });
        } else {
            let url = queue
                .segment_record(index)
                .and_then(|record| record.artwork_url.as_deref());
            cmds.push(tile(cell_origin(pos), url, assets, colors::BODY_PLACEHOLDER));
        }
    }

    if let Some(food) = &state.food {
        cmds.push(tile(
            cell_origin(food.pos),
            food.artwork_url.as_deref(),
            assets,
            colors::FOOD_PLACEHOLDER,
        ));
    }

    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetCache;
    use crate::sim::queue::tests::track;
    use crate::sim::Food;
    use std::collections::VecDeque;
    use std::rc::Rc;

    fn board(body: &[(i32, i32)]) -> GameState {
        let mut state = GameState::new();
        state.body = body.iter().map(|&(x, y)| Position::new(x, y)).collect::<VecDeque<_>>();
        state
    }

    #[test]
    fn test_grid_lines() {
        let state = GameState::new();
        let queue = TrackQueue::new();
        let cache: AssetCache<()> = AssetCache::new();
        let cmds = build_scene(&state, &queue, &cache, true);
        let lines = cmds.iter().filter(|c| matches!(c, DrawCmd::GridLine { .. })).count();
        assert_eq!(lines, 2 * (GRID_SIZE as usize + 1));

        let cmds = build_scene(&state, &queue, &cache, false);
        assert!(!cmds.iter().any(|c| matches!(c, DrawCmd::GridLine { .. })));
    }

    #[test]
    fn test_head_points_along_direction() {
        let pos = Position::new(2, 3);
        let right = head_triangle(pos, Direction::Right);
        // Apex on the right edge, vertically centred
        assert_eq!(right[1], Vec2::new(60.0, 70.0));

        let up = head_triangle(pos, Direction::Up);
        assert_eq!(up[1], Vec2::new(50.0, 60.0));

        let left = head_triangle(pos, Direction::Left);
        assert_eq!(left[1], Vec2::new(40.0, 70.0));

        let down = head_triangle(pos, Direction::Down);
        assert_eq!(down[1], Vec2::new(50.0, 80.0));

        assert_eq!(head_triangle(pos, Direction::None), right);
    }

    #[test]
    fn test_body_tiles_use_history_artwork() {
        let state = board(&[(5, 5), (4, 5), (3, 5)]);
        let mut queue = TrackQueue::new();
        queue.record_eaten(Rc::new(track("a")), Some("art/a".to_string()));
        queue.record_eaten(Rc::new(track("b")), Some("art/b".to_string()));

        let mut cache: AssetCache<()> = AssetCache::new();
        cache.request("art/a");
        cache.mark_ready("art/a", ());
        cache.request("art/b");

        let cmds = build_scene(&state, &queue, &cache, false);
        // Clear, tail, middle, head
        assert_eq!(cmds.len(), 4);
        assert_eq!(
            cmds[1],
            DrawCmd::Placeholder {
                origin: Vec2::new(60.0, 100.0),
                fill: colors::BODY_PLACEHOLDER
            }
        );
        assert_eq!(
            cmds[2],
            DrawCmd::Image {
                origin: Vec2::new(80.0, 100.0),
                url: "art/a".to_string(),
                fallback: colors::BODY_PLACEHOLDER
            }
        );
        assert!(matches!(cmds[3], DrawCmd::Head { .. }));
    }

    #[test]
    fn test_food_drawn_last() {
        let mut state = board(&[(5, 5)]);
        state.food = Some(Food {
            pos: Position::new(0, 1),
            track: Rc::new(track("f")),
            artwork_url: Some("art/f".to_string()),
        });

        let queue = TrackQueue::new();
        let mut cache: AssetCache<()> = AssetCache::new();
        let cmds = build_scene(&state, &queue, &cache, true);
        assert_eq!(
            cmds.last(),
            Some(&DrawCmd::Placeholder {
                origin: Vec2::new(0.0, 20.0),
                fill: colors::FOOD_PLACEHOLDER
            })
        );

        cache.request("art/f");
        cache.mark_ready("art/f", ());
        let cmds = build_scene(&state, &queue, &cache, true);
        assert!(matches!(cmds.last(), Some(DrawCmd::Image { url, .. }) if url == "art/f"));
    }
}
