//! Terminal rendering of the playfield.
//!
//! World coordinates (500x800 pixels) are scaled onto whatever area the
//! terminal offers; each character cell shows what lies under its centre.

use super::game_common::{
    create_game_layout, info_line, render_game_over_banner, render_info_panel_frame,
    render_status_bar,
};
use crate::constants::{FLOOR_Y, NOSE_DIVE_TILT, WIN_HEIGHT, WIN_WIDTH};
use crate::frontend::Snapshot;
use crate::game::sprites::PIPE_LIP_HEIGHT;
use crate::game::{Base, Bird, Pipe, SpriteSet};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const FLOOR_STRIPE: f64 = 24.0;

/// One character cell of the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

const EMPTY: Cell = Cell {
    ch: ' ',
    color: Color::Reset,
};

/// Static parts of a scene.
#[derive(Debug, Clone, Copy)]
pub struct SceneOptions<'a> {
    pub title: &'a str,
    /// Draw lines from every bird to the target pipe's gap edges
    pub show_lines: bool,
    pub controls: &'a [(&'a str, &'a str)],
    /// A human is playing and can restart after a crash
    pub interactive: bool,
}

pub fn render_scene(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot<'_>,
    sprites: &SpriteSet,
    options: &SceneOptions<'_>,
) {
    let layout = create_game_layout(frame, area, options.title, Color::Cyan, 22);

    render_playfield(frame, layout.content, snapshot, sprites, options.show_lines);
    render_info_panel(frame, layout.info_panel, snapshot);

    let status = if snapshot.game_over {
        "Game over".to_string()
    } else {
        format!("Score: {}", snapshot.score)
    };
    let color = if snapshot.game_over {
        Color::Red
    } else {
        Color::Green
    };
    render_status_bar(frame, layout.status_bar, &status, color, options.controls);

    if offers_restart(snapshot, options) {
        render_game_over_banner(
            frame,
            layout.content,
            "CRASH!",
            &format!("You passed {} pipes.", snapshot.score),
            "[R] Restart  [Q] Quit",
        );
    }
}

/// The crash banner with its restart hint only makes sense in solo play.
fn offers_restart(snapshot: &Snapshot<'_>, options: &SceneOptions<'_>) -> bool {
    snapshot.game_over && options.interactive
}

fn render_playfield(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot<'_>,
    sprites: &SpriteSet,
    show_lines: bool,
) {
    let grid = paint_playfield(
        snapshot,
        sprites,
        area.width as usize,
        area.height as usize,
        show_lines,
    );
    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|cell| Span::styled(cell.ch.to_string(), Style::default().fg(cell.color)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_info_panel(frame: &mut Frame, area: Rect, snapshot: &Snapshot<'_>) {
    let inner = render_info_panel_frame(frame, area);
    if inner.height < 2 || inner.width < 4 {
        return;
    }

    let mut lines = vec![
        Line::from(""),
        info_line("Score", snapshot.score.to_string(), Color::White),
    ];
    if let Some(generation) = snapshot.generation {
        lines.push(info_line("Gen", generation.to_string(), Color::Cyan));
    }
    if snapshot.generation.is_some() || snapshot.alive() > 1 {
        lines.push(info_line("Alive", snapshot.alive().to_string(), Color::Yellow));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Rasterise a snapshot into a `width` x `height` grid of cells.
pub fn paint_playfield(
    snapshot: &Snapshot<'_>,
    sprites: &SpriteSet,
    width: usize,
    height: usize,
    show_lines: bool,
) -> Vec<Vec<Cell>> {
    let mut grid = vec![vec![EMPTY; width]; height];
    if width == 0 || height == 0 {
        return grid;
    }

    let x_scale = width as f64 / WIN_WIDTH as f64;
    let y_scale = height as f64 / WIN_HEIGHT as f64;

    for (row, cells) in grid.iter_mut().enumerate() {
        let world_y = (row as f64 + 0.5) / y_scale;
        for (col, cell) in cells.iter_mut().enumerate() {
            let world_x = (col as f64 + 0.5) / x_scale;
            if world_y >= FLOOR_Y as f64 {
                *cell = floor_cell(snapshot.base, world_x);
            } else if let Some(hit) = snapshot
                .pipes
                .iter()
                .find_map(|pipe| pipe_cell(pipe, world_x, world_y, sprites))
            {
                *cell = hit;
            }
        }
    }

    if show_lines {
        if let Some(pipe) = snapshot.target.and_then(|i| snapshot.pipes.get(i)) {
            let pipe_mid = pipe.x as f64 + sprites.pipe_width() as f64 / 2.0;
            for bird in &snapshot.birds {
                let (bx, by) = bird_centre(bird, sprites);
                for edge in [pipe.height, pipe.bottom] {
                    plot_line(
                        &mut grid,
                        (bx * x_scale, by * y_scale),
                        (pipe_mid * x_scale, edge as f64 * y_scale),
                    );
                }
            }
        }
    }

    for bird in &snapshot.birds {
        let (bx, by) = bird_centre(bird, sprites);
        let col = ((bx * x_scale) as usize).min(width - 1);
        let row = ((by * y_scale).max(0.0) as usize).min(height - 1);
        grid[row][col] = Cell {
            ch: bird_glyph(bird),
            color: Color::Yellow,
        };
    }

    grid
}

fn bird_centre(bird: &Bird, sprites: &SpriteSet) -> (f64, f64) {
    (
        bird.x as f64 + sprites.bird_width() as f64 / 2.0,
        bird.y + sprites.bird_height() as f64 / 2.0,
    )
}

fn bird_glyph(bird: &Bird) -> char {
    if bird.tilt <= NOSE_DIVE_TILT {
        '▼'
    } else if bird.tilt > 0.0 {
        '▲'
    } else {
        '►'
    }
}

fn pipe_cell(pipe: &Pipe, world_x: f64, world_y: f64, sprites: &SpriteSet) -> Option<Cell> {
    let left = pipe.x as f64;
    if world_x < left || world_x >= left + sprites.pipe_width() as f64 {
        return None;
    }
    let lip = PIPE_LIP_HEIGHT as f64;
    let (top_edge, bottom_edge) = (pipe.height as f64, pipe.bottom as f64);

    let lip_row = if world_y < top_edge {
        world_y >= top_edge - lip
    } else if world_y >= bottom_edge {
        world_y < bottom_edge + lip
    } else {
        return None;
    };

    Some(if lip_row {
        Cell {
            ch: '▓',
            color: Color::LightGreen,
        }
    } else {
        Cell {
            ch: '█',
            color: Color::Green,
        }
    })
}

fn floor_cell(base: &Base, world_x: f64) -> Cell {
    let x = world_x as i32;
    if !base.covers(x) {
        return EMPTY;
    }
    let segment_x = if (base.x1..base.x1 + base.width).contains(&x) {
        base.x1
    } else {
        base.x2
    };
    let stripe = ((world_x - segment_x as f64) / FLOOR_STRIPE) as i64 % 2 == 0;
    Cell {
        ch: '▒',
        color: if stripe { Color::Yellow } else { Color::LightYellow },
    }
}

/// Dotted line between two points given in grid coordinates.
fn plot_line(grid: &mut [Vec<Cell>], from: (f64, f64), to: (f64, f64)) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil() as usize;
    for i in 0..=steps {
        let t = if steps == 0 { 0.0 } else { i as f64 / steps as f64 };
        let (x, y) = (from.0 + dx * t, from.1 + dy * t);
        if x < 0.0 || y < 0.0 {
            continue;
        }
        if let Some(cell) = grid
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *cell = Cell {
                ch: '·',
                color: Color::Red,
            };
        }
    }
}
