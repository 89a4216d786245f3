//! Rendering module
//!
//! The simulation never draws. `draw_frame` turns a `GameState` into calls
//! on a `Canvas`, which is whatever surface the host provides.

pub mod terminal;

pub use terminal::TerminalCanvas;

use glam::IVec2;

use crate::sim::{AsteroidTint, EntityRef, ExplosionStage, GameState, Rect};

/// Palette shared by all surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Grey,
    OrangeRed,
    Red,
    Blue,
    Yellow,
    Green,
    Cyan,
}

/// Artwork an entity is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Star,
    Ufo,
    Asteroid(AsteroidTint),
    /// Explosion animation frame 1..=3
    Explosion(u8),
    Ship,
    AidKit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Normal,
    Banner,
}

/// Drawing primitives the core needs from a render surface
pub trait Canvas {
    fn clear(&mut self);
    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect);
    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn draw_line(&mut self, from: IVec2, to: IVec2, color: Color);
    fn draw_text(&mut self, pos: IVec2, text: &str, color: Color, size: TextSize);
    /// Show the finished frame
    fn present(&mut self) -> std::io::Result<()>;
}

/// Surface that discards everything (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn clear(&mut self) {}
    fn draw_sprite(&mut self, _sprite: Sprite, _rect: Rect) {}
    fn draw_rect(&mut self, _rect: Rect, _color: Color) {}
    fn draw_line(&mut self, _from: IVec2, _to: IVec2, _color: Color) {}
    fn draw_text(&mut self, _pos: IVec2, _text: &str, _color: Color, _size: TextSize) {}
    fn present(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Render one complete frame (does not present it)
pub fn draw_frame(state: &GameState, canvas: &mut impl Canvas) {
    canvas.clear();

    for entity in state.entities() {
        draw_entity(canvas, entity);
    }

    draw_hud(state, canvas);

    if state.wave_banner_visible() {
        let text = format!("WAVE {}", state.wave_counter);
        canvas.draw_text(
            banner_pos(state, &text, 0),
            &text,
            Color::Yellow,
            TextSize::Banner,
        );
    }

    if state.is_game_over() {
        draw_game_over(state, canvas);
    }
}

/// Draw a single entity
pub fn draw_entity(canvas: &mut impl Canvas, entity: EntityRef<'_>) {
    let rect = entity.rect();
    match entity {
        EntityRef::Star(_) => canvas.draw_sprite(Sprite::Star, rect),
        EntityRef::StarDust(body) => {
            // Small white cross
            let p = body.pos;
            let s = body.size;
            canvas.draw_line(p, p + s, Color::White);
            canvas.draw_line(
                IVec2::new(p.x + s.x, p.y),
                IVec2::new(p.x, p.y + s.y),
                Color::White,
            );
        }
        EntityRef::Ufo(_) => canvas.draw_sprite(Sprite::Ufo, rect),
        EntityRef::Asteroid(asteroid) => match asteroid.stage {
            ExplosionStage::Alive => canvas.draw_sprite(Sprite::Asteroid(asteroid.tint), rect),
            ExplosionStage::Exploding(frame) => canvas.draw_sprite(Sprite::Explosion(frame), rect),
            ExplosionStage::Blown => {}
        },
        EntityRef::Bullet(_) => canvas.draw_rect(rect, Color::OrangeRed),
        EntityRef::Ship(_) => canvas.draw_sprite(Sprite::Ship, rect),
        EntityRef::AidKit(_) => canvas.draw_sprite(Sprite::AidKit, rect),
    }
}

fn draw_hud(state: &GameState, canvas: &mut impl Canvas) {
    canvas.draw_text(
        IVec2::ZERO,
        &format!("Energy: {}", state.ship.energy),
        Color::White,
        TextSize::Normal,
    );
    let score = format!("Score: {}", state.score);
    let x = state.field.width / 2 - text_width(&score, TextSize::Normal) / 2;
    canvas.draw_text(IVec2::new(x, 0), &score, Color::Yellow, TextSize::Normal);
}

fn draw_game_over(state: &GameState, canvas: &mut impl Canvas) {
    let title = "The End";
    canvas.draw_text(
        banner_pos(state, title, 0),
        title,
        Color::White,
        TextSize::Banner,
    );
    let summary = format!("Final score: {}", state.score);
    canvas.draw_text(
        banner_pos(state, &summary, 1),
        &summary,
        Color::Yellow,
        TextSize::Normal,
    );
}

/// Approximate pixel width of `text`, for centring
fn text_width(text: &str, size: TextSize) -> i32 {
    let glyph = match size {
        TextSize::Normal => 7,
        TextSize::Banner => 30,
    };
    text.chars().count() as i32 * glyph
}

/// Horizontally centred position, `line` rows below the field centre
fn banner_pos(state: &GameState, text: &str, line: i32) -> IVec2 {
    let center = state.field.center();
    let width = text_width(text, TextSize::Banner).min(state.field.width);
    IVec2::new((center.x - width / 2).max(0), center.y - 30 + line * 60)
}
