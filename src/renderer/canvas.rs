//! Canvas 2D drawing of the slope

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::GameError;
use crate::sim::{FrameSnapshot, ObstacleKind, ObstacleSnapshot, PlayerSnapshot};

const BOARD_COLOR: &str = "#3498db";
const RIDER_COLOR: &str = "#f39c12";
const ROCK_COLOR: &str = "grey";
const TREE_COLOR: &str = "darkgreen";
const RIDER_RADIUS: f64 = 10.0;

fn js_err(value: JsValue) -> GameError {
    GameError::Js(format!("{:?}", value))
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    pub size: (u32, u32),
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, GameError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| GameError::Js("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GameError::Js("not a 2d context".into()))?;
        Ok(Self {
            ctx,
            size: (canvas.width(), canvas.height()),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
        }
    }

    /// Clear and draw one frame
    pub fn render(&self, frame: &FrameSnapshot) -> Result<(), GameError> {
        let (w, h) = self.size;
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
        self.draw_player(&frame.player).map_err(js_err)?;
        for obstacle in &frame.obstacles {
            self.draw_obstacle(obstacle).map_err(js_err)?;
        }
        Ok(())
    }

    fn draw_player(&self, player: &PlayerSnapshot) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.save();
        ctx.translate(player.x as f64, player.y as f64)?;
        ctx.rotate(player.facing as f64)?;
        self.draw_board(player.width as f64, player.height as f64)?;

        ctx.set_fill_style_str(RIDER_COLOR);
        ctx.begin_path();
        ctx.arc(0.0, 0.0, RIDER_RADIUS, 0.0, TAU)?;
        ctx.fill();
        ctx.restore();
        Ok(())
    }

    /// Rounded rectangle centered on the origin
    fn draw_board(&self, width: f64, height: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (hw, hh) = (width / 2.0, height / 2.0);
        let r = (height / 4.0).min(hw);

        ctx.set_fill_style_str(BOARD_COLOR);
        ctx.begin_path();
        ctx.move_to(-hw + r, -hh);
        ctx.line_to(hw - r, -hh);
        ctx.arc_to(hw, -hh, hw, -hh + r, r)?;
        ctx.line_to(hw, hh - r);
        ctx.arc_to(hw, hh, hw - r, hh, r)?;
        ctx.line_to(-hw + r, hh);
        ctx.arc_to(-hw, hh, -hw, hh - r, r)?;
        ctx.line_to(-hw, -hh + r);
        ctx.arc_to(-hw, -hh, -hw + r, -hh, r)?;
        ctx.close_path();
        ctx.fill();
        Ok(())
    }

    fn draw_obstacle(&self, obstacle: &ObstacleSnapshot) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (x, y) = (obstacle.x as f64, obstacle.y as f64);
        let half = obstacle.size as f64 / 2.0;

        ctx.begin_path();
        match obstacle.kind {
            ObstacleKind::Rock => {
                ctx.set_fill_style_str(ROCK_COLOR);
                ctx.arc(x, y, half, 0.0, TAU)?;
            }
            ObstacleKind::Tree => {
                ctx.set_fill_style_str(TREE_COLOR);
                ctx.move_to(x, y - half);
                ctx.line_to(x - half, y + half);
                ctx.line_to(x + half, y + half);
                ctx.close_path();
            }
        }
        ctx.fill();
        Ok(())
    }
}
