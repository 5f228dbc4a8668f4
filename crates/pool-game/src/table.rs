//! Table geometry: bounds, pockets and cushion layout.

use glam::Vec2;
use pool_engine::VectorColor;

use crate::config::TablePreset;
use crate::entities::BallId;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inset on every side.
    pub fn shrink(&self, by: f32) -> Rect {
        Rect {
            min: self.min + Vec2::splat(by),
            max: self.max - Vec2::splat(by),
        }
    }
}

/// A pocket and the balls it has swallowed, in capture order.
#[derive(Debug, Clone, PartialEq)]
pub struct Pocket {
    pub pos: Vec2,
    capture_radius: f32,
    captured: Vec<BallId>,
}

impl Pocket {
    pub fn new(pos: Vec2, capture_radius: f32) -> Self {
        Self {
            pos,
            capture_radius,
            captured: Vec::new(),
        }
    }

    pub fn capture_radius(&self) -> f32 {
        self.capture_radius
    }

    pub fn captured(&self) -> &[BallId] {
        &self.captured
    }

    /// A ball is captured once its centre is within the capture radius less
    /// `containment` of its own radius.
    pub fn holds(&self, ball_pos: Vec2, ball_radius: f32, containment: f32) -> bool {
        ball_pos.distance(self.pos) < self.capture_radius - ball_radius * containment
    }

    pub(crate) fn capture(&mut self, ball: BallId) {
        self.captured.push(ball);
    }
}

/// A fixed rectangular collider, by centre and half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub center: Vec2,
    pub half: Vec2,
}

/// The table: outer bounds, rails, pockets.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Outer edge of the rails. A ball centre outside this is off the table.
    pub bounds: Rect,
    pub rail: f32,
    pub pocket_gap: f32,
    pub felt: VectorColor,
    pub rail_color: VectorColor,
    side_pockets: bool,
    pockets: Vec<Pocket>,
}

impl Table {
    pub fn from_preset(preset: &TablePreset) -> Self {
        let bounds = Rect::new(
            Vec2::splat(preset.margin),
            Vec2::new(preset.width, preset.height),
        );
        let (x, y) = (bounds.min.x, bounds.min.y);
        let (w, h) = (preset.width, preset.height);
        let corner = preset.rail * preset.corner_inset;
        let side = preset.rail * preset.side_inset;

        // Corners first, then the optional long-edge midpoints
        let mut positions = vec![
            Vec2::new(x + corner, y + corner),
            Vec2::new(x + w - corner, y + corner),
            Vec2::new(x + corner, y + h - corner),
            Vec2::new(x + w - corner, y + h - corner),
        ];
        if preset.side_pockets {
            positions.push(Vec2::new(x + w / 2.0, y + side));
            positions.push(Vec2::new(x + w / 2.0, y + h - side));
        }

        Self {
            bounds,
            rail: preset.rail,
            pocket_gap: preset.pocket_gap,
            felt: preset.felt,
            rail_color: preset.rail_color,
            side_pockets: preset.side_pockets,
            pockets: positions
                .into_iter()
                .map(|p| Pocket::new(p, preset.pocket_radius))
                .collect(),
        }
    }

    pub fn pockets(&self) -> &[Pocket] {
        &self.pockets
    }

    pub(crate) fn pockets_mut(&mut self) -> &mut [Pocket] {
        &mut self.pockets
    }

    /// Area inside the cushions.
    pub fn playfield(&self) -> Rect {
        self.bounds.shrink(self.rail)
    }

    /// Cushion colliders with gaps at the pocket mouths.
    pub fn cushions(&self) -> Vec<Wall> {
        let b = self.bounds;
        let c = self.rail;
        let gap = self.pocket_gap;
        let left = b.min.x + c;
        let right = b.max.x - c;
        let top = b.min.y + c;
        let bottom = b.max.y - c;
        let top_y = b.min.y + c / 2.0;
        let bottom_y = b.max.y - c / 2.0;

        let mut walls = Vec::with_capacity(6);

        // Long edges: one run between corner gaps, or two runs around the side pocket
        if self.side_pockets {
            let mid_x = b.center().x;
            let seg_len = mid_x - left - gap - gap / 2.0;
            if seg_len > 0.0 {
                let half = Vec2::new(seg_len / 2.0, c / 2.0);
                for y in [top_y, bottom_y] {
                    walls.push(Wall {
                        center: Vec2::new(left + gap + seg_len / 2.0, y),
                        half,
                    });
                    walls.push(Wall {
                        center: Vec2::new(right - gap - seg_len / 2.0, y),
                        half,
                    });
                }
            }
        } else {
            let seg_len = right - left - 2.0 * gap;
            if seg_len > 0.0 {
                let half = Vec2::new(seg_len / 2.0, c / 2.0);
                for y in [top_y, bottom_y] {
                    walls.push(Wall {
                        center: Vec2::new(b.center().x, y),
                        half,
                    });
                }
            }
        }

        // Short edges: one piece with corner gaps top and bottom
        let side_len = bottom - top - 2.0 * gap;
        if side_len > 0.0 {
            let half = Vec2::new(c / 2.0, side_len / 2.0);
            for x in [b.min.x + c / 2.0, b.max.x - c / 2.0] {
                walls.push(Wall {
                    center: Vec2::new(x, b.center().y),
                    half,
                });
            }
        }

        walls
    }

    /// Thin backstops just outside the table edge, so a ball that rolls
    /// through a pocket mouth without dropping stays in play.
    pub fn backstops(&self) -> [Wall; 4] {
        let b = self.bounds;
        let t = self.rail / 2.0;
        let size = b.size();
        let center = b.center();
        [
            Wall {
                center: Vec2::new(center.x, b.min.y - t / 2.0),
                half: Vec2::new(size.x / 2.0 + t, t / 2.0),
            },
            Wall {
                center: Vec2::new(center.x, b.max.y + t / 2.0),
                half: Vec2::new(size.x / 2.0 + t, t / 2.0),
            },
            Wall {
                center: Vec2::new(b.min.x - t / 2.0, center.y),
                half: Vec2::new(t / 2.0, size.y / 2.0 + t),
            },
            Wall {
                center: Vec2::new(b.max.x + t / 2.0, center.y),
                half: Vec2::new(t / 2.0, size.y / 2.0 + t),
            },
        ]
    }

    /// Forget all captures (used when re-racking).
    pub(crate) fn clear_pockets(&mut self) {
        for pocket in &mut self.pockets {
            pocket.captured.clear();
        }
    }
}
