//! Back-to-front draw pass over a closed set of drawables.

use glam::Vec2;
use pool_engine::{RenderSink, VectorColor};

use crate::balls::BallType;
use crate::entities::{Ball, Cue};
use crate::table::{Pocket, Table};
use crate::turn::{GameState, TurnPhase};

const POCKET_COLOR: VectorColor = VectorColor::new(0.02, 0.02, 0.02, 1.0);
const CUE_WOOD: VectorColor = VectorColor::new(0.55, 0.35, 0.15, 1.0);
const CUE_TIP: VectorColor = VectorColor::new(0.2, 0.4, 0.6, 1.0);
const FERRULE: VectorColor = VectorColor::new(0.9, 0.9, 0.85, 1.0);
const AIM_GUIDE: VectorColor = VectorColor::new(1.0, 1.0, 1.0, 0.3);
const HUD: VectorColor = VectorColor::new(0.95, 0.95, 0.9, 1.0);
const CUE_LENGTH: f32 = 180.0;

/// Everything that can appear on screen.
#[derive(Debug, Clone, Copy)]
pub enum Drawable<'a> {
    Table(&'a Table),
    Pocket(&'a Pocket),
    Ball(&'a Ball),
    /// A cue stick lined up behind the cue ball.
    Cue {
        cue: &'a Cue,
        cue_ball: Vec2,
        ball_radius: f32,
        aiming: bool,
    },
}

impl Drawable<'_> {
    pub fn draw(&self, sink: &mut dyn RenderSink) {
        match *self {
            Drawable::Table(table) => draw_table(table, sink),
            Drawable::Pocket(pocket) => {
                sink.fill_circle(pocket.pos, pocket.capture_radius(), POCKET_COLOR)
            }
            Drawable::Ball(ball) => draw_ball(ball, sink),
            Drawable::Cue {
                cue,
                cue_ball,
                ball_radius,
                aiming,
            } => draw_cue(cue, cue_ball, ball_radius, aiming, sink),
        }
    }
}

fn draw_table(table: &Table, sink: &mut dyn RenderSink) {
    let b = table.bounds;
    let size = b.size();

    // Rails as a full slab, felt on top; pocket holes cut through both
    sink.fill_rect(b.center(), size.x, size.y, table.rail_color);
    let play = table.playfield();
    sink.fill_rect(play.center(), play.size().x, play.size().y, table.felt);
}

fn draw_ball(ball: &Ball, sink: &mut dyn RenderSink) {
    match ball.ball_type {
        BallType::Striped => {
            sink.fill_circle(ball.pos, ball.radius, VectorColor::WHITE);
            sink.fill_rect(ball.pos, ball.radius * 1.7, ball.radius * 1.0, ball.color);
        }
        BallType::Cue => sink.fill_circle(ball.pos, ball.radius, ball.color),
        BallType::Solid | BallType::Black => {
            sink.fill_circle(ball.pos, ball.radius, ball.color);
            sink.fill_circle(ball.pos, ball.radius * 0.4, VectorColor::WHITE);
        }
    }
}

fn draw_cue(cue: &Cue, cue_ball: Vec2, ball_radius: f32, aiming: bool, sink: &mut dyn RenderSink) {
    let dir = cue.direction();
    let tip = if cue.body.is_some() {
        cue.pos
    } else {
        cue_ball - dir * (ball_radius + 3.0 + cue.pullback * 0.4)
    };
    let butt = tip - dir * CUE_LENGTH;

    if aiming {
        sink.line(
            cue_ball + dir * (ball_radius + 3.0),
            cue_ball + dir * (ball_radius + 3.0 + 300.0),
            1.5,
            AIM_GUIDE,
        );
    }
    sink.line(tip, butt, 5.0, CUE_WOOD);
    sink.line(tip - dir * 2.0, tip - dir * 10.0, 4.0, FERRULE);
    sink.line(tip, tip - dir * 2.0, 3.5, CUE_TIP);
}

/// Draw the whole scene.
///
/// Order: table, pockets, cue ball, object balls, cue sticks, HUD text.
pub fn draw_scene(
    sink: &mut dyn RenderSink,
    table: &Table,
    balls: &[Ball],
    cues: &[Cue],
    state: &GameState,
) {
    let mut list: Vec<Drawable> = Vec::with_capacity(balls.len() + table.pockets().len() + 3);
    list.push(Drawable::Table(table));
    list.extend(table.pockets().iter().map(Drawable::Pocket));

    let cue_ball = balls.iter().find(|b| b.is_cue() && !b.potted);
    if let Some(ball) = cue_ball {
        list.push(Drawable::Ball(ball));
    }
    list.extend(
        balls
            .iter()
            .filter(|b| !b.is_cue() && !b.potted)
            .map(Drawable::Ball),
    );

    if let Some(ball) = cue_ball {
        let aiming = state.phase == TurnPhase::WaitingForAim && state.winner.is_none();
        for cue in cues {
            let visible = cue.body.is_some() || (aiming && cue.owner == state.turn);
            if visible {
                list.push(Drawable::Cue {
                    cue,
                    cue_ball: ball.pos,
                    ball_radius: ball.radius,
                    aiming: aiming && cue.body.is_none(),
                });
            }
        }
    }

    for item in &list {
        item.draw(sink);
    }
    draw_hud(sink, table, state);
}

fn draw_hud(sink: &mut dyn RenderSink, table: &Table, state: &GameState) {
    let left = table.bounds.min.x;
    let y = table.bounds.min.y - 40.0;

    if let Some(winner) = state.winner {
        let center = table.bounds.center();
        sink.text(&format!("{} wins!", winner), center, 48.0, VectorColor::YELLOW);
        return;
    }

    sink.text(&format!("{} to shoot", state.turn), Vec2::new(left, y), 20.0, HUD);

    let groups = match (
        state.groups.group_of(crate::entities::PlayerId::ONE),
        state.groups.group_of(crate::entities::PlayerId::TWO),
    ) {
        (Some(a), Some(b)) => format!("Player 1: {}  Player 2: {}", a.label(), b.label()),
        _ => String::from("Table open"),
    };
    sink.text(&groups, Vec2::new(left + 300.0, y), 20.0, HUD);

    if let Some(foul) = state.last_foul {
        sink.text(
            &format!("Foul: {}", foul),
            Vec2::new(left + 700.0, y),
            20.0,
            VectorColor::RED,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balls::BallSpec;
    use crate::config::PoolConfig;
    use crate::entities::{BallId, PlayerId};
    use crate::turn::Foul;
    use pool_engine::{DrawCommand, DrawList};

    fn scene() -> (Table, Vec<Ball>, Vec<Cue>) {
        let table = Table::from_preset(&PoolConfig::eight_ball().unwrap().table);
        let balls = vec![
            Ball::new(BallId(0), &BallSpec::new(0, BallType::Cue), 12.0, Vec2::new(300.0, 300.0)),
            Ball::new(BallId(1), &BallSpec::new(1, BallType::Solid), 12.0, Vec2::new(700.0, 300.0)),
            Ball::new(BallId(2), &BallSpec::new(9, BallType::Striped), 12.0, Vec2::new(720.0, 310.0)),
        ];
        let cues = vec![Cue::new(PlayerId::ONE), Cue::new(PlayerId::TWO)];
        (table, balls, cues)
    }

    fn circle_at(cmd: &DrawCommand, pos: Vec2) -> bool {
        matches!(cmd, DrawCommand::Circle { center, .. } if Vec2::from(*center) == pos)
    }

    #[test]
    fn draw_order_is_back_to_front() {
        let (table, balls, cues) = scene();
        let mut list = DrawList::new();
        draw_scene(&mut list, &table, &balls, &cues, &GameState::new());
        let cmds = list.commands();

        let first_pocket = cmds
            .iter()
            .position(|c| circle_at(c, table.pockets()[0].pos))
            .unwrap();
        let cue_ball = cmds.iter().position(|c| circle_at(c, balls[0].pos)).unwrap();
        let object = cmds.iter().position(|c| circle_at(c, balls[1].pos)).unwrap();
        let stick = cmds.iter().position(|c| matches!(c, DrawCommand::Line { .. })).unwrap();
        let text = cmds.iter().position(|c| matches!(c, DrawCommand::Text { .. })).unwrap();

        assert!(matches!(cmds[0], DrawCommand::Rect { .. }));
        assert!(first_pocket < cue_ball);
        assert!(cue_ball < object);
        assert!(object < stick);
        assert!(stick < text);
    }

    #[test]
    fn potted_balls_are_not_drawn() {
        let (table, mut balls, cues) = scene();
        balls[1].potted = true;
        let mut list = DrawList::new();
        draw_scene(&mut list, &table, &balls, &cues, &GameState::new());
        assert!(!list.commands().iter().any(|c| circle_at(c, balls[1].pos)));
    }

    #[test]
    fn no_stick_while_balls_roll() {
        let (table, balls, cues) = scene();
        let state = GameState {
            phase: TurnPhase::Settling,
            ..GameState::new()
        };
        let mut list = DrawList::new();
        draw_scene(&mut list, &table, &balls, &cues, &state);
        assert!(!list.commands().iter().any(|c| matches!(c, DrawCommand::Line { .. })));
    }

    #[test]
    fn hud_reports_foul_and_winner() {
        let (table, balls, cues) = scene();
        let state = GameState {
            last_foul: Some(Foul::Scratch),
            ..GameState::new()
        };
        let mut list = DrawList::new();
        draw_scene(&mut list, &table, &balls, &cues, &state);
        let labels: Vec<&str> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["Player 1 to shoot", "Table open", "Foul: scratch"]);

        let over = GameState {
            winner: Some(PlayerId::TWO),
            phase: TurnPhase::GameOver,
            ..GameState::new()
        };
        list.clear();
        draw_scene(&mut list, &table, &balls, &cues, &over);
        assert!(list
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { label, .. } if label == "Player 2 wins!")));
    }
}
