//! Match state and the per-tick update order.

use crate::entity::{Ball, Paddle};
use crate::error::SimError;
use crate::impulse::Impulse;
use crate::input::Action;
use crate::physics::Physics;
use crate::types::*;

/// Match state: paddles, ball, score and whether the ball is in play
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub config: Config,
    pub tick: Tick,
    pub paddle_one: Paddle,
    pub paddle_two: Option<Paddle>,
    pub ball: Ball,
    pub score: Score,
    /// False from a point until the next serve
    pub running: bool,
}

impl Game {
    /// Create a new match with the given configuration
    pub fn new(config: Config) -> Result<Self, SimError> {
        config.validate()?;

        let paddle_one = Paddle::from_config(Side::One, &config)?;
        let paddle_two = if config.two_players {
            Some(Paddle::from_config(Side::Two, &config)?)
        } else {
            None
        };
        let ball = Ball::from_config(&config)?;

        Ok(Game {
            config,
            tick: 0,
            paddle_one,
            paddle_two,
            ball,
            score: Score::default(),
            running: false,
        })
    }

    pub fn paddle(&self, side: Side) -> Option<&Paddle> {
        match side {
            Side::One => Some(&self.paddle_one),
            Side::Two => self.paddle_two.as_ref(),
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> Option<&mut Paddle> {
        match side {
            Side::One => Some(&mut self.paddle_one),
            Side::Two => self.paddle_two.as_mut(),
        }
    }

    /// Apply one player action. Actions for a missing paddle are ignored.
    pub fn apply(&mut self, action: Action) -> Result<Option<Event>, SimError> {
        if let Action::Serve(side) = action {
            return Ok(self.serve(side)?.then_some(Event::Served { side }));
        }

        let config = &self.config;
        let paddle = match action.side() {
            Side::One => Some(&mut self.paddle_one),
            Side::Two => self.paddle_two.as_mut(),
        };
        let Some(paddle) = paddle else {
            return Ok(None);
        };

        match action {
            Action::MoveLeft(_) => paddle.move_left(config)?,
            Action::MoveRight(_) => paddle.move_right(config)?,
            Action::Stop(_) => paddle.stop(),
            Action::Serve(_) => {}
        }

        Ok(None)
    }

    /// Put the ball in play from the given side.
    ///
    /// Only possible while the ball is stopped and within the paddle's
    /// horizontal extent; otherwise this is a no-op returning false.
    pub fn serve(&mut self, side: Side) -> Result<bool, SimError> {
        if self.running {
            return Ok(false);
        }

        let ball_x = self.ball.body().position().x;
        match self.paddle(side) {
            Some(paddle) if paddle.covers(ball_x) => {}
            _ => return Ok(false),
        }

        let impulse = Impulse::vertical(
            side.serve_sense(),
            self.config.serve_magnitude,
            self.config.serve_duration,
        )?;
        self.ball.strike(impulse, None)?;
        self.running = true;

        log::debug!("Player {side:?} served at tick {}", self.tick);
        Ok(true)
    }

    /// Step the simulation forward by one tick
    pub fn step(&mut self) -> Result<Vec<Event>, SimError> {
        let mut events = Vec::new();
        let arena = self.config.arena;

        self.paddle_one.update(&arena);
        if let Some(paddle) = self.paddle_two.as_mut() {
            paddle.update(&arena);
        }

        if self.running {
            for side in [Side::One, Side::Two] {
                if self.resolve_hit(side)? {
                    events.push(Event::PaddleHit { side });
                }
            }
        }

        let crossing = self.ball.update(&arena);
        if crossing.any() {
            let reset = self.ball.reset(crossing.axis_x, &self.config);
            self.running = false;

            match reset.scorer {
                Some(scorer) => {
                    self.score.award(scorer);
                    log::info!(
                        "Point for player {scorer:?} ({} - {})",
                        self.score.player_one,
                        self.score.player_two
                    );
                    events.push(Event::Scored {
                        scorer,
                        score: self.score,
                    });
                }
                None => log::debug!("Ball went out without a vertical impulse, no point"),
            }
        }

        self.tick += 1;
        Ok(events)
    }

    /// Send the ball back if it touches the side's paddle
    fn resolve_hit(&mut self, side: Side) -> Result<bool, SimError> {
        let Some(paddle) = self.paddle(side) else {
            return Ok(false);
        };

        let hit = Physics::detect_collision(
            self.ball.body().position(),
            self.ball.circle(),
            paddle.body().position(),
            paddle.rect(),
            side == Side::One,
        );
        if !hit {
            return Ok(false);
        }

        let nudge = paddle.last_push();
        let vertical = Impulse::vertical(
            side.serve_sense(),
            self.config.hit_magnitude,
            self.config.hit_duration,
        )?;
        self.ball.strike(vertical, nudge)?;

        log::debug!("Player {side:?} hit the ball at tick {}", self.tick);
        Ok(true)
    }

    /// Zero every velocity. The score and the running flag are kept.
    pub fn halt(&mut self) {
        self.paddle_one.stop();
        if let Some(paddle) = self.paddle_two.as_mut() {
            paddle.stop();
        }
        self.ball.body_mut().stop();
    }

    /// Generate a view of the current game state for rendering
    pub fn view(&self) -> View {
        View {
            tick: self.tick,
            running: self.running,
            paddle_one: self.paddle_one.body().position(),
            paddle_two: self.paddle_two.as_ref().map(|p| p.body().position()),
            ball: self.ball.body().position(),
            ball_velocity: self.ball.body().velocity(),
            score: self.score,
        }
    }

    /// Get a human-readable status string
    pub fn status_string(&self) -> &'static str {
        if self.running {
            "Playing"
        } else {
            "Waiting for serve"
        }
    }
}
