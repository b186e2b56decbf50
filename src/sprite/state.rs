/// All code relating to individual player states lives here. Transitions are
/// only reachable through these methods, so e.g. jumping while already in
/// the air can't be expressed:
/// - PUBLIC  : PlayerState and PlayerContext
/// - PRIVATE : the context's physics helpers
use crate::config::PhysicsConfig;
use crate::engine::{Point, Rect, Size, FRAME_SIZE};
use crate::sprite::{Spinning, Standing, WalkingLeft, WalkingRight};
use crate::world::World;

// one fixed update step, in seconds
const STEP_SECONDS: f32 = FRAME_SIZE / 1000.0;

/// States where the player has something under their feet
pub trait Grounded: Copy {}
impl Grounded for Standing {}
impl Grounded for WalkingLeft {}
impl Grounded for WalkingRight {}

pub enum IsGrounded<S> {
    OnGround(PlayerState<S>),
    Airborne(PlayerState<Spinning>),
}

pub enum IsSpinning {
    Landed(PlayerState<Standing>),
    InAir(PlayerState<Spinning>),
}

#[derive(Debug, Copy, Clone)]
/// Shared data for :
/// - physics : body box + velocity (px/s)
/// - display : frame ticks + rotation
pub struct PlayerContext {
    pub frame: u32,
    pub body: Rect,
    pub velocity: Point,
    pub rotation: f32,
    pub grounded: bool,
}

#[derive(Debug, Copy, Clone)]
pub struct PlayerState<S> {
    context: PlayerContext,
    // phantom marker, only there to tell states apart at compile time
    _state: S,
}

impl<S> PlayerState<S> {
    pub fn context(&self) -> &PlayerContext {
        &self.context
    }

    /// horizontal input applies in every state, including mid-air
    pub fn with_velocity_x(mut self, velocity_x: f32) -> Self {
        self.context.velocity.x = velocity_x;
        self
    }
}

impl PlayerState<Standing> {
    /// `spawn` is the centre of the body
    pub fn new(spawn: Point, body_size: Size) -> Self {
        PlayerState {
            context: PlayerContext {
                frame: 0,
                body: Rect::centered_at(spawn, body_size),
                velocity: Point::default(),
                rotation: 0.0,
                grounded: false,
            },
            _state: Standing,
        }
    }
}

impl<S: Grounded> PlayerState<S> {
    pub fn update(mut self, world: &World, physics: &PhysicsConfig) -> IsGrounded<S> {
        self.context = self.context.update(world, physics);
        if self.context.grounded {
            IsGrounded::OnGround(self)
        } else {
            // walked off a ledge
            IsGrounded::Airborne(self.spin())
        }
    }

    pub fn stand(self) -> PlayerState<Standing> {
        PlayerState {
            context: self.context.on_state_transition().with_velocity_x(0.0),
            _state: Standing,
        }
    }

    pub fn walk_left(self, speed: f32) -> PlayerState<WalkingLeft> {
        PlayerState {
            context: self.context.on_state_transition().with_velocity_x(-speed),
            _state: WalkingLeft,
        }
    }

    pub fn walk_right(self, speed: f32) -> PlayerState<WalkingRight> {
        PlayerState {
            context: self.context.on_state_transition().with_velocity_x(speed),
            _state: WalkingRight,
        }
    }

    pub fn jump(self, jump_speed: f32) -> PlayerState<Spinning> {
        PlayerState {
            context: self
                .context
                .on_state_transition()
                .set_vertical_velocity(-jump_speed)
                .leave_ground(),
            _state: Spinning,
        }
    }

    fn spin(self) -> PlayerState<Spinning> {
        PlayerState {
            context: self.context.on_state_transition(),
            _state: Spinning,
        }
    }
}

impl PlayerState<Spinning> {
    pub fn update(mut self, world: &World, physics: &PhysicsConfig) -> IsSpinning {
        self.context = self.context.update(world, physics);
        if self.context.grounded {
            IsSpinning::Landed(self.land())
        } else {
            self.context.rotation =
                (self.context.rotation + physics.spin_speed * STEP_SECONDS) % 360.0;
            IsSpinning::InAir(self)
        }
    }

    pub fn land(self) -> PlayerState<Standing> {
        let mut context = self.context.on_state_transition();
        context.rotation = 0.0;
        PlayerState {
            context,
            _state: Standing,
        }
    }
}

impl PlayerContext {
    /// ::update per step
    /// - gravity -> velocity -> position
    /// - push out of platforms one axis at a time, x first
    /// - keep inside the world
    pub fn update(mut self, world: &World, physics: &PhysicsConfig) -> Self {
        self.frame = self.frame.wrapping_add(1);
        self.velocity.y += physics.gravity * STEP_SECONDS;

        self.body.position.x += self.velocity.x * STEP_SECONDS;
        for platform in world.platforms() {
            if self.body.intersects(platform) {
                if self.velocity.x > 0.0 {
                    self.body.position.x = platform.x() - self.body.size.width;
                } else if self.velocity.x < 0.0 {
                    self.body.position.x = platform.right();
                }
            }
        }

        self.grounded = false;
        self.body.position.y += self.velocity.y * STEP_SECONDS;
        for platform in world.platforms() {
            if self.body.intersects(platform) {
                if self.velocity.y > 0.0 {
                    self.body.position.y = platform.y() - self.body.size.height;
                    self.velocity.y = 0.0;
                    self.grounded = true;
                } else if self.velocity.y < 0.0 {
                    // head bump
                    self.body.position.y = platform.bottom();
                    self.velocity.y = 0.0;
                }
            }
        }

        let clamped = world.clamp(&mut self.body);
        if clamped.bottom {
            self.velocity.y = 0.0;
            self.grounded = true;
        }
        if clamped.top && self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }

        self
    }

    /// restart the animation from its first frame
    fn on_state_transition(mut self) -> Self {
        self.frame = 0;
        self
    }

    fn with_velocity_x(mut self, x: f32) -> Self {
        self.velocity.x = x;
        self
    }

    fn set_vertical_velocity(mut self, y: f32) -> Self {
        self.velocity.y = y;
        self
    }

    fn leave_ground(mut self) -> Self {
        self.grounded = false;
        self
    }
}
