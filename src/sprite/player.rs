#[cfg(debug_assertions)]
use crate::engine::DebugDraw;
use crate::config::PhysicsConfig;
use crate::engine::{Point, Rect, Renderer};
use crate::sprite::state::{Grounded, IsGrounded, IsSpinning, PlayerContext, PlayerState};
use crate::sprite::{Spinning, SpriteSheet, SpriteState, Standing, WalkingLeft, WalkingRight};
use crate::world::World;
use web_sys::HtmlImageElement;

pub const SPAWN: Point = Point { x: 200.0, y: 32.0 };

/// Horizontal intent read from the arrow keys
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Still,
}

impl Direction {
    pub fn velocity(self, speed: f32) -> f32 {
        match self {
            Direction::Left => -speed,
            Direction::Right => speed,
            Direction::Still => 0.0,
        }
    }
}

/// ┌──────────────── State Transition Flow ──────────────────┐
/// │  From State     →  Event        →  To State             │
/// ├─────────────────────────────────────────────────────────┤
/// │  on the ground  →  Steer(Left)  →  WalkingLeft          │
/// │  on the ground  →  Steer(Right) →  WalkingRight         │
/// │  on the ground  →  Steer(Still) →  Standing             │
/// │  on the ground  →  Jump         →  Spinning             │
/// │  Spinning       →  Steer(_)     →  Spinning (drifts)    │
/// │  -------           ------                               │
/// │  on the ground  →  Update       →  Spinning (walked off)│
/// │  Spinning       →  Update       →  Standing (landed)    │
/// └─────────────────────────────────────────────────────────┘
#[derive(Debug, Copy, Clone)]
pub enum Event {
    Steer(Direction),
    Jump,
    Update,
}

#[derive(Debug, Copy, Clone)]
pub enum PlayerStateMachine {
    Standing(PlayerState<Standing>),
    WalkingLeft(PlayerState<WalkingLeft>),
    WalkingRight(PlayerState<WalkingRight>),
    Spinning(PlayerState<Spinning>),
}

impl From<PlayerState<Standing>> for PlayerStateMachine {
    fn from(state: PlayerState<Standing>) -> Self {
        PlayerStateMachine::Standing(state)
    }
}

impl From<PlayerState<WalkingLeft>> for PlayerStateMachine {
    fn from(state: PlayerState<WalkingLeft>) -> Self {
        PlayerStateMachine::WalkingLeft(state)
    }
}

impl From<PlayerState<WalkingRight>> for PlayerStateMachine {
    fn from(state: PlayerState<WalkingRight>) -> Self {
        PlayerStateMachine::WalkingRight(state)
    }
}

impl From<PlayerState<Spinning>> for PlayerStateMachine {
    fn from(state: PlayerState<Spinning>) -> Self {
        PlayerStateMachine::Spinning(state)
    }
}

impl<S> From<IsGrounded<S>> for PlayerStateMachine
where
    PlayerState<S>: Into<PlayerStateMachine>,
{
    fn from(is_grounded: IsGrounded<S>) -> Self {
        match is_grounded {
            IsGrounded::OnGround(state) => state.into(),
            IsGrounded::Airborne(spinning) => spinning.into(),
        }
    }
}

impl From<IsSpinning> for PlayerStateMachine {
    fn from(is_spinning: IsSpinning) -> Self {
        match is_spinning {
            IsSpinning::Landed(standing) => standing.into(),
            IsSpinning::InAir(spinning) => spinning.into(),
        }
    }
}

impl PlayerStateMachine {
    pub fn new(spawn: Point) -> Self {
        PlayerState::new(spawn, SpriteSheet::PLAYER_FRAME).into()
    }

    // consumes the old state : once transitioned it can't be touched again
    pub fn transition(self, event: Event, world: &World, physics: &PhysicsConfig) -> Self {
        use PlayerStateMachine::*;
        let speed = physics.run_speed;
        match (self, event) {
            // already playing the right animation : only the velocity changes
            (Standing(state), Event::Steer(Direction::Still)) => state.with_velocity_x(0.0).into(),
            (WalkingLeft(state), Event::Steer(Direction::Left)) => {
                state.with_velocity_x(-speed).into()
            }
            (WalkingRight(state), Event::Steer(Direction::Right)) => {
                state.with_velocity_x(speed).into()
            }
            (Standing(state), Event::Steer(direction)) => steer(state, direction, speed),
            (WalkingLeft(state), Event::Steer(direction)) => steer(state, direction, speed),
            (WalkingRight(state), Event::Steer(direction)) => steer(state, direction, speed),
            (Spinning(state), Event::Steer(direction)) => {
                state.with_velocity_x(direction.velocity(speed)).into()
            }

            (Standing(state), Event::Jump) => state.jump(physics.jump_speed).into(),
            (WalkingLeft(state), Event::Jump) => state.jump(physics.jump_speed).into(),
            (WalkingRight(state), Event::Jump) => state.jump(physics.jump_speed).into(),

            (Standing(state), Event::Update) => state.update(world, physics).into(),
            (WalkingLeft(state), Event::Update) => state.update(world, physics).into(),
            (WalkingRight(state), Event::Update) => state.update(world, physics).into(),
            (Spinning(state), Event::Update) => state.update(world, physics).into(),

            // jumping while already in the air
            (Spinning(_), Event::Jump) => self,
        }
    }

    pub fn context(&self) -> &PlayerContext {
        use PlayerStateMachine::*;
        match self {
            Standing(state) => state.context(),
            WalkingLeft(state) => state.context(),
            WalkingRight(state) => state.context(),
            Spinning(state) => state.context(),
        }
    }

    pub fn animation_name(&self) -> &'static str {
        use PlayerStateMachine::*;
        match self {
            Standing(_) => crate::sprite::Standing::name(),
            WalkingLeft(_) => crate::sprite::WalkingLeft::name(),
            WalkingRight(_) => crate::sprite::WalkingRight::name(),
            Spinning(_) => crate::sprite::Spinning::name(),
        }
    }

    /// Sheet index of the frame to draw
    pub fn frame_index(&self) -> u32 {
        use PlayerStateMachine::*;
        let ticks = self.context().frame;
        match self {
            Standing(_) => crate::sprite::Standing::frame_index(ticks),
            WalkingLeft(_) => crate::sprite::WalkingLeft::frame_index(ticks),
            WalkingRight(_) => crate::sprite::WalkingRight::frame_index(ticks),
            Spinning(_) => crate::sprite::Spinning::frame_index(ticks),
        }
    }
}

fn steer<S: Grounded>(state: PlayerState<S>, direction: Direction, speed: f32) -> PlayerStateMachine {
    match direction {
        Direction::Left => state.walk_left(speed).into(),
        Direction::Right => state.walk_right(speed).into(),
        Direction::Still => state.stand().into(),
    }
}

/// The player's state machine plus where its frames sit on the sheet. The
/// sheet image itself is handed in at draw time.
pub struct Player {
    state: PlayerStateMachine,
    sheet: SpriteSheet,
}

impl Player {
    pub fn new(sheet: SpriteSheet) -> Self {
        Player {
            state: PlayerStateMachine::new(SPAWN),
            sheet,
        }
    }

    /// One step of input + physics, in the order the keys are read
    pub fn update(&mut self, direction: Direction, jump: bool, world: &World, physics: &PhysicsConfig) {
        self.state = self.state.transition(Event::Steer(direction), world, physics);
        if jump {
            self.state = self.state.transition(Event::Jump, world, physics);
        }
        self.state = self.state.transition(Event::Update, world, physics);
    }

    pub fn respawn(&mut self) {
        self.state = PlayerStateMachine::new(SPAWN);
    }

    pub fn bounding_box(&self) -> Rect {
        self.state.context().body
    }

    pub fn has_fallen(&self, fall_limit: f32) -> bool {
        self.bounding_box().center().y > fall_limit
    }

    pub fn draw(&self, renderer: &Renderer, image: &HtmlImageElement) {
        let frame = self.sheet.frame(self.state.frame_index());
        let body = self.bounding_box();
        renderer.draw_image_rotated(
            image,
            &frame,
            &Rect::centered_at(body.center(), frame.size),
            self.state.context().rotation,
        );

        #[cfg(debug_assertions)]
        body.draw_debug(renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldBounds;
    use crate::engine::Size;

    fn world() -> World {
        World::new(
            WorldBounds::default(),
            Size {
                width: 100.0,
                height: 20.0,
            },
        )
    }

    fn step(
        machine: PlayerStateMachine,
        direction: Direction,
        jump: bool,
        world: &World,
    ) -> PlayerStateMachine {
        let physics = PhysicsConfig::default();
        let mut machine = machine.transition(Event::Steer(direction), world, &physics);
        if jump {
            machine = machine.transition(Event::Jump, world, &physics);
        }
        machine.transition(Event::Update, world, &physics)
    }

    fn settle(mut machine: PlayerStateMachine, world: &World) -> PlayerStateMachine {
        for _ in 0..300 {
            machine = step(machine, Direction::Still, false, world);
        }
        machine
    }

    #[test]
    fn spawn_falls_and_lands_on_a_ledge() {
        let world = world();
        let machine = settle(PlayerStateMachine::new(SPAWN), &world);
        assert_eq!(machine.animation_name(), "MCstand");
        assert!(machine.context().grounded);
        // spawned above the gap column at x=200 : lands on the floor
        assert_eq!(machine.context().body.bottom(), 400.0);
    }

    #[test]
    fn arrows_pick_walking_animations() {
        let world = world();
        let standing = settle(PlayerStateMachine::new(Point::new(100.0, 300.0)), &world);

        let left = step(standing, Direction::Left, false, &world);
        assert_eq!(left.animation_name(), "MCleft");
        assert!(left.context().velocity.x < 0.0);

        let right = step(standing, Direction::Right, false, &world);
        assert_eq!(right.animation_name(), "MCright");

        let still = step(right, Direction::Still, false, &world);
        assert_eq!(still.animation_name(), "MCstand");
        assert_eq!(still.context().velocity.x, 0.0);
    }

    #[test]
    fn walking_animation_keeps_running_while_key_held() {
        let world = world();
        let mut machine = settle(PlayerStateMachine::new(Point::new(100.0, 300.0)), &world);
        machine = step(machine, Direction::Right, false, &world);
        for _ in 0..6 {
            machine = step(machine, Direction::Right, false, &world);
        }
        assert_eq!(machine.frame_index(), 6);
    }

    #[test]
    fn jump_spins_and_ignores_second_jump() {
        let world = world();
        let standing = settle(PlayerStateMachine::new(SPAWN), &world);
        let jumping = step(standing, Direction::Still, true, &world);
        assert_eq!(jumping.animation_name(), "MCspin");
        let vy = jumping.context().velocity.y;
        assert!(vy < 0.0);

        let physics = PhysicsConfig::default();
        let again = jumping.transition(Event::Jump, &world, &physics);
        assert_eq!(again.context().velocity.y, vy);
    }

    #[test]
    fn steering_in_the_air_drifts() {
        let world = world();
        let standing = settle(PlayerStateMachine::new(SPAWN), &world);
        let jumping = step(standing, Direction::Still, true, &world);
        let drifting = step(jumping, Direction::Left, false, &world);
        assert_eq!(drifting.animation_name(), "MCspin");
        assert!(drifting.context().body.x() < jumping.context().body.x());
    }

    fn player() -> Player {
        Player::new(SpriteSheet::new(SpriteSheet::PLAYER_FRAME, 250.0))
    }

    #[test]
    fn fresh_player_has_not_fallen() {
        let player = player();
        assert_eq!(player.bounding_box().center(), SPAWN);
        assert!(!player.has_fallen(PhysicsConfig::default().fall_limit));
    }

    #[test]
    fn dropping_through_the_gap_counts_as_fallen() {
        let world = world();
        let physics = PhysicsConfig::default();
        let mut player = player();
        for _ in 0..300 {
            player.update(Direction::Still, false, &world, &physics);
        }
        // resting on the world floor, centre at 384
        assert_eq!(player.bounding_box().bottom(), 400.0);
        assert!(player.has_fallen(physics.fall_limit));

        player.respawn();
        assert_eq!(player.bounding_box().center(), SPAWN);
        assert!(!player.has_fallen(physics.fall_limit));
    }
}
