use crate::config::GameConfig;
use crate::engine::input::{KeyState, ARROW_LEFT, ARROW_RIGHT, ARROW_UP, ENTER};
use crate::engine::{self, Game, Image, Point, Rect, Renderer, Size, TextStyle, FRAME_SIZE};
use crate::hud::Hud;
use crate::session::{GameSession, Position};
use crate::sprite::player::{Direction, Player};
use crate::sprite::SpriteSheet;
use crate::win_screen::{WinScreen, BUTTON_SCALE};
use crate::world::World;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::join;
use rand::rngs::StdRng;
use rand::Rng;
use web_sys::HtmlImageElement;

/// ┌──────────────────────── Update Flow ────────────────────────────┐
/// │                                                                 │
/// │  GameLoop ──update──► HotdogHunt ──► Scene::Playing             │
/// │                            │            ├─ Player (input+physics)│
/// │                            │            ├─ fell? restart()       │
/// │                            │            ├─ overlap? collect_item │
/// │                            │            └─ advance(timer)        │
/// │                            │                   │ Won             │
/// │                            │                   ▼                 │
/// │                            └──────────► Scene::YouWin            │
/// │                                           └─ Enter / click       │
/// │                                              on_restart_requested│
/// └─────────────────────────────────────────────────────────────────┘
pub enum HotdogHunt {
    /// Assets still loading
    Loading(GameConfig),

    /// Everything loaded, the game is running
    Loaded(Box<Hunt>),
}

mod assets {
    pub const BACKGROUND: &str = "assets/background.jpeg";
    pub const PLAYER: &str = "assets/sans.png";
    pub const HOTDOG: &str = "assets/hotdog.png";
    pub const PLATFORM: &str = "assets/platform.png";
    pub const RESTART: &str = "assets/restart.png";
}

const BACKGROUND_CENTER: Point = Point { x: 200.0, y: 149.0 };
const WIN_BACKGROUND: &str = "#00c04b";
const WIN_MESSAGE: &str = "Você Venceu!";

impl HotdogHunt {
    pub fn new(config: GameConfig) -> Self {
        HotdogHunt::Loading(config)
    }

    async fn load(source: &str) -> Result<HtmlImageElement> {
        engine::load_image(source)
            .await
            .with_context(|| format!("Failed to load image resource from : {}", source))
    }
}

#[async_trait(?Send)]
impl Game for HotdogHunt {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            HotdogHunt::Loading(config) => {
                // independent images, load them side by side
                let (background, player, hotdog, platform, restart) = join!(
                    Self::load(assets::BACKGROUND),
                    Self::load(assets::PLAYER),
                    Self::load(assets::HOTDOG),
                    Self::load(assets::PLATFORM),
                    Self::load(assets::RESTART),
                );
                let hunt = Hunt::new(*config, background?, player?, hotdog?, platform?, restart?);
                log!("Hotdog Hunt loaded, first hotdog at {:?}", hunt.play.session.active_item());
                Ok(Box::new(HotdogHunt::Loaded(Box::new(hunt))))
            }
            HotdogHunt::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, keystate: &KeyState) {
        if let HotdogHunt::Loaded(hunt) = self {
            hunt.update(keystate);
        }
    }

    fn draw(&mut self, renderer: &Renderer) {
        if let HotdogHunt::Loaded(hunt) = self {
            hunt.draw(renderer);
        }
    }
}

pub enum Scene {
    Playing,
    YouWin(WinScreen),
}

/// The loaded game : per-step logic in `Play`, images only for drawing
pub struct Hunt {
    play: Play,
    background: Image,
    player: HtmlImageElement,
    platform: HtmlImageElement,
    hotdog: HtmlImageElement,
    restart_button: Image,
}

impl Hunt {
    fn new(
        config: GameConfig,
        background: HtmlImageElement,
        player: HtmlImageElement,
        hotdog: HtmlImageElement,
        platform: HtmlImageElement,
        restart: HtmlImageElement,
    ) -> Self {
        let sheet = SpriteSheet::new(SpriteSheet::PLAYER_FRAME, engine::image_size(&player).width);
        let restart_button = Image::centered_at(restart, WinScreen::button_center(&config.world))
            .scaled(BUTTON_SCALE);
        let play = Play::new(
            config,
            GameSession::start(config.session, config.world),
            engine::image_size(&platform),
            sheet,
            engine::image_size(&hotdog),
            *restart_button.bounding_box(),
        );
        Hunt {
            play,
            background: Image::centered_at(background, BACKGROUND_CENTER),
            player,
            platform,
            hotdog,
            restart_button,
        }
    }

    fn update(&mut self, keystate: &KeyState) {
        self.play.update(keystate);
    }

    fn draw(&self, renderer: &Renderer) {
        let play = &self.play;
        let bounds = play.config.world;
        renderer.clear(&Rect::new_from_x_y(0.0, 0.0, bounds.width, bounds.height));
        match &play.scene {
            Scene::Playing => {
                // back to front
                self.background.draw(renderer);
                for platform in play.world.platforms() {
                    renderer.draw_entire_image(&self.platform, platform);
                }
                renderer.draw_entire_image(&self.hotdog, &play.hotdog_box());
                play.player.draw(renderer, &self.player);
                play.hud.draw(renderer);
            }
            Scene::YouWin(screen) => {
                renderer.fill_rect(
                    &Rect::new_from_x_y(0.0, 0.0, bounds.width, bounds.height),
                    WIN_BACKGROUND,
                );
                let message_style = TextStyle {
                    font: "bold italic 50px 'Comic Sans MS'".to_string(),
                    color: "#000000",
                    align: "center",
                    ..TextStyle::default()
                };
                renderer.draw_text(
                    WIN_MESSAGE,
                    Point {
                        x: bounds.width / 2.0,
                        // 50px text centred 50px above the middle
                        y: bounds.height / 2.0 - 75.0,
                    },
                    &message_style,
                );
                renderer.draw_text(
                    &format!("Score: {}", screen.score()),
                    Point {
                        x: bounds.width / 2.0,
                        y: bounds.height / 2.0 + 10.0,
                    },
                    &TextStyle {
                        font: "24px 'Comic Sans MS'".to_string(),
                        color: "#000000",
                        align: "center",
                        ..TextStyle::default()
                    },
                );
                self.restart_button.draw(renderer);
            }
        }
    }
}

/// Everything one update step touches. No images in here, just the sizes
/// the hit tests need.
pub struct Play<R: Rng = StdRng> {
    config: GameConfig,
    session: GameSession<R>,
    world: World,
    player: Player,
    hud: Hud,
    scene: Scene,
    hotdog_size: Size,
    restart_button: Rect,
}

impl<R: Rng> Play<R> {
    fn new(
        config: GameConfig,
        session: GameSession<R>,
        platform_size: Size,
        sheet: SpriteSheet,
        hotdog_size: Size,
        restart_button: Rect,
    ) -> Self {
        Play {
            session,
            world: World::new(config.world, platform_size),
            player: Player::new(sheet),
            hud: Hud::new(config.world.width),
            scene: Scene::Playing,
            hotdog_size,
            restart_button,
            config,
        }
    }

    fn update(&mut self, keystate: &KeyState) {
        if let Scene::Playing = self.scene {
            return self.update_playing(keystate);
        }
        if !self.restart_requested(keystate) {
            return;
        }
        if let Scene::YouWin(screen) = &self.scene {
            screen.on_restart_requested(&mut self.session);
        }
        self.player.respawn();
        self.hud.reset();
        self.scene = Scene::Playing;
    }

    // a fresh Enter press, not one still held from the play scene
    fn restart_requested(&self, keystate: &KeyState) -> bool {
        keystate.was_just_pressed(ENTER)
            || keystate
                .pointer_presses()
                .iter()
                .any(|press| self.restart_button.contains(*press))
    }

    fn update_playing(&mut self, keystate: &KeyState) {
        let step_ms = f64::from(FRAME_SIZE);
        self.player.update(
            read_direction(keystate),
            keystate.is_pressed(ARROW_UP),
            &self.world,
            &self.config.physics,
        );

        if self.player.has_fallen(self.config.physics.fall_limit) {
            log!("Fell off the platforms, restarting");
            self.session.restart();
            self.player.respawn();
            self.hud.reset();
            return;
        }

        if self.player.bounding_box().intersects(&self.hotdog_box()) {
            let won = self.session.collect_item();
            self.hud
                .on_collect(self.session.score(), self.config.session.grace_ms);
            if let Some(snapshot) = won {
                self.scene = Scene::YouWin(WinScreen::enter(snapshot));
                return;
            }
        }

        self.session.advance(step_ms);
        self.hud.update(step_ms);
    }

    fn hotdog_box(&self) -> Rect {
        hotdog_box(self.session.active_item(), self.hotdog_size)
    }
}

fn read_direction(keystate: &KeyState) -> Direction {
    // left wins when both are held
    if keystate.is_pressed(ARROW_LEFT) {
        Direction::Left
    } else if keystate.is_pressed(ARROW_RIGHT) {
        Direction::Right
    } else {
        Direction::Still
    }
}

/// The hotdog is placed by its centre
fn hotdog_box(position: Position, size: Size) -> Rect {
    Rect::centered_at(position, size)
}
